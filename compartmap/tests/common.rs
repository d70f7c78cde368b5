#![allow(dead_code)]
use compartmap::prelude::*;
use itertools::Itertools;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};

pub const DEMO_GENOME: &str = "demo";

/// Generates random sample sets over a small synthetic genome.
pub struct DemoSetBuilder {
    chr_lengths:      Vec<(String, PosType)>,
    n_samples:        usize,
    features_per_chr: usize,
    rng:              StdRng,
}

impl DemoSetBuilder {
    pub fn new(
        chr_lengths: &[(&str, PosType)],
        n_samples: usize,
        features_per_chr: usize,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            chr_lengths: chr_lengths
                .iter()
                .map(|(chr, len)| (chr.to_string(), *len))
                .collect(),
            n_samples,
            features_per_chr,
            rng,
        }
    }

    pub fn genome(&self) -> GenomeTable {
        let mut table = GenomeTable::new();
        table.insert_build(
            DEMO_GENOME,
            self.chr_lengths
                .iter()
                .map(|(chr, len)| (chr.as_str(), *len))
                .collect(),
        );
        table
    }

    pub fn sample_names(&self) -> Vec<String> {
        (0..self.n_samples).map(|i| format!("s{i}")).collect()
    }

    /// Random features, sorted per chromosome, with values drawn by
    /// `value_fn`.
    pub fn build<F>(
        &mut self,
        mut value_fn: F,
    ) -> SampleSet
    where
        F: FnMut(&mut StdRng) -> ValueType, {
        let mut features = Vec::new();
        for (chr, len) in self.chr_lengths.clone() {
            let starts = (0..self.features_per_chr)
                .map(|_| self.rng.gen_range(0..len))
                .sorted()
                .collect_vec();
            features.extend(
                starts
                    .into_iter()
                    .map(|start| Contig::new(chr.as_str().into(), start, start + 1)),
            );
        }
        let values = Array2::from_shape_simple_fn((features.len(), self.n_samples), || {
            value_fn(&mut self.rng)
        });
        SampleSet::try_new(features, self.sample_names(), values)
            .expect("demo set is well-formed")
    }

    /// Values uniform in `[0, 1)`.
    pub fn build_beta(&mut self) -> SampleSet {
        self.build(|rng| rng.gen::<f64>())
    }

    /// Integer counts in `[0, max)`.
    pub fn build_counts(
        &mut self,
        max: u32,
    ) -> SampleSet {
        self.build(move |rng| rng.gen_range(0..max) as f64)
    }
}
