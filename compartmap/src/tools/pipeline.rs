use std::time::Instant;

use log::{
    debug,
    info,
    warn,
};
use ndarray::{
    Array1,
    Array2,
};
use rayon::prelude::*;

use super::binning::{
    GenomicBin,
    GenomicBinner,
};
use super::config::ShrinkConfig;
use super::filter::{
    filter_zero_prior,
    BinRows,
};
use super::global_mean::{
    global_means_by_index,
    resolve_targets,
};
use super::shrinkage::shrink_matrix;
use super::summary::summarize_bins;
use crate::data_structs::coords::Contig;
use crate::data_structs::typedef::{
    SeqName,
    ValueType,
};
use crate::data_structs::{
    AssayKind,
    ReferenceSet,
    SampleSet,
    ValueScale,
};
use crate::error::{
    CompartmapError,
    Result,
};
use crate::genome::ChromLengths;
use crate::utils::{
    flogit,
    THREAD_POOL,
};
use crate::getter_fn;

/// Shrunken bin × sample matrix of one chromosome with its row-aligned bins,
/// prior and per-bin shrinkage coefficients.
#[derive(Debug, Clone)]
pub struct ShrunkenBins {
    chr:          SeqName,
    bins:         Vec<GenomicBin>,
    prior:        Array1<ValueType>,
    values:       Array2<ValueType>,
    coefficients: Array1<ValueType>,
    sample_names: Vec<String>,
}

impl ShrunkenBins {
    getter_fn!(chr, SeqName);
    getter_fn!(bins, Vec<GenomicBin>);
    getter_fn!(prior, Array1<ValueType>);
    getter_fn!(values, Array2<ValueType>);
    getter_fn!(coefficients, Array1<ValueType>);
    getter_fn!(sample_names, Vec<String>);

    pub fn n_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bin coordinates in row order.
    pub fn contigs(&self) -> impl Iterator<Item = &Contig> {
        self.bins.iter().map(GenomicBin::contig)
    }

    /// Splits into bins, prior and matrix.
    pub fn into_parts(self) -> (Vec<GenomicBin>, Array1<ValueType>, Array2<ValueType>) {
        (self.bins, self.prior, self.values)
    }
}

/// Runs the shrinkage pipeline on a sample set, one chromosome at a time.
///
/// Construction validates everything that does not depend on the
/// chromosome (targets, resolution, reference alignment, value ranges), so
/// a chromosome run can only fail on chromosome-specific problems.
#[derive(Debug, Clone)]
pub struct Shrinker<'a> {
    samples:        &'a SampleSet,
    reference:      &'a ReferenceSet,
    config:         ShrinkConfig,
    binner:         GenomicBinner,
    /// Reference columns averaged into the prior.
    prior_columns:  Option<Vec<usize>>,
    /// Sample columns feeding the shrinkage coefficient.
    spread_columns: Option<Vec<usize>>,
}

impl<'a> Shrinker<'a> {
    /// # Errors
    ///
    /// * [`CompartmapError::InsufficientTargets`] if exactly one target is
    ///   configured. Checked before anything else.
    /// * [`CompartmapError::InvalidResolution`] if the resolution is not
    ///   positive.
    /// * [`CompartmapError::InputType`] if the reference is not row-aligned
    ///   with the samples, a target is missing from either set, fewer than two
    ///   samples are given without targets, or values are out of range for
    ///   the assay and scale.
    pub fn try_new(
        samples: &'a SampleSet,
        reference: Option<&'a ReferenceSet>,
        config: ShrinkConfig,
    ) -> Result<Self> {
        let targets = resolve_targets(config.targets_slice())?;
        let binner = GenomicBinner::try_new(config.resolution)?;
        let reference = reference.unwrap_or(samples);

        if !samples.is_row_aligned(reference) {
            return Err(CompartmapError::input(format!(
                "reference set ({} features) is not row-aligned with the sample set ({} \
                 features)",
                reference.n_features(),
                samples.n_features()
            )));
        }

        let (prior_columns, spread_columns) = match targets {
            Some(targets) => {
                (
                    Some(reference.column_indices(targets)?),
                    Some(samples.column_indices(targets)?),
                )
            },
            None if samples.n_samples() < 2 => {
                return Err(CompartmapError::input(
                    "shrinkage without targets needs at least two samples",
                ));
            },
            None => (None, None),
        };

        check_value_range(samples, config.assay, config.input_scale)?;
        if !std::ptr::eq(samples, reference) {
            check_value_range(reference, config.assay, config.input_scale)?;
        }

        info!(
            "Shrinking {} samples toward {} ({} reference samples, {}) at {} bp on {}",
            samples.n_samples(),
            if prior_columns.is_some() { "target mean" } else { "group mean" },
            prior_columns
                .as_ref()
                .map_or(reference.n_samples(), Vec::len),
            config.assay,
            binner.resolution(),
            config.genome
        );

        Ok(Self {
            samples,
            reference,
            config,
            binner,
            prior_columns,
            spread_columns,
        })
    }

    pub fn config(&self) -> &ShrinkConfig {
        &self.config
    }

    /// Chromosomes of the sample set, in order of first appearance.
    pub fn chromosomes(&self) -> Vec<SeqName> {
        self.samples.chromosomes()
    }

    /// Bins, summarizes, shrinks and filters the features on `chr`.
    ///
    /// A chromosome without features yields an empty result.
    pub fn shrink_chromosome<L: ChromLengths + ?Sized>(
        &self,
        lengths: &L,
        chr: &str,
    ) -> Result<ShrunkenBins> {
        let start = Instant::now();
        let rows = self.samples.chromosome_rows(chr);
        if rows.is_empty() {
            warn!("No features on {chr}");
        }

        let samples = self.samples.select_rows(&rows);
        let reference = self.reference.select_rows(&rows);
        let (samples, reference) = match (self.config.assay, self.config.input_scale) {
            (AssayKind::Array, ValueScale::Beta) => {
                (samples.map_values(flogit), reference.map_values(flogit))
            },
            _ => (samples, reference),
        };

        let bins = self.binner.bin_features(
            lengths,
            &self.config.genome,
            chr,
            samples.features(),
        )?;
        let feature_prior =
            global_means_by_index(&reference, self.prior_columns.as_deref())?;
        let summary = summarize_bins(
            self.config.assay,
            &bins,
            samples.values(),
            feature_prior.view(),
        )?;
        let shrunk = shrink_matrix(
            summary.values.view(),
            summary.prior.view(),
            self.spread_columns.as_deref(),
        )?;

        let BinRows {
            bins,
            prior,
            values,
            coefficients,
        } = filter_zero_prior(BinRows {
            bins,
            prior: summary.prior,
            values: shrunk.values,
            coefficients: shrunk.coefficients,
        })?;

        debug!(
            "{chr}: {} features -> {} bins in {:.2?}",
            rows.len(),
            bins.len(),
            start.elapsed()
        );
        Ok(ShrunkenBins {
            chr: SeqName::from(chr),
            bins,
            prior,
            values,
            coefficients,
            sample_names: self.samples.sample_names().to_vec(),
        })
    }

    /// Runs [`Shrinker::shrink_chromosome`] for every chromosome of the
    /// sample set on [`THREAD_POOL`].
    ///
    /// Results come back in chromosome order, one per chromosome; a failed
    /// chromosome does not stop the others.
    pub fn shrink_genome<L: ChromLengths + Sync + ?Sized>(
        &self,
        lengths: &L,
    ) -> Vec<(SeqName, Result<ShrunkenBins>)> {
        let chromosomes = self.chromosomes();
        let start = Instant::now();
        let results: Vec<_> = THREAD_POOL.install(|| {
            chromosomes
                .par_iter()
                .map(|chr| (chr.clone(), self.shrink_chromosome(lengths, chr)))
                .collect()
        });
        info!(
            "Processed {} chromosomes in {:.2?} ({} failed)",
            results.len(),
            start.elapsed(),
            results.iter().filter(|(_, res)| res.is_err()).count()
        );
        results
    }
}

/// Shrinks the features of one chromosome. Shorthand for
/// [`Shrinker::try_new`] followed by [`Shrinker::shrink_chromosome`].
pub fn shrink_bins<L: ChromLengths + ?Sized>(
    samples: &SampleSet,
    reference: Option<&ReferenceSet>,
    chr: &str,
    config: ShrinkConfig,
    lengths: &L,
) -> Result<ShrunkenBins> {
    Shrinker::try_new(samples, reference, config)?.shrink_chromosome(lengths, chr)
}

fn is_count(v: ValueType) -> bool {
    v >= 0.0
}

fn is_beta(v: ValueType) -> bool {
    (0.0..=1.0).contains(&v)
}

fn check_value_range(
    set: &SampleSet,
    assay: AssayKind,
    scale: ValueScale,
) -> Result<()> {
    let (valid, expected) = match (assay, scale) {
        (AssayKind::Atac, ValueScale::Raw) => {
            (is_count as fn(ValueType) -> bool, "non-negative counts")
        },
        (AssayKind::Array, ValueScale::Beta) => {
            (is_beta as fn(ValueType) -> bool, "beta values in [0, 1]")
        },
        (AssayKind::Array | AssayKind::Bisulfite, ValueScale::Raw) => return Ok(()),
        (AssayKind::Atac | AssayKind::Bisulfite, ValueScale::Beta) => {
            return Err(CompartmapError::input(format!(
                "beta input scale only applies to array data, not {assay}"
            )));
        },
    };
    match set.values().iter().find(|&&v| !valid(v)) {
        Some(v) => {
            Err(CompartmapError::input(format!(
                "{assay} input must be {expected}, found {v}"
            )))
        },
        None => Ok(()),
    }
}
