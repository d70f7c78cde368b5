use std::collections::BTreeMap;

use log::{
    debug,
    trace,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::coords::Contig;
use crate::data_structs::typedef::{
    PosType,
    SeqName,
};
use crate::error::{
    CompartmapError,
    Result,
};
use crate::genome::ChromLengths;

/// Default bin width in bases.
pub const DEFAULT_RESOLUTION: PosType = 1_000_000;

/// A genomic window together with the features whose start falls inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicBin {
    contig:   Contig,
    features: Vec<usize>,
}

impl GenomicBin {
    pub(crate) fn new(
        contig: Contig,
        features: Vec<usize>,
    ) -> Self {
        Self { contig, features }
    }

    pub fn contig(&self) -> &Contig {
        &self.contig
    }

    /// Row indices of the member features, ascending.
    pub fn features(&self) -> &[usize] {
        &self.features
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}

/// Tiles a chromosome into fixed-width windows and assigns features to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomicBinner {
    resolution: PosType,
}

impl Default for GenomicBinner {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl GenomicBinner {
    /// # Errors
    ///
    /// [`CompartmapError::InvalidResolution`] if `resolution <= 0`.
    pub fn try_new(resolution: i64) -> Result<Self> {
        if resolution <= 0 {
            return Err(CompartmapError::InvalidResolution(resolution));
        }
        Ok(Self {
            resolution: resolution as PosType,
        })
    }

    pub fn resolution(&self) -> PosType {
        self.resolution
    }

    /// Number of windows tiling a chromosome of `length` bases. The last
    /// window may extend past the chromosome end.
    pub fn n_tiles(
        &self,
        length: PosType,
    ) -> PosType {
        length.div_ceil(self.resolution)
    }

    /// Window covering `pos`.
    pub fn tile_of(
        &self,
        chr: &str,
        pos: PosType,
    ) -> Contig {
        let start = pos / self.resolution * self.resolution;
        Contig::new(
            SeqName::from(chr),
            start,
            start.saturating_add(self.resolution),
        )
    }

    /// Assigns every feature to the window covering its start coordinate and
    /// returns the non-empty windows in ascending order.
    ///
    /// Features must all lie on `chr` and start before the chromosome end.
    ///
    /// # Errors
    ///
    /// * [`CompartmapError::InvalidChromosome`] if `lengths` does not know
    ///   `chr` for `genome`.
    /// * [`CompartmapError::InputType`] if a feature is on another chromosome
    ///   or starts at or beyond the chromosome length.
    pub fn bin_features<L: ChromLengths + ?Sized>(
        &self,
        lengths: &L,
        genome: &str,
        chr: &str,
        features: &[Contig],
    ) -> Result<Vec<GenomicBin>> {
        let chr_length = lengths.length_of(genome, chr).ok_or_else(|| {
            CompartmapError::InvalidChromosome {
                genome: genome.to_string(),
                chr:    chr.to_string(),
            }
        })?;
        trace!(
            "{chr} ({genome}) has {chr_length} bases, {} tiles at resolution {}",
            self.n_tiles(chr_length),
            self.resolution
        );

        let mut tiles: BTreeMap<PosType, Vec<usize>> = BTreeMap::new();
        for (idx, feature) in features.iter().enumerate() {
            if feature.seqname().as_str() != chr {
                return Err(CompartmapError::input(format!(
                    "feature {feature} is not on chromosome {chr}"
                )));
            }
            if feature.start() >= chr_length {
                return Err(CompartmapError::input(format!(
                    "feature {feature} starts beyond the end of {chr} ({chr_length} bp in \
                     {genome})"
                )));
            }
            tiles
                .entry(feature.start() / self.resolution)
                .or_default()
                .push(idx);
        }

        let bins = tiles
            .into_iter()
            .map(|(tile, features)| {
                GenomicBin::new(self.tile_of(chr, tile * self.resolution), features)
            })
            .collect::<Vec<_>>();
        debug!(
            "Binned {} features on {chr} into {} non-empty bins",
            features.len(),
            bins.len()
        );
        Ok(bins)
    }
}
