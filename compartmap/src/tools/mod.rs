//! The binning and shrinkage pipeline.
//!
//! Stages, leaves first:
//!
//! - [`binning`]: [`GenomicBinner`] tiles a chromosome into fixed-width
//!   windows and assigns every feature to the window covering its start.
//! - [`summary`]: [`summarize_bins`] reduces each bin to one value per
//!   sample, and one prior value, with the summary function of the
//!   [`AssayKind`](crate::data_structs::AssayKind).
//! - [`global_mean`]: [`global_means`] computes the per-feature reference
//!   values (group mean, or mean of the target samples) that become the
//!   prior once binned.
//! - [`shrinkage`]: [`shrink_matrix`] pulls every sample's bin value toward
//!   the bin prior, `m + C * (x - m)`, with `C` the per-bin sample standard
//!   deviation.
//! - [`filter`]: [`filter_zero_prior`] drops bins whose prior is exactly
//!   zero, keeping all outputs row-aligned.
//!
//! [`Shrinker`] chains the stages for one chromosome
//! ([`Shrinker::shrink_chromosome`]) or for all of them in parallel
//! ([`Shrinker::shrink_genome`]).

pub mod binning;
mod config;
pub mod filter;
pub mod global_mean;
mod pipeline;
pub mod shrinkage;
pub mod summary;

#[cfg(test)]
mod tests;

pub use binning::{
    GenomicBin,
    GenomicBinner,
    DEFAULT_RESOLUTION,
};
pub use config::ShrinkConfig;
pub use filter::{
    filter_zero_prior,
    BinRows,
};
pub use global_mean::{
    global_means,
    resolve_targets,
};
pub use pipeline::{
    shrink_bins,
    ShrunkenBins,
    Shrinker,
};
pub use shrinkage::{
    shrink_matrix,
    shrink_values,
    shrinkage_coefficient,
    ShrinkageResult,
};
pub use summary::{
    summarize_bins,
    BinSummary,
};
