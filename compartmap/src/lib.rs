//! # compartmap
//!
//! `compartmap` condenses per-feature genomic signal (CpG methylation
//! levels, ATAC-seq counts) of several samples into fixed-width genomic
//! bins and stabilizes the binned values with empirical-Bayes style
//! shrinkage toward a per-bin prior. The shrunken bin × sample matrix is
//! the input of compartment inference (A/B compartments from correlation
//! structure), which is out of scope here.
//!
//! If you do not want to use compartmap as a crate, the `compartmap` binary
//! of the `compartmap-ci` package wraps the pipeline for TSV files.
//!
//! ## Pipeline
//!
//! For one chromosome:
//!
//! 1. Features are assigned to the window `[k * res, (k + 1) * res)` that
//!    covers their start ([`GenomicBinner`]).
//! 2. Each window is summarized per sample with the assay-specific function
//!    of [`AssayKind`]: `sqrt(mean) * n` for ATAC, median for arrays and
//!    mean for bisulfite sequencing.
//! 3. A prior is computed per feature as the mean of the reference samples
//!    (all of them, or only the named targets) and summarized per window
//!    with the same function.
//! 4. Every sample is shrunk toward the window prior,
//!    `m + C * (x - m)`, where `C` is the window's sample standard deviation
//!    across samples (across targets only, when given).
//! 5. Windows with a prior of exactly zero are dropped.
//!
//! Chromosomes are processed in parallel on a rayon pool. Its size can be
//! set with the `COMPARTMAP_NUM_THREADS` environment variable.
//!
//! ## Structure
//!
//! * [`data_structs`]: coordinates ([`Contig`]), the feature × sample
//!   matrices ([`SampleSet`], [`ReferenceSet`]) and the closed enumerations
//!   ([`AssayKind`], [`ValueScale`]).
//! * [`genome`]: chromosome length tables of the built-in assemblies and
//!   loaders for `chrom.sizes` and FASTA index files.
//! * [`tools`]: the pipeline stages and the [`Shrinker`] chaining them.
//! * [`utils`]: thread pool and value-scale transforms.
//! * [`error`]: the [`CompartmapError`] taxonomy.
//!
//! ## Usage
//!
//! ```no_run
//! use compartmap::prelude::*;
//! use ndarray::array;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let features = vec![
//!         Contig::new("chr1".into(), 500, 501),
//!         Contig::new("chr1".into(), 600_000, 600_001),
//!         Contig::new("chr1".into(), 1_500_000, 1_500_001),
//!     ];
//!     let samples = SampleSet::try_new(
//!         features,
//!         vec!["s1".to_string(), "s2".to_string()],
//!         array![[0.2, 0.4], [0.6, 0.2], [0.9, 0.7]],
//!     )?;
//!
//!     let config = ShrinkConfig::new(AssayKind::Bisulfite, "hg19", 1_000_000);
//!     let shrinker = Shrinker::try_new(&samples, None, config)?;
//!     for (chr, result) in shrinker.shrink_genome(&*GENOME_TABLES) {
//!         let bins = result?;
//!         println!("{chr}: {} bins", bins.n_bins());
//!     }
//!     Ok(())
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod data_structs;
pub mod error;
pub mod genome;
pub mod prelude;
pub mod tools;
pub mod utils;

#[allow(unused_imports)]
use prelude::*;
