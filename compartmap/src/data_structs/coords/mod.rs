//! Genomic coordinates.
//!
//! [`Contig`] is the only coordinate type in the crate. It describes both the
//! input features (array CpG sites, loci, read windows) and the output bins.

mod contig;

pub use contig::Contig;
