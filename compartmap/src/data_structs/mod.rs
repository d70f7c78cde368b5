//! Core data structures of the crate.
//!
//! - [`coords`]: genomic coordinates ([`Contig`](coords::Contig)), used both
//!   for input features and for output bins.
//! - [`SampleSet`] / [`ReferenceSet`]: dense, imputed feature × sample
//!   matrices with per-feature coordinates.
//! - [`AssayKind`] and [`ValueScale`]: closed enumerations selecting the
//!   per-bin summary function and the scale of the raw values.
//! - [`typedef`]: aliases for positions, values and sequence names.

pub mod coords;
mod enums;
mod sample_set;
pub mod typedef;


pub use enums::{
    AssayKind,
    ValueScale,
};
pub use sample_set::{
    ReferenceSet,
    SampleSet,
};
