//! Error taxonomy of the shrinkage pipeline.
//!
//! Every error is raised at the point of detection and no partial results
//! are returned. Callers that iterate over many chromosomes (see
//! [`crate::tools::Shrinker::shrink_genome`]) receive one [`Result`] per
//! chromosome and decide themselves whether a failure is fatal.

use thiserror::Error;

/// Errors raised by the binning and shrinkage pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompartmapError {
    /// Input matrix or its metadata failed a structural check (shape,
    /// missing or duplicated columns, non-finite values, unknown targets).
    #[error("input type error: {0}")]
    InputType(String),

    /// Chromosome is not known for the requested genome build.
    #[error("chromosome '{chr}' is not known for genome build '{genome}'")]
    InvalidChromosome { genome: String, chr: String },

    /// Bin width must be a positive number of bases.
    #[error("resolution must be a positive number of bases, got {0}")]
    InvalidResolution(i64),

    /// Targeted shrinkage with a single target. A one-sample spread is
    /// undefined.
    #[error(
        "targeted shrinkage needs at least two target samples, got only '{0}'"
    )]
    InsufficientTargets(String),

    /// A retained bin produced no usable summary. Indicates a defect.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

impl CompartmapError {
    pub(crate) fn input<S: Into<String>>(msg: S) -> Self {
        CompartmapError::InputType(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CompartmapError>;
