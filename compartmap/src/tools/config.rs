use std::io::Read;

use anyhow::Context as AnyhowContext;
use serde::{
    Deserialize,
    Serialize,
};

use super::binning::DEFAULT_RESOLUTION;
use crate::data_structs::{
    AssayKind,
    ValueScale,
};
use crate::with_field_fn;

/// Parameters of one shrinkage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkConfig {
    pub assay:       AssayKind,
    pub genome:      String,
    pub resolution:  i64,
    pub targets:     Option<Vec<String>>,
    pub input_scale: ValueScale,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            assay:       AssayKind::Array,
            genome:      "hg19".to_string(),
            resolution:  DEFAULT_RESOLUTION as i64,
            targets:     None,
            input_scale: ValueScale::Raw,
        }
    }
}

impl ShrinkConfig {
    with_field_fn!(assay, AssayKind);
    with_field_fn!(genome, String);
    with_field_fn!(resolution, i64);
    with_field_fn!(targets, Option<Vec<String>>);
    with_field_fn!(input_scale, ValueScale);

    pub fn new(
        assay: AssayKind,
        genome: &str,
        resolution: i64,
    ) -> Self {
        Self {
            assay,
            genome: genome.to_string(),
            resolution,
            ..Default::default()
        }
    }

    /// Reads a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        serde_json::from_reader(reader).context("Failed to parse shrinkage config")
    }

    pub fn targets_slice(&self) -> Option<&[String]> {
        self.targets.as_deref()
    }
}
