use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::CompartmapError;

/// Assay the input signal comes from. Selects the per-bin summary function.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "console", derive(clap::ValueEnum))]
pub enum AssayKind {
    /// ATAC-seq counts, summarized as `sqrt(mean) * count`.
    Atac,
    /// Methylation array M-values, summarized as the median.
    #[default]
    Array,
    /// Bisulfite sequencing values, summarized as the mean.
    Bisulfite,
}

impl Display for AssayKind {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            AssayKind::Atac => write!(f, "atac"),
            AssayKind::Array => write!(f, "array"),
            AssayKind::Bisulfite => write!(f, "bisulfite"),
        }
    }
}

impl FromStr for AssayKind {
    type Err = CompartmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atac" => Ok(AssayKind::Atac),
            "array" => Ok(AssayKind::Array),
            "bisulfite" | "bs" => Ok(AssayKind::Bisulfite),
            other => Err(CompartmapError::input(format!("unknown assay '{other}'"))),
        }
    }
}

impl Serialize for AssayKind {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssayKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Scale of the input values.
///
/// `Raw` takes values as the assay delivers them: counts for ATAC,
/// M-values for arrays, methylation levels for bisulfite data. Array data
/// may instead be supplied as beta values, which are converted to M-values
/// once before the prior is computed.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "console", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ValueScale {
    #[default]
    Raw,
    Beta,
}

impl Display for ValueScale {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ValueScale::Raw => write!(f, "raw"),
            ValueScale::Beta => write!(f, "beta"),
        }
    }
}
