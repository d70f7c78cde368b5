use itertools::Itertools;
use log::debug;
use ndarray::{
    Array1,
    Array2,
    ArrayView1,
    ArrayView2,
};
use statrs::statistics::{
    Data,
    OrderStatistics,
    Statistics,
};

use super::binning::GenomicBin;
use crate::data_structs::typedef::ValueType;
use crate::data_structs::AssayKind;
use crate::error::{
    CompartmapError,
    Result,
};

impl AssayKind {
    /// Function reducing the values of the features in one bin to a single
    /// scalar.
    pub fn summary_fn(&self) -> fn(&[ValueType]) -> ValueType {
        match self {
            AssayKind::Atac => atac_summary,
            AssayKind::Array => median_summary,
            AssayKind::Bisulfite => mean_summary,
        }
    }

    pub fn summarize(
        &self,
        values: &[ValueType],
    ) -> ValueType {
        (self.summary_fn())(values)
    }
}

/// `sqrt(mean) * n`: rescales depth-like counts by window occupancy.
fn atac_summary(values: &[ValueType]) -> ValueType {
    values.iter().mean().sqrt() * values.len() as ValueType
}

fn median_summary(values: &[ValueType]) -> ValueType {
    Data::new(values.to_vec()).percentile(50)
}

fn mean_summary(values: &[ValueType]) -> ValueType {
    values.iter().mean()
}

/// Per-bin summaries of every sample and of the prior.
#[derive(Debug, Clone)]
pub struct BinSummary {
    /// Bin × sample.
    pub values: Array2<ValueType>,
    /// One prior value per bin.
    pub prior:  Array1<ValueType>,
}

/// Summarizes every sample column and the per-feature prior over each bin
/// with the summary function of `assay`.
///
/// The prior goes through the same function as the samples, so both end up
/// on the same scale.
///
/// # Errors
///
/// [`CompartmapError::InternalConsistency`] if a bin has no features or a
/// summary is not finite. [`CompartmapError::InputType`] if `values` and
/// `feature_prior` disagree on the number of features, or a bin references a
/// feature row that does not exist.
pub fn summarize_bins(
    assay: AssayKind,
    bins: &[GenomicBin],
    values: ArrayView2<ValueType>,
    feature_prior: ArrayView1<ValueType>,
) -> Result<BinSummary> {
    if values.nrows() != feature_prior.len() {
        return Err(CompartmapError::input(format!(
            "{} feature rows but {} prior values",
            values.nrows(),
            feature_prior.len()
        )));
    }
    if let Some(bin) = bins
        .iter()
        .find(|bin| bin.features().iter().any(|&f| f >= values.nrows()))
    {
        return Err(CompartmapError::input(format!(
            "bin {} references features beyond the {} value rows",
            bin.contig(),
            values.nrows()
        )));
    }
    let summary_fn = assay.summary_fn();
    let n_samples = values.ncols();

    let mut out = Array2::<ValueType>::zeros((bins.len(), n_samples));
    let mut prior = Array1::<ValueType>::zeros(bins.len());
    let mut buffer = Vec::new();

    for (bin_idx, bin) in bins.iter().enumerate() {
        if bin.features().is_empty() {
            return Err(CompartmapError::InternalConsistency(format!(
                "bin {} has no features",
                bin.contig()
            )));
        }

        for sample_idx in 0..n_samples {
            buffer.clear();
            buffer.extend(bin.features().iter().map(|&f| values[[f, sample_idx]]));
            out[[bin_idx, sample_idx]] = checked(summary_fn(&buffer), bin)?;
        }

        buffer.clear();
        buffer.extend(bin.features().iter().map(|&f| feature_prior[f]));
        prior[bin_idx] = checked(summary_fn(&buffer), bin)?;
    }

    debug!(
        "Summarized {} bins x {} samples with {} summary (features per bin: {})",
        bins.len(),
        n_samples,
        assay,
        bins.iter().map(GenomicBin::n_features).minmax().into_option().map_or(
            "n/a".to_string(),
            |(min, max)| format!("{min}..={max}")
        )
    );

    Ok(BinSummary { values: out, prior })
}

fn checked(
    value: ValueType,
    bin: &GenomicBin,
) -> Result<ValueType> {
    if value.is_finite() {
        Ok(value)
    }
    else {
        Err(CompartmapError::InternalConsistency(format!(
            "bin {} produced a non-finite summary ({value})",
            bin.contig()
        )))
    }
}
