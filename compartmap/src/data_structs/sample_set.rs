use hashbrown::{
    HashMap,
    HashSet,
};
use itertools::Itertools;
use log::trace;
use ndarray::{
    Array2,
    ArrayView1,
    ArrayView2,
    Axis,
};

use super::coords::Contig;
use super::typedef::{
    SeqName,
    ValueType,
};
use crate::error::{
    CompartmapError,
    Result,
};

/// Dense feature × sample matrix with per-feature genomic coordinates.
///
/// Rows are features (array CpG sites, loci, read windows), columns are samples.
/// The matrix is expected to be fully imputed: every value must be finite.
#[derive(Debug, Clone)]
pub struct SampleSet {
    features:     Vec<Contig>,
    sample_names: Vec<String>,
    values:       Array2<ValueType>,
}

/// Sample set used only to derive the shrinkage prior. Must be row-aligned
/// with the [`SampleSet`] it is used with.
pub type ReferenceSet = SampleSet;

impl SampleSet {
    /// Creates a new sample set, checking its structure.
    ///
    /// # Errors
    ///
    /// [`CompartmapError::InputType`] if the matrix shape does not match the
    /// number of features and sample names, if sample names are duplicated
    /// or empty, or if any value is not finite.
    pub fn try_new(
        features: Vec<Contig>,
        sample_names: Vec<String>,
        values: Array2<ValueType>,
    ) -> Result<Self> {
        if values.nrows() != features.len() {
            return Err(CompartmapError::input(format!(
                "matrix has {} rows but {} feature coordinates were given",
                values.nrows(),
                features.len()
            )));
        }
        if values.ncols() != sample_names.len() {
            return Err(CompartmapError::input(format!(
                "matrix has {} columns but {} sample names were given",
                values.ncols(),
                sample_names.len()
            )));
        }
        if sample_names.is_empty() {
            return Err(CompartmapError::input("sample set has no columns"));
        }
        if let Some(empty) = sample_names.iter().position(String::is_empty) {
            return Err(CompartmapError::input(format!(
                "sample name at column {empty} is empty"
            )));
        }
        {
            let mut seen = HashSet::with_capacity(sample_names.len());
            if let Some(dup) = sample_names
                .iter()
                .map(String::as_str)
                .find(|name| !seen.insert(*name))
            {
                return Err(CompartmapError::input(format!(
                    "duplicated sample name '{dup}'"
                )));
            }
        }
        if let Some(((row, col), value)) = values
            .indexed_iter()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(CompartmapError::input(format!(
                "value {value} at feature {} / sample '{}' is not finite; \
                 missing values must be imputed upstream",
                features[row], sample_names[col]
            )));
        }

        trace!(
            "Created sample set with {} features and {} samples",
            features.len(),
            sample_names.len()
        );
        Ok(Self {
            features,
            sample_names,
            values,
        })
    }

    pub fn features(&self) -> &[Contig] {
        &self.features
    }

    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    /// Feature × sample values.
    pub fn values(&self) -> ArrayView2<'_, ValueType> {
        self.values.view()
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn n_samples(&self) -> usize {
        self.sample_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Values of one sample across all features.
    pub fn column(
        &self,
        idx: usize,
    ) -> ArrayView1<'_, ValueType> {
        self.values.column(idx)
    }

    pub fn column_index(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.sample_names.iter().position(|s| s == name)
    }

    /// Resolves column names to indices, failing on the first unknown name.
    pub fn column_indices<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<usize>> {
        let lookup: HashMap<&str, usize> = self
            .sample_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();
        names
            .iter()
            .map(|name| {
                lookup.get(name.as_ref()).copied().ok_or_else(|| {
                    CompartmapError::input(format!(
                        "sample '{}' is not a column of the sample set",
                        name.as_ref()
                    ))
                })
            })
            .collect()
    }

    /// Distinct chromosomes in order of first appearance.
    pub fn chromosomes(&self) -> Vec<SeqName> {
        self.features
            .iter()
            .map(|f| f.seqname().clone())
            .unique()
            .collect()
    }

    /// Row indices of the features located on `chr`.
    pub fn chromosome_rows(
        &self,
        chr: &str,
    ) -> Vec<usize> {
        self.features
            .iter()
            .positions(|f| f.seqname().as_str() == chr)
            .collect()
    }

    /// New sample set holding only the given rows, in the given order.
    pub fn select_rows(
        &self,
        rows: &[usize],
    ) -> SampleSet {
        SampleSet {
            features:     rows.iter().map(|&r| self.features[r].clone()).collect(),
            sample_names: self.sample_names.clone(),
            values:       self.values.select(Axis(0), rows),
        }
    }

    /// New sample set with `f` applied to every value.
    pub fn map_values<F>(
        &self,
        f: F,
    ) -> SampleSet
    where
        F: Fn(ValueType) -> ValueType, {
        SampleSet {
            features:     self.features.clone(),
            sample_names: self.sample_names.clone(),
            values:       self.values.mapv(f),
        }
    }

    /// Whether `other` describes exactly the same features in the same
    /// order.
    pub fn is_row_aligned(
        &self,
        other: &SampleSet,
    ) -> bool {
        self.features == other.features
    }
}
