use hashbrown::HashSet;
use log::debug;
use ndarray::{
    Array1,
    Axis,
};

use crate::data_structs::typedef::ValueType;
use crate::data_structs::ReferenceSet;
use crate::error::{
    CompartmapError,
    Result,
};

/// Normalizes a target list.
///
/// An empty list means "no targets". A single target is rejected since a
/// one-sample spread is undefined. Duplicated names are rejected.
pub fn resolve_targets(targets: Option<&[String]>) -> Result<Option<&[String]>> {
    match targets {
        None | Some([]) => Ok(None),
        Some([single]) => Err(CompartmapError::InsufficientTargets(single.clone())),
        Some(targets) => {
            let mut seen = HashSet::with_capacity(targets.len());
            if let Some(dup) = targets.iter().find(|t| !seen.insert(t.as_str())) {
                return Err(CompartmapError::input(format!(
                    "target '{dup}' is listed more than once"
                )));
            }
            Ok(Some(targets))
        },
    }
}

/// Per-feature reference value: the mean across all columns of `reference`,
/// or across the named `targets` only.
///
/// # Errors
///
/// * [`CompartmapError::InsufficientTargets`] if exactly one target is given.
/// * [`CompartmapError::InputType`] if a target is not a column of
///   `reference` or is listed twice.
pub fn global_means(
    reference: &ReferenceSet,
    targets: Option<&[String]>,
) -> Result<Array1<ValueType>> {
    let columns = match resolve_targets(targets)? {
        Some(targets) => Some(reference.column_indices(targets)?),
        None => None,
    };
    global_means_by_index(reference, columns.as_deref())
}

/// Same as [`global_means`] with targets already resolved to column indices.
pub(crate) fn global_means_by_index(
    reference: &ReferenceSet,
    columns: Option<&[usize]>,
) -> Result<Array1<ValueType>> {
    let means = match columns {
        Some(columns) => {
            reference
                .values()
                .select(Axis(1), columns)
                .mean_axis(Axis(1))
        },
        None => reference.values().mean_axis(Axis(1)),
    };
    let means = means
        .ok_or_else(|| CompartmapError::input("reference set has no columns to average"))?;

    debug!(
        "Computed global means for {} features over {} reference samples",
        means.len(),
        columns.map_or(reference.n_samples(), <[usize]>::len)
    );
    Ok(means)
}
