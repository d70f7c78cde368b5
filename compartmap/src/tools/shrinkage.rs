use log::trace;
use ndarray::{
    Array1,
    Array2,
    ArrayView1,
    ArrayView2,
    Axis,
    Zip,
};
use statrs::statistics::Statistics;

use crate::data_structs::typedef::ValueType;
use crate::error::{
    CompartmapError,
    Result,
};

/// Shrinkage intensity of one bin: the sample standard deviation of the bin
/// summaries, over the `targets` columns only when given.
///
/// Returns `NaN` when fewer than two values are available.
///
/// # Errors
///
/// [`CompartmapError::InputType`] if a target index is out of range for `x`.
pub fn shrinkage_coefficient(
    x: ArrayView1<ValueType>,
    targets: Option<&[usize]>,
) -> Result<ValueType> {
    if let Some(targets) = targets {
        check_targets(targets, x.len())?;
    }
    Ok(spread(x, targets))
}

/// Targets must already be range-checked.
fn spread(
    x: ArrayView1<ValueType>,
    targets: Option<&[usize]>,
) -> ValueType {
    match targets {
        Some(targets) => targets.iter().map(|&t| x[t]).std_dev(),
        None => x.iter().std_dev(),
    }
}

fn check_targets(
    targets: &[usize],
    n_samples: usize,
) -> Result<()> {
    match targets.iter().find(|&&t| t >= n_samples) {
        Some(t) => {
            Err(CompartmapError::input(format!(
                "target column {t} is out of range for {n_samples} samples"
            )))
        },
        None => Ok(()),
    }
}

/// Shrinks every value of `x` toward `prior` with coefficient `coef`:
/// `prior + coef * (x_i - prior)`.
pub fn shrink_values(
    x: ArrayView1<ValueType>,
    prior: ValueType,
    coef: ValueType,
) -> Array1<ValueType> {
    // Convex-combination form keeps coef == 0 and coef == 1 exact.
    x.mapv(|xi| coef * xi + (1.0 - coef) * prior)
}

/// Result of shrinking a bin × sample matrix.
#[derive(Debug, Clone)]
pub struct ShrinkageResult {
    /// Bin × sample shrunken values, same column order as the input.
    pub values:       Array2<ValueType>,
    /// Coefficient used for each bin.
    pub coefficients: Array1<ValueType>,
}

/// Applies per-bin shrinkage to a bin × sample matrix.
///
/// Each row gets its own coefficient from its own cross-sample spread.
/// Every column is shrunk, also when the spread comes from `targets` only.
///
/// # Errors
///
/// [`CompartmapError::InputType`] if `prior` does not have one value per row
/// of `summaries` or a target index is out of range.
pub fn shrink_matrix(
    summaries: ArrayView2<ValueType>,
    prior: ArrayView1<ValueType>,
    targets: Option<&[usize]>,
) -> Result<ShrinkageResult> {
    if summaries.nrows() != prior.len() {
        return Err(CompartmapError::input(format!(
            "{} summary rows but {} prior values",
            summaries.nrows(),
            prior.len()
        )));
    }
    if let Some(targets) = targets {
        check_targets(targets, summaries.ncols())?;
    }

    let mut values = Array2::<ValueType>::zeros(summaries.raw_dim());
    let mut coefficients = Array1::<ValueType>::zeros(prior.len());

    Zip::from(values.axis_iter_mut(Axis(0)))
        .and(&mut coefficients)
        .and(summaries.axis_iter(Axis(0)))
        .and(&prior)
        .for_each(|mut out_row, coef, row, &m| {
            *coef = spread(row, targets);
            out_row.assign(&shrink_values(row, m, *coef));
        });

    trace!("Shrunk {} bins", prior.len());
    Ok(ShrinkageResult {
        values,
        coefficients,
    })
}
