use itertools::Itertools;
use log::debug;
use ndarray::{
    Array1,
    Array2,
    Axis,
};

use super::binning::GenomicBin;
use crate::data_structs::typedef::ValueType;
use crate::error::{
    CompartmapError,
    Result,
};

/// Bin-aligned outputs that are filtered together.
#[derive(Debug, Clone)]
pub struct BinRows {
    pub bins:         Vec<GenomicBin>,
    pub prior:        Array1<ValueType>,
    pub values:       Array2<ValueType>,
    pub coefficients: Array1<ValueType>,
}

impl BinRows {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Keeps only the rows at `keep`, in all outputs at once.
    fn select(
        self,
        keep: &[usize],
    ) -> Self {
        let mut bins = self.bins.into_iter().map(Some).collect_vec();
        Self {
            bins:         keep.iter().filter_map(|&i| bins[i].take()).collect(),
            prior:        self.prior.select(Axis(0), keep),
            values:       self.values.select(Axis(0), keep),
            coefficients: self.coefficients.select(Axis(0), keep),
        }
    }
}

/// Drops every bin whose prior is exactly zero.
///
/// A zero prior marks a bin without usable reference signal, typical of
/// sparse inputs. Such bins would corrupt downstream correlation analysis.
///
/// # Errors
///
/// [`CompartmapError::InputType`] if the prior, values or coefficients do not
/// have one row per bin.
pub fn filter_zero_prior(rows: BinRows) -> Result<BinRows> {
    let n_bins = rows.bins.len();
    for (what, len) in [
        ("prior values", rows.prior.len()),
        ("value rows", rows.values.nrows()),
        ("coefficients", rows.coefficients.len()),
    ] {
        if len != n_bins {
            return Err(CompartmapError::input(format!(
                "{n_bins} bins but {len} {what}"
            )));
        }
    }

    let keep = rows.prior.iter().positions(|&p| p != 0.0).collect_vec();
    let dropped = rows.len() - keep.len();
    if dropped == 0 {
        return Ok(rows);
    }

    debug!("Dropping {} of {} bins with zero prior", dropped, rows.len());
    Ok(rows.select(&keep))
}
