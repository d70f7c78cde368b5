use crate::data_structs::typedef::ValueType;

/// Bound applied to beta values before the logit so that fully
/// (un)methylated sites map to finite M-values.
pub const LOGIT_BOUND: ValueType = 1e-6;

/// Bounded logit: beta value to M-value.
pub fn flogit(p: ValueType) -> ValueType {
    let p = p.clamp(LOGIT_BOUND, 1.0 - LOGIT_BOUND);
    (p / (1.0 - p)).ln()
}

/// Inverse of [`flogit`]: M-value to beta value.
pub fn fexpit(x: ValueType) -> ValueType {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_flogit_midpoint() {
        assert_eq!(flogit(0.5), 0.0);
    }

    #[test]
    fn test_flogit_is_bounded() {
        let hi = flogit(1.0);
        let lo = flogit(0.0);
        assert!(hi.is_finite() && lo.is_finite());
        assert_approx_eq!(hi, -lo, 1e-9);
        assert_approx_eq!(hi, ((1.0 - LOGIT_BOUND) / LOGIT_BOUND).ln(), 1e-9);
    }

    #[test]
    fn test_fexpit_inverts_flogit() {
        for p in [0.01, 0.2, 0.5, 0.73, 0.99] {
            assert_approx_eq!(fexpit(flogit(p)), p, 1e-12);
        }
    }
}
