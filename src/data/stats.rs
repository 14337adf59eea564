//! Descriptive statistics over the non-missing values of one column.
//!
//! Callers filter out missing cells beforehand. Empty input yields `None`
//! rather than NaN.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; the average of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() as f64 - 1.0)).sqrt())
}

/// Round to `decimals` places, ties to even on the scaled value.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Quantile `q` in [0, 1] of sorted values, interpolating linearly between
/// closest ranks.
fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

// ---------------------------------------------------------------------------
// Box plot summary
// ---------------------------------------------------------------------------

/// Five-number summary drawn by a box plot. Whiskers reach the most extreme
/// observations within 1.5 IQR of the box; everything past them is an outlier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Values outside the fences, ascending.
    pub outliers: Vec<f64>,
    pub count: usize,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<BoxStats> {
        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= lo_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= hi_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lo_fence || v > hi_fence)
            .collect();

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
            count: sorted.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_statistics() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(sample_std(&[]), None);
        assert_eq!(BoxStats::from_values(&[]), None);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn std_needs_two_values() {
        assert_eq!(sample_std(&[5.0]), None);
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(0.375, 2), 0.38);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(70.71067811865476, 2), 70.71);
        assert!(round_half_even(f64::NAN, 2).is_nan());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = sorted(&[4.0, 2.0, 3.0, 1.0]);
        assert_eq!(quantile_sorted(&v, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&v, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&v, 1.0), Some(4.0));
    }

    #[test]
    fn whiskers_stop_at_fences() {
        let b = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert_eq!(b.count, 6);
    }

    #[test]
    fn outliers_on_both_sides() {
        let b = BoxStats::from_values(&[-50.0, 10.0, 11.0, 12.0, 13.0, 14.0, 90.0, 80.0]).unwrap();
        assert_eq!(b.outliers, vec![-50.0, 80.0, 90.0]);
        assert_eq!(b.lower_whisker, 10.0);
        assert_eq!(b.upper_whisker, 14.0);

        let tight = BoxStats::from_values(&[1.0, 2.0, 3.0]).unwrap();
        assert!(tight.outliers.is_empty());
    }
}
