//! Small numeric building blocks shared by the statistics modules.
//!
//! Everything here works on plain `f64` slices and never panics: empty input
//! and zero variance produce defined zero results instead of NaN.

/// Spread below this fraction of the data's magnitude is rounding noise.
const RELATIVE_SPREAD_TOLERANCE: f64 = 1e-12;

/// True when `spread` is zero or indistinguishable from rounding error on
/// values centred at `centre`. Scale-free, so micro- and mega-unit data behave
/// the same.
pub fn is_degenerate_spread(spread: f64, centre: f64) -> bool {
    spread <= RELATIVE_SPREAD_TOLERANCE * centre.abs()
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n, not n − 1).
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Nearest-rank percentile of an ascending, non-empty slice.
///
/// The index is `ceil(p/100 · n) − 1`, clamped into the slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p / 100.0 * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

/// Pearson correlation coefficient of two equally long slices.
///
/// Returns 0 when either side has no variance or fewer than two points.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = mean(xs);
    let my = mean(ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let nf = n as f64;
    if is_degenerate_spread((sxx / nf).sqrt(), mx) || is_degenerate_spread((syy / nf).sqrt(), my) {
        return 0.0;
    }
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// Result of an ordinary least-squares fit `y = slope · x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Simple linear regression. `None` when x has no variance or fewer than two points.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = mean(xs);
    let my = mean(ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let nf = n as f64;
    if is_degenerate_spread((sxx / nf).sqrt(), mx) {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let r_squared = if is_degenerate_spread((syy / nf).sqrt(), my) {
        0.0
    } else {
        ((sxy * sxy) / (sxx * syy)).clamp(0.0, 1.0)
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Standard normal CDF, Abramowitz & Stegun 26.2.17 (|error| < 7.5e-8).
pub fn normal_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.2316419 * x.abs());
    let density = 0.3989422804014327 * (-x * x / 2.0).exp();
    let tail = density
        * t
        * (0.319381530
            + t * (-0.356563782 + t * (1.781477937 + t * (-1.821255978 + t * 1.330274429))));
    if x >= 0.0 { 1.0 - tail } else { tail }
}

/// Approximate Student-t CDF.
///
/// For more than 30 degrees of freedom the normal CDF is used directly. Below
/// that, t is mapped onto an equivalent normal deviate with the closed-form
/// transform `z = (8ν+1)/(8ν+3) · sqrt(ν·ln(1 + t²/ν))`, which keeps the heavy
/// tails and stays unbounded as |t| grows.
pub fn student_t_cdf(t: f64, df: f64) -> f64 {
    if df > 30.0 {
        return normal_cdf(t);
    }
    let df = df.max(1.0);
    let magnitude = (8.0 * df + 1.0) / (8.0 * df + 3.0) * (df * (t * t / df).ln_1p()).sqrt();
    normal_cdf(magnitude.copysign(t))
}

/// Two-sided p-value for a correlation coefficient `r` estimated from `n` pairs.
///
/// Uses `t = r·sqrt((n−2)/(1−r²))` and `p = 2·(1 − T(|t|, n−2))`. Fewer than
/// three pairs carry no evidence, so the p-value is 1.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 || !r.is_finite() {
        return 1.0;
    }
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        // A perfect fit: t is unbounded.
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / denom).sqrt();
    (2.0 * (1.0 - student_t_cdf(t.abs(), df))).clamp(0.0, 1.0)
}

/// Signed z-score; 0 when the spread is degenerate.
pub fn z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
    if is_degenerate_spread(std_dev, mean) {
        return 0.0;
    }
    (value - mean) / std_dev
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mean_and_std_dev_of_simple_series() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        let m = mean(&values);
        assert_eq!(m, 30.0);
        assert_abs_diff_eq!(population_std_dev(&values, m), 200f64.sqrt(), epsilon = 1e-12);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn nearest_rank_percentiles() {
        let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&sorted, 50.0), 30.0);
        assert_eq!(percentile(&sorted, 25.0), 20.0);
        assert_eq!(percentile(&sorted, 75.0), 40.0);
        assert_eq!(percentile(&sorted, 95.0), 50.0);
        assert_eq!(percentile(&sorted, 0.0), 10.0);
        assert_eq!(percentile(&[7.0], 95.0), 7.0);
    }

    #[test]
    fn pearson_of_identical_and_inverted_series() {
        let xs = [1.0, 2.0, 4.0, 8.0, 16.0];
        let inverted: Vec<f64> = xs.iter().map(|x| -x).collect();
        assert_abs_diff_eq!(pearson(&xs, &xs), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pearson(&xs, &inverted), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn pearson_with_constant_series_is_zero() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn regression_recovers_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let fit = linear_regression(&xs, &ys).unwrap();
        assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-12);
        assert!(linear_regression(&[1.0, 1.0], &[2.0, 3.0]).is_none());
    }

    #[test]
    fn normal_cdf_reference_points() {
        assert_abs_diff_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(normal_cdf(1.96), 0.975, epsilon = 1e-4);
        assert_abs_diff_eq!(normal_cdf(-1.96), 0.025, epsilon = 1e-4);
    }

    #[test]
    fn student_t_switches_to_normal_above_thirty_df() {
        assert_eq!(student_t_cdf(1.5, 31.0), normal_cdf(1.5));
        // Heavier tails for few degrees of freedom.
        assert!(student_t_cdf(2.0, 5.0) < normal_cdf(2.0));
        assert_abs_diff_eq!(student_t_cdf(2.0, 5.0), 0.949, epsilon = 2e-3);
        assert_abs_diff_eq!(student_t_cdf(-1.0, 1.0), 0.25, epsilon = 5e-3);
        assert_abs_diff_eq!(student_t_cdf(0.0, 4.0), 0.5, epsilon = 1e-7);
    }

    #[test]
    fn p_value_edges() {
        assert_eq!(correlation_p_value(0.9, 2), 1.0);
        assert_eq!(correlation_p_value(1.0, 10), 0.0);
        assert!(correlation_p_value(0.0, 50) > 0.99);
        assert!(correlation_p_value(0.8, 40) < 0.001);
    }

    #[test]
    fn tiny_magnitudes_keep_their_correlation() {
        let xs = [1e-9, 2e-9, 3e-9, 4e-9];
        let ys = [2e-9, 4e-9, 6e-9, 8e-9];
        assert_abs_diff_eq!(pearson(&xs, &ys), 1.0, epsilon = 1e-9);
        let fit = linear_regression(&xs, &ys).unwrap();
        assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(z_score(3e-17, 2e-17, 1e-17), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rounding_noise_counts_as_no_spread() {
        let constant = [0.1, 0.1, 0.1];
        let m = mean(&constant);
        let sd = population_std_dev(&constant, m);
        assert!(is_degenerate_spread(sd, m));
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &constant), 0.0);
        assert!(is_degenerate_spread(0.0, 0.0));
        assert!(!is_degenerate_spread(1e-20, 0.0));
    }

    #[test]
    fn z_score_handles_zero_spread() {
        assert_abs_diff_eq!(z_score(30.0, 20.0, 2.0), 5.0, epsilon = 1e-12);
        assert_eq!(z_score(30.0, 20.0, 0.0), 0.0);
    }
}
