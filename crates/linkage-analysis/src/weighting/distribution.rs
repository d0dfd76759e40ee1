//! Summary statistics over weight distributions.

use statrs::statistics::Statistics;

/// `mean + k · stdev` (population) of `values`, `None` when empty.
pub fn mean_plus_k_stddev(values: &[f64], k: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.mean();
    let stddev = if values.len() > 1 {
        values.population_std_dev()
    } else {
        0.0
    };
    let threshold = mean + k * stddev;
    threshold.is_finite().then_some(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_only_with_zero_k() {
        let t = mean_plus_k_stddev(&[1.0, 2.0, 3.0], 0.0).unwrap();
        assert!((t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_population_stddev() {
        // mean 5, population stdev 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let t = mean_plus_k_stddev(&values, 1.0).unwrap();
        assert!((t - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_has_no_threshold() {
        assert_eq!(mean_plus_k_stddev(&[], 1.0), None);
    }
}
