/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the unbiased sample variance (divides by n - 1).
/// Returns `None` for fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values);
    let sum_sq = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_sample_variance() {
        assert_eq!(sample_variance(&[]), None);
        assert_eq!(sample_variance(&[4.0]), None);
        assert_eq!(sample_variance(&[7.0, 7.0, 7.0]), Some(0.0));
        assert_eq!(sample_variance(&[11.0, 10.0]), Some(0.5));
        assert_eq!(sample_variance(&[2.0, 4.0, 6.0]), Some(4.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(9.5), 9.5);
        assert_eq!(round2(8.333333), 8.33);
        assert_eq!(round2(8.666666), 8.67);
    }
}
