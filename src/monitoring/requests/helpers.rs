//! Helper functions for metrics calculations

use std::collections::HashMap;

/// Calculate percentile from sorted values
pub(super) fn calculate_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    if percentile >= 1.0 {
        return sorted_values.last().copied().unwrap_or(0.0);
    }

    let index = percentile * (sorted_values.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = (index.ceil() as usize).min(sorted_values.len() - 1);

    if lower == upper {
        sorted_values.get(lower).copied().unwrap_or(0.0)
    } else {
        let weight = index - lower as f64;
        let lower_val = sorted_values.get(lower).copied().unwrap_or(0.0);
        let upper_val = sorted_values.get(upper).copied().unwrap_or(0.0);
        lower_val * (1.0 - weight) + upper_val * weight
    }
}

/// Mean of a running sum, 0 when nothing was counted
pub(super) fn calculate_average(sum: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Bump a breakdown counter
pub(super) fn increment(counts: &mut HashMap<String, u64>, key: impl Into<String>) {
    *counts.entry(key.into()).or_insert(0) += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_percentile() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(calculate_percentile(&[], 0.95), 0.0);
        assert_eq!(calculate_percentile(&values, 1.0), 100.0);
        assert!((calculate_percentile(&values, 0.95) - 95.05).abs() < 1e-9);
        assert_eq!(calculate_percentile(&[42.0], 0.99), 42.0);
    }

    #[test]
    fn test_calculate_average() {
        assert_eq!(calculate_average(0, 0), 0.0);
        assert_eq!(calculate_average(30, 4), 7.5);
    }
}
