/// Arithmetic mean of a series; 0.0 for an empty one.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation over the whole series, no windowing.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10.0, 15.0, 20.0, 15.0, 10.0]), 14.0);
        assert_eq!(mean(&[3.0]), 3.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_population_std_dev() {
        // variance of [10,15,20,15,10] around 14 is (16+1+36+1+16)/5 = 14
        let std = std_dev(&[10.0, 15.0, 20.0, 15.0, 10.0]);
        assert!((std - 14.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(std_dev(&[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }
}
