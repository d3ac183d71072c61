/// Round a number to a given decimal precision.
pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}

/// Index of the largest count, ties broken by the lowest index. Class
/// identifiers follow the first-encountered label ordering established at
/// dataset load time, so the lowest index is the first-encountered label.
pub fn majority_index(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, c) in counts.iter().enumerate().skip(1) {
        if *c > counts[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_round() {
        assert_eq!(precision_round(0.24674981, 4), 0.2467);
        assert_eq!(precision_round(1.0, 4), 1.0);
    }

    #[test]
    fn test_majority_index_first_wins_on_tie() {
        assert_eq!(majority_index(&[3, 1, 2]), 0);
        assert_eq!(majority_index(&[2, 5, 5]), 1);
        assert_eq!(majority_index(&[0, 0, 1]), 2);
    }
}
