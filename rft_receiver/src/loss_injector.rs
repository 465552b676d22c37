/// Samples a uniform random number in `[0,1)` and reports whether the
/// incoming datagram should be dropped (spec.md §4.5). Applied before any
/// checksum validation.
pub fn should_drop(loss_prob: f64) -> bool {
    rand::random::<f64>() < loss_prob
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_drops_at_zero_probability() {
        for _ in 0..1000 {
            assert!(!should_drop(0.0));
        }
    }

    #[test]
    fn always_drops_at_probability_one() {
        for _ in 0..1000 {
            assert!(should_drop(1.0));
        }
    }
}
