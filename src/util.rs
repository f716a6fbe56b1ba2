/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```
/// # use linear_sarsa::assert_interval;
/// let value = 0.5;
/// assert_interval!(value, 0.0, 1.0);
/// ```
/// A value of `2.0` would panic with the message "Invalid value for \`value\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Index and value of the largest element
///
/// Ties go to the earliest element: a later value only wins if it is strictly greater.
/// Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, -0.2, 0.3]), Some((1, 0.7)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn argmax_first_seen_wins_ties() {
        assert_eq!(argmax(&[0.5, 0.5, 0.5, 0.5]), Some((0, 0.5)));
        assert_eq!(argmax(&[-1.0, 0.2, 0.2, 0.1]), Some((1, 0.2)));
    }

    #[test]
    #[should_panic(expected = "Invalid value for `gamma`")]
    fn assert_interval_panics() {
        let gamma = 1.5;
        assert_interval!(gamma, 0.0, 1.0);
    }
}
