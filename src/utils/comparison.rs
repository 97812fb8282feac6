use std::cmp::Ordering;

/// Safe comparison of floating point numbers, handling NaN values
pub fn safe_float_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Copy of `values` sorted ascending with NaN-safe ordering
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| safe_float_cmp(*a, *b));
    sorted
}

/// Smallest and largest finite value, if any
pub fn finite_range<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_float_cmp_normal_values() {
        assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
        assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
        assert_eq!(safe_float_cmp(1.0, 1.0), Ordering::Equal);
    }

    #[test]
    fn test_safe_float_cmp_nan_handling() {
        assert_eq!(safe_float_cmp(f64::NAN, 1.0), Ordering::Equal);
        assert_eq!(safe_float_cmp(1.0, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn test_sorted_values() {
        assert_eq!(sorted_values(&[3.0, 1.0, 2.0]), vec![1.0, 2.0, 3.0]);
        assert!(sorted_values(&[]).is_empty());
    }

    #[test]
    fn test_finite_range() {
        assert_eq!(finite_range([4.0, -2.0, f64::NAN, 9.5]), Some((-2.0, 9.5)));
        assert_eq!(finite_range([f64::INFINITY]), None);
        assert_eq!(finite_range(Vec::<f64>::new()), None);
    }
}
