//! Data quality score

use feature_frame::Frame;

/// Share of present cells as a percentage, rounded to two decimals.
///
/// An empty frame scores 100.0; a frame with any missing cell never does.
pub fn data_quality_score(frame: &Frame) -> f64 {
    let total = frame.cell_count();
    let missing = frame.missing_count();
    if total == 0 || missing == 0 {
        return 100.0;
    }
    let score = 100.0 * (total - missing) as f64 / total as f64;
    ((score * 100.0).round() / 100.0).min(99.99)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_frame::Value;
    use proptest::prelude::*;

    #[test]
    fn test_one_missing_of_six() {
        let frame = Frame::from_rows(
            &["a", "b", "c"],
            vec![
                vec![Value::Int(1), Value::Null, Value::Int(3)],
                vec![Value::Int(4), Value::Int(5), Value::Int(6)],
            ],
        )
        .unwrap();
        assert_eq!(data_quality_score(&frame), 83.33);
    }

    #[test]
    fn test_complete_and_empty_frames() {
        assert_eq!(data_quality_score(&Frame::default()), 100.0);
        let frame = Frame::from_rows(&["a"], vec![vec![Value::Int(1)]]).unwrap();
        assert_eq!(data_quality_score(&frame), 100.0);
    }

    #[test]
    fn test_single_missing_in_large_frame_not_perfect() {
        let mut rows: Vec<Vec<Value>> = (0..100_000).map(|i| vec![Value::Int(i)]).collect();
        rows[0][0] = Value::Null;
        let frame = Frame::from_rows(&["a"], rows).unwrap();
        assert_eq!(data_quality_score(&frame), 99.99);
    }

    proptest! {
        #[test]
        fn prop_score_in_range(cells in prop::collection::vec(prop::option::of(0i64..10), 1..200)) {
            let missing = cells.iter().filter(|c| c.is_none()).count();
            let rows = cells.into_iter().map(|c| vec![Value::from(c)]).collect();
            let frame = Frame::from_rows(&["a"], rows).unwrap();
            let score = data_quality_score(&frame);
            prop_assert!((0.0..=100.0).contains(&score));
            prop_assert_eq!(score == 100.0, missing == 0);
        }

        #[test]
        fn prop_score_matches_completeness(
            (rows, columns, mask) in (1usize..20, 1usize..8).prop_flat_map(|(r, c)| {
                (Just(r), Just(c), prop::collection::vec(any::<bool>(), r * c))
            })
        ) {
            let header: Vec<String> = (0..columns).map(|c| format!("c{}", c)).collect();
            let header: Vec<&str> = header.iter().map(String::as_str).collect();
            let cells = (0..rows)
                .map(|r| {
                    (0..columns)
                        .map(|c| if mask[r * columns + c] { Value::Null } else { Value::Int(1) })
                        .collect()
                })
                .collect();
            let frame = Frame::from_rows(&header, cells).unwrap();

            let total = rows * columns;
            let missing = mask.iter().filter(|m| **m).count();
            let present = (total - missing) as f64;
            let mut expected = (100.0 * present / total as f64 * 100.0).round() / 100.0;
            if missing > 0 {
                expected = expected.min(99.99);
            }
            prop_assert_eq!(frame.missing_count(), missing);
            prop_assert!((data_quality_score(&frame) - expected).abs() < 1e-9);
        }
    }
}
