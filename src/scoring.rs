/*
Skydash
*/

/// Dynamic score from remaining level time.
///
/// Piecewise-linear over four quartiles of the level duration, each quartile
/// covering a 25-point band. Finishing in the first quarter of the level is
/// worth 76..=100, the second 51..=75, the third 26..=50, the last 1..=25.
/// Inclusive at the lower edge of each higher band.
pub fn dynamic_score(remaining: f32, total: f32) -> i32 {
    let quarter = total * 0.25;

    let first_quarter = total * 0.75;
    let second_quarter = total * 0.5;
    let third_quarter = quarter;

    if remaining >= first_quarter {
        (76.0 + (remaining - first_quarter) / quarter * 24.0).floor() as i32
    } else if remaining >= second_quarter {
        (51.0 + (remaining - second_quarter) / quarter * 24.0).floor() as i32
    } else if remaining >= third_quarter {
        (26.0 + (remaining - third_quarter) / quarter * 24.0).floor() as i32
    } else {
        (1.0 + remaining / quarter * 24.0).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(dynamic_score(100.0, 100.0), 100);
        assert_eq!(dynamic_score(75.0, 100.0), 76);
        assert_eq!(dynamic_score(50.0, 100.0), 51);
        assert_eq!(dynamic_score(25.0, 100.0), 26);
        assert_eq!(dynamic_score(0.0, 100.0), 1);
    }

    #[test]
    fn test_monotone_and_bounded() {
        let total = 90.0;
        let mut prev = 0;
        for i in 0..=900 {
            let remaining = i as f32 * 0.1;
            let s = dynamic_score(remaining, total);
            assert!(s >= prev, "score decreased at remaining={remaining}");
            if remaining > 0.0 {
                assert!((1..=100).contains(&s), "score {s} out of range");
            }
            prev = s;
        }
    }

    #[test]
    fn test_scales_with_duration() {
        // Band edges hold for any duration, not just 100s.
        assert_eq!(dynamic_score(45.0, 60.0), 76);
        assert_eq!(dynamic_score(30.0, 60.0), 51);
        assert_eq!(dynamic_score(15.0, 60.0), 26);
    }
}
