/// Finite-difference derivative of `values` with respect to `positions`.
///
/// Second-order central differences on (possibly uneven) spacing at
/// interior points, first-order one-sided differences at both ends.
/// A single sample has no defined slope and yields NaN.
pub fn gradient(values: &[f64], positions: &[f64]) -> Vec<f64> {
    assert_eq!(values.len(), positions.len(), "values and positions differ in length");

    let n = values.len();
    match n {
        0 => return vec![],
        1 => return vec![f64::NAN],
        _ => {}
    }

    let f = values;
    let x = positions;
    let mut out = vec![0.0; n];

    out[0] = (f[1] - f[0]) / (x[1] - x[0]);
    out[n - 1] = (f[n - 1] - f[n - 2]) / (x[n - 1] - x[n - 2]);

    for i in 1..n - 1 {
        let h1 = x[i] - x[i - 1];
        let h2 = x[i + 1] - x[i];
        let a = -h2 / (h1 * (h1 + h2));
        let b = (h2 - h1) / (h1 * h2);
        let c = h1 / (h2 * (h1 + h2));
        out[i] = a * f[i - 1] + b * f[i] + c * f[i + 1];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_data_has_constant_slope() {
        let x = [1.0, 1.5, 2.5, 4.0];
        let f: Vec<f64> = x.iter().map(|v| 3.0 * v - 2.0).collect();
        for g in gradient(&f, &x) {
            assert!((g - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn quadratic_exact_in_interior_on_uneven_grid() {
        let x = [0.0, 1.0, 3.0, 4.0];
        let f: Vec<f64> = x.iter().map(|v| v * v).collect();
        let g = gradient(&f, &x);
        assert!((g[1] - 2.0).abs() < 1e-12);
        assert!((g[2] - 6.0).abs() < 1e-12);
        // one-sided ends
        assert!((g[0] - 1.0).abs() < 1e-12);
        assert!((g[3] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn two_points_share_one_slope() {
        assert_eq!(gradient(&[10.0, 14.0], &[2.0, 4.0]), vec![2.0, 2.0]);
    }

    #[test]
    fn degenerate_sizes() {
        assert!(gradient(&[], &[]).is_empty());
        let g = gradient(&[5.0], &[1.0]);
        assert_eq!(g.len(), 1);
        assert!(g[0].is_nan());
    }
}
