use nalgebra::DMatrix;

use super::gradient::gradient;
use crate::config::{Config, Interpolation};
use crate::types::{CaseRecord, CaseTable};

// ---------------------------------------------------------------------------
// Gradient views
// ---------------------------------------------------------------------------

/// One gradient field, either pivoted onto the (Pc, O/F) grid or, when the
/// table has only one distinct Pc or O/F, left as a per-case sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientView {
    /// Rows follow `pcs`, columns follow `ofs`. Cells without a case are NaN.
    Grid {
        pcs: Vec<f64>,
        ofs: Vec<f64>,
        values: DMatrix<f64>,
    },
    /// Per-case values against one axis, in table order.
    Line { axis: Vec<f64>, values: Vec<f64> },
}

impl GradientView {
    pub fn is_grid(&self) -> bool {
        matches!(self, GradientView::Grid { .. })
    }

    /// (rows, columns) for a grid, (len, 1) for a line.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            GradientView::Grid { values, .. } => values.shape(),
            GradientView::Line { values, .. } => (values.len(), 1),
        }
    }

    /// Finite values only, for colour scaling.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        let values: &[f64] = match self {
            GradientView::Grid { values, .. } => values.as_slice(),
            GradientView::Line { values, .. } => values,
        };
        values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// ∂Isp/∂(O/F) and ∂Isp/∂Pc over a case table.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityGrid {
    pub d_isp_d_of: GradientView,
    pub d_isp_d_pc: GradientView,
    /// Per-case gradients aligned with the table rows.
    pub d_isp_d_of_rows: Vec<f64>,
    pub d_isp_d_pc_rows: Vec<f64>,
    /// Rendering hint carried through from the configuration.
    pub interpolation: Interpolation,
}

impl SensitivityGrid {
    pub fn is_grid(&self) -> bool {
        self.d_isp_d_of.is_grid()
    }
}

// ---------------------------------------------------------------------------
// Grid construction
// ---------------------------------------------------------------------------

/// Finite-difference sensitivities of Isp (s) to mixture ratio and chamber
/// pressure.
///
/// ∂Isp/∂(O/F) is taken within each Pc group, ∂Isp/∂Pc within each O/F
/// group; a group with a single case gives NaN. Both fields are pivoted to
/// (Pc × O/F) grids when the table spans at least two values on each axis.
pub fn build_sensitivity_grids(table: &CaseTable, config: &Config) -> SensitivityGrid {
    let rows = table.records();

    let d_of = grouped_gradient(rows, |r| r.pc, |r| r.of);
    let d_pc = grouped_gradient(rows, |r| r.of, |r| r.pc);

    let pcs = table.distinct_pcs();
    let ofs = table.distinct_ofs();

    let (d_isp_d_of, d_isp_d_pc) = if pcs.len() > 1 && ofs.len() > 1 {
        (
            GradientView::Grid {
                values: pivot(rows, &d_of, &pcs, &ofs),
                pcs: pcs.clone(),
                ofs: ofs.clone(),
            },
            GradientView::Grid {
                values: pivot(rows, &d_pc, &pcs, &ofs),
                pcs,
                ofs,
            },
        )
    } else {
        (
            GradientView::Line {
                axis: rows.iter().map(|r| r.of).collect(),
                values: d_of.clone(),
            },
            GradientView::Line {
                axis: rows.iter().map(|r| r.pc).collect(),
                values: d_pc.clone(),
            },
        )
    };

    SensitivityGrid {
        d_isp_d_of,
        d_isp_d_pc,
        d_isp_d_of_rows: d_of,
        d_isp_d_pc_rows: d_pc,
        interpolation: config.heatmap_interp,
    }
}

/// Gradient of Isp (s) with respect to `position`, taken separately within
/// each group of equal `key`. The result is aligned with `rows`.
fn grouped_gradient<K, P>(rows: &[CaseRecord], key: K, position: P) -> Vec<f64>
where
    K: Fn(&CaseRecord) -> f64,
    P: Fn(&CaseRecord) -> f64,
{
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        key(&rows[a])
            .total_cmp(&key(&rows[b]))
            .then(position(&rows[a]).total_cmp(&position(&rows[b])))
    });

    let mut out = vec![f64::NAN; rows.len()];
    for group in order.chunk_by(|&a, &b| key(&rows[a]) == key(&rows[b])) {
        let f: Vec<f64> = group.iter().map(|&i| rows[i].isp_s).collect();
        let x: Vec<f64> = group.iter().map(|&i| position(&rows[i])).collect();
        for (&i, g) in group.iter().zip(gradient(&f, &x)) {
            out[i] = g;
        }
    }
    out
}

/// Pivot per-case values onto a (Pc × O/F) matrix. Duplicate cells are
/// averaged over their finite values; empty cells are NaN.
fn pivot(rows: &[CaseRecord], values: &[f64], pcs: &[f64], ofs: &[f64]) -> DMatrix<f64> {
    let mut acc = vec![(0.0, 0usize); pcs.len() * ofs.len()];
    for (r, &v) in rows.iter().zip(values) {
        if !v.is_finite() {
            continue;
        }
        let (Ok(i), Ok(j)) = (
            pcs.binary_search_by(|p| p.total_cmp(&r.pc)),
            ofs.binary_search_by(|o| o.total_cmp(&r.of)),
        ) else {
            continue;
        };
        let cell = &mut acc[i * ofs.len() + j];
        cell.0 += v;
        cell.1 += 1;
    }

    DMatrix::from_fn(pcs.len(), ofs.len(), |i, j| match acc[i * ofs.len() + j] {
        (_, 0) => f64::NAN,
        (sum, n) => sum / n as f64,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::case;
    use crate::types::G0;

    fn grid_table() -> CaseTable {
        // Isp (m/s) = 2000 + 100·O/F + 5·Pc  →  linear in both axes
        let mut v = Vec::new();
        for pc in [30.0, 50.0] {
            for of in [2.0, 2.5, 3.0] {
                v.push(case(of, pc, 2000.0 + 100.0 * of + 5.0 * pc));
            }
        }
        CaseTable::from_records(v)
    }

    #[test]
    fn single_pressure_falls_back_to_lines() {
        let t = CaseTable::from_records(vec![
            case(2.0, 50.0, 2400.0),
            case(2.5, 50.0, 2500.0),
            case(3.0, 50.0, 2550.0),
        ]);
        let s = build_sensitivity_grids(&t, &Config::default());
        assert!(!s.is_grid());

        match &s.d_isp_d_of {
            GradientView::Line { axis, values } => {
                assert_eq!(axis, &vec![2.0, 2.5, 3.0]);
                assert_eq!(values.len(), 3);
                assert!((values[0] - 200.0 / G0).abs() < 1e-9);
                assert!((values[1] - 150.0 / G0).abs() < 1e-9);
                assert!((values[2] - 100.0 / G0).abs() < 1e-9);
            }
            other => panic!("expected a line, got {other:?}"),
        }

        // every O/F group holds one case: no Pc slope anywhere
        match &s.d_isp_d_pc {
            GradientView::Line { axis, values } => {
                assert_eq!(axis, &vec![50.0, 50.0, 50.0]);
                assert!(values.iter().all(|v| v.is_nan()));
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn single_mixture_ratio_falls_back_to_lines() {
        let t = CaseTable::from_records(vec![case(2.0, 30.0, 2400.0), case(2.0, 50.0, 2500.0)]);
        let s = build_sensitivity_grids(&t, &Config::default());
        assert!(!s.d_isp_d_of.is_grid());
        assert!(!s.d_isp_d_pc.is_grid());
        assert_eq!(s.d_isp_d_pc.shape(), (2, 1));
        assert!((s.d_isp_d_pc_rows[0] - 5.0 / G0).abs() < 1e-9);
    }

    #[test]
    fn full_grid_shape_and_values() {
        let s = build_sensitivity_grids(&grid_table(), &Config::default());
        assert!(s.is_grid());
        assert_eq!(s.d_isp_d_of.shape(), (2, 3));
        assert_eq!(s.d_isp_d_pc.shape(), (2, 3));

        let GradientView::Grid { pcs, ofs, values } = &s.d_isp_d_of else {
            panic!("expected grid");
        };
        assert_eq!(pcs, &vec![30.0, 50.0]);
        assert_eq!(ofs, &vec![2.0, 2.5, 3.0]);
        assert!(values.iter().all(|g| (g - 100.0 / G0).abs() < 1e-9));

        let GradientView::Grid { values, .. } = &s.d_isp_d_pc else {
            panic!("expected grid");
        };
        assert!(values.iter().all(|g| (g - 5.0 / G0).abs() < 1e-9));
    }

    #[test]
    fn missing_cells_are_nan() {
        let t = CaseTable::from_records(vec![
            case(2.0, 30.0, 2400.0),
            case(3.0, 30.0, 2500.0),
            case(2.0, 50.0, 2450.0),
        ]);
        let s = build_sensitivity_grids(&t, &Config::default());
        let GradientView::Grid { values, .. } = &s.d_isp_d_of else {
            panic!("expected grid");
        };
        assert!((values[(0, 0)] - 100.0 / G0).abs() < 1e-9);
        // Pc = 50 holds a single case: slope undefined
        assert!(values[(1, 0)].is_nan());
        // (Pc = 50, O/F = 3) has no case at all
        assert!(values[(1, 1)].is_nan());
    }

    #[test]
    fn row_gradients_align_with_table() {
        let t = grid_table();
        let s = build_sensitivity_grids(&t, &Config::default());
        assert_eq!(s.d_isp_d_of_rows.len(), t.len());
        assert_eq!(s.d_isp_d_pc_rows.len(), t.len());
    }

    #[test]
    fn empty_table_gives_empty_output() {
        let s = build_sensitivity_grids(&CaseTable::default(), &Config::default());
        assert_eq!(s.d_isp_d_of.shape(), (0, 1));
        assert_eq!(s.d_isp_d_pc.shape(), (0, 1));
        assert!(s.d_isp_d_of.finite_range().is_none());
    }

    #[test]
    fn interpolation_hint_carried_from_config() {
        let config = Config {
            heatmap_interp: Interpolation::Bicubic,
            ..Config::default()
        };
        let s = build_sensitivity_grids(&grid_table(), &config);
        assert_eq!(s.interpolation, Interpolation::Bicubic);
    }
}
