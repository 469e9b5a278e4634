use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // standard gravity, m/s^2
pub const R_UNIVERSAL: f64 = 8.314_462_618_153_24; // J/(mol·K)
pub const BAR_TO_PA: f64 = 1e5;

// ---------------------------------------------------------------------------
// Output table columns
// ---------------------------------------------------------------------------

pub const COLUMNS: [&str; 12] = [
    "O/F",
    "Pc (bar)",
    "P_throat (bar)",
    "Pressure Ratio",
    "Expansion Ratio",
    "T_chamber (K)",
    "T_throat (K)",
    "H_chamber (kJ/kg)",
    "H_throat (kJ/kg)",
    "Delta_H (kJ/kg)",
    "Isp (m/s)",
    "Isp (s)",
];

// ---------------------------------------------------------------------------
// One operating point reduced from a CEA case block
// ---------------------------------------------------------------------------

/// A single parsed case (one O/F × Pc operating point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "O/F")]
    pub of: f64,
    #[serde(rename = "Pc (bar)")]
    pub pc: f64,              // bar
    #[serde(rename = "P_throat (bar)")]
    pub p_throat: f64,        // bar
    #[serde(rename = "Pressure Ratio")]
    pub pressure_ratio: f64,  // P_throat / Pc
    /// Ae/At. `None` means the caller still has to supply one before sizing.
    #[serde(rename = "Expansion Ratio")]
    pub expansion_ratio: Option<f64>,
    #[serde(rename = "T_chamber (K)")]
    pub t_chamber: f64,       // K
    #[serde(rename = "T_throat (K)")]
    pub t_throat: f64,        // K
    #[serde(rename = "H_chamber (kJ/kg)")]
    pub h_chamber: f64,       // kJ/kg
    #[serde(rename = "H_throat (kJ/kg)")]
    pub h_throat: f64,        // kJ/kg
    #[serde(rename = "Delta_H (kJ/kg)")]
    pub delta_h: f64,         // kJ/kg
    #[serde(rename = "Isp (m/s)")]
    pub isp_ms: f64,          // m/s
    #[serde(rename = "Isp (s)")]
    pub isp_s: f64,           // s
}

impl CaseRecord {
    /// Build a record from the raw report fields, deriving the ratio,
    /// enthalpy drop and Isp in seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        of: f64,
        pc: f64,
        p_throat: f64,
        expansion_ratio: Option<f64>,
        t_chamber: f64,
        t_throat: f64,
        h_chamber: f64,
        h_throat: f64,
        isp_ms: f64,
    ) -> Self {
        Self {
            of,
            pc,
            p_throat,
            pressure_ratio: p_throat / pc,
            expansion_ratio,
            t_chamber,
            t_throat,
            h_chamber,
            h_throat,
            delta_h: h_chamber - h_throat,
            isp_ms,
            isp_s: isp_ms / G0,
        }
    }

    /// Resolved expansion ratio, if it is set and finite.
    pub fn resolved_expansion_ratio(&self) -> Option<f64> {
        self.expansion_ratio.filter(|ar| ar.is_finite())
    }

    /// Row values in `COLUMNS` order. An unset expansion ratio reads as NaN.
    pub fn values(&self) -> [f64; 12] {
        [
            self.of,
            self.pc,
            self.p_throat,
            self.pressure_ratio,
            self.expansion_ratio.unwrap_or(f64::NAN),
            self.t_chamber,
            self.t_throat,
            self.h_chamber,
            self.h_throat,
            self.delta_h,
            self.isp_ms,
            self.isp_s,
        ]
    }
}

/// Table ordering: chamber pressure first, then mixture ratio.
pub fn pc_of_order(a: &CaseRecord, b: &CaseRecord) -> Ordering {
    a.pc.total_cmp(&b.pc).then(a.of.total_cmp(&b.of))
}

// ---------------------------------------------------------------------------
// Case table
// ---------------------------------------------------------------------------

/// Ordered set of parsed cases, always sorted ascending by (Pc, O/F).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CaseRecord>", into = "Vec<CaseRecord>")]
pub struct CaseTable {
    records: Vec<CaseRecord>,
}

impl CaseTable {
    /// Sort the records by (Pc, O/F). The sort is stable, so equal keys
    /// keep their report order.
    pub fn from_records(mut records: Vec<CaseRecord>) -> Self {
        records.sort_by(pc_of_order);
        Self { records }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&CaseRecord> {
        self.records.get(idx)
    }

    /// Index of the highest Isp (s). Ties resolve to the first row in
    /// table order (lowest Pc, then lowest O/F).
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, r) in self.records.iter().enumerate() {
            if r.isp_s.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, isp)| r.isp_s > isp) {
                best = Some((i, r.isp_s));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn best(&self) -> Option<&CaseRecord> {
        self.best_index().map(|i| &self.records[i])
    }

    /// Resolve (or override) the expansion ratio of one row. Returns false
    /// when the index is out of range.
    pub fn set_expansion_ratio(&mut self, idx: usize, expansion_ratio: f64) -> bool {
        match self.records.get_mut(idx) {
            Some(r) => {
                r.expansion_ratio = Some(expansion_ratio);
                true
            }
            None => false,
        }
    }

    /// Distinct chamber pressures, ascending.
    pub fn distinct_pcs(&self) -> Vec<f64> {
        distinct(self.records.iter().map(|r| r.pc))
    }

    /// Distinct mixture ratios, ascending.
    pub fn distinct_ofs(&self) -> Vec<f64> {
        distinct(self.records.iter().map(|r| r.of))
    }

    /// Keep only rows matching `pred`; order is preserved.
    pub fn filtered<F: Fn(&CaseRecord) -> bool>(&self, pred: F) -> CaseTable {
        CaseTable {
            records: self.records.iter().filter(|r| pred(r)).cloned().collect(),
        }
    }
}

impl From<Vec<CaseRecord>> for CaseTable {
    fn from(records: Vec<CaseRecord>) -> Self {
        CaseTable::from_records(records)
    }
}

impl From<CaseTable> for Vec<CaseRecord> {
    fn from(table: CaseTable) -> Self {
        table.records
    }
}

impl<'a> IntoIterator for &'a CaseTable {
    type Item = &'a CaseRecord;
    type IntoIter = std::slice::Iter<'a, CaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Sorted, de-duplicated values (exact equality).
pub(crate) fn distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    v.dedup();
    v
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn case(of: f64, pc: f64, isp_ms: f64) -> CaseRecord {
        CaseRecord::new(of, pc, pc * 0.58, Some(10.0), 3400.0, 3000.0, -400.0, -900.0, isp_ms)
    }

    #[test]
    fn derived_fields() {
        let r = CaseRecord::new(2.5, 50.0, 29.5, Some(10.0), 3500.0, 3100.0, -500.0, -900.0, 2500.0);
        assert!((r.pressure_ratio - 0.59).abs() < 1e-12);
        assert!((r.delta_h - 400.0).abs() < 1e-12);
        assert!((r.isp_s - 2500.0 / G0).abs() < 1e-12);
    }

    #[test]
    fn table_sorted_by_pc_then_of() {
        let t = CaseTable::from_records(vec![
            case(3.0, 50.0, 2500.0),
            case(2.0, 70.0, 2600.0),
            case(2.0, 50.0, 2400.0),
        ]);
        let keys: Vec<(f64, f64)> = t.iter().map(|r| (r.pc, r.of)).collect();
        assert_eq!(keys, vec![(50.0, 2.0), (50.0, 3.0), (70.0, 2.0)]);

        // Re-sorting is idempotent
        let again = CaseTable::from_records(t.records().to_vec());
        assert_eq!(again, t);
    }

    #[test]
    fn best_index_takes_first_of_ties() {
        let t = CaseTable::from_records(vec![
            case(3.0, 50.0, 2600.0),
            case(2.0, 70.0, 2600.0),
            case(2.0, 50.0, 2400.0),
        ]);
        assert_eq!(t.best_index(), Some(1));
        assert_eq!(t.best().map(|r| r.of), Some(3.0));
        assert!(CaseTable::default().best_index().is_none());
    }

    #[test]
    fn distinct_axes() {
        let t = CaseTable::from_records(vec![
            case(3.0, 50.0, 2500.0),
            case(2.0, 50.0, 2400.0),
            case(2.0, 70.0, 2600.0),
        ]);
        assert_eq!(t.distinct_pcs(), vec![50.0, 70.0]);
        assert_eq!(t.distinct_ofs(), vec![2.0, 3.0]);
    }

    #[test]
    fn set_expansion_ratio_out_of_range() {
        let mut t = CaseTable::from_records(vec![case(2.0, 50.0, 2400.0)]);
        assert!(!t.set_expansion_ratio(3, 8.0));
        assert!(t.set_expansion_ratio(0, 8.0));
        assert_eq!(t.records()[0].expansion_ratio, Some(8.0));
    }
}
