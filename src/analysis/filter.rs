use crate::types::{CaseRecord, CaseTable};

/// Inclusive bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min.map_or(true, |lo| v >= lo) && self.max.map_or(true, |hi| v <= hi)
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Row filter on mixture ratio, chamber pressure and Isp (s).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaseFilter {
    pub of: Range,
    pub pc: Range,
    pub isp_s: Range,
}

impl CaseFilter {
    pub fn matches(&self, r: &CaseRecord) -> bool {
        self.of.contains(r.of) && self.pc.contains(r.pc) && self.isp_s.contains(r.isp_s)
    }

    pub fn is_empty(&self) -> bool {
        self.of.is_open() && self.pc.is_open() && self.isp_s.is_open()
    }

    /// Filtered copy of the full table. Order is kept, so the result is
    /// still sorted by (Pc, O/F).
    pub fn apply(&self, table: &CaseTable) -> CaseTable {
        table.filtered(|r| self.matches(r))
    }
}
