use crate::types::{CaseRecord, CaseTable};

/// Quantities plotted against O/F, one curve per chamber pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    IspSeconds,
    ChamberTemperature,
    PressureRatio,
    EnthalpyDrop,
}

impl Quantity {
    pub const ALL: [Quantity; 4] = [
        Quantity::IspSeconds,
        Quantity::ChamberTemperature,
        Quantity::PressureRatio,
        Quantity::EnthalpyDrop,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Quantity::IspSeconds => "Isp vs O/F",
            Quantity::ChamberTemperature => "T_chamber vs O/F",
            Quantity::PressureRatio => "Pressure Ratio vs O/F",
            Quantity::EnthalpyDrop => "Enthalpy Drop vs O/F",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Quantity::IspSeconds => "Isp (s)",
            Quantity::ChamberTemperature => "T (K)",
            Quantity::PressureRatio => "P_throat/Pc",
            Quantity::EnthalpyDrop => "ΔH (kJ/kg)",
        }
    }

    pub fn of(self, r: &CaseRecord) -> f64 {
        match self {
            Quantity::IspSeconds => r.isp_s,
            Quantity::ChamberTemperature => r.t_chamber,
            Quantity::PressureRatio => r.pressure_ratio,
            Quantity::EnthalpyDrop => r.delta_h,
        }
    }
}

/// One curve: all cases at a single chamber pressure, ascending in O/F.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub pc: f64,
    pub points: Vec<[f64; 2]>,
}

impl Series {
    pub fn label(&self) -> String {
        format!("{} bar", self.pc)
    }
}

/// Curves of `quantity` against O/F, one per distinct Pc (ascending).
pub fn by_pressure(table: &CaseTable, quantity: Quantity) -> Vec<Series> {
    table
        .records()
        .chunk_by(|a, b| a.pc == b.pc)
        .map(|group| Series {
            pc: group[0].pc,
            points: group.iter().map(|r| [r.of, quantity.of(r)]).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::case;

    #[test]
    fn one_series_per_pressure() {
        let t = CaseTable::from_records(vec![
            case(3.0, 50.0, 2500.0),
            case(2.0, 30.0, 2400.0),
            case(2.0, 50.0, 2450.0),
        ]);
        let s = by_pressure(&t, Quantity::IspSeconds);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].pc, 30.0);
        assert_eq!(s[1].label(), "50 bar");
        assert_eq!(s[1].points.len(), 2);
        assert_eq!(s[1].points[0][0], 2.0);
        assert_eq!(s[1].points[1][1], 2500.0 / crate::types::G0);
    }

    #[test]
    fn empty_table_has_no_series() {
        assert!(by_pressure(&CaseTable::default(), Quantity::EnthalpyDrop).is_empty());
    }
}
