use std::path::Path;

use tracing::{debug, info};

use super::fields::{Gap, Num, Pattern};
use crate::error::Result;
use crate::types::{CaseRecord, CaseTable};

// ---------------------------------------------------------------------------
// Field patterns
// ---------------------------------------------------------------------------

const CASE_MARKER: &str = "CASE =";

const DEFAULT_EXPANSION_RATIO: f64 = 1.0;

const EXPANSION_RATIO: Pattern = Pattern {
    head: "Ae/At",
    tail: &[],
    values: &[(Gap::Some, Num::Unsigned)],
    ignore_case: true,
};

const MIXTURE_RATIO: Pattern = Pattern {
    head: "O/F=",
    tail: &[],
    values: &[(Gap::Any, Num::Unsigned)],
    ignore_case: false,
};

const PRESSURE: Pattern = Pattern {
    head: "P,",
    tail: &[(Gap::Any, "BAR")],
    values: &[(Gap::Some, Num::Unsigned), (Gap::Some, Num::Unsigned)],
    ignore_case: false,
};

const TEMPERATURE: Pattern = Pattern {
    head: "T,",
    tail: &[(Gap::Any, "K")],
    values: &[(Gap::Some, Num::Unsigned), (Gap::Some, Num::Unsigned)],
    ignore_case: false,
};

const ENTHALPY: Pattern = Pattern {
    head: "H,",
    tail: &[(Gap::Any, "KJ/KG")],
    values: &[(Gap::Some, Num::Signed), (Gap::Some, Num::Signed)],
    ignore_case: false,
};

const ISP: Pattern = Pattern {
    head: "Isp,",
    tail: &[(Gap::Line, "M/SEC")],
    values: &[(Gap::Some, Num::Unsigned)],
    ignore_case: false,
};

// ---------------------------------------------------------------------------
// Report parsing
// ---------------------------------------------------------------------------

/// Parse a CEA report into a case table sorted by (Pc, O/F).
pub fn parse(text: &str) -> CaseTable {
    parse_with(text, |_| {})
}

/// Parse a CEA report, calling `progress` with a percentage (0-100) once per
/// case block before the block is processed.
///
/// Blocks missing any required field are dropped. A report without usable
/// blocks yields an empty table.
pub fn parse_with<F: FnMut(u8)>(text: &str, mut progress: F) -> CaseTable {
    let blocks = split_blocks(text);
    let total = blocks.len();

    let mut records = Vec::with_capacity(total);
    for (idx, block) in blocks.iter().enumerate() {
        progress((100 * idx / total) as u8);
        match extract_case(block) {
            Ok(record) => records.push(record),
            Err(missing) => debug!(block = idx, missing, "discarding case block"),
        }
    }

    info!(blocks = total, retained = records.len(), "parsed CEA report");
    CaseTable::from_records(records)
}

/// Read and parse a report file. Invalid UTF-8 sequences are dropped.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<CaseTable> {
    parse_file_with(path, |_| {})
}

pub fn parse_file_with<P: AsRef<Path>, F: FnMut(u8)>(path: P, progress: F) -> Result<CaseTable> {
    let bytes = std::fs::read(path.as_ref())?;
    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    Ok(parse_with(&text, progress))
}

/// Split a report into case blocks. Each block starts at a line whose
/// trimmed text begins with `CASE =` and runs up to the next such line (or
/// the end of the text). Anything before the first marker is ignored.
///
/// `\r\n`, `\r` and `\n` all end a line; blocks come back `\n`-joined.
pub fn split_blocks(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = text.lines().collect();
    let mut starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.trim_start().starts_with(CASE_MARKER))
        .map(|(i, _)| i)
        .collect();
    starts.push(lines.len());

    starts
        .windows(2)
        .map(|w| lines[w[0]..w[1]].join("\n"))
        .collect()
}

/// Extract one record from a block, or name the first required field that
/// is missing.
pub fn extract_case(block: &str) -> std::result::Result<CaseRecord, &'static str> {
    let expansion_ratio = EXPANSION_RATIO
        .find_one(block)
        .unwrap_or(DEFAULT_EXPANSION_RATIO);

    let of = MIXTURE_RATIO.find_one(block).ok_or("O/F")?;
    let (pc, p_throat) = PRESSURE.find_pair(block).ok_or("P, BAR")?;
    let (t_chamber, t_throat) = TEMPERATURE.find_pair(block).ok_or("T, K")?;
    let (h_chamber, h_throat) = ENTHALPY.find_pair(block).ok_or("H, KJ/KG")?;
    let isp_ms = ISP.find_one(block).ok_or("Isp, M/SEC")?;

    Ok(CaseRecord::new(
        of,
        pc,
        p_throat,
        Some(expansion_ratio),
        t_chamber,
        t_throat,
        h_chamber,
        h_throat,
        isp_ms,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::G0;

    pub(crate) fn block(of: f64, pc: f64, isp_ms: f64, ar: Option<f64>) -> String {
        let mut s = format!(
            "              CASE = {of}_{pc}\n\
             \n\
             \x20            THEORETICAL ROCKET PERFORMANCE ASSUMING EQUILIBRIUM\n\
             \n\
             \x20O/F=    {of:.5}  %FUEL= 28.571429  R,EQ.RATIO= 1.298227  PHI,EQ.RATIO= 1.298227\n\
             \n\
             \x20                CHAMBER   THROAT\n\
             \x20P, BAR          {pc:.3}   {pt:.3}\n\
             \x20T, K            3500.00   3100.00\n\
             \x20H, KJ/KG        -500.00   -900.00\n\
             \n\
             \x20PERFORMANCE PARAMETERS\n\n",
            pt = pc * 0.59,
        );
        if let Some(ar) = ar {
            s.push_str(&format!(" Ae/At                    {ar:.2}\n"));
        }
        s.push_str(&format!(" CSTAR, M/SEC             1800.0\n Isp, M/SEC               {isp_ms:.2}\n"));
        s
    }

    #[test]
    fn reference_block() {
        let text = " CASE = ref\n Ae/At 10.00\n O/F= 2.50\n P, BAR 50.000 29.500\n \
                    T, K 3500.00 3100.00\n H, KJ/KG -500.00 -900.00\n Isp, M/SEC 2500.00\n";
        let table = parse(text);
        assert_eq!(table.len(), 1);
        let r = &table.records()[0];
        assert_eq!(r.of, 2.5);
        assert_eq!(r.pc, 50.0);
        assert_eq!(r.p_throat, 29.5);
        assert!((r.pressure_ratio - 0.59).abs() < 1e-12);
        assert_eq!(r.expansion_ratio, Some(10.0));
        assert_eq!(r.t_chamber, 3500.0);
        assert_eq!(r.t_throat, 3100.0);
        assert_eq!(r.h_chamber, -500.0);
        assert_eq!(r.h_throat, -900.0);
        assert_eq!(r.delta_h, 400.0);
        assert_eq!(r.isp_ms, 2500.0);
        assert!((r.isp_s - 254.93).abs() < 0.01);
    }

    #[test]
    fn records_obey_derived_identities() {
        let text = [
            block(2.0, 50.0, 2400.0, Some(8.0)),
            block(3.0, 70.0, 2550.0, Some(12.0)),
        ]
        .concat();
        for r in &parse(&text) {
            assert!((r.isp_s - r.isp_ms / G0).abs() < 1e-12);
            assert!((r.pressure_ratio - r.p_throat / r.pc).abs() < 1e-12);
            assert!((r.delta_h - (r.h_chamber - r.h_throat)).abs() < 1e-12);
        }
    }

    #[test]
    fn missing_expansion_ratio_defaults_to_one() {
        let table = parse(&block(2.0, 50.0, 2400.0, None));
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].expansion_ratio, Some(1.0));
    }

    #[test]
    fn incomplete_blocks_are_dropped() {
        let good = block(2.0, 50.0, 2400.0, Some(8.0));
        let required = ["O/F=", "P, BAR", "T, K", "H, KJ/KG", "Isp, M/SEC"];
        for label in required {
            let broken = good.replace(label, "XX");
            let text = format!("{good}{broken}");
            assert_eq!(parse(&text).len(), 1, "block without {label} must be dropped");
        }
    }

    #[test]
    fn output_sorted_by_pc_then_of() {
        let text = [
            block(3.0, 70.0, 2500.0, Some(8.0)),
            block(2.0, 70.0, 2450.0, Some(8.0)),
            block(3.0, 30.0, 2400.0, Some(8.0)),
        ]
        .concat();
        let keys: Vec<(f64, f64)> = parse(&text).iter().map(|r| (r.pc, r.of)).collect();
        assert_eq!(keys, vec![(30.0, 3.0), (70.0, 2.0), (70.0, 3.0)]);
    }

    #[test]
    fn text_without_cases_is_empty() {
        assert!(parse("").is_empty());
        assert!(parse("NASA-GLENN CHEMICAL EQUILIBRIUM PROGRAM\n O/F= 2.0\n").is_empty());
    }

    #[test]
    fn preamble_before_first_case_is_ignored() {
        let text = format!(" Isp, M/SEC 9999.0\n{}", block(2.0, 50.0, 2400.0, Some(8.0)));
        let table = parse(&text);
        assert_eq!(table.records()[0].isp_ms, 2400.0);
    }

    #[test]
    fn progress_reported_once_per_block() {
        let text = [
            block(2.0, 50.0, 2400.0, Some(8.0)),
            block(3.0, 50.0, 2500.0, Some(8.0)),
            "CASE = empty\n".to_string(),
            block(4.0, 50.0, 2450.0, Some(8.0)),
        ]
        .concat();
        let mut seen = Vec::new();
        let table = parse_with(&text, |p| seen.push(p));
        assert_eq!(seen, vec![0, 25, 50, 75]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn parse_file_skips_invalid_utf8() {
        let mut bytes = block(2.0, 50.0, 2400.0, Some(8.0)).into_bytes();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.out");
        std::fs::write(&path, bytes).unwrap();
        assert_eq!(parse_file(&path).unwrap().len(), 1);
        assert!(parse_file(dir.path().join("missing.out")).is_err());
    }

    #[test]
    fn invalid_byte_inside_label_gap_is_dropped() {
        let text = block(2.0, 50.0, 2400.0, Some(8.0)).replace("P, BAR", "P, BAR\u{1}");
        let mut bytes = text.into_bytes();
        let at = bytes.iter().position(|&b| b == 1).unwrap();
        bytes[at] = 0xff;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.out");
        std::fs::write(&path, bytes).unwrap();
        let table = parse_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].pc, 50.0);
    }

    #[test]
    fn carriage_return_line_endings() {
        let blocks = [block(2.0, 50.0, 2400.0, Some(8.0)), block(3.0, 50.0, 2500.0, Some(8.0))];
        let cr = blocks.concat().replace('\n', "\r");
        let crlf = blocks.concat().replace('\n', "\r\n");

        for text in [cr, crlf] {
            assert_eq!(split_blocks(&text).len(), 2);
            let table = parse(&text);
            assert_eq!(table.len(), 2);
            assert_eq!(table.records()[1].isp_ms, 2500.0);
        }
    }

    #[test]
    fn isp_label_does_not_reach_across_carriage_return() {
        let text = " CASE = x\r O/F= 2.0\r P, BAR 50.0 29.0\r T, K 3500.0 3100.0\r \
                    H, KJ/KG -500.0 -900.0\r Isp,\r M/SEC 2500.0\r";
        assert!(parse(text).is_empty());
    }
}
