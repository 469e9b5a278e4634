use std::io::{self, Write};
use std::path::Path;

use crate::types::{CaseTable, COLUMNS};

/// Write the case table to CSV format.
///
/// Columns: O/F, Pc (bar), P_throat (bar), Pressure Ratio, Expansion Ratio,
///          T_chamber (K), T_throat (K), H_chamber (kJ/kg), H_throat (kJ/kg),
///          Delta_H (kJ/kg), Isp (m/s), Isp (s)
///
/// An unset expansion ratio is written as an empty field.
pub fn write_case_table<W: Write>(writer: &mut W, table: &CaseTable) -> io::Result<()> {
    writeln!(writer, "{}", COLUMNS.join(","))?;

    for r in table {
        let fields: Vec<String> = r
            .values()
            .iter()
            .map(|v| if v.is_nan() { String::new() } else { v.to_string() })
            .collect();
        writeln!(writer, "{}", fields.join(","))?;
    }

    Ok(())
}

/// Write the case table to a CSV file at the given path.
pub fn write_case_table_file<P: AsRef<Path>>(path: P, table: &CaseTable) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_case_table(&mut file, table)?;
    file.flush()
}
