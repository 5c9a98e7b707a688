//! Electrical property loaders.
//!
//! Two layouts are understood:
//!
//! * **Sectioned** (`.dat`): simulator parameter files made of `[section]`
//!   headers followed by `key = value` lines. Only a handful of
//!   `(section, key)` pairs are read; everything else is ignored.
//! * **Tabular** (`.csv`): a header row naming quantities with units
//!   (`Eg_eV`, `Nc_cm-3`, ...). For each column the first non-blank cell wins.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::IngestError;

use super::loader::{material_name, source_name};
use super::model::{ElectricalDataset, ElectricalEntry, Method};

static RE_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[(.+?)\]\s*$").expect("valid regex"));
static RE_KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9_]+)\s*=\s*(.+?)\s*$").expect("valid regex"));
static RE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    let num = r"[+-]?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?";
    Regex::new(&format!(r"^\(\s*({num})\s*,\s*({num})\s*\)\s*$")).expect("valid regex")
});

/// Lenient float: blank or unparsable text is absent.
fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// `(a, b)` → `Some((a, b))`.
fn parse_pair(s: &str) -> Option<(f64, f64)> {
    let caps = RE_PAIR.captures(s)?;
    Some((parse_float(&caps[1])?, parse_float(&caps[2])?))
}

fn finish(path: &Path, dataset: ElectricalDataset) -> Result<ElectricalEntry, IngestError> {
    if dataset.has_no_fields() {
        return Err(IngestError::NoRecognizedFields {
            path: path.to_path_buf(),
        });
    }

    let material = material_name(path);
    log::info!(
        "Electrical properties parsed: material={material}, method={}",
        dataset.method
    );
    Ok(ElectricalEntry::new(material, vec![dataset]))
}

// ---------------------------------------------------------------------------
// Sectioned loader
// ---------------------------------------------------------------------------

/// Recognized pairs:
///
/// | section | key | field |
/// |---|---|---|
/// | `bandgap` | `Eg_G` | bandgap |
/// | `valenceband` | `E_v`, `Ev` | Ev |
/// | `valenceband` | `m_dos` | mdos_h |
/// | `conductionband` | `E_c`, `Ec`, `E_c0` | Ec |
/// | `conductionband` | `m_dos` | mdos_e |
/// | `permittivity` | `permittivity` | relative permittivity (pairs averaged) |
/// | `mobility/constant` | `mu_max` | `(mu_e, mu_h)` |
///
/// Section names are case-insensitive, keys are not. A later assignment to
/// the same field replaces an earlier one.
pub fn parse_sectioned(path: &Path, content: &str) -> Result<ElectricalEntry, IngestError> {
    let mut ds = ElectricalDataset::new(source_name(path), Method::TiberCad);
    let mut section: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = RE_SECTION.captures(line) {
            section = Some(caps[1].trim().to_lowercase());
            continue;
        }

        let Some(caps) = RE_KEY_VALUE.captures(line) else {
            continue;
        };
        let Some(section) = section.as_deref() else {
            continue;
        };
        let key = &caps[1];
        let value = caps[2].split('#').next().unwrap_or("").trim();

        match (section, key) {
            ("bandgap", "Eg_G") => ds.bandgap = parse_float(value),
            ("valenceband", "E_v" | "Ev") => ds.ev = parse_float(value),
            ("valenceband", "m_dos") => ds.mdos_h = parse_float(value),
            ("conductionband", "E_c" | "Ec" | "E_c0") => ds.ec = parse_float(value),
            ("conductionband", "m_dos") => ds.mdos_e = parse_float(value),
            ("permittivity", "permittivity") => {
                ds.relative_permittivity = if RE_PAIR.is_match(value) {
                    parse_pair(value).map(|(a, b)| 0.5 * (a + b))
                } else {
                    parse_float(value)
                };
            }
            ("mobility/constant", "mu_max") => {
                if let Some((mu_e, mu_h)) = parse_pair(value) {
                    ds.mobility_e = Some(mu_e);
                    ds.mobility_h = Some(mu_h);
                }
            }
            _ => log::trace!("ignoring [{section}] {key}"),
        }
    }

    finish(path, ds)
}

// ---------------------------------------------------------------------------
// Tabular loader
// ---------------------------------------------------------------------------

/// Recognized header names.
const COLUMNS: [&str; 11] = [
    "Eg_eV",
    "chi_eV",
    "mobility_e_cm2_Vs",
    "mobility_h_cm2_Vs",
    "Nc_cm-3",
    "Nv_cm-3",
    "eps_r",
    "Ec_eV",
    "Ev_eV",
    "mdos_e",
    "mdos_h",
];

fn column_field<'a>(ds: &'a mut ElectricalDataset, column: &str) -> Option<&'a mut Option<f64>> {
    let field = match column {
        "Eg_eV" => &mut ds.bandgap,
        "chi_eV" => &mut ds.electron_affinity,
        "mobility_e_cm2_Vs" => &mut ds.mobility_e,
        "mobility_h_cm2_Vs" => &mut ds.mobility_h,
        "Nc_cm-3" => &mut ds.nc,
        "Nv_cm-3" => &mut ds.nv,
        "eps_r" => &mut ds.relative_permittivity,
        "Ec_eV" => &mut ds.ec,
        "Ev_eV" => &mut ds.ev,
        "mdos_e" => &mut ds.mdos_e,
        "mdos_h" => &mut ds.mdos_h,
        _ => return None,
    };
    Some(field)
}

/// CSV layout: header row with column names from `COLUMNS`; unknown
/// columns are ignored. Short rows are tolerated, unreadable records skipped.
/// When a header name repeats, the rightmost column is read.
///
/// The first non-blank cell of a column wins even if it is not a number;
/// later rows never fill that field.
pub fn parse_tabular(path: &Path, content: &str) -> Result<ElectricalEntry, IngestError> {
    let no_fields = || IngestError::NoRecognizedFields {
        path: path.to_path_buf(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|h| h.to_string()).collect(),
        Err(e) => {
            log::debug!("{}: unreadable CSV header: {e}", path.display());
            return Err(no_fields());
        }
    };

    // (cell index, column name) for every recognized column present.
    let indices: Vec<(usize, &str)> = COLUMNS
        .iter()
        .filter_map(|&name| headers.iter().rposition(|h| h == name).map(|idx| (idx, name)))
        .collect();

    let mut ds = ElectricalDataset::new(source_name(path), Method::Csv);
    let mut filled = vec![false; indices.len()];
    let mut n_rows = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::debug!("{}: skipping CSV row {row_no}: {e}", path.display());
                continue;
            }
        };
        n_rows += 1;

        for (slot, &(idx, name)) in indices.iter().enumerate() {
            if filled[slot] {
                continue;
            }
            let Some(cell) = record.get(idx) else {
                continue;
            };
            if cell.trim().is_empty() {
                continue;
            }
            if let Some(field) = column_field(&mut ds, name) {
                *field = parse_float(cell);
            }
            filled[slot] = true;
        }
    }

    if n_rows == 0 {
        return Err(no_fields());
    }

    finish(path, ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::path::PathBuf;

    fn p(name: &str) -> PathBuf {
        PathBuf::from(format!("/data/{name}"))
    }

    const SILICON_DAT: &str = "\
# Silicon parameters
[bandgap]
Eg_G = 1.12   # eV at 300 K

[ValenceBand]
E_v = -5.0
m_dos = 0.81

[conductionband]
m_dos = 1.09

[permittivity]
permittivity = (11.7, 11.9)

[mobility/constant]
mu_max = (1417.0, 470.5)
unrelated = 3
";

    #[test]
    fn test_sectioned_fields() {
        let entry = parse_sectioned(&p("Si_tibercad.dat"), SILICON_DAT).unwrap();
        assert_eq!(entry.material, "Si");
        let ds = &entry.datasets[0];
        assert_eq!(ds.method, Method::TiberCad);
        assert_eq!(ds.source, "Si_tibercad");
        assert_eq!(ds.bandgap, Some(1.12));
        assert_eq!(ds.ev, Some(-5.0));
        assert_eq!(ds.ec, None);
        assert_eq!(ds.mdos_h, Some(0.81));
        assert_eq!(ds.mdos_e, Some(1.09));
        assert_abs_diff_eq!(ds.relative_permittivity.unwrap(), 11.8, epsilon = 1e-12);
        assert_eq!(ds.mobility_e, Some(1417.0));
        assert_eq!(ds.mobility_h, Some(470.5));
        assert_eq!(ds.temperature, 300.0);
    }

    #[test]
    fn test_sectioned_scalar_permittivity_and_ec_aliases() {
        let content = "[permittivity]\npermittivity = 12.9\n[conductionband]\nE_c0 = -4.07\n";
        let ds = &parse_sectioned(&p("GaAs.dat"), content).unwrap().datasets[0];
        assert_eq!(ds.relative_permittivity, Some(12.9));
        assert_eq!(ds.ec, Some(-4.07));
    }

    #[test]
    fn test_sectioned_key_outside_section_ignored() {
        let content = "Eg_G = 1.12\n[bandgap]\nEg = 1.0\n";
        let err = parse_sectioned(&p("x.dat"), content).unwrap_err();
        assert!(matches!(err, IngestError::NoRecognizedFields { .. }));
    }

    #[test]
    fn test_sectioned_malformed_mobility_ignored() {
        let content = "[mobility/constant]\nmu_max = 1400\n[bandgap]\nEg_G = 1.1\n";
        let ds = &parse_sectioned(&p("x.dat"), content).unwrap().datasets[0];
        assert_eq!(ds.mobility_e, None);
        assert_eq!(ds.mobility_h, None);
        assert_eq!(ds.bandgap, Some(1.1));
    }

    #[test]
    fn test_tabular_first_non_empty_wins() {
        let content = "\
Eg_eV,chi_eV,mobility_e_cm2_Vs,Nc_cm-3,comment
1.42,4.07,8500,4.7e17,first
,,,,blank
1.50,4.10,9000,5e17,third
";
        let entry = parse_tabular(&p("GaAs_measured.csv"), content).unwrap();
        assert_eq!(entry.material, "GaAs");
        let ds = &entry.datasets[0];
        assert_eq!(ds.method, Method::Csv);
        assert_eq!(ds.bandgap, Some(1.42));
        assert_eq!(ds.electron_affinity, Some(4.07));
        assert_eq!(ds.mobility_e, Some(8500.0));
        assert_eq!(ds.nc, Some(4.7e17));
        assert_eq!(ds.nv, None);
    }

    #[test]
    fn test_tabular_later_row_fills_gaps() {
        let content = "Eg_eV,eps_r\n1.42,\n  ,12.9\n1.5,13.1\n";
        let ds = &parse_tabular(&p("GaAs.csv"), content).unwrap().datasets[0];
        assert_eq!(ds.bandgap, Some(1.42));
        assert_eq!(ds.relative_permittivity, Some(12.9));
    }

    #[test]
    fn test_tabular_non_numeric_first_cell_stays_absent() {
        let content = "Eg_eV,eps_r\nn/a,12.9\n1.5,\n";
        let ds = &parse_tabular(&p("GaAs.csv"), content).unwrap().datasets[0];
        assert_eq!(ds.bandgap, None);
        assert_eq!(ds.relative_permittivity, Some(12.9));
    }

    #[test]
    fn test_tabular_duplicate_header_reads_last_column() {
        let ds = &parse_tabular(&p("GaAs.csv"), "Eg_eV,Eg_eV\n1.0,2.0\n").unwrap().datasets[0];
        assert_eq!(ds.bandgap, Some(2.0));
    }

    #[test]
    fn test_tabular_header_only_fails() {
        let err = parse_tabular(&p("GaAs.csv"), "Eg_eV,chi_eV\n").unwrap_err();
        assert!(matches!(err, IngestError::NoRecognizedFields { .. }));
    }

    #[test]
    fn test_tabular_unknown_columns_fail() {
        let err = parse_tabular(&p("GaAs.csv"), "a,b\n1,2\n").unwrap_err();
        assert!(matches!(err, IngestError::NoRecognizedFields { .. }));
    }
}
