use std::path::Path;

use crate::error::IngestError;

use super::electrical::{parse_sectioned, parse_tabular};
use super::model::{Entry, OpticalDataset, OpticalEntry};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Input formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.txt` / `.nk` – whitespace-separated `wavelength n k` rows.
    Optical,
    /// `.dat` – `[section]` headers and `key = value` lines.
    Sectioned,
    /// `.csv` – header row plus data rows.
    Tabular,
}

impl FileFormat {
    /// Match the (case-insensitive) extension of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "txt" | "nk" => Some(FileFormat::Optical),
            "dat" => Some(FileFormat::Sectioned),
            "csv" => Some(FileFormat::Tabular),
            _ => None,
        }
    }
}

/// Read a file and parse it into a fresh [`Entry`].  Dispatch by extension.
///
/// Invalid UTF-8 is replaced rather than rejected; lab exports are rarely clean.
pub fn load_file(path: &Path) -> Result<Entry, IngestError> {
    let format = FileFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);

    parse_content(path, format, &content)
}

/// Parse already-read `content` as `format`. `path` names the entry and errors.
pub fn parse_content(path: &Path, format: FileFormat, content: &str) -> Result<Entry, IngestError> {
    match format {
        FileFormat::Optical => parse_optical(path, content).map(Entry::Optical),
        FileFormat::Sectioned => parse_sectioned(path, content).map(Entry::Electrical),
        FileFormat::Tabular => parse_tabular(path, content).map(Entry::Electrical),
    }
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// File name without its final extension.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Material name: the file stem up to the first `_`.
///
/// `ZnO_ellipsometry.txt` → `ZnO`. A stem starting with `_` keeps the whole
/// stem so the name is never empty.
pub fn material_name(path: &Path) -> String {
    let stem = source_name(path);
    match stem.split_once('_') {
        Some((head, _)) if !head.is_empty() => head.to_string(),
        _ => stem,
    }
}

// ---------------------------------------------------------------------------
// Optical loader
// ---------------------------------------------------------------------------

/// Line layout:
///
/// ```text
/// # wavelength(nm)  n      k
/// 400               1.90   0.010
/// 700               2.10   0.000
/// ```
///
/// Blank and `#` lines are skipped. Rows need at least three tokens whose
/// first three parse as floats; anything else is dropped. Rows are sorted by
/// wavelength (stable).
pub fn parse_optical(path: &Path, content: &str) -> Result<OpticalEntry, IngestError> {
    let mut rows: Vec<(f64, f64, f64)> = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_nk_row(line) {
            Some(row) => rows.push(row),
            None => log::debug!("{}:{}: skipping '{line}'", path.display(), line_no + 1),
        }
    }

    if rows.is_empty() {
        return Err(IngestError::NoValidData {
            path: path.to_path_buf(),
        });
    }

    // NaN wavelengths of either sign go last.
    rows.sort_by(|a, b| a.0.is_nan().cmp(&b.0.is_nan()).then(a.0.total_cmp(&b.0)));

    let material = material_name(path);
    let dataset = OpticalDataset::from_rows(source_name(path), &rows);

    log::info!(
        "Optical constants parsed: material={material}, n_points={}",
        dataset.len()
    );

    Ok(OpticalEntry::new(material, vec![dataset]))
}

fn parse_nk_row(line: &str) -> Option<(f64, f64, f64)> {
    let mut tokens = line.split_whitespace();
    let wl = tokens.next()?.parse::<f64>().ok()?;
    let n = tokens.next()?.parse::<f64>().ok()?;
    let k = tokens.next()?.parse::<f64>().ok()?;
    Some((wl, n, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn p(name: &str) -> PathBuf {
        PathBuf::from(format!("/data/{name}"))
    }

    #[test]
    fn test_format_dispatch() {
        assert_eq!(FileFormat::from_path(&p("a.txt")), Some(FileFormat::Optical));
        assert_eq!(FileFormat::from_path(&p("a.NK")), Some(FileFormat::Optical));
        assert_eq!(FileFormat::from_path(&p("a.dat")), Some(FileFormat::Sectioned));
        assert_eq!(FileFormat::from_path(&p("a.Csv")), Some(FileFormat::Tabular));
        assert_eq!(FileFormat::from_path(&p("a.json")), None);
        assert_eq!(FileFormat::from_path(&p("noext")), None);
    }

    #[test]
    fn test_material_name() {
        assert_eq!(material_name(&p("ZnO_ellipsometry.txt")), "ZnO");
        assert_eq!(material_name(&p("GaAs.csv")), "GaAs");
        assert_eq!(material_name(&p("Si_a_b.nk")), "Si");
        assert_eq!(material_name(&p("_odd.nk")), "_odd");
        assert_eq!(source_name(&p("ZnO_ellipsometry.txt")), "ZnO_ellipsometry");
    }

    #[test]
    fn test_parse_sorts_and_skips() {
        let content = "\
# header comment
wavelength n k
700 2.1 0.00

400 1.9 0.01
500 2.0
600 abc 0.0
550 1.95 0.005 extra columns ignored
";
        let entry = parse_optical(&p("ZnO_test.txt"), content).unwrap();
        assert_eq!(entry.material, "ZnO");
        let ds = &entry.datasets[0];
        assert_eq!(ds.source, "ZnO_test");
        assert_eq!(ds.wavelength, vec![400.0, 550.0, 700.0]);
        assert_eq!(ds.n, vec![1.9, 1.95, 2.1]);
        assert_eq!(ds.k, vec![0.01, 0.005, 0.0]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let content = "500 1.0 0.0\n400 9.0 0.0\n500 2.0 0.0\n";
        let entry = parse_optical(&p("x.nk"), content).unwrap();
        assert_eq!(entry.datasets[0].n, vec![9.0, 1.0, 2.0]);
    }

    #[test]
    fn test_nan_wavelengths_sort_last() {
        let content = "-nan 1.0 0.0\n700 2.1 0.0\nnan 3.0 0.0\n400 1.9 0.01\n";
        let ds = &parse_optical(&p("ZnO_x.txt"), content).unwrap().datasets[0];
        assert_eq!(&ds.wavelength[..2], &[400.0, 700.0]);
        assert!(ds.wavelength[2..].iter().all(|w| w.is_nan()));
        assert_eq!(ds.n, vec![1.9, 2.1, 1.0, 3.0]);
    }

    #[test]
    fn test_no_valid_rows() {
        let err = parse_optical(&p("empty.txt"), "# nothing\n\nfoo bar baz\n").unwrap_err();
        assert!(matches!(err, IngestError::NoValidData { .. }));
        assert!(err.to_string().contains("empty.txt"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(&p("thing.xlsx")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }
}
