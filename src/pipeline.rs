use std::path::Path;

use crate::config::PipelineConfig;
use crate::data::derive::normalize_electrical;
use crate::data::loader::{load_file, parse_content, FileFormat};
use crate::data::model::Entry;
use crate::data::resample::normalize_optical;
use crate::error::IngestError;

// ---------------------------------------------------------------------------
// parse → derive → resample
// ---------------------------------------------------------------------------

/// Run derivation or resampling over a freshly parsed entry.
pub fn normalize(entry: &mut Entry, config: &PipelineConfig) {
    match entry {
        Entry::Optical(e) => normalize_optical(e, config),
        Entry::Electrical(e) => normalize_electrical(e),
    }
}

/// Read, parse and normalize one file.
///
/// Either a complete entry is returned or an error naming the file; no
/// partial record escapes a failed parse.
pub fn process_file(path: &Path, config: &PipelineConfig) -> Result<Entry, IngestError> {
    let mut entry = load_file(path)?;
    normalize(&mut entry, config);
    Ok(entry)
}

/// Same as [`process_file`] for content that is already in memory.
pub fn process_content(
    path: &Path,
    content: &str,
    config: &PipelineConfig,
) -> Result<Entry, IngestError> {
    let format = FileFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let mut entry = parse_content(path, format, content)?;
    normalize(&mut entry, config);
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_process_content_electrical() {
        let path = PathBuf::from("Si_params.dat");
        let entry = process_content(
            &path,
            "[bandgap]\nEg_G = 1.12\n[valenceband]\nE_v = -5.0\n",
            &PipelineConfig::default(),
        )
        .unwrap();
        let Entry::Electrical(e) = entry else {
            panic!("expected electrical entry");
        };
        assert_eq!(e.material, "Si");
        assert!(e.datasets[0].chi_derived);
        assert!((e.chi.unwrap() - 3.88).abs() < 1e-12);
    }

    #[test]
    fn test_process_content_rejects_unknown_extension() {
        let err = process_content(Path::new("x.bin"), "", &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }
}
