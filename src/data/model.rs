use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference temperature for promoted density-of-states values (K).
pub const REFERENCE_TEMPERATURE_K: f64 = 300.0;

/// Default wavelengths (nm) at which fixed n/k points are interpolated.
pub const DEFAULT_TARGET_WAVELENGTHS_NM: [f64; 5] = [400.0, 700.0, 800.0, 900.0, 1200.0];

/// A measured or derived scalar counts as present only when it is a finite number.
pub fn is_present(value: Option<f64>) -> bool {
    value.is_some_and(f64::is_finite)
}

/// `value` if present, otherwise `None`.
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// serde_json writes non-finite samples as `null`; read them back as `NaN`.
fn nan_from_null<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

// ---------------------------------------------------------------------------
// Method – which electrical sub-format produced a dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Sectioned `[section]` / `key = value` simulation parameter file.
    #[serde(rename = "TiberCAD")]
    TiberCad,
    /// Header row plus data rows.
    #[serde(rename = "CSV")]
    Csv,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::TiberCad => write!(f, "TiberCAD"),
            Method::Csv => write!(f, "CSV"),
        }
    }
}

// ---------------------------------------------------------------------------
// OpticalDataset – one wavelength/n/k table
// ---------------------------------------------------------------------------

/// Parallel wavelength / n / k arrays, sorted ascending by wavelength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalDataset {
    /// File stem or literature tag.
    pub source: String,
    pub source_doi: Option<String>,
    /// Wavelength axis (nm).
    #[serde(deserialize_with = "nan_from_null")]
    pub wavelength: Vec<f64>,
    /// Refractive index – same length as `wavelength`.
    #[serde(deserialize_with = "nan_from_null")]
    pub n: Vec<f64>,
    /// Extinction coefficient – same length as `wavelength`.
    #[serde(deserialize_with = "nan_from_null")]
    pub k: Vec<f64>,
    pub bandgap: Option<f64>,
}

impl OpticalDataset {
    /// Build a dataset from `(wavelength, n, k)` rows, keeping their order.
    pub fn from_rows(source: impl Into<String>, rows: &[(f64, f64, f64)]) -> Self {
        Self {
            source: source.into(),
            source_doi: None,
            wavelength: rows.iter().map(|r| r.0).collect(),
            n: rows.iter().map(|r| r.1).collect(),
            k: rows.iter().map(|r| r.2).collect(),
            bandgap: None,
        }
    }

    /// Non-empty with matching array lengths.
    pub fn is_structurally_valid(&self) -> bool {
        !self.wavelength.is_empty()
            && self.n.len() == self.wavelength.len()
            && self.k.len() == self.wavelength.len()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }

    /// DOI if known, else the source label.
    pub fn reference(&self) -> Option<String> {
        preferred_reference(self.source_doi.as_deref(), &self.source)
    }
}

// ---------------------------------------------------------------------------
// ElectricalDataset – band edges, transport and DOS parameters
// ---------------------------------------------------------------------------

/// Energies are in eV and vacuum-referenced; mobilities in cm²/(V·s);
/// densities of states in cm⁻³; DOS masses in units of m₀.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricalDataset {
    pub source: String,
    pub source_doi: Option<String>,
    pub method: Method,

    pub bandgap: Option<f64>,
    pub electron_affinity: Option<f64>,
    #[serde(rename = "Ec")]
    pub ec: Option<f64>,
    #[serde(rename = "Ev")]
    pub ev: Option<f64>,
    pub mobility_e: Option<f64>,
    pub mobility_h: Option<f64>,
    #[serde(rename = "Nc")]
    pub nc: Option<f64>,
    #[serde(rename = "Nv")]
    pub nv: Option<f64>,
    pub relative_permittivity: Option<f64>,
    pub mdos_e: Option<f64>,
    pub mdos_h: Option<f64>,
    /// Kelvin.
    pub temperature: f64,

    pub chi_derived: bool,
    #[serde(rename = "Nc_derived")]
    pub nc_derived: bool,
    #[serde(rename = "Nv_derived")]
    pub nv_derived: bool,
}

impl ElectricalDataset {
    /// A fresh dataset with every measured field absent.
    pub fn new(source: impl Into<String>, method: Method) -> Self {
        Self {
            source: source.into(),
            source_doi: None,
            method,
            bandgap: None,
            electron_affinity: None,
            ec: None,
            ev: None,
            mobility_e: None,
            mobility_h: None,
            nc: None,
            nv: None,
            relative_permittivity: None,
            mdos_e: None,
            mdos_h: None,
            temperature: REFERENCE_TEMPERATURE_K,
            chi_derived: false,
            nc_derived: false,
            nv_derived: false,
        }
    }

    /// Every field a parser can fill, in declaration order.
    fn measured(&self) -> [Option<f64>; 11] {
        [
            self.bandgap,
            self.electron_affinity,
            self.ec,
            self.ev,
            self.mobility_e,
            self.mobility_h,
            self.nc,
            self.nv,
            self.relative_permittivity,
            self.mdos_e,
            self.mdos_h,
        ]
    }

    /// True when no parser-fillable field holds a value.
    pub fn has_no_fields(&self) -> bool {
        self.measured().iter().all(Option::is_none)
    }

    pub fn reference(&self) -> Option<String> {
        preferred_reference(self.source_doi.as_deref(), &self.source)
    }
}

fn preferred_reference(doi: Option<&str>, source: &str) -> Option<String> {
    doi.filter(|d| !d.is_empty())
        .or(Some(source).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Entries – the per-file aggregate records
// ---------------------------------------------------------------------------

/// Interpolated n/k at one configured wavelength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPoint {
    pub wavelength_nm: f64,
    pub n: Option<f64>,
    pub k: Option<f64>,
}

/// Curve sampled on a uniform wavelength grid; points outside the data are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResampledCurve {
    #[serde(deserialize_with = "nan_from_null")]
    pub wavelength: Vec<f64>,
    pub n: Vec<Option<f64>>,
    pub k: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalEntry {
    pub material: String,
    pub reference: Option<String>,
    pub datasets: Vec<OpticalDataset>,

    pub fixed_points: Vec<FixedPoint>,
    /// Verbatim copy of the promoted dataset's arrays.
    #[serde(deserialize_with = "nan_from_null")]
    pub wavelength_plot: Vec<f64>,
    #[serde(deserialize_with = "nan_from_null")]
    pub n_plot: Vec<f64>,
    #[serde(deserialize_with = "nan_from_null")]
    pub k_plot: Vec<f64>,
    pub resampled: Option<ResampledCurve>,
    pub has_any_spectrum: bool,
}

impl OpticalEntry {
    pub fn new(material: impl Into<String>, datasets: Vec<OpticalDataset>) -> Self {
        Self {
            material: material.into(),
            reference: None,
            datasets,
            fixed_points: Vec::new(),
            wavelength_plot: Vec::new(),
            n_plot: Vec::new(),
            k_plot: Vec::new(),
            resampled: None,
            has_any_spectrum: false,
        }
    }

    /// Fixed point for `wavelength_nm`, if that wavelength was configured.
    pub fn fixed_point(&self, wavelength_nm: f64) -> Option<&FixedPoint> {
        self.fixed_points
            .iter()
            .find(|p| p.wavelength_nm == wavelength_nm)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricalEntry {
    pub material: String,
    pub reference: Option<String>,
    pub datasets: Vec<ElectricalDataset>,

    #[serde(rename = "Eg")]
    pub eg: Option<f64>,
    pub chi: Option<f64>,
    pub mu_e: Option<f64>,
    pub mu_h: Option<f64>,
    #[serde(rename = "Nc_300K")]
    pub nc_300k: Option<f64>,
    #[serde(rename = "Nv_300K")]
    pub nv_300k: Option<f64>,
    pub eps_r: Option<f64>,
}

impl ElectricalEntry {
    pub fn new(material: impl Into<String>, datasets: Vec<ElectricalDataset>) -> Self {
        Self {
            material: material.into(),
            reference: None,
            datasets,
            eg: None,
            chi: None,
            mu_e: None,
            mu_h: None,
            nc_300k: None,
            nv_300k: None,
            eps_r: None,
        }
    }
}

/// One record per input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Optical(OpticalEntry),
    Electrical(ElectricalEntry),
}

impl Entry {
    pub fn material(&self) -> &str {
        match self {
            Entry::Optical(e) => &e.material,
            Entry::Electrical(e) => &e.material,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            Entry::Optical(e) => e.reference.as_deref(),
            Entry::Electrical(e) => e.reference.as_deref(),
        }
    }
}
