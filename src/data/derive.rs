//! Derivation of physically related quantities that were not measured.
//!
//! Each rule fills a field only when it is absent or non-finite, and records
//! whether it fired in the dataset's `*_derived` flag:
//!
//! * electron affinity $\chi = -E_c$, or $\chi = -(E_v + E_g)$ without $E_c$
//! * effective densities of states $N_c$, $N_v$ from DOS effective masses,
//!   $N = 2\,(2\pi m k_B T / h^2)^{3/2}$, evaluated at 300 K
//!
//! Promotion then copies the selected dataset's scalars onto the entry.

use super::filter::select_promoted;
use super::model::{
    is_present, present, ElectricalDataset, ElectricalEntry, REFERENCE_TEMPERATURE_K,
};

/// Boltzmann constant (J/K).
pub const K_B: f64 = 1.380649e-23;
/// Planck constant (J·s).
pub const PLANCK_H: f64 = 6.62607015e-34;
/// Free-electron mass (kg).
pub const ELECTRON_MASS: f64 = 9.1093837015e-31;

/// 3-D effective density of states in cm⁻³.
///
/// `mdos_rel` is the DOS effective mass in units of the free-electron mass.
/// Returns `None` when the result is not a finite number (e.g. negative mass).
pub fn effective_dos_cm3(mdos_rel: f64, temperature_k: f64) -> Option<f64> {
    let m = mdos_rel * ELECTRON_MASS;
    let per_m3 = 2.0
        * (2.0 * std::f64::consts::PI * m * K_B * temperature_k / (PLANCK_H * PLANCK_H)).powf(1.5);
    let per_cm3 = per_m3 / 1e6;
    per_cm3.is_finite().then_some(per_cm3)
}

/// Electron affinity from vacuum-referenced band edges (eV).
pub fn electron_affinity(ec: Option<f64>, ev: Option<f64>, eg: Option<f64>) -> Option<f64> {
    if let Some(ec) = present(ec) {
        return Some(-ec);
    }
    match (present(ev), present(eg)) {
        (Some(ev), Some(eg)) => Some(-(ev + eg)),
        _ => None,
    }
}

/// Fill derivable fields of `ds` in place. Present, finite values are kept.
pub fn derive_dataset(ds: &mut ElectricalDataset) {
    ds.chi_derived = false;
    if !is_present(ds.electron_affinity) {
        if let Some(chi) = electron_affinity(ds.ec, ds.ev, ds.bandgap) {
            ds.electron_affinity = Some(chi);
            ds.chi_derived = true;
        }
    }

    let (nc, nc_derived) = derive_dos(ds.nc, ds.mdos_e);
    ds.nc = nc;
    ds.nc_derived = nc_derived;

    let (nv, nv_derived) = derive_dos(ds.nv, ds.mdos_h);
    ds.nv = nv;
    ds.nv_derived = nv_derived;

    log::debug!(
        "{}: chi_derived={}, Nc_derived={}, Nv_derived={}",
        ds.source,
        ds.chi_derived,
        ds.nc_derived,
        ds.nv_derived
    );
}

fn derive_dos(raw: Option<f64>, mdos: Option<f64>) -> (Option<f64>, bool) {
    if is_present(raw) {
        return (raw, false);
    }
    match present(mdos).and_then(|m| effective_dos_cm3(m, REFERENCE_TEMPERATURE_K)) {
        Some(n) => (Some(n), true),
        None => (raw, false),
    }
}

/// Derive every dataset, then promote the selected one onto the entry.
///
/// Entry-level scalars are reset first, so an entry whose datasets yield
/// nothing ends up with every scalar absent.
pub fn normalize_electrical(entry: &mut ElectricalEntry) {
    entry.reference = None;
    entry.eg = None;
    entry.chi = None;
    entry.mu_e = None;
    entry.mu_h = None;
    entry.nc_300k = None;
    entry.nv_300k = None;
    entry.eps_r = None;

    for ds in &mut entry.datasets {
        derive_dataset(ds);
    }

    let Some(ds) = select_promoted(&entry.datasets) else {
        log::warn!("{}: no electrical dataset to promote", entry.material);
        return;
    };

    entry.reference = ds.reference();
    entry.eg = ds.bandgap;
    entry.chi = ds.electron_affinity;
    entry.mu_e = ds.mobility_e;
    entry.mu_h = ds.mobility_h;
    entry.nc_300k = ds.nc;
    entry.nv_300k = ds.nv;
    entry.eps_r = ds.relative_permittivity;

    log::info!("Electrical normalized/promoted: material={}", entry.material);
}
