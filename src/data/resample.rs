//! Fixed-wavelength optical points and plot arrays.
//!
//! n and k are interpolated independently: a row whose n is non-finite is
//! dropped from the n interpolation only, and still contributes to k.

use crate::config::{GridSpec, PipelineConfig};

use super::filter::{select_promoted, valid_indices};
use super::interp::interp_safe;
use super::model::{FixedPoint, OpticalDataset, OpticalEntry, ResampledCurve};

/// Interpolated `(n, k)` at `x0`; each channel is `None` outside the data.
pub fn interpolate_nk(ds: &OpticalDataset, x0: f64) -> (Option<f64>, Option<f64>) {
    (
        interp_safe(&ds.wavelength, &ds.n, x0),
        interp_safe(&ds.wavelength, &ds.k, x0),
    )
}

/// One [`FixedPoint`] per target, in target order.
pub fn fixed_points(ds: &OpticalDataset, targets_nm: &[f64]) -> Vec<FixedPoint> {
    targets_nm
        .iter()
        .map(|&t| {
            let (n, k) = interpolate_nk(ds, t);
            FixedPoint {
                wavelength_nm: t,
                n,
                k,
            }
        })
        .collect()
}

/// Sample `ds` on the uniform grid described by `grid`.
pub fn resample_curve(ds: &OpticalDataset, grid: &GridSpec) -> ResampledCurve {
    let wavelength = grid.wavelengths();
    let (n, k): (Vec<_>, Vec<_>) = wavelength.iter().map(|&x| interpolate_nk(ds, x)).unzip();
    ResampledCurve { wavelength, n, k }
}

/// Reset the entry's aggregate fields, then fill them from the first
/// structurally valid dataset.
pub fn normalize_optical(entry: &mut OpticalEntry, config: &PipelineConfig) {
    entry.wavelength_plot.clear();
    entry.n_plot.clear();
    entry.k_plot.clear();
    entry.reference = None;
    entry.resampled = None;
    entry.fixed_points = config
        .target_wavelengths_nm
        .iter()
        .map(|&t| FixedPoint {
            wavelength_nm: t,
            n: None,
            k: None,
        })
        .collect();

    entry.has_any_spectrum = !valid_indices(&entry.datasets).is_empty();

    let Some(ds) = select_promoted(&entry.datasets) else {
        log::warn!("{}: no structurally valid optical dataset", entry.material);
        return;
    };

    entry.wavelength_plot = ds.wavelength.clone();
    entry.n_plot = ds.n.clone();
    entry.k_plot = ds.k.clone();
    entry.reference = ds.reference();
    entry.fixed_points = fixed_points(ds, &config.target_wavelengths_nm);
    entry.resampled = config.resample.as_ref().map(|grid| resample_curve(ds, grid));

    log::info!(
        "Populated plot arrays, reference and fixed n/k points: material={}, n_points={}",
        entry.material,
        ds.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn zno() -> OpticalDataset {
        OpticalDataset::from_rows("ZnO_test", &[(400.0, 1.9, 0.01), (700.0, 2.1, 0.0)])
    }

    #[test]
    fn test_midpoint_scenario() {
        let (n, k) = interpolate_nk(&zno(), 550.0);
        assert_abs_diff_eq!(n.unwrap(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(k.unwrap(), 0.005, epsilon = 1e-12);
        assert_eq!(interpolate_nk(&zno(), 800.0), (None, None));
    }

    #[test]
    fn test_channels_masked_independently() {
        let mut ds = OpticalDataset::from_rows(
            "x",
            &[(400.0, 1.0, 0.0), (500.0, f64::NAN, 0.2), (600.0, 3.0, 0.4)],
        );
        let (n, k) = interpolate_nk(&ds, 500.0);
        assert_abs_diff_eq!(n.unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(k, Some(0.2));

        ds.k[2] = f64::NAN;
        let (n, k) = interpolate_nk(&ds, 600.0);
        assert_eq!(n, Some(3.0));
        assert_eq!(k, None);
    }

    #[test]
    fn test_normalize_populates_entry() {
        let mut entry = OpticalEntry::new("ZnO", vec![zno()]);
        normalize_optical(&mut entry, &PipelineConfig::default());

        assert!(entry.has_any_spectrum);
        assert_eq!(entry.wavelength_plot, vec![400.0, 700.0]);
        assert_eq!(entry.n_plot, vec![1.9, 2.1]);
        assert_eq!(entry.k_plot, vec![0.01, 0.0]);
        assert_eq!(entry.reference.as_deref(), Some("ZnO_test"));

        assert_eq!(entry.fixed_points.len(), 5);
        assert_eq!(entry.fixed_point(400.0).unwrap().n, Some(1.9));
        assert_eq!(entry.fixed_point(700.0).unwrap().k, Some(0.0));
        let far = entry.fixed_point(1200.0).unwrap();
        assert_eq!((far.n, far.k), (None, None));
        assert!(entry.resampled.is_none());
    }

    #[test]
    fn test_normalize_without_valid_dataset() {
        let mut broken = zno();
        broken.k.clear();
        let mut entry = OpticalEntry::new("ZnO", vec![broken]);
        entry.reference = Some("stale".into());
        normalize_optical(&mut entry, &PipelineConfig::default());

        assert!(!entry.has_any_spectrum);
        assert!(entry.wavelength_plot.is_empty());
        assert_eq!(entry.reference, None);
        assert!(entry.fixed_points.iter().all(|p| p.n.is_none() && p.k.is_none()));
    }

    #[test]
    fn test_resampled_curve() {
        let config = PipelineConfig {
            resample: Some(GridSpec {
                range: [300.0, 700.0],
                points: 5,
            }),
            ..PipelineConfig::default()
        };
        let mut entry = OpticalEntry::new("ZnO", vec![zno()]);
        normalize_optical(&mut entry, &config);

        let curve = entry.resampled.unwrap();
        assert_eq!(curve.wavelength, vec![300.0, 400.0, 500.0, 600.0, 700.0]);
        assert_eq!(curve.n[0], None);
        assert_eq!(curve.n[1], Some(1.9));
        assert_abs_diff_eq!(curve.n[3].unwrap(), 2.0333333333333333, epsilon = 1e-12);
        assert_eq!(curve.k[4], Some(0.0));
    }
}
