//! Safe piecewise-linear interpolation over possibly-invalid samples.
//!
//! Tabulated lab data often carries `NaN`/`inf` placeholders and arrives in
//! file order rather than sorted order. [`interp_safe`] masks out non-finite
//! samples, sorts what remains, and refuses to extrapolate.

/// Interpolate `ys(x0)` from the samples `(xs, ys)`.
///
/// Returns `None` when fewer than two finite `(x, y)` pairs exist, when `x0`
/// is not finite, or when `x0` lies outside `[min(x), max(x)]`. A query that
/// hits a sample exactly returns that sample's `y`.
///
/// Extra elements of the longer slice are ignored.
pub fn interp_safe(xs: &[f64], ys: &[f64], x0: f64) -> Option<f64> {
    if !x0.is_finite() {
        return None;
    }

    let mut pts: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    if pts.len() < 2 {
        return None;
    }

    // Stable: duplicate wavelengths keep their file order.
    pts.sort_by(|a, b| a.0.is_nan().cmp(&b.0.is_nan()).then(a.0.total_cmp(&b.0)));

    let lo = pts[0].0;
    let hi = pts[pts.len() - 1].0;
    if x0 < lo || x0 > hi {
        return None;
    }

    // First index whose x is >= x0; guaranteed in range by the domain check.
    let i = pts.partition_point(|&(x, _)| x < x0);
    let (x1, y1) = pts[i];
    if x1 == x0 {
        return Some(y1);
    }
    let (xa, ya) = pts[i - 1];
    let t = (x0 - xa) / (x1 - xa);
    Some(ya + t * (y1 - ya))
}
