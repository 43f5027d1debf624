use std::f64::consts::PI;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    let factor = factor.clamp(0.0, 1.0);
    // Written as a weighted sum so that both end points are reproduced exactly.
    let value = start * (1.0 - factor) + end * factor;
    value.clamp(start.min(end), start.max(end))
}

/// Piecewise-linear interpolation of `ys` over ascending `xs`.
///
/// Outside `[xs[0], xs[n-1]]` the boundary value is returned (no extrapolation).
/// Repeated abscissae are allowed; the segment to the right of the repeat wins.
/// Returns `None` when there are no points or the slices differ in length.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    let last = xs.len() - 1;
    if x <= xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[last] {
        return Some(ys[last]);
    }
    // First index with xs[i] > x; guaranteed to be in 1..=last here.
    let upper = xs.partition_point(|&v| v <= x);
    let lower = upper - 1;
    let factor = (x - xs[lower]) / (xs[upper] - xs[lower]);
    Some(lerp(ys[lower], ys[upper], factor))
}

/// Round to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Format a number the way the solvers read it: shortest round-trip representation,
/// never in exponent form, and without a negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
///
/// Returns `None` for fewer than two points or when all `x` are equal.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let (sxy, sxx) = xs
        .iter()
        .zip(ys)
        .fold((0.0, 0.0), |(sxy, sxx), (&x, &y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}
