//! Single-carrier two-ray power and critical distances.

use crate::formulae::{length_los, length_ref, path_difference};
use crate::Settings;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Received power (watts) of a single carrier over the two-ray channel.
///
/// The field at the receiver is the sum of the direct wave and the ground
/// reflected wave, the latter inverted (reflection coefficient −1) and
/// delayed by the path difference:
///
/// _P = P_t (c / 2ω)² | √G_los / d_los − √G_ref e^(−jωΔd/c) / d_ref |²_
///
/// which expands to the familiar
/// _P_t (c / 2ω)² (G_los/d_los² + G_ref/d_ref²
/// − 2√(G_los G_ref) cos(ωΔd/c) / (d_los d_ref))_.
pub fn rec_power(distance: f64, freq: f64, heights: (f64, f64), settings: &Settings) -> f64 {
    let c = settings.speed_of_light;
    let omega = 2.0 * PI * freq;
    let phase = omega / c * path_difference(distance, heights);

    let direct = settings.gains.0.sqrt() / length_los(distance, heights);
    let reflected = settings.gains.1.sqrt() / length_ref(distance, heights);
    let field = Complex64::new(direct, 0.0) - Complex64::new(0.0, -phase).exp() * reflected;

    settings.tx_power * (c / (2.0 * omega)).powi(2) * field.norm_sqr()
}

/// Distance at which the path difference produces a phase of _2πk_ for a
/// frequency (or frequency spacing) `delta_freq`.
///
/// For a single carrier (`delta_freq` being the carrier itself) these are
/// the destructive nulls of the two-ray pattern. For a pair of carriers
/// (`delta_freq` being their spacing) these are where the two interference
/// patterns line up, which is where the lower envelope dips and the upper
/// envelope peaks.
///
/// With _x = kc / Δf_, the condition _d_ref − d_los = x_ together with
/// _d_ref² − d_los² = 4 h_tx h_rx_ gives _d_los = (4 h_tx h_rx / x − x) / 2_,
/// from which the horizontal distance follows. As the path difference is
/// monotonic in the distance, there is at most one such distance per
/// harmonic; there is none when the required path difference exceeds what
/// the geometry allows (_2 min(h_tx, h_rx)_), or for `k == 0` or a zero
/// spacing.
pub fn crit_dist(
    delta_freq: f64,
    heights: (f64, f64),
    k: u32,
    speed_of_light: f64,
) -> Option<f64> {
    if k == 0 || delta_freq <= 0.0 {
        return None;
    }

    let x = f64::from(k) * speed_of_light / delta_freq;
    let los = (4.0 * heights.0 * heights.1 / x - x) / 2.0;
    let squared = los * los - (heights.0 - heights.1).powi(2);

    if los > 0.0 && squared > 0.0 {
        Some(squared.sqrt())
    } else {
        None
    }
}

/// All critical distances (any harmonic _k ≥ 1_) inside `[min, max]`.
///
/// Sorted by increasing distance, which is decreasing harmonic.
pub fn crit_dists_within(
    delta_freq: f64,
    heights: (f64, f64),
    range: (f64, f64),
    speed_of_light: f64,
) -> Vec<f64> {
    if delta_freq <= 0.0 {
        return Vec::new();
    }

    // harmonic index at a distance: the phase in units of 2π
    let harmonic = |d: f64| delta_freq * path_difference(d, heights) / speed_of_light;
    let first = harmonic(range.1).ceil().max(1.0) as u32;
    let last = harmonic(range.0).floor() as u32;

    (first..=last)
        .rev()
        .filter_map(|k| crit_dist(delta_freq, heights, k, speed_of_light))
        .filter(|d| *d >= range.0 && *d <= range.1)
        .collect()
}

/// Minimum single-carrier power over the distances `[min, max]`.
///
/// The minimum is either at one of the ends or at one of the nulls inside the
/// range.
pub fn min_rec_power_single_freq(
    range: (f64, f64),
    freq: f64,
    heights: (f64, f64),
    settings: &Settings,
) -> f64 {
    let power = |d: f64| rec_power(d, freq, heights, settings);

    crit_dists_within(freq, heights, range, settings.speed_of_light)
        .into_iter()
        .map(power)
        .fold(power(range.0).min(power(range.1)), f64::min)
}
