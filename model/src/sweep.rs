//! Elementwise evaluation over grids of distances or spacings.
//!
//! Each function maps its scalar counterpart over a slice, returning one value
//! per input in the same order.

use crate::dual::{bound_rec_power_two_freq, power_eve, sum_power, sum_power_envelope};
use crate::rates::achievable_rate;
use crate::single::rec_power;
use crate::{Bound, Settings};

/// [`rec_power`] at each distance.
pub fn rec_power_over_distance(
    distances: &[f64],
    freq: f64,
    heights: (f64, f64),
    settings: &Settings,
) -> Vec<f64> {
    let power = |d| rec_power(d, freq, heights, settings);
    distances.iter().copied().map(power).collect()
}

/// [`sum_power`] at each distance.
pub fn sum_power_over_distance(
    distances: &[f64],
    delta_freq: f64,
    freq: f64,
    heights: (f64, f64),
    settings: &Settings,
) -> Vec<f64> {
    let power = |d| sum_power(d, delta_freq, freq, heights, settings);
    distances.iter().copied().map(power).collect()
}

/// [`sum_power_envelope`] at each distance.
pub fn envelope_over_distance(
    distances: &[f64],
    delta_freq: f64,
    freq: f64,
    heights: (f64, f64),
    bound: Bound,
    settings: &Settings,
) -> Vec<f64> {
    let envelope = |d| sum_power_envelope(d, delta_freq, freq, heights, bound, settings);
    distances.iter().copied().map(envelope).collect()
}

/// [`power_eve`] at each distance.
pub fn power_eve_over_distance(
    distances: &[f64],
    delta_freq: f64,
    freq: f64,
    heights: (f64, f64),
    settings: &Settings,
) -> Vec<f64> {
    let power = |d| power_eve(d, delta_freq, freq, heights, settings);
    distances.iter().copied().map(power).collect()
}

/// [`power_eve`] at each spacing.
pub fn power_eve_over_spacing(
    distance: f64,
    spacings: &[f64],
    freq: f64,
    heights: (f64, f64),
    settings: &Settings,
) -> Vec<f64> {
    let power = |df| power_eve(distance, df, freq, heights, settings);
    spacings.iter().copied().map(power).collect()
}

/// [`bound_rec_power_two_freq`] at each spacing.
pub fn bound_over_spacing(
    range: (f64, f64),
    spacings: &[f64],
    freq: f64,
    heights: (f64, f64),
    bound: Bound,
    settings: &Settings,
) -> Vec<f64> {
    let worst = |df| bound_rec_power_two_freq(range, df, freq, heights, bound, settings);
    spacings.iter().copied().map(worst).collect()
}

/// [`achievable_rate`] of each power.
pub fn rates_of(powers: &[f64], bandwidth: f64, settings: &Settings) -> Vec<f64> {
    let rate = |p| achievable_rate(p, bandwidth, settings.noise_density);
    powers.iter().copied().map(rate).collect()
}
