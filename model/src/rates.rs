//! Achievable rates and worst-case secrecy rates.
//!
//! The worst-case secrecy rate, or zero-outage secrecy capacity (ZOSC), is
//! the rate the legitimate receiver is guaranteed anywhere in its distance
//! range, minus the best rate the eavesdropper can get from its minimum
//! distance onwards, clipped at zero.

use crate::dual::{
    bound_rec_power_two_freq, delta_freq_peak_approximation, power_eve, sum_power_envelope,
};
use crate::formulae::{length_los, length_ref, to_decibel};
use crate::optimise::find_optimal_delta_freq;
use crate::{Bound, Result, Settings};
use tracing::{debug, info};

/// Geometry and link parameters of a Bob/Eve scenario.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scenario {
    /// Distance range (min, max) of the legitimate receiver, in metres.
    pub bob_range: (f64, f64),

    /// Minimum distance of the eavesdropper, in metres.
    pub eve_min_distance: f64,

    /// First carrier frequency (Hz).
    pub freq: f64,

    /// Bandwidth (Hz).
    pub bandwidth: f64,

    /// Transmitter antenna height (metres).
    pub tx_height: f64,

    /// Receiver antenna heights (Bob, Eve), in metres.
    pub rx_heights: (f64, f64),
}

impl Scenario {
    /// Heights (tx, rx) for the legitimate link.
    pub fn bob_heights(&self) -> (f64, f64) {
        (self.tx_height, self.rx_heights.0)
    }

    /// Heights (tx, rx) for the eavesdropper's link.
    pub fn eve_heights(&self) -> (f64, f64) {
        (self.tx_height, self.rx_heights.1)
    }
}

/// Outcome of [`max_worst_case_sec_rate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecrecyRate {
    /// Worst-case secrecy rate (bit/s), never negative.
    pub rate: f64,

    /// Frequency spacing the rate was computed at (Hz).
    pub delta_freq: f64,

    /// Whether that spacing is the balance point found by the optimiser,
    /// as in [`OptimalSpacing::exact`](crate::OptimalSpacing::exact).
    ///
    /// When false the rate is still a valid worst case, for a spacing that
    /// may not be the best one.
    pub exact: bool,
}

/// Shannon rate (bit/s) at a received power over white noise.
///
/// _R = B log2(1 + P / (N₀ B))_
pub fn achievable_rate(power: f64, bandwidth: f64, noise_density: f64) -> f64 {
    bandwidth * (power / (noise_density * bandwidth)).ln_1p() / std::f64::consts::LN_2
}

/// Received power needed for a rate: the inverse of [`achievable_rate`].
pub fn power_for_rate(rate: f64, bandwidth: f64, noise_density: f64) -> f64 {
    (rate / bandwidth * std::f64::consts::LN_2).exp_m1() * noise_density * bandwidth
}

/// Best rate the eavesdropper can achieve from `distance` onwards.
///
/// Uses [`power_eve`] at zero spacing, which bounds Eve's power for any
/// spacing.
pub fn worst_case_rate_eve(
    distance: f64,
    freq: f64,
    bandwidth: f64,
    heights: (f64, f64),
    settings: &Settings,
) -> f64 {
    let power = power_eve(distance, 0.0, freq, heights, settings);
    achievable_rate(power, bandwidth, settings.noise_density)
}

/// Worst-case secrecy rate (bit/s) at the optimal frequency spacing.
///
/// The rate is never negative. The result also carries the spacing used and
/// whether the optimiser found its balance point, so approximate spacings
/// can be told apart.
///
/// ## Errors
///
/// [`Error::InvalidRange`](crate::Error::InvalidRange) if Bob's range is
/// empty.
pub fn max_worst_case_sec_rate(scenario: &Scenario, settings: &Settings) -> Result<SecrecyRate> {
    let rate_eve = worst_case_rate_eve(
        scenario.eve_min_distance,
        scenario.freq,
        scenario.bandwidth,
        scenario.eve_heights(),
        settings,
    );

    let (freq, range, heights) = (scenario.freq, scenario.bob_range, scenario.bob_heights());
    let opt = find_optimal_delta_freq(range, freq, heights, settings)?;
    let power_bob =
        bound_rec_power_two_freq(range, opt.delta_freq, freq, heights, Bound::Lower, settings);
    let rate_bob = achievable_rate(power_bob, scenario.bandwidth, settings.noise_density);
    debug!(rate_bob, rate_eve, ?opt, "worst-case rates");

    Ok(SecrecyRate {
        rate: (rate_bob - rate_eve).max(0.0),
        delta_freq: opt.delta_freq,
        exact: opt.exact,
    })
}

/// Quick check whether the worst-case secrecy rate is probably zero.
///
/// Compares the distance-only part of the mean received power,
/// _G_los/d_los² + G_ref/d_ref²_, at Bob's farthest point and at Eve's
/// nearest. When Eve is at least as close, on average, no spacing helps.
/// A heuristic: it ignores the interference terms.
pub fn is_worst_case_sec_rate_zero(scenario: &Scenario, settings: &Settings) -> bool {
    let (gain_los, gain_ref) = settings.gains;
    let mean_level = |d: f64, heights: (f64, f64)| {
        gain_los / length_los(d, heights).powi(2) + gain_ref / length_ref(d, heights).powi(2)
    };

    let bob = mean_level(scenario.bob_range.1, scenario.bob_heights());
    let eve = mean_level(scenario.eve_min_distance, scenario.eve_heights());
    info!(bob = %format!("{:E}", bob), eve = %format!("{:E}", eve), "path levels");

    bob <= eve
}

/// Quick check whether the worst-case secrecy rate is certainly positive.
///
/// Takes the spacing that puts the envelope's first peak at Bob's nearest
/// point and compares the lower envelope at Bob's farthest point with Eve's
/// bound. This only looks at Bob's far end, so callers should treat a
/// `false` as inconclusive.
pub fn is_zosc_definitely_positive(scenario: &Scenario, settings: &Settings) -> bool {
    let (d_min_bob, d_max_bob) = scenario.bob_range;
    let (freq, bob_heights) = (scenario.freq, scenario.bob_heights());
    let (df_pi, _) = delta_freq_peak_approximation(d_min_bob, bob_heights, settings.speed_of_light);

    let bob = sum_power_envelope(d_max_bob, df_pi, freq, bob_heights, Bound::Lower, settings);
    let d_min_eve = scenario.eve_min_distance;
    let eve = power_eve(d_min_eve, 0.0, freq, scenario.eve_heights(), settings);

    let (bob_db, eve_db) = (rounded_db(bob), rounded_db(eve));
    info!(bob_db, eve_db, "power bounds");

    bob > eve
}

fn rounded_db(power: f64) -> f64 {
    (to_decibel(power) * 10.0).round() / 10.0
}
