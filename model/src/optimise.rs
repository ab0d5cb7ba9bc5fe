//! Search for the frequency spacing maximising the worst-case power.
//!
//! Over a distance range `[d_min, d_max]`, the worst case of the lower
//! envelope is either at the far end, or at a dip inside the range (where
//! the slow phase reaches 2π), or at the near end. Widening the spacing
//! moves the envelope's first peak (slow phase π) outwards: it lifts the far
//! end, but pulls a dip into the range. The optimum balances the power at
//! the far end against that competing dip (or the near end, when no dip is
//! in range yet).

use crate::dual::{delta_freq_peak_approximation, sum_power_envelope};
use crate::formulae::{minimise_bounded, MinimiseOptions};
use crate::single::crit_dist;
use crate::{check_range, Bound, Result, Settings};
use tracing::{debug, warn};

/// Outcome of [`find_optimal_delta_freq`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimalSpacing {
    /// The frequency spacing (Hz), always finite and positive.
    pub delta_freq: f64,

    /// Whether this is the balance point found by the minimiser.
    ///
    /// This is false when the envelope at the far end never catches up with
    /// the competing value and the π-peak spacing of the far end is returned
    /// as an approximation, or when the minimiser ran out of iterations.
    pub exact: bool,
}

/// Lower envelope at the first dip (slow phase 2π) for a given spacing.
///
/// Infinite when the spacing is too small for any dip to exist, so it never
/// looks like the worse side.
fn power_at_first_dip(delta_freq: f64, freq: f64, heights: (f64, f64), settings: &Settings) -> f64 {
    match crit_dist(delta_freq, heights, 1, settings.speed_of_light) {
        Some(d) => sum_power_envelope(d, delta_freq, freq, heights, Bound::Lower, settings),
        None => f64::INFINITY,
    }
}

/// Finds the frequency spacing maximising the legitimate receiver's
/// worst-case power over the distances `[d_min, d_max]`.
///
/// See [`find_optimal_delta_freq_with`] for minimiser options.
///
/// ## Errors
///
/// [`Error::InvalidRange`](crate::Error::InvalidRange) unless
/// `d_max > d_min`.
pub fn find_optimal_delta_freq(
    range: (f64, f64),
    freq: f64,
    heights: (f64, f64),
    settings: &Settings,
) -> Result<OptimalSpacing> {
    find_optimal_delta_freq_with(range, freq, heights, settings, MinimiseOptions::default())
}

/// Same as [`find_optimal_delta_freq`], with explicit minimiser options.
///
/// The search runs over _log10(Δf)_, as the relevant spacings span several
/// decades, and starts from the middle of the bracket so results are
/// reproducible.
pub fn find_optimal_delta_freq_with(
    range: (f64, f64),
    freq: f64,
    heights: (f64, f64),
    settings: &Settings,
    options: MinimiseOptions,
) -> Result<OptimalSpacing> {
    check_range(range)?;
    let (d_min, d_max) = range;
    let c = settings.speed_of_light;

    let (df_pi_dmin, df_2pi_dmin) = delta_freq_peak_approximation(d_min, heights, c);
    let (df_pi_dmax, df_2pi_dmax) = delta_freq_peak_approximation(d_max, heights, c);
    debug!(df_pi_dmin, df_2pi_dmin, "near end seeds");
    debug!(df_pi_dmax, df_2pi_dmax, "far end seeds");

    let envelope = |d, df| sum_power_envelope(d, df, freq, heights, Bound::Lower, settings);

    // far end at its peak, against whatever competes with it at that spacing
    let target = envelope(d_max, df_pi_dmax);
    let reference = if df_pi_dmax > df_2pi_dmin {
        power_at_first_dip(df_pi_dmax, freq, heights, settings)
    } else {
        envelope(d_min, df_pi_dmax)
    };

    if target < reference {
        warn!(
            delta_freq = df_pi_dmax,
            "far end never reaches the competing power, using the peak approximation"
        );
        return Ok(OptimalSpacing {
            delta_freq: df_pi_dmax,
            exact: false,
        });
    }

    let dip_at_near_end = envelope(d_min, df_2pi_dmin) < envelope(d_max, df_2pi_dmin);
    let bounds = if dip_at_near_end {
        (df_pi_dmin.log10(), df_2pi_dmin.log10())
    } else {
        (df_2pi_dmin.log10(), df_2pi_dmax.log10())
    };
    debug!(?bounds, dip_at_near_end, "searching log10 spacing");

    let competing = |df: f64| {
        if dip_at_near_end {
            envelope(d_min, df)
        } else {
            power_at_first_dip(df, freq, heights, settings)
        }
    };
    let objective = |x: f64| {
        let df = 10f64.powf(x);
        (envelope(d_max, df).ln() - competing(df).ln()).abs()
    };

    let start = 0.5 * (bounds.0 + bounds.1);
    let min = minimise_bounded(objective, bounds, start, options);
    if !min.converged {
        warn!(
            iterations = min.iterations,
            residual = min.value,
            "spacing search did not converge, result is approximate"
        );
    }

    Ok(OptimalSpacing {
        delta_freq: 10f64.powf(min.x),
        exact: min.converged,
    })
}
