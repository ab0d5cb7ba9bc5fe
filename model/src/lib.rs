//! Dual-frequency two-ray propagation bounds and secrecy rates.
//!
//! The channel is the classic two-ray model: a direct line-of-sight path and
//! a single reflection off flat ground (reflection coefficient −1). A
//! transmitter splits its power over two carriers, _f_ and _f + Δf_, so that
//! the interference patterns of the two carriers partially fill each other's
//! nulls. For a legitimate receiver (Bob) somewhere within a known distance
//! range, we bound the received power from below; for an eavesdropper (Eve)
//! at least some minimum distance away, we bound it from above. The spacing
//! _Δf_ maximising Bob's worst case then yields the worst-case secrecy rate,
//! also called the zero-outage secrecy capacity (ZOSC).
//!
//! Everything here is a pure function of its inputs. Physical constants and
//! other defaults live in [`Settings`], which is passed explicitly.
//!
//! The modules build on each other, leaf first:
//!
//!  - [`formulae`]: path geometry and general numeric helpers, including the
//!    bounded scalar minimiser.
//!  - [`single`]: single-carrier power and critical distances.
//!  - [`dual`]: dual-carrier envelopes, Eve's bound, and the worst-case bound
//!    over a distance range.
//!  - [`optimise`]: the optimal frequency spacing.
//!  - [`rates`]: achievable and secrecy rates, plus quick predicates.
//!  - [`sweep`]: elementwise variants over distance or spacing grids.
//!
//! ```
//! use tworay_model::{dual, Bound, Settings};
//!
//! let settings = Settings::default();
//! let lower = dual::sum_power_envelope(25.0, 100e6, 2.4e9, (10.0, 1.5), Bound::Lower, &settings);
//! let upper = dual::sum_power_envelope(25.0, 100e6, 2.4e9, (10.0, 1.5), Bound::Upper, &settings);
//! assert!(0.0 < lower && lower <= upper);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::many_single_char_names)]

pub mod dual;
pub mod formulae;
pub mod optimise;
pub mod rates;
pub mod single;
pub mod sweep;

pub use optimise::{find_optimal_delta_freq, OptimalSpacing};
pub use rates::{Scenario, SecrecyRate};

/// Speed of light in vacuum (metres per second).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Boltzmann constant (joules per kelvin).
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Standard noise temperature (kelvin).
const REFERENCE_TEMPERATURE: f64 = 290.0;

/// Errors raised by the model.
///
/// Numerical corner cases (no critical distance in range, flat objectives)
/// are not errors: they are handled with sentinels and approximate results.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid distance range: maximum {max} m must be larger than minimum {min} m")]
    InvalidRange { min: f64, max: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Physical constants and link parameters shared by all computations.
///
/// The defaults describe unit transmit power, isotropic antennas, an even
/// power split between the two carriers, and thermal noise at 290 K.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Propagation speed of the wave (metres per second).
    pub speed_of_light: f64,

    /// Total transmit power (watts).
    pub tx_power: f64,

    /// Antenna gain products for the (line-of-sight, reflected) paths.
    pub gains: (f64, f64),

    /// Fraction of the transmit power on the first carrier, in `[0, 1]`.
    ///
    /// Often noted θ.
    pub split: f64,

    /// Noise power spectral density at the receivers (watts per hertz).
    pub noise_density: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_of_light: SPEED_OF_LIGHT,
            tx_power: 1.0,
            gains: (1.0, 1.0),
            split: 0.5,
            noise_density: BOLTZMANN * REFERENCE_TEMPERATURE,
        }
    }
}

/// Which side of the interference envelope to compute.
///
/// The lower bound is the pessimistic value (worst case for the legitimate
/// receiver), the upper bound the optimistic one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl Bound {
    /// Sign applied to the interference cross term.
    pub fn sign(self) -> f64 {
        match self {
            Bound::Lower => -1.0,
            Bound::Upper => 1.0,
        }
    }

    /// Keeps the more extreme of two values in the direction of the bound.
    pub fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            Bound::Lower => a.min(b),
            Bound::Upper => a.max(b),
        }
    }

    /// Neutral element of [`Bound::combine`]: never wins a combination.
    pub fn sentinel(self) -> f64 {
        match self {
            Bound::Lower => f64::INFINITY,
            Bound::Upper => f64::NEG_INFINITY,
        }
    }
}

/// Checks that a distance interval is well-formed.
pub(crate) fn check_range(range: (f64, f64)) -> Result<()> {
    let (min, max) = range;
    if max > min {
        Ok(())
    } else {
        Err(Error::InvalidRange { min, max })
    }
}
