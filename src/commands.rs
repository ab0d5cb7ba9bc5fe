//! Parameter sweeps behind each subcommand.
//!
//! Every command logs its headline numbers and, with `--export`, writes the
//! series it computed. Powers are exported in dB, rates in bit/s unless noted.

use crate::export::{export_results, Column};
use crate::Output;
use anyhow::{Context, Result};
use clap::Args;
use model::dual::{bound_rec_power_two_freq, sum_power_envelope};
use model::formulae::{logspace, to_decibel};
use model::rates::{
    achievable_rate, is_worst_case_sec_rate_zero, is_zosc_definitely_positive,
    max_worst_case_sec_rate, worst_case_rate_eve,
};
use model::single::min_rec_power_single_freq;
use model::sweep;
use model::{find_optimal_delta_freq, Bound, Scenario, Settings};
use tracing::{debug, info};

fn decibels(powers: &[f64]) -> Vec<f64> {
    powers.iter().copied().map(to_decibel).collect()
}

fn settings_with_split(theta: f64) -> Settings {
    Settings {
        split: theta,
        ..Settings::default()
    }
}

#[derive(Debug, Args)]
pub struct EnvelopeArgs {
    /// Transmitter height (m)
    #[arg(short = 't', long, default_value_t = 10.0)]
    h_tx: f64,

    /// Receiver height (m)
    #[arg(short = 'r', long, default_value_t = 1.5)]
    h_rx: f64,

    /// First carrier frequency (Hz)
    #[arg(short, long, default_value_t = 2.4e9)]
    freq: f64,

    /// Frequency spacing (Hz)
    #[arg(short, long, default_value_t = 100e6)]
    delta_freq: f64,

    /// Fraction of power on the first carrier
    #[arg(long, default_value_t = 0.5)]
    theta: f64,

    #[command(flatten)]
    output: Output,
}

/// Received power over distance at a fixed spacing, with its envelopes and
/// the eavesdropper's bound.
pub fn envelope(args: &EnvelopeArgs) -> Result<()> {
    let settings = settings_with_split(args.theta);
    let (df, freq) = (args.delta_freq, args.freq);
    let heights = (args.h_tx, args.h_rx);
    let grid = logspace(0.0, 3.0, 2000);

    let exact = sweep::sum_power_over_distance(&grid, df, freq, heights, &settings);
    let lower = sweep::envelope_over_distance(&grid, df, freq, heights, Bound::Lower, &settings);
    let upper = sweep::envelope_over_distance(&grid, df, freq, heights, Bound::Upper, &settings);
    let eve = sweep::power_eve_over_distance(&grid, df, freq, heights, &settings);

    let deepest = lower
        .iter()
        .zip(&exact)
        .map(|(l, p)| to_decibel(*p) - to_decibel(*l))
        .fold(f64::INFINITY, f64::min);
    info!(margin_db = deepest, "margin to the lower envelope");

    if args.output.export {
        debug!("exporting envelope results");
        let name = format!(
            "power-{:E}-df{:E}-t{:.1}-r{:.1}.dat",
            args.freq, args.delta_freq, args.h_tx, args.h_rx
        );
        export_results(
            &args.output.output_dir.join(name),
            &[
                Column::new("distance", grid),
                Column::new("bob", decibels(&exact)),
                Column::new("eve", decibels(&eve)),
                Column::new("lower", decibels(&lower)),
                Column::new("upper", decibels(&upper)),
            ],
        )?;
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct OptimalArgs {
    /// Transmitter height (m)
    #[arg(short = 't', long, default_value_t = 10.0)]
    h_tx: f64,

    /// Receiver height (m)
    #[arg(short = 'r', long, default_value_t = 1.0)]
    h_rx: f64,

    /// First carrier frequency (Hz)
    #[arg(short, long, default_value_t = 2.4e9)]
    freq: f64,

    /// Minimum distance of the receiver (m)
    #[arg(long, default_value_t = 10.0)]
    d_min: f64,

    /// Maximum distance of the receiver (m)
    #[arg(long, default_value_t = 100.0)]
    d_max: f64,

    /// Fraction of power on the first carrier
    #[arg(long, default_value_t = 0.5)]
    theta: f64,

    #[command(flatten)]
    output: Output,
}

/// Optimal spacing for a distance range, compared with a single carrier.
pub fn optimal(args: &OptimalArgs) -> Result<()> {
    let settings = settings_with_split(args.theta);
    let freq = args.freq;
    let heights = (args.h_tx, args.h_rx);
    let range = (args.d_min, args.d_max);

    let min_single = min_rec_power_single_freq(range, freq, heights, &settings);
    let single_db = to_decibel(min_single);
    info!("Minimum power single frequency: {:.2} dB", single_db);

    let opt = find_optimal_delta_freq(range, freq, heights, &settings)
        .context("searching the optimal spacing")?;
    let (df, exact) = (opt.delta_freq, opt.exact);
    info!(exact, "Optimal frequency spacing: {:E} Hz", df);

    let min_two = bound_rec_power_two_freq(range, df, freq, heights, Bound::Lower, &settings);
    let min_far = sum_power_envelope(args.d_max, df, freq, heights, Bound::Lower, &settings);
    let (two_db, far_db) = (to_decibel(min_two), to_decibel(min_far));
    info!(far_db, "Minimum power two frequencies: {:.2} dB", two_db);

    if args.output.export {
        let grid = logspace(args.d_min.log10() - 0.1, args.d_max.log10() + 0.1, 3000);
        let single = sweep::rec_power_over_distance(&grid, freq, heights, &settings);
        let lower =
            sweep::envelope_over_distance(&grid, df, freq, heights, Bound::Lower, &settings);
        let exact = sweep::sum_power_over_distance(&grid, df, freq, heights, &settings);

        debug!("exporting optimal spacing results");
        let name = format!(
            "power_opt_freq-{:E}-t{:.1}-r{:.1}-dmin{:.1}-dmax{:.1}.dat",
            args.freq, args.h_tx, args.h_rx, args.d_min, args.d_max
        );
        export_results(
            &args.output.output_dir.join(name),
            &[
                Column::new("distance", grid),
                Column::new("powerSingle", decibels(&single)),
                Column::new("powerOpt", decibels(&lower)),
                Column::new("powerOptExact", decibels(&exact)),
            ],
        )?;
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct EveRateArgs {
    /// Transmitter height (m)
    #[arg(short = 't', long, default_value_t = 10.0)]
    h_tx: f64,

    /// Eavesdropper height (m)
    #[arg(short = 'r', long, default_value_t = 1.5)]
    h_rx: f64,

    /// First carrier frequencies (Hz), one series each
    #[arg(short, long, num_args = 1.., default_values_t = vec![2.4e9])]
    freq: Vec<f64>,

    /// Bandwidth (Hz)
    #[arg(short = 'w', long, default_value_t = 100e3)]
    bw: f64,

    /// Minimum distance of the eavesdropper (m)
    #[arg(long, default_value_t = 50.0)]
    d_min_eve: f64,

    #[command(flatten)]
    output: Output,
}

/// The eavesdropper's rate bound over the spacing, against its zero-spacing
/// value which bounds all of them.
pub fn eve_rate(args: &EveRateArgs) -> Result<()> {
    let settings = Settings::default();
    let (d_min_eve, bw) = (args.d_min_eve, args.bw);
    let heights = (args.h_tx, args.h_rx);
    let spacing = logspace(5.0, 9.0, 1000);

    for &freq in &args.freq {
        let power = sweep::power_eve_over_spacing(d_min_eve, &spacing, freq, heights, &settings);
        let rate = sweep::rates_of(&power, bw, &settings);
        let upper = worst_case_rate_eve(d_min_eve, freq, bw, heights, &settings);
        info!(freq, "Worst-case rate Eve: {:E} bit/s", upper);

        if args.output.export {
            debug!(freq, "exporting eavesdropper rates");
            let name = format!(
                "rate-eve-{:E}-bw{:E}-dmin{:.1}-t{:.1}-r{:.1}.dat",
                freq, args.bw, args.d_min_eve, args.h_tx, args.h_rx
            );
            // in Mbit/s
            export_results(
                &args.output.output_dir.join(name),
                &[
                    Column::new("df", spacing.clone()),
                    Column::new("rate", rate.iter().map(|r| r / 1e6).collect()),
                    Column::new("upper", vec![upper / 1e6; spacing.len()]),
                ],
            )?;
        }
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct SecrecyArgs {
    /// Transmitter height (m)
    #[arg(short = 't', long, default_value_t = 10.0)]
    h_tx: f64,

    /// Legitimate receiver height (m)
    #[arg(short = 'r', long, default_value_t = 1.5)]
    h_rx_bob: f64,

    /// Eavesdropper height (m)
    #[arg(long, default_value_t = 1.5)]
    h_rx_eve: f64,

    /// First carrier frequency (Hz)
    #[arg(short, long, default_value_t = 2.4e9)]
    freq: f64,

    /// Bandwidth (Hz)
    #[arg(short = 'w', long, default_value_t = 100e3)]
    bw: f64,

    /// Minimum distance of the legitimate receiver (m)
    #[arg(long, default_value_t = 20.0)]
    d_min_bob: f64,

    /// Maximum distance of the legitimate receiver (m)
    #[arg(long, default_value_t = 30.0)]
    d_max_bob: f64,

    /// Minimum distance of the eavesdropper (m)
    #[arg(short = 'e', long, default_value_t = 100.0)]
    d_min_eve: f64,

    /// Fraction of power on the first carrier
    #[arg(long, default_value_t = 0.5)]
    theta: f64,

    #[command(flatten)]
    output: Output,
}

/// Worst-case rates of both receivers and the secrecy rate over the spacing,
/// and at the optimal spacing.
pub fn secrecy(args: &SecrecyArgs) -> Result<()> {
    let settings = settings_with_split(args.theta);
    let freq = args.freq;
    let heights = (args.h_tx, args.h_rx_bob);
    let eve_heights = (args.h_tx, args.h_rx_eve);
    let range = (args.d_min_bob, args.d_max_bob);

    let rate_eve = worst_case_rate_eve(args.d_min_eve, freq, args.bw, eve_heights, &settings);

    info!("Determining the optimal frequency spacing...");
    let opt = find_optimal_delta_freq(range, freq, heights, &settings)
        .context("searching the optimal spacing")?;
    let (df, exact) = (opt.delta_freq, opt.exact);
    info!(exact, "Optimal frequency spacing: {:E} Hz", df);

    let power_bob = bound_rec_power_two_freq(range, df, freq, heights, Bound::Lower, &settings);
    let rate_bob = achievable_rate(power_bob, args.bw, settings.noise_density);
    let sec_rate = (rate_bob - rate_eve).max(0.0);
    debug!("Rate Bob at opt. df: {:E}", rate_bob);
    debug!("Rate Eve at opt. df: {:E}", rate_eve);
    info!("Secrecy Rate at opt. df: {:E}", sec_rate);

    if args.output.export {
        let spacing = logspace(7.0, freq.log10(), 2000);
        let worst =
            sweep::bound_over_spacing(range, &spacing, freq, heights, Bound::Lower, &settings);
        let bob = sweep::rates_of(&worst, args.bw, &settings);
        let sec: Vec<f64> = bob.iter().map(|r| (r - rate_eve).max(0.0)).collect();

        debug!("exporting secrecy rates");
        let name = format!(
            "sec-rate-{:E}-t{:.1}-rB{:.1}-rE{:.1}-dminB{:.1}-dmaxB{:.1}-dminE{:.1}.dat",
            freq, args.h_tx, args.h_rx_bob, args.h_rx_eve, range.0, range.1, args.d_min_eve
        );
        export_results(
            &args.output.output_dir.join(name),
            &[
                Column::new("df", spacing.clone()),
                Column::new("eve", vec![rate_eve; spacing.len()]),
                Column::new("bob", bob),
                Column::new("secRate", sec),
            ],
        )?;
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct ConditionsArgs {
    /// Transmitter height (m)
    #[arg(short = 't', long, default_value_t = 10.0)]
    h_tx: f64,

    /// Legitimate receiver height (m)
    #[arg(short = 'r', long, default_value_t = 1.5)]
    h_rx_bob: f64,

    /// Eavesdropper height (m)
    #[arg(long, default_value_t = 1.5)]
    h_rx_eve: f64,

    /// First carrier frequency (Hz)
    #[arg(short, long, default_value_t = 2.4e9)]
    freq: f64,

    /// Bandwidth (Hz)
    #[arg(short = 'w', long, default_value_t = 100e3)]
    bw: f64,

    /// Minimum distance of the legitimate receiver (m)
    #[arg(long, default_value_t = 20.0)]
    d_min_bob: f64,

    /// Maximum distance of the legitimate receiver (m)
    #[arg(long, default_value_t = 30.0)]
    d_max_bob: f64,

    /// Minimum distance of the eavesdropper (m)
    #[arg(long, default_value_t = 50.0)]
    d_min_eve: f64,
}

impl ConditionsArgs {
    fn scenario(&self) -> Scenario {
        Scenario {
            bob_range: (self.d_min_bob, self.d_max_bob),
            eve_min_distance: self.d_min_eve,
            freq: self.freq,
            bandwidth: self.bw,
            tx_height: self.h_tx,
            rx_heights: (self.h_rx_bob, self.h_rx_eve),
        }
    }
}

/// Both quick checks, then the actual worst-case secrecy rate.
///
/// The results go to the log at info level, and to stdout.
pub fn conditions(args: &ConditionsArgs) -> Result<()> {
    let settings = Settings::default();
    let scenario = args.scenario();

    let prob_zero = is_worst_case_sec_rate_zero(&scenario, &settings);
    info!("ZOSC is probably zero: {}", prob_zero);

    let def_positive = is_zosc_definitely_positive(&scenario, &settings);
    info!("ZOSC is definitely positive: {}", def_positive);

    let actual = max_worst_case_sec_rate(&scenario, &settings)
        .context("computing the secrecy rate")?;
    info!(exact = actual.exact, "Actual ZOSC: {:E}", actual.rate);

    println!("probably zero:       {}", prob_zero);
    println!("definitely positive: {}", def_positive);
    println!("actual ZOSC:         {:E} bit/s", actual.rate);
    println!(
        "at spacing:          {:E} Hz (exact: {})",
        actual.delta_freq, actual.exact
    );

    Ok(())
}
