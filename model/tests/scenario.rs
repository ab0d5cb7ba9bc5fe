use tworay_model::dual::{bound_rec_power_two_freq, sum_power_envelope};
use tworay_model::formulae::logspace;
use tworay_model::rates::{
    is_worst_case_sec_rate_zero, is_zosc_definitely_positive, max_worst_case_sec_rate,
    worst_case_rate_eve,
};
use tworay_model::{find_optimal_delta_freq, Bound, Error, Scenario, Settings};

const FREQ: f64 = 2.4e9;
const HEIGHTS: (f64, f64) = (10.0, 1.5);

fn reference() -> Scenario {
    Scenario {
        bob_range: (20.0, 30.0),
        eve_min_distance: 50.0,
        freq: FREQ,
        bandwidth: 100e3,
        tx_height: 10.0,
        rx_heights: (1.5, 1.5),
    }
}

#[test]
fn heuristics_agree_with_secrecy_rate() {
    let settings = Settings::default();
    for &eve in &[10.0, 35.0, 50.0, 80.0, 150.0, 500.0] {
        let scenario = Scenario {
            eve_min_distance: eve,
            ..reference()
        };
        let zero = is_worst_case_sec_rate_zero(&scenario, &settings);
        let positive = is_zosc_definitely_positive(&scenario, &settings);
        let sec = max_worst_case_sec_rate(&scenario, &settings).expect("valid range");

        assert!(!(zero && positive), "eve at {} m", eve);
        assert!(sec.rate >= 0.0);
        if positive {
            assert!(sec.rate > 0.0, "eve at {} m", eve);
        }
        if zero {
            let (bw, heights) = (scenario.bandwidth, scenario.eve_heights());
            let eve_rate = worst_case_rate_eve(eve, FREQ, bw, heights, &settings);
            assert!(sec.rate < 0.1 * eve_rate, "eve at {} m", eve);
        }
    }
}

#[test]
fn reference_scenario_is_inconclusive() {
    let settings = Settings::default();
    let scenario = reference();
    assert!(!is_worst_case_sec_rate_zero(&scenario, &settings));
    assert!(!is_zosc_definitely_positive(&scenario, &settings));
}

#[test]
fn optimal_spacing_is_reproducible() {
    let settings = Settings::default();
    let range = (20.0, 30.0);
    let first = find_optimal_delta_freq(range, FREQ, HEIGHTS, &settings).expect("valid range");
    for _ in 0..5 {
        let again = find_optimal_delta_freq(range, FREQ, HEIGHTS, &settings).expect("valid range");
        assert_eq!(again.delta_freq, first.delta_freq);
    }
    assert!(first.delta_freq.is_finite());
    assert!(first.delta_freq > 0.0);
}

#[test]
fn optimiser_rejects_bad_ranges() {
    let settings = Settings::default();
    for &range in &[(50.0, 50.0), (50.0, 10.0)] {
        match find_optimal_delta_freq(range, FREQ, HEIGHTS, &settings) {
            Err(Error::InvalidRange { min, max }) => assert_eq!((min, max), range),
            other => panic!("expected an invalid range, got {:?}", other),
        }
    }
}

#[test]
fn optimal_spacing_maximises_worst_case() {
    // the optimum should be at least as good as any spacing on a coarse grid
    // over the same bracket, up to the grid resolution
    let settings = Settings::default();
    let range = (20.0, 30.0);
    let opt = find_optimal_delta_freq(range, FREQ, HEIGHTS, &settings).expect("valid range");
    let worst = |df| bound_rec_power_two_freq(range, df, FREQ, HEIGHTS, Bound::Lower, &settings);

    let best = worst(opt.delta_freq);
    let grid = logspace(7.0, 9.0, 400);
    let grid_best = grid.into_iter().map(worst).fold(0.0, f64::max);
    assert!(best >= 0.99 * grid_best, "{} vs {}", best, grid_best);
}

#[test]
fn envelope_bounds_with_uneven_split() {
    let settings = Settings {
        split: 0.8,
        ..Settings::default()
    };
    for d in logspace(0.0, 3.0, 100) {
        for df in logspace(5.0, 9.0, 20) {
            let lower = sum_power_envelope(d, df, FREQ, HEIGHTS, Bound::Lower, &settings);
            let upper = sum_power_envelope(d, df, FREQ, HEIGHTS, Bound::Upper, &settings);
            assert!(lower <= upper);
        }
    }
}
