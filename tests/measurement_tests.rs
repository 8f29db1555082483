//! Integration tests for excitation detection and beat measurement
//!
//! Tests validate:
//! - APD latches are set at most once per beat
//! - Re-excitation resets every extremum to its sentinel
//! - Percentage APDs use the previous beat's minimum
//! - A beat that never excites leaves every latch unset

use cardiac_cell_kernel::measurement::{
    BeatMeasurement, ExcitationState, ExcitationThresholds, Sample, APD_PERCENTAGES,
};

const DT: f64 = 1.0;

/// Triangular action potential: instant upstroke to `peak`, linear
/// repolarization to `rest` over `duration` ms, then `diastole` ms at rest.
fn waveform(peak: f64, rest: f64, duration: usize, diastole: usize) -> Vec<f64> {
    let mut v = vec![peak];
    for i in 1..=duration {
        v.push(peak + (rest - peak) * i as f64 / duration as f64);
    }
    v.extend(std::iter::repeat(rest).take(diastole));
    v
}

fn feed(m: &mut BeatMeasurement, t0: f64, trace: &[f64]) -> f64 {
    let mut t = t0;
    for &v in trace {
        t += DT;
        m.observe(
            t,
            DT,
            Sample {
                v_mV: v,
                ca_i_mM: 0.0002,
                ca_sr_mM: 0.5,
                ..Default::default()
            },
        );
    }
    t
}

#[test]
fn test_apd_latched_once_per_beat() {
    let mut m = BeatMeasurement::new(ExcitationThresholds::default(), -70.0, -85.0);
    feed(&mut m, 0.0, &waveform(40.0, -85.0, 250, 0));
    let apd = m.current().apd_ms.unwrap();

    // More samples below threshold do not move the latch
    let t = 251.0;
    feed(&mut m, t, &[-86.0, -90.0, -85.0]);
    assert_eq!(m.current().apd_ms, Some(apd));
}

#[test]
fn test_apd_values_on_linear_repolarization() {
    let mut m = BeatMeasurement::new(ExcitationThresholds::default(), -70.0, -85.0);
    feed(&mut m, 0.0, &waveform(40.0, -85.0, 250, 50));
    let beat = m.current();

    // Amplitude 125 mV falling at 0.5 mV/ms; APDp crosses 40 - 1.25 p
    for percent in APD_PERCENTAGES {
        let apd = beat.apd_percent(percent).unwrap();
        let expected = 2.5 * percent as f64;
        assert!((apd - expected).abs() <= 1.0 + 1e-9, "APD{} = {}", percent, apd);
    }
    // -70 mV is reached after 220 ms
    assert!((beat.apd_ms.unwrap() - 220.0).abs() <= 1.0 + 1e-9);
}

#[test]
fn test_reexcitation_resets_to_sentinels() {
    let mut m = BeatMeasurement::new(ExcitationThresholds::default(), -70.0, -85.0);
    let t = feed(&mut m, 0.0, &waveform(50.0, -85.0, 200, 100));
    let first = *m.current();
    assert_eq!(first.v_max_mV, 50.0);

    // Lower second peak: Vmax must come only from the new beat
    feed(&mut m, t, &waveform(20.0, -80.0, 200, 10));
    let second = m.current();
    assert_eq!(second.v_max_mV, 20.0);
    assert_eq!(second.v_min_mV, -80.0);
    assert!(second.excitation_time_ms > first.excitation_time_ms);

    assert_eq!(m.previous(), &first);
    assert_eq!(m.history().len(), 1);
    let all: Vec<f64> = m.beats().map(|b| b.v_max_mV).collect();
    assert_eq!(all, vec![50.0, 20.0]);
    assert_eq!(m.latest(), Some(second));
}

#[test]
fn test_percentages_use_previous_minimum() {
    let mut m = BeatMeasurement::new(ExcitationThresholds::default(), -70.0, -85.0);
    let t = feed(&mut m, 0.0, &waveform(40.0, -60.0, 100, 50));
    // Previous minimum -60: amplitude 100 on the next beat
    feed(&mut m, t, &waveform(40.0, -85.0, 250, 10));
    let beat = m.current();
    // APD50 threshold -10 mV, reached after 100 ms at 0.5 mV/ms
    assert!((beat.apd_percent(50).unwrap() - 100.0).abs() <= 1.0 + 1e-9);
}

#[test]
fn test_no_excitation_leaves_latches_unset() {
    let mut m = BeatMeasurement::new(ExcitationThresholds::default(), -70.0, -85.0);
    feed(&mut m, 0.0, &[-85.0, -75.0, -40.0, -60.0, -85.0]);
    assert_eq!(m.state(), ExcitationState::Repolarized);
    assert!(m.current().apd_ms.is_none());
    assert!(m.current().apd_percent_ms.iter().all(Option::is_none));
    assert_eq!(m.beats().count(), 0);
    assert!(m.latest().is_none());
}

#[test]
fn test_dvdt_maximum_on_upstroke() {
    let mut m = BeatMeasurement::new(ExcitationThresholds::default(), -70.0, -85.0);
    feed(&mut m, 0.0, &[-85.0, -60.0, 30.0, 20.0]);
    // Beat starts at the 30 mV sample (+90 mV/ms)
    assert_eq!(m.current().dvdt_max, 90.0);
}
