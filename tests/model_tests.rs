//! Integration tests for the registered ionic models
//!
//! Tests validate:
//! - Each model produces a paced action potential of plausible duration
//! - hERG block prolongs repolarization
//! - Resting cells stay at rest without stimulus
//! - Saved state restores into a running cell

use cardiac_cell_kernel::{CellSimulation, ModelRegistry, SimulationConfig, StateVector};

fn one_beat(model: &str) -> SimulationConfig {
    SimulationConfig {
        model: model.to_string(),
        dt_ms: 0.02,
        bcl_ms: 1000.0,
        beats: 1,
        ..Default::default()
    }
}

fn first_apd90(config: &SimulationConfig) -> f64 {
    let registry = ModelRegistry::with_defaults();
    let mut cell = CellSimulation::from_config(config, &registry).unwrap();
    cell.run();
    let beats: Vec<_> = cell.beats().copied().collect();
    assert_eq!(beats.len(), 1, "{} should fire exactly once", config.model);
    beats[0].apd_percent(90).expect("APD90 should latch within one cycle")
}

#[test]
fn test_tnnp_action_potential() {
    let registry = ModelRegistry::with_defaults();
    let mut cell = CellSimulation::from_config(&one_beat("TNNP"), &registry).unwrap();
    cell.run();

    let beat = *cell.beats().next().unwrap();
    assert!(beat.v_max_mV > 10.0 && beat.v_max_mV < 60.0, "Vmax = {}", beat.v_max_mV);
    assert!(beat.dvdt_max > 50.0, "dV/dt max = {}", beat.dvdt_max);
    assert!(beat.ca_amplitude_mM() > 0.0);

    let apd90 = beat.apd_percent(90).unwrap();
    assert!(apd90 > 200.0 && apd90 < 450.0, "APD90 = {}", apd90);

    // Back near rest at the end of the cycle
    assert!(cell.state().v_mV < -75.0, "V = {}", cell.state().v_mV);
}

#[test]
fn test_lr91_action_potential() {
    let apd90 = first_apd90(&one_beat("LR91"));
    assert!(apd90 > 150.0 && apd90 < 600.0, "APD90 = {}", apd90);
}

#[test]
fn test_apd_percentages_are_ordered() {
    let registry = ModelRegistry::with_defaults();
    let mut cell = CellSimulation::from_config(&one_beat("TNNP"), &registry).unwrap();
    cell.run();
    let beat = *cell.beats().next().unwrap();

    let apds: Vec<f64> = beat.apd_percent_ms.iter().map(|a| a.unwrap()).collect();
    assert!(apds.windows(2).all(|w| w[0] <= w[1]), "{:?}", apds);
}

#[test]
fn test_dofetilide_prolongs_apd() {
    let control = first_apd90(&one_beat("TNNP"));
    let blocked = first_apd90(&SimulationConfig {
        agent: Some("DOFETILIDE".to_string()),
        drug_proportion: 1.0,
        ..one_beat("TNNP")
    });
    assert!(blocked > control + 10.0, "control {} vs blocked {}", control, blocked);
}

#[test]
fn test_unstimulated_cell_stays_at_rest() {
    let registry = ModelRegistry::with_defaults();
    let config = SimulationConfig {
        beats: 0,
        ..one_beat("TNNP")
    };
    let mut cell = CellSimulation::from_config(&config, &registry).unwrap();
    cell.run_for(200.0);

    assert_eq!(cell.beats().count(), 0);
    assert!((cell.state().v_mV - cell.model().initial_state().v_mV).abs() < 2.0);
}

#[test]
fn test_saved_state_restores_into_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mid_beat.json");
    let registry = ModelRegistry::with_defaults();

    let mut cell = CellSimulation::from_config(&one_beat("TNNP"), &registry).unwrap();
    cell.run_for(100.0);
    cell.state().save_json(&path).unwrap();

    let restored = StateVector::load_json(&path).unwrap();
    assert_eq!(&restored, cell.state());

    let resumed = CellSimulation::from_config(&one_beat("TNNP"), &registry)
        .unwrap()
        .with_state(restored);
    assert_eq!(resumed.state(), cell.state());
    assert_eq!(resumed.steps_taken(), 0);
}
