//! Stepping benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cardiac_cell_kernel::{
    compute_step, CellSimulation, CellPopulation, ModelRegistry, SimulationConfig, StepScratch,
};

fn bench_compute_step(c: &mut Criterion) {
    let registry = ModelRegistry::with_defaults();

    for id in registry.list_models() {
        let model = registry.get(id).unwrap();
        let params = model.baseline_parameters();
        let mut state = model.initial_state();
        let mut scratch = StepScratch::default();

        c.bench_function(&format!("compute_step_{}", id.to_lowercase()), |b| {
            b.iter(|| {
                let vm = state.v_mV;
                compute_step(
                    black_box(&params),
                    model.as_ref(),
                    &mut state,
                    &mut scratch,
                    black_box(vm),
                    0.02,
                )
            })
        });
    }
}

fn bench_paced_cell(c: &mut Criterion) {
    let registry = ModelRegistry::with_defaults();
    let config = SimulationConfig {
        model: "TNNP".to_string(),
        bcl_ms: 500.0,
        beats: 1,
        ..Default::default()
    };
    let cell = CellSimulation::from_config(&config, &registry).unwrap();

    c.bench_function("tnnp_first_50ms", |b| {
        b.iter(|| {
            let mut cell = cell.clone();
            cell.run_for(black_box(50.0));
            cell
        })
    });
}

fn bench_population(c: &mut Criterion) {
    let registry = ModelRegistry::with_defaults();
    let config = SimulationConfig {
        model: "TNNP".to_string(),
        bcl_ms: 500.0,
        beats: 1,
        ..Default::default()
    };
    let population = CellPopulation::along_gradient(&config, &registry, "ENDO", "EPI", 16).unwrap();

    c.bench_function("gradient_population_16_cells_10ms", |b| {
        b.iter(|| {
            let mut population = population.clone();
            population.run_for(black_box(10.0));
            population
        })
    });
}

criterion_group!(benches, bench_compute_step, bench_paced_cell, bench_population);
criterion_main!(benches);
