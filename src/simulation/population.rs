//! Many independent cells stepped in parallel.
//!
//! Cells never exchange data, so each cell's full step is one unit of work
//! for rayon. Cells built from the same configuration share one
//! `Arc<ComposedParameters>`.

use rayon::prelude::*;

use super::cell::{prepare, CellSimulation};
use crate::config::{GradientConfig, SimulationConfig};
use crate::error::Result;
use crate::measurement::BeatSummary;
use crate::models::ModelRegistry;

/// A set of uncoupled cells
#[derive(Clone, Default)]
pub struct CellPopulation {
    cells: Vec<CellSimulation>,
}

impl CellPopulation {
    /// Wrap independently built cells
    pub fn new(cells: Vec<CellSimulation>) -> Self {
        Self { cells }
    }

    /// `count` identical cells sharing one composed parameter record
    pub fn replicate(config: &SimulationConfig, registry: &ModelRegistry, count: usize) -> Result<Self> {
        let (model, composed) = prepare(config, registry)?;
        let shared = composed.into_shared();
        let cells = (0..count)
            .map(|_| CellSimulation::new(model.clone(), shared.clone(), config))
            .collect();
        Ok(Self::new(cells))
    }

    /// `count` cells evenly spaced along a celltype gradient, positions 0..=1
    pub fn along_gradient(
        config: &SimulationConfig,
        registry: &ModelRegistry,
        from_celltype: &str,
        to_celltype: &str,
        count: usize,
    ) -> Result<Self> {
        let cells = (0..count)
            .map(|i| {
                let position = if count > 1 { i as f64 / (count - 1) as f64 } else { 0.0 };
                let cell_config = SimulationConfig {
                    gradient: Some(GradientConfig {
                        from_celltype: from_celltype.to_string(),
                        to_celltype: to_celltype.to_string(),
                        position,
                    }),
                    ..config.clone()
                };
                CellSimulation::from_config(&cell_config, registry)
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!("Built {} cells from {} to {}", cells.len(), from_celltype, to_celltype);
        Ok(Self::new(cells))
    }

    /// Advance every cell one step
    pub fn step(&mut self) {
        self.cells.par_iter_mut().for_each(|cell| cell.step());
    }

    /// Advance every cell by `duration_ms`
    pub fn run_for(&mut self, duration_ms: f64) {
        self.cells.par_iter_mut().for_each(|cell| cell.run_for(duration_ms));
    }

    /// Run every cell's configured protocol
    pub fn run(&mut self) {
        self.cells.par_iter_mut().for_each(|cell| cell.run());
    }

    /// Most recent beat of every cell, in cell order
    pub fn latest_beats(&self) -> Vec<Option<BeatSummary>> {
        self.cells
            .par_iter()
            .map(|cell| cell.measurement().latest().copied())
            .collect()
    }

    pub fn cells(&self) -> &[CellSimulation] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
