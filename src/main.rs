//! Cardiac Cell Kernel - Entry point
//!
//! Paces one cell and prints per-beat measurements.
//!
//! CLI Usage:
//!   cargo run -- --model TNNP --celltype ENDO --beats 10
//!   cargo run -- --config run.json --agent DOFETILIDE --drug 0.5
//!   cargo run -- --s2 300 --save-state final.json

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use cardiac_cell_kernel::{
    logging,
    measurement::{BeatSummary, APD_PERCENTAGES},
    CellSimulation, ModelRegistry, SimulationConfig, StateVector,
};

/// Command-line options; `None` keeps the configuration's value
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    model: Option<String>,
    celltype: Option<String>,
    agent: Option<String>,
    drug: Option<f64>,
    iso: Option<f64>,
    ach: Option<f64>,
    remodelling: Option<String>,
    mutation: Option<String>,
    bcl_ms: Option<f64>,
    beats: Option<u32>,
    dt_ms: Option<f64>,
    s2_ms: Option<f64>,
    save_state: Option<PathBuf>,
    load_state: Option<PathBuf>,
    list_models: bool,
}

fn print_help() {
    println!("Cardiac Cell Kernel");
    println!();
    println!("Usage: cardiac-cell-kernel [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config FILE         JSON simulation config");
    println!("  --model ID            Cell model (LR91, TNNP)");
    println!("  --celltype NAME       Celltype (ENDO, EPI, M)");
    println!("  --agent NAME          Drug name");
    println!("  --drug P              Drug proportion (0-1)");
    println!("  --iso P               Beta-adrenergic proportion (0-1)");
    println!("  --ach P               Acetylcholine proportion (0-1)");
    println!("  --remodelling NAME    Remodelling name");
    println!("  --mutation NAME       Mutation name");
    println!("  --bcl MS              Basic cycle length (default: 1000)");
    println!("  --beats N             Number of S1 beats (default: 5)");
    println!("  --dt MS               Time step (default: 0.02)");
    println!("  --s2 MS               S2 interval, 0 disables (default: 0)");
    println!("  --save-state FILE     Write the final state vector");
    println!("  --load-state FILE     Start from a saved state vector");
    println!("  --list-models         List available models");
    println!("  --help, -h            Show this help");
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T> {
    let Some(value) = value else {
        bail!("missing value for {}", flag);
    };
    value
        .parse()
        .ok()
        .with_context(|| format!("invalid value '{}' for {}", value, flag))
}

fn parse_args() -> Result<Args> {
    let argv: Vec<String> = std::env::args().collect();
    let mut args = Args::default();

    let mut i = 1;
    while i < argv.len() {
        let flag = argv[i].as_str();
        let mut value = || {
            i += 1;
            argv.get(i)
        };
        match flag {
            "--config" => args.config = Some(parse_value(flag, value())?),
            "--model" => args.model = Some(parse_value(flag, value())?),
            "--celltype" => args.celltype = Some(parse_value(flag, value())?),
            "--agent" => args.agent = Some(parse_value(flag, value())?),
            "--drug" => args.drug = Some(parse_value(flag, value())?),
            "--iso" => args.iso = Some(parse_value(flag, value())?),
            "--ach" => args.ach = Some(parse_value(flag, value())?),
            "--remodelling" => args.remodelling = Some(parse_value(flag, value())?),
            "--mutation" => args.mutation = Some(parse_value(flag, value())?),
            "--bcl" => args.bcl_ms = Some(parse_value(flag, value())?),
            "--beats" => args.beats = Some(parse_value(flag, value())?),
            "--dt" => args.dt_ms = Some(parse_value(flag, value())?),
            "--s2" => args.s2_ms = Some(parse_value(flag, value())?),
            "--save-state" => args.save_state = Some(parse_value(flag, value())?),
            "--load-state" => args.load_state = Some(parse_value(flag, value())?),
            "--list-models" => args.list_models = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => bail!("unknown option '{}'", other),
        }
        i += 1;
    }

    Ok(args)
}

/// Fold command-line overrides into the configuration
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path).with_context(|| format!("loading config {:?}", path))?,
        None => SimulationConfig::default(),
    };

    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if args.celltype.is_some() {
        config.celltype = args.celltype.clone();
    }
    if args.agent.is_some() {
        config.agent = args.agent.clone();
        // Naming a drug without a proportion applies it fully
        config.drug_proportion = args.drug.unwrap_or(1.0);
    } else if let Some(drug) = args.drug {
        config.drug_proportion = drug;
    }
    if let Some(iso) = args.iso {
        config.iso = iso;
    }
    if let Some(ach) = args.ach {
        config.ach = ach;
    }
    if args.remodelling.is_some() {
        config.remodelling = args.remodelling.clone();
    }
    if args.mutation.is_some() {
        config.mutation = args.mutation.clone();
    }
    if let Some(bcl) = args.bcl_ms {
        config.bcl_ms = bcl;
    }
    if let Some(beats) = args.beats {
        config.beats = beats;
    }
    if let Some(dt) = args.dt_ms {
        config.dt_ms = dt;
    }
    if let Some(s2) = args.s2_ms {
        config.s2_interval_ms = s2;
    }

    Ok(config)
}

fn format_ms(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

fn print_beat(index: usize, beat: &BeatSummary) {
    let percents: Vec<String> = APD_PERCENTAGES
        .iter()
        .zip(beat.apd_percent_ms.iter())
        .filter(|(p, _)| matches!(**p, 30 | 50 | 90))
        .map(|(p, apd)| format!("APD{}={}", p, format_ms(*apd)))
        .collect();
    println!(
        "  Beat {:3}: t={:9.2} ms  APD={:>6} ms  {}  Vmax={:6.1} mV  dV/dt={:6.1} mV/ms  CaT={:.2e} mM",
        index + 1,
        beat.excitation_time_ms,
        format_ms(beat.apd_ms),
        percents.join("  "),
        beat.v_max_mV,
        beat.dvdt_max,
        beat.ca_amplitude_mM(),
    );
}

fn main() -> Result<()> {
    logging::init_with_level("warn");

    let args = parse_args()?;
    let registry = ModelRegistry::with_defaults();

    if args.list_models {
        for id in registry.list_models() {
            println!("{}", id);
            if let Some(help) = ModelRegistry::help(id) {
                for line in help.lines() {
                    println!("    {}", line);
                }
            }
        }
        return Ok(());
    }

    let config = build_config(&args)?;
    let mut cell = CellSimulation::from_config(&config, &registry)?;

    if let Some(path) = &args.load_state {
        let state = StateVector::load_json(path).with_context(|| format!("loading state {:?}", path))?;
        cell = cell.with_state(state);
    }

    println!("=== Cardiac Cell Kernel ===\n");
    println!("Model: {}", cell.model().id());
    for effect in cell.parameters().applied() {
        println!("  {} '{}' (p = {})", effect.category, effect.name, effect.proportion);
    }
    println!(
        "Protocol: {} beats at BCL {} ms, dt {} ms, S2 {} ms\n",
        config.beats, config.bcl_ms, config.dt_ms, config.s2_interval_ms
    );

    let start_time = Instant::now();
    cell.run();
    let elapsed = start_time.elapsed();

    for (i, beat) in cell.beats().enumerate() {
        print_beat(i, beat);
    }
    println!(
        "\nSimulated {:.0} ms in {:.2} s ({} steps)",
        cell.time_ms(),
        elapsed.as_secs_f64(),
        cell.steps_taken()
    );

    if let Some(path) = &args.save_state {
        cell.state().save_json(path).with_context(|| format!("saving state {:?}", path))?;
        println!("State saved to {:?}", path);
    }

    Ok(())
}
