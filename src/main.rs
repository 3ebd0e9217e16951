//! Wirelab - schematic circuit and logic simulator
//!
//! Loads a schematic snapshot, runs the engine and prints what the editor
//! would display.
//!
//! # Usage
//!
//! ```bash
//! wirelab lamp.wl --ticks 2
//! RUST_LOG=wirelab_core=debug wirelab gates.wl --ground-substitution
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wirelab_core::{
    dsl,
    error::Result,
    schematic::{validate_schematic, WireId},
    Engine, EngineConfig, ResultSet, Schematic,
};

/// Schematic circuit and logic simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the schematic snapshot file
    #[arg(value_name = "SCHEMATIC_FILE")]
    schematic_file: PathBuf,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1)]
    ticks: usize,

    /// Let the first output port act as ground
    #[arg(long)]
    ground_substitution: bool,

    /// Snapping grid, overriding any `.grid` directive
    #[arg(long)]
    grid: Option<f64>,

    /// Also print every wire
    #[arg(short, long)]
    wires: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wirelab=info,wirelab_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let ast = dsl::parse_file(&args.schematic_file)?;
    let grid = args.grid.or(ast.grid).unwrap_or(1.0);
    let schematic = Schematic::from_ast(ast)?;

    if let Err(err) = validate_schematic(&schematic) {
        tracing::warn!(error = %err, "snapshot has invalid values");
    }

    let config = EngineConfig::new()
        .with_grid(grid)
        .with_ground_substitution(args.ground_substitution);
    let engine = Engine::new(config);

    tracing::info!(
        components = schematic.components.len(),
        wires = schematic.wires.len(),
        ticks = args.ticks,
        "loaded {}",
        args.schematic_file.display()
    );

    let mut results = ResultSet::default();
    for _ in 0..args.ticks.max(1) {
        results = engine.tick(&schematic);
    }

    print_results(&schematic, &results, args.wires);
    Ok(())
}

fn print_results(schematic: &Schematic, results: &ResultSet, wires: bool) {
    println!("status: {:?}", results.status);
    if results.short_circuit {
        println!("WARNING: short circuit");
    }

    for (id, component) in schematic.iter_components() {
        let Some(r) = results.component(id) else {
            continue;
        };
        let mut line = format!(
            "{:<8} {:<16} V={:>10.4} I={:>10.6} P={:>10.4}",
            component.name(),
            component.kind_label(),
            r.voltage,
            r.current,
            r.power
        );
        if r.active {
            line.push_str(" active");
        }
        if r.lit {
            line.push_str(&format!(" lit({:.0}%)", r.brightness * 100.0));
        }
        if r.overloaded {
            line.push_str(" OVERLOADED");
        }
        if let Some(ohms) = r.effective_resistance {
            line.push_str(&format!(" R_eff={:.3}", ohms));
        }
        if let Some(gate) = &r.gate {
            line.push_str(&format!(" in={:?} out={}", gate.inputs, gate.output_powered));
        }
        println!("{}", line);
    }

    if wires {
        for (i, w) in results.wires.iter().enumerate() {
            println!(
                "{:<8} wire             V={:>10.4} I={:>10.6} level={:.3}{}",
                schematic.wire_name(WireId(i)),
                w.voltage,
                w.current,
                w.level,
                if w.logic_powered { " HIGH" } else { "" }
            );
        }
    }
}
