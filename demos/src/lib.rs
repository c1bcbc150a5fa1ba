//! Tessera Demo Suite
//!
//! Small programs showing the block graph compiler at work:
//!
//! - **Memory**: a single patch compiled at growing scale
//! - **Observables**: correlation surfaces of the reference graphs
//! - **Junction**: a spatial junction and its extended rounds
//!
//! The helpers below keep the output of every demo consistent.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use tessera_compile::{CompileOptions, CompiledGraph};
use tessera_graph::{Basis, BlockGraph, gallery};

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let bar_style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(bar_style);
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Install a tracing subscriber; `-v` counts map to `info`, `debug`
/// and `trace`.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // A second call in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .try_init();
}

/// Load compile options from an optional YAML file, then the
/// environment.
pub fn load_options(config: Option<&str>) -> anyhow::Result<CompileOptions> {
    Ok(CompileOptions::load(config)?)
}

/// Reference graphs by name, with open ports filled in `basis`.
pub fn reference_graph(name: &str, basis: Basis) -> anyhow::Result<BlockGraph> {
    let graph = match name {
        "memory" => gallery::memory(basis)?,
        "stability" => gallery::stability(basis)?,
        "straight_junction" => gallery::straight_junction(basis)?,
        "cnot" => gallery::cnot(Some(basis))?,
        "move_rotation" => gallery::move_rotation(Some(basis))?,
        "three_cnots" => gallery::three_cnots(Some(basis))?,
        "cz" => gallery::cz(Some(basis))?,
        "s_gate_teleportation" => gallery::s_gate_teleportation(Some(basis))?,
        other => anyhow::bail!("unknown reference graph '{other}'"),
    };
    Ok(graph)
}

/// Names accepted by [`reference_graph`].
pub const REFERENCE_GRAPHS: [&str; 8] = [
    "memory",
    "stability",
    "straight_junction",
    "cnot",
    "move_rotation",
    "three_cnots",
    "cz",
    "s_gate_teleportation",
];

/// Print the size and schedule of a compiled graph.
pub fn print_compiled(compiled: &CompiledGraph) {
    print_result("Moments", compiled.num_moments());
    print_result("Qubits", compiled.num_qubits());
    print_result(
        "Stabilizer measurements",
        compiled.circuit.stabilizer_records().len(),
    );
    print_result("Observables", compiled.observables.len());
    for slice in &compiled.slices {
        print_result(
            &format!("Slice z = {}", slice.z),
            format!(
                "{} cube(s), {} round(s) of {} moments from moment {}",
                slice.num_cubes, slice.rounds, slice.round_length, slice.first_moment
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reference_graph_loads() {
        for name in REFERENCE_GRAPHS {
            for basis in Basis::ALL {
                let graph = reference_graph(name, basis).unwrap();
                assert!(!graph.is_open(), "{name} still has open ports");
            }
        }
    }

    #[test]
    fn test_unknown_graph() {
        assert!(reference_graph("teleporter", Basis::Z).is_err());
    }
}
