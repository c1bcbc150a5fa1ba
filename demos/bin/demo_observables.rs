//! Correlation Surface Demo
//!
//! Lists the correlation surfaces of the reference graphs and the
//! stabilizer each one induces on the ports.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use std::time::Instant;

use tessera_demos::{init_tracing, print_header, print_info, print_result, print_section, print_success};
use tessera_graph::{BlockGraph, Position3D, gallery};

#[derive(Parser, Debug)]
#[command(name = "demo-observables")]
#[command(about = "List correlation surfaces of the reference graphs")]
struct Args {
    /// Print the edges of every surface
    #[arg(long)]
    show_spans: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn report(graph: &BlockGraph, show_spans: bool) -> Result<()> {
    print_section(graph.name());
    let ports: Vec<Position3D> = graph.ports().values().copied().collect();
    print_result("Cubes", graph.num_cubes());
    print_result("Pipes", graph.num_pipes());
    print_result("Ports", graph.ordered_ports().join(", "));

    let start = Instant::now();
    let surfaces = graph.find_correlation_surfaces()?;
    print_result("Surfaces", surfaces.len());
    print_result("Search time", format!("{:.2?}", start.elapsed()));

    for (index, surface) in surfaces.iter().enumerate() {
        let stabilizer = if ports.is_empty() {
            "-".to_string()
        } else {
            surface.external_stabilizer(&ports)
        };
        print_result(
            &format!("  #{index}"),
            format!("{stabilizer} (area {})", surface.area()),
        );
        if show_spans {
            println!("      {surface}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Correlation Surface Demo");
    print_info("Stabilizers are listed over the ports in label order.");

    let graphs = [
        gallery::cnot(None)?,
        gallery::move_rotation(None)?,
        gallery::three_cnots(None)?,
        gallery::cz(None)?,
        gallery::s_gate_teleportation(None)?,
    ];
    for graph in &graphs {
        report(graph, args.show_spans)?;
    }

    println!();
    print_success("Observables demo complete!");
    Ok(())
}
