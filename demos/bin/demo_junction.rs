//! Spatial Junction Demo
//!
//! Compiles the straight junction and shows how its extended rounds
//! stretch the whole slice, then the gallery's bent, adjacent and
//! Hadamard-joined junctions.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use std::collections::BTreeMap;

use tessera_compile::BlockGraphCompiler;
use tessera_demos::{
    init_tracing, load_options, print_compiled, print_header, print_info, print_result,
    print_section, print_success,
};
use tessera_graph::{Basis, Position3D, gallery};

#[derive(Parser, Debug)]
#[command(name = "demo-junction")]
#[command(about = "Compile a spatial junction and report its padding")]
struct Args {
    /// Basis of the junction walls (X or Z)
    #[arg(short, long, default_value = "Z")]
    basis: Basis,

    /// Scale parameter
    #[arg(short = 'k', long, default_value = "2")]
    k: u32,

    /// YAML file with compile options
    #[arg(short, long)]
    config: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Spatial Junction Demo");

    let compiler = BlockGraphCompiler::new(load_options(args.config.as_deref())?);

    print_section("Straight Junction");
    let graph = gallery::straight_junction(args.basis)?;
    let compiled = compiler.compile(&graph, args.k, None)?;
    print_compiled(&compiled);

    if compiled.has_extended_rounds() {
        print_info("The junction runs 8-moment rounds; its neighbours are padded to match.");
    }

    // Moment of the syndrome measurements, per cube.
    let mut measured: BTreeMap<Position3D, usize> = BTreeMap::new();
    for record in compiled
        .circuit
        .stabilizer_records()
        .iter()
        .filter(|r| r.tag.round == 0)
    {
        measured.insert(record.tag.block, record.moment);
    }
    for (block, moment) in &measured {
        print_result(&format!("Cube {block} measures at"), moment);
    }

    print_section("Junction Shapes");
    let cases = [
        ("move_rotation", gallery::move_rotation(Some(args.basis))?),
        ("three_cnots", gallery::three_cnots(Some(args.basis))?),
        ("cz", gallery::cz(Some(args.basis))?),
    ];
    for (name, graph) in &cases {
        let shapes: Vec<String> = graph
            .spatial_junctions()
            .iter()
            .map(|cube| {
                let arms = graph
                    .pipes_at(cube.position)
                    .iter()
                    .filter(|pipe| pipe.kind().is_spatial())
                    .count();
                format!("{arms} arms at {}", cube.position)
            })
            .collect();
        let compiled = compiler.compile(graph, args.k, None)?;
        compiled.circuit.check_conflict_free()?;
        print_result(
            name,
            format!(
                "{}; {} moments, {} qubits",
                shapes.join(", "),
                compiled.num_moments(),
                compiled.num_qubits()
            ),
        );
    }

    println!();
    print_success("Junction demo complete!");
    Ok(())
}
