//! Memory Experiment Demo
//!
//! Compiles a single logical patch at growing code distance.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;

use tessera_compile::compile_block_graph;
use tessera_demos::{
    create_progress_bar, init_tracing, load_options, print_compiled, print_header, print_info,
    print_result, print_section, print_success,
};
use tessera_graph::{Basis, gallery};

#[derive(Parser, Debug)]
#[command(name = "demo-memory")]
#[command(about = "Compile a memory experiment at several scales")]
struct Args {
    /// Basis of the memory experiment (X or Z)
    #[arg(short, long, default_value = "Z")]
    basis: Basis,

    /// Largest scale to compile
    #[arg(short = 'k', long, default_value = "4")]
    max_k: u32,

    /// YAML file with compile options
    #[arg(short, long)]
    config: Option<String>,

    /// Write the circuit of the largest scale as JSON
    #[arg(short, long)]
    output: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Memory Experiment Demo");

    let options = load_options(args.config.as_deref())?;
    let graph = gallery::memory(args.basis)?;

    print_section("Setup");
    print_result("Graph", graph.name());
    print_result("Rounds", format!("{} (k = scale)", options.rounds));
    print_result("Parallel builds", options.parallel);

    print_section("Scaling");
    let pb = create_progress_bar(u64::from(args.max_k), "compiling");
    let mut results = Vec::new();
    for k in 1..=args.max_k {
        let start = Instant::now();
        let compiled = compile_block_graph(&graph, k, &options, None)
            .with_context(|| format!("compiling at k = {k}"))?;
        compiled.circuit.check_conflict_free()?;
        results.push((k, compiled, start.elapsed()));
        pb.inc(1);
    }
    pb.finish_and_clear();

    for (k, compiled, elapsed) in &results {
        print_result(
            &format!("k = {k}"),
            format!(
                "{} qubits, {} moments, {:.2?}",
                compiled.num_qubits(),
                compiled.num_moments(),
                elapsed
            ),
        );
    }

    if let Some((k, compiled, _)) = results.last() {
        print_section(&format!("Largest Circuit (k = {k})"));
        print_compiled(compiled);

        if let Some(path) = &args.output {
            std::fs::write(path, compiled.circuit.to_json()?)
                .with_context(|| format!("writing {path}"))?;
            print_info(&format!("Circuit written to {path}"));
        }
    }

    print_success("Memory demo complete!");
    Ok(())
}
