//! Complete Demo Suite
//!
//! Compiles every reference graph in both bases and summarizes the
//! outcome.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use console::style;
use std::time::Instant;

use tessera_compile::BlockGraphCompiler;
use tessera_demos::{
    REFERENCE_GRAPHS, create_progress_bar, init_tracing, load_options, print_header, print_info,
    print_result, print_section, print_success, reference_graph,
};
use tessera_graph::Basis;

#[derive(Parser, Debug)]
#[command(name = "demo-all")]
#[command(about = "Compile every reference graph")]
struct Args {
    /// Scale parameter
    #[arg(short = 'k', long, default_value = "2")]
    k: u32,

    /// Run quick demo (Z basis only, k = 1)
    #[arg(long)]
    quick: bool,

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
    let start = Instant::now();

    print_header("Tessera Complete Demo Suite");

    let compiler = BlockGraphCompiler::new(load_options(args.config.as_deref())?);
    let (bases, k): (&[Basis], u32) = if args.quick {
        (&[Basis::Z], 1)
    } else {
        (&Basis::ALL, args.k)
    };
    print_result("Scale", k);
    print_result("Graphs", REFERENCE_GRAPHS.len() * bases.len());

    print_section("Compilation");
    let pb = create_progress_bar((REFERENCE_GRAPHS.len() * bases.len()) as u64, "compiling");
    let mut lines = Vec::new();
    let mut compiled_count = 0;
    for name in REFERENCE_GRAPHS {
        for basis in bases {
            let graph = reference_graph(name, *basis)?;
            let line = match compiler.compile(&graph, k, None) {
                Ok(compiled) => {
                    compiled.circuit.check_conflict_free()?;
                    compiled_count += 1;
                    format!(
                        "{} {} qubits, {} moments, {} observable(s)",
                        style("✓").green(),
                        compiled.num_qubits(),
                        compiled.num_moments(),
                        compiled.observables.len()
                    )
                }
                Err(e) => format!("{} {e}", style("✗").red()),
            };
            lines.push((format!("{name} ({basis})"), line));
            pb.inc(1);
        }
    }
    pb.finish_and_clear();

    for (label, line) in &lines {
        print_result(label, line);
    }

    print_section("Summary");
    print_result("Compiled", format!("{compiled_count}/{}", lines.len()));
    print_result("Total time", format!("{:.2?}", start.elapsed()));

    println!();
    print_success("All demos complete!");
    Ok(())
}
