//! minicaml CLI
//!
//! Evaluates JSON-encoded expression trees.

use minicaml_cli::commands::{parse_run_options, print_file, render_failure, run_file, CliError};
use minicaml_cli::init_tracing;

/// Exit code for errors in the evaluated program or its input.
const EXIT_FAILURE: i32 = 1;

/// Exit code for evaluator faults (`fatal` category).
const EXIT_FATAL: i32 = 2;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "run" => {
            let options = match parse_run_options(&args[2..]) {
                Ok(options) => options,
                Err(err) => {
                    eprintln!("error: {err}");
                    eprintln!("Usage: minicaml run <file.json> [--max-depth=N] [--by-need]");
                    std::process::exit(EXIT_FAILURE);
                }
            };
            match run_file(&options) {
                Ok(Ok(value)) => println!("{value}"),
                Ok(Err(err)) => {
                    eprint!("{}", render_failure(&err));
                    let code = if err.is_fatal() {
                        EXIT_FATAL
                    } else {
                        EXIT_FAILURE
                    };
                    std::process::exit(code);
                }
                Err(err) => exit_with(&err),
            }
        }
        "print" => {
            if args.len() < 3 {
                eprintln!("Usage: minicaml print <file.json>");
                std::process::exit(EXIT_FAILURE);
            }
            match print_file(&args[2]) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => exit_with(&err),
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn exit_with(err: &CliError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(EXIT_FAILURE);
}

fn print_usage() {
    println!("minicaml - tree-walking evaluator for minicaml expression trees");
    println!();
    println!("Usage: minicaml <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.json>      Evaluate an expression tree and print its value");
    println!("  print <file.json>    Print an expression tree in concrete syntax");
    println!("  help                 Show this message");
    println!();
    println!("Run options:");
    println!("  --max-depth=<n>      Fail once evaluation nests deeper than n frames");
    println!("  --by-need            Memoize lazy bindings (default: call-by-name)");
    println!();
    println!("Environment:");
    println!("  MINICAML_MAX_DEPTH   Default for --max-depth");
    println!("  MINICAML_LAZY        `name` or `need`");
    println!("  RUST_LOG             Enable tracing output (e.g. RUST_LOG=minicaml_eval=debug)");
}
