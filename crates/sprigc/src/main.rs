//! Sprig compiler - compiles Sprig scripts to JavaScript
//!
//! Usage: sprigc <input> <output>

use anyhow::Context;
use clap::Parser as ClapParser;
use sprig_compiler::common::DiagnosticReporter;
use sprig_compiler::driver;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "sprigc")]
#[command(author = "Sprig Team")]
#[command(version)]
#[command(about = "Compiles Sprig scripts to JavaScript", long_about = None)]
struct Args {
    /// Input source file (.sprig)
    #[arg(required = true)]
    input: PathBuf,

    /// Output JavaScript file
    #[arg(required = true)]
    output: PathBuf,
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn write_output(path: &Path, js: &str) -> anyhow::Result<()> {
    fs::write(path, js).with_context(|| format!("cannot write {}", path.display()))
}

fn main() {
    let args = Args::parse();

    let source = match read_source(&args.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    };

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(args.input.display().to_string(), source.as_str());

    let js = match driver::compile(&source) {
        Ok(js) => js,
        Err(e) => {
            reporter.report_error(file_id, &e);
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = write_output(&args.output, &js) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
