use std::{env, fs, fs::File, process};

use anyhow::{Context as _, Result};

use mavn::report::{Console, Reporter, Silent};

const USAGE: &str = "usage: mavn <input.mavn> <output.s> [--verbose]";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let input = args.next().context(USAGE)?;
    let output = args.next().context(USAGE)?;
    let verbose = matches!(args.next().as_deref(), Some("--verbose" | "-v"));

    let file = File::open(&input).with_context(|| format!("failed to open {}", input))?;

    let mut reporter: Box<dyn Reporter> = if verbose {
        Box::new(Console)
    } else {
        Box::new(Silent)
    };

    // The output file is only created once the whole pipeline has succeeded.
    let mut assembly = Vec::new();
    mavn::compile(file, &mut assembly, reporter.as_mut())?;
    fs::write(&output, &assembly).with_context(|| format!("failed to write {}", output))?;

    Ok(())
}
