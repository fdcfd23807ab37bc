//! Example: Evaluate a Crisp source file
//!
//! Usage: cargo run --example run_file [script.crisp]
//!
//! Reads standard input when no path is given.

use anyhow::{Context, Result};
use crisp::Session;
use std::env;
use std::fs;
use std::io::{self, Read};

fn main() -> Result<()> {
    let source = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("reading '{}'", path))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading standard input")?;
            buffer
        }
    };

    let session = Session::new();
    let output = session.run_source(&source)?;

    for diagnostic in &output.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    println!("{}", output.result);
    println!("{}", "=".repeat(60));
    println!("{}", session.render_bindings());
    Ok(())
}
