use anyhow::{Context, Result};
use clap::Parser;
use powerset::{Automaton, Dfa, DfaTable, Nfa, NfaTable};
use std::path::PathBuf;
use tracing::{debug, info, Level};

/// Loads an automaton from a YAML transition table, converts it into a DFA
/// and decides acceptance of the given inputs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// YAML file holding the transition table
	table: PathBuf,

	/// Input strings, one symbol per character
	inputs: Vec<String>,

	/// Read a DFA table instead of an NFA table
	#[arg(short = 'D', long)]
	deterministic: bool,

	/// Enable verbose logging
	#[arg(short, long, conflicts_with = "debug")]
	verbose: bool,

	/// Turn on debugging information
	#[arg(short, long)]
	debug: bool,
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose {
		Level::TRACE
	} else if cli.debug {
		Level::DEBUG
	} else {
		Level::INFO
	};
	let subscriber = tracing_subscriber::fmt()
		.compact()
		.with_level(true)
		.with_max_level(level)
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)
		.context("Unable to set global tracing subscriber")?;

	let source = std::fs::read_to_string(&cli.table)
		.with_context(|| format!("Unable to read {}", cli.table.display()))?;
	debug!("Read table from {:?}", cli.table);

	let dfa = if cli.deterministic {
		let table: DfaTable = serde_yaml::from_str(&source).context("Malformed DFA table")?;
		Dfa::try_from(table)?
	} else {
		let table: NfaTable = serde_yaml::from_str(&source).context("Malformed NFA table")?;
		let nfa = Nfa::try_from(table)?;
		info!("Converting NFA with {} states", nfa.len());
		Dfa::from_nfa(&nfa)
	};
	println!("{}", dfa);

	for input in &cli.inputs {
		match dfa.run_str(input) {
			Ok(true) => println!("{:?}: accepted", input),
			Ok(false) => println!("{:?}: rejected", input),
			Err(error) => println!("{:?}: {}", input, error),
		}
	}
	Ok(())
}
