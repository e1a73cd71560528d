//! Transition tables describing automata, as read from configuration files.
//!
//! Each row names a state followed by one cell per symbol column. Destination
//! states that never head a row are created when first referenced.

use super::{AutomatonError, Dfa, Nfa, StateId, Symbol};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Transition table of an [`Nfa`].
/// A `null` symbol column holds the epsilon transitions.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NfaTable {
	pub symbols: Vec<Symbol>,
	pub rows: Vec<NfaRow>,
	pub start: String,
	pub accept: Vec<String>,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NfaRow {
	pub state: String,
	pub next: Vec<Vec<String>>,
}

/// Transition table of a [`Dfa`].
/// A `null` cell leaves the transition undefined.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DfaTable {
	pub symbols: Vec<String>,
	pub rows: Vec<DfaRow>,
	pub start: String,
	pub accept: Vec<String>,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DfaRow {
	pub state: String,
	pub next: Vec<Option<String>>,
}

/// Checks that a row has exactly one cell per symbol.
fn check_width<C>(state: &str, cells: &[C], expected: usize) -> Result<(), AutomatonError> {
	if cells.len() == expected {
		Ok(())
	} else {
		Err(AutomatonError::RaggedRow {
			state: state.to_string(),
			expected,
			found: cells.len(),
		})
	}
}

/// Resolves the start and accept states by name.
fn resolve<F>(
	find: F,
	start: &str,
	accept: &[String],
) -> Result<(StateId, Vec<StateId>), AutomatonError>
where
	F: Fn(&str) -> Option<StateId>,
{
	let start =
		find(start).ok_or_else(|| AutomatonError::UnknownStartState(start.to_string()))?;
	let accept_ids = accept
		.iter()
		.filter_map(|name| find(name.as_str()))
		.collect::<Vec<_>>();
	if accept_ids.is_empty() {
		Err(AutomatonError::NoAcceptState(accept.to_vec()))
	} else {
		Ok((start, accept_ids))
	}
}

impl NfaTable {
	/// Builds the automaton described by the table.
	pub fn build(&self) -> Result<Nfa, AutomatonError> {
		let mut builder = Nfa::builder();
		for row in &self.rows {
			check_width(&row.state, &row.next, self.symbols.len())?;
			let prev = builder.state_named(&row.state);
			for (symbol, cell) in self.symbols.iter().zip(&row.next) {
				for name in cell {
					let next = builder.state_named(name);
					builder.add_transition(prev, symbol.clone(), next)?;
				}
			}
		}
		let (start, accept) = resolve(|name| builder.find(name), &self.start, &self.accept)?;
		debug!("Loaded NFA table with {} rows", self.rows.len());
		builder.build(start, accept)
	}
}

impl DfaTable {
	/// Builds the automaton described by the table.
	pub fn build(&self) -> Result<Dfa, AutomatonError> {
		let mut builder = Dfa::builder();
		for row in &self.rows {
			check_width(&row.state, &row.next, self.symbols.len())?;
			let prev = builder.state_named(&row.state);
			for (symbol, cell) in self.symbols.iter().zip(&row.next) {
				if let Some(name) = cell {
					let next = builder.state_named(name);
					builder.add_transition(prev, symbol.as_str(), next)?;
				}
			}
		}
		let (start, accept) = resolve(|name| builder.find(name), &self.start, &self.accept)?;
		debug!("Loaded DFA table with {} rows", self.rows.len());
		builder.build(start, accept)
	}
}

impl TryFrom<NfaTable> for Nfa {
	type Error = AutomatonError;

	fn try_from(table: NfaTable) -> Result<Self, Self::Error> {
		table.build()
	}
}

impl TryFrom<DfaTable> for Dfa {
	type Error = AutomatonError;

	fn try_from(table: DfaTable) -> Result<Self, Self::Error> {
		table.build()
	}
}
