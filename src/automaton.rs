use super::{State, StateId};
use std::collections::BTreeSet;
use thiserror::Error;

/// Trait representing an abstract finite automaton.
pub trait Automaton {
	/// Internal state type.
	type Node: AsRef<State>;

	/// Returns all states in ordinal order.
	fn nodes(&self) -> &[Self::Node];

	/// Returns the start state.
	fn start(&self) -> StateId;

	/// Returns the set of accept states.
	fn accept_states(&self) -> &BTreeSet<StateId>;

	/// Returns the input symbols appearing on any transition.
	fn alphabet(&self) -> &BTreeSet<String>;

	/// Runs the automaton on a sequence of input symbols.
	/// Returns whether the automaton ends up accepting.
	fn run<V, T>(&self, inputs: V) -> Result<bool, AutomatonError>
	where
		V: IntoIterator<Item = T>,
		T: AsRef<str>;

	/// Runs the automaton on a string, one symbol per character.
	fn run_str(&self, input: &str) -> Result<bool, AutomatonError> {
		self.run(input.chars().map(String::from))
	}

	/// Returns the number of states.
	fn len(&self) -> usize {
		self.nodes().len()
	}

	/// Checks whether the automaton has no states.
	fn is_empty(&self) -> bool {
		self.nodes().is_empty()
	}

	/// Checks whether the states of the automaton includes a state.
	fn has_state(&self, id: StateId) -> bool {
		id.index() < self.nodes().len()
	}

	/// Returns the identity of a state.
	fn state(&self, id: StateId) -> Option<&State> {
		self.nodes().get(id.index()).map(AsRef::as_ref)
	}

	/// Returns the display name of a state.
	fn name(&self, id: StateId) -> Option<&str> {
		self.state(id).map(State::name)
	}

	/// Finds the first state with a given name.
	/// Names are not unique, see [`State`].
	fn find(&self, name: &str) -> Option<StateId> {
		self.nodes()
			.iter()
			.map(AsRef::as_ref)
			.find(|state: &&State| state.name() == name)
			.map(State::id)
	}

	/// Checks whether a state is accepting.
	fn is_accepting(&self, id: StateId) -> bool {
		self.accept_states().contains(&id)
	}
}

/// Enum representing an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
	/// A state id that does not belong to the automaton.
	#[error("Inexistent State ID \"{0}\"")]
	InexistentState(StateId),

	/// The named start state is not among the constructed states.
	#[error("No start state named \"{0}\"")]
	UnknownStartState(String),

	/// None of the accept state names match a constructed state.
	#[error("No accept state detected among {0:?}")]
	NoAcceptState(Vec<String>),

	/// A table row with a different number of cells than symbols.
	#[error("Row \"{state}\" has {found} cells, expected {expected}")]
	RaggedRow {
		state: String,
		expected: usize,
		found: usize,
	},

	/// The transition function is undefined for a state and symbol.
	#[error("No transition from state \"{state}\" on symbol \"{symbol}\"")]
	MissingTransition { state: String, symbol: String },
}

impl AutomatonError {
	/// Checks whether the error stems from an invalid automaton definition.
	pub fn is_invalid_configuration(&self) -> bool {
		!matches!(self, Self::MissingTransition { .. })
	}
}

/// Joins the names of the given states for display.
pub(crate) fn join_names<A, V>(automaton: &A, ids: V) -> String
where
	A: Automaton,
	V: IntoIterator<Item = StateId>,
{
	ids.into_iter()
		.filter_map(|id| automaton.name(id))
		.collect::<Vec<_>>()
		.join(", ")
}

pub(crate) fn join_symbols(alphabet: &BTreeSet<String>) -> String {
	alphabet.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
