use super::AutomatonError;
use std::{fmt, ops};

/// Ordinal of a state within its automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

impl StateId {
	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for StateId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Identity shared by the states of both automaton kinds.
///
/// Names may collide, only the id tells two states apart.
/// An empty name is allowed.
#[derive(Debug, Clone)]
pub struct State {
	id: StateId,
	name: String,
}

impl State {
	pub fn id(&self) -> StateId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

impl fmt::Display for State {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.name)
	}
}

/// A state node stored in an [`Arena`].
pub(crate) trait Node: AsRef<State> {
	fn from_state(state: State) -> Self;
}

/// Storage for the states of one automaton under construction.
///
/// Ids are handed out from the arena's own counter, so independent
/// automata can be built side by side.
#[derive(Debug, Clone)]
pub(crate) struct Arena<N> {
	nodes: Vec<N>,
}

impl<N> Default for Arena<N> {
	fn default() -> Self {
		Self { nodes: Vec::new() }
	}
}

impl<N> Arena<N>
where
	N: Node,
{
	/// Creates a new state and returns its id.
	pub fn insert<S>(&mut self, name: S) -> StateId
	where
		S: Into<String>,
	{
		let id = StateId(self.nodes.len());
		self.nodes.push(N::from_state(State {
			id,
			name: name.into(),
		}));
		id
	}

	pub fn contains(&self, id: StateId) -> bool {
		id.0 < self.nodes.len()
	}

	/// Returns the first state with a given name.
	pub fn find(&self, name: &str) -> Option<StateId> {
		self.nodes
			.iter()
			.map(AsRef::as_ref)
			.find(|state: &&State| state.name == name)
			.map(State::id)
	}

	/// Returns the state with a given name, creating it if necessary.
	pub fn find_or_insert(&mut self, name: &str) -> StateId {
		match self.find(name) {
			Some(id) => id,
			None => self.insert(name),
		}
	}

	/// Returns a reference to the requested state or an `AutomatonError::InexistentState` error otherwise.
	pub fn get(&self, id: StateId) -> Result<&N, AutomatonError> {
		self.nodes
			.get(id.0)
			.ok_or(AutomatonError::InexistentState(id))
	}

	/// Returns a mutable reference to the requested state or an `AutomatonError::InexistentState` error otherwise.
	pub fn get_mut(&mut self, id: StateId) -> Result<&mut N, AutomatonError> {
		self.nodes
			.get_mut(id.0)
			.ok_or(AutomatonError::InexistentState(id))
	}

	pub fn into_nodes(self) -> Vec<N> {
		self.nodes
	}
}

impl<N> ops::Index<StateId> for Arena<N> {
	type Output = N;

	fn index(&self, id: StateId) -> &N {
		&self.nodes[id.0]
	}
}

impl<N> ops::IndexMut<StateId> for Arena<N> {
	fn index_mut(&mut self, id: StateId) -> &mut N {
		&mut self.nodes[id.0]
	}
}
