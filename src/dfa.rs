use super::{
	automaton::{join_names, join_symbols},
	Arena, Automaton, AutomatonError, Node, State, StateId,
};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt,
};
use tracing::{debug, trace};

/// A state of a deterministic finite automaton.
#[derive(Debug, Clone)]
pub struct DState {
	state: State,
	transitions: BTreeMap<String, StateId>,
}

impl DState {
	pub fn id(&self) -> StateId {
		self.state.id()
	}

	pub fn name(&self) -> &str {
		self.state.name()
	}

	/// Sets the successor for a symbol, returning the replaced one.
	pub(crate) fn put_next(&mut self, symbol: String, next: StateId) -> Option<StateId> {
		self.transitions.insert(symbol, next)
	}

	/// Returns the successor for a symbol, or `None` if no transition is defined.
	pub fn next_state(&self, symbol: &str) -> Option<StateId> {
		self.transitions.get(symbol).copied()
	}

	/// Returns the successor for a symbol.
	/// Returns an `AutomatonError::MissingTransition` error if no transition is defined.
	pub fn walk(&self, symbol: &str) -> Result<StateId, AutomatonError> {
		self.next_state(symbol)
			.ok_or_else(|| AutomatonError::MissingTransition {
				state: self.state.name().to_string(),
				symbol: symbol.to_string(),
			})
	}

	/// Returns the successors under any symbol.
	pub fn successors(&self) -> BTreeSet<StateId> {
		self.transitions.values().copied().collect()
	}

	/// Returns the first symbol with a transition to the given state.
	pub fn symbol_to(&self, next: StateId) -> Option<&str> {
		self.transitions
			.iter()
			.find(|(_, state)| **state == next)
			.map(|(symbol, _)| symbol.as_str())
	}

	pub fn transitions(&self) -> impl Iterator<Item = (&str, StateId)> {
		self.transitions
			.iter()
			.map(|(symbol, next)| (symbol.as_str(), *next))
	}
}

impl AsRef<State> for DState {
	fn as_ref(&self) -> &State {
		&self.state
	}
}

impl Node for DState {
	fn from_state(state: State) -> Self {
		Self {
			state,
			transitions: BTreeMap::new(),
		}
	}
}

/// Builder wiring up the states of a [`Dfa`].
#[derive(Debug, Clone, Default)]
pub struct DfaBuilder {
	states: Arena<DState>,
}

impl DfaBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a new state and returns its id.
	pub fn add_state<S>(&mut self, name: S) -> StateId
	where
		S: Into<String>,
	{
		self.states.insert(name)
	}

	/// Returns the first state with a given name, adding it if it does not exist yet.
	pub fn state_named(&mut self, name: &str) -> StateId {
		self.states.find_or_insert(name)
	}

	pub fn find(&self, name: &str) -> Option<StateId> {
		self.states.find(name)
	}

	/// Adds a new transition, replacing any previous one for the same symbol.
	/// Returns the replaced successor.
	/// Returns an `AutomatonError::InexistentState` error if one of the states is inexistent.
	pub fn add_transition<Y>(
		&mut self,
		prev: StateId,
		symbol: Y,
		next: StateId,
	) -> Result<Option<StateId>, AutomatonError>
	where
		Y: Into<String>,
	{
		if !self.states.contains(next) {
			Err(AutomatonError::InexistentState(next))
		} else {
			let symbol = symbol.into();
			trace!("Adding transition {} --{}--> {}", prev, symbol, next);
			Ok(self.states.get_mut(prev)?.put_next(symbol, next))
		}
	}

	/// Finishes construction.
	/// Returns an `AutomatonError::InexistentState` error if the start or an accept state is inexistent.
	pub fn build<A>(self, start: StateId, accept: A) -> Result<Dfa, AutomatonError>
	where
		A: IntoIterator<Item = StateId>,
	{
		self.states.get(start)?;
		let accept = accept
			.into_iter()
			.map(|id| self.states.get(id).map(|_| id))
			.collect::<Result<BTreeSet<_>, _>>()?;
		Ok(Dfa::from_parts(self.states, start, accept))
	}
}

/// A deterministic finite automaton.
///
/// The transition function may be partial when built by hand.
/// Automata produced by subset construction are always total.
#[derive(Debug, Clone)]
pub struct Dfa {
	states: Vec<DState>,
	start: StateId,
	accept: BTreeSet<StateId>,
	alphabet: BTreeSet<String>,
	subsets: BTreeMap<StateId, BTreeSet<StateId>>,
	dead: Option<StateId>,
}

impl Dfa {
	pub fn builder() -> DfaBuilder {
		DfaBuilder::new()
	}

	/// Assembles a DFA from states known to contain the start and accept states.
	pub(crate) fn from_parts(
		states: Arena<DState>,
		start: StateId,
		accept: BTreeSet<StateId>,
	) -> Self {
		let states = states.into_nodes();
		let alphabet = states
			.iter()
			.flat_map(|node| node.transitions.keys())
			.cloned()
			.collect::<BTreeSet<_>>();
		debug!(
			"Built DFA with {} states over {} symbols",
			states.len(),
			alphabet.len()
		);
		Self {
			states,
			start,
			accept,
			alphabet,
			subsets: BTreeMap::new(),
			dead: None,
		}
	}

	/// Attaches the NFA state sets each state was constructed from.
	pub(crate) fn with_subsets(
		mut self,
		subsets: BTreeMap<StateId, BTreeSet<StateId>>,
		dead: StateId,
	) -> Self {
		self.subsets = subsets;
		self.dead = Some(dead);
		self
	}

	/// Returns the requested state node.
	pub fn node(&self, id: StateId) -> Option<&DState> {
		self.states.get(id.index())
	}

	/// Returns the NFA states a converted state stands for.
	/// Returns `None` for automata not produced by subset construction.
	pub fn subset(&self, id: StateId) -> Option<&BTreeSet<StateId>> {
		self.subsets.get(&id)
	}

	/// Returns the absorbing dead state of a converted automaton.
	pub fn dead_state(&self) -> Option<StateId> {
		self.dead
	}

	/// Checks whether every state has a successor for every symbol of the alphabet.
	pub fn is_total(&self) -> bool {
		self.states.iter().all(|node| {
			self.alphabet
				.iter()
				.all(|symbol| node.transitions.contains_key(symbol))
		})
	}

	/// Starts a stepwise run in the start state.
	pub fn start_run(&self) -> DfaRun<'_> {
		DfaRun {
			dfa: self,
			current: self.start,
		}
	}

	/// Checks whether the automaton accepts a sequence of input symbols.
	/// Symbols outside the alphabet of a converted automaton reject the input.
	/// Otherwise an undefined transition returns an `AutomatonError::MissingTransition` error.
	pub fn accepts<V, T>(&self, inputs: V) -> Result<bool, AutomatonError>
	where
		V: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let mut run = self.start_run();
		for input in inputs {
			run.step(input.as_ref())?;
		}
		Ok(run.is_accepting())
	}
}

impl Automaton for Dfa {
	type Node = DState;

	fn nodes(&self) -> &[DState] {
		&self.states
	}

	fn start(&self) -> StateId {
		self.start
	}

	fn accept_states(&self) -> &BTreeSet<StateId> {
		&self.accept
	}

	fn alphabet(&self) -> &BTreeSet<String> {
		&self.alphabet
	}

	fn run<V, T>(&self, inputs: V) -> Result<bool, AutomatonError>
	where
		V: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		self.accepts(inputs)
	}
}

impl fmt::Display for Dfa {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let ids = self.states.iter().map(|node| node.state.id());
		writeln!(f, "states: {}", join_names(self, ids))?;
		writeln!(f, "alphabet: {}", join_symbols(&self.alphabet))?;
		for node in &self.states {
			for (symbol, next) in node.transitions() {
				writeln!(
					f,
					"{} --{}--> {}",
					node.state,
					symbol,
					self.name(next).unwrap_or_default()
				)?;
			}
		}
		writeln!(f, "start: {}", self.name(self.start).unwrap_or_default())?;
		write!(f, "accept: {}", join_names(self, self.accept.iter().copied()))
	}
}

/// A stepwise run of a [`Dfa`].
#[derive(Debug, Clone)]
pub struct DfaRun<'a> {
	dfa: &'a Dfa,
	current: StateId,
}

impl<'a> DfaRun<'a> {
	pub fn current(&self) -> StateId {
		self.current
	}

	/// Performs a single state transition.
	/// A converted automaton moves into its dead state on symbols outside its alphabet.
	/// Otherwise a missing transition is an error and the run stays in its current state.
	pub fn step(&mut self, input: &str) -> Result<(), AutomatonError> {
		let node = self
			.dfa
			.node(self.current)
			.ok_or(AutomatonError::InexistentState(self.current))?;
		self.current = match (node.walk(input), self.dfa.dead) {
			(Ok(next), _) => next,
			(Err(_), Some(dead)) => dead,
			(Err(error), None) => return Err(error),
		};
		trace!(
			"Stepped on {:?} into {}",
			input,
			self.dfa.name(self.current).unwrap_or_default()
		);
		Ok(())
	}

	pub fn is_accepting(&self) -> bool {
		self.dfa.is_accepting(self.current)
	}
}
