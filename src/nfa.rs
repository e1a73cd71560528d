use super::{
	automaton::{join_names, join_symbols},
	Arena, Automaton, AutomatonError, Node, State, StateId, Symbol,
};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt,
};
use tracing::{debug, trace};

/// A state of a nondeterministic finite automaton.
#[derive(Debug, Clone)]
pub struct NState {
	state: State,
	epsilon: BTreeSet<StateId>,
	transitions: BTreeMap<String, BTreeSet<StateId>>,
}

impl NState {
	pub fn id(&self) -> StateId {
		self.state.id()
	}

	pub fn name(&self) -> &str {
		self.state.name()
	}

	/// Adds a successor.
	/// Returns `false` if the transition already existed.
	fn put_next(&mut self, symbol: Symbol, next: StateId) -> bool {
		match symbol {
			Symbol::Epsilon => self.epsilon.insert(next),
			Symbol::Input(symbol) => self.transitions.entry(symbol).or_default().insert(next),
		}
	}

	/// Returns the successors under a symbol, or `None` if no transition is defined.
	pub fn next_states(&self, symbol: &Symbol) -> Option<&BTreeSet<StateId>> {
		match symbol {
			Symbol::Epsilon => Some(&self.epsilon).filter(|next| !next.is_empty()),
			Symbol::Input(symbol) => self.transitions.get(symbol),
		}
	}

	/// Iterates the successors under a symbol.
	/// An undefined transition yields nothing.
	pub fn walk(&self, symbol: &Symbol) -> impl Iterator<Item = StateId> + '_ {
		self.next_states(symbol).into_iter().flatten().copied()
	}

	pub fn walk_input(&self, symbol: &str) -> impl Iterator<Item = StateId> + '_ {
		self.transitions.get(symbol).into_iter().flatten().copied()
	}

	pub fn walk_epsilon(&self) -> impl Iterator<Item = StateId> + '_ {
		self.epsilon.iter().copied()
	}

	/// Returns the successors under any symbol, epsilon included.
	pub fn successors(&self) -> BTreeSet<StateId> {
		self.transitions
			.values()
			.flatten()
			.chain(&self.epsilon)
			.copied()
			.collect()
	}

	/// Iterates every symbol with a transition to the given state.
	pub fn symbols_to(&self, next: StateId) -> impl Iterator<Item = Symbol> + '_ {
		let epsilon = self.epsilon.contains(&next).then_some(Symbol::Epsilon);
		epsilon.into_iter().chain(
			self.transitions
				.iter()
				.filter(move |(_, states)| states.contains(&next))
				.map(|(symbol, _)| Symbol::input(symbol.as_str())),
		)
	}

	/// Iterates all transitions, epsilon transitions first.
	pub fn transitions(&self) -> impl Iterator<Item = (Symbol, StateId)> + '_ {
		self.epsilon
			.iter()
			.map(|next| (Symbol::Epsilon, *next))
			.chain(self.transitions.iter().flat_map(|(symbol, states)| {
				states
					.iter()
					.map(move |next| (Symbol::input(symbol.as_str()), *next))
			}))
	}

	fn symbols(&self) -> impl Iterator<Item = &String> {
		self.transitions.keys()
	}
}

impl AsRef<State> for NState {
	fn as_ref(&self) -> &State {
		&self.state
	}
}

impl Node for NState {
	fn from_state(state: State) -> Self {
		Self {
			state,
			epsilon: BTreeSet::new(),
			transitions: BTreeMap::new(),
		}
	}
}

/// Builder wiring up the states of an [`Nfa`].
#[derive(Debug, Clone, Default)]
pub struct NfaBuilder {
	states: Arena<NState>,
}

impl NfaBuilder {
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

	/// Adds a new transition.
	/// Returns `false` if the transition already existed.
	/// Returns an `AutomatonError::InexistentState` error if one of the states is inexistent.
	pub fn add_transition<Y>(
		&mut self,
		prev: StateId,
		symbol: Y,
		next: StateId,
	) -> Result<bool, AutomatonError>
	where
		Y: Into<Symbol>,
	{
		if !self.states.contains(next) {
			Err(AutomatonError::InexistentState(next))
		} else {
			let symbol = symbol.into();
			trace!("Adding transition {} --{}--> {}", prev, symbol, next);
			Ok(self.states.get_mut(prev)?.put_next(symbol, next))
		}
	}

	/// Adds a new epsilon transition.
	pub fn add_epsilon(&mut self, prev: StateId, next: StateId) -> Result<bool, AutomatonError> {
		self.add_transition(prev, Symbol::Epsilon, next)
	}

	/// Finishes construction.
	/// Returns an `AutomatonError::InexistentState` error if the start or an accept state is inexistent.
	pub fn build<A>(self, start: StateId, accept: A) -> Result<Nfa, AutomatonError>
	where
		A: IntoIterator<Item = StateId>,
	{
		self.states.get(start)?;
		let accept = accept
			.into_iter()
			.map(|id| self.states.get(id).map(|_| id))
			.collect::<Result<BTreeSet<_>, _>>()?;
		let states = self.states.into_nodes();
		let alphabet = states
			.iter()
			.flat_map(NState::symbols)
			.cloned()
			.collect::<BTreeSet<_>>();
		debug!(
			"Built NFA with {} states over {} symbols",
			states.len(),
			alphabet.len()
		);
		Ok(Nfa {
			states,
			start,
			accept,
			alphabet,
		})
	}
}

/// A nondeterministic finite automaton with epsilon transitions.
///
/// Immutable once built, see [`NfaBuilder`].
#[derive(Debug, Clone)]
pub struct Nfa {
	states: Vec<NState>,
	start: StateId,
	accept: BTreeSet<StateId>,
	alphabet: BTreeSet<String>,
}

impl Nfa {
	pub fn builder() -> NfaBuilder {
		NfaBuilder::new()
	}

	/// Returns the requested state node.
	pub fn node(&self, id: StateId) -> Option<&NState> {
		self.states.get(id.index())
	}

	/// Checks whether a set of states contains an accept state.
	pub fn any_accepting(&self, states: &BTreeSet<StateId>) -> bool {
		!states.is_disjoint(&self.accept)
	}

	/// Starts a stepwise run in the epsilon closure of the start state.
	pub fn start_run(&self) -> NfaRun<'_> {
		NfaRun {
			nfa: self,
			current: self.epsilon_closure(self.start),
		}
	}

	/// Checks whether the automaton accepts a sequence of input symbols.
	pub fn accepts<V, T>(&self, inputs: V) -> bool
	where
		V: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let mut run = self.start_run();
		for input in inputs {
			run.step(input.as_ref());
		}
		run.is_accepting()
	}
}

impl Automaton for Nfa {
	type Node = NState;

	fn nodes(&self) -> &[NState] {
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
		Ok(self.accepts(inputs))
	}
}

impl fmt::Display for Nfa {
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

/// A stepwise run of an [`Nfa`], tracking the set of active states.
#[derive(Debug, Clone)]
pub struct NfaRun<'a> {
	nfa: &'a Nfa,
	current: BTreeSet<StateId>,
}

impl<'a> NfaRun<'a> {
	/// Returns the currently active states.
	pub fn current(&self) -> &BTreeSet<StateId> {
		&self.current
	}

	/// Performs a single step on an input symbol.
	/// Active states without a transition on the symbol simply drop out.
	pub fn step(&mut self, input: &str) {
		self.current = self.nfa.step(&self.current, input);
		trace!("Stepped on {:?} into {:?}", input, self.current);
	}

	/// Checks whether an active state is accepting.
	pub fn is_accepting(&self) -> bool {
		self.nfa.any_accepting(&self.current)
	}

	/// Checks whether no state is active anymore.
	pub fn is_stuck(&self) -> bool {
		self.current.is_empty()
	}
}
