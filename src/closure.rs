//! Epsilon closures and symbol moves over the state graph of an [`Nfa`].

use super::{NState, Nfa, StateId};
use std::collections::BTreeSet;
use tracing::trace;

impl Nfa {
	/// Returns the states reachable from a state by zero or more epsilon transitions.
	/// The state itself is always included.
	pub fn epsilon_closure(&self, state: StateId) -> BTreeSet<StateId> {
		self.epsilon_reach([state])
	}

	/// Returns the states reachable from a state by one or more epsilon transitions.
	/// The state itself is only included if it lies on an epsilon cycle.
	pub fn epsilon_closure_without_self(&self, state: StateId) -> BTreeSet<StateId> {
		let seeds = self
			.node(state)
			.into_iter()
			.flat_map(NState::walk_epsilon)
			.collect::<Vec<_>>();
		self.epsilon_reach(seeds)
	}

	/// Returns the union of the epsilon closures of a set of states.
	pub fn epsilon_closure_of<V>(&self, states: V) -> BTreeSet<StateId>
	where
		V: IntoIterator<Item = StateId>,
	{
		self.epsilon_reach(states)
	}

	/// Returns the direct successors of a set of states under an input symbol.
	/// Epsilon transitions are not followed.
	pub fn move_on(&self, states: &BTreeSet<StateId>, symbol: &str) -> BTreeSet<StateId> {
		states
			.iter()
			.filter_map(|id| self.node(*id))
			.flat_map(|node| node.walk_input(symbol))
			.collect()
	}

	/// Returns the epsilon closure of the direct successors of a set of states under an input symbol.
	pub fn step(&self, states: &BTreeSet<StateId>, symbol: &str) -> BTreeSet<StateId> {
		self.epsilon_reach(self.move_on(states, symbol))
	}

	/// Depth-first traversal of the epsilon edges starting at the seeds.
	/// A visited state is never expanded twice, so cycles terminate.
	fn epsilon_reach<V>(&self, seeds: V) -> BTreeSet<StateId>
	where
		V: IntoIterator<Item = StateId>,
	{
		let mut visited = BTreeSet::new();
		let mut stack = seeds.into_iter().collect::<Vec<_>>();
		while let Some(id) = stack.pop() {
			if !visited.insert(id) {
				continue;
			}
			match self.node(id) {
				Some(node) => {
					stack.extend(node.walk_epsilon().filter(|next| !visited.contains(next)))
				}
				None => trace!("Skipping inexistent state {}", id),
			}
		}
		visited
	}
}
