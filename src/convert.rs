//! Subset construction turning an [`Nfa`] into an equivalent total [`Dfa`].

use super::{Arena, Automaton, DState, Dfa, Nfa, StateId};
use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Name of the absorbing state standing for the empty set of NFA states.
pub const DEAD_STATE: &str = "{}";

/// Converts an NFA into a DFA accepting the same language.
///
/// Every DFA state stands for a distinct set of NFA states. Sets are compared by
/// their members, never by their rendered names. Undefined moves lead into a single
/// dead state named [`DEAD_STATE`], so the resulting transition function is total.
/// Runs of the result also fall into the dead state on symbols outside the alphabet.
pub fn subset_construction(nfa: &Nfa) -> Dfa {
	// discovery order doubles as the index of each subset
	let mut subsets = IndexSet::<BTreeSet<StateId>>::new();
	subsets.insert(nfa.epsilon_closure(nfa.start()));

	let mut moves = Vec::new();
	let mut next = 0;
	while let Some(current) = subsets.get_index(next).cloned() {
		for symbol in nfa.alphabet() {
			let target = nfa.step(&current, symbol);
			trace!("{:?} --{}--> {:?}", current, symbol, target);
			let to = if target.is_empty() {
				None
			} else {
				let (index, new) = subsets.insert_full(target);
				if new {
					debug!("Discovered subset {} of NFA states", index);
				}
				Some(index)
			};
			moves.push((next, symbol, to));
		}
		next += 1;
	}

	let mut states = Arena::<DState>::default();
	let ids = subsets
		.iter()
		.map(|subset| states.insert(composite_name(nfa, subset)))
		.collect::<Vec<_>>();
	let dead = states.insert(DEAD_STATE);
	for symbol in nfa.alphabet() {
		states[dead].put_next(symbol.clone(), dead);
	}
	for (from, symbol, to) in moves {
		let to = to.map_or(dead, |index| ids[index]);
		states[ids[from]].put_next(symbol.clone(), to);
	}

	let accept = subsets
		.iter()
		.zip(&ids)
		.filter(|(subset, _)| nfa.any_accepting(subset))
		.map(|(_, id)| *id)
		.collect();
	let members = ids
		.iter()
		.copied()
		.zip(subsets)
		.chain([(dead, BTreeSet::new())])
		.collect::<BTreeMap<_, _>>();
	debug!(
		"Converted NFA with {} states into DFA with {} states",
		nfa.len(),
		members.len()
	);

	Dfa::from_parts(states, ids[0], accept).with_subsets(members, dead)
}

/// Renders a set of NFA states as `{a, b, c}` with member names sorted.
fn composite_name(nfa: &Nfa, subset: &BTreeSet<StateId>) -> String {
	let mut names = subset
		.iter()
		.filter_map(|id| nfa.name(*id))
		.collect::<Vec<_>>();
	names.sort_unstable();
	format!("{{{}}}", names.join(", "))
}

impl Dfa {
	/// Converts an NFA into a DFA accepting the same language.
	/// See [`subset_construction`].
	pub fn from_nfa(nfa: &Nfa) -> Self {
		subset_construction(nfa)
	}
}

impl From<&Nfa> for Dfa {
	fn from(nfa: &Nfa) -> Self {
		subset_construction(nfa)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use maplit::btreeset;

	/// Every word over the alphabet up to the given length.
	fn words(alphabet: &BTreeSet<String>, max: usize) -> Vec<Vec<String>> {
		let mut words = vec![vec![]];
		let mut layer = vec![vec![]];
		for _ in 0..max {
			layer = layer
				.iter()
				.flat_map(|word: &Vec<String>| {
					alphabet.iter().map(move |symbol| {
						let mut word = word.clone();
						word.push(symbol.clone());
						word
					})
				})
				.collect();
			words.extend(layer.iter().cloned());
		}
		words
	}

	fn assert_equivalent(nfa: &Nfa, dfa: &Dfa, max: usize) {
		for word in words(nfa.alphabet(), max) {
			assert_eq!(
				Ok(nfa.accepts(&word)),
				dfa.accepts(&word),
				"Languages differ on {:?}",
				word
			);
		}
	}

	fn assert_total(dfa: &Dfa) {
		for node in dfa.nodes() {
			for symbol in dfa.alphabet() {
				assert!(
					node.next_state(symbol).is_some(),
					"{} has no transition on {}",
					node.name(),
					symbol
				);
			}
		}
		assert!(dfa.is_total());
	}

	/// p0 -1-> {p0, p1}, p1 -1-> p2, p2 loops on 0 and 1
	fn demo() -> Nfa {
		let mut builder = Nfa::builder();
		let p0 = builder.add_state("p0");
		let p1 = builder.add_state("p1");
		let p2 = builder.add_state("p2");
		builder.add_transition(p0, '1', p1).unwrap();
		builder.add_transition(p0, '1', p0).unwrap();
		builder.add_transition(p1, '1', p2).unwrap();
		builder.add_transition(p2, '0', p2).unwrap();
		builder.add_transition(p2, '1', p2).unwrap();
		builder.build(p0, vec![p2]).unwrap()
	}

	/// p0 -1-> p1 -1-> p2, p0 -ε-> p2, p2 loops on 0 and 1
	fn branches() -> Nfa {
		let mut builder = Nfa::builder();
		let p0 = builder.add_state("p0");
		let p1 = builder.add_state("p1");
		let p2 = builder.add_state("p2");
		builder.add_transition(p0, '1', p1).unwrap();
		builder.add_epsilon(p0, p2).unwrap();
		builder.add_transition(p1, '1', p2).unwrap();
		builder.add_transition(p2, '0', p2).unwrap();
		builder.add_transition(p2, '1', p2).unwrap();
		builder.build(p0, vec![p2]).unwrap()
	}

	/// Strings over {a, b} ending in "ab", built with epsilon cycles and an
	/// accept state that cannot be reached from the start.
	fn tangled() -> Nfa {
		let mut builder = Nfa::builder();
		let s = builder.add_state("s");
		let t = builder.add_state("t");
		let u = builder.add_state("u");
		let v = builder.add_state("v");
		let lost = builder.add_state("lost");
		builder.add_epsilon(s, t).unwrap();
		builder.add_epsilon(t, s).unwrap();
		builder.add_transition(s, 'a', s).unwrap();
		builder.add_transition(t, 'b', t).unwrap();
		builder.add_transition(t, 'a', u).unwrap();
		builder.add_transition(u, 'b', v).unwrap();
		builder.add_transition(lost, 'a', v).unwrap();
		builder.add_epsilon(lost, lost).unwrap();
		builder.build(s, vec![v, lost]).unwrap()
	}

	#[test]
	fn demo_table() {
		let nfa = demo();
		let dfa = subset_construction(&nfa);

		let names = dfa
			.nodes()
			.iter()
			.map(|node| node.name())
			.collect::<Vec<_>>();
		assert_eq!(vec!["{p0}", "{p0, p1}", "{p0, p1, p2}", "{p2}", DEAD_STATE], names);
		assert_eq!(Some("{p0}"), dfa.name(dfa.start()));
		assert_eq!(
			btreeset!["{p0, p1, p2}", "{p2}"],
			dfa.accept_states()
				.iter()
				.filter_map(|id| dfa.name(*id))
				.collect::<BTreeSet<_>>()
		);

		assert_eq!(Ok(true), dfa.run_str("1100001010101"));
		assert_eq!(Ok(false), dfa.run_str("1010101"));
		assert_total(&dfa);
		assert_equivalent(&nfa, &dfa, 8);
	}

	#[test]
	fn epsilon_start() {
		let nfa = branches();
		let dfa = Dfa::from(&nfa);

		assert_eq!(Some("{p0, p2}"), dfa.name(dfa.start()));
		assert!(dfa.is_accepting(dfa.start()), "Empty word rejected");
		assert_eq!(Ok(true), dfa.run_str("1100001010101"));
		assert_eq!(Ok(true), dfa.run_str(""));
		assert_total(&dfa);
		assert_equivalent(&nfa, &dfa, 8);
	}

	#[test]
	fn dead_state() {
		let nfa = tangled();
		let dfa = Dfa::from_nfa(&nfa);

		let dead = dfa.dead_state().unwrap();
		assert_eq!(Some(DEAD_STATE), dfa.name(dead));
		assert_eq!(Some(&BTreeSet::new()), dfa.subset(dead));
		assert!(!dfa.is_accepting(dead), "Dead state accepting");
		for symbol in dfa.alphabet() {
			assert_eq!(Some(dead), dfa.node(dead).unwrap().next_state(symbol));
		}
		assert_eq!(
			1,
			dfa.nodes()
				.iter()
				.filter(|node| node.name() == DEAD_STATE)
				.count()
		);
	}

	#[test]
	fn unreachable_accept() {
		let nfa = tangled();
		let dfa = Dfa::from_nfa(&nfa);
		let lost = nfa.find("lost").unwrap();

		assert!(dfa
			.nodes()
			.iter()
			.filter_map(|node| dfa.subset(node.id()))
			.all(|subset| !subset.contains(&lost)));
		assert_eq!(Ok(true), dfa.run_str("bbaab"));
		assert_eq!(Ok(false), dfa.run_str("aba"));
		assert_total(&dfa);
		assert_equivalent(&nfa, &dfa, 7);
	}

	#[test]
	fn no_duplicate_subsets() {
		for nfa in [demo(), branches(), tangled()] {
			let dfa = Dfa::from_nfa(&nfa);
			let subsets = dfa
				.nodes()
				.iter()
				.filter_map(|node| dfa.subset(node.id()))
				.collect::<Vec<_>>();
			assert_eq!(dfa.len(), subsets.len(), "State without subset");
			assert_eq!(
				subsets.len(),
				subsets.iter().collect::<BTreeSet<_>>().len(),
				"Set-equal subsets materialized twice"
			);
		}
	}

	#[test]
	fn colliding_names() {
		// two distinct states named alike must not be merged
		let mut builder = Nfa::builder();
		let start = builder.add_state("x");
		let twin = builder.add_state("x");
		let end = builder.add_state("y");
		builder.add_transition(start, 'a', twin).unwrap();
		builder.add_transition(twin, 'a', end).unwrap();
		let nfa = builder.build(start, vec![end]).unwrap();
		let dfa = Dfa::from_nfa(&nfa);

		assert_eq!(Ok(false), dfa.run_str("a"));
		assert_eq!(Ok(true), dfa.run_str("aa"));
		assert_eq!(
			2,
			dfa.nodes()
				.iter()
				.filter(|node| node.name() == "{x}")
				.count()
		);
		assert_equivalent(&nfa, &dfa, 4);
	}

	#[test]
	fn empty_alphabet() {
		let mut builder = Nfa::builder();
		let q0 = builder.add_state("q0");
		let q1 = builder.add_state("q1");
		builder.add_epsilon(q0, q1).unwrap();
		let nfa = builder.build(q0, vec![q1]).unwrap();
		let dfa = Dfa::from_nfa(&nfa);

		assert_eq!(2, dfa.len());
		assert!(dfa.alphabet().is_empty());
		assert_eq!(Ok(true), dfa.run_str(""));
		assert_eq!(Ok(false), dfa.run_str("a"));
	}

	#[test]
	fn unknown_symbols() {
		let mut builder = Nfa::builder();
		let q0 = builder.add_state("q0");
		let q1 = builder.add_state("q1");
		builder.add_transition(q0, 'a', q1).unwrap();
		let nfa = builder.build(q0, vec![q1]).unwrap();
		let dfa = Dfa::from_nfa(&nfa);

		assert_eq!(Ok(true), dfa.run_str("a"));
		for input in ["b", "ab", "ba"] {
			assert_eq!(
				nfa.run_str(input),
				dfa.run_str(input),
				"Disagreement on {:?}",
				input
			);
			assert_eq!(Ok(false), dfa.run_str(input));
		}

		let mut run = dfa.start_run();
		run.step("b").unwrap();
		assert_eq!(dfa.dead_state(), Some(run.current()));
		run.step("a").unwrap();
		assert_eq!(dfa.dead_state(), Some(run.current()));
	}
}
