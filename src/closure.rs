use crate::automaton::Automaton;
use std::{
	collections::{BTreeSet, VecDeque},
	fmt,
};

/// Computes the epsilon closure of a set of states.
///
/// The result holds every state reachable from `states` using only epsilon transitions, including `states` itself.
/// Deterministic automata have no epsilon transitions, so their closure is the input set.
pub fn closure<S, I>(automaton: &Automaton<S, I>, states: &BTreeSet<S>) -> BTreeSet<S>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	let mut visited = states.clone();
	let mut queue: VecDeque<&S> = states.iter().collect();

	while let Some(state) = queue.pop_front() {
		for next in automaton.successors(state, None) {
			if visited.insert(next.clone()) {
				queue.push_back(next);
			}
		}
	}

	visited
}
