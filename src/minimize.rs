use crate::{
	automaton::{Automaton, Kind},
	validate::ValidationError,
};
use log::debug;
use std::{
	collections::{BTreeMap, BTreeSet, VecDeque},
	fmt,
};
use thiserror::Error;

/// Enum representing a minimization failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MinimizeError<S, I>
where
	S: fmt::Debug,
	I: fmt::Debug,
{
	#[error("minimization needs a DFA, got a {0}")]
	WrongKind(Kind),

	#[error("minimization produced an invalid DFA: {0}")]
	Invalid(ValidationError<S, I>),
}

/// Finds all states reachable from the start state.
fn reachable<S, I>(dfa: &Automaton<S, I>) -> BTreeSet<&S>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	let mut visited = BTreeSet::new();
	let mut queue = VecDeque::new();
	visited.insert(dfa.start());
	queue.push_back(dfa.start());

	while let Some(state) = queue.pop_front() {
		for symbol in dfa.alphabet() {
			if let Some(next) = dfa.target(state, symbol) {
				if visited.insert(next) {
					queue.push_back(next);
				}
			}
		}
	}

	visited
}

/// Finds the states of `among` from which an accepting state can be reached.
fn live<'a, S, I>(dfa: &'a Automaton<S, I>, among: &BTreeSet<&'a S>) -> BTreeSet<&'a S>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	let mut predecessors: BTreeMap<&S, Vec<&S>> = BTreeMap::new();
	for (prev, _, next) in dfa.transitions() {
		if among.contains(prev) {
			predecessors.entry(next).or_insert_with(Vec::new).push(prev);
		}
	}

	let mut visited: BTreeSet<&S> = among
		.iter()
		.copied()
		.filter(|state| dfa.is_accepting(state))
		.collect();
	let mut queue: VecDeque<&S> = visited.iter().copied().collect();

	while let Some(state) = queue.pop_front() {
		for &prev in predecessors.get(state).into_iter().flatten() {
			if visited.insert(prev) {
				queue.push_back(prev);
			}
		}
	}

	visited
}

/// Minimizes a DFA by partition refinement.
///
/// Unreachable states are dropped first, as are dead states (no accepting state reachable) other than the start state.
/// Transitions into dropped states become missing transitions, so an explicit trap state and a missing transition end up the same.
/// The remaining states are refined Moore style, starting from accepting and non-accepting blocks, until no block splits.
/// Each block becomes one state, named after its smallest member.
pub fn minimize<S, I>(dfa: &Automaton<S, I>) -> Result<Automaton<S, I>, MinimizeError<S, I>>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	if dfa.kind() != Kind::Dfa {
		return Err(MinimizeError::WrongKind(dfa.kind()));
	}

	let reachable = reachable(dfa);
	let mut kept = live(dfa, &reachable);
	kept.insert(dfa.start());

	let states: Vec<&S> = kept.into_iter().collect();
	let index: BTreeMap<&S, usize> = states
		.iter()
		.enumerate()
		.map(|(i, &state)| (state, i))
		.collect();
	let successors: Vec<Vec<Option<usize>>> = states
		.iter()
		.map(|&state| {
			dfa.alphabet()
				.iter()
				.map(|symbol| {
					dfa.target(state, symbol)
						.and_then(|next| index.get(next).copied())
				})
				.collect()
		})
		.collect();

	let mut block: Vec<usize> = states
		.iter()
		.map(|&state| dfa.is_accepting(state) as usize)
		.collect();
	let mut count = block.iter().collect::<BTreeSet<_>>().len();
	let mut rounds = 0;

	loop {
		rounds += 1;
		let signatures: Vec<(usize, Vec<Option<usize>>)> = successors
			.iter()
			.enumerate()
			.map(|(i, targets)| {
				let targets: Vec<Option<usize>> =
					targets.iter().map(|next| next.map(|next| block[next])).collect();
				(block[i], targets)
			})
			.collect();

		// blocks are numbered by first appearance, so a block's first member is its smallest
		let mut ids = BTreeMap::new();
		let refined: Vec<usize> = signatures
			.iter()
			.map(|signature| {
				let id = ids.len();
				*ids.entry(signature).or_insert(id)
			})
			.collect();

		let stable = ids.len() == count;
		count = ids.len();
		block = refined;
		if stable {
			break;
		}
	}

	let mut representatives: Vec<(usize, &S)> = Vec::with_capacity(count);
	for (i, &state) in states.iter().enumerate() {
		if block[i] == representatives.len() {
			representatives.push((i, state));
		}
	}

	let mut transitions = Vec::new();
	for &(i, representative) in &representatives {
		for (symbol, next) in dfa.alphabet().iter().zip(&successors[i]) {
			if let Some(next) = next {
				transitions.push((
					representative.clone(),
					Some(symbol.clone()),
					representatives[block[*next]].1.clone(),
				));
			}
		}
	}

	// the start state is always kept
	let start = representatives[block[index[dfa.start()]]].1.clone();

	debug!(
		"minimization: {} states ({} reachable, {} kept) -> {} blocks after {} rounds",
		dfa.num_states(),
		reachable.len(),
		states.len(),
		count,
		rounds
	);

	Automaton::build(
		Kind::Dfa,
		representatives.iter().map(|&(_, state)| state.clone()),
		dfa.alphabet().iter().cloned(),
		start,
		representatives
			.iter()
			.filter(|&&(_, state)| dfa.is_accepting(state))
			.map(|&(_, state)| state.clone()),
		transitions,
	)
	.map_err(MinimizeError::Invalid)
}
