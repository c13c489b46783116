use crate::{
	automaton::{Automaton, Kind},
	closure::closure,
	validate::ValidationError,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
	collections::{BTreeMap, BTreeSet, VecDeque},
	fmt, iter,
};
use thiserror::Error;

/// Limits applied during subset construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
	/// Maximum number of DFA states to materialize (0 = unlimited).
	pub max_states: usize,
}

impl Default for ConvertConfig {
	fn default() -> Self {
		Self { max_states: 1000 }
	}
}

/// Enum representing a subset construction failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConvertError<I>
where
	I: fmt::Debug,
{
	#[error("subset construction needs an NFA, got a {0}")]
	WrongKind(Kind),

	#[error("DFA state limit exceeded: {states} states (max: {max})")]
	StateExplosion { states: usize, max: usize },

	#[error("subset construction produced an invalid DFA: {0}")]
	Invalid(ValidationError<String, I>),
}

/// Labels discovered subsets and queues them for expansion.
struct Subsets<S> {
	labels: BTreeMap<BTreeSet<S>, String>,
	used: BTreeSet<String>,
	queue: VecDeque<(BTreeSet<S>, String)>,
	max: usize,
}

impl<S> Subsets<S>
where
	S: Clone + Ord + fmt::Display,
{
	fn new(max: usize) -> Self {
		Self {
			labels: BTreeMap::new(),
			used: BTreeSet::new(),
			queue: VecDeque::new(),
			max,
		}
	}

	/// Returns the label of a subset, registering and queueing it on first sight.
	fn label<I>(&mut self, set: BTreeSet<S>) -> Result<String, ConvertError<I>>
	where
		I: fmt::Debug,
	{
		if let Some(label) = self.labels.get(&set) {
			return Ok(label.clone());
		}
		if self.max != 0 && self.labels.len() >= self.max {
			return Err(ConvertError::StateExplosion {
				states: self.labels.len() + 1,
				max: self.max,
			});
		}

		let members: Vec<String> = set.iter().map(|state| state.to_string()).collect();
		let mut label = format!("{{{}}}", members.join(","));
		while self.used.contains(&label) {
			label.push('\'');
		}

		self.used.insert(label.clone());
		self.labels.insert(set.clone(), label.clone());
		self.queue.push_back((set, label.clone()));
		Ok(label)
	}
}

/// Converts an NFA into an equivalent DFA using the default limits.
pub fn to_dfa<S, I>(nfa: &Automaton<S, I>) -> Result<Automaton<String, I>, ConvertError<I>>
where
	S: Clone + Ord + fmt::Debug + fmt::Display,
	I: Clone + Ord + fmt::Debug,
{
	to_dfa_with(nfa, &ConvertConfig::default())
}

/// Converts an NFA into an equivalent DFA using the powerset construction.
///
/// Every DFA state is an epsilon closed set of NFA states, labelled by its sorted members, e.g. `{q0,q1}`.
/// Only subsets reachable from the start closure are materialized.
/// A symbol leading to the empty set gets no transition, so the result may be partial.
pub fn to_dfa_with<S, I>(
	nfa: &Automaton<S, I>,
	config: &ConvertConfig,
) -> Result<Automaton<String, I>, ConvertError<I>>
where
	S: Clone + Ord + fmt::Debug + fmt::Display,
	I: Clone + Ord + fmt::Debug,
{
	if nfa.kind() != Kind::Nfa {
		return Err(ConvertError::WrongKind(nfa.kind()));
	}

	let mut subsets = Subsets::new(config.max_states);
	let initial = closure(nfa, &iter::once(nfa.start().clone()).collect::<BTreeSet<_>>());
	let start = subsets.label::<I>(initial)?;
	let mut transitions = Vec::new();

	while let Some((set, label)) = subsets.queue.pop_front() {
		for symbol in nfa.alphabet() {
			let reached: BTreeSet<S> = set
				.iter()
				.flat_map(|state| nfa.successors(state, Some(symbol)))
				.cloned()
				.collect();
			if reached.is_empty() {
				continue;
			}

			let next = subsets.label::<I>(closure(nfa, &reached))?;
			transitions.push((label.clone(), Some(symbol.clone()), next));
		}
	}

	let accepting: Vec<String> = subsets
		.labels
		.iter()
		.filter(|(set, _)| set.iter().any(|state| nfa.is_accepting(state)))
		.map(|(_, label)| label.clone())
		.collect();

	debug!(
		"subset construction: {} NFA states -> {} DFA states, {} transitions",
		nfa.num_states(),
		subsets.labels.len(),
		transitions.len()
	);

	Automaton::build(
		Kind::Dfa,
		subsets.labels.into_iter().map(|(_, label)| label),
		nfa.alphabet().iter().cloned(),
		start,
		accepting,
		transitions,
	)
	.map_err(ConvertError::Invalid)
}
