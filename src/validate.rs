use crate::automaton::{Automaton, Relation};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt,
};
use thiserror::Error;

/// Structural invariant violated by an automaton definition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError<S, I>
where
	S: fmt::Debug,
	I: fmt::Debug,
{
	#[error("start state {0:?} is not a declared state")]
	UnknownStartState(S),

	#[error("accepting state {0:?} is not a declared state")]
	UnknownAcceptingState(S),

	#[error("transition {prev:?} --{input:?}--> {next:?} has an undeclared endpoint")]
	DanglingTransitionEndpoint {
		prev: S,
		input: Option<I>,
		next: S,
	},

	#[error("transition from {state:?} uses symbol {symbol:?} outside the alphabet")]
	SymbolNotInAlphabet { state: S, symbol: I },

	#[error("DFA maps ({state:?}, {symbol:?}) to both {first:?} and {second:?}")]
	NonDeterministicTransitionInDFA {
		state: S,
		symbol: I,
		first: S,
		second: S,
	},

	#[error("DFA has an epsilon transition from {0:?}")]
	EpsilonTransitionInDFA(S),
}

/// Checks the structural invariants of an automaton.
///
/// The stored DFA relation is a function by construction, so only the membership invariants can fail here.
pub fn validate<S, I>(automaton: &Automaton<S, I>) -> Result<(), ValidationError<S, I>>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	check_parts(
		automaton.states(),
		automaton.alphabet(),
		automaton.start(),
		automaton.accepting(),
		automaton.transitions(),
	)
}

/// Checks the membership invariants in order: start state, accepting states, transition endpoints, transition symbols.
pub(crate) fn check_parts<'a, S, I, T>(
	states: &BTreeSet<S>,
	alphabet: &BTreeSet<I>,
	start: &S,
	accepting: &BTreeSet<S>,
	transitions: T,
) -> Result<(), ValidationError<S, I>>
where
	S: 'a + Clone + Ord + fmt::Debug,
	I: 'a + Clone + Ord + fmt::Debug,
	T: IntoIterator<Item = (&'a S, Option<&'a I>, &'a S)>,
{
	let transitions: Vec<_> = transitions.into_iter().collect();

	if !states.contains(start) {
		return Err(ValidationError::UnknownStartState(start.clone()));
	}

	if let Some(state) = accepting.iter().find(|state| !states.contains(*state)) {
		return Err(ValidationError::UnknownAcceptingState(state.clone()));
	}

	if let Some((prev, input, next)) = transitions
		.iter()
		.copied()
		.find(|&(prev, _, next)| !states.contains(prev) || !states.contains(next))
	{
		return Err(ValidationError::DanglingTransitionEndpoint {
			prev: prev.clone(),
			input: input.cloned(),
			next: next.clone(),
		});
	}

	for (prev, input, _) in transitions {
		if let Some(symbol) = input {
			if !alphabet.contains(symbol) {
				return Err(ValidationError::SymbolNotInAlphabet {
					state: prev.clone(),
					symbol: symbol.clone(),
				});
			}
		}
	}

	Ok(())
}

/// Turns a checked relation into a partial transition function.
/// Fails on the first epsilon transition or on a pair with more than one target.
pub(crate) fn determinize<S, I>(
	relation: Relation<S, I>,
) -> Result<BTreeMap<S, BTreeMap<I, S>>, ValidationError<S, I>>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	let mut function = BTreeMap::new();
	for (state, edges) in relation {
		let mut targets_by_symbol = BTreeMap::new();
		for (input, targets) in edges {
			let symbol = match input {
				Some(symbol) => symbol,
				None => return Err(ValidationError::EpsilonTransitionInDFA(state)),
			};
			let mut targets = targets.into_iter();
			match (targets.next(), targets.next()) {
				(Some(next), None) => {
					targets_by_symbol.insert(symbol, next);
				}
				(Some(first), Some(second)) => {
					return Err(ValidationError::NonDeterministicTransitionInDFA {
						state,
						symbol,
						first,
						second,
					})
				}
				(None, _) => {}
			}
		}
		if !targets_by_symbol.is_empty() {
			function.insert(state, targets_by_symbol);
		}
	}
	Ok(function)
}
