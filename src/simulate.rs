use crate::{
	automaton::{Automaton, Kind},
	closure::closure,
};
use log::trace;
use std::{collections::BTreeSet, fmt, iter};

/// A single transition taken during a run.
/// `to` is `None` when no transition existed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step<S, I> {
	pub from: S,
	pub symbol: I,
	pub to: Option<S>,
}

/// Reason a run did not accept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection<I> {
	/// The input symbol at `position` is not part of the alphabet.
	SymbolNotInAlphabet { symbol: I, position: usize },

	/// No transition exists for the input symbol at `position`.
	NoTransition { symbol: I, position: usize },

	/// All input was consumed, but no accepting state was reached.
	NotAccepting,
}

/// Result of running an automaton on an input.
///
/// Rejections are ordinary outcomes, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<S, I> {
	Accepted(Vec<Step<S, I>>),
	Rejected(Rejection<I>, Vec<Step<S, I>>),
}

impl<S, I> Outcome<S, I> {
	pub fn is_accepted(&self) -> bool {
		match self {
			Self::Accepted(_) => true,
			Self::Rejected(..) => false,
		}
	}

	/// Returns the rejection reason, if the run was rejected.
	pub fn rejection(&self) -> Option<&Rejection<I>> {
		match self {
			Self::Accepted(_) => None,
			Self::Rejected(reason, _) => Some(reason),
		}
	}

	/// Returns the steps taken, in order.
	pub fn trace(&self) -> &[Step<S, I>] {
		match self {
			Self::Accepted(trace) | Self::Rejected(_, trace) => trace,
		}
	}
}

/// Runs an automaton on a sequence of inputs.
///
/// Deterministic automata follow their single current state.
/// Nondeterministic automata track the epsilon closed set of current states and record every transition taken, in state order.
pub fn simulate<'a, S, I, V>(automaton: &Automaton<S, I>, inputs: V) -> Outcome<S, I>
where
	S: Clone + Ord + fmt::Debug,
	I: 'a + Clone + Ord + fmt::Debug,
	V: IntoIterator<Item = &'a I>,
{
	match automaton.kind() {
		Kind::Dfa => run_deterministic(automaton, inputs),
		Kind::Nfa => run_nondeterministic(automaton, inputs),
	}
}

/// Checks whether an automaton accepts a sequence of inputs.
pub fn accepts<'a, S, I, V>(automaton: &Automaton<S, I>, inputs: V) -> bool
where
	S: Clone + Ord + fmt::Debug,
	I: 'a + Clone + Ord + fmt::Debug,
	V: IntoIterator<Item = &'a I>,
{
	simulate(automaton, inputs).is_accepted()
}

fn run_deterministic<'a, S, I, V>(automaton: &Automaton<S, I>, inputs: V) -> Outcome<S, I>
where
	S: Clone + Ord + fmt::Debug,
	I: 'a + Clone + Ord + fmt::Debug,
	V: IntoIterator<Item = &'a I>,
{
	let mut current = automaton.start();
	let mut trace = Vec::new();

	for (position, symbol) in inputs.into_iter().enumerate() {
		if !automaton.alphabet().contains(symbol) {
			trace!("symbol {:?} at {} not in alphabet", symbol, position);
			return Outcome::Rejected(
				Rejection::SymbolNotInAlphabet {
					symbol: symbol.clone(),
					position,
				},
				trace,
			);
		}

		let next = automaton.target(current, symbol);
		trace!("{:?} --{:?}--> {:?}", current, symbol, next);
		trace.push(Step {
			from: current.clone(),
			symbol: symbol.clone(),
			to: next.cloned(),
		});
		match next {
			Some(next) => current = next,
			None => {
				return Outcome::Rejected(
					Rejection::NoTransition {
						symbol: symbol.clone(),
						position,
					},
					trace,
				)
			}
		}
	}

	if automaton.is_accepting(current) {
		Outcome::Accepted(trace)
	} else {
		Outcome::Rejected(Rejection::NotAccepting, trace)
	}
}

fn run_nondeterministic<'a, S, I, V>(automaton: &Automaton<S, I>, inputs: V) -> Outcome<S, I>
where
	S: Clone + Ord + fmt::Debug,
	I: 'a + Clone + Ord + fmt::Debug,
	V: IntoIterator<Item = &'a I>,
{
	let mut current = closure(
		automaton,
		&iter::once(automaton.start().clone()).collect::<BTreeSet<_>>(),
	);
	let mut trace = Vec::new();

	for (position, symbol) in inputs.into_iter().enumerate() {
		if !automaton.alphabet().contains(symbol) {
			trace!("symbol {:?} at {} not in alphabet", symbol, position);
			return Outcome::Rejected(
				Rejection::SymbolNotInAlphabet {
					symbol: symbol.clone(),
					position,
				},
				trace,
			);
		}

		let mut reached = BTreeSet::new();
		for state in &current {
			for next in automaton.successors(state, Some(symbol)) {
				trace.push(Step {
					from: state.clone(),
					symbol: symbol.clone(),
					to: Some(next.clone()),
				});
				reached.insert(next.clone());
			}
		}

		// the closure of a non-empty set is non-empty, so this is the dead end check
		if reached.is_empty() {
			trace!("{:?} --{:?}--> none", current, symbol);
			trace.extend(current.into_iter().map(|state| Step {
				from: state,
				symbol: symbol.clone(),
				to: None,
			}));
			return Outcome::Rejected(
				Rejection::NoTransition {
					symbol: symbol.clone(),
					position,
				},
				trace,
			);
		}

		let next = closure(automaton, &reached);
		trace!("{:?} --{:?}--> {:?}", current, symbol, next);
		current = next;
	}

	if current.iter().any(|state| automaton.is_accepting(state)) {
		Outcome::Accepted(trace)
	} else {
		Outcome::Rejected(Rejection::NotAccepting, trace)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chars(input: &str) -> Vec<char> {
		input.chars().collect()
	}

	/// Accepts inputs with an odd number of ones.
	fn parity(transitions: Vec<(&'static str, Option<char>, &'static str)>) -> Automaton<&'static str, char> {
		Automaton::build(
			Kind::Dfa,
			vec!["q0", "q1"],
			vec!['0', '1'],
			"q0",
			vec!["q1"],
			transitions,
		)
		.unwrap()
	}

	fn full_parity() -> Automaton<&'static str, char> {
		parity(vec![
			("q0", Some('0'), "q0"),
			("q0", Some('1'), "q1"),
			("q1", Some('0'), "q1"),
			("q1", Some('1'), "q0"),
		])
	}

	#[test]
	fn deterministic_run() {
		let dfa = full_parity();

		for input in &["1", "10", "111", "010", "0100"] {
			assert!(accepts(&dfa, &chars(input)), "Incorrect result on accepting run {:?}", input);
		}
		for input in &["", "11", "101", "0110"] {
			assert!(!accepts(&dfa, &chars(input)), "Incorrect result on rejecting run {:?}", input);
		}
		assert_eq!(
			Some(&Rejection::NotAccepting),
			simulate(&dfa, &chars("11")).rejection()
		);
	}

	#[test]
	fn deterministic_trace() {
		let dfa = full_parity();

		assert_eq!(
			Outcome::Accepted(vec![
				Step {
					from: "q0",
					symbol: '1',
					to: Some("q1"),
				},
				Step {
					from: "q1",
					symbol: '0',
					to: Some("q1"),
				},
			]),
			simulate(&dfa, &chars("10"))
		);
	}

	#[test]
	fn partial_reject() {
		let dfa = parity(vec![
			("q0", Some('0'), "q0"),
			("q0", Some('1'), "q1"),
			("q1", Some('0'), "q1"),
		]);

		assert_eq!(
			Outcome::Rejected(
				Rejection::NoTransition {
					symbol: '1',
					position: 1,
				},
				vec![
					Step {
						from: "q0",
						symbol: '1',
						to: Some("q1"),
					},
					Step {
						from: "q1",
						symbol: '1',
						to: None,
					},
				],
			),
			simulate(&dfa, &chars("11")),
			"Missing transition not reported as an implicit reject"
		);
	}

	#[test]
	fn symbol_outside_alphabet() {
		let dfa = full_parity();
		assert_eq!(
			Some(&Rejection::SymbolNotInAlphabet {
				symbol: '2',
				position: 1,
			}),
			simulate(&dfa, &chars("121")).rejection()
		);
	}

	/// Accepts inputs containing `01`, branching on `0`.
	fn contains_01() -> Automaton<&'static str, char> {
		Automaton::build(
			Kind::Nfa,
			vec!["q0", "q1", "q2"],
			vec!['0', '1'],
			"q0",
			vec!["q2"],
			vec![
				("q0", Some('0'), "q0"),
				("q0", Some('1'), "q0"),
				("q0", Some('0'), "q1"),
				("q1", Some('1'), "q2"),
				("q2", Some('0'), "q2"),
				("q2", Some('1'), "q2"),
			],
		)
		.unwrap()
	}

	#[test]
	fn nondeterministic_run() {
		let nfa = contains_01();

		for input in &["01", "1101", "0010", "111010"] {
			assert!(accepts(&nfa, &chars(input)), "Incorrect result on accepting run {:?}", input);
		}
		for input in &["", "0", "10", "1110", "000"] {
			assert!(!accepts(&nfa, &chars(input)), "Incorrect result on rejecting run {:?}", input);
		}
	}

	#[test]
	fn nondeterministic_trace() {
		let nfa = contains_01();

		assert_eq!(
			vec![
				Step {
					from: "q0",
					symbol: '0',
					to: Some("q0"),
				},
				Step {
					from: "q0",
					symbol: '0',
					to: Some("q1"),
				},
			],
			simulate(&nfa, &chars("0")).trace()
		);
	}

	#[test]
	fn epsilon_moves() {
		// s -ε-> a -x-> f, s -ε-> b -y-> f, f -ε-> s
		let nfa = Automaton::build(
			Kind::Nfa,
			vec!['s', 'a', 'b', 'f'],
			vec!['x', 'y'],
			's',
			vec!['f'],
			vec![
				('s', None, 'a'),
				('s', None, 'b'),
				('a', Some('x'), 'f'),
				('b', Some('y'), 'f'),
				('f', None, 's'),
			],
		)
		.unwrap();

		assert!(!accepts(&nfa, &[]), "Empty input accepted");
		assert!(accepts(&nfa, &['x']));
		assert!(accepts(&nfa, &chars("xyyx")));

		// epsilon reachable accepting start
		let nfa = Automaton::build(
			Kind::Nfa,
			vec![0, 1],
			vec!['x'],
			0,
			vec![1],
			vec![(0, None, 1)],
		)
		.unwrap();
		assert!(accepts(&nfa, &[]), "Epsilon reachable accepting state ignored");
	}

	#[test]
	fn nondeterministic_dead_end() {
		let nfa = contains_01();
		let dead = Automaton::build(
			Kind::Nfa,
			vec!["q0", "q1"],
			vec!['0', '1'],
			"q0",
			vec!["q1"],
			vec![("q0", Some('0'), "q1")],
		)
		.unwrap();

		assert_eq!(
			Outcome::Rejected(
				Rejection::NoTransition {
					symbol: '1',
					position: 1,
				},
				vec![
					Step {
						from: "q0",
						symbol: '0',
						to: Some("q1"),
					},
					Step {
						from: "q1",
						symbol: '1',
						to: None,
					},
				],
			),
			simulate(&dead, &chars("01"))
		);
		assert_eq!(
			Some(&Rejection::SymbolNotInAlphabet {
				symbol: 'a',
				position: 0,
			}),
			simulate(&nfa, &chars("a")).rejection()
		);
	}

	#[test]
	fn repeatable() {
		let nfa = contains_01();
		let input = chars("100101");
		assert_eq!(simulate(&nfa, &input), simulate(&nfa, &input));
	}
}
