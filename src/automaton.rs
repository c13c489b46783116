use crate::validate::{self, ValidationError};
use serde::{Deserialize, Serialize};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt,
};

/// Determinism kind of an automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Kind {
	Dfa,
	Nfa,
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Dfa => write!(f, "DFA"),
			Self::Nfa => write!(f, "NFA"),
		}
	}
}

/// Transition relation, shaped by the determinism kind.
///
/// Transitions are grouped per source state.
/// A missing entry means "no transition" for both shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Transitions<S, I> {
	/// Partial function from `(state, symbol)` to a single target.
	Dfa(BTreeMap<S, BTreeMap<I, S>>),

	/// Relation from `(state, symbol or epsilon)` to a set of targets.
	/// Epsilon is encoded as `None`.
	Nfa(BTreeMap<S, BTreeMap<Option<I>, BTreeSet<S>>>),
}

/// Relation collected from transition triples before it is checked.
pub(crate) type Relation<S, I> = BTreeMap<S, BTreeMap<Option<I>, BTreeSet<S>>>;

/// Flattens a per-state relation into `(source, symbol, target)` triples.
pub(crate) fn relation_triples<S, I>(
	relation: &Relation<S, I>,
) -> impl Iterator<Item = (&S, Option<&I>, &S)> {
	relation.iter().flat_map(|(prev, edges)| {
		edges.iter().flat_map(move |(input, targets)| {
			targets.iter().map(move |next| (prev, input.as_ref(), next))
		})
	})
}

/// A finite automaton, either deterministic or nondeterministic.
///
/// Automata are immutable once built.
/// Every algorithm in this crate reads them by reference and returns a fresh automaton when it transforms one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton<S, I> {
	states: BTreeSet<S>,
	alphabet: BTreeSet<I>,
	start: S,
	accepting: BTreeSet<S>,
	transitions: Transitions<S, I>,
}

impl<S, I> Automaton<S, I>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	/// Creates a new automaton from its parts.
	///
	/// Transitions are given as `(prev, input, next)` triples where an input of `None` is an epsilon transition.
	/// Duplicate triples are merged.
	/// Returns the first violated invariant as a `ValidationError`.
	pub fn build<V, A, C, T>(
		kind: Kind,
		states: V,
		alphabet: A,
		start: S,
		accepting: C,
		transitions: T,
	) -> Result<Self, ValidationError<S, I>>
	where
		V: IntoIterator<Item = S>,
		A: IntoIterator<Item = I>,
		C: IntoIterator<Item = S>,
		T: IntoIterator<Item = (S, Option<I>, S)>,
	{
		let states: BTreeSet<S> = states.into_iter().collect();
		let alphabet: BTreeSet<I> = alphabet.into_iter().collect();
		let accepting: BTreeSet<S> = accepting.into_iter().collect();

		let mut relation = Relation::new();
		for (prev, input, next) in transitions {
			relation
				.entry(prev)
				.or_insert_with(BTreeMap::new)
				.entry(input)
				.or_insert_with(BTreeSet::new)
				.insert(next);
		}

		validate::check_parts(
			&states,
			&alphabet,
			&start,
			&accepting,
			relation_triples(&relation),
		)?;

		let transitions = match kind {
			Kind::Dfa => Transitions::Dfa(validate::determinize(relation)?),
			Kind::Nfa => Transitions::Nfa(relation),
		};

		Ok(Self {
			states,
			alphabet,
			start,
			accepting,
			transitions,
		})
	}

	/// Returns the determinism kind of the automaton.
	pub fn kind(&self) -> Kind {
		match self.transitions {
			Transitions::Dfa(_) => Kind::Dfa,
			Transitions::Nfa(_) => Kind::Nfa,
		}
	}

	pub fn states(&self) -> &BTreeSet<S> {
		&self.states
	}

	pub fn alphabet(&self) -> &BTreeSet<I> {
		&self.alphabet
	}

	pub fn start(&self) -> &S {
		&self.start
	}

	pub fn accepting(&self) -> &BTreeSet<S> {
		&self.accepting
	}

	/// Checks whether the states of the automaton includes a state.
	pub fn has_state(&self, id: &S) -> bool {
		self.states.contains(id)
	}

	/// Checks whether a state is accepting.
	pub fn is_accepting(&self, id: &S) -> bool {
		self.accepting.contains(id)
	}

	/// Number of states.
	pub fn num_states(&self) -> usize {
		self.states.len()
	}

	/// Number of alphabet symbols.
	pub fn num_symbols(&self) -> usize {
		self.alphabet.len()
	}

	/// Number of accepting states.
	pub fn num_accepting(&self) -> usize {
		self.accepting.len()
	}

	/// Number of `(prev, input, next)` transition triples.
	pub fn num_transitions(&self) -> usize {
		self.transitions().count()
	}

	/// Returns the single target of a deterministic transition.
	/// Always `None` for nondeterministic automata, use `successors` for those.
	pub fn target(&self, prev: &S, input: &I) -> Option<&S> {
		match &self.transitions {
			Transitions::Dfa(map) => map.get(prev).and_then(|edges| edges.get(input)),
			Transitions::Nfa(_) => None,
		}
	}

	/// Returns every target reachable from `prev` by a single transition on `input`, in state order.
	/// An input of `None` follows epsilon transitions, which deterministic automata never have.
	pub fn successors(&self, prev: &S, input: Option<&I>) -> Vec<&S> {
		match &self.transitions {
			Transitions::Dfa(map) => input
				.and_then(|input| map.get(prev).and_then(|edges| edges.get(input)))
				.into_iter()
				.collect(),
			Transitions::Nfa(map) => map
				.get(prev)
				.and_then(|edges| edges.get(&input.cloned()))
				.map(|targets| targets.iter().collect())
				.unwrap_or_default(),
		}
	}

	/// Iterates over all transitions as `(prev, input, next)` triples, ordered by source state and input.
	pub fn transitions(&self) -> Box<dyn Iterator<Item = (&S, Option<&I>, &S)> + '_> {
		match &self.transitions {
			Transitions::Dfa(map) => Box::new(map.iter().flat_map(|(prev, edges)| {
				edges
					.iter()
					.map(move |(input, next)| (prev, Some(input), next))
			})),
			Transitions::Nfa(map) => Box::new(relation_triples(map)),
		}
	}

	/// Checks whether any epsilon transition is present.
	pub fn has_epsilon_transitions(&self) -> bool {
		self.transitions().any(|(_, input, _)| input.is_none())
	}
}

/// Reports whether an automaton is deterministic.
///
/// The kind is authoritative: an NFA whose transitions happen to be deterministic is still reported as nondeterministic.
pub fn is_deterministic<S, I>(automaton: &Automaton<S, I>) -> bool
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	automaton.kind() == Kind::Dfa
}
