use crate::{
	automaton::{Automaton, Kind},
	validate::ValidationError,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order independent exchange form of an automaton.
///
/// Collections are read as sets, so their order and duplicates do not matter.
/// Transitions are `(prev, input, next)` triples, an input of `None` (`~` in YAML) being an epsilon transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Descriptor<S, I> {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	pub kind: Kind,
	pub states: Vec<S>,
	pub alphabet: Vec<I>,
	pub start: S,
	#[serde(default = "Vec::new")]
	pub accepting: Vec<S>,
	#[serde(default = "Vec::new")]
	pub transitions: Vec<(S, Option<I>, S)>,
}

impl<S, I> Descriptor<S, I> {
	/// Attaches a name to the descriptor.
	pub fn named<N>(mut self, name: N) -> Self
	where
		N: Into<String>,
	{
		self.name = Some(name.into());
		self
	}
}

impl<S, I> Descriptor<S, I>
where
	S: Serialize + DeserializeOwned + fmt::Debug,
	I: Serialize + DeserializeOwned + fmt::Debug,
{
	/// Decodes a descriptor from a YAML document.
	pub fn from_yaml(text: &str) -> Result<Self, ParseError<S, I>> {
		Ok(serde_yaml::from_str(text)?)
	}

	/// Encodes the descriptor as a YAML document.
	pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
		serde_yaml::to_string(self)
	}
}

/// Enum representing a descriptor decoding failure.
#[derive(Debug, Error)]
pub enum ParseError<S, I>
where
	S: fmt::Debug,
	I: fmt::Debug,
{
	#[error("malformed descriptor: {0}")]
	Syntax(#[from] serde_yaml::Error),

	#[error("invalid automaton: {0}")]
	Invalid(ValidationError<S, I>),
}

impl<S, I> From<ValidationError<S, I>> for ParseError<S, I>
where
	S: fmt::Debug,
	I: fmt::Debug,
{
	fn from(err: ValidationError<S, I>) -> Self {
		Self::Invalid(err)
	}
}

/// Describes an automaton with sorted collections.
pub fn describe<S, I>(automaton: &Automaton<S, I>) -> Descriptor<S, I>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	Descriptor {
		name: None,
		kind: automaton.kind(),
		states: automaton.states().iter().cloned().collect(),
		alphabet: automaton.alphabet().iter().cloned().collect(),
		start: automaton.start().clone(),
		accepting: automaton.accepting().iter().cloned().collect(),
		transitions: automaton
			.transitions()
			.map(|(prev, input, next)| (prev.clone(), input.cloned(), next.clone()))
			.collect(),
	}
}

/// Builds an automaton from its descriptor.
/// Nothing is built unless the whole descriptor is valid.
pub fn from_descriptor<S, I>(descriptor: Descriptor<S, I>) -> Result<Automaton<S, I>, ParseError<S, I>>
where
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	let Descriptor {
		kind,
		states,
		alphabet,
		start,
		accepting,
		transitions,
		..
	} = descriptor;
	Ok(Automaton::build(
		kind,
		states,
		alphabet,
		start,
		accepting,
		transitions,
	)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::simulate::accepts;

	type Yaml = Descriptor<String, char>;

	const EVEN_AS: &str = r"
name: even-as
kind: DFA
states: [even, odd]
alphabet: [a, b]
start: even
accepting: [even]
transitions:
  - [even, a, odd]
  - [odd, a, even]
  - [even, b, even]
  - [odd, b, odd]
";

	#[test]
	fn deserialize() {
		let descriptor = Yaml::from_yaml(EVEN_AS).unwrap();
		assert_eq!(Some("even-as".to_string()), descriptor.name);

		let dfa = from_descriptor(descriptor).unwrap();
		assert_eq!(Kind::Dfa, dfa.kind());
		assert!(dfa.has_state(&"odd".to_string()), "Deserialized DFA is missing a state");
		assert!(accepts(&dfa, &['a', 'b', 'a']), "Incorrect result after run");
		assert!(!accepts(&dfa, &['b', 'a']), "Incorrect result after run");
	}

	#[test]
	fn deserialize_epsilon() {
		let yaml = r"{kind: NFA, states: [s, f], alphabet: [x], start: s, accepting: [f], transitions: [[s, ~, f], [f, x, s]]}";
		let nfa = from_descriptor(Yaml::from_yaml(yaml).unwrap()).unwrap();

		assert!(nfa.has_epsilon_transitions());
		assert!(accepts(&nfa, &[]), "Epsilon transition ignored");
		assert!(accepts(&nfa, &['x', 'x']));
	}

	#[test]
	fn optional_fields() {
		let yaml = r"{kind: DFA, states: [q0], alphabet: [], start: q0}";
		let dfa = from_descriptor(Yaml::from_yaml(yaml).unwrap()).unwrap();

		assert_eq!(0, dfa.num_accepting());
		assert_eq!(0, dfa.num_transitions());
	}

	#[test]
	fn malformed() {
		// missing start state
		let yaml = r"{kind: DFA, states: [q0], alphabet: [a]}";
		assert!(matches!(Yaml::from_yaml(yaml), Err(ParseError::Syntax(_))));

		// unknown field
		let yaml = r"{kind: DFA, states: [q0], alphabet: [a], start: q0, numOfStates: 1}";
		assert!(matches!(Yaml::from_yaml(yaml), Err(ParseError::Syntax(_))));

		// unknown kind
		let yaml = r"{kind: PDA, states: [q0], alphabet: [a], start: q0}";
		assert!(matches!(Yaml::from_yaml(yaml), Err(ParseError::Syntax(_))));

		// symbols are single characters
		let yaml = r"{kind: DFA, states: [q0], alphabet: [ab], start: q0}";
		assert!(matches!(Yaml::from_yaml(yaml), Err(ParseError::Syntax(_))));
	}

	#[test]
	fn invalid() {
		let yaml = r"{kind: DFA, states: [q0], alphabet: [a], start: q0, transitions: [[q0, a, q1]]}";
		let result = from_descriptor(Yaml::from_yaml(yaml).unwrap());

		match result {
			Err(ParseError::Invalid(ValidationError::DanglingTransitionEndpoint { next, .. })) => {
				assert_eq!("q1", next)
			}
			other => panic!("Dangling transition not rejected: {:?}", other),
		}
	}

	#[test]
	fn order_independent() {
		let shuffled = r"
kind: DFA
states: [odd, even, odd]
alphabet: [b, a]
start: even
accepting: [even]
transitions:
  - [odd, b, odd]
  - [even, b, even]
  - [odd, a, even]
  - [even, a, odd]
";
		assert_eq!(
			from_descriptor(Yaml::from_yaml(EVEN_AS).unwrap()).unwrap(),
			from_descriptor(Yaml::from_yaml(shuffled).unwrap()).unwrap()
		);
	}

	#[test]
	fn describe_sorted() {
		let dfa = from_descriptor(Yaml::from_yaml(EVEN_AS).unwrap()).unwrap();
		let descriptor = describe(&dfa);

		assert_eq!(None, descriptor.name);
		assert_eq!(vec!["even".to_string(), "odd".to_string()], descriptor.states);
		assert_eq!(vec!['a', 'b'], descriptor.alphabet);
		assert_eq!(
			("even".to_string(), Some('a'), "odd".to_string()),
			descriptor.transitions[0]
		);
		assert_eq!(dfa, from_descriptor(descriptor).unwrap());
	}

	#[test]
	fn serialize() {
		let nfa = from_descriptor(
			Yaml::from_yaml(r"{kind: NFA, states: [s, f], alphabet: [x], start: s, transitions: [[s, ~, f]]}")
				.unwrap(),
		)
		.unwrap();
		let text = describe(&nfa).named("bridge").to_yaml().unwrap();
		let decoded = Yaml::from_yaml(&text).unwrap();

		assert_eq!(Some("bridge".to_string()), decoded.name);
		assert_eq!(vec![("s".to_string(), None, "f".to_string())], decoded.transitions);
		assert_eq!(nfa, from_descriptor(decoded).unwrap());
	}
}
