use crate::{
	automaton::Automaton,
	descriptor::{describe, from_descriptor, Descriptor, ParseError},
};
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::BTreeMap, fmt};

/// Durable storage for automaton descriptors.
///
/// The engine never depends on a concrete store; callers inject one.
pub trait Store<S, I> {
	type Error;

	/// Stores a descriptor and returns its id.
	fn save(&mut self, descriptor: &Descriptor<S, I>) -> Result<u64, Self::Error>;

	/// Loads the descriptor stored under `id`, or `None` if there is none.
	fn load(&self, id: u64) -> Result<Option<Descriptor<S, I>>, Self::Error>;
}

/// Describes and stores an automaton under a name.
pub fn save_automaton<T, S, I>(store: &mut T, automaton: &Automaton<S, I>, name: &str) -> Result<u64, T::Error>
where
	T: Store<S, I>,
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	store.save(&describe(automaton).named(name))
}

/// Loads and validates the automaton stored under `id`.
pub fn load_automaton<T, S, I>(store: &T, id: u64) -> Result<Option<Automaton<S, I>>, T::Error>
where
	T: Store<S, I>,
	T::Error: From<ParseError<S, I>>,
	S: Clone + Ord + fmt::Debug,
	I: Clone + Ord + fmt::Debug,
{
	match store.load(id)? {
		Some(descriptor) => Ok(Some(from_descriptor(descriptor)?)),
		None => Ok(None),
	}
}

/// Store keeping YAML documents in memory, with ids counting up from 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
	documents: BTreeMap<u64, String>,
	last_id: u64,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored documents.
	pub fn len(&self) -> usize {
		self.documents.len()
	}

	pub fn is_empty(&self) -> bool {
		self.documents.is_empty()
	}

	/// Returns the raw document stored under `id`.
	pub fn document(&self, id: u64) -> Option<&str> {
		self.documents.get(&id).map(String::as_str)
	}
}

impl<S, I> Store<S, I> for MemoryStore
where
	S: Serialize + DeserializeOwned + fmt::Debug,
	I: Serialize + DeserializeOwned + fmt::Debug,
{
	type Error = ParseError<S, I>;

	fn save(&mut self, descriptor: &Descriptor<S, I>) -> Result<u64, Self::Error> {
		let document = descriptor.to_yaml()?;
		self.last_id += 1;
		self.documents.insert(self.last_id, document);
		Ok(self.last_id)
	}

	fn load(&self, id: u64) -> Result<Option<Descriptor<S, I>>, Self::Error> {
		self.documents
			.get(&id)
			.map(|document| Descriptor::from_yaml(document))
			.transpose()
	}
}
