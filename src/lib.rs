mod automaton;
mod closure;
mod convert;
mod descriptor;
mod minimize;
mod simulate;
mod store;
mod validate;

#[cfg(test)]
mod testing;

pub use automaton::{is_deterministic, Automaton, Kind};
pub use closure::closure;
pub use convert::{to_dfa, to_dfa_with, ConvertConfig, ConvertError};
pub use descriptor::{describe, from_descriptor, Descriptor, ParseError};
pub use minimize::{minimize, MinimizeError};
pub use simulate::{accepts, simulate, Outcome, Rejection, Step};
pub use store::{load_automaton, save_automaton, MemoryStore, Store};
pub use validate::{validate, ValidationError};
