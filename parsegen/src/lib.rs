//! Left set resolution and recursive descent parser synthesis.

mod bitset;
mod error;
mod left_set;
mod options;
mod sets;
mod synth;

pub mod backend;
pub mod bootstrap;
pub mod emit;
pub mod program;

pub use emit::{render, Emitter};
pub use error::{Error, Result};
pub use left_set::{LeftEntry, LeftSet, Resolver};
pub use options::Options;
pub use program::Program;
pub use synth::{synthesize, Synthesizer};
