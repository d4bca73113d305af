// imgpipe/src/processors/mod.rs
mod format_gate;
mod loader;
mod persister;
mod resizer;
mod size_gate;

pub use format_gate::FormatGate;
pub use loader::Loader;
pub use persister::{Encoding, Persister, ID_LENGTH};
pub use resizer::Resizer;
pub use size_gate::SizeGate;

