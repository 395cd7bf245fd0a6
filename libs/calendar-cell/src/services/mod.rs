pub mod normalizer;
pub mod sequencer;
pub mod index;
pub mod filter;
pub mod stats;
pub mod source;
pub mod refresh;

pub use normalizer::*;
pub use sequencer::*;
pub use index::*;
pub use filter::*;
pub use stats::*;
pub use source::*;
pub use refresh::*;
