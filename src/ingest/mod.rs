//! Sample ingestion for the JawSense engine.
//!
//! Everything upstream of the pure classification core: the validated
//! append-only session buffer, the JSON-lines reader for recorded
//! sessions, and the synthetic session simulator.

pub mod buffer;
pub mod reader;
pub mod simulator;
pub mod types;

// Re-export commonly used types
pub use buffer::SessionBuffer;
pub use reader::{load_session, parse_session, ReadError};
pub use simulator::{SessionSimulator, SimulatorConfig};
pub use types::{Sample, SampleError};
