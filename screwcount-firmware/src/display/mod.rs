//! Display output
//!
//! The controller lays out screens through [`DisplaySink`]; the display TX
//! task turns the shared screen into protocol frames.

pub mod protocol;
pub mod sink;

pub use protocol::FrameBackend;
pub use sink::DisplaySink;
