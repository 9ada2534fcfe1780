//! Counting session state machine
//!
//! Defines the runtime behaviour of the counter: connection gating, target
//! intake, pulse counting and completion. The machine is explicit, finite
//! and performs no I/O of its own.

pub mod effects;
pub mod machine;

pub use effects::{
    Effects, HostExit, PublishRequest, RenderRequest, StatusLine, SubscribeRequest, TickInput,
};
pub use machine::{Session, SessionState, SessionStateMachine};
