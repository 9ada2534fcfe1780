//! Inputs and side effects of a session step
//!
//! The machine never performs I/O. Each step consumes one [`TickInput`] and
//! describes what should happen next in an [`Effects`] value, which the
//! controller carries out in order: render, publish, subscribe.

use heapless::Vec;

use super::machine::SessionState;
use crate::channel::{ConnectionStatus, InboundMessage, COMMAND_TOPICS};
use crate::input::ButtonAction;

/// Most publishes a single step can emit (current count + success)
pub const MAX_PUBLISHES: usize = 2;

/// Everything the active state may look at during one tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    /// Outcome of this tick's connection attempt (only read while Idle)
    pub link: ConnectionStatus,
    /// Sensor reported a pulse (only read while Counting)
    pub pulse: bool,
    /// At most one inbound message
    pub inbound: Option<&'a InboundMessage>,
    /// Decoded button action (only read while Ready or Success)
    pub button: Option<ButtonAction>,
}

impl<'a> TickInput<'a> {
    /// A tick with nothing happening and the link down
    pub fn quiet() -> Self {
        Self {
            link: ConnectionStatus::Disconnected,
            pulse: false,
            inbound: None,
            button: None,
        }
    }

    pub fn with_link(mut self, link: ConnectionStatus) -> Self {
        self.link = link;
        self
    }

    pub fn with_pulse(mut self, pulse: bool) -> Self {
        self.pulse = pulse;
        self
    }

    pub fn with_inbound(mut self, inbound: Option<&'a InboundMessage>) -> Self {
        self.inbound = inbound;
        self
    }

    pub fn with_button(mut self, button: Option<ButtonAction>) -> Self {
        self.button = button;
        self
    }
}

/// Extra status text shown under the state title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusLine {
    /// Last broker connection attempt failed
    ConnectFailed,
    /// Subscribed and waiting for a target
    LinkReady,
}

impl StatusLine {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLine::ConnectFailed => "MQTT connect failed",
            StatusLine::LinkReady => "MQTT ready",
        }
    }
}

/// Snapshot handed to the UI presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderRequest {
    /// Layout to draw
    pub state: SessionState,
    pub counter: u32,
    pub count_target: u32,
    pub status: Option<StatusLine>,
}

/// Outbound message with an integer payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PublishRequest {
    pub topic: &'static str,
    pub value: u32,
}

/// Request to (re-)subscribe to a set of topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubscribeRequest {
    pub topics: &'static [&'static str],
}

impl SubscribeRequest {
    /// The `count-target` and `reset` topics
    pub const fn commands() -> Self {
        Self {
            topics: &COMMAND_TOPICS,
        }
    }
}

/// Signal that control should go back to the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostExit {
    ReturnToMenu,
}

/// Side effects of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effects {
    /// State after the step
    pub state: SessionState,
    pub render: Option<RenderRequest>,
    pub publishes: Vec<PublishRequest, MAX_PUBLISHES>,
    pub subscribe: Option<SubscribeRequest>,
    /// A pulse was processed; hold off sampling for the debounce period
    pub debounce: bool,
    pub exit: Option<HostExit>,
}

impl Effects {
    pub(crate) fn new(state: SessionState) -> Self {
        Self {
            state,
            render: None,
            publishes: Vec::new(),
            subscribe: None,
            debounce: false,
            exit: None,
        }
    }

    pub(crate) fn publish(&mut self, topic: &'static str, value: u32) {
        // Capacity matches the most a step emits
        let _ = self.publishes.push(PublishRequest { topic, value });
    }

    /// Whether this step ended the session loop
    pub fn is_exit(&self) -> bool {
        self.exit.is_some()
    }
}
