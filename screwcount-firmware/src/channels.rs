//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use screwcount_core::channel::InboundMessage;
use screwcount_display::Screen;
use screwcount_protocol::Frame;

/// Inbound broker messages waiting for the controller
const INBOUND_CHANNEL_SIZE: usize = 4;

/// Frames waiting to go out to the bridge
const BRIDGE_OUT_SIZE: usize = 4;

/// Broker messages received by the bridge RX task
///
/// The controller drains at most one per tick; when full, new messages are
/// dropped.
pub static INBOUND: Channel<CriticalSectionRawMutex, InboundMessage, INBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Encoded commands for the bridge TX task
pub static BRIDGE_OUT: Channel<CriticalSectionRawMutex, Frame, BRIDGE_OUT_SIZE> = Channel::new();

/// Answer to the last connect request (`true` if accepted)
pub static CONNACK: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Broker session state as last reported by the bridge
pub static LINK_UP: AtomicBool = AtomicBool::new(false);

/// Signal that a screen update is ready to be sent
pub static SCREEN_UPDATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Shared screen buffer, written by the controller, read by the display task
pub static SCREEN_BUFFER: Mutex<CriticalSectionRawMutex, RefCell<Screen>> =
    Mutex::new(RefCell::new(Screen::new()));
