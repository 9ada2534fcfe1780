//! Session state machine definition
//!
//! Only the rules of the active state are evaluated on each step. Inputs
//! that the active state does not look at are ignored, not queued.

use super::effects::{
    Effects, HostExit, RenderRequest, StatusLine, SubscribeRequest, TickInput,
};
use crate::channel::{TopicKind, TOPIC_CURRENT_COUNT, TOPIC_SUCCESS};
use crate::input::ButtonAction;
use crate::payload::{bytes_to_int, has_content};

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Waiting for the broker connection
    #[default]
    Idle,
    /// Connected and subscribed, waiting for a target or a start press
    Ready,
    /// Counting sensor pulses toward the target
    Counting,
    /// Target reached, waiting for a restart
    Success,
}

impl SessionState {
    /// Title shown on the display for this state
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Ready => "Ready",
            SessionState::Counting => "Counting",
            SessionState::Success => "Success",
        }
    }

    /// Check if the sensor is sampled in this state
    pub fn samples_sensor(&self) -> bool {
        matches!(self, SessionState::Counting)
    }

    /// Check if the buttons are polled in this state
    pub fn polls_buttons(&self) -> bool {
        matches!(self, SessionState::Ready | SessionState::Success)
    }

    /// Check if inbound messages are consumed in this state
    pub fn polls_messages(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// Check if this state needs a connection attempt
    pub fn needs_connection(&self) -> bool {
        matches!(self, SessionState::Idle)
    }
}

/// Counting session data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    state: SessionState,
    /// Pulses detected in the current session
    counter: u32,
    /// Goal from the last count-target message; 0 means none set
    count_target: u32,
}

impl Session {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn count_target(&self) -> u32 {
        self.count_target
    }

    fn snapshot(&self, state: SessionState, status: Option<StatusLine>) -> RenderRequest {
        RenderRequest {
            state,
            counter: self.counter,
            count_target: self.count_target,
            status,
        }
    }
}

/// Owns the session and applies one step per tick
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    session: Session,
}

impl SessionStateMachine {
    /// Create a machine in Idle with no target
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the active state's rules against one tick of input
    pub fn step(&mut self, input: TickInput<'_>) -> Effects {
        let mut effects = Effects::new(self.session.state);

        match self.session.state {
            SessionState::Idle => self.step_idle(&input, &mut effects),
            SessionState::Ready => self.step_ready(&input, &mut effects),
            SessionState::Counting => self.step_counting(&input, &mut effects),
            SessionState::Success => self.step_success(&input, &mut effects),
        }

        effects.state = self.session.state;
        effects
    }

    fn step_idle(&mut self, input: &TickInput<'_>, effects: &mut Effects) {
        if input.link.is_connected() {
            effects.render = Some(self.session.snapshot(SessionState::Idle, None));
            self.session.counter = 0;
            self.session.count_target = 0;
            self.session.state = SessionState::Ready;
        } else {
            effects.render = Some(
                self.session
                    .snapshot(SessionState::Idle, Some(StatusLine::ConnectFailed)),
            );
        }
    }

    fn step_ready(&mut self, input: &TickInput<'_>, effects: &mut Effects) {
        effects.subscribe = Some(SubscribeRequest::commands());
        effects.render = Some(
            self.session
                .snapshot(SessionState::Ready, Some(StatusLine::LinkReady)),
        );

        if let Some(msg) = input.inbound {
            if msg.kind() == TopicKind::CountTarget && has_content(msg.payload()) {
                self.session.count_target = bytes_to_int(msg.payload());
                self.session.state = SessionState::Counting;
            }
        }

        match input.button {
            Some(ButtonAction::Menu) => effects.exit = Some(HostExit::ReturnToMenu),
            Some(ButtonAction::Start) => self.session.state = SessionState::Counting,
            None => {}
        }
    }

    fn step_counting(&mut self, input: &TickInput<'_>, effects: &mut Effects) {
        if let Some(msg) = input.inbound {
            if msg.kind() == TopicKind::Reset {
                self.session.state = SessionState::Ready;
                return;
            }
        }

        // Counter may still show the previous session
        if self.session.counter == 0 {
            effects.render = Some(self.session.snapshot(SessionState::Counting, None));
        }

        if !input.pulse {
            return;
        }

        self.session.counter = self.session.counter.saturating_add(1);
        effects.render = Some(self.session.snapshot(SessionState::Counting, None));
        effects.publish(TOPIC_CURRENT_COUNT, self.session.counter);

        if self.session.counter == self.session.count_target {
            self.session.counter = 0;
            self.session.count_target = 0;
            effects.publish(TOPIC_SUCCESS, self.session.counter);
            self.session.state = SessionState::Success;
        }

        effects.debounce = true;
    }

    fn step_success(&mut self, input: &TickInput<'_>, effects: &mut Effects) {
        effects.render = Some(self.session.snapshot(SessionState::Success, None));

        if let Some(msg) = input.inbound {
            if msg.kind() == TopicKind::Reset {
                self.session.state = SessionState::Ready;
            }
        }

        match input.button {
            Some(ButtonAction::Menu) => effects.exit = Some(HostExit::ReturnToMenu),
            // Restart goes through Idle, unlike Ready where start counts
            Some(ButtonAction::Start) => self.session.state = SessionState::Idle,
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ConnectionStatus, InboundMessage, TOPIC_COUNT_TARGET, TOPIC_RESET};
    use crate::session::effects::PublishRequest;

    fn connected() -> TickInput<'static> {
        TickInput::quiet().with_link(ConnectionStatus::Connected)
    }

    fn machine_in(state: SessionState, counter: u32, count_target: u32) -> SessionStateMachine {
        SessionStateMachine {
            session: Session {
                state,
                counter,
                count_target,
            },
        }
    }

    #[test]
    fn test_starts_idle_without_target() {
        let machine = SessionStateMachine::new();
        assert_eq!(machine.state(), SessionState::Idle);
        assert_eq!(machine.session().counter(), 0);
        assert_eq!(machine.session().count_target(), 0);
    }

    #[test]
    fn test_idle_stays_on_failed_connect() {
        let mut machine = SessionStateMachine::new();
        let effects = machine.step(TickInput::quiet());

        assert_eq!(effects.state, SessionState::Idle);
        let render = effects.render.unwrap();
        assert_eq!(render.state, SessionState::Idle);
        assert_eq!(render.status, Some(StatusLine::ConnectFailed));
        assert_eq!(render.status.unwrap().as_str(), "MQTT connect failed");
    }

    #[test]
    fn test_idle_to_ready_on_connect() {
        let mut machine = SessionStateMachine::new();
        machine.step(TickInput::quiet());
        let effects = machine.step(connected());

        assert_eq!(effects.state, SessionState::Ready);
        assert_eq!(effects.render.unwrap().status, None);
    }

    #[test]
    fn test_idle_ignores_buttons_and_messages() {
        let msg = InboundMessage::new(TOPIC_COUNT_TARGET, b"5\0");
        let mut machine = SessionStateMachine::new();
        let effects = machine.step(
            TickInput::quiet()
                .with_inbound(Some(&msg))
                .with_button(Some(ButtonAction::Start)),
        );
        assert_eq!(effects.state, SessionState::Idle);
        assert_eq!(machine.session().count_target(), 0);
    }

    #[test]
    fn test_ready_subscribes_every_tick() {
        let mut machine = machine_in(SessionState::Ready, 0, 0);
        for _ in 0..3 {
            let effects = machine.step(TickInput::quiet());
            assert_eq!(effects.subscribe, Some(SubscribeRequest::commands()));
            assert_eq!(effects.state, SessionState::Ready);
            assert_eq!(*machine.session(), machine_in(SessionState::Ready, 0, 0).session);
        }
    }

    #[test]
    fn test_ready_count_target_starts_counting() {
        let mut payload = [0u8; 1024];
        payload[..2].copy_from_slice(b"15");
        let msg = InboundMessage::new(TOPIC_COUNT_TARGET, &payload);

        let mut machine = machine_in(SessionState::Ready, 0, 0);
        let effects = machine.step(TickInput::quiet().with_inbound(Some(&msg)));

        assert_eq!(effects.state, SessionState::Counting);
        assert_eq!(machine.session().count_target(), 15);
        let render = effects.render.unwrap();
        assert_eq!(render.state, SessionState::Ready);
        assert_eq!(render.status, Some(StatusLine::LinkReady));
    }

    #[test]
    fn test_ready_ignores_empty_target() {
        let msg = InboundMessage::new(TOPIC_COUNT_TARGET, b"\0\0");
        let mut machine = machine_in(SessionState::Ready, 0, 0);
        let effects = machine.step(TickInput::quiet().with_inbound(Some(&msg)));
        assert_eq!(effects.state, SessionState::Ready);
    }

    #[test]
    fn test_ready_ignores_reset_topic() {
        let msg = InboundMessage::new(TOPIC_RESET, b"1");
        let mut machine = machine_in(SessionState::Ready, 0, 0);
        let effects = machine.step(TickInput::quiet().with_inbound(Some(&msg)));
        assert_eq!(effects.state, SessionState::Ready);
    }

    #[test]
    fn test_ready_start_counts_without_target() {
        let mut machine = machine_in(SessionState::Ready, 0, 0);
        let effects = machine.step(TickInput::quiet().with_button(Some(ButtonAction::Start)));
        assert_eq!(effects.state, SessionState::Counting);
        assert_eq!(machine.session().count_target(), 0);
    }

    #[test]
    fn test_ready_menu_exits() {
        let mut machine = machine_in(SessionState::Ready, 0, 0);
        let effects = machine.step(TickInput::quiet().with_button(Some(ButtonAction::Menu)));
        assert_eq!(effects.exit, Some(HostExit::ReturnToMenu));
        assert_eq!(effects.state, SessionState::Ready);
    }

    #[test]
    fn test_ready_target_then_menu_same_tick() {
        let msg = InboundMessage::new(TOPIC_COUNT_TARGET, b"8\0");
        let mut machine = machine_in(SessionState::Ready, 0, 0);
        let effects = machine.step(
            TickInput::quiet()
                .with_inbound(Some(&msg))
                .with_button(Some(ButtonAction::Menu)),
        );

        assert_eq!(effects.exit, Some(HostExit::ReturnToMenu));
        assert_eq!(effects.state, SessionState::Counting);
        assert_eq!(machine.session().count_target(), 8);
    }

    #[test]
    fn test_ready_target_then_start_keeps_target() {
        let msg = InboundMessage::new(TOPIC_COUNT_TARGET, b"12\0");
        let mut machine = machine_in(SessionState::Ready, 0, 0);
        let effects = machine.step(
            TickInput::quiet()
                .with_inbound(Some(&msg))
                .with_button(Some(ButtonAction::Start)),
        );

        assert_eq!(effects.exit, None);
        assert_eq!(effects.state, SessionState::Counting);
        assert_eq!(machine.session().count_target(), 12);
    }

    #[test]
    fn test_counting_renders_fresh_session() {
        let mut machine = machine_in(SessionState::Counting, 0, 3);
        let effects = machine.step(TickInput::quiet());
        assert_eq!(effects.render.unwrap().state, SessionState::Counting);
        assert!(effects.publishes.is_empty());
        assert!(!effects.debounce);
    }

    #[test]
    fn test_counting_without_pulse_is_quiet() {
        let mut machine = machine_in(SessionState::Counting, 1, 3);
        let effects = machine.step(TickInput::quiet());
        assert_eq!(effects.render, None);
        assert!(effects.publishes.is_empty());
        assert!(!effects.debounce);
    }

    #[test]
    fn test_counting_pulse_publishes_count() {
        let mut machine = machine_in(SessionState::Counting, 0, 3);
        let effects = machine.step(TickInput::quiet().with_pulse(true));

        assert_eq!(machine.session().counter(), 1);
        assert_eq!(
            effects.publishes.as_slice(),
            &[PublishRequest {
                topic: TOPIC_CURRENT_COUNT,
                value: 1
            }]
        );
        assert_eq!(effects.render.unwrap().counter, 1);
        assert!(effects.debounce);
        assert_eq!(effects.state, SessionState::Counting);
    }

    #[test]
    fn test_three_pulses_reach_success() {
        let mut machine = machine_in(SessionState::Counting, 0, 3);

        let first = machine.step(TickInput::quiet().with_pulse(true));
        assert_eq!(first.render.unwrap().counter, 1);
        let second = machine.step(TickInput::quiet().with_pulse(true));
        assert_eq!(second.render.unwrap().counter, 2);
        let third = machine.step(TickInput::quiet().with_pulse(true));

        let render = third.render.unwrap();
        assert_eq!(render.counter, 3);
        assert_eq!(render.state, SessionState::Counting);
        assert_eq!(
            third.publishes.as_slice(),
            &[
                PublishRequest {
                    topic: TOPIC_CURRENT_COUNT,
                    value: 3
                },
                PublishRequest {
                    topic: TOPIC_SUCCESS,
                    value: 0
                },
            ]
        );
        assert_eq!(third.state, SessionState::Success);
        assert_eq!(machine.session().counter(), 0);
        assert_eq!(machine.session().count_target(), 0);
    }

    #[test]
    fn test_counting_reset_keeps_values() {
        let msg = InboundMessage::new(TOPIC_RESET, b"");
        let mut machine = machine_in(SessionState::Counting, 2, 5);
        let effects = machine.step(TickInput::quiet().with_inbound(Some(&msg)).with_pulse(true));

        assert_eq!(effects.state, SessionState::Ready);
        assert_eq!(machine.session().counter(), 2);
        assert_eq!(machine.session().count_target(), 5);
        assert!(effects.publishes.is_empty());
        assert!(!effects.debounce);
    }

    #[test]
    fn test_counting_open_ended_without_target() {
        let mut machine = machine_in(SessionState::Counting, 0, 0);
        for expected in 1..=5 {
            let effects = machine.step(TickInput::quiet().with_pulse(true));
            assert_eq!(effects.state, SessionState::Counting);
            assert_eq!(machine.session().counter(), expected);
        }
    }

    #[test]
    fn test_success_renders_every_tick() {
        let mut machine = machine_in(SessionState::Success, 0, 0);
        for _ in 0..2 {
            let effects = machine.step(TickInput::quiet());
            assert_eq!(effects.render.unwrap().state, SessionState::Success);
            assert_eq!(effects.state, SessionState::Success);
        }
    }

    #[test]
    fn test_success_reset_to_ready() {
        let msg = InboundMessage::new(TOPIC_RESET, b"0");
        let mut machine = machine_in(SessionState::Success, 0, 0);
        let effects = machine.step(TickInput::quiet().with_inbound(Some(&msg)));
        assert_eq!(effects.state, SessionState::Ready);
    }

    #[test]
    fn test_start_asymmetry() {
        let mut ready = machine_in(SessionState::Ready, 0, 0);
        let mut success = machine_in(SessionState::Success, 0, 0);
        let start = TickInput::quiet().with_button(Some(ButtonAction::Start));

        assert_eq!(ready.step(start).state, SessionState::Counting);
        assert_eq!(success.step(start).state, SessionState::Idle);
    }

    #[test]
    fn test_success_menu_exits_without_mutation() {
        let mut machine = machine_in(SessionState::Success, 0, 0);
        let before = *machine.session();
        let effects = machine.step(TickInput::quiet().with_button(Some(ButtonAction::Menu)));

        assert!(effects.is_exit());
        assert_eq!(*machine.session(), before);
    }

    #[test]
    fn test_state_polling_flags() {
        assert!(SessionState::Idle.needs_connection());
        assert!(!SessionState::Idle.polls_messages());
        assert!(SessionState::Ready.polls_buttons());
        assert!(SessionState::Counting.samples_sensor());
        assert!(!SessionState::Counting.polls_buttons());
        assert!(SessionState::Success.polls_messages());
    }
}
