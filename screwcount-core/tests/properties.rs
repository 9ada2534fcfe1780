//! Property tests for the payload codec and the counting session

use proptest::prelude::*;

use screwcount_core::channel::{
    ConnectionStatus, InboundMessage, TOPIC_COUNT_TARGET, TOPIC_CURRENT_COUNT, TOPIC_SUCCESS,
};
use screwcount_core::input::ButtonAction;
use screwcount_core::payload::{bytes_to_int, format_count};
use screwcount_core::session::TickInput;
use screwcount_core::{SessionState, SessionStateMachine};

fn counting_machine(target: u32) -> SessionStateMachine {
    let mut machine = SessionStateMachine::new();
    machine.step(TickInput::quiet().with_link(ConnectionStatus::Connected));

    let mut payload = format_count(target).as_bytes().to_vec();
    payload.push(0);
    let msg = InboundMessage::new(TOPIC_COUNT_TARGET, &payload);
    let effects = machine.step(TickInput::quiet().with_inbound(Some(&msg)));
    assert_eq!(effects.state, SessionState::Counting);
    machine
}

proptest! {
    #[test]
    fn formatted_count_parses_back(value in any::<u32>()) {
        let text = format_count(value);
        let mut terminated = text.as_bytes().to_vec();
        terminated.push(0);
        terminated.extend_from_slice(b"999");

        prop_assert_eq!(bytes_to_int(text.as_bytes()), value);
        prop_assert_eq!(bytes_to_int(&terminated), value);
    }

    #[test]
    fn digits_after_terminator_are_ignored(prefix in 0u32..100_000, tail in proptest::collection::vec(any::<u8>(), 0..16)) {
        let mut bytes = format_count(prefix).as_bytes().to_vec();
        bytes.push(0);
        bytes.extend_from_slice(&tail);
        prop_assert_eq!(bytes_to_int(&bytes), prefix);
    }

    #[test]
    fn session_completes_after_exactly_target_pulses(
        target in 1u32..200,
        gaps in proptest::collection::vec(any::<bool>(), 0..400),
    ) {
        let mut machine = counting_machine(target);
        let mut published = Vec::new();
        let mut gaps = gaps.into_iter();
        let mut pulses = 0u32;

        while machine.state() == SessionState::Counting {
            let pulse = gaps.next().unwrap_or(true);
            let effects = machine.step(TickInput::quiet().with_pulse(pulse));
            prop_assert_eq!(effects.debounce, pulse);
            if pulse {
                pulses += 1;
            }
            published.extend(effects.publishes.iter().copied());
        }

        prop_assert_eq!(machine.state(), SessionState::Success);
        prop_assert_eq!(pulses, target);
        prop_assert_eq!(published.len() as u32, target + 1);
        for (i, request) in published.iter().take(target as usize).enumerate() {
            prop_assert_eq!(request.topic, TOPIC_CURRENT_COUNT);
            prop_assert_eq!(request.value, i as u32 + 1);
        }
        let last = published[target as usize];
        prop_assert_eq!(last.topic, TOPIC_SUCCESS);
        prop_assert_eq!(last.value, 0);
        prop_assert_eq!(machine.session().counter(), 0);
        prop_assert_eq!(machine.session().count_target(), 0);
    }

    #[test]
    fn buttons_never_leave_idle(codes in proptest::collection::vec(any::<bool>(), 1..20)) {
        let mut machine = SessionStateMachine::new();
        for menu in codes {
            let action = if menu { ButtonAction::Menu } else { ButtonAction::Start };
            let effects = machine.step(TickInput::quiet().with_button(Some(action)));
            prop_assert_eq!(effects.state, SessionState::Idle);
            prop_assert!(!effects.is_exit());
        }
    }
}
