//! Session layouts
//!
//! Every layout is a pure function of the render request. Row positions:
//!
//! | Row | Content |
//! |-----|---------|
//! | 0 | title |
//! | 2 | state name |
//! | 3 | status line, or the live counter while counting |
//! | 5 | prompt |
//! | 6 | count target while counting (7 holds the value when it does not fit) |

use core::fmt::Write;

use heapless::String;
use screwcount_core::payload::format_count;
use screwcount_core::session::{RenderRequest, SessionState};
use screwcount_core::RenderSink;

use crate::screen::{Screen, SCREEN_COLS};

pub const TITLE: &str = "Screw Counter";

const TARGET_LABEL: &str = "count target:";

const ROW_TITLE: usize = 0;
const ROW_STATE: usize = 2;
const ROW_DETAIL: usize = 3;
const ROW_PROMPT: usize = 5;
const ROW_TARGET: usize = 6;

/// Lay out a render request on a fresh screen
pub fn layout(request: &RenderRequest) -> Screen {
    let mut screen = Screen::new();
    screen.set_line(ROW_TITLE, TITLE);
    screen.set_line(ROW_STATE, request.state.label());

    if let Some(status) = request.status {
        screen.set_line(ROW_DETAIL, status.as_str());
    }

    match request.state {
        SessionState::Idle => {}
        SessionState::Ready => screen.set_line(ROW_PROMPT, "Press start"),
        SessionState::Counting => {
            screen.set_line(ROW_DETAIL, &format_count(request.counter));

            let mut target: String<32> = String::new();
            let _ = write!(target, "{}{}", TARGET_LABEL, request.count_target);
            if target.len() <= SCREEN_COLS {
                screen.set_line(ROW_TARGET, &target);
            } else {
                // Long targets wrap after the label
                screen.set_line(ROW_TARGET, TARGET_LABEL);
                screen.set_line(ROW_TARGET + 1, &format_count(request.count_target));
            }
        }
        SessionState::Success => screen.set_line(ROW_PROMPT, "Restart?"),
    }

    screen
}

/// Keeps the last laid-out screen and tracks whether it changed
pub struct UiPresenter {
    screen: Screen,
}

impl Default for UiPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl UiPresenter {
    pub const fn new() -> Self {
        Self {
            screen: Screen::new(),
        }
    }

    /// Lay out `request`; returns `true` if the screen content changed
    pub fn present(&mut self, request: &RenderRequest) -> bool {
        self.screen.update_from(&layout(request))
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }
}

impl RenderSink for UiPresenter {
    fn render(&mut self, request: &RenderRequest) {
        self.present(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::tests::{Op, RecordingBackend};
    use screwcount_core::session::StatusLine;

    fn request(state: SessionState, counter: u32, count_target: u32) -> RenderRequest {
        RenderRequest {
            state,
            counter,
            count_target,
            status: None,
        }
    }

    #[test]
    fn test_idle_connect_failed() {
        let mut req = request(SessionState::Idle, 0, 0);
        req.status = Some(StatusLine::ConnectFailed);
        let screen = layout(&req);

        assert_eq!(screen.get_line(0), Some("Screw Counter"));
        assert_eq!(screen.get_line(2), Some("Idle"));
        assert_eq!(screen.get_line(3), Some("MQTT connect failed"));
        assert_eq!(screen.get_line(5), Some(""));
    }

    #[test]
    fn test_ready_layout() {
        let mut req = request(SessionState::Ready, 0, 0);
        req.status = Some(StatusLine::LinkReady);
        let screen = layout(&req);

        assert_eq!(screen.get_line(2), Some("Ready"));
        assert_eq!(screen.get_line(3), Some("MQTT ready"));
        assert_eq!(screen.get_line(5), Some("Press start"));
    }

    #[test]
    fn test_counting_layout() {
        let screen = layout(&request(SessionState::Counting, 7, 15));

        assert_eq!(screen.get_line(2), Some("Counting"));
        assert_eq!(screen.get_line(3), Some("7"));
        assert_eq!(screen.get_line(6), Some("count target:15"));
    }

    #[test]
    fn test_counting_layout_large_target() {
        let screen = layout(&request(SessionState::Counting, 0, 12_345_678));
        assert_eq!(screen.get_line(6), Some("count target:12345678"));
        assert_eq!(screen.get_line(7), Some(""));

        let screen = layout(&request(SessionState::Counting, 0, 123_456_789));
        assert_eq!(screen.get_line(6), Some("count target:"));
        assert_eq!(screen.get_line(7), Some("123456789"));

        let screen = layout(&request(SessionState::Counting, 0, u32::MAX));
        assert_eq!(screen.get_line(7), Some("4294967295"));
    }

    #[test]
    fn test_success_layout() {
        let screen = layout(&request(SessionState::Success, 0, 0));
        assert_eq!(screen.get_line(2), Some("Success"));
        assert_eq!(screen.get_line(5), Some("Restart?"));
    }

    #[test]
    fn test_layout_is_pure() {
        let req = request(SessionState::Counting, 3, 9);
        assert!(layout(&req).same_content(&layout(&req)));
    }

    #[test]
    fn test_presenter_reports_changes_only() {
        let mut presenter = UiPresenter::new();
        let req = request(SessionState::Success, 0, 0);

        assert!(presenter.present(&req));
        let mut backend = RecordingBackend::new();
        presenter.screen_mut().render_to(&mut backend).unwrap();

        assert!(!presenter.present(&req));
        assert!(!presenter.screen().is_dirty());

        presenter.render(&request(SessionState::Idle, 0, 0));
        assert!(presenter.screen().is_dirty());
        assert_eq!(backend.ops.first(), Some(&Op::Clear));
    }
}
