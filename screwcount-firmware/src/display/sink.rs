//! Render sink handing screens to the display task

use defmt::*;
use screwcount_core::session::RenderRequest;
use screwcount_core::RenderSink;
use screwcount_display::UiPresenter;

use crate::channels::{SCREEN_BUFFER, SCREEN_UPDATE};

/// Lays out render requests and publishes changed screens
pub struct DisplaySink {
    presenter: UiPresenter,
}

impl Default for DisplaySink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink {
    pub const fn new() -> Self {
        Self {
            presenter: UiPresenter::new(),
        }
    }
}

impl RenderSink for DisplaySink {
    fn render(&mut self, request: &RenderRequest) {
        if !self.presenter.present(request) {
            return;
        }

        SCREEN_BUFFER.lock(|screen| {
            screen.borrow_mut().update_from(self.presenter.screen());
        });
        self.presenter.screen_mut().mark_clean();

        trace!("Screen changed: {:?}", request.state);
        SCREEN_UPDATE.signal(());
    }
}
