//! Main controller task
//!
//! Runs the counting session: one controller tick per period until the
//! session asks to return to the host, then resets into the launcher.

use defmt::*;
use embassy_futures::yield_now;
use embassy_time::{Delay, Instant, Timer};

use screwcount_core::config::CounterConfig;
use screwcount_core::Controller;
use screwcount_hal_rp2040::{BoardButtons, RpInput};

use crate::display::DisplaySink;
use crate::link::BridgeChannel;

/// Controller task - main counting loop
#[embassy_executor::task]
pub async fn controller_task(
    config: CounterConfig,
    sensor: RpInput<'static>,
    buttons: BoardButtons<'static>,
) {
    info!("Controller task started");

    let tick_pause = config.timing.tick_pause_ms();
    let channel = BridgeChannel::new(config.timing.connect_timeout_ms);
    let mut controller = Controller::new(
        config,
        channel,
        sensor,
        buttons,
        DisplaySink::new(),
        Delay,
    );

    loop {
        let outcome = controller.tick(Instant::now().as_millis()).await;

        if outcome.changed() {
            info!("State: {:?} -> {:?}", outcome.previous, outcome.state);
        }
        if outcome.published > 0 {
            let session = controller.machine().session();
            debug!(
                "Published {} message(s), counter {} / target {}",
                outcome.published,
                session.counter(),
                session.count_target()
            );
        }

        if let Some(exit) = outcome.exit {
            info!("Leaving counter: {:?}", exit);
            break;
        }

        match tick_pause {
            Some(ms) => Timer::after_millis(u64::from(ms)).await,
            // Keep sampling; let the UART tasks run between ticks
            None => yield_now().await,
        }
    }

    // Let the last frames drain before handing the board back
    Timer::after_millis(50).await;
    cortex_m::peripheral::SCB::sys_reset();
}
