//! Tick controller
//!
//! Drives one [`SessionStateMachine`] step per tick. The controller gathers
//! only the inputs the active state reads, runs the step, and carries out
//! the resulting effects against the channel, the render sink and the
//! debounce delay.

use embedded_hal_async::delay::DelayNs;
use screwcount_hal::{ButtonSource, InputPin};

use crate::backoff::ConnectBackoff;
use crate::channel::{ConnectionStatus, MessageChannel};
use crate::config::CounterConfig;
use crate::input::InputDecoder;
use crate::payload::format_count;
use crate::sensor::SensorReader;
use crate::session::{
    Effects, HostExit, RenderRequest, SessionState, SessionStateMachine, TickInput,
};

/// Receives render snapshots from the controller
pub trait RenderSink {
    fn render(&mut self, request: &RenderRequest);
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn render(&mut self, request: &RenderRequest) {
        (**self).render(request)
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// State before the tick
    pub previous: SessionState,
    /// State after the tick
    pub state: SessionState,
    /// Number of messages published this tick
    pub published: u8,
    pub exit: Option<HostExit>,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        self.previous != self.state
    }
}

/// Owns the session machine and its peripherals
pub struct Controller<C, P, B, R, D> {
    machine: SessionStateMachine,
    channel: C,
    sensor: SensorReader<P>,
    buttons: InputDecoder<B>,
    sink: R,
    delay: D,
    backoff: ConnectBackoff,
    config: CounterConfig,
}

impl<C, P, B, R, D> Controller<C, P, B, R, D>
where
    C: MessageChannel,
    P: InputPin,
    B: ButtonSource,
    R: RenderSink,
    D: DelayNs,
{
    pub fn new(config: CounterConfig, channel: C, pin: P, buttons: B, sink: R, delay: D) -> Self {
        Self {
            machine: SessionStateMachine::new(),
            channel,
            sensor: SensorReader::new(pin, config.sensor),
            buttons: InputDecoder::new(buttons),
            sink,
            delay,
            backoff: ConnectBackoff::new(config.retry),
            config,
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn machine(&self) -> &SessionStateMachine {
        &self.machine
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Run one tick at `now_ms`
    pub async fn tick(&mut self, now_ms: u64) -> TickOutcome {
        let previous = self.machine.state();

        let link = if previous.needs_connection() {
            self.attempt_connect(now_ms).await
        } else {
            self.channel.status()
        };

        let pulse = previous.samples_sensor() && self.sensor.pulse();
        let inbound = if previous.polls_messages() {
            self.channel.poll_message()
        } else {
            None
        };
        let button = if previous.polls_buttons() {
            self.buttons.poll()
        } else {
            None
        };

        let input = TickInput {
            link,
            pulse,
            inbound: inbound.as_ref(),
            button,
        };
        let effects = self.machine.step(input);
        let published = self.apply(&effects).await;

        TickOutcome {
            previous,
            state: effects.state,
            published,
            exit: effects.exit,
        }
    }

    async fn attempt_connect(&mut self, now_ms: u64) -> ConnectionStatus {
        if !self.backoff.should_retry(now_ms) {
            return self.channel.status();
        }

        let credentials = self.config.broker.credentials();
        if self.channel.connect(&credentials).await {
            self.backoff.mark_success(now_ms);
            ConnectionStatus::Connected
        } else {
            self.backoff.mark_failure(now_ms);
            ConnectionStatus::Disconnected
        }
    }

    async fn apply(&mut self, effects: &Effects) -> u8 {
        if let Some(render) = &effects.render {
            self.sink.render(render);
        }

        let mut published = 0u8;
        for request in &effects.publishes {
            let text = format_count(request.value);
            self.channel.publish(request.topic, text.as_bytes()).await;
            published += 1;
        }

        if let Some(subscribe) = effects.subscribe {
            for topic in subscribe.topics {
                self.channel.subscribe(topic).await;
            }
        }

        if effects.debounce {
            self.delay.delay_ms(self.config.timing.debounce_ms).await;
        }

        published
    }
}
