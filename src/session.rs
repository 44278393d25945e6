//! # Session State Machine
//!
//! The lifecycle of the broker session: boot, wait for the network, connect,
//! subscribe, then publish periodically until the transport reports a
//! disconnection, at which point the session backs off and starts over.
//!
//! Everything happens inside [`Session::advance`], which never blocks. Its
//! input is either a scheduler tick or one transport notification; its output
//! is the delay until the next periodic wake-up, or an error that tells the
//! driver to stop for good.

use embassy_time::{Duration, Instant};

use crate::config::{ClientId, SessionConfig};
use crate::error::{SessionError, TransportStatus};
use crate::indicator::{Level, Signal, StatusIndicator};
use crate::runtime::{PayloadWriter, SessionModule, SessionTopics};
use crate::timer::{TimerId, TimerMux};
use crate::transport::{NetworkProbe, QoS, SessionTransport};

const IMMEDIATE: Duration = Duration::from_ticks(0);

/// The lifecycle states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Nothing initialised yet.
    Boot,
    /// Waiting for the network.
    Init,
    /// The network is reachable; about to connect.
    NetOk,
    /// Connect issued, waiting for the transport.
    Connecting,
    /// Connected, about to subscribe.
    Connected,
    /// Steady state: publishing periodically.
    Subscribed,
    /// The transport lost the connection; recovery is in progress.
    Disconnected,
    /// A fatal error ended the session.
    Stopped,
}

impl State {
    /// Whether `self -> next` is a legal edge.
    pub fn can_transition_to(self, next: State) -> bool {
        use State::*;
        match (self, next) {
            (Stopped, _) => false,
            (_, Stopped) => true,
            (Boot, Init)
            | (Init, NetOk)
            | (NetOk, Connecting)
            | (Connecting, Connected)
            | (Connected, Subscribed)
            | (Disconnected, Init) => true,
            (Boot, Disconnected) => false,
            (_, Disconnected) => true,
            _ => false,
        }
    }
}

/// The input to one step of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// A scheduler wake-up.
    Tick,
    /// The transport connected to the broker.
    Connected,
    /// The transport lost (or failed to establish) the connection.
    Disconnected,
    /// The broker answered the subscribe request.
    SubAck { accepted: bool },
    /// The broker acknowledged a publish.
    PubAck,
    /// A message arrived on the subscribed topic.
    Message { topic: &'a str, payload: &'a [u8] },
}

/// A broker session with its collaborators.
///
/// - `T`: the message transport
/// - `N`: the network reachability probe
/// - `M`: the business-logic module
/// - `I`: the status indicator
/// - `PAYLOAD_SIZE`: capacity of the outgoing payload buffer
pub struct Session<T, N, M, I, const PAYLOAD_SIZE: usize> {
    config: SessionConfig,
    client_id: ClientId,
    topics: SessionTopics,
    state: State,
    reconnect_attempt: u32,
    timers: TimerMux,
    transport: T,
    network: N,
    module: M,
    indicator: I,
    payload: [u8; PAYLOAD_SIZE],
}

impl<T, N, M, I, const PAYLOAD_SIZE: usize> Session<T, N, M, I, PAYLOAD_SIZE>
where
    T: SessionTransport,
    N: NetworkProbe,
    M: SessionModule,
    I: StatusIndicator,
{
    /// Create a session in the `Boot` state. Nothing is touched until
    /// [`start`](Self::start) and the first [`advance`](Self::advance).
    pub fn new(
        config: SessionConfig,
        client_id: ClientId,
        topics: SessionTopics,
        transport: T,
        network: N,
        module: M,
        indicator: I,
    ) -> Self {
        Self {
            config,
            client_id,
            topics,
            state: State::Boot,
            reconnect_attempt: 0,
            timers: TimerMux::new(),
            transport,
            network,
            module,
            indicator,
            payload: [0; PAYLOAD_SIZE],
        }
    }

    /// Arm the periodic wake-up so the first tick runs immediately.
    pub fn start(&mut self, now: Instant) {
        info!(
            "Session started: publish on \"{}\", subscribe to \"{}\"",
            self.topics.publish(),
            self.topics.subscribe()
        );
        self.timers.arm(TimerId::Wakeup, now, IMMEDIATE);
    }

    /// Process one tick or notification.
    ///
    /// Returns the delay until the next periodic wake-up. An `Err` means the
    /// session is over and the driver must stop calling.
    pub fn advance(&mut self, now: Instant, event: Event<'_>) -> Result<Duration, SessionError> {
        if self.state == State::Stopped {
            return Err(SessionError::Stopped);
        }
        if !self.timers.is_armed(TimerId::Wakeup) {
            return Err(SessionError::NotStarted);
        }

        match event {
            Event::Tick => {
                self.service_indicator(now);
                if !self.timers.is_due(TimerId::Wakeup, now) {
                    return Ok(self.timers.remaining(TimerId::Wakeup, now));
                }
                match self.step(now) {
                    Ok(delay) => Ok(self.schedule(now, delay)),
                    Err(err) => {
                        self.halt(err);
                        Err(err)
                    }
                }
            }
            Event::Connected => {
                if self.state == State::Connecting {
                    info!("MQTT connection established");
                    self.enter(State::Connected);
                    Ok(self.schedule(now, IMMEDIATE))
                } else {
                    warn!("Unexpected connection event in state {:?}", self.state);
                    Ok(self.timers.remaining(TimerId::Wakeup, now))
                }
            }
            Event::Disconnected => {
                if self.state == State::Boot {
                    debug!("Disconnection before registration ignored");
                    return Ok(self.timers.remaining(TimerId::Wakeup, now));
                }
                warn!("MQTT disconnected");
                self.enter(State::Disconnected);
                let delay = self.recover(now);
                Ok(self.schedule(now, delay))
            }
            Event::SubAck { accepted } => {
                if accepted {
                    debug!("Subscribed to topic \"{}\"", self.topics.subscribe());
                } else {
                    warn!("Broker rejected subscription to \"{}\"", self.topics.subscribe());
                }
                Ok(self.timers.remaining(TimerId::Wakeup, now))
            }
            Event::PubAck => {
                debug!("Publishing complete");
                Ok(self.timers.remaining(TimerId::Wakeup, now))
            }
            Event::Message { topic, payload } => {
                debug!("Message received: topic=\"{}\" ({} bytes)", topic, payload.len());
                self.module.on_message(topic, payload);
                Ok(self.timers.remaining(TimerId::Wakeup, now))
            }
        }
    }

    /// The earliest instant at which the session needs a tick.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn reconnect_attempt(&self) -> u32 {
        self.reconnect_attempt
    }

    pub fn keep_alive_secs(&self) -> u16 {
        self.config.keep_alive_secs()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    pub fn topics(&self) -> &SessionTopics {
        &self.topics
    }

    pub fn timers(&self) -> &TimerMux {
        &self.timers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut M {
        &mut self.module
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

// Transition bodies. Each runs for exactly one due tick.
impl<T, N, M, I, const PAYLOAD_SIZE: usize> Session<T, N, M, I, PAYLOAD_SIZE>
where
    T: SessionTransport,
    N: NetworkProbe,
    M: SessionModule,
    I: StatusIndicator,
{
    fn step(&mut self, now: Instant) -> Result<Duration, SessionError> {
        match self.state {
            State::Boot => {
                self.transport.register(self.client_id.as_str());
                self.timers
                    .arm(TimerId::Blink, now, self.config.blink_period);
                self.enter(State::Init);
                Ok(IMMEDIATE)
            }
            State::Init => {
                if self.network.is_reachable() {
                    self.enter(State::NetOk);
                    Ok(IMMEDIATE)
                } else {
                    Ok(self.config.network_retry_interval)
                }
            }
            State::NetOk => self.connect(now),
            State::Connecting => {
                trace!("Still waiting for the broker");
                Ok(self.config.connect_poll_interval)
            }
            State::Connected => self.subscribe(now),
            State::Subscribed => Ok(self.publish(now)),
            // Every path into Disconnected recovers to Init in the same call.
            State::Disconnected => {
                debug_assert!(false, "Disconnected outlived the advance that entered it");
                Ok(self.recover(now))
            }
            State::Stopped => Err(SessionError::Stopped),
        }
    }

    fn connect(&mut self, now: Instant) -> Result<Duration, SessionError> {
        debug!(
            "Connecting to broker {}:{} ...",
            self.config.broker_address, self.config.broker_port
        );
        match self.transport.connect(
            self.config.broker_address,
            self.config.broker_port,
            self.config.keep_alive_secs(),
            true,
        ) {
            Ok(()) => {
                self.enter(State::Connecting);
                Ok(self.config.connect_poll_interval)
            }
            Err(status) => {
                warn!("Connect request failed: {:?}", status);
                self.enter(State::Disconnected);
                Ok(self.recover(now))
            }
        }
    }

    fn subscribe(&mut self, now: Instant) -> Result<Duration, SessionError> {
        debug!("Subscribing topic \"{}\" ...", self.topics.subscribe());
        match self
            .transport
            .subscribe(self.topics.subscribe(), QoS::AtMostOnce)
        {
            Ok(()) => {}
            Err(TransportStatus::OutQueueFull) => {
                error!("Tried to subscribe but command queue was full!");
                return Err(SessionError::SubscribeQueueFull);
            }
            Err(status) => {
                warn!("Subscribe request failed: {:?}", status);
                self.enter(State::Disconnected);
                return Ok(self.recover(now));
            }
        }

        self.reconnect_attempt = 0;
        self.timers.stop(TimerId::Blink);
        self.indicator.set(Signal::Disconnected, Level::Off);
        self.enter(State::Subscribed);
        self.module.on_subscribed();
        Ok(self.config.publish_period)
    }

    fn publish(&mut self, now: Instant) -> Duration {
        self.indicator.set(Signal::Publish, Level::On);

        let mut out = PayloadWriter::new(&mut self.payload);
        self.module.build_message(&mut out);
        if out.is_truncated() {
            warn!("Outgoing payload truncated to {} bytes", out.capacity());
        }
        let len = out.len();

        debug!("Publish message on topic \"{}\"", self.topics.publish());
        if let Err(status) = self.transport.publish(
            self.topics.publish(),
            &self.payload[..len],
            QoS::AtMostOnce,
            false,
        ) {
            // The transport reports a dead link on its own.
            warn!("Publish request failed: {:?}", status);
        }

        self.timers
            .arm(TimerId::PublishPulse, now, self.config.publish_pulse);
        self.config.publish_period
    }

    /// The disconnection edge: blink, drop the connection, back off.
    fn recover(&mut self, now: Instant) -> Duration {
        self.timers.stop(TimerId::Blink);
        self.timers
            .arm(TimerId::Blink, now, self.config.blink_period);

        self.transport.disconnect();
        self.enter(State::Init);

        let delay = self.config.backoff().delay(self.reconnect_attempt);
        self.reconnect_attempt = self.reconnect_attempt.saturating_add(1);
        warn!(
            "Reconnection trial #{} in {} ms",
            self.reconnect_attempt,
            delay.as_millis()
        );
        delay
    }

    fn service_indicator(&mut self, now: Instant) {
        if self.timers.is_due(TimerId::Blink, now) {
            self.indicator.set(Signal::Disconnected, Level::Toggle);
            self.timers.reset(TimerId::Blink, now);
        }
        if self.timers.is_due(TimerId::PublishPulse, now) {
            self.indicator.set(Signal::Publish, Level::Off);
            self.timers.stop(TimerId::PublishPulse);
        }
    }

    fn schedule(&mut self, now: Instant, delay: Duration) -> Duration {
        self.timers.arm(TimerId::Wakeup, now, delay);
        delay
    }

    fn enter(&mut self, next: State) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn halt(&mut self, err: SessionError) {
        error!("Session stopped: {:?}", err);
        self.timers.stop_all();
        self.enter(State::Stopped);
    }
}
