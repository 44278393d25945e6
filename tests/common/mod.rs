//! Recording collaborators shared by the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::fmt::Write as _;

use embassy_time::{Duration, Instant};
use mote_session::error::TransportStatus;
use mote_session::indicator::{Level, Signal, StatusIndicator};
use mote_session::runtime::{PayloadWriter, SessionModule, SessionTopics};
use mote_session::config::client_id;
use mote_session::{NetworkProbe, QoS, Session, SessionConfig, SessionTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Register(String),
    Connect {
        broker: String,
        port: u16,
        keep_alive: u16,
        clean_session: bool,
    },
    Subscribe(String, QoS),
    Publish {
        topic: String,
        payload: Vec<u8>,
        qos: QoS,
        retain: bool,
    },
    Disconnect,
}

#[derive(Default)]
pub struct RecordingTransport {
    pub calls: Vec<Call>,
    pub connect_result: Option<TransportStatus>,
    pub subscribe_result: Option<TransportStatus>,
}

impl RecordingTransport {
    pub fn publishes(&self) -> Vec<(String, Vec<u8>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Publish { topic, payload, .. } => Some((topic.clone(), payload.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
}

impl SessionTransport for RecordingTransport {
    fn register(&mut self, client_id: &str) {
        self.calls.push(Call::Register(client_id.to_string()));
    }

    fn connect(
        &mut self,
        broker_address: &str,
        port: u16,
        keep_alive_secs: u16,
        clean_session: bool,
    ) -> Result<(), TransportStatus> {
        self.calls.push(Call::Connect {
            broker: broker_address.to_string(),
            port,
            keep_alive: keep_alive_secs,
            clean_session,
        });
        match self.connect_result {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), TransportStatus> {
        self.calls.push(Call::Subscribe(topic.to_string(), qos));
        match self.subscribe_result {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportStatus> {
        self.calls.push(Call::Publish {
            topic: topic.to_string(),
            payload: payload.to_vec(),
            qos,
            retain,
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        self.calls.push(Call::Disconnect);
    }
}

pub struct FakeNetwork {
    pub reachable: Cell<bool>,
}

impl FakeNetwork {
    pub fn up() -> Self {
        Self {
            reachable: Cell::new(true),
        }
    }

    pub fn down() -> Self {
        Self {
            reachable: Cell::new(false),
        }
    }
}

impl NetworkProbe for FakeNetwork {
    fn is_reachable(&self) -> bool {
        self.reachable.get()
    }
}

/// Publishes `reading <n>`, counting up on every build.
#[derive(Default)]
pub struct CountingModule {
    pub built: u32,
    pub received: Vec<(String, Vec<u8>)>,
    pub subscriptions: u32,
}

impl SessionModule for CountingModule {
    fn build_message(&mut self, out: &mut PayloadWriter<'_>) {
        self.built += 1;
        let _ = write!(out, "reading {}", self.built);
    }

    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        self.received.push((topic.to_string(), payload.to_vec()));
    }

    fn on_subscribed(&mut self) {
        self.subscriptions += 1;
    }
}

#[derive(Default)]
pub struct RecordingIndicator {
    pub writes: Vec<(Signal, Level)>,
}

impl StatusIndicator for RecordingIndicator {
    fn set(&mut self, signal: Signal, level: Level) {
        self.writes.push((signal, level));
    }
}

pub type TestSession =
    Session<RecordingTransport, FakeNetwork, CountingModule, RecordingIndicator, 64>;

pub const PUBLISH_PERIOD: Duration = Duration::from_secs(10);

pub fn test_config() -> SessionConfig {
    SessionConfig::default()
        .with_reconnect_interval(Duration::from_secs(1))
        .with_max_backoff_exponent(6)
        .with_publish_period(PUBLISH_PERIOD)
}

pub fn new_session(network: FakeNetwork) -> TestSession {
    new_session_with(test_config(), RecordingTransport::default(), network)
}

pub fn new_session_with(
    config: SessionConfig,
    transport: RecordingTransport,
    network: FakeNetwork,
) -> TestSession {
    Session::new(
        config,
        client_id("00124b0a0b0c").unwrap(),
        SessionTopics::new("water-level", "simulation").unwrap(),
        transport,
        network,
        CountingModule::default(),
        RecordingIndicator::default(),
    )
}

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}
