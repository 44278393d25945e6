//! Example: A water level sensor driven by `SessionRuntime`
//!
//! This example implements `SessionModule` for a simulated water tank and runs
//! the full session lifecycle on the host against an in-process broker stand-in.
//!
//! # Key Concepts
//!
//! - `build_message()` formats the periodic reading into the session's buffer
//! - `on_message()` decodes one known field with `json_field`
//! - The transport reports back through a `NotificationHandle`, the way a real
//!   MQTT library callback would
//! - `SessionRuntime::run()` returns the error that ended the session
//!
//! Run it with `cargo run --example water_level_module`.

use core::fmt::Write;

use embassy_futures::block_on;
use embassy_sync::channel::Channel;
use embassy_time::Duration;
use mote_session::config::client_id_from_link_addr;
use mote_session::error::TransportStatus;
use mote_session::indicator::NoIndicator;
use mote_session::runtime::{
    Notification, NotificationChannel, NotificationHandle, PayloadWriter, SessionModule,
    SessionRuntime, SessionTopics,
};
use mote_session::util::json_field;
use mote_session::{NetworkProbe, QoS, Session, SessionConfig, SessionTransport};

const LEVEL_TOPIC: &str = "water-level";
const FLOW_TOPIC: &str = "simulation";

/// A tank whose level moves by the last commanded balance flow.
struct WaterLevel {
    level: i32,
    flow: i32,
}

impl SessionModule for WaterLevel {
    fn build_message(&mut self, out: &mut PayloadWriter<'_>) {
        self.level = (self.level + self.flow).clamp(0, 1000);
        let _ = write!(out, r#"{{"n":"water-level","v":{}}}"#, self.level);
    }

    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        match json_field::<i32>(payload, "balance-flow") {
            Ok(flow) => self.flow = flow,
            Err(err) => println!("ignoring message on {topic}: {err}"),
        }
    }

    fn on_subscribed(&mut self) {
        println!("subscribed, publishing every period");
    }
}

/// Accepts every request and answers through the notification channel.
///
/// After a few publishes it commands a flow change, then drops the link. The
/// second subscribe reports a full queue, which stops the session.
struct SimulatedBroker<'a> {
    notifications: NotificationHandle<'a, 4>,
    publishes: u32,
    subscribes: u32,
}

impl SessionTransport for SimulatedBroker<'_> {
    fn register(&mut self, client_id: &str) {
        println!("registered as {client_id}");
    }

    fn connect(
        &mut self,
        broker_address: &str,
        port: u16,
        keep_alive_secs: u16,
        _clean_session: bool,
    ) -> Result<(), TransportStatus> {
        println!("connecting to [{broker_address}]:{port}, keep-alive {keep_alive_secs}s");
        self.notifications.try_notify(Notification::Connected);
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, _qos: QoS) -> Result<(), TransportStatus> {
        self.subscribes += 1;
        if self.subscribes > 1 {
            return Err(TransportStatus::OutQueueFull);
        }
        println!("subscribe {topic}");
        self.notifications
            .try_notify(Notification::SubAck { accepted: true });
        Ok(())
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        _qos: QoS,
        _retain: bool,
    ) -> Result<(), TransportStatus> {
        self.publishes += 1;
        println!(
            "publish {topic}: {}",
            core::str::from_utf8(payload).unwrap_or("<binary>")
        );
        match self.publishes {
            2 => {
                if let Some(command) = Notification::message(FLOW_TOPIC, br#"{"balance-flow":-40}"#) {
                    self.notifications.try_notify(command);
                }
            }
            4 => {
                self.notifications.try_notify(Notification::Disconnected);
            }
            _ => {}
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        println!("link dropped");
    }
}

struct Loopback;

impl NetworkProbe for Loopback {
    fn is_reachable(&self) -> bool {
        true
    }
}

fn main() {
    let channel: NotificationChannel<4> = Channel::new();
    let broker = SimulatedBroker {
        notifications: NotificationHandle::new(channel.sender()),
        publishes: 0,
        subscribes: 0,
    };
    let config = SessionConfig::default()
        .with_publish_period(Duration::from_millis(200))
        .with_reconnect_interval(Duration::from_millis(100));
    let Ok(topics) = SessionTopics::new(LEVEL_TOPIC, FLOW_TOPIC) else {
        return;
    };

    let mut session: Session<_, _, _, _, 64> = Session::new(
        config,
        client_id_from_link_addr(&[0x00, 0x12, 0x4b, 0xff, 0xfe, 0x0a, 0x0b, 0x0c]),
        topics,
        broker,
        Loopback,
        WaterLevel { level: 500, flow: 10 },
        NoIndicator,
    );

    let err = block_on(SessionRuntime::new(&mut session, channel.receiver()).run());
    println!(
        "session ended: {err} (level {}, flow {})",
        session.module().level,
        session.module().flow
    );
}
