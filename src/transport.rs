//! # Transport and Network Abstractions
//!
//! The session never speaks MQTT on the wire itself. It drives an external
//! message-transport library through `SessionTransport`, whose requests are
//! non-blocking: their outcomes arrive later as notifications (see
//! [`Notification`](crate::runtime::Notification)). Network reachability is
//! queried through `NetworkProbe`.

use crate::error::TransportStatus;

/// Represents the Quality of Service (QoS) levels for MQTT messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// A non-blocking handle to the message-transport library.
///
/// Every method must return immediately. Requests are queued by the
/// transport and confirmed through notifications, in the order the
/// transport emits them.
pub trait SessionTransport {
    /// Initialise the transport handle with the client identity.
    fn register(&mut self, client_id: &str);

    /// Start connecting to the broker. Success is reported by a `Connected`
    /// notification, failure by `Disconnected`.
    fn connect(
        &mut self,
        broker_address: &str,
        port: u16,
        keep_alive_secs: u16,
        clean_session: bool,
    ) -> Result<(), TransportStatus>;

    /// Queue a subscribe request.
    ///
    /// [`TransportStatus::OutQueueFull`] is fatal to the session.
    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), TransportStatus>;

    /// Queue a publish request.
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportStatus>;

    /// Tear the connection down, leaving the handle ready for a new `connect`.
    fn disconnect(&mut self);
}

impl<T: SessionTransport + ?Sized> SessionTransport for &mut T {
    fn register(&mut self, client_id: &str) {
        (**self).register(client_id)
    }

    fn connect(
        &mut self,
        broker_address: &str,
        port: u16,
        keep_alive_secs: u16,
        clean_session: bool,
    ) -> Result<(), TransportStatus> {
        (**self).connect(broker_address, port, keep_alive_secs, clean_session)
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), TransportStatus> {
        (**self).subscribe(topic, qos)
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportStatus> {
        (**self).publish(topic, payload, qos, retain)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }
}

/// Answers whether the network can currently reach the broker.
pub trait NetworkProbe {
    fn is_reachable(&self) -> bool;
}

/// An `embassy-net` stack is reachable once its link is up and its IP
/// configuration (address and default route) has been applied.
impl NetworkProbe for embassy_net::Stack<'_> {
    fn is_reachable(&self) -> bool {
        let reachable = self.is_link_up() && self.is_config_up();
        if !reachable {
            warn!("No connectivity");
        }
        reachable
    }
}

impl<P: NetworkProbe + ?Sized> NetworkProbe for &P {
    fn is_reachable(&self) -> bool {
        (**self).is_reachable()
    }
}
