use crate::peer::PeerEvent;
use crate::transport::TransportEvent;
use tokio::sync::mpsc;

/// Everything the negotiator reacts to, funnelled into one per-attempt queue and
/// drained only by [`crate::Negotiator::pump`].
#[derive(Debug)]
pub enum DriverEvent {
    Socket(TransportEvent),
    Peer(PeerEvent),
}

/// Producer handle given to a signaling transport.
#[derive(Debug, Clone)]
pub struct TransportSink(mpsc::UnboundedSender<DriverEvent>);

/// Producer handle given to a peer backend.
#[derive(Debug, Clone)]
pub struct PeerSink(mpsc::UnboundedSender<DriverEvent>);

impl TransportSink {
    pub fn send(&self, event: TransportEvent) {
        let _ = self.0.send(DriverEvent::Socket(event));
    }
}

impl PeerSink {
    pub fn send(&self, event: PeerEvent) {
        let _ = self.0.send(DriverEvent::Peer(event));
    }
}

pub fn driver_queue() -> (TransportSink, PeerSink, mpsc::UnboundedReceiver<DriverEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TransportSink(tx.clone()), PeerSink(tx), rx)
}
