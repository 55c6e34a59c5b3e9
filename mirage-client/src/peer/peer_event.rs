use mirage_core::{IceCandidate, IceConnectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Events the peer backend generates for the negotiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// A local ICE candidate was gathered and must be trickled to the service.
    CandidateGathered(IceCandidate),

    /// Local gathering finished.
    GatheringComplete,

    IceStateChanged(IceConnectionState),

    /// A remote track arrived.
    TrackAdded(MediaKind),
}
