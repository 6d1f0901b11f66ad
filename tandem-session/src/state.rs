use std::fmt;

/// Negotiation progress for one participant.
///
/// There is deliberately no renegotiating state: track substitution is an
/// in-place sender operation and never re-enters offer/answer exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    LocalMediaReady,
    Offering,
    AwaitingRemoteAnswer,
    AwaitingRemoteOffer,
    Connected,
    Closed,
}

impl SessionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::LocalMediaReady => "local-media-ready",
            SessionState::Offering => "offering",
            SessionState::AwaitingRemoteAnswer => "awaiting-remote-answer",
            SessionState::AwaitingRemoteOffer => "awaiting-remote-offer",
            SessionState::Connected => "connected",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
