/// Offer/answer state of a single peer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    HaveLocalOffer,
    HaveRemoteOffer,
    Stable,
}

/// The things that can happen to a session's negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationAction {
    SendOffer,
    ReceiveOffer,
    SendAnswer,
    ReceiveAnswer,
    Rollback,
}

/// The closed transition table. Returns `None` for every pair outside
/// the table; callers treat that as a no-op, never a crash.
pub fn transition(state: NegotiationState, action: NegotiationAction) -> Option<NegotiationState> {
    use NegotiationAction::*;
    use NegotiationState::*;

    match (state, action) {
        (Idle, SendOffer) | (Stable, SendOffer) => Some(HaveLocalOffer),
        (Idle, ReceiveOffer) | (Stable, ReceiveOffer) => Some(HaveRemoteOffer),
        (HaveRemoteOffer, SendAnswer) => Some(Stable),
        (HaveLocalOffer, ReceiveAnswer) => Some(Stable),
        (HaveLocalOffer, Rollback) => Some(Idle),
        _ => None,
    }
}
