use trellis_core::PeerId;

/// Outcome of a glare tie-break: both sides sent offers that crossed
/// on the wire and exactly one must back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlareOutcome {
    /// Roll back the outstanding local offer and accept the remote one.
    YieldToRemote,
    /// Keep the outstanding local offer and ignore the remote one; the
    /// peer is the one that yields.
    KeepLocalOffer,
}

/// Deterministic tie-break: the side with the lexicographically greater
/// identifier yields. No coordination beyond the offers themselves.
pub fn resolve(local: &PeerId, remote: &PeerId) -> GlareOutcome {
    if local > remote {
        GlareOutcome::YieldToRemote
    } else {
        GlareOutcome::KeepLocalOffer
    }
}
