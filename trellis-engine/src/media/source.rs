/// Which local video goes out to every peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoSource {
    Camera,
    Screen,
    None,
}

/// Which local audio goes out to every peer. `Translated` is the
/// synthesized output of the translation pipeline, so "others hear the
/// translation, not my raw voice".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioSource {
    Microphone,
    Translated,
    Muted,
}
