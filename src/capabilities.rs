use serde::Serialize;

/// Reported playback state of a transport, remote or local.
///
/// Parsed from the raw state string the underlying proxy reports; the
/// variants form a closed set and anything outside it lands in `Unknown`
/// with the raw string preserved for logging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
    Buffering,
    Waiting,
    NoMedia,
    /// Source-specific or garbled state string.
    Unknown(String),
}

impl TransportState {
    /// Map a raw reported transport state string to a logical state.
    ///
    /// Accepts both OpenHome-style ("Playing", "Buffering") and UPnP
    /// AVTransport-style ("PAUSED_PLAYBACK", "NO_MEDIA_PRESENT") spellings.
    pub fn from_report(raw: &str) -> Self {
        let s = raw.trim().to_ascii_uppercase();
        match s.as_str() {
            "STOPPED" => TransportState::Stopped,
            "PLAYING" => TransportState::Playing,
            "PAUSED" | "PAUSED_PLAYBACK" => TransportState::Paused,
            "BUFFERING" | "TRANSITIONING" => TransportState::Buffering,
            "WAITING" => TransportState::Waiting,
            "NO_MEDIA_PRESENT" => TransportState::NoMedia,
            _ => TransportState::Unknown(raw.to_string()),
        }
    }

    /// Human-readable label, suitable for a front-end state display.
    pub fn as_str(&self) -> &str {
        match self {
            TransportState::Stopped => "Stopped",
            TransportState::Playing => "Playing",
            TransportState::Paused => "Paused",
            TransportState::Buffering => "Buffering",
            TransportState::Waiting => "Waiting",
            TransportState::NoMedia => "NoMedia",
            TransportState::Unknown(s) => s.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TransportState::Unknown(_))
    }

    /// Stop is available unless the transport is already stopped.
    ///
    /// An unrecognized state yields false: we refuse to guess what an
    /// unknown transport state allows.
    pub fn can_stop(&self) -> bool {
        !matches!(self, TransportState::Stopped | TransportState::Unknown(_))
    }

    /// Play is available when the transport is idle or paused. A transport
    /// that is already playing, still buffering, or has nothing loaded
    /// cannot meaningfully be started.
    pub fn can_play(&self) -> bool {
        matches!(
            self,
            TransportState::Stopped | TransportState::Paused | TransportState::Waiting
        )
    }

    /// Pause is available only while playing, and only when the source's
    /// protocol exposes pause in the first place.
    pub fn can_pause(&self, supports_pause: bool) -> bool {
        supports_pause && matches!(self, TransportState::Playing)
    }
}
