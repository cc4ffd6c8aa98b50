use std::fmt;

use serde::Serialize;

/// Mutually exclusive playback origins a device can be outputting from.
///
/// Exactly one source is active at a time; `Unknown` covers startup,
/// teardown and product notifications we could not map to a known source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SourceKind {
    Playlist,
    Radio,
    Receiver,
    UpnpAv,
    Unknown,
}

impl SourceKind {
    /// Map a product source-type tag (the `<Type>` token of the source
    /// list description) to a logical source kind.
    pub fn from_type_tag(tag: &str) -> Self {
        match tag.trim() {
            "Playlist" => SourceKind::Playlist,
            "Radio" => SourceKind::Radio,
            "Receiver" => SourceKind::Receiver,
            "UpnpAv" => SourceKind::UpnpAv,
            _ => SourceKind::Unknown,
        }
    }

    /// The tag this kind is announced under in the product source list.
    pub fn type_tag(&self) -> &'static str {
        match self {
            SourceKind::Playlist => "Playlist",
            SourceKind::Radio => "Radio",
            SourceKind::Receiver => "Receiver",
            SourceKind::UpnpAv => "UpnpAv",
            SourceKind::Unknown => "Unknown",
        }
    }

    /// Whether the source's protocol model exposes pause at all.
    ///
    /// Radio and Receiver are live streams and cannot pause, whatever
    /// transport state they currently report.
    pub fn supports_pause(&self) -> bool {
        matches!(self, SourceKind::Playlist | SourceKind::UpnpAv)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tag_round_trip() {
        for kind in [
            SourceKind::Playlist,
            SourceKind::Radio,
            SourceKind::Receiver,
            SourceKind::UpnpAv,
        ] {
            assert_eq!(SourceKind::from_type_tag(kind.type_tag()), kind);
        }
        assert_eq!(SourceKind::from_type_tag("Spotify"), SourceKind::Unknown);
        assert_eq!(SourceKind::from_type_tag(""), SourceKind::Unknown);
    }

    #[test]
    fn serializes_as_plain_tag() {
        assert_eq!(
            serde_json::to_string(&SourceKind::Playlist).unwrap(),
            "\"Playlist\""
        );
    }

    #[test]
    fn live_streams_never_pause() {
        assert!(SourceKind::Playlist.supports_pause());
        assert!(SourceKind::UpnpAv.supports_pause());
        assert!(!SourceKind::Radio.supports_pause());
        assert!(!SourceKind::Receiver.supports_pause());
        assert!(!SourceKind::Unknown.supports_pause());
    }
}
