use std::sync::Mutex;

use crate::model::SourceKind;

const TYPE_OPEN: &str = "<Type>";
const TYPE_CLOSE: &str = "</Type>";

/// Tracks which logical source the device currently reports as selected.
///
/// Starts at `Unknown` and is updated only by inbound source-selection
/// notifications (via the multiplexer), never polled. An unparseable
/// notification resolves to `Unknown`, which simply suspends command
/// routing until a recognized source is reported again.
#[derive(Debug)]
pub struct ActiveSourceRegistry {
    current: Mutex<SourceKind>,
}

impl ActiveSourceRegistry {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(SourceKind::Unknown),
        }
    }

    pub fn current(&self) -> SourceKind {
        *self.current.lock().unwrap()
    }

    pub(crate) fn record(&self, kind: SourceKind) {
        *self.current.lock().unwrap() = kind;
    }
}

impl Default for ActiveSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Recover the source kind at `index` of a product source list blob.
///
/// The blob is scanned for the (index+1)-th `<Type>` token; the enclosed
/// tag is matched against the known source types. An out-of-range index,
/// a truncated blob, or an unknown tag all resolve to `Unknown`.
pub fn source_at_index(sources_xml: &str, index: u32) -> SourceKind {
    let Some(start) = nth_substr_pos(sources_xml, TYPE_OPEN, index as usize + 1) else {
        return SourceKind::Unknown;
    };
    let rest = &sources_xml[start + TYPE_OPEN.len()..];
    let Some(end) = rest.find(TYPE_CLOSE) else {
        return SourceKind::Unknown;
    };
    SourceKind::from_type_tag(&rest[..end])
}

/// Byte offset of the nth (1-based) occurrence of `needle` in `haystack`.
fn nth_substr_pos(haystack: &str, needle: &str, n: usize) -> Option<usize> {
    if n == 0 || needle.is_empty() {
        return None;
    }
    let mut from = 0;
    let mut pos = 0;
    for _ in 0..n {
        pos = haystack[from..].find(needle)? + from;
        from = pos + needle.len();
    }
    Some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCES: &str = "<SourceList>\
        <Source><Name>Playlist</Name><Type>Playlist</Type><Visible>true</Visible></Source>\
        <Source><Name>Radio</Name><Type>Radio</Type><Visible>true</Visible></Source>\
        <Source><Name>Songcast</Name><Type>Receiver</Type><Visible>true</Visible></Source>\
        <Source><Name>UPnP AV</Name><Type>UpnpAv</Type><Visible>false</Visible></Source>\
        </SourceList>";

    #[test]
    fn maps_each_index_to_its_source() {
        assert_eq!(source_at_index(SOURCES, 0), SourceKind::Playlist);
        assert_eq!(source_at_index(SOURCES, 1), SourceKind::Radio);
        assert_eq!(source_at_index(SOURCES, 2), SourceKind::Receiver);
        assert_eq!(source_at_index(SOURCES, 3), SourceKind::UpnpAv);
    }

    #[test]
    fn out_of_range_index_is_unknown() {
        assert_eq!(source_at_index(SOURCES, 4), SourceKind::Unknown);
        assert_eq!(source_at_index(SOURCES, 100), SourceKind::Unknown);
    }

    #[test]
    fn unknown_type_tag_is_unknown() {
        let blob = "<Source><Type>Spotify</Type></Source>";
        assert_eq!(source_at_index(blob, 0), SourceKind::Unknown);
    }

    #[test]
    fn truncated_blob_is_unknown() {
        assert_eq!(source_at_index("", 0), SourceKind::Unknown);
        assert_eq!(source_at_index("<Source><Type>Radio", 0), SourceKind::Unknown);
        let cut = &SOURCES[..SOURCES.find("</Type>").unwrap()];
        assert_eq!(source_at_index(cut, 1), SourceKind::Unknown);
    }

    #[test]
    fn registry_starts_unknown() {
        let registry = ActiveSourceRegistry::new();
        assert_eq!(registry.current(), SourceKind::Unknown);
        registry.record(SourceKind::Radio);
        assert_eq!(registry.current(), SourceKind::Radio);
    }
}
