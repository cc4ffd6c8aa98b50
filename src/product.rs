use anyhow::Result;
use crossbeam_channel::Receiver;

/// Notification from the product/device-selection service: the device
/// switched to the source at `index` of its source list.
///
/// `sources_xml` is the product's source list description blob; the
/// selected source's type tag is recovered from it by
/// [`source_at_index`](crate::source_registry::source_at_index).
#[derive(Clone, Debug)]
pub struct SourceSelectionEvent {
    pub index: u32,
    pub sources_xml: String,
}

/// Seam over the product service's source-selection subscription.
pub trait ProductProxy: Send + Sync {
    /// Subscribe to source-index-changed notifications, delivered in
    /// emission order on the returned channel.
    fn subscribe(&self) -> Result<Receiver<SourceSelectionEvent>>;
}
