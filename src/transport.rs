use anyhow::Result;
use crossbeam_channel::Receiver;

/// Notification pushed by a transport proxy on its own delivery thread.
#[derive(Clone, Debug)]
pub enum TransportEvent {
    /// The reported transport state changed; the cached value should be
    /// refreshed with a `current_state` read.
    StateChanged,
}

/// Control seam over one underlying transport, remote protocol or local
/// pipeline.
///
/// Implementations live in the excluded protocol layers; this crate only
/// forwards actions and consumes the notification stream. Failures are
/// reported through `anyhow`; an error that downcasts to
/// [`SwitchError::ActionRejected`](crate::SwitchError) is preserved as a
/// rejection, anything else is classified as an unreachable transport by
/// the owning controller.
pub trait TransportProxy: Send + Sync {
    /// Subscribe to the proxy's state-change notification stream.
    ///
    /// Called exactly once per controller, at construction. Events arrive
    /// in the order the underlying transport emits them.
    fn subscribe(&self) -> Result<Receiver<TransportEvent>>;

    /// The latest transport state string reported by the device.
    fn current_state(&self) -> Result<String>;

    fn issue_stop(&self) -> Result<()>;

    fn issue_play(&self) -> Result<()>;

    fn issue_pause(&self) -> Result<()>;

    /// Whether the underlying protocol exposes a pause action at all.
    fn supports_pause(&self) -> bool;
}
