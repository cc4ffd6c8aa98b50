use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, error, warn};

use crate::capabilities::TransportState;
use crate::errors::SwitchError;
use crate::model::SourceKind;
use crate::transport::{TransportEvent, TransportProxy};

/// Transport control scoped to one source.
///
/// Owns the proxy handle for its whole lifetime, subscribes exactly once
/// to its state-change stream, and keeps a cached [`TransportState`] fresh
/// regardless of whether the source is currently active. Activation is
/// pure bookkeeping: it decides whether top-level commands are routed
/// here, nothing more.
pub struct SourceController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    kind: SourceKind,
    proxy: Arc<dyn TransportProxy>,
    /// Pause support resolved once: the protocol model of the source kind
    /// AND what this particular proxy advertises.
    supports_pause: bool,
    state: Mutex<TransportState>,
    is_active: AtomicBool,
}

impl SourceController {
    /// Attach to a transport proxy. Subscription or delivery-thread
    /// failures are fatal: the multiplexer cannot operate with a missing
    /// controller.
    pub fn new(kind: SourceKind, proxy: Arc<dyn TransportProxy>) -> Result<Self, SwitchError> {
        let events = proxy
            .subscribe()
            .map_err(|err| SwitchError::proxy_attach(kind.type_tag(), err.to_string()))?;

        let supports_pause = kind.supports_pause() && proxy.supports_pause();
        let inner = Arc::new(ControllerInner {
            kind,
            proxy,
            supports_pause,
            state: Mutex::new(TransportState::Unknown(String::new())),
            is_active: AtomicBool::new(false),
        });

        // Prime the cache so capability queries have a best-known state
        // before the first notification arrives.
        inner.refresh();

        let worker = Arc::clone(&inner);
        thread::Builder::new()
            .name(format!("{}-transport-events", kind.type_tag().to_lowercase()))
            .spawn(move || {
                for event in events.iter() {
                    match event {
                        TransportEvent::StateChanged => worker.refresh(),
                    }
                }
                debug!(source = %worker.kind, "transport event stream closed");
            })
            .map_err(|err| SwitchError::proxy_attach(kind.type_tag(), err.to_string()))?;

        Ok(Self { inner })
    }

    pub fn kind(&self) -> SourceKind {
        self.inner.kind
    }

    /// Toggle whether top-level commands are routed to this source.
    ///
    /// No side effect on the underlying transport and no re-subscription;
    /// safe to call repeatedly with the same value.
    pub fn activate(&self, active: bool) {
        if self.inner.is_active.swap(active, Ordering::SeqCst) != active {
            debug!(source = %self.inner.kind, active, "source activation changed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active.load(Ordering::SeqCst)
    }

    pub fn can_stop(&self) -> (bool, TransportState) {
        let state = self.cached_state();
        (state.can_stop(), state)
    }

    pub fn can_play(&self) -> (bool, TransportState) {
        let state = self.cached_state();
        (state.can_play(), state)
    }

    pub fn can_pause(&self) -> (bool, TransportState) {
        let state = self.cached_state();
        (state.can_pause(self.inner.supports_pause), state)
    }

    pub fn stop(&self) -> Result<(), SwitchError> {
        self.inner
            .proxy
            .issue_stop()
            .map_err(|err| self.inner.classify(err))
    }

    pub fn play(&self) -> Result<(), SwitchError> {
        self.inner
            .proxy
            .issue_play()
            .map_err(|err| self.inner.classify(err))
    }

    pub fn pause(&self) -> Result<(), SwitchError> {
        if !self.inner.supports_pause {
            return Err(SwitchError::action_rejected(
                self.inner.kind,
                "source does not expose pause",
            ));
        }
        self.inner
            .proxy
            .issue_pause()
            .map_err(|err| self.inner.classify(err))
    }

    fn cached_state(&self) -> TransportState {
        self.inner.state.lock().unwrap().clone()
    }
}

impl ControllerInner {
    /// Re-read the transport state and overwrite the cache. Invoked by the
    /// delivery thread for every notification, also while inactive: an
    /// inactive source can still legitimately change state.
    fn refresh(&self) {
        match self.proxy.current_state() {
            Ok(raw) => {
                let state = TransportState::from_report(&raw);
                if let TransportState::Unknown(s) = &state {
                    let err = SwitchError::UnrecognizedState(s.clone());
                    error!(source = %self.kind, error = %err, "transport reported a state outside the known set");
                }
                *self.state.lock().unwrap() = state;
            }
            Err(err) => {
                warn!(
                    source = %self.kind,
                    error = %err,
                    "failed to re-read transport state, keeping cached value"
                );
            }
        }
    }

    /// Map a proxy failure to the switch error model: typed rejections are
    /// retagged with this source, anything else means the transport is
    /// unreachable.
    fn classify(&self, err: anyhow::Error) -> SwitchError {
        match err.downcast::<SwitchError>() {
            Ok(SwitchError::ActionRejected { reason, .. }) => {
                SwitchError::action_rejected(self.kind, reason)
            }
            Ok(other) => other,
            Err(err) => SwitchError::transport_unreachable(self.kind, err.to_string()),
        }
    }
}
