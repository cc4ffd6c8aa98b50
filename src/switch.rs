use std::sync::{Arc, Mutex};
use std::thread;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::errors::SwitchError;
use crate::model::SourceKind;
use crate::product::ProductProxy;
use crate::source_controller::SourceController;
use crate::source_registry::{ActiveSourceRegistry, source_at_index};
use crate::transport::TransportProxy;

/// Runtime options for the multiplexer.
///
/// `radio_enabled` replaces the build-time switch some devices use for
/// their radio source: when false the radio proxy slot is ignored and the
/// Radio kind stays unroutable.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SwitchOptions {
    pub radio_enabled: bool,
}

impl Default for SwitchOptions {
    fn default() -> Self {
        Self {
            radio_enabled: true,
        }
    }
}

/// Single transport control surface over all sources of a device.
///
/// Owns one [`SourceController`] per configured source and routes
/// top-level stop/play/pause to whichever source the product service
/// currently reports as selected. Cheap to clone; clones share the same
/// controllers and registry.
#[derive(Clone)]
pub struct SourceSwitch {
    inner: Arc<SwitchInner>,
}

struct SwitchInner {
    registry: ActiveSourceRegistry,
    playlist: SourceController,
    radio: Option<SourceController>,
    receiver: SourceController,
    upnp_av: SourceController,
    /// Serializes active-source transitions so concurrent selection events
    /// resolve last-writer-wins without interleaving their
    /// deactivate/activate pairs.
    transition: Mutex<()>,
}

impl SwitchInner {
    fn controller(&self, kind: SourceKind) -> Option<&SourceController> {
        match kind {
            SourceKind::Playlist => Some(&self.playlist),
            SourceKind::Radio => self.radio.as_ref(),
            SourceKind::Receiver => Some(&self.receiver),
            SourceKind::UpnpAv => Some(&self.upnp_av),
            SourceKind::Unknown => None,
        }
    }
}

/// Builder for [`SourceSwitch`]. Playlist, receiver and local pipeline
/// proxies are required; radio is optional.
#[derive(Default)]
pub struct SourceSwitchBuilder {
    playlist: Option<Arc<dyn TransportProxy>>,
    radio: Option<Arc<dyn TransportProxy>>,
    receiver: Option<Arc<dyn TransportProxy>>,
    upnp_av: Option<Arc<dyn TransportProxy>>,
    options: SwitchOptions,
}

impl SourceSwitchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playlist(mut self, proxy: Arc<dyn TransportProxy>) -> Self {
        self.playlist = Some(proxy);
        self
    }

    pub fn radio(mut self, proxy: Arc<dyn TransportProxy>) -> Self {
        self.radio = Some(proxy);
        self
    }

    pub fn receiver(mut self, proxy: Arc<dyn TransportProxy>) -> Self {
        self.receiver = Some(proxy);
        self
    }

    pub fn upnp_av(mut self, proxy: Arc<dyn TransportProxy>) -> Self {
        self.upnp_av = Some(proxy);
        self
    }

    pub fn options(mut self, options: SwitchOptions) -> Self {
        self.options = options;
        self
    }

    /// Construct every controller. Any attach failure aborts construction;
    /// the multiplexer never runs with a partial controller set.
    pub fn build(self) -> Result<SourceSwitch, SwitchError> {
        let playlist = required(SourceKind::Playlist, self.playlist)?;
        let receiver = required(SourceKind::Receiver, self.receiver)?;
        let upnp_av = required(SourceKind::UpnpAv, self.upnp_av)?;

        let radio = if self.options.radio_enabled {
            match self.radio {
                Some(proxy) => Some(SourceController::new(SourceKind::Radio, proxy)?),
                None => None,
            }
        } else {
            if self.radio.is_some() {
                info!("radio proxy supplied but radio is disabled by options");
            }
            None
        };

        Ok(SourceSwitch {
            inner: Arc::new(SwitchInner {
                registry: ActiveSourceRegistry::new(),
                playlist,
                radio,
                receiver,
                upnp_av,
                transition: Mutex::new(()),
            }),
        })
    }
}

fn required(
    kind: SourceKind,
    proxy: Option<Arc<dyn TransportProxy>>,
) -> Result<SourceController, SwitchError> {
    let proxy = proxy
        .ok_or_else(|| SwitchError::proxy_attach(kind.type_tag(), "no transport proxy supplied"))?;
    SourceController::new(kind, proxy)
}

impl SourceSwitch {
    pub fn builder() -> SourceSwitchBuilder {
        SourceSwitchBuilder::new()
    }

    /// Subscribe to the product service and follow its source selection.
    ///
    /// Selection events are parsed on their own delivery thread and fed
    /// into [`set_active_source`](Self::set_active_source).
    pub fn attach_product(&self, product: Arc<dyn ProductProxy>) -> Result<(), SwitchError> {
        let events = product
            .subscribe()
            .map_err(|err| SwitchError::proxy_attach("Product", err.to_string()))?;

        let switch = self.clone();
        thread::Builder::new()
            .name("product-source-events".into())
            .spawn(move || {
                for event in events.iter() {
                    let kind = source_at_index(&event.sources_xml, event.index);
                    debug!(index = event.index, source = %kind, "source index changed");
                    switch.set_active_source(kind);
                }
                debug!("product event stream closed");
            })
            .map_err(|err| SwitchError::proxy_attach("Product", err.to_string()))?;

        Ok(())
    }

    pub fn active_source(&self) -> SourceKind {
        self.inner.registry.current()
    }

    /// Whether the controller for `kind` currently has commands routed to
    /// it. At most one source reports true at any instant.
    pub fn source_is_active(&self, kind: SourceKind) -> bool {
        self.inner
            .controller(kind)
            .is_some_and(|controller| controller.is_active())
    }

    /// Switch command routing to `kind`. No-op when `kind` is already
    /// current; otherwise the previous controller is deactivated before
    /// the new one is activated.
    pub fn set_active_source(&self, kind: SourceKind) {
        let _guard = self.inner.transition.lock().unwrap();

        let current = self.inner.registry.current();
        if kind == current {
            return;
        }

        if let Some(old) = self.inner.controller(current) {
            old.activate(false);
        }
        match self.inner.controller(kind) {
            Some(new) => new.activate(true),
            None if kind != SourceKind::Unknown => {
                warn!(source = %kind, "selected source has no configured controller");
            }
            None => {}
        }
        self.inner.registry.record(kind);
        info!(from = %current, to = %kind, "active source changed");
    }

    pub fn stop(&self) -> Result<(), SwitchError> {
        self.dispatch("stop", SourceController::stop)
    }

    pub fn play(&self) -> Result<(), SwitchError> {
        self.dispatch("play", SourceController::play)
    }

    pub fn pause(&self) -> Result<(), SwitchError> {
        self.dispatch("pause", SourceController::pause)
    }

    pub fn can_stop(&self, kind: SourceKind) -> Result<(bool, String), SwitchError> {
        self.query(kind, SourceController::can_stop)
    }

    pub fn can_play(&self, kind: SourceKind) -> Result<(bool, String), SwitchError> {
        self.query(kind, SourceController::can_play)
    }

    pub fn can_pause(&self, kind: SourceKind) -> Result<(bool, String), SwitchError> {
        self.query(kind, SourceController::can_pause)
    }

    fn dispatch(
        &self,
        action: &str,
        op: impl Fn(&SourceController) -> Result<(), SwitchError>,
    ) -> Result<(), SwitchError> {
        let kind = self.inner.registry.current();
        if kind == SourceKind::Unknown {
            return Err(SwitchError::NoActiveSource);
        }
        let Some(controller) = self.inner.controller(kind) else {
            return Err(SwitchError::action_rejected(
                kind,
                "source is not configured on this device",
            ));
        };
        debug!(source = %kind, action, "routing transport command");
        op(controller)
    }

    fn query(
        &self,
        kind: SourceKind,
        op: impl Fn(&SourceController) -> (bool, crate::capabilities::TransportState),
    ) -> Result<(bool, String), SwitchError> {
        if kind == SourceKind::Unknown {
            return Err(SwitchError::NoActiveSource);
        }
        let Some(controller) = self.inner.controller(kind) else {
            return Err(SwitchError::action_rejected(
                kind,
                "source is not configured on this device",
            ));
        };
        let (ok, state) = op(controller);
        Ok((ok, state.as_str().to_string()))
    }
}
