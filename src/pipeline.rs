use std::sync::{Arc, Mutex};

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::warn;

use crate::transport::{TransportEvent, TransportProxy};

/// Internal states of the local playback pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Playing,
    Paused,
    Stopped,
    Buffering,
    Waiting,
    /// Stopped after an unrecoverable pipeline error.
    StoppedError,
}

impl PipelineState {
    /// The transport state string this pipeline state reports as.
    pub fn report(&self) -> &'static str {
        match self {
            PipelineState::Playing => "Playing",
            PipelineState::Paused => "Paused",
            PipelineState::Stopped | PipelineState::StoppedError => "Stopped",
            PipelineState::Buffering => "Buffering",
            PipelineState::Waiting => "Waiting",
        }
    }
}

/// Control commands the pipeline owner executes on our behalf.
///
/// Implemented by the (excluded) local player; decoding and mixing happen
/// behind this seam.
pub trait PipelineControl: Send + Sync {
    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
}

/// In-process transport over the local playback pipeline.
///
/// The pipeline owner pushes state transitions with [`set_state`]; the
/// multiplexer sees the same proxy surface as any remote transport.
///
/// [`set_state`]: LocalPipeline::set_state
pub struct LocalPipeline {
    control: Arc<dyn PipelineControl>,
    state: Mutex<PipelineState>,
    subscribers: Mutex<Vec<Sender<TransportEvent>>>,
}

impl LocalPipeline {
    pub fn new(control: Arc<dyn PipelineControl>) -> Self {
        Self {
            control,
            state: Mutex::new(PipelineState::Stopped),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> PipelineState {
        *self.state.lock().unwrap()
    }

    /// Pipeline-side state notification. Overwrites the reported state and
    /// wakes every subscriber, in emission order.
    pub fn set_state(&self, state: PipelineState) {
        if state == PipelineState::StoppedError {
            warn!("local pipeline stopped on error");
        }
        *self.state.lock().unwrap() = state;
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(TransportEvent::StateChanged).is_ok());
    }
}

impl TransportProxy for LocalPipeline {
    fn subscribe(&self) -> Result<Receiver<TransportEvent>> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().unwrap().push(tx);
        Ok(rx)
    }

    fn current_state(&self) -> Result<String> {
        Ok(self.state().report().to_string())
    }

    fn issue_stop(&self) -> Result<()> {
        self.control.stop()
    }

    fn issue_play(&self) -> Result<()> {
        self.control.play()
    }

    fn issue_pause(&self) -> Result<()> {
        self.control.pause()
    }

    fn supports_pause(&self) -> bool {
        true
    }
}
