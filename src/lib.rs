pub mod capabilities;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod product;
pub mod source_controller;
pub mod source_registry;
pub mod switch;
pub mod transport;

pub use capabilities::TransportState;
pub use errors::SwitchError;
pub use model::SourceKind;
pub use pipeline::{LocalPipeline, PipelineControl, PipelineState};
pub use product::{ProductProxy, SourceSelectionEvent};
pub use source_controller::SourceController;
pub use source_registry::{ActiveSourceRegistry, source_at_index};
pub use switch::{SourceSwitch, SourceSwitchBuilder, SwitchOptions};
pub use transport::{TransportEvent, TransportProxy};
