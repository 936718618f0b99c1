//! Message pipeline: own-message correlation, activation policy and delayed responses.
//!
//! Submodules:
//! - `self_message`: recognises echoes of messages the local user sent.
//! - `activation`: evaluates one message against the notification list.
//! - `scheduler`: tick-driven delivery of response messages.
//! - `output`: the commands handed to the renderer, audio and transport.

pub mod activation;
pub mod output;
pub mod scheduler;
pub mod self_message;

pub use activation::{ActivationPipeline, IncomingMessage, PipelineResult};
pub use output::{EphemeralKind, OutgoingKind, OutputCommand, StyledSpan};
pub use scheduler::{DueResponse, ResponseContext, ResponseScheduler};
pub use self_message::{ECHO_WINDOW, SelfMessageCorrelator};
