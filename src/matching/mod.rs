//! Matching layer: triggers, style targets and per-notification activation.
//!
//! Submodules:
//! - `pattern`: lazily compiled, cached regexes for triggers and style targets.
//! - `trigger`: matching a trigger against message text / translation key.
//! - `style`: narrowing restyle spans through a style target.
//! - `evaluator`: the activation decision for one notification.

pub mod evaluator;
pub mod pattern;
pub mod style;
pub mod trigger;

pub use evaluator::{Activation, Rejection, evaluate};
pub use pattern::PatternError;
pub use trigger::{MatchInfo, Span, match_trigger};
