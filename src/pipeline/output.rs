//! Output commands handed to the external collaborators (renderer, audio, transport).

use serde::Serialize;

use crate::config::{SoundSource, TextStyle};

/// One styled, non-overlapping region of the displayed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSpan {
    pub start: usize,
    pub end: usize,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EphemeralKind {
    StatusBar,
    Title,
    Toast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutgoingKind {
    Chat,
    Command,
}

/// Side effect requested by the engine. Serialized as `{"type": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputCommand {
    PlaySound {
        id: String,
        volume: f32,
        pitch: f32,
        source: SoundSource,
    },
    /// Display the original message with the given styled regions.
    ShowMessage { text: String, spans: Vec<StyledSpan> },
    /// Display `text` instead of the original message.
    ReplaceMessage { text: String },
    /// Hide the original message.
    SuppressMessage,
    ShowEphemeral { kind: EphemeralKind, text: String },
    SendOutgoing { kind: OutgoingKind, text: String },
    PressKeys { chord: String },
}

impl OutputCommand {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlaySound { .. } => "play_sound",
            Self::ShowMessage { .. } => "show_message",
            Self::ReplaceMessage { .. } => "replace_message",
            Self::SuppressMessage => "suppress_message",
            Self::ShowEphemeral { .. } => "show_ephemeral",
            Self::SendOutgoing { .. } => "send_outgoing",
            Self::PressKeys { .. } => "press_keys",
        }
    }
}
