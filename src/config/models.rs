use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

use super::list::NotificationList;
use crate::matching::pattern::{PatternCache, PatternMode};
use crate::utils::keys::KeyBindings;

/// Root configuration for chatnotify.
///
/// This is the read-only snapshot the engine evaluates every message against:
/// - global evaluation policy (`notif_mode`, `restyle_mode`, sender detection)
/// - the ordered `notifications` list (index 0 is the identity notification)
/// - command `prefixes` used to correlate outgoing messages with their echo
/// - `key_bindings` used to resolve key-chord responses
/// - host event `sources` for the binary
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Host event sources (stdin, file).
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// How many activations per message produce side effects, and how many sounds play.
    #[serde(default)]
    pub notif_mode: NotifMode,

    /// Whether only the first match or every occurrence gets restyled.
    #[serde(default)]
    pub restyle_mode: RestyleMode,

    /// Strategy used to recognise echoes of messages the local user sent.
    #[serde(default)]
    pub sender_detection_mode: SenderDetectionMode,

    /// Whether notifications in `defer` own-message mode react to the user's own messages.
    #[serde(default)]
    pub check_own_messages: bool,

    /// Command prefixes (e.g. `/msg`) stripped from outgoing text before correlation.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Binding identifier -> key name, consulted when key-chord responses fire.
    #[serde(default)]
    pub key_bindings: KeyBindings,

    /// Ordered notification rules. Index 0 is the identity notification.
    #[serde(default)]
    pub notifications: NotificationList,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            notif_mode: NotifMode::default(),
            restyle_mode: RestyleMode::default(),
            sender_detection_mode: SenderDetectionMode::default(),
            check_own_messages: false,
            prefixes: default_prefixes(),
            key_bindings: KeyBindings::default(),
            notifications: NotificationList::default(),
        }
    }
}

fn default_prefixes() -> Vec<String> {
    ["/me", "/msg", "/tell", "/w", "/r", "/teammsg", "/tm", "/say"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_true() -> bool {
    true
}

/// Host event source configuration.
/// Use `type` to select a variant:
/// - "stdin": read newline-delimited JSON host events from standard input
/// - "file": tail a file of newline-delimited JSON host events
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Read host events from standard input.
    Stdin,

    /// Tail a file for appended host events.
    File {
        /// Absolute or relative path to the file.
        path: String,
        /// Poll interval in milliseconds (default: 100).
        #[serde(default)]
        poll_ms: Option<u64>,
        /// Replay lines already present when the source starts (default: false).
        #[serde(default)]
        from_start: Option<bool>,
    },
}

/// Which activations of a single message produce side effects.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotifMode {
    /// Every activation counts, but only one sound plays.
    #[default]
    AllSingleSound,
    /// Every activation counts and plays its own sound.
    All,
    /// Only the first activation counts.
    Single,
}

#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RestyleMode {
    /// Restyle every occurrence of every activated trigger.
    #[default]
    AllInstances,
    /// Restyle only the first activation's match.
    Single,
}

#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SenderDetectionMode {
    /// Sent-text correlation, or the transport's own sender hint.
    #[default]
    Combined,
    /// Sent-text correlation only.
    SentMatch,
}

/// Per-notification handling of the user's own messages.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckOwnMode {
    /// Follow the global `check_own_messages` option.
    #[default]
    Defer,
    On,
    Off,
}

#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Case-insensitive literal substring.
    #[default]
    Normal,
    /// Regular expression.
    Regex,
    /// Translation key prefix.
    Key,
}

#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StyleTargetKind {
    #[default]
    Normal,
    Regex,
    /// Comma-separated, 1-based capture group indices of the owning regex trigger.
    Capturing,
}

#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    #[default]
    Chat,
    Command,
    /// Two binding identifiers joined by `-`, pressed together.
    CommandKeys,
}

/// A rule fragment deciding whether a notification reacts to a message.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Trigger {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub kind: TriggerKind,
    #[serde(default)]
    pub style_target: StyleTarget,
    #[serde(skip)]
    pattern: PatternCache,
}

impl Trigger {
    pub fn new(text: impl Into<String>, kind: TriggerKind) -> Self {
        Self {
            enabled: true,
            text: text.into(),
            kind,
            style_target: StyleTarget::default(),
            pattern: PatternCache::default(),
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, TriggerKind::Normal)
    }

    pub fn regex(text: impl Into<String>) -> Self {
        Self::new(text, TriggerKind::Regex)
    }

    pub fn key(text: impl Into<String>) -> Self {
        Self::new(text, TriggerKind::Key)
    }

    #[must_use]
    pub fn with_style_target(mut self, style_target: StyleTarget) -> Self {
        self.style_target = style_target;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Compiled form of `text` for `Normal` and `Regex` triggers (cached).
    /// `Key` triggers and blank texts have no pattern.
    pub fn pattern(&self) -> Option<Regex> {
        if self.text.trim().is_empty() {
            return None;
        }
        let mode = match self.kind {
            TriggerKind::Normal => PatternMode::Literal,
            TriggerKind::Regex => PatternMode::Regex,
            TriggerKind::Key => return None,
        };
        self.pattern.get(&self.text, mode)
    }
}

/// Narrows the restyled region of a message once the owning trigger matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StyleTarget {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub kind: StyleTargetKind,
    #[serde(default)]
    pub text: String,
    #[serde(skip)]
    pattern: PatternCache,
}

impl StyleTarget {
    pub fn new(text: impl Into<String>, kind: StyleTargetKind) -> Self {
        Self {
            enabled: true,
            kind,
            text: text.into(),
            pattern: PatternCache::default(),
        }
    }

    /// An enabled target with a non-blank text actually narrows anything.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.text.trim().is_empty()
    }

    /// Compiled form of `text` for `Normal` and `Regex` targets (cached).
    pub fn pattern(&self) -> Option<Regex> {
        let mode = match self.kind {
            StyleTargetKind::Normal => PatternMode::Literal,
            StyleTargetKind::Regex => PatternMode::Regex,
            StyleTargetKind::Capturing => return None,
        };
        self.pattern.get(&self.text, mode)
    }
}

/// A delayed outgoing chat message, command or key chord.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResponseMessage {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub kind: ResponseKind,
    #[serde(default)]
    pub text: String,
    /// Delay in host ticks (20 per second nominal), relative to the activation.
    #[serde(default)]
    pub delay_ticks: u32,
}

impl ResponseMessage {
    pub fn new(kind: ResponseKind, text: impl Into<String>, delay_ticks: u32) -> Self {
        Self {
            enabled: true,
            kind,
            text: text.into(),
            delay_ticks,
        }
    }
}

/// Sound category, forwarded to the audio collaborator as-is.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoundSource {
    Master,
    Music,
    Record,
    Weather,
    Block,
    Hostile,
    Neutral,
    #[default]
    Player,
    Ambient,
    Voice,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate, PartialEq)]
pub struct Sound {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sound_id")]
    pub id: String,
    #[serde(default = "default_unit")]
    #[validate(minimum = 0.0)]
    #[validate(maximum = 1.0)]
    pub volume: f32,
    #[serde(default = "default_unit")]
    #[validate(minimum = 0.5)]
    #[validate(maximum = 2.0)]
    pub pitch: f32,
    #[serde(default)]
    pub source: SoundSource,
}

impl Default for Sound {
    fn default() -> Self {
        Self {
            enabled: true,
            id: default_sound_id(),
            volume: 1.0,
            pitch: 1.0,
            source: SoundSource::default(),
        }
    }
}

fn default_sound_id() -> String {
    "block.note_block.bell".to_string()
}

fn default_unit() -> f32 {
    1.0
}

/// Style applied to matched text. Unset attributes are left to the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TextStyle {
    /// `#RRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
}

impl TextStyle {
    pub fn color(hex: impl Into<String>) -> Self {
        Self {
            color: Some(hex.into()),
            ..Self::default()
        }
    }

    /// True when at least one attribute is set; inactive styles restyle nothing.
    pub fn is_active(&self) -> bool {
        self.color.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.underlined.is_some()
            || self.strikethrough.is_some()
            || self.obfuscated.is_some()
    }

    /// Parse `color` as `#RRGGBB`.
    pub fn rgb(&self) -> Option<u32> {
        let hex = self.color.as_deref()?.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok()
    }
}

/// Text shown instead of, or next to, the chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EphemeralMessage {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub text: String,
}

impl EphemeralMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            enabled: true,
            text: text.into(),
        }
    }
}

/// A complete notification rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub check_own_mode: CheckOwnMode,
    #[serde(default)]
    pub sound: Sound,
    #[serde(default)]
    pub text_style: TextStyle,

    #[serde(default)]
    pub triggers: Vec<Trigger>,

    #[serde(default)]
    pub inclusion_enabled: bool,
    /// All enabled inclusion triggers must match.
    #[serde(default)]
    pub inclusion_triggers: Vec<Trigger>,

    #[serde(default)]
    pub exclusion_enabled: bool,
    /// Any enabled exclusion trigger matching vetoes the notification.
    #[serde(default)]
    pub exclusion_triggers: Vec<Trigger>,

    #[serde(default)]
    pub response_enabled: bool,
    #[serde(default)]
    pub response_messages: Vec<ResponseMessage>,

    #[serde(default)]
    pub replacement: EphemeralMessage,
    #[serde(default)]
    pub status_bar: EphemeralMessage,
    #[serde(default)]
    pub title: EphemeralMessage,
    #[serde(default)]
    pub toast: EphemeralMessage,

    /// Set while the rule is open in an editor; such rules are skipped.
    #[serde(skip)]
    pub editing: bool,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            enabled: true,
            check_own_mode: CheckOwnMode::default(),
            sound: Sound::default(),
            text_style: TextStyle::color("#FFC400"),
            triggers: Vec::new(),
            inclusion_enabled: false,
            inclusion_triggers: Vec::new(),
            exclusion_enabled: false,
            exclusion_triggers: Vec::new(),
            response_enabled: false,
            response_messages: Vec::new(),
            replacement: EphemeralMessage::default(),
            status_bar: EphemeralMessage::default(),
            title: EphemeralMessage::default(),
            toast: EphemeralMessage::default(),
            editing: false,
        }
    }
}

impl Notification {
    /// A notification reacting to any of `triggers`.
    pub fn with_triggers(triggers: Vec<Trigger>) -> Self {
        Self {
            triggers,
            ..Self::default()
        }
    }

    /// The identity notification: profile name and display name triggers.
    pub fn identity(profile_name: &str, display_name: &str) -> Self {
        Self::with_triggers(vec![
            Trigger::normal(profile_name),
            Trigger::normal(display_name),
        ])
    }
}
