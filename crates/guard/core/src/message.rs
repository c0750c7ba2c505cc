//! Deny messages and the host collaborators that render and deliver them.

use crate::error::HookResult;
use crate::identity::ActorId;

/// A deny reason ready for the actor's message channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderedMessage {
    /// Unformatted text, used when no formatter is installed or it failed.
    Raw(String),
    /// Output of the host's chat-markup formatter. `text` is the plain
    /// rendering, `markup` the host-specific rich form.
    Styled { text: String, markup: String },
}

impl RenderedMessage {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    /// Plain text of the message regardless of styling.
    pub fn text(&self) -> &str {
        match self {
            Self::Raw(text) | Self::Styled { text, .. } => text,
        }
    }

    pub fn is_styled(&self) -> bool {
        matches!(self, Self::Styled { .. })
    }
}

/// Host chat-markup formatter, published through the `format_handle` slot.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, raw: &str) -> HookResult<RenderedMessage>;
}

/// Host player-messaging subsystem.
pub trait MessageSink: Send + Sync {
    fn deliver(&self, actor: ActorId, message: RenderedMessage) -> HookResult<()>;
}
