//! Verdict codes and the decisions gates hand back to call sites.
//!
//! Verdicts cross the boundary to policy modules as small integers so that a
//! policy compiled against a newer protocol revision keeps working: any code
//! this revision does not know reads as [`Verdict::Allow`].

/// Outcome of a verdict hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Action proceeds unchanged.
    Allow,
    /// Action blocked, the actor is sent the formatted deny reason.
    DenyWithMessage,
    /// Action blocked without notification.
    DenySilent,
    /// Action blocked, the policy module handles any notification itself.
    DenyModHandles,
}

impl Verdict {
    pub const ALLOW: i32 = 0;
    pub const DENY_WITH_MESSAGE: i32 = 1;
    pub const DENY_SILENT: i32 = 2;
    pub const DENY_MOD_HANDLES: i32 = 3;

    /// Interprets a raw code. Negative and unknown codes fail open.
    pub const fn from_code(code: i32) -> Self {
        match code {
            Self::DENY_WITH_MESSAGE => Verdict::DenyWithMessage,
            Self::DENY_SILENT => Verdict::DenySilent,
            Self::DENY_MOD_HANDLES => Verdict::DenyModHandles,
            _ => Verdict::Allow,
        }
    }

    /// Wire code of this verdict.
    pub const fn code(self) -> i32 {
        match self {
            Verdict::Allow => Self::ALLOW,
            Verdict::DenyWithMessage => Self::DENY_WITH_MESSAGE,
            Verdict::DenySilent => Self::DENY_SILENT,
            Verdict::DenyModHandles => Self::DENY_MOD_HANDLES,
        }
    }

    pub const fn is_deny(self) -> bool {
        !matches!(self, Verdict::Allow)
    }

    /// Decision a gate reports for this verdict.
    pub const fn decision(self) -> Decision {
        match self {
            Verdict::Allow => Decision::Allowed,
            Verdict::DenyWithMessage => Decision::Denied(DenyMode::Notified),
            Verdict::DenySilent => Decision::Denied(DenyMode::Silent),
            Verdict::DenyModHandles => Decision::Denied(DenyMode::Delegated),
        }
    }
}

impl From<i32> for Verdict {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

/// How a denied action was (or was not) reported to the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DenyMode {
    /// The policy asked for a messaged denial. Whether a message actually
    /// went out depends on the hook's reason function, the actor and the
    /// notifier's dedup window.
    Notified,
    /// Nothing was sent.
    Silent,
    /// The policy module owns notification.
    Delegated,
}

/// Terminal state of one gate invocation.
///
/// `Allowed` means the call site runs the underlying engine action;
/// `Denied` means it suppresses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub enum Decision {
    Allowed,
    Denied(DenyMode),
}

impl Decision {
    #[inline]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Decision::Allowed)
    }

    #[inline]
    pub const fn is_denied(self) -> bool {
        !self.is_allowed()
    }
}
