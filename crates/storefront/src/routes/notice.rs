//! Transient page notices.
//!
//! A notice is a one-line message shown above a form. Pages render it with
//! `data-dismiss-ms` so `notice.js` can hide it; CSS hides it after the same
//! delay when scripts are off.

use herbal_glow_core::Tone;

use crate::services::auth::message_for_code;

/// How long a notice stays visible.
pub const NOTICE_DISMISS_MS: u32 = 5000;

/// Delay before a success page navigates home.
pub const REDIRECT_DELAY_MS: u32 = 2000;

/// Error code used when the session could not be written.
pub const SESSION_ERROR_CODE: &str = "session";

const SESSION_ERROR_MESSAGE: &str = "We couldn't start your session. Please try again.";

/// CSS modifier for a tone.
#[must_use]
pub const fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Alert => "alert",
        Tone::Success => "success",
    }
}

/// A message shown to the user once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Alert,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            message: message.into(),
        }
    }

    /// Notice for an `?error=` code. Unknown codes show nothing.
    #[must_use]
    pub fn from_error_code(code: Option<&str>) -> Option<Self> {
        let code = code?;
        if code == SESSION_ERROR_CODE {
            return Some(Self::error(SESSION_ERROR_MESSAGE));
        }
        message_for_code(code).map(Self::error)
    }

    /// CSS modifier class.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        tone_class(self.tone)
    }

    /// Dismiss delay for templates.
    #[must_use]
    pub const fn dismiss_ms(&self) -> u32 {
        NOTICE_DISMISS_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_code() {
        let notice = Notice::from_error_code(Some("password_mismatch"));
        assert_eq!(notice, Some(Notice::error("Passwords do not match!")));
        assert_eq!(
            Notice::from_error_code(Some("session")).map(|n| n.tone),
            Some(Tone::Alert)
        );
        assert_eq!(Notice::from_error_code(Some("<b>injected</b>")), None);
        assert_eq!(Notice::from_error_code(None), None);
    }

    #[test]
    fn test_classes() {
        assert_eq!(Notice::error("x").class(), "alert");
        assert_eq!(Notice::success("x").class(), "success");
    }
}
