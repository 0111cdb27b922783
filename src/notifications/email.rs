use serde::{Deserialize, Serialize};

/// Describes the email.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    /// Email body in plain text (used as a fallback if `html` is specified).
    pub text: String,
    pub html: Option<String>,
}

impl Email {
    /// Creates a new plain-text email.
    #[cfg(test)]
    pub fn text(subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }

    /// Creates a new HTML email with a plain-text fallback.
    pub fn html(
        subject: impl Into<String>,
        text: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            text: text.into(),
            html: Some(html.into()),
        }
    }
}
