use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Configuration for the SMTP functionality.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SmtpConfig {
    /// Username to use to authenticate to the SMTP server, also used as a sender address.
    pub username: String,
    /// Password to use to authenticate to the SMTP server.
    pub password: String,
    /// Address of the SMTP server.
    pub address: String,
    /// Optional configuration for catch-all email recipient (used for troubleshooting only).
    pub catch_all: Option<SmtpCatchAllConfig>,
}

/// Configuration for the SMTP catch-all functionality.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SmtpCatchAllConfig {
    /// Address of the catch-all email recipient.
    pub recipient: String,
    /// Email is re-routed to the catch-all recipient only if its text matches this expression.
    #[serde_as(as = "DisplayFromStr")]
    pub text_matcher: Regex,
}
