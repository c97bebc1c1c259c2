use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;

/// Stored text that does not match any known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

impl UnknownValue {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Names and titles shown in listings
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 200),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct DisplayText(String);

/// Free text a submitter attaches to a publish request
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 2000),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct Note(String);

/// Moderator explanation attached to a rejection
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 2000),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize, Deserialize)
)]
pub struct DecisionReason(String);

static WEB_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap());

/// Absolute http(s) link: ticket shops, websites, legacy image urls
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 2048, regex = WEB_URL_REGEX),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct WebUrl(String);
