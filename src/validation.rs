//! Request payload validation
//!
//! Both entry points take the raw JSON body and either return a normalized
//! value or the first problem found. Field order is fixed and part of the
//! API contract: clients see exactly one error, always the same one for the
//! same payload.

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::model::{BookmarkPatch, NewBookmark};

/// Fields every new bookmark must carry, in reporting order
const REQUIRED_FIELDS: [&str; 3] = ["title", "url", "rating"];

const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is required")]
    MissingField(&'static str),

    #[error("'rating' must be a number between 0 and 5")]
    InvalidRating,

    #[error("'url' must be a valid URL")]
    InvalidUrl,

    #[error("Request body must contain either 'title', 'url', or 'rating'")]
    EmptyPatch,
}

impl ValidationError {
    /// Name of the offending field, for logging
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(field) => Some(*field),
            Self::InvalidRating => Some("rating"),
            Self::InvalidUrl => Some("url"),
            Self::EmptyPatch => None,
        }
    }
}

/// Validates a `POST /bookmarks` body
///
/// Checks, in order: presence of title, url and rating; rating range; url
/// syntax. Unknown keys are dropped.
pub fn validate_create(payload: &Value) -> Result<NewBookmark, ValidationError> {
    let empty = Map::new();
    let body = payload.as_object().unwrap_or(&empty);

    for field in REQUIRED_FIELDS {
        if present(body, field).is_none() {
            return Err(ValidationError::MissingField(field));
        }
    }

    // Presence was checked above, so these are all Some
    let title = text(body, "title").ok_or(ValidationError::MissingField("title"))?;
    let url = text(body, "url").ok_or(ValidationError::MissingField("url"))?;
    let rating = body
        .get("rating")
        .ok_or(ValidationError::MissingField("rating"))
        .and_then(parse_rating)?;
    let url = parse_url(url)?;

    Ok(NewBookmark {
        title: title.to_owned(),
        url,
        description: description(body).flatten(),
        rating,
    })
}

/// Validates a `PATCH /bookmarks/{id}` body
///
/// At least one of title, url or rating has to be present. A body holding
/// only `description` or unknown keys is rejected.
pub fn validate_patch(payload: &Value) -> Result<BookmarkPatch, ValidationError> {
    let empty = Map::new();
    let body = payload.as_object().unwrap_or(&empty);

    if REQUIRED_FIELDS
        .iter()
        .all(|field| present(body, field).is_none())
    {
        return Err(ValidationError::EmptyPatch);
    }

    let rating = present(body, "rating").map(parse_rating).transpose()?;
    let url = text(body, "url").map(parse_url).transpose()?;

    Ok(BookmarkPatch {
        title: text(body, "title").map(str::to_owned),
        url,
        description: description(body),
        rating,
    })
}

/// Returns the value under `key` unless it is absent, null or blank
///
/// `title` and `url` must additionally be strings.
fn present<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match body.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(_) => body.get(key),
        _ if key == "rating" => body.get(key),
        _ => None,
    }
}

fn text<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    present(body, key).and_then(Value::as_str)
}

/// `Some(Some(s))` sets, `Some(None)` clears, `None` leaves untouched
fn description(body: &Map<String, Value>) -> Option<Option<String>> {
    match body.get("description")? {
        Value::String(s) => Some(Some(s.clone())),
        Value::Null => Some(None),
        _ => None,
    }
}

/// Accepts integral numbers in `0..=5`, given either as JSON numbers or as
/// numeric strings such as `"5"` or `"5.0"`
fn parse_rating(value: &Value) -> Result<u8, ValidationError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(ValidationError::InvalidRating)?;

    if !number.is_finite() || number.fract() != 0.0 || !(0.0..=MAX_RATING).contains(&number) {
        return Err(ValidationError::InvalidRating);
    }

    Ok(number as u8)
}

/// Requires an absolute `http` or `https` URL with a host
///
/// The parser alone is too forgiving: it fixes up `http:/host`, trims
/// whitespace and percent-encodes characters a URI may not contain. So the
/// scheme separator and the RFC 3986 character set are checked first.
/// The original string is returned rather than the parsed form so that what
/// the client sent is what it reads back.
fn parse_url(raw: &str) -> Result<String, ValidationError> {
    let lower = raw.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) || !is_uri_text(raw) {
        return Err(ValidationError::InvalidUrl);
    }

    let parsed = Url::parse(raw).map_err(|_| ValidationError::InvalidUrl)?;
    let web_scheme = matches!(parsed.scheme(), "http" | "https");
    let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());

    if web_scheme && has_host {
        Ok(raw.to_owned())
    } else {
        Err(ValidationError::InvalidUrl)
    }
}

/// True if `raw` uses only URI characters and every `%` starts a valid escape
fn is_uri_text(raw: &str) -> bool {
    const ALLOWED_PUNCTUATION: &str = "-._~:/?#[]@!$&'()*+,;=";

    let bytes = raw.as_bytes();
    bytes.iter().enumerate().all(|(idx, &b)| match b {
        b'%' => bytes
            .get(idx + 1..idx + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)),
        _ => b.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.as_bytes().contains(&b),
    })
}
