//! Vendor error envelope and HTTP status classification.
//!
//! Failed responses carry `{"errors": [{status, code, title, detail}, ...]}`. The entries are
//! unranked, so the first one provides the normalized message by convention; every entry is
//! still preserved on [`Error::RemoteApi`].

// self
use crate::{_prelude::*, http::ApiResponse};

const BODY_PREVIEW_LEN: usize = 200;

/// One record of the vendor error envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorEntry {
	/// HTTP status echoed as a string.
	pub status: String,
	/// Machine-readable error code.
	pub code: String,
	/// Short summary.
	pub title: String,
	/// Human-readable explanation.
	pub detail: String,
}
impl ErrorEntry {
	/// Renders `title: detail`, omitting whichever side is empty.
	pub fn message(&self) -> Option<String> {
		let title = self.title.trim();
		let detail = self.detail.trim();

		match (title.is_empty(), detail.is_empty()) {
			(false, false) => Some(format!("{title}: {detail}")),
			(false, true) => Some(title.to_owned()),
			(true, false) => Some(detail.to_owned()),
			(true, true) => None,
		}
	}
}

/// Structured failure payload returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
	/// Error records in upstream order.
	#[serde(default)]
	pub errors: Vec<ErrorEntry>,
}
impl ErrorEnvelope {
	/// Parses a body, returning `None` unless it carries at least one entry.
	pub fn parse(body: &[u8]) -> Option<Self> {
		serde_json::from_slice::<Self>(body).ok().filter(|envelope| !envelope.errors.is_empty())
	}

	/// Normalized message taken from the first entry.
	pub fn message(&self) -> Option<String> {
		self.errors.first().and_then(ErrorEntry::message)
	}
}

/// Maps a response onto the error taxonomy; 2xx responses pass through.
pub fn classify(response: &ApiResponse) -> Result<()> {
	if response.is_success() {
		return Ok(());
	}

	let envelope = ErrorEnvelope::parse(&response.body);
	let message = envelope
		.as_ref()
		.and_then(ErrorEnvelope::message)
		.unwrap_or_else(|| fallback_message(response));

	Err(match response.status {
		401 => Error::AuthRejected { message },
		429 => Error::RateLimited { message, retry_after: response.retry_after },
		status => Error::RemoteApi {
			status,
			message,
			errors: envelope.map(|envelope| envelope.errors).unwrap_or_default(),
		},
	})
}

fn fallback_message(response: &ApiResponse) -> String {
	let text = String::from_utf8_lossy(&response.body);
	let preview = text.trim();

	if preview.is_empty() {
		return format!("HTTP {}", response.status);
	}

	let mut preview = preview.chars().take(BODY_PREVIEW_LEN).collect::<String>();

	if text.trim().chars().count() > BODY_PREVIEW_LEN {
		preview.push('…');
	}

	format!("HTTP {}: {preview}", response.status)
}
