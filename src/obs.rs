//! Structured logging and counters for token minting and API requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every request inside an `appstore_connect_bridge.request` span
//!   (fields `method`, `path`) and to emit events when tokens are minted, rejected, or fail to
//!   sign, when the API throttles, and when a request finishes.
//! - Enable `metrics` to record `appstore_connect_bridge_requests_total` (labels `method`,
//!   `outcome`), the `appstore_connect_bridge_request_duration_seconds` histogram (label
//!   `outcome`), and `appstore_connect_bridge_token_mints_total` (label `outcome`).
//!
//! Without either feature every hook compiles to nothing.

// self
use crate::{_prelude::*, error::CredentialError, http::Method};

/// Outcome class of one API request, as reported in logs and metric labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// 2xx answer decoded into the requested type.
	Success,
	/// 401 answer; the token cache was cleared.
	AuthRejected,
	/// 429 answer.
	RateLimited,
	/// Any other non-2xx answer.
	Remote,
	/// No HTTP answer at all.
	Transport,
	/// 2xx answer whose body did not match the requested type.
	Decode,
	/// Failed before dispatch (credentials, URL, or body serialization).
	Local,
}
impl RequestOutcome {
	/// Classifies the result of a finished request.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => Self::Success,
			Err(Error::AuthRejected { .. }) => Self::AuthRejected,
			Err(Error::RateLimited { .. }) => Self::RateLimited,
			Err(Error::RemoteApi { .. }) => Self::Remote,
			Err(Error::Transport(_)) => Self::Transport,
			Err(Error::Decode { .. }) => Self::Decode,
			Err(Error::Credential(_) | Error::Config(_)) => Self::Local,
		}
	}

	/// Stable label value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::AuthRejected => "auth_rejected",
			Self::RateLimited => "rate_limited",
			Self::Remote => "remote",
			Self::Transport => "transport",
			Self::Decode => "decode",
			Self::Local => "local",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

pub(crate) async fn in_request_span<F>(method: Method, path: &str, fut: F) -> F::Output
where
	F: Future,
{
	#[cfg(feature = "tracing")]
	{
		use tracing::Instrument;

		fut.instrument(tracing::info_span!(
			"appstore_connect_bridge.request",
			method = method.as_str(),
			path
		))
		.await
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, path);

		fut.await
	}
}

pub(crate) fn request_finished(method: Method, outcome: RequestOutcome, elapsed: StdDuration) {
	#[cfg(feature = "tracing")]
	tracing::debug!(method = method.as_str(), %outcome, ?elapsed, "request finished");
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"appstore_connect_bridge_requests_total",
			"method" => method.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
		metrics::histogram!(
			"appstore_connect_bridge_request_duration_seconds",
			"outcome" => outcome.as_str()
		)
		.record(elapsed.as_secs_f64());
	}
	#[cfg(not(any(feature = "tracing", feature = "metrics")))]
	let _ = (method, outcome, elapsed);
}

pub(crate) fn token_minted(fingerprint: &str, expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(fingerprint, %expires_at, "minted bearer token");
	#[cfg(not(feature = "tracing"))]
	let _ = (fingerprint, expires_at);

	count_mint("minted");
}

pub(crate) fn token_mint_failed(err: &CredentialError) {
	#[cfg(feature = "tracing")]
	tracing::error!(error = %err, "bearer token signing failed");

	count_mint(match err {
		CredentialError::MissingField { .. } | CredentialError::InvalidPrivateKey { .. } =>
			"invalid_key",
		CredentialError::Signing { .. } => "signing_failed",
	});
}

pub(crate) fn token_rejected(fingerprint: &str, superseded: bool) {
	#[cfg(feature = "tracing")]
	tracing::warn!(fingerprint, superseded, "bearer token rejected by the API; cache cleared");
	#[cfg(not(feature = "tracing"))]
	let _ = (fingerprint, superseded);
}

pub(crate) fn request_throttled(retry_after: Option<Duration>) {
	#[cfg(feature = "tracing")]
	tracing::warn!(retry_after = ?retry_after, "request throttled by the API");
	#[cfg(not(feature = "tracing"))]
	let _ = retry_after;
}

fn count_mint(outcome: &'static str) {
	#[cfg(feature = "metrics")]
	metrics::counter!("appstore_connect_bridge_token_mints_total", "outcome" => outcome)
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = outcome;
}
