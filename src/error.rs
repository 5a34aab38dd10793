//! Error taxonomy shared by the authenticator, the transport, and the API client.

// self
use crate::{_prelude::*, config::ClientConfigError, envelope::ErrorEntry};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every failure mode of a request surfaces as its own variant so the calling layer can decide
/// whether to retry, report, or abort without string matching.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credentials are incomplete, the private key is unusable, or signing failed.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// Network-level failure without an HTTP response.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The API rejected the bearer token (HTTP 401).
	#[error("API rejected the bearer token: {message}.")]
	AuthRejected {
		/// Message derived from the error envelope or the HTTP status.
		message: String,
	},
	/// The API throttled the request (HTTP 429).
	#[error("API rate limit exceeded: {message}.")]
	RateLimited {
		/// Message derived from the error envelope or the HTTP status.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// The API answered with any other non-success status.
	#[error("API returned HTTP {status}: {message}.")]
	RemoteApi {
		/// HTTP status code.
		status: u16,
		/// First envelope entry's `title`/`detail`, or a body preview when no envelope exists.
		message: String,
		/// Every entry of the error envelope, in upstream order.
		errors: Vec<ErrorEntry>,
	},
	/// A successful response body did not match the requested type.
	#[error("API response body (HTTP {status}) could not be decoded.")]
	Decode {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl Error {
	/// Returns `true` for failures that may succeed when retried later.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::RateLimited { .. } | Self::Transport(_) => true,
			Self::RemoteApi { status, .. } => *status >= 500,
			_ => false,
		}
	}

	/// Returns the upstream Retry-After hint, if any.
	pub fn retry_after(&self) -> Option<Duration> {
		match self {
			Self::RateLimited { retry_after, .. } => *retry_after,
			_ => None,
		}
	}
}

/// Failures raised while validating credentials or minting tokens.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// A credential field was empty or whitespace.
	#[error("Credential field `{field}` cannot be empty.")]
	MissingField {
		/// Name of the offending field.
		field: &'static str,
	},
	/// The private key is not a PEM-encoded EC key.
	#[error("Private key is not a valid PEM-encoded EC key.")]
	InvalidPrivateKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The key parsed but could not produce an ES256 signature (e.g., wrong curve).
	#[error("Token signing failed.")]
	Signing {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Client configuration failed validation.
	#[error(transparent)]
	Client(#[from] ClientConfigError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Resource path could not be joined onto the base URL.
	#[error("Resource path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Absolute URL points outside the configured API origin.
	#[error("URL `{url}` does not belong to the configured API origin.")]
	ForeignUrl {
		/// Offending URL.
		url: String,
	},
	/// Request body could not be serialized as JSON.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

impl From<ClientConfigError> for Error {
	fn from(e: ClientConfigError) -> Self {
		Self::Config(e.into())
	}
}

/// Transport-level failures (network, timeout, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The transport gave up waiting for a response.
	#[error("Request timed out while calling the API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
