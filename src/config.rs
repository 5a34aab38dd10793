//! Client configuration and its validating builder.

// self
use crate::{_prelude::*, error::ConfigError};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";
/// Minimum spacing between the start times of two outgoing requests.
pub const DEFAULT_MIN_INTERVAL: StdDuration = StdDuration::from_millis(100);

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// Base URL could not be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL must use HTTPS.
	#[error("The base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Base URL cannot have resource paths joined onto it (e.g., `mailto:`).
	#[error("The base URL cannot carry resource paths: {url}.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Base URL carries a query or fragment that would be lost when joining paths.
	#[error("The base URL must not carry a query or fragment: {url}.")]
	UnexpectedQuery {
		/// Offending URL.
		url: String,
	},
}

/// Immutable client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API root; always ends with `/` so relative paths join beneath it.
	pub base_url: Url,
	/// Minimum spacing between request departures.
	pub min_interval: StdDuration,
	/// Optional per-request timeout applied by the transport.
	pub request_timeout: Option<StdDuration>,
	/// `User-Agent` header sent by the default transport.
	pub user_agent: String,
}
impl ClientConfig {
	/// Creates a builder seeded with production defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::new()
	}

	/// Resolves a resource path (or an absolute URL on the same origin) against the base URL.
	pub fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
		if path.starts_with("https://") || path.starts_with("http://") {
			let url = Url::parse(path)
				.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })?;

			return if url.origin() == self.base_url.origin() {
				Ok(url)
			} else {
				Err(ConfigError::ForeignUrl { url: url.to_string() })
			};
		}

		self.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// API root; defaults to [`DEFAULT_BASE_URL`].
	pub base_url: Option<Url>,
	/// Minimum spacing between request departures.
	pub min_interval: StdDuration,
	/// Optional per-request timeout.
	pub request_timeout: Option<StdDuration>,
	/// `User-Agent` header value.
	pub user_agent: String,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with production defaults.
	pub fn new() -> Self {
		Self {
			base_url: None,
			min_interval: DEFAULT_MIN_INTERVAL,
			request_timeout: None,
			user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
		}
	}

	/// Overrides the API root.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the spacing between request departures.
	pub fn min_interval(mut self, interval: StdDuration) -> Self {
		self.min_interval = interval;

		self
	}

	/// Applies a per-request timeout in the transport.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Overrides the `User-Agent` header.
	pub fn user_agent(mut self, value: impl Into<String>) -> Self {
		self.user_agent = value.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL).map_err(|source| {
				ClientConfigError::InvalidBaseUrl { url: DEFAULT_BASE_URL.into(), source }
			})?,
		};
		let base_url = normalize_base_url(base_url)?;

		Ok(ClientConfig {
			base_url,
			min_interval: self.min_interval,
			request_timeout: self.request_timeout,
			user_agent: self.user_agent,
		})
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn normalize_base_url(mut url: Url) -> Result<Url, ClientConfigError> {
	if url.scheme() != "https" {
		return Err(ClientConfigError::InsecureBaseUrl { url: url.to_string() });
	}
	if url.cannot_be_a_base() {
		return Err(ClientConfigError::CannotBeABase { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ClientConfigError::UnexpectedQuery { url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}
