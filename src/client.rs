//! Paced, authenticated API client.
//!
//! Every call runs the same explicit pipeline: resolve the URL, attach a bearer token from the
//! shared [`TokenAuthenticator`], wait at the [`PacingGate`], dispatch through the
//! [`ApiHttpClient`], record stats, then classify the response. A 401 clears the token cache
//! so the next call mints a fresh token; the failing call itself is never retried.

pub mod query;
pub mod stats;

mod verbs;

pub use query::QueryParams;
pub use stats::ClientStats;

// self
use crate::{
	_prelude::*,
	auth::{TokenAuthenticator, TokenSecret},
	config::ClientConfig,
	envelope,
	error::ConfigError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, Method},
	obs::{self, RequestOutcome},
	pacing::PacingGate,
};
#[cfg(feature = "reqwest")] use crate::{auth::Credentials, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Shared handle that signs, paces, dispatches, and classifies API requests.
///
/// Clones share the transport, the authenticator, the pacing gate, and the stats. Clients built
/// with [`with_http_client`](Self::with_http_client) or `new` also share the process-wide gate
/// for their interval, so the pacing floor holds across every client in the process.
pub struct ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	config: ClientConfig,
	http_client: Arc<C>,
	authenticator: Arc<TokenAuthenticator>,
	gate: Arc<PacingGate>,
	stats: Arc<Mutex<ClientStats>>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport and authenticator and paces
	/// through the process-wide gate for `config.min_interval`.
	pub fn with_http_client(
		config: ClientConfig,
		authenticator: Arc<TokenAuthenticator>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		let gate = PacingGate::shared(config.min_interval);

		Self::with_gate(config, authenticator, gate, http_client)
	}

	/// Creates a client that paces through an explicit gate.
	///
	/// The gate's own interval applies; `config.min_interval` is ignored.
	pub fn with_gate(
		config: ClientConfig,
		authenticator: Arc<TokenAuthenticator>,
		gate: Arc<PacingGate>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			authenticator,
			gate,
			stats: Default::default(),
		}
	}

	/// Configuration the client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Shared authenticator handle.
	pub fn authenticator(&self) -> &Arc<TokenAuthenticator> {
		&self.authenticator
	}

	/// Gate this client paces through.
	pub fn pacing_gate(&self) -> &Arc<PacingGate> {
		&self.gate
	}

	/// Diagnostic snapshot of completed requests.
	pub fn stats(&self) -> ClientStats {
		*self.stats.lock()
	}

	/// Issues a request and decodes the successful body into `T`.
	///
	/// An empty success body decodes as JSON `null`, so `()` and `serde_json::Value` both work
	/// for `204 No Content` answers.
	pub async fn request<T>(
		&self,
		method: Method,
		path: &str,
		query: Option<&QueryParams>,
		body: Option<&serde_json::Value>,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let body = body.map(encode_body).transpose()?;

		self.execute(method, path, query, body).await
	}

	pub(crate) async fn execute<T>(
		&self,
		method: Method,
		path: &str,
		query: Option<&QueryParams>,
		body: Option<Vec<u8>>,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let started = Instant::now();
		let result = obs::in_request_span(method, path, async move {
			let url = self.resolve_url(path, query)?;
			let request = self.attach_auth(method, url, body)?;
			let bearer = request.bearer.clone();

			self.apply_pacing().await;

			let response = self.dispatch(request).await?;

			self.classify(&response, &bearer)?;

			decode(&response)
		})
		.await;

		obs::request_finished(method, RequestOutcome::of(&result), started.elapsed());

		result
	}

	fn resolve_url(&self, path: &str, query: Option<&QueryParams>) -> Result<Url> {
		let mut url = self.config.resolve(path)?;

		if let Some(query) = query {
			query.apply_to(&mut url);
		}

		Ok(url)
	}

	fn attach_auth(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<ApiRequest> {
		let bearer = self.authenticator.token()?;

		Ok(ApiRequest { method, url, bearer, body, timeout: self.config.request_timeout })
	}

	async fn apply_pacing(&self) {
		self.gate.wait().await;
	}

	async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
		let outcome = self.http_client.execute(request).await;

		self.stats.lock().record(OffsetDateTime::now_utc());

		outcome.map_err(Error::from)
	}

	fn classify(&self, response: &ApiResponse, bearer: &TokenSecret) -> Result<()> {
		let result = envelope::classify(response);

		match &result {
			Err(Error::AuthRejected { .. }) => {
				let superseded = self
					.authenticator
					.cached_token()
					.is_some_and(|cached| &cached.value != bearer);

				obs::token_rejected(&bearer.fingerprint(), superseded);
				self.authenticator.clear_cache();
			},
			Err(Error::RateLimited { retry_after, .. }) => obs::request_throttled(*retry_after),
			_ => (),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client with its own authenticator and reqwest transport.
	pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self::with_http_client(
			config,
			Arc::new(TokenAuthenticator::new(credentials)),
			http_client,
		))
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: Arc::clone(&self.http_client),
			authenticator: Arc::clone(&self.authenticator),
			gate: Arc::clone(&self.gate),
			stats: Arc::clone(&self.stats),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("authenticator", &self.authenticator)
			.field("stats", &self.stats())
			.finish()
	}
}

pub(crate) fn encode_body<B>(body: &B) -> Result<Vec<u8>>
where
	B: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(|err| ConfigError::BodySerialize(err).into())
}

fn decode<T>(response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let body: &[u8] =
		if response.body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &response.body };
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { source, status: response.status })
}
