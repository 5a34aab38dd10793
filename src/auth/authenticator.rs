//! ES256 bearer token issuer with a serialized, cache-first refresh path.
//!
//! [`TokenAuthenticator`] owns one [`Credentials`] set and at most one cached [`Token`]. Every
//! read of the cache and every mint happens under the same mutex, so concurrent callers that
//! observe a stale token queue behind a single signing operation and reuse its result instead
//! of stampeding the signer. [`TokenAuthenticator::clear_cache`] takes the same lock, which
//! keeps invalidation ordered with respect to minting.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Token, TokenSecret},
	error::CredentialError,
	obs,
};

/// Audience claim expected by the API for every bearer token.
pub const AUDIENCE: &str = "appstoreconnect-v1";

#[derive(Debug, Serialize)]
struct Claims<'a> {
	iss: &'a str,
	iat: i64,
	exp: i64,
	aud: &'static str,
}

/// Signing activity of one authenticator. Cache hits are not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SigningStats {
	/// Signing operations started.
	pub attempts: u64,
	/// Tokens minted and cached.
	pub successes: u64,
	/// Signing operations that failed with a credential error.
	pub failures: u64,
}

#[derive(Debug, Default)]
struct CacheState {
	token: Option<Token>,
	stats: SigningStats,
}

/// Signs, caches, and invalidates bearer tokens for one credential set.
///
/// Share a single instance behind an `Arc` between every client that uses the same
/// credentials.
pub struct TokenAuthenticator {
	credentials: Credentials,
	state: Mutex<CacheState>,
}
impl TokenAuthenticator {
	/// Creates an authenticator with an empty cache.
	pub fn new(credentials: Credentials) -> Self {
		Self { credentials, state: Mutex::new(CacheState::default()) }
	}

	/// Credentials used for signing.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Snapshot of the signing counters.
	pub fn signing_stats(&self) -> SigningStats {
		self.state.lock().stats
	}

	/// Returns a usable bearer token, minting a new one when the cache is empty or stale.
	pub fn token(&self) -> Result<TokenSecret> {
		self.token_at(OffsetDateTime::now_utc())
	}

	/// Same as [`token`](Self::token), evaluating freshness against `now`.
	///
	/// A freshly minted token carries `now` as its issue time.
	pub fn token_at(&self, now: OffsetDateTime) -> Result<TokenSecret> {
		let mut state = self.state.lock();

		if let Some(current) = state.token.as_ref().filter(|token| token.is_usable_at(now)) {
			return Ok(current.value.clone());
		}

		state.stats.attempts += 1;

		match self.sign(now) {
			Ok(token) => {
				let value = token.value.clone();

				obs::token_minted(&value.fingerprint(), token.expires_at);
				state.stats.successes += 1;
				state.token = Some(token);

				Ok(value)
			},
			Err(err) => {
				obs::token_mint_failed(&err);
				state.stats.failures += 1;

				Err(err.into())
			},
		}
	}

	/// Discards the cached token so the next call mints unconditionally.
	pub fn clear_cache(&self) {
		self.state.lock().token.take();
	}

	/// Returns a copy of the cached token, if any.
	pub fn cached_token(&self) -> Option<Token> {
		self.state.lock().token.clone()
	}

	fn sign(&self, issued_at: OffsetDateTime) -> Result<Token, CredentialError> {
		let key = EncodingKey::from_ec_pem(self.credentials.expose_private_key().as_bytes())
			.map_err(|source| CredentialError::InvalidPrivateKey { source })?;
		let mut header = Header::new(Algorithm::ES256);

		header.kid = Some(self.credentials.key_id().to_owned());

		let expires_at = issued_at + Token::LIFETIME;
		let claims = Claims {
			iss: self.credentials.issuer_id(),
			iat: issued_at.unix_timestamp(),
			exp: expires_at.unix_timestamp(),
			aud: AUDIENCE,
		};
		let value = jsonwebtoken::encode(&header, &claims, &key)
			.map_err(|source| CredentialError::Signing { source })?;

		Ok(Token::new(value, issued_at))
	}
}
impl Debug for TokenAuthenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("TokenAuthenticator")
			.field("credentials", &self.credentials)
			.field("cached", &state.token.is_some())
			.field("stats", &state.stats)
			.finish()
	}
}
