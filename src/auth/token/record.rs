//! Cached bearer token with its lifetime and usability rules.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Lifecycle status of a [`Token`] at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// Token may be presented.
	Active,
	/// Token is still valid but inside the refresh buffer; it must not be presented.
	Stale,
	/// Token exceeded its expiry instant.
	Expired,
}

/// Signed bearer token owned by the authenticator.
#[derive(Clone)]
pub struct Token {
	/// Signed compact token; callers must avoid logging it.
	pub value: TokenSecret,
	/// Instant embedded as the `iat` claim.
	pub issued_at: OffsetDateTime,
	/// Instant embedded as the `exp` claim, always `issued_at + LIFETIME`.
	pub expires_at: OffsetDateTime,
}
impl Token {
	/// Maximum lifetime accepted by the API.
	pub const LIFETIME: Duration = Duration::seconds(1200);
	/// Tokens are retired this long before they expire so none expires mid-flight.
	pub const REFRESH_BUFFER: Duration = Duration::seconds(60);

	/// Creates a token issued at `issued_at` with the full lifetime.
	pub fn new(value: impl Into<String>, issued_at: OffsetDateTime) -> Self {
		Self { value: TokenSecret::new(value), issued_at, expires_at: issued_at + Self::LIFETIME }
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant >= self.expires_at {
			return TokenStatus::Expired;
		}
		if instant >= self.expires_at - Self::REFRESH_BUFFER {
			return TokenStatus::Stale;
		}

		TokenStatus::Active
	}

	/// Returns `true` if the token may be presented at the provided instant.
	pub fn is_usable_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Active)
	}

	/// Returns `true` if the token may be presented now.
	pub fn is_usable(&self) -> bool {
		self.is_usable_at(OffsetDateTime::now_utc())
	}

	/// Age of the token at the provided instant.
	pub fn age_at(&self, instant: OffsetDateTime) -> Duration {
		instant - self.issued_at
	}

	/// `iat` claim as epoch seconds.
	pub fn issued_at_unix(&self) -> i64 {
		self.issued_at.unix_timestamp()
	}

	/// `exp` claim as epoch seconds.
	pub fn expires_at_unix(&self) -> i64 {
		self.expires_at.unix_timestamp()
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("value", &"<redacted>")
			.field("fingerprint", &self.value.fingerprint())
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
