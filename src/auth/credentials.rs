//! API key credentials supplied once by the surrounding process.

// self
use crate::{_prelude::*, error::CredentialError};

/// Key identifier, issuer identifier, and PEM private key used to sign bearer tokens.
///
/// Values are validated once at construction and never change afterwards. The private key is
/// kept out of `Debug` output.
#[derive(Clone)]
pub struct Credentials {
	key_id: String,
	issuer_id: String,
	private_key: String,
}
impl Credentials {
	/// Validates and stores the three credential strings.
	///
	/// Keys copied from environment files often carry literal `\n` escapes instead of line
	/// breaks; such keys are unescaped so the PEM armor parses.
	pub fn new(
		key_id: impl Into<String>,
		issuer_id: impl Into<String>,
		private_key: impl Into<String>,
	) -> Result<Self, CredentialError> {
		let key_id = key_id.into();
		let issuer_id = issuer_id.into();
		let private_key = private_key.into();

		validate_field("key_id", &key_id)?;
		validate_field("issuer_id", &issuer_id)?;
		validate_field("private_key", &private_key)?;

		Ok(Self {
			key_id: key_id.trim().to_owned(),
			issuer_id: issuer_id.trim().to_owned(),
			private_key: normalize_pem(&private_key),
		})
	}

	/// Key identifier placed in the token header as `kid`.
	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	/// Issuer identifier placed in the token claims as `iss`.
	pub fn issuer_id(&self) -> &str {
		&self.issuer_id
	}

	/// Returns the PEM private key. Callers must avoid logging this string.
	pub fn expose_private_key(&self) -> &str {
		&self.private_key
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("key_id", &self.key_id)
			.field("issuer_id", &self.issuer_id)
			.field("private_key", &"<redacted>")
			.finish()
	}
}

fn validate_field(field: &'static str, value: &str) -> Result<(), CredentialError> {
	if value.trim().is_empty() { Err(CredentialError::MissingField { field }) } else { Ok(()) }
}

fn normalize_pem(raw: &str) -> String {
	let trimmed = raw.trim();

	if !trimmed.contains('\n') && trimmed.contains("\\n") {
		trimmed.replace("\\n", "\n")
	} else {
		trimmed.to_owned()
	}
}
