//! Minimal JSON:API shapes for apps and builds, carried over the generic verbs.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, QueryParams},
	http::ApiHttpClient,
};

/// Top-level response document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
	/// Primary data: one resource or a list of resources.
	pub data: T,
	/// Navigation links.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<DocumentLinks>,
}

/// Links attached to a document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLinks {
	/// Canonical URL of the current page.
	#[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
	pub this: Option<String>,
	/// Absolute URL of the next page, when more results exist.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next: Option<String>,
}

/// Typed resource object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource<A> {
	/// Resource type, e.g. `apps`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Resource identifier.
	pub id: String,
	/// Attributes; absent when a sparse fieldset excluded all of them.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attributes: Option<A>,
}

/// App attributes used by the bridge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppAttributes {
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Bundle identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bundle_id: Option<String>,
	/// Stock keeping unit.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sku: Option<String>,
	/// Primary locale code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub primary_locale: Option<String>,
}

/// Build attributes used by the bridge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAttributes {
	/// Build number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	/// Upload timestamp as sent by the API (RFC 3339).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub uploaded_date: Option<String>,
	/// Processing state, e.g. `PROCESSING` or `VALID`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub processing_state: Option<String>,
	/// Whether the build has expired.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expired: Option<bool>,
}

/// App resource.
pub type App = Resource<AppAttributes>;
/// Build resource.
pub type Build = Resource<BuildAttributes>;

#[derive(Serialize)]
struct UpdateRequest<'a, A> {
	data: UpdateData<'a, A>,
}
#[derive(Serialize)]
struct UpdateData<'a, A> {
	#[serde(rename = "type")]
	kind: &'static str,
	id: &'a str,
	attributes: &'a A,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Lists apps visible to the API key.
	pub async fn list_apps(&self, query: Option<&QueryParams>) -> Result<Document<Vec<App>>> {
		self.get("apps", query).await
	}

	/// Fetches one app.
	pub async fn app(&self, id: &str, query: Option<&QueryParams>) -> Result<Document<App>> {
		self.get(&format!("apps/{id}"), query).await
	}

	/// Lists builds, typically filtered with `filter[app]`.
	pub async fn list_builds(&self, query: Option<&QueryParams>) -> Result<Document<Vec<Build>>> {
		self.get("builds", query).await
	}

	/// Updates the attributes of one app; unset attributes are left untouched.
	pub async fn update_app(&self, id: &str, attributes: &AppAttributes) -> Result<Document<App>> {
		let body = UpdateRequest { data: UpdateData { kind: "apps", id, attributes } };

		self.patch(&format!("apps/{id}"), &body).await
	}

	/// Follows `links.next`, returning `None` on the last page.
	pub async fn next_page<T>(&self, document: &Document<T>) -> Result<Option<Document<T>>>
	where
		T: DeserializeOwned,
	{
		match document.links.as_ref().and_then(|links| links.next.as_deref()) {
			Some(next) => self.get(next, None).await.map(Some),
			None => Ok(None),
		}
	}
}
