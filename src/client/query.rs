//! Query parameter builder for the API's bracketed conventions.

// self
use crate::_prelude::*;

/// Ordered query parameters merged into a request URL.
///
/// ```
/// use appstore_connect_bridge::client::QueryParams;
///
/// let query = QueryParams::new()
/// 	.fields("apps", ["name", "bundleId"])
/// 	.filter("bundleId", "com.example.app")
/// 	.limit(10);
///
/// assert_eq!(query.get("fields[apps]"), Some("name,bundleId"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);
impl QueryParams {
	/// Creates an empty parameter list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a raw `key=value` pair.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.push((key.into(), value.into()));

		self
	}

	/// Sparse fieldset: `fields[<resource>]=a,b`.
	pub fn fields<I, S>(self, resource: &str, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.param(format!("fields[{resource}]"), join(fields))
	}

	/// Filter: `filter[<key>]=value`.
	pub fn filter(self, key: &str, value: impl Into<String>) -> Self {
		self.param(format!("filter[{key}]"), value)
	}

	/// Related resources to include: `include=a,b`.
	pub fn include<I, S>(self, relationships: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.param("include", join(relationships))
	}

	/// Page size: `limit=n`.
	pub fn limit(self, limit: u32) -> Self {
		self.param("limit", limit.to_string())
	}

	/// Returns the first value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	/// Returns `true` when no parameter has been added.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over the pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Appends the pairs to the URL's query string, keeping any existing pairs.
	pub fn apply_to(&self, url: &mut Url) {
		if self.is_empty() {
			return;
		}

		url.query_pairs_mut().extend_pairs(self.iter());
	}
}

fn join<I, S>(values: I) -> String
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	values.into_iter().map(|value| value.as_ref().to_owned()).collect::<Vec<_>>().join(",")
}
