//! Verb wrappers over [`ApiClient::request`].

// self
use crate::{
	_prelude::*,
	client::{ApiClient, QueryParams, encode_body},
	http::{ApiHttpClient, Method},
};

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET` a resource path.
	pub async fn get<T>(&self, path: &str, query: Option<&QueryParams>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.execute(Method::Get, path, query, None).await
	}

	/// `POST` a JSON body to a resource path.
	pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let body = encode_body(body)?;

		self.execute(Method::Post, path, None, Some(body)).await
	}

	/// `PATCH` a resource path with a JSON body.
	pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let body = encode_body(body)?;

		self.execute(Method::Patch, path, None, Some(body)).await
	}

	/// `DELETE` a resource path.
	pub async fn delete<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.execute(Method::Delete, path, None, None).await
	}
}
