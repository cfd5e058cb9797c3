//! HTTP transport over `fetch`
//!
//! [`FetchTransport`] sends a [`SubmitRequest`] as JSON and decodes the
//! server's [`SubmitResponse`]. The body is decoded whatever the HTTP status,
//! since rejected forms usually come back as 400 with field errors.

use async_trait::async_trait;
use formkit_forms::{SubmitRequest, SubmitResponse, SubmitTransport, TransportError};

/// Submission transport using the browser's `fetch`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

impl FetchTransport {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait(?Send)]
impl SubmitTransport for FetchTransport {
	#[cfg(target_arch = "wasm32")]
	async fn send(&self, request: &SubmitRequest) -> Result<SubmitResponse, TransportError> {
		let mut builder = builder_for(&request.method, &request.url)?;
		for (name, value) in request.headers() {
			builder = builder.header(name, value);
		}

		let response = if request.method == "GET" {
			builder.send().await
		} else {
			builder
				.json(&request.body)
				.map_err(|e| TransportError::request(e.to_string()))?
				.send()
				.await
		}
		.map_err(|e| TransportError::network(e.to_string()))?;

		crate::debug_log!("{} {} -> {}", request.method, request.url, response.status());

		response
			.json::<SubmitResponse>()
			.await
			.map_err(|e| TransportError::deserialization(e.to_string()))
	}

	/// Sends the request (non-WASM stub).
	#[cfg(not(target_arch = "wasm32"))]
	async fn send(&self, request: &SubmitRequest) -> Result<SubmitResponse, TransportError> {
		Err(TransportError::network(format!(
			"cannot send {} {} outside WASM",
			request.method, request.url
		)))
	}
}

#[cfg(target_arch = "wasm32")]
fn builder_for(method: &str, url: &str) -> Result<gloo_net::http::RequestBuilder, TransportError> {
	use gloo_net::http::Request;

	match method {
		"GET" => Ok(Request::get(url)),
		"POST" => Ok(Request::post(url)),
		"PUT" => Ok(Request::put(url)),
		"PATCH" => Ok(Request::patch(url)),
		"DELETE" => Ok(Request::delete(url)),
		other => Err(TransportError::request(format!(
			"unsupported method: {}",
			other
		))),
	}
}

/// Fetches the city list from `endpoint`.
///
/// A body without a `cities` key yields an empty list.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_cities(endpoint: &str) -> Result<Vec<String>, TransportError> {
	use formkit_forms::autocomplete::CityListResponse;
	use gloo_net::http::Request;

	let response = Request::get(endpoint)
		.header("Accept", "application/json")
		.send()
		.await
		.map_err(|e| TransportError::network(e.to_string()))?;

	if !response.ok() {
		return Err(TransportError::network(format!(
			"city list request failed with status {}",
			response.status()
		)));
	}

	response
		.json::<CityListResponse>()
		.await
		.map(|body| body.cities)
		.map_err(|e| TransportError::deserialization(e.to_string()))
}

/// Fetches the city list (non-WASM stub).
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_cities(endpoint: &str) -> Result<Vec<String>, TransportError> {
	Err(TransportError::network(format!(
		"cannot fetch {} outside WASM",
		endpoint
	)))
}
