//! Error types shared by every formkit component.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type FormResult<T> = Result<T, FormError>;

/// Errors raised by the form layer.
#[derive(Debug, Error)]
pub enum FormError {
	/// No element with the given id (or selector) exists in the document.
	#[error("Form element not found: {0}")]
	ElementNotFound(String),

	/// `submit()` was called while a previous attempt is still running.
	#[error("Submission already in progress")]
	SubmissionInProgress,

	/// The ISO code does not name one of the supported countries.
	#[error("Unknown country code: {0}")]
	UnknownCountry(String),

	/// The key-value store rejected a read or write.
	#[error("Storage error: {0}")]
	Storage(String),

	/// JSON encoding or decoding failed.
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// The submission or city-list request failed.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Widget options could not be interpreted.
	#[error("Invalid settings: {0}")]
	Settings(String),
}

/// Failures of the HTTP transport.
///
/// Every variant ends a submission attempt in the network-error state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
	/// Connection failed, request aborted, CORS rejection, ...
	#[error("Network error: {0}")]
	Network(String),

	/// The response body was not the expected JSON.
	#[error("Deserialization error: {0}")]
	Deserialization(String),

	/// The request could not be built (bad method, body encoding).
	#[error("Request error: {0}")]
	Request(String),
}

impl TransportError {
	/// Create a network error
	pub fn network(msg: impl Into<String>) -> Self {
		Self::Network(msg.into())
	}

	/// Create a deserialization error
	pub fn deserialization(msg: impl Into<String>) -> Self {
		Self::Deserialization(msg.into())
	}

	/// Create a request error
	pub fn request(msg: impl Into<String>) -> Self {
		Self::Request(msg.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_transport_error_display() {
		let err = TransportError::network("Connection refused");
		assert_eq!(err.to_string(), "Network error: Connection refused");

		let err: FormError = TransportError::deserialization("expected value").into();
		assert_eq!(err.to_string(), "Deserialization error: expected value");
	}

	#[rstest]
	fn test_serialization_error_from_serde() {
		let parse = serde_json::from_str::<serde_json::Value>("{not json");
		let err: FormError = parse.unwrap_err().into();
		assert!(matches!(err, FormError::Serialization(_)));
	}
}
