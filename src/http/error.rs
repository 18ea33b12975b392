use std::borrow::Cow;

use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ApiErrorCode(pub u16);

impl ApiErrorCode {
	/// The requested route does not exist.
	pub const ROUTE_NOT_FOUND: Self = Self(404);
	/// The relay only answers GET.
	pub const METHOD_NOT_ALLOWED: Self = Self(405);
	/// `endpoint` was absent, repeated, or not a known upstream path.
	pub const MISSING_ENDPOINT: Self = Self(1000);
	/// The relay has no upstream credential.
	pub const API_KEY_NOT_CONFIGURED: Self = Self(2000);
	/// The upstream could not be reached or answered garbage.
	pub const UPSTREAM_ERROR: Self = Self(3000);
}

/// Error reply of the relay. Only `error` reaches the wire, so clients see
/// `{ "error": "..." }`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiError {
	#[serde(skip)]
	pub status_code: StatusCode,
	#[serde(skip)]
	pub error_code: ApiErrorCode,
	pub error: Cow<'static, str>,
}

impl ApiError {
	pub fn new(status_code: StatusCode, error_code: ApiErrorCode, error: impl Into<Cow<'static, str>>) -> Self {
		Self {
			status_code,
			error_code,
			error: error.into(),
		}
	}

	pub fn bad_request(error_code: ApiErrorCode, error: impl Into<Cow<'static, str>>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, error_code, error)
	}

	pub fn not_found(error_code: ApiErrorCode, error: impl Into<Cow<'static, str>>) -> Self {
		Self::new(StatusCode::NOT_FOUND, error_code, error)
	}

	pub fn method_not_allowed(error_code: ApiErrorCode, error: impl Into<Cow<'static, str>>) -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED, error_code, error)
	}

	pub fn internal_server_error(error_code: ApiErrorCode, error: impl Into<Cow<'static, str>>) -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, error_code, error)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> axum::http::Response<axum::body::Body> {
		(self.status_code, Json(self)).into_response()
	}
}
