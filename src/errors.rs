// Cloudgate - Cloud Service Access Management
// Copyright (C) 2022 Cloudgate

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Errors of the access engine, and how they are turned into HTTP
//! responses by the routes.

use crate::sentry_util;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::convert::Infallible;
use thiserror::Error;
use warp::{http, reject, Rejection};

/// Recoverable conditions surfaced by the catalogs and the access engine.
///
/// Denials (permission not granted, limit reached) are not errors: they are
/// returned as a [`crate::engine::Decision`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CloudgateError {
	#[error("Permission {0} already exists.")]
	PermissionExists(String),
	#[error("Permission {0} not found.")]
	PermissionNotFound(String),
	#[error("Plan {0} already exists.")]
	PlanExists(String),
	#[error("Plan {0} not found.")]
	PlanNotFound(String),
	#[error("User {0} already subscribed. Unsubscribe first to change plan.")]
	SubscriptionExists(String),
	#[error("Subscription not found for user {0}.")]
	SubscriptionNotFound(String),
	#[error("No permission for API {api_name}.")]
	PermissionNotGranted { user_id: String, api_name: String },
	#[error("{0}")]
	Validation(String),
}

impl CloudgateError {
	pub fn status_code(&self) -> http::StatusCode {
		match self {
			CloudgateError::PermissionExists(_)
			| CloudgateError::PlanExists(_)
			| CloudgateError::SubscriptionExists(_)
			| CloudgateError::Validation(_) => http::StatusCode::BAD_REQUEST,
			CloudgateError::PermissionNotFound(_)
			| CloudgateError::PlanNotFound(_)
			| CloudgateError::SubscriptionNotFound(_) => http::StatusCode::NOT_FOUND,
			CloudgateError::PermissionNotGranted { .. } => http::StatusCode::FORBIDDEN,
		}
	}
}

/// Struct describing an error response.
#[derive(Clone, Debug)]
pub struct CloudgateResponseError {
	code: http::StatusCode,
	message: String,
}

impl CloudgateResponseError {
	pub fn new(code: http::StatusCode, message: String) -> Self {
		CloudgateResponseError { code, message }
	}
}

impl Serialize for CloudgateResponseError {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(2))?;
		map.serialize_entry("code", &self.code.as_u16())?;
		map.serialize_entry("error", &self.message)?;
		map.end()
	}
}

impl reject::Reject for CloudgateResponseError {}

impl From<CloudgateError> for CloudgateResponseError {
	fn from(err: CloudgateError) -> Self {
		CloudgateResponseError::new(err.status_code(), err.to_string())
	}
}

/// Convert an engine error to a warp rejection.
pub fn to_rejection(err: CloudgateError) -> Rejection {
	reject::custom(CloudgateResponseError::from(err))
}

/// This function receives a `Rejection` and turns it into a JSON error
/// reply. Rejections we don't know about are logged, sent to Sentry, and
/// answered with a 500.
pub async fn handle_rejection(err: Rejection) -> Result<impl warp::Reply, Infallible> {
	let response = if let Some(err) = err.find::<CloudgateResponseError>() {
		err.clone()
	} else if err.is_not_found() {
		CloudgateResponseError::new(http::StatusCode::NOT_FOUND, "Not found.".into())
	} else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
		CloudgateResponseError::new(http::StatusCode::BAD_REQUEST, e.to_string())
	} else if let Some(e) = err.find::<reject::InvalidQuery>() {
		CloudgateResponseError::new(http::StatusCode::BAD_REQUEST, e.to_string())
	} else if let Some(e) = err.find::<reject::PayloadTooLarge>() {
		CloudgateResponseError::new(http::StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
	} else if let Some(e) = err.find::<reject::MethodNotAllowed>() {
		CloudgateResponseError::new(http::StatusCode::METHOD_NOT_ALLOWED, e.to_string())
	} else {
		// We should have expected this... Just log and say its a 500.
		log::error!(target: "cloudgate", "Unhandled rejection: {:?}", err);
		sentry_util::error(format!("Unhandled rejection: {:?}", err));

		CloudgateResponseError::new(
			http::StatusCode::INTERNAL_SERVER_ERROR,
			format!("Unhandled rejection: {:?}", err),
		)
	};

	Ok(warp::reply::with_status(
		warp::reply::json(&response),
		response.code,
	))
}
