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

pub mod access;
pub mod permissions;
pub mod plans;
pub mod subscriptions;
pub mod usage;
pub mod version;

use super::errors::{self, CloudgateResponseError};
use crate::engine::AccessEngine;
use percent_encoding::percent_decode_str;
use serde::{de::DeserializeOwned, Serialize};
use std::convert::Infallible;
use warp::{http, reject, Filter};

/// Maximum size of a JSON request body.
const BODY_LIMIT: u64 = 1024 * 16;

/// Reply body for mutations that don't return anything else.
#[derive(Clone, Debug, Serialize)]
pub struct SuccessResponse {
	pub status: &'static str,
}

impl SuccessResponse {
	pub fn new() -> Self {
		SuccessResponse { status: "success" }
	}
}

/// Filter to add the access engine into handlers.
fn with_engine(
	engine: AccessEngine,
) -> impl Filter<Extract = (AccessEngine,), Error = Infallible> + Clone {
	warp::any().map(move || engine.clone())
}

/// When accepting a body, we want a JSON body (and to reject huge
/// payloads)...
fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
	T: DeserializeOwned + Send,
{
	warp::body::content_length_limit(BODY_LIMIT).and(warp::body::json())
}

/// One path segment, percent-decoded. Names are stored as they appear in
/// JSON bodies, so `Free%20Tier` in a path must match `"Free Tier"`.
fn param() -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
	warp::path::param::<String>().and_then(|segment: String| async move {
		percent_decode_str(&segment)
			.decode_utf8()
			.map(|decoded| decoded.into_owned())
			.map_err(|err| {
				reject::custom(CloudgateResponseError::new(
					http::StatusCode::BAD_REQUEST,
					format!("Invalid path segment {}: {}", segment, err),
				))
			})
	})
}

pub fn create_routes(
	engine: AccessEngine,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
	version::get_version()
		.or(permissions::routes(engine.clone()))
		.or(plans::routes(engine.clone()))
		.or(subscriptions::routes(engine.clone()))
		.or(access::get_access(engine.clone()))
		.or(usage::routes(engine))
		.recover(errors::handle_rejection)
		// View access logs by setting `RUST_LOG=cloudgate`.
		.with(warp::log("cloudgate"))
}
