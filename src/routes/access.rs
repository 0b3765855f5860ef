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

//! This file implements the `GET /access/{user_id}/{api_name}` endpoint.

use super::{param, with_engine};
use crate::{engine::AccessEngine, engine::Decision, errors::to_rejection};
use serde::{Deserialize, Serialize};
use warp::Filter;

/// Endpoint response body. A denied access is still a 200, only a missing
/// subscription is an error.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AccessResponse {
	pub granted: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}

impl From<Decision> for AccessResponse {
	fn from(decision: Decision) -> Self {
		match decision {
			Decision::Granted => AccessResponse {
				granted: true,
				reason: None,
			},
			Decision::Denied(reason) => AccessResponse {
				granted: false,
				reason: Some(reason.to_string()),
			},
		}
	}
}

async fn check_access(
	user_id: String,
	api_name: String,
	engine: AccessEngine,
) -> Result<impl warp::Reply, warp::Rejection> {
	let decision = engine
		.check_access(&user_id, &api_name)
		.map_err(to_rejection)?;

	Ok(warp::reply::json(&AccessResponse::from(decision)))
}

/// Create the `GET /access/{user_id}/{api_name}` endpoint.
pub fn get_access(
	engine: AccessEngine,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	warp::path("access")
		.and(param())
		.and(param())
		.and(warp::path::end())
		.and(warp::get())
		.and(with_engine(engine))
		.and_then(check_access)
}

#[cfg(test)]
mod tests {
	use super::AccessResponse;
	use crate::engine::{Decision, DenialReason};

	#[test]
	fn test_response_from_decision() {
		assert_eq!(
			serde_json::to_string(&AccessResponse::from(Decision::Granted)).unwrap(),
			r#"{"granted":true}"#
		);
		assert_eq!(
			serde_json::to_string(&AccessResponse::from(Decision::Denied(
				DenialReason::LimitReached
			)))
			.unwrap(),
			r#"{"granted":false,"reason":"Usage limit reached."}"#
		);
	}
}
