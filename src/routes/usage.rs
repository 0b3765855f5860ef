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

//! This file implements the `POST /usage/{user_id}` and
//! `GET /usage/{user_id}` endpoints.

use super::{param, with_engine};
use crate::{engine::AccessEngine, errors::to_rejection};
use serde::{Deserialize, Serialize};
use warp::Filter;

/// Query string of `POST /usage/{user_id}`.
#[derive(Clone, Debug, Deserialize)]
struct TrackUsageQuery {
	api_name: String,
}

/// Endpoint response body.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TrackUsageResponse {
	pub status: String,
	pub new_count: u64,
}

async fn track_usage(
	user_id: String,
	query: TrackUsageQuery,
	engine: AccessEngine,
) -> Result<impl warp::Reply, warp::Rejection> {
	let new_count = engine
		.track_usage(&user_id, &query.api_name)
		.map_err(to_rejection)?;

	Ok(warp::reply::json(&TrackUsageResponse {
		status: "success".into(),
		new_count,
	}))
}

async fn usage_stats(
	user_id: String,
	engine: AccessEngine,
) -> Result<impl warp::Reply, warp::Rejection> {
	let stats = engine.usage_stats(&user_id).map_err(to_rejection)?;

	Ok(warp::reply::json(&stats))
}

/// Create the `POST /usage/{user_id}?api_name=..` and `GET /usage/{user_id}`
/// endpoints.
pub fn routes(
	engine: AccessEngine,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	let post = warp::path("usage")
		.and(param())
		.and(warp::path::end())
		.and(warp::post())
		.and(warp::query::<TrackUsageQuery>())
		.and(with_engine(engine.clone()))
		.and_then(track_usage);
	let get = warp::path("usage")
		.and(param())
		.and(warp::path::end())
		.and(warp::get())
		.and(with_engine(engine))
		.and_then(usage_stats);

	post.or(get)
}
