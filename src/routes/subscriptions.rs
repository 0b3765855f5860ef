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

//! This file implements the `/subscriptions` endpoints.

use super::{json_body, param, with_engine, SuccessResponse};
use crate::{engine::AccessEngine, errors::to_rejection, models::subscription::SubscriptionId};
use serde::{Deserialize, Serialize};
use warp::Filter;

/// Endpoint request body.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SubscribeRequest {
	pub user_id: String,
	pub plan_name: String,
}

/// Endpoint response body.
#[derive(Clone, Debug, Serialize)]
struct SubscribeResponse {
	status: &'static str,
	subscription_id: SubscriptionId,
}

async fn subscribe(
	engine: AccessEngine,
	body: SubscribeRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
	let subscription_id = engine
		.subscribe(&body.user_id, &body.plan_name)
		.map_err(to_rejection)?;

	Ok(warp::reply::json(&SubscribeResponse {
		status: "success",
		subscription_id,
	}))
}

async fn get_subscription(
	user_id: String,
	engine: AccessEngine,
) -> Result<impl warp::Reply, warp::Rejection> {
	let subscription = engine
		.store()
		.get_subscription(&user_id)
		.map_err(to_rejection)?;

	Ok(warp::reply::json(&subscription))
}

async fn unsubscribe(
	user_id: String,
	engine: AccessEngine,
) -> Result<impl warp::Reply, warp::Rejection> {
	engine
		.store()
		.remove_subscription(&user_id)
		.map_err(to_rejection)?;
	log::info!(target: "cloudgate", "[user_id={}] Unsubscribed", user_id);

	Ok(warp::reply::json(&SuccessResponse::new()))
}

/// Create the `POST /subscriptions`, `GET /subscriptions/{user_id}` and
/// `DELETE /subscriptions/{user_id}` endpoints.
pub fn routes(
	engine: AccessEngine,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	let post = warp::path!("subscriptions")
		.and(warp::post())
		.and(with_engine(engine.clone()))
		.and(json_body())
		.and_then(subscribe);
	let get = warp::path("subscriptions")
		.and(param())
		.and(warp::path::end())
		.and(warp::get())
		.and(with_engine(engine.clone()))
		.and_then(get_subscription);
	let delete = warp::path("subscriptions")
		.and(param())
		.and(warp::path::end())
		.and(warp::delete())
		.and(with_engine(engine))
		.and_then(unsubscribe);

	post.or(get).or(delete)
}
