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

//! This file implements the `/plans` endpoints.

use super::{json_body, param, with_engine, SuccessResponse};
use crate::{
	engine::AccessEngine,
	errors::to_rejection,
	models::plan::{PlanId, PlanInput, PlanTermsInput},
};
use serde::Serialize;
use warp::Filter;

/// Endpoint response body.
#[derive(Clone, Debug, Serialize)]
struct CreatePlanResponse {
	status: &'static str,
	plan_id: PlanId,
}

async fn create_plan(
	engine: AccessEngine,
	body: PlanInput,
) -> Result<impl warp::Reply, warp::Rejection> {
	let terms = body.terms.validate().map_err(to_rejection)?;
	let plan_id = engine
		.store()
		.create_plan(&body.name, terms)
		.map_err(to_rejection)?;
	log::info!(
		target: "cloudgate",
		"[plan={}] Created with [id={}]",
		body.name,
		plan_id
	);

	Ok(warp::reply::json(&CreatePlanResponse {
		status: "success",
		plan_id,
	}))
}

async fn list_plans(engine: AccessEngine) -> Result<impl warp::Reply, warp::Rejection> {
	Ok(warp::reply::json(&engine.store().list_plans()))
}

async fn get_plan(name: String, engine: AccessEngine) -> Result<impl warp::Reply, warp::Rejection> {
	let plan = engine.store().get_plan(&name).map_err(to_rejection)?;

	Ok(warp::reply::json(&plan))
}

async fn update_plan(
	name: String,
	engine: AccessEngine,
	body: PlanTermsInput,
) -> Result<impl warp::Reply, warp::Rejection> {
	let terms = body.validate().map_err(to_rejection)?;
	engine
		.store()
		.update_plan(&name, terms)
		.map_err(to_rejection)?;
	log::info!(target: "cloudgate", "[plan={}] Updated", name);

	Ok(warp::reply::json(&SuccessResponse::new()))
}

async fn delete_plan(
	name: String,
	engine: AccessEngine,
) -> Result<impl warp::Reply, warp::Rejection> {
	engine.store().delete_plan(&name).map_err(to_rejection)?;
	log::info!(target: "cloudgate", "[plan={}] Deleted", name);

	Ok(warp::reply::json(&SuccessResponse::new()))
}

/// Create the `POST /plans`, `GET /plans`, `GET /plans/{name}`,
/// `PUT /plans/{name}` and `DELETE /plans/{name}` endpoints.
pub fn routes(
	engine: AccessEngine,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	let post = warp::path!("plans")
		.and(warp::post())
		.and(with_engine(engine.clone()))
		.and(json_body())
		.and_then(create_plan);
	let list = warp::path!("plans")
		.and(warp::get())
		.and(with_engine(engine.clone()))
		.and_then(list_plans);
	let get = warp::path("plans")
		.and(param())
		.and(warp::path::end())
		.and(warp::get())
		.and(with_engine(engine.clone()))
		.and_then(get_plan);
	let put = warp::path("plans")
		.and(param())
		.and(warp::path::end())
		.and(warp::put())
		.and(with_engine(engine.clone()))
		.and(json_body())
		.and_then(update_plan);
	let delete = warp::path("plans")
		.and(param())
		.and(warp::path::end())
		.and(warp::delete())
		.and(with_engine(engine))
		.and_then(delete_plan);

	post.or(list).or(get).or(put).or(delete)
}
