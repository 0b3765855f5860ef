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

//! This file implements the `/permissions` endpoints.

use super::{json_body, param, with_engine, SuccessResponse};
use crate::{
	engine::AccessEngine,
	errors::to_rejection,
	models::permission::{PermissionFields, PermissionId, PermissionInput},
};
use serde::Serialize;
use warp::Filter;

/// Endpoint response body.
#[derive(Clone, Debug, Serialize)]
struct CreatePermissionResponse {
	status: &'static str,
	permission_id: PermissionId,
}

async fn create_permission(
	engine: AccessEngine,
	body: PermissionInput,
) -> Result<impl warp::Reply, warp::Rejection> {
	let permission_id = engine
		.store()
		.register_permission(
			&body.name,
			&body.fields.endpoint,
			body.fields.description(),
		)
		.map_err(to_rejection)?;
	log::info!(
		target: "cloudgate",
		"[permission={}] Registered with [id={}]",
		body.name,
		permission_id
	);

	Ok(warp::reply::json(&CreatePermissionResponse {
		status: "success",
		permission_id,
	}))
}

async fn list_permissions(engine: AccessEngine) -> Result<impl warp::Reply, warp::Rejection> {
	Ok(warp::reply::json(&engine.store().list_permissions()))
}

async fn update_permission(
	name: String,
	engine: AccessEngine,
	body: PermissionFields,
) -> Result<impl warp::Reply, warp::Rejection> {
	engine
		.store()
		.update_permission(&name, &body.endpoint, body.description())
		.map_err(to_rejection)?;
	log::info!(target: "cloudgate", "[permission={}] Updated", name);

	Ok(warp::reply::json(&SuccessResponse::new()))
}

async fn remove_permission(
	name: String,
	engine: AccessEngine,
) -> Result<impl warp::Reply, warp::Rejection> {
	engine
		.store()
		.remove_permission(&name)
		.map_err(to_rejection)?;
	log::info!(target: "cloudgate", "[permission={}] Removed", name);

	Ok(warp::reply::json(&SuccessResponse::new()))
}

/// Create the `POST /permissions`, `GET /permissions`,
/// `PUT /permissions/{name}` and `DELETE /permissions/{name}` endpoints.
pub fn routes(
	engine: AccessEngine,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
	let post = warp::path!("permissions")
		.and(warp::post())
		.and(with_engine(engine.clone()))
		.and(json_body())
		.and_then(create_permission);
	let list = warp::path!("permissions")
		.and(warp::get())
		.and(with_engine(engine.clone()))
		.and_then(list_permissions);
	let put = warp::path("permissions")
		.and(param())
		.and(warp::path::end())
		.and(warp::put())
		.and(with_engine(engine.clone()))
		.and(json_body())
		.and_then(update_permission);
	let delete = warp::path("permissions")
		.and(param())
		.and(warp::path::end())
		.and(warp::delete())
		.and(with_engine(engine))
		.and_then(remove_permission);

	post.or(list).or(put).or(delete)
}
