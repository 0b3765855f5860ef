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

//! Plans, their validated terms, and the JSON blob form they take when
//! persisted in a single row.

use crate::errors::CloudgateError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type PlanId = i32;

/// A named bundle of permitted APIs and per-API usage limits.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Plan {
	pub id: PlanId,
	pub name: String,
	pub description: String,
	pub permitted_apis: BTreeSet<String>,
	/// API name to maximum call count. A missing entry means unlimited.
	pub limits: BTreeMap<String, u64>,
}

impl Plan {
	pub fn new(id: PlanId, name: &str, terms: PlanTerms) -> Self {
		Plan {
			id,
			name: name.into(),
			description: terms.description,
			permitted_apis: terms.permitted_apis,
			limits: terms.limits,
		}
	}

	pub fn is_api_permitted(&self, api_name: &str) -> bool {
		self.permitted_apis.contains(api_name)
	}

	pub fn limit_for(&self, api_name: &str) -> Option<u64> {
		self.limits.get(api_name).copied()
	}

	/// Replace everything but the identity of this plan.
	pub fn replace_terms(&mut self, terms: PlanTerms) {
		self.description = terms.description;
		self.permitted_apis = terms.permitted_apis;
		self.limits = terms.limits;
	}
}

/// Everything a plan holds besides its identity. Only constructed through
/// [`PlanTerms::new`], so limits are always positive.
///
/// Limit keys are not required to appear in `permitted_apis`: a limit on an
/// API the plan doesn't permit is never consulted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanTerms {
	description: String,
	permitted_apis: BTreeSet<String>,
	limits: BTreeMap<String, u64>,
}

impl PlanTerms {
	pub fn new<A, S, L, K>(
		description: &str,
		permitted_apis: A,
		limits: L,
	) -> Result<Self, CloudgateError>
	where
		A: IntoIterator<Item = S>,
		S: Into<String>,
		L: IntoIterator<Item = (K, i64)>,
		K: Into<String>,
	{
		let limits = limits
			.into_iter()
			.map(|(api_name, limit)| {
				let api_name = api_name.into();
				if limit <= 0 {
					Err(CloudgateError::Validation(format!(
						"Limit for {} must be a positive integer, got {}.",
						api_name, limit
					)))
				} else {
					Ok((api_name, limit as u64))
				}
			})
			.collect::<Result<BTreeMap<_, _>, _>>()?;

		Ok(PlanTerms {
			description: description.into(),
			permitted_apis: permitted_apis.into_iter().map(Into::into).collect(),
			limits,
		})
	}
}

/// Plan terms as found in request bodies and seed files. Limits are kept
/// signed here so that non-positive values surface as validation errors
/// instead of deserialization errors.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlanTermsInput {
	pub description: String,
	#[serde(default)]
	pub permissions: Vec<String>,
	#[serde(default)]
	pub limits: BTreeMap<String, i64>,
}

impl PlanTermsInput {
	pub fn validate(&self) -> Result<PlanTerms, CloudgateError> {
		PlanTerms::new(
			&self.description,
			self.permissions.iter().map(String::as_str),
			self.limits.iter().map(|(k, v)| (k.as_str(), *v)),
		)
	}
}

/// A plan to create, as found in request bodies and seed files.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlanInput {
	pub name: String,
	#[serde(flatten)]
	pub terms: PlanTermsInput,
}

/// A plan flattened into one row, with its permitted APIs and limits each
/// serialized as an independent JSON blob.
///
/// This is the row layout for a SQL-backed [`crate::store::Store`]. The
/// in-memory store keeps typed [`Plan`]s and never goes through it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlanRecord {
	pub id: PlanId,
	pub name: String,
	pub description: String,
	pub permissions_json: String,
	pub limits_json: String,
}

impl PlanRecord {
	pub fn from_plan(plan: &Plan) -> Result<Self, serde_json::Error> {
		Ok(PlanRecord {
			id: plan.id,
			name: plan.name.clone(),
			description: plan.description.clone(),
			permissions_json: serde_json::to_string(&plan.permitted_apis)?,
			limits_json: serde_json::to_string(&plan.limits)?,
		})
	}

	/// Decode the row back into a plan. Empty blobs decode to an empty set
	/// or map.
	pub fn into_plan(self) -> Result<Plan, serde_json::Error> {
		let permitted_apis = if self.permissions_json.is_empty() {
			BTreeSet::new()
		} else {
			serde_json::from_str(&self.permissions_json)?
		};
		let limits = if self.limits_json.is_empty() {
			BTreeMap::new()
		} else {
			serde_json::from_str(&self.limits_json)?
		};

		Ok(Plan {
			id: self.id,
			name: self.name,
			description: self.description,
			permitted_apis,
			limits,
		})
	}
}
