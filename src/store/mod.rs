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

//! Storage abstraction for the access engine: one trait per component, so
//! the engine never knows what backs the catalogs and the ledger.

mod memory;

pub use memory::MemoryStore;

use crate::errors::CloudgateError;
use crate::models::{
	permission::{Permission, PermissionId},
	plan::{Plan, PlanId, PlanTerms},
	subscription::{Subscription, SubscriptionId},
};

/// Named permissions, each tied to one API endpoint.
pub trait PermissionRegistry {
	fn register_permission(
		&self,
		name: &str,
		endpoint: &str,
		description: &str,
	) -> Result<PermissionId, CloudgateError>;

	/// Replace the endpoint and description of an existing permission.
	fn update_permission(
		&self,
		name: &str,
		endpoint: &str,
		description: &str,
	) -> Result<(), CloudgateError>;

	/// Plans referencing this permission keep doing so.
	fn remove_permission(&self, name: &str) -> Result<(), CloudgateError>;

	fn get_permission(&self, name: &str) -> Result<Permission, CloudgateError>;

	/// All permissions, ordered by id.
	fn list_permissions(&self) -> Vec<Permission>;
}

/// Named plans. Permitted APIs are not checked against the
/// [`PermissionRegistry`].
pub trait PlanCatalog {
	fn create_plan(&self, name: &str, terms: PlanTerms) -> Result<PlanId, CloudgateError>;

	/// Full replacement of the plan's terms, not a merge.
	fn update_plan(&self, name: &str, terms: PlanTerms) -> Result<(), CloudgateError>;

	/// Subscriptions to this plan are left dangling.
	fn delete_plan(&self, name: &str) -> Result<(), CloudgateError>;

	fn get_plan(&self, name: &str) -> Result<Plan, CloudgateError>;

	/// All plans, ordered by id.
	fn list_plans(&self) -> Vec<Plan>;
}

/// At most one subscription per user.
pub trait SubscriptionDirectory {
	/// Fails if the user already has a subscription. Whether `plan_name`
	/// exists is checked by the caller.
	fn insert_subscription(
		&self,
		user_id: &str,
		plan_name: &str,
	) -> Result<SubscriptionId, CloudgateError>;

	fn get_subscription(&self, user_id: &str) -> Result<Subscription, CloudgateError>;

	/// Usage counters of the user are kept.
	fn remove_subscription(&self, user_id: &str) -> Result<(), CloudgateError>;
}

/// Per (user, API) call counters.
pub trait UsageLedger {
	/// 0 when the user never called the API.
	fn usage_count(&self, user_id: &str, api_name: &str) -> u64;

	/// Add one call and return the new count. Concurrent increments on the
	/// same key are never lost.
	fn increment_usage(&self, user_id: &str, api_name: &str) -> u64;
}

/// Everything the access engine needs from its backing store.
pub trait Store:
	PermissionRegistry + PlanCatalog + SubscriptionDirectory + UsageLedger + Send + Sync
{
}

impl<T> Store for T where
	T: PermissionRegistry + PlanCatalog + SubscriptionDirectory + UsageLedger + Send + Sync
{
}
