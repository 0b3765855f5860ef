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

//! In-process store. Each table is a sharded concurrent map: readers never
//! block each other, and writers lock only the shard holding their key.

use super::{PermissionRegistry, PlanCatalog, SubscriptionDirectory, UsageLedger};
use crate::errors::CloudgateError;
use crate::models::{
	permission::{Permission, PermissionId},
	plan::{Plan, PlanId, PlanTerms},
	subscription::{Subscription, SubscriptionId},
	usage::UsageKey,
};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicI32, Ordering};

/// Auto-incrementing id, starting at 1.
#[derive(Debug, Default)]
struct Sequence(AtomicI32);

impl Sequence {
	fn next(&self) -> i32 {
		self.0.fetch_add(1, Ordering::Relaxed) + 1
	}
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	permissions: DashMap<String, Permission>,
	permission_ids: Sequence,
	plans: DashMap<String, Plan>,
	plan_ids: Sequence,
	subscriptions: DashMap<String, Subscription>,
	subscription_ids: Sequence,
	usage: DashMap<UsageKey, u64>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl PermissionRegistry for MemoryStore {
	fn register_permission(
		&self,
		name: &str,
		endpoint: &str,
		description: &str,
	) -> Result<PermissionId, CloudgateError> {
		match self.permissions.entry(name.into()) {
			Entry::Occupied(_) => Err(CloudgateError::PermissionExists(name.into())),
			Entry::Vacant(entry) => {
				let id = self.permission_ids.next();
				entry.insert(Permission {
					id,
					name: name.into(),
					endpoint: endpoint.into(),
					description: description.into(),
				});
				Ok(id)
			}
		}
	}

	fn update_permission(
		&self,
		name: &str,
		endpoint: &str,
		description: &str,
	) -> Result<(), CloudgateError> {
		let mut permission = self
			.permissions
			.get_mut(name)
			.ok_or_else(|| CloudgateError::PermissionNotFound(name.into()))?;
		permission.endpoint = endpoint.into();
		permission.description = description.into();

		Ok(())
	}

	fn remove_permission(&self, name: &str) -> Result<(), CloudgateError> {
		self.permissions
			.remove(name)
			.map(|_| ())
			.ok_or_else(|| CloudgateError::PermissionNotFound(name.into()))
	}

	fn get_permission(&self, name: &str) -> Result<Permission, CloudgateError> {
		self.permissions
			.get(name)
			.map(|permission| permission.value().clone())
			.ok_or_else(|| CloudgateError::PermissionNotFound(name.into()))
	}

	fn list_permissions(&self) -> Vec<Permission> {
		let mut permissions: Vec<Permission> = self
			.permissions
			.iter()
			.map(|entry| entry.value().clone())
			.collect();
		permissions.sort_by_key(|permission| permission.id);

		permissions
	}
}

impl PlanCatalog for MemoryStore {
	fn create_plan(&self, name: &str, terms: PlanTerms) -> Result<PlanId, CloudgateError> {
		match self.plans.entry(name.into()) {
			Entry::Occupied(_) => Err(CloudgateError::PlanExists(name.into())),
			Entry::Vacant(entry) => {
				let id = self.plan_ids.next();
				entry.insert(Plan::new(id, name, terms));
				Ok(id)
			}
		}
	}

	fn update_plan(&self, name: &str, terms: PlanTerms) -> Result<(), CloudgateError> {
		self.plans
			.get_mut(name)
			.map(|mut plan| plan.replace_terms(terms))
			.ok_or_else(|| CloudgateError::PlanNotFound(name.into()))
	}

	fn delete_plan(&self, name: &str) -> Result<(), CloudgateError> {
		self.plans
			.remove(name)
			.map(|_| ())
			.ok_or_else(|| CloudgateError::PlanNotFound(name.into()))
	}

	fn get_plan(&self, name: &str) -> Result<Plan, CloudgateError> {
		self.plans
			.get(name)
			.map(|plan| plan.value().clone())
			.ok_or_else(|| CloudgateError::PlanNotFound(name.into()))
	}

	fn list_plans(&self) -> Vec<Plan> {
		let mut plans: Vec<Plan> = self.plans.iter().map(|entry| entry.value().clone()).collect();
		plans.sort_by_key(|plan| plan.id);

		plans
	}
}

impl SubscriptionDirectory for MemoryStore {
	fn insert_subscription(
		&self,
		user_id: &str,
		plan_name: &str,
	) -> Result<SubscriptionId, CloudgateError> {
		match self.subscriptions.entry(user_id.into()) {
			Entry::Occupied(_) => Err(CloudgateError::SubscriptionExists(user_id.into())),
			Entry::Vacant(entry) => {
				let id = self.subscription_ids.next();
				entry.insert(Subscription {
					id,
					user_id: user_id.into(),
					plan_name: plan_name.into(),
				});
				Ok(id)
			}
		}
	}

	fn get_subscription(&self, user_id: &str) -> Result<Subscription, CloudgateError> {
		self.subscriptions
			.get(user_id)
			.map(|subscription| subscription.value().clone())
			.ok_or_else(|| CloudgateError::SubscriptionNotFound(user_id.into()))
	}

	fn remove_subscription(&self, user_id: &str) -> Result<(), CloudgateError> {
		self.subscriptions
			.remove(user_id)
			.map(|_| ())
			.ok_or_else(|| CloudgateError::SubscriptionNotFound(user_id.into()))
	}
}

impl UsageLedger for MemoryStore {
	fn usage_count(&self, user_id: &str, api_name: &str) -> u64 {
		self.usage
			.get(&UsageKey::new(user_id, api_name))
			.map(|count| *count)
			.unwrap_or(0)
	}

	fn increment_usage(&self, user_id: &str, api_name: &str) -> u64 {
		// The entry holds the shard's write lock until it is dropped, so the
		// read-modify-write below is atomic for this key.
		let mut count = self.usage.entry(UsageKey::new(user_id, api_name)).or_insert(0);
		*count += 1;

		*count
	}
}

#[cfg(test)]
mod tests {
	use super::MemoryStore;
	use crate::errors::CloudgateError;
	use crate::models::plan::PlanTerms;
	use crate::store::{PermissionRegistry, PlanCatalog, SubscriptionDirectory, UsageLedger};
	use std::sync::Arc;
	use std::thread;

	fn terms(apis: Vec<&str>, limits: Vec<(&str, i64)>) -> PlanTerms {
		PlanTerms::new("", apis, limits).unwrap()
	}

	#[test]
	fn test_permission_lifecycle() {
		let store = MemoryStore::new();

		let id = store
			.register_permission("storage", "/storage", "Object storage")
			.unwrap();
		assert_eq!(id, 1);
		assert_eq!(
			store.register_permission("storage", "/other", ""),
			Err(CloudgateError::PermissionExists("storage".into()))
		);

		store.update_permission("storage", "/v2/storage", "").unwrap();
		let permission = store.get_permission("storage").unwrap();
		assert_eq!(permission.id, 1);
		assert_eq!(permission.endpoint, "/v2/storage");
		assert_eq!(permission.description, "");

		store.remove_permission("storage").unwrap();
		assert_eq!(
			store.remove_permission("storage"),
			Err(CloudgateError::PermissionNotFound("storage".into()))
		);
		assert_eq!(
			store.update_permission("storage", "/storage", ""),
			Err(CloudgateError::PermissionNotFound("storage".into()))
		);
	}

	#[test]
	fn test_list_permissions_is_ordered_by_id() {
		let store = MemoryStore::new();
		for name in &["c", "a", "b"] {
			store.register_permission(name, "/", "").unwrap();
		}

		let names: Vec<String> = store
			.list_permissions()
			.into_iter()
			.map(|permission| permission.name)
			.collect();
		assert_eq!(names, vec!["c", "a", "b"]);
	}

	#[test]
	fn test_removed_permission_stays_in_plans() {
		let store = MemoryStore::new();
		store.register_permission("service1", "/service1", "").unwrap();
		store.create_plan("Free", terms(vec!["service1"], vec![])).unwrap();

		store.remove_permission("service1").unwrap();

		assert!(store.get_plan("Free").unwrap().is_api_permitted("service1"));
	}

	#[test]
	fn test_plan_update_replaces_terms() {
		let store = MemoryStore::new();
		let id = store
			.create_plan("Pro", terms(vec!["service1", "service2"], vec![("service1", 10)]))
			.unwrap();
		assert_eq!(
			store.create_plan("Pro", terms(vec![], vec![])),
			Err(CloudgateError::PlanExists("Pro".into()))
		);

		store
			.update_plan("Pro", terms(vec!["service3"], vec![("service3", 1)]))
			.unwrap();
		let plan = store.get_plan("Pro").unwrap();

		assert_eq!(plan.id, id);
		assert!(!plan.is_api_permitted("service1"));
		assert!(plan.is_api_permitted("service3"));
		assert_eq!(plan.limit_for("service1"), None);
		assert_eq!(plan.limit_for("service3"), Some(1));

		assert_eq!(
			store.update_plan("Missing", terms(vec![], vec![])),
			Err(CloudgateError::PlanNotFound("Missing".into()))
		);
	}

	#[test]
	fn test_plan_delete() {
		let store = MemoryStore::new();
		store.create_plan("Free", terms(vec![], vec![])).unwrap();

		store.delete_plan("Free").unwrap();

		assert!(store.list_plans().is_empty());
		assert_eq!(
			store.delete_plan("Free"),
			Err(CloudgateError::PlanNotFound("Free".into()))
		);
	}

	#[test]
	fn test_one_subscription_per_user() {
		let store = MemoryStore::new();

		store.insert_subscription("u1", "Free").unwrap();
		assert_eq!(
			store.insert_subscription("u1", "Pro"),
			Err(CloudgateError::SubscriptionExists("u1".into()))
		);
		assert_eq!(store.get_subscription("u1").unwrap().plan_name, "Free");

		store.remove_subscription("u1").unwrap();
		assert_eq!(
			store.get_subscription("u1"),
			Err(CloudgateError::SubscriptionNotFound("u1".into()))
		);
		assert_eq!(
			store.remove_subscription("u1"),
			Err(CloudgateError::SubscriptionNotFound("u1".into()))
		);

		let id = store.insert_subscription("u1", "Pro").unwrap();
		assert_eq!(id, 2);
	}

	#[test]
	fn test_usage_counts() {
		let store = MemoryStore::new();

		assert_eq!(store.usage_count("u1", "service1"), 0);
		assert_eq!(store.increment_usage("u1", "service1"), 1);
		assert_eq!(store.increment_usage("u1", "service1"), 2);
		assert_eq!(store.usage_count("u1", "service1"), 2);
		assert_eq!(store.usage_count("u1", "service2"), 0);
		assert_eq!(store.usage_count("u2", "service1"), 0);
	}

	#[test]
	fn test_concurrent_increments_are_not_lost() {
		let store = Arc::new(MemoryStore::new());
		let threads = 16;
		let per_thread = 250;

		let handles: Vec<_> = (0..threads)
			.map(|_| {
				let store = Arc::clone(&store);
				thread::spawn(move || {
					for _ in 0..per_thread {
						store.increment_usage("u1", "service1");
					}
				})
			})
			.collect();
		for handle in handles {
			handle.join().unwrap();
		}

		assert_eq!(
			store.usage_count("u1", "service1"),
			(threads * per_thread) as u64
		);
	}
}
