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

//! The access decision engine: given a user and an API, decide whether the
//! call is allowed right now, and account for calls that were made.
//!
//! Checking access is read-only. Usage is only consumed by
//! [`AccessEngine::track_usage`], which callers are expected to invoke after
//! a granted [`AccessEngine::check_access`]. The pair is not atomic: with
//! several trackers in flight for the same key, usage can end up above the
//! limit by the number of concurrent trackers. `track_usage` does not look
//! at the limit at all, so a caller skipping the check can overshoot too.

use crate::errors::CloudgateError;
use crate::models::{
	plan::Plan,
	subscription::{Subscription, SubscriptionId},
	usage::UsageStats,
};
use crate::store::Store;
use std::{fmt, sync::Arc};

/// Why a subscribed user may not call an API.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DenialReason {
	/// The user's plan was deleted after they subscribed.
	PlanNotFound,
	/// The API is not in the plan's permitted APIs.
	PermissionNotGranted,
	/// The user's usage of the API reached the plan's limit.
	LimitReached,
}

impl fmt::Display for DenialReason {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let message = match self {
			DenialReason::PlanNotFound => "Plan not found.",
			DenialReason::PermissionNotGranted => "Permission not granted.",
			DenialReason::LimitReached => "Usage limit reached.",
		};
		write!(f, "{}", message)
	}
}

/// Outcome of an access check for a subscribed user. A missing
/// subscription is not a decision, it is reported as an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
	Granted,
	Denied(DenialReason),
}

impl Decision {
	pub fn is_granted(&self) -> bool {
		*self == Decision::Granted
	}
}

#[derive(Clone)]
pub struct AccessEngine {
	store: Arc<dyn Store>,
}

impl AccessEngine {
	pub fn new(store: Arc<dyn Store>) -> Self {
		AccessEngine { store }
	}

	/// The catalogs and ledger backing this engine.
	pub fn store(&self) -> &dyn Store {
		self.store.as_ref()
	}

	/// Subscribe a user to an existing plan. A user already subscribed must
	/// unsubscribe first.
	pub fn subscribe(
		&self,
		user_id: &str,
		plan_name: &str,
	) -> Result<SubscriptionId, CloudgateError> {
		self.store.get_plan(plan_name)?;
		let id = self.store.insert_subscription(user_id, plan_name)?;
		log::info!(
			target: "cloudgate",
			"[user_id={}] Subscribed to [plan={}] with [id={}]",
			user_id,
			plan_name,
			id
		);

		Ok(id)
	}

	/// Resolve the user's subscription and its plan. The plan is `None`
	/// when it was deleted after the user subscribed.
	fn subscribed_plan(
		&self,
		user_id: &str,
	) -> Result<(Subscription, Option<Plan>), CloudgateError> {
		let subscription = self.store.get_subscription(user_id)?;
		match self.store.get_plan(&subscription.plan_name) {
			Ok(plan) => Ok((subscription, Some(plan))),
			Err(CloudgateError::PlanNotFound(_)) => {
				log::warn!(
					target: "cloudgate",
					"[user_id={}] Subscribed to deleted [plan={}]",
					user_id,
					subscription.plan_name
				);
				Ok((subscription, None))
			}
			Err(err) => Err(err),
		}
	}

	/// Can `user_id` call `api_name` now? Fails only when the user has no
	/// subscription.
	pub fn check_access(
		&self,
		user_id: &str,
		api_name: &str,
	) -> Result<Decision, CloudgateError> {
		let decision = match self.subscribed_plan(user_id)? {
			(_, None) => Decision::Denied(DenialReason::PlanNotFound),
			(_, Some(plan)) if !plan.is_api_permitted(api_name) => {
				Decision::Denied(DenialReason::PermissionNotGranted)
			}
			(_, Some(plan)) => {
				let used = self.store.usage_count(user_id, api_name);
				match plan.limit_for(api_name) {
					Some(limit) if used >= limit => Decision::Denied(DenialReason::LimitReached),
					_ => Decision::Granted,
				}
			}
		};

		log::debug!(
			target: "cloudgate",
			"[user_id={}] [api={}] Access decision: {:?}",
			user_id,
			api_name,
			decision
		);

		Ok(decision)
	}

	/// Record one call of `api_name` by `user_id` and return the new count.
	///
	/// The subscription must exist and its plan must permit the API. The
	/// limit is not checked here.
	pub fn track_usage(&self, user_id: &str, api_name: &str) -> Result<u64, CloudgateError> {
		let plan = match self.subscribed_plan(user_id)? {
			(subscription, None) => {
				return Err(CloudgateError::PlanNotFound(subscription.plan_name))
			}
			(_, Some(plan)) => plan,
		};
		if !plan.is_api_permitted(api_name) {
			return Err(CloudgateError::PermissionNotGranted {
				user_id: user_id.into(),
				api_name: api_name.into(),
			});
		}

		let count = self.store.increment_usage(user_id, api_name);
		log::debug!(
			target: "cloudgate",
			"[user_id={}] [api={}] Tracked usage, [count={}]",
			user_id,
			api_name,
			count
		);

		Ok(count)
	}

	/// Usage of every API permitted by the user's plan, sorted by API name.
	pub fn usage_stats(&self, user_id: &str) -> Result<Vec<UsageStats>, CloudgateError> {
		let plan = match self.subscribed_plan(user_id)? {
			(subscription, None) => {
				return Err(CloudgateError::PlanNotFound(subscription.plan_name))
			}
			(_, Some(plan)) => plan,
		};

		Ok(plan
			.permitted_apis
			.iter()
			.map(|api_name| UsageStats {
				api_name: api_name.clone(),
				used: self.store.usage_count(user_id, api_name),
				limit: plan.limit_for(api_name),
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::{AccessEngine, Decision, DenialReason};
	use crate::errors::CloudgateError;
	use crate::models::{plan::PlanTerms, usage::UsageStats};
	use crate::store::{MemoryStore, PlanCatalog, SubscriptionDirectory, UsageLedger};
	use std::sync::Arc;
	use std::thread;

	/// An engine with plan "Free" (service1 limited to 2) and "Pro"
	/// (service1 and service2, unlimited).
	fn engine() -> AccessEngine {
		let store = MemoryStore::new();
		store
			.create_plan(
				"Free",
				PlanTerms::new("Free tier", vec!["service1"], vec![("service1", 2)]).unwrap(),
			)
			.unwrap();
		store
			.create_plan(
				"Pro",
				PlanTerms::new("Pro tier", vec!["service1", "service2"], Vec::<(&str, i64)>::new())
					.unwrap(),
			)
			.unwrap();

		AccessEngine::new(Arc::new(store))
	}

	#[test]
	fn test_free_plan_scenario() {
		let engine = engine();
		engine.subscribe("u1", "Free").unwrap();

		assert_eq!(engine.check_access("u1", "service1"), Ok(Decision::Granted));
		assert_eq!(engine.track_usage("u1", "service1"), Ok(1));
		assert_eq!(engine.track_usage("u1", "service1"), Ok(2));
		assert_eq!(
			engine.check_access("u1", "service1"),
			Ok(Decision::Denied(DenialReason::LimitReached))
		);
		assert_eq!(
			engine.check_access("u1", "service2"),
			Ok(Decision::Denied(DenialReason::PermissionNotGranted))
		);
	}

	#[test]
	fn test_unsubscribed_user_is_not_found() {
		let engine = engine();

		for api in &["service1", "service2", "anything"] {
			assert_eq!(
				engine.check_access("ghost", api),
				Err(CloudgateError::SubscriptionNotFound("ghost".into()))
			);
			assert_eq!(
				engine.track_usage("ghost", api),
				Err(CloudgateError::SubscriptionNotFound("ghost".into()))
			);
		}
	}

	#[test]
	fn test_granted_until_limit() {
		let engine = engine();
		engine.subscribe("u1", "Free").unwrap();

		for _ in 0..2 {
			assert!(engine.check_access("u1", "service1").unwrap().is_granted());
			engine.track_usage("u1", "service1").unwrap();
		}
		assert!(!engine.check_access("u1", "service1").unwrap().is_granted());
	}

	#[test]
	fn test_unpermitted_api_denied_regardless_of_usage() {
		let engine = engine();
		engine.subscribe("u1", "Free").unwrap();

		assert_eq!(
			engine.check_access("u1", "service2"),
			Ok(Decision::Denied(DenialReason::PermissionNotGranted))
		);
		// Usage recorded directly in the ledger doesn't change the reason.
		engine.store().increment_usage("u1", "service2");
		assert_eq!(
			engine.check_access("u1", "service2"),
			Ok(Decision::Denied(DenialReason::PermissionNotGranted))
		);
		assert_eq!(
			engine.track_usage("u1", "service2"),
			Err(CloudgateError::PermissionNotGranted {
				user_id: "u1".into(),
				api_name: "service2".into()
			})
		);
	}

	#[test]
	fn test_check_access_does_not_consume_usage() {
		let engine = engine();
		engine.subscribe("u1", "Free").unwrap();

		for _ in 0..5 {
			engine.check_access("u1", "service1").unwrap();
		}

		assert_eq!(engine.store().usage_count("u1", "service1"), 0);
	}

	#[test]
	fn test_track_usage_does_not_check_limit() {
		let engine = engine();
		engine.subscribe("u1", "Free").unwrap();

		for expected in 1..=3 {
			assert_eq!(engine.track_usage("u1", "service1"), Ok(expected));
		}
		assert_eq!(
			engine.check_access("u1", "service1"),
			Ok(Decision::Denied(DenialReason::LimitReached))
		);
	}

	#[test]
	fn test_unlimited_api() {
		let engine = engine();
		engine.subscribe("u1", "Pro").unwrap();

		for _ in 0..100 {
			engine.track_usage("u1", "service2").unwrap();
		}

		assert_eq!(engine.check_access("u1", "service2"), Ok(Decision::Granted));
	}

	#[test]
	fn test_subscribe_errors() {
		let engine = engine();

		assert_eq!(
			engine.subscribe("u1", "Enterprise"),
			Err(CloudgateError::PlanNotFound("Enterprise".into()))
		);
		assert_eq!(engine.subscribe("u1", "Free"), Ok(1));
		assert_eq!(
			engine.subscribe("u1", "Pro"),
			Err(CloudgateError::SubscriptionExists("u1".into()))
		);
	}

	#[test]
	fn test_resubscribe_keeps_usage() {
		let engine = engine();
		engine.subscribe("u1", "Free").unwrap();
		engine.track_usage("u1", "service1").unwrap();
		engine.track_usage("u1", "service1").unwrap();

		engine.store().remove_subscription("u1").unwrap();
		engine.subscribe("u1", "Free").unwrap();

		assert_eq!(
			engine.check_access("u1", "service1"),
			Ok(Decision::Denied(DenialReason::LimitReached))
		);
	}

	#[test]
	fn test_deleted_plan_denies_access() {
		let engine = engine();
		engine.subscribe("u1", "Free").unwrap();
		engine.store().delete_plan("Free").unwrap();

		assert_eq!(
			engine.check_access("u1", "service1"),
			Ok(Decision::Denied(DenialReason::PlanNotFound))
		);
		assert_eq!(
			engine.track_usage("u1", "service1"),
			Err(CloudgateError::PlanNotFound("Free".into()))
		);
		assert_eq!(
			engine.usage_stats("u1"),
			Err(CloudgateError::PlanNotFound("Free".into()))
		);
	}

	#[test]
	fn test_plan_update_applies_to_subscribers() {
		let engine = engine();
		engine.subscribe("u1", "Free").unwrap();
		engine.track_usage("u1", "service1").unwrap();
		engine.track_usage("u1", "service1").unwrap();

		engine
			.store()
			.update_plan(
				"Free",
				PlanTerms::new("Free tier", vec!["service1"], vec![("service1", 3)]).unwrap(),
			)
			.unwrap();

		assert_eq!(engine.check_access("u1", "service1"), Ok(Decision::Granted));
	}

	#[test]
	fn test_usage_stats() {
		let engine = engine();
		engine.subscribe("u1", "Pro").unwrap();
		engine.track_usage("u1", "service2").unwrap();

		assert_eq!(
			engine.usage_stats("u1"),
			Ok(vec![
				UsageStats {
					api_name: "service1".into(),
					used: 0,
					limit: None,
				},
				UsageStats {
					api_name: "service2".into(),
					used: 1,
					limit: None,
				},
			])
		);
	}

	#[test]
	fn test_concurrent_tracking() {
		let engine = engine();
		engine.subscribe("u1", "Pro").unwrap();
		let callers = 32;

		let handles: Vec<_> = (0..callers)
			.map(|_| {
				let engine = engine.clone();
				thread::spawn(move || engine.track_usage("u1", "service1").unwrap())
			})
			.collect();
		let mut counts: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		counts.sort_unstable();

		assert_eq!(counts, (1..=callers as u64).collect::<Vec<_>>());
		assert_eq!(engine.store().usage_count("u1", "service1"), callers as u64);
	}
}
