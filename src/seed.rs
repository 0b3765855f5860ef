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

//! Load permissions and plans into a store at startup.

use crate::config::ConfigError;
use crate::errors::CloudgateError;
use crate::models::{permission::PermissionInput, plan::PlanInput};
use crate::store::Store;
use serde::Deserialize;
use std::{fs, path::Path};

/// Content of a seed file.
///
/// ```json
/// {
///   "permissions": [{"name": "service1", "endpoint": "/service1"}],
///   "plans": [{"name": "Free", "description": "", "permissions": ["service1"], "limits": {"service1": 100}}]
/// }
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Seed {
	#[serde(default)]
	pub permissions: Vec<PermissionInput>,
	#[serde(default)]
	pub plans: Vec<PlanInput>,
}

impl Seed {
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let content = fs::read_to_string(path)?;

		Ok(serde_json::from_str(&content)?)
	}

	/// Register every permission and create every plan. Stops at the first
	/// failure, e.g. a name that already exists.
	pub fn apply(&self, store: &dyn Store) -> Result<(), CloudgateError> {
		for permission in &self.permissions {
			store.register_permission(
				&permission.name,
				&permission.fields.endpoint,
				permission.fields.description(),
			)?;
		}
		for plan in &self.plans {
			store.create_plan(&plan.name, plan.terms.validate()?)?;
		}

		log::info!(
			target: "cloudgate",
			"Seeded {} permissions and {} plans.",
			self.permissions.len(),
			self.plans.len()
		);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::Seed;
	use crate::errors::CloudgateError;
	use crate::store::{MemoryStore, PermissionRegistry, PlanCatalog};

	#[test]
	fn test_apply_seed() {
		let seed: Seed = serde_json::from_str(
			r#"{
				"permissions": [
					{"name": "service1", "endpoint": "/service1", "description": "First"},
					{"name": "service2", "endpoint": "/service2"}
				],
				"plans": [
					{"name": "Free", "description": "Free tier", "permissions": ["service1"], "limits": {"service1": 2}}
				]
			}"#,
		)
		.unwrap();
		let store = MemoryStore::new();

		seed.apply(&store).unwrap();

		assert_eq!(store.list_permissions().len(), 2);
		assert_eq!(store.get_permission("service2").unwrap().description, "");
		assert_eq!(store.get_plan("Free").unwrap().limit_for("service1"), Some(2));
	}

	#[test]
	fn test_apply_seed_rejects_bad_limit() {
		let seed: Seed = serde_json::from_str(
			r#"{"plans": [{"name": "Free", "description": "", "limits": {"service1": 0}}]}"#,
		)
		.unwrap();

		assert!(matches!(
			seed.apply(&MemoryStore::new()),
			Err(CloudgateError::Validation(_))
		));
	}
}
