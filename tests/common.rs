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

use cloudgate_backend::{
	engine::AccessEngine,
	models::plan::PlanTerms,
	store::{MemoryStore, PlanCatalog},
};
use std::sync::Arc;

/// Create an engine backed by an empty in-memory store.
pub fn setup_engine() -> AccessEngine {
	AccessEngine::new(Arc::new(MemoryStore::new()))
}

/// Create the "Free" plan: only `service1`, limited to 2 calls.
pub fn create_free_plan(engine: &AccessEngine) {
	let terms = PlanTerms::new("Free tier", vec!["service1"], vec![("service1", 2)])
		.expect("Limits are positive. qed.");

	engine
		.store()
		.create_plan("Free", terms)
		.expect("Plan Free doesn't exist yet. qed.");
}
