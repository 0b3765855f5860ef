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

use serde::{Deserialize, Serialize};

/// Key of a usage counter. Counters are keyed globally, not under the
/// subscription, so they outlive it.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UsageKey {
	pub user_id: String,
	pub api_name: String,
}

impl UsageKey {
	pub fn new(user_id: &str, api_name: &str) -> Self {
		UsageKey {
			user_id: user_id.into(),
			api_name: api_name.into(),
		}
	}
}

/// How much of an API a user has consumed, against the plan's limit.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UsageStats {
	pub api_name: String,
	pub used: u64,
	pub limit: Option<u64>,
}
