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

pub type SubscriptionId = i32;

/// Associates a user with a subscription plan. A user has at most one.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Subscription {
	pub id: SubscriptionId,
	pub user_id: String,
	/// Name of the plan. It may no longer resolve if the plan was deleted.
	pub plan_name: String,
}
