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

pub type PermissionId = i32;

/// Represents a permission granting access to a specific API endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Permission {
	pub id: PermissionId,
	pub name: String,
	pub endpoint: String,
	pub description: String,
}

/// Mutable fields of a permission, as sent on update.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PermissionFields {
	pub endpoint: String,
	pub description: Option<String>,
}

impl PermissionFields {
	/// A missing description is stored as an empty string.
	pub fn description(&self) -> &str {
		self.description.as_deref().unwrap_or("")
	}
}

/// A permission to register, as found in request bodies and seed files.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PermissionInput {
	pub name: String,
	#[serde(flatten)]
	pub fields: PermissionFields,
}
