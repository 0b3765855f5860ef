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

//! Cloudgate gates access to a set of cloud APIs based on the subscription
//! plan of each user, tracks per-API usage counters, and enforces the usage
//! limits of the plans.
//!
//! The [`engine::AccessEngine`] makes the decisions, on top of a
//! [`store::Store`]. The [`routes`] expose it over HTTP.

pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod routes;
pub mod seed;
pub mod sentry_util;
pub mod store;
