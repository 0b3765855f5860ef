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

//! Helper functions to report to Sentry.

use sentry::protocol::{Event, Level};
use std::collections::BTreeMap;

pub const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Setup Sentry. An empty DSN disables it, Sentry will just silently
/// ignore all events.
pub fn setup_sentry(dsn: &str) -> sentry::ClientInitGuard {
	let sentry = sentry::init(dsn);
	if sentry.is_enabled() {
		log::info!(target: "cloudgate", "Sentry is successfully set up.")
	}

	sentry
}

/// Helper function to send an Error event to Sentry.
pub fn error(message: String) {
	log::debug!(target: "cloudgate", "{}", message);

	let mut extra = BTreeMap::new();
	extra.insert("version".into(), CARGO_PKG_VERSION.into());

	sentry::capture_event(Event {
		extra,
		level: Level::Error,
		message: Some(message),
		release: Some(CARGO_PKG_VERSION.into()),
		..Default::default()
	});
}
