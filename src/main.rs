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
	config::ServerConfig,
	engine::AccessEngine,
	routes::create_routes,
	seed::Seed,
	sentry_util::{setup_sentry, CARGO_PKG_VERSION},
	store::MemoryStore,
};
use dotenv::dotenv;
use std::sync::Arc;

/// Run a HTTP server using warp.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	// Read from .env file if present.
	let _ = dotenv();

	env_logger::init();
	log::info!(target: "cloudgate", "Running Cloudgate v{}", CARGO_PKG_VERSION);

	let config = ServerConfig::from_env()?;
	let _guard = setup_sentry(&config.sentry_dsn);

	let store = Arc::new(MemoryStore::new());
	if let Some(path) = &config.seed_file {
		log::info!(target: "cloudgate", "Seeding from {}.", path.display());
		Seed::from_file(path)?.apply(&*store)?;
	}

	let routes = create_routes(AccessEngine::new(store));

	log::info!(
		target: "cloudgate",
		"Server is listening on {}:{}.",
		config.host,
		config.port
	);
	warp::serve(routes).run((config.host, config.port)).await;

	Ok(())
}
