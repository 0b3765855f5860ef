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

//! Server configuration, read from environment variables. A `.env` file is
//! loaded into the environment by the binary before this runs.

use std::{env, net::IpAddr, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Environment variable {var} is malformed: {value}")]
	Malformed { var: &'static str, value: String },
	#[error("Cannot read seed file: {0}")]
	SeedIo(#[from] std::io::Error),
	#[error("Cannot parse seed file: {0}")]
	SeedFormat(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
	/// `CG_HTTP_HOST`, defaults to 127.0.0.1.
	pub host: IpAddr,
	/// `PORT`, defaults to 8080.
	pub port: u16,
	/// `CG_SENTRY_DSN`. Empty disables Sentry.
	pub sentry_dsn: String,
	/// `CG_SEED_FILE`, a JSON file of permissions and plans to load at
	/// startup.
	pub seed_file: Option<PathBuf>,
}

impl ServerConfig {
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|var| env::var(var).ok())
	}

	/// Build the config from any variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let host = match lookup("CG_HTTP_HOST") {
			Some(value) => value.parse::<IpAddr>().map_err(|_| ConfigError::Malformed {
				var: "CG_HTTP_HOST",
				value,
			})?,
			None => IpAddr::from([127, 0, 0, 1]),
		};
		let port = match lookup("PORT") {
			Some(value) => value
				.parse::<u16>()
				.map_err(|_| ConfigError::Malformed { var: "PORT", value })?,
			None => 8080,
		};

		Ok(ServerConfig {
			host,
			port,
			sentry_dsn: lookup("CG_SENTRY_DSN").unwrap_or_default(),
			seed_file: lookup("CG_SEED_FILE")
				.filter(|path| !path.is_empty())
				.map(PathBuf::from),
		})
	}
}
