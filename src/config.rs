// Connection configuration
// The store path is an opaque dependency-injection input: resolved from the
// secrets file first, then the environment, never computed by the core.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Secrets file checked before the environment, mirroring a deployment where
/// a managed secrets store outranks ambient variables.
pub const SECRETS_FILE: &str = "secrets.toml";

/// Environment variable fallback for the store path.
pub const STORE_ENV_VAR: &str = "FINSIGHT_DB";

#[derive(Debug, Deserialize)]
struct Secrets {
    store: Option<StoreSection>,
}

#[derive(Debug, Deserialize)]
struct StoreSection {
    path: Option<String>,
}

/// Resolve the document-store connection string.
///
/// Priority order: `secrets.toml` (`[store] path = "..."`), then the
/// `FINSIGHT_DB` environment variable. Missing both is a `Config` error; the
/// caller degrades to an in-memory store rather than aborting.
pub fn resolve_store_path() -> Result<String> {
    if let Some(path) = read_secrets_file(Path::new(SECRETS_FILE)) {
        return Ok(path);
    }

    match env::var(STORE_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => Ok(path),
        _ => Err(Error::Config(format!(
            "set [store] path in {} or the {} environment variable",
            SECRETS_FILE, STORE_ENV_VAR
        ))),
    }
}

fn read_secrets_file(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let secrets: Secrets = match toml::from_str(&content) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("ignoring malformed {}: {}", SECRETS_FILE, e);
            return None;
        }
    };

    secrets
        .store
        .and_then(|s| s.path)
        .filter(|p| !p.trim().is_empty())
}
