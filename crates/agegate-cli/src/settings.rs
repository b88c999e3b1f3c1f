//! Layered server configuration: built-in defaults, then an optional TOML
//! file, then `AGEGATE_*` environment variables.

use std::path::Path;

use anyhow::Context as _;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

/// Runtime settings for `agegate serve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  /// Policy applied to requests that name none, e.g. `over21`.
  pub default_policy: String,
}

fn with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
  Ok(
    Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8421_i64)?
      .set_default("default_policy", "over21")?,
  )
}

/// Load configuration; a missing file is not an error.
pub fn load(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = with_defaults()?
    .add_source(File::from(path).required(false))
    .add_source(Environment::with_prefix("AGEGATE"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    with_defaults()
      .unwrap()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_apply_without_a_file() {
    let cfg = from_toml("");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8421);
    assert_eq!(cfg.default_policy, "over21");
  }

  #[test]
  fn file_overrides_defaults() {
    let cfg = from_toml("port = 9000\ndefault_policy = \"under:18\"\n");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.default_policy, "under:18");
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let cfg = load(Path::new("/nonexistent/agegate.toml")).unwrap();
    assert!(!cfg.host.is_empty());
  }
}
