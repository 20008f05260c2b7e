//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
    base: PathBuf,
}

/// Where the CLI finds its library files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub materials_path: String,
    pub cards_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            materials_path: "data/materials.json".to_string(),
            cards_path: "data/cards.json".to_string(),
        }
    }
}

/// Default result caps used when a caller passes no explicit limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub material_limit: usize,
    pub card_limit: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self { material_limit: 10, card_limit: 5 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    #[serde(rename = "match")]
    pub matching: MatchSettings,
}

impl Config {
    /// Load from the working directory. `explicit` wins over `RUST_ENV`,
    /// which wins over "dev".
    pub fn load_env(explicit: Option<&str>) -> anyhow::Result<Self> {
        Self::load_in(Path::new("."), &Self::env_name(explicit))
    }

    pub fn env_name(explicit: Option<&str>) -> String {
        match explicit {
            Some(name) => name.to_string(),
            None => env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string()),
        }
    }

    /// Load `config.toml` and the env-specific overlay from `base`.
    pub fn load_in(base: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base: base.to_path_buf() };
        config.validate()?;
        tracing::debug!(env = env_name, base = %base.display(), "configuration loaded");
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    /// Library file paths, expanded and resolved against the config base.
    pub fn materials_path(&self) -> anyhow::Result<PathBuf> {
        Ok(resolve_with_base(&self.base, self.settings()?.data.materials_path))
    }

    pub fn cards_path(&self) -> anyhow::Result<PathBuf> {
        Ok(resolve_with_base(&self.base, self.settings()?.data.cards_path))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.matching.material_limit == 0 {
            return Err(Error::InvalidConfig("match.material_limit must be at least 1".into()).into());
        }
        if settings.matching.card_limit == 0 {
            return Err(Error::InvalidConfig("match.card_limit must be at least 1".into()).into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
