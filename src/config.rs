use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::quotes::{QuoteKind, QuotePair};

/// Paths that switch smart quotes off when set to `false`. The first is the
/// legacy top-level flag.
const DISABLE_SWITCHES: [&[&str]; 2] = [&["useSmartQuotes"], &["smartQuotes", "enabled"]];

const SIDES: [&str; 2] = ["left", "right"];

/// Smart quote configuration, resolved once at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSettings {
    pub enabled: bool,
    pub double: QuotePair,
    pub single: QuotePair,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            double: QuotePair::double(),
            single: QuotePair::single(),
        }
    }
}

impl QuoteSettings {
    pub const fn pair(&self, kind: QuoteKind) -> &QuotePair {
        match kind {
            QuoteKind::Double => &self.double,
            QuoteKind::Single => &self.single,
        }
    }

    /// Resolve settings from a merged config object.
    ///
    /// Only a JSON `false` on one of the switches disables the feature.
    /// Glyph overrides must be strings; anything else keeps the
    /// default for that side.
    pub fn resolve(config: &Value) -> Self {
        let enabled = !DISABLE_SWITCHES
            .iter()
            .any(|path| lookup(config, path) == Some(&Value::Bool(false)));

        let mut settings = Self {
            enabled,
            ..Self::default()
        };
        for kind in QuoteKind::ALL {
            for side in SIDES {
                let Some(value) = lookup(config, &["smartQuotes", kind.key(), side]) else {
                    continue;
                };
                match value.as_str() {
                    Some(glyph) => {
                        let pair = settings.pair_mut(kind);
                        if side == "left" {
                            pair.left = glyph.to_string();
                        } else {
                            pair.right = glyph.to_string();
                        }
                    }
                    _ => debug!(kind = kind.key(), side, %value, "ignoring quote glyph override"),
                }
            }
        }
        settings
    }

    fn pair_mut(&mut self, kind: QuoteKind) -> &mut QuotePair {
        match kind {
            QuoteKind::Double => &mut self.double,
            QuoteKind::Single => &mut self.single,
        }
    }

    /// The nested config form of these settings.
    pub fn to_value(&self) -> Value {
        json!({
            "smartQuotes": {
                "enabled": self.enabled,
                "double": self.double,
                "single": self.single,
            }
        })
    }
}

fn lookup<'a>(config: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(config, |value, key| value.get(key))
}

/// Overlay `other` onto `base`. Objects merge key by key; any other value in
/// `other` replaces what `base` had.
pub fn merge(base: &mut Value, other: Value) {
    match (base, other) {
        (Value::Object(base), Value::Object(other)) => {
            for (key, value) in other {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, other) => *base = other,
    }
}

/// Config overlay for command-line switches.
pub fn cli_overlay(no_smart_quotes: bool) -> Value {
    if no_smart_quotes {
        json!({ "smartQuotes": { "enabled": false } })
    } else {
        Value::Object(Map::new())
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("smartmark").join("config.json");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("smartmark")
                .join("config.json");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("smartmark").join("config.json");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("smartmark")
                .join("config.json");
        }
    }

    PathBuf::from(".smartmark.json")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".smartmark.json")
}

/// Load a JSON config object. A missing file is an empty config.
pub fn load_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    if !value.is_object() {
        anyhow::bail!("Config {} must be a JSON object", path.display());
    }
    Ok(value)
}

/// Global config, then the local override, merged.
pub fn load_layered(global: &Path, local: &Path) -> Result<Value> {
    let mut config = load_config(global)?;
    merge(&mut config, load_config(local)?);
    Ok(config)
}

/// Merge `values` into the config stored at `path`.
pub fn save_config(path: &Path, values: &Value) -> Result<()> {
    let mut config = load_config(path)?;
    merge(&mut config, values.clone());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
    }
    let content = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    fs::write(path, format!("{content}\n"))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}
