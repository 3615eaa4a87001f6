use crate::error::{AttributionError, Result};
use crate::types::config::AttributionConfig;
use std::path::{Path, PathBuf};
use toml::Value;
use tracing::debug;

pub const REPO_CONFIG_FILE: &str = "attribution.toml";
pub const LOCAL_CONFIG_FILE: &str = ".attribution/local.toml";
pub const GLOBAL_CONFIG_FILE: &str = ".config/pr-attribution/config.toml";

/// Global, repository and local layers for `root`. Each is optional; with
/// none present the defaults apply.
pub fn load_config(root: &Path) -> Result<AttributionConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(GLOBAL_CONFIG_FILE));
    load_layers(&config_layers(root, global))
}

/// Lowest precedence first.
pub(crate) fn config_layers(root: &Path, global: Option<PathBuf>) -> Vec<PathBuf> {
    global
        .into_iter()
        .chain([root.join(REPO_CONFIG_FILE), root.join(LOCAL_CONFIG_FILE)])
        .collect()
}

/// Deep-merges every existing layer in order, later tables overriding
/// earlier keys, then deserializes the result.
pub(crate) fn load_layers(layers: &[PathBuf]) -> Result<AttributionConfig> {
    let mut merged = Value::Table(Default::default());
    for path in layers.iter().filter(|path| path.is_file()) {
        debug!(path = %path.display(), "applying config layer");
        overlay(&mut merged, read_layer(path)?);
    }
    Ok(merged.try_into()?)
}

fn read_layer(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| AttributionError::ConfigParse(format!("{}: {}", path.display(), e)))
}

// Arrays and scalars are replaced whole; only tables merge.
fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Table(table), Value::Table(layer)) => {
            for (key, value) in layer {
                match table.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
