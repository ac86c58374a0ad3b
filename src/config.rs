//! Engine configuration: cascade knobs and the length-adaptive threshold
//! tables, with JSON load/save.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Validation engine configuration.
///
/// The threshold *tables* (n-gram ratio and language-id gap per word
/// length) are fixed tuning data exposed as methods; the scalar knobs are
/// serializable so a config file can adjust them.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EngineConfig {
    /// Words shorter than this are never analyzed (cascade layer and
    /// `should_analyze` pre-filter).
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Maximum word length for the context-bias override.
    #[serde(default = "default_context_bias_max_length")]
    pub context_bias_max_length: usize,

    /// Minimum n-gram ratio for the context-bias override to trust the
    /// recent layout switch over the statistics.
    #[serde(default = "default_context_bias_min_ratio")]
    pub context_bias_min_ratio: f64,

    /// Below this ratio the engine keeps the word without consulting the
    /// dictionary or language-id oracles.
    #[serde(default = "default_confident_keep_ratio")]
    pub confident_keep_ratio: f64,
}

fn default_min_word_length() -> usize {
    2
}

fn default_context_bias_max_length() -> usize {
    5
}

fn default_context_bias_min_ratio() -> f64 {
    0.1
}

fn default_confident_keep_ratio() -> f64 {
    0.5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_word_length: default_min_word_length(),
            context_bias_max_length: default_context_bias_max_length(),
            context_bias_min_ratio: default_context_bias_min_ratio(),
            confident_keep_ratio: default_confident_keep_ratio(),
        }
    }
}

impl EngineConfig {
    /// N-gram ratio a swapped word must beat to switch outright. Shorter
    /// words get a more permissive bar: their statistics are weaker, and a
    /// wrong short word is cheap to undo.
    pub fn ngram_ratio_threshold(&self, word_length: usize) -> f64 {
        match word_length {
            0..=2 => 1.5,
            3 => 1.8,
            4 => 2.0,
            5..=7 => 2.5,
            _ => 3.0,
        }
    }

    /// Confidence gap the language identifier must show before its verdict
    /// overrides an ambiguous n-gram ratio.
    pub fn language_id_threshold(&self, word_length: usize) -> f64 {
        match word_length {
            0..=4 => 0.15,
            5..=7 => 0.25,
            _ => 0.40,
        }
    }
}

/// Config file path: `$HOME/.config/relayout/config.json`.
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .filter(|p| p.is_absolute() && p.is_dir())
        .unwrap_or_else(|| PathBuf::from("/var/tmp"));
    home.join(".config").join("relayout").join("config.json")
}

/// Load the config file; missing or corrupt files yield the defaults.
pub fn load_config() -> EngineConfig {
    match fs::read_to_string(config_path()) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("corrupt config, using defaults: {}", e);
            EngineConfig::default()
        }),
        Err(_) => EngineConfig::default(),
    }
}

/// Save the config file, creating the directory if needed.
pub fn save_config(config: &EngineConfig) -> Result<(), String> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("config dir create failed: {}", e))?;
    }
    let json =
        serde_json::to_string_pretty(config).map_err(|e| format!("serialize failed: {}", e))?;
    fs::write(&path, json).map_err(|e| format!("config write failed: {}", e))?;
    Ok(())
}
