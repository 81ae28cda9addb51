use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TICK_MS: u32 = 200;
const DEFAULT_SCAN_RANGE: f32 = 30.0;
const DEFAULT_RECAST_DELAY_MS: u32 = 500;
const DEFAULT_RECAST_SPELL: u32 = 18_248;
const DEFAULT_AUTO_LOOT_DELAY_MS: u32 = 120;
const DEFAULT_TRIGGER_ENTRY: u32 = 35_591;

/// Option names accepted by [`AutoFishConfig::from_source`]. The provider is
/// expected to be scoped to this engine already, so the names carry no prefix.
pub mod options {
    pub const ENABLED: &str = "Enabled";
    pub const SERVER_AUTO_LOOT: &str = "ServerAutoLoot";
    pub const AUTO_RECAST: &str = "AutoRecast";
    pub const TICK_MS: &str = "TickMs";
    pub const SCAN_RANGE: &str = "ScanRange";
    pub const RECAST_DELAY_MS: &str = "RecastDelayMs";
    pub const RECAST_ACTION: &str = "RecastAction";
    pub const AUTO_LOOT_DELAY_MS: &str = "AutoLootDelayMs";
    pub const REQUIRED_ITEM_ID: &str = "RequiredItemId";
    pub const REQUIRED_EQUIP_ID: &str = "RequiredEquipId";
    pub const TRIGGER_ENTRIES: &str = "TriggerEntries";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("option {key} has invalid value '{value}': expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("trigger entry '{token}' is not a numeric type id")]
    InvalidTriggerEntry { token: String },
}

/// Key-value provider handing out raw option strings, the shape a host config
/// store exposes on a reload event.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

/// Immutable-between-reloads tunables for the automation engine. Readers only
/// ever see a fully-built snapshot; a failed parse leaves the previous one in
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFishConfig {
    pub enabled: bool,
    pub server_auto_loot: bool,
    pub auto_recast: bool,
    /// Elapsed-time threshold between scan passes. Timer advancement is not
    /// gated by this; it happens every tick.
    pub tick_ms: u32,
    pub scan_range: f32,
    pub recast_delay_ms: u32,
    /// Action cast on self when a recast timer expires.
    pub recast_spell: u32,
    pub auto_loot_delay_ms: u32,
    /// Item that must be held in quantity >= 1. Zero disables the check.
    pub required_item_id: u32,
    /// Item that must occupy an equipment slot. Zero disables the check.
    pub required_equip_id: u32,
    /// World-object type ids considered valid scan targets.
    pub trigger_entries: Vec<u32>,
}

impl Default for AutoFishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            server_auto_loot: true,
            auto_recast: true,
            tick_ms: DEFAULT_TICK_MS,
            scan_range: DEFAULT_SCAN_RANGE,
            recast_delay_ms: DEFAULT_RECAST_DELAY_MS,
            recast_spell: DEFAULT_RECAST_SPELL,
            auto_loot_delay_ms: DEFAULT_AUTO_LOOT_DELAY_MS,
            required_item_id: 0,
            required_equip_id: 0,
            trigger_entries: vec![DEFAULT_TRIGGER_ENTRY],
        }
    }
}

impl AutoFishConfig {
    /// Build a snapshot from named options, falling back to the default for
    /// every absent key. Any malformed value fails the whole build.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = source.get(options::ENABLED) {
            config.enabled = parse_bool(options::ENABLED, &raw)?;
        }
        if let Some(raw) = source.get(options::SERVER_AUTO_LOOT) {
            config.server_auto_loot = parse_bool(options::SERVER_AUTO_LOOT, &raw)?;
        }
        if let Some(raw) = source.get(options::AUTO_RECAST) {
            config.auto_recast = parse_bool(options::AUTO_RECAST, &raw)?;
        }
        if let Some(raw) = source.get(options::TICK_MS) {
            config.tick_ms = parse_u32(options::TICK_MS, &raw)?;
        }
        if let Some(raw) = source.get(options::SCAN_RANGE) {
            config.scan_range = parse_range(options::SCAN_RANGE, &raw)?;
        }
        if let Some(raw) = source.get(options::RECAST_DELAY_MS) {
            config.recast_delay_ms = parse_u32(options::RECAST_DELAY_MS, &raw)?;
        }
        if let Some(raw) = source.get(options::RECAST_ACTION) {
            config.recast_spell = parse_u32(options::RECAST_ACTION, &raw)?;
        }
        if let Some(raw) = source.get(options::AUTO_LOOT_DELAY_MS) {
            config.auto_loot_delay_ms = parse_u32(options::AUTO_LOOT_DELAY_MS, &raw)?;
        }
        if let Some(raw) = source.get(options::REQUIRED_ITEM_ID) {
            config.required_item_id = parse_u32(options::REQUIRED_ITEM_ID, &raw)?;
        }
        if let Some(raw) = source.get(options::REQUIRED_EQUIP_ID) {
            config.required_equip_id = parse_u32(options::REQUIRED_EQUIP_ID, &raw)?;
        }
        if let Some(raw) = source.get(options::TRIGGER_ENTRIES) {
            config.trigger_entries = parse_entry_list(&raw)?;
        }
        Ok(config)
    }
}

/// Parse a comma-separated list of world-object type ids. Blank tokens are
/// dropped after trimming; a non-numeric token fails the whole parse.
pub fn parse_entry_list(csv: &str) -> Result<Vec<u32>, ConfigError> {
    let mut entries = Vec::new();
    for token in csv.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let entry = token
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidTriggerEntry {
                token: token.to_string(),
            })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim() {
        "1" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "false" | "False" | "FALSE" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            expected: "boolean",
        }),
    }
}

fn parse_u32(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            expected: "unsigned integer",
        })
}

fn parse_range(key: &'static str, raw: &str) -> Result<f32, ConfigError> {
    let parsed = raw
        .trim()
        .parse::<f32>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            expected: "finite non-negative number",
        })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            expected: "finite non-negative number",
        });
    }
    Ok(parsed)
}
