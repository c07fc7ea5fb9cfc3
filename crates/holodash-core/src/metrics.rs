//! Latest-known metrics snapshot and shallow merge of partial updates

use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const CPU_USAGE: &str = "cpu_usage";
pub const MEMORY_USAGE: &str = "memory_usage";
pub const MEMORY_TOTAL: &str = "memory_total";
pub const MEMORY_USED: &str = "memory_used";
pub const CPU_TEMP: &str = "cpu_temp";
pub const FAN_SPEEDS: &str = "fan_speeds";
pub const POWER_SCORE: &str = "power_score";

/// Field names with a dedicated slot in [`MetricsSnapshot`]
pub const RECOGNIZED_FIELDS: [&str; 7] = [
    CPU_USAGE,
    MEMORY_USAGE,
    MEMORY_TOTAL,
    MEMORY_USED,
    CPU_TEMP,
    FAN_SPEEDS,
    POWER_SCORE,
];

/// The most recently known value of every tracked metric.
///
/// Values are kept as raw JSON so a malformed field is stored as sent and
/// left for the formatters to tolerate.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub cpu_usage: Value,
    pub memory_usage: Value,
    pub memory_total: Value,
    pub memory_used: Value,
    /// `Null` means unknown
    pub cpu_temp: Value,
    pub fan_speeds: Value,
    /// Source units, 100000 per watt
    pub power_score: Value,
    /// Keys outside the recognized set (hostname, gpu_temp, ...)
    pub extra: BTreeMap<String, Value>,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            cpu_usage: Value::from(0),
            memory_usage: Value::from(0),
            memory_total: Value::from(0),
            memory_used: Value::from(0),
            cpu_temp: Value::Null,
            fan_speeds: Value::Array(Vec::new()),
            power_score: Value::Null,
            extra: BTreeMap::new(),
        }
    }
}

impl MetricsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up any field by wire name, recognized or extra.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match name {
            CPU_USAGE => Some(&self.cpu_usage),
            MEMORY_USAGE => Some(&self.memory_usage),
            MEMORY_TOTAL => Some(&self.memory_total),
            MEMORY_USED => Some(&self.memory_used),
            CPU_TEMP => Some(&self.cpu_temp),
            FAN_SPEEDS => Some(&self.fan_speeds),
            POWER_SCORE => Some(&self.power_score),
            other => self.extra.get(other),
        }
    }

    /// Text value of an extra field, if the source sent one.
    pub fn extra_str(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Value> {
        match name {
            CPU_USAGE => Some(&mut self.cpu_usage),
            MEMORY_USAGE => Some(&mut self.memory_usage),
            MEMORY_TOTAL => Some(&mut self.memory_total),
            MEMORY_USED => Some(&mut self.memory_used),
            CPU_TEMP => Some(&mut self.cpu_temp),
            FAN_SPEEDS => Some(&mut self.fan_speeds),
            POWER_SCORE => Some(&mut self.power_score),
            _ => None,
        }
    }

    /// Shallow merge: every key in `update` replaces the stored value,
    /// every other field is left as it was. Returns whether anything changed.
    pub fn merge(&mut self, update: &MetricsUpdate) -> bool {
        let mut changed = false;
        for (name, value) in update.fields() {
            changed |= match self.slot_mut(name) {
                Some(slot) => replace(slot, value),
                None => match self.extra.get_mut(name) {
                    Some(slot) => replace(slot, value),
                    None => {
                        self.extra.insert(name.clone(), value.clone());
                        true
                    }
                },
            };
        }
        changed
    }
}

fn replace(slot: &mut Value, value: &Value) -> bool {
    if slot == value {
        return false;
    }
    *slot = value.clone();
    true
}

/// A partial snapshot: zero or more field names mapped to new values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsUpdate {
    fields: Map<String, Value>,
}

impl MetricsUpdate {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

impl From<Map<String, Value>> for MetricsUpdate {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Owner of the single snapshot; counts applied updates
#[derive(Debug, Clone, Default)]
pub struct MetricsStore {
    snapshot: MetricsSnapshot,
    updates_applied: u64,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    pub fn updates_applied(&self) -> u64 {
        self.updates_applied
    }

    pub fn merge(&mut self, update: &MetricsUpdate) -> bool {
        self.updates_applied += 1;
        self.snapshot.merge(update)
    }
}
