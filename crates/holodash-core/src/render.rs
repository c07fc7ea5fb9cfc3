//! Projection of a [`MetricsSnapshot`] onto the dashboard's text fields.
//!
//! Every formatter accepts any JSON value and always yields a string: numbers
//! are formatted, strings pass through untouched (except numeric power
//! scores, which are scaled like numbers), anything else is shown as compact
//! JSON.

use crate::{ConnectionStatus, MetricsSnapshot};
use serde_json::Value;

pub const TEMP_UNAVAILABLE: &str = "Temp: N/A";
pub const FAN_FALLBACK: &str = "Fan: 0 RPM";
pub const POWER_NO_DATA: &str = "Power: ---";

/// Source power units per watt
pub const POWER_SCALE: f64 = 100_000.0;

const FAN_SEPARATOR: &str = " / ";

/// Addressable text regions of the display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayField {
    Cpu,
    Memory,
    Temperature,
    Fan,
    Power,
}

impl DisplayField {
    pub const ALL: [DisplayField; 5] = [
        DisplayField::Cpu,
        DisplayField::Memory,
        DisplayField::Temperature,
        DisplayField::Fan,
        DisplayField::Power,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu-text",
            Self::Memory => "mem-text",
            Self::Temperature => "temp-text",
            Self::Fan => "fan-text",
            Self::Power => "power-text",
        }
    }
}

/// Where rendered text ends up
pub trait DisplaySurface {
    fn set_text(&mut self, field: DisplayField, text: &str);

    fn set_status(&mut self, status: ConnectionStatus);

    /// Host description line, when the source reports one
    fn set_host(&mut self, _host: Option<&str>) {}

    /// Called once every field of a render pass has been written
    fn commit(&mut self) {}
}

/// The five formatted field values for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFields {
    pub cpu: String,
    pub memory: String,
    pub temperature: String,
    pub fan: String,
    pub power: String,
}

impl RenderedFields {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        Self {
            cpu: cpu_text(&snapshot.cpu_usage),
            memory: memory_text(&snapshot.memory_usage),
            temperature: temp_text(&snapshot.cpu_temp),
            fan: fan_text(&snapshot.fan_speeds),
            power: power_text(&snapshot.power_score),
        }
    }

    pub fn get(&self, field: DisplayField) -> &str {
        match field {
            DisplayField::Cpu => &self.cpu,
            DisplayField::Memory => &self.memory,
            DisplayField::Temperature => &self.temperature,
            DisplayField::Fan => &self.fan,
            DisplayField::Power => &self.power,
        }
    }

    pub fn set(&mut self, field: DisplayField, text: &str) {
        let slot = match field {
            DisplayField::Cpu => &mut self.cpu,
            DisplayField::Memory => &mut self.memory,
            DisplayField::Temperature => &mut self.temperature,
            DisplayField::Fan => &mut self.fan,
            DisplayField::Power => &mut self.power,
        };
        slot.clear();
        slot.push_str(text);
    }

    /// All five fields on one line, in display order
    pub fn summary_line(&self) -> String {
        DisplayField::ALL
            .iter()
            .map(|field| self.get(*field))
            .collect::<Vec<_>>()
            .join("  |  ")
    }
}

impl Default for RenderedFields {
    fn default() -> Self {
        Self::from_snapshot(&MetricsSnapshot::default())
    }
}

/// Write every field of `snapshot` into `surface`.
pub fn render(snapshot: &MetricsSnapshot, surface: &mut dyn DisplaySurface) {
    let fields = RenderedFields::from_snapshot(snapshot);
    for field in DisplayField::ALL {
        surface.set_text(field, fields.get(field));
    }
    surface.set_host(host_line(snapshot).as_deref());
    surface.commit();
}

pub fn cpu_text(value: &Value) -> String {
    format!("CPU: {}%", fixed(value, 1))
}

pub fn memory_text(value: &Value) -> String {
    format!("Memory: {}%", fixed(value, 1))
}

pub fn temp_text(value: &Value) -> String {
    if value.is_null() {
        return TEMP_UNAVAILABLE.to_string();
    }
    format!("Temp: {}°C", fixed(value, 0))
}

pub fn fan_text(value: &Value) -> String {
    match value {
        Value::Array(speeds) if !speeds.is_empty() => {
            let joined = speeds
                .iter()
                .map(fan_entry)
                .collect::<Vec<_>>()
                .join(FAN_SEPARATOR);
            format!("Fan: {} RPM", joined)
        }
        _ => FAN_FALLBACK.to_string(),
    }
}

pub fn power_text(value: &Value) -> String {
    match value {
        Value::Null => POWER_NO_DATA.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(score) => format!("Power: {} W", fixed_f64(score / POWER_SCALE, 1)),
            None => format!("Power: {} W", n),
        },
        Value::String(s) => match numeric_str(s) {
            Some(score) => format!("Power: {} W", fixed_f64(score / POWER_SCALE, 1)),
            None => format!("Power: {} W", s),
        },
        other => format!("Power: {} W", passthrough(other)),
    }
}

/// `hostname · os_name`, from whichever of the two the source sent
pub fn host_line(snapshot: &MetricsSnapshot) -> Option<String> {
    let parts: Vec<&str> = ["hostname", "os_name"]
        .iter()
        .filter_map(|key| snapshot.extra_str(key))
        .filter(|s| !s.trim().is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

fn fixed(value: &Value, decimals: usize) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(x) => fixed_f64(x, decimals),
            None => n.to_string(),
        },
        Value::Null => "--".to_string(),
        other => passthrough(other),
    }
}

/// Fixed-point text where exact ties round away from zero; every other value
/// rounds to the nearest representable decimal.
fn fixed_f64(x: f64, decimals: usize) -> String {
    let exp = decimals as i32;
    // x sits exactly halfway between two candidates iff x * 2^(d+1) is an odd integer
    let doubled = x * 2f64.powi(exp + 1);
    let tie = doubled.is_finite() && doubled.fract() == 0.0 && doubled % 2.0 != 0.0;
    if !tie {
        return format!("{:.*}", decimals, x);
    }
    let scale = 10f64.powi(exp);
    let rounded = (x.abs() * scale).ceil().copysign(x);
    format!("{:.*}", decimals, rounded / scale)
}

fn numeric_str(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

fn fan_entry(value: &Value) -> String {
    match value {
        Value::Number(_) => fixed(value, 0),
        Value::Null => String::new(),
        other => passthrough(other),
    }
}

fn passthrough(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricsUpdate;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingSurface {
        texts: HashMap<&'static str, String>,
        writes: usize,
        host: Option<String>,
        commits: usize,
    }

    impl DisplaySurface for RecordingSurface {
        fn set_text(&mut self, field: DisplayField, text: &str) {
            self.writes += 1;
            self.texts.insert(field.id(), text.to_string());
        }

        fn set_status(&mut self, _status: ConnectionStatus) {}

        fn set_host(&mut self, host: Option<&str>) {
            self.host = host.map(str::to_string);
        }

        fn commit(&mut self) {
            self.commits += 1;
        }
    }

    fn snapshot_with(value: Value) -> MetricsSnapshot {
        let mut snapshot = MetricsSnapshot::default();
        if let Value::Object(map) = value {
            snapshot.merge(&MetricsUpdate::new(map));
        }
        snapshot
    }

    #[test]
    fn test_cpu_one_decimal() {
        let fields = RenderedFields::from_snapshot(&snapshot_with(json!({"cpu_usage": 42.36})));
        assert_eq!(fields.cpu, "CPU: 42.4%");
    }

    #[test]
    fn test_default_snapshot_rendering() {
        let fields = RenderedFields::default();
        assert_eq!(fields.cpu, "CPU: 0.0%");
        assert_eq!(fields.memory, "Memory: 0.0%");
        assert_eq!(fields.temperature, TEMP_UNAVAILABLE);
        assert_eq!(fields.fan, FAN_FALLBACK);
        assert_eq!(fields.power, POWER_NO_DATA);
    }

    #[test]
    fn test_temperature_null_then_value() {
        let mut snapshot = snapshot_with(json!({"cpu_temp": null}));
        assert_eq!(RenderedFields::from_snapshot(&snapshot).temperature, "Temp: N/A");

        if let Value::Object(map) = json!({"cpu_temp": 55.2}) {
            snapshot.merge(&MetricsUpdate::new(map));
        }
        assert_eq!(RenderedFields::from_snapshot(&snapshot).temperature, "Temp: 55°C");
    }

    #[test]
    fn test_fan_speeds() {
        assert_eq!(fan_text(&json!([])), "Fan: 0 RPM");
        assert_eq!(fan_text(&json!([1200.4, 980.9])), "Fan: 1200 / 981 RPM");
        assert_eq!(fan_text(&json!([1500, "stalled"])), "Fan: 1500 / stalled RPM");
        assert_eq!(fan_text(&json!(null)), "Fan: 0 RPM");
        assert_eq!(fan_text(&json!("1200")), "Fan: 0 RPM");
    }

    #[test]
    fn test_power_scaled_to_watts() {
        assert_eq!(power_text(&json!(250000)), "Power: 2.5 W");
        assert_eq!(power_text(&json!(null)), "Power: ---");
        assert_eq!(power_text(&json!(0)), "Power: 0.0 W");
    }

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        assert_eq!(cpu_text(&json!(0.25)), "CPU: 0.3%");
        assert_eq!(memory_text(&json!(12.75)), "Memory: 12.8%");
        assert_eq!(temp_text(&json!(54.5)), "Temp: 55°C");
        assert_eq!(fan_text(&json!([1200.5, 2.5])), "Fan: 1201 / 3 RPM");
        assert_eq!(cpu_text(&json!(-0.25)), "CPU: -0.3%");
        assert_eq!(power_text(&json!(25000)), "Power: 0.3 W");
    }

    #[test]
    fn test_near_ties_follow_stored_value() {
        // 55.55 and 1.005 are stored just below the halfway point
        assert_eq!(memory_text(&json!(55.55)), "Memory: 55.5%");
        assert_eq!(fixed_f64(1.005, 2), "1.00");
        assert_eq!(cpu_text(&json!(42.36)), "CPU: 42.4%");
        assert_eq!(temp_text(&json!(54.49)), "Temp: 54°C");
    }

    #[test]
    fn test_power_numeric_string_scaled() {
        assert_eq!(power_text(&json!("250000")), "Power: 2.5 W");
        assert_eq!(power_text(&json!(" 1234567 ")), "Power: 12.3 W");
        assert_eq!(power_text(&json!("n/a")), "Power: n/a W");
        assert_eq!(power_text(&json!("inf")), "Power: inf W");
    }

    #[test]
    fn test_malformed_values_never_panic() {
        let weird = [
            json!(null),
            json!(true),
            json!("abc"),
            json!([1, [2], {"x": 3}]),
            json!({"nested": null}),
            json!(u64::MAX),
            json!(-0.04),
        ];
        for value in weird.iter() {
            let _ = cpu_text(value);
            let _ = memory_text(value);
            let _ = temp_text(value);
            let _ = fan_text(value);
            let _ = power_text(value);
        }
        assert_eq!(cpu_text(&json!("busy")), "CPU: busy%");
        assert_eq!(memory_text(&json!(null)), "Memory: --%");
        assert_eq!(temp_text(&json!("hot")), "Temp: hot°C");
        assert_eq!(power_text(&json!("n/a")), "Power: n/a W");
    }

    #[test]
    fn test_render_writes_all_fields() {
        let snapshot = snapshot_with(json!({
            "cpu_usage": 10,
            "memory_usage": 55.55,
            "cpu_temp": 70.6,
            "fan_speeds": [2000],
            "power_score": 1234567,
            "hostname": "studio",
            "os_name": "macOS",
        }));
        let mut surface = RecordingSurface::default();
        render(&snapshot, &mut surface);

        assert_eq!(surface.writes, 5);
        assert_eq!(surface.commits, 1);
        assert_eq!(surface.texts["cpu-text"], "CPU: 10.0%");
        assert_eq!(surface.texts["mem-text"], "Memory: 55.5%");
        assert_eq!(surface.texts["temp-text"], "Temp: 71°C");
        assert_eq!(surface.texts["fan-text"], "Fan: 2000 RPM");
        assert_eq!(surface.texts["power-text"], "Power: 12.3 W");
        assert_eq!(surface.host.as_deref(), Some("studio · macOS"));
    }

    #[test]
    fn test_summary_line_order() {
        let fields = RenderedFields::default();
        let line = fields.summary_line();
        assert!(line.starts_with("CPU: 0.0%"));
        assert!(line.ends_with("Power: ---"));
    }
}
