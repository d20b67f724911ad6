use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::FromRow;

use crate::error::AdminError;

pub const DEFAULT_BLOCKED_TIME_REASON: &str = "News Event";

/// Singleton row of `system_settings` (id = 1)
#[derive(Debug, Clone, FromRow)]
pub struct SystemSettingsModel {
    pub id: i32,
    pub global_kill_switch: Option<bool>,
    pub blocked_times: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Daily window in which bots must not open trades
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedTime {
    pub id: i64,
    pub start: String,
    pub end: String,
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_reason() -> String {
    DEFAULT_BLOCKED_TIME_REASON.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemSettings {
    pub global_kill_switch: bool,
    /// Entries of the schedule that decode as a [`BlockedTime`]
    pub blocked_times: Vec<BlockedTime>,
    /// The stored schedule element by element, including entries of any other shape.
    /// Edits are applied to this list so nothing the bots wrote is lost.
    #[serde(skip)]
    pub stored_blocked_times: Vec<Value>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SystemSettingsModel> for SystemSettings {
    fn from(row: SystemSettingsModel) -> Self {
        let stored_blocked_times = parse_stored_blocked_times(row.blocked_times.as_deref().unwrap_or("[]"));
        SystemSettings {
            global_kill_switch: row.global_kill_switch.unwrap_or(false),
            blocked_times: decode_blocked_times(&stored_blocked_times),
            stored_blocked_times,
            updated_at: row.updated_at,
        }
    }
}

/// Split the stored JSON list into its elements. Text that is not a JSON array reads as empty.
pub fn parse_stored_blocked_times(raw: &str) -> Vec<Value> {
    serde_json::from_str::<Vec<Value>>(raw).unwrap_or_default()
}

/// Typed view of the stored elements. Elements of another shape are skipped, not fatal.
pub fn decode_blocked_times(entries: &[Value]) -> Vec<BlockedTime> {
    entries
        .iter()
        .filter_map(|entry| BlockedTime::deserialize(entry).ok())
        .collect()
}

pub fn parse_blocked_times(raw: &str) -> Vec<BlockedTime> {
    decode_blocked_times(&parse_stored_blocked_times(raw))
}

pub fn encode_blocked_times(entries: &[Value]) -> String {
    Value::Array(entries.to_vec()).to_string()
}

/// Append a window given as `HH:MM` start and end. An empty reason falls back to the default.
pub fn add_blocked_time(
    entries: &[Value],
    start: &str,
    end: &str,
    reason: Option<&str>,
    id: i64,
) -> Result<Vec<Value>, AdminError> {
    let start = start.trim();
    let end = end.trim();
    if start.is_empty() || end.is_empty() {
        return Err(AdminError::InvalidBlockedTime("start and end are both required".to_string()));
    }
    for value in [start, end] {
        NaiveTime::parse_from_str(value, "%H:%M")
            .map_err(|_| AdminError::InvalidBlockedTime(format!("{:?} is not a HH:MM time", value)))?;
    }

    let reason = reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .unwrap_or_else(default_reason);

    let mut updated = entries.to_vec();
    updated.push(json!({
        "id": id,
        "start": start,
        "end": end,
        "reason": reason,
    }));
    Ok(updated)
}

/// Drop every element whose numeric id matches. Returns the new list and whether anything was removed.
pub fn remove_blocked_time(entries: &[Value], id: i64) -> (Vec<Value>, bool) {
    let updated: Vec<Value> = entries
        .iter()
        .filter(|entry| entry.get("id").and_then(Value::as_i64) != Some(id))
        .cloned()
        .collect();
    let removed = updated.len() != entries.len();
    (updated, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(id: i64) -> BlockedTime {
        BlockedTime {
            id,
            start: "13:25".to_string(),
            end: "13:45".to_string(),
            reason: "NFP".to_string(),
        }
    }

    fn stored(id: i64) -> Value {
        json!({"id": id, "start": "13:25", "end": "13:45", "reason": "NFP"})
    }

    #[test]
    fn garbage_storage_reads_as_empty() {
        assert!(parse_blocked_times("").is_empty());
        assert!(parse_blocked_times("{\"start\":\"10:00\"}").is_empty());
        assert!(parse_blocked_times("not json").is_empty());
    }

    #[test]
    fn missing_reason_gets_default() {
        let times = parse_blocked_times(r#"[{"id": 1, "start": "08:00", "end": "08:30"}]"#);
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].reason, "News Event");
    }

    #[test]
    fn odd_elements_are_skipped_individually() {
        let raw = r#"[{"id": 1, "start": "08:00", "end": "08:30"}, {"id": "abc", "start": "09:00", "end": "09:15"}, 7]"#;
        let entries = parse_stored_blocked_times(raw);
        assert_eq!(entries.len(), 3);

        let times = decode_blocked_times(&entries);
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].id, 1);
    }

    #[test]
    fn adding_keeps_entries_of_other_shapes() {
        let raw = r#"[{"id": 1, "start": "08:00", "end": "08:30"}, {"id": "abc", "start": "09:00", "end": "09:15"}]"#;
        let entries = parse_stored_blocked_times(raw);

        let updated = add_blocked_time(&entries, "14:00", "14:30", None, 5).unwrap();
        assert_eq!(updated.len(), 3);
        assert_eq!(updated[1], json!({"id": "abc", "start": "09:00", "end": "09:15"}));

        let reread = parse_stored_blocked_times(&encode_blocked_times(&updated));
        assert_eq!(reread, updated);
        let ids: Vec<i64> = decode_blocked_times(&reread).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn adds_window_with_default_reason() {
        let entries = add_blocked_time(&[stored(1)], "14:00", "14:30", Some("  "), 2).unwrap();
        let times = decode_blocked_times(&entries);
        assert_eq!(times.len(), 2);
        assert_eq!(times[1].reason, DEFAULT_BLOCKED_TIME_REASON);
        assert_eq!(times[1].id, 2);
    }

    #[test]
    fn rejects_incomplete_or_malformed_window() {
        assert!(add_blocked_time(&[], "", "14:30", None, 1).is_err());
        assert!(add_blocked_time(&[], "2pm", "14:30", None, 1).is_err());
    }

    #[test]
    fn removes_by_id() {
        let odd = json!({"id": "abc"});
        let (entries, removed) = remove_blocked_time(&[stored(1), odd.clone(), stored(2)], 1);
        assert!(removed);
        assert_eq!(entries, vec![odd, stored(2)]);

        let (entries, removed) = remove_blocked_time(&entries, 42);
        assert!(!removed);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn settings_row_defaults() {
        let settings = SystemSettings::from(SystemSettingsModel {
            id: 1,
            global_kill_switch: None,
            blocked_times: Some(encode_blocked_times(&[stored(5)])),
            updated_at: None,
        });
        assert!(!settings.global_kill_switch);
        assert_eq!(settings.blocked_times, vec![window(5)]);
        assert_eq!(settings.stored_blocked_times, vec![stored(5)]);
    }
}
