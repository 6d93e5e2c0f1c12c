//! Application records.
//!
//! An `Application` is one entry in the `applications` collection, kept as
//! the exact JSON value the store holds. The core only reads `id`, `status`,
//! `type` and `discordUsername`, and only writes `status` and `updatedAt` on
//! the record it mutates. Every other field, and every record the core never
//! touches, is written back byte for byte, whatever its shape.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppdeskError, AppdeskResult};

/// Status assigned to every new submission.
pub const STATUS_PENDING: &str = "pending";

/// Keys the repository owns. A submission may not set them.
const RESERVED_KEYS: [&str; 4] = ["id", "status", "submittedAt", "updatedAt"];

/// Generate a fresh, opaque application or audit entry identifier.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Render a timestamp the way stored records carry it:
/// `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A single submitted application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Application(Value);

impl Application {
    /// Build a pending application from a raw submission body.
    ///
    /// The body must be a JSON object; its fields are carried through as-is.
    /// Reserved keys in the body are ignored: the identifier, status and both
    /// timestamps always come from the caller.
    pub fn from_submission(payload: Value, id: String, now: DateTime<Utc>) -> AppdeskResult<Self> {
        let Value::Object(mut fields) = payload else {
            return Err(AppdeskError::MalformedPayload {
                reason: "submission body must be a JSON object".to_string(),
            });
        };

        for key in RESERVED_KEYS {
            fields.remove(key);
        }

        let stamp = format_timestamp(now);
        let mut record = Map::with_capacity(fields.len() + RESERVED_KEYS.len());
        record.insert("id".to_string(), Value::String(id));
        record.extend(fields);
        record.insert("status".to_string(), Value::String(STATUS_PENDING.to_string()));
        record.insert("submittedAt".to_string(), Value::String(stamp.clone()));
        record.insert("updatedAt".to_string(), Value::String(stamp));

        Ok(Self(Value::Object(record)))
    }

    /// The record's id, when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// The current status, when it is a string.
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// The raw `type` field, of any JSON type.
    pub fn kind(&self) -> Option<&Value> {
        self.0.get("type")
    }

    /// The raw `discordUsername` field, of any JSON type.
    pub fn discord_username(&self) -> Option<&Value> {
        self.0.get("discordUsername")
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("submittedAt")
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("updatedAt")
    }

    /// Any field by its wire name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Replace `status` and stamp `updatedAt`.
    ///
    /// Returns the previous status value (`Null` when the record had none),
    /// or `None` if the record is not an object and was left alone.
    pub fn set_status(&mut self, status: &str, now: DateTime<Utc>) -> Option<Value> {
        let fields = self.0.as_object_mut()?;
        let previous = fields
            .insert("status".to_string(), Value::String(status.to_string()))
            .unwrap_or(Value::Null);
        fields.insert("updatedAt".to_string(), Value::String(format_timestamp(now)));
        Some(previous)
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.0.get(key)?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }
}

impl From<Value> for Application {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
