//! Measurements and their append-only history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named body measurements, e.g. `{"chest": 38, "sleeve": 24.5}`. Values are
/// kept as the client sent them.
pub type BodyMeasurements = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
  #[serde(rename = "_id")]
  pub measurement_id:        Uuid,
  #[serde(rename = "customer_id")]
  pub customer_id:           Uuid,
  pub measurements:          BodyMeasurements,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub customer_requirements: Option<String>,
  /// Durable URL of the uploaded drawing.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub drawing:               Option<String>,
  pub created_at:            DateTime<Utc>,
}

/// Input to [`crate::store::Store::add_measurement`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
  pub customer_id:           Uuid,
  pub measurements:          BodyMeasurements,
  pub customer_requirements: Option<String>,
  pub drawing:               Option<String>,
}

/// One row per measurement event. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementHistory {
  #[serde(rename = "_id")]
  pub history_id:     Uuid,
  #[serde(rename = "measurement_id")]
  pub measurement_id: Uuid,
  #[serde(rename = "customer_id")]
  pub customer_id:    Uuid,
  pub recorded_at:    DateTime<Utc>,
}
