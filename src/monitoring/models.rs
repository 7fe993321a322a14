//! Machine and monitoring point payloads.
//!
//! Only the fields the client acts on are typed. Everything else the
//! backend sends is kept in `extra` so a read-modify-write returns the
//! resource unchanged apart from the intended edit.

use serde::{Deserialize, Deserializer, Serialize};

/// A monitoring point attached to a machine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonitoringPoint {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MonitoringPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// A machine and its ordered monitoring points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(
        rename = "monitoringPoints",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub monitoring_points: Vec<MonitoringPoint>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Machine {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            monitoring_points: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Builder: set the monitoring points.
    pub fn with_points(mut self, points: impl IntoIterator<Item = MonitoringPoint>) -> Self {
        self.monitoring_points = points.into_iter().collect();
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<MonitoringPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<MonitoringPoint>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_machine_preserves_unknown_fields() {
        let raw = json!({
            "_id": "m1",
            "name": "Pump 3",
            "type": "Pump",
            "monitoringPoints": [{"id": "p1", "sensor": {"model": "TcAg"}}]
        });

        let machine: Machine = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(machine.id, "m1");
        assert_eq!(machine.monitoring_points[0].id.as_deref(), Some("p1"));
        assert_eq!(machine.extra["name"], "Pump 3");

        assert_eq!(serde_json::to_value(&machine).unwrap(), raw);
    }

    #[test]
    fn test_missing_or_null_points_become_empty() {
        let missing: Machine = serde_json::from_value(json!({"_id": "m1"})).unwrap();
        let null: Machine =
            serde_json::from_value(json!({"_id": "m1", "monitoringPoints": null})).unwrap();

        assert!(missing.monitoring_points.is_empty());
        assert!(null.monitoring_points.is_empty());
    }

    #[test]
    fn test_point_accepts_mongo_id() {
        let point: MonitoringPoint = serde_json::from_value(json!({"_id": "p9"})).unwrap();
        assert_eq!(point.id.as_deref(), Some("p9"));
        assert_eq!(serde_json::to_value(&point).unwrap(), json!({"id": "p9"}));
    }

    #[test]
    fn test_point_without_id_serializes_without_id() {
        let mut point = MonitoringPoint::default();
        point.extra.insert("name".to_string(), json!("Inlet"));
        assert_eq!(serde_json::to_value(&point).unwrap(), json!({"name": "Inlet"}));
    }
}
