// Home Assistant REST API resource types
//
// Plain value types mirroring the JSON resources. Unknown fields are ignored
// on decode; free-form values (attributes, selectors, examples) stay as
// `serde_json::Value` so nothing the server sends is lost.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Open-ended key/value metadata attached to a state, or the payload of a
/// service call / fired event.
pub type Attributes = serde_json::Map<String, Value>;

// ── States ───────────────────────────────────────────────────────────

/// The state of a single entity, as returned by `/states`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub entity_id: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

impl State {
    /// The domain prefix of the entity id (`light` for `light.kitchen`).
    pub fn domain(&self) -> &str {
        self.entity_id
            .split_once('.')
            .map_or(self.entity_id.as_str(), |(domain, _)| domain)
    }

    /// The object id part of the entity id (`kitchen` for `light.kitchen`).
    pub fn object_id(&self) -> Option<&str> {
        self.entity_id.split_once('.').map(|(_, object_id)| object_id)
    }

    /// A string attribute such as `friendly_name`.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// `friendly_name` if set, otherwise the entity id.
    pub fn friendly_name(&self) -> &str {
        self.attribute_str("friendly_name").unwrap_or(&self.entity_id)
    }

    /// `last_changed` parsed as RFC 3339, if present and well-formed.
    pub fn last_changed_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.last_changed.as_deref())
    }

    /// `last_updated` parsed as RFC 3339, if present and well-formed.
    pub fn last_updated_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(self.last_updated.as_deref())
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

/// The context a state change happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Body of `POST /states/{entity_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl StateUpdate {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: None,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

// ── Configuration ────────────────────────────────────────────────────

/// Server configuration snapshot from `GET /config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: i64,
    pub unit_system: UnitSystem,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub config_dir: String,
    #[serde(default)]
    pub whitelist_external_dirs: Vec<String>,
    #[serde(default)]
    pub allowlist_external_dirs: Vec<String>,
    #[serde(default)]
    pub allowlist_external_urls: Vec<String>,
    pub version: String,
    #[serde(default)]
    pub config_source: String,
    #[serde(default)]
    pub safe_mode: bool,
    /// Run state of the server (`RUNNING`, `NOT_RUNNING`, ...).
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub internal_url: Option<String>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: String,
}

/// Units the server reports values in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSystem {
    pub length: String,
    pub accumulated_precipitation: String,
    pub mass: String,
    pub pressure: String,
    pub temperature: String,
    pub volume: String,
    pub wind_speed: String,
}

// ── Services ─────────────────────────────────────────────────────────

/// A domain and the services it exposes, from `GET /services`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDomain {
    pub domain: String,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, ServiceField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ServiceTarget>,
}

/// A single input field of a service. `selector` is an arbitrary UI
/// descriptor and is kept untyped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Value>,
}

/// Which entities, devices and areas a service may target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceTarget {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entity: Vec<EntityFilter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub device: Vec<DeviceFilter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub area: Vec<AreaFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityFilter {
    #[serde(deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub domain: Vec<String>,
    #[serde(deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub integration: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceFilter {
    #[serde(deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub integration: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaFilter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entity: Vec<EntityFilter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub device: Vec<DeviceFilter>,
}

/// Filter qualifiers arrive either as `"light"` or `["light", "switch"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}

// ── Events ───────────────────────────────────────────────────────────

/// An event type and how many listeners are subscribed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventListener {
    pub event: String,
    pub listener_count: u64,
}

// ── Status ───────────────────────────────────────────────────────────

/// `{"message": "..."}` responses: API status and fired-event acknowledgements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn state_decodes_heterogeneous_attributes() {
        let state: State = serde_json::from_value(json!({
            "entity_id": "light.living_room",
            "state": "on",
            "attributes": {
                "brightness": 255,
                "friendly_name": "Living Room",
                "rgb_color": [255, 128, 0],
                "supported": true,
                "effect": null,
                "extra": { "nested": 1.5 }
            },
            "last_changed": "2024-01-15T10:30:00.123456+00:00",
            "last_updated": "2024-01-15T10:30:00+00:00",
            "context": { "id": "01HM", "parent_id": null, "user_id": "abc" },
            "unknown_field": "ignored"
        }))
        .unwrap();

        assert_eq!(state.domain(), "light");
        assert_eq!(state.object_id(), Some("living_room"));
        assert_eq!(state.friendly_name(), "Living Room");
        assert_eq!(state.attributes["brightness"], json!(255));
        assert_eq!(state.attributes["rgb_color"], json!([255, 128, 0]));
        assert!(state.attributes["effect"].is_null());
        assert_eq!(state.attributes["extra"]["nested"], json!(1.5));

        let context = state.context.as_ref().unwrap();
        assert_eq!(context.parent_id, None);
        assert_eq!(context.user_id.as_deref(), Some("abc"));
        assert!(state.last_changed_at().is_some());
        assert!(state.last_updated_at().is_some());
    }

    #[test]
    fn state_without_optional_fields() {
        let state: State =
            serde_json::from_value(json!({ "entity_id": "sun.sun", "state": "above_horizon" }))
                .unwrap();
        assert!(state.attributes.is_empty());
        assert!(state.context.is_none());
        assert!(state.last_changed_at().is_none());
        assert_eq!(state.friendly_name(), "sun.sun");
    }

    #[test]
    fn state_missing_entity_id_is_rejected() {
        let result = serde_json::from_value::<State>(json!({ "state": "on" }));
        assert!(result.is_err());
    }

    #[test]
    fn state_update_omits_absent_attributes() {
        let body = serde_json::to_value(StateUpdate::new("on")).unwrap();
        assert_eq!(body, json!({ "state": "on" }));

        let mut attributes = Attributes::new();
        attributes.insert("radius".into(), json!(100));
        let body = serde_json::to_value(StateUpdate::new("zoning").with_attributes(attributes))
            .unwrap();
        assert_eq!(body, json!({ "state": "zoning", "attributes": { "radius": 100 } }));
    }

    #[test]
    fn service_target_accepts_string_or_list_qualifiers() {
        let definition: ServiceDefinition = serde_json::from_value(json!({
            "name": "Turn on",
            "fields": {
                "brightness": {
                    "required": false,
                    "example": 120,
                    "selector": { "number": { "min": 0, "max": 255 } }
                }
            },
            "target": {
                "entity": [{ "domain": ["light"] }, { "domain": "switch", "integration": "hue" }],
                "device": [{ "integration": "hue" }],
                "area": [{}]
            }
        }))
        .unwrap();

        let target = definition.target.unwrap();
        assert_eq!(target.entity[0].domain, vec!["light"]);
        assert_eq!(target.entity[1].domain, vec!["switch"]);
        assert_eq!(target.entity[1].integration, vec!["hue"]);
        assert_eq!(target.device[0].integration, vec!["hue"]);
        assert_eq!(target.area.len(), 1);

        let field = &definition.fields["brightness"];
        assert!(!field.required);
        assert_eq!(field.example, Some(json!(120)));
        assert_eq!(field.selector.as_ref().unwrap()["number"]["max"], json!(255));
    }

    #[test]
    fn config_tolerates_missing_optional_fields() {
        let config: Config = serde_json::from_value(json!({
            "latitude": 52.37,
            "longitude": 4.89,
            "unit_system": { "length": "km", "temperature": "°C" },
            "version": "2024.1.0",
            "components": ["light", "zone"],
            "safe_mode": false,
            "new_field_from_future_release": 1
        }))
        .unwrap();

        assert_eq!(config.version, "2024.1.0");
        assert_eq!(config.unit_system.temperature, "°C");
        assert_eq!(config.components, vec!["light", "zone"]);
        assert!(config.country.is_none());
    }

    #[test]
    fn event_listener_count_must_be_non_negative() {
        let ok: EventListener =
            serde_json::from_value(json!({ "event": "state_changed", "listener_count": 5 }))
                .unwrap();
        assert_eq!(ok.listener_count, 5);

        let negative =
            serde_json::from_value::<EventListener>(json!({ "event": "x", "listener_count": -1 }));
        assert!(negative.is_err());
    }
}
