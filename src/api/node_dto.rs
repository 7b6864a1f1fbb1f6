use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Status value RackHD uses for a node that is free to be reserved.
pub const AVAILABLE: &str = "available";

/// A node record as returned by `GET /api/common/nodes`.
///
/// OBM settings are not taken from here; they come from the per-node lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDto {
    pub id: String,

    #[serde(default)]
    pub status: String,

    /// Id of the compute instance that owns the node, empty if unreserved.
    #[serde(default)]
    pub cid: String,

    #[serde(default)]
    pub persistent_disk: PersistentDiskDto,

    #[serde(flatten)]
    pub extra_fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistentDiskDto {
    #[serde(default)]
    pub disk_cid: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub attached: bool,
}

/// Out-of-band management settings of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObmSettingDto {
    pub service: String,

    #[serde(default)]
    pub config: serde_json::Value,
}

/// Body of `GET /api/common/nodes/{id}`, of which only the OBM settings are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeObmDto {
    #[serde(rename = "obmSettings", default)]
    pub obm_settings: Vec<ObmSettingDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_node_record_deserializes_with_empty_defaults() {
        let node: NodeDto = serde_json::from_str(r#"{"id": "node-1", "name": "52:54:be:ef:6e:3a"}"#).unwrap();

        assert_eq!(node.id, "node-1");
        assert!(node.status.is_empty());
        assert!(node.cid.is_empty());
        assert!(node.persistent_disk.disk_cid.is_empty());
        assert!(node.extra_fields.contains_key("name"));
    }

    #[test]
    fn listing_obm_settings_stay_untyped() {
        let node: NodeDto = serde_json::from_str(r#"{"id": "node-1", "obmSettings": [{"service": "ipmi-obm-service"}]}"#).unwrap();

        assert!(node.extra_fields.contains_key("obmSettings"));
    }

    #[test]
    fn obm_lookup_body_keeps_settings() {
        let body: NodeObmDto = serde_json::from_str(r#"{"obmSettings": [{"service": "ipmi-obm-service", "config": {"host": "10.0.0.5"}}]}"#).unwrap();

        assert_eq!(body.obm_settings.len(), 1);
        assert_eq!(body.obm_settings[0].service, "ipmi-obm-service");
    }
}
