use crate::{
    api::node_dto::{AVAILABLE, NodeDto, ObmSettingDto},
    domain::utils::id::NodeId,
};

/// A node as seen by the selector: the catalog record joined with its
/// per-node active workflow count and OBM settings.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub status: String,
    pub cid: String,
    pub disk_cid: String,
    pub active_workflows: usize,
    pub obm_settings: Vec<ObmSettingDto>,
}

impl Node {
    pub fn from_dto(dto: NodeDto, active_workflows: usize, obm_settings: Vec<ObmSettingDto>) -> Self {
        Node {
            id: NodeId::new(dto.id),
            status: dto.status,
            cid: dto.cid,
            disk_cid: dto.persistent_disk.disk_cid,
            active_workflows,
            obm_settings,
        }
    }

    pub fn has_persistent_disk(&self) -> bool {
        !self.disk_cid.is_empty()
    }

    /// True if the node may be handed out for a new reservation.
    ///
    /// A node carrying `disk_cid_hint` is never reservable; any attached disk already rules it out.
    pub fn is_reservable(&self, disk_cid_hint: Option<&str>) -> bool {
        let status_ok = self.status.is_empty() || self.status == AVAILABLE;
        let hint_ok = match disk_cid_hint {
            Some(hint) if !hint.is_empty() => self.disk_cid != hint,
            _ => true,
        };

        status_ok && self.cid.is_empty() && self.active_workflows == 0 && !self.obm_settings.is_empty() && !self.has_persistent_disk() && hint_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::node_dto::PersistentDiskDto;

    fn obm() -> Vec<ObmSettingDto> {
        vec![ObmSettingDto { service: "ipmi-obm-service".to_string(), config: serde_json::Value::Null }]
    }

    fn free_node() -> Node {
        Node::from_dto(NodeDto { id: "node-1".to_string(), ..Default::default() }, 0, obm())
    }

    #[test]
    fn free_node_is_reservable() {
        assert!(free_node().is_reservable(None));

        let mut available = free_node();
        available.status = AVAILABLE.to_string();
        assert!(available.is_reservable(None));
    }

    #[test]
    fn each_predicate_alone_rules_a_node_out() {
        let mut reserved = free_node();
        reserved.status = "reserved".to_string();
        assert!(!reserved.is_reservable(None));

        let mut owned = free_node();
        owned.cid = "vm-1234".to_string();
        assert!(!owned.is_reservable(None));

        let mut busy = free_node();
        busy.active_workflows = 1;
        assert!(!busy.is_reservable(None));

        let mut no_obm = free_node();
        no_obm.obm_settings.clear();
        assert!(!no_obm.is_reservable(None));

        let mut with_disk = free_node();
        with_disk.disk_cid = "disk-1".to_string();
        assert!(!with_disk.is_reservable(None));
    }

    #[test]
    fn disk_comes_from_persistent_disk_record() {
        let dto = NodeDto {
            id: "node-2".to_string(),
            persistent_disk: PersistentDiskDto { disk_cid: "disk-7".to_string(), location: "/dev/sdb".to_string(), attached: true },
            ..Default::default()
        };
        let node = Node::from_dto(dto, 0, obm());

        assert!(node.has_persistent_disk());
        assert!(!node.is_reservable(Some("disk-7")));
        assert!(!node.is_reservable(Some("disk-other")));
    }

    #[test]
    fn empty_hint_is_ignored() {
        assert!(free_node().is_reservable(Some("")));
    }
}
