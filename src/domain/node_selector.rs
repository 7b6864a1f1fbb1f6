use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    domain::{node::Node, rackhd::rackhd_trait::RackHdApi, utils::id::NodeId},
    error::{Error, Result},
};

/// Picks a free node out of the RackHD inventory.
///
/// Selection is advisory only: nothing is claimed on the server, so two callers
/// may pick the same node. Whoever reserves the node afterwards has to detect
/// the conflict and select again.
#[derive(Clone)]
pub struct NodeSelector {
    api: Arc<dyn RackHdApi>,
}

impl NodeSelector {
    pub fn new(api: Arc<dyn RackHdApi>) -> Self {
        NodeSelector { api }
    }

    /// Same as [`NodeSelector::select_node`] with a generator seeded from the wall clock at call time.
    pub async fn select_node_seeded_from_clock(&self, disk_cid_hint: Option<&str>) -> Result<NodeId> {
        let seed = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or_default();
        let mut rng = StdRng::seed_from_u64(seed);
        self.select_node(disk_cid_hint, &mut rng).await
    }

    pub async fn select_node<R: Rng + Send + ?Sized>(&self, disk_cid_hint: Option<&str>, rng: &mut R) -> Result<NodeId> {
        let nodes = self.fetch_nodes().await?;
        let node_id = choose_available_node(&nodes, disk_cid_hint, rng)?;

        log::info!("selected node {}", node_id);
        Ok(node_id)
    }

    /// Reads the inventory and joins every node with its active workflows and OBM settings.
    pub async fn fetch_nodes(&self) -> Result<Vec<Node>> {
        let dtos = self.api.get_nodes().await?;
        let mut nodes = Vec::with_capacity(dtos.len());

        for dto in dtos {
            let node_id = NodeId::new(dto.id.clone());
            let active_workflows = self.api.get_active_workflows(&node_id).await?;
            let obm_settings = self.api.get_obm_settings(&node_id).await?;
            nodes.push(Node::from_dto(dto, active_workflows.len(), obm_settings));
        }

        Ok(nodes)
    }
}

pub fn available_nodes<'a>(nodes: &'a [Node], disk_cid_hint: Option<&str>) -> Vec<&'a Node> {
    nodes
        .iter()
        .filter(|node| {
            let available = node.is_reservable(disk_cid_hint);
            if available {
                log::debug!("node: {} is available", node.id);
            }
            available
        })
        .collect()
}

/// Uniform random choice among the reservable nodes.
pub fn choose_available_node<R: Rng + ?Sized>(nodes: &[Node], disk_cid_hint: Option<&str>, rng: &mut R) -> Result<NodeId> {
    let candidates = available_nodes(nodes, disk_cid_hint);

    match candidates.choose(rng) {
        Some(node) => Ok(node.id.clone()),
        None => {
            log::warn!("none of {} nodes is available for reservation", nodes.len());
            Err(Error::NoAvailableNodes)
        }
    }
}
