
use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::StatusCode;

use rackhd_cpi::api::node_dto::NodeDto;
use rackhd_cpi::domain::node_selector::NodeSelector;
use rackhd_cpi::error::Error;

use mock_rackhd::{MockRackHd, node, node_with_disk};

/// Pool with two free nodes and one node for every way of being ineligible.
fn mixed_pool() -> Arc<MockRackHd> {
    let mock = MockRackHd::new()
        .with_node(node("free-1"))
        .with_node(NodeDto { id: "free-2".to_string(), status: "available".to_string(), ..Default::default() })
        .with_node(NodeDto { id: "reserved".to_string(), status: "reserved".to_string(), ..Default::default() })
        .with_node(NodeDto { id: "owned".to_string(), cid: "vm-5f2a".to_string(), ..Default::default() })
        .with_node(node_with_disk("with-disk", "disk-1"))
        .with_node(node("busy"))
        .with_node(node("no-obm"));

    mock.update(|state| {
        state.active_workflows.insert("busy".to_string(), 1);
        state.obm_settings.remove("no-obm");
    });

    Arc::new(mock)
}

#[tokio::test]
async fn test_selection_only_returns_eligible_nodes() {
    let selector = NodeSelector::new(mixed_pool());
    let eligible: HashSet<&str> = ["free-1", "free-2"].into_iter().collect();

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let node_id = selector.select_node(None, &mut rng).await.unwrap();
        assert!(eligible.contains(node_id.as_str()), "seed {} picked ineligible node {}", seed, node_id);
    }
}

#[tokio::test]
async fn test_selection_is_not_first_match() {
    let selector = NodeSelector::new(mixed_pool());
    let mut picked = HashSet::new();

    for seed in 0..64 {
        let mut rng = StdRng::seed_from_u64(seed);
        picked.insert(selector.select_node(None, &mut rng).await.unwrap().to_string());
    }

    assert_eq!(picked.len(), 2);
}

#[tokio::test]
async fn test_same_seed_picks_same_node() {
    let selector = NodeSelector::new(mixed_pool());

    let first = selector.select_node(None, &mut StdRng::seed_from_u64(42)).await.unwrap();
    let second = selector.select_node(None, &mut StdRng::seed_from_u64(42)).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_no_eligible_node_is_reported_as_no_available_nodes() {
    let mock = MockRackHd::new().with_node(NodeDto { id: "owned".to_string(), cid: "vm-1".to_string(), ..Default::default() }).with_node(node("busy"));
    mock.update(|state| {
        state.active_workflows.insert("busy".to_string(), 2);
    });
    let selector = NodeSelector::new(Arc::new(mock));

    let result = selector.select_node(None, &mut StdRng::seed_from_u64(1)).await;
    assert!(matches!(result, Err(Error::NoAvailableNodes)));
}

#[tokio::test]
async fn test_empty_pool_is_reported_as_no_available_nodes() {
    let selector = NodeSelector::new(Arc::new(MockRackHd::new()));

    let result = selector.select_node(None, &mut StdRng::seed_from_u64(1)).await;
    assert!(matches!(result, Err(Error::NoAvailableNodes)));
}

#[tokio::test]
async fn test_catalog_failure_propagates_unchanged() {
    let mock = MockRackHd::new().with_node(node("free-1"));
    mock.update(|state| state.fail_nodes = Some(StatusCode::INTERNAL_SERVER_ERROR));
    let selector = NodeSelector::new(Arc::new(mock));

    match selector.select_node(None, &mut StdRng::seed_from_u64(1)).await {
        Err(Error::UnexpectedResponse { status, body, .. }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("mock failure"));
        }
        other => panic!("expected the catalog error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_disk_hint_excludes_node_carrying_that_disk() {
    let mock = MockRackHd::new().with_node(node_with_disk("with-disk", "disk-9")).with_node(node("free-1"));
    let selector = NodeSelector::new(Arc::new(mock));

    for seed in 0..20 {
        let node_id = selector.select_node(Some("disk-9"), &mut StdRng::seed_from_u64(seed)).await.unwrap();
        assert_eq!(node_id.as_str(), "free-1");
    }
}

#[tokio::test]
async fn test_fetch_nodes_joins_per_node_data() {
    let selector = NodeSelector::new(mixed_pool());
    let nodes = selector.fetch_nodes().await.unwrap();

    let busy = nodes.iter().find(|n| n.id.as_str() == "busy").unwrap();
    let no_obm = nodes.iter().find(|n| n.id.as_str() == "no-obm").unwrap();

    assert_eq!(nodes.len(), 7);
    assert_eq!(busy.active_workflows, 1);
    assert!(no_obm.obm_settings.is_empty());
}

#[tokio::test]
async fn test_clock_seeded_selection_returns_eligible_node() {
    let selector = NodeSelector::new(mixed_pool());
    let node_id = selector.select_node_seeded_from_clock(None).await.unwrap();

    assert!(["free-1", "free-2"].contains(&node_id.as_str()));
}

#[tokio::test]
async fn test_active_workflow_lookup_failure_propagates() {
    let mock = MockRackHd::new().with_node(node("free-1")).with_node(node("free-2"));
    mock.update(|state| state.fail_active_workflows = Some(StatusCode::BAD_GATEWAY));
    let selector = NodeSelector::new(Arc::new(mock));

    match selector.select_node(None, &mut StdRng::seed_from_u64(1)).await {
        Err(Error::UnexpectedResponse { method, url, status, .. }) => {
            assert_eq!(method, "GET");
            assert!(url.ends_with("/workflows/active"));
            assert_eq!(status, StatusCode::BAD_GATEWAY);
        }
        other => panic!("expected the active workflow lookup error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_obm_lookup_failure_propagates() {
    let mock = MockRackHd::new().with_node(node("free-1"));
    mock.update(|state| state.fail_obm = Some(StatusCode::NOT_FOUND));
    let selector = NodeSelector::new(Arc::new(mock));

    match selector.select_node(None, &mut StdRng::seed_from_u64(1)).await {
        Err(Error::UnexpectedResponse { url, status, .. }) => {
            assert!(url.ends_with("/api/common/nodes/free-1"));
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        other => panic!("expected the OBM lookup error, got {:?}", other),
    }
}
