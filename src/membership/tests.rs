//! Membership Module Tests
//!
//! ## Test Scopes
//! - **Data Structures**: Node id uniqueness, `--peer` parsing and serialization.
//! - **Service Logic**: Seeding, snapshot ordering, add/remove semantics.

#[cfg(test)]
mod tests {
    use crate::membership::service::Membership;
    use crate::membership::types::{Node, NodeId};

    fn node(id: &str, port: u16) -> Node {
        Node::new(id, format!("127.0.0.1:{}", port).parse().unwrap())
    }

    // ============================================================
    // NODE ID / NODE TESTS
    // ============================================================

    #[test]
    fn test_node_id_is_unique() {
        let id1 = NodeId::new();
        let id2 = NodeId::new();

        assert_ne!(id1, id2, "Each NodeId should be unique");
    }

    #[test]
    fn test_parse_peer_argument() {
        let peer: Node = "node-b=10.0.0.2:6001".parse().unwrap();

        assert_eq!(peer.id, NodeId("node-b".to_string()));
        assert_eq!(peer.http_addr, "10.0.0.2:6001".parse().unwrap());
        assert_eq!(peer.base_url(), "http://10.0.0.2:6001");
    }

    #[test]
    fn test_parse_peer_argument_rejects_garbage() {
        assert!("node-b".parse::<Node>().is_err());
        assert!("=10.0.0.2:6001".parse::<Node>().is_err());
        assert!("node-b=not-an-addr".parse::<Node>().is_err());
    }

    #[test]
    fn test_node_serialization() {
        let original = node("node-a", 6000);

        let json = serde_json::to_string(&original).expect("Serialization failed");
        let restored: Node = serde_json::from_str(&json).expect("Deserialization failed");

        assert_eq!(restored, original);
    }

    // ============================================================
    // MEMBERSHIP TESTS
    // ============================================================

    #[test]
    fn test_membership_contains_local_and_peers() {
        let membership = Membership::new(
            node("node-b", 6001),
            vec![node("node-c", 6002), node("node-a", 6000)],
        );

        assert_eq!(membership.member_count(), 3);

        let ids: Vec<String> = membership
            .get_members()
            .into_iter()
            .map(|n| n.id.0)
            .collect();
        assert_eq!(ids, vec!["node-a", "node-b", "node-c"]);
    }

    #[test]
    fn test_membership_ignores_peer_with_local_id() {
        let membership = Membership::new(node("node-a", 6000), vec![node("node-a", 7000)]);

        assert_eq!(membership.member_count(), 1);
        let local = membership.get_member(&NodeId("node-a".to_string())).unwrap();
        assert_eq!(local.http_addr.port(), 6000);
    }

    #[test]
    fn test_add_and_remove_member() {
        let membership = Membership::new(node("node-a", 6000), vec![]);

        membership.add_member(node("node-b", 6001));
        assert_eq!(membership.member_count(), 2);

        let removed = membership.remove_member(&NodeId("node-b".to_string()));
        assert!(removed.is_some());
        assert_eq!(membership.member_count(), 1);
    }

    #[test]
    fn test_local_node_cannot_be_removed() {
        let membership = Membership::new(node("node-a", 6000), vec![]);

        assert!(membership.remove_member(&NodeId("node-a".to_string())).is_none());
        assert_eq!(membership.member_count(), 1);
        assert!(membership.is_local(&NodeId("node-a".to_string())));
    }
}
