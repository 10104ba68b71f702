//! Integration tests for bb-model.

use bb_model::{
    DiagramBuilder, ElementIndex, ElementKind, ModelError, NodeShape, ValidationIssue,
    validate_diagram,
};

#[test]
fn build_nested_assembly() {
    // Robot -> x2 Arm { Bolt, Wrist { Servo } }
    let mut builder = DiagramBuilder::new();
    builder
        .direction("LR")
        .add_node("Robot", "Robot")
        .add_shaped_node("Bolt", "M3 bolt", NodeShape::Circle)
        .add_shaped_node("Servo", "Servo", NodeShape::Stadium)
        .add_subgraph("Arm", "Arm assembly")
        .add_member("Arm", "Bolt")
        .add_nested_subgraph("Arm", "Wrist", "Wrist")
        .add_member("Wrist", "Servo")
        .add_labeled_edge("Robot", "Arm", "x2");

    let diagram = builder.build().unwrap();

    assert_eq!(diagram.direction, "LR");
    assert_eq!(diagram.nodes.len(), 3);
    assert_eq!(diagram.subgraphs.len(), 2);
    assert_eq!(diagram.root_node_ids, vec!["Robot".to_string()]);
    assert_eq!(diagram.top_level, vec!["Arm".to_string()]);
    assert_eq!(diagram.get_node("Bolt").unwrap().shape, NodeShape::Circle);
    assert_eq!(diagram.container_of("Servo").unwrap().id, "Wrist");
    assert!(diagram.container_of("Robot").is_none());

    let index = ElementIndex::from_diagram(&diagram).unwrap();
    let arm = index.id_of("Arm").unwrap();
    assert_eq!(index.kind(arm), ElementKind::Container);
    let members: Vec<&str> = index.members(arm).iter().map(|&m| index.key(m)).collect();
    assert_eq!(members, vec!["Bolt", "Wrist"]);
    assert_eq!(index.entry_points(&diagram), vec![index.id_of("Robot").unwrap()]);
}

#[test]
fn dangling_edge_target_is_a_structural_error() {
    let mut builder = DiagramBuilder::new();
    builder.add_node("A", "A").add_edge("A", "Nope");
    let diagram = builder.build_unchecked();

    let err = validate_diagram(&diagram).unwrap_err();
    assert!(matches!(err, ModelError::Structural { .. }));
    assert_eq!(
        err.issues(),
        &[ValidationIssue::DanglingEdgeTarget {
            edge: 0,
            id: "Nope".into()
        }]
    );
    assert!(err.to_string().contains("Nope"));
}

#[test]
fn cyclic_children_still_validate() {
    // Cycles are a traversal concern; the reference pass only checks that
    // every id exists, so A <-> B builds fine.
    let mut builder = DiagramBuilder::new();
    builder
        .add_subgraph("A", "A")
        .add_nested_subgraph("A", "B", "B")
        .link_child("B", "A");
    let diagram = builder.build().unwrap();
    assert_eq!(diagram.get_subgraph("B").unwrap().children, vec!["A"]);
    assert_eq!(diagram.get_subgraph("A").unwrap().children, vec!["B"]);
}
