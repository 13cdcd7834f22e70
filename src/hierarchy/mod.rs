//! Hierarchy builder
//!
//! Given the final set of requested leaf targets, synthesizes exactly the
//! intermediate grouping collections needed to express shared configuration
//! and wires the `dependsOn` edges: leaf -> family group -> ... -> root.
//!
//! Grouping collections are created lazily, at most once, and only when at
//! least one registered leaf needs them; a family with zero registered
//! leaves contributes nothing anywhere in its subtree. Every grouping unit
//! is a Main/Test collection pair named after its taxonomy key.

use crate::graph::BuildGraph;
use crate::taxonomy::Group;
use crate::unit::LeafUnit;

/// Root main collection every hierarchy hangs off
pub const ROOT_MAIN: &str = "commonMain";

/// Root test collection every hierarchy hangs off
pub const ROOT_TEST: &str = "commonTest";

/// Main-collection name for a grouping node
pub fn group_main(group: Group) -> String {
    format!("{}Main", group.key())
}

/// Test-collection name for a grouping node
pub fn group_test(group: Group) -> String {
    format!("{}Test", group.key())
}

/// Materialize grouping collections and edges for the given leaves.
///
/// Leaves must already be deduplicated and in final application order; the
/// walk is idempotent, so shared ancestors are created by whichever leaf
/// reaches them first. Returns the grouping nodes materialized, in creation
/// order.
pub fn build_hierarchy(graph: &mut BuildGraph, leaves: &[&LeafUnit]) -> Vec<Group> {
    if leaves.is_empty() {
        return Vec::new();
    }

    graph.maybe_create_collection(ROOT_MAIN);
    graph.maybe_create_collection(ROOT_TEST);

    let mut created = Vec::new();

    for leaf in leaves {
        // Walk root-ward ancestors first so each node's parent already exists
        let chain = leaf.family().group().ancestry();
        for group in chain.iter().rev() {
            materialize_group(graph, *group, &mut created);
        }

        // The leaf's own pair wires to its family group, which the chain
        // walk above has just guaranteed
        let family_group = leaf.family().group();
        graph.register_target(&leaf.name, leaf.family());
        graph.add_dependency(&leaf_main(&leaf.name), &group_main(family_group));
        graph.add_dependency(&leaf_test(&leaf.name), &group_test(family_group));
    }

    created
}

/// Main-collection name for a leaf target
pub fn leaf_main(name: &str) -> String {
    format!("{name}Main")
}

/// Test-collection name for a leaf target
pub fn leaf_test(name: &str) -> String {
    format!("{name}Test")
}

fn materialize_group(graph: &mut BuildGraph, group: Group, created: &mut Vec<Group>) {
    let main = group_main(group);
    if graph.collection(&main).is_none() {
        created.push(group);
    }

    let (parent_main, parent_test) = match group.parent() {
        Some(parent) => (group_main(parent), group_test(parent)),
        None => (ROOT_MAIN.to_string(), ROOT_TEST.to_string()),
    };

    graph.add_dependency(&main, &parent_main);
    graph.add_dependency(&group_test(group), &parent_test);
}
