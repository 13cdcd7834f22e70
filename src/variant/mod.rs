//! Device/simulator variant split
//!
//! For split-capable families (iOS, tvOS, watchOS), optionally inserts one
//! extra grouping layer per enabled side and re-points the affected leaves'
//! parent edges from the family pair to the split pair. Leaves with no side,
//! or whose side is not enabled, keep the plain family fallback.
//!
//! The two sides are independent: either or both may be enabled. A split
//! pair is only created when at least one registered leaf of that family is
//! on that side, so no orphan grouping unit ever exists.

use crate::graph::BuildGraph;
use crate::hierarchy::{group_main, group_test, leaf_main, leaf_test};
use crate::taxonomy::{SplitSide, TargetFamily};
use crate::unit::{LeafUnit, OptionsUnit};

/// Apply the enabled variant splits, returning the split-layer base names
/// created (e.g. `iosSimulator`), in creation order.
pub fn apply_variant_splits(
    graph: &mut BuildGraph,
    options: &OptionsUnit,
    leaves: &[&LeafUnit],
) -> Vec<String> {
    let mut created = Vec::new();

    for family in TargetFamily::split_capable() {
        let family_key = family.group().key();
        if graph.collection(&group_main(family.group())).is_none() {
            continue;
        }

        if options.device_collections {
            split_family(graph, family, family_key, SplitSide::Device, leaves, &mut created);
        }
        if options.simulator_collections {
            split_family(graph, family, family_key, SplitSide::Simulator, leaves, &mut created);
        }
    }

    created
}

fn split_family(
    graph: &mut BuildGraph,
    family: TargetFamily,
    family_key: &str,
    side: SplitSide,
    leaves: &[&LeafUnit],
    created: &mut Vec<String>,
) {
    let members: Vec<&&LeafUnit> = leaves
        .iter()
        .filter(|leaf| leaf.family() == family && leaf.id.simulator_side() == Some(side))
        .collect();
    if members.is_empty() {
        return;
    }

    let base = format!("{family_key}{}", side.infix());
    let split_main = format!("{base}Main");
    let split_test = format!("{base}Test");
    let family_main = group_main(family.group());
    let family_test = group_test(family.group());

    graph.add_dependency(&split_main, &family_main);
    graph.add_dependency(&split_test, &family_test);

    for leaf in members {
        graph.replace_dependency(&leaf_main(&leaf.name), &family_main, &split_main);
        graph.replace_dependency(&leaf_test(&leaf.name), &family_test, &split_test);
    }

    created.push(base);
}
