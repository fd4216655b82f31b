use std::collections::HashSet;

use formats::{Dataset, Hub, Node, NodeSet, NodeType};

use crate::rules::RuleTables;
use crate::view::ViewName;

/// What one view should display.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    pub view: ViewName,
    pub hub: Option<Hub>,
    pub nodes: Vec<Node>,
}

impl FilteredView {
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

/// Whether `node`, listed in `set`, belongs in `view`.
///
/// - local: local-typed nodes of the local list;
/// - regional: regional-typed nodes of the regional list, plus European
///   partners from the global list;
/// - global: non-European nodes of the global list, plus the major European
///   partners so headline partners stay visible worldwide.
pub fn admits(view: ViewName, set: NodeSet, node: &Node, rules: &RuleTables) -> bool {
    match (view, set) {
        (ViewName::Local, NodeSet::Local) => node.node_type == NodeType::Local,
        (ViewName::Regional, NodeSet::Regional) => node.node_type == NodeType::Regional,
        (ViewName::Regional, NodeSet::Global) => rules.is_european_partner(node),
        (ViewName::Global, NodeSet::Global) => {
            !rules.is_european_partner(node) || rules.is_major_european(node)
        }
        _ => false,
    }
}

/// Selects the nodes `view` displays, in dataset order, without repeating an id.
pub fn filter_view(dataset: &Dataset, view: ViewName, rules: &RuleTables) -> FilteredView {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut nodes = Vec::new();

    for &set in view.sources() {
        for node in dataset.nodes(set) {
            if admits(view, set, node, rules) && seen.insert(node.id.as_str()) {
                nodes.push(node.clone());
            }
        }
    }

    FilteredView {
        view,
        hub: dataset.hub.clone(),
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::{admits, filter_view};
    use crate::rules::RuleTables;
    use crate::view::ViewName;
    use formats::{Dataset, Hub, Node, NodeSet, NodeType};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn hub() -> Hub {
        Hub {
            lat: 33.9,
            lon: 35.5,
            title: "ESDU".into(),
            desc: String::new(),
        }
    }

    fn sample() -> Dataset {
        let mut ds = Dataset::with_hub(hub());
        ds.local = vec![
            Node::new("zahle-coop", "Zahle Cooperative", 33.85, 35.9, NodeType::Local),
            Node::new("arsal-farm", "Arsal Farm", 34.18, 36.42, NodeType::Local),
            Node::new("misfiled", "Misfiled", 34.0, 35.6, NodeType::Regional),
        ];
        ds.regional = vec![
            Node::new("amman-ncare", "NCARE Amman", 31.95, 35.93, NodeType::Regional),
            Node::new("cairo-arc", "ARC Cairo", 30.04, 31.24, NodeType::Regional),
            Node::new("untyped", "Untyped", 30.0, 30.0, NodeType::Unclassified),
        ];
        ds.global = vec![
            Node::new("rome-fao", "FAO", 41.88, 12.49, NodeType::Global),
            Node::new("zurich-drosos", "DROSOS", 47.37, 8.54, NodeType::Global),
            Node::new("vienna-boku", "BOKU", 48.2, 16.37, NodeType::Global),
            Node::new("nairobi-icraf", "ICRAF", -1.29, 36.82, NodeType::Global),
            Node::new("dc-worldbank", "World Bank", 38.9, -77.03, NodeType::Global),
            Node::new("brussels-eu", "European Commission", 50.85, 4.35, NodeType::Global),
        ];
        ds
    }

    #[test]
    fn local_keeps_only_local_typed_nodes() {
        let v = filter_view(&sample(), ViewName::Local, &RuleTables::default());
        assert_eq!(v.node_ids(), vec!["zahle-coop", "arsal-farm"]);
        assert!(v.hub.is_some());
    }

    #[test]
    fn regional_appends_european_partners_from_global() {
        let v = filter_view(&sample(), ViewName::Regional, &RuleTables::default());
        assert_eq!(
            v.node_ids(),
            vec![
                "amman-ncare",
                "cairo-arc",
                "rome-fao",
                "zurich-drosos",
                "vienna-boku",
                "brussels-eu"
            ]
        );
    }

    #[test]
    fn global_drops_minor_european_partners() {
        let v = filter_view(&sample(), ViewName::Global, &RuleTables::default());
        assert_eq!(
            v.node_ids(),
            vec!["rome-fao", "nairobi-icraf", "dc-worldbank", "brussels-eu"]
        );
    }

    #[test]
    fn every_output_node_satisfies_its_view_rule_and_ids_are_unique() {
        let rules = RuleTables::default();
        let mut ds = sample();
        // Same id listed twice in one array must still come out once.
        ds.global.push(Node::new("rome-fao", "FAO again", 41.88, 12.49, NodeType::Global));

        for view in ViewName::ALL {
            let v = filter_view(&ds, view, &rules);
            let ids: HashSet<&str> = v.nodes.iter().map(|n| n.id.as_str()).collect();
            assert_eq!(ids.len(), v.nodes.len(), "duplicate ids in {view}");

            for node in &v.nodes {
                let admitted = view
                    .sources()
                    .iter()
                    .any(|set| ds.nodes(*set).contains(node) && admits(view, *set, node, &rules));
                assert!(admitted, "{} does not belong in {view}", node.id);
            }
        }
    }

    #[test]
    fn unclassified_nodes_only_appear_through_unions() {
        let rules = RuleTables::default();
        let untyped = Node::new("untyped", "Untyped", 30.0, 30.0, NodeType::Unclassified);
        assert!(!admits(ViewName::Local, NodeSet::Local, &untyped, &rules));
        assert!(!admits(ViewName::Regional, NodeSet::Regional, &untyped, &rules));
        // The global list is not type-checked.
        assert!(admits(ViewName::Global, NodeSet::Global, &untyped, &rules));
    }

    #[test]
    fn empty_dataset_yields_no_nodes() {
        let ds = Dataset::empty();
        for view in ViewName::ALL {
            let v = filter_view(&ds, view, &RuleTables::default());
            assert!(v.nodes.is_empty());
            assert!(v.hub.is_none());
        }
    }
}
