use foundation::math::LatLon;
use serde::{Deserialize, Serialize};

/// The organization's anchor point, drawn in every view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hub {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
}

impl Hub {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

/// Declared category of a partner location.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Local,
    Regional,
    Global,
    /// Missing or unrecognised `type`; never matches a type rule.
    #[default]
    #[serde(other)]
    Unclassified,
}

/// A partner location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: NodeType,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        node_type: NodeType,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            title: name.clone(),
            name,
            lat,
            lon,
            desc: String::new(),
            logo: None,
            website: None,
            node_type,
        }
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

/// Which of the three dataset arrays a node was listed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSet {
    Local,
    Regional,
    Global,
}

impl NodeSet {
    pub const ALL: [NodeSet; 3] = [NodeSet::Local, NodeSet::Regional, NodeSet::Global];

    pub fn key(self) -> &'static str {
        match self {
            NodeSet::Local => "local",
            NodeSet::Regional => "regional",
            NodeSet::Global => "global",
        }
    }
}

impl std::fmt::Display for NodeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Hub plus partner arrays, after hygiene and validation.
///
/// Deserializing goes through [`dataset_from_value`](crate::dataset_from_value),
/// so serde input gets the same hygiene and record checks as a loaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Dataset {
    pub hub: Option<Hub>,
    pub local: Vec<Node>,
    pub regional: Vec<Node>,
    pub global: Vec<Node>,
}

impl Dataset {
    /// No hub and no nodes; what an absent dataset loads as.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_hub(hub: Hub) -> Self {
        Self {
            hub: Some(hub),
            ..Self::default()
        }
    }

    pub fn nodes(&self, set: NodeSet) -> &[Node] {
        match set {
            NodeSet::Local => &self.local,
            NodeSet::Regional => &self.regional,
            NodeSet::Global => &self.global,
        }
    }

    pub fn nodes_mut(&mut self, set: NodeSet) -> &mut Vec<Node> {
        match set {
            NodeSet::Local => &mut self.local,
            NodeSet::Regional => &mut self.regional,
            NodeSet::Global => &mut self.global,
        }
    }

    pub fn node_count(&self) -> usize {
        self.local.len() + self.regional.len() + self.global.len()
    }
}
