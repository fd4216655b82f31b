//! Geographic categorization rules.
//!
//! The tables are data, not code, so they can be inspected, tested and
//! overridden from configuration. The matching logic reproduces the site's
//! established behaviour exactly, including its quirks: the MENA deny-list is
//! matched case-sensitively against ids but lower-cased against names, and a
//! node inside the Europe box is accepted as soon as either its id or its
//! name is free of MENA substrings.

use foundation::bounds::LatLonBounds;
use foundation::math::LatLon;
use formats::Node;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    /// Ids always treated as European partners.
    pub european_ids: Vec<String>,
    /// Lower-case substrings of node names that mark a European partner.
    pub european_city_names: Vec<String>,
    /// Inclusive `[south, west, north, east]` box of continental Europe.
    pub europe_box: [f64; 4],
    /// Substrings that veto the Europe box for Middle East / North Africa.
    pub mena_substrings: Vec<String>,
    /// European partners kept in the global view as well.
    pub major_european_ids: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            european_ids: strings(&[
                "rome-fao",
                "rome-ifad",
                "rome-wfp",
                "brussels-eu",
                "barcelona-prima",
                "amsterdam-porticus",
                "amsterdam-seed-to-table",
                "leusden-ruaf",
                "zurich-drosos",
            ]),
            european_city_names: strings(&[
                "rome",
                "brussels",
                "barcelona",
                "amsterdam",
                "leusden",
                "zurich",
                "paris",
                "london",
                "berlin",
                "madrid",
                "lisbon",
                "athens",
            ]),
            europe_box: [35.0, -10.0, 55.0, 40.0],
            mena_substrings: strings(&[
                "beirut",
                "arsal",
                "baalbek",
                "yammouneh",
                "zahle",
                "nabatieh",
                "saida",
                "akkar",
                "shouf",
                "hasbaya",
                "cairo",
                "amman",
                "damascus",
                "baghdad",
                "ramallah",
                "rabat",
                "tunis",
                "algiers",
                "sanaa",
                "riyadh",
                "doha",
                "manama",
                "muscat",
                "abu-dhabi",
                "kuwait",
                "dubai",
                "sharjah",
            ]),
            major_european_ids: strings(&[
                "rome-fao",
                "rome-ifad",
                "rome-wfp",
                "brussels-eu",
                "barcelona-prima",
            ]),
        }
    }
}

impl RuleTables {
    pub fn europe_bounds(&self) -> LatLonBounds {
        let [south, west, north, east] = self.europe_box;
        LatLonBounds::new(LatLon::new(south, west), LatLon::new(north, east))
    }

    pub fn is_european_partner(&self, node: &Node) -> bool {
        let name = node.name.to_lowercase();

        if !name.is_empty()
            && self
                .european_city_names
                .iter()
                .any(|c| name.contains(c.as_str()))
        {
            return true;
        }

        if !node.id.is_empty() && self.european_ids.iter().any(|id| *id == node.id) {
            return true;
        }

        if self.europe_bounds().contains(node.position()) {
            if !node.id.is_empty() && !self.mentions_mena(&node.id) {
                return true;
            }
            if !name.is_empty() && !self.mentions_mena(&name) {
                return true;
            }
        }

        false
    }

    pub fn is_major_european(&self, node: &Node) -> bool {
        self.major_european_ids.iter().any(|id| *id == node.id)
    }

    fn mentions_mena(&self, s: &str) -> bool {
        self.mena_substrings.iter().any(|m| s.contains(m.as_str()))
    }
}
