pub mod geo;
pub mod osm;

use serde::{Deserialize, Serialize};

/// A single map node. Ids are kept as strings end to end: the decoder
/// treats them as opaque keys and must not fail on non-numeric input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub id: String,
    pub nodes: Vec<String>,
    pub tags: Vec<(String, String)>,
}

/// The serialized map artifact, read and written wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub generator: String,
    pub nodes: Vec<Node>,
    pub ways: Vec<Way>,
}

impl Way {
    /// Value of the first tag with the given key, if any.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
