//! Builds a weighted, directed adjacency graph from a serialized map.
//!
//! Decoding is best-effort by design: the downstream visualizer only cares
//! about traversable structure, so a way without a highway classification
//! or a reference to an unknown node loses edges instead of failing the
//! whole build. Structural problems (unparsable XML, nodes without usable
//! coordinates) are surfaced as errors by the codec before this crate runs.

use anyhow::Result;
use common::{geo, MapDocument};
use serde::Serialize;
use std::collections::HashMap;

/// A directed edge out of a node. Weight is the great-circle distance
/// between the endpoints, in meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEdge {
    pub to: String,
    pub weight: f64,
    pub highway: String,
    pub name: String,
}

/// Adjacency lists keyed by node id. Every node of the source document has
/// an entry, including nodes no qualifying way touches.
#[derive(Debug, Default, Serialize)]
pub struct RouteGraph {
    adjacency: HashMap<String, Vec<RouteEdge>>,
}

impl RouteGraph {
    /// Parse a serialized map and build its graph.
    pub fn from_osm_xml(xml: &str) -> Result<RouteGraph> {
        Ok(RouteGraph::from_map(&MapDocument::from_xml(xml)?))
    }

    pub fn from_map(map: &MapDocument) -> RouteGraph {
        let mut coords = HashMap::with_capacity(map.nodes.len());
        for node in &map.nodes {
            coords.insert(node.id.as_str(), (node.lat, node.lon));
        }

        let mut adjacency: HashMap<String, Vec<RouteEdge>> = map
            .nodes
            .iter()
            .map(|node| (node.id.clone(), Vec::new()))
            .collect();

        for way in &map.ways {
            let mut highway = None;
            let mut name = "";
            let mut oneway = false;
            for (k, v) in &way.tags {
                match k.as_str() {
                    "highway" => highway = Some(v.as_str()),
                    "name" => name = v.as_str(),
                    "oneway" => oneway = v.eq_ignore_ascii_case("yes"),
                    _ => {}
                }
            }

            // Ways without a highway classification are not traversable
            let Some(highway) = highway else {
                log::debug!("skipping way {} with no highway tag", way.id);
                continue;
            };

            for pair in way.nodes.windows(2) {
                let [from, to] = pair else { unreachable!() };

                let (Some(&(from_lat, from_lon)), Some(&(to_lat, to_lon))) =
                    (coords.get(from.as_str()), coords.get(to.as_str()))
                else {
                    log::debug!("way {} references a node not in this map", way.id);
                    continue;
                };

                let weight = geo::haversine_distance(from_lat, from_lon, to_lat, to_lon);

                adjacency.entry(from.clone()).or_default().push(RouteEdge {
                    to: to.clone(),
                    weight,
                    highway: highway.to_string(),
                    name: name.to_string(),
                });

                if !oneway {
                    adjacency.entry(to.clone()).or_default().push(RouteEdge {
                        to: from.clone(),
                        weight,
                        highway: highway.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }

        RouteGraph { adjacency }
    }

    /// Edges leaving the given node. `None` for ids this map never declared.
    pub fn edges(&self, node_id: &str) -> Option<&[RouteEdge]> {
        self.adjacency.get(node_id).map(|edges| edges.as_slice())
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(|id| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RouteEdge])> {
        self.adjacency
            .iter()
            .map(|(id, edges)| (id.as_str(), edges.as_slice()))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of directed edge records.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|edges| edges.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Node, Way};

    fn node(id: &str, lat: f64, lon: f64) -> Node {
        Node {
            id: id.to_string(),
            lat,
            lon,
        }
    }

    fn way(id: &str, refs: &[&str], tags: &[(&str, &str)]) -> Way {
        Way {
            id: id.to_string(),
            nodes: refs.iter().map(|r| r.to_string()).collect(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn map(nodes: Vec<Node>, ways: Vec<Way>) -> MapDocument {
        MapDocument {
            generator: "test".to_string(),
            nodes,
            ways,
        }
    }

    #[test]
    fn bidirectional_by_default() {
        let graph = RouteGraph::from_map(&map(
            vec![node("a", 0.0, 0.0), node("b", 1.0, 0.0)],
            vec![way("1", &["a", "b"], &[("highway", "residential")])],
        ));

        let forward = graph.edges("a").unwrap();
        let backward = graph.edges("b").unwrap();
        assert_eq!(forward.len(), 1);
        assert_eq!(backward.len(), 1);
        assert_eq!(forward[0].to, "b");
        assert_eq!(backward[0].to, "a");
        assert_eq!(forward[0].weight, backward[0].weight);
        assert_eq!(forward[0].highway, "residential");
        assert_eq!(forward[0].name, "");
    }

    #[test]
    fn weight_is_haversine_distance() {
        let graph = RouteGraph::from_map(&map(
            vec![node("a", 0.0, 0.0), node("b", 1.0, 0.0)],
            vec![way("1", &["a", "b"], &[("highway", "residential")])],
        ));

        let weight = graph.edges("a").unwrap()[0].weight;
        assert_eq!(weight, geo::haversine_distance(0.0, 0.0, 1.0, 0.0));
        // Sanity: one degree of latitude is roughly 111 km
        assert!((weight - 111_195.0).abs() < 10.0);
    }

    #[test]
    fn oneway_adds_forward_edge_only() {
        for value in ["yes", "Yes", "YES"] {
            let graph = RouteGraph::from_map(&map(
                vec![node("a", 0.0, 0.0), node("b", 1.0, 0.0)],
                vec![way(
                    "1",
                    &["a", "b"],
                    &[("highway", "residential"), ("oneway", value)],
                )],
            ));

            assert_eq!(graph.edges("a").unwrap().len(), 1, "oneway={value}");
            assert_eq!(graph.edges("b").unwrap().len(), 0, "oneway={value}");
        }
    }

    #[test]
    fn oneway_no_keeps_both_directions() {
        let graph = RouteGraph::from_map(&map(
            vec![node("a", 0.0, 0.0), node("b", 1.0, 0.0)],
            vec![way(
                "1",
                &["a", "b"],
                &[("highway", "residential"), ("oneway", "no")],
            )],
        ));

        assert_eq!(graph.edges("a").unwrap().len(), 1);
        assert_eq!(graph.edges("b").unwrap().len(), 1);
    }

    #[test]
    fn way_without_highway_is_skipped() {
        let graph = RouteGraph::from_map(&map(
            vec![node("a", 0.0, 0.0), node("b", 1.0, 0.0)],
            vec![way("1", &["a", "b"], &[("name", "Hidden Creek")])],
        ));

        assert_eq!(graph.edge_count(), 0);
        // Nodes still have (empty) entries
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges("a").unwrap().len(), 0);
    }

    #[test]
    fn missing_reference_drops_that_pair_only() {
        let graph = RouteGraph::from_map(&map(
            vec![
                node("a", 0.0, 0.0),
                node("b", 1.0, 0.0),
                node("c", 2.0, 0.0),
                node("d", 3.0, 0.0),
            ],
            vec![way(
                "1",
                &["a", "b", "ghost", "c", "d"],
                &[("highway", "residential")],
            )],
        ));

        // a-b and c-d survive; b-ghost and ghost-c are dropped, and pairs
        // after the unknown reference are still processed
        assert_eq!(graph.edges("a").unwrap().len(), 1);
        assert_eq!(graph.edges("b").unwrap().len(), 1);
        assert_eq!(graph.edges("c").unwrap().len(), 1);
        assert_eq!(graph.edges("d").unwrap().len(), 1);
        assert_eq!(graph.edges("c").unwrap()[0].to, "d");
        assert!(graph.edges("ghost").is_none());
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn long_way_contributes_consecutive_pairs() {
        let graph = RouteGraph::from_map(&map(
            vec![
                node("a", 0.0, 0.0),
                node("b", 1.0, 0.0),
                node("c", 2.0, 0.0),
                node("d", 3.0, 0.0),
            ],
            vec![way(
                "1",
                &["a", "b", "c", "d"],
                &[
                    ("highway", "primary"),
                    ("name", "Long Road"),
                    ("surface", "paved"),
                ],
            )],
        ));

        // 3 consecutive pairs, both directions each
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.edges("b").unwrap().len(), 2);
        for (_, edges) in graph.iter() {
            for edge in edges {
                assert_eq!(edge.highway, "primary");
                assert_eq!(edge.name, "Long Road");
            }
        }
    }

    #[test]
    fn single_reference_way_adds_nothing() {
        let graph = RouteGraph::from_map(&map(
            vec![node("a", 0.0, 0.0)],
            vec![way("1", &["a"], &[("highway", "residential")])],
        ));

        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn isolated_nodes_keep_empty_entries() {
        let graph = RouteGraph::from_map(&map(
            vec![node("a", 0.0, 0.0), node("lonely", 5.0, 5.0)],
            vec![],
        ));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges("lonely").unwrap().len(), 0);
    }

    #[test]
    fn builds_from_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="prim_maze_grid">
  <node id="1" visible="true" lat="0.0" lon="0.0"/>
  <node id="2" visible="true" lat="0.5" lon="0.0"/>
  <node id="3" visible="true" lat="0.5" lon="0.5"/>
  <way id="700001">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="residential"/>
  </way>
  <way id="700002">
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="residential"/>
    <tag k="oneway" v="yes"/>
  </way>
  <way id="700003">
    <nd ref="1"/>
    <nd ref="3"/>
  </way>
</osm>"#;

        let graph = RouteGraph::from_osm_xml(xml).unwrap();
        assert_eq!(graph.node_count(), 3);
        // way 700001 both directions, way 700002 forward only, way 700003
        // skipped (no highway tag)
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges("2").unwrap().len(), 2);
        assert_eq!(graph.edges("3").unwrap().len(), 0);
    }

    #[test]
    fn unparsable_xml_is_an_error() {
        assert!(RouteGraph::from_osm_xml("this is not a map").is_err());
    }
}
