//! XML codec for [`MapDocument`].
//!
//! The on-disk format is a small OSM dialect: an `osm` root carrying the
//! format version and the generator name, `node` elements with id and
//! coordinates, and `way` elements holding ordered `nd` references plus
//! `tag` key/value pairs.

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;

use crate::{MapDocument, Node, Way};

pub const FORMAT_VERSION: &str = "0.6";

impl MapDocument {
    /// Serialize into pretty-printed XML with two-space indentation.
    ///
    /// Node ids referenced by ways are not checked against the node set;
    /// referential integrity is the caller's responsibility.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut osm = BytesStart::new("osm");
        osm.push_attribute(("version", FORMAT_VERSION));
        osm.push_attribute(("generator", self.generator.as_str()));
        writer.write_event(Event::Start(osm))?;

        for node in &self.nodes {
            let lat = node.lat.to_string();
            let lon = node.lon.to_string();

            let mut elem = BytesStart::new("node");
            elem.push_attribute(("id", node.id.as_str()));
            elem.push_attribute(("visible", "true"));
            elem.push_attribute(("lat", lat.as_str()));
            elem.push_attribute(("lon", lon.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }

        for way in &self.ways {
            let mut elem = BytesStart::new("way");
            elem.push_attribute(("id", way.id.as_str()));
            writer.write_event(Event::Start(elem))?;

            for node_ref in &way.nodes {
                let mut nd = BytesStart::new("nd");
                nd.push_attribute(("ref", node_ref.as_str()));
                writer.write_event(Event::Empty(nd))?;
            }

            for (k, v) in &way.tags {
                let mut tag = BytesStart::new("tag");
                tag.push_attribute(("k", k.as_str()));
                tag.push_attribute(("v", v.as_str()));
                writer.write_event(Event::Empty(tag))?;
            }

            writer.write_event(Event::End(BytesEnd::new("way")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("osm")))?;

        String::from_utf8(writer.into_inner()).context("serialized map was not valid UTF-8")
    }

    /// Parse a serialized map.
    ///
    /// A document that is not well-formed XML, or a node without parseable
    /// `lat`/`lon` attributes, fails the whole parse. Anything else is kept
    /// as-is; ways are not filtered here.
    pub fn from_xml(xml: &str) -> Result<MapDocument> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut generator = String::new();
        let mut nodes = Vec::new();
        let mut ways = Vec::new();
        let mut current_way: Option<Way> = None;
        let mut saw_element = false;

        loop {
            match reader.read_event().context("malformed map document")? {
                Event::Start(e) => {
                    saw_element = true;
                    match e.name().as_ref() {
                        b"osm" => {
                            let mut attrs = attribute_map(&e)?;
                            generator = attrs.remove("generator").unwrap_or_default();
                        }
                        b"node" => nodes.push(node_from_attributes(&e)?),
                        b"way" => current_way = Some(way_from_attributes(&e)?),
                        b"nd" => append_node_ref(&e, current_way.as_mut())?,
                        b"tag" => append_tag(&e, current_way.as_mut())?,
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    saw_element = true;
                    match e.name().as_ref() {
                        b"node" => nodes.push(node_from_attributes(&e)?),
                        // A way with no children still counts as a way
                        b"way" => ways.push(way_from_attributes(&e)?),
                        b"nd" => append_node_ref(&e, current_way.as_mut())?,
                        b"tag" => append_tag(&e, current_way.as_mut())?,
                        _ => {}
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == b"way" {
                        if let Some(way) = current_way.take() {
                            ways.push(way);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_element {
            bail!("document has no root element");
        }

        Ok(MapDocument {
            generator,
            nodes,
            ways,
        })
    }
}

/// Collect an element's attributes into a map, unescaping values.
fn attribute_map(elem: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in elem.attributes() {
        let attr = attr.context("malformed attribute")?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .context("attribute key was not valid UTF-8")?
            .to_string();
        let value = attr
            .unescape_value()
            .context("attribute value could not be unescaped")?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn node_from_attributes(elem: &BytesStart) -> Result<Node> {
    let mut attrs = attribute_map(elem)?;
    let id = attrs.remove("id").unwrap_or_default();

    let lat = attrs
        .remove("lat")
        .ok_or_else(|| anyhow!("node {id:?} is missing a lat attribute"))?
        .parse::<f64>()
        .with_context(|| format!("node {id:?} has a malformed lat attribute"))?;
    let lon = attrs
        .remove("lon")
        .ok_or_else(|| anyhow!("node {id:?} is missing a lon attribute"))?
        .parse::<f64>()
        .with_context(|| format!("node {id:?} has a malformed lon attribute"))?;

    Ok(Node { id, lat, lon })
}

fn way_from_attributes(elem: &BytesStart) -> Result<Way> {
    let mut attrs = attribute_map(elem)?;
    Ok(Way {
        id: attrs.remove("id").unwrap_or_default(),
        nodes: Vec::new(),
        tags: Vec::new(),
    })
}

// Stray nd/tag elements outside of a way are ignored, not errors
fn append_node_ref(elem: &BytesStart, way: Option<&mut Way>) -> Result<()> {
    let Some(way) = way else { return Ok(()) };
    let mut attrs = attribute_map(elem)?;
    if let Some(node_ref) = attrs.remove("ref") {
        way.nodes.push(node_ref);
    }
    Ok(())
}

fn append_tag(elem: &BytesStart, way: Option<&mut Way>) -> Result<()> {
    let Some(way) = way else { return Ok(()) };
    let mut attrs = attribute_map(elem)?;
    if let (Some(k), Some(v)) = (attrs.remove("k"), attrs.remove("v")) {
        way.tags.push((k, v));
    }
    Ok(())
}
