//! Reads class-diagram XML into a [`UmlModel`].
//!
//! Expected shape:
//!
//! ```xml
//! <Model>
//!   <Class name="Car" isRoot="true" documentation="A car">
//!     <Attribute name="brand" type="string"/>
//!   </Class>
//!   <Class name="Engine"/>
//!   <Aggregation source="Engine" target="Car" sourceMultiplicity="1" targetMultiplicity="1"/>
//! </Model>
//! ```

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::domain::entities::{Aggregation, UmlClass, UmlModel};
use crate::domain::error::{DomainError, DomainResult};

const CLASS_TAG: &str = "Class";
const ATTRIBUTE_TAG: &str = "Attribute";
const AGGREGATION_TAG: &str = "Aggregation";

impl UmlModel {
    /// Parse a model document from raw file contents.
    ///
    /// The text encoding comes from a byte order mark, else from the
    /// `encoding` of the XML declaration, else UTF-8.
    pub fn from_xml_bytes(bytes: &[u8]) -> DomainResult<Self> {
        let xml = decode_document(bytes)?;
        Self::from_xml(&xml)
    }

    /// Parse a model document.
    ///
    /// Classes and aggregations are taken from the direct children of the
    /// document element, in document order. Aggregation endpoints are resolved
    /// once the whole document has been read.
    pub fn from_xml(xml: &str) -> DomainResult<Self> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(xml, options)
            .map_err(|e| DomainError::malformed(format!("not well-formed XML: {e}")))?;

        let mut model = UmlModel::new();
        for node in doc.root_element().children() {
            if !node.is_element() {
                continue;
            }
            match node.tag_name().name() {
                CLASS_TAG => model.add_class(read_class(node)?)?,
                AGGREGATION_TAG => model.add_aggregation(read_aggregation(node)?),
                other => warn!("unknown element: `<{}>`", other),
            }
        }
        model.validate_references()?;

        debug!(
            "loaded {} classes, {} aggregations",
            model.class_count(),
            model.aggregations().len()
        );
        Ok(model)
    }
}

fn decode_document(bytes: &[u8]) -> DomainResult<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
    };
    debug!("decoding model as {}", encoding.name());
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            DomainError::malformed(format!("document is not valid {}", encoding.name()))
        })
}

/// Encoding named in the `<?xml ... encoding="..."?>` declaration, if any.
fn declared_encoding(bytes: &[u8]) -> DomainResult<Option<&'static Encoding>> {
    if !bytes.starts_with(b"<?xml") {
        return Ok(None);
    }
    let Some(end) = bytes.windows(2).position(|w| w == b"?>") else {
        return Ok(None);
    };
    let declaration = String::from_utf8_lossy(&bytes[..end]);
    let Some(label) = pseudo_attribute(&declaration, "encoding") else {
        return Ok(None);
    };
    // an ASCII-readable declaration rules out UTF-16 without a BOM
    Encoding::for_label(label.as_bytes())
        .map(|encoding| Some(encoding.output_encoding()))
        .ok_or_else(|| DomainError::malformed(format!("unsupported encoding `{label}`")))
}

fn pseudo_attribute<'a>(declaration: &'a str, name: &str) -> Option<&'a str> {
    let rest = &declaration[declaration.find(name)? + name.len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    value.find(quote).map(|end| &value[..end])
}

fn read_class(node: roxmltree::Node) -> DomainResult<UmlClass> {
    let name = required(node, "name")?;
    let is_root = node
        .attribute("isRoot")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let documentation = node.attribute("documentation").unwrap_or_default();

    let mut class = UmlClass::new(name, is_root, documentation);
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            ATTRIBUTE_TAG => {
                class.add_attribute(required(child, "name")?, required(child, "type")?);
            }
            other => warn!("unknown element in class {}: `<{}>`", name, other),
        }
    }
    Ok(class)
}

fn read_aggregation(node: roxmltree::Node) -> DomainResult<Aggregation> {
    Ok(Aggregation::new(
        required(node, "source")?,
        required(node, "target")?,
        required(node, "sourceMultiplicity")?,
        required(node, "targetMultiplicity")?,
    ))
}

fn required<'a>(node: roxmltree::Node<'a, '_>, attribute: &str) -> DomainResult<&'a str> {
    node.attribute(attribute).ok_or_else(|| {
        DomainError::malformed(format!(
            "<{}> is missing required attribute `{}`",
            node.tag_name().name(),
            attribute
        ))
    })
}
