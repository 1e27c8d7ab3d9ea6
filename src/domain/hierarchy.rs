//! Containment hierarchy: nests each class inside the class it is aggregated into.

use std::collections::HashSet;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use termtree::Tree;
use tracing::{debug, instrument, trace};

use crate::domain::entities::UmlModel;
use crate::domain::error::{DomainError, DomainResult};

/// Deepest nesting of classes the builder accepts, counting the root.
///
/// Building, rendering and counting all recurse along the hierarchy, so this
/// also bounds their stack use.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Class,
    Attribute,
}

/// Element of the hierarchy document.
///
/// Attribute nodes carry the attribute type as text; class nodes carry
/// attribute leaves first, then nested classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNode {
    pub name: String,
    pub kind: NodeKind,
    pub text: Option<String>,
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Class,
            text: None,
            children: Vec::new(),
        }
    }

    fn attribute(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Attribute,
            text: Some(type_name.to_string()),
            children: Vec::new(),
        }
    }

    /// Nested class nodes, skipping attribute leaves.
    pub fn nested_classes(&self) -> impl Iterator<Item = &ConfigNode> {
        self.children.iter().filter(|c| c.kind == NodeKind::Class)
    }

    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn class_count(&self) -> usize {
        let own = usize::from(self.kind == NodeKind::Class);
        own + self.children.iter().map(ConfigNode::class_count).sum::<usize>()
    }

    fn depth(&self) -> usize {
        1 + self
            .nested_classes()
            .map(ConfigNode::depth)
            .max()
            .unwrap_or(0)
    }

    fn to_tree(&self) -> Tree<String> {
        let label = match (&self.kind, &self.text) {
            (NodeKind::Attribute, Some(type_name)) => format!("{}: {}", self.name, type_name),
            _ => self.name.clone(),
        };
        let leaves: Vec<_> = self.children.iter().map(ConfigNode::to_tree).collect();
        Tree::new(label).with_leaves(leaves)
    }
}

/// Rooted tree generated from a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyDocument {
    pub root: ConfigNode,
}

impl HierarchyDocument {
    /// Number of class nodes (attribute leaves excluded).
    pub fn class_count(&self) -> usize {
        self.root.class_count()
    }

    /// Longest chain of nested classes, counting the root.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Terminal rendering.
    pub fn to_tree(&self) -> Tree<String> {
        self.root.to_tree()
    }

    /// Serialize as an indented XML document.
    ///
    /// Nodes without children are written as `<Name></Name>`, never self-closing.
    pub fn to_xml(&self, indent: usize) -> DomainResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
            .map_err(|e| DomainError::render("xml", e))?;
        write_node(&mut writer, &self.root).map_err(|e| DomainError::render("xml", e))?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| DomainError::render("xml", e))?;
        xml.push('\n');
        Ok(xml)
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &ConfigNode) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(node.name.as_str())))?;
    if node.children.is_empty() {
        let text = node.text.as_deref().unwrap_or_default();
        writer.write_event(Event::Text(BytesText::new(text)))?;
    } else {
        for child in &node.children {
            write_node(writer, child)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}

/// Builds the hierarchy depth-first from the root class.
///
/// Tracks the classes on the active recursion path; a class that reappears on
/// its own path is a cycle.
pub struct HierarchyBuilder<'a> {
    model: &'a UmlModel,
    active: HashSet<&'a str>,
    path: Vec<&'a str>,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(model: &'a UmlModel) -> Self {
        Self {
            model,
            active: HashSet::new(),
            path: Vec::new(),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build(mut self) -> DomainResult<HierarchyDocument> {
        let model = self.model;
        let root = model.root_class()?;
        debug!("root class: {}", root.name);
        let root = self.build_node(&root.name)?;
        Ok(HierarchyDocument { root })
    }

    fn build_node(&mut self, class_name: &'a str) -> DomainResult<ConfigNode> {
        let model = self.model;
        if self.path.len() >= MAX_DEPTH {
            return Err(DomainError::HierarchyTooDeep {
                class: class_name.to_string(),
                limit: MAX_DEPTH,
            });
        }
        if !self.active.insert(class_name) {
            let mut path: Vec<String> = self.path.iter().map(|s| s.to_string()).collect();
            path.push(class_name.to_string());
            return Err(DomainError::CyclicAggregation {
                class: class_name.to_string(),
                path,
            });
        }
        self.path.push(class_name);
        trace!("expanding {}", self.path.join(" -> "));

        let class = model.class(class_name).ok_or_else(|| {
            let parent = self.path.iter().rev().nth(1).copied().unwrap_or_default();
            DomainError::UnresolvedReference {
                name: class_name.to_string(),
                source_class: class_name.to_string(),
                target_class: parent.to_string(),
            }
        })?;

        let mut node = ConfigNode::class(&class.name);
        for attribute in &class.attributes {
            node.children
                .push(ConfigNode::attribute(&attribute.name, &attribute.type_name));
        }
        for aggregation in model.children_of(class_name) {
            let child = self.build_node(&aggregation.source)?;
            node.children.push(child);
        }

        self.path.pop();
        self.active.remove(class_name);
        Ok(node)
    }
}

impl UmlModel {
    /// Build the containment hierarchy rooted at the `isRoot` class.
    pub fn build_hierarchy(&self) -> DomainResult<HierarchyDocument> {
        HierarchyBuilder::new(self).build()
    }
}
