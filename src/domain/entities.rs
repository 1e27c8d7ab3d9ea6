//! Domain entities: core data structures

use indexmap::IndexMap;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::multiplicity::Multiplicity;

/// Typed attribute of a UML class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub type_name: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A class declaration from the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmlClass {
    pub name: String,
    /// Top of the containment hierarchy
    pub is_root: bool,
    pub documentation: String,
    /// Attributes in declaration order
    pub attributes: Vec<Attribute>,
}

impl UmlClass {
    pub fn new(name: impl Into<String>, is_root: bool, documentation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_root,
            documentation: documentation.into(),
            attributes: Vec::new(),
        }
    }

    pub fn add_attribute(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.attributes.push(Attribute::new(name, type_name));
    }

    pub fn with_attribute(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.add_attribute(name, type_name);
        self
    }
}

/// Aggregation edge: instances of `source` are contained in instances of `target`.
///
/// Multiplicities are kept as the raw tokens from the document and parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Contained (child) class
    pub source: String,
    /// Containing (parent) class
    pub target: String,
    pub source_multiplicity: String,
    pub target_multiplicity: String,
}

impl Aggregation {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        source_multiplicity: impl Into<String>,
        target_multiplicity: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_multiplicity: source_multiplicity.into(),
            target_multiplicity: target_multiplicity.into(),
        }
    }

    pub fn source_range(&self) -> DomainResult<Multiplicity> {
        Multiplicity::parse(&self.source_multiplicity)
    }

    pub fn target_range(&self) -> DomainResult<Multiplicity> {
        Multiplicity::parse(&self.target_multiplicity)
    }
}

/// Loaded class diagram.
///
/// Populated once by the loader, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UmlModel {
    classes: IndexMap<String, UmlClass>,
    aggregations: Vec<Aggregation>,
}

impl UmlModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class. Names are unique keys.
    pub fn add_class(&mut self, class: UmlClass) -> DomainResult<()> {
        if self.classes.contains_key(&class.name) {
            return Err(DomainError::DuplicateClass(class.name));
        }
        self.classes.insert(class.name.clone(), class);
        Ok(())
    }

    pub fn add_aggregation(&mut self, aggregation: Aggregation) {
        self.aggregations.push(aggregation);
    }

    /// Classes in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &UmlClass> {
        self.classes.values()
    }

    pub fn class(&self, name: &str) -> Option<&UmlClass> {
        self.classes.get(name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    /// The unique class flagged `isRoot`.
    pub fn root_class(&self) -> DomainResult<&UmlClass> {
        let roots: Vec<&UmlClass> = self.classes().filter(|c| c.is_root).collect();
        match roots.as_slice() {
            [] => Err(DomainError::NoRootClass),
            [root] => Ok(root),
            _ => Err(DomainError::MultipleRootClasses(
                roots.iter().map(|c| c.name.clone()).collect(),
            )),
        }
    }

    /// Aggregations whose target is `class_name`, in declaration order.
    pub fn children_of<'a>(
        &'a self,
        class_name: &'a str,
    ) -> impl Iterator<Item = &'a Aggregation> {
        self.aggregations
            .iter()
            .filter(move |a| a.target == class_name)
    }

    /// First aggregation (declaration order) whose source is `class_name`.
    pub fn first_aggregation_from(&self, class_name: &str) -> Option<&Aggregation> {
        self.aggregations.iter().find(|a| a.source == class_name)
    }

    /// Every aggregation endpoint must name a loaded class.
    pub fn validate_references(&self) -> DomainResult<()> {
        for aggregation in &self.aggregations {
            for name in [&aggregation.source, &aggregation.target] {
                if !self.classes.contains_key(name) {
                    return Err(DomainError::UnresolvedReference {
                        name: name.clone(),
                        source_class: aggregation.source.clone(),
                        target_class: aggregation.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
