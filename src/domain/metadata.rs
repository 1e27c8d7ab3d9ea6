//! Flat per-class metadata: cardinality and parameter list for each class.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::{UmlClass, UmlModel};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::multiplicity::Multiplicity;

/// Parameter type used for references to contained classes.
pub const CLASS_PARAMETER_TYPE: &str = "class";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Parameter {
    pub fn is_class_reference(&self) -> bool {
        self.type_name == CLASS_PARAMETER_TYPE
    }
}

/// Metadata record for one class.
///
/// `min`/`max` come from the class's first aggregation as a source and are
/// absent (not zero) when the class is nobody's child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub class: String,
    pub documentation: String,
    #[serde(rename = "isRoot")]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "string_int")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "string_int")]
    pub min: Option<i64>,
    pub parameters: Vec<Parameter>,
}

impl ClassDescriptor {
    pub fn range(&self) -> Option<Multiplicity> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(Multiplicity::new(min, max)),
            _ => None,
        }
    }

    fn from_class(model: &UmlModel, class: &UmlClass) -> DomainResult<Self> {
        // only the first aggregation counts when a class has several parents
        let range = model
            .first_aggregation_from(&class.name)
            .map(|a| a.source_range())
            .transpose()?;

        let mut parameters: Vec<Parameter> = class
            .attributes
            .iter()
            .map(|a| Parameter {
                name: a.name.clone(),
                type_name: a.type_name.clone(),
            })
            .collect();
        parameters.extend(model.children_of(&class.name).map(|a| Parameter {
            name: a.source.clone(),
            type_name: CLASS_PARAMETER_TYPE.to_string(),
        }));

        Ok(Self {
            class: class.name.clone(),
            documentation: class.documentation.clone(),
            is_root: class.is_root,
            max: range.map(|r| r.max),
            min: range.map(|r| r.min),
            parameters,
        })
    }
}

impl UmlModel {
    /// One descriptor per class, in class insertion order.
    pub fn build_metadata(&self) -> DomainResult<Vec<ClassDescriptor>> {
        let descriptors = self
            .classes()
            .map(|class| ClassDescriptor::from_class(self, class))
            .collect::<DomainResult<Vec<_>>>()?;
        debug!("built {} class descriptors", descriptors.len());
        Ok(descriptors)
    }
}

/// Serialize descriptors as a pretty-printed JSON array.
pub fn to_json(descriptors: &[ClassDescriptor], indent: usize) -> DomainResult<String> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    descriptors
        .serialize(&mut serializer)
        .map_err(|e| DomainError::render("json", e))?;
    String::from_utf8(buf).map_err(|e| DomainError::render("json", e))
}

/// Read descriptors back from generated metadata JSON.
pub fn from_json(json: &str) -> DomainResult<Vec<ClassDescriptor>> {
    serde_json::from_str(json)
        .map_err(|e| DomainError::malformed(format!("invalid metadata JSON: {e}")))
}

/// `min`/`max` are written as strings (`"1"`), read back into integers.
mod string_int {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| s.trim().parse::<i64>().map_err(serde::de::Error::custom))
            .transpose()
    }
}
