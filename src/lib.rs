//! umlgen: derive a nested configuration document and flat class metadata
//! from a UML class-diagram description.
//!
//! ```no_run
//! use umlgen::domain::UmlModel;
//!
//! let xml = std::fs::read_to_string("model.xml")?;
//! let model = UmlModel::from_xml(&xml)?;
//! let config_xml = model.build_hierarchy()?.to_xml(4)?;
//! let metadata = model.build_metadata()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
