//! Artifact generation service
//!
//! Loads a class-diagram document and produces the hierarchy XML and the
//! metadata JSON from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{metadata, ConfigNode, UmlModel};
use crate::infrastructure::traits::FileSystem;

/// Default indentation for both artifacts.
pub const DEFAULT_INDENT: usize = 4;

/// Where the two artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub hierarchy: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path, hierarchy_file: &str, metadata_file: &str) -> Self {
        Self {
            hierarchy: dir.join(hierarchy_file),
            metadata: dir.join(metadata_file),
        }
    }
}

/// Outcome of a successful `generate`.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub paths: ArtifactPaths,
    /// Classes in the hierarchy document
    pub hierarchy_classes: usize,
    /// Entries in the metadata list
    pub descriptors: usize,
}

/// Result of validating a model without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub classes: usize,
    pub aggregations: usize,
    pub root: String,
    pub hierarchy_classes: usize,
    pub depth: usize,
    /// Classes not reachable from the root
    pub unreachable: Vec<String>,
}

/// Service turning model documents into artifacts.
pub struct GeneratorService {
    fs: Arc<dyn FileSystem>,
    indent: usize,
}

impl GeneratorService {
    /// Create a new generator service with default indentation.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_indent(fs, DEFAULT_INDENT)
    }

    pub fn with_indent(fs: Arc<dyn FileSystem>, indent: usize) -> Self {
        Self { fs, indent }
    }

    /// Read and parse a model document.
    #[instrument(skip(self))]
    pub fn load(&self, input: &Path) -> ApplicationResult<UmlModel> {
        if !self.fs.exists(input) {
            return Err(ApplicationError::InputNotFound(input.to_path_buf()));
        }
        let content = self.fs.read(input).with_input_context(input)?;
        let model = UmlModel::from_xml_bytes(&content)?;
        info!(
            "loaded {}: {} classes, {} aggregations",
            input.display(),
            model.class_count(),
            model.aggregations().len()
        );
        Ok(model)
    }

    pub fn render_hierarchy(&self, model: &UmlModel) -> ApplicationResult<String> {
        let document = model.build_hierarchy()?;
        Ok(document.to_xml(self.indent)?)
    }

    pub fn render_metadata(&self, model: &UmlModel) -> ApplicationResult<String> {
        let descriptors = model.build_metadata()?;
        Ok(metadata::to_json(&descriptors, self.indent)?)
    }

    /// Hierarchy as a terminal tree.
    pub fn render_tree(&self, model: &UmlModel) -> ApplicationResult<String> {
        let document = model.build_hierarchy()?;
        Ok(document.to_tree().to_string())
    }

    #[instrument(skip(self, model))]
    pub fn write_hierarchy(&self, model: &UmlModel, path: &Path) -> ApplicationResult<usize> {
        let document = model.build_hierarchy()?;
        let xml = document.to_xml(self.indent)?;
        self.write_artifact(path, &xml)?;
        Ok(document.class_count())
    }

    #[instrument(skip(self, model))]
    pub fn write_metadata(&self, model: &UmlModel, path: &Path) -> ApplicationResult<usize> {
        let descriptors = model.build_metadata()?;
        let json = metadata::to_json(&descriptors, self.indent)?;
        self.write_artifact(path, &json)?;
        Ok(descriptors.len())
    }

    /// Load `input` and write both artifacts.
    ///
    /// Both artifacts are attempted even if the first fails; the first error
    /// is returned afterwards.
    #[instrument(skip(self))]
    pub fn generate(
        &self,
        input: &Path,
        paths: &ArtifactPaths,
    ) -> ApplicationResult<GenerateReport> {
        let model = self.load(input)?;

        let hierarchy = self.write_hierarchy(&model, &paths.hierarchy);
        if let Err(e) = &hierarchy {
            warn!("hierarchy not written: {}", e);
        }
        let metadata = self.write_metadata(&model, &paths.metadata);
        if let Err(e) = &metadata {
            warn!("metadata not written: {}", e);
        }

        Ok(GenerateReport {
            paths: paths.clone(),
            hierarchy_classes: hierarchy?,
            descriptors: metadata?,
        })
    }

    /// Load `input` and run both generators without writing.
    #[instrument(skip(self))]
    pub fn check(&self, input: &Path) -> ApplicationResult<ModelSummary> {
        let model = self.load(input)?;
        let document = model.build_hierarchy()?;
        model.build_metadata()?;

        let mut reachable = Vec::new();
        collect_class_names(&document.root, &mut reachable);
        let unreachable = model
            .classes()
            .filter(|c| !reachable.contains(&c.name.as_str()))
            .map(|c| c.name.clone())
            .collect();

        Ok(ModelSummary {
            classes: model.class_count(),
            aggregations: model.aggregations().len(),
            root: document.root.name.clone(),
            hierarchy_classes: document.class_count(),
            depth: document.depth(),
            unreachable,
        })
    }

    fn write_artifact(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create output directory", path)?;
        self.fs
            .write(path, content)
            .with_path_context("write artifact", path)?;
        debug!("wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

fn collect_class_names<'a>(node: &'a ConfigNode, names: &mut Vec<&'a str>) {
    names.push(&node.name);
    for child in node.nested_classes() {
        collect_class_names(child, names);
    }
}
