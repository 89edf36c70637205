//! YAML → `Operator` tree.
//!
//! Example:
//! ```yaml
//! config:
//!   projection: "EPSG:3857"
//!   align_sources: true
//! root:
//!   type: raster_expression
//!   result: raster
//!   params: { expression: "A+B", datatype: Float32 }
//!   sources:
//!     raster:
//!       - { type: gdal_source, result: raster, params: { sourcename: srtm, channel: 0 } }
//!       - { type: gdal_source, result: raster, projection: "EPSG:32632",
//!           params: { sourcename: landsat, channel: 3 } }
//! ```
//!
//! A node without `projection` inherits its parent's; the root falls back to
//! `config.default_projection`, then to the context's configured default.

use serde::{Deserialize, Serialize};

use opgraph_core::params::Parameters;
use opgraph_core::{GraphContext, Operator, ResultType};

use crate::error::{PlanError, Result};
use crate::rules;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDocument {
    #[serde(default)]
    pub config: Option<DocumentConfig>,
    pub root: NodeSpec,
}

/// Per-document settings; CLI flags override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Reproject the finished root to this projection.
    pub projection: Option<String>,
    pub default_projection: Option<String>,
    /// Wrap children whose projection differs from their parent's.
    pub align_sources: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    #[serde(rename = "type")]
    pub operator_type: String,
    pub result: ResultType,
    #[serde(default)]
    pub projection: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub params: Parameters,
    #[serde(default)]
    pub sources: SourcesSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesSpec {
    pub raster: Vec<NodeSpec>,
    pub points: Vec<NodeSpec>,
    pub lines: Vec<NodeSpec>,
    pub polygons: Vec<NodeSpec>,
}

impl SourcesSpec {
    fn ports(&self) -> [(ResultType, &[NodeSpec]); 4] {
        [
            (ResultType::Raster, self.raster.as_slice()),
            (ResultType::Points, self.points.as_slice()),
            (ResultType::Lines, self.lines.as_slice()),
            (ResultType::Polygons, self.polygons.as_slice()),
        ]
    }
}

impl NodeSpec {
    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .sources
            .ports()
            .into_iter()
            .flat_map(|(_, children)| children.iter())
            .map(NodeSpec::node_count)
            .sum::<usize>()
    }
}

#[derive(Debug, Clone)]
pub struct ParsedGraph {
    pub root: NodeSpec,
    pub config: DocumentConfig,
}

/// Parse a graph document. Only the shape is checked here; port typing is
/// enforced when the tree is built.
pub fn parse_yaml_graph(yaml_src: &str) -> Result<ParsedGraph> {
    let doc: GraphDocument = serde_yaml::from_str(yaml_src)?;
    check_node(&doc.root, "root")?;
    Ok(ParsedGraph {
        root: doc.root,
        config: doc.config.unwrap_or_default(),
    })
}

fn check_node(node: &NodeSpec, path: &str) -> Result<()> {
    if node.operator_type.trim().is_empty() {
        return Err(PlanError::Invalid(format!("{path}: empty `type`")));
    }
    if matches!(&node.projection, Some(p) if p.trim().is_empty()) {
        return Err(PlanError::Invalid(format!("{path}: empty `projection`")));
    }
    for (port, children) in node.sources.ports() {
        for (i, child) in children.iter().enumerate() {
            let child_path = format!("{path}.sources.{}[{i}]", port.name().to_ascii_lowercase());
            check_node(child, &child_path)?;
        }
    }
    Ok(())
}

/// Build the operator tree, children before parents, drawing ids from `ctx`.
pub fn build_graph(parsed: &ParsedGraph, ctx: &GraphContext) -> Result<Operator> {
    let default_projection = parsed
        .config
        .default_projection
        .as_deref()
        .unwrap_or(ctx.config().default_projection.as_str());

    let mut root = build_node(&parsed.root, default_projection, ctx)?;

    if parsed.config.align_sources {
        root = rules::align_source_projections(&root, ctx)?;
    }
    if let Some(target) = &parsed.config.projection {
        root = rules::reproject_root(&root, target, ctx)?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        root = %root.id(),
        nodes = root.walk().count(),
        "built graph"
    );

    Ok(root)
}

fn build_node(node: &NodeSpec, inherited: &str, ctx: &GraphContext) -> Result<Operator> {
    let projection = node.projection.as_deref().unwrap_or(inherited);

    let mut builder = Operator::builder(node.operator_type.as_str(), node.result, projection)
        .params(node.params.clone());
    if let Some(name) = &node.name {
        builder = builder.name(name.as_str());
    }
    for (port, children) in node.sources.ports() {
        for child in children {
            builder = builder.source(port, build_node(child, projection, ctx)?);
        }
    }
    Ok(ctx.build(builder)?)
}
