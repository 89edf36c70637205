//! Operator nodes and their typed input ports.
//!
//! An `Operator` is an immutable node of a computation graph. Children are
//! held in four typed ports (raster, points, lines, polygons); a child may only
//! sit in the port matching its own result type. Handles are cheap to clone and
//! share one allocation, so the same child can feed several parents.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::id::{IdSequence, OperatorId};
use crate::params::{ParamValue, Parameters};
use crate::result_type::ResultType;
use crate::schema::AttributeSchema;

/// `operator_type` of synthetic reprojection nodes.
pub const PROJECTION_OPERATOR: &str = "projection";
pub const SRC_PROJECTION_PARAM: &str = "src_projection";
pub const DEST_PROJECTION_PARAM: &str = "dest_projection";

const PORT_COUNT: usize = ResultType::PORTS.len();

fn port_index(port: ResultType) -> Result<usize> {
    ResultType::PORTS
        .iter()
        .position(|p| *p == port)
        .ok_or_else(|| Error::InvalidResultType(format!("{} is not an input port", port)))
}

#[derive(Debug, PartialEq)]
struct Node {
    id: OperatorId,
    name: String,
    operator_type: String,
    result_type: ResultType,
    parameters: Parameters,
    projection: String,
    schema: AttributeSchema,
    /// Indexed like `ResultType::PORTS`.
    sources: [Vec<Operator>; PORT_COUNT],
}

#[derive(Debug, Clone)]
pub struct Operator(Arc<Node>);

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Operator {
    pub fn builder(
        operator_type: impl Into<String>,
        result_type: ResultType,
        projection: impl Into<String>,
    ) -> OperatorBuilder {
        OperatorBuilder::new(operator_type, result_type, projection)
    }

    pub fn id(&self) -> OperatorId {
        self.0.id
    }

    /// Display label.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Backend operator kind, e.g. `"GdalSource"` or `"projection"`.
    pub fn operator_type(&self) -> &str {
        &self.0.operator_type
    }

    pub fn result_type(&self) -> ResultType {
        self.0.result_type
    }

    pub fn parameters(&self) -> &Parameters {
        &self.0.parameters
    }

    /// Spatial reference system of the output, e.g. `"EPSG:4326"`.
    pub fn projection(&self) -> &str {
        &self.0.projection
    }

    /// Attributes of the output, with their data types and units.
    pub fn schema(&self) -> &AttributeSchema {
        &self.0.schema
    }

    /// Children wired into the port of the given type.
    ///
    /// Fails with `InvalidResultType` for `Plot`, which has no port.
    pub fn sources(&self, port: ResultType) -> Result<&[Operator]> {
        Ok(&self.0.sources[port_index(port)?])
    }

    pub fn raster_sources(&self) -> &[Operator] {
        &self.0.sources[0]
    }

    pub fn point_sources(&self) -> &[Operator] {
        &self.0.sources[1]
    }

    pub fn line_sources(&self) -> &[Operator] {
        &self.0.sources[2]
    }

    pub fn polygon_sources(&self) -> &[Operator] {
        &self.0.sources[3]
    }

    /// `(port, children)` pairs in serialization order, including empty ports.
    pub fn ports(&self) -> impl Iterator<Item = (ResultType, &[Operator])> {
        ResultType::PORTS
            .iter()
            .copied()
            .zip(self.0.sources.iter().map(Vec::as_slice))
    }

    pub fn source_count(&self) -> usize {
        self.0.sources.iter().map(Vec::len).sum()
    }

    /// `false` for source operators (leaves).
    pub fn has_sources(&self) -> bool {
        self.source_count() > 0
    }

    /// Look up a direct child by id.
    ///
    /// Only the raster port is searched; children in vector ports are not
    /// found here. Use `find_source` to search every port.
    pub fn get_any_source(&self, id: OperatorId) -> Result<&Operator> {
        self.raster_sources()
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| Error::SourceNotFound {
                id,
                context: self
                    .to_json()
                    .unwrap_or_else(|_| format!("operator {}", self.id())),
            })
    }

    /// Look up a direct child by id across all four ports.
    pub fn find_source(&self, id: OperatorId) -> Option<&Operator> {
        self.0.sources.iter().flatten().find(|s| s.id() == id)
    }

    /// Depth-first, pre-order traversal of this node and all descendants.
    /// Shared children are visited once per path that reaches them.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// `true` if both handles point at the same node.
    pub fn ptr_eq(a: &Operator, b: &Operator) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Wrap this operator in a reprojection node targeting `projection`.
    ///
    /// The receiver is left untouched and becomes the single child of the new
    /// node, whose output schema is copied from it. No collapsing happens:
    /// projecting twice nests two wrappers, even when the projections already
    /// agree.
    pub fn projected(&self, projection: &str, ids: &dyn IdSequence) -> Result<Operator> {
        let parameters = Parameters::new()
            .with(SRC_PROJECTION_PARAM, self.projection())
            .with(DEST_PROJECTION_PARAM, projection);

        let wrapper = Operator::builder(PROJECTION_OPERATOR, self.result_type(), projection)
            .name(format!("Projection of {}", self.id()))
            .params(parameters)
            .schema(self.schema().clone())
            .source(self.result_type(), self.clone())
            .build(ids)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            source = %self.id(),
            wrapper = %wrapper.id(),
            from = %self.projection(),
            to = %projection,
            "inserted projection"
        );

        Ok(wrapper)
    }

    /// Like `projected`, but returns the receiver itself when it already
    /// produces `projection`.
    pub fn ensure_projection(&self, projection: &str, ids: &dyn IdSequence) -> Result<Operator> {
        if self.projection() == projection {
            Ok(self.clone())
        } else {
            self.projected(projection, ids)
        }
    }

    /// A builder pre-filled with this operator's fields and sources.
    /// Building it yields a new node with a fresh id.
    pub fn to_builder(&self) -> OperatorBuilder {
        OperatorBuilder {
            operator_type: self.0.operator_type.clone(),
            result_type: self.0.result_type,
            projection: self.0.projection.clone(),
            name: Some(self.0.name.clone()),
            parameters: self.0.parameters.clone(),
            schema: self.0.schema.clone(),
            sources: self.0.sources.clone(),
            plot_sources: 0,
        }
    }
}

/// Iterator returned by [`Operator::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Operator>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Operator;

    fn next(&mut self) -> Option<Self::Item> {
        let op = self.stack.pop()?;
        // Push in reverse so the first raster source is visited first.
        for port in op.0.sources.iter().rev() {
            self.stack.extend(port.iter().rev());
        }
        Some(op)
    }
}

/// Collects the pieces of an operator and validates them on `build`.
#[derive(Debug, Clone)]
pub struct OperatorBuilder {
    operator_type: String,
    result_type: ResultType,
    projection: String,
    name: Option<String>,
    parameters: Parameters,
    schema: AttributeSchema,
    sources: [Vec<Operator>; PORT_COUNT],
    /// Children offered to the non-existent plot port.
    plot_sources: usize,
}

impl OperatorBuilder {
    pub fn new(
        operator_type: impl Into<String>,
        result_type: ResultType,
        projection: impl Into<String>,
    ) -> Self {
        Self {
            operator_type: operator_type.into(),
            result_type,
            projection: projection.into(),
            name: None,
            parameters: Parameters::new(),
            schema: AttributeSchema::default(),
            sources: Default::default(),
            plot_sources: 0,
        }
    }

    /// Display label; defaults to the operator type.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn param(
        mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        self.parameters.insert(key, value);
        self
    }

    /// Replace all parameters.
    pub fn params(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Replace the output attribute schema.
    pub fn schema(mut self, schema: AttributeSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Append `source` to the port of type `port`.
    pub fn source(mut self, port: ResultType, source: Operator) -> Self {
        match port_index(port) {
            Ok(idx) => self.sources[idx].push(source),
            Err(_) => self.plot_sources += 1,
        }
        self
    }

    /// Replace the children of one port.
    pub fn replace_sources(
        mut self,
        port: ResultType,
        sources: impl IntoIterator<Item = Operator>,
    ) -> Self {
        match port_index(port) {
            Ok(idx) => self.sources[idx] = sources.into_iter().collect(),
            Err(_) => self.plot_sources += sources.into_iter().count(),
        }
        self
    }

    pub fn raster_source(self, source: Operator) -> Self {
        self.source(ResultType::Raster, source)
    }

    pub fn raster_sources(self, sources: impl IntoIterator<Item = Operator>) -> Self {
        sources
            .into_iter()
            .fold(self, |b, s| b.source(ResultType::Raster, s))
    }

    pub fn point_source(self, source: Operator) -> Self {
        self.source(ResultType::Points, source)
    }

    pub fn point_sources(self, sources: impl IntoIterator<Item = Operator>) -> Self {
        sources
            .into_iter()
            .fold(self, |b, s| b.source(ResultType::Points, s))
    }

    pub fn line_source(self, source: Operator) -> Self {
        self.source(ResultType::Lines, source)
    }

    pub fn line_sources(self, sources: impl IntoIterator<Item = Operator>) -> Self {
        sources
            .into_iter()
            .fold(self, |b, s| b.source(ResultType::Lines, s))
    }

    pub fn polygon_source(self, source: Operator) -> Self {
        self.source(ResultType::Polygons, source)
    }

    pub fn polygon_sources(self, sources: impl IntoIterator<Item = Operator>) -> Self {
        sources
            .into_iter()
            .fold(self, |b, s| b.source(ResultType::Polygons, s))
    }

    /// Validate and allocate an id from `ids`.
    ///
    /// The id is drawn only after validation succeeds, so failed builds leave
    /// no gaps in the sequence.
    pub fn build(self, ids: &dyn IdSequence) -> Result<Operator> {
        self.validate()?;
        let id = ids.next_id()?;
        Ok(self.finish(id))
    }

    /// Build with a previously assigned id (rehydration).
    pub(crate) fn build_with_id(self, id: OperatorId) -> Result<Operator> {
        self.validate()?;
        Ok(self.finish(id))
    }

    fn validate(&self) -> Result<()> {
        if self.operator_type.trim().is_empty() {
            return Err(Error::EmptyField("operator_type"));
        }
        if self.projection.trim().is_empty() {
            return Err(Error::EmptyField("projection"));
        }
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err(Error::EmptyField("name"));
        }
        if let Some((key, _)) = self
            .parameters
            .iter()
            .find(|(_, v)| matches!(v, ParamValue::Float(x) if !x.is_finite()))
        {
            return Err(Error::NonFinite(key.to_string()));
        }
        self.schema.validate()?;
        if self.plot_sources > 0 {
            return Err(Error::InvalidResultType(format!(
                "{} is not an input port",
                ResultType::Plot
            )));
        }

        for (port, children) in ResultType::PORTS.iter().zip(self.sources.iter()) {
            if let Some(bad) = children.iter().find(|c| c.result_type() != *port) {
                return Err(Error::SourceTypeMismatch {
                    port: port.port_name()?,
                    expected: *port,
                    actual: bad.result_type(),
                    source_id: bad.id(),
                });
            }
        }
        Ok(())
    }

    fn finish(self, id: OperatorId) -> Operator {
        let name = self.name.unwrap_or_else(|| self.operator_type.clone());

        #[cfg(feature = "tracing")]
        tracing::trace!(
            id = %id,
            operator_type = %self.operator_type,
            result_type = %self.result_type,
            sources = self.sources.iter().map(Vec::len).sum::<usize>(),
            "built operator"
        );

        Operator(Arc::new(Node {
            id,
            name,
            operator_type: self.operator_type,
            result_type: self.result_type,
            parameters: self.parameters,
            projection: self.projection,
            schema: self.schema,
            sources: self.sources,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AtomicIdSequence;

    fn leaf(ids: &AtomicIdSequence, ty: &str, rt: ResultType) -> Operator {
        Operator::builder(ty, rt, "EPSG:4326").build(ids).unwrap()
    }

    #[test]
    fn test_name_defaults_to_operator_type() {
        let ids = AtomicIdSequence::new();
        let op = leaf(&ids, "GdalSource", ResultType::Raster);
        assert_eq!(op.name(), "GdalSource");
    }

    #[test]
    fn test_empty_fields_are_rejected_without_consuming_ids() {
        let ids = AtomicIdSequence::new();
        let err = Operator::builder("", ResultType::Raster, "EPSG:4326")
            .build(&ids)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyField("operator_type")));

        let err = Operator::builder("x", ResultType::Raster, " ")
            .build(&ids)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyField("projection")));
        assert_eq!(ids.peek(), OperatorId::new(1));
    }

    #[test]
    fn test_plot_port_is_rejected() {
        let ids = AtomicIdSequence::new();
        let plot = leaf(&ids, "histogram", ResultType::Plot);
        let err = Operator::builder("x", ResultType::Plot, "EPSG:4326")
            .source(ResultType::Plot, plot)
            .build(&ids)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidResultType(_)));
    }

    #[test]
    fn test_walk_is_preorder_in_port_order() {
        let ids = AtomicIdSequence::new();
        let r1 = leaf(&ids, "r1", ResultType::Raster);
        let r2 = leaf(&ids, "r2", ResultType::Raster);
        let p = leaf(&ids, "p", ResultType::Points);
        let root = Operator::builder("join", ResultType::Points, "EPSG:4326")
            .point_source(p)
            .raster_sources([r1, r2])
            .build(&ids)
            .unwrap();

        let order: Vec<&str> = root.walk().map(Operator::operator_type).collect();
        assert_eq!(order, vec!["join", "r1", "r2", "p"]);
    }

    #[test]
    fn test_to_builder_copies_everything_but_the_id() {
        let ids = AtomicIdSequence::new();
        let src = leaf(&ids, "r", ResultType::Raster);
        let op = Operator::builder("expr", ResultType::Raster, "EPSG:4326")
            .name("Expression")
            .param("expression", "A+1")
            .raster_source(src)
            .build(&ids)
            .unwrap();

        let copy = op.to_builder().build(&ids).unwrap();
        assert_ne!(copy.id(), op.id());
        assert_eq!(copy.name(), "Expression");
        assert_eq!(copy.parameters(), op.parameters());
        assert!(Operator::ptr_eq(&copy.raster_sources()[0], &op.raster_sources()[0]));
    }

    #[test]
    fn test_non_finite_parameters_are_rejected() {
        let ids = AtomicIdSequence::new();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Operator::builder("numeric_attribute_filter", ResultType::Points, "EPSG:4326")
                .param("rangeMin", 0.0)
                .param("rangeMax", bad)
                .build(&ids)
                .unwrap_err();
            assert!(matches!(err, Error::NonFinite(ref key) if key == "rangeMax"));
        }
        assert_eq!(ids.peek(), OperatorId::new(1));
    }

    #[test]
    fn test_projection_copies_schema() {
        use crate::schema::{DataType, Unit};

        let ids = AtomicIdSequence::new();
        let schema = AttributeSchema::new().with_attribute(
            "temperature",
            DataType::Float32,
            Unit::new("temperature", "c").with_range(-40.0, 60.0),
        );
        let src = Operator::builder("pangaea_source", ResultType::Points, "EPSG:4326")
            .schema(schema.clone())
            .build(&ids)
            .unwrap();

        let wrapped = src.projected("EPSG:3857", &ids).unwrap();
        assert_eq!(wrapped.schema(), &schema);
        assert_eq!(src.to_builder().build(&ids).unwrap().schema(), &schema);
    }

    #[test]
    fn test_schema_for_unlisted_attribute_is_rejected() {
        let ids = AtomicIdSequence::new();
        let schema: AttributeSchema =
            serde_json::from_value(serde_json::json!({"units": {"depth": {"measurement": "depth", "unit": "m"}}}))
                .unwrap();
        let err = Operator::builder("source", ResultType::Points, "EPSG:4326")
            .schema(schema)
            .build(&ids)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAttribute(ref a) if a == "depth"));
    }
}
