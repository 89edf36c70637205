//! Projection rewrites over finished operator trees.
//!
//! Trees are immutable: a rewrite returns a new root and shares every
//! untouched subtree with the input. Rebuilt nodes get fresh ids.

use opgraph_core::{GraphContext, Operator};

use crate::error::Result;

/// Wrap `root` in a projection node targeting `projection`.
///
/// Goes through `GraphContext::project`, so a root already in `projection`
/// is wrapped anyway unless the context collapses identity projections.
pub fn reproject_root(root: &Operator, projection: &str, ctx: &GraphContext) -> Result<Operator> {
    Ok(ctx.project(root, projection)?)
}

/// Wrap every child whose projection differs from its parent's in a
/// projection node targeting the parent's projection, bottom-up.
pub fn align_source_projections(root: &Operator, ctx: &GraphContext) -> Result<Operator> {
    if !root.has_sources() {
        return Ok(root.clone());
    }

    let mut changed = false;
    let mut builder = root.to_builder();
    for (port, children) in root.ports() {
        let mut aligned = Vec::with_capacity(children.len());
        for child in children {
            let mut next = align_source_projections(child, ctx)?;
            if next.projection() != root.projection() {
                next = next.projected(root.projection(), ctx.ids())?;
            }
            changed |= !Operator::ptr_eq(&next, child);
            aligned.push(next);
        }
        builder = builder.replace_sources(port, aligned);
    }

    if !changed {
        return Ok(root.clone());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(node = %root.id(), "re-linked sources after alignment");

    Ok(ctx.build(builder)?)
}
