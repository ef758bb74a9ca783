#![deny(missing_docs)]

//! # Reference Resolution
//!
//! The ref index maps canonical reference strings to the schemas they name.
//!
//! Every component tree is flattened (see `Schema::flatten`) and each node with a
//! single-segment name is indexed, so array items of a top-level array
//! (`UsersItem`) are addressable as if they were components themselves.

use crate::error::{AppError, AppResult};
use crate::oas::names::RefString;
use crate::oas::schemas::Schema;
use std::collections::HashMap;

/// Canonical reference string -> schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefIndex {
    entries: HashMap<RefString, Schema>,
}

impl RefIndex {
    /// Builds the index over the given component trees.
    ///
    /// Two nodes claiming the same reference string is a `DuplicateSchema` error.
    pub fn build<'a>(schemas: impl IntoIterator<Item = &'a Schema>) -> AppResult<Self> {
        let mut entries = HashMap::new();
        for schema in schemas {
            for node in schema.flatten() {
                let Some(key) = node.name().to_ref() else {
                    continue;
                };
                if entries.contains_key(&key) {
                    return Err(AppError::DuplicateSchema(key.to_string()));
                }
                entries.insert(key, node.clone());
            }
        }
        Ok(Self { entries })
    }

    /// Looks up a reference, failing with `MissingReference` when it is not local
    /// or not part of the document.
    pub fn resolve(&self, target: &RefString) -> AppResult<&Schema> {
        self.get(target)
            .ok_or_else(|| AppError::MissingReference(target.to_string()))
    }

    /// Non-failing lookup.
    pub fn get(&self, target: &RefString) -> Option<&Schema> {
        self.entries.get(&target.canonical())
    }

    /// Follows a chain of `Ref` nodes to the first non-ref schema.
    ///
    /// A chain that loops back on itself is reported as a missing reference.
    pub fn resolve_deep<'a>(&'a self, schema: &'a Schema) -> AppResult<&'a Schema> {
        let mut current = schema;
        let mut hops = 0usize;
        while let Schema::Ref(r) = current {
            if hops > self.entries.len() {
                return Err(AppError::MissingReference(r.target.to_string()));
            }
            current = self.resolve(&r.target)?;
            hops += 1;
        }
        Ok(current)
    }

    /// Verifies that every `Ref` reachable from `schemas` resolves.
    ///
    /// Composition members are checked too, even though they are not indexed.
    pub fn check_references<'a>(
        &self,
        schemas: impl IntoIterator<Item = &'a Schema>,
    ) -> AppResult<()> {
        for schema in schemas {
            self.check_tree(schema)?;
        }
        Ok(())
    }

    fn check_tree(&self, schema: &Schema) -> AppResult<()> {
        for node in schema.flatten() {
            match node {
                Schema::Ref(r) => {
                    self.resolve(&r.target)?;
                }
                Schema::Composed(c) => {
                    for member in &c.members {
                        self.check_tree(member)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Number of indexed schemas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
