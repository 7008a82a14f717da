//! Assignability between types
//!
//! Implements the assignability relation T ~> U (T is assignable to U).
//! A value may flow into a slot when either type is a subtype of the other,
//! so downcasts are accepted statically and checked at run time.

use super::context::TypeContext;
use super::subtyping::SubtypingContext;
use super::ty::TypeId;

/// Context for checking assignability
#[derive(Debug)]
pub struct AssignabilityContext<'a> {
    /// Subtyping context
    subtyping: SubtypingContext<'a>,
}

impl<'a> AssignabilityContext<'a> {
    /// Create a new assignability context
    pub fn new(type_ctx: &'a TypeContext) -> Self {
        AssignabilityContext {
            subtyping: SubtypingContext::new(type_ctx),
        }
    }

    /// Check if `source` is assignable to `target` (source ~> target)
    pub fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        self.subtyping.is_subtype(source, target) || self.subtyping.is_subtype(target, source)
    }
}
