//! Resolved abstract syntax tree
//!
//! The checker consumes trees whose names have already been bound to
//! declarations. Bindings live beside the tree in
//! [`TreeElements`](crate::element::TreeElements), keyed by [`NodeId`].

pub mod expression;
pub mod statement;
pub mod visitor;

pub use expression::*;
pub use statement::*;
pub use visitor::*;

use std::fmt;

/// Identity of a node within one resolved unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source location information for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
            column: self.column.min(other.column),
        }
    }
}

/// Identifier: foo, this, super
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn is_this(&self) -> bool {
        self.name == "this"
    }

    pub fn is_super(&self) -> bool {
        self.name == "super"
    }
}

/// Type annotation as written; the resolved type is `type_of(id)`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}
