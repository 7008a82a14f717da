//! Type warnings and internal errors
//!
//! Type warnings never stop checking; an [`InternalError`] aborts the unit
//! being checked and nothing else.

use crate::ast::{NodeId, Span};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// What a type warning says, with its structured arguments
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// A value flows into a slot of an unrelated type
    #[error("'{from}' is not assignable to '{to}'")]
    NotAssignable {
        /// Type of the value
        from: String,
        /// Type of the slot
        to: String,
    },

    /// A void-typed expression is used as a value
    #[error("Expression does not yield a value")]
    VoidExpression,

    /// A variable is declared with type void
    #[error("Variable cannot be of type void")]
    VoidVariable,

    /// `return expr;` in a void function
    #[error("Cannot return value from void function")]
    ReturnValueInVoid,

    /// `return;` in a function that must return a value
    #[error("Value of type '{return_type}' expected")]
    ReturnNothing {
        /// Declared return type
        return_type: String,
    },

    /// No path through a non-void body returns
    #[error("Missing return")]
    MissingReturn,

    /// Some paths through a non-void body fall off the end
    #[error("Not all paths lead to a return or throw statement")]
    MaybeMissingReturn,

    /// Statement after one that always returns
    #[error("Unreachable code")]
    UnreachableCode,

    /// Call of an undeclared method
    #[error("No method named '{member_name}' in class '{class_name}'")]
    MethodNotFound {
        /// Receiver class
        class_name: String,
        /// Requested member
        member_name: String,
    },

    /// Application of an undeclared operator
    #[error("No operator '{member_name}' in class '{class_name}'")]
    OperatorNotFound {
        /// Receiver class
        class_name: String,
        /// Requested operator
        member_name: String,
    },

    /// Read or write of an undeclared property
    #[error("No member named '{member_name}' in class '{class_name}'")]
    PropertyNotFound {
        /// Receiver class
        class_name: String,
        /// Requested member
        member_name: String,
    },

    /// Call of something that is not a function
    #[error("'{element_name}' is not callable")]
    NotCallable {
        /// Name of the callee
        element_name: String,
    },

    /// Named argument the callee does not declare
    #[error("No named argument '{argument_name}' found on method")]
    NamedArgumentNotFound {
        /// Argument name as written
        argument_name: String,
    },

    /// More positional arguments than parameters
    #[error("Additional arguments are not allowed")]
    AdditionalArgument,

    /// A required parameter received no argument
    #[error("Missing argument of type '{argument_type}'")]
    MissingArgument {
        /// Type of the first unfilled parameter
        argument_type: String,
    },

    /// Points at the callee's declaration after an argument problem
    #[error("This is the method declaration")]
    ThisIsTheMethod,
}

impl MessageKind {
    /// Get the warning code for this message
    pub fn code(&self) -> WarningCode {
        match self {
            MessageKind::NotAssignable { .. } => WarningCode::NotAssignable,
            MessageKind::VoidExpression => WarningCode::VoidExpression,
            MessageKind::VoidVariable => WarningCode::VoidVariable,
            MessageKind::ReturnValueInVoid => WarningCode::ReturnValueInVoid,
            MessageKind::ReturnNothing { .. } => WarningCode::ReturnNothing,
            MessageKind::MissingReturn => WarningCode::MissingReturn,
            MessageKind::MaybeMissingReturn => WarningCode::MaybeMissingReturn,
            MessageKind::UnreachableCode => WarningCode::UnreachableCode,
            MessageKind::MethodNotFound { .. } => WarningCode::MethodNotFound,
            MessageKind::OperatorNotFound { .. } => WarningCode::OperatorNotFound,
            MessageKind::PropertyNotFound { .. } => WarningCode::PropertyNotFound,
            MessageKind::NotCallable { .. } => WarningCode::NotCallable,
            MessageKind::NamedArgumentNotFound { .. } => WarningCode::NamedArgumentNotFound,
            MessageKind::AdditionalArgument => WarningCode::AdditionalArgument,
            MessageKind::MissingArgument { .. } => WarningCode::MissingArgument,
            MessageKind::ThisIsTheMethod => WarningCode::ThisIsTheMethod,
        }
    }
}

/// How a diagnostic is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A type warning
    Warning,
    /// A pointer attached to a preceding warning
    Info,
}

/// A diagnostic produced while checking a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeWarning {
    /// Message and arguments
    pub kind: MessageKind,
    /// Warning or info pointer
    pub severity: Severity,
    /// Node the diagnostic is attached to
    pub node: NodeId,
    /// Location of that node
    pub span: Span,
}

impl TypeWarning {
    /// Get the primary span associated with this warning
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the warning code for this warning
    pub fn code(&self) -> WarningCode {
        self.kind.code()
    }

    /// Check if this is an info pointer rather than a warning
    pub fn is_info(&self) -> bool {
        self.severity == Severity::Info
    }
}

impl fmt::Display for TypeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.span.line, self.span.column, self.kind)
    }
}

// ========================================================================
// Warning codes
// ========================================================================

/// Warning codes for configurable warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WarningCode {
    /// Value not assignable to its slot (W2001)
    NotAssignable,
    /// Void used as a value (W2002)
    VoidExpression,
    /// Variable of type void (W2003)
    VoidVariable,
    /// Value returned from a void function (W2004)
    ReturnValueInVoid,
    /// Bare return in a non-void function (W2005)
    ReturnNothing,
    /// Body never returns (W2006)
    MissingReturn,
    /// Body may fall off the end (W2007)
    MaybeMissingReturn,
    /// Unreachable code (W2008)
    UnreachableCode,
    /// Unknown method (W2009)
    MethodNotFound,
    /// Unknown operator (W2010)
    OperatorNotFound,
    /// Unknown property (W2011)
    PropertyNotFound,
    /// Call of a non-function (W2012)
    NotCallable,
    /// Unknown named argument (W2013)
    NamedArgumentNotFound,
    /// Too many positional arguments (W2014)
    AdditionalArgument,
    /// Missing required argument (W2015)
    MissingArgument,
    /// Callee declaration pointer (W2016)
    ThisIsTheMethod,
}

impl WarningCode {
    /// Every code, in numeric order
    pub const ALL: [WarningCode; 16] = [
        WarningCode::NotAssignable,
        WarningCode::VoidExpression,
        WarningCode::VoidVariable,
        WarningCode::ReturnValueInVoid,
        WarningCode::ReturnNothing,
        WarningCode::MissingReturn,
        WarningCode::MaybeMissingReturn,
        WarningCode::UnreachableCode,
        WarningCode::MethodNotFound,
        WarningCode::OperatorNotFound,
        WarningCode::PropertyNotFound,
        WarningCode::NotCallable,
        WarningCode::NamedArgumentNotFound,
        WarningCode::AdditionalArgument,
        WarningCode::MissingArgument,
        WarningCode::ThisIsTheMethod,
    ];

    /// Get the warning code string (e.g., "W2001")
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::NotAssignable => "W2001",
            WarningCode::VoidExpression => "W2002",
            WarningCode::VoidVariable => "W2003",
            WarningCode::ReturnValueInVoid => "W2004",
            WarningCode::ReturnNothing => "W2005",
            WarningCode::MissingReturn => "W2006",
            WarningCode::MaybeMissingReturn => "W2007",
            WarningCode::UnreachableCode => "W2008",
            WarningCode::MethodNotFound => "W2009",
            WarningCode::OperatorNotFound => "W2010",
            WarningCode::PropertyNotFound => "W2011",
            WarningCode::NotCallable => "W2012",
            WarningCode::NamedArgumentNotFound => "W2013",
            WarningCode::AdditionalArgument => "W2014",
            WarningCode::MissingArgument => "W2015",
            WarningCode::ThisIsTheMethod => "W2016",
        }
    }

    /// Kebab-case name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            WarningCode::NotAssignable => "not-assignable",
            WarningCode::VoidExpression => "void-expression",
            WarningCode::VoidVariable => "void-variable",
            WarningCode::ReturnValueInVoid => "return-value-in-void",
            WarningCode::ReturnNothing => "return-nothing",
            WarningCode::MissingReturn => "missing-return",
            WarningCode::MaybeMissingReturn => "maybe-missing-return",
            WarningCode::UnreachableCode => "unreachable-code",
            WarningCode::MethodNotFound => "method-not-found",
            WarningCode::OperatorNotFound => "operator-not-found",
            WarningCode::PropertyNotFound => "property-not-found",
            WarningCode::NotCallable => "not-callable",
            WarningCode::NamedArgumentNotFound => "named-argument-not-found",
            WarningCode::AdditionalArgument => "additional-argument",
            WarningCode::MissingArgument => "missing-argument",
            WarningCode::ThisIsTheMethod => "this-is-the-method",
        }
    }

    /// Parse a warning code from its kebab-case name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.name() == name)
    }
}

/// Configuration for which warnings are enabled/disabled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarningConfig {
    /// Disabled warning codes (suppressed)
    pub disabled: HashSet<WarningCode>,
    /// Warnings rendered as errors
    pub deny: HashSet<WarningCode>,
    /// When true, ALL warnings render as errors
    pub strict: bool,
}

impl WarningConfig {
    /// Strict mode: all warnings are errors
    pub fn strict() -> Self {
        Self { strict: true, ..Self::default() }
    }

    /// Check if a warning should be emitted
    pub fn is_enabled(&self, code: WarningCode) -> bool {
        !self.disabled.contains(&code)
    }

    /// Check if a warning should be treated as an error
    pub fn is_denied(&self, code: WarningCode) -> bool {
        self.strict || self.deny.contains(&code)
    }
}

// ========================================================================
// Internal errors
// ========================================================================

/// An inconsistency in the resolved input; aborts the current unit
#[derive(Debug, Error, Clone, PartialEq)]
#[error("internal error: {kind}")]
pub struct InternalError {
    /// What went wrong
    pub kind: InternalErrorKind,
    /// Last node the checker entered before failing
    pub last_seen: Option<NodeId>,
    /// Location of that node, when known
    pub span: Option<Span>,
}

/// Kinds of internal error
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InternalErrorKind {
    /// `this` or an instance member outside any class
    #[error("no enclosing class for '{name}'")]
    NoEnclosingClass {
        /// Name being resolved
        name: String,
    },

    /// An element kind the access rules do not cover
    #[error("unexpected element '{name}' of kind {kind}")]
    UnexpectedElement {
        /// Element name
        name: String,
        /// Element kind
        kind: String,
    },

    /// An element id missing from the model
    #[error("unknown element #{id}")]
    UnknownElement {
        /// Raw element id
        id: u32,
    },

    /// A cascade placeholder outside a cascade section
    #[error("cascade receiver outside a cascade")]
    CascadeReceiverOutsideCascade,

    /// A collection literal without a resolved type
    #[error("no type recorded for literal {node}")]
    MissingLiteralType {
        /// The literal's node
        node: NodeId,
    },

    /// A type the type context never produced
    #[error(transparent)]
    Type(#[from] corvid_types::TypeError),
}

impl InternalError {
    /// Create an internal error not yet attributed to a node
    pub fn new(kind: InternalErrorKind) -> Self {
        InternalError { kind, last_seen: None, span: None }
    }

    /// Attribute the error to the last node seen
    pub fn at(mut self, node: NodeId, span: Span) -> Self {
        self.last_seen = Some(node);
        self.span = Some(span);
        self
    }
}

impl From<InternalErrorKind> for InternalError {
    fn from(kind: InternalErrorKind) -> Self {
        InternalError::new(kind)
    }
}
