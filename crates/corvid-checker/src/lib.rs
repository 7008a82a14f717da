//! Corvid Type Checker
//!
//! Static type checking for resolved Corvid programs.
//!
//! This crate provides:
//! - The resolved syntax tree and the element model it is bound to
//! - Classification of every name use into an [`ElementAccess`]
//! - Argument matching against function signatures
//! - Expression typing and statement return reachability
//! - Type promotion from `is` tests
//! - Diagnostic rendering, configuration and a parallel unit driver
//!
//! The checker only reports: type warnings never stop a unit, and the type
//! of every expression is computed on a best-effort basis.
//!
//! # Usage
//!
//! ```
//! use corvid_checker::builder::AstBuilder;
//! use corvid_checker::core_library::install_core_library;
//! use corvid_checker::driver::{CheckUnit, TypeCheckerTask, UnitBody};
//! use corvid_checker::element::{Element, ElementKind, ElementModel};
//! use corvid_types::TypeContext;
//!
//! let types = TypeContext::new();
//! let mut model = ElementModel::new();
//! install_core_library(&types, &mut model);
//! let core = *types.core();
//!
//! // int answer() { return "42"; }
//! let answer = model.add(Element::new("answer", ElementKind::Function, types.simple_function(vec![], core.int)));
//! let mut b = AstBuilder::new();
//! let value = b.string("42");
//! let ret = b.return_(Some(value));
//! let body = b.block(vec![ret]);
//! let function = b.function(Some("answer"), Some(answer), vec![], Some(body));
//! let unit = CheckUnit { element: answer, body: UnitBody::Function(function), elements: b.finish() };
//!
//! let report = TypeCheckerTask::new(&types, &model).check(&unit).unwrap();
//! assert_eq!(report.warnings.len(), 1);
//! assert_eq!(report.warnings[0].kind.to_string(), "'String' is not assignable to 'int'");
//! ```

pub mod access;
pub mod arguments;
pub mod ast;
pub mod builder;
pub mod checker;
pub mod config;
pub mod core_library;
pub mod diagnostic;
pub mod driver;
pub mod element;
pub mod error;
pub mod flow;
pub mod narrowing;

// Re-export main types
pub use access::{ElementAccess, MemberKind};
pub use checker::{Frame, NodeTypes, RecordedType, Site, TypeChecker};
pub use config::{CheckerConfig, ConfigError};
pub use diagnostic::Diagnostic;
pub use driver::{CheckUnit, TypeCheckerTask, UnitBody, UnitReport};
pub use element::{Element, ElementId, ElementKind, ElementModel, Member, TreeElements};
pub use error::{
    InternalError, InternalErrorKind, MessageKind, Severity, TypeWarning, WarningCode, WarningConfig,
};
pub use flow::StatementType;
