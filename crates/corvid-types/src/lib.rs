//! Corvid Type System
//!
//! Interned type representation, the class hierarchy, and the subtype and
//! assignability relations the checker queries.

#![warn(missing_docs)]

pub mod ty;
pub mod context;
pub mod error;
pub mod subtyping;
pub mod assignability;

pub use ty::{ClassId, ClassInfo, FunctionType, InterfaceType, Type, TypeId, TypeVar, TypedefId};
pub use context::{CoreTypes, TypeContext};
pub use error::TypeError;
pub use subtyping::SubtypingContext;
pub use assignability::AssignabilityContext;
