//! Type system errors

use thiserror::Error;

/// Errors that can occur during type operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// A TypeId that this context never produced
    #[error("Invalid type id: {id}")]
    InvalidTypeId {
        /// Raw id value
        id: u32,
    },

    /// Undefined type reference
    #[error("Undefined type: {name}")]
    UndefinedType {
        /// Type name that was not found
        name: String,
    },

    /// A typedef id that was never declared
    #[error("Undefined typedef: {id}")]
    UndefinedTypedef {
        /// Raw id value
        id: u32,
    },
}
