//! Core type definitions for the Corvid type system

use std::fmt;

/// Unique identifier for a type in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Create a new TypeId from a raw value
    ///
    /// Note: This should generally only be used internally or for interop.
    /// Prefer using TypeContext methods to get well-known type IDs.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value of this TypeId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Identifier of a declared class in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// Get the raw value of this ClassId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Identifier of a declared typedef in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedefId(pub(crate) u32);

/// A class or interface instantiated with type arguments: `List<int>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceType {
    /// Declaring class
    pub class: ClassId,
    /// Type arguments, one per class type parameter (empty for raw types)
    pub type_args: Vec<TypeId>,
}

/// A named optional parameter of a function type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedParameter {
    /// Parameter name
    pub name: String,
    /// Declared parameter type
    pub ty: TypeId,
}

/// Function type: `(T1, [T2], {T3 n}) -> R`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Required positional parameter types, in order
    pub params: Vec<TypeId>,
    /// Optional positional parameter types, in order
    pub optional_params: Vec<TypeId>,
    /// Named parameters, sorted by name
    pub named_params: Vec<NamedParameter>,
    /// Return type
    pub return_type: TypeId,
}

impl FunctionType {
    /// Type of the named parameter `name`, if declared
    pub fn named_parameter_type(&self, name: &str) -> Option<TypeId> {
        self.named_params
            .iter()
            .find(|param| param.name == name)
            .map(|param| param.ty)
    }

    /// First required positional parameter type, if any
    pub fn first_param(&self) -> Option<TypeId> {
        self.params.first().copied()
    }

    /// Second required positional parameter type, if any
    pub fn second_param(&self) -> Option<TypeId> {
        self.params.get(1).copied()
    }
}

/// Type variable for generics: `T`, `E`, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVar {
    /// Unique id; two variables named `T` on different classes differ
    pub id: u32,
    /// Type variable name
    pub name: String,
}

/// Reference to a typedef, possibly applied to type arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedefType {
    /// Declared typedef
    pub typedef: TypedefId,
    /// Type arguments for the typedef's own type parameters
    pub type_args: Vec<TypeId>,
}

/// Type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// `dynamic`: assignable to and from every type
    Dynamic,
    /// `void`
    Void,
    /// An annotation the resolver could not resolve; behaves like `dynamic`
    Malformed(String),
    /// Class or interface type
    Interface(InterfaceType),
    /// Function type
    Function(FunctionType),
    /// Type variable
    TypeVar(TypeVar),
    /// Typedef alias
    Typedef(TypedefType),
}

impl Type {
    /// `dynamic` or an unresolvable annotation
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Dynamic | Type::Malformed(_))
    }

    /// Check if this is the `void` type
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Check if this is a malformed type
    pub fn is_malformed(&self) -> bool {
        matches!(self, Type::Malformed(_))
    }

    /// The function shape of this type, if it is one
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(func) => Some(func),
            _ => None,
        }
    }

    /// The interface shape of this type, if it is one
    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            Type::Interface(iface) => Some(iface),
            _ => None,
        }
    }
}

/// Declaration-side information about a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Class name
    pub name: String,
    /// The class's own type variables (each a `Type::TypeVar`)
    pub type_params: Vec<TypeId>,
    /// Direct superclass, instantiated in terms of `type_params`
    pub supertype: Option<TypeId>,
    /// Directly implemented interfaces, instantiated in terms of `type_params`
    pub interfaces: Vec<TypeId>,
}

/// Declaration-side information about a typedef
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefInfo {
    /// Typedef name
    pub name: String,
    /// The typedef's own type variables
    pub type_params: Vec<TypeId>,
    /// Aliased type; `None` until [`crate::TypeContext::define_typedef`] runs
    pub alias: Option<TypeId>,
}
