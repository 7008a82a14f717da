//! Type context for managing types and type interning

use super::assignability::AssignabilityContext;
use super::error::TypeError;
use super::subtyping::SubtypingContext;
use super::ty::{
    ClassId, ClassInfo, FunctionType, InterfaceType, NamedParameter, Type, TypeId, TypeVar,
    TypedefId, TypedefInfo, TypedefType,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Upper bound on typedef indirections followed by `unalias`
const MAX_ALIAS_DEPTH: usize = 32;

/// Well-known types every context starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreTypes {
    /// `dynamic`
    pub dynamic: TypeId,
    /// `void`
    pub void: TypeId,
    /// `Object`
    pub object: TypeId,
    /// `num`
    pub num: TypeId,
    /// `int`
    pub int: TypeId,
    /// `double`
    pub double: TypeId,
    /// `bool`
    pub bool: TypeId,
    /// `String`
    pub string: TypeId,
    /// The `Function` interface every function type is assignable to
    pub function: TypeId,
    /// `Type`, the type of type literals
    pub type_: TypeId,
    /// `Object` class
    pub object_class: ClassId,
    /// `num` class
    pub num_class: ClassId,
    /// `int` class
    pub int_class: ClassId,
    /// `double` class
    pub double_class: ClassId,
    /// `bool` class
    pub bool_class: ClassId,
    /// `String` class
    pub string_class: ClassId,
    /// `Function` class
    pub function_class: ClassId,
    /// `Type` class
    pub type_class: ClassId,
    /// `List<E>` class
    pub list_class: ClassId,
    /// `Map<K, V>` class
    pub map_class: ClassId,
}

#[derive(Debug, Default)]
struct TypeStore {
    /// Storage for all types, indexed by TypeId
    types: Vec<Arc<Type>>,

    /// Reverse mapping from Type to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,

    /// Declared classes, indexed by ClassId
    classes: Vec<ClassInfo>,

    /// Declared typedefs, indexed by TypedefId
    typedefs: Vec<TypedefInfo>,

    /// Upper bounds of type variables, keyed by variable id
    bounds: FxHashMap<u32, TypeId>,

    next_type_var: u32,

    /// Named type definitions (classes, typedefs)
    named_types: FxHashMap<String, TypeId>,
}

impl TypeStore {
    fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(Arc::new(ty.clone()));
        self.type_to_id.insert(ty, id);
        id
    }

    fn get(&self, id: TypeId) -> Option<Arc<Type>> {
        self.types.get(id.0 as usize).cloned()
    }

    fn new_type_var(&mut self, name: &str, bound: Option<TypeId>) -> TypeId {
        let id = self.next_type_var;
        self.next_type_var += 1;
        if let Some(bound) = bound {
            self.bounds.insert(id, bound);
        }
        self.intern(Type::TypeVar(TypeVar { id, name: name.to_string() }))
    }

    fn declare_class(&mut self, name: &str, type_params: &[&str], supertype: Option<TypeId>) -> ClassId {
        let type_params = type_params
            .iter()
            .map(|param| self.new_type_var(param, None))
            .collect::<Vec<_>>();
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassInfo {
            name: name.to_string(),
            type_params: type_params.clone(),
            supertype,
            interfaces: Vec::new(),
        });
        let this_type = self.intern(Type::Interface(InterfaceType { class: id, type_args: type_params }));
        self.named_types.insert(name.to_string(), this_type);
        id
    }

    fn this_type(&mut self, class: ClassId) -> TypeId {
        let type_args = self
            .classes
            .get(class.0 as usize)
            .map(|info| info.type_params.clone())
            .unwrap_or_default();
        self.intern(Type::Interface(InterfaceType { class, type_args }))
    }

    fn substitute(&mut self, ty: TypeId, params: &[TypeId], args: &[TypeId], dynamic: TypeId) -> TypeId {
        if params.is_empty() {
            return ty;
        }
        if let Some(pos) = params.iter().position(|&param| param == ty) {
            return args.get(pos).copied().unwrap_or(dynamic);
        }
        let resolved = match self.get(ty) {
            Some(resolved) => resolved,
            None => return ty,
        };
        match &*resolved {
            Type::Interface(iface) => {
                if iface.type_args.is_empty() {
                    return ty;
                }
                let type_args = iface
                    .type_args
                    .iter()
                    .map(|&arg| self.substitute(arg, params, args, dynamic))
                    .collect::<Vec<_>>();
                if type_args == iface.type_args {
                    return ty;
                }
                self.intern(Type::Interface(InterfaceType { class: iface.class, type_args }))
            }
            Type::Function(func) => {
                let substituted = FunctionType {
                    params: func
                        .params
                        .iter()
                        .map(|&p| self.substitute(p, params, args, dynamic))
                        .collect(),
                    optional_params: func
                        .optional_params
                        .iter()
                        .map(|&p| self.substitute(p, params, args, dynamic))
                        .collect(),
                    named_params: func
                        .named_params
                        .iter()
                        .map(|named| NamedParameter {
                            name: named.name.clone(),
                            ty: self.substitute(named.ty, params, args, dynamic),
                        })
                        .collect(),
                    return_type: self.substitute(func.return_type, params, args, dynamic),
                };
                if &substituted == func {
                    return ty;
                }
                self.intern(Type::Function(substituted))
            }
            Type::Typedef(td) => {
                if td.type_args.is_empty() {
                    return ty;
                }
                let type_args = td
                    .type_args
                    .iter()
                    .map(|&arg| self.substitute(arg, params, args, dynamic))
                    .collect::<Vec<_>>();
                self.intern(Type::Typedef(TypedefType { typedef: td.typedef, type_args }))
            }
            Type::Dynamic | Type::Void | Type::Malformed(_) | Type::TypeVar(_) => ty,
        }
    }

    fn display(&self, ty: TypeId) -> String {
        let resolved = match self.get(ty) {
            Some(resolved) => resolved,
            None => return format!("{}", ty),
        };
        match &*resolved {
            Type::Dynamic => "dynamic".to_string(),
            Type::Void => "void".to_string(),
            Type::Malformed(name) => name.clone(),
            Type::TypeVar(var) => var.name.clone(),
            Type::Interface(iface) => {
                let name = self
                    .classes
                    .get(iface.class.0 as usize)
                    .map(|info| info.name.clone())
                    .unwrap_or_else(|| "?".to_string());
                self.with_args(name, &iface.type_args)
            }
            Type::Typedef(td) => {
                let name = self
                    .typedefs
                    .get(td.typedef.0 as usize)
                    .map(|info| info.name.clone())
                    .unwrap_or_else(|| "?".to_string());
                self.with_args(name, &td.type_args)
            }
            Type::Function(func) => {
                let mut parts: Vec<String> = func.params.iter().map(|&p| self.display(p)).collect();
                if !func.optional_params.is_empty() {
                    let optional: Vec<String> =
                        func.optional_params.iter().map(|&p| self.display(p)).collect();
                    parts.push(format!("[{}]", optional.join(", ")));
                }
                if !func.named_params.is_empty() {
                    let named: Vec<String> = func
                        .named_params
                        .iter()
                        .map(|p| format!("{} {}", self.display(p.ty), p.name))
                        .collect();
                    parts.push(format!("{{{}}}", named.join(", ")));
                }
                format!("({}) -> {}", parts.join(", "), self.display(func.return_type))
            }
        }
    }

    fn with_args(&self, name: String, args: &[TypeId]) -> String {
        if args.is_empty() {
            return name;
        }
        let args: Vec<String> = args.iter().map(|&arg| self.display(arg)).collect();
        format!("{}<{}>", name, args.join(", "))
    }
}

/// Type context that manages all types in a program
///
/// Types are interned so identical types share a TypeId, which makes
/// identity checks (`is this exactly int?`) a plain comparison. The store
/// sits behind a read-write lock: checking units running on different
/// threads share one context and only take the write side when a new type
/// has to be interned.
#[derive(Debug)]
pub struct TypeContext {
    store: RwLock<TypeStore>,
    core: CoreTypes,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    /// Create a new type context with the core classes declared
    pub fn new() -> Self {
        let mut store = TypeStore::default();
        let dynamic = store.intern(Type::Dynamic);
        let void = store.intern(Type::Void);

        let object_class = store.declare_class("Object", &[], None);
        let object = store.this_type(object_class);
        let num_class = store.declare_class("num", &[], Some(object));
        let num = store.this_type(num_class);
        let int_class = store.declare_class("int", &[], Some(num));
        let double_class = store.declare_class("double", &[], Some(num));
        let bool_class = store.declare_class("bool", &[], Some(object));
        let string_class = store.declare_class("String", &[], Some(object));
        let function_class = store.declare_class("Function", &[], Some(object));
        let type_class = store.declare_class("Type", &[], Some(object));
        let list_class = store.declare_class("List", &["E"], Some(object));
        let map_class = store.declare_class("Map", &["K", "V"], Some(object));

        let core = CoreTypes {
            dynamic,
            void,
            object,
            num,
            int: store.this_type(int_class),
            double: store.this_type(double_class),
            bool: store.this_type(bool_class),
            string: store.this_type(string_class),
            function: store.this_type(function_class),
            type_: store.this_type(type_class),
            object_class,
            num_class,
            int_class,
            double_class,
            bool_class,
            string_class,
            function_class,
            type_class,
            list_class,
            map_class,
        };
        store.named_types.insert("dynamic".to_string(), dynamic);
        store.named_types.insert("void".to_string(), void);

        TypeContext {
            store: RwLock::new(store),
            core,
        }
    }

    /// Well-known core types
    pub fn core(&self) -> &CoreTypes {
        &self.core
    }

    /// Intern a type, returning its TypeId
    ///
    /// If the type already exists, returns the existing TypeId.
    pub fn intern(&self, ty: Type) -> TypeId {
        if let Some(id) = self.lookup(&ty) {
            return id;
        }
        self.store.write().intern(ty)
    }

    /// Get a type by its TypeId
    pub fn get(&self, id: TypeId) -> Option<Arc<Type>> {
        self.store.read().get(id)
    }

    /// Get a type by its TypeId, failing with [`TypeError::InvalidTypeId`]
    pub fn resolve(&self, id: TypeId) -> Result<Arc<Type>, TypeError> {
        self.get(id).ok_or(TypeError::InvalidTypeId { id: id.as_u32() })
    }

    /// Get a type by its TypeId, panicking if it doesn't exist
    ///
    /// # Panics
    ///
    /// Panics if the TypeId was not produced by this context
    pub fn get_unchecked(&self, id: TypeId) -> Arc<Type> {
        self.get(id).expect("Invalid TypeId")
    }

    /// Look up a type's ID without interning (returns None if type doesn't exist)
    pub fn lookup(&self, ty: &Type) -> Option<TypeId> {
        self.store.read().type_to_id.get(ty).copied()
    }

    /// Check whether `id` denotes `dynamic` or a malformed type
    pub fn is_dynamic(&self, id: TypeId) -> bool {
        id == self.core.dynamic || self.get(id).is_some_and(|ty| ty.is_dynamic())
    }

    /// Check whether `id` denotes `void`
    pub fn is_void(&self, id: TypeId) -> bool {
        id == self.core.void
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Declare a class whose superclass defaults to `Object`
    pub fn declare_class(&self, name: &str, type_params: &[&str]) -> ClassId {
        self.store
            .write()
            .declare_class(name, type_params, Some(self.core.object))
    }

    /// Replace the superclass of `class`
    pub fn set_supertype(&self, class: ClassId, supertype: TypeId) {
        if let Some(info) = self.store.write().classes.get_mut(class.0 as usize) {
            info.supertype = Some(supertype);
        }
    }

    /// Record an implemented interface of `class`
    pub fn add_interface(&self, class: ClassId, interface: TypeId) {
        if let Some(info) = self.store.write().classes.get_mut(class.0 as usize) {
            info.interfaces.push(interface);
        }
    }

    /// Declaration info for `class`
    pub fn class_info(&self, class: ClassId) -> Option<ClassInfo> {
        self.store.read().classes.get(class.0 as usize).cloned()
    }

    /// Display name of `class`
    pub fn class_name(&self, class: ClassId) -> String {
        self.class_info(class)
            .map(|info| info.name)
            .unwrap_or_else(|| "?".to_string())
    }

    /// The class applied to its own type variables (`List<E>` inside `List`)
    pub fn this_type(&self, class: ClassId) -> TypeId {
        self.store.write().this_type(class)
    }

    /// The class applied to `type_args`
    pub fn interface_type(&self, class: ClassId, type_args: Vec<TypeId>) -> TypeId {
        self.intern(Type::Interface(InterfaceType { class, type_args }))
    }

    /// The declaring class of an interface type
    pub fn class_of(&self, ty: TypeId) -> Option<ClassId> {
        self.get(ty).and_then(|resolved| resolved.as_interface().map(|iface| iface.class))
    }

    /// `List<element>`
    pub fn list_of(&self, element: TypeId) -> TypeId {
        self.interface_type(self.core.list_class, vec![element])
    }

    /// `Map<key, value>`
    pub fn map_of(&self, key: TypeId, value: TypeId) -> TypeId {
        self.interface_type(self.core.map_class, vec![key, value])
    }

    /// Build a function type; named parameters are sorted by name
    pub fn function_type(
        &self,
        params: Vec<TypeId>,
        optional_params: Vec<TypeId>,
        named_params: Vec<(&str, TypeId)>,
        return_type: TypeId,
    ) -> TypeId {
        let mut named_params: Vec<NamedParameter> = named_params
            .into_iter()
            .map(|(name, ty)| NamedParameter { name: name.to_string(), ty })
            .collect();
        named_params.sort_by(|a, b| a.name.cmp(&b.name));
        self.intern(Type::Function(FunctionType {
            params,
            optional_params,
            named_params,
            return_type,
        }))
    }

    /// Build a function type with required positional parameters only
    pub fn simple_function(&self, params: Vec<TypeId>, return_type: TypeId) -> TypeId {
        self.function_type(params, Vec::new(), Vec::new(), return_type)
    }

    /// Create a fresh type variable
    pub fn type_variable(&self, name: &str, bound: Option<TypeId>) -> TypeId {
        self.store.write().new_type_var(name, bound)
    }

    /// Upper bound of a type variable (`Object` when unbounded)
    pub fn type_variable_bound(&self, var: &TypeVar) -> TypeId {
        self.store
            .read()
            .bounds
            .get(&var.id)
            .copied()
            .unwrap_or(self.core.object)
    }

    /// Create a malformed type standing for an unresolvable annotation
    pub fn malformed(&self, name: &str) -> TypeId {
        self.intern(Type::Malformed(name.to_string()))
    }

    /// Declare a typedef; its alias is supplied by [`Self::define_typedef`]
    pub fn declare_typedef(&self, name: &str, type_params: &[&str]) -> TypedefId {
        let mut store = self.store.write();
        let type_params = type_params
            .iter()
            .map(|param| store.new_type_var(param, None))
            .collect::<Vec<_>>();
        let id = TypedefId(store.typedefs.len() as u32);
        store.typedefs.push(TypedefInfo {
            name: name.to_string(),
            type_params: type_params.clone(),
            alias: None,
        });
        let ty = store.intern(Type::Typedef(TypedefType { typedef: id, type_args: type_params }));
        store.named_types.insert(name.to_string(), ty);
        id
    }

    /// The typedef's own type variables
    pub fn typedef_params(&self, typedef: TypedefId) -> Vec<TypeId> {
        self.store
            .read()
            .typedefs
            .get(typedef.0 as usize)
            .map(|info| info.type_params.clone())
            .unwrap_or_default()
    }

    /// Set the aliased type of a typedef
    pub fn define_typedef(&self, typedef: TypedefId, alias: TypeId) -> Result<(), TypeError> {
        let mut store = self.store.write();
        let info = store
            .typedefs
            .get_mut(typedef.0 as usize)
            .ok_or(TypeError::UndefinedTypedef { id: typedef.0 })?;
        info.alias = Some(alias);
        Ok(())
    }

    /// The typedef applied to `type_args`
    pub fn typedef_type(&self, typedef: TypedefId, type_args: Vec<TypeId>) -> TypeId {
        self.intern(Type::Typedef(TypedefType { typedef, type_args }))
    }

    /// Look up a named type by name
    pub fn lookup_named_type(&self, name: &str) -> Option<TypeId> {
        self.store.read().named_types.get(name).copied()
    }

    /// Resolve a named type, returning an error if not found
    pub fn resolve_named_type(&self, name: &str) -> Result<TypeId, TypeError> {
        self.lookup_named_type(name).ok_or_else(|| TypeError::UndefinedType {
            name: name.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Type operations
    // ------------------------------------------------------------------

    /// Replace each type in `params` by the argument at the same position
    ///
    /// Parameters without a matching argument (raw types) become `dynamic`.
    pub fn substitute(&self, ty: TypeId, params: &[TypeId], args: &[TypeId]) -> TypeId {
        if params.is_empty() {
            return ty;
        }
        self.store.write().substitute(ty, params, args, self.core.dynamic)
    }

    /// Resolve typedefs to the function or interface shape they alias
    pub fn unalias(&self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..MAX_ALIAS_DEPTH {
            let td = match self.get(current).as_deref() {
                Some(Type::Typedef(td)) => td.clone(),
                _ => return current,
            };
            let info = self.store.read().typedefs.get(td.typedef.0 as usize).cloned();
            current = match info {
                Some(TypedefInfo { type_params, alias: Some(alias), .. }) => {
                    self.substitute(alias, &type_params, &td.type_args)
                }
                _ => return self.core.dynamic,
            };
        }
        self.core.dynamic
    }

    /// Direct supertypes of an interface type, instantiated with its arguments
    ///
    /// The superclass comes first, followed by the implemented interfaces.
    pub fn supertypes(&self, ty: TypeId) -> Vec<TypeId> {
        let iface = match self.get(ty).as_deref() {
            Some(Type::Interface(iface)) => iface.clone(),
            _ => return Vec::new(),
        };
        let info = match self.class_info(iface.class) {
            Some(info) => info,
            None => return Vec::new(),
        };
        info.supertype
            .into_iter()
            .chain(info.interfaces.iter().copied())
            .map(|sup| self.substitute(sup, &info.type_params, &iface.type_args))
            .collect()
    }

    /// Human-readable rendering of a type
    pub fn display(&self, ty: TypeId) -> String {
        self.store.read().display(ty)
    }

    /// Check if `sub` is a subtype of `sup`
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        SubtypingContext::new(self).is_subtype(sub, sup)
    }

    /// Check if `source` is assignable to `target`
    pub fn is_assignable(&self, source: TypeId, target: TypeId) -> bool {
        AssignabilityContext::new(self).is_assignable(source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_is_identity() {
        let ctx = TypeContext::new();
        let a = ctx.list_of(ctx.core().int);
        let b = ctx.list_of(ctx.core().int);
        assert_eq!(a, b);
        assert_ne!(a, ctx.list_of(ctx.core().string));
    }

    #[test]
    fn test_display() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        assert_eq!(ctx.display(core.int), "int");
        assert_eq!(ctx.display(ctx.map_of(core.string, core.int)), "Map<String, int>");
        let func = ctx.function_type(vec![core.int], vec![core.string], vec![("flag", core.bool)], core.void);
        assert_eq!(ctx.display(func), "(int, [String], {bool flag}) -> void");
    }

    #[test]
    fn test_substitute_raw_type_defaults_to_dynamic() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let info = ctx.class_info(core.list_class).unwrap();
        let getter = ctx.simple_function(vec![core.int], info.type_params[0]);
        let raw = ctx.substitute(getter, &info.type_params, &[]);
        assert_eq!(ctx.display(raw), "(int) -> dynamic");
        let of_string = ctx.substitute(getter, &info.type_params, &[core.string]);
        assert_eq!(ctx.display(of_string), "(int) -> String");
    }

    #[test]
    fn test_unalias_typedef() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let td = ctx.declare_typedef("Mapper", &["T"]);
        let t = ctx.typedef_params(td)[0];
        ctx.define_typedef(td, ctx.simple_function(vec![t], t)).unwrap();
        let applied = ctx.typedef_type(td, vec![core.int]);
        assert_eq!(ctx.display(applied), "Mapper<int>");
        assert_eq!(ctx.display(ctx.unalias(applied)), "(int) -> int");
    }

    #[test]
    fn test_undefined_typedef_unaliases_to_dynamic() {
        let ctx = TypeContext::new();
        let td = ctx.declare_typedef("Pending", &[]);
        let ty = ctx.typedef_type(td, vec![]);
        assert_eq!(ctx.unalias(ty), ctx.core().dynamic);
    }

    #[test]
    fn test_supertypes_are_instantiated() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let boxed = ctx.declare_class("Box", &["T"]);
        let t = ctx.class_info(boxed).unwrap().type_params[0];
        ctx.set_supertype(boxed, ctx.list_of(t));
        let box_of_int = ctx.interface_type(boxed, vec![core.int]);
        assert_eq!(ctx.supertypes(box_of_int), vec![ctx.list_of(core.int)]);
    }

    #[test]
    fn test_named_types() {
        let ctx = TypeContext::new();
        assert_eq!(ctx.lookup_named_type("int"), Some(ctx.core().int));
        assert!(ctx.resolve_named_type("Nope").is_err());
    }
}
