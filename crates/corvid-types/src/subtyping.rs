//! Subtyping rules for the Corvid type system
//!
//! Implements the subtyping relation T <: U (T is a subtype of U).

use crate::context::TypeContext;
use crate::ty::{FunctionType, InterfaceType, Type, TypeId};

/// Depth at which a supertype walk is abandoned (cyclic hierarchies)
const MAX_DEPTH: usize = 64;

/// Context for checking subtyping relationships
#[derive(Debug, Clone)]
pub struct SubtypingContext<'a> {
    /// Type context for resolving types
    type_ctx: &'a TypeContext,

    /// Current nesting of relation checks
    depth: usize,
}

impl<'a> SubtypingContext<'a> {
    /// Create a new subtyping context
    pub fn new(type_ctx: &'a TypeContext) -> Self {
        SubtypingContext { type_ctx, depth: 0 }
    }

    /// Check if `sub` is a subtype of `sup` (sub <: sup)
    ///
    /// Returns true if a value of type `sub` can be used where `sup` is expected.
    pub fn is_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        // Reflexivity: T <: T
        if sub == sup {
            return true;
        }
        if self.depth >= MAX_DEPTH {
            return false;
        }

        self.depth += 1;
        let result = self.check(sub, sup);
        self.depth -= 1;
        result
    }

    fn check(&mut self, sub: TypeId, sup: TypeId) -> bool {
        let sub = self.type_ctx.unalias(sub);
        let sup = self.type_ctx.unalias(sup);
        if sub == sup {
            return true;
        }

        let sub_ty = match self.type_ctx.get(sub) {
            Some(ty) => ty,
            None => return false,
        };
        let sup_ty = match self.type_ctx.get(sup) {
            Some(ty) => ty,
            None => return false,
        };

        match (&*sub_ty, &*sup_ty) {
            // dynamic is both top and bottom
            (sub_ty, sup_ty) if sub_ty.is_dynamic() || sup_ty.is_dynamic() => true,

            // void only relates to itself
            (Type::Void, _) | (_, Type::Void) => false,

            (Type::TypeVar(var), _) => {
                let bound = self.type_ctx.type_variable_bound(var);
                bound != sub && self.is_subtype(bound, sup)
            }
            (_, Type::TypeVar(_)) => false,

            (Type::Interface(sub_iface), Type::Interface(sup_iface)) => {
                self.is_interface_subtype(sub, sub_iface, sup_iface)
            }

            (Type::Function(_), Type::Interface(sup_iface)) => {
                let core = self.type_ctx.core();
                sup_iface.class == core.function_class || sup_iface.class == core.object_class
            }

            (Type::Function(f1), Type::Function(f2)) => self.is_function_subtype(f1, f2),

            _ => false,
        }
    }

    fn is_interface_subtype(
        &mut self,
        sub: TypeId,
        sub_iface: &InterfaceType,
        sup_iface: &InterfaceType,
    ) -> bool {
        if sub_iface.class == sup_iface.class {
            // Raw types accept any instantiation
            if sub_iface.type_args.is_empty() || sup_iface.type_args.is_empty() {
                return true;
            }
            // Type arguments are covariant
            return sub_iface.type_args.len() == sup_iface.type_args.len()
                && sub_iface
                    .type_args
                    .iter()
                    .zip(sup_iface.type_args.iter())
                    .all(|(&a, &b)| self.is_subtype(a, b));
        }

        if sup_iface.class == self.type_ctx.core().object_class {
            return true;
        }

        let sup = self.type_ctx.interface_type(sup_iface.class, sup_iface.type_args.clone());
        self.type_ctx
            .supertypes(sub)
            .into_iter()
            .any(|supertype| self.is_subtype(supertype, sup))
    }

    // (P1, [O1]) -> R <: (Q1, [O2]) -> S when the required counts match, the
    // subtype offers at least as many optional slots, every named parameter
    // of the supertype exists, parameter types are mutually assignable, and
    // R is assignable to S (anything goes against void).
    fn is_function_subtype(&mut self, f1: &FunctionType, f2: &FunctionType) -> bool {
        if f1.params.len() != f2.params.len() {
            return false;
        }
        if f1.optional_params.len() < f2.optional_params.len() {
            return false;
        }

        let params_match = f1
            .params
            .iter()
            .zip(f2.params.iter())
            .chain(f1.optional_params.iter().zip(f2.optional_params.iter()))
            .all(|(&p1, &p2)| self.assignable(p1, p2));
        if !params_match {
            return false;
        }

        for named in &f2.named_params {
            match f1.named_parameter_type(&named.name) {
                Some(ty) if self.assignable(ty, named.ty) => {}
                _ => return false,
            }
        }

        let void = self.type_ctx.core().void;
        f2.return_type == void || self.assignable(f1.return_type, f2.return_type)
    }

    fn assignable(&mut self, a: TypeId, b: TypeId) -> bool {
        self.is_subtype(a, b) || self.is_subtype(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflexivity() {
        let ctx = TypeContext::new();
        let int = ctx.core().int;
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(int, int));
    }

    #[test]
    fn test_dynamic_is_top_and_bottom() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let malformed = ctx.malformed("Missing");
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(core.dynamic, core.int));
        assert!(sub_ctx.is_subtype(core.string, core.dynamic));
        assert!(sub_ctx.is_subtype(malformed, core.string));
        assert!(sub_ctx.is_subtype(core.void, core.dynamic));
    }

    #[test]
    fn test_void_relates_only_to_void() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(core.void, core.void));
        assert!(!sub_ctx.is_subtype(core.void, core.object));
        assert!(!sub_ctx.is_subtype(core.int, core.void));
    }

    #[test]
    fn test_class_hierarchy() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(core.int, core.num));
        assert!(sub_ctx.is_subtype(core.int, core.object));
        assert!(!sub_ctx.is_subtype(core.num, core.int));
        assert!(!sub_ctx.is_subtype(core.int, core.double));
    }

    #[test]
    fn test_generic_covariance() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let list_int = ctx.list_of(core.int);
        let list_num = ctx.list_of(core.num);
        let raw = ctx.interface_type(core.list_class, vec![]);
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(list_int, list_num));
        assert!(!sub_ctx.is_subtype(list_num, list_int));
        assert!(sub_ctx.is_subtype(raw, list_int));
    }

    #[test]
    fn test_interfaces_are_walked() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let comparable = ctx.declare_class("Comparable", &[]);
        let version = ctx.declare_class("Version", &[]);
        ctx.add_interface(version, ctx.this_type(comparable));
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(ctx.this_type(version), ctx.this_type(comparable)));
        assert!(!sub_ctx.is_subtype(ctx.this_type(comparable), core.string));
    }

    #[test]
    fn test_type_variable_uses_bound() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let t = ctx.type_variable("T", Some(core.num));
        let u = ctx.type_variable("U", None);
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(t, core.num));
        assert!(!sub_ctx.is_subtype(t, core.int));
        assert!(sub_ctx.is_subtype(u, core.object));
        assert!(!sub_ctx.is_subtype(core.int, t));
    }

    #[test]
    fn test_function_types() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let int_to_int = ctx.simple_function(vec![core.int], core.int);
        let num_to_void = ctx.simple_function(vec![core.num], core.void);
        let nullary = ctx.simple_function(vec![], core.int);
        let with_optional = ctx.function_type(vec![core.int], vec![core.int], vec![], core.int);
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(int_to_int, core.function));
        assert!(sub_ctx.is_subtype(int_to_int, core.object));
        assert!(sub_ctx.is_subtype(int_to_int, num_to_void));
        assert!(!sub_ctx.is_subtype(num_to_void, int_to_int));
        assert!(!sub_ctx.is_subtype(nullary, int_to_int));
        assert!(sub_ctx.is_subtype(with_optional, int_to_int));
        assert!(!sub_ctx.is_subtype(int_to_int, with_optional));
    }

    #[test]
    fn test_named_parameters_required_in_subtype() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let named = ctx.function_type(vec![], vec![], vec![("flag", core.bool)], core.void);
        let plain = ctx.simple_function(vec![], core.void);
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(sub_ctx.is_subtype(named, plain));
        assert!(!sub_ctx.is_subtype(plain, named));
    }

    #[test]
    fn test_cyclic_hierarchy_terminates() {
        let ctx = TypeContext::new();
        let core = *ctx.core();
        let a = ctx.declare_class("A", &[]);
        let b = ctx.declare_class("B", &[]);
        ctx.set_supertype(a, ctx.this_type(b));
        ctx.set_supertype(b, ctx.this_type(a));
        let mut sub_ctx = SubtypingContext::new(&ctx);

        assert!(!sub_ctx.is_subtype(ctx.this_type(a), core.string));
    }
}
