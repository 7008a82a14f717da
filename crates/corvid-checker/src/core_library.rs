//! Members of the core library classes
//!
//! [`TypeContext::new`] declares the core classes; this module gives them
//! the members the checker needs to type ordinary arithmetic, comparisons,
//! string concatenation and collection indexing.

use crate::element::{Element, ElementKind, ElementModel};
use corvid_types::{ClassId, TypeContext, TypeId};

const NUMERIC_OPERATORS: [&str; 5] = ["+", "-", "*", "/", "%"];
const COMPARISON_OPERATORS: [&str; 4] = ["<", ">", "<=", ">="];
const BITWISE_OPERATORS: [&str; 5] = ["&", "|", "^", "<<", ">>"];

/// Register class elements and members for every core class
pub fn install_core_library(types: &TypeContext, model: &mut ElementModel) {
    let core = *types.core();
    for class in [
        core.object_class,
        core.num_class,
        core.int_class,
        core.double_class,
        core.bool_class,
        core.string_class,
        core.function_class,
        core.type_class,
        core.list_class,
        core.map_class,
    ] {
        model.add_class(types, class);
    }

    // Object
    method(types, model, core.object_class, "==", vec![core.object], core.bool);
    method(types, model, core.object_class, "toString", vec![], core.string);
    getter(types, model, core.object_class, "hashCode", core.int);
    getter(types, model, core.object_class, "runtimeType", core.type_);

    // num
    for name in NUMERIC_OPERATORS {
        method(types, model, core.num_class, name, vec![core.num], core.num);
    }
    method(types, model, core.num_class, "~/", vec![core.num], core.int);
    method(types, model, core.num_class, "unary-", vec![], core.num);
    for name in COMPARISON_OPERATORS {
        method(types, model, core.num_class, name, vec![core.num], core.bool);
    }
    method(types, model, core.num_class, "abs", vec![], core.num);
    method(types, model, core.num_class, "toInt", vec![], core.int);
    method(types, model, core.num_class, "toDouble", vec![], core.double);

    // int
    for name in BITWISE_OPERATORS {
        method(types, model, core.int_class, name, vec![core.int], core.int);
    }
    method(types, model, core.int_class, "~", vec![], core.int);
    getter(types, model, core.int_class, "isEven", core.bool);

    // double
    method(types, model, core.double_class, "floor", vec![], core.int);

    // String
    method(types, model, core.string_class, "+", vec![core.string], core.string);
    method(types, model, core.string_class, "[]", vec![core.int], core.string);
    method(types, model, core.string_class, "contains", vec![core.string], core.bool);
    getter(types, model, core.string_class, "length", core.int);
    getter(types, model, core.string_class, "isEmpty", core.bool);

    // List<E>
    let e = type_param(types, core.list_class, 0);
    method(types, model, core.list_class, "[]", vec![core.int], e);
    method(types, model, core.list_class, "[]=", vec![core.int, e], core.void);
    method(types, model, core.list_class, "add", vec![e], core.void);
    getter(types, model, core.list_class, "length", core.int);
    setter(types, model, core.list_class, "length", core.int);
    getter(types, model, core.list_class, "isEmpty", core.bool);

    // Map<K, V>
    let k = type_param(types, core.map_class, 0);
    let v = type_param(types, core.map_class, 1);
    method(types, model, core.map_class, "[]", vec![k], v);
    method(types, model, core.map_class, "[]=", vec![k, v], core.void);
    method(types, model, core.map_class, "containsKey", vec![k], core.bool);
    getter(types, model, core.map_class, "length", core.int);
}

fn type_param(types: &TypeContext, class: ClassId, index: usize) -> TypeId {
    types
        .class_info(class)
        .and_then(|info| info.type_params.get(index).copied())
        .unwrap_or(types.core().dynamic)
}

fn method(
    types: &TypeContext,
    model: &mut ElementModel,
    class: ClassId,
    name: &str,
    params: Vec<TypeId>,
    return_type: TypeId,
) {
    let ty = types.simple_function(params, return_type);
    model.add_member(class, Element::new(name, ElementKind::Function, ty));
}

fn getter(types: &TypeContext, model: &mut ElementModel, class: ClassId, name: &str, ty: TypeId) {
    let ty = types.simple_function(vec![], ty);
    model.add_member(class, Element::new(name, ElementKind::Getter, ty));
}

fn setter(types: &TypeContext, model: &mut ElementModel, class: ClassId, name: &str, ty: TypeId) {
    let ty = types.simple_function(vec![ty], types.core().void);
    model.add_member(class, Element::new(name, ElementKind::Setter, ty));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_inherits_numeric_operators() {
        let types = TypeContext::new();
        let mut model = ElementModel::new();
        install_core_library(&types, &mut model);
        let core = *types.core();

        let plus = model.lookup_member(&types, core.int, "+").unwrap();
        let ty = plus.compute_type(&types, &model);
        assert_eq!(types.display(ty), "(num) -> num");
        assert!(model.lookup_member(&types, core.int, "toString").is_some());
        assert!(model.lookup_member(&types, core.bool, "+").is_none());
    }

    #[test]
    fn test_list_index_is_instantiated() {
        let types = TypeContext::new();
        let mut model = ElementModel::new();
        install_core_library(&types, &mut model);
        let core = *types.core();

        let list_of_string = types.list_of(core.string);
        let index = model.lookup_member(&types, list_of_string, "[]").unwrap();
        assert_eq!(types.display(index.compute_type(&types, &model)), "(int) -> String");
        let store = model.lookup_member(&types, list_of_string, "[]=").unwrap();
        assert_eq!(types.display(store.compute_type(&types, &model)), "(int, String) -> void");
    }
}
