use corvid_types::{AssignabilityContext, SubtypingContext, Type, TypeContext};
use std::sync::Arc;
use std::thread;

#[test]
fn test_generic_superclass_instantiation() {
    let ctx = TypeContext::new();
    let core = *ctx.core();

    // class Stack<T> extends List<T> {}
    let stack = ctx.declare_class("Stack", &["T"]);
    let t = ctx.class_info(stack).unwrap().type_params[0];
    ctx.set_supertype(stack, ctx.list_of(t));

    let stack_of_int = ctx.interface_type(stack, vec![core.int]);
    let mut sub_ctx = SubtypingContext::new(&ctx);
    assert!(sub_ctx.is_subtype(stack_of_int, ctx.list_of(core.int)));
    assert!(sub_ctx.is_subtype(stack_of_int, ctx.list_of(core.num)));
    assert!(!sub_ctx.is_subtype(stack_of_int, ctx.list_of(core.string)));
}

#[test]
fn test_typedef_participates_in_relations() {
    let ctx = TypeContext::new();
    let core = *ctx.core();

    // typedef bool Predicate<T>(T value);
    let predicate = ctx.declare_typedef("Predicate", &["T"]);
    let t = ctx.typedef_params(predicate)[0];
    ctx.define_typedef(predicate, ctx.simple_function(vec![t], core.bool))
        .unwrap();

    let int_predicate = ctx.typedef_type(predicate, vec![core.int]);
    let is_even = ctx.simple_function(vec![core.int], core.bool);
    let to_string = ctx.simple_function(vec![core.int], core.string);

    let mut assign_ctx = AssignabilityContext::new(&ctx);
    assert!(assign_ctx.is_assignable(is_even, int_predicate));
    assert!(!assign_ctx.is_assignable(to_string, int_predicate));
    assert!(assign_ctx.is_assignable(int_predicate, core.function));
}

#[test]
fn test_unalias_returns_function_shape() {
    let ctx = TypeContext::new();
    let core = *ctx.core();
    let callback = ctx.declare_typedef("Callback", &[]);
    ctx.define_typedef(callback, ctx.simple_function(vec![], core.void))
        .unwrap();

    let unaliased = ctx.unalias(ctx.typedef_type(callback, vec![]));
    match &*ctx.get_unchecked(unaliased) {
        Type::Function(func) => {
            assert!(func.params.is_empty());
            assert_eq!(func.return_type, core.void);
        }
        other => panic!("expected function type, got {:?}", other),
    }
}

#[test]
fn test_context_is_shared_across_threads() {
    let ctx = Arc::new(TypeContext::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let core = *ctx.core();
                let nested = ctx.list_of(ctx.map_of(core.string, core.int));
                assert!(ctx.is_subtype(nested, core.object));
                nested
            })
        })
        .collect();

    let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(ctx.display(ids[0]), "List<Map<String, int>>");
}
