//! Integration tests for statement checking and return reachability

mod common;

use common::{codes, kinds, not_assignable, Fixture};
use corvid_checker::ast::{ReturnKind, Statement};
use corvid_checker::{MessageKind, WarningCode};

#[test]
fn test_missing_return() {
    // int f() {}
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |_| vec![]);
    assert_eq!(codes(&report), vec![WarningCode::MissingReturn]);
}

#[test]
fn test_maybe_missing_return() {
    // int f() { if (c) return 1; }
    let mut fx = Fixture::new();
    let core = fx.core();
    let c = fx.local("c", core.bool);
    let report = fx.check_body(core.int, |b| {
        let cond = b.read("c", Some(c));
        let one = b.int(1);
        let ret = b.return_(Some(one));
        vec![b.if_(cond, ret, None)]
    });
    assert_eq!(codes(&report), vec![WarningCode::MaybeMissingReturn]);
}

#[test]
fn test_if_else_both_return() {
    // int f() { if (c) return 1; else return 2; }
    let mut fx = Fixture::new();
    let core = fx.core();
    let c = fx.local("c", core.bool);
    let report = fx.check_body(core.int, |b| {
        let cond = b.read("c", Some(c));
        let one = b.int(1);
        let two = b.int(2);
        let then_branch = b.return_(Some(one));
        let else_branch = b.return_(Some(two));
        vec![b.if_(cond, then_branch, Some(else_branch))]
    });
    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
}

#[test]
fn test_maybe_returning_then_return_is_returning() {
    // int f() { if (c) return 1; return 2; }
    let mut fx = Fixture::new();
    let core = fx.core();
    let c = fx.local("c", core.bool);
    let report = fx.check_body(core.int, |b| {
        let cond = b.read("c", Some(c));
        let one = b.int(1);
        let two = b.int(2);
        let ret = b.return_(Some(one));
        let guarded = b.if_(cond, ret, None);
        vec![guarded, b.return_(Some(two))]
    });
    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
}

#[test]
fn test_unreachable_code_reported_once() {
    // int f() { return 1; 2; 3; }
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let mut dead_id = None;
    let report = fx.check_body(int, |b| {
        let one = b.int(1);
        let ret = b.return_(Some(one));
        let two = b.int(2);
        let dead = b.expr_stmt(two);
        dead_id = Some(dead.id());
        let three = b.int(3);
        let also_dead = b.expr_stmt(three);
        vec![ret, dead, also_dead]
    });
    assert_eq!(codes(&report), vec![WarningCode::UnreachableCode]);
    assert_eq!(Some(report.warnings[0].node), dead_id);
}

#[test]
fn test_unreachable_after_throw() {
    let mut fx = Fixture::new();
    let void = fx.core().void;
    let report = fx.check_body(void, |b| {
        let message = b.string("boom");
        let throw = b.throw(message);
        let empty = b.empty();
        vec![throw, empty]
    });
    assert_eq!(codes(&report), vec![WarningCode::UnreachableCode]);
}

#[test]
fn test_throw_and_rethrow_satisfy_return() {
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |b| {
        let message = b.string("boom");
        vec![b.throw(message)]
    });
    assert!(report.warnings.is_empty());

    let report = fx.check_body(int, |b| vec![b.rethrow()]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_dynamic_and_void_bodies_need_no_return() {
    let mut fx = Fixture::new();
    let core = fx.core();
    assert!(fx.check_body(core.dynamic, |_| vec![]).warnings.is_empty());
    assert!(fx.check_body(core.void, |_| vec![]).warnings.is_empty());
}

#[test]
fn test_return_value_in_void_function() {
    let mut fx = Fixture::new();
    let void = fx.core().void;
    let report = fx.check_body(void, |b| {
        let one = b.int(1);
        vec![b.return_(Some(one))]
    });
    assert_eq!(kinds(&report), vec![MessageKind::ReturnValueInVoid]);
}

#[test]
fn test_return_nothing_from_int_function() {
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |b| vec![b.return_(None)]);
    assert_eq!(kinds(&report), vec![MessageKind::ReturnNothing { return_type: "int".to_string() }]);
}

#[test]
fn test_return_value_checked_against_return_type() {
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |b| {
        let text = b.string("one");
        vec![b.return_(Some(text))]
    });
    assert_eq!(kinds(&report), vec![not_assignable("String", "int")]);
}

#[test]
fn test_native_return_is_not_checked() {
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |b| vec![b.return_kind(None, ReturnKind::Native)]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_while_true_body_decides() {
    // int f() { while (true) { return 1; } }
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |b| {
        let cond = b.bool(true);
        let one = b.int(1);
        let ret = b.return_(Some(one));
        let body = b.block(vec![ret]);
        vec![b.while_(cond, body)]
    });
    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
}

#[test]
fn test_while_condition_may_skip_body() {
    let mut fx = Fixture::new();
    let core = fx.core();
    let c = fx.local("c", core.bool);
    let report = fx.check_body(core.int, |b| {
        let cond = b.read("c", Some(c));
        let one = b.int(1);
        let ret = b.return_(Some(one));
        vec![b.while_(cond, ret)]
    });
    assert_eq!(codes(&report), vec![WarningCode::MaybeMissingReturn]);
}

#[test]
fn test_loop_conditions_must_be_bool() {
    let mut fx = Fixture::new();
    let void = fx.core().void;
    let report = fx.check_body(void, |b| {
        let one = b.int(1);
        let body = b.empty();
        let while_loop = b.while_(one, body);
        let two = b.int(2);
        let body = b.empty();
        let do_loop = b.do_while(body, two);
        let three = b.int(3);
        let body = b.empty();
        let for_loop = b.for_(None, Some(three), vec![], body);
        vec![while_loop, do_loop, for_loop]
    });
    assert_eq!(
        kinds(&report),
        vec![not_assignable("int", "bool"), not_assignable("int", "bool"), not_assignable("int", "bool")]
    );
}

#[test]
fn test_for_loop_parts_are_checked() {
    // void f() { for (int i = "0"; i < 10; i++) {} }
    let mut fx = Fixture::new();
    let core = fx.core();
    let i = fx.local("i", core.int);
    let report = fx.check_body(core.void, |b| {
        let zero = b.string("0");
        let init = b.var(Some(("int", core.int)), vec![("i", Some(i), Some(zero))]);
        let read = b.read("i", Some(i));
        let ten = b.int(10);
        let cond = b.binary(read, corvid_checker::ast::Operator::Lt, ten);
        let step = b.postfix("i", Some(i), corvid_checker::ast::StepOp::Increment);
        let body = b.block(vec![]);
        vec![b.for_(Some(init), Some(cond), vec![step], body)]
    });
    assert_eq!(kinds(&report), vec![not_assignable("String", "int")]);
}

#[test]
fn test_unhandled_statements_are_not_returning() {
    // int f() { switch (1) { default: return 1; } }
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |b| {
        let subject = b.int(1);
        let one = b.int(1);
        let ret = b.return_(Some(one));
        vec![b.switch(subject, vec![(vec![], vec![ret])])]
    });
    assert_eq!(codes(&report), vec![WarningCode::MissingReturn]);

    let report = fx.check_body(int, |b| {
        let one = b.int(1);
        let ret = b.return_(Some(one));
        let rethrow = b.rethrow();
        vec![b.try_(vec![ret], vec![vec![rethrow]], None)]
    });
    assert_eq!(codes(&report), vec![WarningCode::MissingReturn]);
}

#[test]
fn test_variable_definitions() {
    // int x = "s"; void v; var y = 1; int z;
    let mut fx = Fixture::new();
    let core = fx.core();
    let x = fx.local("x", core.int);
    let v = fx.local("v", core.void);
    let y = fx.local("y", core.dynamic);
    let z = fx.local("z", core.int);
    let mut declarators = Vec::new();
    let report = fx.check_body(core.void, |b| {
        let text = b.string("s");
        let int_x = b.var(Some(("int", core.int)), vec![("x", Some(x), Some(text))]);
        let void_v = b.var(Some(("void", core.void)), vec![("v", Some(v), None)]);
        let one = b.int(1);
        let var_y = b.var(None, vec![("y", Some(y), Some(one))]);
        let int_z = b.var(Some(("int", core.int)), vec![("z", Some(z), None)]);
        for stmt in [&var_y, &int_z] {
            if let Statement::VariableDefinitions(defs) = stmt {
                declarators.push(defs.declarators[0].id);
            }
        }
        vec![int_x, void_v, var_y, int_z]
    });

    assert_eq!(kinds(&report), vec![not_assignable("String", "int"), MessageKind::VoidVariable]);
    assert_eq!(report.node_types.get(declarators[0]), Some(core.int));
    assert!(report.node_types.is_inferred(declarators[0]));
    assert_eq!(report.node_types.get(declarators[1]), Some(core.int));
    assert!(!report.node_types.is_inferred(declarators[1]));
}

#[test]
fn test_local_function_declaration_checked_separately() {
    // void f() { int g() {} }
    let mut fx = Fixture::new();
    let core = fx.core();
    let g_type = fx.types.simple_function(vec![], core.int);
    let g = fx.function("g", g_type);
    let report = fx.check_body(core.void, |b| {
        let body = b.block(vec![]);
        let inner = b.function(Some("g"), Some(g), vec![], Some(body));
        vec![b.function_decl(inner)]
    });
    assert_eq!(codes(&report), vec![WarningCode::MissingReturn]);
}

#[test]
fn test_labeled_statement_is_not_returning() {
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |b| {
        let one = b.int(1);
        let ret = b.return_(Some(one));
        vec![b.labeled("outer", ret)]
    });
    assert_eq!(codes(&report), vec![WarningCode::MissingReturn]);
}

#[test]
fn test_redirecting_factory_return_is_not_checked() {
    let mut fx = Fixture::new();
    let int = fx.core().int;
    let report = fx.check_body(int, |b| {
        let text = b.string("s");
        vec![b.return_kind(Some(text), ReturnKind::RedirectingFactory)]
    });
    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
}

#[test]
fn test_for_in_is_not_returning() {
    // int f() { for (var x in names.nope) { return 1; } }
    let mut fx = Fixture::new();
    let core = fx.core();
    let list_of_string = fx.types.list_of(core.string);
    let names = fx.local("names", list_of_string);
    let x = fx.local("x", core.dynamic);
    let report = fx.check_body(core.int, |b| {
        let variable = b.var(None, vec![("x", Some(x), None)]);
        let read = b.read("names", Some(names));
        let iterable = b.get(read, "nope", None);
        let one = b.int(1);
        let ret = b.return_(Some(one));
        let body = b.block(vec![ret]);
        vec![b.for_in(variable, iterable, body)]
    });
    assert_eq!(
        kinds(&report),
        vec![
            MessageKind::PropertyNotFound { class_name: "List".into(), member_name: "nope".into() },
            MessageKind::MissingReturn,
        ]
    );
}

#[test]
fn test_break_and_continue_do_not_end_the_block() {
    // void f() { while (c) { break; continue; } }  int g() { while (true) { break; } }
    let mut fx = Fixture::new();
    let core = fx.core();
    let c = fx.local("c", core.bool);
    let report = fx.check_body(core.void, |b| {
        let cond = b.read("c", Some(c));
        let stop = b.break_();
        let next = b.continue_();
        let body = b.block(vec![stop, next]);
        vec![b.while_(cond, body)]
    });
    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);

    let report = fx.check_body(core.int, |b| {
        let cond = b.bool(true);
        let stop = b.break_();
        let body = b.block(vec![stop]);
        vec![b.while_(cond, body)]
    });
    assert_eq!(codes(&report), vec![WarningCode::MissingReturn]);
}

#[test]
fn test_declaration_assignability_across_types() {
    // bool flag = 1; String s = true; dynamic d; int i = d; Dog dog = cat; Animal a = dog; Dog back = a;
    let mut fx = Fixture::new();
    let core = fx.core();
    let animal = fx.class("Animal", &[], None);
    let animal_type = fx.types.this_type(animal);
    let dog = fx.class("Dog", &[], Some(animal_type));
    let dog_type = fx.types.this_type(dog);
    let cat = fx.class("Cat", &[], Some(animal_type));
    let cat_type = fx.types.this_type(cat);

    let flag = fx.local("flag", core.bool);
    let s = fx.local("s", core.string);
    let d = fx.local("d", core.dynamic);
    let i = fx.local("i", core.int);
    let pet = fx.local("pet", cat_type);
    let rex = fx.local("rex", dog_type);
    let a = fx.local("a", animal_type);
    let back = fx.local("back", dog_type);

    let report = fx.check_body(core.void, |b| {
        let one = b.int(1);
        let flag_def = b.var(Some(("bool", core.bool)), vec![("flag", Some(flag), Some(one))]);
        let yes = b.bool(true);
        let s_def = b.var(Some(("String", core.string)), vec![("s", Some(s), Some(yes))]);
        let d_def = b.var(Some(("dynamic", core.dynamic)), vec![("d", Some(d), None)]);
        let read_d = b.read("d", Some(d));
        let i_def = b.var(Some(("int", core.int)), vec![("i", Some(i), Some(read_d))]);
        let pet_def = b.var(Some(("Cat", cat_type)), vec![("pet", Some(pet), None)]);
        let read_pet = b.read("pet", Some(pet));
        let rex_def = b.var(Some(("Dog", dog_type)), vec![("rex", Some(rex), Some(read_pet))]);
        let read_rex = b.read("rex", Some(rex));
        let a_def = b.var(Some(("Animal", animal_type)), vec![("a", Some(a), Some(read_rex))]);
        let read_a = b.read("a", Some(a));
        let back_def = b.var(Some(("Dog", dog_type)), vec![("back", Some(back), Some(read_a))]);
        vec![flag_def, s_def, d_def, i_def, pet_def, rex_def, a_def, back_def]
    });
    assert_eq!(
        kinds(&report),
        vec![not_assignable("int", "bool"), not_assignable("bool", "String"), not_assignable("Cat", "Dog")]
    );
}
