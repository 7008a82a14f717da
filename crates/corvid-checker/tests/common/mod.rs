//! Shared fixture for checker integration tests

#![allow(dead_code)]

use corvid_checker::ast::Statement;
use corvid_checker::builder::AstBuilder;
use corvid_checker::core_library::install_core_library;
use corvid_checker::{
    CheckUnit, CheckerConfig, Element, ElementId, ElementKind, ElementModel, InternalError, MessageKind,
    TypeCheckerTask, UnitBody, UnitReport, WarningCode,
};
use corvid_types::{ClassId, CoreTypes, TypeContext, TypeId};

pub struct Fixture {
    pub types: TypeContext,
    pub model: ElementModel,
    pub config: CheckerConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let types = TypeContext::new();
        let mut model = ElementModel::new();
        install_core_library(&types, &mut model);
        Fixture { types, model, config: CheckerConfig::default() }
    }

    pub fn core(&self) -> CoreTypes {
        *self.types.core()
    }

    pub fn function(&mut self, name: &str, ty: TypeId) -> ElementId {
        self.model.add(Element::new(name, ElementKind::Function, ty))
    }

    pub fn local(&mut self, name: &str, ty: TypeId) -> ElementId {
        self.model.add(Element::new(name, ElementKind::Variable, ty))
    }

    pub fn param(&mut self, name: &str, ty: TypeId) -> ElementId {
        self.model.add(Element::new(name, ElementKind::Parameter, ty))
    }

    /// Declare a class extending `superclass` (Object when `None`)
    pub fn class(&mut self, name: &str, type_params: &[&str], superclass: Option<TypeId>) -> ClassId {
        let class = self.types.declare_class(name, type_params);
        if let Some(superclass) = superclass {
            self.types.set_supertype(class, superclass);
        }
        self.model.add_class(&self.types, class);
        class
    }

    pub fn method(&mut self, class: ClassId, name: &str, ty: TypeId) -> ElementId {
        self.model.add_member(class, Element::new(name, ElementKind::Function, ty))
    }

    pub fn field(&mut self, class: ClassId, name: &str, ty: TypeId) -> ElementId {
        self.model.add_member(class, Element::new(name, ElementKind::Field, ty))
    }

    pub fn constructor(&mut self, class: ClassId, params: Vec<TypeId>) -> ElementId {
        let this_type = self.types.this_type(class);
        let ty = self.types.simple_function(params, this_type);
        let name = self.types.class_name(class);
        self.model.add_member(class, Element::new(name, ElementKind::GenerativeConstructor, ty))
    }

    pub fn try_check_unit(&self, unit: &CheckUnit) -> Result<UnitReport, InternalError> {
        TypeCheckerTask::with_config(&self.types, &self.model, self.config.clone()).check(unit)
    }

    pub fn check_unit(&self, unit: &CheckUnit) -> UnitReport {
        self.try_check_unit(unit).expect("unit should check without internal errors")
    }

    /// Build `<ret> f() { statements }` and check it
    pub fn check_body<F>(&mut self, return_type: TypeId, build: F) -> UnitReport
    where
        F: FnOnce(&mut AstBuilder) -> Vec<Statement>,
    {
        let unit = self.body_unit(return_type, build);
        self.check_unit(&unit)
    }

    pub fn body_unit<F>(&mut self, return_type: TypeId, build: F) -> CheckUnit
    where
        F: FnOnce(&mut AstBuilder) -> Vec<Statement>,
    {
        let ty = self.types.simple_function(vec![], return_type);
        let element = self.function("f", ty);
        let mut b = AstBuilder::new();
        let statements = build(&mut b);
        let body = b.block(statements);
        let function = b.function(Some("f"), Some(element), vec![], Some(body));
        CheckUnit { element, body: UnitBody::Function(function), elements: b.finish() }
    }
}

/// Codes of the reported diagnostics, in order
pub fn codes(report: &UnitReport) -> Vec<WarningCode> {
    report.warnings.iter().map(|w| w.code()).collect()
}

pub fn kinds(report: &UnitReport) -> Vec<MessageKind> {
    report.warnings.iter().map(|w| w.kind.clone()).collect()
}

pub fn not_assignable(from: &str, to: &str) -> MessageKind {
    MessageKind::NotAssignable { from: from.to_string(), to: to.to_string() }
}
