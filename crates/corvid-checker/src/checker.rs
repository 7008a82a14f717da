//! Type checker - validates types for expressions and statements
//!
//! The checker walks one resolved body at a time. Each expression visit
//! returns the expression's static type; each statement visit returns its
//! [`StatementType`]. Problems are collected as [`TypeWarning`]s and never
//! stop the walk. An inconsistent input aborts the body with an
//! [`InternalError`].

use crate::access::{ElementAccess, MemberKind};
use crate::ast::*;
use crate::config::CheckerConfig;
use crate::element::{is_unresolved, ElementId, ElementKind, ElementModel, TreeElements};
use crate::error::{
    InternalError, InternalErrorKind, MessageKind, Severity, TypeWarning, WarningCode,
};
use crate::flow::StatementType;
use crate::narrowing::{promotions_from, retain_unassigned, AssignmentScan, Promotion};
use corvid_types::{ClassId, FunctionType, Type, TypeContext, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Node and location a diagnostic is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub node: NodeId,
    pub span: Span,
}

impl Site {
    fn of_expression(expr: &Expression) -> Self {
        Site { node: expr.id(), span: *expr.span() }
    }

    fn of_statement(stmt: &Statement) -> Self {
        Site { node: stmt.id(), span: *stmt.span() }
    }
}

/// Per-body context threaded through every visit
///
/// A function literal starts a fresh frame; a cascade extends the current
/// one with its receiver type.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Declared return type of the enclosing function
    pub return_type: TypeId,
    /// Type of the innermost cascade target
    pub cascade: Option<TypeId>,
    promotions: Vec<Promotion>,
}

impl Frame {
    pub fn new(return_type: TypeId) -> Self {
        Frame { return_type, cascade: None, promotions: Vec::new() }
    }

    pub fn with_cascade(&self, receiver: TypeId) -> Self {
        Frame { cascade: Some(receiver), ..self.clone() }
    }

    pub fn with_promotions(&self, promotions: Vec<Promotion>) -> Self {
        let mut frame = self.clone();
        frame.promotions.extend(promotions);
        frame
    }

    /// Promoted type of a local, innermost promotion first
    pub fn promoted(&self, element: ElementId) -> Option<TypeId> {
        self.promotions
            .iter()
            .rev()
            .find(|p| p.element == element)
            .map(|p| p.ty)
    }
}

/// Type recorded for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedType {
    pub ty: TypeId,
    /// Computed by the checker rather than declared
    pub inferred: bool,
}

/// Types of expressions and declarators, keyed by node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTypes {
    types: FxHashMap<NodeId, RecordedType>,
}

impl NodeTypes {
    pub fn get(&self, node: NodeId) -> Option<TypeId> {
        self.types.get(&node).map(|r| r.ty)
    }

    pub fn is_inferred(&self, node: NodeId) -> bool {
        self.types.get(&node).is_some_and(|r| r.inferred)
    }

    pub fn record(&mut self, node: NodeId, ty: TypeId, inferred: bool) {
        self.types.insert(node, RecordedType { ty, inferred });
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Entries in node order
    pub fn sorted(&self) -> Vec<(NodeId, RecordedType)> {
        let mut entries: Vec<_> = self.types.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_by_key(|(node, _)| *node);
        entries
    }
}

/// Type checker
///
/// Create one per body; the checker keeps no state between bodies.
pub struct TypeChecker<'a> {
    pub(crate) types: &'a TypeContext,
    pub(crate) model: &'a ElementModel,
    pub(crate) elements: &'a TreeElements,

    /// Class whose member is being checked, for `this` and implicit receivers
    pub(crate) current_class: Option<ClassId>,

    disabled: FxHashSet<WarningCode>,
    info_pointers: bool,

    warnings: Vec<TypeWarning>,
    node_types: NodeTypes,

    /// Last node entered, attached to internal errors
    last_seen: Option<Site>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(types: &'a TypeContext, model: &'a ElementModel, elements: &'a TreeElements) -> Self {
        TypeChecker {
            types,
            model,
            elements,
            current_class: None,
            disabled: FxHashSet::default(),
            info_pointers: true,
            warnings: Vec::new(),
            node_types: NodeTypes::default(),
            last_seen: None,
        }
    }

    pub fn with_config(mut self, config: &CheckerConfig) -> Self {
        self.disabled = config.warnings.disabled.iter().copied().collect();
        self.info_pointers = config.info_pointers;
        self
    }

    pub fn with_current_class(mut self, class: Option<ClassId>) -> Self {
        self.current_class = class;
        self
    }

    /// Warnings collected so far, in visitation order
    pub fn warnings(&self) -> &[TypeWarning] {
        &self.warnings
    }

    pub fn node_types(&self) -> &NodeTypes {
        &self.node_types
    }

    pub fn into_parts(self) -> (Vec<TypeWarning>, NodeTypes) {
        (self.warnings, self.node_types)
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Check a function, method or constructor body; returns its type
    pub fn check_function(&mut self, func: &FunctionExpression) -> Result<TypeId, InternalError> {
        self.visit_function_expression(func)
    }

    /// Check a field initializer against the field's declared type
    pub fn check_field_initializer(
        &mut self,
        field: ElementId,
        initializer: &Expression,
    ) -> Result<TypeId, InternalError> {
        let declared = self
            .model
            .get(field)
            .map(|e| e.ty)
            .ok_or_else(|| self.internal(InternalErrorKind::UnknownElement { id: field.0 }))?;
        let frame = Frame::new(self.types.core().dynamic);
        let ty = self.analyze_non_void(initializer, &frame)?;
        self.check_assignable(Site::of_expression(initializer), ty, declared);
        Ok(ty)
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    pub(crate) fn report(&mut self, site: Site, kind: MessageKind) {
        self.push_diagnostic(site, kind, Severity::Warning);
    }

    /// Point at the declaration of `callee` after an argument problem
    pub(crate) fn report_callee(&mut self, site: Site, callee: ElementId) {
        if !self.info_pointers {
            return;
        }
        let span = self.model.get(callee).map(|e| e.span).unwrap_or(site.span);
        self.push_diagnostic(Site { node: site.node, span }, MessageKind::ThisIsTheMethod, Severity::Info);
    }

    fn push_diagnostic(&mut self, site: Site, kind: MessageKind, severity: Severity) {
        let code = kind.code();
        if self.disabled.contains(&code) {
            return;
        }
        tracing::trace!(code = code.as_str(), node = %site.node, line = site.span.line, "{}", kind);
        self.warnings.push(TypeWarning { kind, severity, node: site.node, span: site.span });
    }

    pub(crate) fn internal(&self, kind: InternalErrorKind) -> InternalError {
        let error = InternalError::new(kind);
        match self.last_seen {
            Some(site) => error.at(site.node, site.span),
            None => error,
        }
    }

    /// Report unless `from` is assignable to `to`; returns whether it is
    pub(crate) fn check_assignable(&mut self, site: Site, from: TypeId, to: TypeId) -> bool {
        if self.types.is_assignable(from, to) {
            return true;
        }
        let from = self.types.display(from);
        let to = self.types.display(to);
        self.report(site, MessageKind::NotAssignable { from, to });
        false
    }

    fn check_condition(&mut self, condition: &Expression, frame: &Frame) -> Result<(), InternalError> {
        let ty = self.analyze(condition, frame)?;
        self.check_assignable(Site::of_expression(condition), ty, self.types.core().bool);
        Ok(())
    }

    fn function_shape(&self, ty: TypeId) -> Option<FunctionType> {
        self.types
            .get(self.types.unalias(ty))
            .and_then(|resolved| resolved.as_function().cloned())
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Analyze an expression and record its type
    pub fn analyze(&mut self, expr: &Expression, frame: &Frame) -> Result<TypeId, InternalError> {
        self.last_seen = Some(Site::of_expression(expr));
        let core = *self.types.core();
        let ty = match expr {
            Expression::Literal(lit) => match lit.kind {
                LiteralKind::Int(_) => core.int,
                LiteralKind::Double(_) => core.double,
                LiteralKind::Bool(_) => core.bool,
                LiteralKind::String(_) => core.string,
                LiteralKind::Null => core.dynamic,
            },
            Expression::StringJuxtaposition(e) => {
                self.analyze(&e.first, frame)?;
                self.analyze(&e.second, frame)?;
                core.string
            }
            Expression::StringInterpolation(e) => {
                for part in &e.parts {
                    self.analyze(part, frame)?;
                }
                core.string
            }
            Expression::Identifier(id) => self.visit_identifier(id)?,
            Expression::Send(send) => self.visit_send(send, frame)?,
            Expression::SendSet(send_set) => self.visit_send_set(send_set, frame)?,
            Expression::New(new) => self.visit_new(new, frame)?,
            Expression::ListLiteral(list) => self.visit_list_literal(list, frame)?,
            Expression::MapLiteral(map) => self.visit_map_literal(map, frame)?,
            Expression::Conditional(cond) => self.visit_conditional(cond, frame)?,
            Expression::Cascade(cascade) => {
                let receiver = self.analyze(&cascade.receiver, frame)?;
                let inner = frame.with_cascade(receiver);
                for section in &cascade.sections {
                    self.analyze(section, &inner)?;
                }
                receiver
            }
            Expression::CascadeReceiver(_) => frame
                .cascade
                .ok_or_else(|| self.internal(InternalErrorKind::CascadeReceiverOutsideCascade))?,
            Expression::Function(func) => self.visit_function_expression(func)?,
            Expression::Parenthesized(e) => self.analyze(&e.expression, frame)?,
        };
        self.node_types.record(expr.id(), ty, true);
        Ok(ty)
    }

    /// Analyze an expression whose value is used; void becomes dynamic
    pub fn analyze_non_void(&mut self, expr: &Expression, frame: &Frame) -> Result<TypeId, InternalError> {
        let ty = self.analyze(expr, frame)?;
        if self.types.is_void(ty) {
            self.report(Site::of_expression(expr), MessageKind::VoidExpression);
            return Ok(self.types.core().dynamic);
        }
        Ok(ty)
    }

    fn visit_identifier(&mut self, id: &Identifier) -> Result<TypeId, InternalError> {
        if id.is_this() {
            let class = self
                .current_class
                .ok_or_else(|| self.internal(InternalErrorKind::NoEnclosingClass { name: id.name.clone() }))?;
            return Ok(self.types.this_type(class));
        }
        if id.is_super() {
            let class = self
                .current_class
                .ok_or_else(|| self.internal(InternalErrorKind::NoEnclosingClass { name: id.name.clone() }))?;
            let superclass = self.types.class_info(class).and_then(|info| info.supertype);
            return Ok(superclass.unwrap_or(self.types.core().dynamic));
        }
        // Other bare identifiers name already resolved parameters; reads go through sends
        Ok(self.types.core().dynamic)
    }

    fn visit_send(&mut self, send: &Send, frame: &Frame) -> Result<TypeId, InternalError> {
        let core = *self.types.core();
        let site = Site { node: send.id, span: send.span };
        let element = self.elements.get(send.id);

        match &send.selector {
            Selector::Is { .. } => {
                if let Some(receiver) = &send.receiver {
                    self.analyze(receiver, frame)?;
                }
                Ok(core.bool)
            }
            Selector::As(annotation) => {
                if let Some(receiver) = &send.receiver {
                    self.analyze(receiver, frame)?;
                }
                Ok(self.elements.type_of(annotation.id).unwrap_or(core.dynamic))
            }
            Selector::Operator(op) => self.visit_operator_send(send, *op, frame),
            Selector::Expression(callee) => {
                let callee_ty = self.analyze(callee, frame)?;
                let access = ElementAccess::Type(callee_ty);
                self.analyze_invocation(site, "expression", &access, send.arguments(), None, frame)
            }
            Selector::Name(name) => {
                let receiver = send.receiver.as_deref();
                if send.is_call() {
                    let access = self.compute_access(site, receiver, &name.name, element, MemberKind::Method, frame)?;
                    self.analyze_invocation(site, &name.name, &access, send.arguments(), None, frame)
                } else {
                    let access =
                        self.compute_access(site, receiver, &name.name, element, MemberKind::Property, frame)?;
                    Ok(self.access_type(&access, frame))
                }
            }
        }
    }

    /// Check a call through `access` and compute its result type
    pub(crate) fn analyze_invocation(
        &mut self,
        site: Site,
        name: &str,
        access: &ElementAccess,
        arguments: &[Argument],
        argument_types: Option<&mut Vec<TypeId>>,
        frame: &Frame,
    ) -> Result<TypeId, InternalError> {
        let dynamic = self.types.core().dynamic;
        let ty = self.access_type(access, frame);
        if access.is_callable(self.types, self.model) {
            self.analyze_arguments(site, access.element(), ty, arguments, argument_types, frame)?;
        } else {
            self.report(site, MessageKind::NotCallable { element_name: name.to_string() });
            self.analyze_arguments(site, access.element(), dynamic, arguments, argument_types, frame)?;
        }
        Ok(self.function_shape(ty).map(|f| f.return_type).unwrap_or(dynamic))
    }

    fn visit_operator_send(&mut self, send: &Send, op: Operator, frame: &Frame) -> Result<TypeId, InternalError> {
        let core = *self.types.core();
        let site = Site { node: send.id, span: send.span };
        let receiver = send.receiver.as_deref();

        match op {
            Operator::Eq | Operator::Ne => {
                if let Some(receiver) = receiver {
                    self.analyze(receiver, frame)?;
                }
                for argument in send.arguments() {
                    self.analyze(argument.value(), frame)?;
                }
                Ok(core.bool)
            }
            Operator::And | Operator::Or => {
                let mut right_frame = frame.clone();
                if let Some(left) = receiver {
                    self.check_condition(left, frame)?;
                    if op == Operator::And {
                        right_frame = self.promoted_frame(frame, left, |elements, _| {
                            send.arguments()
                                .first()
                                .map(|arg| AssignmentScan::of_expression(elements, arg.value()))
                                .unwrap_or_default()
                        });
                    }
                }
                for argument in send.arguments() {
                    self.check_condition(argument.value(), &right_frame)?;
                }
                Ok(core.bool)
            }
            Operator::Not => {
                if let Some(operand) = receiver {
                    self.check_condition(operand, frame)?;
                }
                Ok(core.bool)
            }
            Operator::ArgumentTest => Ok(core.bool),
            _ => {
                let name = if op == Operator::Sub && send.arguments().is_empty() {
                    "unary-"
                } else {
                    op.member_name()
                };
                let receiver_ty = match receiver {
                    Some(receiver) => self.analyze(receiver, frame)?,
                    None => core.dynamic,
                };
                let access = self.lookup_on_receiver(site, receiver_ty, name, MemberKind::Operator);

                let mut argument_types = Vec::new();
                let result =
                    self.analyze_invocation(site, name, &access, send.arguments(), Some(&mut argument_types), frame)?;

                if receiver_ty == core.int && matches!(name, "+" | "-" | "*" | "%") {
                    match argument_types.first() {
                        Some(&arg) if arg == core.int => return Ok(core.int),
                        Some(&arg) if arg == core.double => return Ok(core.double),
                        _ => {}
                    }
                }
                Ok(result)
            }
        }
    }

    /// Frame for the true branch of `condition`
    fn promoted_frame<F>(&self, frame: &Frame, condition: &Expression, assigned_in_scope: F) -> Frame
    where
        F: FnOnce(&TreeElements, &Expression) -> FxHashSet<ElementId>,
    {
        let promotions = promotions_from(self.types, self.model, self.elements, condition);
        if promotions.is_empty() {
            return frame.clone();
        }
        let assigned = assigned_in_scope(self.elements, condition);
        frame.with_promotions(retain_unassigned(promotions, &assigned))
    }

    fn visit_send_set(&mut self, send_set: &SendSet, frame: &Frame) -> Result<TypeId, InternalError> {
        let dynamic = self.types.core().dynamic;
        let site = Site { node: send_set.id, span: send_set.span };

        match (&send_set.target, send_set.op) {
            (AssignTarget::Property { receiver, name }, AssignOp::Assign) => {
                let setter = self.elements.get(send_set.id);
                let access =
                    self.compute_access(site, receiver.as_deref(), &name.name, setter, MemberKind::Property, frame)?;
                let target = access.compute_type(self.types, self.model);
                let (value_ty, _) = self.analyze_assigned_value(send_set, site, frame)?;
                self.check_assignable(site, value_ty, target);
                Ok(value_ty)
            }
            (AssignTarget::Index { base, key }, AssignOp::Assign) => {
                let base_ty = self.analyze(base, frame)?;
                let key_ty = self.analyze(key, frame)?;
                let (value_ty, _) = self.analyze_assigned_value(send_set, site, frame)?;
                let index_set = self.lookup_operator_type(site, base_ty, "[]=");
                if let Some(index_set) = self.function_shape(index_set) {
                    let set_key = index_set.first_param().unwrap_or(dynamic);
                    let set_value = index_set.second_param().unwrap_or(dynamic);
                    self.check_assignable(Site::of_expression(key), key_ty, set_key);
                    self.check_assignable(site, value_ty, set_value);
                }
                Ok(value_ty)
            }
            (AssignTarget::Property { receiver, name }, op) => {
                self.check_assignment_operator(site, send_set, receiver.as_deref(), name, op, frame)
            }
            (AssignTarget::Index { base, key }, op) => {
                self.check_index_assignment_operator(site, send_set, base, key, op, frame)
            }
        }
    }

    /// Type and site of the right-hand side; `++`/`--` add an implicit `int`
    fn analyze_assigned_value(
        &mut self,
        send_set: &SendSet,
        site: Site,
        frame: &Frame,
    ) -> Result<(TypeId, Site), InternalError> {
        let core = *self.types.core();
        if send_set.op.is_step() {
            return Ok((core.int, site));
        }
        match send_set.value.as_deref() {
            Some(value) => Ok((self.analyze(value, frame)?, Site::of_expression(value))),
            None => Ok((core.dynamic, site)),
        }
    }

    /// `target op= value`, `++target`, `target--`
    fn check_assignment_operator(
        &mut self,
        site: Site,
        send_set: &SendSet,
        receiver: Option<&Expression>,
        name: &Identifier,
        op: AssignOp,
        frame: &Frame,
    ) -> Result<TypeId, InternalError> {
        let dynamic = self.types.core().dynamic;
        let operator = op.operator().unwrap_or(Operator::Add);
        let setter_element = self.elements.get(send_set.id);
        let getter_element = self.elements.get(name.id).or(setter_element);

        let resolved_receiver = self.resolve_receiver(receiver, getter_element, frame)?;
        let getter = self
            .access_on(site, resolved_receiver, &name.name, getter_element, MemberKind::Property)?
            .compute_type(self.types, self.model);
        let setter = self
            .access_on(site, resolved_receiver, &name.name, setter_element, MemberKind::Property)?
            .compute_type(self.types, self.model);
        let (value_ty, value_site) = self.analyze_assigned_value(send_set, site, frame)?;

        let operator_ty = self.lookup_operator_type(site, getter, operator.member_name());
        let operator_ty = match self.function_shape(operator_ty) {
            Some(function) => function,
            None => return Ok(dynamic),
        };

        let result = operator_ty.return_type;
        let argument = operator_ty.first_param().unwrap_or(dynamic);
        let valid_value = self.check_assignable(value_site, value_ty, argument);
        if valid_value || !op.is_step() {
            self.check_assignable(site, result, setter);
        }
        Ok(if op.is_postfix() { getter } else { result })
    }

    /// `base[key] op= value`, `++base[key]`, `base[key]--`
    fn check_index_assignment_operator(
        &mut self,
        site: Site,
        send_set: &SendSet,
        base: &Expression,
        key: &Expression,
        op: AssignOp,
        frame: &Frame,
    ) -> Result<TypeId, InternalError> {
        let dynamic = self.types.core().dynamic;
        let operator = op.operator().unwrap_or(Operator::Add);
        let base_ty = self.analyze(base, frame)?;
        let key_ty = self.analyze(key, frame)?;
        let key_site = Site::of_expression(key);
        let (value_ty, value_site) = self.analyze_assigned_value(send_set, site, frame)?;

        let index_get = self.lookup_operator_type(site, base_ty, "[]");
        let index_get = match self.function_shape(index_get) {
            Some(function) => function,
            None => return Ok(dynamic),
        };
        let get_key = index_get.first_param().unwrap_or(dynamic);
        let valid_key = self.check_assignable(key_site, key_ty, get_key);
        let element = index_get.return_type;

        let operator_ty = self.lookup_operator_type(site, element, operator.member_name());
        let operator_ty = match self.function_shape(operator_ty) {
            Some(function) => function,
            None => return Ok(dynamic),
        };
        let argument = operator_ty.first_param().unwrap_or(dynamic);
        let valid_value = self.check_assignable(value_site, value_ty, argument);
        let result = operator_ty.return_type;

        let index_set = self.lookup_operator_type(site, base_ty, "[]=");
        if let Some(index_set) = self.function_shape(index_set) {
            let set_key = index_set.first_param().unwrap_or(dynamic);
            if valid_key || get_key != set_key {
                self.check_assignable(key_site, key_ty, set_key);
            }
            let set_value = index_set.second_param().unwrap_or(dynamic);
            if valid_value || !op.is_step() {
                self.check_assignable(site, result, set_value);
            }
        }
        Ok(if op.is_postfix() { element } else { result })
    }

    fn visit_new(&mut self, new: &NewExpression, frame: &Frame) -> Result<TypeId, InternalError> {
        let dynamic = self.types.core().dynamic;
        let site = Site { node: new.id, span: new.span };
        let constructor = self.elements.get(new.id);
        let constructor_ty = constructor
            .and_then(|id| self.model.get(id))
            .map(|e| e.ty)
            .unwrap_or(dynamic);
        let created = self.elements.type_of(new.id).unwrap_or(dynamic);

        let constructor_ty = match self.types.get(created).as_deref() {
            Some(Type::Interface(iface)) => {
                let params = self
                    .types
                    .class_info(iface.class)
                    .map(|info| info.type_params)
                    .unwrap_or_default();
                self.types.substitute(constructor_ty, &params, &iface.type_args)
            }
            _ => constructor_ty,
        };
        self.analyze_arguments(site, constructor, constructor_ty, &new.arguments, None, frame)?;
        Ok(created)
    }

    fn visit_list_literal(&mut self, list: &ListLiteral, frame: &Frame) -> Result<TypeId, InternalError> {
        let list_ty = self
            .elements
            .type_of(list.id)
            .ok_or_else(|| self.internal(InternalErrorKind::MissingLiteralType { node: list.id }))?;
        let element_ty = self.type_argument(list_ty, 0);
        for element in &list.elements {
            let ty = self.analyze(element, frame)?;
            self.check_assignable(Site::of_expression(element), ty, element_ty);
        }
        Ok(list_ty)
    }

    fn visit_map_literal(&mut self, map: &MapLiteral, frame: &Frame) -> Result<TypeId, InternalError> {
        let map_ty = self
            .elements
            .type_of(map.id)
            .ok_or_else(|| self.internal(InternalErrorKind::MissingLiteralType { node: map.id }))?;
        let key_ty = self.type_argument(map_ty, 0);
        let value_ty = self.type_argument(map_ty, 1);
        for entry in &map.entries {
            let ty = self.analyze(&entry.key, frame)?;
            self.check_assignable(Site::of_expression(&entry.key), ty, key_ty);
            let ty = self.analyze(&entry.value, frame)?;
            self.check_assignable(Site::of_expression(&entry.value), ty, value_ty);
        }
        Ok(map_ty)
    }

    fn type_argument(&self, ty: TypeId, index: usize) -> TypeId {
        self.types
            .get(ty)
            .and_then(|resolved| resolved.as_interface().and_then(|iface| iface.type_args.get(index).copied()))
            .unwrap_or(self.types.core().dynamic)
    }

    fn visit_conditional(&mut self, cond: &Conditional, frame: &Frame) -> Result<TypeId, InternalError> {
        self.check_condition(&cond.condition, frame)?;
        let then_frame = self.promoted_frame(frame, &cond.condition, |elements, _| {
            AssignmentScan::of_expression(elements, &cond.then_expr)
        });
        let then_ty = self.analyze(&cond.then_expr, &then_frame)?;
        let else_ty = self.analyze(&cond.else_expr, frame)?;

        if self.types.is_subtype(then_ty, else_ty) {
            Ok(then_ty)
        } else if self.types.is_subtype(else_ty, then_ty) {
            Ok(else_ty)
        } else {
            Ok(self.types.core().object)
        }
    }

    fn visit_function_expression(&mut self, func: &FunctionExpression) -> Result<TypeId, InternalError> {
        let core = *self.types.core();
        let element = self.elements.get(func.id).and_then(|id| self.model.get(id));

        let (ty, return_type) = match element {
            _ if is_unresolved(element) => (core.dynamic, core.dynamic),
            Some(element) if element.kind == ElementKind::GenerativeConstructor => (core.dynamic, core.void),
            Some(element) => {
                let return_type = self
                    .function_shape(element.ty)
                    .map(|f| f.return_type)
                    .unwrap_or(core.dynamic);
                (element.ty, return_type)
            }
            None => (core.dynamic, core.dynamic),
        };

        let frame = Frame::new(return_type);
        for param in &func.parameters {
            if let Some(default) = &param.default_value {
                let ty = self.analyze_non_void(default, &frame)?;
                if let Some(declared) = self.elements.get(param.id).and_then(|id| self.model.get(id)) {
                    self.check_assignable(Site::of_expression(default), ty, declared.ty);
                }
            }
        }

        if let Some(body) = &func.body {
            let body_type = self.check_statement(body, &frame)?;
            let must_return = !self.types.is_void(return_type) && !self.types.is_dynamic(return_type);
            if must_return && !body_type.is_returning() {
                let site = match &func.name {
                    Some(name) => Site { node: name.id, span: name.span },
                    None => Site { node: func.id, span: func.span },
                };
                let kind = if body_type == StatementType::MaybeReturning {
                    MessageKind::MaybeMissingReturn
                } else {
                    MessageKind::MissingReturn
                };
                self.report(site, kind);
            }
        }
        Ok(ty)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Check a statement and compute its reachability
    pub fn check_statement(&mut self, stmt: &Statement, frame: &Frame) -> Result<StatementType, InternalError> {
        self.last_seen = Some(Site::of_statement(stmt));
        match stmt {
            Statement::Block(block) => self.check_block(&block.statements, frame),
            Statement::Expression(s) => {
                self.analyze(&s.expression, frame)?;
                Ok(StatementType::NotReturning)
            }
            Statement::VariableDefinitions(defs) => {
                self.check_variable_definitions(defs, frame)?;
                Ok(StatementType::NotReturning)
            }
            Statement::FunctionDeclaration(decl) => {
                self.visit_function_expression(&decl.function)?;
                Ok(StatementType::NotReturning)
            }
            Statement::If(s) => {
                self.check_condition(&s.condition, frame)?;
                let then_frame = self.promoted_frame(frame, &s.condition, |elements, _| {
                    AssignmentScan::of_statement(elements, &s.then_branch)
                });
                let then_type = self.check_statement(&s.then_branch, &then_frame)?;
                let else_type = match &s.else_branch {
                    Some(else_branch) => self.check_statement(else_branch, frame)?,
                    None => StatementType::NotReturning,
                };
                Ok(then_type.join(else_type))
            }
            Statement::While(s) => {
                self.check_condition(&s.condition, frame)?;
                let body = self.check_statement(&s.body, frame)?;
                // A literal `true` condition always enters the body; breaks are not tracked
                if s.condition.is_true_literal() {
                    Ok(body)
                } else {
                    Ok(body.join(StatementType::NotReturning))
                }
            }
            Statement::DoWhile(s) => {
                self.check_condition(&s.condition, frame)?;
                let body = self.check_statement(&s.body, frame)?;
                Ok(body.join(StatementType::NotReturning))
            }
            Statement::For(s) => {
                if let Some(init) = &s.initializer {
                    self.check_statement(init, frame)?;
                }
                if let Some(condition) = &s.condition {
                    self.check_condition(condition, frame)?;
                }
                for update in &s.updates {
                    self.analyze(update, frame)?;
                }
                let body = self.check_statement(&s.body, frame)?;
                Ok(body.join(StatementType::NotReturning))
            }
            Statement::ForIn(s) => {
                self.check_statement(&s.variable, frame)?;
                self.analyze(&s.iterable, frame)?;
                self.check_statement(&s.body, frame)?;
                Ok(StatementType::NotReturning)
            }
            Statement::Return(s) => self.check_return(s, frame),
            Statement::Throw(s) => {
                self.analyze(&s.expression, frame)?;
                Ok(StatementType::Returning)
            }
            Statement::Rethrow(_) => Ok(StatementType::Returning),
            Statement::Break(_) | Statement::Continue(_) | Statement::Empty(_) => Ok(StatementType::NotReturning),
            Statement::Switch(s) => {
                self.analyze(&s.expression, frame)?;
                for case in &s.cases {
                    for expr in &case.expressions {
                        self.analyze(expr, frame)?;
                    }
                    self.check_block(&case.statements, frame)?;
                }
                Ok(StatementType::NotReturning)
            }
            Statement::Try(s) => {
                self.check_block(&s.body.statements, frame)?;
                for catch in &s.catches {
                    self.check_block(&catch.body.statements, frame)?;
                }
                if let Some(finally) = &s.finally_block {
                    self.check_block(&finally.statements, frame)?;
                }
                Ok(StatementType::NotReturning)
            }
            Statement::Labeled(s) => {
                self.check_statement(&s.statement, frame)?;
                Ok(StatementType::NotReturning)
            }
        }
    }

    /// Fold a statement sequence, reporting the first unreachable statement
    fn check_block(&mut self, statements: &[Statement], frame: &Frame) -> Result<StatementType, InternalError> {
        let mut body_type = StatementType::NotReturning;
        let mut reported_dead_code = false;
        for stmt in statements {
            let next = self.check_statement(stmt, frame)?;
            if body_type.is_returning() && !reported_dead_code {
                self.report(Site::of_statement(stmt), MessageKind::UnreachableCode);
                reported_dead_code = true;
            }
            body_type = body_type.then(next);
        }
        Ok(body_type)
    }

    fn check_return(&mut self, ret: &ReturnStatement, frame: &Frame) -> Result<StatementType, InternalError> {
        if matches!(ret.kind, ReturnKind::Native | ReturnKind::RedirectingFactory) {
            return Ok(StatementType::Returning);
        }

        let void = self.types.core().void;
        let expected = frame.return_type;
        match &ret.value {
            Some(value) => {
                let ty = self.analyze(value, frame)?;
                let value_site = Site::of_expression(value);
                if self.types.is_void(expected) && !self.types.is_assignable(ty, void) {
                    self.report(value_site, MessageKind::ReturnValueInVoid);
                } else {
                    self.check_assignable(value_site, ty, expected);
                }
            }
            None => {
                if !self.types.is_assignable(expected, void) {
                    let return_type = self.types.display(expected);
                    self.report(Site { node: ret.id, span: ret.span }, MessageKind::ReturnNothing { return_type });
                }
            }
        }
        Ok(StatementType::Returning)
    }

    fn check_variable_definitions(&mut self, defs: &VariableDefinitions, frame: &Frame) -> Result<(), InternalError> {
        let dynamic = self.types.core().dynamic;
        let annotated = defs
            .type_annotation
            .as_ref()
            .map(|annotation| (annotation, self.elements.type_of(annotation.id).unwrap_or(dynamic)));

        let declared = match annotated {
            Some((annotation, ty)) if self.types.is_void(ty) => {
                self.report(Site { node: annotation.id, span: annotation.span }, MessageKind::VoidVariable);
                Some(dynamic)
            }
            Some((_, ty)) => Some(ty),
            None => None,
        };

        for declarator in &defs.declarators {
            let initializer_ty = match &declarator.initializer {
                Some(init) => {
                    let ty = self.analyze_non_void(init, frame)?;
                    self.check_assignable(Site::of_expression(init), ty, declared.unwrap_or(dynamic));
                    Some(ty)
                }
                None => None,
            };
            match (declared, initializer_ty) {
                (Some(ty), _) => self.node_types.record(declarator.id, ty, false),
                (None, Some(ty)) => self.node_types.record(declarator.id, ty, true),
                (None, None) => self.node_types.record(declarator.id, dynamic, true),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_types::TypeContext;

    #[test]
    fn test_innermost_promotion_wins() {
        let types = TypeContext::new();
        let core = *types.core();
        let local = ElementId(3);

        let frame = Frame::new(core.void)
            .with_promotions(vec![Promotion { element: local, ty: core.num }])
            .with_promotions(vec![Promotion { element: local, ty: core.int }]);
        assert_eq!(frame.promoted(local), Some(core.int));
        assert_eq!(frame.promoted(ElementId(4)), None);
    }

    #[test]
    fn test_cascade_frame_keeps_promotions() {
        let types = TypeContext::new();
        let core = *types.core();
        let local = ElementId(1);

        let frame = Frame::new(core.int).with_promotions(vec![Promotion { element: local, ty: core.string }]);
        let inner = frame.with_cascade(core.bool);
        assert_eq!(inner.cascade, Some(core.bool));
        assert_eq!(inner.return_type, core.int);
        assert_eq!(inner.promoted(local), Some(core.string));
        assert_eq!(frame.cascade, None);
    }

    #[test]
    fn test_node_types_record_and_sort() {
        let types = TypeContext::new();
        let core = *types.core();
        let mut node_types = NodeTypes::default();
        assert!(node_types.is_empty());

        node_types.record(NodeId(5), core.int, true);
        node_types.record(NodeId(2), core.string, false);
        node_types.record(NodeId(5), core.double, true);

        assert_eq!(node_types.len(), 2);
        assert_eq!(node_types.get(NodeId(5)), Some(core.double));
        assert!(node_types.is_inferred(NodeId(5)));
        assert!(!node_types.is_inferred(NodeId(2)));
        assert!(!node_types.is_inferred(NodeId(9)));
        let nodes: Vec<NodeId> = node_types.sorted().into_iter().map(|(node, _)| node).collect();
        assert_eq!(nodes, vec![NodeId(2), NodeId(5)]);
    }
}
