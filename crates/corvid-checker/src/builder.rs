//! Programmatic construction of resolved trees
//!
//! [`AstBuilder`] hands out fresh node ids and records resolution results in
//! a [`TreeElements`] as nodes are built, so a resolved tree can be written
//! without a parser or resolver:
//!
//! ```
//! use corvid_checker::builder::AstBuilder;
//! use corvid_checker::element::{Element, ElementKind, ElementModel};
//! use corvid_types::TypeContext;
//!
//! let types = TypeContext::new();
//! let mut model = ElementModel::new();
//! let x = model.add(Element::new("x", ElementKind::Variable, types.core().int));
//!
//! let mut b = AstBuilder::new();
//! let read = b.read("x", Some(x));
//! let one = b.int(1);
//! let sum = b.binary(read.clone(), corvid_checker::ast::Operator::Add, one);
//! let elements = b.finish();
//! assert_eq!(elements.get(read.id()), Some(x));
//! assert_eq!(elements.get(sum.id()), None);
//! ```

use crate::ast::*;
use crate::element::{ElementId, TreeElements};
use corvid_types::TypeId;

/// Builder for resolved expressions and statements
#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: u32,
    elements: TreeElements,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolution results recorded so far
    pub fn elements(&self) -> &TreeElements {
        &self.elements
    }

    pub fn finish(self) -> TreeElements {
        self.elements
    }

    /// Bind an already built node to an element
    pub fn bind(&mut self, node: NodeId, element: ElementId) {
        self.elements.bind(node, element);
    }

    fn fresh(&mut self) -> (NodeId, Span) {
        let id = self.next_id;
        self.next_id += 1;
        let start = id as usize * 2;
        (NodeId(id), Span::new(start, start + 1, 1, start as u32 + 1))
    }

    fn bind_opt(&mut self, node: NodeId, element: Option<ElementId>) {
        if let Some(element) = element {
            self.elements.bind(node, element);
        }
    }

    // ------------------------------------------------------------------
    // Names and annotations
    // ------------------------------------------------------------------

    pub fn ident(&mut self, name: &str) -> Identifier {
        let (id, span) = self.fresh();
        Identifier { id, name: name.to_string(), span }
    }

    /// Annotation resolved to `ty`
    pub fn annotation(&mut self, name: &str, ty: TypeId) -> TypeAnnotation {
        let (id, span) = self.fresh();
        self.elements.set_type(id, ty);
        TypeAnnotation { id, name: name.to_string(), span }
    }

    // ------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------

    fn literal(&mut self, kind: LiteralKind) -> Expression {
        let (id, span) = self.fresh();
        Expression::Literal(Literal { id, kind, span })
    }

    pub fn int(&mut self, value: i64) -> Expression {
        self.literal(LiteralKind::Int(value))
    }

    pub fn double(&mut self, value: f64) -> Expression {
        self.literal(LiteralKind::Double(value))
    }

    pub fn bool(&mut self, value: bool) -> Expression {
        self.literal(LiteralKind::Bool(value))
    }

    pub fn string(&mut self, value: &str) -> Expression {
        self.literal(LiteralKind::String(value.to_string()))
    }

    pub fn null(&mut self) -> Expression {
        self.literal(LiteralKind::Null)
    }

    pub fn interpolation(&mut self, parts: Vec<Expression>) -> Expression {
        let (id, span) = self.fresh();
        Expression::StringInterpolation(StringInterpolation { id, parts, span })
    }

    pub fn juxtaposition(&mut self, first: Expression, second: Expression) -> Expression {
        let (id, span) = self.fresh();
        Expression::StringJuxtaposition(StringJuxtaposition {
            id,
            first: Box::new(first),
            second: Box::new(second),
            span,
        })
    }

    pub fn this(&mut self) -> Expression {
        Expression::Identifier(self.ident("this"))
    }

    pub fn super_(&mut self) -> Expression {
        Expression::Identifier(self.ident("super"))
    }

    // ------------------------------------------------------------------
    // Sends
    // ------------------------------------------------------------------

    fn send(
        &mut self,
        receiver: Option<Expression>,
        selector: Selector,
        arguments: Option<Vec<Argument>>,
        element: Option<ElementId>,
    ) -> Expression {
        let (id, span) = self.fresh();
        self.bind_opt(id, element);
        Expression::Send(Send {
            id,
            receiver: receiver.map(Box::new),
            selector,
            arguments,
            span,
        })
    }

    /// Bare name read: `x`
    pub fn read(&mut self, name: &str, element: Option<ElementId>) -> Expression {
        let name = self.ident(name);
        self.send(None, Selector::Name(name), None, element)
    }

    /// Class, typedef or type variable used as a value: `Foo`
    pub fn type_literal(&mut self, name: &str, element: ElementId, ty: TypeId) -> Expression {
        let read = self.read(name, Some(element));
        self.elements.set_type(read.id(), ty);
        read
    }

    /// Property read: `receiver.name`
    pub fn get(&mut self, receiver: Expression, name: &str, element: Option<ElementId>) -> Expression {
        let name = self.ident(name);
        self.send(Some(receiver), Selector::Name(name), None, element)
    }

    /// Unqualified call: `name(args)`
    pub fn call(&mut self, name: &str, element: Option<ElementId>, arguments: Vec<Argument>) -> Expression {
        let name = self.ident(name);
        self.send(None, Selector::Name(name), Some(arguments), element)
    }

    /// Method call: `receiver.name(args)`
    pub fn invoke(
        &mut self,
        receiver: Expression,
        name: &str,
        element: Option<ElementId>,
        arguments: Vec<Argument>,
    ) -> Expression {
        let name = self.ident(name);
        self.send(Some(receiver), Selector::Name(name), Some(arguments), element)
    }

    /// Call of a computed callee: `(callee)(args)`
    pub fn call_expression(&mut self, callee: Expression, arguments: Vec<Argument>) -> Expression {
        self.send(None, Selector::Expression(Box::new(callee)), Some(arguments), None)
    }

    pub fn binary(&mut self, left: Expression, op: Operator, right: Expression) -> Expression {
        self.send(Some(left), Selector::Operator(op), Some(vec![Argument::Positional(right)]), None)
    }

    /// Prefix operator: `-x`, `!x`, `~x`
    pub fn unary(&mut self, op: Operator, operand: Expression) -> Expression {
        self.send(Some(operand), Selector::Operator(op), Some(Vec::new()), None)
    }

    pub fn index(&mut self, base: Expression, key: Expression) -> Expression {
        self.binary(base, Operator::Index, key)
    }

    /// `expr is T` or `expr is! T`
    pub fn is_test(&mut self, expr: Expression, name: &str, ty: TypeId, negated: bool) -> Expression {
        let ty = self.annotation(name, ty);
        self.send(Some(expr), Selector::Is { negated, ty }, None, None)
    }

    pub fn as_cast(&mut self, expr: Expression, name: &str, ty: TypeId) -> Expression {
        let ty = self.annotation(name, ty);
        self.send(Some(expr), Selector::As(ty), None, None)
    }

    pub fn positional(&mut self, value: Expression) -> Argument {
        Argument::Positional(value)
    }

    pub fn named(&mut self, name: &str, value: Expression) -> Argument {
        let name = self.ident(name);
        let span = name.span.merge(value.span());
        Argument::Named(NamedArgument { name, value, span })
    }

    // ------------------------------------------------------------------
    // Assignments
    // ------------------------------------------------------------------

    fn send_set(
        &mut self,
        target: AssignTarget,
        op: AssignOp,
        value: Option<Expression>,
        element: Option<ElementId>,
    ) -> Expression {
        let (id, span) = self.fresh();
        self.bind_opt(id, element);
        Expression::SendSet(SendSet { id, target, op, value: value.map(Box::new), span })
    }

    fn property_target(&mut self, receiver: Option<Expression>, name: &str, getter: Option<ElementId>) -> AssignTarget {
        let name = self.ident(name);
        self.bind_opt(name.id, getter);
        AssignTarget::Property { receiver: receiver.map(Box::new), name }
    }

    /// `name = value`
    pub fn assign(&mut self, name: &str, element: Option<ElementId>, value: Expression) -> Expression {
        let target = self.property_target(None, name, element);
        self.send_set(target, AssignOp::Assign, Some(value), element)
    }

    /// `receiver.name = value`
    pub fn assign_to(
        &mut self,
        receiver: Expression,
        name: &str,
        element: Option<ElementId>,
        value: Expression,
    ) -> Expression {
        let target = self.property_target(Some(receiver), name, element);
        self.send_set(target, AssignOp::Assign, Some(value), element)
    }

    /// `name op= value`
    pub fn compound(&mut self, name: &str, element: Option<ElementId>, op: Operator, value: Expression) -> Expression {
        let target = self.property_target(None, name, element);
        self.send_set(target, AssignOp::Compound(op), Some(value), element)
    }

    /// `++name` / `--name`
    pub fn prefix(&mut self, name: &str, element: Option<ElementId>, step: StepOp) -> Expression {
        let target = self.property_target(None, name, element);
        self.send_set(target, AssignOp::Prefix(step), None, element)
    }

    /// `name++` / `name--`
    pub fn postfix(&mut self, name: &str, element: Option<ElementId>, step: StepOp) -> Expression {
        let target = self.property_target(None, name, element);
        self.send_set(target, AssignOp::Postfix(step), None, element)
    }

    /// `base[key] = value`, `base[key] op= value`, `base[key]++`
    pub fn index_set(&mut self, base: Expression, key: Expression, op: AssignOp, value: Option<Expression>) -> Expression {
        let target = AssignTarget::Index { base: Box::new(base), key: Box::new(key) };
        self.send_set(target, op, value, None)
    }

    // ------------------------------------------------------------------
    // Other expressions
    // ------------------------------------------------------------------

    /// `new C(args)` with the constructor element and the created type
    pub fn new_instance(
        &mut self,
        class_name: &str,
        constructor: Option<ElementId>,
        created: TypeId,
        arguments: Vec<Argument>,
    ) -> Expression {
        let name = self.ident(class_name);
        let (id, span) = self.fresh();
        self.bind_opt(id, constructor);
        self.elements.set_type(id, created);
        Expression::New(NewExpression { id, constructor: name, arguments, is_const: false, span })
    }

    /// List literal typed `list_type`
    pub fn list(&mut self, list_type: TypeId, elements: Vec<Expression>) -> Expression {
        let (id, span) = self.fresh();
        self.elements.set_type(id, list_type);
        Expression::ListLiteral(ListLiteral { id, type_argument: None, elements, is_const: false, span })
    }

    /// Map literal typed `map_type`
    pub fn map(&mut self, map_type: TypeId, entries: Vec<(Expression, Expression)>) -> Expression {
        let (id, span) = self.fresh();
        self.elements.set_type(id, map_type);
        let entries = entries
            .into_iter()
            .map(|(key, value)| {
                let span = key.span().merge(value.span());
                MapEntry { key, value, span }
            })
            .collect();
        Expression::MapLiteral(MapLiteral { id, type_arguments: Vec::new(), entries, is_const: false, span })
    }

    pub fn conditional(&mut self, condition: Expression, then_expr: Expression, else_expr: Expression) -> Expression {
        let (id, span) = self.fresh();
        Expression::Conditional(Conditional {
            id,
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            span,
        })
    }

    pub fn cascade(&mut self, receiver: Expression, sections: Vec<Expression>) -> Expression {
        let (id, span) = self.fresh();
        Expression::Cascade(Cascade { id, receiver: Box::new(receiver), sections, span })
    }

    pub fn cascade_receiver(&mut self) -> Expression {
        let (id, span) = self.fresh();
        Expression::CascadeReceiver(CascadeReceiver { id, span })
    }

    pub fn paren(&mut self, expression: Expression) -> Expression {
        let (id, span) = self.fresh();
        Expression::Parenthesized(Parenthesized { id, expression: Box::new(expression), span })
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    pub fn param(&mut self, name: &str, element: Option<ElementId>, default_value: Option<Expression>) -> Parameter {
        let kind = if default_value.is_some() { ParameterKind::Optional } else { ParameterKind::Required };
        let name = self.ident(name);
        let (id, span) = self.fresh();
        self.bind_opt(id, element);
        Parameter { id, name, kind, type_annotation: None, default_value, span }
    }

    /// Function bound to `element`; `body` is `None` for abstract functions
    pub fn function(
        &mut self,
        name: Option<&str>,
        element: Option<ElementId>,
        parameters: Vec<Parameter>,
        body: Option<Statement>,
    ) -> FunctionExpression {
        let name = name.map(|n| self.ident(n));
        let (id, span) = self.fresh();
        self.bind_opt(id, element);
        FunctionExpression { id, name, parameters, return_type: None, body: body.map(Box::new), span }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    pub fn block(&mut self, statements: Vec<Statement>) -> Statement {
        let (id, span) = self.fresh();
        Statement::Block(Block { id, statements, span })
    }

    pub fn expr_stmt(&mut self, expression: Expression) -> Statement {
        let (id, span) = self.fresh();
        Statement::Expression(ExpressionStatement { id, expression, span })
    }

    /// `T a = init, b;` where each declarator is `(name, element, initializer)`
    pub fn var(
        &mut self,
        annotation: Option<(&str, TypeId)>,
        declarators: Vec<(&str, Option<ElementId>, Option<Expression>)>,
    ) -> Statement {
        let type_annotation = annotation.map(|(name, ty)| self.annotation(name, ty));
        let declarators = declarators
            .into_iter()
            .map(|(name, element, initializer)| {
                let name = self.ident(name);
                let (id, span) = self.fresh();
                self.bind_opt(id, element);
                VariableDeclarator { id, name, initializer, span }
            })
            .collect();
        let (id, span) = self.fresh();
        Statement::VariableDefinitions(VariableDefinitions {
            id,
            type_annotation,
            declarators,
            is_final: false,
            span,
        })
    }

    pub fn function_decl(&mut self, function: FunctionExpression) -> Statement {
        let (id, span) = self.fresh();
        Statement::FunctionDeclaration(FunctionDeclaration { id, function, span })
    }

    pub fn if_(&mut self, condition: Expression, then_branch: Statement, else_branch: Option<Statement>) -> Statement {
        let (id, span) = self.fresh();
        Statement::If(IfStatement {
            id,
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            span,
        })
    }

    pub fn while_(&mut self, condition: Expression, body: Statement) -> Statement {
        let (id, span) = self.fresh();
        Statement::While(WhileStatement { id, condition, body: Box::new(body), span })
    }

    pub fn do_while(&mut self, body: Statement, condition: Expression) -> Statement {
        let (id, span) = self.fresh();
        Statement::DoWhile(DoWhileStatement { id, body: Box::new(body), condition, span })
    }

    pub fn for_(
        &mut self,
        initializer: Option<Statement>,
        condition: Option<Expression>,
        updates: Vec<Expression>,
        body: Statement,
    ) -> Statement {
        let (id, span) = self.fresh();
        Statement::For(ForStatement {
            id,
            initializer: initializer.map(Box::new),
            condition,
            updates,
            body: Box::new(body),
            span,
        })
    }

    pub fn for_in(&mut self, variable: Statement, iterable: Expression, body: Statement) -> Statement {
        let (id, span) = self.fresh();
        Statement::ForIn(ForInStatement { id, variable: Box::new(variable), iterable, body: Box::new(body), span })
    }

    pub fn return_(&mut self, value: Option<Expression>) -> Statement {
        self.return_kind(value, ReturnKind::Normal)
    }

    pub fn return_kind(&mut self, value: Option<Expression>, kind: ReturnKind) -> Statement {
        let (id, span) = self.fresh();
        Statement::Return(ReturnStatement { id, value, kind, span })
    }

    pub fn throw(&mut self, expression: Expression) -> Statement {
        let (id, span) = self.fresh();
        Statement::Throw(ThrowStatement { id, expression, span })
    }

    pub fn rethrow(&mut self) -> Statement {
        let (id, span) = self.fresh();
        Statement::Rethrow(RethrowStatement { id, span })
    }

    pub fn break_(&mut self) -> Statement {
        let (id, span) = self.fresh();
        Statement::Break(BreakStatement { id, label: None, span })
    }

    pub fn continue_(&mut self) -> Statement {
        let (id, span) = self.fresh();
        Statement::Continue(ContinueStatement { id, label: None, span })
    }

    pub fn empty(&mut self) -> Statement {
        let (id, span) = self.fresh();
        Statement::Empty(EmptyStatement { id, span })
    }

    pub fn labeled(&mut self, label: &str, statement: Statement) -> Statement {
        let label = self.ident(label);
        let (id, span) = self.fresh();
        Statement::Labeled(LabeledStatement { id, label, statement: Box::new(statement), span })
    }

    /// `switch (expression) { case e: ... default: ... }`; a case with no expressions is the default
    pub fn switch(&mut self, expression: Expression, cases: Vec<(Vec<Expression>, Vec<Statement>)>) -> Statement {
        let cases = cases
            .into_iter()
            .map(|(expressions, statements)| {
                let (id, span) = self.fresh();
                let is_default = expressions.is_empty();
                SwitchCase { id, expressions, is_default, statements, span }
            })
            .collect();
        let (id, span) = self.fresh();
        Statement::Switch(SwitchStatement { id, expression, cases, span })
    }

    /// `try { body } catch (e) { handler } finally { finally }`
    pub fn try_(
        &mut self,
        body: Vec<Statement>,
        handlers: Vec<Vec<Statement>>,
        finally: Option<Vec<Statement>>,
    ) -> Statement {
        let body = self.raw_block(body);
        let catches = handlers
            .into_iter()
            .map(|statements| {
                let exception = Some(self.ident("e"));
                let body = self.raw_block(statements);
                let (id, span) = self.fresh();
                CatchClause { id, exception_type: None, exception, stack_trace: None, body, span }
            })
            .collect();
        let finally_block = finally.map(|statements| self.raw_block(statements));
        let (id, span) = self.fresh();
        Statement::Try(TryStatement { id, body, catches, finally_block, span })
    }

    fn raw_block(&mut self, statements: Vec<Statement>) -> Block {
        let (id, span) = self.fresh();
        Block { id, statements, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique() {
        let mut b = AstBuilder::new();
        let one = b.int(1);
        let two = b.int(2);
        let sum = b.binary(one.clone(), Operator::Add, two.clone());
        assert_ne!(one.id(), two.id());
        assert_ne!(sum.id(), one.id());
        assert_ne!(one.span(), two.span());
    }

    #[test]
    fn test_bindings_recorded() {
        let mut b = AstBuilder::new();
        let x = b.read("x", Some(ElementId(3)));
        let assignment = b.assign("x", Some(ElementId(3)), x.clone());
        let elements = b.finish();

        assert_eq!(elements.get(x.id()), Some(ElementId(3)));
        assert_eq!(elements.get(assignment.id()), Some(ElementId(3)));
        match assignment {
            Expression::SendSet(SendSet { target: AssignTarget::Property { name, .. }, .. }) => {
                assert_eq!(elements.get(name.id), Some(ElementId(3)));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }
}
