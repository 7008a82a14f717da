//! AST visitor pattern for traversing the syntax tree
//!
//! Visitors are read-only walks used by analyses that need to look at a
//! subtree before the checker types it.
//!
//! # Example
//!
//! ```rust
//! use corvid_checker::ast::*;
//!
//! struct CountSends {
//!     count: usize,
//! }
//!
//! impl Visitor for CountSends {
//!     fn visit_send(&mut self, send: &Send) {
//!         self.count += 1;
//!         walk_send(self, send);
//!     }
//! }
//! ```

use super::*;

/// AST visitor trait
///
/// Each visit method has a default implementation that calls the
/// corresponding walk function.
pub trait Visitor: Sized {
    // Statements
    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_variable_definitions(&mut self, defs: &VariableDefinitions) {
        walk_variable_definitions(self, defs);
    }

    // Expressions
    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    fn visit_send(&mut self, send: &Send) {
        walk_send(self, send);
    }

    fn visit_send_set(&mut self, send_set: &SendSet) {
        walk_send_set(self, send_set);
    }

    fn visit_function_expression(&mut self, func: &FunctionExpression) {
        walk_function_expression(self, func);
    }

    // Common
    fn visit_identifier(&mut self, _id: &Identifier) {
        // Leaf node - no traversal needed
    }
}

// ============================================================================
// Walk Functions - Default Traversal Implementations
// ============================================================================

pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Block(block) => visitor.visit_block(block),
        Statement::Expression(stmt) => visitor.visit_expression(&stmt.expression),
        Statement::VariableDefinitions(defs) => visitor.visit_variable_definitions(defs),
        Statement::FunctionDeclaration(decl) => visitor.visit_function_expression(&decl.function),
        Statement::If(stmt) => {
            visitor.visit_expression(&stmt.condition);
            visitor.visit_statement(&stmt.then_branch);
            if let Some(else_branch) = &stmt.else_branch {
                visitor.visit_statement(else_branch);
            }
        }
        Statement::While(stmt) => {
            visitor.visit_expression(&stmt.condition);
            visitor.visit_statement(&stmt.body);
        }
        Statement::DoWhile(stmt) => {
            visitor.visit_statement(&stmt.body);
            visitor.visit_expression(&stmt.condition);
        }
        Statement::For(stmt) => {
            if let Some(init) = &stmt.initializer {
                visitor.visit_statement(init);
            }
            if let Some(condition) = &stmt.condition {
                visitor.visit_expression(condition);
            }
            for update in &stmt.updates {
                visitor.visit_expression(update);
            }
            visitor.visit_statement(&stmt.body);
        }
        Statement::ForIn(stmt) => {
            visitor.visit_statement(&stmt.variable);
            visitor.visit_expression(&stmt.iterable);
            visitor.visit_statement(&stmt.body);
        }
        Statement::Return(stmt) => {
            if let Some(value) = &stmt.value {
                visitor.visit_expression(value);
            }
        }
        Statement::Throw(stmt) => visitor.visit_expression(&stmt.expression),
        Statement::Switch(stmt) => {
            visitor.visit_expression(&stmt.expression);
            for case in &stmt.cases {
                for expr in &case.expressions {
                    visitor.visit_expression(expr);
                }
                for stmt in &case.statements {
                    visitor.visit_statement(stmt);
                }
            }
        }
        Statement::Try(stmt) => {
            visitor.visit_block(&stmt.body);
            for catch in &stmt.catches {
                if let Some(exception) = &catch.exception {
                    visitor.visit_identifier(exception);
                }
                if let Some(stack_trace) = &catch.stack_trace {
                    visitor.visit_identifier(stack_trace);
                }
                visitor.visit_block(&catch.body);
            }
            if let Some(finally) = &stmt.finally_block {
                visitor.visit_block(finally);
            }
        }
        Statement::Labeled(stmt) => visitor.visit_statement(&stmt.statement),
        Statement::Rethrow(_)
        | Statement::Break(_)
        | Statement::Continue(_)
        | Statement::Empty(_) => {}
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    for stmt in &block.statements {
        visitor.visit_statement(stmt);
    }
}

pub fn walk_variable_definitions<V: Visitor>(visitor: &mut V, defs: &VariableDefinitions) {
    for declarator in &defs.declarators {
        visitor.visit_identifier(&declarator.name);
        if let Some(init) = &declarator.initializer {
            visitor.visit_expression(init);
        }
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Literal(_) | Expression::CascadeReceiver(_) => {}
        Expression::StringJuxtaposition(e) => {
            visitor.visit_expression(&e.first);
            visitor.visit_expression(&e.second);
        }
        Expression::StringInterpolation(e) => {
            for part in &e.parts {
                visitor.visit_expression(part);
            }
        }
        Expression::Identifier(id) => visitor.visit_identifier(id),
        Expression::Send(send) => visitor.visit_send(send),
        Expression::SendSet(send_set) => visitor.visit_send_set(send_set),
        Expression::New(e) => {
            for arg in &e.arguments {
                visitor.visit_expression(arg.value());
            }
        }
        Expression::ListLiteral(e) => {
            for element in &e.elements {
                visitor.visit_expression(element);
            }
        }
        Expression::MapLiteral(e) => {
            for entry in &e.entries {
                visitor.visit_expression(&entry.key);
                visitor.visit_expression(&entry.value);
            }
        }
        Expression::Conditional(e) => {
            visitor.visit_expression(&e.condition);
            visitor.visit_expression(&e.then_expr);
            visitor.visit_expression(&e.else_expr);
        }
        Expression::Cascade(e) => {
            visitor.visit_expression(&e.receiver);
            for section in &e.sections {
                visitor.visit_expression(section);
            }
        }
        Expression::Function(func) => visitor.visit_function_expression(func),
        Expression::Parenthesized(e) => visitor.visit_expression(&e.expression),
    }
}

pub fn walk_send<V: Visitor>(visitor: &mut V, send: &Send) {
    if let Some(receiver) = &send.receiver {
        visitor.visit_expression(receiver);
    }
    match &send.selector {
        Selector::Name(name) => visitor.visit_identifier(name),
        Selector::Expression(callee) => visitor.visit_expression(callee),
        Selector::Operator(_) | Selector::Is { .. } | Selector::As(_) => {}
    }
    for arg in send.arguments() {
        visitor.visit_expression(arg.value());
    }
}

pub fn walk_send_set<V: Visitor>(visitor: &mut V, send_set: &SendSet) {
    match &send_set.target {
        AssignTarget::Property { receiver, name } => {
            if let Some(receiver) = receiver {
                visitor.visit_expression(receiver);
            }
            visitor.visit_identifier(name);
        }
        AssignTarget::Index { base, key } => {
            visitor.visit_expression(base);
            visitor.visit_expression(key);
        }
    }
    if let Some(value) = &send_set.value {
        visitor.visit_expression(value);
    }
}

pub fn walk_function_expression<V: Visitor>(visitor: &mut V, func: &FunctionExpression) {
    for param in &func.parameters {
        visitor.visit_identifier(&param.name);
        if let Some(default) = &param.default_value {
            visitor.visit_expression(default);
        }
    }
    if let Some(body) = &func.body {
        visitor.visit_statement(body);
    }
}
