//! Expression AST nodes

use super::*;
use std::fmt;

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// 42, 3.14, true, "text", null
    Literal(Literal),

    /// Adjacent string literals: "a" "b"
    StringJuxtaposition(StringJuxtaposition),

    /// "Hello ${name}"
    StringInterpolation(StringInterpolation),

    /// this, super
    Identifier(Identifier),

    /// Reads, calls and operator applications: a.b, f(x), a + b, x is T
    Send(Send),

    /// Assignments: a = b, a.b += c, a[i]--
    SendSet(SendSet),

    /// new Foo<int>(1)
    New(NewExpression),

    /// <int>[1, 2]
    ListLiteral(ListLiteral),

    /// <String, int>{"a": 1}
    MapLiteral(MapLiteral),

    /// cond ? a : b
    Conditional(Conditional),

    /// target..a()..b = 1
    Cascade(Cascade),

    /// Stands for the cascade target inside a cascade section
    CascadeReceiver(CascadeReceiver),

    /// Function literal: (x) => x + 1
    Function(FunctionExpression),

    /// (expr)
    Parenthesized(Parenthesized),
}

impl Expression {
    pub fn id(&self) -> NodeId {
        match self {
            Expression::Literal(e) => e.id,
            Expression::StringJuxtaposition(e) => e.id,
            Expression::StringInterpolation(e) => e.id,
            Expression::Identifier(e) => e.id,
            Expression::Send(e) => e.id,
            Expression::SendSet(e) => e.id,
            Expression::New(e) => e.id,
            Expression::ListLiteral(e) => e.id,
            Expression::MapLiteral(e) => e.id,
            Expression::Conditional(e) => e.id,
            Expression::Cascade(e) => e.id,
            Expression::CascadeReceiver(e) => e.id,
            Expression::Function(e) => e.id,
            Expression::Parenthesized(e) => e.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expression::Literal(e) => &e.span,
            Expression::StringJuxtaposition(e) => &e.span,
            Expression::StringInterpolation(e) => &e.span,
            Expression::Identifier(e) => &e.span,
            Expression::Send(e) => &e.span,
            Expression::SendSet(e) => &e.span,
            Expression::New(e) => &e.span,
            Expression::ListLiteral(e) => &e.span,
            Expression::MapLiteral(e) => &e.span,
            Expression::Conditional(e) => &e.span,
            Expression::Cascade(e) => &e.span,
            Expression::CascadeReceiver(e) => &e.span,
            Expression::Function(e) => &e.span,
            Expression::Parenthesized(e) => &e.span,
        }
    }

    /// Strip any number of enclosing parentheses
    pub fn unparenthesized(&self) -> &Expression {
        let mut expr = self;
        while let Expression::Parenthesized(inner) = expr {
            expr = &inner.expression;
        }
        expr
    }

    /// Check if this is the literal `true`, ignoring parentheses
    pub fn is_true_literal(&self) -> bool {
        matches!(
            self.unparenthesized(),
            Expression::Literal(Literal { kind: LiteralKind::Bool(true), .. })
        )
    }
}

// ============================================================================
// Literals
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub id: NodeId,
    pub kind: LiteralKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(String),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringJuxtaposition {
    pub id: NodeId,
    pub first: Box<Expression>,
    pub second: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringInterpolation {
    pub id: NodeId,
    /// Interpolated expressions, in source order
    pub parts: Vec<Expression>,
    pub span: Span,
}

// ============================================================================
// Sends
// ============================================================================

/// A member read, call or operator application
///
/// `arguments` is `None` for a property read (`a.b`) and `Some` for a call
/// (`a.b()`), including operator sends where the right operand is the single
/// argument. Unary operators carry an empty argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Send {
    pub id: NodeId,
    pub receiver: Option<Box<Expression>>,
    pub selector: Selector,
    pub arguments: Option<Vec<Argument>>,
    pub span: Span,
}

impl Send {
    pub fn arguments(&self) -> &[Argument] {
        self.arguments.as_deref().unwrap_or(&[])
    }

    pub fn is_call(&self) -> bool {
        self.arguments.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// foo in foo(), a.foo, a.foo()
    Name(Identifier),

    /// + - [] == && ...
    Operator(Operator),

    /// x is T, x is! T
    Is { negated: bool, ty: TypeAnnotation },

    /// x as T
    As(TypeAnnotation),

    /// Call of a computed callee: (f)(x), list[0](x)
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    TruncDiv,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    Index,
    Eq,
    Ne,
    And,
    Or,
    Not,
    /// ?x: was the optional parameter x passed
    ArgumentTest,
}

impl Operator {
    /// Source spelling, which is also the member name the operator invokes
    pub fn member_name(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::TruncDiv => "~/",
            Operator::Mod => "%",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitNot => "~",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Index => "[]",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
            Operator::ArgumentTest => "?",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.member_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Positional(Expression),
    Named(NamedArgument),
}

impl Argument {
    pub fn value(&self) -> &Expression {
        match self {
            Argument::Positional(expr) => expr,
            Argument::Named(named) => &named.value,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Argument::Positional(expr) => expr.span(),
            Argument::Named(named) => &named.span,
        }
    }
}

/// name: value
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgument {
    pub name: Identifier,
    pub value: Expression,
    pub span: Span,
}

// ============================================================================
// Assignments
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SendSet {
    pub id: NodeId,
    pub target: AssignTarget,
    pub op: AssignOp,
    /// Right-hand side; absent for ++ and --
    pub value: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// x, a.x
    Property {
        receiver: Option<Box<Expression>>,
        name: Identifier,
    },
    /// a[k]
    Index {
        base: Box<Expression>,
        key: Box<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// =
    Assign,
    /// +=, -=, ...
    Compound(Operator),
    /// ++x, --x
    Prefix(StepOp),
    /// x++, x--
    Postfix(StepOp),
}

impl AssignOp {
    /// The binary operator applied before storing, if any
    pub fn operator(&self) -> Option<Operator> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Compound(op) => Some(*op),
            AssignOp::Prefix(step) | AssignOp::Postfix(step) => Some(step.operator()),
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self, AssignOp::Prefix(_) | AssignOp::Postfix(_))
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, AssignOp::Postfix(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOp {
    Increment,
    Decrement,
}

impl StepOp {
    pub fn operator(&self) -> Operator {
        match self {
            StepOp::Increment => Operator::Add,
            StepOp::Decrement => Operator::Sub,
        }
    }
}

// ============================================================================
// Other expressions
// ============================================================================

/// new Foo<int>.named(args); the constructor is `get(id)`, the created type `type_of(id)`
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub id: NodeId,
    pub constructor: Identifier,
    pub arguments: Vec<Argument>,
    pub is_const: bool,
    pub span: Span,
}

/// The list type is `type_of(id)`
#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub id: NodeId,
    pub type_argument: Option<TypeAnnotation>,
    pub elements: Vec<Expression>,
    pub is_const: bool,
    pub span: Span,
}

/// The map type is `type_of(id)`
#[derive(Debug, Clone, PartialEq)]
pub struct MapLiteral {
    pub id: NodeId,
    pub type_arguments: Vec<TypeAnnotation>,
    pub entries: Vec<MapEntry>,
    pub is_const: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Expression,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub id: NodeId,
    pub condition: Box<Expression>,
    pub then_expr: Box<Expression>,
    pub else_expr: Box<Expression>,
    pub span: Span,
}

/// Sections refer to the target through [`CascadeReceiver`] nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Cascade {
    pub id: NodeId,
    pub receiver: Box<Expression>,
    pub sections: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CascadeReceiver {
    pub id: NodeId,
    pub span: Span,
}

/// Function literal, method or local function; the element is `get(id)`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    pub id: NodeId,
    pub name: Option<Identifier>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    /// Absent for abstract and external functions
    pub body: Option<Box<Statement>>,
    pub span: Span,
}

/// Formal parameter; the element is `get(id)`
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: NodeId,
    pub name: Identifier,
    pub kind: ParameterKind,
    pub type_annotation: Option<TypeAnnotation>,
    pub default_value: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Required,
    Optional,
    Named,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parenthesized {
    pub id: NodeId,
    pub expression: Box<Expression>,
    pub span: Span,
}
