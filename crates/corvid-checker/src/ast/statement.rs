//! Statement AST nodes

use super::*;

/// Statement (performs an action)
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// { ... }
    Block(Block),

    /// expr;
    Expression(ExpressionStatement),

    /// int x = 1, y;
    VariableDefinitions(VariableDefinitions),

    /// Local function: int add(int a, int b) => a + b;
    FunctionDeclaration(FunctionDeclaration),

    If(IfStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    Return(ReturnStatement),
    Throw(ThrowStatement),
    Rethrow(RethrowStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Switch(SwitchStatement),
    Try(TryStatement),
    Labeled(LabeledStatement),

    /// ;
    Empty(EmptyStatement),
}

impl Statement {
    pub fn id(&self) -> NodeId {
        match self {
            Statement::Block(s) => s.id,
            Statement::Expression(s) => s.id,
            Statement::VariableDefinitions(s) => s.id,
            Statement::FunctionDeclaration(s) => s.id,
            Statement::If(s) => s.id,
            Statement::While(s) => s.id,
            Statement::DoWhile(s) => s.id,
            Statement::For(s) => s.id,
            Statement::ForIn(s) => s.id,
            Statement::Return(s) => s.id,
            Statement::Throw(s) => s.id,
            Statement::Rethrow(s) => s.id,
            Statement::Break(s) => s.id,
            Statement::Continue(s) => s.id,
            Statement::Switch(s) => s.id,
            Statement::Try(s) => s.id,
            Statement::Labeled(s) => s.id,
            Statement::Empty(s) => s.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Statement::Block(s) => &s.span,
            Statement::Expression(s) => &s.span,
            Statement::VariableDefinitions(s) => &s.span,
            Statement::FunctionDeclaration(s) => &s.span,
            Statement::If(s) => &s.span,
            Statement::While(s) => &s.span,
            Statement::DoWhile(s) => &s.span,
            Statement::For(s) => &s.span,
            Statement::ForIn(s) => &s.span,
            Statement::Return(s) => &s.span,
            Statement::Throw(s) => &s.span,
            Statement::Rethrow(s) => &s.span,
            Statement::Break(s) => &s.span,
            Statement::Continue(s) => &s.span,
            Statement::Switch(s) => &s.span,
            Statement::Try(s) => &s.span,
            Statement::Labeled(s) => &s.span,
            Statement::Empty(s) => &s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub id: NodeId,
    pub expression: Expression,
    pub span: Span,
}

/// One declaration statement sharing a type annotation across declarators
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinitions {
    pub id: NodeId,
    pub type_annotation: Option<TypeAnnotation>,
    pub declarators: Vec<VariableDeclarator>,
    pub is_final: bool,
    pub span: Span,
}

/// The declared variable is `get(id)`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub id: NodeId,
    pub name: Identifier,
    pub initializer: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub id: NodeId,
    pub function: FunctionExpression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub id: NodeId,
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub id: NodeId,
    pub condition: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub id: NodeId,
    pub body: Box<Statement>,
    pub condition: Expression,
    pub span: Span,
}

/// for (initializer; condition; updates) body
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub id: NodeId,
    /// Variable definitions or an expression statement
    pub initializer: Option<Box<Statement>>,
    pub condition: Option<Expression>,
    pub updates: Vec<Expression>,
    pub body: Box<Statement>,
    pub span: Span,
}

/// for (variable in iterable) body
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    pub id: NodeId,
    /// Variable definitions or an expression statement naming the loop variable
    pub variable: Box<Statement>,
    pub iterable: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub id: NodeId,
    pub value: Option<Expression>,
    pub kind: ReturnKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnKind {
    /// return; return expr; => expr
    #[default]
    Normal,
    /// Body implemented by the host platform
    Native,
    /// factory Foo() = Bar;
    RedirectingFactory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub id: NodeId,
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RethrowStatement {
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStatement {
    pub id: NodeId,
    pub label: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStatement {
    pub id: NodeId,
    pub label: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub id: NodeId,
    pub expression: Expression,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub id: NodeId,
    /// Case expressions; empty for a bare default
    pub expressions: Vec<Expression>,
    pub is_default: bool,
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub id: NodeId,
    pub body: Block,
    pub catches: Vec<CatchClause>,
    pub finally_block: Option<Block>,
    pub span: Span,
}

/// on T catch (e, st) { ... }
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub id: NodeId,
    pub exception_type: Option<TypeAnnotation>,
    pub exception: Option<Identifier>,
    pub stack_trace: Option<Identifier>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStatement {
    pub id: NodeId,
    pub label: Identifier,
    pub statement: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStatement {
    pub id: NodeId,
    pub span: Span,
}
