//! An abstract syntax tree for the Monkey programming language from
//! <https://interpreterbook.com/>.
//!
//! Nodes anchor to the lexed token stream by index; `show` renders the
//! canonical text form of a subtree using that stream. The evaluator splices
//! computed values back into quoted trees via the `*Result` literal variants,
//! which carry their values directly instead of a token index.

use crate::token::Token;

/// The top level structure of a Monkey program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// The statements that make up the `Program`.
    pub statements: Vec<Statement>,
}

impl Program {
    /// Creates a new `Program` sized for roughly one statement per two
    /// input tokens.
    pub fn with_capacity(capacity: usize) -> Self {
        Program {
            statements: Vec::with_capacity(capacity),
        }
    }

    /// Renders the canonical text form of the entire program.
    pub fn show(&self, tokens: &[Token]) -> String {
        self.statements
            .iter()
            .map(|stmt| stmt.show(tokens))
            .collect()
    }
}

/// Any node in the syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Program(Program),
    Statement(Statement),
    Expression(Expression),
}

impl Node {
    /// Renders the canonical text form of this node.
    pub fn show(&self, tokens: &[Token]) -> String {
        match self {
            Node::Program(prog) => prog.show(tokens),
            Node::Statement(stmt) => stmt.show(tokens),
            Node::Expression(expr) => expr.show(tokens),
        }
    }
}

/// Possible statement types in Monkey.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl Statement {
    /// Renders the canonical text form of this statement.
    pub fn show(&self, tokens: &[Token]) -> String {
        match self {
            Statement::Let(stmt) => format!(
                "let {} = {};",
                tokens[stmt.token].literal(),
                stmt.value.show(tokens)
            ),
            Statement::Return(stmt) => match &stmt.value {
                Some(value) => format!("return {};", value.show(tokens)),
                None => "return;".to_string(),
            },
            Statement::Expression(stmt) => {
                let mut out = stmt.expression.show(tokens);
                if stmt.semicolon {
                    out.push(';');
                }
                out
            }
            Statement::Block(block) => block.show(tokens),
        }
    }
}

/// A statement that binds an expression to an identifier. The anchoring
/// token is the identifier being bound.
#[derive(Clone, Debug, PartialEq)]
pub struct LetStatement {
    pub token: usize,
    pub value: Expression,
}

/// A statement that returns an optional value.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStatement {
    pub token: usize,
    pub value: Option<Expression>,
}

/// A statement that computes an expression, recording whether a trailing
/// semicolon followed it in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionStatement {
    pub token: usize,
    pub expression: Expression,
    pub semicolon: bool,
}

/// A brace-delimited sequence of statements.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockStatement {
    pub token: usize,
    pub statements: Vec<Statement>,
}

impl BlockStatement {
    /// Renders the canonical text form of this block.
    pub fn show(&self, tokens: &[Token]) -> String {
        if self.statements.is_empty() {
            return "{}".to_string();
        }

        let statements: Vec<String> = self
            .statements
            .iter()
            .map(|stmt| stmt.show(tokens))
            .collect();

        format!("{{ {} }}", statements.join("\n"))
    }
}

/// A computed expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    // Literals produced by the parser, anchored to their token.
    Identifier(usize),
    Integer(usize),
    String(usize),
    Boolean(usize),

    // Literals produced by the evaluator when splicing computed values
    // back into a quoted tree.
    IntegerResult(i64),
    StringResult(String),
    BooleanResult(bool),

    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Macro(MacroLiteral),
    Call(CallExpression),
    Array(ArrayLiteral),
    Hash(HashLiteral),
    Index(IndexExpression),
}

impl Expression {
    /// Renders the canonical text form of this expression.
    pub fn show(&self, tokens: &[Token]) -> String {
        match self {
            Expression::Identifier(idx)
            | Expression::Integer(idx)
            | Expression::String(idx)
            | Expression::Boolean(idx) => tokens[*idx].literal(),

            Expression::IntegerResult(value) => value.to_string(),
            Expression::StringResult(value) => value.clone(),
            Expression::BooleanResult(value) => value.to_string(),

            Expression::Prefix(expr) => format!(
                "({}{})",
                expr.operator.literal(),
                expr.right.show(tokens)
            ),
            Expression::Infix(expr) => format!(
                "({} {} {})",
                expr.left.show(tokens),
                expr.operator.literal(),
                expr.right.show(tokens)
            ),
            Expression::If(expr) => {
                let mut out = format!(
                    "if {} {}",
                    expr.condition.show(tokens),
                    expr.consequence.show(tokens)
                );
                if let Some(alt) = &expr.alternative {
                    out.push_str(" else ");
                    out.push_str(&alt.show(tokens));
                }
                out
            }
            Expression::Function(func) => format!(
                "fn({}) {}",
                show_identifiers(&func.parameters, tokens),
                func.body.show(tokens)
            ),
            Expression::Macro(m) => format!(
                "macro({}) {}",
                show_identifiers(&m.parameters, tokens),
                m.body.show(tokens)
            ),
            Expression::Call(call) => {
                let arguments: Vec<String> = call
                    .arguments
                    .iter()
                    .map(|arg| arg.show(tokens))
                    .collect();

                format!("{}({})", call.function.show(tokens), arguments.join(", "))
            }
            Expression::Array(array) => {
                let elements: Vec<String> = array
                    .elements
                    .iter()
                    .map(|elem| elem.show(tokens))
                    .collect();

                format!("[{}]", elements.join(", "))
            }
            Expression::Hash(hash) => {
                let pairs: Vec<String> = hash
                    .pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.show(tokens), v.show(tokens)))
                    .collect();

                format!("{{{}}}", pairs.join(", "))
            }
            Expression::Index(expr) => format!(
                "({}[{}])",
                expr.left.show(tokens),
                expr.index.show(tokens)
            ),
        }
    }
}

// Renders a comma-separated list of identifier tokens.
fn show_identifiers(indices: &[usize], tokens: &[Token]) -> String {
    let names: Vec<String> = indices.iter().map(|&idx| tokens[idx].literal()).collect();
    names.join(", ")
}

/// A prefix operator applied to an expression.
#[derive(Clone, Debug, PartialEq)]
pub struct PrefixExpression {
    pub token: usize,
    pub operator: Token,
    pub right: Box<Expression>,
}

/// An infix operator applied to a pair of expressions.
#[derive(Clone, Debug, PartialEq)]
pub struct InfixExpression {
    pub token: usize,
    pub operator: Token,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// A conditional expression with an optional alternative block.
#[derive(Clone, Debug, PartialEq)]
pub struct IfExpression {
    pub token: usize,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

/// A function literal: parameter identifier tokens and a body.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionLiteral {
    pub token: usize,
    pub parameters: Vec<usize>,
    pub body: BlockStatement,
}

/// A macro literal, identical in shape to a function literal.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroLiteral {
    pub token: usize,
    pub parameters: Vec<usize>,
    pub body: BlockStatement,
}

/// A call of a function, built-in, or macro with arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpression {
    pub token: usize,
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

/// An array literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayLiteral {
    pub token: usize,
    pub elements: Vec<Expression>,
}

/// A hash literal: key/value expression pairs in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct HashLiteral {
    pub token: usize,
    pub pairs: Vec<(Expression, Expression)>,
}

/// An index operation into an array or hash.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexExpression {
    pub token: usize,
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

/// Rewrites every expression in a program bottom-up using `f`: children are
/// rewritten before the node that holds them is handed to `f`.
pub fn modify_program<E, F>(prog: Program, f: &mut F) -> Result<Program, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    let mut statements = Vec::with_capacity(prog.statements.len());
    for stmt in prog.statements {
        statements.push(modify_statement(stmt, f)?);
    }

    Ok(Program { statements })
}

/// Rewrites every expression held by a statement bottom-up using `f`.
pub fn modify_statement<E, F>(stmt: Statement, f: &mut F) -> Result<Statement, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    Ok(match stmt {
        Statement::Let(stmt) => Statement::Let(LetStatement {
            token: stmt.token,
            value: modify_expression(stmt.value, f)?,
        }),
        Statement::Return(stmt) => Statement::Return(ReturnStatement {
            token: stmt.token,
            value: match stmt.value {
                Some(value) => Some(modify_expression(value, f)?),
                None => None,
            },
        }),
        Statement::Expression(stmt) => Statement::Expression(ExpressionStatement {
            token: stmt.token,
            expression: modify_expression(stmt.expression, f)?,
            semicolon: stmt.semicolon,
        }),
        Statement::Block(block) => Statement::Block(modify_block(block, f)?),
    })
}

/// Rewrites every expression in a block bottom-up using `f`.
pub fn modify_block<E, F>(block: BlockStatement, f: &mut F) -> Result<BlockStatement, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    let mut statements = Vec::with_capacity(block.statements.len());
    for stmt in block.statements {
        statements.push(modify_statement(stmt, f)?);
    }

    Ok(BlockStatement {
        token: block.token,
        statements,
    })
}

/// Rewrites an expression bottom-up using `f`.
pub fn modify_expression<E, F>(expr: Expression, f: &mut F) -> Result<Expression, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    let expr = match expr {
        Expression::Prefix(expr) => Expression::Prefix(PrefixExpression {
            token: expr.token,
            operator: expr.operator,
            right: Box::new(modify_expression(*expr.right, f)?),
        }),
        Expression::Infix(expr) => Expression::Infix(InfixExpression {
            token: expr.token,
            operator: expr.operator,
            left: Box::new(modify_expression(*expr.left, f)?),
            right: Box::new(modify_expression(*expr.right, f)?),
        }),
        Expression::If(expr) => Expression::If(IfExpression {
            token: expr.token,
            condition: Box::new(modify_expression(*expr.condition, f)?),
            consequence: modify_block(expr.consequence, f)?,
            alternative: match expr.alternative {
                Some(block) => Some(modify_block(block, f)?),
                None => None,
            },
        }),
        Expression::Function(func) => Expression::Function(FunctionLiteral {
            token: func.token,
            parameters: func.parameters,
            body: modify_block(func.body, f)?,
        }),
        Expression::Macro(m) => Expression::Macro(MacroLiteral {
            token: m.token,
            parameters: m.parameters,
            body: modify_block(m.body, f)?,
        }),
        Expression::Call(call) => Expression::Call(CallExpression {
            token: call.token,
            function: Box::new(modify_expression(*call.function, f)?),
            arguments: modify_expressions(call.arguments, f)?,
        }),
        Expression::Array(array) => Expression::Array(ArrayLiteral {
            token: array.token,
            elements: modify_expressions(array.elements, f)?,
        }),
        Expression::Hash(hash) => {
            let mut pairs = Vec::with_capacity(hash.pairs.len());
            for (k, v) in hash.pairs {
                pairs.push((modify_expression(k, f)?, modify_expression(v, f)?));
            }

            Expression::Hash(HashLiteral {
                token: hash.token,
                pairs,
            })
        }
        Expression::Index(expr) => Expression::Index(IndexExpression {
            token: expr.token,
            left: Box::new(modify_expression(*expr.left, f)?),
            index: Box::new(modify_expression(*expr.index, f)?),
        }),

        // Literals hold no child expressions.
        expr => expr,
    };

    f(expr)
}

// Rewrites each expression of a list in order.
fn modify_expressions<E, F>(exprs: Vec<Expression>, f: &mut F) -> Result<Vec<Expression>, E>
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    let mut out = Vec::with_capacity(exprs.len());
    for expr in exprs {
        out.push(modify_expression(expr, f)?);
    }

    Ok(out)
}
