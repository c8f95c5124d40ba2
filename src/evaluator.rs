//! An AST evaluator for the Monkey programming language from
//! <https://interpreterbook.com/>.
//!
//! Runtime failures are `Object::Error` values which propagate through
//! evaluation; the `Error` type of this module covers only fatal conditions
//! in the `quote`/`unquote` machinery.

use crate::ast;
use crate::object::{self, Builtin, Environment, Env, Object};
use crate::token::Token;

use std::collections::BTreeMap;
use std::error;
use std::fmt;
use std::rc::Rc;
use std::result;

/// Evaluates an `ast::Node` and produces an `object::Object`. `tokens` must
/// be the stream the node was parsed from.
pub fn eval(node: ast::Node, env: &Env, tokens: &[Token]) -> Result<Object> {
    match node {
        ast::Node::Program(prog) => {
            // The program's value is its last statement's result, with a
            // top-level return envelope unwrapped.
            let mut results = eval_program(prog, env, tokens)?;
            match results.pop() {
                Some(Object::ReturnValue(value)) => Ok(*value),
                Some(result) => Ok(result),
                None => Ok(Object::Unit),
            }
        }
        ast::Node::Statement(stmt) => eval_statement(stmt, env, tokens),
        ast::Node::Expression(expr) => eval_expression(expr, env, tokens),
    }
}

/// Evaluates each top-level statement of a program, collecting one result
/// per statement. Evaluation halts after the first `ReturnValue` or `Error`
/// result, which remains the final element of the list.
pub fn eval_program(prog: ast::Program, env: &Env, tokens: &[Token]) -> Result<Vec<Object>> {
    let mut results = Vec::with_capacity(prog.statements.len());

    for stmt in prog.statements {
        let result = eval_statement(stmt, env, tokens)?;
        let halt = matches!(result, Object::ReturnValue(_) | Object::Error(_));

        results.push(result);
        if halt {
            break;
        }
    }

    Ok(results)
}

/// Evaluates a single statement and returns the result.
fn eval_statement(stmt: ast::Statement, env: &Env, tokens: &[Token]) -> Result<Object> {
    match stmt {
        ast::Statement::Block(block) => eval_block_statement(block, env, tokens),
        ast::Statement::Expression(stmt) => eval_expression(stmt.expression, env, tokens),
        ast::Statement::Let(stmt) => {
            let name = tokens[stmt.token].literal();

            let value = eval_expression(stmt.value, env, tokens)?;
            if let Object::Error(_) = value {
                return Ok(value);
            }

            // Re-binding a name within the same scope is an error; shadowing
            // an outer scope's binding is fine.
            if env.borrow().defines(&name) {
                return Ok(Object::Error(format!("Symbol already defined: {}", name)));
            }

            env.borrow_mut().set(name, value);
            Ok(Object::Unit)
        }
        ast::Statement::Return(stmt) => {
            let value = match stmt.value {
                Some(expr) => eval_expression(expr, env, tokens)?,
                None => Object::Unit,
            };

            if let Object::Error(_) = value {
                return Ok(value);
            }

            Ok(Object::ReturnValue(Box::new(value)))
        }
    }
}

/// Evaluates a block statement and returns the result. An early `return` or
/// error stops the block, and the envelope is passed along unopened so the
/// enclosing call or program loop can handle it.
fn eval_block_statement(block: ast::BlockStatement, env: &Env, tokens: &[Token]) -> Result<Object> {
    if block.statements.is_empty() {
        return Ok(Object::ReturnValue(Box::new(Object::Unit)));
    }

    let mut result = Object::Unit;
    for stmt in block.statements {
        result = eval_statement(stmt, env, tokens)?;

        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return Ok(result);
        }
    }

    Ok(result)
}

/// Evaluates a single expression and returns the result.
fn eval_expression(expr: ast::Expression, env: &Env, tokens: &[Token]) -> Result<Object> {
    match expr {
        ast::Expression::Integer(idx) => match &tokens[idx] {
            Token::Integer(int) => Ok(Object::Integer(int.value)),
            token => panic!("integer literal anchored to non-integer token: {}", token),
        },
        ast::Expression::String(idx) => Ok(Object::String(tokens[idx].literal())),
        ast::Expression::Boolean(idx) => Ok(Object::Boolean(tokens[idx] == Token::True)),

        ast::Expression::IntegerResult(value) => Ok(Object::Integer(value)),
        ast::Expression::StringResult(value) => Ok(Object::String(value)),
        ast::Expression::BooleanResult(value) => Ok(Object::Boolean(value)),

        ast::Expression::Identifier(idx) => {
            Ok(eval_identifier(&tokens[idx].literal(), env))
        }

        ast::Expression::Prefix(expr) => {
            let right = eval_expression(*expr.right, env, tokens)?;
            if let Object::Error(_) = right {
                return Ok(right);
            }

            Ok(eval_prefix_expression(&expr.operator, right))
        }
        ast::Expression::Infix(expr) => {
            let left = eval_expression(*expr.left, env, tokens)?;
            if let Object::Error(_) = left {
                return Ok(left);
            }

            let right = eval_expression(*expr.right, env, tokens)?;
            if let Object::Error(_) = right {
                return Ok(right);
            }

            Ok(eval_infix_expression(&expr.operator, left, right))
        }

        ast::Expression::If(expr) => eval_if_expression(expr, env, tokens),

        ast::Expression::Function(func) => Ok(Object::Function(object::Function {
            parameters: func.parameters,
            body: func.body,
            env: Rc::clone(env),
        })),
        ast::Expression::Macro(m) => Ok(Object::Macro(object::Macro {
            parameters: m.parameters,
            body: m.body,
            env: Rc::clone(env),
        })),

        ast::Expression::Call(call) => eval_call_expression(call, env, tokens),

        ast::Expression::Array(array) => {
            match eval_expressions(array.elements, env, tokens)? {
                ExpressionList::Error(err) => Ok(err),
                ExpressionList::Objects(elements) => Ok(Object::Array(elements)),
            }
        }
        ast::Expression::Hash(hash) => eval_hash_literal(hash, env, tokens),

        ast::Expression::Index(expr) => {
            let left = eval_expression(*expr.left, env, tokens)?;
            if let Object::Error(_) = left {
                return Ok(left);
            }

            let index = eval_expression(*expr.index, env, tokens)?;
            if let Object::Error(_) = index {
                return Ok(index);
            }

            Ok(eval_index_expression(left, index))
        }
    }
}

/// Evaluates an object bound to an identifier and returns the result. The
/// environment chain is consulted before the built-in table.
fn eval_identifier(name: &str, env: &Env) -> Object {
    if let Some(obj) = env.borrow().get(name) {
        return obj;
    }

    match Builtin::lookup(name) {
        Some(b) => Object::Builtin(b),
        None => Object::Error(format!("Unknown symbol: {}", name)),
    }
}

/// Evaluates a prefix expression to produce an Object.
fn eval_prefix_expression(operator: &Token, right: Object) -> Object {
    match (operator, right) {
        // Negative numbers.
        (Token::Minus, Object::Integer(i)) => Object::Integer(-i),
        // Logical negation, on booleans only.
        (Token::Bang, Object::Boolean(b)) => Object::Boolean(!b),

        (operator, right) => Object::Error(format!(
            "Unknown operator: {}{}",
            operator.literal(),
            right.type_name()
        )),
    }
}

/// Evaluates an infix expression to produce an Object.
fn eval_infix_expression(operator: &Token, left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => match operator {
            Token::Plus => Object::Integer(l + r),
            Token::Minus => Object::Integer(l - r),
            Token::Asterisk => Object::Integer(l * r),
            Token::Slash => Object::Integer(l / r),
            Token::Equal => Object::Boolean(l == r),
            Token::NotEqual => Object::Boolean(l != r),
            Token::LessThan => Object::Boolean(l < r),
            Token::GreaterThan => Object::Boolean(l > r),

            _ => Object::Error(format!(
                "Unknown operator: INTEGER {} INTEGER",
                operator.literal()
            )),
        },

        (Object::Boolean(l), Object::Boolean(r)) => match operator {
            Token::Equal => Object::Boolean(l == r),
            Token::NotEqual => Object::Boolean(l != r),
            Token::LessThan => Object::Boolean(l < r),
            Token::GreaterThan => Object::Boolean(l > r),

            _ => Object::Error(format!(
                "Unknown operator: BOOLEAN {} BOOLEAN",
                operator.literal()
            )),
        },

        (Object::String(l), Object::String(r)) => match operator {
            Token::Plus => Object::String(l + &r),

            _ => Object::Error(format!(
                "Unknown operator: STRING {} STRING",
                operator.literal()
            )),
        },

        (left, right) => Object::Error(format!(
            "Type mismatch in expression: {} {} {}",
            left.type_name(),
            operator.literal(),
            right.type_name()
        )),
    }
}

/// Evaluates an if/else expression to produce an Object.
fn eval_if_expression(expr: ast::IfExpression, env: &Env, tokens: &[Token]) -> Result<Object> {
    let condition = eval_expression(*expr.condition, env, tokens)?;

    if is_truthy(&condition) {
        eval_statement(ast::Statement::Block(expr.consequence), env, tokens)
    } else if let Some(alt) = expr.alternative {
        eval_statement(ast::Statement::Block(alt), env, tokens)
    } else {
        Ok(Object::Unit)
    }
}

/// Determines if an object is truthy in Monkey: `true`, every integer
/// (zero included), and every string. `false`, unit, and errors are falsy.
fn is_truthy(obj: &Object) -> bool {
    match obj {
        Object::Boolean(b) => *b,
        Object::Integer(_) | Object::String(_) => true,
        Object::ReturnValue(value) => is_truthy(value),

        _ => false,
    }
}

/// Evaluates a hash literal, hashing each key as it is produced.
fn eval_hash_literal(hash: ast::HashLiteral, env: &Env, tokens: &[Token]) -> Result<Object> {
    let mut pairs = BTreeMap::new();

    for (k, v) in hash.pairs {
        let key = eval_expression(k, env, tokens)?;
        if let Object::Error(_) = key {
            return Ok(key);
        }

        let hashed = match key.hash_key() {
            Some(hashed) => hashed,
            None => return Ok(Object::Error("Unusable hash key".to_string())),
        };

        let value = eval_expression(v, env, tokens)?;
        if let Object::Error(_) = value {
            return Ok(value);
        }

        pairs.insert(hashed, (key, value));
    }

    Ok(Object::Hash(pairs))
}

/// Evaluates an index expression on an array or hash.
fn eval_index_expression(left: Object, index: Object) -> Object {
    match (left, index) {
        // Array with numeric index; out of range produces unit.
        (Object::Array(elements), Object::Integer(i)) => {
            if i >= 0 && (i as usize) < elements.len() {
                elements[i as usize].clone()
            } else {
                Object::Unit
            }
        }

        // Hash with a hashable index; a miss produces unit.
        (Object::Hash(pairs), index) => match index.hash_key() {
            Some(hashed) => match pairs.get(&hashed) {
                Some((_, value)) => value.clone(),
                None => Object::Unit,
            },
            None => Object::Error(format!(
                "Index operator not supported: {}",
                index.type_name()
            )),
        },

        (left, _) => Object::Error(format!(
            "Index operator not supported: {}",
            left.type_name()
        )),
    }
}

/// Evaluates a call expression: built-ins dispatch through their table,
/// `quote` rewrites its unevaluated argument, and functions run their body
/// in a child of their captured environment.
fn eval_call_expression(call: ast::CallExpression, env: &Env, tokens: &[Token]) -> Result<Object> {
    let callee = eval_expression(*call.function, env, tokens)?;
    if let Object::Error(_) = callee {
        return Ok(callee);
    }

    // quote does not evaluate its argument; it rewrites it instead.
    if callee == Object::Builtin(Builtin::Quote) {
        return eval_quote(call.arguments, env, tokens);
    }

    let args = match eval_expressions(call.arguments, env, tokens)? {
        ExpressionList::Error(err) => return Ok(err),
        ExpressionList::Objects(args) => args,
    };

    match callee {
        Object::Builtin(builtin) => Ok(builtin.apply(&args, tokens)),
        Object::Function(function) => apply_function(function, args, tokens),

        other => Ok(Object::Error(format!(
            "can only apply functions with function or builtin object, not {}",
            other.type_name()
        ))),
    }
}

// The outcome of evaluating a list of expressions: either every value, or
// the first error encountered.
enum ExpressionList {
    Objects(Vec<Object>),
    Error(Object),
}

// Evaluates several expressions left to right, stopping at the first error.
fn eval_expressions(
    exprs: Vec<ast::Expression>,
    env: &Env,
    tokens: &[Token],
) -> Result<ExpressionList> {
    let mut results = Vec::with_capacity(exprs.len());

    for expr in exprs {
        let obj = eval_expression(expr, env, tokens)?;
        if let Object::Error(_) = obj {
            return Ok(ExpressionList::Error(obj));
        }

        results.push(obj);
    }

    Ok(ExpressionList::Objects(results))
}

/// Applies a function with arguments to produce a result object.
fn apply_function(function: object::Function, args: Vec<Object>, tokens: &[Token]) -> Result<Object> {
    // Bind function arguments in an environment enclosed by the function's
    // captured environment. Missing arguments bind to unit; extra arguments
    // are ignored.
    let env = Environment::new_enclosed(Rc::clone(&function.env));

    let mut args = args.into_iter();
    for &param in &function.parameters {
        let name = tokens[param].literal();
        env.borrow_mut().set(name, args.next().unwrap_or(Object::Unit));
    }

    let evaluated = eval_statement(ast::Statement::Block(function.body), &env, tokens)?;

    // If the function had an early return, unwrap one level and stop.
    if let Object::ReturnValue(value) = evaluated {
        Ok(*value)
    } else {
        Ok(evaluated)
    }
}

/// Evaluates `quote(...)`: the single argument is not evaluated, but every
/// `unquote(...)` call inside it is replaced with the syntax tree form of
/// its evaluated argument.
fn eval_quote(mut arguments: Vec<ast::Expression>, env: &Env, tokens: &[Token]) -> Result<Object> {
    if arguments.len() != 1 {
        return Ok(object::wrong_arguments(arguments.len(), 1));
    }

    let node = process_unquotes(arguments.swap_remove(0), env, tokens)?;
    Ok(Object::Quote(node))
}

// Replaces every unquote call in the expression, bottom-up, with the syntax
// tree form of its evaluated argument.
fn process_unquotes(expr: ast::Expression, env: &Env, tokens: &[Token]) -> Result<ast::Expression> {
    ast::modify_expression(expr, &mut |node| {
        let mut call = match node {
            ast::Expression::Call(call) if is_unquote_call(&call, tokens) => call,
            node => return Ok(node),
        };

        if call.arguments.len() != 1 {
            return Ok(ast::Expression::Call(call));
        }

        let value = eval_expression(call.arguments.swap_remove(0), env, tokens)?;
        expression_from_object(value, tokens)
    })
}

// Determines if a call expression invokes `unquote`.
fn is_unquote_call(call: &ast::CallExpression, tokens: &[Token]) -> bool {
    match call.function.as_ref() {
        ast::Expression::Identifier(idx) => tokens[*idx].literal() == "unquote",
        _ => false,
    }
}

/// Converts an evaluated object back into a syntax tree node so it can be
/// spliced into a quoted expression.
fn expression_from_object(obj: Object, tokens: &[Token]) -> Result<ast::Expression> {
    match obj {
        Object::Integer(value) => Ok(ast::Expression::IntegerResult(value)),
        Object::String(value) => Ok(ast::Expression::StringResult(value)),
        Object::Boolean(value) => Ok(ast::Expression::BooleanResult(value)),

        // Splicing a quote grafts its subtree in directly.
        Object::Quote(node) => Ok(node),

        other => Err(Error::NotRepresentable(other.inspect(tokens))),
    }
}

/// A Result type specialized use with for an Error.
pub type Result<T> = result::Result<T, Error>;

/// Specifies the different classes of errors which may occur.
#[derive(Debug, PartialEq)]
pub enum Error {
    NotRepresentable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotRepresentable(value) => {
                write!(f, "value cannot be converted back into syntax: {}", value)
            }
        }
    }
}

impl error::Error for Error {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}
