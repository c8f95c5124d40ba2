//! Macro definition collection and expansion for the Monkey programming
//! language from <https://interpreterbook.com/>.
//!
//! Runs in two ordered phases before evaluation: top-level macro definitions
//! are collected out of the program, then every call of a defined macro is
//! replaced by the syntax tree its body produces.

use crate::ast;
use crate::evaluator;
use crate::object::{self, Environment, Env, Object};
use crate::token::Token;

use std::error;
use std::fmt;
use std::rc::Rc;
use std::result;

/// Removes every top-level `let <name> = macro(...)` statement from the
/// program, recording the macro under `name` in the macro environment. The
/// returned program contains no macro definitions.
pub fn define_macros(prog: ast::Program, macro_env: &Env, tokens: &[Token]) -> ast::Program {
    let mut statements = Vec::with_capacity(prog.statements.len());

    for stmt in prog.statements {
        match stmt {
            ast::Statement::Let(stmt) => match stmt.value {
                ast::Expression::Macro(m) => {
                    let name = tokens[stmt.token].literal();

                    macro_env.borrow_mut().set(
                        name,
                        Object::Macro(object::Macro {
                            parameters: m.parameters,
                            body: m.body,
                            env: Rc::clone(macro_env),
                        }),
                    );
                }
                value => statements.push(ast::Statement::Let(ast::LetStatement {
                    token: stmt.token,
                    value,
                })),
            },
            stmt => statements.push(stmt),
        }
    }

    ast::Program { statements }
}

/// Replaces every call of a defined macro, bottom-up, with the syntax tree
/// produced by evaluating the macro body over the quoted call arguments.
pub fn expand_macros(prog: ast::Program, macro_env: &Env, tokens: &[Token]) -> Result<ast::Program> {
    ast::modify_program(prog, &mut |node| {
        let call = match node {
            ast::Expression::Call(call) => call,
            node => return Ok(node),
        };

        let name = match call.function.as_ref() {
            ast::Expression::Identifier(idx) => tokens[*idx].literal(),
            _ => return Ok(ast::Expression::Call(call)),
        };

        let m = match macro_env.borrow().get(&name) {
            Some(Object::Macro(m)) => m,
            _ => return Ok(ast::Expression::Call(call)),
        };

        // Each parameter receives its argument as an unevaluated, quoted
        // syntax tree in a scope enclosed by the macro's environment.
        let env = Environment::new_enclosed(Rc::clone(&m.env));
        for (&param, arg) in m.parameters.iter().zip(call.arguments) {
            env.borrow_mut()
                .set(tokens[param].literal(), Object::Quote(arg));
        }

        let expanded =
            evaluator::eval(ast::Node::Statement(ast::Statement::Block(m.body)), &env, tokens)?;

        match expanded {
            Object::Quote(node) => Ok(node),
            other => Err(Error::NonQuoteResult(other.inspect(tokens))),
        }
    })
}

/// A Result type specialized use with for an Error.
pub type Result<T> = result::Result<T, Error>;

/// Specifies the different classes of errors which may occur.
#[derive(Debug, PartialEq)]
pub enum Error {
    Evaluator(evaluator::Error),
    NonQuoteResult(String),
}

impl From<evaluator::Error> for Error {
    fn from(err: evaluator::Error) -> Self {
        Error::Evaluator(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Evaluator(err) => err.fmt(f),
            Error::NonQuoteResult(value) => write!(
                f,
                "macro body must produce a quoted expression, but produced: {}",
                value
            ),
        }
    }
}

impl error::Error for Error {
    fn cause(&self) -> Option<&dyn error::Error> {
        match self {
            Error::Evaluator(err) => Some(err),
            _ => None,
        }
    }
}
