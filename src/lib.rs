//! A Rust implementation of the Monkey programming language from
//! <https://interpreterbook.com/>, including the `quote`/`unquote` macro
//! system.

pub mod ast;
pub mod evaluator;
pub mod expander;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

use crate::object::{Environment, Object};
use crate::token::Token;

use std::error;
use std::fmt;
use std::result;

/// The outcome of running a Monkey program: one result per evaluated
/// top-level statement, plus any accumulated parse errors.
#[derive(Debug)]
pub struct Outcome {
    /// One result per evaluated top-level statement.
    pub results: Vec<Object>,
    /// Parse errors accumulated while reading the program.
    pub errors: Vec<String>,
    /// The lexed tokens, needed to render results with `Object::inspect`.
    pub tokens: Vec<Token>,
}

/// Runs a Monkey program end-to-end: lex, parse, collect and expand macros,
/// then evaluate each top-level statement.
///
/// Parse errors do not halt `run`, but a program with parse errors is not
/// evaluated. Lexing failures and fatal macro expansion conditions surface
/// as this module's `Error`.
pub fn run(input: &str) -> Result<Outcome> {
    let tokens = lexer::Lexer::new(input).lex().map_err(Error::Lexer)?;

    let (program, errors) = parser::Parser::new(&tokens).parse();
    if !errors.is_empty() {
        return Ok(Outcome {
            results: vec![],
            errors,
            tokens,
        });
    }

    let macro_env = Environment::new();
    let program = expander::define_macros(program, &macro_env, &tokens);
    let program = expander::expand_macros(program, &macro_env, &tokens).map_err(Error::Expander)?;

    let env = Environment::new();
    let results = evaluator::eval_program(program, &env, &tokens).map_err(Error::Evaluator)?;

    Ok(Outcome {
        results,
        errors,
        tokens,
    })
}

/// A Result type specialized use with for an Error.
pub type Result<T> = result::Result<T, Error>;

/// Specifies the different classes of errors which may occur.
#[derive(Debug)]
pub enum Error {
    Lexer(lexer::Error),
    Expander(expander::Error),
    Evaluator(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Lexer(err) => write!(f, "lexer error: {}", err),
            Error::Expander(err) => write!(f, "macro expansion error: {}", err),
            Error::Evaluator(err) => write!(f, "evaluation error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn cause(&self) -> Option<&dyn error::Error> {
        match self {
            Error::Lexer(err) => Some(err),
            Error::Expander(err) => Some(err),
            Error::Evaluator(err) => Some(err),
        }
    }
}
