//! A parser for the Monkey programming language from <https://interpreterbook.com/>.
//!
//! Parsing is total: malformed constructs record an error string and the
//! parser advances past them, so a single pass reports every problem it can
//! find. Expressions are parsed with Pratt-style per-token prefix and infix
//! rule lookups.

use crate::ast;
use crate::token::Token;

/// Parses `Token`s and produces an `ast::Program` for the Monkey programming
/// language, accumulating parse errors along the way.
pub struct Parser<'a> {
    tokens: &'a [Token],

    // Index of the current token in the tokens slice.
    position: usize,

    errors: Vec<String>,
}

/// The binding strength of each operator, lowest to highest. `Ternary` is
/// reserved for a future `?:` operator and is the starting strength for
/// statement-position expressions.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Ternary,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

// A prefix rule produces an expression from the current token onward.
type PrefixRule<'a> = fn(&mut Parser<'a>) -> Option<ast::Expression>;

// An infix rule extends an already-parsed left operand.
type InfixRule<'a> = fn(&mut Parser<'a>, ast::Expression) -> Option<ast::Expression>;

// The possible outcomes of looking up a token in the infix rule table.
enum InfixLookup<'a> {
    // The token continues the expression with the given rule and strength.
    Rule(InfixRule<'a>, Precedence),
    // The token closes the expression; the driver loop stops quietly.
    Terminator,
    // The token can never appear in infix position.
    Invalid,
}

impl<'a> Parser<'a> {
    /// Creates a new `Parser` by accepting a slice of lexed `Token`s.
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            position: 0,
            errors: vec![],
        }
    }

    /// Parses the input `Token` stream and produces an `ast::Program` along
    /// with any parse errors encountered.
    pub fn parse(mut self) -> (ast::Program, Vec<String>) {
        let mut prog = ast::Program::with_capacity(self.tokens.len() / 2 + 1);

        while !self.current_is(&Token::Eof) {
            if let Some(stmt) = self.parse_statement() {
                prog.statements.push(stmt);
            }

            self.next_token();
        }

        (prog, self.errors)
    }

    // Returns the current token, or Eof once the stream is exhausted.
    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&Token::Eof)
    }

    // Returns the token after the current one, or Eof.
    fn peek(&self) -> &Token {
        self.tokens.get(self.position + 1).unwrap_or(&Token::Eof)
    }

    /// Looks at the current `Token` and determines if it is the same as `tok`.
    fn current_is(&self, tok: &Token) -> bool {
        self.current() == tok
    }

    /// Peeks at the next `Token` and determines if it is the same as `tok`.
    fn peek_is(&self, tok: &Token) -> bool {
        self.peek() == tok
    }

    /// Peeks at the next `Token` and expects it to be the same as `tok`,
    /// advancing onto it if so. If not, a parse error is recorded.
    fn expect_peek(&mut self, tok: &Token) -> bool {
        if self.peek_is(tok) {
            self.next_token();
            true
        } else {
            self.errors.push(format!(
                "Expected next token to be '{}'; got {} instead",
                tok.literal(),
                self.peek()
            ));
            false
        }
    }

    /// Advances the parser once in its `Token`s slice.
    fn next_token(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    // Error recovery: advances to the next semicolon so parsing can continue
    // with the following statement.
    fn skip_to_semicolon(&mut self) {
        while !self.current_is(&Token::Semicolon) && !self.current_is(&Token::Eof) {
            self.next_token();
        }
    }

    /// Parses a single statement, or produces `None` for empty statements
    /// and malformed constructs.
    fn parse_statement(&mut self) -> Option<ast::Statement> {
        match self.current() {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            Token::Semicolon => None,

            _ => self.parse_expression_statement(),
        }
    }

    /// Parses a let statement: `let <identifier> = <expression>[;]`.
    fn parse_let_statement(&mut self) -> Option<ast::Statement> {
        if self.peek_is(&Token::Eof) {
            self.errors
                .push("Not enough tokens for Let statement".to_string());
            return None;
        }

        if let Token::Identifier(_) = self.peek() {
            self.next_token();
        } else {
            self.errors.push(format!(
                "Expected next token to be 'identifier'; got {} instead",
                self.peek()
            ));
            self.skip_to_semicolon();
            return None;
        }

        // The let statement is anchored to the identifier being bound.
        let token = self.position;

        if self.peek_is(&Token::Eof) {
            self.errors
                .push("Not enough tokens for Let statement".to_string());
            return None;
        }

        if !self.expect_peek(&Token::Assign) {
            self.skip_to_semicolon();
            return None;
        }

        self.next_token();
        let value = match self.parse_expression(Precedence::Ternary) {
            Some(value) => value,
            None => {
                self.skip_to_semicolon();
                return None;
            }
        };

        if self.peek_is(&Token::Semicolon) {
            self.next_token();
        }

        Some(ast::Statement::Let(ast::LetStatement { token, value }))
    }

    /// Parses a return statement with an optional value.
    fn parse_return_statement(&mut self) -> Option<ast::Statement> {
        let token = self.position;

        // A semicolon right after `return` means there is no value.
        if self.peek_is(&Token::Semicolon) {
            self.next_token();
            return Some(ast::Statement::Return(ast::ReturnStatement {
                token,
                value: None,
            }));
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Ternary)?;

        if self.peek_is(&Token::Semicolon) {
            self.next_token();
        }

        Some(ast::Statement::Return(ast::ReturnStatement {
            token,
            value: Some(value),
        }))
    }

    /// Parses a bare expression as a statement, noting whether a trailing
    /// semicolon followed it.
    fn parse_expression_statement(&mut self) -> Option<ast::Statement> {
        let token = self.position;
        let expression = self.parse_expression(Precedence::Ternary)?;

        let semicolon = if self.peek_is(&Token::Semicolon) {
            self.next_token();
            true
        } else {
            false
        };

        Some(ast::Statement::Expression(ast::ExpressionStatement {
            token,
            expression,
            semicolon,
        }))
    }

    /// The Pratt driver: applies the prefix rule for the current token, then
    /// extends the result with infix rules while the next token binds more
    /// strongly than `precedence`.
    fn parse_expression(&mut self, precedence: Precedence) -> Option<ast::Expression> {
        let prefix = match Self::prefix_rule(self.current()) {
            Some(rule) => rule,
            None => {
                self.errors.push(format!(
                    "Expected expression, but got {} instead",
                    self.current()
                ));
                return None;
            }
        };

        let mut left = prefix(self)?;

        loop {
            match Self::infix_rule(self.peek()) {
                InfixLookup::Rule(rule, peek_precedence) if precedence < peek_precedence => {
                    self.next_token();
                    left = rule(self, left)?;
                }
                InfixLookup::Rule(..) | InfixLookup::Terminator => break,
                InfixLookup::Invalid => {
                    self.errors.push(format!(
                        "Invalid token {} for infix expression",
                        self.peek()
                    ));
                    break;
                }
            }
        }

        Some(left)
    }

    // The prefix rule table: maps a token to the rule that can begin an
    // expression with it.
    fn prefix_rule(token: &Token) -> Option<PrefixRule<'a>> {
        match token {
            Token::Identifier(_) => Some(Self::parse_identifier),
            Token::Integer(_) => Some(Self::parse_integer_literal),
            Token::String(_) => Some(Self::parse_string_literal),
            Token::True | Token::False => Some(Self::parse_boolean_literal),
            Token::Minus | Token::Bang => Some(Self::parse_prefix_expression),
            Token::LeftParen => Some(Self::parse_grouped_expression),
            Token::If => Some(Self::parse_if_expression),
            Token::Function => Some(Self::parse_function_literal),
            Token::Macro => Some(Self::parse_macro_literal),
            Token::LeftBracket => Some(Self::parse_array_literal),
            Token::LeftBrace => Some(Self::parse_hash_literal),

            _ => None,
        }
    }

    // The infix rule table: maps a token to the rule that can extend an
    // expression with it, or marks it as a terminator or as invalid.
    fn infix_rule(token: &Token) -> InfixLookup<'a> {
        match token {
            Token::Equal | Token::NotEqual => {
                InfixLookup::Rule(Self::parse_infix_expression, Precedence::Equals)
            }
            Token::LessThan | Token::GreaterThan => {
                InfixLookup::Rule(Self::parse_infix_expression, Precedence::LessGreater)
            }
            Token::Plus | Token::Minus => {
                InfixLookup::Rule(Self::parse_infix_expression, Precedence::Sum)
            }
            Token::Asterisk | Token::Slash => {
                InfixLookup::Rule(Self::parse_infix_expression, Precedence::Product)
            }
            Token::LeftParen => InfixLookup::Rule(Self::parse_call_expression, Precedence::Call),
            Token::LeftBracket => {
                InfixLookup::Rule(Self::parse_index_expression, Precedence::Index)
            }

            Token::RightParen
            | Token::RightBracket
            | Token::RightBrace
            | Token::Comma
            | Token::Colon
            | Token::Semicolon
            | Token::Eof => InfixLookup::Terminator,

            _ => InfixLookup::Invalid,
        }
    }

    fn parse_identifier(&mut self) -> Option<ast::Expression> {
        Some(ast::Expression::Identifier(self.position))
    }

    fn parse_integer_literal(&mut self) -> Option<ast::Expression> {
        Some(ast::Expression::Integer(self.position))
    }

    fn parse_string_literal(&mut self) -> Option<ast::Expression> {
        Some(ast::Expression::String(self.position))
    }

    fn parse_boolean_literal(&mut self) -> Option<ast::Expression> {
        Some(ast::Expression::Boolean(self.position))
    }

    /// Parses a prefix operator applied to the expression that follows it.
    fn parse_prefix_expression(&mut self) -> Option<ast::Expression> {
        let token = self.position;
        let operator = self.current().clone();

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(ast::Expression::Prefix(ast::PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    /// Parses an infix operator and its right operand, extending `left`.
    fn parse_infix_expression(&mut self, left: ast::Expression) -> Option<ast::Expression> {
        let token = self.position;
        let operator = self.current().clone();

        let precedence = match Self::infix_rule(&operator) {
            InfixLookup::Rule(_, precedence) => precedence,
            _ => Precedence::Lowest,
        };

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(ast::Expression::Infix(ast::InfixExpression {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    /// Parses a parenthesized expression.
    fn parse_grouped_expression(&mut self) -> Option<ast::Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(&Token::RightParen) {
            return None;
        }

        Some(expr)
    }

    /// Parses `if (<condition>) { <block> }` with an optional
    /// `else { <block> }`.
    fn parse_if_expression(&mut self) -> Option<ast::Expression> {
        let token = self.position;

        if !self.expect_peek(&Token::LeftParen) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(&Token::RightParen) {
            return None;
        }
        if !self.expect_peek(&Token::LeftBrace) {
            return None;
        }

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(&Token::Else) {
            self.next_token();

            if !self.expect_peek(&Token::LeftBrace) {
                return None;
            }

            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(ast::Expression::If(ast::IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    /// Parses statements until the closing brace of a block. The cursor must
    /// be on the opening brace; it ends on the closing brace.
    fn parse_block_statement(&mut self) -> ast::BlockStatement {
        let token = self.position;
        self.next_token();

        let mut statements = vec![];
        while !self.current_is(&Token::RightBrace) && !self.current_is(&Token::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }

            self.next_token();
        }

        ast::BlockStatement { token, statements }
    }

    /// Parses `fn(<parameters>) { <block> }`.
    fn parse_function_literal(&mut self) -> Option<ast::Expression> {
        let token = self.position;

        if !self.expect_peek(&Token::LeftParen) {
            return None;
        }

        let parameters = self.parse_parameters()?;

        if !self.expect_peek(&Token::LeftBrace) {
            return None;
        }

        Some(ast::Expression::Function(ast::FunctionLiteral {
            token,
            parameters,
            body: self.parse_block_statement(),
        }))
    }

    /// Parses `macro(<parameters>) { <block> }`.
    fn parse_macro_literal(&mut self) -> Option<ast::Expression> {
        let token = self.position;

        if !self.expect_peek(&Token::LeftParen) {
            return None;
        }

        let parameters = self.parse_parameters()?;

        if !self.expect_peek(&Token::LeftBrace) {
            return None;
        }

        Some(ast::Expression::Macro(ast::MacroLiteral {
            token,
            parameters,
            body: self.parse_block_statement(),
        }))
    }

    // Parses a possibly empty, comma-separated list of identifier tokens,
    // consuming the closing parenthesis.
    fn parse_parameters(&mut self) -> Option<Vec<usize>> {
        let mut parameters = vec![];

        if self.peek_is(&Token::RightParen) {
            self.next_token();
            return Some(parameters);
        }

        loop {
            if let Token::Identifier(_) = self.peek() {
                self.next_token();
            } else {
                self.errors.push(format!(
                    "Expected next token to be 'identifier'; got {} instead",
                    self.peek()
                ));
                return None;
            }

            parameters.push(self.position);

            if self.peek_is(&Token::Comma) {
                self.next_token();
            } else {
                break;
            }
        }

        if !self.expect_peek(&Token::RightParen) {
            return None;
        }

        Some(parameters)
    }

    /// Parses a call of an already-parsed callee expression.
    fn parse_call_expression(&mut self, function: ast::Expression) -> Option<ast::Expression> {
        let token = self.position;
        let arguments = self.parse_expression_list(&Token::RightParen)?;

        Some(ast::Expression::Call(ast::CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    /// Parses `[<elements>]`.
    fn parse_array_literal(&mut self) -> Option<ast::Expression> {
        let token = self.position;
        let elements = self.parse_expression_list(&Token::RightBracket)?;

        Some(ast::Expression::Array(ast::ArrayLiteral { token, elements }))
    }

    // Parses a possibly empty, comma-separated expression list terminated by
    // `end`, consuming the terminator.
    fn parse_expression_list(&mut self, end: &Token) -> Option<Vec<ast::Expression>> {
        let mut list = vec![];

        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        loop {
            if self.peek_is(&Token::Eof) {
                self.errors
                    .push("Incomplete argument list for function call".to_string());
                return None;
            }

            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);

            if self.peek_is(&Token::Comma) {
                self.next_token();
            } else {
                break;
            }
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    /// Parses `{<key>: <value>, ...}`. A malformed pair aborts the whole
    /// literal.
    fn parse_hash_literal(&mut self) -> Option<ast::Expression> {
        let token = self.position;
        let mut pairs = vec![];

        while !self.peek_is(&Token::RightBrace) {
            if self.peek_is(&Token::Eof) {
                self.errors.push(format!(
                    "Expected next token to be '{}'; got {} instead",
                    Token::RightBrace.literal(),
                    self.peek()
                ));
                return None;
            }

            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(&Token::Colon) {
                return None;
            }

            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if !self.peek_is(&Token::RightBrace) && !self.expect_peek(&Token::Comma) {
                return None;
            }
        }

        self.next_token();

        Some(ast::Expression::Hash(ast::HashLiteral { token, pairs }))
    }

    /// Parses an index operation on an already-parsed left operand.
    fn parse_index_expression(&mut self, left: ast::Expression) -> Option<ast::Expression> {
        let token = self.position;

        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(&Token::RightBracket) {
            return None;
        }

        Some(ast::Expression::Index(ast::IndexExpression {
            token,
            left: Box::new(left),
            index: Box::new(index),
        }))
    }
}
