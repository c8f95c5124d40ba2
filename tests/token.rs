extern crate monkey_lang;

use monkey_lang::token::{Integer, Radix, Token};

#[test]
fn token_display() {
    let tests = vec![
        (Token::Illegal('x'), "illegal(x)"),
        (Token::Eof, "EOF"),
        (
            Token::Identifier("string".to_string()),
            "identifier(string)",
        ),
        (
            Token::Integer(Integer {
                radix: Radix::Decimal,
                value: 101,
            }),
            "101",
        ),
        (
            Token::Integer(Integer {
                radix: Radix::Binary,
                value: 0b101,
            }),
            "0b101",
        ),
        (
            Token::Integer(Integer {
                radix: Radix::Octal,
                value: 0o101,
            }),
            "0o101",
        ),
        (
            Token::Integer(Integer {
                radix: Radix::Hexadecimal,
                value: 0x101,
            }),
            "0x101",
        ),
        (Token::String("foo bar".to_string()), "\"foo bar\""),
        (Token::Assign, "="),
        (Token::Plus, "+"),
        (Token::Minus, "-"),
        (Token::Bang, "!"),
        (Token::Asterisk, "*"),
        (Token::Slash, "/"),
        (Token::Equal, "=="),
        (Token::NotEqual, "!="),
        (Token::LessThan, "<"),
        (Token::GreaterThan, ">"),
        (Token::Comma, ","),
        (Token::Colon, ":"),
        (Token::Semicolon, ";"),
        (Token::LeftParen, "("),
        (Token::RightParen, ")"),
        (Token::LeftBrace, "{"),
        (Token::RightBrace, "}"),
        (Token::LeftBracket, "["),
        (Token::RightBracket, "]"),
        (Token::Function, "fn"),
        (Token::Let, "let"),
        (Token::True, "true"),
        (Token::False, "false"),
        (Token::If, "if"),
        (Token::Else, "else"),
        (Token::Return, "return"),
        (Token::Macro, "macro"),
    ];

    for test in tests {
        let (token, string) = test;

        assert_eq!(string, format!("{}", token));
    }
}

#[test]
fn token_literal() {
    // The literal form is the canonical source spelling, used whenever a
    // syntax tree is rendered back into text.
    let tests = vec![
        (Token::Eof, ""),
        (Token::Identifier("add".to_string()), "add"),
        (
            Token::Integer(Integer {
                radix: Radix::Decimal,
                value: 42,
            }),
            "42",
        ),
        (
            Token::Integer(Integer {
                radix: Radix::Hexadecimal,
                value: 0xff,
            }),
            "0xff",
        ),
        (Token::String("foo bar".to_string()), "foo bar"),
        (Token::Assign, "="),
        (Token::Equal, "=="),
        (Token::LeftBracket, "["),
        (Token::Function, "fn"),
        (Token::Macro, "macro"),
    ];

    for test in tests {
        let (token, literal) = test;

        assert_eq!(literal, token.literal());
    }
}
