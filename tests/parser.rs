extern crate monkey_lang;

use monkey_lang::ast;
use monkey_lang::lexer::Lexer;
use monkey_lang::parser::Parser;
use monkey_lang::token::Token;

#[test]
fn parse_let_statements() {
    let (prog, tokens) = parse(
        "
let five = 5;
let ten = 10;
",
    );

    assert_eq!(prog.statements.len(), 2);
    assert_eq!("let five = 5;let ten = 10;", prog.show(&tokens));

    for stmt in &prog.statements {
        if let ast::Statement::Let(_) = stmt {
        } else {
            panic!("not a let statement");
        }
    }
}

#[test]
fn parse_return_statements() {
    let (prog, tokens) = parse("return 5; return; return add(5);");

    assert_eq!(prog.statements.len(), 3);
    assert_eq!("return 5;return;return add(5);", prog.show(&tokens));

    // The bare return statement stores no expression.
    let value = if let ast::Statement::Return(ret) = &prog.statements[1] {
        &ret.value
    } else {
        panic!("not a return statement");
    };

    assert_eq!(&None, value);
}

#[test]
fn parse_identifier_expression() {
    let (prog, tokens) = parse("foobar;");

    assert_eq!(prog.statements.len(), 1);

    let stmt =
        if let ast::Statement::Expression(stmt) = &prog.statements[0] {
            stmt
        } else {
            panic!("not an expression statement");
        };

    let idx = if let ast::Expression::Identifier(idx) = stmt.expression {
        idx
    } else {
        panic!("not an identifier expression");
    };

    assert_eq!("foobar", tokens[idx].literal());
    assert!(stmt.semicolon);
}

#[test]
fn parse_integer_literal_expression() {
    let (prog, tokens) = parse("5;");

    assert_eq!(prog.statements.len(), 1);

    let idx = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::Integer(idx),
        ..
    }) = prog.statements[0]
    {
        idx
    } else {
        panic!("not an integer expression");
    };

    assert_eq!(Token::Integer(monkey_lang::token::Integer {
        radix: monkey_lang::token::Radix::Decimal,
        value: 5,
    }), tokens[idx]);
}

#[test]
fn parse_string_literal_expression() {
    let (prog, tokens) = parse(r#""hello world";"#);

    let idx = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::String(idx),
        ..
    }) = prog.statements[0]
    {
        idx
    } else {
        panic!("not a string expression");
    };

    assert_eq!("hello world", tokens[idx].literal());
}

#[test]
fn parse_prefix_expressions() {
    let tests = vec![("!5;", Token::Bang, "5"), ("-15;", Token::Minus, "15")];

    for (input, want_op, want_right) in tests {
        let (prog, tokens) = parse(input);

        let got = if let ast::Statement::Expression(ast::ExpressionStatement {
            expression: ast::Expression::Prefix(pre),
            ..
        }) = &prog.statements[0]
        {
            pre
        } else {
            panic!("not a prefix expression");
        };

        assert_eq!(want_op, got.operator);
        assert_eq!(want_right, got.right.show(&tokens));
    }
}

#[test]
fn parse_infix_expressions() {
    let tests = vec![
        ("5 + 5;", Token::Plus),
        ("5 - 5;", Token::Minus),
        ("5 * 5;", Token::Asterisk),
        ("5 / 5;", Token::Slash),
        ("5 > 5;", Token::GreaterThan),
        ("5 < 5;", Token::LessThan),
        ("5 == 5;", Token::Equal),
        ("5 != 5;", Token::NotEqual),
    ];

    for (input, want_op) in tests {
        let (prog, tokens) = parse(input);

        let got = if let ast::Statement::Expression(ast::ExpressionStatement {
            expression: ast::Expression::Infix(inf),
            ..
        }) = &prog.statements[0]
        {
            inf
        } else {
            panic!("not an infix expression");
        };

        assert_eq!("5", got.left.show(&tokens));
        assert_eq!(want_op, got.operator);
        assert_eq!("5", got.right.show(&tokens));
    }
}

#[test]
fn parse_infix_boolean_expressions() {
    let tests = vec![
        ("true == true", "(true == true)"),
        ("true != false", "(true != false)"),
        ("false == false", "(false == false)"),
    ];

    for (input, want) in tests {
        let (prog, tokens) = parse(input);

        assert_eq!(want, prog.show(&tokens));
    }
}

#[test]
fn parse_operator_precedence() {
    let tests = vec![
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("3 + 4; -5 * 5", "(3 + 4);((-5) * 5)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        (
            "3 + 4 * 5 == 3 * 1 + 4 * 5",
            "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
        ),
        ("true", "true"),
        ("false", "false"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("3 < 5 == true", "((3 < 5) == true)"),
        ("3 < 5 == false;", "((3 < 5) == false);"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
        ),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
        (
            "a * [1, 2, 3, 4][b * c] * d",
            "((a * ([1, 2, 3, 4][(b * c)])) * d)",
        ),
        (
            "add(a * b[2], b[1], 2 * [1, 2][1])",
            "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
        ),
        (
            "5 * [1,2,3,4][1*2] * 6;",
            "((5 * ([1, 2, 3, 4][(1 * 2)])) * 6);",
        ),
    ];

    for (input, want) in tests {
        let (prog, tokens) = parse(input);

        assert_eq!(want, prog.show(&tokens));
    }
}

#[test]
fn parse_if_expression() {
    let (prog, tokens) = parse("if (x < y) { x }");

    let expr = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::If(expr),
        ..
    }) = &prog.statements[0]
    {
        expr
    } else {
        panic!("not an if expression");
    };

    assert_eq!("(x < y)", expr.condition.show(&tokens));
    assert_eq!(1, expr.consequence.statements.len());
    assert!(expr.alternative.is_none());

    assert_eq!("if (x < y) { x }", prog.show(&tokens));
}

#[test]
fn parse_if_else_expression() {
    let (prog, tokens) = parse("if (x < y) { x } else { y }");

    let expr = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::If(expr),
        ..
    }) = &prog.statements[0]
    {
        expr
    } else {
        panic!("not an if expression");
    };

    let alt = expr.alternative.as_ref().expect("expected an else block");
    assert_eq!(1, alt.statements.len());

    assert_eq!("if (x < y) { x } else { y }", prog.show(&tokens));
}

#[test]
fn parse_function_literal() {
    let (prog, tokens) = parse("fn(x, y) { x + y; }");

    let func = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::Function(func),
        ..
    }) = &prog.statements[0]
    {
        func
    } else {
        panic!("not a function literal");
    };

    let parameters: Vec<String> = func
        .parameters
        .iter()
        .map(|&idx| tokens[idx].literal())
        .collect();

    assert_eq!(vec!["x", "y"], parameters);
    assert_eq!(1, func.body.statements.len());

    assert_eq!("fn(x, y) { (x + y); }", prog.show(&tokens));
}

#[test]
fn parse_function_parameters() {
    let tests = vec![
        ("fn() {};", vec![]),
        ("fn(x) {};", vec!["x"]),
        ("fn(x, y, z) {};", vec!["x", "y", "z"]),
    ];

    for (input, want) in tests {
        let (prog, tokens) = parse(input);

        let func = if let ast::Statement::Expression(ast::ExpressionStatement {
            expression: ast::Expression::Function(func),
            ..
        }) = &prog.statements[0]
        {
            func
        } else {
            panic!("not a function literal");
        };

        let parameters: Vec<String> = func
            .parameters
            .iter()
            .map(|&idx| tokens[idx].literal())
            .collect();

        assert_eq!(want, parameters);
    }
}

#[test]
fn parse_macro_literal() {
    let (prog, tokens) = parse("macro(x, y) { x + y; }");

    let m = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::Macro(m),
        ..
    }) = &prog.statements[0]
    {
        m
    } else {
        panic!("not a macro literal");
    };

    let parameters: Vec<String> = m
        .parameters
        .iter()
        .map(|&idx| tokens[idx].literal())
        .collect();

    assert_eq!(vec!["x", "y"], parameters);
    assert_eq!("macro(x, y) { (x + y); }", prog.show(&tokens));
}

#[test]
fn parse_call_expression() {
    let (prog, tokens) = parse("add(1, 2 * 3, 4 + 5);");

    let call = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::Call(call),
        ..
    }) = &prog.statements[0]
    {
        call
    } else {
        panic!("not a call expression");
    };

    assert_eq!("add", call.function.show(&tokens));
    assert_eq!(3, call.arguments.len());

    assert_eq!("add(1, (2 * 3), (4 + 5));", prog.show(&tokens));
}

#[test]
fn parse_array_literal() {
    let (prog, tokens) = parse("[1, 2 * 2, 3 + 3]");

    let array = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::Array(array),
        ..
    }) = &prog.statements[0]
    {
        array
    } else {
        panic!("not an array literal");
    };

    assert_eq!(3, array.elements.len());
    assert_eq!("[1, (2 * 2), (3 + 3)]", prog.show(&tokens));
}

#[test]
fn parse_empty_array_literal() {
    let (prog, tokens) = parse("[]");

    assert_eq!("[]", prog.show(&tokens));
}

#[test]
fn parse_index_expression() {
    let (prog, tokens) = parse("myArray[1 + 1]");

    let expr = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::Index(expr),
        ..
    }) = &prog.statements[0]
    {
        expr
    } else {
        panic!("not an index expression");
    };

    assert_eq!("myArray", expr.left.show(&tokens));
    assert_eq!("(1 + 1)", expr.index.show(&tokens));
}

#[test]
fn parse_hash_literal() {
    let (prog, tokens) = parse(r#"{"one": 1, "two": 2, "three": 3}"#);

    let hash = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::Hash(hash),
        ..
    }) = &prog.statements[0]
    {
        hash
    } else {
        panic!("not a hash literal");
    };

    assert_eq!(3, hash.pairs.len());
    assert_eq!("{one: 1, two: 2, three: 3}", prog.show(&tokens));
}

#[test]
fn parse_empty_hash_literal() {
    let (prog, _) = parse("{}");

    let hash = if let ast::Statement::Expression(ast::ExpressionStatement {
        expression: ast::Expression::Hash(hash),
        ..
    }) = &prog.statements[0]
    {
        hash
    } else {
        panic!("not a hash literal");
    };

    assert!(hash.pairs.is_empty());
}

#[test]
fn parse_hash_literal_with_expressions() {
    let (prog, tokens) = parse(r#"{"one": 0 + 1, "two": 10 - 8, "three": 15 / 5}"#);

    assert_eq!(
        "{one: (0 + 1), two: (10 - 8), three: (15 / 5)}",
        prog.show(&tokens)
    );
}

#[test]
fn parse_errors() {
    let tests = vec![
        ("let = 5;", "Expected next token to be 'identifier'; got = instead"),
        ("let x 5;", "Expected next token to be '='; got 5 instead"),
        ("let x", "Not enough tokens for Let statement"),
        ("let", "Not enough tokens for Let statement"),
        ("(1 + 2", "Expected next token to be ')'; got EOF instead"),
        ("push(1,", "Incomplete argument list for function call"),
        ("if (x { 1 }", "Expected next token to be ')'; got { instead"),
        (
            "fn(x, 5) {};",
            "Expected next token to be 'identifier'; got 5 instead",
        ),
        ("5 5;", "Invalid token 5 for infix expression"),
        ("{1: 2", "Expected next token to be ','; got EOF instead"),
        ("{1 2}", "Expected next token to be ':'; got 2 instead"),
        ("let x = ;", "Expected expression, but got ; instead"),
    ];

    for (input, want) in tests {
        let tokens = lex(input);
        let (_, errors) = Parser::new(&tokens).parse();

        assert!(
            errors.contains(&want.to_string()),
            "parsing {:?}: expected error {:?} in {:?}",
            input,
            want,
            errors,
        );
    }
}

#[test]
fn parse_valid_corpus_no_errors() {
    for input in corpus() {
        let tokens = lex(input);
        let (_, errors) = Parser::new(&tokens).parse();

        assert!(
            errors.is_empty(),
            "parsing {:?}: unexpected errors {:?}",
            input,
            errors,
        );
    }
}

#[test]
fn parse_show_round_trip() {
    // Rendering a parsed program and parsing that rendering again must be
    // idempotent after the first round.
    for input in corpus() {
        let tokens = lex(input);
        let (prog, errors) = Parser::new(&tokens).parse();
        assert!(errors.is_empty());

        let first = prog.show(&tokens);

        let tokens = lex(&first);
        let (prog, errors) = Parser::new(&tokens).parse();
        assert!(errors.is_empty(), "reparsing {:?}: errors {:?}", first, errors);

        assert_eq!(first, prog.show(&tokens));
    }
}

// Valid programs used for whole-corpus properties. String literals are
// excluded because their rendered form drops the quotes.
fn corpus() -> Vec<&'static str> {
    vec![
        "5 + 5 + 5 + 5 - 10",
        "let newAdder = fn(x){ fn(y){ x + y } }; let addTwo = newAdder(2); addTwo(2)",
        "let counter = fn(x){ if (x > 100) { return true; } else { counter(x+1); } }; counter(0)",
        "-a * b",
        "5 * [1,2,3,4][1*2] * 6;",
        "3 < 5 == false;",
        "if (x < y) { x } else { y }",
        "let m = macro(x, y) { quote(unquote(x) + unquote(y)); }; m(1, 2);",
        "len([1, 2 * 2, 3 + 3])",
        "{1: 2, true: 4, 5 + 5: 6}[10 / 2]",
        "return;",
        "return 10;",
    ]
}

fn parse(input: &str) -> (ast::Program, Vec<Token>) {
    let tokens = lex(input);
    let (prog, errors) = Parser::new(&tokens).parse();

    assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

    (prog, tokens)
}

fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).lex().expect("failed to lex tokens")
}
