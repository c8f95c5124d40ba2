extern crate getopts;
extern crate monkey_lang;
extern crate rustyline;

use getopts::Options;
use monkey_lang::lexer::Lexer;
use monkey_lang::parser::Parser;
use monkey_lang::token::Token;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::env;
use std::error;
use std::process;

fn main() -> Result<(), Box<dyn error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("l", "lex", "only perform the lexing process");
    opts.optflag("p", "parse", "only perform the lexing and parsing processes");

    let matches = opts.parse(&args[1..])?;

    // Present usage if '-h'.
    if matches.opt_present("h") {
        let brief = format!("Usage: {} ['let five = 5;']", program);
        print!("{}", opts.usage(&brief));
        return Ok(());
    }

    // With no program text, run an interactive session instead.
    if matches.free.is_empty() {
        return repl();
    }

    // Pass all free arguments to the interpreter as one program.
    let source = matches.free.join(" ");

    if matches.opt_present("l") {
        if let Err(err) = lex(&source) {
            println!("\nlexer error: {}", err);
            process::exit(1);
        }

        return Ok(());
    }

    if matches.opt_present("p") {
        if let Err(err) = parse(&source) {
            println!("\nparser error: {}", err);
            process::exit(1);
        }

        return Ok(());
    }

    if let Err(err) = run(&source) {
        println!("\ninterpreter error: {}", err);
        process::exit(1);
    }

    Ok(())
}

fn lex(input: &str) -> Result<(), String> {
    println!("lexer:");

    let tokens = Lexer::new(input).lex().map_err(|err| err.to_string())?;
    for t in &tokens {
        match t {
            Token::Eof => {
                break;
            }
            Token::Illegal(ill) => {
                return Err(format!("illegal token: {}", ill));
            }
            _ => {
                println!("  - {:?}", t);
            }
        };
    }

    Ok(())
}

fn parse(input: &str) -> Result<(), String> {
    println!("\nparser:");

    let tokens = Lexer::new(input).lex().map_err(|err| err.to_string())?;
    let (prog, errors) = Parser::new(&tokens).parse();

    for stmt in &prog.statements {
        println!("  - {}", stmt.show(&tokens));
    }

    if !errors.is_empty() {
        return Err(errors.join("\n"));
    }

    Ok(())
}

fn run(input: &str) -> Result<(), String> {
    let outcome = monkey_lang::run(input).map_err(|err| err.to_string())?;

    if !outcome.errors.is_empty() {
        return Err(outcome.errors.join("\n"));
    }

    // Show the value of the final statement, as the REPL would.
    if let Some(result) = outcome.results.last() {
        println!("{}", result.inspect(&outcome.tokens));
    }

    Ok(())
}

fn repl() -> Result<(), Box<dyn error::Error>> {
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match monkey_lang::run(line) {
                    Ok(outcome) => {
                        for err in &outcome.errors {
                            println!("parser error: {}", err);
                        }

                        if let Some(result) = outcome.results.last() {
                            println!("{}", result.inspect(&outcome.tokens));
                        }
                    }
                    Err(err) => {
                        println!("{}", err);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Ok(());
            }
            Err(err) => {
                return Err(Box::new(err));
            }
        }
    }
}
