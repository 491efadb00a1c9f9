//! Lox is a small dynamically typed scripting language with first-class
//! functions, closures, lexical scoping and single-inheritance classes. This
//! crate is a tree-walk interpreter for it: source text goes through a
//! scanner, a parser and a resolver before a tree-walking evaluator runs it.
//!
//! ## Scanning
//! The first step is scanning. Scanning converts a string of characters into
//! a list of tokens. A token is a single unit of the language; the string
//! `1 + 2` becomes:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`](scanner) module as a small
//! state machine over the source characters. Trivial problems like an
//! unterminated string literal or an unexpected character are reported as a
//! [`ScanError`](error::ScanError) the moment they are seen, and scanning
//! continues so that one run can surface several of them.
//!
//! ## Parsing
//! The second step is parsing. The parser in the [`parser`](parser) module
//! is a hand-written recursive descent parser that turns the token list into
//! a tree of expressions and statements. [`Expressions`](expr::Expr) are
//! pieces of code that produce a value, an [`Object`](object::Object).
//! [`Statements`](stmt::Stmt) perform some action instead, like declaring a
//! variable or printing a value. The parser also desugars the convenience
//! forms on the way out: a `for` loop becomes a `while` loop in a block, a
//! missing `else` becomes an empty block, a class without a superclass
//! clause inherits from the global `Object` class. Syntax errors become a
//! [`ParseError`](error::ParseError); the parser then skips ahead to the
//! next statement boundary and keeps going, so a single run reports as many
//! errors as it can.
//!
//! ## Resolving
//! The third step is resolving. The resolver in the [`resolver`](resolver)
//! module walks the finished tree once and computes, for every local
//! variable occurrence, how many environments separate the use from its
//! binding. That side table is what makes closures capture their lexical
//! binding instead of whatever happens to be in scope at call time. The
//! resolver also rejects code that is syntactically fine but semantically
//! wrong, like reading a variable in its own initializer or using `super`
//! in a class without a superclass, as a [`ResolveError`](error::ResolveError).
//!
//! ## Interpreting
//! The final step is interpreting. The [`interpreter`](interpreter) module
//! walks the tree and evaluates it, managing the chain of
//! [`environments`](environment::Environment) that gives the language its
//! lexical scoping. Errors that only show up with live values, like adding
//! a string to a number, are reported as a
//! [`RuntimeError`](error::RuntimeError) and abort the run.

use std::{fs, process};
use std::io::Write;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod error;
pub mod token;
pub mod scanner;
pub mod expr;
pub mod stmt;
pub mod environment;
pub mod parser;
pub mod ast;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod function;
pub mod resolver;
pub mod class;

use literal::Literal;
use object::Object;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

#[allow(non_camel_case_types)]
pub struct lox<'a> {
    interpreter: interpreter::Interpreter<'a>,
}

impl<'a> lox<'a> {
    /// Creates a new interpreter that writes program output to the given
    /// sink. Diagnostics always go to stderr.
    pub fn new(writer: &'a mut dyn Write) -> Self {
        lox {
            interpreter: interpreter::Interpreter::new(writer),
        }
    }

    /// Runs a script file. Exits the process with 65 on a static error and
    /// 70 on a runtime error.
    pub fn run_file(&mut self, path: String) {
        let contents = fs::read_to_string(path)
            .expect("Should have been able to read the file");

        self.run(&contents);

        if error::did_runtime_error() {
            process::exit(70);
        }
        if error::did_error() {
            process::exit(65);
        }
    }

    /// Runs an interactive prompt. An empty line or end-of-file exits; the
    /// interpreter state carries over between lines, while error flags are
    /// cleared so a bad line does not poison the next one.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new().expect("to create a line editor");

        let history = home::home_dir().map(|dir| dir.join(".lox_history"));
        if let Some(path) = &history {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.is_empty() {
                        break;
                    }

                    let _ = editor.add_history_entry(&line);

                    // Echo the value of the last statement, prompt style.
                    // Declarations and other nil-valued lines stay quiet.
                    if let Some(result) = self.run(&line) {
                        if result != Object::from(Literal::Nil) {
                            println!("{result}");
                        }
                    }

                    error::reset_error();
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("{error}");
                    break;
                },
            }
        }

        if let Some(path) = &history {
            let _ = editor.save_history(path);
        }
    }

    /// Runs a chunk of source through the whole pipeline. Each stage gates
    /// the next one: nothing is evaluated unless scanning, parsing and
    /// resolving all went through clean. Returns the value of the last
    /// statement, if the run made it that far.
    pub fn run(&mut self, source: &str) -> Option<Object> {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        if error::did_error() {
            return None;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        if error::did_error() {
            return None;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if error::did_error() {
            return None;
        }

        self.interpreter.interpret(&statements)
    }
}
