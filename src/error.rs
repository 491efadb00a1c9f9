use crate::object::Object;
use crate::token::{Location, Token, Type};

static mut HAD_ERROR: bool = false;
static mut HAD_RUNTIME_ERROR: bool = false;

/// Checks if an error occurred during scanning, parsing, resolving or interpreting.
pub fn did_error() -> bool {
    unsafe { HAD_ERROR || HAD_RUNTIME_ERROR }
}

/// Checks if an error occurred during runtime.
pub fn did_runtime_error() -> bool {
    unsafe { HAD_RUNTIME_ERROR }
}

/// Resets the error flags.
/// This is used to reset the interpreter after an error occurs when running prompts.
pub fn reset_error() {
    unsafe {
        HAD_ERROR = false;
        HAD_RUNTIME_ERROR = false;
    }
}

/// Every error type must implement this trait.
pub trait Error {
    /// Prints the error message and sets the error flag.
    fn throw(&self);
}

/// Represents an error that occurs during scanning.
#[derive(Debug)]
pub struct ScanError {
    pub location: Location,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        eprintln!(
            "[line {line}] Error: {message}",
            line = self.location.line,
            message = self.message
        );

        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// Represents an error that occurs during parsing.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        if self.token.r#type == Type::EOF {
            eprintln!(
                "[line {line}] Error at end: {message}",
                line = self.token.location.line,
                message = self.message
            );
        } else {
            eprintln!(
                "[line {line}] Error at '{lexeme}': {message}",
                line = self.token.location.line,
                lexeme = self.token.lexeme,
                message = self.message
            );
        }

        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// Represents an error that occurs during resolution.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        if self.token.r#type == Type::EOF {
            eprintln!(
                "[line {line}] Error at end: {message}",
                line = self.token.location.line,
                message = self.message
            );
        } else {
            eprintln!(
                "[line {line}] Error at '{lexeme}': {message}",
                line = self.token.location.line,
                lexeme = self.token.lexeme,
                message = self.message
            );
        }

        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// Represents an error that occurs during runtime.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        eprintln!(
            "{message}\n[line {line}]",
            message = self.message,
            line = self.token.location.line
        );

        unsafe {
            HAD_RUNTIME_ERROR = true;
        }
    }
}

/// Represents a special error that is caught by the interpreter.
/// This error is thrown when a return statement is executed. Since errors are propagated up the
/// execution stack, the nearest enclosing function call can catch it and yield the carried value.
#[derive(Debug)]
pub struct ReturnError {
    pub value: Object,
}

/// The channel the evaluator propagates through: either a runtime error that
/// aborts the run or a return unwinding towards the nearest call.
#[derive(Debug)]
pub enum Unwind {
    Error(RuntimeError),
    Return(ReturnError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

impl From<ReturnError> for Unwind {
    fn from(error: ReturnError) -> Self {
        Unwind::Return(error)
    }
}
