use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Error, ReturnError, RuntimeError, Unwind};
use crate::expr::{Expr, ExprVisitor};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{Token, Type};

type EvalResult = Result<Object, Unwind>;

/// Walks the syntax tree and evaluates it. Program output goes through the
/// injected writer so callers can capture it; diagnostics go to the error
/// sink.
pub struct Interpreter<'a> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
    writer: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(writer: &'a mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::get_globals() {
            let name = native.name.lexeme.clone();
            globals.borrow_mut().define(&name, Object::from(native));
        }

        // The method-less root of every user class's superclass chain.
        let object = Rc::new(RefCell::new(Class::new(String::from("Object"), None, HashMap::new())));
        globals.borrow_mut().define("Object", Object::from(object));

        Interpreter {
            globals: Rc::clone(&globals),
            environment: globals,
            locals: HashMap::new(),
            writer,
        }
    }

    /// Interprets the statements in order and returns the value of the last
    /// one, so a prompt can echo it. Returns `None` if a runtime error
    /// aborted the run.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Option<Object> {
        let mut result = Object::from(Literal::Nil);

        for statement in statements {
            match self.execute(statement) {
                Ok(value) => result = value,
                Err(Unwind::Error(error)) => {
                    error.throw();
                    return None;
                },
                // The resolver rejects return statements at the top level.
                Err(Unwind::Return(_)) => unreachable!(),
            }
        }

        Some(result)
    }

    /// Records the lexical depth of a variable occurrence. Called by the
    /// resolver; occurrences without an entry are globals.
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> EvalResult {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    /// Executes the statements with the given environment as the current
    /// one. The previous environment is restored exactly once, whether the
    /// block runs to completion, returns or raises a runtime error.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), Unwind> {
        let previous = mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                result = Err(unwind);
                break;
            }
        }

        self.environment = previous;
        result
    }

    /// Dispatches a variable read through the resolution table: a recorded
    /// depth walks the chain exactly that far, anything else is a global.
    fn look_up_variable(&self, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(name) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn number_operands_error(operator: &Token) -> Unwind {
        RuntimeError {
            token: operator.clone(),
            message: "Operands must be numbers.".to_string(),
        }.into()
    }
}

impl<'a> ExprVisitor<EvalResult> for Interpreter<'a> {
    fn visit_literal_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Literal(literal) = expr else { unreachable!() };

        Ok(Object::from(literal.clone()))
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Unary(unary) = expr else { unreachable!() };

        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            Type::Minus => (-right).ok_or_else(|| RuntimeError {
                token: unary.operator.clone(),
                message: "Operand must be a number.".to_string(),
            }.into()),
            Type::Bang => Ok(Object::from(!right.as_bool())),
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Binary(binary) = expr else { unreachable!() };

        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;

        let operator = &binary.operator;
        match operator.r#type {
            Type::Greater | Type::GreaterEqual | Type::Less | Type::LessEqual => {
                // NaN operands are numbers; every comparison against NaN is
                // simply false, per IEEE-754.
                match (left.as_number(), right.as_number()) {
                    (Some(l), Some(r)) => Ok(Object::from(match operator.r#type {
                        Type::Greater => l > r,
                        Type::GreaterEqual => l >= r,
                        Type::Less => l < r,
                        Type::LessEqual => l <= r,
                        _ => unreachable!(),
                    })),
                    _ => Err(Self::number_operands_error(operator)),
                }
            },
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            Type::Minus => (left - right).ok_or_else(|| Self::number_operands_error(operator)),
            Type::Slash => (left / right).ok_or_else(|| Self::number_operands_error(operator)),
            Type::Star => (left * right).ok_or_else(|| Self::number_operands_error(operator)),
            Type::Plus => (left + right).ok_or_else(|| Self::number_operands_error(operator)),
            Type::PlusPlus => left.concat(right).ok_or_else(|| RuntimeError {
                token: operator.clone(),
                message: "Operands must be strings.".to_string(),
            }.into()),
            _ => unreachable!(),
        }
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Logical(logical) = expr else { unreachable!() };

        // Short-circuit: the deciding operand is the result, whatever its
        // type.
        let left = self.evaluate(&logical.left)?;

        match logical.operator.r#type {
            Type::Or if left.as_bool() => Ok(left),
            Type::And if !left.as_bool() => Ok(left),
            _ => self.evaluate(&logical.right),
        }
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Grouping(grouping) = expr else { unreachable!() };

        self.evaluate(&grouping.expr)
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Variable(variable) = expr else { unreachable!() };

        self.look_up_variable(&variable.name).map_err(Unwind::from)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Assign(assign) = expr else { unreachable!() };

        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&assign.name) {
            Some(distance) => {
                self.environment.borrow_mut().assign_at(*distance, &assign.name, value.clone());
            },
            None => {
                self.globals.borrow_mut().assign(&assign.name, value.clone())
                    .map_err(Unwind::from)?;
            },
        };

        Ok(value)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Call(call) = expr else { unreachable!() };

        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::new();
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let callable: &dyn Callable = match &callee {
            Object::Function(function) => function,
            Object::NativeFunction(native) => native,
            Object::Class(class) => class,
            _ => return Err(RuntimeError {
                token: call.paren.clone(),
                message: "Only functions and classes are callable.".to_string(),
            }.into()),
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError {
                token: call.paren.clone(),
                message: format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    arguments.len()
                ),
            }.into());
        }

        callable.call(self, arguments).map_err(Unwind::from)
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Get(get) = expr else { unreachable!() };

        let object = self.evaluate(&get.object)?;

        match &object {
            Object::Instance(instance) => {
                instance.borrow().get(&get.name, &object).map_err(Unwind::from)
            },
            _ => Err(RuntimeError {
                token: get.name.clone(),
                message: "Can not access property from a non-instance value.".to_string(),
            }.into()),
        }
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Set(set) = expr else { unreachable!() };

        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError {
                token: set.name.clone(),
                message: "Only objects have fields".to_string(),
            }.into());
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());

        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::This(this) = expr else { unreachable!() };

        self.look_up_variable(&this.keyword).map_err(Unwind::from)
    }

    fn visit_super_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Super(super_expr) = expr else { unreachable!() };

        // The frame defining `super` sits directly above the one binding
        // `this` to the current instance.
        let distance = *self.locals.get(&super_expr.keyword)
            .expect("super to have a resolved depth");

        let superclass = self.environment.borrow().get_at(distance, &super_expr.keyword)?;
        let instance = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        let Object::Class(superclass) = superclass else { unreachable!() };

        let Some(method) = superclass.borrow().find_method(&super_expr.method.lexeme) else {
            return Err(RuntimeError {
                token: super_expr.method.clone(),
                message: format!("Undefined method '{}'.", super_expr.method.lexeme),
            }.into());
        };

        Ok(Object::from(method.bind(instance)))
    }
}

impl<'a> StmtVisitor<EvalResult> for Interpreter<'a> {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::Expression(data) = stmt else { unreachable!() };

        self.evaluate(&data.expr)
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::Print(data) = stmt else { unreachable!() };

        let value = self.evaluate(&data.expr)?;
        writeln!(self.writer, "{value}").expect("writes to the output sink to succeed");

        Ok(Object::from(Literal::Nil))
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = self.evaluate(&data.initializer)?;
        self.environment.borrow_mut().define(&data.name.lexeme, value);

        Ok(Object::from(Literal::Nil))
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::Block(data) = stmt else { unreachable!() };

        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))?;

        Ok(Object::from(Literal::Nil))
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.then_branch)?;
        } else {
            self.execute(&data.else_branch)?;
        }

        Ok(Object::from(Literal::Nil))
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.body)?;
        }

        Ok(Object::from(Literal::Nil))
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::Function(data) = stmt else { unreachable!() };

        let function = Function::new(data, Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));

        Ok(Object::from(Literal::Nil))
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = self.evaluate(&data.value)?;

        Err(ReturnError { value }.into())
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let superclass = self.evaluate(&data.superclass)?;
        let Object::Class(superclass) = superclass else {
            let Expr::Variable(variable) = &data.superclass else { unreachable!() };
            return Err(RuntimeError {
                token: variable.name.clone(),
                message: "Super class must be a class.".to_string(),
            }.into());
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        // Methods of an explicit subclass close over a frame defining
        // `super`, mirroring the scope the resolver pushed. Implicit
        // inheritance from Object gets no such frame.
        let defining = if data.explicit_superclass {
            let mut environment = Environment::new(Some(Rc::clone(&self.environment)));
            environment.define("super", Object::from(Rc::clone(&superclass)));
            Rc::new(RefCell::new(environment))
        } else {
            Rc::clone(&self.environment)
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(declaration) = method else { unreachable!() };
            let function = Function::new(
                declaration,
                Rc::clone(&defining),
                declaration.name.lexeme == "init",
            );
            methods.insert(declaration.name.lexeme.clone(), function);
        }

        let class = Rc::new(RefCell::new(Class::new(
            data.name.lexeme.clone(),
            Some(superclass),
            methods,
        )));
        self.environment.borrow_mut().assign(&data.name, Object::from(class))
            .map_err(Unwind::from)?;

        Ok(Object::from(Literal::Nil))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    /// Runs a source snippet through the full pipeline and returns whatever
    /// it printed.
    fn run(source: &str) -> String {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let tokens = Scanner::new(source).scan_tokens();
        let statements = Parser::new(tokens).parse();
        Resolver::new(&mut interpreter).resolve(&statements);
        interpreter.interpret(&statements);

        drop(interpreter);
        String::from_utf8(output).expect("program output to be utf-8")
    }

    fn evaluate_source(source: &str) -> EvalResult {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let tokens = Scanner::new(source).scan_tokens();
        let statements = Parser::new(tokens).parse();

        let Some(Stmt::Expression(data)) = statements.first() else {
            panic!("expected an expression statement");
        };
        let result = interpreter.evaluate(&data.expr);

        drop(interpreter);
        result
    }

    fn error_message(result: EvalResult) -> String {
        match result {
            Err(Unwind::Error(error)) => error.message,
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn evaluate_arithmetic() {
        assert_eq!(evaluate_source("1 + 2 * 3;").unwrap(), Object::from(7.0));
        assert_eq!(evaluate_source("(1 + 2) * 3;").unwrap(), Object::from(9.0));
        assert_eq!(evaluate_source("-4 + 2;").unwrap(), Object::from(-2.0));
    }

    #[test]
    fn evaluate_division_by_zero() {
        let Object::Literal(Literal::Number(n)) = evaluate_source("1 / 0;").unwrap() else {
            panic!("expected a number");
        };
        assert!(n.is_infinite());
    }

    #[test]
    fn add_requires_numbers() {
        assert_eq!(error_message(evaluate_source("\"a\" + 1;")), "Operands must be numbers.");
        assert_eq!(error_message(evaluate_source("\"a\" + \"b\";")), "Operands must be numbers.");
    }

    #[test]
    fn concat_requires_strings() {
        assert_eq!(
            evaluate_source("\"foo\" ++ \"bar\";").unwrap(),
            Object::from("foobar")
        );
        assert_eq!(error_message(evaluate_source("1 ++ 2;")), "Operands must be strings.");
    }

    #[test]
    fn comparison_requires_numbers() {
        assert_eq!(evaluate_source("1 < 2;").unwrap(), Object::from(true));
        assert_eq!(error_message(evaluate_source("\"a\" < \"b\";")), "Operands must be numbers.");
    }

    #[test]
    fn unary_minus_requires_a_number() {
        assert_eq!(error_message(evaluate_source("-\"a\";")), "Operand must be a number.");
    }

    #[test]
    fn equality_across_kinds() {
        assert_eq!(evaluate_source("nil == nil;").unwrap(), Object::from(true));
        assert_eq!(evaluate_source("1 == \"1\";").unwrap(), Object::from(false));
        assert_eq!(evaluate_source("\"a\" == \"a\";").unwrap(), Object::from(true));
        assert_eq!(evaluate_source("1 != 2;").unwrap(), Object::from(true));
    }

    #[test]
    fn bang_uses_truthiness() {
        assert_eq!(evaluate_source("!nil;").unwrap(), Object::from(true));
        assert_eq!(evaluate_source("!0;").unwrap(), Object::from(false));
        assert_eq!(evaluate_source("!\"\";").unwrap(), Object::from(false));
    }

    #[test]
    fn logical_operators_return_the_deciding_operand() {
        assert_eq!(evaluate_source("nil or \"yes\";").unwrap(), Object::from("yes"));
        assert_eq!(evaluate_source("\"first\" or \"second\";").unwrap(), Object::from("first"));
        assert_eq!(evaluate_source("nil and \"unreached\";").unwrap(), Object::from(Literal::Nil));
        assert_eq!(evaluate_source("1 and \"second\";").unwrap(), Object::from("second"));
    }

    #[test]
    fn interpret_returns_the_last_value() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let tokens = Scanner::new("var a = 1; a + 1;").scan_tokens();
        let statements = Parser::new(tokens).parse();
        let result = interpreter.interpret(&statements);

        drop(interpreter);
        assert_eq!(result, Some(Object::from(2.0)));
    }

    #[test]
    fn print_writes_to_the_sink() {
        assert_eq!(run("print 1 + 2;"), "3\n");
    }

    #[test]
    fn block_scoping() {
        assert_eq!(
            run("var x = \"outer\"; { var x = \"inner\"; print x; } print x;"),
            "inner\nouter\n"
        );
    }

    #[test]
    fn closures_capture_their_environment() {
        let source = "\
            fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; }\n\
            var c = make();\n\
            print c(); print c(); print c();";
        assert_eq!(run(source), "1\n2\n3\n");
    }

    #[test]
    fn zero_is_truthy() {
        assert_eq!(run("if (0) print \"t\"; else print \"f\";"), "t\n");
    }

    #[test]
    fn initializer_yields_the_instance() {
        let source = "\
            class Counter { init(n) { this.n = n; } bump() { this.n = this.n + 1; return this.n; } }\n\
            var k = Counter(10);\n\
            print k.bump(); print k.bump();";
        assert_eq!(run(source), "11\n12\n");
    }

    #[test]
    fn super_calls_the_parent_method() {
        let source = "\
            class A { greet() { print \"hi\"; } }\n\
            class B < A { greet() { super.greet(); print \"from B\"; } }\n\
            B().greet();";
        assert_eq!(run(source), "hi\nfrom B\n");
    }
}
