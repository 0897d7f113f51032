mod evaluator;
mod scope;

use std::rc::Rc;
use log::{debug, info, trace};
use serde::Deserialize;
use crate::language::ast::{Assignment, AstNode, AstVisitor, FunctionDecl, VarDecl};
use crate::language::value::Value;
use crate::language::error::{Error, Result};
use crate::runtime_error;
use evaluator::evaluate_binary_op;
use scope::{Binding, Scope};

/// Nested calls past this depth are a runtime error. The stack itself grows
/// on demand, so this only catches runaway recursion.
pub const MAX_CALL_DEPTH: usize = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpreterOptions {
    /// Clear the return flag around every call so `devolveme` only ends the
    /// function that ran it. Off by default: once any `devolveme` has run,
    /// every later block stops after its first statement.
    pub reset_return_on_call: bool,
}

#[derive(Debug)]
pub struct Interpreter {
    scope: Scope,
    output: String,
    return_value: Value,
    has_return: bool,
    call_depth: usize,
    options: InterpreterOptions,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_options(InterpreterOptions::default())
    }

    pub fn with_options(options: InterpreterOptions) -> Self {
        Interpreter {
            scope: Scope::new(),
            output: String::new(),
            return_value: Value::Null,
            has_return: false,
            call_depth: 0,
            options,
        }
    }

    /// Runs top-level statements in order. The return flag does not stop the
    /// top level, only nested blocks.
    pub fn interpret(&mut self, statements: &[AstNode]) -> Result<()> {
        debug!("Comenzando la interpretación de {} declaraciones", statements.len());

        for statement in statements {
            if let Err(e) = statement.accept(self) {
                debug!("Error de ejecución: {}", e);
                return Err(e);
            }
        }

        info!("Interpretación exitosa, {} bytes de salida", self.output.len());
        Ok(())
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// The most recent value produced by `devolveme`, wherever it ran.
    pub fn return_value(&self) -> &Value {
        &self.return_value
    }

    fn execute_block(&mut self, statements: &[AstNode], bindings: Vec<(String, Binding)>) -> Result<()> {
        let shadowed = self.scope.enter(bindings);

        let mut result = Ok(());
        for statement in statements {
            result = statement.accept(self).map(|_| ());
            if result.is_err() || self.has_return {
                break;
            }
        }

        self.scope.leave(shadowed);
        result
    }

    fn call(&mut self, name: &str, function: &FunctionDecl, args: Vec<Value>) -> Result<Value> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return runtime_error!(format!("Profundidad máxima de llamadas excedida en '{}'", name));
        }

        let mut args = args.into_iter();
        let bindings = function
            .params
            .iter()
            .map(|param| (param.clone(), Binding::Value(args.next().unwrap_or(Value::Null))))
            .collect();

        if self.options.reset_return_on_call {
            self.has_return = false;
            self.return_value = Value::Null;
        }

        trace!("Llamando a {}", name);
        self.call_depth += 1;
        let result = self.execute_block(&function.body, bindings);
        self.call_depth -= 1;
        result?;

        if self.options.reset_return_on_call {
            self.has_return = false;
        }

        Ok(self.return_value.clone())
    }
}

impl AstVisitor<Value> for Interpreter {
    type Error = Error;

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<Value> {
        let value = decl.expr.accept(self)?;
        self.scope.declare(&decl.name, Binding::Value(value));
        Ok(Value::Null)
    }

    fn visit_assignment(&mut self, assignment: &Assignment) -> Result<Value> {
        let value = assignment.expr.accept(self)?;
        if !self.scope.assign(&assignment.name, Binding::Value(value)) {
            return runtime_error!(format!("Variable '{}' no declarada", assignment.name));
        }
        Ok(Value::Null)
    }

    fn visit_function_decl(&mut self, decl: &Rc<FunctionDecl>) -> Result<Value> {
        self.scope.declare(&decl.name, Binding::Function(Rc::clone(decl)));
        Ok(Value::Null)
    }

    fn visit_function_call(&mut self, name: &str, args: &[AstNode]) -> Result<Value> {
        let function = match self.scope.get(name) {
            Some(Binding::Function(function)) => Rc::clone(function),
            Some(Binding::Value(_)) => return runtime_error!(format!("'{}' no es una función", name)),
            None => return runtime_error!(format!("Función '{}' no declarada", name)),
        };

        let args = args
            .iter()
            .map(|arg| arg.accept(self))
            .collect::<Result<Vec<Value>>>()?;

        self.call(name, &function, args)
    }

    fn visit_if_statement(&mut self, condition: &AstNode, then_branch: &[AstNode], else_branch: &[AstNode]) -> Result<Value> {
        if condition.accept(self)?.is_truthy() {
            self.execute_block(then_branch, Vec::new())?;
        } else {
            self.execute_block(else_branch, Vec::new())?;
        }
        Ok(Value::Null)
    }

    fn visit_while_statement(&mut self, condition: &AstNode, body: &[AstNode]) -> Result<Value> {
        while condition.accept(self)?.is_truthy() {
            self.execute_block(body, Vec::new())?;
        }
        Ok(Value::Null)
    }

    fn visit_for_statement(&mut self, initializer: &VarDecl, condition: &AstNode, increment: &Assignment, body: &[AstNode]) -> Result<Value> {
        self.visit_var_decl(initializer)?;
        while condition.accept(self)?.is_truthy() {
            self.execute_block(body, Vec::new())?;
            self.visit_assignment(increment)?;
        }
        Ok(Value::Null)
    }

    fn visit_print(&mut self, expr: &AstNode) -> Result<Value> {
        let value = expr.accept(self)?;
        debug!("mostrame: {}", value);
        self.output.push_str(&value.to_string());
        self.output.push('\n');
        Ok(Value::Null)
    }

    fn visit_return(&mut self, expr: &AstNode) -> Result<Value> {
        self.return_value = expr.accept(self)?;
        self.has_return = true;
        Ok(Value::Null)
    }

    fn visit_binary_expression(&mut self, operator: &str, left: &AstNode, right: &AstNode) -> Result<Value> {
        let left = left.accept(self)?;
        let right = right.accept(self)?;
        evaluate_binary_op(operator, &left, &right)
    }

    fn visit_literal(&mut self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    fn visit_identifier(&mut self, name: &str) -> Result<Value> {
        match self.scope.get(name) {
            Some(Binding::Value(value)) => Ok(value.clone()),
            Some(Binding::Function(_)) => runtime_error!(format!("'{}' es una función, no una variable", name)),
            None => runtime_error!(format!("Variable '{}' no declarada", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::error::ErrorKind;
    use crate::language::parser::parse;

    fn run_with(source: &str, options: InterpreterOptions) -> Result<Interpreter> {
        let ast = parse(source).unwrap();
        let mut interpreter = Interpreter::with_options(options);
        interpreter.interpret(&ast)?;
        Ok(interpreter)
    }

    fn run(source: &str) -> Result<String> {
        run_with(source, InterpreterOptions::default()).map(Interpreter::into_output)
    }

    #[test]
    fn program_without_print_is_silent() {
        assert_eq!(run("caramelo x = 1; x = x + 1; torta f() { }").unwrap(), "");
    }

    #[test]
    fn left_associative_evaluation() {
        assert_eq!(run("mostrame(2 + 3 * 4);").unwrap(), "20\n");
    }

    #[test]
    fn while_loop_counts() {
        let source = "caramelo i = 0; gomita (i < 3) { mostrame(i); i = i + 1; }";
        assert_eq!(run(source).unwrap(), "0\n1\n2\n");
    }

    #[test]
    fn for_loop_counts() {
        let source = "batido (caramelo i = 0; i < 3; i = i + 1;) { mostrame(i * 10); }";
        assert_eq!(run(source).unwrap(), "0\n10\n20\n");
    }

    #[test]
    fn for_runs_increment_after_body() {
        let source = "batido (caramelo i = 0; i < 2; i = i + 1;) { mostrame(i); } mostrame(i);";
        assert_eq!(run(source).unwrap(), "0\n1\n2\n");
    }

    #[test]
    fn if_selects_one_branch() {
        let source = "caramelo x = 5; \
                      alfajor (x > 3) { mostrame(\"grande\"); } chocolate { mostrame(\"chico\"); } \
                      alfajor (x < 3) { mostrame(\"grande\"); } chocolate { mostrame(\"chico\"); } \
                      alfajor (0) { mostrame(\"nunca\"); }";
        assert_eq!(run(source).unwrap(), "grande\nchico\n");
    }

    #[test]
    fn truthiness_of_conditions() {
        let source = "alfajor (\"\") { mostrame(1); } alfajor (\"a\") { mostrame(2); } \
                      caramelo n; alfajor (n) { mostrame(3); } alfajor (n == n) { mostrame(4); }";
        assert_eq!(run(source).unwrap(), "2\n4\n");
    }

    #[test]
    fn printing_values() {
        let source = "caramelo n; mostrame(n); mostrame(\"hola\" + 1); mostrame(1 < 2); mostrame(7 / 2);";
        assert_eq!(run(source).unwrap(), "null\nhola1\ntrue\n3.5\n");
    }

    #[test]
    fn undeclared_read_is_a_runtime_error() {
        let err = run("mostrame(y);").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Runtime);
        assert_eq!(err.message, "Variable 'y' no declarada");
    }

    #[test]
    fn undeclared_assignment_and_call_at_runtime() {
        let err = run("y = 1;").unwrap_err();
        assert_eq!(err.message, "Variable 'y' no declarada");

        let err = run("g();").unwrap_err();
        assert_eq!(err.message, "Función 'g' no declarada");

        let err = run("caramelo g = 1; g();").unwrap_err();
        assert_eq!(err.message, "'g' no es una función");

        let err = run("torta g() { } mostrame(g);").unwrap_err();
        assert_eq!(err.message, "'g' es una función, no una variable");
    }

    #[test]
    fn redeclaration_overwrites_at_runtime() {
        assert_eq!(run("caramelo x = 1; caramelo x = 2; mostrame(x);").unwrap(), "2\n");
    }

    #[test]
    fn arguments_bind_positionally() {
        let source = "torta f(a, b) { mostrame(a); mostrame(b); } f(1); f(1, 2, 3);";
        assert_eq!(run(source).unwrap(), "1\nnull\n1\n2\n");
    }

    #[test]
    fn parameters_do_not_outlive_the_call() {
        let source = "caramelo a = \"afuera\"; torta f(a) { mostrame(a); } f(\"adentro\"); mostrame(a);";
        assert_eq!(run(source).unwrap(), "adentro\nafuera\n");

        let err = run("torta f(p) { } f(1); mostrame(p);").unwrap_err();
        assert_eq!(err.message, "Variable 'p' no declarada");
    }

    #[test]
    fn declarations_inside_blocks_leak() {
        let source = "alfajor (1) { caramelo x = 7; } mostrame(x); \
                      torta f() { caramelo y = 8; } f(); mostrame(y);";
        assert_eq!(run(source).unwrap(), "7\n8\n");
    }

    #[test]
    fn functions_see_and_update_globals() {
        let source = "caramelo total = 0; torta sumar(n) { total = total + n; } sumar(2); sumar(3); mostrame(total);";
        assert_eq!(run(source).unwrap(), "5\n");
    }

    #[test]
    fn return_value_is_recorded() {
        let interpreter = run_with("torta f() { devolveme 42; } f();", InterpreterOptions::default()).unwrap();
        assert_eq!(interpreter.return_value(), &Value::Number(42.0));
    }

    #[test]
    fn function_without_return_yields_previous_value() {
        let source = "torta uno() { devolveme 1; } torta nada() { } uno(); nada();";
        let interpreter = run_with(source, InterpreterOptions::default()).unwrap();
        assert_eq!(interpreter.return_value(), &Value::Number(1.0));
    }

    #[test]
    fn armed_return_cuts_every_later_block() {
        let source = "torta f() { devolveme 1; } f(); \
                      alfajor (1) { mostrame(\"a\"); mostrame(\"b\"); } \
                      mostrame(\"c\");";
        assert_eq!(run(source).unwrap(), "a\nc\n");
    }

    #[test]
    fn top_level_return_does_not_stop_the_program() {
        assert_eq!(run("devolveme 1; mostrame(2);").unwrap(), "2\n");
    }

    #[test]
    fn reset_option_scopes_return_to_its_call() {
        let options = InterpreterOptions { reset_return_on_call: true };

        let source = "torta f() { devolveme 1; } f(); \
                      alfajor (1) { mostrame(\"a\"); mostrame(\"b\"); }";
        let interpreter = run_with(source, options).unwrap();
        assert_eq!(interpreter.into_output(), "a\nb\n");

        let source = "torta uno() { devolveme 1; } torta nada() { } uno(); nada();";
        let interpreter = run_with(source, options).unwrap();
        assert_eq!(interpreter.return_value(), &Value::Null);
    }

    #[test]
    fn return_stops_the_rest_of_the_body() {
        let source = "torta f() { mostrame(1); devolveme 0; mostrame(2); } f();";
        assert_eq!(run(source).unwrap(), "1\n");
    }

    #[test]
    fn runaway_recursion_is_reported() {
        let err = run("torta f() { f(); } f();").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Runtime);
        assert_eq!(err.message, "Profundidad máxima de llamadas excedida en 'f'");
    }

    #[test]
    fn deep_recursion_runs() {
        let source = "caramelo c = 0; \
                      torta f(n) { alfajor (n > 0) { c = c + 1; f(n - 1); } } \
                      f(1000); mostrame(c);";
        assert_eq!(run(source).unwrap(), "1000\n");
    }

    #[test]
    fn armed_return_cuts_loop_bodies_but_not_the_loop() {
        let source = "torta f() { devolveme 1; } f(); \
                      batido (caramelo i = 0; i < 3; i = i + 1;) { mostrame(i); mostrame(\"x\"); } \
                      mostrame(i); \
                      caramelo j = 0; \
                      gomita (j < 2) { j = j + 1; mostrame(\"nunca\"); } \
                      mostrame(j);";
        assert_eq!(run(source).unwrap(), "0\n1\n2\n3\n2\n");
    }

    #[test]
    fn long_expression_evaluates() {
        let source = format!("mostrame(1{});", " + 1".repeat(10_000));
        assert_eq!(run(&source).unwrap(), "10001\n");
    }

    #[test]
    fn runtime_error_stops_execution() {
        let err = run("mostrame(1); mostrame(nada); mostrame(2);").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Runtime);
    }
}
