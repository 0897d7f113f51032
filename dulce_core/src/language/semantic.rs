use std::collections::HashMap;
use std::rc::Rc;
use log::{debug, info, trace};
use crate::language::ast::{Assignment, AstNode, AstVisitor, FunctionDecl, VarDecl};
use crate::language::value::Value;
use crate::language::error::{Error, Result};
use crate::name_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Variable,
    Function,
}

/// Single-pass name checker. There is one table for the whole program:
/// blocks do not open scopes, so a declaration inside a branch stays
/// declared for every statement that follows it.
#[derive(Debug, Default)]
pub struct SemanticAnalyzer {
    symbols: HashMap<String, Symbol>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        SemanticAnalyzer {
            symbols: HashMap::new(),
        }
    }

    pub fn analyze(&mut self, statements: &[AstNode]) -> Result<()> {
        debug!("Análisis semántico de {} declaraciones", statements.len());

        match self.visit_all(statements) {
            Ok(()) => {
                info!("Análisis semántico exitoso, {} símbolos", self.symbols.len());
                Ok(())
            }
            Err(e) => {
                debug!("Error semántico: {}", e);
                Err(e)
            }
        }
    }

    fn visit_all(&mut self, statements: &[AstNode]) -> Result<()> {
        for statement in statements {
            statement.accept(self)?;
        }
        Ok(())
    }
}

impl AstVisitor<()> for SemanticAnalyzer {
    type Error = Error;

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<()> {
        if self.symbols.contains_key(&decl.name) {
            return name_error!(format!("Variable '{}' ya declarada", decl.name));
        }
        decl.expr.accept(self)?;
        trace!("Variable declarada: {}", decl.name);
        self.symbols.insert(decl.name.clone(), Symbol::Variable);
        Ok(())
    }

    fn visit_assignment(&mut self, assignment: &Assignment) -> Result<()> {
        if !self.symbols.contains_key(&assignment.name) {
            return name_error!(format!("Variable '{}' no declarada", assignment.name));
        }
        assignment.expr.accept(self)
    }

    /// The body is left unchecked: parameters never enter the table.
    fn visit_function_decl(&mut self, decl: &Rc<FunctionDecl>) -> Result<()> {
        if self.symbols.contains_key(&decl.name) {
            return name_error!(format!("Función '{}' ya declarada", decl.name));
        }
        trace!("Función declarada: {}({})", decl.name, decl.params.join(", "));
        self.symbols.insert(decl.name.clone(), Symbol::Function);
        Ok(())
    }

    fn visit_function_call(&mut self, name: &str, args: &[AstNode]) -> Result<()> {
        match self.symbols.get(name) {
            Some(Symbol::Function) => self.visit_all(args),
            _ => name_error!(format!("Función '{}' no declarada", name)),
        }
    }

    fn visit_if_statement(&mut self, condition: &AstNode, then_branch: &[AstNode], else_branch: &[AstNode]) -> Result<()> {
        condition.accept(self)?;
        self.visit_all(then_branch)?;
        self.visit_all(else_branch)
    }

    fn visit_while_statement(&mut self, condition: &AstNode, body: &[AstNode]) -> Result<()> {
        condition.accept(self)?;
        self.visit_all(body)
    }

    fn visit_for_statement(&mut self, initializer: &VarDecl, condition: &AstNode, increment: &Assignment, body: &[AstNode]) -> Result<()> {
        self.visit_var_decl(initializer)?;
        condition.accept(self)?;
        self.visit_assignment(increment)?;
        self.visit_all(body)
    }

    fn visit_print(&mut self, expr: &AstNode) -> Result<()> {
        expr.accept(self)
    }

    fn visit_return(&mut self, expr: &AstNode) -> Result<()> {
        expr.accept(self)
    }

    fn visit_binary_expression(&mut self, _operator: &str, left: &AstNode, right: &AstNode) -> Result<()> {
        left.accept(self)?;
        right.accept(self)
    }

    fn visit_literal(&mut self, _value: &Value) -> Result<()> {
        Ok(())
    }

    // Reads are only checked when they execute.
    fn visit_identifier(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}
