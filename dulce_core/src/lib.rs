use std::fmt;
use log::{debug, info};

pub mod language;

use language::{AstNode, Interpreter, InterpreterOptions, SemanticAnalyzer, Value};

pub use language::{Error, ErrorKind, Result};

pub const SUCCESS_BANNER: &str = "Compilación y Ejecución Exitosa!";

#[derive(Debug, Clone, PartialEq)]
pub struct CompileOutput {
    pub output: String,
    pub ast: Vec<AstNode>,
    pub return_value: Value,
}

impl CompileOutput {
    pub fn ast_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.ast)
    }

    /// Banner, printed output, a separator line and optionally the AST dump.
    pub fn render(&self, show_ast: bool) -> serde_json::Result<String> {
        let mut rendered = format!("{}\n{}\n", SUCCESS_BANNER, self.output);
        if show_ast {
            rendered.push_str(&self.ast_json()?);
        }
        Ok(rendered)
    }
}

/// The single line shown for any failure.
pub fn render_error(error: impl fmt::Display) -> String {
    format!("Error: {}", error)
}

/// Lexes, parses and analyzes `source` without running it.
pub fn check_code(source: &str) -> Result<Vec<AstNode>> {
    let ast = language::parse(source)?;
    SemanticAnalyzer::new().analyze(&ast)?;
    Ok(ast)
}

/// Runs the whole pipeline. Every stage gets a fresh instance, and the
/// interpreter only starts once analysis has passed.
pub fn compile_code(source: &str, options: InterpreterOptions) -> Result<CompileOutput> {
    debug!("Compilando {} bytes de código", source.len());

    let ast = check_code(source)?;

    let mut interpreter = Interpreter::with_options(options);
    interpreter.interpret(&ast)?;

    let return_value = interpreter.return_value().clone();
    let output = interpreter.into_output();
    info!("Compilación y ejecución exitosas");

    Ok(CompileOutput {
        output,
        ast,
        return_value,
    })
}
