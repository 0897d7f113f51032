pub mod token;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod value;
pub mod error;
pub mod interpreter;
mod stack;

pub use error::{Error, ErrorKind, Result};
pub use ast::AstNode;
pub use lexer::Lexer;
pub use parser::{parse, tokenize};
pub use semantic::SemanticAnalyzer;
pub use value::Value;
pub use interpreter::{Interpreter, InterpreterOptions};
