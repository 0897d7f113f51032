use std::fmt;
use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    #[display("LexError")]
    Lex,
    #[display("SyntaxError")]
    Syntax,
    #[display("NameError")]
    Name,
    #[display("RuntimeError")]
    Runtime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.line, &self.column) {
            (Some(line), Some(column)) => {
                write!(f, "{}: {} (línea {}, columna {})", self.kind, self.message, line, column)
            }
            (Some(line), None) => {
                write!(f, "{}: {} (línea {})", self.kind, self.message, line)
            }
            _ => {
                write!(f, "{}: {}", self.kind, self.message)
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! lexer_error {
    ($msg:expr, $line:expr, $col:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Lex,
            message: $msg.to_string(),
            line: Some($line),
            column: Some($col),
        })
    };
}

#[macro_export]
macro_rules! parser_error {
    ($msg:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Syntax,
            message: $msg.to_string(),
            line: None,
            column: None,
        })
    };
    ($msg:expr, $line:expr, $col:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Syntax,
            message: $msg.to_string(),
            line: Some($line),
            column: Some($col),
        })
    };
}

#[macro_export]
macro_rules! name_error {
    ($msg:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Name,
            message: $msg.to_string(),
            line: None,
            column: None,
        })
    };
}

#[macro_export]
macro_rules! runtime_error {
    ($msg:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Runtime,
            message: $msg.to_string(),
            line: None,
            column: None,
        })
    };
}
