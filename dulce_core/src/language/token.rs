use std::fmt;
use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    #[display("KEYWORD")]
    Keyword,        // caramelo, alfajor, ...
    #[display("IDENTIFIER")]
    Identifier,     // Nombres
    #[display("NUMBER")]
    Number,         // 1234...
    #[display("STRING")]
    String,         // "..."
    #[display("OPERATOR")]
    Operator,       // + - * / < > ==
    #[display("EQUALS")]
    Equals,         // =
    #[display("SEMICOLON")]
    Semicolon,      // ;
    #[display("LPAREN")]
    LParen,         // (
    #[display("RPAREN")]
    RParen,         // )
    #[display("LBRACE")]
    LBrace,         // {
    #[display("RBRACE")]
    RBrace,         // }
    #[display("COMMA")]
    Comma,          // ,
}

/// The eight keyword roles and their surface spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Var,
    If,
    Else,
    While,
    For,
    Function,
    Print,
    Return,
}

impl Keyword {
    pub const ALL: [Keyword; 8] = [
        Keyword::Var,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::For,
        Keyword::Function,
        Keyword::Print,
        Keyword::Return,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Var => "caramelo",
            Keyword::If => "alfajor",
            Keyword::Else => "chocolate",
            Keyword::While => "gomita",
            Keyword::For => "batido",
            Keyword::Function => "torta",
            Keyword::Print => "mostrame",
            Keyword::Return => "devolveme",
        }
    }

    pub fn lookup(word: &str) -> Option<Keyword> {
        Keyword::ALL.into_iter().find(|k| k.as_str() == word)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword.as_str()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "{}(\"{}\")", self.kind, self.text),
            TokenKind::Keyword | TokenKind::Identifier | TokenKind::Number | TokenKind::Operator => {
                write!(f, "{}({})", self.kind, self.text)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}
