use log::trace;
use crate::language::token::{Keyword, Token, TokenKind};
use crate::language::error::Result;
use crate::lexer_error;

pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    pub fn consume(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.consume();
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            if accept(ch) {
                text.push(ch);
                self.consume();
            } else {
                break;
            }
        }

        text
    }

    pub fn read_word(&mut self) -> String {
        self.read_while(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    pub fn read_number(&mut self) -> String {
        self.read_while(|ch| ch.is_ascii_digit())
    }

    /// Reads the raw text between two double quotes. There are no escape sequences.
    pub fn read_string(&mut self, line: usize, column: usize) -> Result<String> {
        self.consume();

        let mut string = String::new();

        while let Some(ch) = self.consume() {
            if ch == '"' {
                return Ok(string);
            }
            string.push(ch);
        }

        lexer_error!("Cadena sin cerrar", line, column)
    }

    /// Returns `Ok(None)` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let token = match ch {
            _ if ch.is_ascii_alphabetic() || ch == '_' => {
                let word = self.read_word();
                let kind = if Keyword::lookup(&word).is_some() {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                Token::new(kind, word, line, column)
            }
            '0'..='9' => {
                let digits = self.read_number();
                Token::new(TokenKind::Number, digits, line, column)
            }
            '"' => {
                let text = self.read_string(line, column)?;
                Token::new(TokenKind::String, text, line, column)
            }
            '=' if self.peek_next() == Some('=') => {
                self.consume();
                self.consume();
                Token::new(TokenKind::Operator, "==", line, column)
            }
            '=' | ';' | '(' | ')' | '{' | '}' | ',' => {
                self.consume();
                let kind = match ch {
                    '=' => TokenKind::Equals,
                    ';' => TokenKind::Semicolon,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    _ => TokenKind::Comma,
                };
                Token::new(kind, ch.to_string(), line, column)
            }
            '+' | '-' | '*' | '/' | '<' | '>' => {
                self.consume();
                Token::new(TokenKind::Operator, ch.to_string(), line, column)
            }
            _ => return lexer_error!(format!("Carácter desconocido: {}", ch), line, column),
        };

        trace!("Token {} @{}:{}", token, line, column);
        Ok(Some(token))
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::error::ErrorKind;

    fn kinds_and_text(input: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn var_declaration_tokens() {
        let tokens = kinds_and_text("caramelo x = 5;");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "caramelo".to_string()),
                (TokenKind::Identifier, "x".to_string()),
                (TokenKind::Equals, "=".to_string()),
                (TokenKind::Number, "5".to_string()),
                (TokenKind::Semicolon, ";".to_string()),
            ]
        );
    }

    #[test]
    fn every_keyword_is_recognized() {
        let source = "caramelo alfajor chocolate gomita batido torta mostrame devolveme";
        let tokens = kinds_and_text(source);
        assert_eq!(tokens.len(), 8);
        assert!(tokens.iter().all(|(kind, _)| *kind == TokenKind::Keyword));
    }

    #[test]
    fn keyword_prefix_is_an_identifier() {
        let tokens = kinds_and_text("caramelos _torta2");
        assert_eq!(tokens[0], (TokenKind::Identifier, "caramelos".to_string()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "_torta2".to_string()));
    }

    #[test]
    fn double_equals_wins_over_equals() {
        let tokens = kinds_and_text("a == b = c");
        assert_eq!(tokens[1], (TokenKind::Operator, "==".to_string()));
        assert_eq!(tokens[3], (TokenKind::Equals, "=".to_string()));
    }

    #[test]
    fn strings_keep_raw_content() {
        let tokens = kinds_and_text(r#"mostrame("hola \n mundo");"#);
        assert_eq!(tokens[2], (TokenKind::String, r"hola \n mundo".to_string()));
        assert_eq!(tokens[3].0, TokenKind::RParen);
    }

    #[test]
    fn number_followed_by_letters_splits() {
        let tokens = kinds_and_text("12ab");
        assert_eq!(tokens[0], (TokenKind::Number, "12".to_string()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "ab".to_string()));
    }

    #[test]
    fn operators_and_punctuation() {
        let tokens = kinds_and_text("+-*/<>(){},;");
        let kinds: Vec<TokenKind> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn positions_are_tracked() {
        let tokens = Lexer::new("caramelo x;\n  mostrame(x);").tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 10));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 3));
    }

    #[test]
    fn unknown_character_fails() {
        let err = Lexer::new("caramelo x = 5 % 2;").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert_eq!(err.message, "Carácter desconocido: %");
        assert_eq!((err.line, err.column), (Some(1), Some(16)));
    }

    #[test]
    fn non_ascii_letters_are_rejected() {
        let err = Lexer::new("caramelo año = 1;").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
    }

    #[test]
    fn unterminated_string_fails() {
        let err = Lexer::new("mostrame(\"hola);").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert_eq!(err.message, "Cadena sin cerrar");
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(Lexer::new("  \n\t ").tokenize().unwrap().is_empty());
    }
}
