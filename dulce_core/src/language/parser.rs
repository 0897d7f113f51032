use std::rc::Rc;
use log::{debug, info, trace};
use crate::language::token::{Keyword, Token, TokenKind};
use crate::language::ast::{Assignment, AstNode, FunctionDecl, VarDecl};
use crate::language::lexer::Lexer;
use crate::language::stack;
use crate::language::value::Value;
use crate::language::error::{Error, ErrorKind, Result};
use crate::parser_error;

const END_OF_INPUT: &str = "fin de la entrada";

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            current: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Vec<AstNode>> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let statement = self.statement()?;
            trace!("Declaración analizada: {}", statement.kind_name());
            statements.push(statement);
        }

        Ok(statements)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_some_and(|token| token.is_keyword(keyword))
    }

    /// Advances past the current token if it has the expected kind and text.
    /// `None` accepts anything.
    fn consume(&mut self, kind: Option<TokenKind>, value: Option<&str>) -> Result<&Token> {
        let Some(token) = self.tokens.get(self.current) else {
            let expected = match (kind, value) {
                (_, Some(value)) => format!("el valor del token {}", value),
                (Some(kind), None) => format!("el tipo de token {}", kind),
                (None, None) => "un token".to_string(),
            };
            return parser_error!(format!("Se esperaba {}, pero se encontró {}", expected, END_OF_INPUT));
        };

        if let Some(kind) = kind {
            if token.kind != kind {
                return parser_error!(
                    format!("Se esperaba el tipo de token {}, pero se encontró {}", kind, token.kind),
                    token.line,
                    token.column
                );
            }
        }

        if let Some(value) = value {
            if token.text != value {
                return parser_error!(
                    format!("Se esperaba el valor del token {}, pero se encontró {}", value, token.text),
                    token.line,
                    token.column
                );
            }
        }

        self.current += 1;
        Ok(token)
    }

    fn consume_kind(&mut self, kind: TokenKind) -> Result<&Token> {
        self.consume(Some(kind), None)
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<&Token> {
        self.consume(Some(TokenKind::Keyword), Some(keyword.as_str()))
    }

    fn identifier(&mut self) -> Result<String> {
        Ok(self.consume_kind(TokenKind::Identifier)?.text.clone())
    }

    /// `{ statement* }`
    fn block(&mut self) -> Result<Vec<AstNode>> {
        self.consume_kind(TokenKind::LBrace)?;

        let mut statements = Vec::new();

        loop {
            match self.peek() {
                Some(token) if token.kind == TokenKind::RBrace => break,
                Some(_) => statements.push(self.statement()?),
                None => {
                    return parser_error!(format!(
                        "Se esperaba el tipo de token {}, pero se encontró {}",
                        TokenKind::RBrace,
                        END_OF_INPUT
                    ));
                }
            }
        }

        self.consume_kind(TokenKind::RBrace)?;

        Ok(statements)
    }

    fn statement(&mut self) -> Result<AstNode> {
        stack::grow(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> Result<AstNode> {
        let Some(token) = self.peek() else {
            return parser_error!(format!("Declaración desconocida: {}", END_OF_INPUT));
        };

        match token.kind {
            TokenKind::Keyword => match Keyword::lookup(&token.text) {
                Some(Keyword::Var) => Ok(AstNode::VarDecl(self.var_declaration()?)),
                Some(Keyword::If) => self.if_statement(),
                Some(Keyword::While) => self.while_statement(),
                Some(Keyword::For) => self.for_statement(),
                Some(Keyword::Function) => self.function_declaration(),
                Some(Keyword::Print) => self.print_statement(),
                Some(Keyword::Return) => self.return_statement(),
                Some(Keyword::Else) | None => {
                    parser_error!(format!("Declaración desconocida: {}", token.text), token.line, token.column)
                }
            },
            TokenKind::Identifier => self.assignment_or_call(),
            _ => parser_error!(format!("Declaración desconocida: {}", token.text), token.line, token.column),
        }
    }

    fn var_declaration(&mut self) -> Result<VarDecl> {
        self.consume_keyword(Keyword::Var)?;
        let name = self.identifier()?;

        let expr = if self.check(TokenKind::Equals) {
            self.consume_kind(TokenKind::Equals)?;
            self.expression()?
        } else {
            AstNode::Literal { value: Value::Null }
        };

        self.consume_kind(TokenKind::Semicolon)?;

        Ok(VarDecl {
            name,
            expr: Box::new(expr),
        })
    }

    fn if_statement(&mut self) -> Result<AstNode> {
        self.consume_keyword(Keyword::If)?;
        self.consume_kind(TokenKind::LParen)?;
        let condition = self.expression()?;
        self.consume_kind(TokenKind::RParen)?;

        let then_branch = self.block()?;

        let else_branch = if self.check_keyword(Keyword::Else) {
            self.consume_keyword(Keyword::Else)?;
            self.block()?
        } else {
            Vec::new()
        };

        Ok(AstNode::IfStatement {
            condition: Box::new(condition),
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<AstNode> {
        self.consume_keyword(Keyword::While)?;
        self.consume_kind(TokenKind::LParen)?;
        let condition = self.binary_expression()?;
        self.consume_kind(TokenKind::RParen)?;

        let body = self.block()?;

        Ok(AstNode::WhileStatement {
            condition: Box::new(condition),
            body,
        })
    }

    /// `batido (caramelo i = 0; i < n; i = i + 1;) { ... }`. The initializer
    /// must be a declaration, and both it and the increment own their `;`.
    fn for_statement(&mut self) -> Result<AstNode> {
        self.consume_keyword(Keyword::For)?;
        self.consume_kind(TokenKind::LParen)?;
        let initializer = self.var_declaration()?;
        let condition = self.expression()?;
        self.consume_kind(TokenKind::Semicolon)?;
        let increment = self.assignment()?;
        self.consume_kind(TokenKind::RParen)?;

        let body = self.block()?;

        Ok(AstNode::ForStatement {
            initializer,
            condition: Box::new(condition),
            increment,
            body,
        })
    }

    fn function_declaration(&mut self) -> Result<AstNode> {
        self.consume_keyword(Keyword::Function)?;
        let name = self.identifier()?;
        self.consume_kind(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            params.push(self.identifier()?);
            while self.check(TokenKind::Comma) {
                self.consume_kind(TokenKind::Comma)?;
                params.push(self.identifier()?);
            }
        }

        self.consume_kind(TokenKind::RParen)?;

        let body = self.block()?;

        Ok(AstNode::FunctionDecl(Rc::new(FunctionDecl { name, params, body })))
    }

    fn assignment_or_call(&mut self) -> Result<AstNode> {
        let name = self.identifier()?;

        if self.check(TokenKind::Equals) {
            self.consume_kind(TokenKind::Equals)?;
            let expr = self.expression()?;
            self.consume_kind(TokenKind::Semicolon)?;
            Ok(AstNode::Assignment(Assignment {
                name,
                expr: Box::new(expr),
            }))
        } else if self.check(TokenKind::LParen) {
            self.consume_kind(TokenKind::LParen)?;
            let args = self.arguments()?;
            self.consume_kind(TokenKind::RParen)?;
            self.consume_kind(TokenKind::Semicolon)?;
            Ok(AstNode::FunctionCall { name, args })
        } else {
            match self.peek() {
                Some(token) => parser_error!(format!("Expresión desconocida: {}", name), token.line, token.column),
                None => parser_error!(format!("Expresión desconocida: {}", name)),
            }
        }
    }

    fn assignment(&mut self) -> Result<Assignment> {
        let name = self.identifier()?;
        self.consume_kind(TokenKind::Equals)?;
        let expr = self.expression()?;
        self.consume_kind(TokenKind::Semicolon)?;

        Ok(Assignment {
            name,
            expr: Box::new(expr),
        })
    }

    fn arguments(&mut self) -> Result<Vec<AstNode>> {
        let mut args = Vec::new();

        if !self.check(TokenKind::RParen) {
            args.push(self.expression()?);

            while self.check(TokenKind::Comma) {
                self.consume_kind(TokenKind::Comma)?;
                args.push(self.expression()?);
            }
        }

        Ok(args)
    }

    fn print_statement(&mut self) -> Result<AstNode> {
        self.consume_keyword(Keyword::Print)?;
        self.consume_kind(TokenKind::LParen)?;
        let expr = self.expression()?;
        self.consume_kind(TokenKind::RParen)?;
        self.consume_kind(TokenKind::Semicolon)?;

        Ok(AstNode::Print { expr: Box::new(expr) })
    }

    fn return_statement(&mut self) -> Result<AstNode> {
        self.consume_keyword(Keyword::Return)?;
        let expr = self.expression()?;
        self.consume_kind(TokenKind::Semicolon)?;

        Ok(AstNode::Return { expr: Box::new(expr) })
    }

    fn expression(&mut self) -> Result<AstNode> {
        stack::grow(|| self.binary_expression())
    }

    /// All operators share one precedence level and associate to the left.
    fn binary_expression(&mut self) -> Result<AstNode> {
        let mut expr = self.primary()?;

        while self.check(TokenKind::Operator) {
            let operator = self.consume_kind(TokenKind::Operator)?.text.clone();
            let right = self.primary()?;

            expr = AstNode::BinaryExpression {
                operator,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn primary(&mut self) -> Result<AstNode> {
        let token = match self.consume(None, None) {
            Ok(token) => token.clone(),
            Err(_) => return parser_error!(format!("Expresión primaria desconocida: {}", END_OF_INPUT)),
        };

        match token.kind {
            TokenKind::Number => {
                let value = token.text.parse::<f64>().map_err(|_| Error {
                    kind: ErrorKind::Syntax,
                    message: format!("Número inválido: {}", token.text),
                    line: Some(token.line),
                    column: Some(token.column),
                })?;
                Ok(AstNode::Literal { value: Value::Number(value) })
            }
            TokenKind::String => Ok(AstNode::Literal { value: Value::String(token.text) }),
            TokenKind::Identifier => Ok(AstNode::Identifier { name: token.text }),
            TokenKind::LParen => {
                let expr = self.expression()?;
                self.consume_kind(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => parser_error!(
                format!("Expresión primaria desconocida: {}", token.text),
                token.line,
                token.column
            ),
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    match lexer.tokenize() {
        Ok(tokens) => {
            info!("Tokenización exitosa, {} tokens", tokens.len());
            Ok(tokens)
        },
        Err(e) => {
            debug!("Error de tokenización: {}", e);
            Err(e)
        }
    }
}

pub fn parse(input: &str) -> Result<Vec<AstNode>> {
    debug!("Comenzando el análisis sintáctico...");

    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);

    match parser.parse() {
        Ok(ast) => {
            info!("Análisis sintáctico exitoso, {} declaraciones", ast.len());
            Ok(ast)
        },
        Err(e) => {
            debug!("Error de análisis sintáctico: {}", e);
            Err(e)
        }
    }
}
