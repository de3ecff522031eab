//! Expression language embedded in `{{ }}` and event handler bodies

use crate::error::ExprError;
use logos::Logos;
use sprig_vdom::Value;
use std::ops::Range;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token<'src> {
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("this")]
    This,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    Number(&'src str),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\]|\\.)*'", |lex| lex.slice())]
    String(&'src str),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("==")]
    #[token("===")]
    EqEq,
    #[token("!=")]
    #[token("!==")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Lte,
    #[token(">")]
    Gt,
    #[token(">=")]
    Gte,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Expression AST. `pos` is a byte offset into the markup source.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Value,
        pos: usize,
    },

    Variable {
        name: String,
        pos: usize,
    },

    /// The handler receiver
    This {
        pos: usize,
    },

    Member {
        object: Box<Expr>,
        property: String,
        pos: usize,
    },

    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        pos: usize,
    },

    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        pos: usize,
    },

    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        pos: usize,
    },

    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        pos: usize,
    },

    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
        pos: usize,
    },
}

impl Expr {
    pub fn pos(&self) -> usize {
        match self {
            Expr::Literal { pos, .. }
            | Expr::Variable { pos, .. }
            | Expr::This { pos }
            | Expr::Member { pos, .. }
            | Expr::Index { pos, .. }
            | Expr::Call { pos, .. }
            | Expr::Unary { pos, .. }
            | Expr::Binary { pos, .. }
            | Expr::Conditional { pos, .. } => *pos,
        }
    }
}

/// Statement of an event handler body
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Evaluated for its effect, e.g. `this.toggle(index)`
    Expression(Expr),

    /// `this.field = value`
    Assign { field: String, value: Expr, pos: usize },
}

/// Parse a single expression; `base` is the offset of `source` in the markup
pub fn parse_expression(source: &str, base: usize) -> Result<Expr, ExprError> {
    let mut parser = Parser::new(source, base)?;
    let expr = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parse a `;`-separated handler body
pub fn parse_statements(source: &str, base: usize) -> Result<Vec<Statement>, ExprError> {
    let mut parser = Parser::new(source, base)?;
    let mut statements = Vec::new();

    while !parser.is_at_end() {
        if parser.match_token(&Token::Semicolon) {
            continue;
        }
        statements.push(parser.parse_statement()?);
        if !parser.is_at_end() {
            parser.expect(&Token::Semicolon, "';'")?;
        }
    }

    Ok(statements)
}

struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    base: usize,
    source_len: usize,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, base: usize) -> Result<Self, ExprError> {
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(source);
        while let Some(token) = lexer.next() {
            match token {
                Ok(token) => tokens.push((token, lexer.span())),
                Err(()) => {
                    return Err(ExprError::LexerError {
                        pos: base + lexer.span().start,
                    })
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            base,
            source_len: source.len(),
        })
    }

    fn parse_statement(&mut self) -> Result<Statement, ExprError> {
        let start = self.peek_pos();
        let target = self.parse_expression()?;

        if !self.match_token(&Token::Assign) {
            return Ok(Statement::Expression(target));
        }

        match target {
            Expr::Member {
                object, property, ..
            } if matches!(*object, Expr::This { .. }) => {
                let value = self.parse_expression()?;
                Ok(Statement::Assign {
                    field: property,
                    value,
                    pos: start,
                })
            }
            _ => Err(ExprError::InvalidAssignment { pos: start }),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, ExprError> {
        self.parse_conditional_expression()
    }

    /// Parse ternary expression (lowest precedence, right-associative)
    fn parse_conditional_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let test = self.parse_or_expression()?;

        if !self.match_token(&Token::Question) {
            return Ok(test);
        }

        let consequent = self.parse_conditional_expression()?;
        self.expect(&Token::Colon, "':'")?;
        let alternate = self.parse_conditional_expression()?;

        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            pos: start,
        })
    }

    fn parse_or_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let mut left = self.parse_and_expression()?;

        while self.match_token(&Token::Or) {
            let right = self.parse_and_expression()?;
            left = binary(left, BinaryOp::Or, right, start);
        }

        Ok(left)
    }

    fn parse_and_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let mut left = self.parse_equality_expression()?;

        while self.match_token(&Token::And) {
            let right = self.parse_equality_expression()?;
            left = binary(left, BinaryOp::And, right, start);
        }

        Ok(left)
    }

    /// Parse equality expression (== !=)
    fn parse_equality_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let mut left = self.parse_comparison_expression()?;

        loop {
            let operator = match self.peek() {
                Some(Token::EqEq) => BinaryOp::Equals,
                Some(Token::NotEq) => BinaryOp::NotEquals,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison_expression()?;
            left = binary(left, operator, right, start);
        }

        Ok(left)
    }

    /// Parse comparison expression (< > <= >=)
    fn parse_comparison_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let mut left = self.parse_additive_expression()?;

        loop {
            let operator = match self.peek() {
                Some(Token::Lt) => BinaryOp::LessThan,
                Some(Token::Lte) => BinaryOp::LessThanOrEqual,
                Some(Token::Gt) => BinaryOp::GreaterThan,
                Some(Token::Gte) => BinaryOp::GreaterThanOrEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive_expression()?;
            left = binary(left, operator, right, start);
        }

        Ok(left)
    }

    /// Parse additive expression (+ -)
    fn parse_additive_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let operator = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            left = binary(left, operator, right, start);
        }

        Ok(left)
    }

    /// Parse multiplicative expression (* / %)
    fn parse_multiplicative_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let mut left = self.parse_unary_expression()?;

        loop {
            let operator = match self.peek() {
                Some(Token::Star) => BinaryOp::Multiply,
                Some(Token::Slash) => BinaryOp::Divide,
                Some(Token::Percent) => BinaryOp::Remainder,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary_expression()?;
            left = binary(left, operator, right, start);
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let operator = match self.peek() {
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Negate,
            _ => return self.parse_postfix_expression(),
        };
        self.advance();

        let operand = self.parse_unary_expression()?;
        Ok(Expr::Unary {
            operator,
            operand: Box::new(operand),
            pos: start,
        })
    }

    /// Parse member access, indexing and calls: `a.b[c](d)`
    fn parse_postfix_expression(&mut self) -> Result<Expr, ExprError> {
        let start = self.peek_pos();
        let mut expr = self.parse_primary_expression()?;

        loop {
            if self.match_token(&Token::Dot) {
                let property = self.expect_property_name()?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                    pos: start,
                };
            } else if self.match_token(&Token::LBracket) {
                let index = self.parse_expression()?;
                self.expect(&Token::RBracket, "']'")?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                    pos: start,
                };
            } else if self.match_token(&Token::LParen) {
                let arguments = self.parse_arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    arguments,
                    pos: start,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut arguments = Vec::new();
        while !self.check(&Token::RParen) && !self.is_at_end() {
            arguments.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen, "')'")?;
        Ok(arguments)
    }

    fn parse_primary_expression(&mut self) -> Result<Expr, ExprError> {
        let pos = self.peek_pos();
        let Some((token, _)) = self.advance().cloned() else {
            return Err(ExprError::unexpected_end(pos, "expression"));
        };

        let literal = |value: Value| -> Result<Expr, ExprError> { Ok(Expr::Literal { value, pos }) };
        match token {
            Token::True => literal(Value::Bool(true)),
            Token::False => literal(Value::Bool(false)),
            Token::Null => literal(Value::Null),
            Token::Number(n) => literal(Value::Number(n.parse().unwrap_or(f64::NAN))),
            Token::String(s) => literal(Value::String(unescape(&s[1..s.len() - 1]))),
            Token::Ident(name) => Ok(Expr::Variable {
                name: name.to_string(),
                pos,
            }),
            Token::This => Ok(Expr::This { pos }),
            Token::LParen => {
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(expr)
            }
            other => Err(ExprError::unexpected_token(
                pos,
                "expression",
                format_token(&other),
            )),
        }
    }

    // Helper methods

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<(), ExprError> {
        if self.match_token(token) {
            return Ok(());
        }
        Err(self.unexpected(expected))
    }

    fn expect_end(&self) -> Result<(), ExprError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of expression"))
        }
    }

    /// Property names may be keywords (`item.null` is unusual but valid)
    fn expect_property_name(&mut self) -> Result<String, ExprError> {
        let name = match self.peek() {
            Some(Token::Ident(name)) => name.to_string(),
            Some(Token::True) => "true".to_string(),
            Some(Token::False) => "false".to_string(),
            Some(Token::Null) => "null".to_string(),
            Some(Token::This) => "this".to_string(),
            _ => return Err(self.unexpected("property name")),
        };
        self.advance();
        Ok(name)
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        match self.peek() {
            Some(token) => ExprError::unexpected_token(self.peek_pos(), expected, format_token(token)),
            None => ExprError::unexpected_end(self.peek_pos(), expected),
        }
    }

    /// Absolute position of the next token (end of source when exhausted)
    fn peek_pos(&self) -> usize {
        let relative = self
            .tokens
            .get(self.pos)
            .map_or(self.source_len, |(_, span)| span.start);
        self.base + relative
    }
}

fn binary(left: Expr, operator: BinaryOp, right: Expr, pos: usize) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        pos,
    }
}

fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

/// Format a token for display in error messages
fn format_token(token: &Token) -> String {
    match token {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string {}", s),
        Token::Number(n) => format!("number {}", n),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::Null => "'null'".to_string(),
        Token::This => "'this'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Percent => "'%'".to_string(),
        Token::Assign => "'='".to_string(),
        Token::EqEq => "'=='".to_string(),
        Token::NotEq => "'!='".to_string(),
        Token::Lt => "'<'".to_string(),
        Token::Lte => "'<='".to_string(),
        Token::Gt => "'>'".to_string(),
        Token::Gte => "'>='".to_string(),
        Token::And => "'&&'".to_string(),
        Token::Or => "'||'".to_string(),
        Token::Bang => "'!'".to_string(),
        Token::Question => "'?'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::LBracket => "'['".to_string(),
        Token::RBracket => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Semicolon => "';'".to_string(),
    }
}
