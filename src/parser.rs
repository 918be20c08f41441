use std::rc::Rc;

use tracing::debug;

use crate::ast::{BinaryOperator, BlockStatement, Expression, Program, Statement, UnaryOperator};
use crate::lexer::Lexer;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Span, Token, TokenKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Assign,      // x = y
    Equals,      // ==, !=
    LessGreater, // <, >
    Sum,         // +, -
    Product,     // *, /
    Prefix,      // -x, !x
    Call,        // f(x)
    Index,       // a[i]
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Assign => Precedence::Assign,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Subtract),
        TokenKind::Asterisk => Some(BinaryOperator::Multiply),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::Eq => Some(BinaryOperator::Equal),
        TokenKind::NotEq => Some(BinaryOperator::NotEqual),
        TokenKind::Lt => Some(BinaryOperator::Less),
        TokenKind::Gt => Some(BinaryOperator::Greater),
        _ => None,
    }
}

/// Recursive-descent statement parser with Pratt parsing for expressions.
///
/// Syntax errors are collected rather than raised; check [`Parser::errors`]
/// before evaluating the returned [`Program`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    errors: Vec<String>,

    cur_token: Token,
    peek_token: Token,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let start = Token::new(TokenKind::Eof, "", Span(0, 0));
        let mut parser = Parser {
            lexer,
            errors: Vec::new(),
            cur_token: start.clone(),
            peek_token: start,
        };

        parser.next_token();
        parser.next_token();

        parser
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.cur_token.is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.next_token();
        }

        program
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token.is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek_token.is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek_token.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur_token.kind)
    }

    fn peek_error(&mut self, kind: TokenKind) {
        let message = format!(
            "expected next token to be {kind}, got {} instead",
            self.peek_token.kind
        );
        self.error(message);
    }

    fn error(&mut self, message: String) {
        debug!(%message, start = self.cur_token.span.0, "parse error");
        self.errors.push(message);
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => {
                self.skip_semicolon();
                Some(Statement::Break)
            }
            TokenKind::Continue => {
                self.skip_semicolon();
                Some(Statement::Continue)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }

        let name = self.cur_token.literal.clone();

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Expression(expression))
    }

    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        let mut block = BlockStatement::default();
        self.next_token();

        while !self.cur_token.is(TokenKind::RBrace) {
            if self.cur_token.is(TokenKind::Eof) {
                let message = format!(
                    "expected next token to be {}, got {} instead",
                    TokenKind::RBrace,
                    TokenKind::Eof
                );
                self.error(message);
                return None;
            }

            if let Some(statement) = self.parse_statement() {
                block.statements.push(statement);
            }
            self.next_token();
        }

        Some(block)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        ensure_sufficient_stack(|| {
            let mut left = self.parse_prefix()?;

            while !self.peek_token.is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
                self.next_token();
                left = self.parse_infix(left)?;
            }

            Some(left)
        })
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token.kind {
            TokenKind::Ident => Some(Expression::Identifier(self.cur_token.literal.clone())),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::String => Some(Expression::String(self.cur_token.literal.clone())),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean(self.cur_token.is(TokenKind::True))),
            TokenKind::Bang => self.parse_prefix_expression(UnaryOperator::Not),
            TokenKind::Minus => self.parse_prefix_expression(UnaryOperator::Negate),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::LBracket => self
                .parse_expression_list(TokenKind::RBracket)
                .map(Expression::Array),
            TokenKind::LBrace => self.parse_hash_literal(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::For => self.parse_for_expression(),
            TokenKind::While => self.parse_while_expression(),
            TokenKind::Function => self.parse_function_literal(),
            kind => {
                self.error(format!("no prefix parse function for {kind}"));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.cur_token.kind {
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::LBracket => self.parse_index_expression(left),
            TokenKind::Assign => self.parse_assign_expression(left),
            kind => match binary_operator(kind) {
                Some(operator) => self.parse_infix_expression(left, operator),
                None => Some(left),
            },
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.cur_token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(value)),
            Err(_) => {
                let message = format!("could not parse {} as integer", self.cur_token.literal);
                self.error(message);
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self, operator: UnaryOperator) -> Option<Expression> {
        self.next_token();

        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression, operator: BinaryOperator) -> Option<Expression> {
        let precedence = self.cur_precedence();
        self.next_token();

        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_assign_expression(&mut self, left: Expression) -> Option<Expression> {
        let name = match left {
            Expression::Identifier(name) => name,
            other => {
                self.error(format!("invalid assignment target: {other}"));
                return None;
            }
        };
        self.next_token();

        // Lowest rather than Assign so that `a = b = 1` nests to the right.
        let value = self.parse_expression(Precedence::Lowest)?;

        Some(Expression::Assign {
            name,
            value: Box::new(value),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) || !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token.is(TokenKind::Else) {
            self.next_token();

            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }

            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_for_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LParen) || !self.expect_peek(TokenKind::Ident) {
            return None;
        }

        let variable = self.cur_token.literal.clone();

        if !self.expect_peek(TokenKind::In) {
            return None;
        }
        self.next_token();

        let iterable = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) || !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let body = self.parse_block_statement()?;

        Some(Expression::For {
            variable,
            iterable: Box::new(iterable),
            body,
        })
    }

    fn parse_while_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) || !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let body = self.parse_block_statement()?;

        Some(Expression::While {
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let body = self.parse_block_statement()?;

        Some(Expression::Function {
            parameters,
            body: Rc::new(body),
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<String>> {
        let mut parameters = Vec::new();

        if self.peek_token.is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        parameters.push(self.cur_token.literal.clone());

        while self.peek_token.is(TokenKind::Comma) {
            self.next_token();
            if self.peek_token.is(TokenKind::RParen) {
                break;
            }

            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            parameters.push(self.cur_token.literal.clone());
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.parse_expression_list(TokenKind::RParen)?;

        Some(Expression::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }

        Some(Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    /// Comma-separated expressions up to and including `end`. A trailing
    /// comma before `end` is allowed.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_token.is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token.is(TokenKind::Comma) {
            self.next_token();
            if self.peek_token.is(end) {
                break;
            }

            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let mut pairs = Vec::new();

        while !self.peek_token.is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();

            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_token.is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(Expression::Hash(pairs))
    }
}
