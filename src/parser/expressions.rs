//! Expression parsing implementation
//!
//! This module parses expressions with one method per precedence level.
//! Each level folds left-associatively and builds its nodes through the
//! checking constructors in [`ast`](crate::parser::ast), so a type error is
//! reported at the operator that caused it.
//!
//! # Grammar
//!
//! ```text
//! bool   ::= join { "||" join }
//! join   ::= equality { "&&" equality }
//! equality ::= rel { ( "==" | "!=" ) rel }
//! rel    ::= ari { ( "<" | "<=" | ">" | ">=" ) ari }
//! ari    ::= term { ( "+" | "-" ) term }
//! term   ::= unary { ( "*" | "/" ) unary }
//! unary  ::= ( "!" | "-" ) unary | factor
//! factor ::= "(" bool ")" | local | integer | float | "true" | "false"
//! local  ::= id [ "[" bool [ ":" bool ] "]" ]
//! ```
//!
//! Precedence, lowest first: `||`, `&&`, equality, comparison, `+ -`, `* /`,
//! unary.

use crate::parser::ast::{BinOp, Expr, ExprType, UnOp};
use crate::parser::lexer::{Tag, TokenSource};
use crate::parser::parse::{CompileError, ErrorKind, Parser};

impl<S: TokenSource> Parser<'_, S> {
    /// Parse a storage location: a declared variable or an array element.
    pub(crate) fn local(&mut self) -> Result<Expr, CompileError> {
        if !self.check(Tag::Id) {
            return Err(self.error(
                ErrorKind::Syntax,
                format!(
                    "expected a storage location (variable or array), found {}",
                    self.lookahead
                ),
            ));
        }
        let name = self.advance()?.lexeme;
        let ty = self.lookup(&name)?;

        if !self.match_tag(Tag::LBracket)? {
            return Ok(Expr::identifier(ty, name));
        }
        let (index_x, index_y) = self.nested(|p| {
            let index_x = p.boolean()?;
            let index_y = if p.match_tag(Tag::Colon)? {
                Some(p.boolean()?)
            } else {
                None
            };
            Ok((index_x, index_y))
        })?;
        self.expect(Tag::RBracket, "after array index")?;
        Ok(Expr::access(ty, name, index_x, index_y))
    }

    /// Identifier for an already declared `name`, without consuming input.
    pub(crate) fn variable(&self, name: &str) -> Result<Expr, CompileError> {
        let ty = self.lookup(name)?;
        Ok(Expr::identifier(ty, name))
    }

    fn lookup(&self, name: &str) -> Result<ExprType, CompileError> {
        match self.symbols.find(name) {
            Some(symbol) if symbol.is_function() => Err(self.error(
                ErrorKind::Declaration,
                format!("\"{}\" is a function, not a variable", name),
            )),
            Some(symbol) => Ok(symbol.type_name),
            None => Err(self.error(
                ErrorKind::Declaration,
                format!("variable \"{}\" not declared", name),
            )),
        }
    }

    /// Parse a full expression (logical OR level).
    pub(crate) fn boolean(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.join()?;
        while self.match_tag(Tag::Or)? {
            let right = self.join()?;
            left = Expr::logical(BinOp::Or, left, right, self.line())?;
        }
        Ok(left)
    }

    fn join(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.equality()?;
        while self.match_tag(Tag::And)? {
            let right = self.equality()?;
            left = Expr::logical(BinOp::And, left, right, self.line())?;
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.rel()?;
        loop {
            let op = match self.lookahead.tag {
                Tag::EqEq => BinOp::Eq,
                Tag::NotEq => BinOp::Ne,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.rel()?;
            left = Expr::relational(op, left, right, self.line())?;
        }
    }

    fn rel(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.arithmetic()?;
        loop {
            let op = match self.lookahead.tag {
                Tag::Lt => BinOp::Lt,
                Tag::Le => BinOp::Le,
                Tag::Gt => BinOp::Gt,
                Tag::Ge => BinOp::Ge,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.arithmetic()?;
            left = Expr::relational(op, left, right, self.line())?;
        }
    }

    /// Parse additive expressions (`+`, `-`).
    pub(crate) fn arithmetic(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.term()?;
        loop {
            let op = match self.lookahead.tag {
                Tag::Plus => BinOp::Add,
                Tag::Minus => BinOp::Sub,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.term()?;
            left = Expr::arithmetic(op, left, right, self.line())?;
        }
    }

    fn term(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.lookahead.tag {
                Tag::Star => BinOp::Mul,
                Tag::Slash => BinOp::Div,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.unary()?;
            left = Expr::arithmetic(op, left, right, self.line())?;
        }
    }

    fn unary(&mut self) -> Result<Expr, CompileError> {
        let op = match self.lookahead.tag {
            Tag::Bang => UnOp::Not,
            Tag::Minus => UnOp::Neg,
            _ => return self.factor(),
        };
        self.advance()?;
        let operand = self.nested(|p| p.unary())?;
        Expr::unary(op, operand, self.line())
    }

    fn factor(&mut self) -> Result<Expr, CompileError> {
        let ty = match self.lookahead.tag {
            Tag::LParen => {
                self.advance()?;
                let expr = self.nested(|p| p.boolean())?;
                self.expect(Tag::RParen, "to close the parenthesised expression")?;
                return Ok(expr);
            }
            Tag::Id => return self.local(),
            Tag::Integer => ExprType::Int,
            Tag::Floating => ExprType::Float,
            Tag::True | Tag::False => ExprType::Bool,
            _ => {
                return Err(self.error(
                    ErrorKind::Syntax,
                    format!("an expression is expected instead of {}", self.lookahead),
                ));
            }
        };
        let token = self.advance()?;
        Ok(Expr::constant(ty, token.lexeme))
    }
}
