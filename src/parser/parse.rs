//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, token helpers, scope handling and the main parse
//! entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a single-token-lookahead recursive descent parser:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: declarations, blocks and function declarations
//! - `statements`: statement dispatch and control flow
//! - `expressions`: the expression precedence ladder
//!
//! Parsing, scope resolution and type checking happen in the same pass: the
//! symbol table is updated as declarations are read, and AST constructors
//! reject ill-typed operands the moment they are combined.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::Stmt;
use crate::parser::lexer::{LexError, Lexer, Tag, Token, TokenSource};
use crate::session::Session;
use crate::symbols::SymbolTable;
use std::fmt;

/// Classification of compile errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected token or missing punctuation
    Syntax,
    /// Duplicate declaration or undeclared name
    Declaration,
    /// Operand type mismatch
    Type,
    /// Invalid token in a call's argument list
    Argument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "Syntax",
            ErrorKind::Declaration => "Declaration",
            ErrorKind::Type => "Type",
            ErrorKind::Argument => "Argument",
        };
        f.write_str(name)
    }
}

/// Error raised by parsing or code generation. The first one aborts the
/// whole compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub kind: ErrorKind,
    pub line: usize,
    pub message: String,
}

impl CompileError {
    pub fn new(kind: ErrorKind, line: usize, message: impl Into<String>) -> Self {
        CompileError {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error at line {}: {}", self.kind, self.line, self.message)
    }
}

impl std::error::Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError {
            kind: ErrorKind::Syntax,
            line: err.line,
            message: err.message,
        }
    }
}

/// Deepest nesting of statements and parenthesised or unary expressions
/// the parser accepts.
pub const MAX_NESTING: usize = 128;

/// Recursive descent parser
pub struct Parser<'s, S: TokenSource> {
    pub(crate) source: S,
    pub(crate) lookahead: Token,
    pub(crate) symbols: SymbolTable,
    pub(crate) session: &'s mut Session,
    depth: usize,
}

impl<'s> Parser<'s, Lexer> {
    /// Parser over source text.
    pub fn for_source(source: &str, session: &'s mut Session) -> Result<Self, CompileError> {
        Parser::new(Lexer::new(source), session)
    }
}

impl<'s, S: TokenSource> Parser<'s, S> {
    pub fn new(mut source: S, session: &'s mut Session) -> Result<Self, CompileError> {
        let lookahead = source.next_token()?;
        Ok(Self {
            source,
            lookahead,
            symbols: SymbolTable::new(),
            session,
            depth: 0,
        })
    }

    /// Parse the whole input into a statement tree.
    ///
    /// `program := decls stmts`, followed by end of input.
    pub fn parse(&mut self) -> Result<Stmt, CompileError> {
        self.scoped(|p| {
            p.decls()?;
            let program = p.stmts()?;
            if !p.check(Tag::Eof) {
                return Err(p.not_a_statement());
            }
            Ok(program)
        })
    }

    // ===== Helper methods =====

    /// Line the token source has reached.
    pub(crate) fn line(&self) -> usize {
        self.source.current_line()
    }

    pub(crate) fn error(&self, kind: ErrorKind, message: impl Into<String>) -> CompileError {
        CompileError::new(kind, self.line(), message)
    }

    pub(crate) fn not_a_statement(&self) -> CompileError {
        self.error(
            ErrorKind::Syntax,
            format!("{} does not start a valid statement", self.lookahead),
        )
    }

    pub(crate) fn check(&self, tag: Tag) -> bool {
        self.lookahead.tag == tag
    }

    /// Consume the lookahead and return it.
    pub(crate) fn advance(&mut self) -> Result<Token, CompileError> {
        let next = self.source.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    /// Consume the lookahead iff it has the given tag.
    pub(crate) fn match_tag(&mut self, tag: Tag) -> Result<bool, CompileError> {
        if self.check(tag) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, tag: Tag, ctx: &str) -> Result<Token, CompileError> {
        if self.check(tag) {
            self.advance()
        } else {
            Err(self.error(
                ErrorKind::Syntax,
                format!("expected {} {}, found {}", tag, ctx, self.lookahead),
            ))
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<String, CompileError> {
        self.expect(Tag::Id, ctx).map(|token| token.lexeme)
    }

    /// Run `f` inside a fresh scope. The scope is popped whether `f`
    /// succeeds or fails.
    pub(crate) fn scoped<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        self.symbols.push_scope();
        let result = f(self);
        self.symbols.pop_scope();
        result
    }

    /// Run `f` one nesting level deeper, failing with a syntax error past
    /// [`MAX_NESTING`] instead of recursing without bound.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(
                ErrorKind::Syntax,
                format!("nesting deeper than {} levels", MAX_NESTING),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Symbol table as the parser currently sees it.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}
