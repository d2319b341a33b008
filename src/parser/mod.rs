//! Source parser and type checker
//!
//! This module turns quad source text into a checked statement tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser state, helpers and the compile error type
//! - [`declarations`], [`statements`], [`expressions`]: grammar rules
//! - [`ast`]: Tree node definitions and their checking constructors
//!
//! # Supported Language
//!
//! - Types: `int`, `float`, `bool`, one and two dimensional arrays
//! - Statements: assignment, `if`, `while`, `do-while`, `for`, blocks,
//!   function declarations and calls
//! - Expressions: arithmetic, comparison, logical, unary `-` and `!`
//!
//! Keywords may be spelled in ASCII or with their emoji forms.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one token of lookahead.
//! No external parser generator dependencies.

pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;
