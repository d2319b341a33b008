//! # Introduction
//!
//! quadc is the front end of a compiler for a small typed imperative
//! language.  It parses source text, resolves names through nested scopes,
//! type-checks every expression as the tree is built and lowers the result
//! to three-address code with labels and temporaries.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser (+ SymbolTable) → Stmt tree → Generator → Instructions
//! ```
//!
//! 1. [`parser`] tokenises the source and builds a checked statement tree.
//!    Labels for control flow are allocated while the tree is built.
//! 2. [`symbols`] holds the scope stack the parser resolves names against.
//! 3. [`session`] owns the label and temporary counters of one compilation.
//! 4. [`codegen`] flattens the tree into [`codegen::Instruction`]s.
//! 5. [`diagnostics`] and [`config`] serve the `quadc` binary.
//!
//! The first error of any kind aborts the compilation.

pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod parser;
pub mod session;
pub mod symbols;

use codegen::Instruction;
use parser::ast::Stmt;
use parser::parse::{CompileError, Parser};
use session::Session;

/// Parse and check `source` into a statement tree.
pub fn parse(source: &str, session: &mut Session) -> Result<Stmt, CompileError> {
    let program = Parser::for_source(source, session)?.parse()?;
    log::info!("parsed {} statements", program.count());
    Ok(program)
}

/// Compile `source` to three-address code.
pub fn compile(source: &str, session: &mut Session) -> Result<Vec<Instruction>, CompileError> {
    let program = parse(source, session)?;
    let code = codegen::generate(&program, session);
    log::info!(
        "generated {} instructions ({} labels, {} temporaries)",
        code.len(),
        session.labels_issued(),
        session.temps_issued()
    );
    Ok(code)
}
