//! Declaration parsing implementation
//!
//! This module handles everything that introduces names:
//!
//! - Variable and array declarations: `int a`, `float v[10]`, `int m[2:3]`
//! - Blocks, which open a scope: `{ decls stmts [return id] }`
//! - Function declarations: `func name(params) : type block`
//!
//! # Grammar
//!
//! ```text
//! decls    ::= { type id [ "[" int [ ":" int ] "]" ] [ ";" ] }
//! block    ::= "{" decls stmts [ "return" id ] "}"
//! function ::= "func" id "(" [ decls { "," decls } ] ")" ":" type block
//! ```

use crate::parser::ast::{ExprType, Stmt};
use crate::parser::lexer::{Tag, TokenSource};
use crate::parser::parse::{CompileError, ErrorKind, Parser};
use crate::symbols::{FunctionSignature, Symbol};

/// One parsed `type id [bounds]` before it enters the symbol table.
#[derive(Debug)]
pub(crate) struct Declaration {
    name: String,
    type_name: ExprType,
    val_x: Option<u32>,
    val_y: Option<u32>,
}

impl<S: TokenSource> Parser<'_, S> {
    /// Parse a run of declarations into the active scope. Returns the last
    /// name declared, if any.
    pub(crate) fn decls(&mut self) -> Result<Option<String>, CompileError> {
        let mut last = None;
        while self.check(Tag::Type) {
            let decl = self.declaration()?;
            last = Some(decl.name.clone());
            self.declare(decl)?;
            self.match_tag(Tag::Semicolon)?;
        }
        Ok(last)
    }

    fn declaration(&mut self) -> Result<Declaration, CompileError> {
        let type_token = self.expect(Tag::Type, "in declaration")?;
        let type_name = ExprType::from_name(&type_token.lexeme).ok_or_else(|| {
            self.error(
                ErrorKind::Syntax,
                format!("unknown type '{}'", type_token.lexeme),
            )
        })?;
        let name = self.expect_identifier("after type name")?;

        let mut val_x = None;
        let mut val_y = None;
        if self.match_tag(Tag::LBracket)? {
            val_x = Some(self.array_bound()?);
            if self.match_tag(Tag::Colon)? {
                val_y = Some(self.array_bound()?);
            }
            self.expect(Tag::RBracket, "after array bounds")?;
        }

        Ok(Declaration {
            name,
            type_name,
            val_x,
            val_y,
        })
    }

    fn array_bound(&mut self) -> Result<u32, CompileError> {
        if !self.check(Tag::Integer) {
            return Err(self.error(
                ErrorKind::Syntax,
                "array bounds must be integer values",
            ));
        }
        let bound = self.lookahead.lexeme.parse::<u32>().map_err(|_| {
            self.error(
                ErrorKind::Syntax,
                format!("array bound {} is out of range", self.lookahead.lexeme),
            )
        })?;
        self.advance()?;
        Ok(bound)
    }

    /// Enter a declaration into the active scope.
    fn declare(&mut self, decl: Declaration) -> Result<(), CompileError> {
        let symbol = match decl.val_x {
            Some(val_x) => Symbol::array(&decl.name, decl.type_name, val_x, decl.val_y),
            None => Symbol::variable(&decl.name, decl.type_name),
        };
        if !self.symbols.insert(&decl.name, symbol) {
            return Err(self.error(
                ErrorKind::Declaration,
                format!("variable \"{}\" already defined", decl.name),
            ));
        }
        Ok(())
    }

    /// Parse `{ decls stmts [return id] }` in its own scope. Returns the
    /// statements and the name after `return`, if present.
    pub(crate) fn block(&mut self) -> Result<(Stmt, Option<String>), CompileError> {
        self.expect(Tag::LBrace, "to open a block")?;
        self.scoped(|p| {
            p.decls()?;
            let body = p.stmts()?;
            let ret = if p.match_tag(Tag::Return)? {
                Some(p.expect_identifier("after 'return'")?)
            } else {
                None
            };
            if !p.check(Tag::RBrace) {
                if p.check(Tag::Eof) {
                    return Err(p.error(ErrorKind::Syntax, "expected '}' to close the block"));
                }
                return Err(p.not_a_statement());
            }
            p.advance()?;
            Ok((body, ret))
        })
    }

    /// Parse a function declaration; `func` has been consumed.
    ///
    /// The function symbol enters the enclosing scope once the signature is
    /// known, so the body and every later statement can name it.  Parameters
    /// are declared in a scope of their own around the body block.
    pub(crate) fn function_declaration(&mut self) -> Result<Stmt, CompileError> {
        if !self.check(Tag::Id) {
            return Err(self.error(
                ErrorKind::Syntax,
                format!(
                    "expected an identifier for the function name, found {}",
                    self.lookahead
                ),
            ));
        }
        let name = self.advance()?.lexeme;
        self.expect(Tag::LParen, "after the function name")?;

        let mut params = Vec::new();
        if !self.check(Tag::RParen) {
            loop {
                while self.check(Tag::Type) {
                    params.push(self.declaration()?);
                }
                if !self.match_tag(Tag::Comma)? {
                    break;
                }
            }
        }

        self.expect(Tag::RParen, "to close the parameter list")?;
        self.expect(Tag::Colon, "before the function return type")?;
        if !self.check(Tag::Type) {
            return Err(self.error(
                ErrorKind::Syntax,
                format!("expected a return type, found {}", self.lookahead),
            ));
        }
        let type_token = self.advance()?;
        let return_type = ExprType::from_name(&type_token.lexeme).ok_or_else(|| {
            self.error(
                ErrorKind::Syntax,
                format!("unknown return type '{}'", type_token.lexeme),
            )
        })?;

        // Parameter lists are left empty; parameters are only visible as
        // ordinary names inside the function.
        let signature = FunctionSignature {
            return_type,
            param_types: Vec::new(),
            param_names: Vec::new(),
            body_label: name.clone(),
            ret: None,
        };
        if !self.symbols.insert(&name, Symbol::function(&name, signature)) {
            return Err(self.error(
                ErrorKind::Declaration,
                format!("function \"{}\" already defined", name),
            ));
        }
        log::debug!("registered function '{}' returning {}", name, return_type);

        let (body, ret) = self.scoped(|p| {
            for param in params {
                p.declare(param)?;
            }
            p.block()
        })?;

        if let Some(signature) = self.symbols.find_mut(&name).and_then(|s| s.signature_mut()) {
            signature.ret = ret.clone();
        }

        Ok(Stmt::Function {
            name,
            return_type,
            param_types: Vec::new(),
            param_names: Vec::new(),
            body: Box::new(body),
            ret,
        })
    }
}
