//! Statement parsing implementation
//!
//! This module handles parsing of all statement forms:
//!
//! - Assignments and calls: `a = b + 1;`, `r = f(x, y);`
//! - Control flow: `if`, `while`, `do-while`, `for`
//! - Function declarations and blocks
//!
//! # Grammar
//!
//! ```text
//! stmts ::= { stmt }
//! stmt  ::= local "=" ( call | bool ) ";"
//!         | "if" "(" bool ")" stmt
//!         | "while" "(" bool ")" stmt
//!         | "do" stmt "while" "(" bool ")" ";"
//!         | "for" "(" decls local "=" ari ";" bool ";" local "=" ari ")" stmt
//!         | function
//!         | block
//! ```
//!
//! Loop labels are allocated once the loop's body has been parsed; an `if`
//! allocates its label as soon as its condition is known.

use crate::parser::ast::{Assign, IfHead, Stmt};
use crate::parser::lexer::{Tag, TokenSource};
use crate::parser::parse::{CompileError, ErrorKind, Parser};

impl<S: TokenSource> Parser<'_, S> {
    fn starts_statement(&self) -> bool {
        matches!(
            self.lookahead.tag,
            Tag::Id | Tag::If | Tag::While | Tag::Do | Tag::For | Tag::Func | Tag::LBrace
        )
    }

    /// Parse statements until the lookahead cannot start one.
    pub(crate) fn stmts(&mut self) -> Result<Stmt, CompileError> {
        let mut stmts = Vec::new();
        while self.starts_statement() {
            stmts.push(self.stmt()?);
        }
        Ok(Stmt::Seq(stmts))
    }

    /// Parse a single statement, dispatching on the lookahead.
    pub(crate) fn stmt(&mut self) -> Result<Stmt, CompileError> {
        self.nested(|p| p.dispatch())
    }

    fn dispatch(&mut self) -> Result<Stmt, CompileError> {
        match self.lookahead.tag {
            Tag::Id => self.assignment_or_call(),
            Tag::If => self.if_statement(),
            Tag::While => self.while_statement(),
            Tag::Do => self.do_while_statement(),
            Tag::For => self.for_statement(),
            Tag::Func => {
                self.advance()?;
                self.function_declaration()
            }
            Tag::LBrace => self.block().map(|(body, _)| body),
            _ => Err(self.not_a_statement()),
        }
    }

    /// `local = call ;` or `local = bool ;`
    fn assignment_or_call(&mut self) -> Result<Stmt, CompileError> {
        let target = self.local()?;
        self.expect(Tag::Assign, "after assignment target")?;

        let stmt = match self.callee() {
            Some(function) => self.call(function, target.to_string())?,
            None => {
                let value = self.boolean()?;
                Stmt::Assign(Assign::new(target, value, self.line())?)
            }
        };

        self.expect(Tag::Semicolon, "after statement")?;
        Ok(stmt)
    }

    /// Entry label of the function the lookahead refers to, if it is one.
    fn callee(&self) -> Option<String> {
        if !self.check(Tag::Id) {
            return None;
        }
        self.symbols
            .find(&self.lookahead.lexeme)
            .and_then(|symbol| symbol.signature())
            .map(|signature| signature.body_label.clone())
    }

    /// `name ( [arg {, arg}] )` where each argument is an identifier or a
    /// type keyword.
    fn call(&mut self, function: String, ret: String) -> Result<Stmt, CompileError> {
        self.advance()?;
        self.expect(Tag::LParen, "after the function name in a call")?;

        let mut args = Vec::new();
        if !self.check(Tag::RParen) {
            loop {
                match self.lookahead.tag {
                    Tag::Id | Tag::Type => args.push(self.advance()?.lexeme),
                    _ => {
                        return Err(self.error(
                            ErrorKind::Argument,
                            format!(
                                "invalid argument {} in call to '{}'",
                                self.lookahead, function
                            ),
                        ));
                    }
                }
                if !self.match_tag(Tag::Comma)? {
                    break;
                }
            }
        }

        self.expect(Tag::RParen, "to close the argument list")?;
        Ok(Stmt::FunctionCall {
            function,
            args,
            ret,
        })
    }

    /// Parse if statement
    fn if_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        self.expect(Tag::LParen, "after 'if'")?;
        let cond = self.boolean()?;
        let line = self.line();
        let head = IfHead::new(cond, self.session, line)?;
        self.expect(Tag::RParen, "after if condition")?;
        let body = self.stmt()?;
        Ok(head.with_body(body))
    }

    /// Parse while statement
    fn while_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        self.expect(Tag::LParen, "after 'while'")?;
        let cond = self.boolean()?;
        self.expect(Tag::RParen, "after while condition")?;
        let body = self.stmt()?;
        Ok(Stmt::while_loop(cond, body, self.session))
    }

    /// Parse do-while statement
    fn do_while_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        let body = self.stmt()?;
        self.expect(Tag::While, "after do-while body")?;
        self.expect(Tag::LParen, "after 'while'")?;
        let cond = self.boolean()?;
        self.expect(Tag::RParen, "after do-while condition")?;
        self.expect(Tag::Semicolon, "after do-while")?;
        Ok(Stmt::do_while(body, cond, self.session))
    }

    /// Parse for statement
    ///
    /// `for (int j = 0; ...)` declares `j` and initialises it in one go: when
    /// the loop header declared names and an `=` follows directly, the last
    /// declared name is the init target.
    fn for_statement(&mut self) -> Result<Stmt, CompileError> {
        self.advance()?;
        self.expect(Tag::LParen, "after 'for'")?;

        let declared = self.decls()?;
        let target = match declared {
            Some(name) if self.check(Tag::Assign) => self.variable(&name)?,
            _ => self.local()?,
        };
        self.expect(Tag::Assign, "in for initializer")?;
        let value = self.arithmetic()?;
        let init = Assign::new(target, value, self.line())?;
        self.expect(Tag::Semicolon, "after for initializer")?;

        let cond = self.boolean()?;
        self.expect(Tag::Semicolon, "after for condition")?;

        let target = self.local()?;
        self.expect(Tag::Assign, "in for increment")?;
        let value = self.arithmetic()?;
        let increment = Assign::new(target, value, self.line())?;
        self.expect(Tag::RParen, "after for increment")?;

        let body = self.stmt()?;
        Ok(Stmt::for_loop(init, cond, increment, body, self.session))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{Label, Stmt};
    use crate::parser::parse::{CompileError, ErrorKind, Parser};
    use crate::session::Session;
    use rstest::rstest;

    fn parse(source: &str) -> Result<Stmt, CompileError> {
        let mut session = Session::new();
        Parser::for_source(source, &mut session)?.parse()
    }

    fn first(program: Stmt) -> Stmt {
        match program {
            Stmt::Seq(mut stmts) => stmts.remove(0),
            other => panic!("Expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_if_statement() {
        let stmt = first(parse("bool c; if (c) { int x; x = 1; }").unwrap());
        match stmt {
            Stmt::If { after, body, .. } => {
                assert_eq!(after, Label(1));
                assert_eq!(body.count(), 1);
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_while_labels_follow_body() {
        let stmt = first(parse("bool c; while (c) { if (c) { c = false; } }").unwrap());
        match stmt {
            Stmt::While { before, after, .. } => {
                // the nested if claimed L1 while the body was parsed
                assert_eq!(before, Label(2));
                assert_eq!(after, Label(3));
            }
            other => panic!("Expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_do_while() {
        let stmt = first(parse("int i; do i = i + 1; while (i < 10);").unwrap());
        assert!(matches!(stmt, Stmt::DoWhile { before: Label(1), .. }));
    }

    #[test]
    fn test_do_while_requires_semicolon() {
        let err = parse("int i; do i = i + 1; while (i < 10)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_for_with_declaration() {
        let stmt = first(parse("int i; for (int j = 0; j < 1; j = j + 1) { i = j; }").unwrap());
        match stmt {
            Stmt::For { init, increment, .. } => {
                assert_eq!(init.target.to_string(), "j");
                assert_eq!(init.value.to_string(), "0");
                assert_eq!(increment.value.to_string(), "j + 1");
            }
            other => panic!("Expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_for_without_declaration() {
        assert!(parse("int k; for (k = 0; k < 3; k = k + 1) { }").is_ok());
    }

    #[test]
    fn test_call_statement() {
        let program = "int x; int y; int r; \
                       func add(int a, int b): int { int s; s = a + b; return s } \
                       r = add(x, y);";
        let Stmt::Seq(stmts) = parse(program).unwrap() else {
            panic!("Expected sequence");
        };
        match &stmts[1] {
            Stmt::FunctionCall {
                function,
                args,
                ret,
            } => {
                assert_eq!(function, "add");
                assert_eq!(args, &vec!["x".to_string(), "y".to_string()]);
                assert_eq!(ret, "r");
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_recursive_reference_resolves() {
        let program = "func f(): int { int r; r = f(); return r }";
        assert!(parse(program).is_ok());
    }

    #[test]
    fn test_invalid_call_argument() {
        let err = parse("int r; func f(): int { } r = f(1);").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Argument);
    }

    #[rstest]
    #[case("int n; while (n) { n = n - 1; }")]
    #[case("int n; while (n + 1) { }")]
    #[case("int n; do n = n - 1; while (n);")]
    #[case("int n; for (n = 3; n; n = n - 1) { }")]
    fn test_loop_conditions_are_not_type_checked(#[case] source: &str) {
        assert!(parse(source).is_ok());
    }

    #[test]
    fn test_non_function_falls_back_to_expression() {
        // `g` is a variable, so `g` on the right is an ordinary operand
        assert!(parse("int g; int r; r = g;").is_ok());
    }

    #[rstest]
    #[case("int a; a = 1", ErrorKind::Syntax)]
    #[case("int a; a 1;", ErrorKind::Syntax)]
    #[case("if (true) ;", ErrorKind::Syntax)]
    #[case("while true { }", ErrorKind::Syntax)]
    #[case("b = 1;", ErrorKind::Declaration)]
    #[case("bool f; int n; f = n;", ErrorKind::Type)]
    #[case("int n; if (n) { }", ErrorKind::Type)]
    fn test_statement_errors(#[case] source: &str, #[case] kind: ErrorKind) {
        assert_eq!(parse(source).unwrap_err().kind, kind);
    }
}
