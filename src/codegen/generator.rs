//! Three-address code generation
//!
//! The generator walks a checked statement tree and flattens every
//! expression into a sequence of `tN = a op b` steps.  Labels were fixed
//! when the tree was built; temporaries come from the same [`Session`] and
//! are allocated here, in emission order.

use crate::codegen::instruction::Instruction;
use crate::parser::ast::{Assign, Expr, ExprKind, Stmt};
use crate::session::Session;

pub struct Generator<'s> {
    session: &'s mut Session,
    code: Vec<Instruction>,
}

impl<'s> Generator<'s> {
    pub fn new(session: &'s mut Session) -> Self {
        Generator {
            session,
            code: Vec::new(),
        }
    }

    /// Instructions emitted so far.
    pub fn into_code(self) -> Vec<Instruction> {
        self.code
    }

    fn emit(&mut self, instruction: Instruction) {
        log::trace!("emit {}", instruction);
        self.code.push(instruction);
    }

    /// Reduce `expr` to a simple operand, emitting the steps that compute it.
    ///
    /// Constants, identifiers and temporaries come back as they are and emit
    /// nothing.
    pub fn rvalue(&mut self, expr: &Expr) -> Expr {
        let value = match &expr.kind {
            ExprKind::Constant(_) | ExprKind::Identifier(_) | ExprKind::Temp(_) => {
                return expr.clone();
            }
            ExprKind::Logical { op, left, right }
            | ExprKind::Relational { op, left, right }
            | ExprKind::Arithmetic { op, left, right } => {
                let left = self.rvalue(left);
                let right = self.rvalue(right);
                format!("{} {} {}", left, op.symbol(), right)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.rvalue(operand);
                format!("{}{}", op.symbol(), operand)
            }
            ExprKind::Access {
                name,
                index_x,
                index_y,
            } => {
                let index_x = self.rvalue(index_x);
                match index_y {
                    Some(index_y) => {
                        let index_y = self.rvalue(index_y);
                        format!("{}[{}:{}]", name, index_x, index_y)
                    }
                    None => format!("{}[{}]", name, index_x),
                }
            }
        };

        let temp = Expr::temp(expr.ty, self.session.new_temp());
        self.emit(Instruction::Assign {
            target: temp.to_string(),
            value,
        });
        temp
    }

    /// Storage location for an assignment target.
    pub fn lvalue(&mut self, expr: &Expr) -> Expr {
        expr.clone()
    }

    fn assign(&mut self, assign: &Assign) {
        let target = self.lvalue(&assign.target);
        let value = self.rvalue(&assign.value);
        self.emit(Instruction::Assign {
            target: target.to_string(),
            value: value.to_string(),
        });
    }

    pub fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Seq(stmts) => {
                for stmt in stmts {
                    self.gen_stmt(stmt);
                }
            }
            Stmt::Assign(assign) => self.assign(assign),
            Stmt::If { cond, body, after } => {
                let cond = self.rvalue(cond);
                self.emit(Instruction::IfFalse {
                    cond: cond.to_string(),
                    target: *after,
                });
                self.gen_stmt(body);
                self.emit(Instruction::Label(*after));
            }
            Stmt::While {
                cond,
                body,
                before,
                after,
            } => {
                self.emit(Instruction::Label(*before));
                let cond = self.rvalue(cond);
                self.emit(Instruction::IfFalse {
                    cond: cond.to_string(),
                    target: *after,
                });
                self.gen_stmt(body);
                self.emit(Instruction::Goto(*before));
                self.emit(Instruction::Label(*after));
            }
            Stmt::DoWhile { body, cond, before } => {
                self.emit(Instruction::Label(*before));
                self.gen_stmt(body);
                let cond = self.rvalue(cond);
                self.emit(Instruction::IfTrue {
                    cond: cond.to_string(),
                    target: *before,
                });
            }
            Stmt::For {
                init,
                cond,
                increment,
                body,
                before,
                after,
            } => {
                self.assign(init);
                self.emit(Instruction::Label(*before));
                let cond = self.rvalue(cond);
                self.emit(Instruction::IfFalse {
                    cond: cond.to_string(),
                    target: *after,
                });
                self.gen_stmt(body);
                self.assign(increment);
                self.emit(Instruction::Goto(*before));
                self.emit(Instruction::Label(*after));
            }
            Stmt::Function { name, body, ret, .. } => {
                self.emit(Instruction::FunctionLabel(name.clone()));
                self.gen_stmt(body);
                self.emit(Instruction::Return(ret.clone()));
            }
            Stmt::FunctionCall { function, args, ret } => {
                for arg in args {
                    self.emit(Instruction::Param(arg.clone()));
                }
                self.emit(Instruction::Call {
                    ret: ret.clone(),
                    function: function.clone(),
                });
            }
        }
    }
}

/// Generate code for a whole program.
pub fn generate(program: &Stmt, session: &mut Session) -> Vec<Instruction> {
    let mut generator = Generator::new(session);
    generator.gen_stmt(program);
    generator.into_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::instruction::listing;
    use crate::parser::ast::{BinOp, ExprType, Label, Temp, UnOp};
    use crate::parser::parse::Parser;

    fn compile(source: &str) -> String {
        let mut session = Session::new();
        let program = Parser::for_source(source, &mut session)
            .and_then(|mut parser| parser.parse())
            .unwrap();
        listing(&generate(&program, &mut session))
    }

    fn int(name: &str) -> Expr {
        Expr::identifier(ExprType::Int, name)
    }

    #[test]
    fn test_rvalue_of_simple_operands_emits_nothing() {
        let mut session = Session::new();
        let mut generator = Generator::new(&mut session);
        let a = int("a");
        assert_eq!(generator.rvalue(&a), a);
        let t = Expr::temp(ExprType::Int, Temp(9));
        assert_eq!(generator.rvalue(&t), t);
        assert!(generator.into_code().is_empty());
    }

    #[test]
    fn test_rvalue_flattens_nested_expressions() {
        let mut session = Session::new();
        let sum = Expr::arithmetic(BinOp::Add, int("a"), int("b"), 1).unwrap();
        let neg = Expr::unary(UnOp::Neg, sum, 1).unwrap();
        let product = Expr::arithmetic(BinOp::Mul, neg, int("c"), 1).unwrap();

        let mut generator = Generator::new(&mut session);
        let result = generator.rvalue(&product);
        assert_eq!(result.kind, ExprKind::Temp(Temp(3)));
        assert_eq!(result.ty, ExprType::Int);
        assert_eq!(
            listing(&generator.into_code()),
            "\tt1 = a + b\n\tt2 = -t1\n\tt3 = t2 * c"
        );
    }

    #[test]
    fn test_lvalue_is_unchanged() {
        let mut session = Session::new();
        let one = Expr::constant(ExprType::Int, "1");
        let index = Expr::arithmetic(BinOp::Add, int("i"), one, 1).unwrap();
        let target = Expr::access(ExprType::Int, "v", index, None);
        let mut generator = Generator::new(&mut session);
        assert_eq!(generator.lvalue(&target), target);
        assert!(generator.into_code().is_empty());
    }

    #[test]
    fn test_assignments() {
        assert_eq!(
            compile("int a; int b; a = 1 + 2; b = a;"),
            "\tt1 = 1 + 2\n\ta = t1\n\tb = a"
        );
    }

    #[test]
    fn test_array_read_goes_through_temp() {
        assert_eq!(
            compile("int v[4]; int i; i = v[i + 1];"),
            "\tt1 = i + 1\n\tt2 = v[t1]\n\ti = t2"
        );
    }

    #[test]
    fn test_if() {
        assert_eq!(
            compile("bool c; if (c) { int x; x = 1; }"),
            "\tifFalse c goto L1\n\tx = 1\nL1:"
        );
    }

    #[test]
    fn test_while() {
        assert_eq!(
            compile("int n; while (n > 0) n = n - 1;"),
            "L1:\n\tt1 = n > 0\n\tifFalse t1 goto L2\n\tt2 = n - 1\n\tn = t2\n\tgoto L1\nL2:"
        );
    }

    #[test]
    fn test_do_while() {
        assert_eq!(
            compile("bool p; do p = !p; while (p);"),
            "L1:\n\tt1 = !p\n\tp = t1\n\tifTrue p goto L1"
        );
    }

    #[test]
    fn test_for() {
        assert_eq!(
            compile("int i; for (int j = 0; j < 1; j = j + 1) { i = j; }"),
            "\tj = 0\nL1:\n\tt1 = j < 1\n\tifFalse t1 goto L2\n\ti = j\n\
             \tt2 = j + 1\n\tj = t2\n\tgoto L1\nL2:"
        );
    }

    #[test]
    fn test_function_and_call() {
        let code = compile(
            "int x; int r; func inc(int n): int { int s; s = n + 1; return s } r = inc(x);",
        );
        assert_eq!(
            code,
            "inc:\n\tt1 = n + 1\n\ts = t1\n\treturn s\n\tparam x\n\tr = call inc"
        );
    }

    #[test]
    fn test_function_without_return() {
        assert_eq!(compile("func f(): int { }"), "f:\n\treturn");
    }

    #[test]
    fn test_empty_program_generates_nothing() {
        assert_eq!(compile("int a;"), "");
    }

    #[test]
    fn test_labels_come_from_the_tree() {
        let mut session = Session::new();
        let program = Parser::for_source("bool c; if (c) c = false;", &mut session)
            .and_then(|mut parser| parser.parse())
            .unwrap();
        let code = generate(&program, &mut session);
        assert_eq!(code.last(), Some(&Instruction::Label(Label(1))));
        // generation allocates temporaries only
        assert_eq!(session.labels_issued(), 1);
    }
}
