// AST definitions for the quad front end
//
// Expressions carry their value type, fixed when they are built.  Every
// constructor that combines sub-expressions checks operand types and fails
// with a type error instead of producing a node, so a tree that exists is a
// well-typed tree.

use crate::parser::parse::{CompileError, ErrorKind};
use crate::session::Session;
use std::fmt;

/// Value types of expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprType {
    Void,
    Int,
    Float,
    Bool,
}

impl ExprType {
    /// Resolve a declared type name (`int`, `float`, `bool`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ExprType::Int),
            "float" => Some(ExprType::Float),
            "bool" => Some(ExprType::Bool),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ExprType::Int | ExprType::Float)
    }

    pub fn name(self) -> &'static str {
        match self {
            ExprType::Void => "void",
            ExprType::Int => "int",
            ExprType::Float => "float",
            ExprType::Bool => "bool",
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Logical
    Or,
    And,
    // Relational
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::Or | BinOp::And)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // !x
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

/// Jump target in generated code, unique within a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Compiler-generated holder for an intermediate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temp(pub u32);

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal as written in the source.
    Constant(String),
    Identifier(String),
    /// `name[x]` or the two-dimensional slice `name[x:y]`.
    Access {
        name: String,
        index_x: Box<Expr>,
        index_y: Option<Box<Expr>>,
    },
    Logical {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Relational {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Arithmetic {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Temp(Temp),
}

/// A typed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: ExprType,
}

fn operand_mismatch(op: &str, what: &str, left: &Expr, right: &Expr, line: usize) -> CompileError {
    CompileError::new(
        ErrorKind::Type,
        line,
        format!(
            "'{}' used with {} ({}:{}) ({}:{})",
            op, what, left, left.ty, right, right.ty
        ),
    )
}

impl Expr {
    pub fn constant(ty: ExprType, text: impl Into<String>) -> Self {
        Expr {
            kind: ExprKind::Constant(text.into()),
            ty,
        }
    }

    pub fn identifier(ty: ExprType, name: impl Into<String>) -> Self {
        Expr {
            kind: ExprKind::Identifier(name.into()),
            ty,
        }
    }

    pub fn temp(ty: ExprType, temp: Temp) -> Self {
        Expr {
            kind: ExprKind::Temp(temp),
            ty,
        }
    }

    /// Element access; the element type is the declared type of `name`.
    pub fn access(
        ty: ExprType,
        name: impl Into<String>,
        index_x: Expr,
        index_y: Option<Expr>,
    ) -> Self {
        Expr {
            kind: ExprKind::Access {
                name: name.into(),
                index_x: Box::new(index_x),
                index_y: index_y.map(Box::new),
            },
            ty,
        }
    }

    /// `||` / `&&`: both operands must be `bool`.
    pub fn logical(op: BinOp, left: Expr, right: Expr, line: usize) -> Result<Self, CompileError> {
        debug_assert!(op.is_logical());
        if left.ty != ExprType::Bool || right.ty != ExprType::Bool {
            return Err(operand_mismatch(op.symbol(), "non-boolean operands", &left, &right, line));
        }
        Ok(Expr {
            kind: ExprKind::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty: ExprType::Bool,
        })
    }

    /// Comparison: operands must have the same type; the result is `bool`.
    pub fn relational(
        op: BinOp,
        left: Expr,
        right: Expr,
        line: usize,
    ) -> Result<Self, CompileError> {
        debug_assert!(op.is_relational());
        if left.ty != right.ty {
            return Err(operand_mismatch(
                op.symbol(),
                "operands of different types",
                &left,
                &right,
                line,
            ));
        }
        Ok(Expr {
            kind: ExprKind::Relational {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty: ExprType::Bool,
        })
    }

    /// `+ - * /`: operands must have the same type, which is also the result type.
    pub fn arithmetic(
        op: BinOp,
        left: Expr,
        right: Expr,
        line: usize,
    ) -> Result<Self, CompileError> {
        debug_assert!(op.is_arithmetic());
        if left.ty != right.ty {
            return Err(operand_mismatch(
                op.symbol(),
                "operands of different types",
                &left,
                &right,
                line,
            ));
        }
        let ty = left.ty;
        Ok(Expr {
            kind: ExprKind::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        })
    }

    /// `!` needs a `bool` operand, unary `-` a numeric one.
    pub fn unary(op: UnOp, operand: Expr, line: usize) -> Result<Self, CompileError> {
        let ty = match op {
            UnOp::Not if operand.ty != ExprType::Bool => {
                return Err(CompileError::new(
                    ErrorKind::Type,
                    line,
                    format!("'!' used with non-boolean operand ({}:{})", operand, operand.ty),
                ));
            }
            UnOp::Neg if !operand.ty.is_numeric() => {
                return Err(CompileError::new(
                    ErrorKind::Type,
                    line,
                    format!("'-' used with non-numeric operand ({}:{})", operand, operand.ty),
                ));
            }
            UnOp::Not => ExprType::Bool,
            UnOp::Neg => operand.ty,
        };
        Ok(Expr {
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        })
    }

    /// Constants, identifiers and temporaries can be used directly as an
    /// instruction operand.
    pub fn is_simple(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Constant(_) | ExprKind::Identifier(_) | ExprKind::Temp(_)
        )
    }
}

/// Operand rendering; composite operands are parenthesised.
struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.kind {
            ExprKind::Logical { .. }
            | ExprKind::Relational { .. }
            | ExprKind::Arithmetic { .. } => write!(f, "({})", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Constant(text) | ExprKind::Identifier(text) => f.write_str(text),
            ExprKind::Access {
                name,
                index_x,
                index_y: Some(index_y),
            } => write!(f, "{}[{}:{}]", name, index_x, index_y),
            ExprKind::Access { name, index_x, .. } => write!(f, "{}[{}]", name, index_x),
            ExprKind::Logical { op, left, right }
            | ExprKind::Relational { op, left, right }
            | ExprKind::Arithmetic { op, left, right } => {
                write!(f, "{} {} {}", Operand(left), op.symbol(), Operand(right))
            }
            ExprKind::Unary { op, operand } => write!(f, "{}{}", op.symbol(), Operand(operand)),
            ExprKind::Temp(temp) => write!(f, "{}", temp),
        }
    }
}

/// `target = value`, both sides of the same type.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Expr,
    pub value: Expr,
}

impl Assign {
    pub fn new(target: Expr, value: Expr, line: usize) -> Result<Self, CompileError> {
        if target.ty != value.ty {
            return Err(operand_mismatch("=", "operands of different types", &target, &value, line));
        }
        Ok(Assign { target, value })
    }
}

/// Statement nodes. Each statement exclusively owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Statements in order; an empty sequence generates nothing.
    Seq(Vec<Stmt>),
    Assign(Assign),
    If {
        cond: Expr,
        body: Box<Stmt>,
        after: Label,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
        before: Label,
        after: Label,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
        before: Label,
    },
    For {
        init: Assign,
        cond: Expr,
        increment: Assign,
        body: Box<Stmt>,
        before: Label,
        after: Label,
    },
    Function {
        name: String,
        return_type: ExprType,
        param_types: Vec<ExprType>,
        param_names: Vec<String>,
        body: Box<Stmt>,
        /// Name bound by the body's trailing `return`.
        ret: Option<String>,
    },
    FunctionCall {
        function: String,
        args: Vec<String>,
        /// Rendered target receiving the result.
        ret: String,
    },
}

/// First half of an `if`: the condition is checked and the exit label
/// allocated before the body is parsed, so errors in the condition point at
/// the condition's line.
#[derive(Debug)]
pub struct IfHead {
    cond: Expr,
    after: Label,
}

impl IfHead {
    pub fn new(cond: Expr, session: &mut Session, line: usize) -> Result<Self, CompileError> {
        if cond.ty != ExprType::Bool {
            return Err(CompileError::new(
                ErrorKind::Type,
                line,
                format!("if condition '{}' is not boolean ({})", cond, cond.ty),
            ));
        }
        Ok(IfHead {
            cond,
            after: session.new_label(),
        })
    }

    pub fn with_body(self, body: Stmt) -> Stmt {
        Stmt::If {
            cond: self.cond,
            body: Box::new(body),
            after: self.after,
        }
    }
}

impl Stmt {
    /// Loop conditions are taken as they are; only `if` requires `bool`.
    pub fn while_loop(cond: Expr, body: Stmt, session: &mut Session) -> Self {
        let before = session.new_label();
        let after = session.new_label();
        Stmt::While {
            cond,
            body: Box::new(body),
            before,
            after,
        }
    }

    pub fn do_while(body: Stmt, cond: Expr, session: &mut Session) -> Self {
        Stmt::DoWhile {
            body: Box::new(body),
            cond,
            before: session.new_label(),
        }
    }

    pub fn for_loop(
        init: Assign,
        cond: Expr,
        increment: Assign,
        body: Stmt,
        session: &mut Session,
    ) -> Self {
        let before = session.new_label();
        let after = session.new_label();
        Stmt::For {
            init,
            cond,
            increment,
            body: Box::new(body),
            before,
            after,
        }
    }

    /// Number of statements in the tree, sequences excluded.
    pub fn count(&self) -> usize {
        match self {
            Stmt::Seq(stmts) => stmts.iter().map(Stmt::count).sum(),
            Stmt::Assign(_) | Stmt::FunctionCall { .. } => 1,
            Stmt::If { body, .. }
            | Stmt::While { body, .. }
            | Stmt::DoWhile { body, .. }
            | Stmt::For { body, .. }
            | Stmt::Function { body, .. } => 1 + body.count(),
        }
    }
}
