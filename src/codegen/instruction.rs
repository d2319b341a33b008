//! Three-address instructions and their textual form.

use crate::parser::ast::Label;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `L3:`
    Label(Label),
    /// Function entry, `name:`
    FunctionLabel(String),
    /// `ifFalse cond goto L`
    IfFalse { cond: String, target: Label },
    /// `ifTrue cond goto L`
    IfTrue { cond: String, target: Label },
    Goto(Label),
    /// `target = value`, where value is an operand or one operation
    Assign { target: String, value: String },
    Param(String),
    /// `ret = call function`
    Call { ret: String, function: String },
    Return(Option<String>),
}

impl Instruction {
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_) | Instruction::FunctionLabel(_))
    }

    /// Label this instruction may jump to.
    pub fn jump_target(&self) -> Option<Label> {
        match self {
            Instruction::IfFalse { target, .. }
            | Instruction::IfTrue { target, .. }
            | Instruction::Goto(target) => Some(*target),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Label(label) => write!(f, "{}:", label),
            Instruction::FunctionLabel(name) => write!(f, "{}:", name),
            Instruction::IfFalse { cond, target } => write!(f, "ifFalse {} goto {}", cond, target),
            Instruction::IfTrue { cond, target } => write!(f, "ifTrue {} goto {}", cond, target),
            Instruction::Goto(target) => write!(f, "goto {}", target),
            Instruction::Assign { target, value } => write!(f, "{} = {}", target, value),
            Instruction::Param(arg) => write!(f, "param {}", arg),
            Instruction::Call { ret, function } => write!(f, "{} = call {}", ret, function),
            Instruction::Return(Some(name)) => write!(f, "return {}", name),
            Instruction::Return(None) => f.write_str("return"),
        }
    }
}

/// Render a program listing: labels flush left, everything else indented
/// by one tab.
pub fn listing(code: &[Instruction]) -> String {
    code.iter()
        .map(|instruction| {
            if instruction.is_label() {
                instruction.to_string()
            } else {
                format!("\t{}", instruction)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
