// Properties of generated code

use quadc::codegen::{generate, Generator, Instruction};
use quadc::parser::ast::{BinOp, Expr, ExprType, Label};
use quadc::session::Session;
use rstest::rstest;
use std::collections::HashMap;

const NESTED: &str = "
    int i; int n; bool p;
    while (i < n) {
        if (p) {
            do i = i + 1; while (i < 3);
        }
        for (int k = 0; k < n; k = k + 1) {
            if (!p) p = k == i;
        }
    }
    func f(): int { if (p) i = 0; return i }
";

fn labels_defined(code: &[Instruction]) -> HashMap<Label, usize> {
    let mut defined = HashMap::new();
    for instruction in code {
        if let Instruction::Label(label) = instruction {
            *defined.entry(*label).or_insert(0) += 1;
        }
    }
    defined
}

#[rstest]
#[case(NESTED)]
#[case("bool c; if (c) { if (c) { if (c) c = false; } }")]
#[case("int a; do { do a = a - 1; while (a > 5); } while (a > 0);")]
fn test_labels_are_defined_once_and_targets_exist(#[case] source: &str) {
    let mut session = Session::new();
    let code = quadc::compile(source, &mut session).expect("Compilation failed");
    let defined = labels_defined(&code);

    assert!(defined.values().all(|&count| count == 1), "{:?}", defined);
    for target in code.iter().filter_map(Instruction::jump_target) {
        assert_eq!(defined.get(&target), Some(&1), "jump to undefined {}", target);
    }
    assert_eq!(defined.len() as u32, session.labels_issued());
}

#[test]
fn test_rvalue_of_rvalue_emits_nothing() {
    let mut session = Session::new();
    let a = Expr::identifier(ExprType::Int, "a");
    let b = Expr::identifier(ExprType::Int, "b");
    let sum = Expr::arithmetic(BinOp::Add, a, b, 1).unwrap();
    let cmp = Expr::relational(BinOp::Lt, sum, Expr::constant(ExprType::Int, "10"), 1).unwrap();

    let mut generator = Generator::new(&mut session);
    let once = generator.rvalue(&cmp);
    let twice = generator.rvalue(&once);
    assert_eq!(once, twice);
    assert_eq!(once.ty, ExprType::Bool);
    assert_eq!(generator.into_code().len(), 2);
}

#[test]
fn test_regeneration_uses_fresh_temporaries() {
    let mut session = Session::new();
    let program = quadc::parse("int a; int b; a = a * b + 1;", &mut session).unwrap();

    let first = generate(&program, &mut session);
    let after_first = session.temps_issued();
    let second = generate(&program, &mut session);

    assert_eq!(first.len(), second.len());
    assert_eq!(session.temps_issued(), after_first * 2);
    assert_eq!(first[0].to_string(), "t1 = a * b");
    assert_eq!(second[0].to_string(), "t3 = a * b");
    // labels were fixed by the parser and do not move
    assert_eq!(session.labels_issued(), 0);
}

#[test]
fn test_while_label_order_follows_nesting() {
    let mut session = Session::new();
    let code = quadc::compile("bool c; while (c) { while (c) c = false; }", &mut session).unwrap();
    // the inner loop is built first, so it owns the lower labels
    assert_eq!(code[0], Instruction::Label(Label(3)));
    assert_eq!(code[2], Instruction::Label(Label(1)));
}

#[test]
fn test_function_parameters_are_not_recorded() {
    let mut session = Session::new();
    let source = "func g(int a, float b): bool { bool r; return r }";
    let program = quadc::parse(source, &mut session).unwrap();
    let quadc::parser::ast::Stmt::Seq(stmts) = program else {
        panic!("Expected sequence");
    };
    match &stmts[0] {
        quadc::parser::ast::Stmt::Function {
            param_types,
            param_names,
            ..
        } => {
            assert!(param_types.is_empty());
            assert!(param_names.is_empty());
        }
        other => panic!("Expected function, got {:?}", other),
    }
}

#[test]
fn test_functions_take_no_label_number() {
    let mut session = Session::new();
    let code = quadc::compile("bool p; func f(): int { } if (p) p = false;", &mut session)
        .expect("Compilation failed");
    assert_eq!(code[0], Instruction::FunctionLabel("f".to_string()));
    assert_eq!(code.last(), Some(&Instruction::Label(Label(1))));
    assert_eq!(session.labels_issued(), 1);
}
