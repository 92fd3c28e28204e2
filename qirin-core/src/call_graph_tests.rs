//! Tests for call graph construction and cycle enumeration.

use crate::ast::{build, ExprKind, QualName, ResolvedType};
use crate::call_graph::{CallGraph, CallKind};
use crate::test_support::*;

fn name(n: &str) -> QualName {
    QualName::namespaced("Test", n)
}

#[test]
fn test_direct_call_produces_edge() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("B"))]);
    let b = CallableBuilder::operation("B").body(vec![]);
    let graph = CallGraph::build(&program_of(vec![a, b]));

    let deps: Vec<&QualName> = graph.direct_dependencies(&name("A")).map(|(d, _)| d).collect();
    assert_eq!(deps, vec![&name("B")]);
    assert_eq!(graph.direct_dependencies(&name("B")).count(), 0);
}

#[test]
fn test_functor_application_records_call_kind() {
    let adj = build::call(
        crate::ast::TypedExpression {
            kind: ExprKind::Adjoint(Box::new(build::global(name("B"), unit_op_ty()))),
            ty: unit_op_ty(),
            type_args: Vec::new(),
            info: Default::default(),
            span: test_span(),
        },
        build::unit(),
        ResolvedType::Unit,
    );
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(adj)]);
    let b = CallableBuilder::operation("B").body(vec![]);
    let graph = CallGraph::build(&program_of(vec![a, b]));

    let sites: Vec<_> = graph
        .direct_dependencies(&name("A"))
        .flat_map(|(_, sites)| sites)
        .collect();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].kind, CallKind::Adjoint);
}

#[test]
fn test_mention_without_call_still_produces_edge() {
    // Passing an operation as a value counts as a dependency.
    let a = CallableBuilder::operation("A")
        .body(vec![let_stmt("op", build::global(name("B"), unit_op_ty()))]);
    let b = CallableBuilder::operation("B").body(vec![]);
    let graph = CallGraph::build(&program_of(vec![a, b]));

    assert!(graph.direct_dependencies(&name("A")).any(|(d, _)| d == &name("B")));
}

#[test]
fn test_two_cycle_is_enumerated() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("B"))]);
    let b = CallableBuilder::operation("B").body(vec![expr_stmt(call_test_op("A"))]);
    let graph = CallGraph::build(&program_of(vec![a, b]));

    let cycles = graph.call_cycles();
    assert_eq!(cycles.len(), 1);
    let mut members = cycles[0].clone();
    members.sort_by_key(|n| n.name.clone());
    assert_eq!(members, vec![name("A"), name("B")]);
}

#[test]
fn test_self_loop_is_a_cycle() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("A"))]);
    let graph = CallGraph::build(&program_of(vec![a]));

    let cycles = graph.call_cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0], vec![name("A")]);
}

#[test]
fn test_acyclic_graph_has_no_cycles() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("B"))]);
    let b = CallableBuilder::operation("B").body(vec![expr_stmt(call_test_op("C"))]);
    let c = CallableBuilder::operation("C").body(vec![]);
    let graph = CallGraph::build(&program_of(vec![a, b, c]));

    assert!(graph.call_cycles().is_empty());
}

#[test]
fn test_disjoint_cycles_are_separate() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("B"))]);
    let b = CallableBuilder::operation("B").body(vec![expr_stmt(call_test_op("A"))]);
    let c = CallableBuilder::operation("C").body(vec![expr_stmt(call_test_op("D"))]);
    let d = CallableBuilder::operation("D").body(vec![expr_stmt(call_test_op("C"))]);
    let graph = CallGraph::build(&program_of(vec![a, b, c, d]));

    let cycles = graph.call_cycles();
    assert_eq!(cycles.len(), 2);
    assert!(cycles.iter().all(|cycle| cycle.len() == 2));
}
