//! Tests for the capability pattern analysers.

use crate::ast::{build, *};
use crate::capabilities::{self, RuntimeCapability};
use crate::diags::ErrorCode;
use crate::test_support::*;

fn codes(callable: &Callable) -> Vec<ErrorCode> {
    capabilities::analyze_callable(callable).into_iter().map(|p| p.code).collect()
}

// --- result analyzer ---

#[test]
fn test_result_comparison_in_operation_if_needs_measurement_feedback() {
    let m = CallableBuilder::operation("M").body(vec![if_result_stmt(vec![expr_stmt(
        call_test_op("X"),
    )])]);

    let patterns = capabilities::analyze_callable(&m);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, ErrorCode::UnsupportedResultComparison);
    assert_eq!(
        patterns[0].capability,
        RuntimeCapability::BasicMeasurementFeedback
    );
}

#[test]
fn test_result_comparison_outside_if_needs_full_computation() {
    let m = CallableBuilder::operation("M").body(vec![let_stmt("b", result_compare())]);

    let patterns = capabilities::analyze_callable(&m);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, ErrorCode::ResultComparisonNotInOperationIf);
    assert_eq!(patterns[0].capability, RuntimeCapability::FullComputation);
}

#[test]
fn test_result_comparison_in_function_needs_full_computation() {
    let f = CallableBuilder::function("F")
        .returns(ResolvedType::Bool)
        .body(vec![return_stmt(result_compare())]);

    let patterns = capabilities::analyze_callable(&f);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, ErrorCode::ResultComparisonNotInOperationIf);
}

#[test]
fn test_return_in_result_conditioned_block() {
    let m = CallableBuilder::operation("M").body(vec![if_result_stmt(vec![return_stmt(
        build::unit(),
    )])]);

    assert!(codes(&m).contains(&ErrorCode::ReturnInResultConditionedBlock));
}

#[test]
fn test_set_of_outer_variable_in_result_conditioned_block() {
    let m = CallableBuilder::operation("M").body(vec![
        mutable_stmt("count", build::int(0)),
        if_result_stmt(vec![set_stmt("count", build::int(1))]),
    ]);

    assert!(codes(&m).contains(&ErrorCode::SetInResultConditionedBlock));
}

#[test]
fn test_set_of_locally_declared_variable_is_fine() {
    let m = CallableBuilder::operation("M").body(vec![if_result_stmt(vec![
        mutable_stmt("local", build::int(0)),
        set_stmt("local", build::int(1)),
    ])]);

    assert!(!codes(&m).contains(&ErrorCode::SetInResultConditionedBlock));
}

// --- statement analyzer ---

#[test]
fn test_while_in_operation_needs_full_computation() {
    let m = CallableBuilder::operation("M").body(vec![while_stmt(
        build::boolean(true),
        vec![expr_stmt(call_test_op("X"))],
    )]);

    let patterns = capabilities::analyze_callable(&m);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, ErrorCode::UnsupportedClassicalLoop);
    assert_eq!(patterns[0].capability, RuntimeCapability::FullComputation);
}

#[test]
fn test_while_in_function_is_fine() {
    let f = CallableBuilder::function("F").body(vec![while_stmt(build::boolean(true), vec![])]);

    assert!(capabilities::analyze_callable(&f).is_empty());
}

#[test]
fn test_repeat_until_needs_measurement_feedback() {
    let m = CallableBuilder::operation("M").body(vec![stmt(StmtKind::RepeatUntil {
        body: Scope::new(vec![expr_stmt(call_test_op("X"))]),
        condition: build::boolean(true),
        fixup: None,
    })]);

    let patterns = capabilities::analyze_callable(&m);
    assert_eq!(patterns.len(), 1);
    assert_eq!(
        patterns[0].capability,
        RuntimeCapability::BasicMeasurementFeedback
    );
}

// --- type analyzer ---

#[test]
fn test_big_int_needs_full_computation_everywhere() {
    let big = TypedExpression {
        kind: ExprKind::BigIntLiteral("42".to_string()),
        ty: ResolvedType::BigInt,
        type_args: Vec::new(),
        info: ExprInfo::default(),
        span: test_span(),
    };
    let f = CallableBuilder::function("F").body(vec![let_stmt("x", big)]);

    let patterns = capabilities::analyze_callable(&f);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, ErrorCode::UnsupportedClassicalType);
    assert_eq!(patterns[0].arguments, vec!["BigInt".to_string()]);
}

#[test]
fn test_double_in_operation_needs_full_computation() {
    let m = CallableBuilder::operation("M").body(vec![let_stmt("x", build::double(1.5))]);

    let patterns = capabilities::analyze_callable(&m);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, ErrorCode::UnsupportedClassicalType);
    assert_eq!(patterns[0].arguments, vec!["Double".to_string()]);
}

#[test]
fn test_double_in_function_is_fine() {
    let f = CallableBuilder::function("F").body(vec![let_stmt("x", build::double(1.5))]);

    assert!(capabilities::analyze_callable(&f).is_empty());
}

// --- array analyzer ---

fn sized_array(size: TypedExpression) -> TypedExpression {
    TypedExpression {
        kind: ExprKind::SizedArray {
            value: Box::new(build::int(0)),
            size: Box::new(size),
        },
        ty: ResolvedType::Array(Box::new(ResolvedType::Int)),
        type_args: Vec::new(),
        info: ExprInfo::default(),
        span: test_span(),
    }
}

#[test]
fn test_dynamically_sized_array_needs_full_computation() {
    let f = CallableBuilder::function("F")
        .param("n", ResolvedType::Int)
        .body(vec![let_stmt("a", sized_array(build::local("n", ResolvedType::Int)))]);

    let patterns = capabilities::analyze_callable(&f);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, ErrorCode::UnsupportedDynamicArray);
}

#[test]
fn test_statically_sized_array_is_fine() {
    let f = CallableBuilder::function("F").body(vec![let_stmt("a", sized_array(build::int(4)))]);

    assert!(capabilities::analyze_callable(&f).is_empty());
}

#[test]
fn test_dynamic_array_update_in_operation_needs_full_computation() {
    let arr_ty = ResolvedType::Array(Box::new(ResolvedType::Int));
    let update = TypedExpression {
        kind: ExprKind::CopyAndUpdate {
            array: Box::new(build::local("a", arr_ty.clone())),
            index: Box::new(build::local("i", ResolvedType::Int)),
            value: Box::new(build::int(0)),
        },
        ty: arr_ty.clone(),
        type_args: Vec::new(),
        info: ExprInfo::default(),
        span: test_span(),
    };
    let m = CallableBuilder::operation("M")
        .param("a", arr_ty)
        .param("i", ResolvedType::Int)
        .body(vec![let_stmt("b", update)]);

    let patterns = capabilities::analyze_callable(&m);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, ErrorCode::UnsupportedArrayUpdate);
}
