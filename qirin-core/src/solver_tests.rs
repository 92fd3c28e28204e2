//! Tests for capability inference over whole programs.

use crate::ast::{build, Attribute};
use crate::capabilities::solver::{diagnose_against_target, infer_capabilities};
use crate::capabilities::RuntimeCapability;
use crate::diags::{DiagnosticCode, Severity, WarningCode};
use crate::namespace_manager::NamespaceManager;
use crate::test_support::*;

#[test]
fn test_result_comparison_infers_measurement_feedback() {
    let m = CallableBuilder::operation("M").body(vec![if_result_stmt(vec![expr_stmt(
        call_test_op("M"),
    )])]);
    // Self-call keeps the graph non-trivial; the attribute still reflects
    // the callable's own requirement.
    let program = program_of(vec![m]);
    let manager = NamespaceManager::from_program(&program);
    let (annotated, _) = infer_capabilities(&program, &manager);

    let m = find_callable(&annotated, "M").unwrap();
    assert_eq!(
        capability_attr(m),
        Some(RuntimeCapability::BasicMeasurementFeedback)
    );
}

#[test]
fn test_base_callable_is_annotated_base() {
    let a = CallableBuilder::operation("A").body(vec![]);
    let program = program_of(vec![a]);
    let manager = NamespaceManager::from_program(&program);
    let (annotated, diags) = infer_capabilities(&program, &manager);

    assert!(diags.is_empty());
    let a = find_callable(&annotated, "A").unwrap();
    assert_eq!(capability_attr(a), Some(RuntimeCapability::Base));
}

#[test]
fn test_capability_propagates_through_calls() {
    // A calls B; B needs FullComputation; A is otherwise Base.
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("B"))]);
    let b = CallableBuilder::operation("B").body(vec![while_stmt(
        build::boolean(true),
        vec![],
    )]);
    let program = program_of(vec![a, b]);
    let manager = NamespaceManager::from_program(&program);
    let (annotated, _) = infer_capabilities(&program, &manager);

    let a = find_callable(&annotated, "A").unwrap();
    let b = find_callable(&annotated, "B").unwrap();
    assert_eq!(capability_attr(a), Some(RuntimeCapability::FullComputation));
    assert_eq!(capability_attr(b), Some(RuntimeCapability::FullComputation));
}

#[test]
fn test_explicit_attribute_wins_and_propagates() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("B"))]);
    let b = CallableBuilder::operation("B")
        .attribute(Attribute::requires_capability(
            RuntimeCapability::FullComputation,
        ))
        .body(vec![]);
    let program = program_of(vec![a, b]);
    let manager = NamespaceManager::from_program(&program);
    let (annotated, _) = infer_capabilities(&program, &manager);

    // B keeps exactly its explicit attribute; A picks up B's requirement.
    let b = find_callable(&annotated, "B").unwrap();
    assert_eq!(b.attributes.len(), 1);
    let a = find_callable(&annotated, "A").unwrap();
    assert_eq!(capability_attr(a), Some(RuntimeCapability::FullComputation));
}

#[test]
fn test_cycle_members_share_the_cycle_capability() {
    // A -> B -> A; A compares results in an if; B is otherwise Base.
    let a = CallableBuilder::operation("A").body(vec![
        if_result_stmt(vec![]),
        expr_stmt(call_test_op("B")),
    ]);
    let b = CallableBuilder::operation("B").body(vec![expr_stmt(call_test_op("A"))]);
    let program = program_of(vec![a, b]);
    let manager = NamespaceManager::from_program(&program);
    let (annotated, _) = infer_capabilities(&program, &manager);

    let a = find_callable(&annotated, "A").unwrap();
    let b = find_callable(&annotated, "B").unwrap();
    assert_eq!(
        capability_attr(a),
        Some(RuntimeCapability::BasicMeasurementFeedback)
    );
    assert_eq!(
        capability_attr(b),
        Some(RuntimeCapability::BasicMeasurementFeedback)
    );
}

#[test]
fn test_reference_callables_contribute_base_and_stay_unmodified() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("Lib"))]);
    // The library callable's body would demand FullComputation, but it is
    // not declared in a source file, so it contributes Base.
    let lib = CallableBuilder::operation("Lib")
        .reference()
        .body(vec![while_stmt(build::boolean(true), vec![])]);
    let program = program_of(vec![a]);
    let manager = NamespaceManager::from_program(&program).with_references(vec![lib]);
    let (annotated, _) = infer_capabilities(&program, &manager);

    let a = find_callable(&annotated, "A").unwrap();
    assert_eq!(capability_attr(a), Some(RuntimeCapability::Base));
}

#[test]
fn test_reference_attribute_still_propagates() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("Lib"))]);
    let lib = CallableBuilder::operation("Lib")
        .reference()
        .attribute(Attribute::requires_capability(
            RuntimeCapability::BasicMeasurementFeedback,
        ))
        .body(vec![]);
    let program = program_of(vec![a]);
    let manager = NamespaceManager::from_program(&program).with_references(vec![lib]);
    let (annotated, _) = infer_capabilities(&program, &manager);

    let a = find_callable(&annotated, "A").unwrap();
    assert_eq!(
        capability_attr(a),
        Some(RuntimeCapability::BasicMeasurementFeedback)
    );
}

#[test]
fn test_inference_is_idempotent() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("B"))]);
    let b = CallableBuilder::operation("B").body(vec![if_result_stmt(vec![])]);
    let program = program_of(vec![a, b]);
    let manager = NamespaceManager::from_program(&program);

    let (once, _) = infer_capabilities(&program, &manager);
    let manager_after = NamespaceManager::from_program(&once);
    let (twice, _) = infer_capabilities(&once, &manager_after);
    assert_eq!(once, twice);
}

#[test]
fn test_every_source_callable_gets_exactly_one_attribute() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("B"))]);
    let b = CallableBuilder::operation("B").body(vec![]);
    let program = program_of(vec![a, b]);
    let manager = NamespaceManager::from_program(&program);
    let (annotated, _) = infer_capabilities(&program, &manager);

    for ns in &annotated.namespaces {
        for callable in ns.callables() {
            let count = callable
                .attributes
                .iter()
                .filter(|attr| attr.as_required_capability().is_some())
                .count();
            assert_eq!(count, 1, "callable {} should have one attribute", callable.name);
        }
    }
}

#[test]
fn test_unknown_callee_contributes_base_with_an_info_diagnostic() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("Missing"))]);
    let program = program_of(vec![a]);
    let manager = NamespaceManager::from_program(&program);
    let (annotated, diags) = infer_capabilities(&program, &manager);

    let a = find_callable(&annotated, "A").unwrap();
    assert_eq!(capability_attr(a), Some(RuntimeCapability::Base));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Info);
    assert!(diags[0].arguments[0].contains("Missing"));
}

#[test]
fn test_library_violations_are_explained_at_the_call_site() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("Lib"))]);
    let lib = CallableBuilder::operation("Lib")
        .reference()
        .body(vec![while_stmt(build::boolean(true), vec![])]);
    let program = program_of(vec![a]);
    let manager = NamespaceManager::from_program(&program).with_references(vec![lib]);

    let diags = diagnose_against_target(
        &program,
        &manager,
        RuntimeCapability::BasicMeasurementFeedback,
    );

    assert_eq!(diags.len(), 1);
    let warning = &diags[0];
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(
        warning.code,
        DiagnosticCode::Warning(WarningCode::UnsupportedClassicalLoop)
    );
    // Arguments name the library callable, its source file and the
    // offending position inside it.
    assert_eq!(warning.arguments[0], "Test.Lib");
    assert_eq!(warning.arguments[1], "library.qn");
}

#[test]
fn test_supported_targets_get_no_explanations() {
    let a = CallableBuilder::operation("A").body(vec![expr_stmt(call_test_op("Lib"))]);
    let lib = CallableBuilder::operation("Lib")
        .reference()
        .body(vec![while_stmt(build::boolean(true), vec![])]);
    let program = program_of(vec![a]);
    let manager = NamespaceManager::from_program(&program).with_references(vec![lib]);

    let diags = diagnose_against_target(&program, &manager, RuntimeCapability::FullComputation);
    assert!(diags.is_empty());
}
