//! Tests for the capability lattice and pattern records.

use crate::ast::Attribute;
use crate::capabilities::{join_all, CapabilityPattern, RuntimeCapability};
use crate::diags::{DiagnosticCode, ErrorCode, Severity};
use crate::test_support::test_span;

const ALL: [RuntimeCapability; 4] = [
    RuntimeCapability::Base,
    RuntimeCapability::BasicQuantumFunctionality,
    RuntimeCapability::BasicMeasurementFeedback,
    RuntimeCapability::FullComputation,
];

#[test]
fn test_combine_is_idempotent() {
    for a in ALL {
        assert_eq!(a.combine(a), a);
    }
}

#[test]
fn test_combine_is_commutative() {
    for a in ALL {
        for b in ALL {
            assert_eq!(a.combine(b), b.combine(a));
        }
    }
}

#[test]
fn test_combine_is_associative() {
    for a in ALL {
        for b in ALL {
            for c in ALL {
                assert_eq!(a.combine(b).combine(c), a.combine(b.combine(c)));
            }
        }
    }
}

#[test]
fn test_base_is_identity() {
    for a in ALL {
        assert_eq!(RuntimeCapability::Base.combine(a), a);
        assert_eq!(a.combine(RuntimeCapability::Base), a);
    }
}

#[test]
fn test_join_sequences_are_order_independent() {
    let caps = [
        RuntimeCapability::BasicMeasurementFeedback,
        RuntimeCapability::Base,
        RuntimeCapability::FullComputation,
        RuntimeCapability::BasicQuantumFunctionality,
    ];
    let forward = join_all(caps);
    let backward = join_all(caps.into_iter().rev().collect::<Vec<_>>());
    assert_eq!(forward, backward);
    assert_eq!(forward, RuntimeCapability::FullComputation);
}

#[test]
fn test_empty_join_is_base() {
    assert_eq!(join_all([]), RuntimeCapability::Base);
}

#[test]
fn test_names_round_trip() {
    for a in ALL {
        assert_eq!(RuntimeCapability::from_name(a.name()), Some(a));
    }
    assert_eq!(RuntimeCapability::from_name("NotACapability"), None);
}

#[test]
fn test_pattern_diagnose_threshold() {
    let pattern = CapabilityPattern::new(
        RuntimeCapability::BasicMeasurementFeedback,
        ErrorCode::UnsupportedResultComparison,
        test_span(),
    );

    // A weaker target gets the diagnostic.
    let diag = pattern.diagnose(RuntimeCapability::Base).expect("should report");
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(
        diag.code,
        DiagnosticCode::Error(ErrorCode::UnsupportedResultComparison)
    );
    assert_eq!(diag.span, test_span());

    // Equal or stronger targets do not.
    assert!(pattern.diagnose(RuntimeCapability::BasicMeasurementFeedback).is_none());
    assert!(pattern.diagnose(RuntimeCapability::FullComputation).is_none());
}

#[test]
fn test_requires_capability_attribute_wire_form() {
    let attr = Attribute::requires_capability(RuntimeCapability::BasicMeasurementFeedback);
    assert_eq!(attr.name, "RequiresCapability");
    assert_eq!(attr.arguments.len(), 2);
    assert_eq!(attr.arguments[0], "BasicMeasurementFeedback");
    assert_eq!(attr.arguments[1], "Inferred automatically by the compiler.");

    assert_eq!(
        attr.as_required_capability(),
        Some(RuntimeCapability::BasicMeasurementFeedback)
    );
}

#[test]
fn test_diagnostic_wire_form_is_one_based() {
    let pattern = CapabilityPattern::new(
        RuntimeCapability::FullComputation,
        ErrorCode::UnsupportedClassicalLoop,
        test_span(),
    );
    let wire = pattern.diagnose(RuntimeCapability::Base).unwrap().to_wire();
    assert_eq!(wire.range.start.line, test_span().start_line + 1);
    assert_eq!(wire.range.start.col, test_span().start_col + 1);
    assert_eq!(wire.code, "UnsupportedClassicalLoop");
}
