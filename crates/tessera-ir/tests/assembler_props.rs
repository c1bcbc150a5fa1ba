//! Property-based tests for circuit assembly.
//!
//! Whatever sequence of operations is offered to the assembler, the
//! operations it accepts form a conflict-free circuit, and the sealed
//! result does not depend on insertion order.

use proptest::prelude::*;
use tessera_ir::{Basis, CircuitAssembler, Operation, Position2D};

/// Operation on a small 4x4 patch of coordinates.
fn arb_operation() -> impl Strategy<Value = Operation<Position2D>> {
    let coord = (0_i64..4, 0_i64..4).prop_map(|(x, y)| Position2D::new(x, y));
    let basis = prop_oneof![Just(Basis::X), Just(Basis::Z)];
    prop_oneof![
        (basis.clone(), coord.clone()).prop_map(|(b, q)| Operation::reset(b, q)),
        (basis.clone(), coord.clone()).prop_map(|(b, q)| Operation::measure(b, q)),
        coord.clone().prop_map(Operation::hadamard),
        (basis, coord.clone(), coord)
            .prop_filter("control and target must differ", |(_, c, t)| c != t)
            .prop_map(|(b, c, t)| Operation::controlled_pauli(b, c, t)),
    ]
}

fn arb_schedule() -> impl Strategy<Value = Vec<(usize, Operation<Position2D>)>> {
    prop::collection::vec((0_usize..6, arb_operation()), 1..40)
}

proptest! {
    /// Accepted operations never share a qubit within a moment.
    #[test]
    fn accepted_operations_are_conflict_free(schedule in arb_schedule()) {
        let mut asm = CircuitAssembler::new();
        asm.begin().unwrap();
        for (moment, op) in &schedule {
            let _ = asm.add_operation(*moment, *op, "prop");
        }
        let circuit = asm.seal().unwrap();
        prop_assert!(circuit.check_conflict_free().is_ok());
        prop_assert!(circuit.num_moments() <= 6);
    }

    /// Replaying the accepted operations backwards seals to the same circuit.
    #[test]
    fn sealing_is_order_independent(schedule in arb_schedule()) {
        let mut first = CircuitAssembler::new();
        first.begin().unwrap();
        let mut accepted = Vec::new();
        for (moment, op) in &schedule {
            if first.add_operation(*moment, *op, "prop").is_ok() {
                accepted.push((*moment, *op));
            }
        }
        let forward = first.seal().unwrap();

        let mut second = CircuitAssembler::new();
        second.begin().unwrap();
        second.extend_to(forward.num_moments()).unwrap();
        for (moment, op) in accepted.iter().rev() {
            second.add_operation(*moment, *op, "prop").unwrap();
        }
        let backward = second.seal().unwrap();

        prop_assert_eq!(forward, backward);
    }
}
