//! Property-based tests for the batch allocator.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use kasira_shared::types::ProductUnitId;

use super::allocator::BatchAllocator;
use super::error::InventoryError;
use super::types::{Batch, ReceiveBatchInput};

/// Strategy for positive quantities (0.01 to 10,000.00).
fn positive_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for non-negative unit costs (0.00 to 1,000.00).
fn unit_cost() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for an optional expiry date within 2026.
fn expiry_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop_oneof![
        Just(None),
        (1u32..=365u32).prop_map(|day| NaiveDate::from_yo_opt(2026, day)),
    ]
}

/// Strategy for a shelf of 1 to 8 batches of one product unit.
fn shelf() -> impl Strategy<Value = Vec<Batch>> {
    prop::collection::vec((positive_quantity(), unit_cost(), expiry_date()), 1..=8).prop_map(
        |specs| {
            let product_unit_id = ProductUnitId::new();
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (quantity, unit_cost, expiry_date))| {
                    BatchAllocator::receive(
                        &ReceiveBatchInput {
                            product_unit_id,
                            quantity,
                            unit_cost,
                            production_date: None,
                            expiry_date,
                        },
                        i64::try_from(i).unwrap(),
                    )
                    .unwrap()
                })
                .collect()
        },
    )
}

fn total_remaining(batches: &[Batch]) -> Decimal {
    batches.iter().map(|b| b.remaining_quantity).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A feasible plan draws exactly the requested quantity.
    #[test]
    fn prop_plan_draws_exactly_requested(batches in shelf(), fraction in 1u32..=100u32) {
        let pu = batches[0].product_unit_id;
        let available = total_remaining(&batches);
        let requested = (available * Decimal::from(fraction) / Decimal::from(100u32))
            .round_dp(2)
            .max(Decimal::new(1, 2));
        prop_assume!(requested <= available);

        let plan = BatchAllocator::plan_consumption(pu, &batches, requested).unwrap();
        prop_assert_eq!(plan.total_quantity(), requested);

        // Each draw stays within its batch.
        for draw in &plan.draws {
            let batch = batches.iter().find(|b| b.id == draw.batch_id).unwrap();
            prop_assert!(draw.quantity > Decimal::ZERO);
            prop_assert!(draw.quantity <= batch.remaining_quantity);
            prop_assert_eq!(draw.unit_cost, batch.unit_cost);
        }
    }

    /// Over-requesting fails with the exact availability and touches nothing.
    #[test]
    fn prop_oversell_rejected_with_availability(batches in shelf()) {
        let pu = batches[0].product_unit_id;
        let available = total_remaining(&batches);
        let requested = available + Decimal::ONE;

        let err = BatchAllocator::plan_consumption(pu, &batches, requested).unwrap_err();
        let matched = matches!(
            err,
            InventoryError::InsufficientStock { available: a, requested: r, .. }
                if a == available && r == requested
        );
        prop_assert!(matched);
    }

    /// Applying a plan preserves the batch quantity invariant and reduces
    /// total remaining by exactly the requested quantity.
    #[test]
    fn prop_apply_preserves_invariant(batches in shelf(), fraction in 1u32..=100u32) {
        let pu = batches[0].product_unit_id;
        let available = total_remaining(&batches);
        let requested = (available * Decimal::from(fraction) / Decimal::from(100u32))
            .round_dp(2)
            .max(Decimal::new(1, 2));
        prop_assume!(requested <= available);

        let mut batches = batches;
        let plan = BatchAllocator::plan_consumption(pu, &batches, requested).unwrap();
        BatchAllocator::apply(&mut batches, &plan.draws).unwrap();

        for batch in &batches {
            prop_assert!(batch.is_consistent());
        }
        prop_assert_eq!(total_remaining(&batches), available - requested);
    }

    /// Apply followed by reverse restores every batch exactly.
    #[test]
    fn prop_apply_reverse_round_trips(batches in shelf(), fraction in 1u32..=100u32) {
        let pu = batches[0].product_unit_id;
        let available = total_remaining(&batches);
        let requested = (available * Decimal::from(fraction) / Decimal::from(100u32))
            .round_dp(2)
            .max(Decimal::new(1, 2));
        prop_assume!(requested <= available);

        let mut batches = batches;
        let before = batches.clone();

        let plan = BatchAllocator::plan_consumption(pu, &batches, requested).unwrap();
        BatchAllocator::apply(&mut batches, &plan.draws).unwrap();
        BatchAllocator::reverse(&mut batches, &plan.draws).unwrap();

        prop_assert_eq!(batches, before);
    }

    /// Planning is deterministic: the same shelf yields the same plan.
    #[test]
    fn prop_planning_is_deterministic(batches in shelf(), fraction in 1u32..=100u32) {
        let pu = batches[0].product_unit_id;
        let available = total_remaining(&batches);
        let requested = (available * Decimal::from(fraction) / Decimal::from(100u32))
            .round_dp(2)
            .max(Decimal::new(1, 2));
        prop_assume!(requested <= available);

        let first = BatchAllocator::plan_consumption(pu, &batches, requested).unwrap();

        let mut shuffled = batches.clone();
        shuffled.reverse();
        let second = BatchAllocator::plan_consumption(pu, &shuffled, requested).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Draws come out in expiry order: dated batches before undated ones,
    /// earlier expiries first.
    #[test]
    fn prop_draws_follow_expiry_order(batches in shelf()) {
        let pu = batches[0].product_unit_id;
        let available = total_remaining(&batches);

        let plan = BatchAllocator::plan_consumption(pu, &batches, available).unwrap();

        let expiries: Vec<Option<NaiveDate>> = plan
            .draws
            .iter()
            .map(|d| {
                batches
                    .iter()
                    .find(|b| b.id == d.batch_id)
                    .unwrap()
                    .expiry_date
            })
            .collect();

        for pair in expiries.windows(2) {
            match (pair[0], pair[1]) {
                (Some(a), Some(b)) => prop_assert!(a <= b),
                (None, Some(_)) => prop_assert!(false, "undated batch drawn before dated one"),
                _ => {}
            }
        }
    }

    /// Cost of goods equals the sum of per-draw quantity times unit cost.
    #[test]
    fn prop_cost_is_sum_of_draw_costs(batches in shelf()) {
        let pu = batches[0].product_unit_id;
        let available = total_remaining(&batches);

        let plan = BatchAllocator::plan_consumption(pu, &batches, available).unwrap();

        let expected: Decimal = plan
            .draws
            .iter()
            .map(|d| d.quantity * d.unit_cost)
            .sum();
        prop_assert_eq!(plan.total_cost(), expected);
    }
}
