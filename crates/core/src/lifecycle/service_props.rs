//! Property-based tests for the lifecycle state machine and planner.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use kasira_shared::types::{AccountId, ProductUnitId};

use crate::accounts::{AccountRef, NormalBalance};
use crate::inventory::BatchAllocator;
use crate::ledger::{PurchaseAccounts, SaleAccounts};

use super::error::LifecycleError;
use super::posting::PostingPlanner;
use super::service::LifecycleService;
use super::types::{PurchaseLineInput, SaleLineInput, TransactionStatus};

fn status_strategy() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Draft),
        Just(TransactionStatus::Posted),
        Just(TransactionStatus::Cancelled),
    ]
}

/// Strategy for positive quantities (0.01 to 1,000.00).
fn positive_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for positive prices (0.01 to 100.00).
fn positive_price() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

struct Chart {
    accounts: Vec<AccountRef>,
}

impl Chart {
    fn new() -> Self {
        let accounts = ["1100", "1200", "2000", "4000", "5000"]
            .iter()
            .map(|code| AccountRef {
                id: AccountId::new(),
                code: (*code).to_string(),
                name: (*code).to_string(),
                is_active: true,
                normal_balance: NormalBalance::DebitIncreasing,
            })
            .collect();
        Self { accounts }
    }

    fn id(&self, code: &str) -> AccountId {
        self.accounts.iter().find(|a| a.code == code).unwrap().id
    }

    fn lookup(&self) -> impl Fn(AccountId) -> Option<AccountRef> + '_ {
        let by_id: HashMap<AccountId, &AccountRef> =
            self.accounts.iter().map(|a| (a.id, a)).collect();
        move |id| by_id.get(&id).map(|a| (*a).clone())
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The state machine admits exactly three transitions.
    #[test]
    fn prop_state_machine_closure(from in status_strategy(), to in status_strategy()) {
        use TransactionStatus::{Cancelled, Draft, Posted};

        let allowed = matches!(
            (from, to),
            (Draft, Posted) | (Draft, Cancelled) | (Posted, Cancelled)
        );

        match LifecycleService::validate_transition(from, to) {
            Ok(()) => prop_assert!(allowed),
            Err(LifecycleError::InvalidStateTransition { from: f, to: t }) => {
                prop_assert!(!allowed);
                prop_assert_eq!(f, from);
                prop_assert_eq!(t, to);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// For any purchase-then-sale within stock, the sale journal balances
    /// and the consumed cost equals quantity-weighted batch cost.
    #[test]
    fn prop_purchase_sale_journal_balances(
        quantity in positive_quantity(),
        unit_cost in positive_price(),
        unit_price in positive_price(),
        sell_fraction in 1u32..=100u32,
    ) {
        let chart = Chart::new();
        let pu = ProductUnitId::new();

        let purchase = PostingPlanner::plan_purchase(
            date(),
            "Restock",
            &[PurchaseLineInput {
                product_unit_id: pu,
                quantity,
                unit_cost,
                production_date: None,
                expiry_date: None,
            }],
            PurchaseAccounts {
                inventory: chart.id("1200"),
                payable: chart.id("2000"),
            },
            1,
            chart.lookup(),
        )
        .unwrap();

        let sell_quantity = (quantity * Decimal::from(sell_fraction) / Decimal::from(100u32))
            .round_dp(2)
            .max(Decimal::new(1, 2));
        prop_assume!(sell_quantity <= quantity);

        let sale = PostingPlanner::plan_sale(
            date(),
            "Sale",
            &[SaleLineInput {
                product_unit_id: pu,
                quantity: sell_quantity,
                unit_price,
            }],
            &purchase.batches,
            SaleAccounts {
                receivable: chart.id("1100"),
                revenue: chart.id("4000"),
                cogs: chart.id("5000"),
                inventory: chart.id("1200"),
            },
            chart.lookup(),
        )
        .unwrap();

        prop_assert!(sale.journal.totals.is_balanced);
        prop_assert_eq!(sale.total, sell_quantity * unit_price);
        prop_assert_eq!(sale.cost_total, sell_quantity * unit_cost);
        prop_assert_eq!(sale.consumptions[0].total_quantity(), sell_quantity);
    }

    /// Cancelling a sale restores the batches to their pre-sale state.
    #[test]
    fn prop_sale_cancel_restores_batches(
        quantity in positive_quantity(),
        unit_cost in positive_price(),
        unit_price in positive_price(),
    ) {
        let chart = Chart::new();
        let pu = ProductUnitId::new();

        let purchase = PostingPlanner::plan_purchase(
            date(),
            "Restock",
            &[PurchaseLineInput {
                product_unit_id: pu,
                quantity,
                unit_cost,
                production_date: None,
                expiry_date: None,
            }],
            PurchaseAccounts {
                inventory: chart.id("1200"),
                payable: chart.id("2000"),
            },
            1,
            chart.lookup(),
        )
        .unwrap();

        let sale = PostingPlanner::plan_sale(
            date(),
            "Sale",
            &[SaleLineInput {
                product_unit_id: pu,
                quantity,
                unit_price,
            }],
            &purchase.batches,
            SaleAccounts {
                receivable: chart.id("1100"),
                revenue: chart.id("4000"),
                cogs: chart.id("5000"),
                inventory: chart.id("1200"),
            },
            chart.lookup(),
        )
        .unwrap();

        let mut batches = purchase.batches.clone();
        BatchAllocator::apply(&mut batches, &sale.consumptions[0].draws).unwrap();
        BatchAllocator::reverse(&mut batches, &sale.consumptions[0].draws).unwrap();

        prop_assert_eq!(batches, purchase.batches);
    }
}
