//! Posting and cancellation planning.
//!
//! The planner composes the batch allocator and the journal poster into
//! one plan per lifecycle operation. Plans are pure values; the db layer
//! applies a whole plan inside a single database transaction, so either
//! every inventory effect and journal entry lands or none do.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use kasira_shared::types::{AccountId, JournalId};

use crate::accounts::AccountRef;
use crate::inventory::{Batch, BatchAllocator, BatchDraw, ConsumptionPlan, ReceiveBatchInput};
use crate::ledger::{
    JournalDraft, JournalEntryInput, LedgerPoster, PurchaseAccounts, ResolvedJournalEntry,
    SaleAccounts,
};

use super::error::LifecycleError;
use super::types::{PurchaseLineInput, SaleLineInput};

/// Everything posting a purchase changes.
#[derive(Debug, Clone)]
pub struct PurchasePostingPlan {
    /// New batches, one per line, remaining = total.
    pub batches: Vec<Batch>,
    /// Balanced journal; `None` for a zero-total purchase (all lines at
    /// zero cost), which has no financial effect.
    pub journal: Option<JournalDraft>,
    /// Derived purchase total: `Σ quantity × unit_cost`.
    pub total: Decimal,
}

/// Everything posting a sale changes.
#[derive(Debug, Clone)]
pub struct SalePostingPlan {
    /// Batch consumption, one plan per line, in line order.
    pub consumptions: Vec<ConsumptionPlan>,
    /// The four-legged sale journal (two legs when cost is zero).
    pub journal: JournalDraft,
    /// Derived sale total: `Σ quantity × unit_price`.
    pub total: Decimal,
    /// Derived cost of goods: sum of consumption plan costs.
    pub cost_total: Decimal,
}

/// Everything cancelling a posted sale changes.
#[derive(Debug, Clone)]
pub struct SaleCancellationPlan {
    /// The linked reversing journal.
    pub journal: JournalDraft,
    /// Draws to restore onto their batches, exactly as consumed.
    pub restore: Vec<BatchDraw>,
}

/// Everything cancelling a posted purchase changes.
#[derive(Debug, Clone)]
pub struct PurchaseCancellationPlan {
    /// The linked reversing journal; `None` when the purchase posted
    /// without one.
    pub journal: Option<JournalDraft>,
    /// Draws that zero out the purchase's untouched batches.
    pub drain: Vec<BatchDraw>,
}

/// Stateless posting planner.
pub struct PostingPlanner;

impl PostingPlanner {
    /// Plans posting a draft purchase: one batch per line plus the
    /// debit-inventory / credit-payable journal.
    ///
    /// Batch sequences are assigned from `next_sequence` in line order so
    /// same-day receipts still consume first-in-first-out.
    ///
    /// # Errors
    ///
    /// `EmptyTransaction` without lines; line validation and journal
    /// errors pass through.
    pub fn plan_purchase<F>(
        entry_date: NaiveDate,
        description: &str,
        lines: &[PurchaseLineInput],
        accounts: PurchaseAccounts,
        next_sequence: i64,
        account_lookup: F,
    ) -> Result<PurchasePostingPlan, LifecycleError>
    where
        F: Fn(AccountId) -> Option<AccountRef>,
    {
        if lines.is_empty() {
            return Err(LifecycleError::EmptyTransaction);
        }

        let mut batches = Vec::with_capacity(lines.len());
        for (offset, line) in lines.iter().enumerate() {
            let input = ReceiveBatchInput {
                product_unit_id: line.product_unit_id,
                quantity: line.quantity,
                unit_cost: line.unit_cost,
                production_date: line.production_date,
                expiry_date: line.expiry_date,
            };
            let sequence = next_sequence + i64::try_from(offset).unwrap_or(i64::MAX);
            batches.push(BatchAllocator::receive(&input, sequence)?);
        }

        let total: Decimal = lines.iter().map(PurchaseLineInput::total).sum();
        let journal = if total > Decimal::ZERO {
            let inputs = LedgerPoster::purchase_entries(accounts, total);
            Some(LedgerPoster::prepare_journal(
                entry_date,
                description,
                &inputs,
                account_lookup,
            )?)
        } else {
            None
        };

        Ok(PurchasePostingPlan {
            batches,
            journal,
            total,
        })
    }

    /// Plans posting a draft sale: batch consumption per line plus the
    /// receivable/revenue and cost/inventory journal legs.
    ///
    /// Lines are planned in order against a working copy of the batches,
    /// so several lines of the same product unit see each other's draws.
    /// All-or-nothing: the first line that cannot be covered fails the
    /// whole plan.
    ///
    /// # Errors
    ///
    /// `EmptyTransaction` without lines, `InvalidUnitPrice` for
    /// non-positive prices; allocator and journal errors pass through.
    pub fn plan_sale<F>(
        entry_date: NaiveDate,
        description: &str,
        lines: &[SaleLineInput],
        batches: &[Batch],
        accounts: SaleAccounts,
        account_lookup: F,
    ) -> Result<SalePostingPlan, LifecycleError>
    where
        F: Fn(AccountId) -> Option<AccountRef>,
    {
        if lines.is_empty() {
            return Err(LifecycleError::EmptyTransaction);
        }
        for line in lines {
            if line.unit_price <= Decimal::ZERO {
                return Err(LifecycleError::InvalidUnitPrice(line.unit_price));
            }
        }

        let mut working: Vec<Batch> = batches.to_vec();
        let mut consumptions = Vec::with_capacity(lines.len());
        for line in lines {
            let plan =
                BatchAllocator::plan_consumption(line.product_unit_id, &working, line.quantity)?;
            BatchAllocator::apply(&mut working, &plan.draws)?;
            consumptions.push(plan);
        }

        let total: Decimal = lines.iter().map(SaleLineInput::total).sum();
        let cost_total: Decimal = consumptions.iter().map(ConsumptionPlan::total_cost).sum();

        let inputs = LedgerPoster::sale_entries(accounts, total, cost_total);
        let journal =
            LedgerPoster::prepare_journal(entry_date, description, &inputs, account_lookup)?;

        Ok(SalePostingPlan {
            consumptions,
            journal,
            total,
            cost_total,
        })
    }

    /// Plans posting a draft adjustment: the caller's entries, validated
    /// and balanced, with no inventory effect.
    ///
    /// # Errors
    ///
    /// `EmptyTransaction` without entries; journal errors pass through.
    pub fn plan_adjustment<F>(
        entry_date: NaiveDate,
        description: &str,
        entries: &[JournalEntryInput],
        account_lookup: F,
    ) -> Result<JournalDraft, LifecycleError>
    where
        F: Fn(AccountId) -> Option<AccountRef>,
    {
        if entries.is_empty() {
            return Err(LifecycleError::EmptyTransaction);
        }
        Ok(LedgerPoster::prepare_journal(
            entry_date,
            description,
            entries,
            account_lookup,
        )?)
    }

    /// Plans cancelling a posted sale: reverse the journal and restore
    /// the recorded draws onto their batches.
    ///
    /// # Errors
    ///
    /// Journal errors pass through.
    pub fn plan_sale_cancellation<F>(
        entry_date: NaiveDate,
        description: &str,
        original: JournalId,
        original_entries: &[ResolvedJournalEntry],
        draws: &[BatchDraw],
        account_lookup: F,
    ) -> Result<SaleCancellationPlan, LifecycleError>
    where
        F: Fn(AccountId) -> Option<AccountRef>,
    {
        let journal = LedgerPoster::prepare_reversal(
            entry_date,
            description,
            original,
            original_entries,
            account_lookup,
        )?;
        Ok(SaleCancellationPlan {
            journal,
            restore: draws.to_vec(),
        })
    }

    /// Plans cancelling a posted purchase: reverse the journal and drain
    /// the purchase's batches back to zero.
    ///
    /// # Errors
    ///
    /// `BatchAlreadyConsumed` if any stock from the purchase has been
    /// sold; the consuming sales must be cancelled first. Journal errors
    /// pass through.
    pub fn plan_purchase_cancellation<F>(
        entry_date: NaiveDate,
        description: &str,
        original: Option<(JournalId, &[ResolvedJournalEntry])>,
        batches: &[Batch],
        account_lookup: F,
    ) -> Result<PurchaseCancellationPlan, LifecycleError>
    where
        F: Fn(AccountId) -> Option<AccountRef>,
    {
        let mut drain = Vec::with_capacity(batches.len());
        for batch in batches {
            if batch.remaining_quantity < batch.total_quantity {
                return Err(LifecycleError::BatchAlreadyConsumed {
                    batch_id: batch.id,
                    consumed: batch.total_quantity - batch.remaining_quantity,
                });
            }
            drain.push(BatchDraw {
                batch_id: batch.id,
                quantity: batch.remaining_quantity,
                unit_cost: batch.unit_cost,
            });
        }

        let journal = match original {
            Some((id, entries)) => Some(LedgerPoster::prepare_reversal(
                entry_date,
                description,
                id,
                entries,
                account_lookup,
            )?),
            None => None,
        };

        Ok(PurchaseCancellationPlan { journal, drain })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    use crate::accounts::NormalBalance;
    use crate::inventory::InventoryError;
    use kasira_shared::types::ProductUnitId;

    struct Chart {
        accounts: Vec<AccountRef>,
    }

    impl Chart {
        fn new(codes: &[&str]) -> Self {
            let accounts = codes
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

    fn purchase_accounts(chart: &Chart) -> PurchaseAccounts {
        PurchaseAccounts {
            inventory: chart.id("1200"),
            payable: chart.id("2000"),
        }
    }

    fn sale_accounts(chart: &Chart) -> SaleAccounts {
        SaleAccounts {
            receivable: chart.id("1100"),
            revenue: chart.id("4000"),
            cogs: chart.id("5000"),
            inventory: chart.id("1200"),
        }
    }

    fn chart() -> Chart {
        Chart::new(&["1100", "1200", "2000", "4000", "5000"])
    }

    #[test]
    fn test_purchase_then_sale_scenario() {
        // Buy 100 units at 2.00, sell 60 at 5.00.
        let chart = chart();
        let pu = ProductUnitId::new();

        let purchase = PostingPlanner::plan_purchase(
            date(),
            "Restock",
            &[PurchaseLineInput {
                product_unit_id: pu,
                quantity: dec!(100),
                unit_cost: dec!(2.00),
                production_date: None,
                expiry_date: None,
            }],
            purchase_accounts(&chart),
            1,
            chart.lookup(),
        )
        .unwrap();

        assert_eq!(purchase.total, dec!(200.00));
        assert_eq!(purchase.batches.len(), 1);
        let journal = purchase.journal.as_ref().unwrap();
        assert_eq!(journal.totals.debit, dec!(200.00));

        let sale = PostingPlanner::plan_sale(
            date(),
            "Walk-in sale",
            &[SaleLineInput {
                product_unit_id: pu,
                quantity: dec!(60),
                unit_price: dec!(5.00),
            }],
            &purchase.batches,
            sale_accounts(&chart),
            chart.lookup(),
        )
        .unwrap();

        assert_eq!(sale.total, dec!(300.00));
        assert_eq!(sale.cost_total, dec!(120.00));
        assert_eq!(sale.journal.entries.len(), 4);
        assert_eq!(sale.journal.totals.debit, dec!(420.00));
        assert!(sale.journal.totals.is_balanced);

        // The plan leaves 40 on the batch once applied.
        let mut batches = purchase.batches;
        BatchAllocator::apply(&mut batches, &sale.consumptions[0].draws).unwrap();
        assert_eq!(batches[0].remaining_quantity, dec!(40));

        // AR debit and revenue credit carry the sale total; COGS debit and
        // inventory credit carry the consumed cost.
        let by_account = |id: AccountId| {
            sale.journal
                .entries
                .iter()
                .find(|e| e.account_id == id)
                .unwrap()
        };
        assert_eq!(by_account(chart.id("1100")).debit, dec!(300.00));
        assert_eq!(by_account(chart.id("4000")).credit, dec!(300.00));
        assert_eq!(by_account(chart.id("5000")).debit, dec!(120.00));
        assert_eq!(by_account(chart.id("1200")).credit, dec!(120.00));
    }

    #[test]
    fn test_oversell_fails_whole_plan() {
        let chart = chart();
        let pu = ProductUnitId::new();

        let purchase = PostingPlanner::plan_purchase(
            date(),
            "Restock",
            &[PurchaseLineInput {
                product_unit_id: pu,
                quantity: dec!(100),
                unit_cost: dec!(2.00),
                production_date: None,
                expiry_date: None,
            }],
            purchase_accounts(&chart),
            1,
            chart.lookup(),
        )
        .unwrap();

        let err = PostingPlanner::plan_sale(
            date(),
            "Oversell",
            &[SaleLineInput {
                product_unit_id: pu,
                quantity: dec!(150),
                unit_price: dec!(5.00),
            }],
            &purchase.batches,
            sale_accounts(&chart),
            chart.lookup(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LifecycleError::Inventory(InventoryError::InsufficientStock {
                requested,
                available,
                ..
            }) if requested == dec!(150) && available == dec!(100)
        ));
        // Planning never touched the stored batches.
        assert_eq!(purchase.batches[0].remaining_quantity, dec!(100));
    }

    #[test]
    fn test_multi_line_sale_shares_stock() {
        let chart = chart();
        let pu = ProductUnitId::new();

        let purchase = PostingPlanner::plan_purchase(
            date(),
            "Restock",
            &[PurchaseLineInput {
                product_unit_id: pu,
                quantity: dec!(100),
                unit_cost: dec!(2.00),
                production_date: None,
                expiry_date: None,
            }],
            purchase_accounts(&chart),
            1,
            chart.lookup(),
        )
        .unwrap();

        // Two lines of the same unit totalling 100 fit exactly.
        let ok = PostingPlanner::plan_sale(
            date(),
            "Two lines",
            &[
                SaleLineInput {
                    product_unit_id: pu,
                    quantity: dec!(70),
                    unit_price: dec!(5.00),
                },
                SaleLineInput {
                    product_unit_id: pu,
                    quantity: dec!(30),
                    unit_price: dec!(4.00),
                },
            ],
            &purchase.batches,
            sale_accounts(&chart),
            chart.lookup(),
        )
        .unwrap();
        assert_eq!(ok.cost_total, dec!(200.00));

        // Totalling 101 fails on the second line.
        let err = PostingPlanner::plan_sale(
            date(),
            "Two lines",
            &[
                SaleLineInput {
                    product_unit_id: pu,
                    quantity: dec!(70),
                    unit_price: dec!(5.00),
                },
                SaleLineInput {
                    product_unit_id: pu,
                    quantity: dec!(31),
                    unit_price: dec!(4.00),
                },
            ],
            &purchase.batches,
            sale_accounts(&chart),
            chart.lookup(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::Inventory(InventoryError::InsufficientStock { available, .. })
                if available == dec!(30)
        ));
    }

    #[test]
    fn test_empty_and_invalid_lines_rejected() {
        let chart = chart();

        assert!(matches!(
            PostingPlanner::plan_purchase(
                date(),
                "Empty",
                &[],
                purchase_accounts(&chart),
                1,
                chart.lookup(),
            ),
            Err(LifecycleError::EmptyTransaction)
        ));

        assert!(matches!(
            PostingPlanner::plan_sale(
                date(),
                "Free",
                &[SaleLineInput {
                    product_unit_id: ProductUnitId::new(),
                    quantity: dec!(1),
                    unit_price: dec!(0),
                }],
                &[],
                sale_accounts(&chart),
                chart.lookup(),
            ),
            Err(LifecycleError::InvalidUnitPrice(_))
        ));
    }

    #[test]
    fn test_zero_cost_purchase_posts_without_journal() {
        let chart = chart();
        let plan = PostingPlanner::plan_purchase(
            date(),
            "Donated stock",
            &[PurchaseLineInput {
                product_unit_id: ProductUnitId::new(),
                quantity: dec!(10),
                unit_cost: dec!(0),
                production_date: None,
                expiry_date: None,
            }],
            purchase_accounts(&chart),
            1,
            chart.lookup(),
        )
        .unwrap();

        assert!(plan.journal.is_none());
        assert_eq!(plan.total, dec!(0));
        assert_eq!(plan.batches[0].remaining_quantity, dec!(10));
    }

    #[test]
    fn test_sale_cancellation_round_trip() {
        let chart = chart();
        let pu = ProductUnitId::new();

        let purchase = PostingPlanner::plan_purchase(
            date(),
            "Restock",
            &[PurchaseLineInput {
                product_unit_id: pu,
                quantity: dec!(100),
                unit_cost: dec!(2.00),
                production_date: None,
                expiry_date: None,
            }],
            purchase_accounts(&chart),
            1,
            chart.lookup(),
        )
        .unwrap();

        let sale = PostingPlanner::plan_sale(
            date(),
            "Sale",
            &[SaleLineInput {
                product_unit_id: pu,
                quantity: dec!(60),
                unit_price: dec!(5.00),
            }],
            &purchase.batches,
            sale_accounts(&chart),
            chart.lookup(),
        )
        .unwrap();

        let mut batches = purchase.batches;
        BatchAllocator::apply(&mut batches, &sale.consumptions[0].draws).unwrap();

        let cancellation = PostingPlanner::plan_sale_cancellation(
            date(),
            "Cancel sale",
            JournalId::new(),
            &sale.journal.entries,
            &sale.consumptions[0].draws,
            chart.lookup(),
        )
        .unwrap();

        BatchAllocator::reverse(&mut batches, &cancellation.restore).unwrap();
        assert_eq!(batches[0].remaining_quantity, dec!(100));

        // Reversal nets the original journal to zero per account.
        assert!(cancellation.journal.totals.is_balanced);
        for (orig, rev) in sale.journal.entries.iter().zip(&cancellation.journal.entries) {
            assert_eq!(orig.debit, rev.credit);
            assert_eq!(orig.credit, rev.debit);
        }
    }

    #[test]
    fn test_purchase_cancellation_requires_untouched_batches() {
        let chart = chart();
        let pu = ProductUnitId::new();

        let purchase = PostingPlanner::plan_purchase(
            date(),
            "Restock",
            &[PurchaseLineInput {
                product_unit_id: pu,
                quantity: dec!(100),
                unit_cost: dec!(2.00),
                production_date: None,
                expiry_date: None,
            }],
            purchase_accounts(&chart),
            1,
            chart.lookup(),
        )
        .unwrap();
        let journal = purchase.journal.unwrap();
        let journal_id = JournalId::new();

        // Untouched: cancellation drains the batch and reverses the journal.
        let plan = PostingPlanner::plan_purchase_cancellation(
            date(),
            "Cancel purchase",
            Some((journal_id, &journal.entries)),
            &purchase.batches,
            chart.lookup(),
        )
        .unwrap();
        assert_eq!(plan.drain[0].quantity, dec!(100));
        assert_eq!(plan.journal.unwrap().reverses, Some(journal_id));

        // Partially sold: cancellation is refused.
        let mut consumed = purchase.batches.clone();
        consumed[0].remaining_quantity = dec!(40);
        let err = PostingPlanner::plan_purchase_cancellation(
            date(),
            "Cancel purchase",
            Some((journal_id, &journal.entries)),
            &consumed,
            chart.lookup(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::BatchAlreadyConsumed { consumed, .. } if consumed == dec!(60)
        ));
    }
}
