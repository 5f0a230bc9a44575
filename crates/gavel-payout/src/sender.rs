//! Escrow-fallback sending.
//!
//! Every payout path in the engine funnels through [`pay`]. It never fails
//! visibly: a direct transfer that the recipient rejects (or that exceeds
//! its send budget) is converted into an escrow-ledger credit the recipient
//! can withdraw later. Per call, the amount is either delivered or
//! escrowed — no path drops value.

use gavel_types::{Address, EscrowLedger, SendBudget, ValueBank};

/// What happened to one payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayOutcome {
    /// `amount == 0`: nothing sent, nothing escrowed, no event.
    Skipped,
    /// Direct transfer succeeded within the budget.
    Delivered,
    /// Direct transfer failed; the amount was credited to the recipient's
    /// escrow-ledger balance instead.
    Escrowed,
}

/// Pay `amount` to `recipient`, falling back to the escrow ledger.
///
/// The budget caps how much execution the recipient's receive path may
/// consume, so a hostile recipient cannot block unrelated payouts in the
/// same settlement.
pub fn pay(
    bank: &mut dyn ValueBank,
    ledger: &mut dyn EscrowLedger,
    recipient: Address,
    amount: u128,
    budget: SendBudget,
) -> PayOutcome {
    if amount == 0 {
        return PayOutcome::Skipped;
    }
    match bank.send(recipient, amount, budget) {
        Ok(()) => {
            tracing::debug!(recipient = %recipient, amount, "direct payout delivered");
            PayOutcome::Delivered
        }
        Err(err) => {
            tracing::warn!(
                recipient = %recipient,
                amount,
                %err,
                "direct payout failed; crediting escrow ledger"
            );
            ledger.deposit_for(recipient, amount);
            PayOutcome::Escrowed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_types::constants::{SEND_BUDGET_FANOUT, SEND_BUDGET_SINGLE};
    use gavel_types::mock::{MemoryLedger, MockBank};

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    #[test]
    fn zero_amount_is_a_noop() {
        let mut bank = MockBank::new();
        let mut ledger = MemoryLedger::new();
        let outcome = pay(
            &mut bank,
            &mut ledger,
            addr(1),
            0,
            SendBudget(SEND_BUDGET_SINGLE),
        );
        assert_eq!(outcome, PayOutcome::Skipped);
        assert!(bank.deliveries().is_empty());
        assert_eq!(ledger.balance_of(addr(1)), 0);
    }

    #[test]
    fn successful_send_is_delivered() {
        let mut bank = MockBank::new();
        let mut ledger = MemoryLedger::new();
        let outcome = pay(
            &mut bank,
            &mut ledger,
            addr(1),
            500,
            SendBudget(SEND_BUDGET_SINGLE),
        );
        assert_eq!(outcome, PayOutcome::Delivered);
        assert_eq!(bank.delivered_to(addr(1)), 500);
        assert_eq!(ledger.balance_of(addr(1)), 0);
    }

    #[test]
    fn rejecting_recipient_is_escrowed_in_full() {
        let mut bank = MockBank::new();
        bank.reject(addr(2));
        let mut ledger = MemoryLedger::new();
        let outcome = pay(
            &mut bank,
            &mut ledger,
            addr(2),
            1_000_000,
            SendBudget(SEND_BUDGET_SINGLE),
        );
        assert_eq!(outcome, PayOutcome::Escrowed);
        assert_eq!(bank.delivered_to(addr(2)), 0, "direct balance unaffected");
        assert_eq!(ledger.balance_of(addr(2)), 1_000_000);
    }

    #[test]
    fn budget_exceeded_falls_back_to_escrow() {
        let mut bank = MockBank::new();
        bank.require_budget(addr(3), SEND_BUDGET_FANOUT);
        let mut ledger = MemoryLedger::new();

        // The small single-disbursement budget is not enough for this
        // recipient, so the amount lands in escrow.
        let outcome = pay(
            &mut bank,
            &mut ledger,
            addr(3),
            77,
            SendBudget(SEND_BUDGET_SINGLE),
        );
        assert_eq!(outcome, PayOutcome::Escrowed);
        assert_eq!(ledger.balance_of(addr(3)), 77);

        // The fan-out budget clears it.
        let outcome = pay(
            &mut bank,
            &mut ledger,
            addr(3),
            77,
            SendBudget(SEND_BUDGET_FANOUT),
        );
        assert_eq!(outcome, PayOutcome::Delivered);
        assert_eq!(bank.delivered_to(addr(3)), 77);
    }

    #[test]
    fn value_is_conserved_per_call() {
        let mut bank = MockBank::new();
        bank.reject(addr(4));
        let mut ledger = MemoryLedger::new();

        for (to, amount) in [(addr(4), 10u128), (addr(5), 20), (addr(4), 30)] {
            pay(
                &mut bank,
                &mut ledger,
                to,
                amount,
                SendBudget(SEND_BUDGET_SINGLE),
            );
        }
        let delivered: u128 = bank.deliveries().iter().map(|(_, a)| a).sum();
        let escrowed = ledger.balance_of(addr(4)) + ledger.balance_of(addr(5));
        assert_eq!(delivered + escrowed, 60);
    }
}
