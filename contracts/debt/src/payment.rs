//! Interest accrual and payment-window rules.
//!
//! Nothing here runs on a timer. Every figure is derived from the timestamps
//! stored on the [`Debt`] and the ledger time of the calling transaction.
//!
//! # Accrual
//! Simple (non-compounding) interest, credited once per whole elapsed accrual
//! interval since activation:
//!
//! ```text
//! periods = floor((now - activated_at) / accrual_interval)
//! earned  = min(interest, interest * periods * accrual_interval / YEAR)
//! accrued = earned - interest_paid
//! ```
//!
//! `interest` is the full required interest, so it is reached after one year
//! of accrual and never exceeded.

use crate::schedule::YEAR;
use crate::types::Debt;

/// Total interest credited to the payee since activation, paid or not.
pub fn earned_interest(debt: &Debt, now: u64) -> i128 {
    if !debt.owed || debt.accrual_interval == 0 || now < debt.activated_at {
        return 0;
    }
    let periods = (now - debt.activated_at) / debt.accrual_interval;
    let elapsed = periods.saturating_mul(debt.accrual_interval);
    match debt.interest.checked_mul(elapsed as i128) {
        Some(scaled) => (scaled / YEAR as i128).min(debt.interest),
        // Product only overflows far past the one-year cap.
        None => debt.interest,
    }
}

/// Interest the payee may withdraw right now.
pub fn accrued_interest(debt: &Debt, now: u64) -> i128 {
    earned_interest(debt, now)
        .saturating_sub(debt.interest_paid)
        .max(0)
}

/// Write the current accrual into the record: claimable balance and next accrual time.
pub fn accrue(debt: &mut Debt, now: u64) {
    if !debt.owed || debt.accrual_interval == 0 || now < debt.activated_at {
        return;
    }
    let periods = (now - debt.activated_at) / debt.accrual_interval;
    debt.accrued_interest = accrued_interest(debt, now);
    debt.next_accrual = debt.activated_at.saturating_add(
        periods
            .saturating_add(1)
            .saturating_mul(debt.accrual_interval),
    );
}

/// `now` lies in `[next_payment, next_payment + window]`, both ends inclusive.
pub fn is_within_window(next_payment: u64, window: u64, now: u64) -> bool {
    now >= next_payment && now <= next_payment.saturating_add(window)
}

pub fn is_payment_overdue(debt: &Debt, now: u64, window: u64) -> bool {
    debt.owed && !debt.status.is_terminal() && now > debt.next_payment.saturating_add(window)
}

/// Number of payment windows, starting at `next_payment`, that closed before `now`.
pub fn missed_windows(debt: &Debt, now: u64, window: u64) -> u64 {
    if !is_payment_overdue(debt, now, window) || debt.payment_interval == 0 {
        return 0;
    }
    let closed_at = debt.next_payment.saturating_add(window);
    (now - closed_at - 1) / debt.payment_interval + 1
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schedule::{DAY, MONTH};
    use crate::types::{DebtStatus, Schedule};

    const START: u64 = 1_000_000;

    fn owed_debt(interest: i128) -> Debt {
        Debt {
            id: 1,
            payee: 42,
            payer: Some(7),
            status: DebtStatus::Locked,
            created_at: START,
            payment_schedule: Schedule::Monthly,
            payment_interval: MONTH,
            next_payment: START + MONTH,
            accrual_schedule: Schedule::Daily,
            accrual_interval: DAY,
            next_accrual: START + DAY,
            activated_at: START,
            principal: interest * 20,
            apr_bps: 500,
            interest,
            fee: 0,
            expiration: u64::MAX,
            locked_interest: interest,
            accrued_interest: 0,
            interest_paid: 0,
            owed: true,
            disputed: false,
            missed_payments: 0,
        }
    }

    #[test]
    fn test_nothing_accrues_before_first_interval() {
        let debt = owed_debt(365_000);
        assert_eq!(earned_interest(&debt, START), 0);
        assert_eq!(earned_interest(&debt, START + DAY - 1), 0);
    }

    #[test]
    fn test_accrues_per_whole_interval() {
        let debt = owed_debt(365_000);
        assert_eq!(earned_interest(&debt, START + DAY), 1_000);
        assert_eq!(earned_interest(&debt, START + DAY + DAY / 2), 1_000);
        assert_eq!(earned_interest(&debt, START + 30 * DAY), 30_000);
    }

    #[test]
    fn test_accrual_caps_at_required_interest() {
        let debt = owed_debt(365_000);
        assert_eq!(earned_interest(&debt, START + YEAR), 365_000);
        assert_eq!(earned_interest(&debt, START + 10 * YEAR), 365_000);
        assert_eq!(earned_interest(&debt, u64::MAX), 365_000);
    }

    #[test]
    fn test_not_owed_accrues_nothing() {
        let mut debt = owed_debt(365_000);
        debt.owed = false;
        assert_eq!(earned_interest(&debt, START + YEAR), 0);
    }

    #[test]
    fn test_accrued_subtracts_paid() {
        let mut debt = owed_debt(365_000);
        debt.interest_paid = 20_000;
        assert_eq!(accrued_interest(&debt, START + 30 * DAY), 10_000);
    }

    #[test]
    fn test_accrue_sets_balance_and_next_accrual() {
        let mut debt = owed_debt(365_000);
        accrue(&mut debt, START + 3 * DAY + 5);
        assert_eq!(debt.accrued_interest, 3_000);
        assert_eq!(debt.next_accrual, START + 4 * DAY);
    }

    #[test]
    fn test_window_edges_inclusive() {
        let due = START + MONTH;
        assert!(!is_within_window(due, DAY, due - 1));
        assert!(is_within_window(due, DAY, due));
        assert!(is_within_window(due, DAY, due + DAY));
        assert!(!is_within_window(due, DAY, due + DAY + 1));
    }

    #[test]
    fn test_overdue_only_after_window_closes() {
        let debt = owed_debt(365_000);
        assert!(!is_payment_overdue(&debt, debt.next_payment + DAY, DAY));
        assert!(is_payment_overdue(&debt, debt.next_payment + DAY + 1, DAY));
    }

    #[test]
    fn test_terminal_debt_never_overdue() {
        let mut debt = owed_debt(365_000);
        debt.status = DebtStatus::Repaid;
        assert!(!is_payment_overdue(&debt, u64::MAX, DAY));
    }

    #[test]
    fn test_missed_window_count() {
        let debt = owed_debt(365_000);
        let first_close = debt.next_payment + DAY;
        assert_eq!(missed_windows(&debt, first_close, DAY), 0);
        assert_eq!(missed_windows(&debt, first_close + 1, DAY), 1);
        assert_eq!(missed_windows(&debt, first_close + MONTH, DAY), 1);
        assert_eq!(missed_windows(&debt, first_close + MONTH + 1, DAY), 2);
    }
}
