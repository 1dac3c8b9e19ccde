#![no_std]

//! Debt ledger contract: escrowed, interest-bearing obligations between a
//! payee and a payer.
//!
//! A payee creates a debt with an APR. A payer binds itself on its first lock,
//! escrows principal, then escrows the interest that principal requires. The
//! lock that completes the interest releases the principal to the payer and
//! starts the payment phase, during which the payee collects accrued interest
//! once per payment window.
//!
//! # Atomicity
//! Every operation checks all of its preconditions before the first storage
//! write and calls the escrow ledger last. An escrow call that traps reverts
//! the whole invocation, so a debt is never left half-updated.

mod events;
mod gateway;
mod payment;
mod schedule;
mod storage;
mod types;


use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Env, Vec};

use events::{
    publish_debt_closed, publish_debt_created, publish_dispute, publish_interest_paid,
    publish_lock_interest, publish_lock_principal, publish_missed_payment,
    publish_rearrangement, publish_release_principal, DebtClosedEvent, DebtCreatedEvent,
    DisputeEvent, InterestPaidEvent, LockInterestEvent, LockPrincipalEvent, MissedPaymentEvent,
    RearrangementEvent, ReleasePrincipalEvent,
};
use gateway::{ConsentServiceClient, EscrowLedgerClient, IdentityGatewayClient};
pub use types::{Debt, DebtStatus, LedgerConfig, LedgerError, Schedule};

/// Maximum APR in basis points (100%).
const MAX_APR_BPS: u32 = 10_000;
const BPS_DIVISOR: i128 = 10_000;

/// Resolve `caller` to an identity and confirm it is a registered participant.
fn authorize(env: &Env, config: &LedgerConfig, caller: &Address) -> Result<u64, LedgerError> {
    caller.require_auth();
    let gateway = IdentityGatewayClient::new(env, &config.identity_gateway);
    let identity = gateway.resolve_identity(caller);
    if !gateway.is_authorized_participant(&identity) {
        return Err(LedgerError::Unauthorized);
    }
    Ok(identity)
}

fn require_payee(debt: &Debt, identity: u64) -> Result<(), LedgerError> {
    if debt.payee != identity {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}

fn require_party(debt: &Debt, identity: u64) -> Result<(), LedgerError> {
    if identity != debt.payee && debt.payer != Some(identity) {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}

fn bound_payer(debt: &Debt) -> Result<u64, LedgerError> {
    debt.payer.ok_or(LedgerError::InvalidState)
}

/// Bind `identity` as payer if none is set yet, otherwise require it to be the payer.
fn bind_payer(debt: &mut Debt, identity: u64) -> Result<u64, LedgerError> {
    match debt.payer {
        Some(payer) if payer == identity => Ok(payer),
        Some(_) => Err(LedgerError::Unauthorized),
        None if identity == debt.payee => Err(LedgerError::Unauthorized),
        None => {
            debt.payer = Some(identity);
            debt.status = DebtStatus::Locked;
            Ok(identity)
        }
    }
}

/// Escrow may only grow until the principal has been released.
fn require_lockable(env: &Env, debt: &Debt) -> Result<(), LedgerError> {
    if debt.status.is_terminal() || debt.owed {
        return Err(LedgerError::InvalidState);
    }
    if env.ledger().timestamp() > debt.expiration {
        return Err(LedgerError::InvalidState);
    }
    Ok(())
}

fn required_interest(principal: i128, apr_bps: u32) -> Result<i128, LedgerError> {
    principal
        .checked_mul(apr_bps as i128)
        .map(|scaled| scaled / BPS_DIVISOR)
        .ok_or(LedgerError::Overflow)
}

/// Load a debt whose terms the payee may still change: no payer bound yet.
fn load_for_rearrangement(
    env: &Env,
    caller: &Address,
    debt_id: u64,
) -> Result<Debt, LedgerError> {
    let config = storage::read_config(env)?;
    let identity = authorize(env, &config, caller)?;
    let debt = storage::read_debt(env, debt_id)?;
    require_payee(&debt, identity)?;
    if debt.payer.is_some() || debt.status != DebtStatus::Created {
        return Err(LedgerError::InvalidState);
    }
    Ok(debt)
}

fn consent_confirmed(env: &Env, config: &LedgerConfig, debt_id: u64) -> bool {
    ConsentServiceClient::new(env, &config.consent).is_consent_confirmed(&debt_id)
}

#[contract]
pub struct DebtLedger;

#[contractimpl]
impl DebtLedger {
    /// Initialize with the admin and the addresses of the external collaborators.
    pub fn init(
        env: Env,
        admin: Address,
        identity_gateway: Address,
        escrow: Address,
        consent: Address,
        payment_window: u64,
    ) -> Result<(), LedgerError> {
        if storage::is_initialized(&env) {
            return Err(LedgerError::AlreadyInitialized);
        }
        storage::write_admin(&env, &admin);
        storage::write_config(
            &env,
            &LedgerConfig {
                identity_gateway,
                escrow,
                consent,
                payment_window,
            },
        );
        Ok(())
    }

    /// Replace the payment window tolerance (admin only).
    pub fn set_payment_window(env: Env, payment_window: u64) -> Result<(), LedgerError> {
        let admin = storage::read_admin(&env)?;
        admin.require_auth();
        let mut config = storage::read_config(&env)?;
        config.payment_window = payment_window;
        storage::write_config(&env, &config);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, LedgerError> {
        storage::read_config(&env)
    }

    /// Create a debt owned by the caller's identity. Returns the new debt id.
    ///
    /// Defaults: daily accrual, monthly payments, no principal, no expiration.
    ///
    /// # Errors
    /// * `Unauthorized` – caller is not a registered participant
    /// * `InvalidAmount` – `apr_bps` above 10000 or negative `fee`
    pub fn create_debt(
        env: Env,
        caller: Address,
        apr_bps: u32,
        fee: i128,
    ) -> Result<u64, LedgerError> {
        let config = storage::read_config(&env)?;
        let payee = authorize(&env, &config, &caller)?;
        if apr_bps > MAX_APR_BPS || fee < 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let debt_id = storage::take_debt_id(&env)?;
        let accrual_schedule = Schedule::Daily;
        let payment_schedule = Schedule::Monthly;
        let debt = Debt {
            id: debt_id,
            payee,
            payer: None,
            status: DebtStatus::Created,
            created_at: env.ledger().timestamp(),
            payment_schedule,
            payment_interval: payment_schedule.interval(),
            next_payment: 0,
            accrual_schedule,
            accrual_interval: accrual_schedule.interval(),
            next_accrual: 0,
            activated_at: 0,
            principal: 0,
            apr_bps,
            interest: 0,
            fee,
            expiration: u64::MAX,
            locked_interest: 0,
            accrued_interest: 0,
            interest_paid: 0,
            owed: false,
            disputed: false,
            missed_payments: 0,
        };
        storage::insert_debt(&env, &debt)?;

        log!(&env, "debt created", debt_id, payee);
        publish_debt_created(
            &env,
            DebtCreatedEvent {
                debt_id,
                payee,
                apr_bps,
                fee,
            },
        );
        Ok(debt_id)
    }

    /// Set the accrual cadence (payee only, before a payer is bound).
    pub fn set_accrual_schedule(
        env: Env,
        debt_id: u64,
        caller: Address,
        schedule: u32,
    ) -> Result<(), LedgerError> {
        let mut debt = load_for_rearrangement(&env, &caller, debt_id)?;
        let schedule = Schedule::from_tag(schedule)?;
        debt.accrual_schedule = schedule;
        debt.accrual_interval = schedule.interval();
        storage::write_debt(&env, &debt);

        publish_rearrangement(
            &env,
            RearrangementEvent {
                debt_id,
                payee: debt.payee,
                target: symbol_short!("accrual"),
                value: debt.accrual_interval,
            },
        );
        Ok(())
    }

    /// Set the payment cadence (payee only, before a payer is bound).
    pub fn set_payment_schedule(
        env: Env,
        debt_id: u64,
        caller: Address,
        schedule: u32,
    ) -> Result<(), LedgerError> {
        let mut debt = load_for_rearrangement(&env, &caller, debt_id)?;
        let schedule = Schedule::from_tag(schedule)?;
        debt.payment_schedule = schedule;
        debt.payment_interval = schedule.interval();
        storage::write_debt(&env, &debt);

        publish_rearrangement(
            &env,
            RearrangementEvent {
                debt_id,
                payee: debt.payee,
                target: symbol_short!("payment"),
                value: debt.payment_interval,
            },
        );
        Ok(())
    }

    /// Set the time after which no payer may lock into this debt.
    pub fn set_expiration(
        env: Env,
        debt_id: u64,
        caller: Address,
        expiration: u64,
    ) -> Result<(), LedgerError> {
        let mut debt = load_for_rearrangement(&env, &caller, debt_id)?;
        if expiration <= env.ledger().timestamp() {
            return Err(LedgerError::InvalidState);
        }
        debt.expiration = expiration;
        storage::write_debt(&env, &debt);

        publish_rearrangement(
            &env,
            RearrangementEvent {
                debt_id,
                payee: debt.payee,
                target: symbol_short!("expiry"),
                value: expiration,
            },
        );
        Ok(())
    }

    /// Escrow `amount` of principal from the payer, binding the caller as payer on first use.
    ///
    /// Required interest is recomputed from the new principal total.
    ///
    /// # Errors
    /// * `Unauthorized` – caller is the payee, or another payer is already bound
    /// * `InvalidState` – principal already released, debt closed, or offer expired
    /// * `InvalidAmount` – `amount` is not positive
    pub fn lock_principal(
        env: Env,
        debt_id: u64,
        caller: Address,
        amount: i128,
    ) -> Result<(), LedgerError> {
        let config = storage::read_config(&env)?;
        let identity = authorize(&env, &config, &caller)?;
        let mut debt = storage::read_debt(&env, debt_id)?;
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }
        require_lockable(&env, &debt)?;
        let payer = bind_payer(&mut debt, identity)?;

        let principal = debt
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let interest = required_interest(principal, debt.apr_bps)?;
        debt.principal = principal;
        debt.interest = interest;
        storage::write_debt(&env, &debt);

        EscrowLedgerClient::new(&env, &config.escrow).move_to_escrow(&payer, &amount);

        log!(&env, "principal locked", debt_id, payer, amount);
        publish_lock_principal(
            &env,
            LockPrincipalEvent {
                debt_id,
                payer,
                amount,
                principal,
                required_interest: interest,
            },
        );
        Ok(())
    }

    /// Escrow `amount` of interest. The lock that brings the locked total to
    /// exactly the required interest releases the principal to the payer and
    /// starts the accrual and payment clocks.
    ///
    /// A zero `amount` is accepted only when principal is escrowed and no
    /// further interest is required; it releases the principal without
    /// moving any interest.
    ///
    /// # Errors
    /// * `ArithmeticBound` – locked interest would exceed the required interest
    /// * `InvalidState` – principal already released, debt closed, or offer expired
    /// * `InvalidAmount` – `amount` is negative, or zero without completing the lock
    pub fn lock_interest(
        env: Env,
        debt_id: u64,
        caller: Address,
        amount: i128,
    ) -> Result<(), LedgerError> {
        let config = storage::read_config(&env)?;
        let identity = authorize(&env, &config, &caller)?;
        let mut debt = storage::read_debt(&env, debt_id)?;
        // A zero lock is only meaningful when it completes an interest-free
        // debt, e.g. 0 APR or interest that rounds down to nothing.
        let completes_zero = amount == 0
            && debt.principal > 0
            && debt.locked_interest == debt.interest;
        if amount < 0 || (amount == 0 && !completes_zero) {
            return Err(LedgerError::InvalidAmount);
        }
        require_lockable(&env, &debt)?;
        let payer = bind_payer(&mut debt, identity)?;

        let locked = debt
            .locked_interest
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        if locked > debt.interest {
            return Err(LedgerError::ArithmeticBound);
        }
        debt.locked_interest = locked;

        let release = locked == debt.interest;
        if release {
            let now = env.ledger().timestamp();
            debt.owed = true;
            debt.activated_at = now;
            debt.next_accrual = now
                .checked_add(debt.accrual_interval)
                .ok_or(LedgerError::Overflow)?;
            debt.next_payment = now
                .checked_add(debt.payment_interval)
                .ok_or(LedgerError::Overflow)?;
        }
        storage::write_debt(&env, &debt);

        let escrow = EscrowLedgerClient::new(&env, &config.escrow);
        if amount > 0 {
            escrow.move_to_escrow(&payer, &amount);
        }
        publish_lock_interest(
            &env,
            LockInterestEvent {
                debt_id,
                payer,
                amount,
                locked_interest: locked,
            },
        );

        if release {
            escrow.release_from_escrow(&payer, &debt.principal);
            log!(&env, "principal released", debt_id, payer, debt.principal);
            publish_release_principal(
                &env,
                ReleasePrincipalEvent {
                    debt_id,
                    payer,
                    amount: debt.principal,
                    next_payment: debt.next_payment,
                },
            );
        }
        Ok(())
    }

    /// Pay `amount` of accrued interest out of escrow to the payee (payee only).
    ///
    /// Only allowed while the ledger time lies in `[next_payment, next_payment + window]`.
    /// A successful payment moves `next_payment` forward by one payment interval.
    ///
    /// # Errors
    /// * `InvalidState` – principal not yet released, debt closed, or disputed
    /// * `TimingViolation` – outside the payment window
    /// * `ArithmeticBound` – `amount` exceeds the accrued balance
    pub fn pay_interest(
        env: Env,
        debt_id: u64,
        caller: Address,
        amount: i128,
    ) -> Result<(), LedgerError> {
        let config = storage::read_config(&env)?;
        let identity = authorize(&env, &config, &caller)?;
        let mut debt = storage::read_debt(&env, debt_id)?;
        require_payee(&debt, identity)?;
        if debt.status.is_terminal() || !debt.owed || debt.disputed {
            return Err(LedgerError::InvalidState);
        }
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        if !payment::is_within_window(debt.next_payment, config.payment_window, now) {
            return Err(LedgerError::TimingViolation);
        }
        payment::accrue(&mut debt, now);
        if amount > debt.accrued_interest {
            return Err(LedgerError::ArithmeticBound);
        }

        debt.accrued_interest -= amount;
        debt.interest_paid = debt
            .interest_paid
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        debt.next_payment = debt
            .next_payment
            .checked_add(debt.payment_interval)
            .ok_or(LedgerError::Overflow)?;
        storage::write_debt(&env, &debt);

        EscrowLedgerClient::new(&env, &config.escrow).release_from_escrow(&debt.payee, &amount);

        log!(&env, "interest paid", debt_id, debt.payee, amount);
        publish_interest_paid(
            &env,
            InterestPaidEvent {
                debt_id,
                payee: debt.payee,
                amount,
                accrued_interest: debt.accrued_interest,
                next_payment: debt.next_payment,
            },
        );
        Ok(())
    }

    /// Record payment windows that closed without a payment and move
    /// `next_payment` to the first window still open. Returns the number missed.
    ///
    /// No penalty is applied; the event is for an external policy layer.
    pub fn report_missed_payment(
        env: Env,
        debt_id: u64,
        caller: Address,
    ) -> Result<u64, LedgerError> {
        let config = storage::read_config(&env)?;
        let identity = authorize(&env, &config, &caller)?;
        let mut debt = storage::read_debt(&env, debt_id)?;
        require_party(&debt, identity)?;

        let now = env.ledger().timestamp();
        let missed = payment::missed_windows(&debt, now, config.payment_window);
        if missed == 0 {
            return Err(LedgerError::TimingViolation);
        }
        let payer = bound_payer(&debt)?;

        payment::accrue(&mut debt, now);
        let skipped = missed
            .checked_mul(debt.payment_interval)
            .ok_or(LedgerError::Overflow)?;
        debt.next_payment = debt
            .next_payment
            .checked_add(skipped)
            .ok_or(LedgerError::Overflow)?;
        debt.missed_payments = debt
            .missed_payments
            .saturating_add(u32::try_from(missed).unwrap_or(u32::MAX));
        storage::write_debt(&env, &debt);

        log!(&env, "payment missed", debt_id, missed);
        publish_missed_payment(
            &env,
            MissedPaymentEvent {
                debt_id,
                payee: debt.payee,
                payer,
                missed,
                accrued_interest: debt.accrued_interest,
                next_payment: debt.next_payment,
            },
        );
        Ok(missed)
    }

    /// Close a fully accrued debt as `Repaid`, paying any remaining accrued
    /// interest to the payee regardless of the payment window (payee only).
    pub fn settle_debt(env: Env, debt_id: u64, caller: Address) -> Result<(), LedgerError> {
        let config = storage::read_config(&env)?;
        let identity = authorize(&env, &config, &caller)?;
        let mut debt = storage::read_debt(&env, debt_id)?;
        require_payee(&debt, identity)?;
        if debt.status.is_terminal() || !debt.owed || debt.disputed {
            return Err(LedgerError::InvalidState);
        }

        let now = env.ledger().timestamp();
        if payment::earned_interest(&debt, now) < debt.interest {
            return Err(LedgerError::InvalidState);
        }
        payment::accrue(&mut debt, now);
        let remaining = debt.accrued_interest;
        debt.interest_paid = debt
            .interest_paid
            .checked_add(remaining)
            .ok_or(LedgerError::Overflow)?;
        debt.accrued_interest = 0;
        debt.status = DebtStatus::Repaid;
        storage::write_debt(&env, &debt);

        if remaining > 0 {
            EscrowLedgerClient::new(&env, &config.escrow)
                .release_from_escrow(&debt.payee, &remaining);
        }

        log!(&env, "debt settled", debt_id, remaining);
        publish_debt_closed(
            &env,
            symbol_short!("settled"),
            DebtClosedEvent {
                debt_id,
                payee: debt.payee,
                payer: debt.payer,
                status: DebtStatus::Repaid,
                released: remaining,
            },
        );
        Ok(())
    }

    /// Delete a debt by mutual consent (payer or payee). Escrow still funded
    /// by the payer is returned to the payer and the debt becomes `Inactive`.
    ///
    /// # Errors
    /// * `ConsentRequired` – the consent service has not confirmed this debt
    /// * `InvalidState` – debt already closed
    pub fn delete_debt(env: Env, debt_id: u64, caller: Address) -> Result<(), LedgerError> {
        let config = storage::read_config(&env)?;
        let identity = authorize(&env, &config, &caller)?;
        let mut debt = storage::read_debt(&env, debt_id)?;
        require_party(&debt, identity)?;
        if debt.status.is_terminal() {
            return Err(LedgerError::InvalidState);
        }
        if !consent_confirmed(&env, &config, debt_id) {
            return Err(LedgerError::ConsentRequired);
        }

        let refund = match debt.payer {
            None => 0,
            Some(_) if debt.owed => debt.locked_interest - debt.interest_paid,
            Some(_) => debt
                .principal
                .checked_add(debt.locked_interest)
                .ok_or(LedgerError::Overflow)?,
        };
        debt.accrued_interest = 0;
        debt.status = DebtStatus::Inactive;
        storage::write_debt(&env, &debt);

        if let Some(payer) = debt.payer {
            if refund > 0 {
                EscrowLedgerClient::new(&env, &config.escrow).release_from_escrow(&payer, &refund);
            }
        }

        log!(&env, "debt deleted", debt_id, refund);
        publish_debt_closed(
            &env,
            symbol_short!("deleted"),
            DebtClosedEvent {
                debt_id,
                payee: debt.payee,
                payer: debt.payer,
                status: DebtStatus::Inactive,
                released: refund,
            },
        );
        Ok(())
    }

    /// Flag a debt as disputed (payer or payee). Blocks payouts until resolved.
    pub fn raise_dispute(env: Env, debt_id: u64, caller: Address) -> Result<(), LedgerError> {
        let config = storage::read_config(&env)?;
        let identity = authorize(&env, &config, &caller)?;
        let mut debt = storage::read_debt(&env, debt_id)?;
        require_party(&debt, identity)?;
        if debt.status.is_terminal() || debt.payer.is_none() || debt.disputed {
            return Err(LedgerError::InvalidState);
        }
        debt.disputed = true;
        storage::write_debt(&env, &debt);

        publish_dispute(
            &env,
            DisputeEvent {
                debt_id,
                by: identity,
                disputed: true,
            },
        );
        Ok(())
    }

    /// Clear the dispute flag once both parties have consented.
    pub fn resolve_dispute(env: Env, debt_id: u64, caller: Address) -> Result<(), LedgerError> {
        let config = storage::read_config(&env)?;
        let identity = authorize(&env, &config, &caller)?;
        let mut debt = storage::read_debt(&env, debt_id)?;
        require_party(&debt, identity)?;
        if debt.status.is_terminal() || !debt.disputed {
            return Err(LedgerError::InvalidState);
        }
        if !consent_confirmed(&env, &config, debt_id) {
            return Err(LedgerError::ConsentRequired);
        }
        debt.disputed = false;
        storage::write_debt(&env, &debt);

        publish_dispute(
            &env,
            DisputeEvent {
                debt_id,
                by: identity,
                disputed: false,
            },
        );
        Ok(())
    }

    /// Get a debt record (view function). Accrual is brought up to the
    /// current ledger time, so `accrued_interest` and `next_accrual` are live.
    pub fn get_debt(env: Env, debt_id: u64) -> Option<Debt> {
        let mut debt = storage::read_debt(&env, debt_id).ok()?;
        if !debt.status.is_terminal() {
            payment::accrue(&mut debt, env.ledger().timestamp());
        }
        Some(debt)
    }

    /// Ids of debts created by `payee`, oldest first, in pages of
    /// `PAYEE_PAGE_SIZE`. A page past the end is empty.
    pub fn get_payee_debts(env: Env, payee: u64, page: u32) -> Vec<u64> {
        storage::read_payee_debts(&env, payee, page)
    }

    pub fn get_payee_debt_count(env: Env, payee: u64) -> u32 {
        storage::read_payee_debt_count(&env, payee)
    }

    /// Interest the payee could withdraw at the current ledger time.
    pub fn accrued_interest(env: Env, debt_id: u64) -> Result<i128, LedgerError> {
        let debt = storage::read_debt(&env, debt_id)?;
        Ok(payment::accrued_interest(&debt, env.ledger().timestamp()))
    }

    /// Whether the current payment window has closed without a payment.
    pub fn is_payment_overdue(env: Env, debt_id: u64) -> Result<bool, LedgerError> {
        let config = storage::read_config(&env)?;
        let debt = storage::read_debt(&env, debt_id)?;
        Ok(payment::is_payment_overdue(
            &debt,
            env.ledger().timestamp(),
            config.payment_window,
        ))
    }
}
