//! Event types and topic constants for the Debt ledger contract.
//! Every committed state change publishes exactly one of these under the
//! `debt` topic; together they form the ledger's audit trail.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::types::DebtStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtCreatedEvent {
    pub debt_id: u64,
    pub payee: u64,
    pub apr_bps: u32,
    pub fee: i128,
}

/// Principal moved into escrow. `principal` and `required_interest` are the new totals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockPrincipalEvent {
    pub debt_id: u64,
    pub payer: u64,
    pub amount: i128,
    pub principal: i128,
    pub required_interest: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockInterestEvent {
    pub debt_id: u64,
    pub payer: u64,
    pub amount: i128,
    pub locked_interest: i128,
}

/// Escrowed principal handed to the payer; the payment phase starts here.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleasePrincipalEvent {
    pub debt_id: u64,
    pub payer: u64,
    pub amount: i128,
    pub next_payment: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterestPaidEvent {
    pub debt_id: u64,
    pub payee: u64,
    pub amount: i128,
    pub accrued_interest: i128,
    pub next_payment: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MissedPaymentEvent {
    pub debt_id: u64,
    pub payee: u64,
    pub payer: u64,
    pub missed: u64,
    pub accrued_interest: i128,
    pub next_payment: u64,
}

/// Schedule or expiration change. `target` is `accrual`, `payment` or `expiry`;
/// `value` is the new interval (schedules) or timestamp (expiry).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RearrangementEvent {
    pub debt_id: u64,
    pub payee: u64,
    pub target: Symbol,
    pub value: u64,
}

/// Debt reached a terminal status. `released` is the escrow paid out by the closing call.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtClosedEvent {
    pub debt_id: u64,
    pub payee: u64,
    pub payer: Option<u64>,
    pub status: DebtStatus,
    pub released: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisputeEvent {
    pub debt_id: u64,
    pub by: u64,
    pub disputed: bool,
}

pub fn publish_debt_created(env: &Env, event: DebtCreatedEvent) {
    env.events()
        .publish((symbol_short!("debt"), symbol_short!("created")), event);
}

pub fn publish_lock_principal(env: &Env, event: LockPrincipalEvent) {
    env.events()
        .publish((symbol_short!("debt"), symbol_short!("lock_prin")), event);
}

pub fn publish_lock_interest(env: &Env, event: LockInterestEvent) {
    env.events()
        .publish((symbol_short!("debt"), symbol_short!("lock_int")), event);
}

pub fn publish_release_principal(env: &Env, event: ReleasePrincipalEvent) {
    env.events()
        .publish((symbol_short!("debt"), symbol_short!("release")), event);
}

pub fn publish_interest_paid(env: &Env, event: InterestPaidEvent) {
    env.events()
        .publish((symbol_short!("debt"), symbol_short!("int_paid")), event);
}

pub fn publish_missed_payment(env: &Env, event: MissedPaymentEvent) {
    env.events()
        .publish((symbol_short!("debt"), symbol_short!("missed")), event);
}

pub fn publish_rearrangement(env: &Env, event: RearrangementEvent) {
    env.events()
        .publish((symbol_short!("debt"), symbol_short!("rearrange")), event);
}

/// Publish a terminal transition under `topic` (`settled` or `deleted`).
pub fn publish_debt_closed(env: &Env, topic: Symbol, event: DebtClosedEvent) {
    env.events().publish((symbol_short!("debt"), topic), event);
}

pub fn publish_dispute(env: &Env, event: DisputeEvent) {
    env.events()
        .publish((symbol_short!("debt"), symbol_short!("dispute")), event);
}
