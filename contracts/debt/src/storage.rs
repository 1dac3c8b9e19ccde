//! Storage access for the ledger. Debts are stored per payee and id; a reverse
//! index resolves an id to its payee so callers only need the id.

use soroban_sdk::{Address, Env, Vec};

use crate::types::{DataKey, Debt, DebtKey, LedgerConfig, LedgerError, PayeePage};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) const DEBT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const DEBT_LIFETIME_THRESHOLD: u32 = DEBT_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Ids per `PayeeDebts` entry; bounds the size of each index entry.
pub const PAYEE_PAGE_SIZE: u32 = 32;

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, DEBT_LIFETIME_THRESHOLD, DEBT_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn write_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn read_admin(env: &Env) -> Result<Address, LedgerError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(LedgerError::NotInitialized)
}

pub fn write_config(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn read_config(env: &Env) -> Result<LedgerConfig, LedgerError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(LedgerError::NotInitialized)
}

/// Advance the global id counter. Ids start at 1 and are shared by all payees.
pub fn take_debt_id(env: &Env) -> Result<u64, LedgerError> {
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::DebtCounter)
        .unwrap_or(0);
    let next = current.checked_add(1).ok_or(LedgerError::Overflow)?;
    env.storage().instance().set(&DataKey::DebtCounter, &next);
    bump_instance(env);
    Ok(next)
}

pub fn read_debt(env: &Env, debt_id: u64) -> Result<Debt, LedgerError> {
    let payee: u64 = env
        .storage()
        .persistent()
        .get(&DataKey::DebtPayee(debt_id))
        .ok_or(LedgerError::DebtNotFound)?;
    env.storage()
        .persistent()
        .get(&DataKey::Debt(DebtKey { payee, id: debt_id }))
        .ok_or(LedgerError::DebtNotFound)
}

pub fn write_debt(env: &Env, debt: &Debt) {
    let key = DataKey::Debt(DebtKey {
        payee: debt.payee,
        id: debt.id,
    });
    env.storage().persistent().set(&key, debt);
    bump_persistent(env, &key);
}

/// Store a freshly created debt and register it in both indexes.
pub fn insert_debt(env: &Env, debt: &Debt) -> Result<(), LedgerError> {
    let count = read_payee_debt_count(env, debt.payee);
    let next_count = count.checked_add(1).ok_or(LedgerError::Overflow)?;

    write_debt(env, debt);

    let payee_key = DataKey::DebtPayee(debt.id);
    env.storage().persistent().set(&payee_key, &debt.payee);
    bump_persistent(env, &payee_key);

    let page = count / PAYEE_PAGE_SIZE;
    let page_key = DataKey::PayeeDebts(PayeePage {
        payee: debt.payee,
        page,
    });
    let mut ids = read_payee_debts(env, debt.payee, page);
    ids.push_back(debt.id);
    env.storage().persistent().set(&page_key, &ids);
    bump_persistent(env, &page_key);

    let count_key = DataKey::PayeeDebtCount(debt.payee);
    env.storage().persistent().set(&count_key, &next_count);
    bump_persistent(env, &count_key);
    Ok(())
}

pub fn read_payee_debt_count(env: &Env, payee: u64) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::PayeeDebtCount(payee))
        .unwrap_or(0)
}

/// Page `page` of a payee's ids. Pages past the last one are empty.
pub fn read_payee_debts(env: &Env, payee: u64, page: u32) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::PayeeDebts(PayeePage { payee, page }))
        .unwrap_or(Vec::new(env))
}
