//! Core data types for the Debt ledger contract.

use soroban_sdk::{contracttype, Address};

/// Lifecycle status of a debt. `Repaid` and `Inactive` are terminal.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DebtStatus {
    Created = 0,
    Locked = 1,
    Repaid = 2,
    Inactive = 3,
}

impl DebtStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DebtStatus::Repaid | DebtStatus::Inactive)
    }
}

/// Cadence of accrual or payment. See [`crate::schedule`] for the interval of each tag.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Schedule {
    Hourly = 0,
    Daily = 1,
    Weekly = 2,
    Fortnightly = 3,
    Monthly = 4,
    Quadannually = 5,
    Triannually = 6,
    Biannually = 7,
    Annually = 8,
    Biennially = 9,
    Triennially = 10,
    Quadrennially = 11,
}

#[soroban_sdk::contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LedgerError {
    Unauthorized = 1,
    InvalidState = 2,
    ArithmeticBound = 3,
    TimingViolation = 4,
    InvalidSchedule = 5,
    DebtNotFound = 6,
    InvalidAmount = 7,
    NotInitialized = 8,
    AlreadyInitialized = 9,
    ConsentRequired = 10,
    Overflow = 11,
}

/// Stored debt between a payee and (eventually) a payer.
///
/// Identities are the handles returned by the identity gateway, not raw addresses.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Debt {
    pub id: u64,
    pub payee: u64,
    /// Bound on the first lock by anyone other than the payee; never changes afterwards.
    pub payer: Option<u64>,
    pub status: DebtStatus,
    pub created_at: u64,
    pub payment_schedule: Schedule,
    pub payment_interval: u64,
    pub next_payment: u64,
    pub accrual_schedule: Schedule,
    pub accrual_interval: u64,
    pub next_accrual: u64,
    /// Ledger timestamp at which principal was released. Zero until `owed`.
    pub activated_at: u64,
    pub principal: i128,
    pub apr_bps: u32,
    /// Required interest, `principal * apr_bps / 10_000`. Frozen once `owed`.
    pub interest: i128,
    pub fee: i128,
    /// `u64::MAX` means the offer never expires.
    pub expiration: u64,
    pub locked_interest: i128,
    /// Claimable balance. Stored as of the last materialised accrual;
    /// `get_debt` returns it brought up to the current ledger time.
    pub accrued_interest: i128,
    /// Interest already released to the payee.
    pub interest_paid: i128,
    pub owed: bool,
    pub disputed: bool,
    pub missed_payments: u32,
}

/// Addresses of the external collaborators and the payment window tolerance.
///
/// * `payment_window` – seconds after `next_payment` during which the payee may
///   still collect interest for that period.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    pub identity_gateway: Address,
    pub escrow: Address,
    pub consent: Address,
    pub payment_window: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtKey {
    pub payee: u64,
    pub id: u64,
}

/// One fixed-size page of a payee's debt ids.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayeePage {
    pub payee: u64,
    pub page: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    DebtCounter,
    /// Debt record, addressed by owning payee and id.
    Debt(DebtKey),
    /// Reverse index from debt id to owning payee.
    DebtPayee(u64),
    /// Ids issued to a payee, in issuance order, split into pages.
    PayeeDebts(PayeePage),
    /// Number of ids issued to a payee.
    PayeeDebtCount(u64),
}
