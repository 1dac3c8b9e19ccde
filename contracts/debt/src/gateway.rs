//! Interfaces of the external contracts the ledger depends on.
//!
//! Only the calls listed here cross the contract boundary. Their addresses
//! come from [`crate::types::LedgerConfig`].

use soroban_sdk::{contractclient, Address, Env};

/// Maps caller addresses to canonical identities and vets registrants.
#[contractclient(name = "IdentityGatewayClient")]
pub trait IdentityGateway {
    fn resolve_identity(env: Env, caller: Address) -> u64;
    fn is_authorized_participant(env: Env, identity: u64) -> bool;
}

/// Value-transfer ledger holding escrow on behalf of this contract.
///
/// Both calls are expected to trap on insufficient balance without moving
/// anything; the trap propagates and reverts the calling operation.
#[contractclient(name = "EscrowLedgerClient")]
pub trait EscrowLedger {
    fn move_to_escrow(env: Env, from: u64, amount: i128);
    fn release_from_escrow(env: Env, to: u64, amount: i128);
}

/// Mutual-consent signal used by deletion and dispute resolution.
#[contractclient(name = "ConsentServiceClient")]
pub trait ConsentService {
    fn is_consent_confirmed(env: Env, debt_id: u64) -> bool;
}
