use soroban_sdk::{contracterror, contracttype, symbol_short, Address, Bytes, BytesN, String, Symbol};

pub const MAX_DURATION: u32 = 365;
pub const MAX_PENALTY_RATE: u32 = 50;
pub const MIN_REPUTATION_THRESHOLD: u32 = 50;

pub const DEFAULT_MAX_AGREEMENTS: u64 = 10_000;
pub const DEFAULT_AGREEMENT_FEE: i128 = 500;

/// Failure codes returned by every ledger operation.
///
/// The numeric values are part of the contract interface; clients match on
/// them and they must never be renumbered.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotAuthorized = 100,
    InvalidItemId = 101,
    InvalidLender = 102,
    InvalidBorrower = 103,
    InvalidDuration = 104,
    InvalidFee = 105,
    InvalidDeposit = 106,
    AgreementNotFound = 108,
    InvalidStartTime = 109,
    InvalidStatus = 110,
    NotReady = 112,
    InvalidPenalty = 115,
    InvalidInsurance = 117,
    InvalidReputation = 118,
    MaxAgreementsExceeded = 119,
    InvalidCurrency = 120,
    InvalidLocation = 121,
    InvalidCondition = 122,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AgreementStatus {
    Pending = 0,
    Active = 1,
    Returned = 2,
    Disputed = 3,
    Closed = 4,
}

impl AgreementStatus {
    /// Edges of the agreement lifecycle:
    /// Pending -> Active -> {Returned | Disputed}, Disputed -> Closed.
    pub fn can_transition_to(self, next: AgreementStatus) -> bool {
        use AgreementStatus::*;
        matches!(
            (self, next),
            (Pending, Active) | (Active, Returned) | (Active, Disputed) | (Disputed, Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AgreementStatus::Returned | AgreementStatus::Closed)
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Currency {
    Stx,
    Usd,
}

impl Currency {
    pub fn from_symbol(symbol: &Symbol) -> Result<Currency, Error> {
        if *symbol == symbol_short!("STX") {
            Ok(Currency::Stx)
        } else if *symbol == symbol_short!("USD") {
            Ok(Currency::Usd)
        } else {
            Err(Error::InvalidCurrency)
        }
    }
}

/// One rental between a lender and a borrower.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Agreement {
    pub item_id: u64,
    pub lender: Address,
    pub borrower: Address,
    pub start_time: u32,       // ledger sequence
    pub duration: u32,         // in ledgers
    pub rental_fee: i128,
    pub deposit: i128,
    pub penalty_rate: u32,     // charged per ledger past end_time
    pub status: AgreementStatus,
    pub currency: Currency,
    pub location: String,
    pub condition_hash: BytesN<32>,
    pub insurance_amount: i128,
    pub reputation_threshold: u32,
}

impl Agreement {
    pub fn end_time(&self) -> u64 {
        self.start_time as u64 + self.duration as u64
    }
}

/// Creation arguments as submitted by the borrower. Currency and condition
/// hash arrive unvalidated and are narrowed into an `Agreement` on success.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AgreementTerms {
    pub item_id: u64,
    pub lender: Address,
    pub borrower: Address,
    pub start_time: u32,
    pub duration: u32,
    pub rental_fee: i128,
    pub deposit: i128,
    pub penalty_rate: u32,
    pub currency: Symbol,
    pub location: String,
    pub condition_hash: Bytes,
    pub insurance_amount: i128,
    pub reputation_threshold: u32,
}

/// Last amendment applied to a pending agreement.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AgreementUpdate {
    pub duration: u32,
    pub fee: i128,
    pub deposit: i128,
    pub timestamp: u32,
    pub updater: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferIntent {
    pub amount: i128,
    pub from: Address,
    pub to: Address,
}

/// Deployment parameters and trusted collaborator identities.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    pub max_agreements: u64,
    pub agreement_fee: i128,
    pub escrow: Address,
    pub dispute_resolver: Address,
    pub item_registry: Address,
    pub user_registry: Address,
    pub insurance_pool: Address,
}
