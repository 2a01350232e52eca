#![no_std]
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, symbol_short, Address, Env
};
use soroban_sdk::token; // standard token interface (SAC-compatible)

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum EscrowError {
    InvalidAmount = 1,
    InsufficientFunds = 2,
}

#[derive(Clone)]
#[contracttype]
enum DataKey {
    Operator,
    Token,
}

/// Custodian behind the loan agreement ledger. Holds deposits and listing
/// fees and moves value only on the operator's instruction.
#[contract]
pub struct Escrow;

#[contractimpl]
impl Escrow {
    /// `operator` is the ledger contract allowed to request transfers.
    pub fn __constructor(e: Env, operator: Address, token: Address) {
        e.storage().instance().set(&DataKey::Operator, &operator);
        e.storage().instance().set(&DataKey::Token, &token);
    }

    /// A participant places collateral into custody.
    pub fn fund(e: Env, from: Address, amount: i128) -> Result<(), EscrowError> {
        from.require_auth();
        if amount <= 0 { return Err(EscrowError::InvalidAmount); }

        let me = e.current_contract_address();
        Self::token_client(&e).transfer(&from, &me, &amount);

        e.events().publish((symbol_short!("funded"), from), amount);
        Ok(())
    }

    /// Move `amount` from `from` to `to`. When `from` is this contract the
    /// funds leave custody; otherwise `from` must have authorized the call.
    pub fn transfer(e: Env, amount: i128, from: Address, to: Address) -> Result<(), EscrowError> {
        Self::operator(e.clone()).require_auth();
        if amount <= 0 { return Err(EscrowError::InvalidAmount); }

        let token = Self::token_client(&e);
        if from == e.current_contract_address() && token.balance(&from) < amount {
            log!(&e, "insufficient custody: requested, held", amount, token.balance(&from));
            return Err(EscrowError::InsufficientFunds);
        }
        token.transfer(&from, &to, &amount);

        e.events().publish((symbol_short!("transfer"), from, to), amount);
        Ok(())
    }

    /// Funds currently in custody.
    pub fn balance(e: Env) -> i128 {
        Self::token_client(&e).balance(&e.current_contract_address())
    }

    pub fn operator(e: Env) -> Address {
        e.storage().instance().get(&DataKey::Operator).expect("operator")
    }

    pub fn token(e: Env) -> Address {
        e.storage().instance().get(&DataKey::Token).expect("token")
    }

    fn token_client(e: &Env) -> token::Client<'static> {
        token::Client::new(e, &Self::token(e.clone()))
    }
}
