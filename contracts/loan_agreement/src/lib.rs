#![no_std]
use soroban_sdk::{
    contract, contractimpl, log, symbol_short, Address, Bytes, BytesN, Env
};

mod auth;
mod escrow;
mod storage;
mod types;


pub use escrow::{EscrowGateway, EscrowGatewayClient};
pub use types::*;

use auth::{require_role, Role};

#[contract]
pub struct LoanAgreement;

#[contractimpl]
impl LoanAgreement {
    pub fn __constructor(e: Env, config: Config) {
        storage::write_config(&e, &config);
        e.storage().instance().set(&storage::DataKey::NextId, &0u64);
    }

    /// Borrower opens a rental and pays the listing fee into escrow.
    /// Returns the new agreement id.
    pub fn create_agreement(e: Env, caller: Address, terms: AgreementTerms) -> Result<u64, Error> {
        caller.require_auth();
        let config = storage::read_config(&e);
        let agreement = Self::validate_terms(&e, &config, &terms)?;
        require_role(&caller, Role::Borrower, Some(&agreement), &config)?;

        let id = storage::take_next_id(&e);
        storage::write_agreement(&e, id, &agreement);
        escrow::dispatch(&e, &config, &[TransferIntent {
            amount: config.agreement_fee,
            from: caller,
            to: config.escrow.clone(),
        }]);

        e.events().publish(
            (symbol_short!("created"), id),
            (agreement.lender, agreement.borrower, agreement.item_id),
        );
        Ok(id)
    }

    /// Lender hands the item over once the start ledger is reached.
    pub fn activate_agreement(e: Env, caller: Address, id: u64) -> Result<bool, Error> {
        caller.require_auth();
        let config = storage::read_config(&e);
        let agreement = Self::load(&e, id)?;

        Self::require_status(&e, &agreement, AgreementStatus::Active)?;
        require_role(&caller, Role::Lender, Some(&agreement), &config)?;
        let now = e.ledger().sequence();
        if now < agreement.start_time {
            log!(&e, "agreement not ready: id, start_time", id, agreement.start_time);
            return Err(Error::NotReady);
        }

        storage::write_agreement(&e, id, &Agreement { status: AgreementStatus::Active, ..agreement });
        e.events().publish((symbol_short!("activated"), id), now);
        Ok(true)
    }

    /// Borrower returns the item. A late return pays the penalty to the
    /// lender first; the deposit is then released back to the borrower.
    pub fn return_item(e: Env, caller: Address, id: u64, return_hash: Bytes) -> Result<bool, Error> {
        caller.require_auth();
        let config = storage::read_config(&e);
        let agreement = Self::load(&e, id)?;

        Self::require_status(&e, &agreement, AgreementStatus::Returned)?;
        require_role(&caller, Role::Borrower, Some(&agreement), &config)?;
        if Bytes::from(agreement.condition_hash.clone()) != return_hash {
            log!(&e, "condition mismatch on return: id", id);
            return Err(Error::InvalidCondition);
        }

        let now = e.ledger().sequence() as u64;
        let end_time = agreement.end_time();
        let penalty = if now > end_time {
            (now - end_time) as i128 * agreement.penalty_rate as i128
        } else {
            0
        };
        if penalty > 0 {
            log!(&e, "late return: id, ledgers late, penalty", id, now - end_time, penalty);
        }

        let penalty_intent = TransferIntent {
            amount: penalty,
            from: agreement.borrower.clone(),
            to: agreement.lender.clone(),
        };
        let release_intent = TransferIntent {
            amount: agreement.deposit,
            from: config.escrow.clone(),
            to: agreement.borrower.clone(),
        };

        storage::write_agreement(&e, id, &Agreement { status: AgreementStatus::Returned, ..agreement });
        escrow::dispatch(&e, &config, &[penalty_intent, release_intent]);

        e.events().publish((symbol_short!("returned"), id), penalty);
        Ok(true)
    }

    /// Either party freezes an active agreement pending third-party review.
    /// `evidence` is passed through to the resolver in the event payload.
    pub fn initiate_dispute(e: Env, caller: Address, id: u64, evidence: Bytes) -> Result<bool, Error> {
        caller.require_auth();
        let config = storage::read_config(&e);
        let agreement = Self::load(&e, id)?;

        require_role(&caller, Role::Party, Some(&agreement), &config)?;
        Self::require_status(&e, &agreement, AgreementStatus::Disputed)?;

        storage::write_agreement(&e, id, &Agreement { status: AgreementStatus::Disputed, ..agreement });
        e.events().publish((symbol_short!("disputed"), id), (caller, evidence));
        Ok(true)
    }

    /// Resolver closes a dispute and releases the deposit. Any `winner`
    /// other than the lender resolves in favour of the borrower.
    pub fn resolve_dispute(e: Env, caller: Address, id: u64, winner: Address) -> Result<bool, Error> {
        caller.require_auth();
        let config = storage::read_config(&e);
        let agreement = Self::load(&e, id)?;

        require_role(&caller, Role::DisputeResolver, Some(&agreement), &config)?;
        Self::require_status(&e, &agreement, AgreementStatus::Closed)?;

        // TODO: reject winners outside {lender, borrower} once product confirms the fallback is unintended.
        let recipient = if winner == agreement.lender {
            agreement.lender.clone()
        } else {
            agreement.borrower.clone()
        };
        let release_intent = TransferIntent {
            amount: agreement.deposit,
            from: config.escrow.clone(),
            to: recipient.clone(),
        };

        storage::write_agreement(&e, id, &Agreement { status: AgreementStatus::Closed, ..agreement });
        escrow::dispatch(&e, &config, &[release_intent]);

        e.events().publish((symbol_short!("resolved"), id), recipient);
        Ok(true)
    }

    /// Lender amends duration, fee and deposit while the agreement is pending.
    pub fn update_agreement(
        e: Env,
        caller: Address,
        id: u64,
        new_duration: u32,
        new_fee: i128,
        new_deposit: i128,
    ) -> Result<bool, Error> {
        caller.require_auth();
        let config = storage::read_config(&e);
        let agreement = Self::load(&e, id)?;

        require_role(&caller, Role::Lender, Some(&agreement), &config)?;
        if agreement.status != AgreementStatus::Pending {
            return Err(Error::InvalidStatus);
        }
        Self::validate_amounts(new_duration, new_fee, new_deposit)?;

        let now = e.ledger().sequence();
        storage::write_agreement(&e, id, &Agreement {
            duration: new_duration,
            rental_fee: new_fee,
            deposit: new_deposit,
            ..agreement
        });
        storage::write_update(&e, id, &AgreementUpdate {
            duration: new_duration,
            fee: new_fee,
            deposit: new_deposit,
            timestamp: now,
            updater: caller,
        });

        e.events().publish((symbol_short!("amended"), id), (new_duration, new_fee, new_deposit));
        Ok(true)
    }

    /// Replace the deployment configuration. Only the current admin may call.
    pub fn set_config(e: Env, caller: Address, config: Config) -> Result<(), Error> {
        caller.require_auth();
        let current = storage::read_config(&e);
        require_role(&caller, Role::Admin, None, &current)?;

        if config.max_agreements < storage::peek_next_id(&e) {
            return Err(Error::MaxAgreementsExceeded);
        }
        if config.agreement_fee < 0 {
            return Err(Error::InvalidFee);
        }

        storage::write_config(&e, &config);
        e.events().publish((symbol_short!("config"),), config.admin);
        Ok(())
    }

    pub fn get_agreement_count(e: Env) -> u64 {
        storage::peek_next_id(&e)
    }

    pub fn get_agreement(e: Env, id: u64) -> Result<Agreement, Error> {
        Self::load(&e, id)
    }

    pub fn get_agreement_update(e: Env, id: u64) -> Option<AgreementUpdate> {
        storage::read_update(&e, id)
    }

    pub fn get_config(e: Env) -> Config {
        storage::read_config(&e)
    }

    fn load(e: &Env, id: u64) -> Result<Agreement, Error> {
        storage::read_agreement(e, id).ok_or(Error::AgreementNotFound)
    }

    fn require_status(e: &Env, agreement: &Agreement, next: AgreementStatus) -> Result<(), Error> {
        if agreement.status.can_transition_to(next) {
            Ok(())
        } else {
            log!(e, "rejected transition: from, to", agreement.status as u32, next as u32);
            Err(Error::InvalidStatus)
        }
    }

    fn validate_amounts(duration: u32, fee: i128, deposit: i128) -> Result<(), Error> {
        if duration == 0 || duration > MAX_DURATION { return Err(Error::InvalidDuration); }
        if fee <= 0 { return Err(Error::InvalidFee); }
        if deposit <= 0 { return Err(Error::InvalidDeposit); }
        Ok(())
    }

    /// Creation checks, in the order their errors are reported.
    fn validate_terms(e: &Env, config: &Config, terms: &AgreementTerms) -> Result<Agreement, Error> {
        if storage::peek_next_id(e) >= config.max_agreements {
            return Err(Error::MaxAgreementsExceeded);
        }
        if terms.item_id == 0 { return Err(Error::InvalidItemId); }

        // Custodial addresses cannot be a party to their own agreement.
        // Lender and borrower may coincide.
        let ledger = e.current_contract_address();
        if terms.lender == ledger || terms.lender == config.escrow {
            return Err(Error::InvalidLender);
        }
        if terms.borrower == ledger || terms.borrower == config.escrow {
            return Err(Error::InvalidBorrower);
        }

        if terms.start_time < e.ledger().sequence() { return Err(Error::InvalidStartTime); }
        Self::validate_amounts(terms.duration, terms.rental_fee, terms.deposit)?;
        if terms.penalty_rate > MAX_PENALTY_RATE { return Err(Error::InvalidPenalty); }
        let currency = Currency::from_symbol(&terms.currency)?;
        if terms.location.len() == 0 { return Err(Error::InvalidLocation); }
        let condition_hash: BytesN<32> = terms
            .condition_hash
            .clone()
            .try_into()
            .map_err(|_| Error::InvalidCondition)?;
        if terms.insurance_amount < 0 { return Err(Error::InvalidInsurance); }
        if terms.reputation_threshold < MIN_REPUTATION_THRESHOLD { return Err(Error::InvalidReputation); }

        Ok(Agreement {
            item_id: terms.item_id,
            lender: terms.lender.clone(),
            borrower: terms.borrower.clone(),
            start_time: terms.start_time,
            duration: terms.duration,
            rental_fee: terms.rental_fee,
            deposit: terms.deposit,
            penalty_rate: terms.penalty_rate,
            status: AgreementStatus::Pending,
            currency,
            location: terms.location.clone(),
            condition_hash,
            insurance_amount: terms.insurance_amount,
            reputation_threshold: terms.reputation_threshold,
        })
    }
}
