use soroban_sdk::{contracttype, Env};
use crate::types::{Agreement, AgreementUpdate, Config};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

// Agreements are an audit trail and outlive the rental itself.
pub(crate) const RECORD_BUMP_AMOUNT: u32 = 120 * DAY_IN_LEDGERS;
pub(crate) const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Config,
    NextId,
    Agreement(u64),
    Update(u64),
}

pub fn bump_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Every entry point reads the config, so this also keeps the instance
/// (config and id counter) alive.
pub fn read_config(e: &Env) -> Config {
    bump_instance(e);
    // Written by the constructor, so always present.
    e.storage().instance().get(&DataKey::Config).expect("config")
}

pub fn write_config(e: &Env, config: &Config) {
    e.storage().instance().set(&DataKey::Config, config);
}

/// Next id to hand out, which is also the number of agreements ever created.
pub fn peek_next_id(e: &Env) -> u64 {
    e.storage().instance().get(&DataKey::NextId).unwrap_or(0)
}

pub fn take_next_id(e: &Env) -> u64 {
    let id = peek_next_id(e);
    e.storage().instance().set(&DataKey::NextId, &(id + 1));
    id
}

pub fn read_agreement(e: &Env, id: u64) -> Option<Agreement> {
    let key = DataKey::Agreement(id);
    let agreement = e.storage().persistent().get(&key);
    if agreement.is_some() {
        e.storage()
            .persistent()
            .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
    }
    agreement
}

/// Replaces the whole record; agreements are never patched field by field.
pub fn write_agreement(e: &Env, id: u64, agreement: &Agreement) {
    let key = DataKey::Agreement(id);
    e.storage().persistent().set(&key, agreement);
    e.storage()
        .persistent()
        .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
}

pub fn read_update(e: &Env, id: u64) -> Option<AgreementUpdate> {
    e.storage().persistent().get(&DataKey::Update(id))
}

pub fn write_update(e: &Env, id: u64, update: &AgreementUpdate) {
    let key = DataKey::Update(id);
    e.storage().persistent().set(&key, update);
    e.storage()
        .persistent()
        .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
}
