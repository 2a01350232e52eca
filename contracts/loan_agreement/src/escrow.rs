use soroban_sdk::{contractclient, log, Address, Env};
use crate::types::{Config, TransferIntent};

/// Interface of the external custodian. Any contract exposing this function
/// can back the ledger; a failing transfer aborts the whole invocation, so
/// state changes and value movements commit together.
#[contractclient(name = "EscrowGatewayClient")]
pub trait EscrowGateway {
    fn transfer(env: Env, amount: i128, from: Address, to: Address);
}

/// Sends intents to the configured gateway in the order given.
pub fn dispatch(e: &Env, config: &Config, intents: &[TransferIntent]) {
    let gateway = EscrowGatewayClient::new(e, &config.escrow);
    for intent in intents {
        if intent.amount <= 0 {
            continue;
        }
        log!(e, "escrow transfer: amount, from, to", intent.amount, intent.from.clone(), intent.to.clone());
        gateway.transfer(&intent.amount, &intent.from, &intent.to);
    }
}
