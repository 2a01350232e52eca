use soroban_sdk::Address;
use crate::types::{Agreement, Config, Error};

/// Capability a caller must hold for a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Lender,
    Borrower,
    /// Either side of the agreement.
    Party,
    DisputeResolver,
    Admin,
}

/// Single place where callers are compared against agreement parties and
/// trusted identities. `caller` must already have passed `require_auth`.
pub fn require_role(
    caller: &Address,
    role: Role,
    agreement: Option<&Agreement>,
    config: &Config,
) -> Result<(), Error> {
    let allowed = match (role, agreement) {
        (Role::Lender, Some(a)) => *caller == a.lender,
        (Role::Borrower, Some(a)) => *caller == a.borrower,
        (Role::Party, Some(a)) => *caller == a.lender || *caller == a.borrower,
        (Role::DisputeResolver, _) => *caller == config.dispute_resolver,
        (Role::Admin, _) => *caller == config.admin,
        (_, None) => false,
    };
    if allowed { Ok(()) } else { Err(Error::NotAuthorized) }
}
