pub mod access_gate;

pub use access_gate::{require_account_token, AccessDecision, AccessGate, AuthorizedAccount, DenyReason};
