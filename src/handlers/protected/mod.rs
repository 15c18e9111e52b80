// Every handler here runs behind `require_account_token`; by the time one is
// called the caller's token matches the account in the path.
pub mod account;
pub mod transfer;

pub use account::{account_delete, account_get};
pub use transfer::transfer;
