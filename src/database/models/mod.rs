pub mod account;

pub use account::{Account, CreateAccountRequest, TransferRequest};
