pub mod account;
pub mod health;

pub use account::{account_create, account_list};
pub use health::health;
