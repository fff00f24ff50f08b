//! Account model and registry

mod account;
mod registry;

pub use account::Account;
pub use registry::{AccountRegistry, Accounts};
