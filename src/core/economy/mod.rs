// Economy module - domain logic for the server credits system

mod economy_service;

pub use economy_service::{EconomyError, EconomyService, Wallet, WalletStore};
