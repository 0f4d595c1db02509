// Economy infrastructure - SQLite storage implementation

mod sqlite_wallet_store;

pub use sqlite_wallet_store::SqliteWalletStore;
