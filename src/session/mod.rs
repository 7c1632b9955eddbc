mod state;
mod store;

pub use state::{Session, SessionEvent};
pub use store::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
