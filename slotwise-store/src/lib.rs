//! slotwise-store: file-backed task backlog implementing the engine's read contract.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{parse_patch, parse_patch_str, JsonTaskStore, NewTask};
