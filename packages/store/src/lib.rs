//! # Store crate: client-side persistence for StudentHub
//!
//! Everything the client keeps between page loads lives behind the
//! [`KeyValueStore`] trait. The session layer ([`SessionStore`]) is the only
//! thing that reads or writes the `token` and `user` keys, and every change it
//! makes is announced on a [`SessionBus`].
//!
//! | Backend | Platform |
//! |---------|----------|
//! | [`MemoryStore`] | tests, and anywhere persistence is not wanted |
//! | [`FileStore`] | native builds (one file per key) |
//! | `LocalStorageStore` | wasm32 with the `web` feature (browser `localStorage`) |

pub mod bus;
pub mod config;
pub mod kv;
pub mod models;
pub mod session;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageStore;

pub use bus::{SessionBus, SessionEvent, SessionSubscription};
pub use config::ClientConfig;
pub use kv::{KeyValueStore, StoreError};
pub use models::{AccountStatus, Role, StoredUser};
pub use session::{SessionStore, TOKEN_KEY, USER_KEY};
