//! Session lifecycle for the admin console: who is logged in, the persisted
//! bearer token, and the permission reads every other component consumes.
//! Keep the public surface thin and split implementation across sub-modules.

mod store;
mod token;

pub use store::{is_unrestricted, AuthApi, Identity, LoginReply, SessionState, SessionStore};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
