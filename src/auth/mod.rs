pub mod oauth;
pub mod session_store;
pub mod store;

pub use store::{AuthAction, AuthError, AuthStore, Authenticator, MockAuthenticator};
