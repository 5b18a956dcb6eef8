//! Credential lifecycle: probe, refresh, and the `ensure_usable` state machine
//!
//! - [`validator`] classifies the stored credential with one identity probe
//! - [`refresher`] mints a new session cookie through a [`LoginProvider`]
//! - [`lifecycle`] composes both into [`CredentialLifecycle::ensure_usable`]
//! - [`browser`] is the Chromium-backed [`LoginProvider`]

pub mod browser;
pub mod lifecycle;
pub mod refresher;
pub mod validator;

pub use browser::ChromeLogin;
pub use lifecycle::CredentialLifecycle;
pub use refresher::{CredentialRefresher, LoginProvider};
pub use validator::{AuthState, CredentialValidator};
