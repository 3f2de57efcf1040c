//! Secret handling.
//!
//! Re-exports the secrecy types used for credentials in [`super::Config`].

pub use secrecy::{ExposeSecret, SecretString};
