//! Request signing and callback signature verification.
//!
//! Every request to the gateway carries a signature: the lowercase hex digest of an
//! ordered, colon-joined tuple of business fields followed by one of the merchant's
//! two shared secrets.
//!
//! - [`signer`]: digest computation and the per-operation field order
//! - [`verifier`]: verification of signatures received from the gateway
//!
//! # Examples
//!
//! ```
//! use robokassa::signature::digest;
//!
//! let signature = digest(["Shop", "100", "123", "", "secret"]);
//! assert_eq!(signature.len(), 128);
//! assert_eq!(signature, signature.to_lowercase());
//! ```

pub mod signer;
pub mod verifier;

pub use signer::{FIELD_SEPARATOR, SignatureContext, SignatureHash, SignatureKind, digest};
pub use verifier::verify_signature;
