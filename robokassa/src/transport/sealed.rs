//! Sealed marker for [`Transport`](super::Transport) implementations.

pub(crate) mod private {
    /// Implemented only by transports defined in this crate.
    pub trait Sealed {}
}
