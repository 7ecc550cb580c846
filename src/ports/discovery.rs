use super::Transport;
use crate::config::Selector;
use crate::error::TransportError;

/// Outcome of one enumeration pass
#[derive(Debug)]
pub enum Discovered<T> {
    Found(T),
    /// Enumeration worked but nothing matched the selector
    NotFound,
    /// Enumeration itself failed
    Failed(TransportError),
}

impl<T> Discovered<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Discovered::Found(_))
    }
}

/// Capability to locate a token matching a [`Selector`]
pub trait Discovery {
    type Transport: Transport;

    /// Enumerate attached tokens and open the first one the selector accepts
    ///
    /// Never panics and never returns a bare transport error; failures are
    /// reported as [`Discovered::Failed`].
    fn discover(&self, selector: &Selector) -> Discovered<Self::Transport>;
}
