//! Transport sessions and the registry that caches them
//!
//! A [`SessionRegistry`] owns the discovery backend and at most one live
//! [`Session`]. Facades share the registry through an `Arc`, so every
//! facade built on one registry reuses one connection, and a failure
//! observed by any of them clears it for all.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error, info};

use crate::config::{Deadline, SelectorSource};
use crate::error::{ConfigurationError, TransportError};
use crate::model::DeviceInfo;
use crate::ports::{Discovered, Discovery, Transport};

/// One established connection to one token
///
/// The transport sits behind a mutex, so exchanges from different threads
/// are serialized instead of interleaving on the wire.
pub struct Session<T> {
    transport: Mutex<T>,
    description: String,
    info: OnceLock<DeviceInfo>,
    negotiation: Mutex<()>,
    live: AtomicBool,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        let description = transport.describe();
        Self {
            transport: Mutex::new(transport),
            description,
            info: OnceLock::new(),
            negotiation: Mutex::new(()),
            live: AtomicBool::new(true),
        }
    }

    pub fn describe(&self) -> &str {
        &self.description
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Never hand this session out again
    pub fn mark_dead(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// Capabilities recorded by a successful negotiation
    pub fn info(&self) -> Option<&DeviceInfo> {
        self.info.get()
    }

    /// Held across the capability query so it reaches the token once
    pub(crate) fn lock_negotiation(&self) -> MutexGuard<'_, ()> {
        self.negotiation.lock()
    }

    pub(crate) fn record_info(&self, info: DeviceInfo) {
        // Only set under the negotiation lock, after a failed check on info()
        let _ = self.info.set(info);
    }

    pub fn get_info(&self, deadline: Deadline) -> Result<DeviceInfo, TransportError> {
        self.transport.lock().get_info(deadline)
    }

    pub fn exchange(&self, request: &[u8], deadline: Deadline) -> Result<Vec<u8>, TransportError> {
        self.transport.lock().exchange(request, deadline)
    }
}

impl<T> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("connection", &self.description)
            .field("info", &self.info.get())
            .field("live", &self.live.load(Ordering::SeqCst))
            .finish()
    }
}

/// Discovery plus the cached session
pub struct SessionRegistry<D: Discovery> {
    discovery: D,
    selectors: SelectorSource,
    cached: Mutex<Option<Arc<Session<D::Transport>>>>,
}

impl<D: Discovery> SessionRegistry<D> {
    /// Registry that reads `SOLO_SERIAL`/`SOLO_UDP` on every discovery
    pub fn new(discovery: D) -> Self {
        Self::with_selectors(discovery, SelectorSource::Environment)
    }

    pub fn with_selectors(discovery: D, selectors: SelectorSource) -> Self {
        Self {
            discovery,
            selectors,
            cached: Mutex::new(None),
        }
    }

    pub fn discovery(&self) -> &D {
        &self.discovery
    }

    pub fn selectors(&self) -> &SelectorSource {
        &self.selectors
    }

    /// The cached session, if one is live
    pub fn cached(&self) -> Option<Arc<Session<D::Transport>>> {
        self.cached
            .lock()
            .as_ref()
            .filter(|session| session.is_live())
            .cloned()
    }

    /// Return the live cached session or discover a new one
    ///
    /// `Ok(None)` means no token matched, including when enumeration itself
    /// failed; that failure is logged here and goes no further.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSelector`] if an environment
    /// selector cannot be parsed.
    pub fn find(&self) -> Result<Option<Arc<Session<D::Transport>>>, ConfigurationError> {
        let mut cached = self.cached.lock();
        if let Some(session) = cached.as_ref() {
            if session.is_live() {
                return Ok(Some(Arc::clone(session)));
            }
            debug!(connection = session.describe(), "dropping dead session");
            *cached = None;
        }

        let selector = self.selectors.resolve()?;
        debug!(%selector, "discovering Solo devices");

        match self.discovery.discover(&selector) {
            Discovered::Found(transport) => {
                let session = Arc::new(Session::new(transport));
                info!(connection = session.describe(), "session established");
                *cached = Some(Arc::clone(&session));
                Ok(Some(session))
            }
            Discovered::NotFound => {
                debug!(%selector, "no matching Solo device");
                Ok(None)
            }
            Discovered::Failed(err) => {
                error!(error = %err, "Failed to find a Solo device");
                Ok(None)
            }
        }
    }

    /// Forget the cached session; the next `find` rediscovers
    pub fn invalidate(&self) {
        if let Some(session) = self.cached.lock().take() {
            session.mark_dead();
            info!(connection = session.describe(), "session invalidated");
        }
    }

    /// Invalidate only if `session` is still the cached one
    ///
    /// Returns whether the cache was cleared.
    pub fn invalidate_if(&self, session: &Arc<Session<D::Transport>>) -> bool {
        session.mark_dead();
        let mut cached = self.cached.lock();
        match cached.as_ref() {
            Some(current) if Arc::ptr_eq(current, session) => {
                *cached = None;
                info!(connection = session.describe(), "session invalidated");
                true
            }
            _ => false,
        }
    }
}

impl<D: Discovery> fmt::Debug for SessionRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("selectors", &self.selectors)
            .field("cached", &*self.cached.lock())
            .finish()
    }
}
