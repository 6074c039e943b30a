//! Load/save bracketing around a store.

use crate::error::{Result, StoreError};
use crate::gateway::{Gateway, GatewayConfig};
use crate::store::Store;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::info;

/// A store loaded from a document, together with the gateway that will
/// write it back.
///
/// Dereferences to [`Store`], so the [`Organizer`](crate::Organizer)
/// operations can be called on the session directly. Nothing is written
/// unless [`save`](Session::save) or [`close`](Session::close) is called.
pub struct Session {
    gateway: Gateway,
    store: Store,
}

impl Session {
    /// Lock and load the document. Any failure aborts the session.
    pub fn open(config: GatewayConfig) -> Result<Self> {
        let gateway = Gateway::open(config)?;
        let store = gateway.load()?;
        info!(
            areas = store.area_count(),
            "Opened session: {}",
            gateway.path().display()
        );
        Ok(Self { gateway, store })
    }

    pub fn path(&self) -> &Path {
        self.gateway.path()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Write the current store without ending the session.
    pub fn save(&self) -> Result<()> {
        self.gateway.save(&self.store)
    }

    /// Write the store and release the document lock.
    ///
    /// On a write failure the lock is still released; the in-memory store is
    /// returned alongside the error so no edits are lost.
    pub fn close(self) -> std::result::Result<(), (StoreError, Store)> {
        match self.gateway.save(&self.store) {
            Ok(()) => {
                info!("Closed session: {}", self.gateway.path().display());
                Ok(())
            }
            Err(e) => Err((e, self.store)),
        }
    }
}

impl Deref for Session {
    type Target = Store;

    fn deref(&self) -> &Store {
        &self.store
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Store {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Organizer;
    use crate::types::AreaData;
    use std::time::Duration;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> GatewayConfig {
        GatewayConfig {
            path: dir.path().join("agenda.xml"),
            create_if_missing: true,
            write_retries: 0,
            retry_backoff: Duration::ZERO,
        }
    }

    #[test]
    fn test_close_persists() {
        let dir = TempDir::new().unwrap();

        let mut session = Session::open(config(&dir)).unwrap();
        session.add_area(AreaData::new("reading", "books")).unwrap();
        session.close().unwrap();

        let session = Session::open(config(&dir)).unwrap();
        assert_eq!(session.list_areas()[0].name, "reading");
    }

    #[test]
    fn test_drop_does_not_write() {
        let dir = TempDir::new().unwrap();

        let mut session = Session::open(config(&dir)).unwrap();
        session.add_area(AreaData::new("scratch", "")).unwrap();
        drop(session);

        let session = Session::open(config(&dir)).unwrap();
        assert!(session.is_empty());
    }

    #[test]
    fn test_close_failure_returns_store() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();

        let mut session = Session::open(GatewayConfig {
            path: nested.join("agenda.xml"),
            ..config(&dir)
        })
        .unwrap();
        session.add_area(AreaData::new("kept", "")).unwrap();
        std::fs::remove_dir_all(&nested).unwrap();

        let (err, store) = session.close().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
        assert_eq!(store.list_areas()[0].name, "kept");
    }
}
