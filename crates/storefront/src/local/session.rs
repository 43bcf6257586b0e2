use async_trait::async_trait;
use tower_sessions::Session;

use super::{LocalStore, LocalStoreError};

/// [`LocalStore`] backed by the tower-sessions record of the current request.
///
/// Values are stored as JSON strings inside the session record, so the
/// browser only ever sees the opaque session cookie.
#[derive(Debug, Clone)]
pub struct SessionLocalStore {
    session: Session,
}

impl SessionLocalStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl LocalStore for SessionLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.session.get::<String>(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.session.insert(key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        self.session.remove::<String>(key).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_round_trip_through_session() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let store = SessionLocalStore::new(session);

        assert_eq!(store.get("mock_user").await.unwrap(), None);
        store.set("mock_user", "demo").await.unwrap();
        assert_eq!(
            store.get("mock_user").await.unwrap().as_deref(),
            Some("demo")
        );
        store.remove("mock_user").await.unwrap();
        assert_eq!(store.get("mock_user").await.unwrap(), None);
    }
}
