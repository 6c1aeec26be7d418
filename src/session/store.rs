use tokio::sync::Mutex;

use crate::session::state::{Mode, Session, SessionEvent};

/// Holds the current [`Session`] and hands out request generations.
///
/// Each `begin` supersedes whatever run was in flight; events still carrying
/// the older generation are dropped by the reducer.
#[derive(Default)]
pub struct SessionStore {
    current: Mutex<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self, mode: Mode) -> u64 {
        let mut current = self.current.lock().await;
        let generation = current.generation() + 1;
        tracing::debug!("Starting generation {} for {:?}", generation, mode);
        let session = std::mem::take(&mut *current);
        *current = session.reduce(SessionEvent::Started { generation, mode });
        generation
    }

    pub async fn dispatch(&self, event: SessionEvent) -> Session {
        let mut current = self.current.lock().await;
        let session = std::mem::take(&mut *current);
        *current = session.reduce(event);
        current.clone()
    }

    pub async fn snapshot(&self) -> Session {
        self.current.lock().await.clone()
    }
}
