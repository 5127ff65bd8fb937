//! InMemory Session Registry 実装

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    Binding, ClassId, Connection, ConnectionId, RegistrationTimestamp, SessionError,
    SessionRegistry, StudentId, Timestamp,
};

/// インメモリ Session Registry 実装
#[derive(Default)]
pub struct InMemorySessionRegistry {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn open(&self, opened_at: Timestamp) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, Connection::new(connection_id, opened_at));
        connection_id
    }

    async fn bind(
        &self,
        connection_id: &ConnectionId,
        student_id: StudentId,
        registered_at: RegistrationTimestamp,
    ) -> Result<(), SessionError> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .get_mut(connection_id)
            .ok_or(SessionError::ConnectionNotFound(*connection_id))?;

        if let Some(existing) = connection.student_id() {
            return Err(SessionError::AlreadyBound {
                connection_id: *connection_id,
                student_id: existing.to_string(),
            });
        }

        connection.binding = Some(Binding {
            student_id,
            registered_at,
        });
        Ok(())
    }

    async fn close(&self, connection_id: &ConnectionId) -> Result<Option<StudentId>, SessionError> {
        let mut connections = self.connections.write().await;
        connections
            .remove(connection_id)
            .map(|connection| connection.binding.map(|b| b.student_id))
            .ok_or(SessionError::ConnectionNotFound(*connection_id))
    }

    async fn resolve(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<StudentId>, SessionError> {
        let connections = self.connections.read().await;
        connections
            .get(connection_id)
            .map(|connection| connection.student_id().cloned())
            .ok_or(SessionError::ConnectionNotFound(*connection_id))
    }

    async fn watch(
        &self,
        connection_id: &ConnectionId,
        class_id: ClassId,
    ) -> Result<(), SessionError> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .get_mut(connection_id)
            .ok_or(SessionError::ConnectionNotFound(*connection_id))?;
        connection.watching = Some(class_id);
        Ok(())
    }

    async fn connections_for(
        &self,
        student_ids: &[StudentId],
        class_id: &ClassId,
    ) -> Vec<ConnectionId> {
        let wanted: HashSet<&StudentId> = student_ids.iter().collect();
        let connections = self.connections.read().await;
        connections
            .values()
            .filter(|connection| {
                connection
                    .student_id()
                    .is_some_and(|student_id| wanted.contains(student_id))
                    || connection.watching.as_ref() == Some(class_id)
            })
            .map(|connection| connection.id)
            .collect()
    }

    async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}
