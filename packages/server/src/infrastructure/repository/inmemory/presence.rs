//! InMemory Presence Tracker 実装
//!
//! ロック順序は「学生 → クラス」。読み取り系はクラスのメンバー集合を先に
//! スナップショットし、クラスのロックを解放してから学生の状態を読みます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    ClassId, ClassRoster, ColorFractions, ColorSignal, ConnectionId, PresenceError,
    PresenceTracker, StudentId, StudentPresence,
};

type SharedPresence = Arc<Mutex<StudentPresence>>;
type SharedRoster = Arc<Mutex<ClassRoster>>;

/// インメモリ Presence Tracker 実装
#[derive(Default)]
pub struct InMemoryPresenceTracker {
    students: RwLock<HashMap<StudentId, SharedPresence>>,
    rooms: RwLock<HashMap<ClassId, SharedRoster>>,
}

impl InMemoryPresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    async fn student(&self, student_id: &StudentId) -> Option<SharedPresence> {
        self.students.read().await.get(student_id).cloned()
    }

    async fn student_or_insert(&self, student_id: &StudentId) -> SharedPresence {
        if let Some(presence) = self.student(student_id).await {
            return presence;
        }
        let mut students = self.students.write().await;
        students.entry(student_id.clone()).or_default().clone()
    }

    async fn room(&self, class_id: &ClassId) -> Result<SharedRoster, PresenceError> {
        self.rooms
            .read()
            .await
            .get(class_id)
            .cloned()
            .ok_or_else(|| PresenceError::ClassNotFound(class_id.to_string()))
    }

    async fn room_or_insert(&self, class_id: &ClassId) -> SharedRoster {
        if let Ok(room) = self.room(class_id).await {
            return room;
        }
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(class_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(ClassRoster::new(class_id.clone()))))
            .clone()
    }

    /// Colors of members with at least one live connection.
    async fn active_colors(&self, class_id: &ClassId) -> Result<Vec<ColorSignal>, PresenceError> {
        let members = self.members(class_id).await?;
        let mut colors = Vec::with_capacity(members.len());
        for student_id in &members {
            let Some(presence) = self.student(student_id).await else {
                continue;
            };
            let presence = presence.lock().await;
            if presence.is_live() {
                colors.push(presence.color);
            }
        }
        Ok(colors)
    }
}

#[async_trait]
impl PresenceTracker for InMemoryPresenceTracker {
    async fn register(
        &self,
        class_id: ClassId,
        student_id: StudentId,
        connection_id: ConnectionId,
    ) -> Option<ClassId> {
        let presence = self.student_or_insert(&student_id).await;
        let mut presence = presence.lock().await;

        let previous = presence.class_id.replace(class_id.clone());
        if let Some(previous_class) = previous.as_ref().filter(|c| **c != class_id) {
            if let Ok(room) = self.room(previous_class).await {
                room.lock().await.leave(&student_id);
            }
        }

        let room = self.room_or_insert(&class_id).await;
        room.lock().await.join(student_id);
        presence.connections.insert(connection_id);

        previous
    }

    async fn set_color(
        &self,
        student_id: &StudentId,
        color: ColorSignal,
    ) -> Result<Option<ClassId>, PresenceError> {
        let presence = self
            .student(student_id)
            .await
            .ok_or_else(|| PresenceError::StudentNotFound(student_id.to_string()))?;
        let mut presence = presence.lock().await;
        presence.color = color;
        Ok(presence.class_id.clone())
    }

    async fn disconnect(&self, student_id: &StudentId, connection_id: &ConnectionId) {
        let Some(presence) = self.student(student_id).await else {
            return;
        };
        let mut presence = presence.lock().await;
        if presence.drop_connection(connection_id) {
            tracing::debug!(student_id = %student_id, "Last connection closed, color reset to inactive");
        }
    }

    async fn active_count(&self, class_id: &ClassId) -> Result<usize, PresenceError> {
        Ok(self.active_colors(class_id).await?.len())
    }

    async fn color_fractions(&self, class_id: &ClassId) -> Result<ColorFractions, PresenceError> {
        let colors = self.active_colors(class_id).await?;
        Ok(ColorFractions::from_active_colors(colors))
    }

    async fn total_count(&self, class_id: &ClassId) -> Result<usize, PresenceError> {
        let room = self.room(class_id).await?;
        let room = room.lock().await;
        Ok(room.seen.len())
    }

    async fn members(&self, class_id: &ClassId) -> Result<Vec<StudentId>, PresenceError> {
        let room = self.room(class_id).await?;
        let room = room.lock().await;
        let mut members: Vec<StudentId> = room.members.iter().cloned().collect();
        members.sort();
        Ok(members)
    }

    async fn color_of(&self, student_id: &StudentId) -> Result<ColorSignal, PresenceError> {
        let presence = self
            .student(student_id)
            .await
            .ok_or_else(|| PresenceError::StudentNotFound(student_id.to_string()))?;
        let color = presence.lock().await.color;
        Ok(color)
    }

    async fn classes(&self) -> Vec<ClassId> {
        let mut classes: Vec<ClassId> = self.rooms.read().await.keys().cloned().collect();
        classes.sort();
        classes
    }
}
