//! Shared application state.

use std::{collections::HashMap, sync::Arc, time::Duration};

use fastcups_shared::time::{Clock, SystemClock};

use crate::{
    domain::{AnswerContext, Answerer, ClassId, SessionRegistry, TabDeduplicator},
    infrastructure::{
        event_bus::PusherEventBus,
        message_pusher::WebSocketMessagePusher,
        metrics::DroppedEventCounters,
        repository::{
            InMemoryContextRegistry, InMemoryPresenceTracker, InMemoryQuestionQueue,
            InMemorySessionRegistry,
        },
    },
    usecase::{
        AttachContextUseCase, ChangeColorUseCase, CloseConnectionUseCase, GetDashboardUseCase,
        ListClassesUseCase, OpenConnectionUseCase, RegisterStudentUseCase, RoomFanout,
        SubmitQuestionUseCase, UpdateQuestionStatusUseCase, WatchClassUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub open_connection_usecase: Arc<OpenConnectionUseCase>,
    pub register_student_usecase: Arc<RegisterStudentUseCase>,
    pub change_color_usecase: Arc<ChangeColorUseCase>,
    pub submit_question_usecase: Arc<SubmitQuestionUseCase>,
    pub update_question_status_usecase: Arc<UpdateQuestionStatusUseCase>,
    pub watch_class_usecase: Arc<WatchClassUseCase>,
    pub close_connection_usecase: Arc<CloseConnectionUseCase>,
    pub get_dashboard_usecase: Arc<GetDashboardUseCase>,
    pub list_classes_usecase: Arc<ListClassesUseCase>,
    pub attach_context_usecase: Arc<AttachContextUseCase>,
    /// Session Registry（ヘルスチェック用）
    pub sessions: Arc<dyn SessionRegistry>,
    pub counters: Arc<DroppedEventCounters>,
}

impl AppState {
    /// Wire every use case over the in-memory stores.
    ///
    /// Order:
    /// 1. Stores (session / presence / question / context)
    /// 2. MessagePusher and global event bus
    /// 3. UseCases
    pub fn in_memory(
        answerer: Arc<dyn Answerer>,
        contexts: HashMap<ClassId, AnswerContext>,
        answer_timeout: Duration,
    ) -> Self {
        Self::with_clock(answerer, contexts, answer_timeout, Arc::new(SystemClock))
    }

    pub fn with_clock(
        answerer: Arc<dyn Answerer>,
        contexts: HashMap<ClassId, AnswerContext>,
        answer_timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // 1. Stores
        let sessions = Arc::new(InMemorySessionRegistry::new());
        let presence = Arc::new(InMemoryPresenceTracker::new());
        let queue = Arc::new(InMemoryQuestionQueue::new());
        let context_registry = Arc::new(InMemoryContextRegistry::with_contexts(contexts));

        // 2. MessagePusher / event bus
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        let event_bus = Arc::new(PusherEventBus::new(message_pusher.clone()));
        let counters = Arc::new(DroppedEventCounters::new());
        let fanout = Arc::new(RoomFanout::new(
            sessions.clone(),
            presence.clone(),
            message_pusher.clone(),
        ));
        let deduplicator = Arc::new(TabDeduplicator::new(event_bus));

        // 3. UseCases
        Self {
            open_connection_usecase: Arc::new(OpenConnectionUseCase::new(
                sessions.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            register_student_usecase: Arc::new(RegisterStudentUseCase::new(
                sessions.clone(),
                presence.clone(),
                deduplicator,
            )),
            change_color_usecase: Arc::new(ChangeColorUseCase::new(
                sessions.clone(),
                presence.clone(),
            )),
            submit_question_usecase: Arc::new(
                SubmitQuestionUseCase::new(
                    queue.clone(),
                    context_registry.clone(),
                    answerer,
                    fanout.clone(),
                    counters.clone(),
                    clock,
                )
                .with_answer_timeout(answer_timeout),
            ),
            update_question_status_usecase: Arc::new(UpdateQuestionStatusUseCase::new(
                queue.clone(),
                fanout,
            )),
            watch_class_usecase: Arc::new(WatchClassUseCase::new(sessions.clone())),
            close_connection_usecase: Arc::new(CloseConnectionUseCase::new(
                sessions.clone(),
                presence.clone(),
                message_pusher,
            )),
            get_dashboard_usecase: Arc::new(GetDashboardUseCase::new(presence.clone(), queue)),
            list_classes_usecase: Arc::new(ListClassesUseCase::new(presence)),
            attach_context_usecase: Arc::new(AttachContextUseCase::new(context_registry)),
            sessions,
            counters,
        }
    }
}
