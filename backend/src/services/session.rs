//! Recommendation sessions and follow-up chat
//!
//! A session starts with no crop selected. A successful recommendation moves it
//! to `CropSelected` with an empty history, discarding any earlier conversation.
//! Each follow-up question appends a user turn, asks the advice endpoint with the
//! accumulated history, then appends the assistant's answer.
//!
//! Sessions are independent and keyed by id. Each sits behind its own mutex so
//! one session's turns are serialized while others proceed.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::AdviceClient;
use crate::services::recommendation::RecommendationService;
use shared::{
    validate_features, validate_question, ConversationHistory, ConversationTurn, CropName,
    FeatureVector, RecommendationResponse, SessionView,
};

/// Where a session is in the recommend / chat cycle
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    NoCropSelected,
    CropSelected {
        crop: CropName,
        features: FeatureVector,
        history: ConversationHistory,
    },
}

/// One user's recommendation session
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    state: SessionState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: SessionState::NoCropSelected,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Enter `CropSelected` with a fresh history
    pub fn select(&mut self, crop: CropName, features: FeatureVector) {
        self.state = SessionState::CropSelected {
            crop,
            features,
            history: ConversationHistory::new(),
        };
        self.updated_at = Utc::now();
    }

    /// Current crop and the measurements that produced it
    pub fn selection(&self) -> Option<(CropName, FeatureVector)> {
        match &self.state {
            SessionState::CropSelected { crop, features, .. } => Some((crop.clone(), *features)),
            SessionState::NoCropSelected => None,
        }
    }

    pub fn history(&self) -> Option<&ConversationHistory> {
        match &self.state {
            SessionState::CropSelected { history, .. } => Some(history),
            SessionState::NoCropSelected => None,
        }
    }

    /// Append a chat turn; only allowed once a crop is selected
    pub fn push_turn(&mut self, turn: ConversationTurn) -> AppResult<()> {
        match &mut self.state {
            SessionState::CropSelected { history, .. } => {
                history.push(turn);
                self.updated_at = Utc::now();
                Ok(())
            }
            SessionState::NoCropSelected => Err(AppError::NoCropSelected),
        }
    }

    pub fn view(&self) -> SessionView {
        let (crop, features, history) = match &self.state {
            SessionState::CropSelected {
                crop,
                features,
                history,
            } => (Some(crop.clone()), Some(*features), history.clone()),
            SessionState::NoCropSelected => (None, None, ConversationHistory::new()),
        };

        SessionView {
            id: self.id,
            crop,
            features,
            history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory session registry
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Open a new session, evicting the least recently updated one when full
    pub async fn create(&self) -> SessionView {
        let session = Session::new();
        let view = session.view();

        let mut sessions = self.sessions.write().await;
        while sessions.len() >= self.max_sessions {
            match Self::least_recent(&sessions) {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::debug!("Evicted idle session {}", id);
                }
                None => break,
            }
        }
        sessions.insert(view.id, Arc::new(Mutex::new(session)));
        tracing::debug!("Created session {} ({} open)", view.id, sessions.len());

        view
    }

    /// Only sessions with no outstanding handle are candidates. A request holds
    /// its handle from `get` until it finishes, so it never loses its session
    /// between lookup and lock. The map's write lock keeps `get` from cloning a
    /// handle while this runs.
    fn least_recent(sessions: &HashMap<Uuid, Arc<Mutex<Session>>>) -> Option<Uuid> {
        sessions
            .iter()
            .filter(|(_, s)| Arc::strong_count(s) == 1)
            .filter_map(|(id, s)| s.try_lock().ok().map(|s| (*id, s.updated_at())))
            .min_by_key(|(_, updated_at)| *updated_at)
            .map(|(id, _)| id)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Session".to_string()))
    }

    pub async fn view(&self, id: Uuid) -> AppResult<SessionView> {
        let session = self.get(id).await?;
        let session = session.lock().await;
        Ok(session.view())
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| tracing::debug!("Deleted session {}", id))
            .ok_or_else(|| AppError::NotFound("Session".to_string()))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Drives the recommend / chat cycle for stored sessions
#[derive(Clone)]
pub struct SessionService {
    store: SessionStore,
    advice: AdviceClient,
}

impl SessionService {
    pub fn new(store: SessionStore, advice: AdviceClient) -> Self {
        Self { store, advice }
    }

    /// Predict a crop for the session.
    ///
    /// A recommended crop resets the session and fetches initial insights, which
    /// are returned but not recorded as a chat turn. A miss or a pipeline failure
    /// leaves the session untouched and makes no advice call.
    pub async fn recommend(
        &self,
        session_id: Uuid,
        features: FeatureVector,
        recommender: &RecommendationService,
    ) -> AppResult<RecommendationResponse> {
        validate_features(&features)?;

        let handle = self.store.get(session_id).await?;
        let mut session = handle.lock().await;

        let recommendation = recommender.predict(&features);
        let insights = match recommendation.crop() {
            Some(crop) => {
                session.select(crop.clone(), features);
                tracing::info!("Session {} selected {}", session_id, crop);
                Some(self.advice.get_advice(crop, &features, None, None).await)
            }
            None => None,
        };

        Ok(RecommendationResponse {
            recommendation,
            insights,
            session: session.view(),
        })
    }

    /// Ask a follow-up question about the selected crop; returns the updated session
    pub async fn ask(&self, session_id: Uuid, question: &str) -> AppResult<SessionView> {
        validate_question(question).map_err(|message| AppError::Validation {
            field: "question".to_string(),
            message: message.to_string(),
        })?;

        let handle = self.store.get(session_id).await?;
        let mut session = handle.lock().await;

        let (crop, features) = session.selection().ok_or(AppError::NoCropSelected)?;
        session.push_turn(ConversationTurn::user(question))?;

        let answer = self
            .advice
            .get_advice(&crop, &features, Some(question), session.history())
            .await;
        session.push_turn(ConversationTurn::assistant(answer))?;

        Ok(session.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Role;

    fn rice() -> CropName {
        CropName::from_label(1).unwrap()
    }

    fn features() -> FeatureVector {
        FeatureVector::new(90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9)
    }

    #[test]
    fn test_new_session_has_no_crop() {
        let session = Session::new();
        assert_eq!(session.state(), &SessionState::NoCropSelected);
        assert!(session.selection().is_none());
        assert!(session.view().history.is_empty());
    }

    #[test]
    fn test_turns_rejected_before_selection() {
        let mut session = Session::new();
        let err = session.push_turn(ConversationTurn::user("hi")).unwrap_err();
        assert!(matches!(err, AppError::NoCropSelected));
    }

    #[test]
    fn test_select_resets_history() {
        let mut session = Session::new();
        session.select(rice(), features());
        session.push_turn(ConversationTurn::user("q")).unwrap();
        session.push_turn(ConversationTurn::assistant("a")).unwrap();
        assert_eq!(session.history().unwrap().len(), 2);

        let coffee = CropName::from_label(22).unwrap();
        session.select(coffee.clone(), features());
        assert!(session.history().unwrap().is_empty());
        assert_eq!(session.selection().unwrap().0, coffee);
    }

    #[test]
    fn test_view_preserves_turn_order() {
        let mut session = Session::new();
        session.select(rice(), features());
        session.push_turn(ConversationTurn::user("first")).unwrap();
        session.push_turn(ConversationTurn::assistant("second")).unwrap();

        let view = session.view();
        let roles: Vec<Role> = view.history.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(view.crop, Some(rice()));
    }

    #[tokio::test]
    async fn test_store_create_get_delete() {
        let store = SessionStore::new(10);
        let view = store.create().await;
        assert_eq!(store.view(view.id).await.unwrap().id, view.id);

        store.delete(view.id).await.unwrap();
        assert!(matches!(
            store.view(view.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.delete(view.id).await.is_err());
    }

    #[tokio::test]
    async fn test_store_evicts_least_recent() {
        let store = SessionStore::new(2);
        let first = store.create().await;
        let second = store.create().await;

        // touch the first so the second becomes the oldest
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        {
            let handle = store.get(first.id).await.unwrap();
            handle.lock().await.select(rice(), features());
        }

        let third = store.create().await;
        assert_eq!(store.len().await, 2);
        assert!(store.get(first.id).await.is_ok());
        assert!(store.get(second.id).await.is_err());
        assert!(store.get(third.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_keeps_session_with_pending_request() {
        let store = SessionStore::new(1);
        let busy = store.create().await;

        // looked up but not yet locked, as in a request between `get` and `lock`
        let handle = store.get(busy.id).await.unwrap();
        let other = store.create().await;

        handle.lock().await.select(rice(), features());
        let view = store.view(busy.id).await.unwrap();
        assert_eq!(view.crop, Some(rice()));
        assert!(store.get(other.id).await.is_ok());
        drop(handle);

        // once released it is an ordinary eviction candidate again
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let newest = store.create().await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(newest.id).await.is_ok());
    }
}
