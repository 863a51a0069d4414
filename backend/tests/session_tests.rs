//! Session flow tests: recommend, ask, reset

mod common;

use std::sync::Arc;

use common::*;
use crop_advisor::artifacts::{ArtifactBody, Artifacts};
use crop_advisor::error::AppError;
use crop_advisor::external::AdviceClient;
use crop_advisor::services::{RecommendationService, SessionService, SessionStore};
use shared::{Recommendation, Role};

struct Harness {
    _artifacts: tempfile::TempDir,
    stub: StubUpstream,
    store: SessionStore,
    service: SessionService,
    recommender: RecommendationService,
}

async fn harness(classifier: ArtifactBody) -> Harness {
    let (dir, config) = write_artifacts(classifier);
    let artifacts = Artifacts::load(&config).unwrap();
    let stub = StubUpstream::start("Keep the paddy flooded.").await;
    let store = SessionStore::new(16);
    let service = SessionService::new(
        store.clone(),
        AdviceClient::new(&stub.advice_config()).unwrap(),
    );

    Harness {
        _artifacts: dir,
        stub,
        store,
        service,
        recommender: RecommendationService::new(Arc::new(artifacts)),
    }
}

#[tokio::test]
async fn test_recommendation_selects_crop_with_insights() {
    let h = harness(rainfall_forest()).await;
    let session = h.store.create().await;

    let response = h
        .service
        .recommend(session.id, rice_features(), &h.recommender)
        .await
        .unwrap();

    assert!(response.recommendation.is_recommended());
    assert_eq!(response.insights.as_deref(), Some("Keep the paddy flooded."));
    assert_eq!(response.session.crop.unwrap().as_str(), "Rice");
    // initial insights are not a chat turn
    assert!(response.session.history.is_empty());
    assert_eq!(h.stub.hits(), 1);
}

#[tokio::test]
async fn test_each_question_adds_two_turns() {
    let h = harness(rainfall_forest()).await;
    let id = h.store.create().await.id;
    h.service
        .recommend(id, rice_features(), &h.recommender)
        .await
        .unwrap();

    let first = h.service.ask(id, "Which fertilizer?").await.unwrap();
    assert_eq!(first.history.len(), 2);

    h.stub.set_status(503);
    let second = h.service.ask(id, "What about pests?").await.unwrap();
    assert_eq!(second.history.len(), 4);

    let turns = second.history.turns();
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "Which fertilizer?");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].content, "Keep the paddy flooded.");
    assert_eq!(turns[3].content, "Unable to fetch agricultural insights.");
}

#[tokio::test]
async fn test_question_is_sent_with_selected_crop() {
    let h = harness(rainfall_forest()).await;
    let id = h.store.create().await.id;
    h.service
        .recommend(id, rice_features(), &h.recommender)
        .await
        .unwrap();

    h.service.ask(id, "How deep to plant?").await.unwrap();

    let prompt = h.stub.last_prompt().unwrap();
    assert!(prompt.contains("for Rice cultivation"));
    assert!(prompt.ends_with("Latest User Query: How deep to plant?"));
}

#[tokio::test]
async fn test_new_recommendation_resets_history() {
    let h = harness(rainfall_forest()).await;
    let id = h.store.create().await.id;
    h.service
        .recommend(id, rice_features(), &h.recommender)
        .await
        .unwrap();
    h.service.ask(id, "Which fertilizer?").await.unwrap();

    let mut dry = rice_features();
    dry.rainfall = 60.0;
    let response = h
        .service
        .recommend(id, dry, &h.recommender)
        .await
        .unwrap();

    assert_eq!(response.session.crop.unwrap().as_str(), "Maize");
    assert!(response.session.history.is_empty());
    assert_eq!(response.session.features.unwrap().rainfall, 60.0);
}

#[tokio::test]
async fn test_question_before_recommendation_is_rejected() {
    let h = harness(rainfall_forest()).await;
    let id = h.store.create().await.id;

    let err = h.service.ask(id, "Anything?").await.unwrap_err();

    assert!(matches!(err, AppError::NoCropSelected));
    assert_eq!(err.status().as_u16(), 409);
    assert_eq!(h.stub.hits(), 0);
}

#[tokio::test]
async fn test_no_match_makes_no_advice_call() {
    let h = harness(constant_classifier(99)).await;
    let id = h.store.create().await.id;

    let response = h
        .service
        .recommend(id, rice_features(), &h.recommender)
        .await
        .unwrap();

    assert_eq!(response.recommendation, Recommendation::NoMatch { label: 99 });
    assert!(response.insights.is_none());
    assert!(response.session.crop.is_none());
    assert_eq!(h.stub.hits(), 0);
}

#[tokio::test]
async fn test_no_match_keeps_previous_selection() {
    let (_dir, config) = write_artifacts(constant_classifier(99));
    let missing = RecommendationService::new(Arc::new(Artifacts::load(&config).unwrap()));

    let h = harness(rainfall_forest()).await;
    let id = h.store.create().await.id;
    h.service
        .recommend(id, rice_features(), &h.recommender)
        .await
        .unwrap();
    h.service.ask(id, "Which fertilizer?").await.unwrap();
    let hits = h.stub.hits();

    let response = h
        .service
        .recommend(id, rice_features(), &missing)
        .await
        .unwrap();

    assert_eq!(response.session.crop.unwrap().as_str(), "Rice");
    assert_eq!(response.session.history.len(), 2);
    assert_eq!(h.stub.hits(), hits);
}

#[tokio::test]
async fn test_invalid_input_rejected_before_prediction() {
    let h = harness(rainfall_forest()).await;
    let id = h.store.create().await.id;
    let mut features = rice_features();
    features.ph = 15.0;

    let err = h
        .service
        .recommend(id, features, &h.recommender)
        .await
        .unwrap_err();

    match err {
        AppError::Validation { field, .. } => assert_eq!(field, "ph"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(h.stub.hits(), 0);
}

#[tokio::test]
async fn test_blank_question_rejected() {
    let h = harness(rainfall_forest()).await;
    let id = h.store.create().await.id;
    h.service
        .recommend(id, rice_features(), &h.recommender)
        .await
        .unwrap();

    let err = h.service.ask(id, "   ").await.unwrap_err();

    assert!(matches!(err, AppError::Validation { .. }));
    assert_eq!(h.stub.hits(), 1);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let h = harness(rainfall_forest()).await;
    let a = h.store.create().await.id;
    let b = h.store.create().await.id;

    h.service
        .recommend(a, rice_features(), &h.recommender)
        .await
        .unwrap();
    h.service.ask(a, "Which fertilizer?").await.unwrap();

    let other = h.store.view(b).await.unwrap();
    assert!(other.crop.is_none());
    assert!(other.history.is_empty());
}
