//! Checkpoint store contracts: durability across engine instances, and the
//! SQLite backend's round-trip and last-write-wins behavior.

use std::sync::Arc;

use confab::runtimes::{
    Checkpoint, Checkpointer, Engine, EngineStatus, InMemoryCheckpointer,
};
use confab::state::ConversationState;
use confab::workflow::{Collaborators, build_workflow};

fn engine_with_store(store: Arc<dyn Checkpointer>) -> Engine {
    let graph = build_workflow(&Collaborators::offline()).expect("workflow compiles");
    Engine::new(graph, store)
}

#[tokio::test]
/// A suspended session resumes on a *different* engine instance sharing
/// the same store - the checkpoint is the only artifact a suspension
/// leaves behind.
async fn test_suspension_survives_engine_restart() {
    let store: Arc<dyn Checkpointer> = Arc::new(InMemoryCheckpointer::new());

    let first_engine = engine_with_store(store.clone());
    let response = first_engine.submit("s1", "book a meeting").await.unwrap();
    assert_eq!(response.status, EngineStatus::Suspended);
    drop(first_engine);

    let second_engine = engine_with_store(store);
    let response = second_engine
        .resume("s1", "Standup with Jane tomorrow 9am for 30 minutes")
        .await
        .unwrap();
    assert_eq!(response.status, EngineStatus::Terminated);
    assert!(
        response
            .assistant_text
            .unwrap()
            .contains("scheduled successfully")
    );
}

#[tokio::test]
/// One checkpoint per session: each save replaces the previous snapshot.
async fn test_last_write_wins_per_session() {
    let store = InMemoryCheckpointer::new();
    let state = ConversationState::new_with_human_message("hi");
    store
        .save(Checkpoint::terminated("s1", state.clone(), 1))
        .await
        .unwrap();
    store
        .save(Checkpoint::terminated("s1", state, 5))
        .await
        .unwrap();

    let loaded = store.load("s1").await.unwrap().unwrap();
    assert_eq!(loaded.step, 5);
    assert_eq!(store.list_sessions().await.unwrap(), vec!["s1"]);
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use confab::runtimes::SqliteCheckpointer;

    #[tokio::test]
    /// The whole engine flow runs against the SQLite backend.
    async fn test_engine_flow_on_sqlite() {
        let store: Arc<dyn Checkpointer> = Arc::new(
            SqliteCheckpointer::connect("sqlite::memory:")
                .await
                .expect("in-memory sqlite connects"),
        );
        let engine = engine_with_store(store.clone());

        let response = engine.submit("s1", "book a meeting").await.unwrap();
        assert_eq!(response.status, EngineStatus::Suspended);

        let loaded = store.load("s1").await.unwrap().expect("persisted");
        assert!(loaded.is_suspended());
        assert!(loaded.interrupt.is_some());

        let response = engine
            .resume("s1", "Standup with Jane tomorrow 9am for 30 minutes")
            .await
            .unwrap();
        assert_eq!(response.status, EngineStatus::Terminated);
        let loaded = store.load("s1").await.unwrap().expect("persisted");
        assert_eq!(loaded.state, ConversationState::default());
    }

    #[tokio::test]
    /// A file-backed database keeps checkpoints across connections.
    async fn test_file_backed_database_persists_across_connections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("checkpoints.db");
        std::fs::File::create(&db_path).expect("touch db file");
        let url = format!("sqlite://{}", db_path.display());

        {
            let store = SqliteCheckpointer::connect(&url).await.expect("connect");
            let state = ConversationState::new_with_human_message("persist me");
            store
                .save(Checkpoint::terminated("durable", state, 2))
                .await
                .unwrap();
        }

        let store = SqliteCheckpointer::connect(&url).await.expect("reconnect");
        let loaded = store.load("durable").await.unwrap().expect("row survived");
        assert_eq!(loaded.step, 2);
        assert_eq!(
            loaded.state.last_human_text(),
            Some("persist me")
        );
    }
}
