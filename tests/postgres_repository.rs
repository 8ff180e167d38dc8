use std::sync::Arc;

use sqlx::{PgPool, postgres::PgPoolOptions};
use state_catalog::{
    error::ErrorKind,
    models::State,
    repository::{PgStateRepository, StateRepository},
    service::StateService,
};

async fn maybe_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;

    PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .ok()
}

#[tokio::test]
async fn postgres_repository_crud_flow() {
    let Some(pool) = maybe_pool().await else {
        eprintln!(
            "Skipping postgres_repository_crud_flow: TEST_DATABASE_URL/DATABASE_URL is not set or database is unreachable."
        );
        return;
    };

    let repo = Arc::new(PgStateRepository::new(pool.clone()));
    repo.init().await.expect("migrations should run");

    sqlx::query("TRUNCATE TABLE states RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("truncate should succeed");

    let service = StateService::new(repo.clone());

    let todo = service
        .create(Some(State::new("TODO")))
        .await
        .expect("create should succeed");
    assert_eq!(todo.id, 1);

    let done = service
        .create(Some(State::new("DONE")))
        .await
        .expect("create should succeed");

    let fetched = service
        .get_by_name("DONE")
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, done);

    let updated = service
        .update(Some(State::with_id(todo.id, "BACKLOG")))
        .await
        .expect("update should succeed");
    assert_eq!(updated.name, "BACKLOG");

    let ordered = service.get_all().await.expect("list should succeed");
    assert_eq!(
        ordered,
        vec![State::with_id(1, "BACKLOG"), State::with_id(done.id, "DONE")]
    );

    service.delete(todo.id).await.expect("delete should succeed");
    let err = service
        .read_by_id(todo.id)
        .await
        .expect_err("deleted state should be gone");
    assert_eq!(err.kind(), ErrorKind::EntityNotFound);

    assert_eq!(service.find_all().await.expect("list should succeed").len(), 1);

    let imported = repo
        .save(State::with_id(10, "IMPORTED"))
        .await
        .expect("explicit id save should succeed");
    assert_eq!(imported.id, 10);

    let next = service
        .create(Some(State::new("AFTER IMPORT")))
        .await
        .expect("create after an explicit id should not collide");
    assert_eq!(next.id, 11);
}
