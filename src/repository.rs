use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::State,
};

/// Storage for [`State`] records.
///
/// `save` inserts when the record is transient (`id == 0`) and otherwise
/// writes the record under its id, returning what was stored. Ids handed out
/// for later transient saves always stay above every explicit id saved.
#[async_trait]
pub trait StateRepository: Send + Sync {
    async fn init(&self) -> AppResult<()>;
    async fn save(&self, state: State) -> AppResult<State>;
    async fn delete(&self, state: &State) -> AppResult<()>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<State>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<State>>;
    async fn find_all(&self) -> AppResult<Vec<State>>;
    async fn find_all_by_order_by_id(&self) -> AppResult<Vec<State>>;
}

#[derive(Clone)]
pub struct PgStateRepository {
    pool: PgPool,
}

impl PgStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateRepository for PgStateRepository {
    async fn init(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn save(&self, state: State) -> AppResult<State> {
        let saved = if state.is_transient() {
            sqlx::query_as::<_, State>(
                r#"
                INSERT INTO states (name)
                VALUES ($1)
                RETURNING id, name
                "#,
            )
            .bind(state.name)
            .fetch_one(&self.pool)
            .await?
        } else {
            let mut tx = self.pool.begin().await?;
            let saved = sqlx::query_as::<_, State>(
                r#"
                INSERT INTO states (id, name)
                VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
                RETURNING id, name
                "#,
            )
            .bind(state.id)
            .bind(state.name)
            .fetch_one(&mut *tx)
            .await?;

            // Explicit ids bypass the sequence; keep it ahead of them.
            sqlx::query(
                r#"
                SELECT setval(
                    pg_get_serial_sequence('states', 'id'),
                    GREATEST((SELECT MAX(id) FROM states), 1)
                )
                "#,
            )
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            saved
        };

        Ok(saved)
    }

    async fn delete(&self, state: &State) -> AppResult<()> {
        sqlx::query("DELETE FROM states WHERE id = $1")
            .bind(state.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<State>> {
        let state = sqlx::query_as::<_, State>("SELECT id, name FROM states WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(state)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<State>> {
        let state = sqlx::query_as::<_, State>(
            "SELECT id, name FROM states WHERE name = $1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(state)
    }

    async fn find_all(&self) -> AppResult<Vec<State>> {
        let states = sqlx::query_as::<_, State>("SELECT id, name FROM states")
            .fetch_all(&self.pool)
            .await?;
        Ok(states)
    }

    async fn find_all_by_order_by_id(&self) -> AppResult<Vec<State>> {
        let states = sqlx::query_as::<_, State>("SELECT id, name FROM states ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(states)
    }
}

#[derive(Debug)]
struct InMemoryTable {
    next_id: i64,
    rows: BTreeMap<i64, State>,
}

impl Default for InMemoryTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// Process-local storage; ids start at 1 and only move forward. Once
/// `i64::MAX` is taken, transient saves fail.
#[derive(Debug, Default)]
pub struct InMemoryStateRepository {
    table: RwLock<InMemoryTable>,
}

impl InMemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateRepository for InMemoryStateRepository {
    async fn init(&self) -> AppResult<()> {
        Ok(())
    }

    async fn save(&self, mut state: State) -> AppResult<State> {
        let mut table = self.table.write().await;

        if state.is_transient() {
            if table.rows.contains_key(&table.next_id) {
                return Err(AppError::storage("state id sequence exhausted"));
            }
            state.id = table.next_id;
        }
        table.next_id = match state.id.checked_add(1) {
            Some(next) => table.next_id.max(next),
            None => i64::MAX,
        };
        table.rows.insert(state.id, state.clone());

        Ok(state)
    }

    async fn delete(&self, state: &State) -> AppResult<()> {
        self.table.write().await.rows.remove(&state.id);
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<State>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<State>> {
        let state = self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|state| state.name == name)
            .cloned();
        Ok(state)
    }

    async fn find_all(&self) -> AppResult<Vec<State>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_all_by_order_by_id(&self) -> AppResult<Vec<State>> {
        let mut states = self.find_all().await?;
        states.sort_by_key(|state| state.id);
        Ok(states)
    }
}
