use tracing::info;

use crate::{
    error::{AppResult, ErrorKind},
    models::State,
    service::StateService,
};

pub const DEFAULT_STATES: [&str; 3] = ["TODO", "DOING", "DONE"];

/// Creates every default state that is not stored yet. Returns how many were
/// inserted.
pub async fn seed_default_states(service: &StateService) -> AppResult<usize> {
    let mut inserted = 0;

    for name in DEFAULT_STATES {
        match service.get_by_name(name).await {
            Ok(_) => continue,
            Err(err) if err.kind() == ErrorKind::EntityNotFound => {
                service.create(Some(State::new(name))).await?;
                inserted += 1;
            }
            Err(err) => return Err(err),
        }
    }

    info!(inserted, "default states seeded");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::InMemoryStateRepository;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let service = StateService::new(Arc::new(InMemoryStateRepository::new()));
        service
            .create(Some(State::new("DOING")))
            .await
            .expect("create should succeed");

        let first = seed_default_states(&service)
            .await
            .expect("seed should succeed");
        let second = seed_default_states(&service)
            .await
            .expect("seed should succeed");

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(service.get_all().await.expect("list").len(), 3);
    }
}
