//! Service layer for `State` records.
//!
//! Validates arguments and checks existence before handing work to the
//! repository. Every failure is returned to the caller as an [`AppError`].
use std::sync::Arc;

use tracing::{debug, error};

use crate::{
    error::{AppError, AppResult},
    models::{State, StateDto},
    repository::StateRepository,
};

const NULL_STATE_MESSAGE: &str = "State cannot be null";

#[derive(Clone)]
pub struct StateService {
    repository: Arc<dyn StateRepository>,
}

impl StateService {
    pub fn new(repository: Arc<dyn StateRepository>) -> Self {
        Self { repository }
    }

    /// Stores a new state and returns it with its storage-assigned id.
    pub async fn create(&self, state: Option<State>) -> AppResult<State> {
        debug!(state = ?state, "creating state");
        let Some(state) = state else {
            error!("failed to create state: state is null");
            return Err(AppError::null_entity(NULL_STATE_MESSAGE));
        };

        let state = self.repository.save(state).await?;
        debug!(id = state.id, name = %state.name, "state was created");
        Ok(state)
    }

    pub async fn read_by_id(&self, id: i64) -> AppResult<State> {
        debug!(id, "fetching state");
        let Some(state) = self.repository.find_by_id(id).await? else {
            error!(id, "state doesn't exist");
            return Err(AppError::not_found(format!("State with id {id} not found")));
        };

        debug!(id, name = %state.name, "fetched state");
        Ok(state)
    }

    /// Overwrites an existing state with the caller-supplied one.
    ///
    /// The stored record is only looked up to prove it exists; its fields are
    /// not merged into `state`.
    pub async fn update(&self, state: Option<State>) -> AppResult<State> {
        debug!(state = ?state, "updating state");
        let Some(state) = state else {
            error!("failed to update state: state is null");
            return Err(AppError::null_entity(NULL_STATE_MESSAGE));
        };

        self.read_by_id(state.id).await?;
        let state = self.repository.save(state).await?;
        debug!(id = state.id, name = %state.name, "state was updated");
        Ok(state)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        debug!(id, "deleting state");
        let state = self.read_by_id(id).await?;
        self.repository.delete(&state).await?;
        debug!(id, "state was deleted");
        Ok(())
    }

    /// All states, ascending by id.
    pub async fn get_all(&self) -> AppResult<Vec<State>> {
        debug!("fetching all states");
        let states = self.repository.find_all_by_order_by_id().await?;
        debug!(count = states.len(), "fetched all states");
        Ok(states)
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<State> {
        debug!(name, "fetching state by name");
        match self.repository.find_by_name(name).await? {
            Some(state) => {
                debug!(id = state.id, name, "state found");
                Ok(state)
            }
            None => {
                error!(name, "no state found with name");
                Err(AppError::not_found(format!(
                    "State with name '{name}' not found"
                )))
            }
        }
    }

    /// All states as name-only projections, in storage order.
    pub async fn find_all(&self) -> AppResult<Vec<StateDto>> {
        debug!("fetching all states as StateDto");
        let dtos: Vec<StateDto> = self
            .repository
            .find_all()
            .await?
            .iter()
            .map(StateDto::from)
            .collect();
        debug!(count = dtos.len(), "fetched all states as StateDto");
        Ok(dtos)
    }
}
