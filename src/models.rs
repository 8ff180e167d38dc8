use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named status/category record.
///
/// `id == 0` means the record has not been stored yet; storage assigns the
/// real identifier on the first `save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct State {
    pub id: i64,
    pub name: String,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }

    pub fn with_id(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.id == 0
    }
}

/// Name-only projection of a [`State`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateDto {
    pub name: String,
}

impl From<&State> for StateDto {
    fn from(state: &State) -> Self {
        Self {
            name: state.name.clone(),
        }
    }
}

/// Create/update payload; the id comes from storage or from the request path.
#[derive(Debug, Clone, Deserialize)]
pub struct NewState {
    pub name: String,
}

impl NewState {
    pub fn into_state(self) -> State {
        State::new(self.name)
    }

    pub fn into_state_with_id(self, id: i64) -> State {
        State::with_id(id, self.name)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}
