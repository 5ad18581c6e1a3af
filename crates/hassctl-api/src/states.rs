// Entity state endpoints.

use tracing::debug;

use crate::client::HassClient;
use crate::error::Error;
use crate::models::{State, StateUpdate};

impl HassClient {
    /// List the state of every entity, in server order.
    ///
    /// `GET /api/states`
    pub async fn get_states(&self) -> Result<Vec<State>, Error> {
        debug!("listing states");
        self.get("get states", &["states"]).await
    }

    /// Fetch one entity's state.
    ///
    /// `GET /api/states/{entity_id}`. An unknown entity surfaces as
    /// [`Error::Api`] with status 404.
    pub async fn get_state(&self, entity_id: &str) -> Result<State, Error> {
        debug!(entity_id, "fetching state");
        self.get(&format!("get state for {entity_id}"), &["states", entity_id])
            .await
    }

    /// Set an entity's state, creating the entity if the server has no
    /// record of it.
    ///
    /// `POST /api/states/{entity_id}` with `{"state": ..., "attributes": ...}`
    pub async fn set_state(&self, entity_id: &str, update: &StateUpdate) -> Result<State, Error> {
        debug!(entity_id, state = %update.state, "setting state");
        self.post(
            &format!("set state for {entity_id}"),
            &["states", entity_id],
            update,
        )
        .await
    }
}
