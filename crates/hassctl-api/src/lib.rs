//! Async Rust client for the Home Assistant REST API.
//!
//! - **[`ClientConfig`]** validates the API root and bearer token.
//! - **[`HassClient`]** issues authenticated requests, one per call, and
//!   classifies every failure into an [`Error`] variant:
//!   configuration, transport, API (non-2xx with the server's text) or decode.
//! - **[`models`]** mirrors the JSON resources (states, config, services,
//!   events).
//!
//! ```no_run
//! # async fn demo() -> Result<(), hassctl_api::Error> {
//! use hassctl_api::{ClientConfig, HassClient, StateUpdate};
//!
//! let config = ClientConfig::from_host("homeassistant.local", None, "token".to_owned().into())?;
//! let client = HassClient::new(&config)?;
//!
//! client.set_state("input_boolean.guest_mode", &StateUpdate::new("on")).await?;
//! let state = client.get_state("input_boolean.guest_mode").await?;
//! assert_eq!(state.state, "on");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod states;
pub mod system;
pub mod transport;

pub use client::HassClient;
pub use error::Error;
pub use models::{
    ApiStatus, AreaFilter, Attributes, Config, Context, DeviceFilter, EntityFilter, EventListener,
    ServiceDefinition, ServiceDomain, ServiceField, ServiceTarget, State, StateUpdate, UnitSystem,
};
pub use transport::{ClientConfig, DEFAULT_PORT, DEFAULT_TIMEOUT};
