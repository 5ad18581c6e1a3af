// Service endpoints.

use tracing::debug;

use crate::client::HassClient;
use crate::error::Error;
use crate::models::{Attributes, ServiceDomain, State};

impl HassClient {
    /// List every domain and the services it exposes.
    ///
    /// `GET /api/services`
    pub async fn get_services(&self) -> Result<Vec<ServiceDomain>, Error> {
        debug!("listing services");
        self.get("get services", &["services"]).await
    }

    /// Call `domain.service` and return the states that changed while it ran.
    ///
    /// `POST /api/services/{domain}/{service}`. `service_data` usually carries
    /// `entity_id` plus service-specific fields; `None` sends no body at all.
    /// Targeting several entities is still a single request.
    pub async fn call_service(
        &self,
        domain: &str,
        service: &str,
        service_data: Option<&Attributes>,
    ) -> Result<Vec<State>, Error> {
        debug!(domain, service, has_data = service_data.is_some(), "calling service");
        self.post_optional(
            &format!("call service {domain}.{service}"),
            &["services", domain, service],
            service_data,
        )
        .await
    }
}
