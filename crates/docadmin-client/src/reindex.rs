use tracing::info;

use crate::api::ApiClient;
use crate::error::{AdminError, Operation, ValidationError};
use crate::session::Session;
use crate::workflow::{Phase, Workflow};

/// Asks the backend to rebuild its search index. One request, one answer;
/// progress is not monitored.
#[derive(Debug, Clone)]
pub struct ReindexTrigger {
    workflow: Workflow,
}

impl Default for ReindexTrigger {
    fn default() -> Self {
        Self {
            workflow: Workflow::new(Operation::Reindex),
        }
    }
}

impl ReindexTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.workflow.phase()
    }

    pub async fn trigger(&self, api: &ApiClient, session: &Session) -> Result<String, AdminError> {
        let flight = self.workflow.begin()?;
        let authorization = session
            .authorization_header_value()
            .ok_or(ValidationError::NotAuthenticated)?;

        flight.requesting();
        let body = api.reindex(&authorization).await?;
        info!("reindex accepted");
        Ok(body)
    }
}
