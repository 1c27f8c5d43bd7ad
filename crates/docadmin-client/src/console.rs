use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{AdminError, Operation};
use crate::reindex::ReindexTrigger;
use crate::session::{Session, SessionStore, TokenSlot};
use crate::status::{Outcome, StatusMessage, StatusReporter};
use crate::upload::{UploadForm, UploadWorkflow};
use crate::workflow::Workflow;

/// One operator's view of the backend: session, upload form, workflows and
/// the last status message.
///
/// Every action blanks the status, runs, and leaves exactly one new message.
/// A missing base URL stops every network action before anything is sent.
pub struct AdminConsole<S> {
    config: ClientConfig,
    api: Option<ApiClient>,
    session: SessionStore<S>,
    login: Workflow,
    upload: UploadWorkflow,
    reindex: ReindexTrigger,
    status: StatusReporter,
    /// Input for the next upload.
    pub form: UploadForm,
}

impl<S: TokenSlot> AdminConsole<S> {
    /// Resolve the endpoint and read the persisted session.
    ///
    /// A missing base URL is not an error here; it is reported by each
    /// network action instead.
    pub fn new(config: ClientConfig, slot: S) -> Result<Self, AdminError> {
        let api = match ApiClient::new(&config) {
            Ok(api) => Some(api),
            Err(AdminError::MissingBaseUrl) => None,
            Err(e) => return Err(e),
        };
        Ok(Self {
            config,
            api,
            session: SessionStore::load_persisted(slot),
            login: Workflow::new(Operation::Login),
            upload: UploadWorkflow::new(),
            reindex: ReindexTrigger::new(),
            status: StatusReporter::new(),
            form: UploadForm::default(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn status(&self) -> &StatusMessage {
        self.status.current()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> &StatusMessage {
        self.status.clear();
        let result = async {
            let api = self.api.as_ref().ok_or(AdminError::MissingBaseUrl)?;
            let flight = self.login.begin()?;
            flight.requesting();
            self.session.login(api, email, password).await?;
            Ok::<_, AdminError>("Logged in.".to_owned())
        }
        .await;
        self.status.report(result)
    }

    pub fn logout(&mut self) -> &StatusMessage {
        self.status.clear();
        self.session.logout();
        self.status.report(Outcome::Success("Logged out.".into()))
    }

    pub async fn upload(&mut self) -> &StatusMessage {
        self.status.clear();
        let result = match self.api.as_ref() {
            None => Err(AdminError::MissingBaseUrl),
            Some(api) => self
                .upload
                .submit(api, self.session.session(), &mut self.form)
                .await
                .map(|body| format!("Upload OK: {body}")),
        };
        self.status.report(result)
    }

    pub async fn reindex(&mut self) -> &StatusMessage {
        self.status.clear();
        let result = match self.api.as_ref() {
            None => Err(AdminError::MissingBaseUrl),
            Some(api) => self
                .reindex
                .trigger(api, self.session.session())
                .await
                .map(|body| format!("Reindex OK: {body}")),
        };
        self.status.report(result)
    }
}
