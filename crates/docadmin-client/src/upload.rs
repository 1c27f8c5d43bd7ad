//! Document upload: form state, validation and multipart submission.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::api::ApiClient;
use crate::error::{AdminError, Operation, ValidationError};
use crate::session::Session;
use crate::workflow::{Phase, Workflow};

/// Declared type of every picked file. The backend decides what is valid.
pub const PDF_MIME: &str = "application/pdf";
/// Multipart field carrying the binary.
pub const PDF_FIELD: &str = "pdf";

/// A picked file: name, declared MIME type and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PdfFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: PDF_MIME.to_owned(),
            bytes,
        }
    }

    /// Read a file from disk. No content or size checks are made.
    pub async fn from_path(path: &Path) -> Result<Self, AdminError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AdminError::File {
                path: path.to_owned(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_owned());
        Ok(Self::new(file_name, bytes))
    }
}

/// What the operator picked: contents in hand, or a path read at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfSource {
    Loaded(PdfFile),
    Path(PathBuf),
}

impl PdfSource {
    /// Contents of the picked file. A path is read now, so an unreadable
    /// file surfaces only once every other check has passed.
    pub async fn load(self) -> Result<PdfFile, AdminError> {
        match self {
            Self::Loaded(file) => Ok(file),
            Self::Path(path) => PdfFile::from_path(&path).await,
        }
    }
}

impl From<PdfFile> for PdfSource {
    fn from(file: PdfFile) -> Self {
        Self::Loaded(file)
    }
}

impl From<PathBuf> for PdfSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// User input for one upload. Kept intact until an upload succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub summary: String,
    /// Blank means the backend derives the slug.
    pub slug: String,
    pub file: Option<PdfSource>,
}

impl UploadForm {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check preconditions in order; the first failure wins.
    pub fn validate(&self, session: &Session) -> Result<UploadRequest, ValidationError> {
        if !session.is_authenticated() {
            return Err(ValidationError::NotAuthenticated);
        }
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let file = self.file.clone().ok_or(ValidationError::MissingFile)?;

        let slug = self.slug.trim();
        Ok(UploadRequest {
            title: title.to_owned(),
            summary: self.summary.clone(),
            slug: (!slug.is_empty()).then(|| slug.to_owned()),
            file,
        })
    }
}

/// A validated upload, ready to become a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub title: String,
    pub summary: String,
    pub slug: Option<String>,
    pub file: PdfSource,
}

impl UploadRequest {
    pub async fn into_multipart(self) -> Result<Form, AdminError> {
        let PdfFile {
            file_name,
            mime,
            bytes,
        } = self.file.load().await?;
        let pdf = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| AdminError::Configuration(format!("invalid MIME type {mime}: {e}")))?;

        let mut form = Form::new()
            .text("title", self.title)
            .text("summary", self.summary);
        if let Some(slug) = self.slug {
            form = form.text("slug", slug);
        }
        Ok(form.part(PDF_FIELD, pdf))
    }
}

/// Validates an [`UploadForm`] and submits it as one request.
#[derive(Debug, Clone)]
pub struct UploadWorkflow {
    workflow: Workflow,
}

impl Default for UploadWorkflow {
    fn default() -> Self {
        Self {
            workflow: Workflow::new(Operation::Upload),
        }
    }
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.workflow.phase()
    }

    /// Submit `form`. A picked path is read only after validation passes.
    /// On success returns the backend's body verbatim and
    /// resets the form; on any failure the form is left as it was.
    pub async fn submit(
        &self,
        api: &ApiClient,
        session: &Session,
        form: &mut UploadForm,
    ) -> Result<String, AdminError> {
        let flight = self.workflow.begin()?;
        let request = form.validate(session)?;
        let authorization = session
            .authorization_header_value()
            .ok_or(ValidationError::NotAuthenticated)?;

        let title = request.title.clone();
        let multipart = request.into_multipart().await?;
        flight.requesting();
        let body = api.upload(&authorization, multipart).await?;

        info!(%title, "document uploaded");
        form.reset();
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use wiremock::matchers::{bearer_token, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn filled_form() -> UploadForm {
        UploadForm {
            title: "  Lease 2026 ".into(),
            summary: "Signed copy".into(),
            slug: "   ".into(),
            file: Some(PdfFile::new("lease.pdf", b"%PDF-1.7 fake".to_vec()).into()),
        }
    }

    fn authed() -> Session {
        Session::from_token("abc")
    }

    #[test]
    fn not_authenticated_wins_over_everything() {
        let form = UploadForm::default();
        assert_eq!(
            form.validate(&Session::Anonymous),
            Err(ValidationError::NotAuthenticated)
        );
    }

    #[test]
    fn blank_title_rejected_even_with_file() {
        let form = UploadForm {
            title: " \t ".into(),
            ..filled_form()
        };
        assert_eq!(form.validate(&authed()), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn missing_file_rejected_with_valid_title() {
        let form = UploadForm {
            file: None,
            ..filled_form()
        };
        assert_eq!(form.validate(&authed()), Err(ValidationError::MissingFile));
    }

    #[test]
    fn request_trims_title_and_drops_blank_slug() {
        let req = filled_form().validate(&authed()).unwrap();
        assert_eq!(req.title, "Lease 2026");
        assert_eq!(req.summary, "Signed copy");
        assert_eq!(req.slug, None);

        let form = UploadForm {
            slug: " lease-2026 ".into(),
            ..filled_form()
        };
        assert_eq!(
            form.validate(&authed()).unwrap().slug.as_deref(),
            Some("lease-2026")
        );
    }

    #[tokio::test]
    async fn from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("contract.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        let pdf = PdfFile::from_path(&file).await.unwrap();
        assert_eq!(pdf.file_name, "contract.pdf");
        assert_eq!(pdf.mime, PDF_MIME);
        assert_eq!(pdf.bytes, b"%PDF");

        let missing = PdfFile::from_path(&dir.path().join("nope.pdf")).await;
        assert!(matches!(missing, Err(AdminError::File { .. })));
    }

    #[tokio::test]
    async fn invalid_form_issues_no_request() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/upload"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock)
            .await;
        let api = ApiClient::new(&ClientConfig::new(Some(mock.uri()))).unwrap();
        let wf = UploadWorkflow::new();

        let mut form = filled_form();
        let err = wf
            .submit(&api, &Session::Anonymous, &mut form)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Validation(ValidationError::NotAuthenticated)
        ));
        assert_eq!(form, filled_form());
        assert_eq!(wf.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn success_resets_form() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/upload"))
            .and(bearer_token("abc"))
            .and(body_string_contains("name=\"title\""))
            .and(body_string_contains("Lease 2026"))
            .and(body_string_contains("name=\"pdf\""))
            .and(body_string_contains("filename=\"lease.pdf\""))
            .respond_with(ResponseTemplate::new(201).set_body_string("ok"))
            .expect(1)
            .mount(&mock)
            .await;
        let api = ApiClient::new(&ClientConfig::new(Some(mock.uri()))).unwrap();

        let mut form = filled_form();
        let body = UploadWorkflow::new()
            .submit(&api, &authed(), &mut form)
            .await
            .unwrap();
        assert_eq!(body, "ok");
        assert!(form.is_empty());

        let requests = mock.received_requests().await.unwrap();
        let sent = String::from_utf8_lossy(&requests[0].body);
        assert!(!sent.contains("name=\"slug\""));
        assert!(sent.contains("application/pdf"));
    }

    #[tokio::test]
    async fn failure_preserves_form() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/upload"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&mock)
            .await;
        let api = ApiClient::new(&ClientConfig::new(Some(mock.uri()))).unwrap();
        let wf = UploadWorkflow::new();

        let mut form = filled_form();
        let err = wf.submit(&api, &authed(), &mut form).await.unwrap_err();
        assert_eq!(err.to_string(), "Upload failed (413): too large");
        assert_eq!(form, filled_form());
        assert_eq!(wf.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn unreadable_path_loses_to_earlier_checks() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/upload"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock)
            .await;
        let api = ApiClient::new(&ClientConfig::new(Some(mock.uri()))).unwrap();
        let wf = UploadWorkflow::new();
        let picked = UploadForm {
            file: Some(PathBuf::from("/nonexistent/lease.pdf").into()),
            ..filled_form()
        };

        let mut form = picked.clone();
        let err = wf.submit(&api, &Session::Anonymous, &mut form).await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::Validation(ValidationError::NotAuthenticated)
        ));

        let mut form = UploadForm {
            title: "  ".into(),
            ..picked.clone()
        };
        let err = wf.submit(&api, &authed(), &mut form).await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::Validation(ValidationError::MissingTitle)
        ));

        let mut form = picked.clone();
        let err = wf.submit(&api, &authed(), &mut form).await.unwrap_err();
        assert!(matches!(err, AdminError::File { .. }));
        assert!(err.to_string().contains("/nonexistent/lease.pdf"));
        assert_eq!(form, picked);
        assert_eq!(wf.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn picked_path_is_read_at_submit() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deed.pdf");
        std::fs::write(&file, b"%PDF-deed").unwrap();

        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/upload"))
            .and(body_string_contains("filename=\"deed.pdf\""))
            .and(body_string_contains("%PDF-deed"))
            .respond_with(ResponseTemplate::new(200).set_body_string("stored"))
            .expect(1)
            .mount(&mock)
            .await;
        let api = ApiClient::new(&ClientConfig::new(Some(mock.uri()))).unwrap();

        let mut form = UploadForm {
            title: "Deed".into(),
            file: Some(file.into()),
            ..UploadForm::default()
        };
        let body = UploadWorkflow::new()
            .submit(&api, &authed(), &mut form)
            .await
            .unwrap();
        assert_eq!(body, "stored");
        assert!(form.is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        // Nothing listens on the discard port.
        let api = ApiClient::new(&ClientConfig::new(Some("http://127.0.0.1:9".into()))).unwrap();
        let wf = UploadWorkflow::new();

        let mut form = filled_form();
        let err = wf.submit(&api, &authed(), &mut form).await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::Transport {
                operation: Operation::Upload,
                ..
            }
        ));
        assert!(err.to_string().starts_with("Upload error: "));
        assert_eq!(form, filled_form());
        assert_eq!(wf.phase(), Phase::Idle);
    }
}
