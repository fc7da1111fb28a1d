//! Document parsing service: PO workbook, DN application and DN.

use crate::error::{ClientError, ClientResult};
use crate::http::{check, join, json_body, UploadFile};
use async_trait::async_trait;
use ce_core::{Authority, CellValue, FieldSet, Row, SiteId, Source};
use reqwest::multipart::Form;
use reqwest::Client;

/// Turn a parser response into a field set.
///
/// The service answers with a flat JSON object; an object carrying an
/// `error` key is a failed parse.
pub fn fields_from_json(body: &serde_json::Value, source: Source) -> ClientResult<FieldSet> {
    let object = body.as_object().ok_or_else(|| ClientError::InvalidResponse {
        url: source.label().to_string(),
        message: "expected a JSON object of fields".to_string(),
    })?;
    if let Some(err) = object.get("error") {
        let message = err.as_str().map(String::from).unwrap_or_else(|| err.to_string());
        return Err(ClientError::Service(message));
    }
    let fields: Row = object
        .iter()
        .map(|(k, v)| (k.clone(), CellValue::from_json(v)))
        .collect();
    Ok(FieldSet::new(source, fields))
}

/// Extracts labelled fields from uploaded documents.
#[async_trait]
pub trait ParseService: Send + Sync {
    /// Fields of the PO workbook row for `site_id`.
    async fn parse_po(&self, file: UploadFile, site_id: &SiteId) -> ClientResult<FieldSet>;

    async fn parse_application(&self, file: UploadFile) -> ClientResult<FieldSet>;

    async fn parse_dn(&self, file: UploadFile, authority: Authority) -> ClientResult<FieldSet>;
}

/// [`ParseService`] over the HTTP parsing backend.
#[derive(Debug, Clone)]
pub struct HttpParseClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl HttpParseClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        join(&self.base_url, path)
    }

    async fn post_form(&self, path: &str, form: Form, source: Source) -> ClientResult<FieldSet> {
        let url = self.url(path);
        log::debug!("POST {}", url);
        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        fields_from_json(&json_body(response).await?, source)
    }
}

#[async_trait]
impl ParseService for HttpParseClient {
    async fn parse_po(&self, file: UploadFile, site_id: &SiteId) -> ClientResult<FieldSet> {
        let form = Form::new()
            .part("po_file", file.into_part())
            .text("site_id", site_id.to_string());
        self.post_form("/api/parse-po", form, Source::Po).await
    }

    async fn parse_application(&self, file: UploadFile) -> ClientResult<FieldSet> {
        let form = Form::new().part("dn_application_file", file.into_part());
        self.post_form("/api/parse-application", form, Source::Application)
            .await
    }

    async fn parse_dn(&self, file: UploadFile, authority: Authority) -> ClientResult<FieldSet> {
        // the DN parser selects its layout by display label
        let form = Form::new()
            .part("dn_file", file.into_part())
            .text("authority", authority.label());
        self.post_form("/api/parse-dn", form, Source::Dn).await
    }
}

/// The three documents of one analysis run.
#[derive(Debug, Clone)]
pub struct ParseRequest {
    pub po: UploadFile,
    pub site_id: SiteId,
    pub application: UploadFile,
    pub dn: UploadFile,
    pub authority: Authority,
}

/// Parse all three documents concurrently, failing on the first error.
///
/// Returns `(po, application, dn)`.
pub async fn parse_all(
    service: &dyn ParseService,
    request: ParseRequest,
) -> ClientResult<(FieldSet, FieldSet, FieldSet)> {
    let ParseRequest {
        po,
        site_id,
        application,
        dn,
        authority,
    } = request;
    tokio::try_join!(
        service.parse_po(po, &site_id),
        service.parse_application(application),
        service.parse_dn(dn, authority),
    )
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
