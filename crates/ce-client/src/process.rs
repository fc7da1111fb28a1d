//! Per-authority DN output workbooks: previews and generated files.

use crate::error::{ClientError, ClientResult};
use crate::http::{check, json_body, UploadFile};
use crate::parse::HttpParseClient;
use ce_core::{Authority, Row};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::Form;
use reqwest::Response;

/// Output workbook generated from a demand note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    NonRefundable,
    Sd,
}

impl OutputKind {
    pub const ALL: [OutputKind; 2] = [OutputKind::NonRefundable, OutputKind::Sd];

    fn slug(self) -> &'static str {
        match self {
            OutputKind::NonRefundable => "non_refundable",
            OutputKind::Sd => "sd",
        }
    }

    /// Form field carrying the manual values when generating the file.
    fn manual_field(self) -> &'static str {
        match self {
            OutputKind::NonRefundable => "manual_fields",
            OutputKind::Sd => "sd_manual_fields",
        }
    }

    fn fallback_file_name(self) -> &'static str {
        match self {
            OutputKind::NonRefundable => "output_non_refundable.xlsx",
            OutputKind::Sd => "output_sd.xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputKind::NonRefundable => "Non Refundable",
            OutputKind::Sd => "SD",
        }
    }
}

/// File name used when `/process` does not name its archive.
pub const ALL_OUTPUTS_FILE_NAME: &str = "outputs.zip";

/// A generated file as served by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File name from a `Content-Disposition` header.
///
/// An RFC 5987 `filename*=utf-8''...` value wins over a plain `filename=`;
/// without either, `fallback` is used.
pub fn filename_from_disposition(disposition: Option<&str>, fallback: &str) -> String {
    let mut plain = None;
    for param in disposition.unwrap_or_default().split(';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value
                    .get(..7)
                    .filter(|charset| charset.eq_ignore_ascii_case("utf-8''"))
                    .map(|_| &value[7..]);
                if let Some(Ok(decoded)) = encoded.map(urlencoding::decode) {
                    if !decoded.is_empty() {
                        return decoded.into_owned();
                    }
                }
            }
            "filename" => plain = Some(value.trim_matches('"').to_string()),
            _ => {}
        }
    }
    plain
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

async fn output_file(response: Response, fallback: &str) -> ClientResult<OutputFile> {
    let disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let file_name = filename_from_disposition(disposition.as_deref(), fallback);
    let bytes = response.bytes().await?.to_vec();
    Ok(OutputFile { file_name, bytes })
}

impl HttpParseClient {
    /// Rows the backend would write into the `kind` workbook.
    pub async fn preview_output(
        &self,
        kind: OutputKind,
        authority: Authority,
        file: UploadFile,
        manual_fields: &Row,
    ) -> ClientResult<Vec<Row>> {
        let url = self.url(&format!("/preview/{}", kind.slug()));
        log::debug!("POST {} (authority {})", url, authority.id());
        let form = Form::new()
            .text("authority", authority.id())
            .text("manualFields", manual_fields.to_json().to_string())
            .part("file", file.into_part());
        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        let body = json_body(response).await?;
        if let Some(err) = body.get("error") {
            let message = err.as_str().map(String::from).unwrap_or_else(|| err.to_string());
            return Err(ClientError::Service(message));
        }
        let invalid = |message: &str| ClientError::InvalidResponse {
            url: url.clone(),
            message: message.to_string(),
        };
        body.get("rows")
            .and_then(|rows| rows.as_array())
            .ok_or_else(|| invalid("expected a 'rows' array"))?
            .iter()
            .map(|row| Row::from_json(row).ok_or_else(|| invalid("expected each row to be an object")))
            .collect()
    }

    /// Generate the `kind` workbook for one demand note.
    pub async fn process_output(
        &self,
        kind: OutputKind,
        authority: Authority,
        file: UploadFile,
        manual_fields: &Row,
    ) -> ClientResult<OutputFile> {
        let url = self.url(&format!("/process/{}", kind.slug()));
        log::debug!("POST {} (authority {})", url, authority.id());
        let form = Form::new()
            .text("authority", authority.id())
            .text(kind.manual_field(), manual_fields.to_json().to_string())
            .part("file", file.into_part());
        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        output_file(response, kind.fallback_file_name()).await
    }

    /// Generate both workbooks at once, zipped.
    pub async fn process_all(
        &self,
        authority: Authority,
        file: UploadFile,
        manual_fields: &Row,
        sd_manual_fields: &Row,
    ) -> ClientResult<OutputFile> {
        let url = self.url("/process");
        log::debug!("POST {} (authority {})", url, authority.id());
        let form = Form::new()
            .text("authority", authority.id())
            .text(
                OutputKind::NonRefundable.manual_field(),
                manual_fields.to_json().to_string(),
            )
            .text(
                OutputKind::Sd.manual_field(),
                sd_manual_fields.to_json().to_string(),
            )
            .part("file", file.into_part());
        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        output_file(response, ALL_OUTPUTS_FILE_NAME).await
    }
}

#[cfg(test)]
#[path = "process_test.rs"]
mod tests;
