//! Master-table endpoints of the parsing backend and actual-cost extraction.

use crate::error::{ClientError, ClientResult};
use crate::http::{check, json_body, UploadFile};
use crate::parse::HttpParseClient;
use ce_core::{Authority, CellValue, Row};
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which master workbook an endpoint deals with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterKind {
    DnMaster,
    PoMaster,
}

impl MasterKind {
    fn upload_path(self) -> &'static str {
        match self {
            MasterKind::DnMaster => "/api/upload-dn-master",
            MasterKind::PoMaster => "/api/upload-po-master",
        }
    }

    fn download_path(self) -> &'static str {
        match self {
            MasterKind::DnMaster => "/api/download-dn-master",
            MasterKind::PoMaster => "/api/download-po-master",
        }
    }
}

/// Per-file outcome of an actual-cost extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualCostResult {
    pub filename: String,
    #[serde(default)]
    pub section_length: CellValue,
    #[serde(default)]
    pub ri_cost: CellValue,
    #[serde(default)]
    pub demand_note_reference: CellValue,
    /// Free-form result for authorities without a dedicated extractor
    #[serde(default)]
    pub parsed: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct ActualCostResponse {
    results: Vec<ActualCostResult>,
}

impl HttpParseClient {
    /// Upload a master workbook for the backend to merge; returns its JSON summary.
    pub async fn upload_master(&self, kind: MasterKind, file: UploadFile) -> ClientResult<Value> {
        let url = self.url(kind.upload_path());
        log::debug!("POST {} ({})", url, file.file_name);
        let form = Form::new().part("file", file.into_part());
        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        json_body(response).await
    }

    /// Download a master table as spreadsheet bytes.
    pub async fn download_master(&self, kind: MasterKind) -> ClientResult<Vec<u8>> {
        let url = self.url(kind.download_path());
        log::debug!("GET {}", url);
        let response = check(self.client.get(&url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Send one reconciled row to the DN master.
    pub async fn send_to_master_dn(&self, row: &Row) -> ClientResult<Value> {
        let url = self.url("/api/send-to-master-dn");
        log::debug!("POST {}", url);
        let response = check(self.client.post(&url).json(row).send().await?).await?;
        json_body(response).await
    }

    /// Extract section length, RI cost and DN reference from each DN.
    pub async fn actual_cost(
        &self,
        authority: Authority,
        files: Vec<UploadFile>,
    ) -> ClientResult<Vec<ActualCostResult>> {
        let url = self.url("/actual_cost_extraction/");
        let form = files
            .into_iter()
            .fold(Form::new().text("authority", authority.id()), |form, f| {
                form.part("files", f.into_part())
            });
        log::debug!("POST {} (authority {})", url, authority.id());
        let response = check(self.client.post(&url).multipart(form).send().await?).await?;
        let body = json_body(response).await?;
        let parsed: ActualCostResponse =
            serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse {
                url,
                message: e.to_string(),
            })?;
        Ok(parsed.results)
    }
}

#[cfg(test)]
#[path = "masters_test.rs"]
mod tests;
