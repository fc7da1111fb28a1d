//! Email drafts summarizing a DN master row.

use crate::error::{ReconcileError, ReconcileResult};
use ce_core::schema::dn_master;
use ce_core::{EmailConfig, Row};
use serde_json::{json, Value};

/// Split a comma-separated recipient list, keeping entries that contain `@`.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| s.contains('@'))
        .map(String::from)
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The one-row table appended to every draft.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftSummary {
    pub dn_number: String,
    pub section_length: String,
    pub execution_partner: String,
    pub route_name: String,
    pub section_name: String,
    pub project_name: String,
}

impl DraftSummary {
    const HEADERS: [&'static str; 6] = [
        "Demand Note Reference number",
        "Section Length (Mtr.)",
        "Execution Partner Name",
        "Route Name (CWIP)",
        "Section Name for ROW (CWIP)",
        "Project Name",
    ];

    pub fn from_master_row(row: &Row, email: &EmailConfig) -> Self {
        let text = |col: &str| row.value(col).to_string();
        Self {
            dn_number: text(dn_master::DN_NUMBER),
            section_length: text("dn_length_mtr"),
            execution_partner: email.execution_partner.clone(),
            route_name: text("parent_route"),
            section_name: text(dn_master::SITE_ID),
            project_name: email.project_name.clone(),
        }
    }

    fn values(&self) -> [&str; 6] {
        [
            &self.dn_number,
            &self.section_length,
            &self.execution_partner,
            &self.route_name,
            &self.section_name,
            &self.project_name,
        ]
    }

    pub fn to_html(&self) -> String {
        let cell = |tag: &str, style: &str, text: &str| {
            format!("<{tag} style='{style}'>{}</{tag}>", escape_html(text))
        };
        let head: String = Self::HEADERS
            .iter()
            .map(|h| {
                cell(
                    "th",
                    "border:1px solid #d1d5db;padding:6px 8px;background:#e5e7eb;text-align:left;",
                    h,
                )
            })
            .collect();
        let body: String = self
            .values()
            .iter()
            .map(|v| cell("td", "border:1px solid #d1d5db;padding:6px 8px;", v))
            .collect();
        format!(
            "<table style=\"border-collapse:collapse;width:100%;font-size:13px;margin:16px 0;\">\
             <thead><tr>{head}</tr></thead><tbody><tr>{body}</tr></tbody></table>"
        )
    }
}

fn body_html(body: &str) -> String {
    body.replace("\r\n", "\n").replace('\n', "<br>")
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailDraft {
    pub subject: String,
    pub html_body: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
}

impl EmailDraft {
    /// `body<br><br>{summary table}<br>Thank you.`
    ///
    /// The body is the sender's own HTML and goes in as written, with line
    /// breaks turned into `<br>`. Only the summary cells are escaped.
    pub fn compose(subject: &str, body: &str, summary: &DraftSummary) -> Self {
        Self {
            subject: subject.to_string(),
            html_body: format!(
                "{}<br><br>{}<br>Thank you.",
                body_html(body),
                summary.to_html()
            ),
            to: Vec::new(),
            cc: Vec::new(),
        }
    }

    /// Set recipients from comma-separated lists; at least one `To` is required.
    pub fn with_recipients(mut self, to: &str, cc: &str) -> ReconcileResult<Self> {
        self.to = parse_recipients(to);
        if self.to.is_empty() {
            return Err(ReconcileError::NoRecipients);
        }
        self.cc = parse_recipients(cc);
        Ok(self)
    }

    /// Message payload for the mail draft endpoint.
    pub fn to_graph_payload(&self) -> Value {
        let recipients = |list: &[String]| -> Vec<Value> {
            list.iter()
                .map(|address| json!({ "emailAddress": { "address": address } }))
                .collect()
        };
        let mut payload = json!({
            "subject": self.subject,
            "body": { "contentType": "HTML", "content": self.html_body },
            "toRecipients": recipients(&self.to),
        });
        if !self.cc.is_empty() {
            payload["ccRecipients"] = Value::Array(recipients(&self.cc));
        }
        payload
    }
}

#[cfg(test)]
#[path = "draft_test.rs"]
mod tests;
