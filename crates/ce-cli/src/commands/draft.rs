//! Draft command implementation - email summary of a DN master row

use anyhow::{Context, Result};
use ce_client::MailClient;
use ce_reconcile::{DraftSummary, EmailDraft};

use crate::cli::{DraftArgs, GlobalArgs};
use crate::commands::common::print_json;
use crate::context::RuntimeContext;

const DEFAULT_BODY: &str = "Please find the demand note details below.";

fn default_subject(summary: &DraftSummary) -> String {
    format!("Demand Note {} - {}", summary.dn_number, summary.section_name)
}

/// Execute the draft command
pub(crate) async fn execute(args: &DraftArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let row = ctx
        .fetch(&ctx.dn_master_schema(), &args.dn_number, &[])
        .await?
        .with_context(|| format!("No DN master row for '{}'", args.dn_number.trim()))?;

    let email = &ctx.config.email;
    let summary = DraftSummary::from_master_row(&row, email);
    let subject = args
        .subject
        .clone()
        .unwrap_or_else(|| default_subject(&summary));
    let body = args.body.as_deref().unwrap_or(DEFAULT_BODY);

    let to = args.to.as_deref().or(email.to.as_deref()).unwrap_or("");
    let cc = args.cc.as_deref().or(email.cc.as_deref()).unwrap_or("");
    let draft = EmailDraft::compose(&subject, body, &summary).with_recipients(to, cc)?;

    if !args.send {
        return print_json(&draft.to_graph_payload());
    }

    let token = std::env::var(&args.token_env)
        .with_context(|| format!("{} is not set; it must hold a mail access token", args.token_env))?;
    let created = MailClient::new(&email.messages_url)
        .create_draft(&token, &draft)
        .await
        .context("Failed to create email draft")?;
    match created.get("id").and_then(|id| id.as_str()) {
        Some(id) => println!("Created draft {}", id),
        None => println!("Created draft '{}'", draft.subject),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_subject() {
        let summary = DraftSummary {
            dn_number: "DN-42".to_string(),
            section_length: "120".to_string(),
            execution_partner: String::new(),
            route_name: String::new(),
            section_name: "MUM-0001".to_string(),
            project_name: String::new(),
        };
        assert_eq!(default_subject(&summary), "Demand Note DN-42 - MUM-0001");
    }
}
