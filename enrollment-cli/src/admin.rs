use anyhow::Result;
use enrollment_flow::AdminPanel;
use std::io::{BufRead, Write};

use crate::cli::AdminCmd;
use crate::prompt::Prompt;

pub async fn run<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    panel: &AdminPanel,
    action: AdminCmd,
) -> Result<()> {
    match action {
        AdminCmd::List { search } => {
            let submissions = panel.list(search.as_deref()).await?;
            if submissions.is_empty() {
                prompt.say("No proposals found.")?;
            }
            for s in submissions {
                let plan = s.data.plan.map(|p| p.label()).unwrap_or("-");
                prompt.say(format!(
                    "{:<9}  {}  {:<9}  {:<30}  {:<14}  {}",
                    s.id,
                    s.created_at.format("%d/%m/%Y"),
                    s.status,
                    s.data.personal.full_name,
                    s.data.personal.cpf,
                    plan
                ))?;
            }
        }
        AdminCmd::Stats => {
            let stats = panel.stats().await?;
            prompt.say(format!("Total:    {}", stats.total))?;
            prompt.say(format!("Pending:  {}", stats.pending))?;
            prompt.say(format!("Approved: {}", stats.approved))?;
            prompt.say(format!("Rejected: {}", stats.rejected))?;
        }
        AdminCmd::Show { id } => {
            prompt.say(panel.print(&id).await?)?;
        }
        AdminCmd::Approve { id } => {
            let s = panel.approve(&id).await?;
            prompt.say(format!("{} is now {}", s.id, s.status))?;
        }
        AdminCmd::Reject { id } => {
            let s = panel.reject(&id).await?;
            prompt.say(format!("{} is now {}", s.id, s.status))?;
        }
        AdminCmd::Delete { id, yes } => {
            if !yes && !prompt.confirm(&format!("Delete proposal {id}?"))? {
                prompt.say("Kept.")?;
                return Ok(());
            }
            panel.delete(&id).await?;
            prompt.say(format!("{id} deleted"))?;
        }
    }
    Ok(())
}
