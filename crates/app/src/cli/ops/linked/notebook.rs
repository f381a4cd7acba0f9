use clap::Args;
use uuid::Uuid;

use super::{lookup, LinkedOpError, Session};

/// Show the notebook a linked notebook points at
#[derive(Args, Debug, Clone)]
pub struct ShowNotebook {
    #[command(flatten)]
    pub session: Session,

    /// Guid of the linked notebook in your catalog
    pub guid: Uuid,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for ShowNotebook {
    type Error = LinkedOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let router = self.session.router(ctx)?;
        let linked = lookup(&router, self.guid).await?;
        let notebook = router.corresponding_notebook(&linked).await?;

        let mut lines = vec![format!(
            "{} (guid: {})",
            notebook.name,
            notebook
                .guid
                .map(|guid| guid.to_string())
                .unwrap_or_else(|| "-".to_string())
        )];
        match notebook.restrictions {
            Some(restrictions) => {
                lines.push(format!("- create notes: {}", !restrictions.no_create_notes));
                lines.push(format!("- update notes: {}", !restrictions.no_update_notes));
                lines.push(format!("- expunge notes: {}", !restrictions.no_expunge_notes));
                lines.push(format!("- share notes: {}", !restrictions.no_share_notes));
            }
            None => lines.push("- no restrictions".to_string()),
        }
        Ok(lines.join("\n"))
    }
}
