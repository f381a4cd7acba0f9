use clap::Args;
use uuid::Uuid;

use super::{lookup, LinkedOpError, Session};

/// Stop sharing a linked notebook and remove it from your catalog
#[derive(Args, Debug, Clone)]
pub struct Delete {
    #[command(flatten)]
    pub session: Session,

    /// Guid of the linked notebook in your catalog
    pub guid: Uuid,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Delete {
    type Error = LinkedOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let router = self.session.router(ctx)?;
        let linked = lookup(&router, self.guid).await?;
        let removed = router.delete_linked_notebook(&linked).await?;

        Ok(format!(
            "Deleted linked notebook {} ({} catalog entries removed)",
            linked.share_name, removed
        ))
    }
}
