use clap::Args;
use uuid::Uuid;

use super::{lookup, LinkedOpError, Session};

/// Check whether you can create notes in a linked notebook
#[derive(Args, Debug, Clone)]
pub struct Writable {
    #[command(flatten)]
    pub session: Session,

    /// Guid of the linked notebook in your catalog
    pub guid: Uuid,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Writable {
    type Error = LinkedOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let router = self.session.router(ctx)?;
        let linked = lookup(&router, self.guid).await?;

        if router.is_writable(&linked).await? {
            Ok(format!("{} is writable", linked.share_name))
        } else {
            Ok(format!("{} is read only", linked.share_name))
        }
    }
}
