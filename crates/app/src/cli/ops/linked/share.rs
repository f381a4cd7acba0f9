use clap::Args;

use common::types::Notebook;

use super::{describe, LinkedOpError, Session};

/// Create a notebook on the shared shard and link it into your account
#[derive(Args, Debug, Clone)]
pub struct Share {
    #[command(flatten)]
    pub session: Session,

    /// Name of the notebook to create
    #[arg(long)]
    pub name: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Share {
    type Error = LinkedOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let router = self.session.router(ctx)?;
        let linked = router
            .create_linked_notebook(Notebook::new(self.name.clone()))
            .await?;

        Ok(format!("Linked {}", describe(&linked)))
    }
}
