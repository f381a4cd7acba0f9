use clap::Args;

use super::{describe, LinkedOpError, Session};

#[derive(Args, Debug, Clone)]
pub struct List {
    #[command(flatten)]
    pub session: Session,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for List {
    type Error = LinkedOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let router = self.session.router(ctx)?;
        let catalog = router.list_linked_notebooks().await?;

        if catalog.is_empty() {
            Ok("No linked notebooks found".to_string())
        } else {
            Ok(catalog.iter().map(describe).collect::<Vec<_>>().join("\n"))
        }
    }
}
