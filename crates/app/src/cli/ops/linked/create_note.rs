use clap::Args;
use uuid::Uuid;

use common::types::Note;

use super::{lookup, LinkedOpError, Session};

#[derive(Args, Debug, Clone)]
pub struct CreateNote {
    #[command(flatten)]
    pub session: Session,

    /// Guid of the linked notebook in your catalog
    #[arg(long)]
    pub notebook: Uuid,

    #[arg(long)]
    pub title: String,

    /// Note body; left empty when omitted
    #[arg(long)]
    pub content: Option<String>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for CreateNote {
    type Error = LinkedOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let router = self.session.router(ctx)?;
        let linked = lookup(&router, self.notebook).await?;

        let mut note = Note::new(self.title.clone());
        if let Some(content) = &self.content {
            note = note.with_content(content.clone());
        }
        let created = router.create_note(note, &linked).await?;

        Ok(format!(
            "Created note {:?} in {} (guid: {})",
            created.title,
            linked.share_name,
            created
                .guid
                .map(|guid| guid.to_string())
                .unwrap_or_else(|| "-".to_string())
        ))
    }
}
