use clap::Args;

use common::auth::{AuthError, AuthGrant, CallbackResponse};

#[derive(Args, Debug, Clone)]
pub struct Callback {
    /// The query string the OAuth provider appended to the callback URL
    pub response: String,

    /// Also list every field of the response as decoded
    #[arg(long)]
    pub fields: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CallbackOpError {
    #[error("invalid callback response: {0}")]
    Auth(#[from] AuthError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Callback {
    type Error = CallbackOpError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let grant = AuthGrant::from_response(&self.response)?;

        let mut lines = vec![
            format!("User id: {}", grant.user_id()),
            format!("Note store: {}", grant.note_store_url()),
            format!(
                "Web API prefix: {}",
                grant
                    .web_api_url_prefix()
                    .map(|url| url.to_string())
                    .unwrap_or_else(|| "(none)".to_string())
            ),
        ];

        if self.fields {
            // Token values stay out of the listing
            for (name, value) in CallbackResponse::new(&self.response).fields() {
                if name.starts_with("oauth_token") {
                    lines.push(format!("  {} = <redacted>", name));
                } else {
                    lines.push(format!("  {} = {}", name, value));
                }
            }
        }

        Ok(lines.join("\n"))
    }
}
