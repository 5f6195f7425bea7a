use anyhow::Result;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::{oauth, tokens_file};
use crate::auth::tokens_file::TokensFile;
use crate::config::Config;

/// Read-only access to message metadata and bodies.
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

#[derive(Clone)]
pub struct TokenManager {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

impl TokenManager {
    pub fn from_config(cfg: &Config) -> Self {
        let redirect_uri = cfg
            .redirect_uri
            .clone()
            .unwrap_or_else(|| "http://127.0.0.1:8080/callback".to_string());

        let client_secret = cfg
            .client_secret
            .clone()
            .or_else(|| std::env::var("OAUTH_CLIENT_SECRET").ok());

        Self {
            client_id: cfg.client_id.clone(),
            client_secret,
            redirect_uri,
        }
    }

    /// Returns a valid access token; refreshes/PKCE if needed.
    pub fn get_access_token(&self) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

        let cached = tokens_file::load_tokens()?.unwrap_or_default();

        // 1) cached & not expired
        if let (Some(at), Some(exp)) = (&cached.access_token, cached.expires_at_epoch)
            && now < exp
        {
            return Ok(at.clone());
        }

        // 2) refresh if possible
        if let Some(rt) = &cached.refresh_token {
            let t = oauth::refresh_access_token(&self.client_id, self.client_secret.as_deref(), rt)?;
            return self.persist(t, Some(rt.clone()), now);
        }

        // 3) otherwise PKCE
        let t = oauth::perform_pkce_flow(
            &self.client_id,
            self.client_secret.as_deref(),
            &self.redirect_uri,
            GMAIL_READONLY_SCOPE,
        )?;
        self.persist(t, None, now)
    }

    fn persist(
        &self,
        tokens: oauth::Tokens,
        previous_refresh: Option<String>,
        now: i64,
    ) -> Result<String> {
        let exp = tokens.expires_in.map(|s| now + s as i64).unwrap_or(now + 3500);
        // Google only hands out a refresh token on the first consent; keep
        // the old one when the response omits it.
        let refresh = tokens.refresh_token.or(previous_refresh);
        tokens_file::save_tokens(&TokensFile {
            access_token: Some(tokens.access_token.clone()),
            refresh_token: refresh,
            expires_at_epoch: Some(exp),
        })?;
        Ok(tokens.access_token)
    }
}
