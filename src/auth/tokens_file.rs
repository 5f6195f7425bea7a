use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::config::tokens_path;

/// Token material persisted in the config dir so later runs can skip the
/// interactive consent flow. The refresh token lives in this plain local
/// file alongside the access token metadata.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TokensFile {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at_epoch: Option<i64>, // epoch seconds
}

pub fn save_tokens(tokens: &TokensFile) -> Result<()> {
    let p = tokens_path()?;
    let s = serde_json::to_string_pretty(tokens)?;
    fs::write(&p, s)?;
    Ok(())
}

/// Load tokens file if present
pub fn load_tokens() -> Result<Option<TokensFile>> {
    let p = tokens_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p)?;
    let tf: TokensFile = serde_json::from_str(&s)?;
    Ok(Some(tf))
}
