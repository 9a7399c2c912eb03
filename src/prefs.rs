use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PROFILE_FILE_NAME: &str = "perfil.json";

/// User profile preferences, kept outside the relational store. Key names
/// match the preference keys the app has always used. Last write wins; a
/// single foreground caller is assumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_carrera: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_photo_uri: Option<String>,
    #[serde(default)]
    pub dark_mode: bool,
}

pub fn profile_path(workspace: &Path) -> PathBuf {
    workspace.join(PROFILE_FILE_NAME)
}

/// A missing or unreadable profile file falls back to defaults; nothing in
/// the profile is worth failing a screen over.
pub fn load_profile(workspace: &Path) -> Profile {
    let path = profile_path(workspace);
    match std::fs::read_to_string(&path) {
        Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
        Err(_) => Profile::default(),
    }
}

pub fn save_profile(workspace: &Path, profile: &Profile) -> anyhow::Result<()> {
    let path = profile_path(workspace);
    let text = serde_json::to_string_pretty(profile).context("failed to serialize profile")?;
    std::fs::write(&path, text)
        .with_context(|| format!("failed to write {}", path.to_string_lossy()))?;
    Ok(())
}
