use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::models::chat::ChatId;
use crate::prompt_builder::prompts::{DEFAULT_NAME_PREFIX, NOT_SPECIFIED};

/// Typed view of the profile JSON the extraction prompt asks for.
/// Only used to check a normalized reply; the stored payload stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub job_type: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
struct PartialProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    skills: Option<Vec<String>>,
    #[serde(default)]
    job_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// Parses cleaned LLM output as a profile, filling the same defaults the
/// extraction prompt asks the model to use.
pub fn parse_profile(json_content: &str, chat_id: &ChatId) -> Result<UserProfile, PipelineError> {
    let partial: PartialProfile = serde_json::from_str(json_content)
        .map_err(|e| PipelineError::UnparsableLlmOutput(e.to_string()))?;

    Ok(UserProfile {
        name: non_blank(partial.name).unwrap_or_else(|| format!("{DEFAULT_NAME_PREFIX}{chat_id}")),
        email: partial.email.unwrap_or_default(),
        skills: partial.skills.unwrap_or_default(),
        job_type: non_blank(partial.job_type).unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        location: non_blank(partial.location).unwrap_or_else(|| NOT_SPECIFIED.to_string()),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
