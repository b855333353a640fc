//! Listing path — scraped job-offer text in, one structured `JobListing` out.
//!
//! The prompt asks for bare JSON, but replies are still passed through the
//! fence stripper before parsing. Absent or blank fields get the same
//! placeholders the prompt asks the model to use.

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::normalizer::strip_json_fences;
use crate::prompt_builder::prompts::{
    LISTING_EXTRACTION_PROMPT_TEMPLATE, LISTING_NOT_AVAILABLE, SALARY_NOT_SPECIFIED,
};

/// A single job offer, as produced by the extraction prompt and consumed by
/// the matcher. Scraped records with gaps deserialize with placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default = "not_available")]
    pub title: String,
    #[serde(default = "not_available")]
    pub company: String,
    #[serde(default = "not_available")]
    pub description: String,
    #[serde(default = "not_available")]
    pub location: String,
    #[serde(default = "salary_not_specified")]
    pub salary: String,
    #[serde(default = "not_available")]
    pub date_posted: String,
    #[serde(default = "not_available")]
    pub job_type: String,
    /// Short skill tags, e.g. `["Python", "SQL", "testing"]`.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Offer URL. Set by the scraper, never by the model.
    #[serde(default = "not_available")]
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct PartialListing {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    date_posted: Option<String>,
    #[serde(default)]
    job_type: Option<String>,
    #[serde(default)]
    requirements: Option<Vec<String>>,
    #[serde(default)]
    url: Option<String>,
}

fn not_available() -> String {
    LISTING_NOT_AVAILABLE.to_string()
}

fn salary_not_specified() -> String {
    SALARY_NOT_SPECIFIED.to_string()
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

/// Renders the extraction prompt around the raw offer text.
pub fn render_listing_prompt(job_text: &str) -> String {
    LISTING_EXTRACTION_PROMPT_TEMPLATE.replace("{job_text}", job_text)
}

/// Parses a model reply into a listing. Unlike the profile check, a reply
/// that is not a JSON object is a hard error: there is no listing to keep.
pub fn parse_listing(reply: &str) -> Result<JobListing, PipelineError> {
    let partial: PartialListing = serde_json::from_str(strip_json_fences(reply))
        .map_err(|e| PipelineError::UnparsableLlmOutput(e.to_string()))?;

    Ok(JobListing {
        title: or_placeholder(partial.title, LISTING_NOT_AVAILABLE),
        company: or_placeholder(partial.company, LISTING_NOT_AVAILABLE),
        description: or_placeholder(partial.description, LISTING_NOT_AVAILABLE),
        location: or_placeholder(partial.location, LISTING_NOT_AVAILABLE),
        salary: or_placeholder(partial.salary, SALARY_NOT_SPECIFIED),
        date_posted: or_placeholder(partial.date_posted, LISTING_NOT_AVAILABLE),
        job_type: or_placeholder(partial.job_type, LISTING_NOT_AVAILABLE),
        requirements: partial
            .requirements
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty() && r != LISTING_NOT_AVAILABLE)
            .collect(),
        url: or_placeholder(partial.url, LISTING_NOT_AVAILABLE),
    })
}
