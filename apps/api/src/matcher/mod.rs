//! Matcher — scores job listings against a user's skills and keeps the
//! strong ones.
//!
//! Score per listing:
//! 1. expand the user's skills through the synonym table,
//! 2. `similarity` = pluggable [`SimilarityScorer`] over expanded skills vs requirements,
//! 3. `overlap` = |user ∩ job| / max(1, |user|), case-insensitive,
//! 4. `score` = round4(0.7 × similarity + 0.3 × overlap).
//!
//! Listings without requirements are skipped. Matches at or above the
//! threshold are returned best first. The report's `matches` are the `data`
//! batch the job-match prompt path consumes.

pub mod handlers;

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::clock::{iso_timestamp, Clock};
use crate::errors::AppError;
use crate::prompt_builder::listing::JobListing;

/// Minimum combined score for a listing to count as a match.
pub const MATCH_THRESHOLD: f64 = 0.75;
const SIMILARITY_WEIGHT: f64 = 0.7;
const OVERLAP_WEIGHT: f64 = 0.3;

/// Skill → related terms added to the user's profile before scoring.
/// Keys match case-sensitively.
const SKILL_EXPANSIONS: &[(&str, &[&str])] = &[
    ("Python", &["backend", "APIs", "ORM", "Django", "Flask"]),
    ("FastAPI", &["REST", "web development", "API"]),
    ("SQL", &["databases", "PostgreSQL", "MySQL", "queries"]),
    ("AWS", &["cloud", "infrastructure", "S3", "Lambda"]),
    ("React", &["frontend", "UI", "JavaScript", "JSX"]),
    ("Docker", &["containers", "DevOps", "deployment"]),
    ("Remote", &["teletrabajo", "distributed", "work from home"]),
    ("JavaScript", &["JS", "frontend", "backend", "Node.js"]),
    ("Git", &["version control", "GitHub", "GitLab"]),
];

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedJob {
    pub title: String,
    pub company: String,
    pub url: String,
    pub score: f64,
    pub skills_match: Vec<String>,
    pub description: String,
    pub requirements: Vec<String>,
    pub location: String,
    pub job_type: String,
    pub date_posted: String,
    pub salary: String,
}

/// Per-user match result, stored by the matcher and read back by the job path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub user_id: String,
    pub processed_at: String,
    pub total_matches: usize,
    pub user_skills: Vec<String>,
    pub matches: Vec<MatchedJob>,
}

impl MatchReport {
    /// Job-match item for this report: `data` holds the matches and the key
    /// resolves back to `user_id`.
    pub fn to_job_item(&self) -> Value {
        json!({
            "data": self.matches,
            "Key": format!("results/{}.json", self.user_id),
        })
    }
}

/// Case-insensitive skill overlap between a user and a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    pub ratio: f64,
    /// Shared skills, lowercased and sorted.
    pub matched: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Similarity backends
// ────────────────────────────────────────────────────────────────────────────

/// Semantic half of the score. Implement this to plug in an embedding model
/// without touching the scoring or the handler.
///
/// Carried in `AppState` as `Arc<dyn SimilarityScorer>`.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    /// Similarity in `[0, 1]` between the (expanded) user skills and a
    /// listing's requirements.
    async fn similarity(&self, user_skills: &[String], job_skills: &[String]) -> Result<f64, AppError>;
}

/// Cosine similarity over lowercased word counts. Deterministic, no model.
/// Stricter than an embedding model: synonyms only help through the
/// expansion table.
pub struct LexicalSimilarity;

#[async_trait]
impl SimilarityScorer for LexicalSimilarity {
    async fn similarity(&self, user_skills: &[String], job_skills: &[String]) -> Result<f64, AppError> {
        Ok(lexical_cosine(user_skills, job_skills))
    }
}

fn term_counts(skills: &[String]) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for term in skills.iter().flat_map(|s| s.split_whitespace()) {
        *counts.entry(term.to_lowercase()).or_insert(0.0) += 1.0;
    }
    counts
}

fn lexical_cosine(a: &[String], b: &[String]) -> f64 {
    let a = term_counts(a);
    let b = term_counts(b);
    let dot: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// The user's skills followed by their synonyms, without duplicates.
pub fn expand_user_skills(skills: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    let related = skills.iter().flat_map(|skill| {
        SKILL_EXPANSIONS
            .iter()
            .find(|(key, _)| *key == skill.as_str())
            .map(|(_, terms)| *terms)
            .unwrap_or_default()
            .iter()
            .copied()
    });
    for term in skills.iter().map(String::as_str).chain(related) {
        if !expanded.iter().any(|e| e == term) {
            expanded.push(term.to_string());
        }
    }
    expanded
}

pub fn keyword_overlap(user_skills: &[String], job_skills: &[String]) -> Overlap {
    let user: BTreeSet<String> = user_skills.iter().map(|s| s.to_lowercase()).collect();
    let job: BTreeSet<String> = job_skills.iter().map(|s| s.to_lowercase()).collect();
    let matched: Vec<String> = user.intersection(&job).cloned().collect();
    Overlap {
        ratio: matched.len() as f64 / user.len().max(1) as f64,
        matched,
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Combined score for one listing, or `None` when it lists no requirements.
pub async fn score_listing(
    expanded_skills: &[String],
    listing: &JobListing,
    scorer: &dyn SimilarityScorer,
) -> Result<Option<(f64, Overlap)>, AppError> {
    if listing.requirements.is_empty() {
        return Ok(None);
    }
    let similarity = scorer
        .similarity(expanded_skills, &listing.requirements)
        .await?;
    let overlap = keyword_overlap(expanded_skills, &listing.requirements);
    let score = round4(SIMILARITY_WEIGHT * similarity + OVERLAP_WEIGHT * overlap.ratio);
    Ok(Some((score, overlap)))
}

/// Scores every listing for one user and builds the report.
pub async fn match_jobs(
    user_id: &str,
    user_skills: &[String],
    listings: &[JobListing],
    threshold: f64,
    scorer: &dyn SimilarityScorer,
    clock: &dyn Clock,
) -> Result<MatchReport, AppError> {
    let expanded = expand_user_skills(user_skills);

    let mut matches = Vec::new();
    for listing in listings {
        let Some((score, overlap)) = score_listing(&expanded, listing, scorer).await? else {
            continue;
        };
        if score < threshold {
            continue;
        }
        matches.push(MatchedJob {
            title: listing.title.clone(),
            company: listing.company.clone(),
            url: listing.url.clone(),
            score,
            skills_match: overlap.matched,
            description: listing.description.clone(),
            requirements: listing.requirements.clone(),
            location: listing.location.clone(),
            job_type: listing.job_type.clone(),
            date_posted: listing.date_posted.clone(),
            salary: listing.salary.clone(),
        });
    }
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    info!(
        "User {user_id}: {} of {} listings matched",
        matches.len(),
        listings.len()
    );

    Ok(MatchReport {
        user_id: user_id.to_string(),
        processed_at: iso_timestamp(clock.now()),
        total_matches: matches.len(),
        user_skills: user_skills.to_vec(),
        matches,
    })
}
