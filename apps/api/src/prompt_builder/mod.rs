// Prompt builders: the chat path (profile extraction), the job-match path
// (notification composition) and the listing path (scraped offer text to a
// structured listing). All are pure apart from the clock.

pub mod chat;
pub mod handlers;
pub mod jobs;
pub mod listing;
pub mod prompts;
