pub mod gen_ids;
pub mod git_extract;
pub mod jobs;
pub mod sample_sessions;
pub mod stats;
pub mod wiki_fetch;
