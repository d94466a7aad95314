// Candidate/job matching engine.
// Pure functions over already-loaded rows: decode → skills match → sub-scores → rank.
// Nothing here touches the database or the network.

pub mod handlers;
pub mod parse;
pub mod ranking;
pub mod scoring;
pub mod skills;
