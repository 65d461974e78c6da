pub mod live_scores;
pub mod matches;
pub mod score_lines;
pub mod score_parsing;
