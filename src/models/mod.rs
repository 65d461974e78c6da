pub mod fixture;
pub mod player;
pub mod response;
pub mod score_line;
pub mod side;
