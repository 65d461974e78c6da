pub(crate) mod health;
pub(crate) mod players;
pub(crate) mod schedule;
pub(crate) mod scores;
