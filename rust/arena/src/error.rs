use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("duplicate bot id: {id}")]
    DuplicateBot { id: String },
    #[error("not enough bots for a seating: have {have}, need at least 2")]
    NotEnoughBots { have: usize },
}
