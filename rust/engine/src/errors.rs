use thiserror::Error;

/// A bot-attributable illegal action. Non-fatal: the caller substitutes the
/// safe default action and records the violation against the bot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("seat {seat} acted out of turn")]
    OutOfTurn { seat: usize },
    #[error("cannot check while facing a bet of {street_bet}")]
    CheckFacingBet { street_bet: u32 },
    #[error("raise to {to} is below the minimum of {minimum}")]
    RaiseBelowMinimum { to: u32, minimum: u32 },
    #[error("raise to {to} does not exceed the current bet of {street_bet}")]
    RaiseNotAboveBet { to: u32, street_bet: u32 },
    #[error("no betting round in progress")]
    NoBettingRound,
}

/// An internal invariant violation. Fatal to the current hand only: the hand
/// is aborted, logged and excluded from results; the process and the
/// scheduler keep running.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineFault {
    #[error("chip conservation violated: expected {expected}, found {found}")]
    ChipImbalance { expected: u32, found: u32 },
    #[error("deck exhausted while dealing")]
    DeckExhausted,
    #[error("a hand needs at least two seats, got {seats}")]
    TooFewSeats { seats: usize },
    #[error("seat {seat} has a zero starting stack")]
    ZeroStartingStack { seat: usize },
    #[error("seat {seat} cannot commit {amount} with stack {stack}")]
    OverCommit { seat: usize, amount: u32, stack: u32 },
    #[error("no live seats remain")]
    NoLiveSeats,
    #[error(transparent)]
    Eval(#[from] crate::hand::EvalError),
}

/// Error from applying an action to a hand in progress.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error(transparent)]
    Illegal(#[from] ActionError),
    #[error(transparent)]
    Fault(#[from] EngineFault),
}
