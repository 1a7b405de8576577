use serde::{Deserialize, Serialize};

/// An action requested by a bot, the wire-level decision contract.
///
/// `Raise.amount` is the total committed for the current street, not an
/// increment, and the committed total resets at every street boundary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (no bet, only valid if no bet to call)
    Check,
    /// Call the current street bet
    Call,
    /// Raise so that the street total committed becomes `amount`
    Raise { amount: u32 },
}

/// The effective action after validation, with resolved chip movements.
/// This is what hand histories record: a call for less than the bet shows
/// up as an all-in call, a clamped raise shows its real street total.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppliedAction {
    Fold,
    Check,
    Call { amount: u32, all_in: bool },
    Raise { to: u32, amount: u32, all_in: bool },
}
