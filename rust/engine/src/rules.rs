use crate::action::{AppliedAction, BotAction};
use crate::errors::ActionError;

/// Everything validation needs to know about the actor and the street.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext {
    /// Chips behind (not yet committed)
    pub stack: u32,
    /// Committed by this seat so far this street
    pub committed: u32,
    /// The street total every live seat must match
    pub street_bet: u32,
    /// Smallest legal street total for a full raise
    pub min_raise_to: u32,
}

impl ActionContext {
    pub fn to_call(&self) -> u32 {
        self.street_bet.saturating_sub(self.committed)
    }
}

/// Validates a requested [`BotAction`] against betting rules and stack size,
/// resolving it to the [`AppliedAction`] the engine executes.
///
/// Raise amounts are street totals. A raise below the legal minimum is
/// rejected unless it puts the raiser all-in, in which case it is clamped to
/// the stack; calling for more than the stack becomes an all-in call.
pub fn validate(ctx: ActionContext, action: BotAction) -> Result<AppliedAction, ActionError> {
    let to_call = ctx.to_call();
    match action {
        BotAction::Fold => Ok(AppliedAction::Fold),
        BotAction::Check => {
            if to_call == 0 {
                Ok(AppliedAction::Check)
            } else {
                Err(ActionError::CheckFacingBet {
                    street_bet: ctx.street_bet,
                })
            }
        }
        BotAction::Call => {
            if to_call == 0 {
                Ok(AppliedAction::Check)
            } else if ctx.stack <= to_call {
                Ok(AppliedAction::Call {
                    amount: ctx.stack,
                    all_in: true,
                })
            } else {
                Ok(AppliedAction::Call {
                    amount: to_call,
                    all_in: false,
                })
            }
        }
        BotAction::Raise { amount: to } => {
            let all_in_to = ctx.committed + ctx.stack;
            if all_in_to <= ctx.street_bet {
                // Cannot even match the bet: any raise attempt is an all-in call.
                return Ok(AppliedAction::Call {
                    amount: ctx.stack,
                    all_in: true,
                });
            }
            if to >= all_in_to {
                // Going all-in for less than the requested total is legal
                // even below the minimum raise; clamp to the stack.
                return Ok(AppliedAction::Raise {
                    to: all_in_to,
                    amount: ctx.stack,
                    all_in: true,
                });
            }
            if to <= ctx.street_bet {
                return Err(ActionError::RaiseNotAboveBet {
                    to,
                    street_bet: ctx.street_bet,
                });
            }
            if to < ctx.min_raise_to {
                return Err(ActionError::RaiseBelowMinimum {
                    to,
                    minimum: ctx.min_raise_to,
                });
            }
            Ok(AppliedAction::Raise {
                to,
                amount: to - ctx.committed,
                all_in: false,
            })
        }
    }
}
