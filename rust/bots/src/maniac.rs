//! A seeded aggressive strategy that raises most of the time it acts.
//! Exists to stress the betting engine's raise and side-pot paths during
//! long unattended runs; it is not trying to win chips.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use felt_engine::action::BotAction;
use felt_engine::view::TableView;

use crate::Bot;

#[derive(Debug)]
pub struct Maniac {
    rng: Mutex<StdRng>,
}

impl Maniac {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn roll(&self) -> f32 {
        match self.rng.lock() {
            Ok(mut rng) => rng.random::<f32>(),
            // A poisoned lock only means another decision panicked; playing
            // on with a fixed roll keeps this strategy harmless.
            Err(_) => 0.5,
        }
    }
}

impl Bot for Maniac {
    fn act(&self, view: &TableView) -> BotAction {
        let roll = self.roll();
        let all_in_to = view.committed + view.stack;
        // Raise two times in three when a legal raise exists.
        if roll < 0.67 && all_in_to > view.min_raise_to {
            let target = view.min_raise_to + view.big_blind;
            return BotAction::Raise {
                amount: target.min(all_in_to),
            };
        }
        if view.to_call == 0 {
            BotAction::Check
        } else if roll < 0.9 {
            BotAction::Call
        } else {
            BotAction::Fold
        }
    }

    fn name(&self) -> &str {
        "maniac"
    }
}
