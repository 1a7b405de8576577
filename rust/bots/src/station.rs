//! The calling station: checks when free, calls everything else.
//! Useful as rotation filler and as a worst-case passive opponent in tests.

use felt_engine::action::BotAction;
use felt_engine::view::TableView;

use crate::Bot;

#[derive(Debug, Clone, Default)]
pub struct CallingStation;

impl CallingStation {
    pub fn new() -> Self {
        Self
    }
}

impl Bot for CallingStation {
    fn act(&self, view: &TableView) -> BotAction {
        if view.to_call == 0 {
            BotAction::Check
        } else {
            BotAction::Call
        }
    }

    fn name(&self) -> &str {
        "station"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_engine::betting::{HandConfig, HandEngine};

    #[test]
    fn station_always_reaches_showdown_heads_up() {
        let station = CallingStation::new();
        let mut engine = HandEngine::new(&[900, 900], 0, HandConfig::default(), 55).unwrap();
        while let Some(seat) = engine.next_actor() {
            let view = engine.view_for(seat).unwrap();
            engine.apply(seat, station.act(&view)).unwrap();
        }
        assert!(engine.outcome().unwrap().showdown.is_some());
        assert_eq!(engine.board().len(), 5);
    }
}
