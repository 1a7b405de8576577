use serde::{Deserialize, Serialize};

use crate::action::{AppliedAction, BotAction};
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::{ActionError, ApplyError, EngineFault};
use crate::hand::{EvalCache, HandStrength};
use crate::pot::{layer_pots, split_award, PotLayer};
use crate::record::{ActionRecord, HandRecord, ShowdownSeat, Street};
use crate::rules::{validate, ActionContext};
use crate::view::{SeatPublic, TableView};

/// Hand lifecycle phases. A hand always moves forward through this sequence;
/// folding down to one player short-circuits straight to `Complete`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum HandPhase {
    Deal,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl HandPhase {
    pub fn street(self) -> Option<Street> {
        match self {
            HandPhase::Preflop => Some(Street::Preflop),
            HandPhase::Flop => Some(Street::Flop),
            HandPhase::Turn => Some(Street::Turn),
            HandPhase::River => Some(Street::River),
            _ => None,
        }
    }
}

/// Blind sizes for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandConfig {
    pub small_blind: u32,
    pub big_blind: u32,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            small_blind: 50,
            big_blind: 100,
        }
    }
}

/// Per-seat state for the duration of one hand.
#[derive(Debug, Clone)]
pub struct SeatState {
    stack: u32,
    start_stack: u32,
    hole: [Card; 2],
    street_committed: u32,
    hand_committed: u32,
    folded: bool,
    all_in: bool,
}

impl SeatState {
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn start_stack(&self) -> u32 {
        self.start_stack
    }
    pub fn hole(&self) -> [Card; 2] {
        self.hole
    }
    pub fn street_committed(&self) -> u32 {
        self.street_committed
    }
    pub fn hand_committed(&self) -> u32 {
        self.hand_committed
    }
    pub fn folded(&self) -> bool {
        self.folded
    }
    pub fn all_in(&self) -> bool {
        self.all_in
    }
}

/// Final accounting for a completed hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandOutcome {
    pub payouts: Vec<u32>,
    pub deltas: Vec<i64>,
    pub pots: Vec<PotLayer>,
    pub showdown: Option<Vec<ShowdownSeat>>,
}

/// The betting state machine for a single hand.
///
/// Step-driven: callers poll [`next_actor`](Self::next_actor), fetch a
/// [`TableView`] for that seat, obtain a decision from whoever is playing the
/// seat, and feed it back through [`apply`](Self::apply). Street transitions,
/// all-in runouts, side-pot layering and showdown settlement happen inside
/// `apply`, each through one named transition handler. The engine never calls
/// out to bot code itself; that boundary belongs to the invoker.
///
/// Chip conservation is re-checked after every mutation; a violation is an
/// [`EngineFault`] that poisons only this hand.
#[derive(Debug)]
pub struct HandEngine {
    cfg: HandConfig,
    seats: Vec<SeatState>,
    deck: Deck,
    button: usize,
    board: Vec<Card>,
    phase: HandPhase,
    street_bet: u32,
    min_raise_delta: u32,
    pending: Vec<bool>,
    next: Option<usize>,
    actions: Vec<ActionRecord>,
    start_total: u32,
    evals: EvalCache,
    outcome: Option<HandOutcome>,
}

impl HandEngine {
    /// Deals a new hand: seeded shuffle, hole cards, blinds, first to act.
    pub fn new(
        stacks: &[u32],
        button: usize,
        cfg: HandConfig,
        seed: u64,
    ) -> Result<Self, EngineFault> {
        let n = stacks.len();
        if n < 2 {
            return Err(EngineFault::TooFewSeats { seats: n });
        }
        for (seat, &stack) in stacks.iter().enumerate() {
            if stack == 0 {
                return Err(EngineFault::ZeroStartingStack { seat });
            }
        }
        let button = button % n;
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();

        // Two cards to each seat, one at a time, starting left of the button.
        let mut dealt: Vec<Vec<Card>> = vec![Vec::with_capacity(2); n];
        for _ in 0..2 {
            for k in 0..n {
                let seat = (button + 1 + k) % n;
                dealt[seat].push(deck.deal_card().ok_or(EngineFault::DeckExhausted)?);
            }
        }

        let seats: Vec<SeatState> = stacks
            .iter()
            .zip(dealt)
            .map(|(&stack, hole)| SeatState {
                stack,
                start_stack: stack,
                hole: [hole[0], hole[1]],
                street_committed: 0,
                hand_committed: 0,
                folded: false,
                all_in: false,
            })
            .collect();

        let start_total = stacks.iter().sum();
        let mut engine = Self {
            cfg,
            seats,
            deck,
            button,
            board: Vec::with_capacity(5),
            phase: HandPhase::Deal,
            street_bet: 0,
            min_raise_delta: cfg.big_blind,
            pending: vec![false; n],
            next: None,
            actions: Vec::new(),
            start_total,
            evals: EvalCache::new(),
            outcome: None,
        };

        engine.post_blinds()?;
        engine.phase = HandPhase::Preflop;
        engine.street_bet = cfg.big_blind;
        engine.reset_pending();
        let first = if n == 2 { button } else { (button + 3) % n };
        engine.next = engine.next_pending_from(first);
        engine.check_conservation()?;
        engine.maybe_advance()?;
        Ok(engine)
    }

    /// Heads-up the button posts the small blind; multiway the blinds sit
    /// left of the button.
    fn post_blinds(&mut self) -> Result<(), EngineFault> {
        let n = self.seats.len();
        let (sb_seat, bb_seat) = if n == 2 {
            (self.button, (self.button + 1) % n)
        } else {
            ((self.button + 1) % n, (self.button + 2) % n)
        };
        let sb = self.cfg.small_blind.min(self.seats[sb_seat].stack);
        self.commit(sb_seat, sb)?;
        let bb = self.cfg.big_blind.min(self.seats[bb_seat].stack);
        self.commit(bb_seat, bb)?;
        Ok(())
    }

    pub fn phase(&self) -> HandPhase {
        self.phase
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn button(&self) -> usize {
        self.button
    }
    pub fn seed(&self) -> u64 {
        self.deck.seed()
    }
    pub fn seat(&self, seat: usize) -> &SeatState {
        &self.seats[seat]
    }
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }
    pub fn outcome(&self) -> Option<&HandOutcome> {
        self.outcome.as_ref()
    }

    /// All chips in the middle, layered or not.
    pub fn pot_total(&self) -> u32 {
        self.seats.iter().map(|s| s.hand_committed).sum()
    }

    pub fn street_bet(&self) -> u32 {
        self.street_bet
    }

    pub fn to_call(&self, seat: usize) -> u32 {
        self.street_bet
            .saturating_sub(self.seats[seat].street_committed)
    }

    pub fn min_raise_to(&self) -> u32 {
        self.street_bet + self.min_raise_delta
    }

    /// The seat currently owed a decision, while a betting round is open.
    pub fn next_actor(&self) -> Option<usize> {
        self.phase.street()?;
        self.next
    }

    /// The safe default for a seat: fold facing a bet, otherwise check.
    pub fn fallback_action(&self, seat: usize) -> BotAction {
        if self.to_call(seat) > 0 {
            BotAction::Fold
        } else {
            BotAction::Check
        }
    }

    /// Player-visible snapshot for the given seat, while betting is open.
    pub fn view_for(&self, seat: usize) -> Option<TableView> {
        let street = self.phase.street()?;
        let s = &self.seats[seat];
        Some(TableView {
            seat,
            hole: s.hole,
            street,
            board: self.board.clone(),
            button: self.button,
            pot_total: self.pot_total(),
            street_bet: self.street_bet,
            to_call: self.to_call(seat),
            min_raise_to: self.min_raise_to(),
            stack: s.stack,
            committed: s.street_committed,
            big_blind: self.cfg.big_blind,
            seats: self
                .seats
                .iter()
                .enumerate()
                .map(|(i, s)| SeatPublic {
                    seat: i,
                    stack: s.stack,
                    committed: s.street_committed,
                    folded: s.folded,
                    all_in: s.all_in,
                })
                .collect(),
            actions: self.actions.clone(),
        })
    }

    /// Validates and executes one action for the seat whose turn it is.
    pub fn apply(&mut self, seat: usize, action: BotAction) -> Result<AppliedAction, ApplyError> {
        self.apply_inner(seat, action, false)
    }

    /// Executes the safe default for the seat, marking the record as forced.
    /// Used after a bot times out, errors, or returns an illegal action.
    pub fn apply_fallback(&mut self, seat: usize) -> Result<AppliedAction, ApplyError> {
        let fallback = self.fallback_action(seat);
        self.apply_inner(seat, fallback, true)
    }

    fn apply_inner(
        &mut self,
        seat: usize,
        action: BotAction,
        forced: bool,
    ) -> Result<AppliedAction, ApplyError> {
        let street = self
            .phase
            .street()
            .ok_or(ActionError::NoBettingRound)
            .map_err(ApplyError::Illegal)?;
        if self.next != Some(seat) {
            return Err(ApplyError::Illegal(ActionError::OutOfTurn { seat }));
        }

        let s = &self.seats[seat];
        let ctx = ActionContext {
            stack: s.stack,
            committed: s.street_committed,
            street_bet: self.street_bet,
            min_raise_to: self.min_raise_to(),
        };
        let applied = validate(ctx, action).map_err(ApplyError::Illegal)?;

        match applied {
            AppliedAction::Fold => self.seats[seat].folded = true,
            AppliedAction::Check => {}
            AppliedAction::Call { amount, .. } => self.commit(seat, amount)?,
            AppliedAction::Raise { to, amount, .. } => {
                self.commit(seat, amount)?;
                let old_bet = self.street_bet;
                if to > old_bet {
                    // Only a full raise resets the minimum increment; a short
                    // all-in still reopens the action for everyone behind.
                    if to >= old_bet + self.min_raise_delta {
                        self.min_raise_delta = to - old_bet;
                    }
                    self.street_bet = to;
                    for i in 0..self.seats.len() {
                        let other = &self.seats[i];
                        if i != seat && !other.folded && !other.all_in {
                            self.pending[i] = true;
                        }
                    }
                }
            }
        }

        self.pending[seat] = false;
        self.actions.push(ActionRecord {
            seat,
            street,
            action: applied,
            forced,
        });
        self.check_conservation()?;
        self.next = self.next_pending_from((seat + 1) % self.seats.len());
        self.maybe_advance()?;
        Ok(applied)
    }

    fn commit(&mut self, seat: usize, amount: u32) -> Result<(), EngineFault> {
        let s = &mut self.seats[seat];
        if amount > s.stack {
            return Err(EngineFault::OverCommit {
                seat,
                amount,
                stack: s.stack,
            });
        }
        s.stack -= amount;
        s.street_committed += amount;
        s.hand_committed += amount;
        if s.stack == 0 {
            s.all_in = true;
        }
        Ok(())
    }

    fn live_count(&self) -> usize {
        self.seats.iter().filter(|s| !s.folded).count()
    }

    fn voluntary_count(&self) -> usize {
        self.seats.iter().filter(|s| !s.folded && !s.all_in).count()
    }

    /// Seats owing a decision on the current street. With fewer than two
    /// seats capable of voluntary action, only an unmatched bet keeps a seat
    /// pending; otherwise every voluntary seat gets (at least) its option.
    fn reset_pending(&mut self) {
        let voluntary = self.voluntary_count();
        for i in 0..self.seats.len() {
            let s = &self.seats[i];
            self.pending[i] = !s.folded
                && !s.all_in
                && (voluntary >= 2 || s.street_committed < self.street_bet);
        }
    }

    fn next_pending_from(&self, start: usize) -> Option<usize> {
        let n = self.seats.len();
        (0..n).map(|k| (start + k) % n).find(|&i| self.pending[i])
    }

    /// Drives the hand forward after each mutation: settles fold-outs,
    /// closes finished betting rounds, deals runouts, runs the showdown.
    fn maybe_advance(&mut self) -> Result<(), EngineFault> {
        loop {
            if self.phase == HandPhase::Complete {
                return Ok(());
            }
            if self.live_count() == 1 {
                return self.settle_uncontested();
            }
            if self.pending.iter().any(|&p| p) {
                return Ok(());
            }
            match self.phase {
                HandPhase::Preflop => self.open_street(HandPhase::Flop)?,
                HandPhase::Flop => self.open_street(HandPhase::Turn)?,
                HandPhase::Turn => self.open_street(HandPhase::River)?,
                HandPhase::River => return self.settle_showdown(),
                _ => return Ok(()),
            }
        }
    }

    /// Deals the next street's board card(s) and resets per-street state.
    /// Per-hand contribution totals are kept; only street totals reset.
    fn open_street(&mut self, phase: HandPhase) -> Result<(), EngineFault> {
        let count = match phase {
            HandPhase::Flop => 3,
            HandPhase::Turn | HandPhase::River => 1,
            _ => 0,
        };
        self.deck.burn_card();
        for _ in 0..count {
            self.board
                .push(self.deck.deal_card().ok_or(EngineFault::DeckExhausted)?);
        }
        self.phase = phase;
        self.street_bet = 0;
        self.min_raise_delta = self.cfg.big_blind;
        for s in &mut self.seats {
            s.street_committed = 0;
        }
        self.reset_pending();
        self.next = self.next_pending_from((self.button + 1) % self.seats.len());
        Ok(())
    }

    /// Everyone else folded: the pot goes to the last seat standing without
    /// dealing further board cards or showing hands.
    fn settle_uncontested(&mut self) -> Result<(), EngineFault> {
        let winner = self
            .seats
            .iter()
            .position(|s| !s.folded)
            .ok_or(EngineFault::NoLiveSeats)?;
        let contributions: Vec<u32> = self.seats.iter().map(|s| s.hand_committed).collect();
        let folded: Vec<bool> = self.seats.iter().map(|s| s.folded).collect();
        let pots = layer_pots(&contributions, &folded);
        let total: u32 = contributions.iter().sum();
        self.seats[winner].stack += total;
        let mut payouts = vec![0u32; self.seats.len()];
        payouts[winner] = total;
        self.finish(payouts, pots, None)
    }

    /// Evaluates every live hand and pays each pot layer to its best
    /// eligible holding, smallest layer first. Ties split evenly; odd chips
    /// go to the winners closest clockwise from the button.
    fn settle_showdown(&mut self) -> Result<(), EngineFault> {
        self.phase = HandPhase::Showdown;
        let n = self.seats.len();
        let mut strengths: Vec<Option<HandStrength>> = vec![None; n];
        for i in 0..n {
            if self.seats[i].folded {
                continue;
            }
            let mut seven = vec![self.seats[i].hole[0], self.seats[i].hole[1]];
            seven.extend_from_slice(&self.board);
            strengths[i] = Some(self.evals.best_five(&seven)?);
        }

        let contributions: Vec<u32> = self.seats.iter().map(|s| s.hand_committed).collect();
        let folded: Vec<bool> = self.seats.iter().map(|s| s.folded).collect();
        let pots = layer_pots(&contributions, &folded);

        let mut payouts = vec![0u32; n];
        for layer in &pots {
            let best = layer
                .eligible
                .iter()
                .filter_map(|&i| strengths[i])
                .max()
                .ok_or(EngineFault::NoLiveSeats)?;
            let winners: Vec<usize> = layer
                .eligible
                .iter()
                .copied()
                .filter(|&i| strengths[i] == Some(best))
                .collect();
            for (seat, amount) in split_award(layer.amount, &winners, self.button, n) {
                payouts[seat] += amount;
                self.seats[seat].stack += amount;
            }
        }

        let showdown: Vec<ShowdownSeat> = (0..n)
            .filter_map(|i| {
                strengths[i].map(|strength| ShowdownSeat {
                    seat: i,
                    hole: self.seats[i].hole,
                    strength,
                })
            })
            .collect();
        self.finish(payouts, pots, Some(showdown))
    }

    fn finish(
        &mut self,
        payouts: Vec<u32>,
        pots: Vec<PotLayer>,
        showdown: Option<Vec<ShowdownSeat>>,
    ) -> Result<(), EngineFault> {
        let found: u32 = self.seats.iter().map(|s| s.stack).sum();
        if found != self.start_total {
            return Err(EngineFault::ChipImbalance {
                expected: self.start_total,
                found,
            });
        }
        let deltas = self
            .seats
            .iter()
            .map(|s| i64::from(s.stack) - i64::from(s.start_stack))
            .collect();
        self.outcome = Some(HandOutcome {
            payouts,
            deltas,
            pots,
            showdown,
        });
        self.pending.iter_mut().for_each(|p| *p = false);
        self.next = None;
        self.phase = HandPhase::Complete;
        Ok(())
    }

    fn check_conservation(&self) -> Result<(), EngineFault> {
        let found: u32 = self
            .seats
            .iter()
            .map(|s| s.stack + s.hand_committed)
            .sum();
        if found != self.start_total {
            return Err(EngineFault::ChipImbalance {
                expected: self.start_total,
                found,
            });
        }
        Ok(())
    }

    /// Builds the replayable history record for this hand.
    pub fn record(&self, hand_id: &str) -> HandRecord {
        let (payouts, deltas, showdown) = match &self.outcome {
            Some(o) => (o.payouts.clone(), o.deltas.clone(), o.showdown.clone()),
            None => (Vec::new(), Vec::new(), None),
        };
        HandRecord {
            hand_id: hand_id.to_string(),
            seed: self.deck.seed(),
            button: self.button,
            small_blind: self.cfg.small_blind,
            big_blind: self.cfg.big_blind,
            starting_stacks: self.seats.iter().map(|s| s.start_stack).collect(),
            actions: self.actions.clone(),
            board: self.board.clone(),
            payouts,
            deltas,
            showdown,
            ts: None,
        }
    }
}
