use felt_engine::action::BotAction;
use felt_engine::betting::{HandConfig, HandEngine, HandPhase};
use felt_engine::pot::{layer_pots, split_award};

#[test]
fn staircase_all_ins_build_layered_pots() {
    // Stacks 50/100/200/300 with the button at seat 3: the blinds go all-in
    // posting, seat 2 shoves, seat 3 raises over the top.
    let mut engine =
        HandEngine::new(&[50, 100, 200, 300], 3, HandConfig::default(), 99).unwrap();
    assert!(engine.seat(0).all_in()); // small blind for 50
    assert!(engine.seat(1).all_in()); // big blind for 100
    assert_eq!(engine.next_actor(), Some(2));
    engine.apply(2, BotAction::Raise { amount: 200 }).unwrap();
    engine.apply(3, BotAction::Raise { amount: 300 }).unwrap();
    // Nobody can act voluntarily: the board runs out to showdown.
    assert_eq!(engine.phase(), HandPhase::Complete);

    let outcome = engine.outcome().unwrap();
    assert_eq!(outcome.pots.len(), 4);
    assert_eq!(outcome.pots[0].amount, 200);
    assert_eq!(outcome.pots[0].eligible, vec![0, 1, 2, 3]);
    assert_eq!(outcome.pots[1].amount, 150);
    assert_eq!(outcome.pots[1].eligible, vec![1, 2, 3]);
    assert_eq!(outcome.pots[2].amount, 200);
    assert_eq!(outcome.pots[2].eligible, vec![2, 3]);
    assert_eq!(outcome.pots[3].amount, 100);
    assert_eq!(outcome.pots[3].eligible, vec![3]);

    // Every layer is paid to someone eligible for it, and nothing leaks.
    let pot_sum: u32 = outcome.pots.iter().map(|p| p.amount).sum();
    assert_eq!(pot_sum, 650);
    assert_eq!(outcome.payouts.iter().sum::<u32>(), 650);
    // Seat 3's uncalled 100 always comes back to seat 3.
    assert!(outcome.payouts[3] >= 100);
    assert_eq!(outcome.deltas.iter().sum::<i64>(), 0);
}

#[test]
fn layering_is_pure_arithmetic_on_contributions() {
    let layers = layer_pots(&[50, 100, 200, 300], &[false; 4]);
    let amounts: Vec<u32> = layers.iter().map(|l| l.amount).collect();
    assert_eq!(amounts, vec![200, 150, 200, 100]);
    for (i, layer) in layers.iter().enumerate() {
        assert_eq!(layer.eligible, (i..4).collect::<Vec<_>>());
    }
}

#[test]
fn folded_contributions_sweeten_pots_they_cannot_win() {
    let layers = layer_pots(&[75, 150, 150], &[true, false, false]);
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].amount, 375);
    assert_eq!(layers[0].eligible, vec![1, 2]);
}

#[test]
fn odd_chips_award_clockwise_from_the_button() {
    // 5-chip pot, three winners, button at 0: order is 1, 2, 3.
    let awards = split_award(5, &[1, 2, 3], 0, 4);
    assert_eq!(awards, vec![(1, 2), (2, 2), (3, 1)]);
    // Moving the button reshuffles who receives the extras.
    let awards = split_award(5, &[1, 2, 3], 2, 4);
    assert_eq!(awards, vec![(3, 2), (1, 2), (2, 1)]);
}
