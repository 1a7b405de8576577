use serde::{Deserialize, Serialize};

/// One layer of the pot: a chip amount and the seats eligible to win it.
/// Layers are ordered smallest contribution cap first (main pot, then side
/// pots) and are resolved in that order at showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotLayer {
    pub amount: u32,
    pub eligible: Vec<usize>,
}

/// Partitions per-seat hand contributions into a main pot and side pots.
///
/// Every live (non-folded) contribution total defines a cap; the slice of
/// chips between two caps forms one layer, eligible to the live seats that
/// contributed at least the cap. Folded chips fill layers but folded seats
/// are never eligible. The sum of all layer amounts equals the sum of all
/// contributions.
pub fn layer_pots(contributions: &[u32], folded: &[bool]) -> Vec<PotLayer> {
    let mut caps: Vec<u32> = contributions
        .iter()
        .zip(folded)
        .filter(|(&c, &f)| !f && c > 0)
        .map(|(&c, _)| c)
        .collect();
    caps.sort_unstable();
    caps.dedup();

    let mut layers: Vec<PotLayer> = Vec::new();
    let mut prev = 0u32;
    for &cap in &caps {
        let amount: u32 = contributions
            .iter()
            .map(|&c| c.min(cap).saturating_sub(prev))
            .sum();
        let eligible: Vec<usize> = (0..contributions.len())
            .filter(|&i| !folded[i] && contributions[i] >= cap)
            .collect();
        if amount > 0 {
            layers.push(PotLayer { amount, eligible });
        }
        prev = cap;
    }

    // Folded chips above the highest live cap are unreachable by the loop;
    // fold them into the last layer so chip conservation holds.
    let placed: u32 = layers.iter().map(|l| l.amount).sum();
    let total: u32 = contributions.iter().sum();
    if total > placed {
        if let Some(last) = layers.last_mut() {
            last.amount += total - placed;
        }
    }
    layers
}

/// Splits one layer among its winners, returning per-seat awards.
///
/// Even shares first; any odd remainder chips go one each to the winners
/// closest clockwise to the left of the dealer button, a fixed deterministic
/// order.
pub fn split_award(amount: u32, winners: &[usize], button: usize, seats: usize) -> Vec<(usize, u32)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let mut ordered: Vec<usize> = winners.to_vec();
    ordered.sort_by_key(|&s| (s + seats - button - 1) % seats);
    let share = amount / winners.len() as u32;
    let remainder = (amount % winners.len() as u32) as usize;
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, seat)| (seat, share + u32::from(i < remainder)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_contributions_single_pot() {
        let layers = layer_pots(&[1000, 1000], &[false, false]);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].amount, 2000);
        assert_eq!(layers[0].eligible, vec![0, 1]);
    }

    #[test]
    fn short_all_in_creates_side_pot() {
        let layers = layer_pots(&[500, 1000], &[false, false]);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].amount, 1000);
        assert_eq!(layers[0].eligible, vec![0, 1]);
        assert_eq!(layers[1].amount, 500);
        assert_eq!(layers[1].eligible, vec![1]);
    }

    #[test]
    fn staircase_all_ins_layer_correctly() {
        // Three all-ins at 50/100/200 and a caller at 300.
        let contributions = [50, 100, 200, 300];
        let folded = [false; 4];
        let layers = layer_pots(&contributions, &folded);
        assert_eq!(layers.len(), 4);
        assert_eq!(layers[0].amount, 200);
        assert_eq!(layers[0].eligible, vec![0, 1, 2, 3]);
        assert_eq!(layers[1].amount, 150);
        assert_eq!(layers[1].eligible, vec![1, 2, 3]);
        assert_eq!(layers[2].amount, 200);
        assert_eq!(layers[2].eligible, vec![2, 3]);
        assert_eq!(layers[3].amount, 100);
        assert_eq!(layers[3].eligible, vec![3]);
        let total: u32 = layers.iter().map(|l| l.amount).sum();
        assert_eq!(total, contributions.iter().sum::<u32>());
    }

    #[test]
    fn folded_chips_fill_pots_without_eligibility() {
        let layers = layer_pots(&[100, 100, 40], &[false, false, true]);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].amount, 240);
        assert_eq!(layers[0].eligible, vec![0, 1]);
    }

    #[test]
    fn folded_overage_stays_in_the_last_layer() {
        // Seat 2 committed 300 then folded; live caps stop at 200.
        let layers = layer_pots(&[200, 200, 300], &[false, false, true]);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].amount, 700);
        assert_eq!(layers[0].eligible, vec![0, 1]);
    }

    #[test]
    fn odd_chip_goes_left_of_button() {
        // 101 chips, two winners, button at seat 1: seat 2 is first clockwise.
        let awards = split_award(101, &[0, 2], 1, 3);
        assert_eq!(awards, vec![(2, 51), (0, 50)]);
    }

    #[test]
    fn even_split_has_no_remainder_bias() {
        let awards = split_award(100, &[0, 1], 0, 2);
        let total: u32 = awards.iter().map(|(_, a)| a).sum();
        assert_eq!(total, 100);
        assert!(awards.iter().all(|&(_, a)| a == 50));
    }
}
