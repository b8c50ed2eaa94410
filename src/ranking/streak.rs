use crate::domain::Outcome;

/// Current streak from a chronological outcome sequence (most recent last).
///
/// Walks backward counting consecutive identical win/loss outcomes. A tie at
/// the most recent position resets the streak to 0; an earlier tie simply
/// stops the count.
pub fn current_streak(outcomes: &[Outcome]) -> i32 {
    let Some(last) = outcomes.last() else {
        return 0;
    };
    let direction = match last {
        Outcome::Win => 1,
        Outcome::Loss => -1,
        Outcome::Tie => return 0,
    };

    let run = outcomes.iter().rev().take_while(|o| *o == last).count();
    direction * run as i32
}

pub fn is_on_fire(streak: i32, threshold: u32) -> bool {
    threshold > 0 && streak >= threshold as i32
}
