// Small games of chance for the fun commands.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

pub const EIGHT_BALL_ANSWERS: [&str; 8] = [
    "Yes, definitely!",
    "No chance.",
    "Ask again later.",
    "It is certain.",
    "Very doubtful.",
    "Without a doubt.",
    "Better not tell you now.",
    "Signs point to yes.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSide::Heads => write!(f, "Heads"),
            CoinSide::Tails => write!(f, "Tails"),
        }
    }
}

pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> CoinSide {
    if rng.gen_bool(0.5) {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    }
}

pub fn eight_ball<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    EIGHT_BALL_ANSWERS
        .choose(rng)
        .copied()
        .unwrap_or(EIGHT_BALL_ANSWERS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_coin_flip_hits_both_sides() {
        let mut rng = StdRng::seed_from_u64(7);
        let flips: Vec<CoinSide> = (0..100).map(|_| coin_flip(&mut rng)).collect();
        assert!(flips.contains(&CoinSide::Heads));
        assert!(flips.contains(&CoinSide::Tails));
    }

    #[test]
    fn test_eight_ball_answers_from_list() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert!(EIGHT_BALL_ANSWERS.contains(&eight_ball(&mut rng)));
        }
    }
}
