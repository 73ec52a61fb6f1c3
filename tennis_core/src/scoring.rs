//! Tennis game scoring with deuce and advantage.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Side;

/// Points needed before the game can be won (0, 15, 30, 40)
pub const GAME_POINT: u8 = 3;

/// Result of awarding one point
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointOutcome {
    /// Ordinary point below deuce
    Point,
    /// Score reached or returned to deuce
    Deuce,
    /// The scorer now holds advantage
    Advantage(Side),
    /// The scorer won the game
    GameWon(Side),
    /// Game already over; nothing changed
    Ignored,
}

impl PointOutcome {
    /// Whether the rally should restart after this outcome
    pub fn continues(self) -> bool {
        matches!(
            self,
            PointOutcome::Point | PointOutcome::Deuce | PointOutcome::Advantage(_)
        )
    }
}

/// Score of a single tennis game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    pub player_points: u8,
    pub bot_points: u8,
    pub advantage: Option<Side>,
    pub winner: Option<Side>,
}

impl Score {
    pub fn new() -> Self {
        Score::default()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn is_deuce(&self) -> bool {
        self.player_points == GAME_POINT
            && self.bot_points == GAME_POINT
            && self.advantage.is_none()
            && self.winner.is_none()
    }

    pub fn points(&self, side: Side) -> u8 {
        match side {
            Side::Player => self.player_points,
            Side::Bot => self.bot_points,
        }
    }

    fn points_mut(&mut self, side: Side) -> &mut u8 {
        match side {
            Side::Player => &mut self.player_points,
            Side::Bot => &mut self.bot_points,
        }
    }

    /// Award a point to `scorer`. Frozen once a winner exists.
    pub fn award_point(&mut self, scorer: Side) -> PointOutcome {
        if self.is_over() {
            return PointOutcome::Ignored;
        }

        let mine = self.points(scorer);
        let theirs = self.points(scorer.opposite());

        if mine == GAME_POINT && theirs == GAME_POINT {
            return match self.advantage {
                None => {
                    self.advantage = Some(scorer);
                    PointOutcome::Advantage(scorer)
                }
                Some(holder) if holder == scorer => {
                    self.winner = Some(scorer);
                    PointOutcome::GameWon(scorer)
                }
                Some(_) => {
                    // Advantage never moves straight to the other side
                    self.advantage = None;
                    PointOutcome::Deuce
                }
            };
        }

        if mine == GAME_POINT {
            self.winner = Some(scorer);
            return PointOutcome::GameWon(scorer);
        }

        *self.points_mut(scorer) += 1;

        if self.is_deuce() {
            PointOutcome::Deuce
        } else {
            PointOutcome::Point
        }
    }

    /// Umpire's call for the current score, player first
    pub fn call(&self) -> String {
        if let Some(winner) = self.winner {
            return format!("Game {}", winner.label());
        }
        if let Some(holder) = self.advantage {
            return format!("Advantage {}", holder.label());
        }
        if self.is_deuce() {
            return "Deuce".to_string();
        }
        format!(
            "{}-{}",
            tennis_label(self.player_points),
            tennis_label(self.bot_points)
        )
    }
}

fn tennis_label(points: u8) -> &'static str {
    match points {
        0 => "0",
        1 => "15",
        2 => "30",
        _ => "40",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(player: u8, bot: u8, advantage: Option<Side>) -> Score {
        Score {
            player_points: player,
            bot_points: bot,
            advantage,
            winner: None,
        }
    }

    #[test]
    fn test_ordinary_points() {
        let mut s = Score::new();

        assert_eq!(s.award_point(Side::Player), PointOutcome::Point);
        assert_eq!(s.award_point(Side::Bot), PointOutcome::Point);
        assert_eq!(s.award_point(Side::Player), PointOutcome::Point);

        assert_eq!(s.player_points, 2);
        assert_eq!(s.bot_points, 1);
        assert_eq!(s.call(), "30-15");
    }

    #[test]
    fn test_four_straight_points_win() {
        let mut s = Score::new();
        for _ in 0..3 {
            assert_eq!(s.award_point(Side::Player), PointOutcome::Point);
        }
        assert_eq!(s.call(), "40-0");

        assert_eq!(s.award_point(Side::Player), PointOutcome::GameWon(Side::Player));
        assert!(s.is_over());
        assert_eq!(s.winner, Some(Side::Player));
        assert_eq!(s.call(), "Game Player");
    }

    #[test]
    fn test_forty_thirty_wins_outright() {
        let mut s = score(2, 3, None);

        assert_eq!(s.award_point(Side::Bot), PointOutcome::GameWon(Side::Bot));
        assert_eq!(s.winner, Some(Side::Bot));
    }

    #[test]
    fn test_reaching_deuce() {
        let mut s = score(2, 3, None);

        assert_eq!(s.award_point(Side::Player), PointOutcome::Deuce);
        assert!(s.is_deuce());
        assert_eq!(s.call(), "Deuce");
    }

    #[test]
    fn test_deuce_advantage_and_game() {
        let mut s = score(3, 3, None);

        assert_eq!(s.award_point(Side::Bot), PointOutcome::Advantage(Side::Bot));
        assert_eq!(s, score(3, 3, Some(Side::Bot)));
        assert_eq!(s.call(), "Advantage Bot");

        assert_eq!(s.award_point(Side::Bot), PointOutcome::GameWon(Side::Bot));
        assert!(s.is_over());
        assert_eq!(s.winner, Some(Side::Bot));
    }

    #[test]
    fn test_advantage_lost_returns_to_deuce() {
        let mut s = score(3, 3, Some(Side::Bot));

        assert_eq!(s.award_point(Side::Player), PointOutcome::Deuce);
        assert_eq!(s, score(3, 3, None));
        assert!(!s.is_over());
    }

    #[test]
    fn test_advantage_never_transfers_directly() {
        let mut s = score(3, 3, Some(Side::Player));

        s.award_point(Side::Bot);
        assert_ne!(s.advantage, Some(Side::Bot));
        assert_eq!(s.advantage, None);
    }

    #[test]
    fn test_frozen_after_game_over() {
        let mut s = Score::new();
        for _ in 0..4 {
            s.award_point(Side::Bot);
        }
        let frozen = s;

        assert_eq!(s.award_point(Side::Player), PointOutcome::Ignored);
        assert_eq!(s.award_point(Side::Bot), PointOutcome::Ignored);
        assert_eq!(s, frozen);
    }

    #[test]
    fn test_outcome_continues() {
        assert!(PointOutcome::Point.continues());
        assert!(PointOutcome::Deuce.continues());
        assert!(PointOutcome::Advantage(Side::Bot).continues());
        assert!(!PointOutcome::GameWon(Side::Player).continues());
        assert!(!PointOutcome::Ignored.continues());
    }

    #[test]
    fn test_points_never_exceed_three_in_long_sequences() {
        // Deterministic pseudo-random walk over many point sequences
        let mut state = 0x2545_F491_u32;
        for _ in 0..200 {
            let mut s = Score::new();
            let mut last = s;
            let mut awarded = 0;
            while !s.is_over() {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                let scorer = if state & 1 == 0 { Side::Player } else { Side::Bot };

                s.award_point(scorer);
                awarded += 1;

                assert!(s.player_points <= GAME_POINT);
                assert!(s.bot_points <= GAME_POINT);
                assert!(s.player_points >= last.player_points);
                assert!(s.bot_points >= last.bot_points);
                if let (Some(a), Some(b)) = (last.advantage, s.advantage) {
                    assert_eq!(a, b, "advantage switched sides in one step");
                }
                last = s;
                assert!(awarded < 10_000);
            }
            assert!(awarded >= 4);
        }
    }
}
