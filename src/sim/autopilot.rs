//! Idle/demo player
//!
//! Produces input edges from the current state so a device can play itself.
//! Seeded, so a demo run is reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Collision, Direction, check_lane};
use super::state::{GameState, Phase};
use super::tick::TickInput;
use crate::consts::HAZARD_ROW;

pub struct Autopilot {
    rng: Pcg32,
    /// Mode the pilot selects in the menu
    multiplayer: bool,
    /// Chance per tick of reacting to a threat
    reflex: f64,
    /// Chance per tick of dropping a mine on the peer
    aggression: f64,
}

impl Autopilot {
    pub fn new(seed: u64, multiplayer: bool) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            multiplayer,
            reflex: 0.02,
            aggression: 0.002,
        }
    }

    pub fn with_reflex(mut self, reflex: f64) -> Self {
        self.reflex = reflex.clamp(0.0, 1.0);
        self
    }

    pub fn with_aggression(mut self, aggression: f64) -> Self {
        self.aggression = aggression.clamp(0.0, 1.0);
        self
    }

    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        // Linger on static screens for about a second
        let linger = 1.0 / state.settings.tick_rate_hz.max(1) as f64;
        match state.phase {
            Phase::Menu => {
                if state.multiplayer != self.multiplayer {
                    TickInput {
                        left: self.multiplayer,
                        right: !self.multiplayer,
                        ..Default::default()
                    }
                } else {
                    TickInput {
                        confirm: self.rng.random_bool(linger),
                        ..Default::default()
                    }
                }
            }
            Phase::Connecting | Phase::Countdown => TickInput::default(),
            Phase::Playing => self.play(state),
            Phase::RoundOver => TickInput {
                confirm: self.rng.random_bool(linger),
                ..Default::default()
            },
        }
    }

    fn play(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        let lane = state.player.lane();

        if threatened(state, lane as i16) && self.rng.random_bool(self.reflex) {
            let mut directions = [Direction::Left, Direction::Right];
            if self.rng.random_bool(0.5) {
                directions.reverse();
            }
            let escape = directions.into_iter().find(|&direction| {
                let target = lane as i16 + direction.delta();
                check_lane(&state.field, target) == Collision::Clear && !threatened(state, target)
            });
            match escape {
                Some(Direction::Left) => input.left = true,
                Some(Direction::Right) => input.right = true,
                None => {}
            }
        }

        if state.multiplayer && self.rng.random_bool(self.aggression) {
            input.confirm = true;
        }
        input
    }
}

/// A mine one pass away from crushing a player in `lane`
fn threatened(state: &GameState, lane: i16) -> bool {
    state
        .field
        .mines()
        .any(|(gap, row)| row <= HAZARD_ROW && gap.index().abs_diff(lane as u8) <= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LaneGap;

    #[test]
    fn test_selects_mode_in_menu() {
        let state = GameState::default();
        let mut pilot = Autopilot::new(1, true);
        let input = pilot.next_input(&state);
        assert!(input.left);
        assert!(!input.confirm);
    }

    #[test]
    fn test_dodges_low_mine() {
        let mut state = GameState::default();
        state.set_phase(Phase::Playing);
        state.field.spawn(LaneGap::ALL[3]);
        for _ in 0..4 {
            state.field.descend();
        }

        let mut pilot = Autopilot::new(7, false).with_reflex(1.0);
        let input = pilot.next_input(&state);
        assert!(input.left);
        assert!(!input.right);
    }

    #[test]
    fn test_idle_when_safe() {
        let mut state = GameState::default();
        state.set_phase(Phase::Playing);
        let mut pilot = Autopilot::new(3, false).with_reflex(1.0);
        assert_eq!(pilot.next_input(&state), TickInput::default());
    }

    #[test]
    fn test_aggression_controls_drops() {
        let mut state = GameState::default();
        state.multiplayer = true;
        state.set_phase(Phase::Playing);

        let mut calm = Autopilot::new(5, true).with_aggression(0.0);
        assert!((0..500).all(|_| !calm.next_input(&state).confirm));

        let mut eager = Autopilot::new(5, true).with_aggression(1.0);
        assert!(eager.next_input(&state).confirm);
    }
}
