//! Game state and core simulation types
//!
//! Everything a device needs to resume a round lives here.

use serde::{Deserialize, Serialize};

use super::collision::{Collision, Player};
use super::difficulty::Difficulty;
use super::field::{Field, LaneGap};
use crate::link::PeerMessage;
use crate::settings::Settings;

/// High-level mode of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Choosing solo or two-player
    #[default]
    Menu,
    /// Waiting for the peer's handshake
    Connecting,
    /// Pre-round countdown
    Countdown,
    /// Active gameplay
    Playing,
    /// Round finished, showing the verdict
    RoundOver,
}

/// Why the local player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Moved into a mine
    Collision,
    /// A mine came down on the player
    Crushed(LaneGap),
}

/// Things that happened during a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    Connected,
    HandshakeTimedOut,
    Spawned(LaneGap),
    /// Mine left the bottom of the field
    Cleared(LaneGap),
    Moved { lane: u8 },
    Blocked(Collision),
    Died(DeathCause),
    PeerDied,
    DropSent(LaneGap),
    /// Peer's drop request refused (gap busy or field crowded)
    DropIgnored(LaneGap),
}

/// Complete device state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub phase: Phase,
    /// Two-player mode selected in the menu
    pub multiplayer: bool,
    pub field: Field,
    pub difficulty: Difficulty,
    pub player: Player,
    /// Ticks spent in the current Connecting or Countdown phase
    pub phase_ticks: u32,
    /// Handshake completed for the current session
    pub connected: bool,
    /// Peer reported its own death this round
    pub peer_died: bool,
    /// Message received from the peer this tick
    pub last_message: Option<PeerMessage>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl GameState {
    /// Fresh device state. `settings` must already pass `Settings::validate`.
    pub fn new(settings: Settings) -> Self {
        debug_assert!(settings.validate().is_ok(), "invalid settings: {settings:?}");
        Self {
            settings,
            phase: Phase::Menu,
            multiplayer: false,
            field: Field::new(),
            difficulty: Difficulty::new(&settings),
            player: Player::new(),
            phase_ticks: 0,
            connected: false,
            peer_died: false,
            last_message: None,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Move to `to`, resetting the per-phase counter
    pub fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.phase_ticks = 0;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// End the current round
    pub fn signal_round_over(&mut self) {
        self.set_phase(Phase::RoundOver);
    }

    /// Fresh field, difficulty and player for a new round
    pub fn reset_round(&mut self) {
        self.field.clear();
        self.difficulty.reset();
        self.player = Player::new();
        self.peer_died = false;
    }

    /// Kill the local player, recording the cause the first time only
    pub fn kill_player(&mut self, cause: DeathCause) {
        if self.player.kill() {
            log::info!("Player died: {:?}", cause);
            self.events.push(GameEvent::Died(cause));
        }
    }

    /// Whether the round ended with the local player dead
    pub fn defeated(&self) -> bool {
        !self.player.is_alive()
    }

    pub fn has_event(&self, event: GameEvent) -> bool {
        self.events.contains(&event)
    }
}
