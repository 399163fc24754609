//! Fixed timestep simulation tick
//!
//! The state machine that drives one device: menu, handshake, countdown,
//! play and verdict. Each call polls the link once, advances the current
//! phase and returns the frame to draw.

use super::collision::{Collision, Direction};
use super::field::LaneGap;
use super::state::{DeathCause, GameEvent, GameState, Phase};
use crate::consts::PLAYER_ROWS;
use crate::field_to_matrix;
use crate::link::{Link, PeerLink, PeerMessage};
use crate::render::Frame;

/// Menu pixels lit in both modes
const MENU_FIXED: [(i32, i32); 4] = [(2, 1), (3, 5), (1, 4), (1, 6)];
/// Arrow pointing at the solo option
const MENU_SOLO: [(i32, i32); 2] = [(4, 1), (3, 2)];
/// Arrow pointing at the two-player option
const MENU_DUO: [(i32, i32); 2] = [(1, 2), (0, 1)];

/// Input edges for a single tick.
///
/// Each flag means "this button was pressed since the last poll".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move one lane left; picks two-player in the menu
    pub left: bool,
    /// Move one lane right; picks solo in the menu
    pub right: bool,
    /// Start, drop a mine on the peer, or leave the verdict screen
    pub confirm: bool,
}

/// Advance the device by one tick
pub fn tick<L: Link + ?Sized>(state: &mut GameState, input: &TickInput, link: &mut L) -> Frame {
    state.events.clear();
    state.time_ticks += 1;

    // The link is drained every tick, whatever the phase
    let received = link.poll_message();
    state.last_message = received;

    let mut frame = Frame::new();
    match state.phase {
        Phase::Menu => menu(state, input, &mut frame),
        Phase::Connecting => connecting(state, received, link, &mut frame),
        Phase::Countdown => countdown(state, received, link, &mut frame),
        Phase::Playing => playing(state, input, received, link, &mut frame),
        Phase::RoundOver => round_over(state, input, &mut frame),
    }
    frame
}

fn menu(state: &mut GameState, input: &TickInput, frame: &mut Frame) {
    if state.multiplayer {
        if input.right {
            state.multiplayer = false;
        }
    } else if input.left {
        state.multiplayer = true;
    }

    for (x, y) in MENU_FIXED {
        frame.pixel(x, y, true);
    }
    for (x, y) in MENU_SOLO {
        frame.pixel(x, y, !state.multiplayer);
    }
    for (x, y) in MENU_DUO {
        frame.pixel(x, y, state.multiplayer);
    }

    if input.confirm {
        frame.clear();
        state.connected = false;
        if state.multiplayer {
            state.set_phase(Phase::Connecting);
        } else {
            begin_countdown(state);
        }
    }
}

fn connecting<L: Link + ?Sized>(
    state: &mut GameState,
    received: Option<PeerMessage>,
    link: &mut L,
    frame: &mut Frame,
) {
    if received.is_some_and(PeerMessage::is_handshake) {
        link.send_message(PeerMessage::HandshakeAck);
        log::info!("Peer connected after {} ticks", state.phase_ticks);
        state.connected = true;
        state.events.push(GameEvent::Connected);
        frame.clear();
        begin_countdown(state);
        return;
    }

    link.send_message(PeerMessage::Handshake);
    state.phase_ticks += 1;

    let limit = state.settings.handshake_timeout_ticks();
    if limit.is_some_and(|limit| state.phase_ticks >= limit) {
        log::warn!("No handshake from peer after {} ticks", state.phase_ticks);
        state.events.push(GameEvent::HandshakeTimedOut);
        frame.clear();
        state.set_phase(Phase::Menu);
    }
}

fn begin_countdown(state: &mut GameState) {
    state.reset_round();
    state.set_phase(Phase::Countdown);
}

fn countdown<L: Link + ?Sized>(
    state: &mut GameState,
    received: Option<PeerMessage>,
    link: &mut L,
    frame: &mut Frame,
) {
    // Peer missed our ack and is still knocking
    if state.multiplayer && received == Some(PeerMessage::Handshake) {
        link.send_message(PeerMessage::HandshakeAck);
    }

    let rate = state.settings.tick_rate_hz.max(1);
    if state.phase_ticks < state.settings.countdown_ticks() {
        if state.phase_ticks % rate == 0 {
            let remaining = state.settings.countdown_secs as u32 - state.phase_ticks / rate;
            frame.text(remaining.to_string());
        }
        state.phase_ticks += 1;
    } else {
        frame.clear();
        state.set_phase(Phase::Playing);
    }
}

fn playing<L: Link + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    received: Option<PeerMessage>,
    link: &mut L,
    frame: &mut Frame,
) {
    frame.clear();

    if state.difficulty.advance() {
        descent_pass(state);
    }

    if state.multiplayer {
        if input.confirm && state.player.is_alive() {
            let gap = state.player.own_gap();
            link.send_message(PeerMessage::DropAt(gap));
            log::debug!("Dropping mine on peer at {:?}", gap);
            state.events.push(GameEvent::DropSent(gap));
        }

        match received {
            Some(PeerMessage::DropAt(gap)) => remote_drop(state, gap),
            Some(PeerMessage::DeathNotify) => {
                log::info!("Peer died");
                state.peer_died = true;
                state.events.push(GameEvent::PeerDied);
            }
            _ => {}
        }
    }

    if state.player.is_alive() {
        if input.right {
            step(state, Direction::Right);
        }
        if input.left {
            step(state, Direction::Left);
        }
    }

    let lost = !state.player.is_alive();
    if lost || state.peer_died {
        if lost {
            link.send_message(PeerMessage::DeathNotify);
        }
        state.signal_round_over();
        // Verdict is drawn on the same tick the round ends
        frame.clear();
        frame.verdict(state.defeated());
        return;
    }

    draw_field(state, frame);
}

/// Lower every mine, check for crushes, ramp difficulty and maybe spawn
fn descent_pass(state: &mut GameState) {
    for gap in state.field.descend() {
        state.events.push(GameEvent::Cleared(gap));
    }

    if let Some(gap) = state.field.crushing(state.player.lane()) {
        state.kill_player(DeathCause::Crushed(gap));
    }

    state.difficulty.ramp();

    if !state.multiplayer {
        solo_spawn(state);
    }
}

/// Spawn in the first free gap that is not directly above the player
fn solo_spawn(state: &mut GameState) {
    if state.field.is_crowded() {
        return;
    }
    let own = state.player.own_gap();
    let target = LaneGap::ALL
        .into_iter()
        .find(|&gap| gap != own && state.field.can_spawn(gap));

    if let Some(gap) = target {
        state.field.spawn(gap);
        log::debug!("Spawned mine at {:?}", gap);
        state.events.push(GameEvent::Spawned(gap));
    }
}

fn remote_drop(state: &mut GameState, gap: LaneGap) {
    if !state.field.is_crowded() && state.field.spawn(gap) {
        log::debug!("Peer dropped mine at {:?}", gap);
        state.events.push(GameEvent::Spawned(gap));
    } else {
        log::debug!("Ignoring peer drop at {:?}", gap);
        state.events.push(GameEvent::DropIgnored(gap));
    }
}

fn step(state: &mut GameState, direction: Direction) {
    match state.player.try_move(direction, &state.field) {
        Collision::Clear => {
            let lane = state.player.lane();
            state.events.push(GameEvent::Moved { lane });
        }
        collision => {
            state.events.push(GameEvent::Blocked(collision));
            if collision.is_fatal() {
                state.kill_player(DeathCause::Collision);
            }
        }
    }
}

fn draw_field(state: &GameState, frame: &mut Frame) {
    for (gap, row) in state.field.mines() {
        let [left, right] = gap.columns();
        let row = row as usize;
        frame.fill_box(
            field_to_matrix(left, row),
            field_to_matrix(right, row.saturating_sub(1)),
        );
    }

    let lane = state.player.lane() as usize;
    frame.fill_box(
        field_to_matrix(lane, PLAYER_ROWS[1]),
        field_to_matrix(lane + 1, PLAYER_ROWS[0]),
    );
}

fn round_over(state: &mut GameState, input: &TickInput, frame: &mut Frame) {
    frame.verdict(state.defeated());

    if input.confirm {
        state.reset_round();
        state.connected = false;
        frame.clear();
        state.set_phase(Phase::Menu);
    }
}
