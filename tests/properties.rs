//! Property tests for field, player and difficulty invariants

use proptest::prelude::*;

use mine_drop::Settings;
use mine_drop::consts::{FIELD_HEIGHT, FIELD_WIDTH, SPAWN_ROW};
use mine_drop::link::{LoopbackLink, PeerLink, PeerMessage};
use mine_drop::sim::{
    Collision, Difficulty, Direction, Field, GameState, LaneGap, MineSlot, Phase, Player,
    TickInput, tick,
};

fn occupied_cells(field: &Field) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for column in 0..FIELD_WIDTH {
        for row in 0..FIELD_HEIGHT {
            if field.is_occupied(column, row) {
                cells.push((column, row));
            }
        }
    }
    cells
}

/// Build a field from a script of spawn attempts and descent passes
fn scripted_field(script: &[(u8, bool)]) -> Field {
    let mut field = Field::new();
    for &(gap, descend) in script {
        field.spawn(LaneGap::new(gap % 4).unwrap());
        if descend {
            field.descend();
        }
    }
    field
}

proptest! {
    #[test]
    fn spawn_occupies_two_columns_at_top(gap in 0u8..4) {
        let gap = LaneGap::new(gap).unwrap();
        let mut field = Field::new();
        prop_assert!(field.spawn(gap));

        let [left, right] = gap.columns();
        let mut expected = vec![(left, 6), (left, 7), (right, 6), (right, 7)];
        expected.sort();
        prop_assert_eq!(occupied_cells(&field), expected);
        prop_assert!(!field.spawn(gap));
    }

    #[test]
    fn tracker_drops_one_row_per_pass(gap in 0u8..4) {
        let gap = LaneGap::new(gap).unwrap();
        let mut field = Field::new();
        field.spawn(gap);

        let mut expected = SPAWN_ROW;
        while let MineSlot::Active { row } = field.slot(gap) {
            prop_assert_eq!(row, expected);
            prop_assert!(!field.spawn(gap));
            field.descend();
            expected = expected.wrapping_sub(1);
        }
        prop_assert_eq!(expected, u8::MAX);
        prop_assert!(field.is_clear());
    }

    #[test]
    fn mines_never_share_cells(script in prop::collection::vec((0u8..4, any::<bool>()), 0..40)) {
        let mut field = Field::new();
        for (gap, descend) in script {
            field.spawn(LaneGap::new(gap).unwrap());
            if descend {
                field.descend();
            }
            let expected_cells: usize = field
                .mines()
                .map(|(_, row)| if row == 0 { 2 } else { 4 })
                .sum();
            prop_assert_eq!(field.occupied_count(), expected_cells);
        }
    }

    #[test]
    fn move_changes_lane_by_one_or_not_at_all(
        script in prop::collection::vec((0u8..4, any::<bool>()), 0..30),
        lane in 0u8..4,
        right in any::<bool>(),
    ) {
        let field = scripted_field(&script);
        let mut player = Player::in_lane(lane);
        let direction = if right { Direction::Right } else { Direction::Left };

        let collision = player.try_move(direction, &field);
        if collision.blocks() {
            prop_assert_eq!(player.lane(), lane);
        } else {
            prop_assert_eq!(collision, Collision::Clear);
            prop_assert_eq!(player.lane() as i16 - lane as i16, direction.delta());
        }
        prop_assert!(player.is_alive());
    }

    #[test]
    fn difficulty_never_rises_or_passes_floor(
        start in 10u32..5000,
        divisor in 1u32..20,
        base_speed in 1u32..5,
        passes in 0usize..6000,
    ) {
        let mut difficulty = Difficulty::from_parts(start, divisor, base_speed);
        let floor = start / divisor;
        let mut previous = difficulty.counter();
        for _ in 0..passes {
            difficulty.ramp();
            prop_assert!(difficulty.counter() <= previous);
            prop_assert!(difficulty.counter() >= floor);
            prop_assert!(difficulty.spawn_interval() >= 1);
            previous = difficulty.counter();
        }
    }

    #[test]
    fn player_survives_drops_away_from_their_lane(
        drops in prop::collection::vec((2u8..4, 1usize..40), 1..20),
    ) {
        let (mut peer, mut link) = LoopbackLink::pair();
        let mut state = GameState::new(Settings {
            tick_rate_hz: 20,
            ..Default::default()
        });
        state.multiplayer = true;
        state.player = Player::in_lane(0);
        state.set_phase(Phase::Playing);

        for (gap, wait) in drops {
            peer.send_message(PeerMessage::DropAt(LaneGap::new(gap).unwrap()));
            for _ in 0..wait * 10 {
                tick(&mut state, &TickInput::default(), &mut link);
                prop_assert!(state.player.is_alive());
            }
        }
        prop_assert_eq!(state.phase, Phase::Playing);
    }
}
