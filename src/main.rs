//! Mine Drop host demo
//!
//! Runs one or two self-playing devices over an in-memory link and logs what
//! their LED matrices show.
//!
//! Usage: `mine-drop [--solo] [--ticks N] [--loss P] [--seed S] [settings.json]`

use std::path::Path;

use mine_drop::Settings;
use mine_drop::link::LoopbackLink;
use mine_drop::render::LedMatrix;
use mine_drop::sim::{Autopilot, GameEvent, GameState, Phase, tick};

/// One simulated device
struct Device {
    name: &'static str,
    state: GameState,
    link: LoopbackLink,
    pilot: Autopilot,
    matrix: LedMatrix,
    wins: u32,
    losses: u32,
}

impl Device {
    fn new(name: &'static str, settings: Settings, link: LoopbackLink, pilot: Autopilot) -> Self {
        Self {
            name,
            state: GameState::new(settings),
            link,
            pilot,
            matrix: LedMatrix::new(),
            wins: 0,
            losses: 0,
        }
    }

    fn step(&mut self) {
        let input = self.pilot.next_input(&self.state);
        let frame = tick(&mut self.state, &input, &mut self.link);
        self.matrix.apply(&frame);

        for event in &self.state.events {
            match event {
                GameEvent::PhaseChanged {
                    to: Phase::RoundOver,
                    ..
                } => {
                    if self.state.defeated() {
                        self.losses += 1;
                    } else {
                        self.wins += 1;
                    }
                    log::info!(
                        "[{}] round over at tick {} ({})\n{}",
                        self.name,
                        self.state.time_ticks,
                        if self.state.defeated() { "lost" } else { "won" },
                        self.matrix.to_ascii()
                    );
                }
                GameEvent::PhaseChanged { from, to } => {
                    log::info!("[{}] {:?} -> {:?}", self.name, from, to);
                }
                other => log::debug!("[{}] {:?}", self.name, other),
            }
        }
    }
}

struct Options {
    solo: bool,
    ticks: u64,
    loss: f64,
    seed: u64,
    settings_path: Option<String>,
}

fn parse_args() -> Options {
    let mut options = Options {
        solo: false,
        ticks: 60_000,
        loss: 0.05,
        seed: 2015,
        settings_path: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--solo" => options.solo = true,
            "--ticks" => {
                if let Some(n) = args.next().and_then(|v| v.parse().ok()) {
                    options.ticks = n;
                }
            }
            "--loss" => {
                if let Some(p) = args.next().and_then(|v| v.parse().ok()) {
                    options.loss = p;
                }
            }
            "--seed" => {
                if let Some(s) = args.next().and_then(|v| v.parse().ok()) {
                    options.seed = s;
                }
            }
            other if other.starts_with("--") => log::warn!("Unknown option {}", other),
            path => options.settings_path = Some(path.to_string()),
        }
    }
    options
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();
    let settings = Settings::load_or_default(options.settings_path.as_deref().map(Path::new));
    log::info!(
        "Mine Drop starting: {} mode, {} ticks at {} Hz",
        if options.solo { "solo" } else { "two-player" },
        options.ticks,
        settings.tick_rate_hz
    );

    let (link_a, link_b) = LoopbackLink::lossy_pair(options.loss, options.seed);
    let multiplayer = !options.solo;

    let mut devices = vec![Device::new(
        "A",
        settings,
        link_a,
        Autopilot::new(options.seed, multiplayer),
    )];
    if multiplayer {
        devices.push(Device::new(
            "B",
            settings,
            link_b,
            Autopilot::new(options.seed.wrapping_mul(31), multiplayer),
        ));
    }

    for _ in 0..options.ticks {
        for device in devices.iter_mut() {
            device.step();
        }
    }

    for device in &devices {
        log::info!(
            "[{}] {} won, {} lost, {} bytes sent ({} lost in transit)",
            device.name,
            device.wins,
            device.losses,
            device.link.sent().len(),
            device.link.dropped()
        );
    }
}
