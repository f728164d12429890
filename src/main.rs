//! Void Pulse entry point
//!
//! Natively this runs a headless attract-mode session: the autopilot plays a
//! seeded run and the summary is printed. The web build is driven by the host
//! page through the library.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use void_pulse::consts::FRAME_MS;
    use void_pulse::highscore::{FileStore, MemoryStore, ScoreStore};
    use void_pulse::sim::{GameEvent, autopilot};
    use void_pulse::{Session, SimConfig, Variant, platform};

    #[derive(Parser)]
    #[command(name = "void-pulse")]
    #[command(
        author,
        version,
        about = "Void Pulse - headless attract-mode run"
    )]
    struct Args {
        /// Run seed (defaults to the wall clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Game variant: classic, leveling, ranged or final (v1-v4)
        #[arg(long, default_value = "final")]
        variant: Variant,

        /// Frames to simulate before stopping
        #[arg(long, default_value_t = 60 * 60 * 5)]
        frames: u64,

        /// JSON config file, overrides --variant
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read and write the high score file
        #[arg(long)]
        persist: bool,
    }

    pub fn run() {
        platform::init_logging();

        let options = Args::parse();
        let seed = options.seed.unwrap_or_else(platform::clock_seed);

        let config = match &options.config {
            Some(path) => match SimConfig::load(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("error: {}: {}", path.display(), e);
                    std::process::exit(2);
                }
            },
            None => SimConfig::preset(options.variant),
        };

        let store: Box<dyn ScoreStore> = if options.persist {
            Box::new(FileStore::from_env())
        } else {
            Box::new(MemoryStore::default())
        };

        log::info!(
            "Void Pulse (headless) starting: {} variant, seed {}",
            config.variant.as_str(),
            seed
        );

        let mut session = match Session::new(config, seed, store) {
            Ok(session) => session,
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(2);
            }
        };
        session.start();

        let mut kills = 0u32;
        let mut bosses = 0u32;
        let mut frames = 0u64;
        while frames < options.frames && session.state().is_playing() {
            let command = autopilot(session.state());
            if let Some(target) = command.fire_at {
                session.pointer_down(target);
            }
            let output = session.frame(&command.input, FRAME_MS);
            for event in &output.events {
                match event {
                    GameEvent::EnemyKilled { .. } => kills += 1,
                    GameEvent::BossDefeated { .. } => bosses += 1,
                    _ => {}
                }
            }
            frames += 1;
        }

        let hud = session.hud();
        println!("frames:     {}", frames);
        println!("outcome:    {}", if hud.game_over { "defeated" } else { "survived" });
        println!("score:      {}", hud.score);
        println!("level:      {}", hud.level);
        println!("kills:      {}", kills);
        println!("bosses:     {}", bosses);
        println!("health:     {:.0}%", hud.health_fraction * 100.0);
        println!("high score: {}", session.high_score());
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm_start, this is just to satisfy the compiler
}
