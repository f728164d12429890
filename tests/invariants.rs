//! Property tests over random input sequences

use std::collections::HashSet;

use glam::Vec2;
use proptest::prelude::*;

use void_pulse::consts::FRAME_MS;
use void_pulse::highscore::MemoryStore;
use void_pulse::sim::{GameEvent, GamePhase, TickInput, autopilot};
use void_pulse::{Session, SimConfig, Variant};

fn variant_strategy() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::Classic),
        Just(Variant::Leveling),
        Just(Variant::Ranged),
        Just(Variant::Final),
    ]
}

#[derive(Debug, Clone)]
struct Step {
    keys: u8,
    pointer: (f32, f32),
    click: bool,
    elapsed_ms: f32,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (
        any::<u8>(),
        (0.0f32..1280.0, 0.0f32..720.0),
        any::<bool>(),
        0.0f32..80.0,
    )
        .prop_map(|(keys, pointer, click, elapsed_ms)| Step {
            keys,
            pointer,
            click,
            elapsed_ms,
        })
}

impl Step {
    fn input(&self) -> TickInput {
        TickInput {
            up: self.keys & 1 != 0,
            down: self.keys & 2 != 0,
            left: self.keys & 4 != 0,
            right: self.keys & 8 != 0,
            dash: self.keys & 16 != 0,
            pointer: Vec2::new(self.pointer.0, self.pointer.1),
        }
    }
}

fn run(session: &mut Session, steps: &[Step]) -> Vec<GameEvent> {
    let mut all = Vec::new();
    for step in steps {
        if step.click {
            all.extend(session.pointer_down(Vec2::new(step.pointer.0, step.pointer.1)));
        }
        all.extend(session.frame(&step.input(), step.elapsed_ms).events);
    }
    all
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn health_and_experience_stay_in_range(
        variant in variant_strategy(),
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..400),
    ) {
        let mut session = Session::new(SimConfig::preset(variant), seed, Box::new(MemoryStore::default())).unwrap();
        session.start();
        for step in &steps {
            if step.click {
                session.pointer_down(Vec2::new(step.pointer.0, step.pointer.1));
            }
            session.frame(&step.input(), step.elapsed_ms);
            let player = &session.state().player;
            prop_assert!(player.health >= 0.0 && player.health <= player.max_health);
            prop_assert!(player.experience >= 0.0 && player.experience <= player.experience_to_next);
        }
    }

    #[test]
    fn every_despawn_matches_one_spawn(
        variant in variant_strategy(),
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..400),
    ) {
        let mut session = Session::new(SimConfig::preset(variant), seed, Box::new(MemoryStore::default())).unwrap();
        session.start();
        let events = run(&mut session, &steps);

        let mut live = HashSet::new();
        for event in &events {
            match event {
                GameEvent::Spawned { id, .. } => prop_assert!(live.insert(*id)),
                GameEvent::Despawned { id } => prop_assert!(live.remove(id)),
                _ => {}
            }
        }
        prop_assert_eq!(live.len(), session.state().entity_count());
    }

    #[test]
    fn same_seed_same_run(
        variant in variant_strategy(),
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..200),
    ) {
        let mut a = Session::new(SimConfig::preset(variant), seed, Box::new(MemoryStore::default())).unwrap();
        let mut b = Session::new(SimConfig::preset(variant), seed, Box::new(MemoryStore::default())).unwrap();
        a.start();
        b.start();
        run(&mut a, &steps);
        run(&mut b, &steps);
        prop_assert_eq!(
            serde_json::to_string(a.state()).unwrap(),
            serde_json::to_string(b.state()).unwrap()
        );
    }

    #[test]
    fn at_most_one_boss_alive(seed in any::<u64>()) {
        let mut config = SimConfig::preset(Variant::Final);
        // Level fast so bosses come up within the run
        config.experience_to_first_level = 10.0;
        config.experience_growth = 1.1;
        let mut session = Session::new(config, seed, Box::new(MemoryStore::default())).unwrap();
        session.start();

        for _ in 0..3000 {
            let command = autopilot(session.state());
            if let Some(target) = command.fire_at {
                session.pointer_down(target);
            }
            session.frame(&command.input, FRAME_MS);

            let state = session.state();
            let bosses = state.enemies.iter().filter(|e| e.archetype.is_boss()).count();
            prop_assert!(bosses <= 1);
            prop_assert_eq!(bosses == 1, state.boss_active);
            if state.boss_active {
                prop_assert!(state.spawner.is_suspended());
            }
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }
}
