use glam::Vec2;

use void_pulse::consts::FRAME_MS;
use void_pulse::highscore::MemoryStore;
use void_pulse::sim::{
    EnemyArchetype, GameEvent, GamePhase, GameState, Owner, SpawnOutcome, TickInput, spawn_tick,
    spawner, tick,
};
use void_pulse::{Session, SimConfig, Variant};

fn playing(variant: Variant, seed: u64) -> GameState {
    let mut state = GameState::new(SimConfig::preset(variant), seed);
    state.start();
    state.take_events();
    state
}

fn still(state: &GameState) -> TickInput {
    TickInput {
        pointer: state.player.pos + Vec2::X,
        ..Default::default()
    }
}

/// Session resumed from a state with a tank parked on a weakened player.
/// The returned store shares its slot with the one the session writes to.
fn doomed_session(stored_best: u64, score: u64) -> (Session, MemoryStore) {
    let mut state = playing(Variant::Final, 11);
    state.player.health = 10.0;
    state.score = score;
    let pos = state.player.pos;
    state.spawn_enemy(EnemyArchetype::Tank, pos);
    state.take_events();
    let store = MemoryStore::with_best(stored_best);
    let session = Session::from_state(state, Box::new(store.clone())).unwrap();
    (session, store)
}

#[test]
fn tank_contact_defeats_and_persists_new_high_score() {
    let (mut session, store) = doomed_session(100, 2500);
    let out = session.frame(&TickInput::default(), FRAME_MS);

    assert_eq!(session.phase(), GamePhase::Defeated);
    assert!(out.hud.game_over);
    assert!(out.events.contains(&GameEvent::Defeated { score: 2500 }));
    assert_eq!(session.high_score(), 2500);
    assert_eq!(store.writes(), 1);
    assert_eq!(store.best(), 2500);

    // Later frames never write again
    for _ in 0..10 {
        session.frame(&TickInput::default(), FRAME_MS);
    }
    assert_eq!(store.writes(), 1);
}

#[test]
fn defeat_below_high_score_leaves_store_untouched() {
    let (mut session, store) = doomed_session(9000, 2500);
    session.frame(&TickInput::default(), FRAME_MS);

    assert_eq!(session.phase(), GamePhase::Defeated);
    assert_eq!(session.high_score(), 9000);
    assert_eq!(store.writes(), 0);
    assert_eq!(store.best(), 9000);
}

#[test]
fn defeat_matching_high_score_is_not_a_new_best() {
    let (mut session, store) = doomed_session(2500, 2500);
    session.frame(&TickInput::default(), FRAME_MS);

    assert_eq!(session.phase(), GamePhase::Defeated);
    assert_eq!(store.writes(), 0);
}

#[test]
fn defeated_state_is_frozen() {
    let (mut session, _store) = doomed_session(0, 10);
    session.frame(&TickInput::default(), FRAME_MS);
    assert_eq!(session.phase(), GamePhase::Defeated);

    let before = serde_json::to_string(session.state()).unwrap();
    let input = TickInput {
        up: true,
        dash: true,
        pointer: Vec2::new(3.0, 4.0),
        ..Default::default()
    };
    for _ in 0..30 {
        let out = session.frame(&input, FRAME_MS);
        assert!(out.events.is_empty());
        assert!(session.pointer_down(Vec2::ZERO).is_empty());
    }
    let after = serde_json::to_string(session.state()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn level_up_carries_experience_and_heals() {
    let mut state = playing(Variant::Final, 3);
    state.player.experience = 90.0;
    state.player.health = 95.0;
    let pos = state.player.pos + Vec2::new(300.0, 0.0);
    state.spawn_enemy(EnemyArchetype::Sniper, pos);
    state.enemies[0].health = 1.0;
    let enemy_pos = state.enemies[0].pos;
    state.spawn_projectile(Owner::Player, enemy_pos, 0.0, 0.0, 10.0);

    let input = still(&state);
    let events = tick(&mut state, &input, 1.0);

    assert_eq!(state.player.level, 2);
    assert!((state.player.experience - 10.0).abs() < 1e-4);
    assert!((state.player.experience_to_next - 150.0).abs() < 1e-4);
    // 95 + 20 bonus capped at 100
    assert_eq!(state.player.health, state.player.max_health);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count(),
        1
    );
}

#[test]
fn fifth_level_brings_exactly_one_boss_and_halts_spawning() {
    let mut state = playing(Variant::Final, 8);
    state.player.level = 4;
    state.player.experience = state.player.experience_to_next;
    let input = still(&state);
    tick(&mut state, &input, 1.0);
    assert_eq!(state.player.level, 5);
    assert!(state.boss_pending);

    let outcome = spawn_tick(&mut state);
    let SpawnOutcome::Boss { id: boss_id } = outcome else {
        panic!("expected a boss, got {:?}", outcome);
    };
    assert_eq!(state.enemies.len(), 1);

    // Long stretch of wall time: nothing else spawns while the boss lives
    for _ in 0..20 {
        spawner::advance(&mut state, 1000.0);
    }
    assert_eq!(state.enemies.len(), 1);
    assert!(state.spawner.is_suspended());

    // Kill the boss and regular spawning resumes after the delay
    let boss_pos = state.enemies[0].pos;
    state.enemies[0].health = 1.0;
    state.spawn_projectile(Owner::Player, boss_pos, 0.0, 0.0, 10.0);
    state.player.shield = 1000.0;
    let input = still(&state);
    let events = tick(&mut state, &input, 1.0);
    assert!(events.contains(&GameEvent::BossDefeated { id: boss_id }));
    assert!(!state.boss_active);

    let delay = state.config.boss_resume_delay_ms;
    spawner::advance(&mut state, delay - 1.0);
    assert!(state.enemies.is_empty());
    spawner::advance(&mut state, 1.0);
    assert_eq!(state.enemies.len(), 1);
    assert_ne!(state.enemies[0].archetype, EnemyArchetype::Boss);
}

#[test]
fn shield_absorbs_every_hit() {
    let mut state = playing(Variant::Final, 4);
    state.player.shield = 500.0;
    let pos = state.player.pos;
    state.spawn_enemy(EnemyArchetype::Tank, pos);
    state.spawn_enemy(EnemyArchetype::Hunter, pos);
    for _ in 0..10 {
        state.spawn_projectile(Owner::Enemy, pos, 0.0, 0.0, 10.0);
    }

    for _ in 0..100 {
        let input = still(&state);
        tick(&mut state, &input, 1.0);
    }
    assert_eq!(state.player.health, state.player.max_health);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn classic_variant_plays_like_the_first_iteration() {
    let mut session = Session::new(
        SimConfig::preset(Variant::Classic),
        21,
        Box::new(MemoryStore::default()),
    )
    .unwrap();
    session.start();
    session.frame(&TickInput::default(), FRAME_MS);
    let state = session.state();
    assert_eq!(state.enemies.len(), 1);
    assert_eq!(state.enemies[0].archetype, EnemyArchetype::Hunter);

    let target = state.enemies[0].pos;
    for _ in 0..3 {
        session.pointer_down(target);
    }
    assert_eq!(session.state().bullets.len(), 3);
}
