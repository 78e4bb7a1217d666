//! End-to-end combat scenarios through the public API

use glam::Vec2;

use ragdoll_archery::consts::*;
use ragdoll_archery::sim::{
    Arrow, ArrowKind, ArrowState, DamageOutcome, EntityId, GameEvent, GameState, Owner, Ragdoll,
    Role, TickInput, tick, update_arrows,
};
use ragdoll_archery::{HudSnapshot, Tuning};

/// A world with no enemies, no wind and an empty event queue
fn empty_world(seed: u64) -> GameState {
    let mut state = GameState::new(seed, Tuning::default());
    state.enemies.clear();
    state.wind = 0.0;
    state.drain_events();
    state
}

fn silence(ragdoll: &mut Ragdoll) {
    if let Role::Enemy { shoot_cooldown, .. } = &mut ragdoll.role {
        *shoot_cooldown = u32::MAX;
    }
}

/// Add an enemy that never shoots
fn add_enemy(state: &mut GameState, origin: Vec2) -> EntityId {
    let id = state.next_entity_id();
    let ground_y = state.tuning.ground_y;
    let mut enemy = Ragdoll::enemy(id, origin, None, &mut state.rng, ground_y);
    silence(&mut enemy);
    state.enemies.push(enemy);
    id
}

/// Place a player arrow just short of `target`, flying level into it
fn player_arrow_at(state: &GameState, target: Vec2, kind: ArrowKind) -> Arrow {
    let mut arrow = Arrow::new(target - Vec2::new(5.0, 0.0), Vec2::ZERO, kind, Owner::Player);
    // Cancel this tick's gravity so the arrow lands exactly on target
    arrow.vel = Vec2::new(5.0, -state.tuning.gravity);
    arrow
}

fn count_events(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

fn enemy<'a>(state: &'a GameState, id: EntityId) -> &'a Ragdoll {
    state.ragdoll(id).expect("enemy present")
}

#[test]
fn regular_arrows_wound_stick_and_kill_once() {
    let mut state = empty_world(1);
    let id = add_enemy(&mut state, Vec2::new(300.0, 150.0));
    // Keep the wave from being cleared by the kill
    add_enemy(&mut state, Vec2::new(500.0, 150.0));

    for (shot, expected) in [70.0, 40.0, 10.0].into_iter().enumerate() {
        let chest = enemy(&state, id).chest();
        let arrow = player_arrow_at(&state, chest, ArrowKind::Regular);
        state.arrows.push(arrow);
        update_arrows(&mut state);

        assert_eq!(enemy(&state, id).health, expected);
        let stuck = state.arrows.last().expect("arrow kept");
        match stuck.state {
            ArrowState::Stuck(anchor) => assert_eq!(anchor.ragdoll, id),
            other => panic!("shot {shot} not stuck: {other:?}"),
        }
    }
    assert_eq!(state.score, 0);

    // Fourth hit is lethal (3 x 30 leaves 10 health)
    let chest = enemy(&state, id).chest();
    state
        .arrows
        .push(player_arrow_at(&state, chest, ArrowKind::Regular));
    update_arrows(&mut state);
    assert!(enemy(&state, id).dead);
    assert_eq!(enemy(&state, id).health, 0.0);
    assert_eq!(state.score, KILL_BONUS);
    assert_eq!(state.enemies_killed, 1);

    // Corpses are not valid targets; no further scoring
    let chest = enemy(&state, id).chest();
    state
        .arrows
        .push(player_arrow_at(&state, chest, ArrowKind::Regular));
    update_arrows(&mut state);
    assert!(!state.arrows.last().unwrap().is_stuck());
    assert_eq!(state.score, KILL_BONUS);

    let events = state.drain_events();
    assert_eq!(
        count_events(&events, |e| matches!(e, GameEvent::EnemyKilled { .. })),
        1
    );
}

#[test]
fn lethal_damage_on_low_health_signals_once() {
    let mut state = empty_world(2);
    let id = add_enemy(&mut state, Vec2::new(300.0, 150.0));
    add_enemy(&mut state, Vec2::new(500.0, 150.0));
    state.ragdoll_mut(id).unwrap().health = 10.0;

    let chest = enemy(&state, id).chest();
    assert_eq!(
        state.damage_ragdoll(id, 30.0, chest, Vec2::ZERO),
        DamageOutcome::Killed
    );
    let joints = enemy(&state, id).joints.clone();
    assert_eq!(
        state.damage_ragdoll(id, 30.0, chest, Vec2::new(5.0, 0.0)),
        DamageOutcome::AlreadyDead
    );
    assert_eq!(enemy(&state, id).joints, joints);
    assert_eq!(state.score, KILL_BONUS);
}

#[test]
fn arrow_past_bound_is_removed() {
    let mut state = empty_world(3);
    add_enemy(&mut state, Vec2::new(300.0, 150.0));
    let x = state.tuning.arrow_max_x - 2.0;
    state.arrows.push(Arrow::new(
        Vec2::new(x, 50.0),
        Vec2::new(5.0, 0.0),
        ArrowKind::Regular,
        Owner::Player,
    ));
    tick(&mut state, &TickInput::default());
    assert!(state.arrows.is_empty());
}

#[test]
fn split_arrow_never_spawns_grandchildren() {
    let mut state = empty_world(4);
    add_enemy(&mut state, Vec2::new(580.0, 150.0));
    state.arrows.push(Arrow::new(
        Vec2::new(150.0, 100.0),
        Vec2::new(4.0, -6.0),
        ArrowKind::Split,
        Owner::Player,
    ));

    let mut splits = 0;
    let mut max_arrows = 0;
    for _ in 0..120 {
        tick(&mut state, &TickInput::default());
        splits += count_events(&state.drain_events(), |e| {
            matches!(e, GameEvent::ArrowSplit)
        });
        max_arrows = max_arrows.max(state.arrows.len());
    }
    assert_eq!(splits, 1);
    assert_eq!(max_arrows, 3);
}

#[test]
fn firework_detonates_exactly_once() {
    let mut state = empty_world(5);
    add_enemy(&mut state, Vec2::new(580.0, 150.0));
    state.arrows.push(Arrow::new(
        Vec2::new(200.0, 100.0),
        Vec2::new(2.0, -8.0),
        ArrowKind::Firework,
        Owner::Player,
    ));

    let mut explosions = 0;
    for _ in 0..(FIREWORK_FUSE_TICKS * 3) {
        tick(&mut state, &TickInput::default());
        explosions += count_events(&state.drain_events(), |e| {
            matches!(e, GameEvent::FireworkExploded { .. })
        });
    }
    assert_eq!(explosions, 1);
    assert!(state.arrows.is_empty());
}

#[test]
fn firework_explosion_damages_nearby_enemy() {
    let mut state = empty_world(6);
    let id = add_enemy(&mut state, Vec2::new(300.0, 150.0));
    add_enemy(&mut state, Vec2::new(550.0, 150.0));
    let chest = enemy(&state, id).chest();

    let mut arrow = Arrow::new(
        chest - Vec2::new(30.0, 0.0),
        Vec2::ZERO,
        ArrowKind::Firework,
        Owner::Player,
    );
    assert!(arrow.explode(&mut state));
    assert!(!arrow.explode(&mut state));

    let health = enemy(&state, id).health;
    let expected = 100.0 - EXPLOSION_DAMAGE * (1.0 - 30.0 / EXPLOSION_RADIUS);
    assert!((health - expected).abs() < 1e-3, "health {health}");
    // Out of range enemy untouched
    assert_eq!(state.enemies[1].health, 100.0);
}

#[test]
fn weak_release_fires_nothing() {
    let mut state = empty_world(7);
    add_enemy(&mut state, Vec2::new(580.0, 150.0));
    assert!(state.select_arrow_type(ArrowKind::Fire));
    let ammo = state.ammo.clone();

    tick(
        &mut state,
        &TickInput {
            begin_charge: true,
            ..Default::default()
        },
    );
    // One tick of charge is below the minimum shot power
    assert!(state.charge_power < state.tuning.min_shot_power);
    tick(
        &mut state,
        &TickInput {
            release: true,
            ..Default::default()
        },
    );
    assert!(state.arrows.is_empty());
    assert_eq!(state.ammo, ammo);
    assert!(!state.is_charging);
}

#[test]
fn selecting_depleted_type_is_rejected() {
    let mut state = empty_world(8);
    state.ammo.fire = 0;
    tick(
        &mut state,
        &TickInput {
            select_arrow: Some(ArrowKind::Fire),
            ..Default::default()
        },
    );
    assert_eq!(state.selected_arrow, ArrowKind::Regular);
}

#[test]
fn special_ammo_runs_out() {
    let mut state = empty_world(9);
    add_enemy(&mut state, Vec2::new(580.0, 150.0));
    state.mouse_pos = Vec2::new(400.0, 0.0);
    assert!(state.select_arrow_type(ArrowKind::Firework));

    let mut fired = 0;
    for _ in 0..START_AMMO_FIREWORK + 2 {
        state.is_charging = true;
        state.charge_power = 30.0;
        if state.release_shot() {
            fired += 1;
        }
    }
    assert_eq!(fired, START_AMMO_FIREWORK);
    assert_eq!(state.ammo.firework, 0);
}

#[test]
fn corpse_and_its_arrows_removed_after_death_window() {
    let mut state = empty_world(10);
    let id = add_enemy(&mut state, Vec2::new(300.0, 150.0));
    add_enemy(&mut state, Vec2::new(500.0, 150.0));

    let chest = enemy(&state, id).chest();
    state
        .arrows
        .push(player_arrow_at(&state, chest, ArrowKind::Regular));
    update_arrows(&mut state);
    assert!(state.arrows[0].is_stuck());

    let chest = enemy(&state, id).chest();
    state.damage_ragdoll(id, 500.0, chest, Vec2::ZERO);

    for _ in 0..DEATH_WINDOW_TICKS {
        tick(&mut state, &TickInput::default());
    }
    assert!(state.ragdoll(id).is_some());
    assert!(state.arrows.iter().any(|a| a.is_stuck()));

    tick(&mut state, &TickInput::default());
    assert!(state.ragdoll(id).is_none());
    assert!(!state.arrows.iter().any(|a| a.is_stuck()));
}

#[test]
fn cleared_wave_respawns_bigger() {
    let mut state = GameState::new(11, Tuning::default());
    let ids: Vec<_> = state.enemies.iter().map(|e| e.id).collect();
    for id in ids {
        let chest = enemy(&state, id).chest();
        state.damage_ragdoll(id, 500.0, chest, Vec2::ZERO);
    }
    assert_eq!(state.score, 2 * KILL_BONUS);

    tick(&mut state, &TickInput::default());
    assert_eq!(state.wave_number, 2);
    for _ in 0..WAVE_RESPAWN_TICKS {
        tick(&mut state, &TickInput::default());
    }
    assert_eq!(state.living_enemies(), 3);
    let hud = HudSnapshot::capture(&state);
    assert_eq!(hud.wave, 2);
    assert_eq!(hud.enemies_killed, 2);
}

#[test]
fn player_death_ends_game_and_cancels_respawn() {
    let mut state = GameState::new(12, Tuning::default());
    let ids: Vec<_> = state.enemies.iter().map(|e| e.id).collect();
    for id in ids {
        let chest = enemy(&state, id).chest();
        state.damage_ragdoll(id, 500.0, chest, Vec2::ZERO);
    }
    tick(&mut state, &TickInput::default());
    assert!(state.wave_respawn.is_some());

    let player = state.player.as_ref().unwrap();
    let (pid, chest) = (player.id, player.chest());
    state.damage_ragdoll(pid, 500.0, chest, Vec2::ZERO);
    assert!(state.game_over);

    for _ in 0..WAVE_RESPAWN_TICKS + 5 {
        tick(
            &mut state,
            &TickInput {
                begin_charge: true,
                ..Default::default()
            },
        );
    }
    assert!(!state.is_charging);
    assert_eq!(state.living_enemies(), 0);
    let hud = HudSnapshot::capture(&state);
    assert!(hud.game_over);
    assert_eq!(hud.final_score, Some(2 * KILL_BONUS));
}

#[test]
fn arrow_landing_after_game_over_keeps_final_score() {
    let mut state = empty_world(13);
    let id = add_enemy(&mut state, Vec2::new(300.0, 150.0));
    state.enemies[0].health = 10.0;

    let player = state.player.as_ref().unwrap();
    let (pid, chest) = (player.id, player.chest());
    state.damage_ragdoll(pid, 500.0, chest, Vec2::ZERO);
    assert!(state.game_over);

    // An arrow still in the air finishes off the enemy
    let chest = enemy(&state, id).chest();
    state
        .arrows
        .push(player_arrow_at(&state, chest, ArrowKind::Regular));
    update_arrows(&mut state);
    assert!(enemy(&state, id).dead);

    let events = state.drain_events();
    let final_scores: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::GameOver { final_score } => Some(*final_score),
            _ => None,
        })
        .collect();
    assert_eq!(final_scores, vec![0]);
    assert_eq!(
        count_events(&events, |e| matches!(e, GameEvent::EnemyKilled { .. })),
        0
    );
    assert_eq!(state.score, 0);
    assert_eq!(HudSnapshot::capture(&state).final_score, Some(0));
}

#[test]
fn same_seed_same_world() {
    fn run(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        for t in 0..900u32 {
            let input = TickInput {
                pointer: Some(Vec2::new(450.0, 100.0 + (t % 50) as f32)),
                begin_charge: t % 60 == 0,
                release: t % 60 == 40,
                select_arrow: (t % 240 == 0).then_some(ArrowKind::Split),
                restart: false,
            };
            tick(&mut state, &input);
        }
        state
    }

    let a = run(99);
    let b = run(99);
    assert_eq!(a.time_ticks, b.time_ticks);
    assert_eq!(a.score, b.score);
    assert_eq!(a.wind, b.wind);
    assert_eq!(a.arrows.len(), b.arrows.len());
    assert_eq!(a.particles.len(), b.particles.len());
    assert_eq!(a.enemies.len(), b.enemies.len());
    assert_eq!(a.ammo, b.ammo);
    let joints = |s: &GameState| s.player.as_ref().map(|p| p.joints.clone());
    assert_eq!(joints(&a), joints(&b));
    for (ea, eb) in a.enemies.iter().zip(b.enemies.iter()) {
        assert_eq!(ea.joints, eb.joints);
        assert_eq!(ea.health, eb.health);
    }
}

#[test]
fn ragdolls_stay_above_ground() {
    let mut state = GameState::new(13, Tuning::default());
    for _ in 0..600 {
        tick(&mut state, &TickInput::default());
    }
    let ground = state.tuning.ground_y;
    for ragdoll in state.player.iter().chain(state.enemies.iter()) {
        for joint in ragdoll.joints.iter() {
            assert!(joint.pos.y <= ground);
            assert!(joint.pos.is_finite());
        }
    }
}
