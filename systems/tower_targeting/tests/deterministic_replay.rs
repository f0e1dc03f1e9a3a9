use std::time::Duration;

use neon_path_core::{CellCoord, Command, EnemyId, GameConfig, TowerKind, TowerTarget};
use neon_path_system_tower_targeting::TowerTargeting;
use neon_path_world::{self as world, query, World};

const STEP: Duration = Duration::from_millis(50);

#[test]
fn replaying_a_wave_yields_identical_assignments() {
    let first = replay(120);
    let second = replay(120);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first.iter().any(|frame| !frame.is_empty()),
        "the gunner should acquire a target during the replay"
    );
}

#[test]
fn assignments_stay_within_effective_range_and_pick_the_nearest() {
    let mut world = World::new(GameConfig::default()).expect("stock config");
    let mut events = Vec::new();
    let _ = world::place_tower(&mut world, TowerKind::Gunner, CellCoord::new(2, 4), &mut events)
        .expect("placement succeeds");
    let _ = world::start_next_wave(&mut world, &mut events).expect("wave starts");

    let mut targeting = TowerTargeting::new();
    let mut targets = Vec::new();
    for _ in 0..200 {
        world::apply(&mut world, Command::Tick { dt: STEP }, &mut events);

        let towers = query::tower_view(&world);
        let enemies = query::enemy_view(&world);
        targeting.handle(&towers, &enemies, &mut targets);

        for target in &targets {
            let tower = towers.get(target.tower).expect("targeting tower exists");
            let chosen = target.enemy_position.distance(tower.position);
            assert!(chosen <= tower.effective.range);
            for enemy in enemies.iter().filter(|enemy| enemy.is_living()) {
                assert!(enemy.position.distance(tower.position) >= chosen);
            }
        }
    }
}

fn replay(steps: usize) -> Vec<Vec<(u32, EnemyId)>> {
    let mut world = World::new(GameConfig::default()).expect("stock config");
    let mut events = Vec::new();
    let _ = world::place_tower(&mut world, TowerKind::Gunner, CellCoord::new(2, 4), &mut events)
        .expect("placement succeeds");
    let _ = world::start_next_wave(&mut world, &mut events).expect("wave starts");

    let mut targeting = TowerTargeting::new();
    let mut targets: Vec<TowerTarget> = Vec::new();
    let mut frames = Vec::with_capacity(steps);
    for _ in 0..steps {
        world::apply(&mut world, Command::Tick { dt: STEP }, &mut events);
        targeting.handle(
            &query::tower_view(&world),
            &query::enemy_view(&world),
            &mut targets,
        );
        frames.push(
            targets
                .iter()
                .map(|target| (target.tower.get(), target.enemy))
                .collect(),
        );
    }
    frames
}
