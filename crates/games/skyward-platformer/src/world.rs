//! One level's worth of simulation state and the per-tick step.

use serde::{Deserialize, Serialize};

use skyward_core::input::InputState;
use skyward_core::math::Rect;

use crate::config::{PhysicsConfig, PlatformerConfig};
use crate::enemy::Enemy;
use crate::error::LevelError;
use crate::events::{SimEvent, TickOutcome};
use crate::items::{Door, Goal, Key};
use crate::level::{EntityKind, LevelData, LevelGrid};
use crate::platform::MovingPlatform;
use crate::player::{Player, PlayerContext};

/// Result of a single [`World::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub outcome: TickOutcome,
    pub events: Vec<SimEvent>,
}

/// Everything that moves or changes during play. Owned by the caller and
/// advanced only through [`World::step`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub level: LevelGrid,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub platforms: Vec<MovingPlatform>,
    pub keys: Vec<Key>,
    pub doors: Vec<Door>,
    pub goal: Option<Goal>,
    physics: PhysicsConfig,
    paused: bool,
    outcome: TickOutcome,
    tick: u64,
}

impl World {
    /// Build a playable world from level data.
    pub fn from_level(data: &LevelData, config: &PlatformerConfig) -> Result<Self, LevelError> {
        let level = data
            .build_grid()?
            .with_crumble_delay(config.crumble_delay_secs);

        let Some(spawn) = data.spawns(EntityKind::Player).next() else {
            return Err(LevelError::MissingEntity("player"));
        };
        if data.spawns(EntityKind::Player).count() > 1 {
            tracing::warn!("Level has several player spawns, using the first");
        }
        let player = Player::spawn(spawn.x, spawn.y, &config.physics);

        let sizes = &config.entities;
        let enemies: Vec<Enemy> = data
            .spawns(EntityKind::Enemy)
            .map(|e| Enemy::spawn(e.x, e.y, &config.enemy))
            .collect();
        let keys: Vec<Key> = data
            .spawns(EntityKind::Key)
            .map(|e| Key::new(Rect::new(e.x, e.y, sizes.key_width, sizes.key_height)))
            .collect();
        let doors: Vec<Door> = data
            .spawns(EntityKind::Door)
            .map(|e| Door::new(Rect::new(e.x, e.y, sizes.door_width, sizes.door_height)))
            .collect();

        let mut goals = data.spawns(EntityKind::Goal);
        let goal = goals
            .next()
            .map(|e| Goal::new(Rect::new(e.x, e.y, sizes.goal_width, sizes.goal_height)));
        if goals.next().is_some() {
            tracing::warn!("Level has several goals, using the first");
        }

        let platforms: Vec<MovingPlatform> = data
            .moving_platforms
            .iter()
            .map(MovingPlatform::from_spawn)
            .collect();

        tracing::info!(
            width = level.width_tiles,
            height = level.height_tiles,
            tiles = level.tiles().len(),
            enemies = enemies.len(),
            platforms = platforms.len(),
            keys = keys.len(),
            doors = doors.len(),
            has_goal = goal.is_some(),
            "Level loaded"
        );

        Ok(Self {
            level,
            player,
            enemies,
            platforms,
            keys,
            doors,
            goal,
            physics: config.physics.clone(),
            paused: false,
            outcome: TickOutcome::Continue,
            tick: 0,
        })
    }

    /// Advance the simulation by one fixed tick of `dt` seconds.
    pub fn step(&mut self, dt: f32, input: &InputState) -> StepReport {
        if self.paused || self.outcome.is_terminal() {
            return StepReport {
                outcome: self.outcome,
                events: Vec::new(),
            };
        }
        if !dt.is_finite() || dt <= 0.0 {
            return StepReport::default();
        }

        let mut events = Vec::new();

        for platform in &mut self.platforms {
            platform.update(dt);
        }

        events.extend(
            self.level
                .update(dt)
                .into_iter()
                .map(|tile| SimEvent::TileCrumbled { tile }),
        );

        let mut ctx = PlayerContext {
            level: &mut self.level,
            platforms: &self.platforms,
            enemies: &mut self.enemies,
            keys: &mut self.keys,
            doors: &mut self.doors,
        };
        let outcome = self
            .player
            .update(dt, input, &mut ctx, &self.physics, &mut events);
        self.tick += 1;

        if outcome.is_terminal() {
            return self.finish(outcome, events);
        }

        for enemy in self.enemies.iter_mut().filter(|e| e.active) {
            enemy.update(dt);
        }

        if self
            .goal
            .as_ref()
            .is_some_and(|goal| goal.reached_by(&self.player.rect()))
        {
            return self.finish(TickOutcome::ReachedGoal, events);
        }

        StepReport {
            outcome: TickOutcome::Continue,
            events,
        }
    }

    fn finish(&mut self, outcome: TickOutcome, mut events: Vec<SimEvent>) -> StepReport {
        self.outcome = outcome;
        tracing::info!(tick = self.tick, ?outcome, "Level attempt finished");
        if outcome == TickOutcome::ReachedGoal {
            events.push(SimEvent::LevelComplete);
        } else {
            events.push(SimEvent::GameOver { outcome });
        }
        StepReport { outcome, events }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The terminal outcome once the attempt has ended, else `Continue`.
    pub fn outcome(&self) -> TickOutcome {
        self.outcome
    }

    /// Number of ticks simulated so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Serialize the whole world with MessagePack.
    pub fn snapshot(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec(self)
    }

    pub fn restore(bytes: &[u8]) -> Result<Self, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{CODE_CRUMBLING, CrumbleState, EntitySpawn, TileKind};
    use crate::test_helpers::{FLOOR_TOP, floored_codes, level_data, spawn};
    use skyward_core::test_helpers::{TICK_60HZ, held, idle};

    fn world(entities: Vec<EntitySpawn>) -> World {
        World::from_level(&level_data(entities), &PlatformerConfig::default()).unwrap()
    }

    fn player_at(x: f32) -> EntitySpawn {
        spawn(EntityKind::Player, x, FLOOR_TOP - 64.0)
    }

    #[test]
    fn missing_player_is_an_error() {
        let err = World::from_level(&level_data(vec![]), &PlatformerConfig::default()).unwrap_err();
        assert_eq!(err, LevelError::MissingEntity("player"));
    }

    #[test]
    fn bad_tile_data_is_an_error() {
        let mut data = level_data(vec![player_at(100.0)]);
        data.tile_data.pop();
        assert!(matches!(
            World::from_level(&data, &PlatformerConfig::default()),
            Err(LevelError::InvalidLevelData { .. })
        ));
    }

    #[test]
    fn spawns_every_entity_kind() {
        let w = world(vec![
            player_at(100.0),
            spawn(EntityKind::Enemy, 300.0, FLOOR_TOP - 32.0),
            spawn(EntityKind::Key, 200.0, FLOOR_TOP - 32.0),
            spawn(EntityKind::Door, 400.0, FLOOR_TOP - 64.0),
            spawn(EntityKind::Goal, 560.0, FLOOR_TOP - 64.0),
        ]);
        assert_eq!(w.player.body.position.x, 100.0);
        assert_eq!(w.enemies.len(), 1);
        assert_eq!(w.keys[0].rect, Rect::new(200.0, FLOOR_TOP - 32.0, 16.0, 32.0));
        assert!(w.doors[0].locked);
        assert!(w.goal.is_some());
        assert_eq!(w.outcome(), TickOutcome::Continue);
    }

    #[test]
    fn reaching_goal_completes_level() {
        let mut w = world(vec![
            player_at(100.0),
            spawn(EntityKind::Goal, 120.0, FLOOR_TOP - 64.0),
        ]);
        let report = w.step(TICK_60HZ, &idle());
        assert_eq!(report.outcome, TickOutcome::ReachedGoal);
        assert_eq!(report.events.last(), Some(&SimEvent::LevelComplete));

        // Finished worlds stay finished.
        let again = w.step(TICK_60HZ, &held(&["ArrowRight"]));
        assert_eq!(again.outcome, TickOutcome::ReachedGoal);
        assert!(again.events.is_empty());
        assert_eq!(w.tick(), 1);
    }

    #[test]
    fn enemy_contact_ends_attempt() {
        let mut w = world(vec![
            player_at(100.0),
            spawn(EntityKind::Enemy, 110.0, FLOOR_TOP - 32.0),
        ]);
        let report = w.step(TICK_60HZ, &idle());
        assert_eq!(report.outcome, TickOutcome::StruckByEnemy);
        assert_eq!(
            report.events.last(),
            Some(&SimEvent::GameOver {
                outcome: TickOutcome::StruckByEnemy
            })
        );
    }

    #[test]
    fn paused_world_does_not_advance() {
        let mut w = world(vec![player_at(100.0)]);
        w.pause();
        let before = w.snapshot().unwrap();
        let report = w.step(TICK_60HZ, &held(&["ArrowRight"]));
        assert_eq!(report, StepReport::default());
        assert_eq!(
            before,
            w.snapshot().unwrap(),
            "a paused step must not change any state"
        );

        w.resume();
        assert!(!w.is_paused());
        w.step(TICK_60HZ, &held(&["ArrowRight"]));
        assert_eq!(w.tick(), 1);
        assert!(w.player.body.position.x > 100.0);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut w = world(vec![player_at(100.0)]);
        let before = w.snapshot().unwrap();
        assert_eq!(w.step(0.0, &held(&["Space"])), StepReport::default());
        assert_eq!(before, w.snapshot().unwrap());
    }

    #[test]
    fn crumbled_floor_drops_player_out_of_world() {
        let mut data = level_data(vec![player_at(96.0)]);
        data.tile_data = floored_codes(20, 15);
        data.tile_data[14 * 20 + 3] = CODE_CRUMBLING;
        let mut w = World::from_level(&data, &PlatformerConfig::default()).unwrap();

        let mut events = Vec::new();
        let mut outcome = TickOutcome::Continue;
        for _ in 0..180 {
            let report = w.step(TICK_60HZ, &idle());
            events.extend(report.events);
            outcome = report.outcome;
            if outcome.is_terminal() {
                break;
            }
        }

        assert!(events.contains(&SimEvent::TileCrumbling { tile: 3 }));
        assert!(events.contains(&SimEvent::TileCrumbled { tile: 3 }));
        assert_eq!(
            w.level.tiles()[3].kind,
            TileKind::Crumbling(CrumbleState::Gone)
        );
        assert_eq!(outcome, TickOutcome::FellOutOfBounds);
        assert_eq!(
            events.last(),
            Some(&SimEvent::GameOver {
                outcome: TickOutcome::FellOutOfBounds
            })
        );
    }

    #[test]
    fn enemies_patrol_during_steps() {
        let mut w = world(vec![
            player_at(20.0),
            spawn(EntityKind::Enemy, 400.0, FLOOR_TOP - 32.0),
        ]);
        for _ in 0..60 {
            w.step(TICK_60HZ, &idle());
        }
        assert!(w.enemies[0].body.position.x > 400.0);
    }

    #[test]
    fn snapshot_restore_resumes_identically() {
        let mut a = world(vec![
            player_at(100.0),
            spawn(EntityKind::Enemy, 400.0, FLOOR_TOP - 32.0),
        ]);
        for _ in 0..10 {
            a.step(TICK_60HZ, &held(&["ArrowRight"]));
        }
        let mut b = World::restore(&a.snapshot().unwrap()).unwrap();
        for _ in 0..10 {
            a.step(TICK_60HZ, &held(&["Space"]));
            b.step(TICK_60HZ, &held(&["Space"]));
        }
        assert_eq!(a.snapshot().unwrap(), b.snapshot().unwrap());
        assert_eq!(a.tick(), 20);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const INPUTS: [&[&str]; 5] = [
            &[],
            &["ArrowLeft"],
            &["ArrowRight"],
            &["Space"],
            &["ArrowRight", "Space"],
        ];

        proptest! {
            #[test]
            fn identical_inputs_give_identical_worlds(
                script in proptest::collection::vec(0usize..INPUTS.len(), 1..120),
            ) {
                let entities = vec![
                    player_at(100.0),
                    spawn(EntityKind::Enemy, 400.0, FLOOR_TOP - 32.0),
                    spawn(EntityKind::Key, 200.0, FLOOR_TOP - 32.0),
                ];
                let mut a = world(entities.clone());
                let mut b = world(entities);
                for &i in &script {
                    let input = held(INPUTS[i]);
                    let ra = a.step(TICK_60HZ, &input);
                    let rb = b.step(TICK_60HZ, &input);
                    prop_assert_eq!(ra, rb);
                }
                prop_assert_eq!(a.snapshot().unwrap(), b.snapshot().unwrap());
            }

            #[test]
            fn player_never_rests_inside_floor(
                script in proptest::collection::vec(0usize..INPUTS.len(), 1..200),
            ) {
                let mut w = world(vec![player_at(300.0)]);
                for &i in &script {
                    w.step(TICK_60HZ, &held(INPUTS[i]));
                    prop_assert!(w.player.body.bottom() <= FLOOR_TOP + 1e-3);
                    if w.player.body.grounded {
                        prop_assert_eq!(w.player.body.velocity.y, 0.0);
                    }
                }
            }
        }
    }
}
