//! Throw orchestration
//!
//! A throw batch moves through `Idle -> Launching -> Simulating -> Settling
//! -> Resolved`. Launching seeds every die with a randomized pose and
//! velocity; the settle tracker counts consecutive still steps per die; once
//! the whole batch agrees, each die's labels are remapped so the face physics
//! left on top reads the value the caller mandated. The tumble is theatre,
//! the number is law.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::catalog::DiceType;
use crate::die::{Die, MotionVectors};
use crate::tray::{
    calculate_dice_position, spawn_die, DiceGeometryCache, DiceMaterials, SurfaceParams,
    TrayConfig, TrayReady,
};

/// Expected, recoverable conditions. Everything else the engine can hit is a
/// configuration bug and panics instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ThrowError {
    #[error("a throw is already in progress")]
    ThrowInProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrowPhase {
    #[default]
    Idle,
    Launching,
    Simulating,
    Settling,
    Resolved,
}

/// Single-writer guard over the shared simulation world: at most one batch
/// is in flight, and its per-die settle bookkeeping lives here.
#[derive(Resource, Default)]
pub struct ThrowState {
    phase: ThrowPhase,
    targets: Vec<(Entity, u32)>,
}

impl ThrowState {
    pub fn phase(&self) -> ThrowPhase {
        self.phase
    }

    pub fn throw_in_progress(&self) -> bool {
        !matches!(self.phase, ThrowPhase::Idle | ThrowPhase::Resolved)
    }

    /// Claim the world for a new batch. Rejected while one is in flight; no
    /// state changes on rejection.
    pub fn try_begin(&mut self) -> Result<(), ThrowError> {
        if self.throw_in_progress() {
            return Err(ThrowError::ThrowInProgress);
        }
        self.phase = ThrowPhase::Launching;
        self.targets.clear();
        Ok(())
    }

    /// The batch's `(die entity, mandated value)` pairs.
    pub fn targets(&self) -> &[(Entity, u32)] {
        &self.targets
    }
}

/// Stillness thresholds. Deliberately plain tunables: verify visually per
/// game rather than deriving them from die count or timestep.
#[derive(Resource, Clone, Copy)]
pub struct SettleTuning {
    /// Velocity magnitude (linear and angular) under which a step counts as
    /// still.
    pub stillness_limit: f32,
    /// Consecutive still steps required of every die in the batch.
    pub stable_steps: u32,
}

impl Default for SettleTuning {
    fn default() -> Self {
        Self {
            stillness_limit: 0.1,
            stable_steps: 50,
        }
    }
}

/// Host request: one die per entry, with the authoritative value it must
/// show. Values come from the host's notation evaluator already validated;
/// an out-of-range value here is a programming error and panics.
#[derive(Message, Clone, Debug, Default)]
pub struct ThrowRequest {
    pub dice: Vec<(DiceType, u32)>,
}

/// The whole batch is at rest and every die shows its mandated value. The
/// values themselves were supplied by the caller, so this carries nothing.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct ThrowResolved;

/// A request arrived while a batch was in flight. The request had no effect;
/// the host may retry after [`ThrowResolved`].
#[derive(Message, Clone, Copy, Debug)]
pub struct ThrowRejected {
    pub error: ThrowError,
}

/// Accept throw requests: clear the previous batch, spawn fresh instances
/// with seeded tumble, record their targets.
#[allow(clippy::too_many_arguments)]
pub fn begin_throw(
    mut commands: Commands,
    mut requests: MessageReader<ThrowRequest>,
    mut rejected: MessageWriter<ThrowRejected>,
    mut resolved: MessageWriter<ThrowResolved>,
    mut throw_state: ResMut<ThrowState>,
    tray_ready: Option<Res<TrayReady>>,
    mut meshes: ResMut<Assets<Mesh>>,
    geometry: Option<Res<DiceGeometryCache>>,
    materials: Option<Res<DiceMaterials>>,
    surfaces: Res<SurfaceParams>,
    config: Res<TrayConfig>,
    existing_dice: Query<Entity, With<Die>>,
) {
    for request in requests.read() {
        if let Err(error) = throw_state.try_begin() {
            warn!("rejecting throw request: {error}");
            rejected.write(ThrowRejected { error });
            continue;
        }

        assert!(
            tray_ready.is_some(),
            "throw requested before the dice tray was set up"
        );
        let (Some(geometry), Some(materials)) = (geometry.as_deref(), materials.as_deref())
        else {
            unreachable!("tray is ready but caches are missing");
        };
        for &(die_type, target) in &request.dice {
            assert!(
                (1..=die_type.max_value()).contains(&target),
                "{} cannot land on {target}",
                die_type.name()
            );
        }

        // The previous batch's instances are despawned; geometry is cached,
        // so rebuilding is cheap and every throw starts from clean state.
        for entity in existing_dice.iter() {
            commands.entity(entity).despawn();
        }

        if request.dice.is_empty() {
            info!("throw with no dice resolves immediately");
            throw_state.phase = ThrowPhase::Resolved;
            resolved.write(ThrowResolved);
            continue;
        }

        let mut rng = rand::thread_rng();
        let count = request.dice.len();
        for (i, &(die_type, target)) in request.dice.iter().enumerate() {
            let spec = die_type.spec();
            let position = calculate_dice_position(i, count, &config)
                + Vec3::new(
                    rng.gen_range(-0.3..0.3),
                    rng.gen_range(-0.2..0.0),
                    rng.gen_range(-0.3..0.3),
                );
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                rng.gen_range(0.0..std::f32::consts::TAU),
                rng.gen_range(0.0..std::f32::consts::TAU),
                rng.gen_range(0.0..std::f32::consts::TAU),
            );

            // Tumble toward the tray center; sluggish types spin slower.
            let toward_center = Vec3::new(-position.x, 0.0, -position.z) * 1.5;
            let spin = 30.0 / spec.inertia_hint;
            let velocity = Velocity {
                linvel: toward_center
                    + Vec3::new(
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.3..0.0),
                        rng.gen_range(-0.5..0.5),
                    ),
                angvel: Vec3::new(
                    rng.gen_range(-spin..spin),
                    rng.gen_range(-spin..spin),
                    rng.gen_range(-spin..spin),
                ),
            };

            let entity = spawn_die(
                &mut commands,
                &mut meshes,
                geometry,
                materials,
                &surfaces,
                die_type,
                position,
            );
            commands.entity(entity).insert((
                Transform::from_translation(position).with_rotation(rotation),
                velocity,
            ));
            throw_state.targets.push((entity, target));
        }

        info!("launched a batch of {count} dice");
        throw_state.phase = ThrowPhase::Simulating;
    }
}

/// One settle-tracking step for a single die.
fn update_streak(streak: u32, velocity: &Velocity, limit: f32) -> u32 {
    if velocity.linvel.length() < limit && velocity.angvel.length() < limit {
        streak + 1
    } else {
        0
    }
}

/// Count consecutive still steps per die. The batch settles only when every
/// die holds its streak; one die pausing mid-bounce must not end the throw.
pub fn track_settling(
    mut throw_state: ResMut<ThrowState>,
    tuning: Res<SettleTuning>,
    mut dice: Query<(&mut Die, &Velocity)>,
) {
    if throw_state.phase != ThrowPhase::Simulating {
        return;
    }

    let mut all_settled = true;
    for (mut die, velocity) in dice.iter_mut() {
        die.stable_streak = update_streak(die.stable_streak, velocity, tuning.stillness_limit);
        if die.stable_streak < tuning.stable_steps {
            all_settled = false;
        }
    }

    if all_settled {
        throw_state.phase = ThrowPhase::Settling;
    }
}

/// Finalize a settled batch: pin each die's rest pose, remap its labels so
/// the upper face reads the mandated value, and hand control back to the
/// host.
pub fn resolve_throw(
    mut throw_state: ResMut<ThrowState>,
    mut resolved: MessageWriter<ThrowResolved>,
    mut dice: Query<(&mut Die, &mut Transform, &mut Velocity)>,
) {
    if throw_state.phase != ThrowPhase::Settling {
        return;
    }

    let targets = std::mem::take(&mut throw_state.targets);
    for (entity, target) in targets {
        let Ok((mut die, mut transform, mut velocity)) = dice.get_mut(entity) else {
            warn!("die despawned mid-throw; skipping its resolution");
            continue;
        };

        // Pin the exact rest pose; any residual drift from the final step is
        // squashed along with the velocities.
        let mut rest = MotionVectors::capture(&transform, &velocity);
        rest.linvel = Vec3::ZERO;
        rest.angvel = Vec3::ZERO;

        let current = die.upper_face(transform.rotation);
        die.remap_face_values(target, current);

        rest.apply(&mut transform, &mut velocity);
        die.simulation_running = false;
    }

    throw_state.phase = ThrowPhase::Resolved;
    info!("throw resolved");
    resolved.write(ThrowResolved);
}
