//! Physically animated 3D dice that always land on the value you asked for.
//!
//! The host's dice-notation evaluator decides the outcome; this crate's job
//! is purely theatrical: tumble rigid-body dice through a shared Rapier
//! world, detect when the whole batch has truly come to rest, then remap
//! each die's face labels so the face physics happened to leave on top reads
//! the mandated value. No mesh or body ever rotates during the remap, so the
//! illusion of physical causality survives.
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_loaded_dice::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(LoadedDicePlugin)
//!         .add_systems(Startup, throw_a_handful)
//!         .run();
//! }
//!
//! // The values are law; the tumble is for show.
//! fn throw_a_handful(mut throws: MessageWriter<ThrowRequest>) {
//!     throws.write(ThrowRequest {
//!         dice: vec![(DiceType::D20, 17), (DiceType::D6, 3)],
//!     });
//! }
//! ```

pub mod catalog;
pub mod die;
pub mod geometry;
pub mod labels;
pub mod throw;
pub mod tray;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub use catalog::{DiceType, DieTypeSpec, FaceDef, BLANK_SLOT};
pub use die::{Die, MotionVectors};
pub use geometry::{build_die_geometry, DieGeometry, FaceLayout};
pub use labels::FaceLabel;
pub use throw::{
    SettleTuning, ThrowError, ThrowPhase, ThrowRejected, ThrowRequest, ThrowResolved, ThrowState,
};
pub use tray::{DiceMaterials, DiceTray, SurfaceParams, TrayConfig};

pub mod prelude {
    pub use crate::{
        Die, DiceType, FaceLabel, LoadedDicePlugin, SettleTuning, SurfaceParams, ThrowError,
        ThrowPhase, ThrowRejected, ThrowRequest, ThrowResolved, ThrowState, TrayConfig,
    };
}

/// Adds the dice engine to a Bevy app: the Rapier physics world, the tray,
/// and the throw state machine. The plugin owns the physics integration;
/// hosts must not add a second `RapierPhysicsPlugin`.
pub struct LoadedDicePlugin;

impl Plugin for LoadedDicePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .init_resource::<throw::ThrowState>()
            .init_resource::<throw::SettleTuning>()
            .init_resource::<tray::TrayConfig>()
            .init_resource::<tray::SurfaceParams>()
            .add_message::<throw::ThrowRequest>()
            .add_message::<throw::ThrowResolved>()
            .add_message::<throw::ThrowRejected>()
            .add_systems(Startup, tray::setup_tray)
            // Launch, settle-track, resolve, then push label rewrites.
            .add_systems(
                Update,
                (
                    throw::begin_throw,
                    throw::track_settling,
                    throw::resolve_throw,
                    die::apply_face_relabels,
                )
                    .chain(),
            );
    }
}
