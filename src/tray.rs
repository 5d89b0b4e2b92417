//! Dice tray and shared physics context
//!
//! One startup pass configures everything the simulation shares: the tray
//! colliders (floor, four walls, an invisible ceiling so dice cannot bounce
//! out), the contact surface coefficients, and the per-type geometry and
//! material caches that die instances are built from.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::catalog::DiceType;
use crate::die::Die;
use crate::geometry::{build_die_geometry, DieGeometry};

/// Marker component for the tray's static colliders.
#[derive(Component)]
pub struct DiceTray;

/// Tray dimensions and the shared die radius. Geometry is cached against
/// `die_radius` at startup; change it before the app runs, not after.
#[derive(Resource, Clone, Copy)]
pub struct TrayConfig {
    pub half_extent: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    pub floor_thickness: f32,
    pub die_radius: f32,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            half_extent: 2.0,
            wall_height: 1.5,
            wall_thickness: 0.15,
            floor_thickness: 0.3,
            die_radius: 0.35,
        }
    }
}

/// Friction/restitution of one surface kind. Rapier averages the
/// coefficients of both colliders in a contact, so the die<->die,
/// die<->floor and die<->wall pairings fall out of these four entries.
#[derive(Clone, Copy, Debug)]
pub struct ContactSurface {
    pub friction: f32,
    pub restitution: f32,
}

#[derive(Resource, Clone, Copy)]
pub struct SurfaceParams {
    pub die: ContactSurface,
    pub floor: ContactSurface,
    pub wall: ContactSurface,
    pub ceiling: ContactSurface,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            die: ContactSurface { friction: 0.8, restitution: 0.3 },
            floor: ContactSurface { friction: 0.8, restitution: 0.2 },
            wall: ContactSurface { friction: 0.8, restitution: 0.2 },
            // Kill bounces off the ceiling so throws stay inside the tray.
            ceiling: ContactSurface { friction: 0.3, restitution: 0.05 },
        }
    }
}

/// Present once the tray colliders and caches exist. Spawning dice before
/// the shared context is configured is a contract violation.
#[derive(Resource)]
pub struct TrayReady;

/// Chamfered geometry per die type, built once at startup and shared by all
/// instances of that type.
#[derive(Resource)]
pub struct DiceGeometryCache {
    per_type: HashMap<DiceType, DieGeometry>,
}

impl DiceGeometryCache {
    pub fn get(&self, die_type: DiceType) -> &DieGeometry {
        &self.per_type[&die_type]
    }
}

/// Material per die type. Hosts that render labels replace these handles
/// with materials carrying the label atlas texture.
#[derive(Resource)]
pub struct DiceMaterials {
    pub per_type: HashMap<DiceType, Handle<StandardMaterial>>,
}

/// Configure the shared simulation context: tray colliders, contact
/// surfaces, and the geometry/material caches.
pub fn setup_tray(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<TrayConfig>,
    surfaces: Res<SurfaceParams>,
) {
    let extent = config.half_extent;
    let span = extent * 2.0;

    // Floor
    commands.spawn((
        Transform::from_xyz(0.0, -config.floor_thickness / 2.0, 0.0),
        Collider::cuboid(extent, config.floor_thickness / 2.0, extent),
        RigidBody::Fixed,
        Restitution::coefficient(surfaces.floor.restitution),
        Friction::coefficient(surfaces.floor.friction),
        DiceTray,
    ));

    // Walls
    let wall_height = config.wall_height;
    let wall_thickness = config.wall_thickness;
    for (pos, size) in [
        (
            Vec3::new(0.0, wall_height / 2.0, -extent),
            Vec3::new(span + wall_thickness * 2.0, wall_height, wall_thickness),
        ),
        (
            Vec3::new(0.0, wall_height / 2.0, extent),
            Vec3::new(span + wall_thickness * 2.0, wall_height, wall_thickness),
        ),
        (
            Vec3::new(-extent, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height, span),
        ),
        (
            Vec3::new(extent, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height, span),
        ),
    ] {
        commands.spawn((
            Transform::from_translation(pos),
            Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
            RigidBody::Fixed,
            Restitution::coefficient(surfaces.wall.restitution),
            Friction::coefficient(surfaces.wall.friction),
            DiceTray,
        ));
    }

    // Invisible lid flush with the wall tops, so dice cannot bounce out and
    // freshly spawned dice never start inside it.
    commands.spawn((
        Transform::from_xyz(0.0, wall_height + 0.2, 0.0),
        Collider::cuboid(extent + 0.5, 0.2, extent + 0.5),
        RigidBody::Fixed,
        Restitution::coefficient(surfaces.ceiling.restitution),
        Friction::coefficient(surfaces.ceiling.friction),
        DiceTray,
    ));

    let mut per_type = HashMap::new();
    let mut per_type_materials = HashMap::new();
    for die_type in DiceType::ALL {
        per_type.insert(die_type, build_die_geometry(die_type, config.die_radius));
        per_type_materials.insert(
            die_type,
            materials.add(StandardMaterial {
                base_color: die_type.color(),
                alpha_mode: AlphaMode::Blend,
                reflectance: 0.7,
                perceptual_roughness: 0.15,
                ..default()
            }),
        );
    }
    commands.insert_resource(DiceGeometryCache { per_type });
    commands.insert_resource(DiceMaterials {
        per_type: per_type_materials,
    });
    commands.insert_resource(TrayReady);

    info!("dice tray configured ({span}x{span}, walls {wall_height})");
}

/// Grid layout for a batch's drop points, inside the tray and under the
/// ceiling.
pub fn calculate_dice_position(index: usize, total: usize, config: &TrayConfig) -> Vec3 {
    let cols = ((total as f32).sqrt().ceil() as usize).max(1);
    let rows = total.div_ceil(cols);
    let row = index / cols;
    let col = index % cols;

    let spacing = (config.half_extent * 2.0 - 1.0) / cols as f32;
    let start_x = -((cols - 1) as f32 * spacing) / 2.0;
    let start_z = -((rows - 1) as f32 * spacing) / 2.0;

    Vec3::new(
        start_x + col as f32 * spacing,
        config.wall_height - 0.5,
        start_z + row as f32 * spacing,
    )
}

/// Spawn a single die entity with physics and label bookkeeping. Each
/// instance clones the cached base mesh so relabeling one die never touches
/// another.
pub fn spawn_die(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    geometry: &DiceGeometryCache,
    materials: &DiceMaterials,
    surfaces: &SurfaceParams,
    die_type: DiceType,
    position: Vec3,
) -> Entity {
    let prepared = geometry.get(die_type);
    let spec = die_type.spec();

    commands
        .spawn((
            Mesh3d(meshes.add(prepared.mesh.clone())),
            MeshMaterial3d(materials.per_type[&die_type].clone()),
            Transform::from_translation(position),
            RigidBody::Dynamic,
            prepared.collider.clone(),
            Velocity::default(),
            Restitution::coefficient(surfaces.die.restitution),
            Friction::coefficient(surfaces.die.friction),
            ColliderMassProperties::Mass(spec.mass),
            Damping {
                linear_damping: 0.1,
                angular_damping: 0.1,
            },
            Die::new(die_type, prepared.layout.clone()),
        ))
        .id()
}
