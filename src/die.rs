//! Die instances
//!
//! The `Die` component couples one generated geometry to one rigid body. It
//! owns the slot-to-value mapping that decides which label each physical face
//! shows, the up-face query, and the motion snapshot pair the orchestrator
//! uses to pin a die at its exact rest pose.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::catalog::DiceType;
use crate::geometry::{label_uvs, FaceLayout};

/// Component attached to each die entity
#[derive(Component)]
pub struct Die {
    pub die_type: DiceType,
    /// Outward normal and currently displayed value per slot, index `slot - 1`.
    pub face_normals: Vec<(Vec3, u32)>,
    pub layout: Arc<FaceLayout>,
    /// Consecutive simulation steps below the stillness threshold.
    pub stable_streak: u32,
    pub simulation_running: bool,
    labels_dirty: bool,
}

impl Die {
    pub fn new(die_type: DiceType, layout: Arc<FaceLayout>) -> Self {
        // Fresh dice display value `s` on slot `s`.
        let face_normals = layout
            .slot_normals
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, i as u32 + 1))
            .collect();
        Self {
            die_type,
            face_normals,
            layout,
            stable_streak: 0,
            // Instances only come into being at launch time.
            simulation_running: true,
            labels_dirty: false,
        }
    }

    /// Determine the face value a viewer reads off a die with the given
    /// orientation: the slot whose world-space normal points closest to up
    /// (closest to down for the D4, which is read at the resting face).
    /// Read-only; only meaningful once the body is at rest.
    pub fn upper_face(&self, rotation: Quat) -> u32 {
        let up = if self.die_type.spec().invert_upside {
            Vec3::NEG_Y
        } else {
            Vec3::Y
        };

        let mut best_value = 1;
        let mut best_dot = -2.0_f32;
        for (normal, value) in &self.face_normals {
            let dot = (rotation * *normal).dot(up);
            if dot > best_dot {
                best_dot = dot;
                best_value = *value;
            }
        }
        best_value
    }

    /// Shift every displayed value around the face cycle so the face that
    /// currently reads `current` reads `target` instead. Blank filler
    /// triangles are unaffected. Moves labels only; the mesh and body never
    /// rotate, which is what keeps the rigged outcome visually causal.
    pub fn remap_face_values(&mut self, target: u32, current: u32) {
        let n = self.die_type.max_value();
        assert!(
            (1..=n).contains(&target),
            "{}: target face {target} out of range",
            self.die_type.name()
        );
        assert!(
            (1..=n).contains(&current),
            "{}: current face {current} out of range",
            self.die_type.name()
        );

        let delta = (n + target - current) % n;
        if delta == 0 {
            return;
        }
        for (_, value) in &mut self.face_normals {
            *value = (*value - 1 + delta) % n + 1;
        }
        self.labels_dirty = true;
    }

    pub fn labels_dirty(&self) -> bool {
        self.labels_dirty
    }
}

/// Verbatim capture of a body's motion state, replayed to pin a die at the
/// pose it settled in while its labels are rewritten.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionVectors {
    pub translation: Vec3,
    pub rotation: Quat,
    pub linvel: Vec3,
    pub angvel: Vec3,
}

impl MotionVectors {
    pub fn capture(transform: &Transform, velocity: &Velocity) -> Self {
        Self {
            translation: transform.translation,
            rotation: transform.rotation,
            linvel: velocity.linvel,
            angvel: velocity.angvel,
        }
    }

    pub fn apply(&self, transform: &mut Transform, velocity: &mut Velocity) {
        transform.translation = self.translation;
        transform.rotation = self.rotation;
        velocity.linvel = self.linvel;
        velocity.angvel = self.angvel;
    }
}

/// Push pending label remaps into the mesh assets. Each die owns its mesh, so
/// rewriting the UV attribute relabels exactly one instance.
pub fn apply_face_relabels(
    mut meshes: ResMut<Assets<Mesh>>,
    mut dice: Query<(&mut Die, &Mesh3d)>,
) {
    for (mut die, mesh3d) in dice.iter_mut() {
        if !die.labels_dirty {
            continue;
        }
        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_UV_0,
            label_uvs(&die.layout, &die.face_normals),
        );
        die.labels_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::build_die_geometry;

    fn make_die(die_type: DiceType) -> Die {
        Die::new(die_type, build_die_geometry(die_type, 0.35).layout.clone())
    }

    fn arbitrary_rotations() -> Vec<Quat> {
        vec![
            Quat::IDENTITY,
            Quat::from_rotation_x(1.0),
            Quat::from_rotation_y(2.3) * Quat::from_rotation_z(0.7),
            Quat::from_euler(EulerRot::XYZ, 0.4, 2.9, 5.1),
            Quat::from_euler(EulerRot::XYZ, 3.0, 0.1, 1.7),
        ]
    }

    #[test]
    fn test_upper_face_identity_d6() {
        // Slot 4 of the cube faces +Y and starts out displaying 4.
        let die = make_die(DiceType::D6);
        assert_eq!(die.upper_face(Quat::IDENTITY), 4);
    }

    #[test]
    fn test_remap_with_own_value_is_noop() {
        for die_type in DiceType::ALL {
            let mut die = make_die(die_type);
            let before = die.face_normals.clone();
            let current = die.upper_face(Quat::IDENTITY);
            die.remap_face_values(current, current);
            assert_eq!(die.face_normals, before);
            assert!(!die.labels_dirty());
        }
    }

    #[test]
    fn test_remap_forces_requested_face_everywhere() {
        for die_type in DiceType::ALL {
            for rotation in arbitrary_rotations() {
                for target in 1..=die_type.max_value() {
                    let mut die = make_die(die_type);
                    let current = die.upper_face(rotation);
                    die.remap_face_values(target, current);
                    assert_eq!(
                        die.upper_face(rotation),
                        target,
                        "{} rotated by {rotation:?}",
                        die_type.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_remap_is_a_permutation() {
        let mut die = make_die(DiceType::D20);
        die.remap_face_values(17, 3);
        let mut values: Vec<u32> = die.face_normals.iter().map(|&(_, v)| v).collect();
        values.sort_unstable();
        let expected: Vec<u32> = (1..=20).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_remap_wraps_around_the_cycle() {
        let mut die = make_die(DiceType::D6);
        // Slot 1 starts at 1; shifting 6 -> 1 is a single forward step.
        die.remap_face_values(1, 6);
        assert_eq!(die.face_normals[0].1, 2);
        assert_eq!(die.face_normals[5].1, 1);
    }

    #[test]
    fn test_remap_marks_labels_dirty() {
        let mut die = make_die(DiceType::D8);
        die.remap_face_values(5, 1);
        assert!(die.labels_dirty());
    }

    #[test]
    #[should_panic]
    fn test_remap_rejects_out_of_range_target() {
        let mut die = make_die(DiceType::D6);
        die.remap_face_values(7, 1);
    }

    #[test]
    fn test_motion_vectors_round_trip() {
        let mut transform = Transform::from_xyz(0.4, 1.2, -0.7)
            .with_rotation(Quat::from_rotation_y(1.1));
        let mut velocity = Velocity {
            linvel: Vec3::new(1.0, -2.0, 0.5),
            angvel: Vec3::new(0.1, 4.0, -0.3),
        };
        let snapshot = MotionVectors::capture(&transform, &velocity);

        transform.translation = Vec3::ZERO;
        transform.rotation = Quat::IDENTITY;
        velocity.linvel = Vec3::ZERO;
        velocity.angvel = Vec3::ZERO;

        snapshot.apply(&mut transform, &mut velocity);
        assert_eq!(snapshot, MotionVectors::capture(&transform, &velocity));
    }
}
