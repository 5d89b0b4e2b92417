//! Tests for the public dice engine API

use bevy::prelude::*;
use bevy_loaded_dice::prelude::*;
use bevy_loaded_dice::{build_die_geometry, BLANK_SLOT};

#[test]
fn test_dice_type_max_values() {
    assert_eq!(DiceType::D4.max_value(), 4);
    assert_eq!(DiceType::D6.max_value(), 6);
    assert_eq!(DiceType::D8.max_value(), 8);
    assert_eq!(DiceType::D10.max_value(), 10);
    assert_eq!(DiceType::D12.max_value(), 12);
    assert_eq!(DiceType::D20.max_value(), 20);
}

#[test]
fn test_dice_type_names() {
    assert_eq!(DiceType::D4.name(), "D4");
    assert_eq!(DiceType::D6.name(), "D6");
    assert_eq!(DiceType::D8.name(), "D8");
    assert_eq!(DiceType::D10.name(), "D10");
    assert_eq!(DiceType::D12.name(), "D12");
    assert_eq!(DiceType::D20.name(), "D20");
}

#[test]
fn test_dice_type_parse_valid() {
    assert_eq!(DiceType::parse("d4"), Some(DiceType::D4));
    assert_eq!(DiceType::parse("D4"), Some(DiceType::D4));
    assert_eq!(DiceType::parse("d6"), Some(DiceType::D6));
    assert_eq!(DiceType::parse("D6"), Some(DiceType::D6));
    assert_eq!(DiceType::parse("d8"), Some(DiceType::D8));
    assert_eq!(DiceType::parse("d10"), Some(DiceType::D10));
    assert_eq!(DiceType::parse("d12"), Some(DiceType::D12));
    assert_eq!(DiceType::parse("d20"), Some(DiceType::D20));
    assert_eq!(DiceType::parse("D20"), Some(DiceType::D20));
}

#[test]
fn test_dice_type_parse_invalid() {
    assert_eq!(DiceType::parse("d3"), None);
    assert_eq!(DiceType::parse("d100"), None);
    assert_eq!(DiceType::parse("invalid"), None);
    assert_eq!(DiceType::parse(""), None);
}

#[test]
fn test_dice_type_equality() {
    assert_eq!(DiceType::D20, DiceType::D20);
    assert_ne!(DiceType::D20, DiceType::D6);
}

#[test]
fn test_every_die_type_builds_chamfered_geometry() {
    for die_type in DiceType::ALL {
        let geometry = build_die_geometry(die_type, 0.35);
        let n = die_type.max_value() as usize;
        assert_eq!(geometry.layout.slot_normals.len(), n, "{}", die_type.name());

        // Chamfering adds edge and corner fillers on top of the value faces.
        let value_triangles = geometry
            .layout
            .triangle_slots
            .iter()
            .filter(|&&s| s != BLANK_SLOT)
            .count();
        let filler_triangles = geometry.layout.triangle_slots.len() - value_triangles;
        assert!(value_triangles >= n, "{}", die_type.name());
        assert!(filler_triangles > 0, "{}", die_type.name());
    }
}

#[test]
fn test_any_physical_outcome_can_display_any_target() {
    let rotations = [
        Quat::IDENTITY,
        Quat::from_rotation_x(2.2),
        Quat::from_euler(EulerRot::XYZ, 1.0, 4.2, 0.3),
        Quat::from_euler(EulerRot::XYZ, 5.8, 2.4, 3.3),
    ];
    for die_type in DiceType::ALL {
        let layout = build_die_geometry(die_type, 0.35).layout;
        for rotation in rotations {
            for target in 1..=die_type.max_value() {
                let mut die = Die::new(die_type, layout.clone());
                let landed_on = die.upper_face(rotation);
                die.remap_face_values(target, landed_on);
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
fn test_remap_with_current_value_changes_nothing() {
    for die_type in DiceType::ALL {
        let layout = build_die_geometry(die_type, 0.35).layout;
        let mut die = Die::new(die_type, layout);
        let current = die.upper_face(Quat::IDENTITY);
        die.remap_face_values(current, current);
        assert_eq!(die.upper_face(Quat::IDENTITY), current);
        assert!(!die.labels_dirty());
    }
}

#[test]
fn test_throw_state_rejects_overlapping_throws() {
    let mut state = ThrowState::default();
    assert!(!state.throw_in_progress());
    assert!(state.try_begin().is_ok());
    assert!(state.throw_in_progress());
    assert_eq!(state.try_begin(), Err(ThrowError::ThrowInProgress));
}

#[test]
fn test_settle_tuning_defaults_are_sane() {
    let tuning = SettleTuning::default();
    assert!(tuning.stillness_limit > 0.0);
    assert!(tuning.stable_steps > 1);
}
