//! Die type catalog
//!
//! Static, hand-authored data for the six supported polyhedral dice:
//! base vertices, face cycles with their value slots, chamfer ratio,
//! scale, mass tuning, and the label layout per type.

use bevy::prelude::*;

use crate::labels::FaceLabel;

/// Material slot reserved for chamfer filler faces (edge quads, corner caps).
pub const BLANK_SLOT: u32 = 0;

/// All supported dice types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiceType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

/// One face of a base polyhedron: an ordered vertex-index cycle plus the
/// material slot it feeds. Slot 0 is the blank slot; slots `1..=n` carry
/// face values (initially slot `s` displays value `s`).
pub struct FaceDef {
    pub cycle: &'static [usize],
    pub slot: u32,
}

/// Immutable per-type record. One instance per die type, created at compile
/// time, never mutated.
pub struct DieTypeSpec {
    /// Base polyhedron vertices; normalized onto the unit sphere by the
    /// geometry builder before scaling.
    pub vertices: &'static [[f32; 3]],
    pub faces: &'static [FaceDef],
    /// Chamfer ratio in (0, 1]; 1.0 keeps the sharp solid.
    pub chamfer: f32,
    /// Uniform scale relative to the shared base radius.
    pub scale: f32,
    pub face_count: u32,
    pub mass: f32,
    /// Rotational sluggishness hint; only shapes the seeded angular launch
    /// speed, Rapier derives the actual tensor from the hull.
    pub inertia_hint: f32,
    /// UV margin around each face label (negative bleeds past the cell).
    pub label_inset: f32,
    /// Rotation applied to the label within its face.
    pub label_angle: f32,
    /// The D4 is read from the face resting on the table, not the top one.
    pub invert_upside: bool,
}

impl DiceType {
    pub const ALL: [DiceType; 6] = [
        DiceType::D4,
        DiceType::D6,
        DiceType::D8,
        DiceType::D10,
        DiceType::D12,
        DiceType::D20,
    ];

    pub fn max_value(&self) -> u32 {
        self.spec().face_count
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiceType::D4 => "D4",
            DiceType::D6 => "D6",
            DiceType::D8 => "D8",
            DiceType::D10 => "D10",
            DiceType::D12 => "D12",
            DiceType::D20 => "D20",
        }
    }

    pub fn parse(s: &str) -> Option<DiceType> {
        match s.to_lowercase().as_str() {
            "d4" => Some(DiceType::D4),
            "d6" => Some(DiceType::D6),
            "d8" => Some(DiceType::D8),
            "d10" => Some(DiceType::D10),
            "d12" => Some(DiceType::D12),
            "d20" => Some(DiceType::D20),
            _ => None,
        }
    }

    pub fn color(&self) -> Color {
        // Slightly translucent crystal-like colors
        match self {
            DiceType::D4 => Color::srgba(0.3, 0.4, 0.9, 0.92), // Blue crystal
            DiceType::D6 => Color::srgba(0.1, 0.1, 0.1, 0.95), // Black/smoke crystal
            DiceType::D8 => Color::srgba(0.6, 0.2, 0.8, 0.92), // Purple crystal
            DiceType::D10 => Color::srgba(0.95, 0.95, 0.95, 0.92), // White/clear crystal
            DiceType::D12 => Color::srgba(0.95, 0.5, 0.1, 0.92), // Orange crystal
            DiceType::D20 => Color::srgba(0.95, 0.85, 0.2, 0.92), // Yellow crystal
        }
    }

    pub fn spec(&self) -> &'static DieTypeSpec {
        match self {
            DiceType::D4 => &D4_SPEC,
            DiceType::D6 => &D6_SPEC,
            DiceType::D8 => &D8_SPEC,
            DiceType::D10 => &D10_SPEC,
            DiceType::D12 => &D12_SPEC,
            DiceType::D20 => &D20_SPEC,
        }
    }

    /// Label shown for a given face value. Numeric everywhere except the D4,
    /// which prints the three corner values of each face and is read at the
    /// antipodal (resting) face.
    pub fn label_for_face(&self, value: u32) -> FaceLabel {
        let n = self.max_value();
        assert!(
            (1..=n).contains(&value),
            "{} has no face value {value}",
            self.name()
        );
        match self {
            DiceType::D4 => FaceLabel::Corners {
                value,
                shows: D4_CORNER_TRIPLES[(value - 1) as usize],
            },
            _ => FaceLabel::Number(value),
        }
    }
}

/// Corner triples printed on each D4 face, indexed by face value - 1. A face
/// sits opposite its own vertex, so it shows the other three values; the
/// rolled value is the one shared by all three standing faces.
const D4_CORNER_TRIPLES: [[u32; 3]; 4] = [[2, 4, 3], [1, 3, 4], [2, 1, 4], [1, 2, 3]];

const PI: f32 = std::f32::consts::PI;

static D4_SPEC: DieTypeSpec = DieTypeSpec {
    vertices: &[[1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
    faces: &[
        FaceDef { cycle: &[1, 0, 2], slot: 1 },
        FaceDef { cycle: &[0, 1, 3], slot: 2 },
        FaceDef { cycle: &[0, 3, 2], slot: 3 },
        FaceDef { cycle: &[1, 2, 3], slot: 4 },
    ],
    chamfer: 0.96,
    scale: 1.2,
    face_count: 4,
    mass: 300.0,
    inertia_hint: 5.0,
    label_inset: -0.1,
    label_angle: PI * 7.0 / 6.0,
    invert_upside: true,
};

static D6_SPEC: DieTypeSpec = DieTypeSpec {
    vertices: &[
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ],
    faces: &[
        FaceDef { cycle: &[0, 3, 2, 1], slot: 1 },
        FaceDef { cycle: &[1, 2, 6, 5], slot: 2 },
        FaceDef { cycle: &[0, 1, 5, 4], slot: 3 },
        FaceDef { cycle: &[3, 7, 6, 2], slot: 4 },
        FaceDef { cycle: &[0, 4, 7, 3], slot: 5 },
        FaceDef { cycle: &[4, 5, 6, 7], slot: 6 },
    ],
    chamfer: 0.96,
    scale: 0.9,
    face_count: 6,
    mass: 300.0,
    inertia_hint: 13.0,
    label_inset: 0.1,
    label_angle: PI / 4.0,
    invert_upside: false,
};

static D8_SPEC: DieTypeSpec = DieTypeSpec {
    vertices: &[
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, -1.0],
    ],
    faces: &[
        FaceDef { cycle: &[0, 2, 1], slot: 1 },
        FaceDef { cycle: &[1, 2, 3], slot: 2 },
        FaceDef { cycle: &[3, 2, 4], slot: 3 },
        FaceDef { cycle: &[4, 2, 0], slot: 4 },
        FaceDef { cycle: &[0, 1, 5], slot: 5 },
        FaceDef { cycle: &[1, 3, 5], slot: 6 },
        FaceDef { cycle: &[3, 4, 5], slot: 7 },
        FaceDef { cycle: &[4, 0, 5], slot: 8 },
    ],
    chamfer: 0.965,
    scale: 1.0,
    face_count: 8,
    mass: 340.0,
    inertia_hint: 7.0,
    label_inset: 0.0,
    label_angle: -PI / 8.0,
    invert_upside: false,
};

// Pentagonal trapezohedron: ten staggered equator vertices (cos/sin of 36°
// steps, alternating above and below the midplane) plus the two poles. The
// ten value faces run equator-to-pole; the zigzag band between them is
// filled with blank triangles.
static D10_SPEC: DieTypeSpec = DieTypeSpec {
    vertices: &[
        [1.0, 0.0, -0.105],
        [0.809017, 0.587785, 0.105],
        [0.309017, 0.951057, -0.105],
        [-0.309017, 0.951057, 0.105],
        [-0.809017, 0.587785, -0.105],
        [-1.0, 0.0, 0.105],
        [-0.809017, -0.587785, -0.105],
        [-0.309017, -0.951057, 0.105],
        [0.309017, -0.951057, -0.105],
        [0.809017, -0.587785, 0.105],
        [0.0, 0.0, -1.0],
        [0.0, 0.0, 1.0],
    ],
    faces: &[
        FaceDef { cycle: &[5, 7, 11], slot: 1 },
        FaceDef { cycle: &[4, 2, 10], slot: 2 },
        FaceDef { cycle: &[1, 3, 11], slot: 3 },
        FaceDef { cycle: &[0, 8, 10], slot: 4 },
        FaceDef { cycle: &[7, 9, 11], slot: 5 },
        FaceDef { cycle: &[8, 6, 10], slot: 6 },
        FaceDef { cycle: &[9, 1, 11], slot: 7 },
        FaceDef { cycle: &[2, 0, 10], slot: 8 },
        FaceDef { cycle: &[3, 5, 11], slot: 9 },
        FaceDef { cycle: &[6, 4, 10], slot: 10 },
        FaceDef { cycle: &[1, 0, 2], slot: BLANK_SLOT },
        FaceDef { cycle: &[1, 2, 3], slot: BLANK_SLOT },
        FaceDef { cycle: &[3, 2, 4], slot: BLANK_SLOT },
        FaceDef { cycle: &[3, 4, 5], slot: BLANK_SLOT },
        FaceDef { cycle: &[5, 4, 6], slot: BLANK_SLOT },
        FaceDef { cycle: &[5, 6, 7], slot: BLANK_SLOT },
        FaceDef { cycle: &[7, 6, 8], slot: BLANK_SLOT },
        FaceDef { cycle: &[7, 8, 9], slot: BLANK_SLOT },
        FaceDef { cycle: &[9, 8, 0], slot: BLANK_SLOT },
        FaceDef { cycle: &[9, 0, 1], slot: BLANK_SLOT },
    ],
    chamfer: 0.945,
    scale: 0.9,
    face_count: 10,
    mass: 350.0,
    inertia_hint: 9.0,
    label_inset: 0.0,
    label_angle: PI * 6.0 / 5.0,
    invert_upside: false,
};

// Dodecahedron, golden-ratio construction: p = (1 + sqrt 5) / 2, q = 1 / p.
const P: f32 = 1.618034;
const Q: f32 = 0.618034;

static D12_SPEC: DieTypeSpec = DieTypeSpec {
    vertices: &[
        [0.0, Q, P],
        [0.0, Q, -P],
        [0.0, -Q, P],
        [0.0, -Q, -P],
        [P, 0.0, Q],
        [P, 0.0, -Q],
        [-P, 0.0, Q],
        [-P, 0.0, -Q],
        [Q, P, 0.0],
        [Q, -P, 0.0],
        [-Q, P, 0.0],
        [-Q, -P, 0.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
    ],
    faces: &[
        FaceDef { cycle: &[2, 14, 4, 12, 0], slot: 1 },
        FaceDef { cycle: &[15, 9, 11, 19, 3], slot: 2 },
        FaceDef { cycle: &[16, 10, 17, 7, 6], slot: 3 },
        FaceDef { cycle: &[6, 7, 19, 11, 18], slot: 4 },
        FaceDef { cycle: &[6, 18, 2, 0, 16], slot: 5 },
        FaceDef { cycle: &[18, 11, 9, 14, 2], slot: 6 },
        FaceDef { cycle: &[1, 17, 10, 8, 13], slot: 7 },
        FaceDef { cycle: &[1, 13, 5, 15, 3], slot: 8 },
        FaceDef { cycle: &[13, 8, 12, 4, 5], slot: 9 },
        FaceDef { cycle: &[5, 4, 14, 9, 15], slot: 10 },
        FaceDef { cycle: &[0, 12, 8, 10, 16], slot: 11 },
        FaceDef { cycle: &[3, 19, 7, 17, 1], slot: 12 },
    ],
    chamfer: 0.968,
    scale: 0.9,
    face_count: 12,
    mass: 350.0,
    inertia_hint: 8.0,
    label_inset: 0.2,
    label_angle: -PI / 8.0,
    invert_upside: false,
};

// Icosahedron, golden-ratio construction.
static D20_SPEC: DieTypeSpec = DieTypeSpec {
    vertices: &[
        [-1.0, P, 0.0],
        [1.0, P, 0.0],
        [-1.0, -P, 0.0],
        [1.0, -P, 0.0],
        [0.0, -1.0, P],
        [0.0, 1.0, P],
        [0.0, -1.0, -P],
        [0.0, 1.0, -P],
        [P, 0.0, -1.0],
        [P, 0.0, 1.0],
        [-P, 0.0, -1.0],
        [-P, 0.0, 1.0],
    ],
    faces: &[
        FaceDef { cycle: &[0, 11, 5], slot: 1 },
        FaceDef { cycle: &[0, 5, 1], slot: 2 },
        FaceDef { cycle: &[0, 1, 7], slot: 3 },
        FaceDef { cycle: &[0, 7, 10], slot: 4 },
        FaceDef { cycle: &[0, 10, 11], slot: 5 },
        FaceDef { cycle: &[1, 5, 9], slot: 6 },
        FaceDef { cycle: &[5, 11, 4], slot: 7 },
        FaceDef { cycle: &[11, 10, 2], slot: 8 },
        FaceDef { cycle: &[10, 7, 6], slot: 9 },
        FaceDef { cycle: &[7, 1, 8], slot: 10 },
        FaceDef { cycle: &[3, 9, 4], slot: 11 },
        FaceDef { cycle: &[3, 4, 2], slot: 12 },
        FaceDef { cycle: &[3, 2, 6], slot: 13 },
        FaceDef { cycle: &[3, 6, 8], slot: 14 },
        FaceDef { cycle: &[3, 8, 9], slot: 15 },
        FaceDef { cycle: &[4, 9, 5], slot: 16 },
        FaceDef { cycle: &[2, 4, 11], slot: 17 },
        FaceDef { cycle: &[6, 2, 10], slot: 18 },
        FaceDef { cycle: &[8, 6, 7], slot: 19 },
        FaceDef { cycle: &[9, 8, 1], slot: 20 },
    ],
    chamfer: 0.955,
    scale: 1.0,
    face_count: 20,
    mass: 400.0,
    inertia_hint: 6.0,
    label_inset: -0.2,
    label_angle: -PI / 8.0,
    invert_upside: false,
};
