//! Face label atlas addressing
//!
//! Labels live in a single 5x5 texture atlas supplied by the host: cell 0 is
//! blank (used by chamfer filler faces), cells 1..=20 hold the numerals, and
//! cells 21..=24 hold the four D4 corner-triple layouts.

pub const ATLAS_COLS: u32 = 5;
pub const ATLAS_ROWS: u32 = 5;
pub const CELL_SIZE: f32 = 128.0;
const ATLAS_SIZE: f32 = ATLAS_COLS as f32 * CELL_SIZE;

/// First atlas cell of the D4 corner-triple block.
pub const D4_TRIPLE_BASE_CELL: u32 = 20;

/// What a single die face displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceLabel {
    /// Chamfer filler; shows the bare die material.
    Blank,
    Number(u32),
    /// D4 layout: the logical face value plus the three corner numerals
    /// actually printed on the face.
    Corners { value: u32, shows: [u32; 3] },
}

impl FaceLabel {
    pub fn atlas_cell(&self) -> u32 {
        match self {
            FaceLabel::Blank => 0,
            FaceLabel::Number(value) => *value,
            FaceLabel::Corners { value, .. } => D4_TRIPLE_BASE_CELL + value,
        }
    }
}

/// UV rectangle of an atlas cell as `(u_min, v_min, u_max, v_max)`.
pub fn atlas_uv_rect(cell: u32) -> (f32, f32, f32, f32) {
    let idx = cell.min(ATLAS_COLS * ATLAS_ROWS - 1);
    let col = idx % ATLAS_COLS;
    let row = idx / ATLAS_COLS;

    let px0 = col as f32 * CELL_SIZE;
    let py0 = row as f32 * CELL_SIZE;

    // Inset by 1 px to avoid bleeding.
    let inset = 1.0;

    let u0 = (px0 + inset) / ATLAS_SIZE;
    let u1 = (px0 + CELL_SIZE - inset) / ATLAS_SIZE;

    // Bevy UV space uses v=1 at the top.
    let v_top = 1.0 - (py0 + inset) / ATLAS_SIZE;
    let v_bottom = 1.0 - (py0 + CELL_SIZE - inset) / ATLAS_SIZE;

    (u0, v_bottom, u1, v_top)
}

/// Map a unit-square coordinate (0..1 within a face) into an atlas cell.
pub fn cell_uv(cell: u32, unit: [f32; 2]) -> [f32; 2] {
    let (u0, v0, u1, v1) = atlas_uv_rect(cell);
    [
        u0 + (u1 - u0) * unit[0].clamp(0.0, 1.0),
        v0 + (v1 - v0) * unit[1].clamp(0.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atlas_rects_stay_inside_their_cell() {
        for cell in 0..(ATLAS_COLS * ATLAS_ROWS) {
            let (u0, v0, u1, v1) = atlas_uv_rect(cell);
            assert!(u0 < u1);
            assert!(v0 < v1);
            assert!((0.0..=1.0).contains(&u0) && (0.0..=1.0).contains(&u1));
            assert!((0.0..=1.0).contains(&v0) && (0.0..=1.0).contains(&v1));
            // Cell footprint, ignoring the bleed inset.
            assert!((u1 - u0) < 1.0 / ATLAS_COLS as f32);
        }
    }

    #[test]
    fn test_distinct_cells_do_not_overlap() {
        let (a0, _, a1, _) = atlas_uv_rect(1);
        let (b0, _, b1, _) = atlas_uv_rect(2);
        assert!(a1 <= b0 || b1 <= a0);
    }

    #[test]
    fn test_label_cells() {
        assert_eq!(FaceLabel::Blank.atlas_cell(), 0);
        assert_eq!(FaceLabel::Number(20).atlas_cell(), 20);
        assert_eq!(
            FaceLabel::Corners { value: 3, shows: [2, 1, 4] }.atlas_cell(),
            23
        );
    }

    #[test]
    fn test_cell_uv_clamps_oversized_labels() {
        // Negative label insets push unit coordinates past the square; the
        // atlas lookup must not bleed into a neighboring cell.
        let inside = cell_uv(7, [0.5, 0.5]);
        let clamped = cell_uv(7, [1.3, -0.2]);
        let (u0, v0, u1, v1) = atlas_uv_rect(7);
        for uv in [inside, clamped] {
            assert!(uv[0] >= u0 && uv[0] <= u1);
            assert!(uv[1] >= v0 && uv[1] <= v1);
        }
    }
}
