//! Chamfered die geometry
//!
//! Builds the render mesh and the convex collision hull for a die type from
//! its catalog data. Each base face is shrunk toward its centroid, the gaps
//! are bridged with edge quads and corner caps, and the result is fan
//! triangulated with per-triangle material slots so the face the physics
//! lands on can be mapped back to a logical value.

use std::sync::Arc;

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::catalog::{DiceType, FaceDef, BLANK_SLOT};
use crate::labels::{cell_uv, FaceLabel};

/// Per-vertex and per-slot bookkeeping for a built mesh. Immutable and shared
/// across every instance of the same die type; label rewrites only combine it
/// with a fresh slot-to-value mapping.
pub struct FaceLayout {
    pub die_type: DiceType,
    /// Material slot of each mesh vertex (3 per triangle, not indexed).
    pub vertex_slots: Vec<u32>,
    /// Position of each mesh vertex inside its label cell, 0..1.
    pub unit_uvs: Vec<[f32; 2]>,
    /// Averaged outward normal per value slot, index `slot - 1`.
    pub slot_normals: Vec<Vec3>,
    /// Material slot of each triangle.
    pub triangle_slots: Vec<u32>,
}

/// Render mesh plus matching collision hull for one die type at one radius.
pub struct DieGeometry {
    pub mesh: Mesh,
    pub collider: Collider,
    pub layout: Arc<FaceLayout>,
}

/// A polyhedron after chamfering: every face cycle references the new
/// per-face vertex copies; filler faces carry the blank slot.
struct ChamferedPoly {
    vertices: Vec<Vec3>,
    faces: Vec<(Vec<usize>, u32)>,
}

/// Build the chamfered mesh and collider for a die type. Pure function of
/// `(die_type, base_radius)`; malformed catalog data panics here rather than
/// producing a die that cannot report its face.
pub fn build_die_geometry(die_type: DiceType, base_radius: f32) -> DieGeometry {
    let spec = die_type.spec();
    let radius = base_radius * spec.scale;

    // Base vertices are authored at arbitrary magnitude; put them on the unit
    // sphere so the chamfer ratio means the same thing for every type.
    let base: Vec<Vec3> = spec
        .vertices
        .iter()
        .map(|v| Vec3::from_array(*v).normalize())
        .collect();

    let mut poly = chamfer_polyhedron(&base, spec.faces, spec.chamfer);
    for v in &mut poly.vertices {
        *v *= radius;
    }

    let collider = Collider::convex_hull(&poly.vertices)
        .unwrap_or_else(|| panic!("{}: degenerate chamfered hull", die_type.name()));

    let (mesh, layout) = build_mesh(die_type, &poly);

    DieGeometry {
        mesh,
        collider,
        layout: Arc::new(layout),
    }
}

/// Recompute the UV attribute for a mesh given the current slot-to-value
/// mapping (`values[slot - 1].1` is the value displayed by that slot).
pub fn label_uvs(layout: &FaceLayout, values: &[(Vec3, u32)]) -> Vec<[f32; 2]> {
    layout
        .vertex_slots
        .iter()
        .zip(&layout.unit_uvs)
        .map(|(&slot, &unit)| {
            let label = if slot == BLANK_SLOT {
                FaceLabel::Blank
            } else {
                layout.die_type.label_for_face(values[(slot - 1) as usize].1)
            };
            cell_uv(label.atlas_cell(), unit)
        })
        .collect()
}

fn chamfer_polyhedron(vertices: &[Vec3], faces: &[FaceDef], chamfer: f32) -> ChamferedPoly {
    assert!(chamfer > 0.0 && chamfer <= 1.0, "chamfer ratio out of range");

    let mut out_vertices: Vec<Vec3> = Vec::new();
    let mut shrunk: Vec<(Vec<usize>, u32)> = Vec::with_capacity(faces.len());
    // For every base vertex, the chamfered copies made from it.
    let mut corner_clusters: Vec<Vec<usize>> = vec![Vec::new(); vertices.len()];

    // 1. Shrink each face toward its centroid, leaving gaps between faces.
    for face in faces {
        let centroid =
            face.cycle.iter().map(|&vi| vertices[vi]).sum::<Vec3>() / face.cycle.len() as f32;
        let mut cycle = Vec::with_capacity(face.cycle.len());
        for &vi in face.cycle {
            let idx = out_vertices.len();
            out_vertices.push(vertices[vi].lerp(centroid, 1.0 - chamfer));
            cycle.push(idx);
            corner_clusters[vi].push(idx);
        }
        shrunk.push((cycle, face.slot));
    }

    // 2. Bridge every shared edge with a quad between the two shrunk faces.
    let mut edge_quads: Vec<[usize; 4]> = Vec::new();
    for i in 0..faces.len() {
        for j in (i + 1)..faces.len() {
            let mut pairs: Vec<usize> = Vec::new();
            let mut last_m: Option<usize> = None;
            for (m, &vi) in faces[i].cycle.iter().enumerate() {
                if let Some(n) = faces[j].cycle.iter().position(|&vj| vj == vi) {
                    let a = shrunk[i].0[m];
                    let b = shrunk[j].0[n];
                    // A shared edge that wraps around the end of cycle i shows
                    // up as non-consecutive hits; keep the edge order intact.
                    if last_m.is_some_and(|lm| m != lm + 1) {
                        pairs.insert(0, b);
                        pairs.insert(0, a);
                    } else {
                        pairs.push(a);
                        pairs.push(b);
                    }
                    last_m = Some(m);
                }
            }
            match pairs.len() {
                // Disjoint faces, or faces meeting only at a corner.
                0 | 2 => continue,
                4 => edge_quads.push([pairs[0], pairs[1], pairs[3], pairs[2]]),
                _ => panic!("malformed face adjacency between faces {i} and {j}"),
            }
        }
    }

    // 3. Cap each original corner, ordering the cluster by walking the edge
    //    quads that already connect its faces.
    let mut caps: Vec<Vec<usize>> = Vec::new();
    for (vi, cluster) in corner_clusters.iter().enumerate() {
        assert!(cluster.len() >= 3, "vertex {vi} belongs to fewer than 3 faces");
        let mut cap = vec![cluster[0]];
        while cap.len() < cluster.len() {
            let current = *cap.last().unwrap();
            let next = edge_quads.iter().find_map(|quad| {
                let p = quad.iter().position(|&x| x == current)?;
                let candidate = quad[(p + 1) % 4];
                (cluster.contains(&candidate) && !cap.contains(&candidate)).then_some(candidate)
            });
            let Some(next) = next else {
                panic!("disconnected corner fan at vertex {vi}");
            };
            cap.push(next);
        }
        caps.push(cap);
    }

    let mut out_faces = shrunk;
    out_faces.extend(edge_quads.iter().map(|q| (q.to_vec(), BLANK_SLOT)));
    out_faces.extend(caps.into_iter().map(|c| (c, BLANK_SLOT)));

    ChamferedPoly {
        vertices: out_vertices,
        faces: out_faces,
    }
}

fn build_mesh(die_type: DiceType, poly: &ChamferedPoly) -> (Mesh, FaceLayout) {
    let spec = die_type.spec();

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut unit_uvs: Vec<[f32; 2]> = Vec::new();
    let mut vertex_slots: Vec<u32> = Vec::new();
    let mut triangle_slots: Vec<u32> = Vec::new();
    let mut slot_normals = vec![Vec3::ZERO; spec.face_count as usize];

    for (cycle, slot) in &poly.faces {
        // Label corners spread around the unit square; the per-type inset and
        // angle place the printed glyph the way the physical die has it.
        let step = std::f32::consts::TAU / cycle.len() as f32;
        let span = 2.0 * (1.0 + spec.label_inset);
        let corner_uv = |k: usize| {
            let angle = spec.label_angle + step * k as f32;
            [
                (angle.cos() + 1.0 + spec.label_inset) / span,
                (angle.sin() + 1.0 + spec.label_inset) / span,
            ]
        };

        for i in 1..cycle.len() - 1 {
            let (a, b, c) = (
                poly.vertices[cycle[0]],
                poly.vertices[cycle[i]],
                poly.vertices[cycle[i + 1]],
            );
            let normal = (b - a).cross(c - a).normalize();

            positions.push(a.to_array());
            positions.push(b.to_array());
            positions.push(c.to_array());
            for _ in 0..3 {
                normals.push(normal.to_array());
                vertex_slots.push(*slot);
            }
            unit_uvs.push(corner_uv(0));
            unit_uvs.push(corner_uv(i));
            unit_uvs.push(corner_uv(i + 1));
            triangle_slots.push(*slot);

            if *slot != BLANK_SLOT {
                slot_normals[(*slot - 1) as usize] += normal;
            }
        }
    }

    for (idx, normal) in slot_normals.iter_mut().enumerate() {
        assert!(
            normal.length_squared() > 0.0,
            "{}: value slot {} produced no triangles",
            die_type.name(),
            idx + 1
        );
        *normal = normal.normalize();
    }

    let layout = FaceLayout {
        die_type,
        vertex_slots,
        unit_uvs,
        slot_normals,
        triangle_slots,
    };

    // Fresh dice display value `s` on slot `s`.
    let initial_values: Vec<(Vec3, u32)> = layout
        .slot_normals
        .iter()
        .enumerate()
        .map(|(i, &n)| (n, i as u32 + 1))
        .collect();
    let uvs = label_uvs(&layout, &initial_values);

    let indices: Vec<u32> = (0..positions.len() as u32).collect();
    let mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices));

    (mesh, layout)
}
