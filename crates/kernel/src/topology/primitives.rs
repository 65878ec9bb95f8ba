use tracing::{info, instrument};

use super::polygon::Polygon;
use super::polyhedron::Polyhedron;
use crate::error::GeometryError;
use crate::geometry::point::Point3;
use crate::geometry::scalar::SafeScalar;
use crate::geometry::vector::Vector3;

const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];

const HEXAHEDRON_FACES: [[usize; 4]; 6] = [
    [0, 1, 5, 4], // +y
    [2, 3, 7, 6], // -y
    [0, 2, 6, 4], // +z
    [1, 3, 7, 5], // -z
    [4, 6, 7, 5], // -x
    [0, 1, 3, 2], // +x
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [2, 1, 4],
    [1, 3, 4],
    [3, 0, 4],
    [0, 2, 5],
    [2, 1, 5],
    [1, 3, 5],
    [3, 0, 5],
];

const DODECAHEDRON_FACES: [[usize; 5]; 12] = [
    [0, 1, 12, 16, 17],
    [0, 2, 8, 10, 16],
    [0, 4, 8, 12, 14],
    [1, 3, 9, 11, 17],
    [1, 5, 9, 12, 14],
    [2, 3, 13, 16, 17],
    [2, 6, 10, 13, 15],
    [3, 7, 11, 13, 15],
    [4, 5, 14, 18, 19],
    [4, 6, 8, 10, 18],
    [5, 7, 9, 11, 19],
    [6, 7, 15, 18, 19],
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 2, 8],
    [7, 10, 11],
    [0, 2, 10],
    [0, 4, 5],
    [0, 4, 8],
    [0, 5, 10],
    [1, 3, 9],
    [1, 3, 11],
    [1, 4, 5],
    [1, 4, 9],
    [1, 5, 11],
    [2, 6, 7],
    [2, 6, 8],
    [2, 7, 10],
    [3, 6, 7],
    [3, 6, 9],
    [3, 7, 11],
    [4, 8, 9],
    [5, 10, 11],
    [6, 8, 9],
];

fn golden_ratio() -> f64 {
    (1.0 + 5f64.sqrt()) / 2.0
}

fn check_edge_length(edge_length: f64) -> Result<(), GeometryError> {
    if SafeScalar::new(edge_length) > SafeScalar::ZERO {
        Ok(())
    } else {
        Err(GeometryError::InvalidParameter {
            parameter: "edge_length",
            value: edge_length,
        })
    }
}

/// Assemble a solid from unit vertex offsets scaled around `center`.
fn build_solid<F: AsRef<[usize]>>(
    center: Point3,
    scale: f64,
    offsets: &[[f64; 3]],
    faces: &[F],
) -> Result<Polyhedron, GeometryError> {
    let vertices: Vec<Point3> = offsets
        .iter()
        .map(|&[x, y, z]| center + Vector3::new(x, y, z) * scale)
        .collect();
    let polygons = faces
        .iter()
        .map(|face| Polygon::new(face.as_ref().iter().map(|&i| vertices[i])))
        .collect::<Result<Vec<_>, _>>()?;
    let solid = Polyhedron::new(polygons)?;
    info!(
        faces = solid.face_count(),
        edges = solid.edge_count(),
        "regular solid assembled"
    );
    Ok(solid)
}

/// Regular tetrahedron with its base parallel to the xy-plane and apex on +z.
#[instrument(skip(center), fields(center = %center))]
pub fn regular_tetrahedron(center: Point3, edge_length: f64) -> Result<Polyhedron, GeometryError> {
    check_edge_length(edge_length)?;
    info!(edge_length, "creating regular tetrahedron");

    let r = edge_length / 3f64.sqrt();
    let low = edge_length * 6f64.sqrt() / 12.0;
    let apex = edge_length * 6f64.sqrt() / 4.0;
    let half_chord = r * 3f64.sqrt() / 2.0;
    let offsets = [
        [0.0, 0.0, apex],
        [r, 0.0, -low],
        [-r / 2.0, half_chord, -low],
        [-r / 2.0, -half_chord, -low],
    ];
    build_solid(center, 1.0, &offsets, &TETRAHEDRON_FACES)
}

/// Axis-aligned cube.
#[instrument(skip(center), fields(center = %center))]
pub fn regular_hexahedron(center: Point3, edge_length: f64) -> Result<Polyhedron, GeometryError> {
    check_edge_length(edge_length)?;
    info!(edge_length, "creating regular hexahedron");

    let offsets = [
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
    ];
    build_solid(center, edge_length / 2.0, &offsets, &HEXAHEDRON_FACES)
}

/// Octahedron with its vertices on the coordinate axes.
#[instrument(skip(center), fields(center = %center))]
pub fn regular_octahedron(center: Point3, edge_length: f64) -> Result<Polyhedron, GeometryError> {
    check_edge_length(edge_length)?;
    info!(edge_length, "creating regular octahedron");

    let offsets = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    build_solid(center, edge_length / 2f64.sqrt(), &offsets, &OCTAHEDRON_FACES)
}

#[instrument(skip(center), fields(center = %center))]
pub fn regular_dodecahedron(center: Point3, edge_length: f64) -> Result<Polyhedron, GeometryError> {
    check_edge_length(edge_length)?;
    info!(edge_length, "creating regular dodecahedron");

    let phi = golden_ratio();
    let inv = 1.0 / phi;
    let offsets = [
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [0.0, inv, phi],
        [0.0, inv, -phi],
        [0.0, -inv, phi],
        [0.0, -inv, -phi],
        [inv, phi, 0.0],
        [inv, -phi, 0.0],
        [-inv, phi, 0.0],
        [-inv, -phi, 0.0],
        [phi, 0.0, inv],
        [phi, 0.0, -inv],
        [-phi, 0.0, inv],
        [-phi, 0.0, -inv],
    ];
    // Unit coordinates have edge length 2/phi = sqrt(5) - 1.
    build_solid(
        center,
        edge_length / (5f64.sqrt() - 1.0),
        &offsets,
        &DODECAHEDRON_FACES,
    )
}

#[instrument(skip(center), fields(center = %center))]
pub fn regular_icosahedron(center: Point3, edge_length: f64) -> Result<Polyhedron, GeometryError> {
    check_edge_length(edge_length)?;
    info!(edge_length, "creating regular icosahedron");

    let phi = golden_ratio();
    let offsets = [
        [0.0, 1.0, phi],
        [0.0, 1.0, -phi],
        [0.0, -1.0, phi],
        [0.0, -1.0, -phi],
        [1.0, phi, 0.0],
        [-1.0, phi, 0.0],
        [1.0, -phi, 0.0],
        [-1.0, -phi, 0.0],
        [phi, 0.0, 1.0],
        [phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
    ];
    build_solid(center, edge_length / 2.0, &offsets, &ICOSAHEDRON_FACES)
}
