//! # Box Mesh
//!
//! Closed box used for parts made of a single node.

use config::constants::SUBDIVIDED_BOX_RATIO;
use glam::DVec3;

const SUBDIVIDED_BOX_VERTICES: [[f64; 3]; 26] = [
    [-0.025357, -0.025357, 0.025357],
    [-0.025357, 0.025357, 0.025357],
    [-0.025357, 0.025357, -0.025357],
    [-0.025357, -0.025357, -0.025357],
    [0.025357, -0.025357, 0.025357],
    [0.025357, -0.025357, -0.025357],
    [0.025357, 0.025357, 0.025357],
    [0.025357, 0.025357, -0.025357],
    [-0.030913, -0.030913, 0.0],
    [-0.030913, 0.0, 0.030913],
    [-0.030913, 0.030913, 0.0],
    [-0.030913, 0.0, -0.030913],
    [0.030913, -0.030913, 0.0],
    [0.0, -0.030913, 0.030913],
    [0.0, -0.030913, -0.030913],
    [0.030913, 0.0, 0.030913],
    [0.0, 0.030913, 0.030913],
    [0.030913, 0.030913, 0.0],
    [0.030913, 0.0, -0.030913],
    [0.0, 0.030913, -0.030913],
    [-0.042574, 0.0, 0.0],
    [0.0, -0.042574, 0.0],
    [0.0, 0.0, 0.042574],
    [0.042574, 0.0, 0.0],
    [0.0, 0.0, -0.042574],
    [0.0, 0.042574, 0.0],
];

// One-based, as authored.
const SUBDIVIDED_BOX_FACES: [[usize; 4]; 24] = [
    [1, 10, 21, 9],
    [10, 2, 11, 21],
    [21, 11, 3, 12],
    [9, 21, 12, 4],
    [5, 14, 22, 13],
    [14, 1, 9, 22],
    [22, 9, 4, 15],
    [13, 22, 15, 6],
    [1, 14, 23, 10],
    [14, 5, 16, 23],
    [23, 16, 7, 17],
    [10, 23, 17, 2],
    [7, 16, 24, 18],
    [16, 5, 13, 24],
    [24, 13, 6, 19],
    [18, 24, 19, 8],
    [4, 12, 25, 15],
    [12, 3, 20, 25],
    [25, 20, 8, 19],
    [15, 25, 19, 6],
    [2, 17, 26, 11],
    [17, 7, 18, 26],
    [26, 18, 8, 20],
    [11, 26, 20, 3],
];

/// Builds a box around `position`.
///
/// Without subdivision this is an axis-aligned cube of half size `radius`
/// made of six quads; with subdivision a rounded 24-quad box is used.
pub fn build_box_mesh(position: DVec3, radius: f64, subdivided: bool) -> (Vec<DVec3>, Vec<Vec<usize>>) {
    if subdivided {
        let ratio = SUBDIVIDED_BOX_RATIO * radius;
        let vertices = SUBDIVIDED_BOX_VERTICES
            .iter()
            .map(|v| DVec3::from_array(*v) * ratio + position)
            .collect();
        let faces = SUBDIVIDED_BOX_FACES
            .iter()
            .map(|face| face.iter().map(|i| i - 1).collect())
            .collect();
        return (vertices, faces);
    }

    let begin = [
        DVec3::new(-radius, -radius, radius),
        DVec3::new(radius, -radius, radius),
        DVec3::new(radius, radius, radius),
        DVec3::new(-radius, radius, radius),
    ];
    let end_z = DVec3::new(0.0, 0.0, -2.0 * radius);
    let end = [begin[0] + end_z, begin[3] + end_z, begin[2] + end_z, begin[1] + end_z];
    let vertices: Vec<DVec3> = begin.iter().chain(end.iter()).map(|v| *v + position).collect();

    let begin_loop = [0, 1, 2, 3];
    let aligned_end_loop = [4, 7, 6, 5];
    let mut faces = vec![begin_loop.to_vec(), vec![4, 5, 6, 7]];
    for i in 0..begin_loop.len() {
        let j = (i + 1) % begin_loop.len();
        faces.push(vec![
            begin_loop[j],
            begin_loop[i],
            aligned_end_loop[i],
            aligned_end_loop[j],
        ]);
    }
    (vertices, faces)
}
