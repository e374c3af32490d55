//! Chunk Mesher - face-culled surface extraction
//!
//! Emits one quad per voxel face that borders a non-opaque cell. Faces on
//! the X/Z chunk border look into the neighbor chunk when one is supplied,
//! so adjacent chunks do not render walls against each other.

use bytemuck::{Pod, Zeroable};
use terrane_procedural::chunk::{Chunk, Voxel, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME};
use tracing::debug;

// =============================================================================
// VERTEX FORMAT - Position + normal, tightly packed
// =============================================================================

/// Mesh vertex in chunk-local space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position [x, y, z], 0-16 / 0-256 / 0-16.
    pub position: [f32; 3],
    /// Outward face normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Floats per vertex.
    pub const FLOATS: usize = 6;
}

// =============================================================================
// MESH OUTPUT - Vertex + index buffers
// =============================================================================

/// Complete mesh data for a chunk (vertices + indices).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex buffer data, four per quad.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer data, six per quad.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Empty mesh with room for `faces` quads.
    #[must_use]
    pub fn with_face_capacity(faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(faces * 4),
            indices: Vec::with_capacity(faces * 6),
        }
    }

    /// Check if mesh is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get vertex count
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get quad (face) count
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Interleaved vertex data, [`MeshVertex::FLOATS`] floats per vertex.
    #[must_use]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(corners.map(|position| MeshVertex { position, normal }));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

// =============================================================================
// FACES
// =============================================================================

/// One of the six axis-aligned voxel faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// +X
    Right,
    /// -X
    Left,
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// +Z
    Front,
    /// -Z
    Back,
}

impl Face {
    /// Emission order.
    pub const ALL: [Self; 6] = [
        Self::Right,
        Self::Left,
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
    ];

    /// Offset to the cell this face looks into.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::Right => [1, 0, 0],
            Self::Left => [-1, 0, 0],
            Self::Top => [0, 1, 0],
            Self::Bottom => [0, -1, 0],
            Self::Front => [0, 0, 1],
            Self::Back => [0, 0, -1],
        }
    }

    /// Outward unit normal.
    #[inline]
    #[must_use]
    pub fn normal(self) -> [f32; 3] {
        let [x, y, z] = self.offset();
        [x as f32, y as f32, z as f32]
    }

    /// Unit-cube corners, counter-clockwise seen from outside.
    #[must_use]
    pub const fn corners(self) -> [[u8; 3]; 4] {
        match self {
            Self::Right => [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]],
            Self::Left => [[0, 0, 0], [0, 0, 1], [0, 1, 1], [0, 1, 0]],
            Self::Top => [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]],
            Self::Bottom => [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
            Self::Front => [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]],
            Self::Back => [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]],
        }
    }
}

// =============================================================================
// NEIGHBORS
// =============================================================================

/// The four horizontally adjacent chunks, borrowed for one meshing pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkNeighbors<'a> {
    /// Chunk at -X.
    pub left: Option<&'a Chunk>,
    /// Chunk at +X.
    pub right: Option<&'a Chunk>,
    /// Chunk at -Z.
    pub back: Option<&'a Chunk>,
    /// Chunk at +Z.
    pub front: Option<&'a Chunk>,
}

impl ChunkNeighbors<'_> {
    /// No neighbors: every border face is exposed.
    pub const NONE: Self = Self {
        left: None,
        right: None,
        back: None,
        front: None,
    };
}

#[inline]
fn voxel_at(chunk: &Chunk, x: usize, y: usize, z: usize) -> Voxel {
    chunk.voxels()[Chunk::index(x, y, z)]
}

// =============================================================================
// MESHER
// =============================================================================

/// Builds chunk meshes.
pub struct ChunkMesher;

impl ChunkMesher {
    const EDGE: i32 = CHUNK_SIZE as i32 - 1;

    /// Meshes a chunk on its own; border faces are always emitted.
    #[must_use]
    pub fn generate(chunk: &Chunk) -> ChunkMesh {
        Self::generate_with_neighbors(chunk, &ChunkNeighbors::NONE)
    }

    /// Meshes a chunk, culling border faces against the given neighbors.
    #[must_use]
    pub fn generate_with_neighbors(chunk: &Chunk, neighbors: &ChunkNeighbors<'_>) -> ChunkMesh {
        // A quarter of the volume solid, three visible faces each
        let mut mesh = ChunkMesh::with_face_capacity(CHUNK_VOLUME / 4 * 3);

        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    if !voxel_at(chunk, x, y, z).is_solid() {
                        continue;
                    }
                    for face in Face::ALL {
                        if Self::is_exposed(chunk, neighbors, x, y, z, face) {
                            let origin = [x as f32, y as f32, z as f32];
                            let corners = face.corners().map(|c| {
                                [
                                    origin[0] + f32::from(c[0]),
                                    origin[1] + f32::from(c[1]),
                                    origin[2] + f32::from(c[2]),
                                ]
                            });
                            mesh.push_quad(corners, face.normal());
                        }
                    }
                }
            }
        }

        debug!(
            x = chunk.coord().x,
            z = chunk.coord().z,
            quads = mesh.quad_count(),
            "chunk meshed"
        );
        mesh
    }

    /// Rebuilds the mesh of a dirty chunk and clears its dirty flag.
    ///
    /// Returns `None` when the chunk is clean.
    pub fn remesh(chunk: &mut Chunk, neighbors: &ChunkNeighbors<'_>) -> Option<ChunkMesh> {
        if !chunk.is_dirty() {
            return None;
        }
        let mesh = Self::generate_with_neighbors(chunk, neighbors);
        chunk.clear_dirty();
        Some(mesh)
    }

    /// Whether `face` of the in-chunk voxel at (x, y, z) borders a
    /// non-opaque cell.
    ///
    /// Above and below the chunk counts as exposed. Across an X/Z border
    /// the neighbor decides; a missing neighbor counts as exposed.
    fn is_exposed(
        chunk: &Chunk,
        neighbors: &ChunkNeighbors<'_>,
        x: usize,
        y: usize,
        z: usize,
        face: Face,
    ) -> bool {
        let [dx, dy, dz] = face.offset();
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        let nz = z as i32 + dz;

        let Ok(ny) = usize::try_from(ny) else {
            return true;
        };
        if ny >= CHUNK_HEIGHT {
            return true;
        }

        let (target, sx, sz) = if nx < 0 {
            (neighbors.left, Self::EDGE, nz)
        } else if nx > Self::EDGE {
            (neighbors.right, 0, nz)
        } else if nz < 0 {
            (neighbors.back, nx, Self::EDGE)
        } else if nz > Self::EDGE {
            (neighbors.front, nx, 0)
        } else {
            (Some(chunk), nx, nz)
        };

        !target.is_some_and(|c| voxel_at(c, sx as usize, ny, sz as usize).is_opaque())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrane_procedural::chunk::ChunkCoord;

    fn chunk_with(cells: &[(usize, usize, usize, Voxel)]) -> Chunk {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        for &(x, y, z, v) in cells {
            chunk.set(x, y, z, v).unwrap();
        }
        chunk
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn test_empty_chunk() {
        let mesh = ChunkMesher::generate(&Chunk::new(ChunkCoord::new(0, 0)));
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_single_voxel() {
        let mesh = ChunkMesher::generate(&chunk_with(&[(8, 100, 8, Voxel::Stone)]));
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.as_floats().len(), 24 * MeshVertex::FLOATS);
    }

    #[test]
    fn test_adjacent_voxels_cull_shared_faces() {
        let chunk = chunk_with(&[(4, 10, 4, Voxel::Stone), (5, 10, 4, Voxel::Dirt)]);
        let mesh = ChunkMesher::generate(&chunk);
        assert_eq!(mesh.quad_count(), 10);
    }

    #[test]
    fn test_water_does_not_cull() {
        let chunk = chunk_with(&[(4, 10, 4, Voxel::Stone), (5, 10, 4, Voxel::Water)]);
        let mesh = ChunkMesher::generate(&chunk);
        // Stone keeps all six, water loses the face against stone
        assert_eq!(mesh.quad_count(), 11);
    }

    #[test]
    fn test_winding_matches_normals() {
        let mesh = ChunkMesher::generate(&chunk_with(&[(3, 3, 3, Voxel::Stone)]));
        for quad in mesh.vertices.chunks_exact(4) {
            let n = cross(
                sub(quad[1].position, quad[0].position),
                sub(quad[2].position, quad[0].position),
            );
            assert_eq!(n, quad[0].normal);
        }
        for (i, quad) in mesh.indices.chunks_exact(6).enumerate() {
            let base = (i * 4) as u32;
            assert_eq!(quad, &[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    #[test]
    fn test_missing_neighbor_exposes_border() {
        let chunk = chunk_with(&[(0, 10, 0, Voxel::Stone)]);
        let mesh = ChunkMesher::generate_with_neighbors(&chunk, &ChunkNeighbors::NONE);
        assert_eq!(mesh.quad_count(), 6);

        let left: Vec<_> = mesh
            .vertices
            .iter()
            .filter(|v| v.normal == [-1.0, 0.0, 0.0])
            .collect();
        assert_eq!(left.len(), 4);
        assert!(left.iter().all(|v| v.position[0] == 0.0));
    }

    #[test]
    fn test_opaque_neighbor_suppresses_border() {
        let chunk = chunk_with(&[(0, 10, 0, Voxel::Stone)]);
        let west = {
            let mut c = Chunk::new(ChunkCoord::new(-1, 0));
            c.set(15, 10, 0, Voxel::Stone).unwrap();
            c
        };
        let north = {
            let mut c = Chunk::new(ChunkCoord::new(0, -1));
            c.set(0, 10, 15, Voxel::Glass).unwrap();
            c
        };
        let neighbors = ChunkNeighbors {
            left: Some(&west),
            back: Some(&north),
            ..ChunkNeighbors::NONE
        };

        let mesh = ChunkMesher::generate_with_neighbors(&chunk, &neighbors);
        // -X culled by stone; glass is see-through so -Z stays
        assert_eq!(mesh.quad_count(), 5);
        assert!(mesh.vertices.iter().all(|v| v.normal != [-1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_far_border_samples_near_edge() {
        let chunk = chunk_with(&[(15, 0, 15, Voxel::Stone)]);
        let east = {
            let mut c = Chunk::new(ChunkCoord::new(1, 0));
            c.set(0, 0, 15, Voxel::Stone).unwrap();
            c
        };
        let south = {
            let mut c = Chunk::new(ChunkCoord::new(0, 1));
            c.set(15, 0, 0, Voxel::Stone).unwrap();
            c
        };
        let neighbors = ChunkNeighbors {
            right: Some(&east),
            front: Some(&south),
            ..ChunkNeighbors::NONE
        };

        // Bottom face at y = 0 is always emitted
        assert_eq!(
            ChunkMesher::generate_with_neighbors(&chunk, &neighbors).quad_count(),
            4
        );
    }

    #[test]
    fn test_exposure_at_chunk_corners() {
        let chunk = chunk_with(&[(0, 0, 0, Voxel::Stone), (15, 255, 15, Voxel::Stone)]);
        let west = {
            let mut c = Chunk::new(ChunkCoord::new(-1, 0));
            c.set(15, 0, 0, Voxel::Stone).unwrap();
            c
        };
        let walled = ChunkNeighbors {
            left: Some(&west),
            ..ChunkNeighbors::NONE
        };
        let open = ChunkNeighbors::NONE;

        assert!(ChunkMesher::is_exposed(&chunk, &open, 0, 0, 0, Face::Left));
        assert!(!ChunkMesher::is_exposed(&chunk, &walled, 0, 0, 0, Face::Left));
        assert!(ChunkMesher::is_exposed(&chunk, &walled, 0, 0, 0, Face::Bottom));
        assert!(ChunkMesher::is_exposed(&chunk, &walled, 0, 0, 0, Face::Back));

        assert!(ChunkMesher::is_exposed(&chunk, &open, 15, 255, 15, Face::Top));
        assert!(ChunkMesher::is_exposed(&chunk, &open, 15, 255, 15, Face::Right));
        assert!(ChunkMesher::is_exposed(&chunk, &open, 15, 255, 15, Face::Front));
        // Left of x = 15 is an in-chunk air cell
        assert!(ChunkMesher::is_exposed(&chunk, &walled, 15, 255, 15, Face::Left));
    }

    #[test]
    fn test_remesh_clears_dirty() {
        let mut chunk = chunk_with(&[(1, 1, 1, Voxel::Grass)]);
        assert!(chunk.is_dirty());

        let mesh = ChunkMesher::remesh(&mut chunk, &ChunkNeighbors::NONE).unwrap();
        assert_eq!(mesh.quad_count(), 6);
        assert!(!chunk.is_dirty());
        assert!(ChunkMesher::remesh(&mut chunk, &ChunkNeighbors::NONE).is_none());

        chunk.set(1, 2, 1, Voxel::Grass).unwrap();
        let mesh = ChunkMesher::remesh(&mut chunk, &ChunkNeighbors::NONE).unwrap();
        assert_eq!(mesh.quad_count(), 10);
    }
}
