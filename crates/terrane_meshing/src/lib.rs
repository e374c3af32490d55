//! # Terrane Meshing
//!
//! Turns generated chunks into vertex and index buffers.
//!
//! ## Example
//!
//! ```rust,ignore
//! use terrane_meshing::{ChunkMesher, ChunkNeighbors};
//!
//! let neighbors = ChunkNeighbors { left: Some(&west), ..ChunkNeighbors::NONE };
//! if let Some(mesh) = ChunkMesher::remesh(&mut chunk, &neighbors) {
//!     upload(mesh.as_floats(), &mesh.indices);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod mesher;

pub use mesher::{ChunkMesh, ChunkMesher, ChunkNeighbors, Face, MeshVertex};
