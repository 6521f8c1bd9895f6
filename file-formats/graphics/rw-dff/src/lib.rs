//! # RenderWare DFF model parser
//!
//! Decodes the clump/frame/geometry/material tree stored in RenderWare DFF
//! model containers.
//!
//! The container has no fixed schema. Record layouts depend on flag bits in
//! earlier records, and most sections are reached through a wrapper header
//! that names the real type. Two levels of API are provided:
//!
//! - [`SectionTree`]: one decoded section per call, for callers that drive
//!   the walk themselves
//! - [`ModelReader`]: the full schema walk producing a [`Model`]
//!
//! ## Example
//!
//! ```no_run
//! use rw_dff::Model;
//!
//! # fn main() -> Result<(), rw_dff::DffError> {
//! let model = Model::open("infernus.dff")?;
//! println!("Version: {:#x}", model.version);
//! for (index, geometry) in model.geometries.iter().enumerate() {
//!     println!(
//!         "Geometry {index}: {} vertices, {} triangles",
//!         geometry.geometry.vertex_count,
//!         geometry.geometry.triangle_count
//!     );
//! }
//! for texture in model.texture_names() {
//!     println!("Texture: {texture}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Walking sections by hand
//!
//! ```no_run
//! use rw_dff::{DecodeContext, ReadOutcome, SectionTree};
//!
//! # fn main() -> Result<(), rw_dff::DffError> {
//! let data = std::fs::read("infernus.dff").unwrap();
//! let mut tree = SectionTree::new(&data);
//! let context = DecodeContext::default();
//! while let ReadOutcome::Read(section) = tree.next_section(&context)? {
//!     println!("{:?} at {:#x}", section.header.section_type, section.header.offset);
//! }
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod clump;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod model;
pub mod plugin;
pub mod section;
pub mod tree;
pub mod types;

pub use atomic::Atomic;
pub use clump::{Clump, GeometryList};
pub use error::{DffError, Result};
pub use frame::{FrameList, FrameName};
pub use geometry::{Geometry, GeometryFlags, GeometryStage, MorphTarget, Triangle};
pub use material::{Material, MaterialList, StringSection, TextureReference};
pub use mesh::{BinMesh, Mesh};
#[cfg(feature = "parallel")]
pub use model::parse_models_par;
pub use model::{Model, ModelGeometry, ModelMaterial, ModelReader, ModelTexture};
pub use plugin::{Breakable, ExtraVertexColor};
pub use rw_stream::{LibraryVersion, ReadOutcome, expand_version};
pub use section::{DecodedSection, Extension, Section, SectionHeader, SectionType};
pub use tree::{DecodeContext, SectionTree, SizePolicy};
pub use types::{Rgba, Sphere};
