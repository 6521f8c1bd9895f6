use crate::atomic::Atomic;
use crate::clump::{Clump, GeometryList};
use crate::error::{DffError, Result};
use crate::frame::{FrameList, FrameName};
use crate::geometry::Geometry;
use crate::material::{Material, MaterialList, StringSection, TextureReference};
use crate::mesh::BinMesh;
use crate::plugin::{Breakable, ExtraVertexColor};
use crate::section::{DecodedSection, Section, SectionHeader, SectionType};
use crate::tree::{DecodeContext, SectionTree, SizePolicy};
use log::debug;
use rw_stream::{ReadOutcome, StreamError};
use std::path::Path;

/// A texture bound to a material
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelTexture {
    pub sampler: TextureReference,
    pub name: String,
    pub mask_name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelMaterial {
    pub material: Material,
    pub texture: Option<ModelTexture>,
}

/// A geometry with its materials and extension plugins
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelGeometry {
    pub geometry: Geometry,
    pub material_list: MaterialList,
    pub materials: Vec<ModelMaterial>,
    pub bin_mesh: Option<BinMesh>,
    pub breakable: Option<Breakable>,
    pub extra_vertex_color: Option<ExtraVertexColor>,
}

/// A fully walked model container
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    /// Expanded library version of the clump header
    pub version: u32,
    pub clump: Clump,
    pub frame_list: FrameList,
    /// Name of each frame, if its extension carried one
    pub frame_names: Vec<Option<String>>,
    pub geometries: Vec<ModelGeometry>,
    pub atomics: Vec<Atomic>,
}

impl Model {
    /// Parse a model from an in-memory container
    pub fn parse(data: &[u8]) -> Result<Self> {
        ModelReader::new(data).read()
    }

    /// Read and parse a model file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data =
            std::fs::read(path).map_err(|err| DffError::FileSystem(path.to_path_buf(), err))?;
        Self::parse(&data)
    }

    /// Names of every texture referenced by the model's materials
    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        self.geometries
            .iter()
            .flat_map(|geometry| geometry.materials.iter())
            .filter_map(|material| material.texture.as_ref())
            .map(|texture| texture.name.as_str())
    }
}

/// Walks a model container in schema order
#[derive(Debug, Clone)]
pub struct ModelReader<'a> {
    tree: SectionTree<'a>,
    context: DecodeContext,
}

impl<'a> ModelReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            tree: SectionTree::new(data),
            context: DecodeContext::default(),
        }
    }

    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.tree = self.tree.with_size_policy(policy);
        self
    }

    pub fn read(mut self) -> Result<Model> {
        let (clump_header, clump) = self.expect::<Clump>(SectionType::Clump)?;
        if clump.light_count != 0 || clump.camera_count != 0 {
            return Err(DffError::UnsupportedSection(
                SectionType::Clump,
                "clumps carrying lights or cameras",
            ));
        }
        debug!(
            "Clump version {:#x} with {} atomics",
            clump_header.version, clump.atomic_count
        );

        let (_, frame_list) = self.expect::<FrameList>(SectionType::FrameList)?;
        let mut frame_names = Vec::new();
        for _ in 0..frame_list.frame_count {
            frame_names.push(self.read_frame_extension()?);
        }

        let (_, geometry_list) = self.expect::<GeometryList>(SectionType::GeometryList)?;
        let mut geometries = Vec::new();
        for index in 0..geometry_list.geometry_count {
            debug!("Reading geometry {index}");
            geometries.push(self.read_geometry()?);
        }

        let mut atomics = Vec::new();
        for _ in 0..clump.atomic_count {
            let (_, atomic) = self.expect::<Atomic>(SectionType::Atomic)?;
            self.read_empty_extension()?;
            atomics.push(atomic);
        }

        self.read_empty_extension()?;

        if let ReadOutcome::Read(trailing) = self.tree.next_section(&self.context)? {
            return Err(DffError::TrailingSection(trailing.header.section_type));
        }

        Ok(Model {
            version: clump_header.version,
            clump,
            frame_list,
            frame_names,
            geometries,
            atomics,
        })
    }

    fn read_frame_extension(&mut self) -> Result<Option<String>> {
        let mut name = None;
        for child in self.read_extension()? {
            match child {
                Section::Frame(FrameName { name: value }) => name = Some(value),
                other => return Err(unexpected_child(&other)),
            }
        }
        Ok(name)
    }

    fn read_geometry(&mut self) -> Result<ModelGeometry> {
        let (_, geometry) = self.expect::<Geometry>(SectionType::Geometry)?;
        let (_, material_list) = self.expect::<MaterialList>(SectionType::MaterialList)?;

        let mut materials = Vec::with_capacity(material_list.slots.len());
        for _ in 0..material_list.slots.len() {
            materials.push(self.read_material()?);
        }

        let mut entry = ModelGeometry {
            material_list,
            materials,
            ..ModelGeometry::default()
        };

        self.context = DecodeContext::with_vertex_count(geometry.vertex_count);
        let children = self.read_extension();
        self.context = DecodeContext::default();

        for child in children? {
            match child {
                Section::BinMesh(mesh) => entry.bin_mesh = Some(mesh),
                Section::Breakable(breakable) => entry.breakable = Some(breakable),
                Section::ExtraVertexColor(colors) => entry.extra_vertex_color = Some(colors),
                other => return Err(unexpected_child(&other)),
            }
        }

        entry.geometry = geometry;
        Ok(entry)
    }

    fn read_material(&mut self) -> Result<ModelMaterial> {
        let (_, material) = self.expect::<Material>(SectionType::Material)?;

        let texture = if material.is_textured {
            let (_, sampler) = self.expect::<TextureReference>(SectionType::Texture)?;
            let (_, name) = self.expect::<StringSection>(SectionType::String)?;
            let (_, mask) = self.expect::<StringSection>(SectionType::String)?;
            self.read_empty_extension()?;
            Some(ModelTexture {
                sampler,
                name: name.value,
                mask_name: mask.value,
            })
        } else {
            None
        };

        self.read_empty_extension()?;
        Ok(ModelMaterial { material, texture })
    }

    /// Read an extension whose children must all be empty extensions
    fn read_empty_extension(&mut self) -> Result<()> {
        match self.read_extension()?.first() {
            Some(child) => Err(unexpected_child(child)),
            None => Ok(()),
        }
    }

    /// Read an extension and every child up to its declared end.
    ///
    /// Nested extension bodies are dropped from the result.
    fn read_extension(&mut self) -> Result<Vec<Section>> {
        let first = self.next_required(SectionType::Extension)?;
        if !first.header.in_extension {
            return Err(DffError::UnexpectedSection {
                expected: SectionType::Extension,
                found: Some(first.header.section_type),
            });
        }

        let end = first.header.outer_end();
        let mut children = Vec::new();
        if !matches!(first.body, Section::Extension(_)) {
            children.push(first.body);
        }

        while self.tree.position() < end {
            let child = self.next_required(SectionType::Extension)?;
            if !matches!(child.body, Section::Extension(_)) {
                children.push(child.body);
            }
        }

        if self.tree.position() > end {
            return Err(StreamError::SizeMismatch {
                offset: first.header.offset,
                declared: first.header.size_2 as usize,
                consumed: self.tree.position() - first.header.offset - rw_stream::ChunkHeader::SIZE,
            }
            .into());
        }

        Ok(children)
    }

    fn next_required(&mut self, expected: SectionType) -> Result<DecodedSection> {
        match self.tree.next_section(&self.context)? {
            ReadOutcome::Read(section) => Ok(section),
            ReadOutcome::EndOfStream => Err(DffError::UnexpectedSection {
                expected,
                found: None,
            }),
        }
    }

    fn expect<T>(&mut self, expected: SectionType) -> Result<(SectionHeader, T)>
    where
        T: TryFrom<Section, Error = DffError>,
    {
        let section = self.next_required(expected)?;
        let body = T::try_from(section.body)?;
        Ok((section.header, body))
    }
}

fn unexpected_child(section: &Section) -> DffError {
    DffError::UnexpectedSection {
        expected: SectionType::Extension,
        found: Some(section.section_type()),
    }
}

/// Parse independent model containers in parallel
#[cfg(feature = "parallel")]
pub fn parse_models_par(inputs: &[&[u8]]) -> Vec<Result<Model>> {
    use rayon::prelude::*;

    inputs.par_iter().map(|data| Model::parse(data)).collect()
}
