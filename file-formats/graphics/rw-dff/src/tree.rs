use crate::atomic::Atomic;
use crate::clump::{Clump, GeometryList};
use crate::error::{DffError, Result};
use crate::frame::{FrameList, FrameName};
use crate::geometry::Geometry;
use crate::material::{Material, MaterialList, StringSection, TextureReference};
use crate::mesh::BinMesh;
use crate::plugin::{Breakable, ExtraVertexColor};
use crate::section::{DecodedSection, Extension, Section, SectionHeader, SectionType};
use log::{trace, warn};
use rw_stream::{ChunkHeader, ChunkReader, FieldReader, ReadOutcome, StreamError, ids};

/// How to treat a body decoder that stops short of the declared size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// Fail with a size mismatch
    #[default]
    Strict,
    /// Log a warning and continue after the declared size
    Lenient,
}

/// Values carried from earlier sections into later sibling sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeContext {
    /// Vertex count of the geometry currently being walked
    pub vertex_count: u32,
}

impl DecodeContext {
    pub fn with_vertex_count(vertex_count: u32) -> Self {
        Self { vertex_count }
    }
}

/// Section-at-a-time walker over a model stream.
///
/// The stream has no child counts of its own; callers drive the walk from
/// counts found in parent bodies.
#[derive(Debug, Clone)]
pub struct SectionTree<'a> {
    reader: ChunkReader<'a>,
    policy: SizePolicy,
}

impl<'a> SectionTree<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: ChunkReader::new(data),
            policy: SizePolicy::default(),
        }
    }

    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn size_policy(&self) -> SizePolicy {
        self.policy
    }

    pub fn position(&self) -> usize {
        self.reader.position()
    }

    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Read and decode the next logical section.
    ///
    /// String, breakable and extra vertex color sections carry their body
    /// directly. Every other type is followed by a second header: behind an
    /// extension wrapper that header names the real type, otherwise it is
    /// the struct header that carries the body.
    pub fn next_section(&mut self, context: &DecodeContext) -> Result<ReadOutcome<DecodedSection>> {
        let offset = self.reader.position();
        let first = match self.reader.read_header()? {
            ReadOutcome::Read(header) => header,
            ReadOutcome::EndOfStream => return Ok(ReadOutcome::EndOfStream),
        };
        let first_type = SectionType::try_from(first.type_id)?;

        if first_type == SectionType::TwoDEffect {
            return Err(two_d_effect());
        }

        let header = if first_type.is_unwrapped() {
            SectionHeader::unwrapped(first_type, &first, offset)
        } else if first_type == SectionType::Extension && first.size == 0 {
            SectionHeader {
                section_type: SectionType::Extension,
                size: 0,
                size_2: 0,
                version: first.version(),
                offset,
                in_extension: true,
            }
        } else {
            self.resolve_wrapped(first_type, &first, offset)?
        };

        trace!(
            "{:?} section at {:#x}, body {} bytes",
            header.section_type, offset, header.size
        );

        let body = self.decode_body(&header, context)?;
        Ok(ReadOutcome::Read(DecodedSection { header, body }))
    }

    fn resolve_wrapped(
        &mut self,
        first_type: SectionType,
        first: &ChunkHeader,
        offset: usize,
    ) -> Result<SectionHeader> {
        let is_extension = first_type == SectionType::Extension;
        let second = match self.reader.read_header()? {
            ReadOutcome::Read(header) => header,
            ReadOutcome::EndOfStream => {
                return Err(DffError::UnexpectedSection {
                    expected: if is_extension {
                        SectionType::Extension
                    } else {
                        SectionType::Struct
                    },
                    found: None,
                });
            }
        };

        let section_type = if is_extension {
            SectionType::try_from(second.type_id)?
        } else if second.type_id == ids::STRUCT {
            first_type
        } else {
            return Err(DffError::UnexpectedSection {
                expected: SectionType::Struct,
                found: SectionType::try_from(second.type_id).ok(),
            });
        };

        let header = SectionHeader {
            section_type,
            size: second.size,
            size_2: first.size,
            version: first.version(),
            offset,
            in_extension: is_extension,
        };

        let inner_end = self.reader.position() + second.size as usize;
        if inner_end > header.outer_end() {
            return Err(StreamError::SizeMismatch {
                offset,
                declared: first.size as usize,
                consumed: ChunkHeader::SIZE + second.size as usize,
            }
            .into());
        }

        Ok(header)
    }

    fn decode_body(&mut self, header: &SectionHeader, context: &DecodeContext) -> Result<Section> {
        let size = header.size as usize;
        Ok(match header.section_type {
            SectionType::Extension => Section::Extension(Extension { size: header.size }),
            SectionType::Struct => {
                return Err(DffError::UnsupportedSection(
                    SectionType::Struct,
                    "struct body outside a typed section",
                ));
            }
            SectionType::TwoDEffect => return Err(two_d_effect()),
            SectionType::Clump => Section::Clump(self.decode_with(header, Clump::decode)?),
            SectionType::FrameList => Section::FrameList(self.decode_with(header, FrameList::decode)?),
            SectionType::Frame => {
                Section::Frame(self.decode_with(header, |r| FrameName::decode(r, size))?)
            }
            SectionType::GeometryList => {
                Section::GeometryList(self.decode_with(header, GeometryList::decode)?)
            }
            SectionType::Geometry => Section::Geometry(self.decode_with(header, Geometry::decode)?),
            SectionType::MaterialList => {
                Section::MaterialList(self.decode_with(header, MaterialList::decode)?)
            }
            SectionType::Material => Section::Material(self.decode_with(header, Material::decode)?),
            SectionType::Texture => {
                Section::Texture(self.decode_with(header, TextureReference::decode)?)
            }
            SectionType::String => {
                Section::String(self.decode_with(header, |r| StringSection::decode(r, size))?)
            }
            SectionType::Breakable => {
                if size != 4 {
                    return Err(StreamError::SizeMismatch {
                        offset: header.offset,
                        declared: size,
                        consumed: 4,
                    }
                    .into());
                }
                Section::Breakable(self.decode_with(header, Breakable::decode)?)
            }
            SectionType::BinMesh => Section::BinMesh(self.decode_with(header, BinMesh::decode)?),
            SectionType::ExtraVertexColor => {
                let vertex_count = context.vertex_count as usize;
                Section::ExtraVertexColor(
                    self.decode_with(header, |r| ExtraVertexColor::decode(r, vertex_count))?,
                )
            }
            SectionType::Atomic => Section::Atomic(self.decode_with(header, Atomic::decode)?),
        })
    }

    /// Run a body decoder over exactly the declared body bytes
    fn decode_with<T, E, F>(&mut self, header: &SectionHeader, decode: F) -> Result<T>
    where
        E: Into<DffError>,
        F: FnOnce(&mut FieldReader<'a>) -> std::result::Result<T, E>,
    {
        let mut reader = self.reader.body(header.size as usize)?;
        let value = decode(&mut reader).map_err(|err| match err.into() {
            err @ DffError::Stream(_) => err.with_context(&format!(
                "decoding {:?} section at {:#x}",
                header.section_type, header.offset
            )),
            err => err,
        })?;

        if let Err(err) = reader.finish() {
            match self.policy {
                SizePolicy::Strict => return Err(err.into()),
                SizePolicy::Lenient => {
                    warn!("{err}, skipping to the declared end");
                }
            }
        }

        Ok(value)
    }
}

/// 2D effect entries have no second header to resolve and no decodable body
fn two_d_effect() -> DffError {
    DffError::UnsupportedSection(SectionType::TwoDEffect, "2d effect entries are not decoded")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    const VERSION: u32 = 0x1803_FFFF;

    fn chunk(type_id: u32, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&type_id.to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_wrapped_section_resolves_struct() {
        let data = chunk(0x10, &chunk(ids::STRUCT, &words(&[2, 0, 0])));
        let mut tree = SectionTree::new(&data);

        let section = tree
            .next_section(&DecodeContext::default())
            .unwrap()
            .into_option()
            .unwrap();
        assert_eq!(section.header.section_type, SectionType::Clump);
        assert_eq!(section.header.size, 12);
        assert_eq!(section.header.size_2, 24);
        assert_eq!(section.header.version, 0x36003);
        assert_eq!(section.header.outer_end(), data.len());
        assert!(!section.header.in_extension);
        assert!(matches!(section.body, Section::Clump(Clump { atomic_count: 2, .. })));
    }

    #[test]
    fn test_extension_resolves_inner_type() {
        let data = chunk(ids::EXTENSION, &chunk(0x0253_F2FE, b"wheel_lf"));
        let mut tree = SectionTree::new(&data);

        let section = tree
            .next_section(&DecodeContext::default())
            .unwrap()
            .into_option()
            .unwrap();
        assert_eq!(section.header.section_type, SectionType::Frame);
        assert!(section.header.in_extension);
        assert_eq!(
            section.body,
            Section::Frame(FrameName {
                name: "wheel_lf".to_owned()
            })
        );
    }

    #[test]
    fn test_empty_extension_reads_no_second_header() {
        let mut data = chunk(ids::EXTENSION, &[]);
        data.extend(chunk(0x02, b"next"));
        let mut tree = SectionTree::new(&data);
        let context = DecodeContext::default();

        let empty = tree.next_section(&context).unwrap().into_option().unwrap();
        assert_eq!(empty.body, Section::Extension(Extension { size: 0 }));
        assert_eq!(tree.position(), 12);

        let next = tree.next_section(&context).unwrap().into_option().unwrap();
        assert_eq!(
            next.body,
            Section::String(StringSection {
                value: "next".to_owned()
            })
        );
        assert!(tree.next_section(&context).unwrap().is_end());
    }

    #[test]
    fn test_unwrapped_string_uses_own_size() {
        let data = chunk(0x02, b"body\0\0\0\0");
        let mut tree = SectionTree::new(&data);
        let section = tree
            .next_section(&DecodeContext::default())
            .unwrap()
            .into_option()
            .unwrap();
        assert_eq!(section.header.size, 8);
        assert_eq!(section.header.size_2, 8);
        assert_eq!(tree.remaining(), 0);
    }

    #[test]
    fn test_extra_vertex_color_uses_context() {
        let mut body = words(&[1]);
        body.extend_from_slice(&[9; 12]);
        let data = chunk(0x0253_F2F9, &body);
        let mut tree = SectionTree::new(&data);

        let section = tree
            .next_section(&DecodeContext::with_vertex_count(3))
            .unwrap()
            .into_option()
            .unwrap();
        match section.body {
            Section::ExtraVertexColor(colors) => assert_eq!(colors.colors.len(), 3),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_fails() {
        let data = chunk(0x0253_F2F3, &[0; 4]);
        let mut tree = SectionTree::new(&data);
        assert!(matches!(
            tree.next_section(&DecodeContext::default()),
            Err(DffError::UnknownSectionType(0x0253_F2F3))
        ));
    }

    #[test]
    fn test_two_d_effect_is_unsupported() {
        let data = chunk(0x0253_F2F8, &chunk(ids::STRUCT, &[0; 4]));
        let mut tree = SectionTree::new(&data);
        assert!(matches!(
            tree.next_section(&DecodeContext::default()),
            Err(DffError::UnsupportedSection(SectionType::TwoDEffect, _))
        ));
    }

    #[test]
    fn test_bare_two_d_effect_is_unsupported() {
        let entry = chunk(0x0253_F2F8, &words(&[1, 0, 0, 0]));
        let mut tree = SectionTree::new(&entry);
        assert!(matches!(
            tree.next_section(&DecodeContext::default()),
            Err(DffError::UnsupportedSection(SectionType::TwoDEffect, _))
        ));

        let lone_header = chunk(0x0253_F2F8, &[]);
        let mut tree = SectionTree::new(&lone_header);
        assert!(matches!(
            tree.next_section(&DecodeContext::default()),
            Err(DffError::UnsupportedSection(SectionType::TwoDEffect, _))
        ));
    }

    #[test]
    fn test_two_d_effect_inside_extension_is_unsupported() {
        let data = chunk(ids::EXTENSION, &chunk(0x0253_F2F8, &[0; 8]));
        let mut tree = SectionTree::new(&data);
        assert!(matches!(
            tree.next_section(&DecodeContext::default()),
            Err(DffError::UnsupportedSection(SectionType::TwoDEffect, _))
        ));
    }

    #[test]
    fn test_version_comes_from_outer_header() {
        let mut inner = Vec::new();
        inner.extend_from_slice(&ids::STRUCT.to_le_bytes());
        inner.extend_from_slice(&12u32.to_le_bytes());
        inner.extend_from_slice(&0x0003_1000u32.to_le_bytes());
        inner.extend(words(&[0, 0, 0]));
        let data = chunk(0x10, &inner);

        let section = SectionTree::new(&data)
            .next_section(&DecodeContext::default())
            .unwrap()
            .into_option()
            .unwrap();
        assert_eq!(section.header.version, 0x36003);
    }

    #[test]
    fn test_breakable_size_must_be_four() {
        let data = chunk(0x0253_F2FD, &[0; 8]);
        let mut tree = SectionTree::new(&data);
        assert!(matches!(
            tree.next_section(&DecodeContext::default()),
            Err(DffError::Stream(StreamError::SizeMismatch {
                declared: 8,
                consumed: 4,
                ..
            }))
        ));
    }

    #[test]
    fn test_size_policy() {
        let mut data = chunk(0x14, &chunk(ids::STRUCT, &words(&[0, 0, 5, 0, 0xFF])));
        data.extend(chunk(ids::EXTENSION, &[]));

        let mut strict = SectionTree::new(&data);
        assert!(matches!(
            strict.next_section(&DecodeContext::default()),
            Err(DffError::Stream(StreamError::SizeMismatch {
                declared: 20,
                consumed: 16,
                ..
            }))
        ));

        let mut lenient = SectionTree::new(&data).with_size_policy(SizePolicy::Lenient);
        let atomic = lenient
            .next_section(&DecodeContext::default())
            .unwrap()
            .into_option()
            .unwrap();
        assert!(matches!(atomic.body, Section::Atomic(Atomic { flags: 5, .. })));
        let extension = lenient
            .next_section(&DecodeContext::default())
            .unwrap()
            .into_option()
            .unwrap();
        assert_eq!(extension.header.section_type, SectionType::Extension);
    }

    #[test]
    fn test_inner_size_past_outer_is_rejected() {
        let mut data = chunk(0x14, &chunk(ids::STRUCT, &words(&[0, 0, 0, 0])));
        data[4] = 8;
        let mut tree = SectionTree::new(&data);
        assert!(matches!(
            tree.next_section(&DecodeContext::default()),
            Err(DffError::Stream(StreamError::SizeMismatch { .. }))
        ));
    }

    #[test]
    fn test_wrapper_without_struct_header() {
        let data = chunk(0x14, &chunk(0x02, b"oops"));
        let mut tree = SectionTree::new(&data);
        assert!(matches!(
            tree.next_section(&DecodeContext::default()),
            Err(DffError::UnexpectedSection {
                expected: SectionType::Struct,
                found: Some(SectionType::String)
            })
        ));
    }

    #[test]
    fn test_truncated_body_reports_context() {
        let data = chunk(0x0E, &chunk(ids::STRUCT, &words(&[4])));
        let mut tree = SectionTree::new(&data);
        let err = tree.next_section(&DecodeContext::default()).unwrap_err();
        assert!(matches!(err, DffError::Context(_, _)), "{err:?}");
    }
}
