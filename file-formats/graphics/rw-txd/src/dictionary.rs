use crate::error::{Result, TxdError};
use crate::raster::Raster;
use log::{debug, trace};
use rw_stream::{ChunkHeader, ChunkReader, ReadOutcome, StreamError, ids};
use std::path::Path;

/// Struct body of a texture dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct DictionaryHeader {
    pub texture_count: u16,
    pub device_id: u16,
}

/// A texture dictionary and the rasters it holds, in stream order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureDictionary {
    /// Expanded library version of the dictionary header
    pub version: u32,
    pub header: DictionaryHeader,
    pub rasters: Vec<Raster>,
}

impl TextureDictionary {
    /// Parse a dictionary from memory.
    ///
    /// `fallback_name` replaces raster names that are not valid UTF-8.
    pub fn parse(data: &[u8], fallback_name: Option<&str>) -> Result<Self> {
        let mut reader = ChunkReader::new(data);
        let root = expect_chunk(&mut reader, ids::TEXTURE_DICTIONARY)?;
        let start = reader.position();
        if root.size as usize > reader.remaining() {
            return Err(StreamError::Truncated {
                offset: start,
                needed: root.size as usize,
                remaining: reader.remaining(),
            }
            .into());
        }

        let info = expect_chunk(&mut reader, ids::STRUCT)?;
        let mut body = reader.body(info.size as usize)?;
        let header = DictionaryHeader {
            texture_count: body.read_u16()?,
            device_id: body.read_u16()?,
        };
        body.finish()?;
        debug!(
            "Texture dictionary version {:#x}: {} textures, device {}",
            root.version(),
            header.texture_count,
            header.device_id
        );

        let mut rasters = Vec::with_capacity(usize::from(header.texture_count));
        for index in 0..header.texture_count {
            let raster = read_raster(&mut reader, fallback_name)
                .map_err(|err| err.with_context(&format!("raster {index}")))?;
            rasters.push(raster);
        }

        skip_extension(&mut reader)?;
        ensure_consumed(&reader, start, root.size)?;

        if !reader.is_empty() {
            debug!("Ignoring {} bytes after the texture dictionary", reader.remaining());
        }

        Ok(Self {
            version: root.version(),
            header,
            rasters,
        })
    }

    /// Read and parse a dictionary file, using its stem as the name fallback
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data =
            std::fs::read(path).map_err(|err| TxdError::FileSystem(path.to_path_buf(), err))?;
        let stem = path.file_stem().and_then(|stem| stem.to_str());
        Self::parse(&data, stem)
    }

    /// Find a raster by name, ignoring ASCII case
    pub fn find(&self, name: &str) -> Option<&Raster> {
        self.rasters
            .iter()
            .find(|raster| raster.name().eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rasters.iter().map(Raster::name)
    }
}

fn read_raster(reader: &mut ChunkReader<'_>, fallback_name: Option<&str>) -> Result<Raster> {
    let native = expect_chunk(reader, ids::TEXTURE_NATIVE)?;
    let start = reader.position();

    let info = expect_chunk(reader, ids::STRUCT)?;
    let mut body = reader.body(info.size as usize)?;
    let raster = Raster::decode(&mut body, fallback_name)?;
    trace!(
        "Raster {:?}: {}x{} {:?}, {} payload bytes",
        raster.descriptor.name,
        raster.descriptor.width,
        raster.descriptor.height,
        raster.descriptor.d3d_format,
        raster.payload.len()
    );

    skip_extension(reader)?;
    ensure_consumed(reader, start, native.size)?;
    Ok(raster)
}

/// Skip an extension chunk by its declared size
fn skip_extension(reader: &mut ChunkReader<'_>) -> Result<()> {
    let extension = expect_chunk(reader, ids::EXTENSION)?;
    if extension.size > 0 {
        debug!(
            "Skipping {} bytes of extension data at {:#x}",
            extension.size,
            reader.position()
        );
    }
    reader.skip(extension.size as usize)?;
    Ok(())
}

fn expect_chunk(reader: &mut ChunkReader<'_>, expected: u32) -> Result<ChunkHeader> {
    let offset = reader.position();
    match reader.read_header()? {
        ReadOutcome::Read(header) if header.type_id == expected => {
            trace!("Chunk {expected:#x} at {offset:#x}, {} bytes", header.size);
            Ok(header)
        }
        ReadOutcome::Read(header) => Err(TxdError::UnexpectedChunk {
            expected,
            found: Some(header.type_id),
            offset,
        }),
        ReadOutcome::EndOfStream => Err(TxdError::UnexpectedChunk {
            expected,
            found: None,
            offset,
        }),
    }
}

/// Check that the children of a chunk ended exactly at its declared end
fn ensure_consumed(reader: &ChunkReader<'_>, start: usize, declared: u32) -> Result<()> {
    let consumed = reader.position() - start;
    if consumed != declared as usize {
        return Err(StreamError::SizeMismatch {
            offset: start,
            declared: declared as usize,
            consumed,
        }
        .into());
    }
    Ok(())
}
