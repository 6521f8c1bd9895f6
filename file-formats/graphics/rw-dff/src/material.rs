use crate::types::{Rgba, read_bool};
use rw_stream::{FieldReader, Result};

/// Header of a geometry's material list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialList {
    pub material_count: u32,
    /// Reserved per-material words, kept as read. One material section
    /// follows the list for every word whatever its value.
    pub slots: Vec<u32>,
}

impl MaterialList {
    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        let material_count = reader.read_u32()?;
        let slots = reader.read_records(material_count as usize, 4, FieldReader::read_u32)?;
        Ok(Self {
            material_count,
            slots,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub flags: u32,
    pub color: Rgba,
    pub reserved: u32,
    pub is_textured: bool,
    pub ambient: f32,
    pub specular: f32,
    pub diffuse: f32,
}

impl Material {
    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            flags: reader.read_u32()?,
            color: Rgba::read(reader)?,
            reserved: reader.read_u32()?,
            is_textured: read_bool(reader)?,
            ambient: reader.read_f32()?,
            specular: reader.read_f32()?,
            diffuse: reader.read_f32()?,
        })
    }
}

/// Sampler word of a texture reference.
///
/// The texture and mask names follow as separate string sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureReference {
    pub raw: [u8; 4],
}

impl TextureReference {
    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            raw: reader.read_array::<4>()?,
        })
    }

    pub fn filter_mode(&self) -> u8 {
        self.raw[0]
    }

    pub fn u_addressing(&self) -> u8 {
        self.raw[1] & 0x0F
    }

    pub fn v_addressing(&self) -> u8 {
        self.raw[1] >> 4
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct StringSection {
    pub value: String,
}

impl StringSection {
    pub(crate) fn decode(reader: &mut FieldReader<'_>, len: usize) -> Result<Self> {
        Ok(Self {
            value: reader.read_text(len)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_material_list() {
        let data: Vec<u8> = [2u32, u32::MAX, u32::MAX]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut reader = FieldReader::new(&data, 0);
        let list = MaterialList::decode(&mut reader).unwrap();
        reader.finish().unwrap();
        assert_eq!(list.material_count, 2);
        assert_eq!(list.slots, vec![u32::MAX, u32::MAX]);
    }

    #[test]
    fn test_material() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&[10, 20, 30, 255]);
        data.extend_from_slice(&0x1234_5678u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        for value in [1.0f32, 0.5, 0.75] {
            data.extend_from_slice(&value.to_le_bytes());
        }

        let mut reader = FieldReader::new(&data, 0);
        let material = Material::decode(&mut reader).unwrap();
        reader.finish().unwrap();

        assert_eq!(material.color, Rgba::new(10, 20, 30, 255));
        assert!(material.is_textured);
        assert_eq!(material.specular, 0.5);
        assert_eq!(material.diffuse, 0.75);
    }

    #[test]
    fn test_texture_reference_sampler_bits() {
        let data = [0x06, 0x21, 0x01, 0x00];
        let mut reader = FieldReader::new(&data, 0);
        let texture = TextureReference::decode(&mut reader).unwrap();
        assert_eq!(texture.filter_mode(), 6);
        assert_eq!(texture.u_addressing(), 1);
        assert_eq!(texture.v_addressing(), 2);
    }

    #[test]
    fn test_string_is_nul_trimmed() {
        let data = b"remap\0\0\0";
        let mut reader = FieldReader::new(data, 0);
        let string = StringSection::decode(&mut reader, data.len()).unwrap();
        assert_eq!(string.value, "remap");
    }
}
