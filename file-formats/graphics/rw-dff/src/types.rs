use glam::{Vec2, Vec3};
use rw_stream::{FieldReader, Result};

/// An 8-bit per channel color as stored in model streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const SIZE: usize = 4;

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) fn read(reader: &mut FieldReader<'_>) -> Result<Self> {
        let [r, g, b, a] = reader.read_array::<4>()?;
        Ok(Self { r, g, b, a })
    }
}

/// Bounding sphere of a morph target
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub(crate) fn read(reader: &mut FieldReader<'_>) -> Result<Self> {
        let center = read_vec3(reader)?;
        let radius = reader.read_f32()?;
        Ok(Self { center, radius })
    }
}

pub(crate) fn read_vec2(reader: &mut FieldReader<'_>) -> Result<Vec2> {
    Ok(Vec2::new(reader.read_f32()?, reader.read_f32()?))
}

pub(crate) fn read_vec3(reader: &mut FieldReader<'_>) -> Result<Vec3> {
    Ok(Vec3::new(
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
    ))
}

/// Read a 32-bit boolean
pub(crate) fn read_bool(reader: &mut FieldReader<'_>) -> Result<bool> {
    Ok(reader.read_u32()? != 0)
}
