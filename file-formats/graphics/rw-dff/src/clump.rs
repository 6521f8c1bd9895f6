use rw_stream::{FieldReader, Result};

/// Top level clump counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Clump {
    pub atomic_count: u32,
    pub light_count: u32,
    pub camera_count: u32,
}

impl Clump {
    /// Decode a clump body.
    ///
    /// Old streams store only the atomic count, so a 4-byte body leaves the
    /// light and camera counts at zero.
    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        let atomic_count = reader.read_u32()?;
        if reader.remaining() == 0 {
            return Ok(Self {
                atomic_count,
                ..Self::default()
            });
        }

        Ok(Self {
            atomic_count,
            light_count: reader.read_u32()?,
            camera_count: reader.read_u32()?,
        })
    }
}

/// Count of geometries that follow the geometry list header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryList {
    pub geometry_count: u32,
}

impl GeometryList {
    pub(crate) fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            geometry_count: reader.read_u32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_clump_full_body() {
        let data = words(&[3, 1, 2]);
        let mut reader = FieldReader::new(&data, 0);
        let clump = Clump::decode(&mut reader).unwrap();
        assert_eq!(
            clump,
            Clump {
                atomic_count: 3,
                light_count: 1,
                camera_count: 2
            }
        );
        reader.finish().unwrap();
    }

    #[test]
    fn test_clump_atomic_count_only() {
        let data = words(&[5]);
        let mut reader = FieldReader::new(&data, 0);
        let clump = Clump::decode(&mut reader).unwrap();
        assert_eq!(clump.atomic_count, 5);
        assert_eq!(clump.light_count, 0);
        assert_eq!(clump.camera_count, 0);
    }
}
