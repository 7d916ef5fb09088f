//! Value scales and on-disk cell representations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed classification of raster cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueScale {
    /// True/false values.
    Boolean,
    /// Unordered classes.
    Nominal,
    /// Ordered classes.
    Ordinal,
    /// Continuous values.
    Scalar,
    /// Compass directions.
    Directional,
    /// Local drain direction.
    Ldd,
}

impl ValueScale {
    /// Name stored in the `PCRASTER_VALUESCALE` metadata item.
    pub fn metadata_name(self) -> &'static str {
        match self {
            ValueScale::Boolean => "VS_BOOLEAN",
            ValueScale::Nominal => "VS_NOMINAL",
            ValueScale::Ordinal => "VS_ORDINAL",
            ValueScale::Scalar => "VS_SCALAR",
            ValueScale::Directional => "VS_DIRECTION",
            ValueScale::Ldd => "VS_LDD",
        }
    }

    /// Parse a `PCRASTER_VALUESCALE` metadata value.
    pub fn from_metadata_name(name: &str) -> Option<Self> {
        match name.trim() {
            "VS_BOOLEAN" => Some(ValueScale::Boolean),
            "VS_NOMINAL" => Some(ValueScale::Nominal),
            "VS_ORDINAL" => Some(ValueScale::Ordinal),
            "VS_SCALAR" => Some(ValueScale::Scalar),
            "VS_DIRECTION" => Some(ValueScale::Directional),
            "VS_LDD" => Some(ValueScale::Ldd),
            _ => None,
        }
    }

    /// Scale assumed for files that carry no value scale metadata.
    pub fn infer(sample: SampleType) -> Self {
        if sample.is_float() {
            ValueScale::Scalar
        } else {
            ValueScale::Nominal
        }
    }

    /// How cells of this scale are stored on disk.
    pub fn cell_repr(self) -> CellRepr {
        match self {
            ValueScale::Boolean | ValueScale::Ldd => CellRepr::UInt8,
            ValueScale::Nominal | ValueScale::Ordinal => CellRepr::Int32,
            ValueScale::Scalar | ValueScale::Directional => CellRepr::Float32,
        }
    }
}

impl fmt::Display for ValueScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueScale::Boolean => "boolean",
            ValueScale::Nominal => "nominal",
            ValueScale::Ordinal => "ordinal",
            ValueScale::Scalar => "scalar",
            ValueScale::Directional => "directional",
            ValueScale::Ldd => "ldd",
        };
        f.write_str(name)
    }
}

/// Sample layout of a single-band TIFF image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl SampleType {
    /// Build from the TIFF bits-per-sample and SampleFormat values.
    ///
    /// SampleFormat: 1 = unsigned, 2 = signed, 3 = IEEE float.
    pub fn from_tiff(bits: u8, format: u32) -> Option<Self> {
        match (format, bits) {
            (1, 8) => Some(SampleType::U8),
            (1, 16) => Some(SampleType::U16),
            (1, 32) => Some(SampleType::U32),
            (1, 64) => Some(SampleType::U64),
            (2, 8) => Some(SampleType::I8),
            (2, 16) => Some(SampleType::I16),
            (2, 32) => Some(SampleType::I32),
            (2, 64) => Some(SampleType::I64),
            (3, 32) => Some(SampleType::F32),
            (3, 64) => Some(SampleType::F64),
            _ => None,
        }
    }

    /// True for floating point samples.
    pub fn is_float(self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }
}

/// Cell representations written by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRepr {
    /// Unsigned 8-bit, missing value 255.
    UInt8,
    /// Signed 32-bit, missing value `i32::MIN`.
    Int32,
    /// 32-bit float, missing value NaN.
    Float32,
}

impl CellRepr {
    /// Sample type used on disk.
    pub fn sample_type(self) -> SampleType {
        match self {
            CellRepr::UInt8 => SampleType::U8,
            CellRepr::Int32 => SampleType::I32,
            CellRepr::Float32 => SampleType::F32,
        }
    }

    /// Missing value written to the GDAL_NODATA tag.
    pub fn missing_value_text(self) -> String {
        match self {
            CellRepr::UInt8 => u8::MAX.to_string(),
            CellRepr::Int32 => i32::MIN.to_string(),
            CellRepr::Float32 => "nan".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_names() {
        for scale in [
            ValueScale::Boolean,
            ValueScale::Nominal,
            ValueScale::Ordinal,
            ValueScale::Scalar,
            ValueScale::Directional,
            ValueScale::Ldd,
        ] {
            assert_eq!(ValueScale::from_metadata_name(scale.metadata_name()), Some(scale));
        }
        assert_eq!(ValueScale::from_metadata_name("VS_UNKNOWN"), None);
    }

    #[test]
    fn test_inference_from_sample_type() {
        assert_eq!(ValueScale::infer(SampleType::F64), ValueScale::Scalar);
        assert_eq!(ValueScale::infer(SampleType::I16), ValueScale::Nominal);
        assert_eq!(ValueScale::infer(SampleType::U8), ValueScale::Nominal);
    }

    #[test]
    fn test_sample_type_from_tiff() {
        assert_eq!(SampleType::from_tiff(32, 3), Some(SampleType::F32));
        assert_eq!(SampleType::from_tiff(32, 2), Some(SampleType::I32));
        assert_eq!(SampleType::from_tiff(12, 1), None);
    }
}
