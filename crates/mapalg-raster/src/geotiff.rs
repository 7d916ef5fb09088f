//! Reading and writing single-band GeoTIFF rasters.

use crate::crs::encode_geokeys;
use crate::header::{open_decoder, read_header};
use crate::scale::{CellRepr, SampleType, ValueScale};
use crate::tags;
use crate::{Crs, GeoTransform, RasterError, RasterHeader, Result};
use std::fs::File;
use std::io::{Seek, Write};
use std::ops::Deref;
use std::path::Path;
use tiff::decoder::DecodingResult;
use tiff::encoder::{colortype, DirectoryEncoder, TiffEncoder, TiffKindStandard};

/// A decoded raster: its header plus cells.
///
/// Cells are row-major (north to south, west to east). Cells equal to the
/// no-data sentinel, and NaN cells, are stored as NaN.
#[derive(Debug, Clone)]
pub struct Raster {
    header: RasterHeader,
    cells: Vec<f64>,
}

impl Raster {
    /// Header of the raster.
    pub fn header(&self) -> &RasterHeader {
        &self.header
    }

    /// Row-major cells, NaN for no-data.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Split into header and cells.
    pub fn into_parts(self) -> (RasterHeader, Vec<f64>) {
        (self.header, self.cells)
    }

    /// Convert into an image that writes back the same cells, georeferencing,
    /// value scale and CRS.
    pub fn into_image(self) -> RasterImage {
        RasterImage {
            rows: self.header.rows,
            cols: self.header.cols,
            value_scale: self.header.value_scale,
            transform: self.header.geotransform,
            crs: self.header.crs,
            cells: self.cells,
        }
    }
}

impl Deref for Raster {
    type Target = RasterHeader;

    fn deref(&self) -> &RasterHeader {
        &self.header
    }
}

/// Everything needed to encode a raster as GeoTIFF.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Value scale; selects the on-disk cell representation.
    pub value_scale: ValueScale,
    /// Georeferencing. North-up transforms are written as ModelPixelScale +
    /// ModelTiepoint, anything else as ModelTransformation.
    pub transform: Option<GeoTransform>,
    /// CRS written to the GeoKey directory.
    pub crs: Option<Crs>,
    /// Row-major cells, NaN for no-data.
    pub cells: Vec<f64>,
}

/// Read and decode a GeoTIFF raster.
pub fn read_raster<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let path = path.as_ref();
    let mut decoder = open_decoder(path)?;
    let header = read_header(&mut decoder, path)?;

    let cells = decode_cells(decoder.read_image()?, header.sample, header.nodata);
    if cells.len() != header.rows * header.cols {
        return Err(RasterError::DimensionMismatch {
            rows: header.rows,
            cols: header.cols,
            len: cells.len(),
        });
    }

    Ok(Raster { header, cells })
}

/// Decode cells to f64, mapping the no-data sentinel to NaN.
fn decode_cells(result: DecodingResult, sample: SampleType, nodata: Option<f64>) -> Vec<f64> {
    let values: Vec<f64> = match result {
        DecodingResult::F32(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F64(data) => data,
        DecodingResult::I16(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::U16(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::U8(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f64).collect(),
    };

    let Some(nodata) = nodata.filter(|v| !v.is_nan()) else {
        return values;
    };
    // Float32 sentinels are compared at the precision they were stored with.
    let is_missing = |v: f64| {
        v == nodata || (sample == SampleType::F32 && v as f32 == nodata as f32)
    };
    values
        .into_iter()
        .map(|v| if is_missing(v) { f64::NAN } else { v })
        .collect()
}

/// Encode a raster as a single-band GeoTIFF.
///
/// Cells are stored in the representation of the image's value scale
/// (see [`ValueScale::cell_repr`]), NaN cells as that representation's
/// missing value.
pub fn write_raster<P: AsRef<Path>>(path: P, image: &RasterImage) -> Result<()> {
    if image.cells.len() != image.rows * image.cols {
        return Err(RasterError::DimensionMismatch {
            rows: image.rows,
            cols: image.cols,
            len: image.cells.len(),
        });
    }
    let file = File::create(path.as_ref())?;
    encode(image, file)
}

fn encode<W: Write + Seek>(image: &RasterImage, writer: W) -> Result<()> {
    let repr = image.value_scale.cell_repr();
    let tags = GeoTags::new(image, repr);
    let mut encoder = TiffEncoder::new(writer)?;
    let (width, height) = (image.cols as u32, image.rows as u32);

    match repr {
        CellRepr::Float32 => {
            let data: Vec<f32> = image.cells.iter().map(|&v| v as f32).collect();
            let mut tiff = encoder.new_image::<colortype::Gray32Float>(width, height)?;
            tags.write(tiff.encoder())?;
            tiff.write_data(&data)?;
        }
        CellRepr::Int32 => {
            let data: Vec<i32> = image
                .cells
                .iter()
                .map(|&v| if v.is_nan() { i32::MIN } else { v.round() as i32 })
                .collect();
            let mut tiff = encoder.new_image::<colortype::GrayI32>(width, height)?;
            tags.write(tiff.encoder())?;
            tiff.write_data(&data)?;
        }
        CellRepr::UInt8 => {
            let data: Vec<u8> = image
                .cells
                .iter()
                .map(|&v| if v.is_nan() { u8::MAX } else { v.round() as u8 })
                .collect();
            let mut tiff = encoder.new_image::<colortype::Gray8>(width, height)?;
            tags.write(tiff.encoder())?;
            tiff.write_data(&data)?;
        }
    }
    Ok(())
}

/// GeoTIFF and GDAL tags written alongside the image.
struct GeoTags {
    pixel_scale: Option<[f64; 3]>,
    tiepoint: Option<[f64; 6]>,
    transformation: Option<[f64; 16]>,
    geokeys: Vec<u16>,
    geo_doubles: Option<Vec<f64>>,
    geo_ascii: Option<String>,
    metadata: String,
    nodata: String,
}

impl GeoTags {
    fn new(image: &RasterImage, repr: CellRepr) -> Self {
        let (mut pixel_scale, mut tiepoint, mut transformation) = (None, None, None);
        match image.transform {
            Some(t) if t.is_north_up() => {
                pixel_scale = Some([t.pixel_width(), -t.pixel_height(), 0.0]);
                tiepoint = Some([0.0, 0.0, 0.0, t.origin_x(), t.origin_y(), 0.0]);
            }
            Some(t) => transformation = Some(t.to_model_transformation()),
            None => {}
        }
        let geokeys = encode_geokeys(image.crs.as_ref());

        Self {
            pixel_scale,
            tiepoint,
            transformation,
            geokeys: geokeys.directory,
            geo_doubles: geokeys.doubles,
            geo_ascii: geokeys.ascii,
            metadata: tags::value_scale_metadata(image.value_scale.metadata_name()),
            nodata: repr.missing_value_text(),
        }
    }

    fn write<W: Write + Seek>(&self, dir: &mut DirectoryEncoder<'_, W, TiffKindStandard>) -> Result<()> {
        if let Some(scale) = &self.pixel_scale {
            dir.write_tag(tags::tag(tags::MODEL_PIXEL_SCALE), &scale[..])?;
        }
        if let Some(tiepoint) = &self.tiepoint {
            dir.write_tag(tags::tag(tags::MODEL_TIEPOINT), &tiepoint[..])?;
        }
        if let Some(matrix) = &self.transformation {
            dir.write_tag(tags::tag(tags::MODEL_TRANSFORMATION), &matrix[..])?;
        }
        dir.write_tag(tags::tag(tags::GEO_KEY_DIRECTORY), &self.geokeys[..])?;
        if let Some(doubles) = &self.geo_doubles {
            dir.write_tag(tags::tag(tags::GEO_DOUBLE_PARAMS), &doubles[..])?;
        }
        if let Some(ascii) = &self.geo_ascii {
            dir.write_tag(tags::tag(tags::GEO_ASCII_PARAMS), ascii.as_str())?;
        }
        dir.write_tag(tags::tag(tags::GDAL_METADATA), self.metadata.as_str())?;
        dir.write_tag(tags::tag(tags::GDAL_NODATA), self.nodata.as_str())?;
        Ok(())
    }
}
