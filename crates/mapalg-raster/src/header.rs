//! Raster headers read from GeoTIFF tags.

use crate::crs::{decode_geokeys, DecodedGeoKeys};
use crate::scale::{SampleType, ValueScale};
use crate::tags;
use crate::{Crs, GeoTransform, RasterError, Result};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tiff::decoder::{Decoder, Limits};
use tiff::tags::Tag;
use tiff::ColorType;

/// Metadata of a single-band GeoTIFF, read without decoding its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterHeader {
    /// File the header was read from.
    pub path: PathBuf,
    /// Number of rows (image height).
    pub rows: usize,
    /// Number of columns (image width).
    pub cols: usize,
    /// On-disk sample layout.
    pub sample: SampleType,
    /// Value scale from metadata, or inferred from the sample type.
    pub value_scale: ValueScale,
    /// No-data sentinel from the GDAL_NODATA tag.
    pub nodata: Option<f64>,
    /// Georeferencing from ModelPixelScale + ModelTiepoint only.
    ///
    /// This is the simplified view map-algebra engines take of a raster; it
    /// ignores ModelTransformation and so cannot describe rotated grids.
    pub header_transform: Option<GeoTransform>,
    /// Full affine geotransform: ModelTransformation when present, else the
    /// header transform.
    pub geotransform: Option<GeoTransform>,
    /// Coordinate reference system from the GeoKey directory.
    pub crs: Option<Crs>,
}

impl RasterHeader {
    /// Read the header of a GeoTIFF file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut decoder = open_decoder(path)?;
        read_header(&mut decoder, path)
    }

    /// Cell size along x from the simplified header, if georeferenced.
    pub fn cell_size(&self) -> Option<f64> {
        self.header_transform.map(|t| t.pixel_width())
    }
}

/// Read the full affine geotransform of a GeoTIFF.
///
/// Unlike [`RasterHeader::header_transform`], this honours
/// ModelTransformation, so rotated and non-square grids come back exact.
pub fn read_geotransform<P: AsRef<Path>>(path: P) -> Result<GeoTransform> {
    let path = path.as_ref();
    let header = RasterHeader::read(path)?;
    header.geotransform.ok_or_else(|| RasterError::MissingGeotransform {
        path: path.to_path_buf(),
    })
}

pub(crate) fn open_decoder(path: &Path) -> Result<Decoder<File>> {
    let file = File::open(path)?;
    let decoder = Decoder::new(file)?;

    // Whole-raster operations decode complete images; allow large DEMs.
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1 GB
    limits.intermediate_buffer_size = 1024 * 1024 * 1024; // 1 GB
    limits.ifd_value_size = 1024 * 1024 * 1024;
    Ok(decoder.with_limits(limits))
}

pub(crate) fn read_header<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    path: &Path,
) -> Result<RasterHeader> {
    let (width, height) = decoder.dimensions()?;
    let sample = read_sample_type(decoder)?;

    let nodata = decoder
        .get_tag_ascii_string(tags::tag(tags::GDAL_NODATA))
        .ok()
        .and_then(|text| text.trim().trim_end_matches('\0').parse::<f64>().ok());

    let value_scale = decoder
        .get_tag_ascii_string(tags::tag(tags::GDAL_METADATA))
        .ok()
        .and_then(|xml| tags::find_value_scale_item(&xml).and_then(ValueScale::from_metadata_name))
        .unwrap_or_else(|| ValueScale::infer(sample));

    let geokeys = match decoder.get_tag_u16_vec(tags::tag(tags::GEO_KEY_DIRECTORY)) {
        Ok(directory) => {
            let doubles = decoder.get_tag_f64_vec(tags::tag(tags::GEO_DOUBLE_PARAMS)).ok();
            let ascii = decoder.get_tag_ascii_string(tags::tag(tags::GEO_ASCII_PARAMS)).ok();
            decode_geokeys(&directory, doubles.as_deref(), ascii.as_deref())?
        }
        Err(_) => DecodedGeoKeys {
            crs: None,
            pixel_is_point: false,
        },
    };

    // Both views are reported with the origin at the upper-left cell corner.
    let to_corner = |t: GeoTransform| {
        if geokeys.pixel_is_point {
            t.center_origin_to_corner()
        } else {
            t
        }
    };
    let header_transform = read_pixel_scale_transform(decoder).map(to_corner);
    let geotransform = decoder
        .get_tag_f64_vec(tags::tag(tags::MODEL_TRANSFORMATION))
        .ok()
        .and_then(|matrix| GeoTransform::from_model_transformation(&matrix))
        .map(to_corner)
        .or(header_transform);

    Ok(RasterHeader {
        path: path.to_path_buf(),
        rows: height as usize,
        cols: width as usize,
        sample,
        value_scale,
        nodata,
        header_transform,
        geotransform,
        crs: geokeys.crs,
    })
}

fn read_sample_type<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<SampleType> {
    let bits = match decoder.colortype()? {
        ColorType::Gray(bits) => bits,
        other => {
            return Err(RasterError::UnsupportedDataType(format!(
                "{:?} (only single-band rasters are supported)",
                other
            )))
        }
    };
    // SampleFormat defaults to unsigned integer when absent. A single SHORT
    // decodes as `Value::Unsigned`, which only the u32 accessor accepts.
    let format = decoder
        .get_tag_u32_vec(Tag::SampleFormat)
        .ok()
        .and_then(|formats| formats.first().copied())
        .unwrap_or(1);

    SampleType::from_tiff(bits, format).ok_or_else(|| {
        RasterError::UnsupportedDataType(format!("{}-bit samples with SampleFormat {}", bits, format))
    })
}

/// Georeferencing from ModelTiepoint + ModelPixelScale.
fn read_pixel_scale_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(tags::tag(tags::MODEL_PIXEL_SCALE)).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(tags::tag(tags::MODEL_TIEPOINT)).ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }
    // Tiepoint format: [i, j, k, x, y, z]; the raster space point (i, j)
    // maps to model point (x, y).
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Some(GeoTransform::north_up(origin_x, origin_y, scale[0], -scale[1]))
}
