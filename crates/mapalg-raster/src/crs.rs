//! Coordinate reference systems stored in GeoTIFF GeoKey directories.

use crate::geotiff::{read_raster, write_raster};
use crate::{RasterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

const GT_MODEL_TYPE: u16 = 1024;
const GT_RASTER_TYPE: u16 = 1025;
const GT_CITATION: u16 = 1026;
const GEOGRAPHIC_TYPE: u16 = 2048;
const PROJECTED_CS_TYPE: u16 = 3072;

/// GeoKey value meaning "user-defined" (no EPSG code).
const USER_DEFINED: u16 = 32767;
/// GTRasterTypeGeoKey values.
const PIXEL_IS_AREA: u16 = 1;
const PIXEL_IS_POINT: u16 = 2;

/// Location fields of keys whose values live outside the key entry.
pub(crate) const GEO_KEY_DIRECTORY_TAG: u16 = 34735;
pub(crate) const GEO_DOUBLE_PARAMS_TAG: u16 = 34736;
pub(crate) const GEO_ASCII_PARAMS_TAG: u16 = 34737;

/// Kind of coordinate system a CRS describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Projected (planar) coordinates.
    Projected,
    /// Geographic (lat/lon) coordinates.
    Geographic,
}

impl ModelType {
    /// Key holding the EPSG code of this kind of CRS.
    fn code_key(self) -> u16 {
        match self {
            ModelType::Projected => PROJECTED_CS_TYPE,
            ModelType::Geographic => GEOGRAPHIC_TYPE,
        }
    }
}

/// Value of a GeoKey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeoKeyValue {
    /// SHORT values, stored inline or in the key directory.
    Short(Vec<u16>),
    /// DOUBLE values from GeoDoubleParams.
    Double(Vec<f64>),
    /// Text from GeoAsciiParams, without its `|` terminator.
    Ascii(String),
}

/// A GeoKey describing part of a CRS, such as a datum, an ellipsoid or a
/// projection parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoKey {
    pub id: u16,
    pub value: GeoKeyValue,
}

/// A coordinate reference system as GeoTIFF stores it.
///
/// Besides the model type, EPSG code and citation, a CRS keeps every other
/// GeoKey it was read with, so user-defined systems (custom datums,
/// projection parameters, GeogCitation and PCSCitation) are written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    model: ModelType,
    epsg: Option<u16>,
    citation: Option<String>,
    keys: Vec<GeoKey>,
}

impl Crs {
    /// A projected CRS identified by EPSG code.
    pub fn projected(epsg: u16) -> Self {
        Self {
            model: ModelType::Projected,
            epsg: Some(epsg),
            citation: None,
            keys: Vec::new(),
        }
    }

    /// A geographic CRS identified by EPSG code.
    pub fn geographic(epsg: u16) -> Self {
        Self {
            model: ModelType::Geographic,
            epsg: Some(epsg),
            citation: None,
            keys: Vec::new(),
        }
    }

    /// A user-defined CRS known only by its citation text.
    pub fn user_defined(model: ModelType, citation: impl Into<String>) -> Self {
        Self {
            model,
            epsg: None,
            citation: Some(citation.into()),
            keys: Vec::new(),
        }
    }

    /// Attach a citation (human-readable name).
    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }

    /// Add or replace a GeoKey.
    ///
    /// The model type, raster type, citation and EPSG code keys belong to
    /// the CRS itself and are ignored here.
    pub fn with_key(mut self, id: u16, value: GeoKeyValue) -> Self {
        if self.is_own_key(id) {
            return self;
        }
        match self.keys.binary_search_by_key(&id, |k| k.id) {
            Ok(i) => self.keys[i].value = value,
            Err(i) => self.keys.insert(i, GeoKey { id, value }),
        }
        self
    }

    /// Model type.
    pub fn model(&self) -> ModelType {
        self.model
    }

    /// EPSG code, if the CRS has one.
    pub fn epsg(&self) -> Option<u16> {
        self.epsg
    }

    /// Citation text, if present.
    pub fn citation(&self) -> Option<&str> {
        self.citation.as_deref()
    }

    /// Further GeoKeys, ordered by id.
    pub fn keys(&self) -> &[GeoKey] {
        &self.keys
    }

    /// Value of one of the further GeoKeys.
    pub fn key(&self, id: u16) -> Option<&GeoKeyValue> {
        self.keys.iter().find(|k| k.id == id).map(|k| &k.value)
    }

    fn is_own_key(&self, id: u16) -> bool {
        matches!(id, GT_MODEL_TYPE | GT_RASTER_TYPE | GT_CITATION) || id == self.model.code_key()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.citation.as_deref().or_else(|| {
            self.keys.iter().find_map(|k| match &k.value {
                GeoKeyValue::Ascii(text) => Some(text.as_str()),
                _ => None,
            })
        });
        match (self.epsg, name) {
            (Some(code), Some(name)) => write!(f, "EPSG:{} ({})", code, name),
            (Some(code), None) => write!(f, "EPSG:{}", code),
            (None, Some(name)) => f.write_str(name),
            (None, None) => write!(f, "user-defined {:?}", self.model),
        }
    }
}

/// GeoKey directory plus the parameter tags it references.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GeoKeys {
    pub directory: Vec<u16>,
    pub doubles: Option<Vec<f64>>,
    pub ascii: Option<String>,
}

/// What a GeoKey directory says about a raster.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecodedGeoKeys {
    pub crs: Option<Crs>,
    /// The tiepoint names the center of the upper-left cell, not its corner.
    pub pixel_is_point: bool,
}

/// Build the GeoKey directory for a raster, optionally describing a CRS.
///
/// GTRasterTypeGeoKey is always PixelIsArea, so readers treat the tiepoint
/// as the corner of the upper-left cell.
pub(crate) fn encode_geokeys(crs: Option<&Crs>) -> GeoKeys {
    let mut entries = vec![(GT_RASTER_TYPE, GeoKeyValue::Short(vec![PIXEL_IS_AREA]))];
    if let Some(crs) = crs {
        let model = match crs.model {
            ModelType::Projected => 1,
            ModelType::Geographic => 2,
        };
        entries.push((GT_MODEL_TYPE, GeoKeyValue::Short(vec![model])));
        if let Some(citation) = &crs.citation {
            entries.push((GT_CITATION, GeoKeyValue::Ascii(citation.clone())));
        }
        let code = crs.epsg.unwrap_or(USER_DEFINED);
        entries.push((crs.model.code_key(), GeoKeyValue::Short(vec![code])));
        entries.extend(crs.keys.iter().map(|k| (k.id, k.value.clone())));
    }
    // Readers expect keys in ascending order.
    entries.sort_by_key(|(id, _)| *id);

    let count = entries.len();
    let overflow_start = 4 + 4 * count;
    let mut directory = vec![1, 1, 0, count as u16];
    let mut overflow: Vec<u16> = Vec::new();
    let mut doubles: Vec<f64> = Vec::new();
    let mut ascii = String::new();

    for (id, value) in entries {
        match value {
            GeoKeyValue::Short(values) if values.len() == 1 => {
                directory.extend_from_slice(&[id, 0, 1, values[0]]);
            }
            GeoKeyValue::Short(values) => {
                let offset = (overflow_start + overflow.len()) as u16;
                directory.extend_from_slice(&[id, GEO_KEY_DIRECTORY_TAG, values.len() as u16, offset]);
                overflow.extend(values);
            }
            GeoKeyValue::Double(values) => {
                let offset = doubles.len() as u16;
                directory.extend_from_slice(&[id, GEO_DOUBLE_PARAMS_TAG, values.len() as u16, offset]);
                doubles.extend(values);
            }
            GeoKeyValue::Ascii(text) => {
                let offset = ascii.len() as u16;
                let text = format!("{}|", text);
                directory.extend_from_slice(&[id, GEO_ASCII_PARAMS_TAG, text.len() as u16, offset]);
                ascii.push_str(&text);
            }
        }
    }
    directory.extend(overflow);

    GeoKeys {
        directory,
        doubles: (!doubles.is_empty()).then_some(doubles),
        ascii: (!ascii.is_empty()).then_some(ascii),
    }
}

/// Decode a GeoKey directory and the parameter tags it references.
///
/// The CRS is `None` when the directory names no EPSG code, no citation
/// and no further CRS keys.
pub(crate) fn decode_geokeys(
    directory: &[u16],
    doubles: Option<&[f64]>,
    ascii: Option<&str>,
) -> Result<DecodedGeoKeys> {
    if directory.len() < 4 {
        return Err(RasterError::InvalidGeoTiff(
            "GeoKeyDirectory shorter than its header".to_string(),
        ));
    }
    let count = directory[3] as usize;
    if directory.len() < 4 + count * 4 {
        return Err(RasterError::InvalidGeoTiff(format!(
            "GeoKeyDirectory declares {} keys but holds {}",
            count,
            (directory.len() - 4) / 4
        )));
    }

    let mut entries = Vec::with_capacity(count);
    for entry in directory[4..4 + count * 4].chunks_exact(4) {
        let (id, location, len, value) = (entry[0], entry[1], entry[2] as usize, entry[3]);
        let start = value as usize;
        let resolved = match location {
            0 => Some(GeoKeyValue::Short(vec![value])),
            GEO_KEY_DIRECTORY_TAG => directory
                .get(start..start + len)
                .map(|values| GeoKeyValue::Short(values.to_vec())),
            GEO_DOUBLE_PARAMS_TAG => doubles
                .and_then(|values| values.get(start..start + len))
                .map(|values| GeoKeyValue::Double(values.to_vec())),
            GEO_ASCII_PARAMS_TAG => ascii
                .and_then(|text| text.get(start..start + len))
                .map(|text| GeoKeyValue::Ascii(text.trim_end_matches(['|', '\0']).to_string())),
            _ => None,
        };
        match resolved {
            Some(value) => entries.push(GeoKey { id, value }),
            None => debug!("skipping GeoKey {} with unresolvable location {}", id, location),
        }
    }
    entries.sort_by_key(|k| k.id);

    let short = |id: u16| {
        entries.iter().find(|k| k.id == id).and_then(|k| match &k.value {
            GeoKeyValue::Short(values) => values.first().copied(),
            _ => None,
        })
    };

    let pixel_is_point = short(GT_RASTER_TYPE) == Some(PIXEL_IS_POINT);
    let model = match short(GT_MODEL_TYPE) {
        Some(1) => ModelType::Projected,
        Some(2) => ModelType::Geographic,
        _ if short(PROJECTED_CS_TYPE).is_some() => ModelType::Projected,
        _ if short(GEOGRAPHIC_TYPE).is_some() => ModelType::Geographic,
        _ => ModelType::Projected,
    };
    let epsg = short(model.code_key()).filter(|&c| c != USER_DEFINED && c != 0);

    let mut citation = None;
    let mut keys = Vec::new();
    for key in entries {
        match key.id {
            GT_CITATION => {
                if let GeoKeyValue::Ascii(text) = key.value {
                    citation = Some(text).filter(|t| !t.is_empty());
                }
            }
            GT_MODEL_TYPE | GT_RASTER_TYPE => {}
            id if id == model.code_key() => {}
            _ => keys.push(key),
        }
    }

    let crs = if epsg.is_none() && citation.is_none() && keys.is_empty() {
        None
    } else {
        Some(Crs {
            model,
            epsg,
            citation,
            keys,
        })
    };
    Ok(DecodedGeoKeys { crs, pixel_is_point })
}

/// Assign a CRS to an existing GeoTIFF in place.
///
/// Returns `false` without touching the file when it already carries `crs`.
/// Otherwise the raster is re-encoded with identical cells, georeferencing
/// and value scale plus a GeoKey directory describing `crs`.
pub fn assign_crs<P: AsRef<Path>>(path: P, crs: &Crs) -> Result<bool> {
    let path = path.as_ref();
    let raster = read_raster(path)?;

    if raster.crs.as_ref() == Some(crs) {
        debug!("{} already carries {}", path.display(), crs);
        return Ok(false);
    }

    let expected = raster.value_scale.cell_repr().sample_type();
    if raster.sample != expected {
        return Err(RasterError::UnsupportedDataType(format!(
            "cannot rewrite {:?} samples of a {} raster in place (expected {:?})",
            raster.sample, raster.value_scale, expected
        )));
    }

    let mut image = raster.into_image();
    image.crs = Some(crs.clone());
    write_raster(path, &image)?;
    debug!("assigned {} to {}", crs, path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(keys: &GeoKeys) -> DecodedGeoKeys {
        decode_geokeys(&keys.directory, keys.doubles.as_deref(), keys.ascii.as_deref()).unwrap()
    }

    #[test]
    fn test_epsg_geokeys() {
        let crs = Crs::projected(32631);
        let keys = encode_geokeys(Some(&crs));
        assert_eq!(keys.ascii, None);
        assert_eq!(keys.doubles, None);
        assert_eq!(decode(&keys).crs, Some(crs));
    }

    #[test]
    fn test_citation_geokeys() {
        let crs = Crs::geographic(4326).with_citation("WGS 84");
        let keys = encode_geokeys(Some(&crs));
        assert_eq!(keys.ascii.as_deref(), Some("WGS 84|"));
        assert_eq!(decode(&keys).crs, Some(crs));
    }

    #[test]
    fn test_no_crs() {
        let keys = encode_geokeys(None);
        assert_eq!(keys.directory, vec![1, 1, 0, 1, GT_RASTER_TYPE, 0, 1, PIXEL_IS_AREA]);
        let decoded = decode(&keys);
        assert_eq!(decoded.crs, None);
        assert!(!decoded.pixel_is_point);
    }

    #[test]
    fn test_user_defined_code_alone_is_no_crs() {
        let directory = [1, 1, 0, 2, GT_MODEL_TYPE, 0, 1, 1, PROJECTED_CS_TYPE, 0, 1, USER_DEFINED];
        assert_eq!(decode_geokeys(&directory, None, None).unwrap().crs, None);
    }

    #[test]
    fn test_user_defined_geographic_keeps_its_keys() {
        // GeogCitation 2049, GeogGeodeticDatum 2050, GeogSemiMajorAxis 2057,
        // GeogInvFlattening 2059
        let directory = [
            1, 1, 0, 6, //
            GT_MODEL_TYPE, 0, 1, 2, //
            GEOGRAPHIC_TYPE, 0, 1, USER_DEFINED, //
            2049, GEO_ASCII_PARAMS_TAG, 9, 0, //
            2050, 0, 1, USER_DEFINED, //
            2057, GEO_DOUBLE_PARAMS_TAG, 1, 0, //
            2059, GEO_DOUBLE_PARAMS_TAG, 1, 1,
        ];
        let doubles = [6_378_137.0, 298.257_223_563];
        let decoded = decode_geokeys(&directory, Some(&doubles[..]), Some("My datum|")).unwrap();
        let crs = decoded.crs.unwrap();

        assert_eq!(crs.model(), ModelType::Geographic);
        assert_eq!(crs.epsg(), None);
        assert_eq!(crs.key(2049), Some(&GeoKeyValue::Ascii("My datum".to_string())));
        assert_eq!(crs.key(2057), Some(&GeoKeyValue::Double(vec![6_378_137.0])));
        assert_eq!(crs.to_string(), "My datum");

        let keys = encode_geokeys(Some(&crs));
        assert_eq!(keys.doubles.as_deref(), Some(&doubles[..]));
        assert_eq!(decode(&keys).crs, Some(crs));
    }

    #[test]
    fn test_projected_keeps_base_geographic_code() {
        let crs = Crs::projected(28992).with_key(GEOGRAPHIC_TYPE, GeoKeyValue::Short(vec![4289]));
        let decoded = decode(&encode_geokeys(Some(&crs)));
        assert_eq!(decoded.crs, Some(crs));
    }

    #[test]
    fn test_short_arrays_live_after_the_keys() {
        let crs = Crs::projected(3857).with_key(3075, GeoKeyValue::Short(vec![7, 9]));
        let keys = encode_geokeys(Some(&crs));
        // header and four keys, then the overflow values
        assert_eq!(&keys.directory[20..], &[7, 9]);
        assert_eq!(decode(&keys).crs, Some(crs));
    }

    #[test]
    fn test_own_keys_are_not_extra_keys() {
        let crs = Crs::projected(3857).with_key(PROJECTED_CS_TYPE, GeoKeyValue::Short(vec![1]));
        assert!(crs.keys().is_empty());
        assert_eq!(crs.epsg(), Some(3857));
    }

    #[test]
    fn test_pixel_is_point() {
        let directory = [1, 1, 0, 2, GT_RASTER_TYPE, 0, 1, PIXEL_IS_POINT, PROJECTED_CS_TYPE, 0, 1, 32632];
        let decoded = decode_geokeys(&directory, None, None).unwrap();
        assert!(decoded.pixel_is_point);
        assert_eq!(decoded.crs, Some(Crs::projected(32632)));
    }

    #[test]
    fn test_truncated_directory() {
        let directory = [1, 1, 0, 3, GT_MODEL_TYPE, 0, 1, 1];
        assert!(decode_geokeys(&directory, None, None).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Crs::projected(28992).to_string(), "EPSG:28992");
        assert_eq!(
            Crs::user_defined(ModelType::Projected, "Local grid").to_string(),
            "Local grid"
        );
    }
}
