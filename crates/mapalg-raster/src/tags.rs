//! TIFF tag numbers used for georeferencing and GDAL metadata.

use tiff::tags::Tag;

pub(crate) const MODEL_PIXEL_SCALE: u16 = 33550;
pub(crate) const MODEL_TIEPOINT: u16 = 33922;
pub(crate) const MODEL_TRANSFORMATION: u16 = 34264;
pub(crate) const GEO_KEY_DIRECTORY: u16 = crate::crs::GEO_KEY_DIRECTORY_TAG;
pub(crate) const GEO_DOUBLE_PARAMS: u16 = crate::crs::GEO_DOUBLE_PARAMS_TAG;
pub(crate) const GEO_ASCII_PARAMS: u16 = crate::crs::GEO_ASCII_PARAMS_TAG;
pub(crate) const GDAL_METADATA: u16 = 42112;
pub(crate) const GDAL_NODATA: u16 = 42113;

/// The decoder's `Tag` for a tag number.
///
/// Tags the `tiff` crate knows by name decode to their named variant, not
/// to `Tag::Unknown`, so lookups must go through the same mapping.
pub(crate) fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

const VALUE_SCALE_ITEM: &str = "<Item name=\"PCRASTER_VALUESCALE\">";

/// GDAL metadata XML carrying a single value scale item.
pub(crate) fn value_scale_metadata(name: &str) -> String {
    format!("<GDALMetadata>\n  {}{}</Item>\n</GDALMetadata>\n", VALUE_SCALE_ITEM, name)
}

/// Extract the value scale item from GDAL metadata XML.
pub(crate) fn find_value_scale_item(xml: &str) -> Option<&str> {
    let start = xml.find(VALUE_SCALE_ITEM)? + VALUE_SCALE_ITEM.len();
    let len = xml[start..].find("</Item>")?;
    Some(xml[start..start + len].trim())
}
