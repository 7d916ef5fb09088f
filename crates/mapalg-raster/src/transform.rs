//! Affine geotransform.

use serde::{Deserialize, Serialize};

/// Affine mapping from cell indices to world coordinates.
///
/// Coefficients follow the GDAL ordering:
/// ```text
/// x = c[0] + col * c[1] + row * c[2]
/// y = c[3] + col * c[4] + row * c[5]
/// ```
/// For north-up rasters `c[2]` and `c[4]` are zero and `c[5]` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    coefficients: [f64; 6],
}

impl GeoTransform {
    /// Create a north-up transform from the upper-left corner and pixel sizes.
    ///
    /// `pixel_height` is the signed y step per row (negative for north-up).
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            coefficients: [origin_x, pixel_width, 0.0, origin_y, 0.0, pixel_height],
        }
    }

    /// Create from GDAL-ordered coefficients.
    pub fn from_coefficients(coefficients: [f64; 6]) -> Self {
        Self { coefficients }
    }

    /// Create from a row-major 4x4 GeoTIFF ModelTransformation matrix.
    pub(crate) fn from_model_transformation(m: &[f64]) -> Option<Self> {
        if m.len() < 16 {
            return None;
        }
        Some(Self {
            coefficients: [m[3], m[0], m[1], m[7], m[4], m[5]],
        })
    }

    /// Row-major 4x4 GeoTIFF ModelTransformation matrix.
    pub(crate) fn to_model_transformation(&self) -> [f64; 16] {
        let c = &self.coefficients;
        [
            c[1], c[2], 0.0, c[0], //
            c[4], c[5], 0.0, c[3], //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]
    }

    /// GDAL-ordered coefficients.
    pub fn coefficients(&self) -> [f64; 6] {
        self.coefficients
    }

    /// X coordinate of the upper-left corner.
    pub fn origin_x(&self) -> f64 {
        self.coefficients[0]
    }

    /// Y coordinate of the upper-left corner.
    pub fn origin_y(&self) -> f64 {
        self.coefficients[3]
    }

    /// Pixel width (x step per column).
    pub fn pixel_width(&self) -> f64 {
        self.coefficients[1]
    }

    /// Signed pixel height (y step per row).
    pub fn pixel_height(&self) -> f64 {
        self.coefficients[5]
    }

    /// True when both rotation terms are zero.
    pub fn is_north_up(&self) -> bool {
        self.coefficients[2] == 0.0 && self.coefficients[4] == 0.0
    }

    /// Move an origin given at the center of the upper-left cell
    /// (GeoTIFF PixelIsPoint) to the cell's corner.
    pub(crate) fn center_origin_to_corner(self) -> Self {
        let c = self.coefficients;
        Self {
            coefficients: [
                c[0] - 0.5 * (c[1] + c[2]),
                c[1],
                c[2],
                c[3] - 0.5 * (c[4] + c[5]),
                c[4],
                c[5],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_model_transformation_matches_gdal_order() {
        let gt = GeoTransform::from_coefficients([500_000.0, 30.0, 2.0, 4_200_000.0, 1.5, -30.0]);
        let matrix = gt.to_model_transformation();
        let back = GeoTransform::from_model_transformation(&matrix).expect("16 coefficients");
        assert_eq!(back, gt);
        assert_relative_eq!(matrix[1], 2.0);
        assert_relative_eq!(matrix[4], 1.5);
    }

    #[test]
    fn test_north_up() {
        let gt = GeoTransform::north_up(0.0, 100.0, 10.0, -10.0);
        assert!(gt.is_north_up());
        assert_eq!((gt.origin_x(), gt.origin_y()), (0.0, 100.0));
        assert!(!GeoTransform::from_coefficients([0.0, 10.0, 0.5, 100.0, 0.0, -10.0]).is_north_up());
    }

    #[test]
    fn test_center_origin_to_corner() {
        let north_up = GeoTransform::north_up(1000.0, 2000.0, 10.0, -10.0).center_origin_to_corner();
        assert_eq!((north_up.origin_x(), north_up.origin_y()), (995.0, 2005.0));

        let rotated = GeoTransform::from_coefficients([0.0, 2.0, 1.0, 0.0, 1.0, -2.0]).center_origin_to_corner();
        assert_eq!((rotated.origin_x(), rotated.origin_y()), (-1.5, 0.5));
    }

    #[test]
    fn test_short_matrix_rejected() {
        assert!(GeoTransform::from_model_transformation(&[1.0; 6]).is_none());
    }
}
