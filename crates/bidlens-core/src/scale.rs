//! Conversion between OCR raster pixels, scale-1 page units and display pixels.
//!
//! Pages are rasterized at a fixed scale before OCR, so every located box is in
//! raster pixels. Dividing by that scale gives page units (PDF points); the
//! rendering layer multiplies by its own zoom. The two scales never need to agree.

use crate::model::{BoundingBox, ContactFieldHighlight, ContactHighlightMap, LineHighlight, LineHighlightMap};

/// Default scale pages are rendered at for OCR.
pub const OCR_SCALE: f32 = 2.0;

const POINTS_PER_INCH: f32 = 72.0;

/// Rasterizer resolution for a given scale (scale 1 is 72 DPI).
pub fn raster_dpi(scale: f32) -> u32 {
    (POINTS_PER_INCH * scale).round() as u32
}

impl BoundingBox {
    /// Raster pixels to scale-1 page units.
    pub fn to_page_units(&self, ocr_scale: f32) -> BoundingBox {
        self.scaled(1.0 / ocr_scale)
    }

    /// Raster pixels to display pixels at `zoom`.
    pub fn to_display(&self, ocr_scale: f32, zoom: f32) -> BoundingBox {
        self.to_page_units(ocr_scale).scaled(zoom)
    }

    fn scaled(&self, factor: f32) -> BoundingBox {
        BoundingBox {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

impl LineHighlight {
    pub fn to_page_units(&self, ocr_scale: f32) -> LineHighlight {
        let mut out = self.clone();
        for h in &mut out.highlights {
            h.bounding_box = h.bounding_box.to_page_units(ocr_scale);
        }
        out
    }
}

impl ContactFieldHighlight {
    pub fn to_page_units(&self, ocr_scale: f32) -> ContactFieldHighlight {
        ContactFieldHighlight {
            bounding_box: self.bounding_box.to_page_units(ocr_scale),
            ..self.clone()
        }
    }
}

/// Convert a whole line map into page units, leaving the input untouched.
pub fn line_map_to_page_units(map: &LineHighlightMap, ocr_scale: f32) -> LineHighlightMap {
    map.iter()
        .map(|(line, h)| (*line, h.to_page_units(ocr_scale)))
        .collect()
}

/// Convert a whole contact map into page units, leaving the input untouched.
pub fn contact_map_to_page_units(map: &ContactHighlightMap, ocr_scale: f32) -> ContactHighlightMap {
    map.iter()
        .map(|(field, h)| (*field, h.to_page_units(ocr_scale)))
        .collect()
}
