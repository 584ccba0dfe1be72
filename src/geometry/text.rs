use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use ttf_parser::{Face, FaceParsingError, GlyphId, OutlineBuilder};

use super::shape::{extrude_shape, Bevel, ExtrudeOptions, Shape, ShapePath};
use super::Geometry;

/// TrueType or OpenType font file, checked to parse.
///
/// Only the bytes are kept; glyph outlines are read from them on demand.
#[derive(Clone)]
pub struct Font {
    bytes: Arc<[u8]>,
    units_per_em: f32,
    line_height: f32,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("bytes", &self.bytes.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl Font {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FaceParsingError> {
        let face = Face::parse(&bytes, 0)?;
        let units_per_em = face.units_per_em().max(1) as f32;
        let line_height =
            face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32;
        Ok(Self {
            units_per_em,
            line_height,
            bytes: bytes.into(),
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.bytes, 0).ok()
    }

    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.face().and_then(|face| face.glyph_index(ch)).is_some()
    }

    /// Outlines of `text` set on a baseline at y = 0 with glyphs `size` units tall.
    ///
    /// Newlines start a new line below. Characters the font lacks fall back to
    /// `?`, and are skipped when that is missing too.
    pub fn generate_shapes(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Shape> {
        let Some(face) = self.face() else {
            return Vec::new();
        };
        let scale = size / self.units_per_em;
        let fallback = face.glyph_index('?');
        let mut pen = Vec2::ZERO;
        let mut shapes = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                pen = Vec2::new(0.0, pen.y - self.line_height * scale);
                continue;
            }
            let Some(glyph) = face.glyph_index(ch).or(fallback) else {
                log::debug!("No glyph for {:?}", ch);
                continue;
            };

            let mut sink = GlyphSink {
                path: ShapePath::new().with_curve_segments(curve_segments),
                scale,
                origin: pen,
            };
            face.outline_glyph(glyph, &mut sink);
            shapes.extend(sink.path.to_shapes());

            pen.x += advance(&face, glyph) * scale;
        }

        shapes
    }
}

fn advance(face: &Face<'_>, glyph: GlyphId) -> f32 {
    face.glyph_hor_advance(glyph).unwrap_or(0) as f32
}

/// Collects one glyph outline in scene units
struct GlyphSink {
    path: ShapePath,
    scale: f32,
    origin: Vec2,
}

impl GlyphSink {
    fn point(&self, x: f32, y: f32) -> Vec2 {
        self.origin + Vec2::new(x, y) * self.scale
    }
}

impl OutlineBuilder for GlyphSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p.x, p.y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p.x, p.y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (c, p) = (self.point(x1, y1), self.point(x, y));
        self.path.quadratic_curve_to(c.x, c.y, p.x, p.y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1, c2, p) = (self.point(x1, y1), self.point(x2, y2), self.point(x, y));
        self.path.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
    }

    // Subpaths are closed implicitly
    fn close(&mut self) {}
}

/// Extruded text settings; `size` is the em height in scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOptions {
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel: Option<Bevel>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 100.0,
            depth: 50.0,
            curve_segments: 12,
            bevel: None,
        }
    }
}

/// Solid text: every glyph outline extruded along +Z
pub fn text_geometry(font: &Font, text: &str, options: &TextOptions) -> Geometry {
    let extrude = ExtrudeOptions {
        depth: options.depth,
        bevel: options.bevel,
    };
    let mut mesh = Geometry::default();
    for shape in font.generate_shapes(text, options.size, options.curve_segments) {
        mesh.merge(&extrude_shape(&shape, &extrude));
    }
    mesh
}
