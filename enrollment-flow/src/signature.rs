//! Freehand signature surface driven by pointer or touch events.
//!
//! The pad keeps the strokes drawn so far and rasterizes them into a
//! transparent PNG whenever a stroke ends. Clearing wipes everything and
//! reports that no signature is present.

use image::{Rgba, RgbaImage, codecs::png::PngEncoder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ImageError;
use crate::photo;

pub const PAD_WIDTH: u32 = 500;
pub const PAD_HEIGHT: u32 = 200;
pub const LINE_WIDTH: f32 = 2.0;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Pad-local coordinates in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Input events, mouse and touch alike
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    Down(Point),
    Move(Point),
    Up,
    Leave,
    Clear,
}

/// What the pad reports back to the form
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureUpdate {
    /// PNG data URL of everything drawn so far
    Saved(String),
    Cleared,
}

impl SignatureUpdate {
    /// The value to store in the draft's signature slot
    pub fn into_value(self) -> Option<String> {
        match self {
            SignatureUpdate::Saved(url) => Some(url),
            SignatureUpdate::Cleared => None,
        }
    }
}

pub struct SignaturePad {
    width: u32,
    height: u32,
    background: Option<RgbaImage>,
    strokes: Vec<Vec<Point>>,
    drawing: bool,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new()
    }
}

impl SignaturePad {
    pub fn new() -> Self {
        Self::with_size(PAD_WIDTH, PAD_HEIGHT)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            strokes: Vec::new(),
            drawing: false,
        }
    }

    /// Reopens the pad with a signature captured earlier
    pub fn restore(&mut self, data_url: &str) -> Result<(), ImageError> {
        let Some((_, bytes)) = photo::decode_data_url(data_url) else {
            return Err(ImageError::UnsupportedMediaType("malformed data URL".into()));
        };
        self.background = Some(image::load_from_memory(&bytes)?.to_rgba8());
        Ok(())
    }

    pub fn has_signature(&self) -> bool {
        self.background.is_some() || !self.strokes.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn handle(&mut self, event: PadEvent) -> Result<Option<SignatureUpdate>, ImageError> {
        match event {
            PadEvent::Down(point) => {
                self.begin(point);
                Ok(None)
            }
            PadEvent::Move(point) => {
                self.extend(point);
                Ok(None)
            }
            PadEvent::Up | PadEvent::Leave => self.end(),
            PadEvent::Clear => Ok(Some(self.clear())),
        }
    }

    /// Starts a stroke; a lone tap still leaves a dot
    pub fn begin(&mut self, point: Point) {
        self.drawing = true;
        self.strokes.push(vec![point]);
    }

    pub fn extend(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(point);
        }
    }

    /// Finishes the current stroke and emits the rasterized signature
    pub fn end(&mut self) -> Result<Option<SignatureUpdate>, ImageError> {
        if !self.drawing {
            return Ok(None);
        }
        self.drawing = false;
        debug!(strokes = self.strokes.len(), "signature stroke completed");
        Ok(Some(SignatureUpdate::Saved(self.to_data_url()?)))
    }

    pub fn clear(&mut self) -> SignatureUpdate {
        self.background = None;
        self.strokes.clear();
        self.drawing = false;
        SignatureUpdate::Cleared
    }

    /// Feeds whole strokes through the pad as down/move/up sequences,
    /// returning the last update
    pub fn replay(&mut self, strokes: &[Vec<Point>]) -> Result<Option<SignatureUpdate>, ImageError> {
        let mut last = None;
        for stroke in strokes {
            let Some((first, rest)) = stroke.split_first() else {
                continue;
            };
            self.handle(PadEvent::Down(*first))?;
            for point in rest {
                self.handle(PadEvent::Move(*point))?;
            }
            last = self.handle(PadEvent::Up)?;
        }
        Ok(last)
    }

    pub fn render(&self) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width, self.height);
        if let Some(background) = &self.background {
            image::imageops::overlay(&mut canvas, background, 0, 0);
        }
        let radius = LINE_WIDTH / 2.0;
        for stroke in &self.strokes {
            stamp(&mut canvas, stroke[0], radius);
            for pair in stroke.windows(2) {
                draw_segment(&mut canvas, pair[0], pair[1], radius);
            }
        }
        canvas
    }

    pub fn to_data_url(&self) -> Result<String, ImageError> {
        let mut png = Vec::new();
        self.render().write_with_encoder(PngEncoder::new(&mut png))?;
        Ok(photo::data_url("image/png", &png))
    }
}

fn draw_segment(canvas: &mut RgbaImage, from: Point, to: Point, radius: f32) {
    let Some((from, to)) = clip_segment(canvas, from, to, f64::from(radius.max(0.75))) else {
        return;
    };
    let length = ((to.x - from.x).powi(2) + (to.y - from.y).powi(2)).sqrt();
    let steps = (length / 0.5).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp(
            canvas,
            Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t),
            radius,
        );
    }
}

/// Cuts the segment down to the part whose brush can touch the canvas
/// (Liang-Barsky). `None` when nothing of it lands on the pad.
fn clip_segment(canvas: &RgbaImage, from: Point, to: Point, reach: f64) -> Option<(Point, Point)> {
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
    if !(x0.is_finite() && y0.is_finite() && dx.is_finite() && dy.is_finite()) {
        return None;
    }
    let (min_x, min_y) = (-reach, -reach);
    let max_x = f64::from(canvas.width()) - 1.0 + reach;
    let max_y = f64::from(canvas.height()) - 1.0 + reach;

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, x0 - min_x),
        (dx, max_x - x0),
        (-dy, y0 - min_y),
        (dy, max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| Point::new((x0 + dx * t) as f32, (y0 + dy * t) as f32);
    Some((at(t0), at(t1)))
}

/// Round brush: inks every pixel whose center lies within `radius`
fn stamp(canvas: &mut RgbaImage, center: Point, radius: f32) {
    let reach = radius.max(0.75);
    let min_x = (center.x - reach).floor().max(0.0) as u32;
    let min_y = (center.y - reach).floor().max(0.0) as u32;
    let max_x = (center.x + reach).ceil().min(canvas.width() as f32 - 1.0);
    let max_y = (center.y + reach).ceil().min(canvas.height() as f32 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    for y in min_y..=max_y as u32 {
        for x in min_x..=max_x as u32 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= reach * reach {
                canvas.put_pixel(x, y, INK);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inked(image: &RgbaImage) -> usize {
        image.pixels().filter(|p| p.0[3] > 0).count()
    }

    #[test]
    fn stroke_completion_emits_png() {
        let mut pad = SignaturePad::new();
        assert!(!pad.has_signature());

        assert_eq!(pad.handle(PadEvent::Down(Point::new(10.0, 10.0))).unwrap(), None);
        pad.handle(PadEvent::Move(Point::new(60.0, 40.0))).unwrap();
        let update = pad.handle(PadEvent::Up).unwrap();

        let url = match update {
            Some(SignatureUpdate::Saved(url)) => url,
            other => panic!("expected a saved signature, got {other:?}"),
        };
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(pad.has_signature());

        let (_, bytes) = photo::decode_data_url(&url).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (PAD_WIDTH, PAD_HEIGHT));
    }

    #[test]
    fn tap_leaves_a_dot() {
        let mut pad = SignaturePad::new();
        pad.begin(Point::new(100.0, 100.0));
        assert!(inked(&pad.render()) > 0);
    }

    #[test]
    fn moves_outside_a_stroke_are_ignored() {
        let mut pad = SignaturePad::new();
        pad.handle(PadEvent::Move(Point::new(5.0, 5.0))).unwrap();
        assert!(!pad.has_signature());
        assert_eq!(pad.handle(PadEvent::Leave).unwrap(), None);
        assert_eq!(inked(&pad.render()), 0);
    }

    #[test]
    fn clear_wipes_the_surface() {
        let mut pad = SignaturePad::new();
        pad.replay(&[vec![Point::new(1.0, 1.0), Point::new(50.0, 50.0)]])
            .unwrap();
        assert!(pad.has_signature());

        let update = pad.handle(PadEvent::Clear).unwrap();
        assert_eq!(update, Some(SignatureUpdate::Cleared));
        assert_eq!(update.and_then(SignatureUpdate::into_value), None);
        assert!(!pad.has_signature());
        assert_eq!(inked(&pad.render()), 0);
    }

    #[test]
    fn restored_signature_counts_as_signed() {
        let mut first = SignaturePad::new();
        let url = first
            .replay(&[vec![Point::new(20.0, 20.0), Point::new(80.0, 20.0)]])
            .unwrap()
            .and_then(SignatureUpdate::into_value)
            .unwrap();

        let mut second = SignaturePad::new();
        second.restore(&url).unwrap();
        assert!(second.has_signature());
        assert_eq!(inked(&second.render()), inked(&first.render()));
    }

    #[test]
    fn far_away_points_still_ink_the_visible_part() {
        let mut pad = SignaturePad::new();
        pad.replay(&[vec![Point::new(10.0, 10.0), Point::new(1e12, 10.0)]])
            .unwrap();
        let canvas = pad.render();
        assert!(inked(&canvas) > 0);
        assert_eq!(canvas.get_pixel(PAD_WIDTH - 1, 10), &INK);
        assert_eq!(canvas.get_pixel(5, 10), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn segments_entirely_off_the_pad_draw_nothing() {
        let mut pad = SignaturePad::with_size(20, 20);
        pad.replay(&[vec![Point::new(-1e12, -50.0), Point::new(1e12, -50.0)]])
            .unwrap();
        assert_eq!(inked(&pad.render()), 0);
    }

    #[test]
    fn points_off_the_pad_are_clipped() {
        let mut pad = SignaturePad::with_size(20, 20);
        pad.replay(&[vec![Point::new(-30.0, -30.0), Point::new(60.0, 60.0)]])
            .unwrap();
        assert!(inked(&pad.render()) > 0);
    }
}
