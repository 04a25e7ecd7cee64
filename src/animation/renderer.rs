//! Frame rendering for string animations.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const STRING: Rgba<u8> = Rgba([0, 0, 0, 255]);
const MIDLINE: Rgba<u8> = Rgba([220, 220, 220, 255]);
const PARTICLE: Rgba<u8> = Rgba([255, 0, 0, 255]);
const PROGRESS: Rgba<u8> = Rgba([130, 130, 230, 255]);

/// Horizontal margin around the string, in pixels.
const MARGIN: u32 = 15;
/// Vertical exaggeration of the displacement.
const YSCALE: f64 = 5.0;

/// Draws one frame per simulation step onto an RGBA canvas.
///
/// The string is a black polyline over a light midline (the rest position),
/// particles are red dots, and a thin bar along the top edge tracks run
/// progress.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    width: u32,
    height: u32,
    px_per_m: f64,
    dot_radius: i32,
    total_steps: u64,
}

impl FrameRenderer {
    /// Create a renderer for a run of `total_steps` over a string of
    /// `length` meters, rendered at `resolution` pixels and `dpi`.
    pub fn new(resolution: (u32, u32), dpi: u32, length: f64, total_steps: u64) -> Self {
        let (width, height) = resolution;
        let span = width.saturating_sub(2 * MARGIN).max(1);
        Self {
            width,
            height,
            px_per_m: span as f64 / length,
            dot_radius: ((dpi as f64 / 96.0).round() as i32).max(1),
            total_steps,
        }
    }

    /// Render the state `(row, positions)` of step `step` into a frame.
    pub fn draw_frame(&self, row: &[f64], positions: &[usize], step: u64) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let span = self.width.saturating_sub(2 * MARGIN).max(1) as f64;
        let cy = self.height as f64 / 2.0;
        let cells = row.len();
        let x_of = |i: usize| MARGIN as f64 + span * i as f64 / (cells - 1).max(1) as f64;
        let y_of = |v: f64| cy - v * self.px_per_m * YSCALE;

        draw_line_segment_mut(
            &mut frame,
            (MARGIN as f32, cy as f32),
            ((self.width - MARGIN) as f32, cy as f32),
            MIDLINE,
        );

        for i in 0..cells.saturating_sub(1) {
            draw_line_segment_mut(
                &mut frame,
                (x_of(i) as f32, y_of(row[i]) as f32),
                (x_of(i + 1) as f32, y_of(row[i + 1]) as f32),
                STRING,
            );
        }

        for &p in positions {
            if p < cells {
                draw_filled_circle_mut(
                    &mut frame,
                    (x_of(p) as i32, y_of(row[p]) as i32),
                    self.dot_radius,
                    PARTICLE,
                );
            }
        }

        if self.total_steps > 1 {
            let tick = span * step as f64 / (self.total_steps - 1) as f64;
            draw_line_segment_mut(
                &mut frame,
                (MARGIN as f32, 2.0),
                ((MARGIN as f64 + tick) as f32, 2.0),
                PROGRESS,
            );
        }

        frame
    }
}
