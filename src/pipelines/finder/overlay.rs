// SPDX-License-Identifier: GPL-3.0-only

//! Drawing search hits onto a frame
//!
//! Each hit gets a box outline and its score in a small built-in digit
//! font, drawn just inside the top-left corner of the box.

use super::types::TargetLocation;
use crate::constants::OutputFormat;
use crate::errors::CaptureError;
use crate::pipelines::photo::PhotoEncoder;
use crate::scan::Rectangle;
use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

/// Outline color of target boxes
pub const TARGET_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Draw the outline of `rect`, `thickness` pixels wide, growing inward
///
/// Parts falling outside the image are skipped.
pub fn draw_rect(img: &mut RgbImage, rect: Rectangle, color: Rgb<u8>, thickness: u32) {
    let (w, h) = img.dimensions();
    if rect.width == 0 || rect.height == 0 || rect.left >= w || rect.top >= h {
        return;
    }
    let x1 = (rect.right() - 1).min(w - 1);
    let y1 = (rect.bottom() - 1).min(h - 1);

    for t in 0..thickness {
        let xx0 = rect.left + t;
        let yy0 = rect.top + t;
        let Some(xx1) = x1.checked_sub(t) else { break };
        let Some(yy1) = y1.checked_sub(t) else { break };
        if xx0 > xx1 || yy0 > yy1 {
            break;
        }
        for x in xx0..=xx1 {
            img.put_pixel(x, yy0, color);
            img.put_pixel(x, yy1, color);
        }
        for y in yy0..=yy1 {
            img.put_pixel(xx0, y, color);
            img.put_pixel(xx1, y, color);
        }
    }
}

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: usize = 5;

/// Rows of a 3x5 glyph, most significant of the three bits on the left
fn glyph(c: char) -> Option<[u8; GLYPH_HEIGHT]> {
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        _ => return None,
    };
    Some(rows)
}

/// Draw `text` with its top-left corner at (`x`, `y`)
///
/// Only digits and `.` have glyphs; anything else leaves a blank cell.
/// Pixels outside the image are skipped.
pub fn draw_label(img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    let (w, h) = img.dimensions();

    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let left = x.saturating_add(i as u32 * (GLYPH_WIDTH + 1));

        for (row, bits) in rows.iter().enumerate() {
            let py = y.saturating_add(row as u32);
            for col in 0..GLYPH_WIDTH {
                let px = left.saturating_add(col);
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 && px < w && py < h {
                    img.put_pixel(px, py, color);
                }
            }
        }
    }
}

/// Outline every target on `img` and label it with its score
pub fn annotate(img: &mut RgbImage, targets: &[TargetLocation]) {
    for target in targets {
        draw_rect(img, target.rect, TARGET_COLOR, 1);
        draw_label(
            img,
            target.rect.left + 2,
            target.rect.top + 2,
            &target.score_label(),
            TARGET_COLOR,
        );
    }
}

/// Annotate a copy of `frame` and save it to `path`
///
/// The format comes from the extension of `path`; an extension that names
/// no supported format is an error and nothing is written.
pub fn save_annotated(
    frame: &RgbImage,
    targets: &[TargetLocation],
    path: &Path,
) -> Result<(), CaptureError> {
    let format = OutputFormat::from_path(path).ok_or_else(|| {
        CaptureError::UnsupportedSuffix(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;

    let mut annotated = frame.clone();
    annotate(&mut annotated, targets);
    PhotoEncoder::new(format)
        .save(&DynamicImage::ImageRgb8(annotated), path)
        .map_err(|e| CaptureError::SaveFailed(format!("{}: {}", path.display(), e)))
}
