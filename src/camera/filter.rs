use super::device::RawFrame;
use serde::{Deserialize, Serialize};

/// Cosmetic preview filters. Selecting one updates the live preview token
/// immediately; pixels are only touched when a capture bakes the filter
/// into the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Sepia,
    Blur,
}

impl FilterKind {
    /// All selectable filters, in display order
    pub fn all() -> &'static [FilterKind] {
        &[
            FilterKind::None,
            FilterKind::Grayscale,
            FilterKind::Sepia,
            FilterKind::Blur,
        ]
    }

    /// Display label for the filter buttons
    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::None => "None",
            FilterKind::Grayscale => "Grayscale",
            FilterKind::Sepia => "Sepia",
            FilterKind::Blur => "Blur",
        }
    }

    /// CSS token applied to the live preview
    pub fn css(&self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale(100%)",
            FilterKind::Sepia => "sepia(100%)",
            FilterKind::Blur => "blur(5px)",
        }
    }

    /// Bake the filter into captured pixels. The capture blur is softer
    /// than the preview token, matching the rendering the capture surface
    /// applies.
    pub fn apply(&self, frame: RawFrame) -> RawFrame {
        match self {
            FilterKind::None => frame,
            FilterKind::Grayscale => grayscale(frame),
            FilterKind::Sepia => sepia(frame),
            FilterKind::Blur => blur(frame, 3.0),
        }
    }
}

fn grayscale(mut frame: RawFrame) -> RawFrame {
    for pixel in frame.data.chunks_exact_mut(3) {
        let luma = (0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32)
            .round() as u8;
        pixel.fill(luma);
    }
    frame
}

fn sepia(mut frame: RawFrame) -> RawFrame {
    for pixel in frame.data.chunks_exact_mut(3) {
        let (r, g, b) = (pixel[0] as f32, pixel[1] as f32, pixel[2] as f32);
        pixel[0] = (0.393 * r + 0.769 * g + 0.189 * b).min(255.0) as u8;
        pixel[1] = (0.349 * r + 0.686 * g + 0.168 * b).min(255.0) as u8;
        pixel[2] = (0.272 * r + 0.534 * g + 0.131 * b).min(255.0) as u8;
    }
    frame
}

fn blur(frame: RawFrame, sigma: f32) -> RawFrame {
    match image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone()) {
        Some(img) => {
            let blurred = image::imageops::blur(&img, sigma);
            RawFrame {
                width: frame.width,
                height: frame.height,
                data: blurred.into_raw(),
            }
        }
        // Dimension mismatch; leave the frame untouched
        None => frame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_frame() -> RawFrame {
        let (width, height) = (8, 8);
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                if (x + y) % 2 == 0 {
                    data.extend_from_slice(&[200, 40, 90]);
                } else {
                    data.extend_from_slice(&[10, 220, 60]);
                }
            }
        }
        RawFrame {
            width,
            height,
            data,
        }
    }

    #[test]
    fn test_css_tokens() {
        assert_eq!(FilterKind::None.css(), "none");
        assert_eq!(FilterKind::Grayscale.css(), "grayscale(100%)");
        assert_eq!(FilterKind::Sepia.css(), "sepia(100%)");
        assert_eq!(FilterKind::Blur.css(), "blur(5px)");
    }

    #[test]
    fn test_none_is_identity() {
        let frame = checker_frame();
        let original = frame.data.clone();
        assert_eq!(FilterKind::None.apply(frame).data, original);
    }

    #[test]
    fn test_grayscale_equalizes_channels() {
        let result = FilterKind::Grayscale.apply(checker_frame());
        for pixel in result.data.chunks_exact(3) {
            assert_eq!(pixel[0], pixel[1]);
            assert_eq!(pixel[1], pixel[2]);
        }
    }

    #[test]
    fn test_sepia_formula() {
        let frame = RawFrame {
            width: 1,
            height: 1,
            data: vec![100, 50, 25],
        };
        let result = FilterKind::Sepia.apply(frame);
        // 0.393*100 + 0.769*50 + 0.189*25 = 82.475
        assert_eq!(result.data[0], 82);
        // 0.349*100 + 0.686*50 + 0.168*25 = 73.4
        assert_eq!(result.data[1], 73);
        // 0.272*100 + 0.534*50 + 0.131*25 = 57.175
        assert_eq!(result.data[2], 57);
    }

    #[test]
    fn test_sepia_saturates() {
        let frame = RawFrame {
            width: 1,
            height: 1,
            data: vec![255, 255, 255],
        };
        let result = FilterKind::Sepia.apply(frame);
        assert_eq!(result.data[0], 255);
    }

    #[test]
    fn test_blur_smooths_checker_pattern() {
        let frame = checker_frame();
        let original = frame.data.clone();
        let result = FilterKind::Blur.apply(frame);
        assert_eq!(result.data.len(), original.len());
        assert_ne!(result.data, original);
    }
}
