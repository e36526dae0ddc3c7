use crate::error::RenderError;

/// An RGBA pixel buffer representing a rendered image.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a buffer filled with a single opaque color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> crate::Result<Self> {
        check_dimensions(width, height)?;
        let pixel = [rgb[0], rgb[1], rgb[2], 255];
        Ok(Self {
            width,
            height,
            pixels: pixel.repeat(width as usize * height as usize),
        })
    }

    /// Wrap existing RGBA data, checking its length against the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> crate::Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// RGBA value at `(x, y)`, with `(0, 0)` the top-left pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> crate::Result<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    Ok(())
}
