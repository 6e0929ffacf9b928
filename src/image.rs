// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;
use std::path::Path as FilePath;

use rgb::FromSlice;

use crate::error::Error;
use crate::surface::Surface;

impl Surface {
    /// Decodes a PNG image into a premultiplied surface.
    pub fn from_png_data(data: &[u8]) -> Result<Surface, Error> {
        let mut decoder = png::Decoder::new(data);
        decoder.set_transformations(png::Transformations::normalize_to_color8());
        let mut reader = decoder
            .read_info()
            .map_err(|_| Error::ImageDecodingFailed)?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|_| Error::ImageDecodingFailed)?;
        buf.truncate(info.buffer_size());

        let rgba = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(buf.len() / 3 * 4);
                for p in buf.as_rgb() {
                    rgba.extend_from_slice(&[p.r, p.g, p.b, 255]);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buf.len() * 4);
                for &g in &buf {
                    rgba.extend_from_slice(&[g, g, g, 255]);
                }
                rgba
            }
            png::ColorType::GrayscaleAlpha => {
                let mut rgba = Vec::with_capacity(buf.len() * 2);
                for ga in buf.chunks_exact(2) {
                    rgba.extend_from_slice(&[ga[0], ga[0], ga[0], ga[1]]);
                }
                rgba
            }
            png::ColorType::Indexed => return Err(Error::UnsupportedImageFormat),
        };

        Surface::from_rgba8(rgba, info.width as i32, info.height as i32)
    }

    /// Decodes a JPEG image into a premultiplied surface.
    pub fn from_jpeg_data(data: &[u8]) -> Result<Surface, Error> {
        let mut decoder = jpeg_decoder::Decoder::new(data);
        let pixels = decoder.decode().map_err(|_| Error::ImageDecodingFailed)?;
        let info = decoder.info().ok_or(Error::ImageDecodingFailed)?;

        let rgba = match info.pixel_format {
            jpeg_decoder::PixelFormat::RGB24 => {
                let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
                for p in pixels.as_rgb() {
                    rgba.extend_from_slice(&[p.r, p.g, p.b, 255]);
                }
                rgba
            }
            jpeg_decoder::PixelFormat::L8 => {
                let mut rgba = Vec::with_capacity(pixels.len() * 4);
                for &g in &pixels {
                    rgba.extend_from_slice(&[g, g, g, 255]);
                }
                rgba
            }
            jpeg_decoder::PixelFormat::L16 => {
                let mut rgba = Vec::with_capacity(pixels.len() * 2);
                for chunk in pixels.chunks_exact(2) {
                    let g = chunk[1];
                    rgba.extend_from_slice(&[g, g, g, 255]);
                }
                rgba
            }
            jpeg_decoder::PixelFormat::CMYK32 => {
                let mut rgba = Vec::with_capacity(pixels.len());
                for p in pixels.chunks_exact(4) {
                    let k = p[3] as u32;
                    rgba.extend_from_slice(&[
                        (p[0] as u32 * k / 255) as u8,
                        (p[1] as u32 * k / 255) as u8,
                        (p[2] as u32 * k / 255) as u8,
                        255,
                    ]);
                }
                rgba
            }
        };

        Surface::from_rgba8(rgba, info.width as i32, info.height as i32)
    }

    /// Reads and decodes a PNG file.
    pub fn load_png(path: impl AsRef<FilePath>) -> Result<Surface, Error> {
        let data = std::fs::read(path)?;
        Surface::from_png_data(&data)
    }

    /// Reads and decodes a JPEG file.
    pub fn load_jpeg(path: impl AsRef<FilePath>) -> Result<Surface, Error> {
        let data = std::fs::read(path)?;
        Surface::from_jpeg_data(&data)
    }

    /// Builds a premultiplied surface from non-premultiplied RGBA8 bytes.
    pub fn from_rgba8(data: Vec<u8>, width: i32, height: i32) -> Result<Surface, Error> {
        if width <= 0 || height <= 0 || data.len() < width as usize * height as usize * 4 {
            return Err(Error::ImageDecodingFailed);
        }

        let mut surface = Surface::from_data(data, width, height, width as usize * 4)
            .ok_or(Error::ImageDecodingFailed)?;
        surface.rgba_to_argb();
        Ok(surface)
    }

    /// Encodes the surface as a PNG file.
    pub fn save_png(&self, path: impl AsRef<FilePath>) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        self.write_png(std::io::BufWriter::new(file))
    }

    /// Encodes the surface as PNG into a writer.
    ///
    /// Pixels are un-premultiplied into RGBA on the way out;
    /// the surface itself stays unchanged.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<(), Error> {
        let width = self.width();
        let height = self.height();

        let mut rgba = Surface::new(width, height).ok_or(Error::ImageEncodingFailed)?;
        for y in 0..height {
            rgba.row_mut(y).copy_from_slice(self.row(y));
        }
        rgba.argb_to_rgba();

        let mut encoder = png::Encoder::new(writer, width as u32, height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|_| Error::ImageEncodingFailed)?;
        writer
            .write_image_data(rgba.data())
            .map_err(|_| Error::ImageEncodingFailed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip() {
        let mut surface = Surface::new(2, 2).unwrap();
        surface.data_mut()[0..4].copy_from_slice(&0xFFFF0000u32.to_le_bytes());
        surface.data_mut()[4..8].copy_from_slice(&0xFF00FF00u32.to_le_bytes());
        surface.data_mut()[8..12].copy_from_slice(&0xFF0000FFu32.to_le_bytes());
        surface.data_mut()[12..16].copy_from_slice(&0x80800000u32.to_le_bytes());

        let mut png_data = Vec::new();
        surface.write_png(&mut png_data).unwrap();

        let decoded = Surface::from_png_data(&png_data).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
        // Opaque pixels survive exactly.
        assert_eq!(decoded.pixel(0, 0), 0xFFFF0000);
        assert_eq!(decoded.pixel(1, 0), 0xFF00FF00);
        assert_eq!(decoded.pixel(0, 1), 0xFF0000FF);
        // The premultiplied half-red survives within rounding.
        let p = decoded.pixel(1, 1);
        assert_eq!(p >> 24, 0x80);
        assert!(((p >> 16 & 0xff) as i32 - 0x80).abs() <= 1);
    }

    #[test]
    fn broken_data_is_rejected() {
        assert!(Surface::from_png_data(&[0, 1, 2]).is_err());
        assert!(Surface::from_jpeg_data(&[0, 1, 2]).is_err());
    }

    #[test]
    fn from_rgba8_premultiplies() {
        // 50% transparent white.
        let surface = Surface::from_rgba8(vec![255, 255, 255, 128], 1, 1).unwrap();
        let p = surface.pixel(0, 0);
        assert_eq!(p >> 24, 128);
        assert_eq!(p & 0xff, 128);
    }
}
