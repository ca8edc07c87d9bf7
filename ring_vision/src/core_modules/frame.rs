use crate::error::VisionError;
use image::RgbImage;

const CHANNELS: usize = 3;

/// Builds an RGB frame from a packed BGR buffer, the layout video decoders hand back.
pub fn rgb_from_bgr(width: u32, height: u32, mut bytes: Vec<u8>) -> Result<RgbImage, VisionError> {
    let expected = width as usize * height as usize * CHANNELS;
    if bytes.len() != expected {
        return Err(VisionError::FrameBuffer {
            width,
            height,
            len: bytes.len(),
        });
    }

    for pixel in bytes.chunks_exact_mut(CHANNELS) {
        pixel.swap(0, 2);
    }

    RgbImage::from_raw(width, height, bytes).ok_or(VisionError::FrameBuffer {
        width,
        height,
        len: expected,
    })
}

/// Packs an RGB frame back into BGR order.
pub fn bgr_bytes(frame: &RgbImage) -> Vec<u8> {
    let mut bytes = frame.as_raw().clone();
    for pixel in bytes.chunks_exact_mut(CHANNELS) {
        pixel.swap(0, 2);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn channels_are_swapped() {
        let frame = rgb_from_bgr(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
        assert_eq!(*frame.get_pixel(0, 0), Rgb([0, 0, 255]));
        assert_eq!(*frame.get_pixel(1, 0), Rgb([255, 0, 0]));
        assert_eq!(bgr_bytes(&frame), vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn short_buffers_are_rejected() {
        let err = rgb_from_bgr(4, 4, vec![0; 10]).unwrap_err();
        assert_eq!(
            err,
            VisionError::FrameBuffer {
                width: 4,
                height: 4,
                len: 10
            }
        );
    }
}
