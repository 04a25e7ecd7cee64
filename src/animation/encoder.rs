//! GIF encoding for accumulated animation frames.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

/// Statistics from encoding an animation.
#[derive(Debug, Clone)]
pub struct AnimationStats {
    /// Frames written to the artifact.
    pub frame_count: usize,
    /// Size of the artifact on disk.
    pub total_bytes: u64,
}

impl fmt::Display for AnimationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} frames, {} bytes", self.frame_count, self.total_bytes)
    }
}

/// Encode the accumulated frames into a single looping GIF at `path`.
///
/// Every frame gets the same `frame_duration_ms` delay. Fails on an empty
/// frame sequence rather than writing a degenerate artifact.
pub fn encode_gif(
    frames: Vec<RgbaImage>,
    path: &Path,
    frame_duration_ms: u32,
) -> io::Result<AnimationStats> {
    if frames.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no frames to encode",
        ));
    }
    let frame_count = frames.len();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = GifEncoder::new_with_speed(writer, 10);
    encoder.set_repeat(Repeat::Infinite).map_err(into_io)?;
    let delay = Delay::from_numer_denom_ms(frame_duration_ms, 1);
    for image in frames {
        encoder
            .encode_frame(Frame::from_parts(image, 0, 0, delay))
            .map_err(into_io)?;
    }
    drop(encoder);
    Ok(AnimationStats {
        frame_count,
        total_bytes: std::fs::metadata(path)?.len(),
    })
}

fn into_io(err: image::ImageError) -> io::Error {
    match err {
        image::ImageError::IoError(e) => e,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn encodes_a_nonempty_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.gif");
        let frames = vec![RgbaImage::from_pixel(32, 24, image::Rgba([255, 255, 255, 255])); 3];
        let stats = encode_gif(frames, &path, 12).unwrap();
        assert_eq!(stats.frame_count, 3);
        assert!(stats.total_bytes > 0);
        assert!(path.exists());
    }

    #[test]
    fn rejects_an_empty_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.gif");
        let err = encode_gif(Vec::new(), &path, 12).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(!path.exists());
    }
}
