//! Synthetic inputs shared by the rawlog benchmarks.
//!
//! Run with: `cargo bench -p rawlog-bench`

use rawlog_core::{CAMERA_NATIVE, CameraMetadata, Encoding, PixelBuffer};
use rawlog_lut::{Lut3D, LutResult};

/// A `width × height` camera-native frame with a smooth color sweep.
pub fn camera_frame(width: u32, height: u32) -> PixelBuffer {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            let u = x as f32 / width as f32;
            let v = y as f32 / height as f32;
            [0.02 + 0.9 * u, 0.02 + 0.9 * v, 0.02 + 0.45 * (u + v)]
        })
        .collect();
    PixelBuffer::new(width, height, data, Encoding::SceneLinear(CAMERA_NATIVE))
        .unwrap_or_else(|e| panic!("bench frame: {e}"))
}

/// sRGB-like camera metadata.
pub fn camera_metadata() -> CameraMetadata {
    CameraMetadata {
        make: "Bench".into(),
        model: "Synthetic".into(),
        cam_to_xyz: Some([
            [0.4124564, 0.3575761, 0.1804375],
            [0.2126729, 0.7151522, 0.0721750],
            [0.0193339, 0.1191920, 0.9503041],
        ]),
        white_balance: Some([2.0, 1.0, 1.5]),
        baseline_exposure: None,
    }
}

/// A non-trivial grid: a contrast curve with a slight warm cast.
pub fn look_lut(size: usize) -> LutResult<Lut3D> {
    let n = (size - 1) as f32;
    let curve = |v: f32| v * v * (3.0 - 2.0 * v);
    let data = (0..size * size * size)
        .map(|i| {
            let r = (i % size) as f32 / n;
            let g = ((i / size) % size) as f32 / n;
            let b = (i / (size * size)) as f32 / n;
            [curve(r) * 1.02, curve(g), curve(b) * 0.97]
        })
        .collect();
    Lut3D::new(data, size)
}
