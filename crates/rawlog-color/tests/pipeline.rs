//! End-to-end pipeline behavior on synthetic buffers.

use std::sync::Arc;

use rawlog_color::{
    CancelToken, ColorError, ExposureSource, LutSpace, Metering, Pipeline, PipelineStage,
    RenderTarget,
};
use rawlog_core::{BitDepth, CAMERA_NATIVE, CameraMetadata, Encoding, PixelBuffer};
use rawlog_lut::{Interpolation, Lut3D};

/// sRGB → XYZ (D65), standing in for a camera matrix.
const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

fn meta() -> CameraMetadata {
    CameraMetadata {
        make: "Synthetic".into(),
        model: "sRGB".into(),
        cam_to_xyz: Some(SRGB_TO_XYZ),
        white_balance: Some([2.0, 1.0, 1.5]),
        baseline_exposure: None,
    }
}

fn raw(w: u32, h: u32, data: Vec<f32>) -> PixelBuffer {
    PixelBuffer::new(w, h, data, Encoding::SceneLinear(CAMERA_NATIVE)).unwrap()
}

fn golden_input() -> PixelBuffer {
    raw(
        2,
        2,
        vec![
            0.18, 0.18, 0.18, //
            0.5, 0.25, 0.1, //
            0.05, 0.1, 0.2, //
            0.9, 0.8, 0.7,
        ],
    )
}

#[test]
fn golden_f_log2_adobe_16bit() {
    let expected: [u16; 12] = [
        30050, 30050, 30050, //
        41967, 34870, 24328, //
        20181, 22797, 30903, //
        60869, 59246, 56035,
    ];

    let pipeline = Pipeline::builder("F-Log2").exposure(Some(0.0)).build().unwrap();
    let out = pipeline.run(golden_input(), &meta(), &CancelToken::new()).unwrap();

    assert_eq!(out.image.profile(), "Adobe RGB (1998)");
    assert_eq!(out.image.depth(), BitDepth::Sixteen);
    for (i, (got, want)) in out.image.data().iter().zip(expected).enumerate() {
        assert!(
            (*got as i32 - want as i32).abs() <= 1,
            "sample {i}: got {got}, expected {want}"
        );
    }
}

#[test]
fn neutral_stays_neutral() {
    let pipeline = Pipeline::builder("V-Log").exposure(Some(0.0)).build().unwrap();
    let out = pipeline
        .run(raw(1, 1, vec![0.3, 0.3, 0.3]), &meta(), &CancelToken::new())
        .unwrap();
    let px = out.image.data();
    assert!((px[0] as i32 - px[1] as i32).abs() <= 1);
    assert!((px[1] as i32 - px[2] as i32).abs() <= 1);
}

#[test]
fn exposure_tiering() {
    let gray = || raw(4, 4, vec![0.05; 48]);
    let cancel = CancelToken::new();

    // manual wins over metadata
    let mut with_baseline = meta();
    with_baseline.baseline_exposure = Some(1.5);
    let manual = Pipeline::builder("F-Log2").exposure(Some(-1.0)).build().unwrap();
    let d = manual.run(gray(), &with_baseline, &cancel).unwrap().exposure;
    assert_eq!(d.source, ExposureSource::Manual);
    assert_eq!(d.scale, 0.5);

    // metadata wins without manual
    let auto = Pipeline::builder("F-Log2").build().unwrap();
    let d = auto.run(gray(), &with_baseline, &cancel).unwrap().exposure;
    assert_eq!(d.source, ExposureSource::Metadata);
    assert!((d.stops - 1.5).abs() < 1e-12);

    // auto otherwise: the uniform gray lands on 0.18
    let d = auto.run(gray(), &meta(), &cancel).unwrap().exposure;
    assert_eq!(d.source, ExposureSource::Auto(Metering::Hybrid));
    assert!(d.scale.is_finite());
    assert!((d.scale * 0.05 - 0.18).abs() < 1e-5, "scale {}", d.scale);
}

#[test]
fn identity_lut_preserves_log_signal() {
    let flat = Pipeline::builder("F-Log2")
        .exposure(Some(0.0))
        .target(RenderTarget::LogSignal)
        .build()
        .unwrap();
    let cancel = CancelToken::new();
    let reference = flat.run(golden_input(), &meta(), &cancel).unwrap().image;

    for interp in [Interpolation::Trilinear, Interpolation::Tetrahedral] {
        let graded = Pipeline::builder("F-Log2")
            .exposure(Some(0.0))
            .lut(Arc::new(Lut3D::identity(33).unwrap()), LutSpace::Rec709)
            .interpolation(interp)
            .target(RenderTarget::LogSignal)
            .build()
            .unwrap();
        let image = graded.run(golden_input(), &meta(), &cancel).unwrap().image;
        assert_eq!(image.profile(), "Rec.709");
        for (a, b) in reference.data().iter().zip(image.data()) {
            assert!((*a as i32 - *b as i32).abs() <= 1, "{interp:?}: {a} vs {b}");
        }
    }
}

#[test]
fn bright_input_quantizes_to_full_scale() {
    let pipeline = Pipeline::builder("F-Log2").exposure(Some(0.0)).build().unwrap();
    let out = pipeline
        .run(raw(1, 1, vec![50.0, 50.0, 50.0]), &meta(), &CancelToken::new())
        .unwrap();
    assert_eq!(out.image.data(), &[65535, 65535, 65535]);
}

#[test]
fn eight_bit_output() {
    let pipeline = Pipeline::builder("F-Log2")
        .exposure(Some(0.0))
        .depth(BitDepth::Eight)
        .build()
        .unwrap();
    let out = pipeline.run(golden_input(), &meta(), &CancelToken::new()).unwrap();
    assert!(out.image.data().iter().all(|&v| v <= 255));
    // 30050 / 65535 * 255 ≈ 116.9
    assert_eq!(out.image.data()[0], 117);
}

#[test]
fn failure_names_the_stage() {
    let pipeline = Pipeline::builder("F-Log2").build().unwrap();
    let mut no_wb = meta();
    no_wb.white_balance = None;
    let err = pipeline.run(golden_input(), &no_wb, &CancelToken::new()).unwrap_err();
    assert_eq!(err.stage(), Some(PipelineStage::CameraToAces));
    assert!(matches!(err.root(), ColorError::MissingColorMetadata(_)));
}
