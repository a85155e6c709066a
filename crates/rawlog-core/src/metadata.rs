//! Color metadata extracted from a RAW file.

/// Camera color metadata.
///
/// Every field is optional because RAW containers vary in what they carry.
/// Built once by the decoder and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraMetadata {
    /// Camera make, e.g. `"FUJIFILM"`.
    pub make: String,
    /// Camera model, e.g. `"X-T5"`.
    pub model: String,
    /// Camera-native RGB → CIE XYZ (D65 relative), row-major.
    pub cam_to_xyz: Option<[[f64; 3]; 3]>,
    /// As-shot white-balance multipliers (R, G, B).
    pub white_balance: Option<[f64; 3]>,
    /// DNG `BaselineExposure` in stops.
    pub baseline_exposure: Option<f64>,
}

impl CameraMetadata {
    /// White-balance multipliers scaled so green is 1.
    ///
    /// `None` when absent or when any multiplier is non-finite or not
    /// strictly positive.
    pub fn normalized_white_balance(&self) -> Option<[f64; 3]> {
        let wb = self.white_balance?;
        if !wb.iter().all(|v| v.is_finite() && *v > 0.0) {
            return None;
        }
        Some([wb[0] / wb[1], 1.0, wb[2] / wb[1]])
    }

    /// `"make model"` for log lines.
    pub fn camera_name(&self) -> String {
        match (self.make.is_empty(), self.model.is_empty()) {
            (true, true) => "unknown camera".to_string(),
            (false, true) => self.make.clone(),
            (true, false) => self.model.clone(),
            (false, false) => format!("{} {}", self.make, self.model),
        }
    }
}
