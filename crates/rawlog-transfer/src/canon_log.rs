//! Canon Log 2 and Canon Log 3.
//!
//! Both are a pair of log segments mirrored about the code value of
//! linear zero, so negative scene values encode symmetrically. Canon
//! Log 3 splices a straight segment in around black. Scene values are
//! divided by 0.9 before encoding (Canon's reflectance normalization).
//!
//! Constants from the Canon Log gamma white paper as carried by OCIO's
//! CanonCameras builtins.

/// Scene value that Canon's curves treat as 100% reflectance.
const NORM: f64 = 0.9;

/// `offset ± slope · log10(1 + scale · |x|)`, with separate offsets for
/// the negative and positive branch.
#[derive(Debug, Clone, Copy)]
struct MirroredLog {
    slope: f64,
    scale: f64,
    offset_neg: f64,
    offset_pos: f64,
}

impl MirroredLog {
    #[inline]
    fn encode_neg(&self, x: f64) -> f64 {
        self.offset_neg - self.slope * (1.0 - self.scale * x).log10()
    }

    #[inline]
    fn encode_pos(&self, x: f64) -> f64 {
        self.offset_pos + self.slope * (1.0 + self.scale * x).log10()
    }

    #[inline]
    fn decode_neg(&self, y: f64) -> f64 {
        (1.0 - 10f64.powf((self.offset_neg - y) / self.slope)) / self.scale
    }

    #[inline]
    fn decode_pos(&self, y: f64) -> f64 {
        (10f64.powf((y - self.offset_pos) / self.slope) - 1.0) / self.scale
    }
}

const CLOG2: MirroredLog = MirroredLog {
    slope: 0.24136077,
    scale: 87.099375,
    offset_neg: 0.092864125,
    offset_pos: 0.092864125,
};

const CLOG3: MirroredLog = MirroredLog {
    slope: 0.36726845,
    scale: 14.98325,
    offset_neg: 0.12783901,
    offset_pos: 0.12240537,
};

/// Canon Log 3 straight segment: `y = LIN_SLOPE · x + LIN_OFFSET` for
/// code values in `[CLOG3_CUT_LOW, CLOG3_CUT_HIGH]`.
const CLOG3_LIN_SLOPE: f64 = 1.9754798;
const CLOG3_LIN_OFFSET: f64 = 0.12512219;
const CLOG3_CUT_LOW: f64 = 0.097465473;
const CLOG3_CUT_HIGH: f64 = 0.15277891;

/// Linear to Canon Log 2.
pub fn canon_log2_encode(linear: f64) -> f64 {
    let x = linear / NORM;
    if x < 0.0 { CLOG2.encode_neg(x) } else { CLOG2.encode_pos(x) }
}

/// Canon Log 2 to linear.
pub fn canon_log2_decode(log: f64) -> f64 {
    let x = if log < CLOG2.offset_neg {
        CLOG2.decode_neg(log)
    } else {
        CLOG2.decode_pos(log)
    };
    x * NORM
}

/// Linear to Canon Log 3.
///
/// The straight-segment bounds in linear are the decode cuts mapped
/// through the straight segment, so both directions switch at the same
/// place.
pub fn canon_log3_encode(linear: f64) -> f64 {
    let x = linear / NORM;
    let low = (CLOG3_CUT_LOW - CLOG3_LIN_OFFSET) / CLOG3_LIN_SLOPE;
    let high = (CLOG3_CUT_HIGH - CLOG3_LIN_OFFSET) / CLOG3_LIN_SLOPE;
    if x < low {
        CLOG3.encode_neg(x)
    } else if x <= high {
        CLOG3_LIN_SLOPE * x + CLOG3_LIN_OFFSET
    } else {
        CLOG3.encode_pos(x)
    }
}

/// Canon Log 3 to linear.
pub fn canon_log3_decode(log: f64) -> f64 {
    let x = if log < CLOG3_CUT_LOW {
        CLOG3.decode_neg(log)
    } else if log <= CLOG3_CUT_HIGH {
        (log - CLOG3_LIN_OFFSET) / CLOG3_LIN_SLOPE
    } else {
        CLOG3.decode_pos(log)
    };
    x * NORM
}
