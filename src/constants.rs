/// Split gains within this tolerance of zero are treated as zero, so that
/// floating point noise cannot force a degenerate split.
pub const GAIN_EPS: f64 = 1e-12;
