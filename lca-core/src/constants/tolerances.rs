//! Tolerances and Bounds
//!
//! Limits applied to end-of-life allocation fractions.

/// Lower bound for a single disposal-route fraction.
pub const RATE_MIN: f64 = 0.0;

/// Upper bound for a single disposal-route fraction.
pub const RATE_MAX: f64 = 1.0;

/// Value the three disposal-route fractions must add up to.
pub const RATE_SUM_TARGET: f64 = 1.0;

/// Allowed absolute deviation of the rate sum from [`RATE_SUM_TARGET`].
///
/// Absorbs rounding in hand-entered allocation data.
pub const RATE_SUM_TOLERANCE: f64 = 0.01;
