//! Tolerances shared by geometry and topology

/// Distance below which two points are considered coincident
pub const CONFUSION: f64 = 1.0e-7;

/// Angular tolerance in radians
pub const ANGULAR: f64 = 1.0e-12;

/// Parameter value reported for unbounded ends of a domain
pub const INFINITE: f64 = 2.0e100;

/// Default tolerance assigned to vertices and edges built without one
pub const DEFAULT_TOLERANCE: f64 = 1.0e-7;

/// Returns true if the parameter denotes an unbounded end
pub fn is_infinite(value: f64) -> bool {
    value.abs() >= INFINITE
}
