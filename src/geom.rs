//! Position math shared by the player, the target and wall samples.
//!
//! Points and vectors are plain `[f32; 2]` world-space pairs.

#[inline]
pub fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
pub fn add(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] + b[0], a[1] + b[1]]
}

#[inline]
pub fn scale(v: [f32; 2], k: f32) -> [f32; 2] {
    [v[0] * k, v[1] * k]
}

#[inline]
pub fn length(v: [f32; 2]) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

#[inline]
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    length(sub(a, b))
}

/// Cartesian offset of `len` along `angle_deg` (0° = +x, 90° = +y).
#[inline]
pub fn polar(len: f32, angle_deg: f32) -> [f32; 2] {
    let (s, c) = angle_deg.to_radians().sin_cos();
    [len * c, len * s]
}

/// Vector of length `len` pointing from `from` to `to`.
///
/// Returns `None` when the points coincide, since there is no direction to
/// scale.
#[inline]
pub fn toward(from: [f32; 2], to: [f32; 2], len: f32) -> Option<[f32; 2]> {
    let d = sub(to, from);
    let l = length(d);
    if l <= f32::EPSILON {
        return None;
    }
    Some(scale(d, len / l))
}
