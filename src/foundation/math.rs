/// Two-point linear interpolation of `y` at `x` on the line through `(x0, y0)` and `(x1, y1)`.
///
/// Returns `y0` when the two points share the same `x`.
pub fn interpolate(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (x - x0) / (x1 - x0) * (y1 - y0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg % 360.0;
    if d < 0.0 { d + 360.0 } else { d }
}

/// Sample `data` at a fractional index with linear interpolation between neighbours.
///
/// Out-of-range indices clamp to the ends; an empty slice samples as zero.
pub fn sample_linear(data: &[f64], index: f64) -> f64 {
    let Some(last) = data.len().checked_sub(1) else {
        return 0.0;
    };
    if index <= 0.0 {
        return data[0];
    }
    let lo = index.floor() as usize;
    if lo >= last {
        return data[last];
    }
    interpolate(index, lo as f64, data[lo], (lo + 1) as f64, data[lo + 1])
}

/// FNV-1a, used to derive stable per-object RNG seeds.
#[derive(Clone, Copy, Debug)]
pub struct Fnv1a64(u64);

impl Fnv1a64 {
    pub const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

/// Seed for an object's private RNG, stable across runs for a given global seed.
pub fn object_seed(global_seed: u64, id: &str) -> u64 {
    let mut h = Fnv1a64::new(Fnv1a64::OFFSET_BASIS ^ global_seed);
    h.write_bytes(id.as_bytes());
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
