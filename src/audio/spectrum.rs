use crate::foundation::math::interpolate;
use crate::save::model::{SmoothingDef, SmoothingKind};

/// Redistribute a linearly indexed spectrum onto a logarithmic axis of the same length.
///
/// Source bin `i` lands on `floor(ln(i + 1) / ln(N) * N)` (clamped to the last slot); when several
/// bins land on the same slot the highest one wins. Slots left empty are filled by two-point linear
/// interpolation between their nearest filled neighbours. Slot 0 and the last slot are always
/// filled directly.
pub fn linear_to_log(input: &[f64]) -> Vec<f64> {
    let n = input.len();
    if n < 2 {
        return input.to_vec();
    }

    let mut slots: Vec<Option<f64>> = vec![None; n];
    let ln_n = (n as f64).ln();
    for (i, &v) in input.iter().enumerate() {
        let dest = (((i + 1) as f64).ln() / ln_n * n as f64).floor() as usize;
        slots[dest.min(n - 1)] = Some(v);
    }

    let mut out = Vec::with_capacity(n);
    out.push(slots[0].unwrap_or(input[0]));
    let mut last_filled = 0usize;
    for i in 1..n {
        if let Some(v) = slots[i] {
            out.push(v);
            last_filled = i;
            continue;
        }
        // The last slot is always filled, so a next neighbour exists.
        let next = (i + 1..n).find(|&j| slots[j].is_some()).unwrap_or(n - 1);
        let y0 = out[last_filled];
        let y1 = slots[next].unwrap_or(input[n - 1]);
        out.push(interpolate(
            i as f64,
            last_filled as f64,
            y0,
            next as f64,
            y1,
        ));
    }
    out
}

/// Arithmetic mean of `smoothed` without its last `tail_excluded` elements; 0 when nothing is left.
pub fn volume(smoothed: &[f64], tail_excluded: usize) -> f64 {
    let n = smoothed.len().saturating_sub(tail_excluded);
    if n == 0 {
        return 0.0;
    }
    smoothed[..n].iter().sum::<f64>() / n as f64
}

/// Per-bin temporal smoothing that remembers its previous output.
#[derive(Clone, Debug)]
pub struct Smoother {
    kind: SmoothingKind,
    factor: f64,
    previous: Vec<f64>,
    seeded: bool,
}

impl Smoother {
    pub fn new(kind: SmoothingKind, factor: f64) -> Self {
        Self {
            kind,
            factor: factor.clamp(0.0, 1.0),
            previous: Vec::new(),
            seeded: false,
        }
    }

    pub fn from_def(def: SmoothingDef) -> Self {
        Self::new(def.kind, def.factor)
    }

    /// Reconfigure without dropping history.
    pub fn set(&mut self, def: SmoothingDef) {
        self.kind = def.kind;
        self.factor = def.factor.clamp(0.0, 1.0);
    }

    /// Smooth `current` against the previous output and return the new output.
    ///
    /// The first call (or a call with a different length) seeds history from `current`, so it
    /// returns `current` unchanged apart from taking absolute values.
    pub fn apply(&mut self, current: &[f64]) -> &[f64] {
        if !self.seeded || self.previous.len() != current.len() {
            self.previous = current.iter().map(|v| v.abs()).collect();
            self.seeded = true;
            return &self.previous;
        }

        let f = self.factor;
        for (prev, &cur) in self.previous.iter_mut().zip(current) {
            let cur = cur.abs();
            *prev = match self.kind {
                SmoothingKind::Average => f * *prev + (1.0 - f) * cur,
                SmoothingKind::LinearDecrease => cur.max(*prev - f * 255.0),
                SmoothingKind::ProportionalDecrease => cur.max(*prev * f),
            };
        }
        &self.previous
    }

    pub fn output(&self) -> &[f64] {
        &self.previous
    }

    pub fn reset(&mut self) {
        self.previous.clear();
        self.seeded = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/spectrum.rs"]
mod tests;
