//! Particle flow: a small per-widget simulation driven by the frame's volume.
//!
//! All angles are degrees (0 points right, 90 points down); radians appear only inside the
//! trigonometry of [`velocity`]. Positions are local to the widget's top-left corner.

use super::surface::{Dot, Visual, WidgetBox};
use super::{FrameContext, RenderSurface, Widget};
use crate::foundation::core::{Point, Size, Vec2};
use crate::foundation::ids::ObjectId;
use crate::foundation::math::{deg_to_rad, normalize_deg};
use crate::save::model::{FlowType, ObjectKind, ParticleFlowProps};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Volume-to-speed divisor, in pixels per frame.
const SPEED_DIVISOR: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

/// Edges a directional particle may enter from: the edges trailing the flow direction.
///
/// Exact multiples of 90° have one trailing edge; inside a quadrant both are candidates.
pub fn trailing_edges(direction_deg: f64) -> (Edge, Option<Edge>) {
    let d = normalize_deg(direction_deg);
    match d {
        d if d == 0.0 => (Edge::Left, None),
        d if d < 90.0 => (Edge::Left, Some(Edge::Top)),
        d if d == 90.0 => (Edge::Top, None),
        d if d < 180.0 => (Edge::Right, Some(Edge::Top)),
        d if d == 180.0 => (Edge::Right, None),
        d if d < 270.0 => (Edge::Right, Some(Edge::Bottom)),
        d if d == 270.0 => (Edge::Bottom, None),
        _ => (Edge::Left, Some(Edge::Bottom)),
    }
}

/// Unit velocity for a direction in degrees, y pointing down.
pub fn velocity(direction_deg: f64) -> Vec2 {
    let (sin, cos) = deg_to_rad(direction_deg).sin_cos();
    Vec2::new(cos, sin)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub center: Point,
    pub radius: f64,
    /// Travel direction in degrees.
    pub direction: f64,
}

impl Particle {
    /// `true` once no part of the particle overlaps `[0, w] x [0, h]`.
    pub fn is_outside(&self, size: Size) -> bool {
        let Point { x, y } = self.center;
        let r = self.radius;
        x + r < 0.0 || x - r > size.width || y + r < 0.0 || y - r > size.height
    }
}

pub struct ParticleFlowWidget {
    id: ObjectId,
    rng: StdRng,
    particles: Vec<Particle>,
}

impl ParticleFlowWidget {
    pub fn new(id: ObjectId, seed: u64) -> Self {
        Self {
            id,
            rng: StdRng::seed_from_u64(seed),
            particles: Vec::new(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    fn radius(&mut self, range: [f64; 2]) -> f64 {
        let lo = range[0].min(range[1]).max(0.0);
        let hi = range[0].max(range[1]).max(0.0);
        if hi > lo {
            self.rng.gen_range(lo..=hi)
        } else {
            lo
        }
    }

    fn spawn(&mut self, props: &ParticleFlowProps, size: Size) -> Particle {
        let radius = self.radius(props.particle_radius_range);
        match props.flow_type {
            FlowType::Radial => Particle {
                center: props.flow_center,
                radius,
                direction: self.rng.gen_range(0.0..360.0),
            },
            FlowType::Directional => {
                let edge = match trailing_edges(props.flow_direction) {
                    (only, None) => only,
                    (a, Some(b)) => {
                        if self.rng.gen_bool(0.5) {
                            a
                        } else {
                            b
                        }
                    }
                };
                let along_x = self.rng.gen_range(0.0..=size.width.max(0.0));
                let along_y = self.rng.gen_range(0.0..=size.height.max(0.0));
                // Enter just outside the edge so the particle slides in.
                let center = match edge {
                    Edge::Left => Point::new(-radius, along_y),
                    Edge::Right => Point::new(size.width + radius, along_y),
                    Edge::Top => Point::new(along_x, -radius),
                    Edge::Bottom => Point::new(along_x, size.height + radius),
                };
                Particle {
                    center,
                    radius,
                    direction: normalize_deg(props.flow_direction),
                }
            }
        }
    }

    /// One simulation step: spawn trials, advance by `volume / 20`, cull escaped particles.
    pub fn step(&mut self, props: &ParticleFlowProps, size: Size, volume: f64) {
        let probability = props.particle_spawn_probability.clamp(0.0, 1.0);
        for _ in 0..props.particle_spawn_tests {
            if self.rng.gen_bool(probability) {
                let p = self.spawn(props, size);
                self.particles.push(p);
            }
        }

        let speed = volume.max(0.0) / SPEED_DIVISOR;
        for p in &mut self.particles {
            p.center += velocity(p.direction) * speed;
        }
        self.particles.retain(|p| !p.is_outside(size));
    }
}

impl Widget for ParticleFlowWidget {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn update(&mut self, ctx: &FrameContext<'_>, surface: &mut dyn RenderSurface) -> bool {
        let Some(record) = ctx.record(&self.id) else {
            return true;
        };
        let ObjectKind::ParticleFlow(props) = &record.kind else {
            return true;
        };
        self.step(props, record.common.size, ctx.audio.volume);
        surface.apply(
            &self.id,
            Visual::Particles {
                frame: WidgetBox::from(&record.common),
                color: props.color.clone(),
                particles: self
                    .particles
                    .iter()
                    .map(|p| Dot {
                        center: p.center,
                        radius: p.radius,
                    })
                    .collect(),
            },
        );
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widgets/particles.rs"]
mod tests;
