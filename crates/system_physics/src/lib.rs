//! Physics system: integrates point bodies under gravity with a ground
//! plane at `y = 0`.

use system_api::{export_system, System};

const GRAVITY: f64 = -9.81;

/// A point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    /// Fraction of vertical speed kept after hitting the ground.
    pub restitution: f64,
}

#[derive(Debug, Default)]
pub struct PhysicsSystem {
    bodies: Vec<Body>,
    simulated_time: f64,
}

impl PhysicsSystem {
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    pub fn spawn(&mut self, body: Body) {
        self.bodies.push(body);
    }

    fn step(body: &mut Body, delta_time: f64) {
        // Semi-implicit Euler.
        body.velocity[1] += GRAVITY * delta_time;
        body.position[0] += body.velocity[0] * delta_time;
        body.position[1] += body.velocity[1] * delta_time;

        if body.position[1] < 0.0 {
            body.position[1] = 0.0;
            body.velocity[1] = -body.velocity[1] * body.restitution;
        }
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        "PhysicsSystem"
    }

    fn initialize(&mut self) -> bool {
        self.bodies.clear();
        self.spawn(Body {
            position: [0.0, 10.0],
            velocity: [1.0, 0.0],
            restitution: 0.5,
        });
        self.simulated_time = 0.0;
        true
    }

    fn update(&mut self, delta_time: f64) {
        for body in &mut self.bodies {
            Self::step(body, delta_time);
        }
        self.simulated_time += delta_time;
    }

    fn shutdown(&mut self) {
        self.bodies.clear();
    }
}

export_system!(PhysicsSystem);
