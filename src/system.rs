use crate::instance::{Instance, InstanceRaw};

/// The (name, radius) table defining the bodies and their layout order.
pub const BODY_TABLE: [(&str, f32); 9] = [
    ("sun", 30.0),
    ("mercury", 1.0),
    ("venus", 2.0),
    ("earth", 3.0),
    ("mars", 2.0),
    ("jupiter", 4.0),
    ("saturn", 3.0),
    ("uranus", 3.0),
    ("neptune", 3.0),
];

/// Gap along +Z between consecutive bodies in table order.
pub const BODY_SPACING: f32 = 7.0;

/// The sun is pulled out of the line after layout so it sits behind the
/// camera's starting position.
pub const SUN_POSITION: glam::Vec3 = glam::Vec3::new(0.0, 0.0, -30.0);

/// Texture-array layer past the body layers, kept white. Stars draw through
/// it, and bodies whose asset failed to load fall back to it.
pub const STAR_LAYER: u32 = BODY_TABLE.len() as u32;

pub struct CelestialBody {
    pub name: &'static str,
    pub radius: f32,
    pub position: glam::Vec3,
    /// Euler XYZ angles in radians. The only field that mutates after layout.
    pub rotation: glam::Vec3,
    pub texture_layer: u32,
}

pub struct SolarSystem {
    bodies: Vec<CelestialBody>,
}

impl SolarSystem {
    /// Lays the bodies out along +Z in table order, 7 units apart starting at
    /// the origin, then moves the sun to its fixed spot behind the start.
    pub fn new() -> Self {
        let mut z = 0.0;
        let mut bodies = BODY_TABLE
            .iter()
            .enumerate()
            .map(|(i, &(name, radius))| {
                let body = CelestialBody {
                    name,
                    radius,
                    position: glam::Vec3::new(0.0, 0.0, z),
                    rotation: glam::Vec3::ZERO,
                    texture_layer: i as u32,
                };
                z += BODY_SPACING;
                body
            })
            .collect::<Vec<_>>();

        if let Some(sun) = bodies.iter_mut().find(|b| b.name == "sun") {
            sun.position = SUN_POSITION;
        }

        SolarSystem { bodies }
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [CelestialBody] {
        &mut self.bodies
    }

    pub fn body(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Adds the same rotation increments to every body, the scroll handler's
    /// decorative spin.
    pub fn spin_all(&mut self, x: f32, y: f32) {
        for body in &mut self.bodies {
            body.rotation.x += x;
            body.rotation.y += y;
        }
    }

    /// Per-frame instance records for the GPU, radius applied as scale on the
    /// shared unit sphere.
    pub fn instance_data(&self) -> Vec<InstanceRaw> {
        self.bodies
            .iter()
            .map(|body| {
                InstanceRaw::from(&Instance {
                    position: body.position,
                    rotation: body.rotation,
                    scale: body.radius,
                    texture_layer: body.texture_layer,
                })
            })
            .collect()
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}
