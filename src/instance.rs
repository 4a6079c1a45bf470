use std::mem;

pub struct Instance {
    pub position: glam::Vec3,
    /// Euler XYZ angles in radians.
    pub rotation: glam::Vec3,
    pub scale: f32,
    pub texture_layer: u32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model_matrix: [[f32; 4]; 4],
    texture_layer: u32,
}

impl InstanceRaw {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // We need to switch from using a step mode of Vertex to Instance
            // This means that our shaders will only change to use the next
            // instance when the shader starts processing a new instance
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // A mat4 takes up 4 vertex slots as it is technically 4 vec4s. We need to define a slot
                // for each vec4. We'll have to reassemble the mat4 in the shader.
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}

impl From<&Instance> for InstanceRaw {
    fn from(value: &Instance) -> Self {
        let model = glam::Mat4::from_translation(value.position)
            * glam::Mat4::from_euler(
                glam::EulerRot::XYZ,
                value.rotation.x,
                value.rotation.y,
                value.rotation.z,
            )
            * glam::Mat4::from_scale(glam::Vec3::splat(value.scale));
        InstanceRaw {
            model_matrix: model.to_cols_array_2d(),
            texture_layer: value.texture_layer,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn raw_composes_translation_rotation_scale() {
        let instance = Instance {
            position: glam::Vec3::new(1.0, 2.0, 3.0),
            rotation: glam::Vec3::new(0.5, -0.25, 0.0),
            scale: 2.0,
            texture_layer: 4,
        };
        let raw = InstanceRaw::from(&instance);
        let model = glam::Mat4::from_cols_array_2d(&raw.model_matrix);

        // The unit-sphere "north pole" lands at translation + scaled rotated Y.
        let pole = model.transform_point3(glam::Vec3::Y);
        let expected = instance.position
            + glam::Mat4::from_euler(glam::EulerRot::XYZ, 0.5, -0.25, 0.0)
                .transform_vector3(glam::Vec3::Y)
                * 2.0;
        assert_relative_eq!(pole.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(pole.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(pole.z, expected.z, epsilon = 1e-5);
        assert_eq!(raw.texture_layer, 4);
    }

    #[test]
    fn identity_instance_translates_only() {
        let instance = Instance {
            position: glam::Vec3::new(0.0, 0.0, 21.0),
            rotation: glam::Vec3::ZERO,
            scale: 1.0,
            texture_layer: 0,
        };
        let raw = InstanceRaw::from(&instance);
        let model = glam::Mat4::from_cols_array_2d(&raw.model_matrix);
        assert_eq!(
            model.transform_point3(glam::Vec3::ZERO),
            glam::Vec3::new(0.0, 0.0, 21.0)
        );
    }
}
