use wgpu::util::DeviceExt;

const FOVY_DEGREES: f32 = 90.0;
const ZNEAR: f32 = 0.1;
const ZFAR: f32 = 1000.0;

pub struct Camera {
    pub eye: glam::Vec3,
    pub target: glam::Vec3,
    up: glam::Vec3,
    aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
}

impl Camera {
    /// Perspective camera looking at the origin, 90 degree field of view.
    pub fn new(eye: glam::Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target: glam::Vec3::ZERO,
            up: glam::Vec3::Y,
            aspect,
            fovy: FOVY_DEGREES.to_radians(),
            znear: ZNEAR,
            zfar: ZFAR,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn build_view_projection_matrix(&self) -> glam::Mat4 {
        let view = glam::Mat4::look_at_rh(self.eye, self.target, self.up);
        let projection = glam::Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        projection * view
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_projection_matrix: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        CameraUniform {
            view_projection_matrix: glam::Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    pub fn update_view_projection_matrix(&mut self, camera: &Camera) {
        self.view_projection_matrix = camera.build_view_projection_matrix().to_cols_array_2d();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera plus its GPU-side uniform buffer and bind group.
pub struct CameraContainer {
    pub camera: Camera,
    pub camera_uniform: CameraUniform,
    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraContainer {
    pub fn new(eye: glam::Vec3, width: u32, height: u32, device: &wgpu::Device) -> Self {
        let camera = Camera::new(eye, width as f32 / height as f32);
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_projection_matrix(&camera);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        CameraContainer {
            camera,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            camera_bind_group_layout,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Refreshes the uniform from the camera and uploads it.
    pub fn update(&mut self, queue: &wgpu::Queue) {
        self.camera_uniform.update_view_projection_matrix(&self.camera);
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_projection_is_finite_for_the_rest_position() {
        let camera = Camera::new(glam::Vec3::new(0.0, 0.0, 30.0), 16.0 / 9.0);
        let m = camera.build_view_projection_matrix();
        assert!(m.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn origin_projects_to_the_center_of_the_screen() {
        let camera = Camera::new(glam::Vec3::new(0.0, 0.0, 30.0), 1.0);
        let clip = camera.build_view_projection_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
    }
}
