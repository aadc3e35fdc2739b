use wgpu::util::DeviceExt;

use crate::geometry::Geometry;

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("device rejected buffer upload: {0}")]
    Device(String),
}

// Written once at creation; a new load builds a new set of buffers.
pub struct GeometryBuffers {
    pub positions: wgpu::Buffer,
    pub colors: wgpu::Buffer,
    vertex_count: u32,
    generation: u64,
}

impl GeometryBuffers {
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub fn upload_geometry(
    device: &wgpu::Device,
    geometry: &Geometry,
    generation: u64,
) -> Result<GeometryBuffers, UploadError> {
    debug_assert!(geometry.triangle_count() > 0);

    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Triangle Position Buffer"),
        contents: bytemuck::cast_slice(geometry.positions()),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Triangle Color Buffer"),
        contents: bytemuck::cast_slice(geometry.colors()),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    if let Some(err) = validation.or(out_of_memory) {
        return Err(UploadError::Device(err.to_string()));
    }

    log::debug!(
        "uploaded {} triangles ({} + {} bytes)",
        geometry.triangle_count(),
        positions.size(),
        colors.size()
    );

    Ok(GeometryBuffers {
        positions,
        colors,
        vertex_count: geometry.vertex_count() as u32,
        generation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_error_keeps_driver_message() {
        let err = UploadError::Device("Buffer size 0 exceeds limit".into());
        assert_eq!(
            err.to_string(),
            "device rejected buffer upload: Buffer size 0 exceeds limit"
        );
    }
}
