use std::fmt;

pub const VERTEX_SHADER: &str = include_str!("shaders/triangle.vert.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/triangle.frag.wgsl");

const POSITION_ATTRIBUTE: &str = "position";
const COLOR_ATTRIBUTE: &str = "color";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("vertex shader declares no input named `{0}`")]
    MissingAttribute(&'static str),

    #[error("program failed to link: {log}")]
    Link { log: String },
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub color: [f32; 4],
    pub use_vertex_color: u32,
    pub _pad: [u32; 3],
}

impl FrameUniforms {
    pub fn new(color: [f32; 4], use_vertex_color: bool) -> Self {
        Self {
            color,
            use_vertex_color: use_vertex_color as u32,
            _pad: [0; 3],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeTable {
    entries: Vec<(String, u32)>,
}

impl AttributeTable {
    pub fn location(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, location)| *location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Collects every `@location(N) name:` binding in a WGSL source.
///
/// Return-type locations (`-> @location(0) vec4<f32>`) have no trailing colon
/// and are skipped. The first declaration of a name wins.
pub fn reflect_vertex_inputs(source: &str) -> AttributeTable {
    let mut table = AttributeTable::default();

    for (start, marker) in source.match_indices("@location(") {
        let rest = &source[start + marker.len()..];
        let Some(close) = rest.find(')') else { continue };
        let Ok(location) = rest[..close].trim().parse::<u32>() else {
            continue;
        };

        let rest = rest[close + 1..].trim_start();
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let (name, after) = rest.split_at(name_len);
        if name.is_empty() || !after.trim_start().starts_with(':') {
            continue;
        }

        if table.location(name).is_none() {
            table.entries.push((name.to_string(), location));
        }
    }

    table
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexLayout {
    position: [wgpu::VertexAttribute; 1],
    color: [wgpu::VertexAttribute; 1],
}

impl VertexLayout {
    pub fn resolve(attributes: &AttributeTable) -> Result<Self, ShaderError> {
        let position = attributes
            .location(POSITION_ATTRIBUTE)
            .ok_or(ShaderError::MissingAttribute(POSITION_ATTRIBUTE))?;
        let color = attributes
            .location(COLOR_ATTRIBUTE)
            .ok_or(ShaderError::MissingAttribute(COLOR_ATTRIBUTE))?;

        Ok(Self {
            position: [wgpu::VertexAttribute {
                offset: 0,
                shader_location: position,
                format: wgpu::VertexFormat::Float32x3,
            }],
            color: [wgpu::VertexAttribute {
                offset: 0,
                shader_location: color,
                format: wgpu::VertexFormat::Float32x4,
            }],
        })
    }

    pub fn position_location(&self) -> u32 {
        self.position[0].shader_location
    }

    pub fn color_location(&self) -> u32 {
        self.color[0].shader_location
    }

    pub fn buffers(&self) -> [wgpu::VertexBufferLayout<'_>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.position,
            },
            wgpu::VertexBufferLayout {
                array_stride: (4 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.color,
            },
        ]
    }
}

/// A linked, ready-to-draw program. Only [`ShaderPipeline::compile`] makes one.
pub struct CompiledProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
    pub attributes: AttributeTable,
    pub layout: VertexLayout,
}

pub struct ShaderPipeline;

impl ShaderPipeline {
    pub fn compile(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<CompiledProgram, ShaderError> {
        let vertex = compile_stage(device, ShaderStage::Vertex, vertex_src)?;
        let fragment = compile_stage(device, ShaderStage::Fragment, fragment_src)?;

        let attributes = reflect_vertex_inputs(vertex_src);
        let layout = VertexLayout::resolve(&attributes)?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Triangle Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Triangle Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                buffers: &layout.buffers(),
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            let log = err.to_string();
            log::error!("program link failed: {log}");
            return Err(ShaderError::Link { log });
        }

        Ok(CompiledProgram {
            pipeline,
            uniform_layout,
            attributes,
            layout,
        })
    }
}

fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let label = match stage {
        ShaderStage::Vertex => "Triangle Vertex Shader",
        ShaderStage::Fragment => "Triangle Fragment Shader",
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => {
            let log = err.to_string();
            log::error!("{stage} shader compilation error: {log}");
            Err(ShaderError::Compile { stage, log })
        }
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── reflect_vertex_inputs ─────────────────────────────────────────────

    #[test]
    fn reflects_bundled_vertex_shader() {
        let table = reflect_vertex_inputs(VERTEX_SHADER);
        assert_eq!(table.location("position"), Some(0));
        assert_eq!(table.location("color"), Some(1));
    }

    #[test]
    fn reflection_is_repeatable() {
        assert_eq!(
            reflect_vertex_inputs(VERTEX_SHADER),
            reflect_vertex_inputs(VERTEX_SHADER)
        );
    }

    #[test]
    fn return_type_locations_are_skipped() {
        let table = reflect_vertex_inputs(FRAGMENT_SHADER);
        assert_eq!(table.location("vec4"), None);
        assert_eq!(table.location("tint"), Some(0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn first_declaration_wins() {
        let src = "struct A { @location(3) color: vec4<f32>, };\n\
                   struct B { @location(0) color: vec4<f32>, };";
        assert_eq!(reflect_vertex_inputs(src).location("color"), Some(3));
    }

    #[test]
    fn tolerates_spacing_and_garbage() {
        let src = "@location( 2 )  position : vec3<f32>, @location(x) bad: f32, @location(4";
        let table = reflect_vertex_inputs(src);
        assert_eq!(table.location("position"), Some(2));
        assert_eq!(table.len(), 1);
    }

    // ── VertexLayout ──────────────────────────────────────────────────────

    #[test]
    fn layout_binds_by_name() {
        let src = "@location(5) color: vec4<f32>, @location(2) position: vec3<f32>,";
        let layout = VertexLayout::resolve(&reflect_vertex_inputs(src)).unwrap();
        assert_eq!(layout.position_location(), 2);
        assert_eq!(layout.color_location(), 5);

        let [positions, colors] = layout.buffers();
        assert_eq!(positions.array_stride, 12);
        assert_eq!(positions.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(colors.array_stride, 16);
        assert_eq!(colors.attributes[0].format, wgpu::VertexFormat::Float32x4);
    }

    #[test]
    fn missing_color_input_is_fatal() {
        let table = reflect_vertex_inputs("@location(0) position: vec3<f32>,");
        let err = VertexLayout::resolve(&table).unwrap_err();
        assert!(matches!(err, ShaderError::MissingAttribute("color")));
    }

    #[test]
    fn missing_position_input_is_fatal() {
        let err = VertexLayout::resolve(&AttributeTable::default()).unwrap_err();
        assert!(matches!(err, ShaderError::MissingAttribute("position")));
    }

    // ── ShaderError ───────────────────────────────────────────────────────

    #[test]
    fn compile_error_names_its_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Vertex,
            log: "unknown type `vec5`".into(),
        };
        assert_eq!(
            err.to_string(),
            "vertex shader failed to compile: unknown type `vec5`"
        );

        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "expected `;`".into(),
        };
        assert!(err.to_string().starts_with("fragment shader failed to compile"));
    }

    #[test]
    fn link_error_carries_log() {
        let err = ShaderError::Link {
            log: "location 1 has no matching output".into(),
        };
        assert_eq!(
            err.to_string(),
            "program failed to link: location 1 has no matching output"
        );
    }

    #[test]
    fn missing_attribute_names_the_input() {
        assert_eq!(
            ShaderError::MissingAttribute("color").to_string(),
            "vertex shader declares no input named `color`"
        );
    }

    // ── FrameUniforms ─────────────────────────────────────────────────────

    #[test]
    fn uniforms_are_32_bytes() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 32);
        let u = FrameUniforms::new([0.1, 0.2, 0.3, 1.0], true);
        assert_eq!(u.use_vertex_color, 1);
        assert_eq!(bytemuck::bytes_of(&u).len(), 32);
    }
}
