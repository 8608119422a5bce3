use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// One point of the scope trace, laid out for direct upload as a vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct ScopeVertex {
    pub real: f32,
    pub imag: f32,
    /// Smoothed angular velocity.
    pub velocity: f32,
    /// Average angular noise.
    pub noise: f32,
}

/// One processing cycle worth of analytic output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputFrame {
    /// Processing cycle that produced the frame; 0 for the initial silent frame.
    pub sequence: u64,
    pub vertices: Vec<ScopeVertex>,
}

impl OutputFrame {
    pub fn silent(buffer_size: usize) -> Self {
        Self {
            sequence: 0,
            vertices: vec![ScopeVertex::zeroed(); buffer_size],
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Flat `[real, imag, velocity, noise, ...]` view.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
