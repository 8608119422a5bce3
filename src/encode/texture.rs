use crate::analytic::OutputFrame;

const FULL_SCALE: f32 = 65535.0;

/// Map a sample in `[-max_amplitude, max_amplitude]` onto 16 bits.
pub fn quantize(sample: f32, max_amplitude: f32) -> u16 {
    let unit = (0.5 + 0.5 * sample / max_amplitude).clamp(0.0, 1.0);
    if unit.is_nan() {
        return (FULL_SCALE / 2.0) as u16;
    }
    (unit * FULL_SCALE).round() as u16
}

/// Pack the trace into 4 bytes per vertex: real then imaginary, each 16-bit big-endian.
pub fn encode_texture(frame: &OutputFrame, max_amplitude: f32) -> Vec<u8> {
    let mut texture = Vec::with_capacity(frame.len() * 4);
    for v in &frame.vertices {
        texture.extend_from_slice(&quantize(v.real, max_amplitude).to_be_bytes());
        texture.extend_from_slice(&quantize(v.imag, max_amplitude).to_be_bytes());
    }
    texture
}
