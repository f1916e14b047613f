use super::Texel;
use half::f16;

/// How one stored component maps to a logical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericRepr {
    Unorm,
    Snorm,
    Float,
    Uint,
    Sint,
}

/// Storage layout of one texel: component count, component width, numeric
/// representation and the sRGB flag. Every byte sequence of
/// `bytes_per_texel()` length decodes to exactly one logical texel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub components: u8,
    pub bytes_per_component: u8,
    pub repr: NumericRepr,
    pub srgb: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexelFormat {
    R8Unorm,
    Rg8Unorm,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    R8Snorm,
    Rgba8Snorm,
    R16Float,
    Rgba16Float,
    R32Float,
    Rgba32Float,
    Rgba8Uint,
    Rgba8Sint,
    R32Uint,
    R32Sint,
}

impl TexelFormat {
    pub const fn info(self) -> FormatInfo {
        use NumericRepr::*;
        let (components, bytes_per_component, repr, srgb) = match self {
            TexelFormat::R8Unorm => (1, 1, Unorm, false),
            TexelFormat::Rg8Unorm => (2, 1, Unorm, false),
            TexelFormat::Rgba8Unorm => (4, 1, Unorm, false),
            TexelFormat::Rgba8UnormSrgb => (4, 1, Unorm, true),
            TexelFormat::R8Snorm => (1, 1, Snorm, false),
            TexelFormat::Rgba8Snorm => (4, 1, Snorm, false),
            TexelFormat::R16Float => (1, 2, Float, false),
            TexelFormat::Rgba16Float => (4, 2, Float, false),
            TexelFormat::R32Float => (1, 4, Float, false),
            TexelFormat::Rgba32Float => (4, 4, Float, false),
            TexelFormat::Rgba8Uint => (4, 1, Uint, false),
            TexelFormat::Rgba8Sint => (4, 1, Sint, false),
            TexelFormat::R32Uint => (1, 4, Uint, false),
            TexelFormat::R32Sint => (1, 4, Sint, false),
        };
        FormatInfo { components, bytes_per_component, repr, srgb }
    }

    pub const fn bytes_per_texel(self) -> usize {
        let info = self.info();
        info.components as usize * info.bytes_per_component as usize
    }

    /// Integer formats pass values through exactly and are not filterable.
    pub const fn is_integer(self) -> bool {
        matches!(self.info().repr, NumericRepr::Uint | NumericRepr::Sint)
    }

    /// Decode one stored texel. `bytes` must be exactly `bytes_per_texel()`
    /// long. Missing components take the GPU channel defaults. sRGB formats
    /// decode into linear space, matching hardware that filters linearly.
    pub fn decode(self, bytes: &[u8]) -> Texel {
        let info = self.info();
        debug_assert_eq!(bytes.len(), self.bytes_per_texel());
        let mut texel = Texel::default();
        for i in 0..info.components as usize {
            let w = info.bytes_per_component as usize;
            let raw = &bytes[i * w..(i + 1) * w];
            let mut v = decode_component(raw, info.repr);
            if info.srgb && i < 3 {
                v = srgb_to_linear(v);
            }
            texel.components[i] = v;
        }
        texel
    }

    /// Encode a logical value into stored bytes, rounding to the nearest
    /// representable grid point. `out` must be exactly `bytes_per_texel()`
    /// long. The inverse of [`TexelFormat::decode`] up to quantization.
    pub fn encode(self, texel: Texel, out: &mut [u8]) {
        let info = self.info();
        debug_assert_eq!(out.len(), self.bytes_per_texel());
        for i in 0..info.components as usize {
            let mut v = texel.components[i];
            if info.srgb && i < 3 {
                v = linear_to_srgb(v);
            }
            let w = info.bytes_per_component as usize;
            encode_component(v, info.repr, &mut out[i * w..(i + 1) * w]);
        }
    }

    /// Quantization step around `value` measured in linear space for the
    /// component at `index`. For sRGB formats the stored grid is uniform in
    /// sRGB space, so its spacing in linear space varies with the value;
    /// alpha stays linear even in sRGB formats.
    pub fn linear_space_step(self, index: usize, value: f64) -> f64 {
        let info = self.info();
        if info.srgb && index < 3 {
            let v = value.clamp(0.0, 1.0);
            let s = linear_to_srgb(v);
            let step = 1.0 / 255.0;
            let up = srgb_to_linear((s + step).min(1.0)) - v;
            let down = v - srgb_to_linear((s - step).max(0.0));
            up.abs().max(down.abs())
        } else {
            self.step(value)
        }
    }

    /// Size of one quantization step of the stored grid around `value`, used
    /// by the tolerance model. Integer formats are exact and report 0.
    pub fn step(self, value: f64) -> f64 {
        let info = self.info();
        match info.repr {
            NumericRepr::Unorm => 1.0 / (((1u32 << (info.bytes_per_component * 8)) - 1) as f64),
            NumericRepr::Snorm => 1.0 / (((1u32 << (info.bytes_per_component * 8 - 1)) - 1) as f64),
            NumericRepr::Float => match info.bytes_per_component {
                2 => f16_ulp(value),
                _ => f32_ulp(value),
            },
            NumericRepr::Uint | NumericRepr::Sint => 0.0,
        }
    }
}

fn decode_component(raw: &[u8], repr: NumericRepr) -> f64 {
    match (repr, raw.len()) {
        (NumericRepr::Unorm, 1) => raw[0] as f64 / 255.0,
        (NumericRepr::Snorm, 1) => ((raw[0] as i8) as f64 / 127.0).max(-1.0),
        (NumericRepr::Float, 2) => f16::from_le_bytes([raw[0], raw[1]]).to_f64(),
        (NumericRepr::Float, 4) => bytemuck::pod_read_unaligned::<f32>(raw) as f64,
        (NumericRepr::Uint, 1) => raw[0] as f64,
        (NumericRepr::Uint, 4) => bytemuck::pod_read_unaligned::<u32>(raw) as f64,
        (NumericRepr::Sint, 1) => (raw[0] as i8) as f64,
        (NumericRepr::Sint, 4) => bytemuck::pod_read_unaligned::<i32>(raw) as f64,
        _ => unreachable!("no format uses this component layout"),
    }
}

fn encode_component(v: f64, repr: NumericRepr, out: &mut [u8]) {
    match (repr, out.len()) {
        (NumericRepr::Unorm, 1) => out[0] = (v.clamp(0.0, 1.0) * 255.0).round() as u8,
        (NumericRepr::Snorm, 1) => out[0] = ((v.clamp(-1.0, 1.0) * 127.0).round() as i8) as u8,
        (NumericRepr::Float, 2) => out.copy_from_slice(&f16::from_f64(v).to_le_bytes()),
        (NumericRepr::Float, 4) => out.copy_from_slice(&(v as f32).to_le_bytes()),
        (NumericRepr::Uint, 1) => out[0] = v.clamp(0.0, 255.0).round() as u8,
        (NumericRepr::Uint, 4) => {
            out.copy_from_slice(&(v.clamp(0.0, u32::MAX as f64).round() as u32).to_le_bytes())
        }
        (NumericRepr::Sint, 1) => out[0] = (v.clamp(-128.0, 127.0).round() as i8) as u8,
        (NumericRepr::Sint, 4) => {
            out.copy_from_slice(&(v.clamp(i32::MIN as f64, i32::MAX as f64).round() as i32).to_le_bytes())
        }
        _ => unreachable!("no format uses this component layout"),
    }
}

/// Standard sRGB electro-optical transfer function.
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 { v / 12.92 } else { ((v + 0.055) / 1.055).powf(2.4) }
}

pub fn linear_to_srgb(v: f64) -> f64 {
    if v <= 0.0031308 { v * 12.92 } else { 1.055 * v.powf(1.0 / 2.4) - 0.055 }
}

fn f16_ulp(value: f64) -> f64 {
    let h = f16::from_f64(value);
    if !h.is_finite() {
        return f16::MAX.to_f64() * 2.0f64.powi(-10);
    }
    let bits = h.to_bits() & 0x7fff;
    let next = f16::from_bits(bits + 1);
    if next.is_finite() {
        next.to_f64() - f16::from_bits(bits).to_f64()
    } else {
        f16::from_bits(bits).to_f64() - f16::from_bits(bits - 1).to_f64()
    }
}

fn f32_ulp(value: f64) -> f64 {
    let f = value as f32;
    if !f.is_finite() {
        return (f32::MAX as f64) * 2.0f64.powi(-23);
    }
    let bits = f.to_bits() & 0x7fff_ffff;
    let next = f32::from_bits(bits + 1);
    if next.is_finite() {
        (next - f32::from_bits(bits)) as f64
    } else {
        (f32::from_bits(bits) - f32::from_bits(bits - 1)) as f64
    }
}
