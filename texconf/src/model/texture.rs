use super::{Texel, TexelFormat};
use crate::error::Error;
use arrayvec::ArrayVec;

pub const MAX_MIP_LEVELS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureDimension {
    D2,
    /// Third extent counts array layers; layers never halve across mips and
    /// are never filtered across.
    D2Array,
    /// Third extent is depth; halves across mips and filters with the
    /// w address mode.
    D3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub format: TexelFormat,
    pub dimension: TextureDimension,
    pub width: u32,
    pub height: u32,
    /// Depth for D3, array layer count for D2Array, must be 1 for D2.
    pub depth_or_layers: u32,
    pub mip_count: u32,
}

impl TextureDescriptor {
    pub fn d2(format: TexelFormat, width: u32, height: u32) -> Self {
        Self { format, dimension: TextureDimension::D2, width, height, depth_or_layers: 1, mip_count: 1 }
    }

    pub fn with_mip_count(mut self, mip_count: u32) -> Self {
        self.mip_count = mip_count;
        self
    }
}

/// Extents and byte offset of one mip level inside the packed texel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mip {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub offset: usize,
}

impl Mip {
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }
}

/// Typed, addressable view over a texture's raw bytes across mip levels.
///
/// All levels live in one packed buffer with per-level offsets. The texture is
/// read-only once constructed; every read is referentially transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    format: TexelFormat,
    dimension: TextureDimension,
    mips: ArrayVec<Mip, MAX_MIP_LEVELS>,
    texels: Vec<u8>,
}

fn halved(extent: u32, level: u32) -> u32 {
    (extent >> level).max(1)
}

/// floor(log2(max(w, h))) + 1, the longest valid mip chain.
pub fn max_mip_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).leading_zeros()
}

impl Texture {
    /// Build a texture from per-level byte buffers. Each level's extents
    /// derive from level 0 by halving (minimum 1); each buffer must match its
    /// level's size exactly.
    pub fn new(desc: TextureDescriptor, level_data: &[&[u8]]) -> Result<Self, Error> {
        let mips = Self::validated_mips(&desc)?;
        if level_data.len() != desc.mip_count as usize {
            return Err(Error::MalformedInput(format!(
                "{} level buffers supplied for mip_count {}",
                level_data.len(),
                desc.mip_count
            )));
        }
        let bpt = desc.format.bytes_per_texel();
        let total: usize = mips.iter().map(|m| m.texel_count() * bpt).sum();
        let mut texels = vec![0u8; total];
        for (level, (mip, data)) in mips.iter().zip(level_data).enumerate() {
            let size = mip.texel_count() * bpt;
            if data.len() != size {
                return Err(Error::MalformedInput(format!(
                    "level {level} expects {size} bytes ({}x{}x{}), got {}",
                    mip.width,
                    mip.height,
                    mip.depth,
                    data.len()
                )));
            }
            texels[mip.offset..mip.offset + size].copy_from_slice(data);
        }
        Ok(Texture { format: desc.format, dimension: desc.dimension, mips, texels })
    }

    /// Build a texture from level 0 data, generating the remaining
    /// `desc.mip_count - 1` levels by 2x2 (2x2x2 for D3) box filtering in
    /// linear space.
    pub fn with_generated_mips(desc: TextureDescriptor, level0: &[u8]) -> Result<Self, Error> {
        let mut texture = Self::new(
            TextureDescriptor { mip_count: 1, ..desc },
            &[level0],
        )?;
        let mips = Self::validated_mips(&desc)?;
        let bpt = desc.format.bytes_per_texel();
        for level in 1..desc.mip_count {
            let mip = mips[level as usize];
            let src = mips[level as usize - 1];
            let mut data = vec![0u8; mip.texel_count() * bpt];
            for z in 0..mip.depth {
                for y in 0..mip.height {
                    for x in 0..mip.width {
                        let averaged = box_filter(&texture, level - 1, src, desc.dimension, x, y, z)?;
                        let at = ((z as usize * mip.height as usize + y as usize) * mip.width as usize
                            + x as usize)
                            * bpt;
                        desc.format.encode(averaged, &mut data[at..at + bpt]);
                    }
                }
            }
            texture.mips.push(mip);
            texture.texels.extend_from_slice(&data);
        }
        Ok(texture)
    }

    fn validated_mips(desc: &TextureDescriptor) -> Result<ArrayVec<Mip, MAX_MIP_LEVELS>, Error> {
        if desc.width == 0 || desc.height == 0 || desc.depth_or_layers == 0 {
            return Err(Error::MalformedInput(format!(
                "zero extent: {}x{}x{}",
                desc.width, desc.height, desc.depth_or_layers
            )));
        }
        if desc.dimension == TextureDimension::D2 && desc.depth_or_layers != 1 {
            return Err(Error::MalformedInput(format!(
                "2d texture with depth_or_layers {}",
                desc.depth_or_layers
            )));
        }
        let max = max_mip_count(desc.width, desc.height).min(MAX_MIP_LEVELS as u32);
        if desc.mip_count == 0 || desc.mip_count > max {
            return Err(Error::MalformedInput(format!(
                "mip_count {} outside 1..={max} for {}x{}",
                desc.mip_count, desc.width, desc.height
            )));
        }
        let bpt = desc.format.bytes_per_texel();
        let mut mips = ArrayVec::new();
        let mut offset = 0usize;
        for level in 0..desc.mip_count {
            let depth = match desc.dimension {
                TextureDimension::D3 => halved(desc.depth_or_layers, level),
                _ => desc.depth_or_layers,
            };
            let mip =
                Mip { width: halved(desc.width, level), height: halved(desc.height, level), depth, offset };
            offset += mip.texel_count() * bpt;
            mips.push(mip);
        }
        Ok(mips)
    }

    pub fn format(&self) -> TexelFormat {
        self.format
    }

    pub fn dimension(&self) -> TextureDimension {
        self.dimension
    }

    pub fn mip_count(&self) -> u32 {
        self.mips.len() as u32
    }

    pub fn mip(&self, level: u32) -> Result<Mip, Error> {
        self.mips
            .get(level as usize)
            .copied()
            .ok_or(Error::LevelOutOfRange { level, count: self.mips.len() as u32 })
    }

    /// Read one texel at already-resolved integer coordinates.
    ///
    /// Coordinates must be in range for the level: mapping out-of-range
    /// coordinates into range is address resolution's job, and receiving one
    /// here means the model itself is broken.
    pub fn read_texel(&self, level: u32, x: u32, y: u32, z: u32) -> Result<Texel, Error> {
        let mip = self.mip(level)?;
        if x >= mip.width || y >= mip.height || z >= mip.depth {
            return Err(Error::OutOfRange {
                level,
                x,
                y,
                z,
                width: mip.width,
                height: mip.height,
                depth: mip.depth,
            });
        }
        let bpt = self.format.bytes_per_texel();
        let at = mip.offset
            + ((z as usize * mip.height as usize + y as usize) * mip.width as usize + x as usize) * bpt;
        Ok(self.format.decode(&self.texels[at..at + bpt]))
    }
}

fn box_filter(
    texture: &Texture,
    src_level: u32,
    src: Mip,
    dimension: TextureDimension,
    x: u32,
    y: u32,
    z: u32,
) -> Result<Texel, Error> {
    let xs = [2 * x, (2 * x + 1).min(src.width - 1)];
    let ys = [2 * y, (2 * y + 1).min(src.height - 1)];
    let zs = match dimension {
        TextureDimension::D3 => [2 * z, (2 * z + 1).min(src.depth - 1)],
        _ => [z, z],
    };
    let mut sum = Texel::ZERO;
    for sz in zs {
        for sy in ys {
            for sx in xs {
                sum = sum + texture.read_texel(src_level, sx, sy, sz)?;
            }
        }
    }
    Ok(sum * (1.0 / 8.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_levels_with_offsets() {
        let desc = TextureDescriptor::d2(TexelFormat::R8Unorm, 2, 2).with_mip_count(2);
        let texture = Texture::new(desc, &[&[10, 20, 30, 40], &[25]]).unwrap();
        assert_eq!(texture.mip_count(), 2);
        assert_eq!(texture.mip(0).unwrap(), Mip { width: 2, height: 2, depth: 1, offset: 0 });
        assert_eq!(texture.mip(1).unwrap(), Mip { width: 1, height: 1, depth: 1, offset: 4 });
        assert_eq!(texture.read_texel(1, 0, 0, 0).unwrap().components[0], 25.0 / 255.0);
    }

    #[test]
    fn generated_mip_is_box_average() {
        let desc = TextureDescriptor::d2(TexelFormat::R8Unorm, 2, 2).with_mip_count(2);
        let texture = Texture::with_generated_mips(desc, &[10, 20, 30, 40]).unwrap();
        // (10 + 20 + 30 + 40) / 4 = 25
        assert_eq!(texture.read_texel(1, 0, 0, 0).unwrap().components[0], 25.0 / 255.0);
    }

    #[test]
    fn generated_mips_rgba_4x4() {
        let mut level0 = Vec::new();
        for i in 0..16u8 {
            level0.extend_from_slice(&[i * 4, 255 - i * 4, 0, 255]);
        }
        let desc = TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 4, 4).with_mip_count(3);
        let texture = Texture::with_generated_mips(desc, &level0).unwrap();
        assert_eq!(texture.mip(2).unwrap().width, 1);
        let top = texture.read_texel(2, 0, 0, 0).unwrap();
        // Alpha stays saturated through every level.
        assert_eq!(top.components[3], 1.0);
        assert_eq!(top.components[2], 0.0);
    }

    #[test]
    fn rejects_inconsistent_level_sizes() {
        let desc = TextureDescriptor::d2(TexelFormat::R8Unorm, 2, 2).with_mip_count(2);
        let err = Texture::new(desc, &[&[10, 20, 30, 40], &[25, 26]]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn rejects_excess_mip_count() {
        // 4x4 admits at most 3 levels.
        let desc = TextureDescriptor::d2(TexelFormat::R8Unorm, 4, 4).with_mip_count(4);
        assert!(matches!(Texture::new(desc, &[&[] as &[u8]; 4]), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn rejects_zero_extent() {
        let mut desc = TextureDescriptor::d2(TexelFormat::R8Unorm, 4, 4);
        desc.height = 0;
        assert!(matches!(Texture::new(desc, &[&[]]), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn read_texel_rejects_out_of_range() {
        let desc = TextureDescriptor::d2(TexelFormat::R8Unorm, 2, 2);
        let texture = Texture::new(desc, &[&[1, 2, 3, 4]]).unwrap();
        assert!(matches!(texture.read_texel(0, 2, 0, 0), Err(Error::OutOfRange { .. })));
        assert!(matches!(texture.read_texel(0, 0, 0, 1), Err(Error::OutOfRange { .. })));
        assert!(matches!(texture.read_texel(1, 0, 0, 0), Err(Error::LevelOutOfRange { .. })));
    }

    #[test]
    fn array_layers_do_not_halve() {
        let desc = TextureDescriptor {
            format: TexelFormat::R8Unorm,
            dimension: TextureDimension::D2Array,
            width: 4,
            height: 4,
            depth_or_layers: 3,
            mip_count: 3,
        };
        let level0 = vec![7u8; 4 * 4 * 3];
        let texture = Texture::with_generated_mips(desc, &level0).unwrap();
        assert_eq!(texture.mip(2).unwrap().depth, 3);
        assert_eq!(texture.read_texel(2, 0, 0, 2).unwrap().components[0], 7.0 / 255.0);
    }

    #[test]
    fn max_mip_count_matches_log2() {
        assert_eq!(max_mip_count(1, 1), 1);
        assert_eq!(max_mip_count(2, 2), 2);
        assert_eq!(max_mip_count(256, 16), 9);
        assert_eq!(max_mip_count(5, 3), 3);
    }
}
