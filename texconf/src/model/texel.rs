/// Logical color value of one texel, always carried as four components.
///
/// Formats with fewer stored components decode with the GPU channel defaults
/// (missing rgb read 0, missing alpha reads 1). Components are f64 so that
/// filter-weight arithmetic never loses precision relative to the storage
/// formats it models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texel {
    pub components: [f64; 4],
}

impl Texel {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { components: [r, g, b, a] }
    }

    pub const fn splat(v: f64) -> Self {
        Self { components: [v; 4] }
    }

    pub const ZERO: Texel = Texel::splat(0.0);

    pub fn component_min(self, other: Texel) -> Texel {
        let mut out = self;
        for i in 0..4 {
            out.components[i] = out.components[i].min(other.components[i]);
        }
        out
    }

    pub fn component_max(self, other: Texel) -> Texel {
        let mut out = self;
        for i in 0..4 {
            out.components[i] = out.components[i].max(other.components[i]);
        }
        out
    }
}

impl Default for Texel {
    fn default() -> Self {
        Texel::new(0.0, 0.0, 0.0, 1.0)
    }
}

// Texel + Texel
impl std::ops::Add for Texel {
    type Output = Texel;
    fn add(self, other: Texel) -> Texel {
        let mut out = self;
        for i in 0..4 {
            out.components[i] += other.components[i];
        }
        out
    }
}

// Texel * f64
impl std::ops::Mul<f64> for Texel {
    type Output = Texel;
    fn mul(self, scalar: f64) -> Texel {
        let mut out = self;
        for i in 0..4 {
            out.components[i] *= scalar;
        }
        out
    }
}

// f64 * Texel
impl std::ops::Mul<Texel> for f64 {
    type Output = Texel;
    fn mul(self, texel: Texel) -> Texel {
        texel * self
    }
}

impl std::ops::Index<usize> for Texel {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.components[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_arithmetic() {
        let a = Texel::new(1.0, 0.0, 0.0, 1.0);
        let b = Texel::new(0.0, 1.0, 0.0, 1.0);
        let mixed = a * 0.25 + b * 0.75;
        assert_eq!(mixed, Texel::new(0.25, 0.75, 0.0, 1.0));
        assert_eq!(0.5 * a, Texel::new(0.5, 0.0, 0.0, 0.5));
    }

    #[test]
    fn component_envelope() {
        let a = Texel::new(0.1, 0.9, 0.5, 1.0);
        let b = Texel::new(0.3, 0.2, 0.5, 0.0);
        assert_eq!(a.component_min(b), Texel::new(0.1, 0.2, 0.5, 0.0));
        assert_eq!(a.component_max(b), Texel::new(0.3, 0.9, 0.5, 1.0));
    }

    #[test]
    fn default_is_opaque_black() {
        assert_eq!(Texel::default(), Texel::new(0.0, 0.0, 0.0, 1.0));
    }
}
