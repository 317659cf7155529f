//! Ball state and colors.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::Rng;

/// An 8-bit RGBA color.
///
/// Laid out to match one `Rgba8Unorm` texel so a slice of these can be
/// uploaded to the GPU as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Uniformly random opaque color.
    pub fn random_opaque<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(rng.gen(), rng.gen(), rng.gen())
    }
}

/// A single simulated ball.
///
/// Velocity is measured in pixels per frame: gravity scales with frame time,
/// the position update does not.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

impl Ball {
    /// A ball at rest.
    pub fn at_rest(position: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_colors_are_opaque() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            assert_eq!(Rgba::random_opaque(&mut rng).a, 255);
        }
    }

    #[test]
    fn test_rgba_byte_layout() {
        let pixels = [Rgba::new(1, 2, 3, 4), Rgba::rgb(5, 6, 7)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6, 7, 255]);
    }
}
