//=========================================================================
// Transformable
//=========================================================================
//
// Local 2D transform of a scene node: position, rotation, scale and
// origin, composed into a `glam::Affine2`.
//
// Composition order (applied to a point, right to left):
//   translate(position) * rotate(rotation) * scale(scale) * translate(-origin)
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Affine2, Vec2};

//=== Transformable =======================================================

/// Position / rotation / scale / origin of a node relative to its parent.
///
/// Rotation is stored in radians. The origin is the local point that
/// position, rotation and scale are applied around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformable {
    position: Vec2,
    rotation: f32,
    scale: Vec2,
    origin: Vec2,
}

impl Default for Transformable {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            origin: Vec2::ZERO,
        }
    }
}

impl Transformable {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Builders ---------------------------------------------------------

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    //--- Mutation ---------------------------------------------------------

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Offsets the position by `offset`.
    pub fn move_by(&mut self, offset: Vec2) {
        self.position += offset;
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
    }

    /// Adds `radians` to the current rotation.
    pub fn rotate(&mut self, radians: f32) {
        self.rotation += radians;
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// Multiplies the current scale component-wise by `factor`.
    pub fn scale_by(&mut self, factor: Vec2) {
        self.scale *= factor;
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    //--- Composition ------------------------------------------------------

    /// Returns the local affine transform.
    pub fn transform(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
            * Affine2::from_translation(-self.origin)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_is_identity() {
        let t = Transformable::default();
        assert_eq!(t.transform(), Affine2::IDENTITY);
    }

    #[test]
    fn translation_moves_origin_point() {
        let t = Transformable::new().with_position(Vec2::new(10.0, -4.0));
        let p = t.transform().transform_point2(Vec2::ZERO);
        assert_abs_diff_eq!(p, Vec2::new(10.0, -4.0), epsilon = 1e-5);
    }

    #[test]
    fn rotation_is_applied_before_translation() {
        let t = Transformable::new()
            .with_position(Vec2::new(5.0, 0.0))
            .with_rotation(FRAC_PI_2);

        // (1, 0) rotated a quarter turn is (0, 1), then translated
        let p = t.transform().transform_point2(Vec2::X);
        assert_abs_diff_eq!(p, Vec2::new(5.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn origin_is_the_pivot() {
        let t = Transformable::new()
            .with_origin(Vec2::new(8.0, 8.0))
            .with_scale(Vec2::splat(2.0));

        // The origin maps onto the position
        let pivot = t.transform().transform_point2(Vec2::new(8.0, 8.0));
        assert_abs_diff_eq!(pivot, Vec2::ZERO, epsilon = 1e-5);

        let corner = t.transform().transform_point2(Vec2::new(9.0, 8.0));
        assert_abs_diff_eq!(corner, Vec2::new(2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn incremental_mutators_accumulate() {
        let mut t = Transformable::new();
        t.move_by(Vec2::new(1.0, 2.0));
        t.move_by(Vec2::new(1.0, 2.0));
        t.rotate(0.25);
        t.rotate(0.25);
        t.scale_by(Vec2::new(2.0, 3.0));

        assert_eq!(t.position(), Vec2::new(2.0, 4.0));
        assert_abs_diff_eq!(t.rotation(), 0.5, epsilon = 1e-6);
        assert_eq!(t.scale(), Vec2::new(2.0, 3.0));
    }
}
