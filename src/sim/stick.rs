//! Distance constraints between joints

use super::joint::Joint;

/// Keeps two joints of the same skeleton at a fixed distance.
///
/// Sticks hold indices into the owning ragdoll's joint array; they never own
/// the joints and never change endpoints after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Stick {
    a: usize,
    b: usize,
    rest_length: f32,
}

impl Stick {
    /// Create a stick whose rest length is the current joint distance
    pub fn between(joints: &[Joint], a: usize, b: usize) -> Self {
        let rest_length = joints[a].pos.distance(joints[b].pos);
        Self { a, b, rest_length }
    }

    pub fn with_length(a: usize, b: usize, rest_length: f32) -> Self {
        Self { a, b, rest_length }
    }

    #[inline]
    pub fn endpoints(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    #[inline]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// One relaxation step toward the rest length
    pub fn update(&self, joints: &mut [Joint], stiffness: f32) {
        let delta = joints[self.a].pos - joints[self.b].pos;
        let dist = delta.length();
        if dist <= f32::EPSILON {
            return; // coincident, direction undefined
        }

        let percent = (self.rest_length - dist) / dist / 2.0;
        let offset = delta * percent * stiffness;

        if !joints[self.a].pinned {
            joints[self.a].pos += offset;
        }
        if !joints[self.b].pinned {
            joints[self.b].pos -= offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn pair(a: Vec2, b: Vec2) -> Vec<Joint> {
        vec![Joint::new(a, 4.0), Joint::new(b, 4.0)]
    }

    #[test]
    fn test_rest_length_from_joints() {
        let joints = pair(Vec2::ZERO, Vec2::new(3.0, 4.0));
        let stick = Stick::between(&joints, 0, 1);
        assert!((stick.rest_length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_stretched_stick_pulls_together() {
        let mut joints = pair(Vec2::ZERO, Vec2::new(20.0, 0.0));
        let stick = Stick::with_length(0, 1, 10.0);
        stick.update(&mut joints, 1.0);
        let dist = joints[0].pos.distance(joints[1].pos);
        assert!((dist - 10.0).abs() < 1e-4);
        // Split equally
        assert!((joints[0].pos.x - 5.0).abs() < 1e-4);
        assert!((joints[1].pos.x - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_pinned_endpoint_holds() {
        let mut joints = pair(Vec2::ZERO, Vec2::new(20.0, 0.0));
        joints[0].pinned = true;
        let stick = Stick::with_length(0, 1, 10.0);
        stick.update(&mut joints, 1.0);
        assert_eq!(joints[0].pos, Vec2::ZERO);
        assert!((joints[1].pos.x - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_coincident_joints_are_skipped() {
        let mut joints = pair(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        let stick = Stick::with_length(0, 1, 10.0);
        stick.update(&mut joints, 0.8);
        assert!(joints[0].pos.is_finite());
        assert!(joints[1].pos.is_finite());
        assert_eq!(joints[0].pos, Vec2::new(5.0, 5.0));
    }

    proptest! {
        #[test]
        fn prop_converges_monotonically(
            ax in -200.0f32..200.0,
            ay in -200.0f32..200.0,
            bx in -200.0f32..200.0,
            by in -200.0f32..200.0,
            rest in 5.0f32..60.0,
            stiffness in 0.1f32..0.99,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assume!(a.distance(b) > 1.0);

            let mut joints = pair(a, b);
            let stick = Stick::with_length(0, 1, rest);
            let mut error = (joints[0].pos.distance(joints[1].pos) - rest).abs();
            let initial = error;

            for _ in 0..60 {
                stick.update(&mut joints, stiffness);
                let next = (joints[0].pos.distance(joints[1].pos) - rest).abs();
                prop_assert!(next <= error + 1e-3, "error grew: {} -> {}", error, next);
                error = next;
            }
            prop_assert!(error <= initial * 0.01 + 1e-2);
        }
    }
}
