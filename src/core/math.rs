//=========================================================================
// Math Primitives
//=========================================================================
//
// Pose type and easing for movement tasks, on top of `glam`.
//
// Architecture:
//   glam::Vec3 (position) + glam::Quat (orientation) → Pose
//   smoothstep(t) → Vec3::lerp / Quat::slerp
//
//=========================================================================

//=== External Dependencies ===============================================

pub use glam::{EulerRot, Quat, Vec3};

//=== Easing ==============================================================

/// Smoothstep easing: `t' = t² (3 − 2t)`, with `t` clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

//=== Pose ================================================================

/// Position plus orientation of a movable owner (camera, prop, ...).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Pose from a position and Euler orientation in degrees.
    ///
    /// Rotations are applied around Z first, then X, then Y, matching the
    /// convention scene data is authored in.
    pub fn from_euler_degrees(position: Vec3, pitch: f32, yaw: f32, roll: f32) -> Self {
        let orientation = Quat::from_euler(
            EulerRot::YXZ,
            yaw.to_radians(),
            pitch.to_radians(),
            roll.to_radians(),
        );
        Self::new(position, orientation)
    }

    /// Eased interpolation toward `target`; `t` is raw progress.
    pub fn interpolate(self, target: Pose, t: f32) -> Pose {
        let eased = smoothstep(t);
        Pose {
            position: self.position.lerp(target.position, eased),
            orientation: self.orientation.slerp(target.orientation, eased),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    //--- Easing -----------------------------------------------------------

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
    }

    #[test]
    fn smoothstep_clamps_out_of_range() {
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
    }

    #[test]
    fn smoothstep_is_slower_near_the_ends() {
        assert!(smoothstep(0.1) < 0.1);
        assert!(smoothstep(0.9) > 0.9);
    }

    //--- Pose -------------------------------------------------------------

    #[test]
    fn euler_yaw_turns_forward_to_the_right() {
        let pose = Pose::from_euler_degrees(Vec3::ZERO, 0.0, 90.0, 0.0);
        let v = pose.orientation * Vec3::Z;
        assert!(v.abs_diff_eq(Vec3::X, EPS), "{v:?}");
    }

    #[test]
    fn euler_applies_roll_before_pitch_before_yaw() {
        let pose = Pose::from_euler_degrees(Vec3::ZERO, 30.0, 45.0, 10.0);
        let expected = Quat::from_rotation_y(45f32.to_radians())
            * Quat::from_rotation_x(30f32.to_radians())
            * Quat::from_rotation_z(10f32.to_radians());
        assert!(pose.orientation.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn interpolate_eases_position_and_orientation() {
        let start = Pose::IDENTITY;
        let target = Pose::from_euler_degrees(Vec3::new(4.0, 0.0, 0.0), 0.0, 90.0, 0.0);

        let mid = start.interpolate(target, 0.5);
        assert_eq!(mid.position, Vec3::new(2.0, 0.0, 0.0));
        assert!((mid.orientation.angle_between(Quat::IDENTITY) - 45f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn interpolate_takes_shortest_arc() {
        let target = Pose::new(Vec3::ZERO, -Quat::from_rotation_y(30f32.to_radians()));
        let mid = Pose::IDENTITY.interpolate(target, 0.5);
        assert!((mid.orientation.angle_between(Quat::IDENTITY) - 15f32.to_radians()).abs() < 1e-4);
    }
}
