//! Rotation between sensor frames and the screen.

use crate::Facing;

const FULL_CIRCLE: i32 = 360;

/// Rotation of the rendering surface relative to the device's natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayRotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl DisplayRotation {
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees {
            0 => Some(DisplayRotation::Rotation0),
            90 => Some(DisplayRotation::Rotation90),
            180 => Some(DisplayRotation::Rotation180),
            270 => Some(DisplayRotation::Rotation270),
            _ => None,
        }
    }

    /// Interpret a raw display reading, treating anything but the four quadrants as 0°.
    pub fn from_raw(degrees: i32) -> Self {
        Self::from_degrees(degrees).unwrap_or_else(|| {
            log::warn!("Unknown display rotation [displayRotation -> {}], using 0", degrees);
            DisplayRotation::Rotation0
        })
    }

    pub fn degrees(self) -> i32 {
        self.quadrant() * 90
    }

    /// Quarter turns: 0 for 0°, 1 for 90°, 2 for 180°, 3 for 270°.
    pub fn quadrant(self) -> i32 {
        match self {
            DisplayRotation::Rotation0 => 0,
            DisplayRotation::Rotation90 => 1,
            DisplayRotation::Rotation180 => 2,
            DisplayRotation::Rotation270 => 3,
        }
    }

    /// Whether the display is turned sideways relative to its natural orientation.
    pub fn is_quarter_turn(self) -> bool {
        self.quadrant() % 2 == 1
    }
}

/// Rotation in `[0, 360)` to apply to sensor output so it appears upright.
///
/// Front-facing sensors are mirrored, so their rotation runs the other way.
/// Unknown `display_rotation` readings are logged and treated as 0°.
pub fn resolve_rotation_degrees(display_rotation: i32, sensor_mount_angle: i32, facing: Facing) -> u32 {
    let display = DisplayRotation::from_raw(display_rotation).degrees();
    let mount = sensor_mount_angle.rem_euclid(FULL_CIRCLE);
    let degrees = match facing {
        Facing::Front => {
            let combined = (mount + display).rem_euclid(FULL_CIRCLE);
            (FULL_CIRCLE - combined).rem_euclid(FULL_CIRCLE)
        }
        Facing::Back => (mount - display + FULL_CIRCLE).rem_euclid(FULL_CIRCLE),
    };
    degrees as u32
}

/// Everything needed to orient a capture; recomputed whenever the display turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationContext {
    pub display_rotation: DisplayRotation,
    pub landscape: bool,
    pub sensor_mount_angle: i32,
    pub facing: Facing,
}

impl OrientationContext {
    pub fn capture_rotation(&self) -> u32 {
        resolve_rotation_degrees(
            self.display_rotation.degrees(),
            self.sensor_mount_angle,
            self.facing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_mirror_compensation() {
        assert_eq!(resolve_rotation_degrees(0, 90, Facing::Front), 270);
        assert_eq!(resolve_rotation_degrees(90, 270, Facing::Front), 0);
        assert_eq!(resolve_rotation_degrees(180, 270, Facing::Front), 270);
    }

    #[test]
    fn test_back_facing() {
        assert_eq!(resolve_rotation_degrees(90, 90, Facing::Back), 0);
        assert_eq!(resolve_rotation_degrees(0, 90, Facing::Back), 90);
        assert_eq!(resolve_rotation_degrees(270, 90, Facing::Back), 180);
    }

    #[test]
    fn test_always_in_range() {
        for display in [0, 90, 180, 270] {
            for mount in [-450, -90, 0, 90, 180, 270, 360, 720] {
                for facing in [Facing::Front, Facing::Back] {
                    let first = resolve_rotation_degrees(display, mount, facing);
                    assert!(first < 360, "{display} {mount} {facing:?} -> {first}");
                    assert_eq!(first, resolve_rotation_degrees(display, mount, facing));
                }
            }
        }
    }

    #[test]
    fn test_extreme_mount_angles() {
        // i32::MAX is 127 mod 360, i32::MIN is 232
        assert_eq!(resolve_rotation_degrees(270, i32::MAX, Facing::Front), 323);
        assert_eq!(resolve_rotation_degrees(90, i32::MIN, Facing::Back), 142);
        assert_eq!(
            resolve_rotation_degrees(180, i32::MAX, Facing::Back),
            resolve_rotation_degrees(180, 127, Facing::Back)
        );
    }

    #[test]
    fn test_unknown_display_rotation_defaults_to_zero() {
        assert_eq!(DisplayRotation::from_raw(45), DisplayRotation::Rotation0);
        assert_eq!(
            resolve_rotation_degrees(45, 90, Facing::Back),
            resolve_rotation_degrees(0, 90, Facing::Back)
        );
    }

    #[test]
    fn test_context_uses_display_rotation() {
        let context = OrientationContext {
            display_rotation: DisplayRotation::Rotation90,
            landscape: true,
            sensor_mount_angle: 90,
            facing: Facing::Back,
        };
        assert_eq!(context.capture_rotation(), 0);
    }
}
