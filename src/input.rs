use math::Vec2;
use scene::OrbitCamera;

/// Platform-agnostic pointer events, positions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { position: Vec2, modifier: bool },
    Moved { position: Vec2, modifier: bool },
    /// Button released or pointer left the surface.
    Released,
    Wheel { delta: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Idle,
    Pan,
    Rotate,
}

/// Turns pointer events into camera operations. One gesture is active at a
/// time: a press starts a pan, or a rotation while the modifier is held.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    gesture: Gesture,
    drag_start: Vec2,
    zoom_per_wheel_unit: f32,
}

impl PointerTracker {
    pub fn new(zoom_per_wheel_unit: f32) -> Self {
        Self {
            gesture: Gesture::Idle,
            drag_start: Vec2::ZERO,
            zoom_per_wheel_unit,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn handle(&mut self, event: PointerEvent, camera: &mut OrbitCamera) {
        match event {
            PointerEvent::Pressed { position, modifier } => self.press(position, modifier),
            PointerEvent::Moved { position, modifier } => self.motion(position, modifier, camera),
            PointerEvent::Released => self.release(),
            PointerEvent::Wheel { delta } => self.wheel(delta, camera),
        }
    }

    pub fn press(&mut self, position: Vec2, modifier: bool) {
        self.drag_start = position;
        self.gesture = if modifier { Gesture::Rotate } else { Gesture::Pan };
    }

    /// Applies the motion since the last event to the camera. Flipping the
    /// modifier mid-drag switches gesture; that event moves nothing and keeps
    /// the old drag start, so the next motion carries the full delta.
    pub fn motion(&mut self, position: Vec2, modifier: bool, camera: &mut OrbitCamera) {
        let delta = position - self.drag_start;
        match self.gesture {
            Gesture::Pan if modifier => {
                self.gesture = Gesture::Rotate;
                return;
            }
            Gesture::Rotate if !modifier => {
                self.gesture = Gesture::Pan;
                return;
            }
            Gesture::Pan => camera.pan(delta),
            Gesture::Rotate => camera.rotate(delta),
            Gesture::Idle => {}
        }
        self.drag_start = position;
    }

    pub fn release(&mut self) {
        self.gesture = Gesture::Idle;
    }

    pub fn wheel(&self, delta: f32, camera: &mut OrbitCamera) {
        camera.zoom(delta * self.zoom_per_wheel_unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::Vec3;
    use scene::{Projection, Viewport};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(Vec3::new(0., 10., 10.), Vec3::ZERO,
                         Projection::default(), Viewport::default())
    }

    #[test]
    fn press_selects_gesture_by_modifier() {
        let mut t = PointerTracker::new(0.1);
        t.press(Vec2::ZERO, false);
        assert_eq!(t.gesture(), Gesture::Pan);
        t.release();
        assert_eq!(t.gesture(), Gesture::Idle);
        t.press(Vec2::ZERO, true);
        assert_eq!(t.gesture(), Gesture::Rotate);
    }

    #[test]
    fn idle_motion_leaves_camera_alone() {
        let mut c = camera();
        let mut t = PointerTracker::new(0.1);
        t.motion(Vec2::new(50., 50.), false, &mut c);
        assert_eq!(c.eye(), Vec3::new(0., 10., 10.));
        assert_eq!(c.center(), Vec3::ZERO);
    }

    #[test]
    fn pan_drag_matches_direct_pan() {
        let mut c = camera();
        let mut t = PointerTracker::new(0.1);
        t.press(Vec2::new(100., 100.), false);
        t.motion(Vec2::new(110., 100.), false, &mut c);

        let mut expected = camera();
        expected.pan(Vec2::new(10., 0.));
        assert_eq!(c.eye(), expected.eye());
        assert_eq!(c.center(), expected.center());
    }

    #[test]
    fn deltas_are_relative_to_last_motion() {
        let mut c = camera();
        let mut t = PointerTracker::new(0.1);
        t.press(Vec2::ZERO, false);
        t.motion(Vec2::new(5., 0.), false, &mut c);
        t.motion(Vec2::new(8., 0.), false, &mut c);

        let mut expected = camera();
        expected.pan(Vec2::new(5., 0.));
        expected.pan(Vec2::new(3., 0.));
        assert_eq!(c.center(), expected.center());
    }

    #[test]
    fn modifier_toggle_switches_without_moving() {
        let mut c = camera();
        let mut t = PointerTracker::new(0.1);
        t.press(Vec2::ZERO, false);

        t.handle(PointerEvent::Moved { position: Vec2::new(20., 0.), modifier: true }, &mut c);
        assert_eq!(t.gesture(), Gesture::Rotate);
        assert_eq!(c.eye(), Vec3::new(0., 10., 10.));

        // drag start was kept, so the rotation gets the whole delta
        t.handle(PointerEvent::Moved { position: Vec2::new(30., 0.), modifier: true }, &mut c);
        let mut expected = camera();
        expected.rotate(Vec2::new(30., 0.));
        assert_eq!(c.eye(), expected.eye());

        t.handle(PointerEvent::Moved { position: Vec2::new(40., 0.), modifier: false }, &mut c);
        assert_eq!(t.gesture(), Gesture::Pan);
        assert_eq!(c.eye(), expected.eye());
    }

    #[test]
    fn wheel_zooms_by_unit() {
        let mut c = camera();
        let mut t = PointerTracker::new(0.1);
        let distance = c.to_eye().length();
        t.handle(PointerEvent::Wheel { delta: 30. }, &mut c);
        assert!((c.to_eye().length() - (distance + 3.)).abs() < 1e-4);
        t.handle(PointerEvent::Released, &mut c);
        assert_eq!(t.gesture(), Gesture::Idle);
    }
}
