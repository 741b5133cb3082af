//! Per-frame input and time snapshot
//!
//! The window layer feeds key, cursor, resize and clock updates into a
//! [`FrameEvents`] value. The scene reads it exactly once per frame; afterwards
//! the window layer calls [`FrameEvents::end_frame`] to drop the accumulated
//! cursor motion.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Tracks the elapsed time between consecutive frames
#[derive(Debug, Clone, Default)]
pub struct TimeTracker {
    time: f32,
    time_step: f32,
    has_previous: bool,
}

impl TimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new absolute time in seconds.
    ///
    /// The first sample only establishes a reference point, so the step stays zero.
    pub fn set_time(&mut self, time: f32) {
        if self.has_previous {
            self.time_step = time - self.time;
        } else {
            self.has_previous = true;
        }
        self.time = time;
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }
}

/// Converts absolute cursor positions into per-frame deltas
#[derive(Debug, Clone, Default)]
struct CursorTracker {
    last: Option<(f32, f32)>,
    change: (f32, f32),
}

impl CursorTracker {
    fn set_position(&mut self, x: f32, y: f32) {
        // screen y grows downwards, pitch grows upwards
        if let Some((last_x, last_y)) = self.last {
            self.change.0 += x - last_x;
            self.change.1 += last_y - y;
        }
        self.last = Some((x, y));
    }

    fn add_delta(&mut self, dx: f32, dy: f32) {
        self.change.0 += dx;
        self.change.1 -= dy;
    }
}

/// Everything the scene needs to know about one frame of user interaction
#[derive(Debug, Clone)]
pub struct FrameEvents {
    time: TimeTracker,
    keys: HashSet<KeyCode>,
    cursor: CursorTracker,
    aspect_ratio: f32,
}

impl Default for FrameEvents {
    fn default() -> Self {
        Self {
            time: TimeTracker::new(),
            keys: HashSet::new(),
            cursor: CursorTracker::default(),
            aspect_ratio: 1.0,
        }
    }
}

impl FrameEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&mut self, time: f32) {
        self.time.set_time(time);
    }

    /// Seconds elapsed since the previous frame
    pub fn time_step(&self) -> f32 {
        self.time.time_step()
    }

    pub fn set_key_state(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// Whether the key is currently held down
    pub fn key_state(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Feeds an absolute cursor position (window coordinates)
    pub fn set_cursor_position(&mut self, x: f32, y: f32) {
        self.cursor.set_position(x, y);
    }

    /// Feeds raw relative mouse motion (device coordinates, y down)
    pub fn add_cursor_delta(&mut self, dx: f32, dy: f32) {
        self.cursor.add_delta(dx, dy);
    }

    /// Horizontal cursor motion accumulated during this frame
    pub fn cursor_change_x(&self) -> f32 {
        self.cursor.change.0
    }

    /// Vertical cursor motion accumulated during this frame, positive upwards
    pub fn cursor_change_y(&self) -> f32 {
        self.cursor.change.1
    }

    pub fn set_framebuffer_size(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Clears per-frame accumulators once the frame has been rendered
    pub fn end_frame(&mut self) {
        self.cursor.change = (0.0, 0.0);
    }
}

/// Edge-triggered toggle driven by a level-sampled button.
///
/// Input is polled every frame, so a held key is seen many times. The toggle
/// only flips on the frame the key goes down and is re-armed on release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickyButton {
    on: bool,
    latched: bool,
}

impl StickyButton {
    pub fn new(on: bool) -> Self {
        Self { on, latched: false }
    }

    /// Feeds the raw key state for this frame
    pub fn update(&mut self, pressed: bool) {
        if pressed && !self.latched {
            self.on = !self.on;
            self.latched = true;
        } else if !pressed {
            self.latched = false;
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
