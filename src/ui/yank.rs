use std::time::{Duration, Instant};

/// Maximum gap between the two presses of a yank.
pub const YANK_WINDOW: Duration = Duration::from_millis(500);

/// Double-press detector for the copy key.
#[derive(Debug, Clone, Copy, Default)]
pub struct YankGesture {
    last_press: Option<Instant>,
    count: u8,
}

impl YankGesture {
    /// Record a press at `now`. Returns `true` when this press completes a
    /// double press.
    pub fn press(&mut self, now: Instant) -> bool {
        let within_window = self
            .last_press
            .is_some_and(|last| now.saturating_duration_since(last) <= YANK_WINDOW);

        self.count = if within_window { self.count + 1 } else { 1 };
        self.last_press = Some(now);

        if self.count >= 2 {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub const fn reset(&mut self) {
        self.last_press = None;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_press_within_window_fires_once() {
        let start = Instant::now();
        let mut yank = YankGesture::default();
        assert!(!yank.press(start));
        assert!(yank.press(start + Duration::from_millis(200)));
    }

    #[test]
    fn test_slow_second_press_does_not_fire() {
        let start = Instant::now();
        let mut yank = YankGesture::default();
        assert!(!yank.press(start));
        assert!(!yank.press(start + Duration::from_millis(600)));
        assert!(yank.press(start + Duration::from_millis(700)));
    }

    #[test]
    fn test_counter_restarts_after_firing() {
        let start = Instant::now();
        let mut yank = YankGesture::default();
        yank.press(start);
        assert!(yank.press(start + Duration::from_millis(100)));
        assert!(!yank.press(start + Duration::from_millis(200)));
        assert!(yank.press(start + Duration::from_millis(300)));
    }

    #[test]
    fn test_reset_forgets_first_press() {
        let start = Instant::now();
        let mut yank = YankGesture::default();
        yank.press(start);
        yank.reset();
        assert!(!yank.press(start + Duration::from_millis(100)));
    }
}
