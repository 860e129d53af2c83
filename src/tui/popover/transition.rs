//! Tick-driven enter/exit transitions
//!
//! A transition tracks how far an element is between hidden (0.0) and fully
//! shown (1.0). The UI loop advances it with the elapsed frame time; render
//! code maps progress to visual properties (opacity, scale, offset).
//!
//! Transitions are purely visual. Logical open/close state lives in the
//! popover controller and never waits for an animation to finish.

use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Entering,
    Shown,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseOut,
}

impl Easing {
    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    phase: Phase,
    /// Linear position in [0, duration]; 0 = hidden end
    position: Duration,
    duration: Duration,
    /// Extra wait before entering starts
    delay: Duration,
    waited: Duration,
    easing: Easing,
}

impl Transition {
    pub fn new(duration: Duration) -> Self {
        Self {
            phase: Phase::Hidden,
            position: Duration::ZERO,
            duration,
            delay: Duration::ZERO,
            waited: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    /// Start entering only after `delay` (staggered reveals)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Begin entering; an exit in progress reverses from where it is
    pub fn show(&mut self) {
        match self.phase {
            Phase::Hidden => {
                self.waited = Duration::ZERO;
                self.phase = Phase::Entering;
            }
            Phase::Exiting => self.phase = Phase::Entering,
            Phase::Entering | Phase::Shown => {}
        }
        self.settle();
    }

    /// Begin exiting; an entry in progress reverses from where it is
    pub fn hide(&mut self) {
        if matches!(self.phase, Phase::Entering | Phase::Shown) {
            self.phase = Phase::Exiting;
        }
        self.settle();
    }

    /// Jump straight to shown
    pub fn finish_shown(&mut self) {
        self.position = self.duration;
        self.phase = Phase::Shown;
    }

    pub fn advance(&mut self, dt: Duration) {
        match self.phase {
            Phase::Entering => {
                let mut dt = dt;
                if self.waited < self.delay {
                    let wait = (self.delay - self.waited).min(dt);
                    self.waited += wait;
                    dt -= wait;
                }
                self.position = (self.position + dt).min(self.duration);
            }
            Phase::Exiting => self.position = self.position.saturating_sub(dt),
            Phase::Hidden | Phase::Shown => {}
        }
        self.settle();
    }

    fn settle(&mut self) {
        match self.phase {
            Phase::Entering if self.position >= self.duration => self.phase = Phase::Shown,
            Phase::Exiting if self.position.is_zero() => self.phase = Phase::Hidden,
            _ => {}
        }
    }

    /// Eased progress, 0.0 = hidden, 1.0 = shown
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return match self.phase {
                Phase::Hidden | Phase::Exiting => 0.0,
                Phase::Entering | Phase::Shown => 1.0,
            };
        }
        let t = self.position.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.apply(t.clamp(0.0, 1.0))
    }

    /// Whether anything should be drawn
    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Hidden
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Entering | Phase::Exiting)
    }
}

/// Map opacity onto terminal styling
///
/// Terminals have no alpha channel; low opacity renders dim and grey.
pub fn fade(style: Style, opacity: f32) -> Style {
    if opacity >= 0.999 {
        style
    } else if opacity >= 0.5 {
        style.add_modifier(Modifier::DIM)
    } else {
        style.fg(Color::DarkGray).add_modifier(Modifier::DIM)
    }
}

/// Scale factor for the 0.95 -> 1.0 zoom used by overlay content
pub fn zoom(progress: f32) -> f32 {
    0.95 + 0.05 * progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn enters_and_settles() {
        let mut t = Transition::new(ms(200)).with_easing(Easing::Linear);
        assert!(!t.is_visible());

        t.show();
        assert_eq!(t.phase(), Phase::Entering);
        t.advance(ms(100));
        assert!((t.progress() - 0.5).abs() < 1e-3);

        t.advance(ms(150));
        assert_eq!(t.phase(), Phase::Shown);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn exit_reverses_from_current_position() {
        let mut t = Transition::new(ms(200)).with_easing(Easing::Linear);
        t.show();
        t.advance(ms(50));

        t.hide();
        assert_eq!(t.phase(), Phase::Exiting);
        t.advance(ms(50));
        assert_eq!(t.phase(), Phase::Hidden);
        assert!(!t.is_visible());
    }

    #[test]
    fn hide_when_hidden_is_noop() {
        let mut t = Transition::new(ms(200));
        t.hide();
        assert_eq!(t.phase(), Phase::Hidden);
    }

    #[test]
    fn delay_postpones_entry() {
        let mut t = Transition::new(ms(100))
            .with_delay(ms(100))
            .with_easing(Easing::Linear);
        t.show();
        t.advance(ms(80));
        assert_eq!(t.progress(), 0.0);
        t.advance(ms(70));
        assert!((t.progress() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn zero_duration_is_instant() {
        let mut t = Transition::new(Duration::ZERO);
        t.show();
        assert_eq!(t.phase(), Phase::Shown);
        assert_eq!(t.progress(), 1.0);
        t.hide();
        assert_eq!(t.phase(), Phase::Hidden);
    }

    #[test]
    fn fade_levels() {
        let base = Style::default();
        assert_eq!(fade(base, 1.0), base);
        assert!(fade(base, 0.6).add_modifier.contains(Modifier::DIM));
        assert_eq!(fade(base, 0.1).fg, Some(Color::DarkGray));
    }
}
