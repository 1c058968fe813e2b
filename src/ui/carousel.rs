// src/ui/carousel.rs

//! Featured-products carousel state machine.
//!
//! Phases: `Idle` (too few items for auto-play), `AutoAdvancing`,
//! `Paused` (after a manual interaction, resumes on a deadline) and
//! `Dragging`. All time comes in through parameters, so transitions are
//! deterministic and the timers cancel by state replacement.

use std::time::{Duration, Instant};

use crate::models::CarouselConfig;

/// Current phase of the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselPhase {
    /// Auto-play disabled (not enough items to scroll)
    Idle,
    /// Advancing on a timer
    AutoAdvancing { next_at: Instant },
    /// Manually interacted with; auto-play resumes at the deadline
    Paused { resume_at: Instant },
    /// A drag is in progress
    Dragging,
}

/// Carousel over a fixed number of items.
#[derive(Debug)]
pub struct Carousel {
    len: usize,
    per_view: usize,
    interval: Duration,
    resume_delay: Duration,
    index: usize,
    phase: CarouselPhase,
}

impl Carousel {
    /// Create a carousel over `len` items.
    ///
    /// Auto-play starts immediately when there are more items than fit
    /// one view; otherwise the carousel stays idle.
    pub fn new(len: usize, config: &CarouselConfig, now: Instant) -> Self {
        let interval = Duration::from_secs(config.autoplay_interval_secs);
        let resume_delay = Duration::from_secs(config.resume_delay_secs);
        let per_view = config.items_per_view.max(1);

        let phase = if len > per_view {
            CarouselPhase::AutoAdvancing {
                next_at: now + interval,
            }
        } else {
            CarouselPhase::Idle
        };

        Self {
            len,
            per_view,
            interval,
            resume_delay,
            index: 0,
            phase,
        }
    }

    /// Index of the first visible item.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current phase.
    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    fn autoplay_eligible(&self) -> bool {
        self.len > self.per_view
    }

    /// Drive timer transitions. Returns true when the view advanced.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            CarouselPhase::AutoAdvancing { next_at } if now >= next_at => {
                self.advance();
                self.phase = CarouselPhase::AutoAdvancing {
                    next_at: now + self.interval,
                };
                true
            }
            CarouselPhase::Paused { resume_at } if now >= resume_at => {
                self.phase = CarouselPhase::AutoAdvancing {
                    next_at: now + self.interval,
                };
                false
            }
            _ => false,
        }
    }

    /// Manual advance. Pauses auto-play for the resume delay.
    pub fn next(&mut self, now: Instant) {
        self.advance();
        self.pause(now);
    }

    /// Manual retreat. Pauses auto-play for the resume delay.
    pub fn prev(&mut self, now: Instant) {
        self.retreat();
        self.pause(now);
    }

    /// A drag started; auto-play stops until the drag ends.
    pub fn begin_drag(&mut self) {
        self.phase = CarouselPhase::Dragging;
    }

    /// The drag ended; auto-play resumes after the resume delay.
    pub fn end_drag(&mut self, now: Instant) {
        self.pause(now);
    }

    fn pause(&mut self, now: Instant) {
        self.phase = if self.autoplay_eligible() {
            CarouselPhase::Paused {
                resume_at: now + self.resume_delay,
            }
        } else {
            CarouselPhase::Idle
        };
    }

    /// Move one view forward, wrapping to the start past the end.
    fn advance(&mut self) {
        if self.len == 0 {
            return;
        }
        let next = self.index + self.per_view;
        self.index = if next >= self.len { 0 } else { next };
    }

    /// Move one view back, wrapping to the last view before the start.
    fn retreat(&mut self) {
        if self.len == 0 {
            return;
        }
        self.index = if self.index >= self.per_view {
            self.index - self.per_view
        } else {
            self.len.saturating_sub(self.per_view)
        };
    }
}
