//! Presentation-side state the core still owns.
//!
//! The rendering layer is out of scope, but two pieces of its state
//! have enough behavior to live here where they can be tested: the
//! persisted theme preference and the featured-products carousel.

pub mod carousel;
pub mod theme;

pub use carousel::{Carousel, CarouselPhase};
pub use theme::{ThemeMode, ThemeState};
