//! Gesture recognition: hand centroids in, swipe commands out.
//!
//! # Pipeline
//!
//! ```text
//! landmark extractor (external) → LandmarkStream → Frame { centroid }
//!                                                     │
//!                                                     ▼
//!                             GestureClassifier::observe → Option<Command>
//! ```
//!
//! The classifier itself is pure: [`classify`] takes the previous
//! [`GestureState`] and returns the next one, so it can be exercised without
//! a camera.

pub mod classifier;
pub mod landmarks;
pub mod source;

pub use classifier::{classify, Centroid, GestureClassifier, GestureState, GestureThresholds};
pub use landmarks::{centroid_of, LandmarkFrame};
pub use source::{Frame, FrameSource, LandmarkStream, SourceError};
