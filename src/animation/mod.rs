//! Animation primitives: easing curves and the frame-counted tween
//! timeline the camera and roof transitions run on.

pub mod easing;
pub mod timeline;

pub use easing::EasingFunction;
pub use timeline::{TweenChannel, TweenId, TweenTimeline, TweenValue};
