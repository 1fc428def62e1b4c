//! Traits abstracting over meeting platforms.

mod meeting_platform;

pub use meeting_platform::MeetingPlatform;
