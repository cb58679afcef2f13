//! HTTP handlers for the Experiences domain

pub mod experiences;
pub mod moderation;
pub mod public;
