//! Background services for mediadeck.
//!
//! - `media` - MPRIS session bootstrap on the background runtime

pub mod media;
