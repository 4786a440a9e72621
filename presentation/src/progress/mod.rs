//! Live progress for a running debate, driven by the event bus

pub mod reporter;
