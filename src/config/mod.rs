//! Configuration module for Tekste.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    GeneralSettings, JobSettings, ServerSettings, Settings, TranscriptionSettings,
    TranslationProvider, TranslationSettings,
};
