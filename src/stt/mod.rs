pub mod google;

pub use google::{SpeechClient, API_ERROR, NO_SPEECH};
