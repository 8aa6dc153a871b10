pub mod app;

pub use app::CopilotApp;
