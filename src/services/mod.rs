//! Model transport and prompt construction.

pub mod gemini_client;
pub mod prompt;

pub use gemini_client::{GeminiClient, GenerativeModel};
pub use prompt::build_itinerary_prompt;
