//! Command Handlers

mod account_handlers;
mod asset_handlers;
mod story_handlers;

pub use account_handlers::{RegisterAccountHandler, RegisterAccountResponse};
pub use asset_handlers::{
    GenerateAudioHandler, GenerateAudioResponse, GenerateImageHandler, GenerateImageResponse,
    MediaGenConfig,
};
pub use story_handlers::{
    DeleteStoryHandler, GenerateStoryHandler, GenerateStoryResponse, SaveStoryHandler,
    SaveStoryResponse,
};
