pub mod config;
pub mod narration;
pub mod offline;
pub mod session;

// Re-exports for convenience
pub use config::{AppConfigExt, ConfigError};
pub use narration::{
    NarrationCommand, NarrationService, Narrator, SilentSpeech, SpeechEngine, Voice,
    VoiceSelector, create_narration_channel,
};
pub use offline::{
    CacheStorage, Fetcher, HttpFetcher, MemoryCacheStorage, OfflineWorker, Request,
    ResourceInterceptor, Response, WorkerConfig,
};
pub use session::{Effect, Session, SessionCommand, SessionController, SessionError};
