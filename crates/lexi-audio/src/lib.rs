mod cache;

pub use cache::FileAudioCache;
