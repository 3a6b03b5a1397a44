pub mod audio;
pub mod format;
pub mod lookup;
pub mod preprocess;
pub mod quiz;
pub mod session;
pub mod store;
