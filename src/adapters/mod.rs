// Adapters - External system implementations

pub mod fs_temp;
pub mod method_channel;
pub mod probe_ffprobe;
#[cfg(feature = "libav")]
pub mod probe_libav;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use fs_temp::TempFileStore;
pub use method_channel::MethodChannel;
pub use probe_ffprobe::FFprobeAdapter;
#[cfg(feature = "libav")]
pub use probe_libav::ProbeLibavAdapter;
pub use toml_config::AppConfig;
