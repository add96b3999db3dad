//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod registry;
pub mod settings;

pub use registry::CallbackRegistry;
pub use settings::{
    ensure_log_dir, ensure_settings_file, ensure_settings_file_at, get_log_dir, get_settings_path,
    load_settings, load_settings_from,
};
