//! Config module.
//! Provides configuration types, default paths, XML loading, and pre-flight validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, SymlinkPolicy};
pub use validate::Roots;
pub use xml::{XmlConfig, create_template_config, load_config_from_xml, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "EXT_SORTER_CONFIG";

/// Directory name used under the OS config/data dirs.
pub const APP_DIR_NAME: &str = "ext_sorter";
