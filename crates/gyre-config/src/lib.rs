pub mod error;
pub mod file;
pub mod script;

pub use error::{ConfigError, Result};
pub use file::{
    CONFIG_ENV, default_config_path, load_config, load_effective, parse_config, resolve_config_path,
    save_config, to_toml,
};
pub use script::{load_script, parse_script, save_script};
