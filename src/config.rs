//! Configuration for productd
//!
//! Centralized configuration with defaults that reproduce the plain
//! "port 3000, ./product.json" server.

use std::path::PathBuf;

/// Main configuration for a productd instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// JSON document holding the whole product collection
    pub data_file: PathBuf,

    /// Seed an empty `[]` document at startup when the file is absent
    pub create_if_missing: bool,

    /// Hold a process-wide lock across each read-modify-write cycle.
    ///
    /// Off by default: concurrent mutations race and the last save wins.
    pub serialize_mutations: bool,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections (one handler thread each)
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("product.json"),
            create_if_missing: false,
            serialize_mutations: false,
            listen_addr: "0.0.0.0:3000".to_string(),
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data file path
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Seed an empty collection when the data file is absent
    pub fn create_if_missing(mut self, enabled: bool) -> Self {
        self.config.create_if_missing = enabled;
        self
    }

    /// Serialize mutating operations within this process
    pub fn serialize_mutations(mut self, enabled: bool) -> Self {
        self.config.serialize_mutations = enabled;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
