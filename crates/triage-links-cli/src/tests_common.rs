use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::CliBackend;

#[derive(Debug, Default)]
pub struct MockBackend {
    pub stdin: String,
    pub files: HashMap<String, String>,
    pub env: HashMap<String, String>,
}

impl MockBackend {
    pub fn with_stdin(stdin: &str) -> Self {
        Self {
            stdin: stdin.to_string(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.to_string());
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

impl CliBackend for MockBackend {
    fn read_stdin(&self) -> Result<String, String> {
        Ok(self.stdin.clone())
    }

    fn read_file(&self, path: &str) -> Result<String, String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("read {path}: No such file or directory"))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).cloned()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 13, 15, 30, 16)
            .single()
            .unwrap_or_default()
    }
}
