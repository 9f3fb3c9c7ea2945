//! Line sources — local files and remote HTTP, treated uniformly.

use std::{fs, time::Duration};

use crate::error::{Error, Result};

/// Abstracts over where the flat tables come from. Implementations return
/// the file as raw lines; blank lines are dropped so callers can feed the
/// result straight to the parser.
pub trait SourceFetcher {
  fn fetch(&self, source: &str) -> Result<Vec<String>>;
}

fn split_lines(text: &str) -> Vec<String> {
  text
    .split('\n')
    .map(|l| l.strip_suffix('\r').unwrap_or(l))
    .filter(|l| !l.trim().is_empty())
    .map(str::to_string)
    .collect()
}

// ─── Local files ─────────────────────────────────────────────────────────────

/// Reads lines from the local filesystem.
#[derive(Debug, Default)]
pub struct FileFetcher;

impl SourceFetcher for FileFetcher {
  fn fetch(&self, source: &str) -> Result<Vec<String>> {
    tracing::debug!(path = source, "reading source file");
    let text = fs::read_to_string(source).map_err(|inner| Error::Io {
      source_path: source.to_string(),
      inner,
    })?;
    Ok(split_lines(&text))
  }
}

// ─── HTTP ────────────────────────────────────────────────────────────────────

/// Fetches lines over HTTP(S), for sources published as raw files.
pub struct HttpFetcher {
  client: reqwest::blocking::Client,
}

impl HttpFetcher {
  pub fn new() -> Self {
    let client = reqwest::blocking::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .expect("reqwest client with static configuration");
    Self { client }
  }
}

impl Default for HttpFetcher {
  fn default() -> Self {
    Self::new()
  }
}

impl SourceFetcher for HttpFetcher {
  fn fetch(&self, source: &str) -> Result<Vec<String>> {
    tracing::debug!(url = source, "fetching source over http");
    let text = self
      .client
      .get(source)
      .send()
      .and_then(reqwest::blocking::Response::error_for_status)
      .and_then(reqwest::blocking::Response::text)
      .map_err(|inner| Error::Http {
        url: source.to_string(),
        inner,
      })?;
    Ok(split_lines(&text))
  }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Chooses HTTP or file access from the source's prefix.
pub struct AutoFetcher {
  file: FileFetcher,
  http: HttpFetcher,
}

impl AutoFetcher {
  pub fn new() -> Self {
    Self {
      file: FileFetcher,
      http: HttpFetcher::new(),
    }
  }
}

impl Default for AutoFetcher {
  fn default() -> Self {
    Self::new()
  }
}

impl SourceFetcher for AutoFetcher {
  fn fetch(&self, source: &str) -> Result<Vec<String>> {
    if source.starts_with("http://") || source.starts_with("https://") {
      self.http.fetch(source)
    } else {
      self.file.fetch(source)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_lines_drops_blanks_and_cr() {
    let text = "a@b@c\r\n\nd@e@f\n   \n";
    assert_eq!(split_lines(text), vec!["a@b@c", "d@e@f"]);
  }
}
