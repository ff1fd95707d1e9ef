use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use magic_common::error::{MagicError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use tracing::debug;

use crate::validation::validate_url;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const ARCHIVE_FILENAME: &str = "payload.tar.gz";

/// What to fetch from the source-code host: a versioned release tag or a
/// branch head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitReference {
    Tag(String),
    Branch(String),
}

impl GitReference {
    fn archive_ref(&self) -> String {
        match self {
            GitReference::Tag(version) => format!("refs/tags/v{version}"),
            GitReference::Branch(branch) => format!("refs/heads/{branch}"),
        }
    }

    pub fn label(&self) -> String {
        match self {
            GitReference::Tag(version) => format!("v{version}"),
            GitReference::Branch(branch) => format!("branch '{branch}'"),
        }
    }
}

pub fn archive_url(repo: &str, reference: &GitReference) -> String {
    format!(
        "https://github.com/{repo}/archive/{}.tar.gz",
        reference.archive_ref()
    )
}

fn build_http_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        user_agent
            .parse()
            .map_err(|e| MagicError::Generic(format!("Invalid user agent string: {e}")))?,
    );
    headers.insert(ACCEPT, "*/*".parse().expect("static header value"));
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| MagicError::Generic(format!("Failed to build HTTP client: {e}")))
}

/// Downloads the release archive for `reference` into `dest_dir`, returning
/// the path of the written `.tar.gz`. A 404 is reported as a distinct
/// "release not found" error; the request is bounded by `timeout`.
pub fn download_archive(
    repo: &str,
    reference: &GitReference,
    dest_dir: &Path,
    timeout: Duration,
    user_agent: &str,
) -> Result<PathBuf> {
    let url = archive_url(repo, reference);
    validate_url(&url)?;

    let final_path = dest_dir.join(ARCHIVE_FILENAME);
    let temp_path = dest_dir.join(format!(".{ARCHIVE_FILENAME}.download"));
    debug!("Downloading {} to {}", url, temp_path.display());

    let client = build_http_client(timeout, user_agent)?;
    let mut response = client.get(&url).send().map_err(|e| {
        MagicError::DownloadError(
            reference.label(),
            url.clone(),
            format!("HTTP request failed: {e}"),
        )
    })?;

    let status = response.status();
    debug!("Received HTTP status {} for {}", status, url);
    if status == StatusCode::NOT_FOUND {
        return Err(MagicError::ReleaseNotFound(format!(
            "no release archive for {} in {repo} (HTTP 404); if the tag has not been published yet, retry with --main to install from the main branch",
            reference.label()
        )));
    }
    if !status.is_success() {
        return Err(MagicError::DownloadError(
            reference.label(),
            url,
            format!("HTTP error {status}"),
        ));
    }

    let mut temp_file = fs::File::create(&temp_path).map_err(|e| {
        MagicError::IoError(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;
    response.copy_to(&mut temp_file).map_err(|e| {
        MagicError::DownloadError(
            reference.label(),
            url.clone(),
            format!("Failed to read response body: {e}"),
        )
    })?;
    drop(temp_file);

    fs::rename(&temp_path, &final_path).map_err(|e| {
        MagicError::IoError(format!(
            "Failed to move temp file {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e
        ))
    })?;
    debug!("Archive written to {}", final_path.display());
    Ok(final_path)
}
