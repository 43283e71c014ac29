use crate::error::CompareError;
use crate::paths::path_exists;
use crate::release::http::HttpClient;
use log::{info, warn};
use reqwest::Url;
use std::fs::File;
use std::io;
use std::path::PathBuf;

/// Redirects followed before a download is abandoned.
pub const MAX_REDIRECTS: usize = 5;

const REDIRECT_STATUS: u16 = 302;

/// Download `url` to `<download_dir><name>.zip` and return the file's
/// canonical path.
///
/// `download_dir` is a plain prefix and must already exist. A 302 response
/// is followed to its `location`, at most [`MAX_REDIRECTS`] times; any other
/// non-2xx response fails with the response body as the error text.
pub fn download_file(
    client: &dyn HttpClient,
    url: &str,
    download_dir: &str,
    name: &str,
) -> Result<PathBuf, CompareError> {
    if url.is_empty() {
        return Err(CompareError::InvalidUrl(url.to_string()));
    }
    if !path_exists(download_dir) {
        return Err(CompareError::MissingPath(PathBuf::from(download_dir)));
    }

    let target = PathBuf::from(format!("{}{}.zip", download_dir, name));
    info!("Downloading {} to {}", url, target.display());

    let mut current = url.to_string();
    for _ in 0..=MAX_REDIRECTS {
        let mut response = client.get(&current)?;

        if response.is_success() {
            let mut file = File::create(&target).map_err(|e| {
                CompareError::io(format!("Error creating file \"{}\"", target.display()), e)
            })?;
            io::copy(&mut response.body, &mut file).map_err(|e| {
                CompareError::io(format!("Error writing file \"{}\"", target.display()), e)
            })?;

            let downloaded = dunce::canonicalize(&target).map_err(|e| {
                CompareError::io(format!("Error resolving \"{}\"", target.display()), e)
            })?;
            info!("Downloaded to {}", downloaded.display());
            return Ok(downloaded);
        }

        if response.status != REDIRECT_STATUS {
            warn!("Server returned {}", response.status);
            return Err(CompareError::Transport {
                status: response.status,
                body: response.body_text()?,
            });
        }

        let Some(location) = response.location.take() else {
            return Err(CompareError::Transport {
                status: response.status,
                body: "Redirect without a location header".to_string(),
            });
        };
        current = resolve_location(&current, &location)?;
        info!("Redirecting to {}...", current);
    }

    Err(CompareError::Transport {
        status: REDIRECT_STATUS,
        body: format!("Gave up after {} redirects", MAX_REDIRECTS),
    })
}

/// Absolute `location`s are used as-is, relative ones resolve against `base`.
fn resolve_location(base: &str, location: &str) -> Result<String, CompareError> {
    Url::parse(base)
        .and_then(|base| base.join(location))
        .map(String::from)
        .map_err(|_| CompareError::InvalidUrl(location.to_string()))
}
