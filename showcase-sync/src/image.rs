//! Image transfer between instances.
//!
//! Images uploaded to the source live under the source's address and have to
//! be re-uploaded to the target; anything else is an external link that the
//! target can simply point at.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use showcase_api::ImageDownloader;
use showcase_core::{ImageFields, ImageIdentity, ImageUpload};

use crate::error::{io_err, SyncError};

/// Bytes copied per read while downloading.
pub const CHUNK_SIZE: usize = 4096;

/// File name used when the URL yields no usable name (e.g. it ends in `/`).
const FALLBACK_IMAGE_NAME: &str = "showcase-image";

/// Image fields for a create/update of the showcase whose image is `image`.
///
/// - no image → `image_url` cleared
/// - hosted by the source → downloaded to `tmp_dir/<image name>` and attached
///   as an upload, `image_url` cleared
/// - anywhere else → `image_url` passed through, nothing downloaded
///
/// Downloaded files are left in `tmp_dir`.
pub fn prepare_image_payload(
    image: &ImageIdentity,
    source_address: &str,
    tmp_dir: &Path,
    downloader: &dyn ImageDownloader,
) -> Result<ImageFields, SyncError> {
    let Some(url) = image.url.as_deref() else {
        return Ok(ImageFields::cleared());
    };

    if !url.starts_with(source_address) {
        tracing::debug!("external image, passing through: {url}");
        return Ok(ImageFields::external(url));
    }

    let file_name = if image.name.is_empty() {
        FALLBACK_IMAGE_NAME.to_owned()
    } else {
        image.name.clone()
    };
    let location = download_file(downloader, url, &tmp_dir.join(&file_name))?;
    let file = File::open(&location).map_err(|e| io_err(&location, e))?;
    Ok(ImageFields::upload(ImageUpload {
        file_name,
        path: location,
        file,
    }))
}

/// Stream `url` into `location` in [`CHUNK_SIZE`] pieces.
pub fn download_file(
    downloader: &dyn ImageDownloader,
    url: &str,
    location: &Path,
) -> Result<PathBuf, SyncError> {
    let mut reader = downloader.open(url)?;
    let mut file = File::create(location).map_err(|e| io_err(location, e))?;

    let mut chunk = [0u8; CHUNK_SIZE];
    let mut total = 0usize;
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(SyncError::Download {
                    url: url.to_owned(),
                    source,
                })
            }
        };
        file.write_all(&chunk[..read])
            .map_err(|e| io_err(location, e))?;
        total += read;
    }
    file.flush().map_err(|e| io_err(location, e))?;

    tracing::info!("downloaded {url} ({total} bytes) to {}", location.display());
    Ok(location.to_path_buf())
}
