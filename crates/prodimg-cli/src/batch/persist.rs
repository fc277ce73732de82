//! Writes encoded images under the output directory.

use std::path::Path;

use prodimg_convert::EncodedImage;

/// Path string reported for `identifier`, e.g. `./converted-images/2212.webp`.
pub(crate) fn storage_path(output_dir: &Path, identifier: &str) -> String {
    let dir = output_dir.display().to_string();
    format!("{}/{identifier}.webp", dir.trim_end_matches('/'))
}

/// Write `encoded` to `{output_dir}/{identifier}.webp`, creating the
/// directory if needed and overwriting any previous file.
pub(crate) async fn persist(
    encoded: &EncodedImage,
    identifier: &str,
    output_dir: &Path,
) -> std::io::Result<String> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = storage_path(output_dir, identifier);
    tokio::fs::write(&path, encoded.bytes()).await?;
    Ok(path)
}
