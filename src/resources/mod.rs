/**
 * This module contains all logic for loading textures from external files.
 *
 * Natively, paths are resolved against the asset root on disk. On the web they are
 * fetched from `<origin>/<asset root>/`.
 */
pub mod texture;

#[cfg(target_arch = "wasm32")]
fn format_url(asset_root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    use anyhow::{Context, anyhow};

    let window = web_sys::window().context("no browser window available")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow!("could not read the page origin: {e:?}"))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, asset_root.trim_matches('/')))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(asset_root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(asset_root, file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        use anyhow::Context;

        let path = std::path::Path::new(asset_root).join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };

    Ok(data)
}
