use anyhow::{Context, Result};

/// Open a round's info page (usually a Wikipedia article) in the default browser.
///
/// Only http(s) URLs are passed on; the API occasionally returns empty or
/// relative values.
pub fn open_url(url: &str) -> Result<()> {
    if !is_web_url(url) {
        anyhow::bail!("Not a web URL: '{}'", url);
    }
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

fn is_web_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
