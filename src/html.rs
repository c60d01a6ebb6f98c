//! Entry document rewriting
//!
//! Produces the final standalone HTML: strips any prior importmap block,
//! injects the merged map right after the opening `<head>` tag (or prepends
//! when no head exists), and rewrites `src` attributes that reference
//! TypeScript/TSX source paths to their transpiled blob URLs.
//!
//! Rewriting is regex-based and does not parse HTML. That is a known
//! limitation, acceptable here because the contract only promises exact-path
//! `src` attribute substitution.

use crate::assets::{is_transpiled_source, AssetTable};
use crate::error::LaunchError;
use crate::importmap::{importmap_block_pattern, ImportMap};
use regex::Regex;

/// Rewrite the entry HTML for one launch.
pub fn rewrite_entry(
    html: &str,
    map: &ImportMap,
    assets: &AssetTable,
) -> Result<String, LaunchError> {
    let stripped = strip_importmap(html);
    let with_map = inject_importmap(&stripped, map)?;
    rewrite_sources(&with_map, assets)
}

/// Remove any author-declared importmap script block.
fn strip_importmap(html: &str) -> String {
    importmap_block_pattern().replace_all(html, "").into_owned()
}

/// Insert a fresh importmap block immediately after the opening `<head>`
/// tag; prepend to the document when there is none.
fn inject_importmap(html: &str, map: &ImportMap) -> Result<String, LaunchError> {
    let json = map
        .to_json()
        .map_err(|e| LaunchError::HtmlProcessing(format!("import map serialization: {e}")))?;
    let block = format!("<script type=\"importmap\">\n{json}\n</script>");

    // Tag name is anchored so <header> (or any <head…>-prefixed tag) never
    // counts as an opening head.
    let head_open = Regex::new(r"(?i)<head(\s[^>]*)?>")
        .map_err(|e| LaunchError::HtmlProcessing(e.to_string()))?;
    if let Some(m) = head_open.find(html) {
        let mut out = String::with_capacity(html.len() + block.len() + 2);
        out.push_str(&html[..m.end()]);
        out.push('\n');
        out.push_str(&block);
        out.push_str(&html[m.end()..]);
        return Ok(out);
    }
    Ok(format!("{block}\n{html}"))
}

/// Rewrite `src="…"` / `src='…'` attributes whose value is an optionally
/// `./`- or `/`-prefixed TypeScript/TSX path present in the table. Exact,
/// case-sensitive path match; the path is escaped before the pattern is
/// built. The attribute name is anchored on a whitespace boundary (so
/// `data-src` never matches) and quote characters must pair.
fn rewrite_sources(html: &str, assets: &AssetTable) -> Result<String, LaunchError> {
    let mut out = html.to_string();
    for (path, asset) in assets {
        if !is_transpiled_source(path) {
            continue;
        }
        let escaped = regex::escape(path);
        let pattern = format!(
            r#"(?P<pre>\s)src=(?:"(?:\./|/)?{escaped}"|'(?:\./|/)?{escaped}')"#
        );
        let re = Regex::new(&pattern).map_err(|e| LaunchError::HtmlProcessing(e.to_string()))?;
        out = re
            .replace_all(&out, |caps: &regex::Captures<'_>| {
                format!("{}src=\"{}\"", &caps["pre"], asset.url)
            })
            .into_owned();
    }
    Ok(out)
}
