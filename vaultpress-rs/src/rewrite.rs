//! Body rewriting: code masking, reference extraction, concurrent image export,
//! wikilink rewriting and reassembly.
//!
//! The body is tokenized once. Each image token is replaced by the result computed
//! for that exact reference, so duplicate references and unequal-length
//! replacements never disturb each other's positions.

use crate::config::Settings;
use crate::error::Result;
use crate::materialize::materialize_image;
use crate::parser::code_block::{mask, MaskedText};
use crate::parser::naming::slugify;
use crate::parser::reference::{extract_references, ImageReference, Token, WikilinkReference};
use crate::resolve::resolve_image;
use futures_util::future::join_all;
use std::path::Path;

/// Everything the rewriter needs to know about the note being exported.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
    pub vault_root: &'a Path,
    /// The note's folder, relative to the vault root.
    pub note_dir: &'a Path,
    /// The note's file name without extension.
    pub note_base_name: &'a str,
    pub settings: &'a Settings,
}

/// Rewrite a note body for the static site.
///
/// Image failures do not fail the body: the reference is replaced with an HTML
/// comment naming the image and the cause.
pub async fn rewrite_body(body: &str, ctx: &RewriteContext<'_>) -> String {
    let masked = mask(body);
    let extracted = extract_references(&masked);
    log::debug!(
        "{}: {} image reference(s), {} wikilink(s), {} code span(s)",
        ctx.note_base_name,
        extracted.images.len(),
        extracted.links.len(),
        masked.spans.len()
    );

    let image_markdown = join_all(
        extracted
            .images
            .iter()
            .map(|image| export_image_or_comment(image, ctx)),
    )
    .await;

    render(&extracted.tokens, &masked, &image_markdown, &extracted.links, ctx.settings)
}

fn render(
    tokens: &[Token],
    masked: &MaskedText,
    image_markdown: &[String],
    links: &[WikilinkReference],
    settings: &Settings,
) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Code(id) => {
                if let Some(span) = masked.span(*id) {
                    out.push_str(&span.original_text);
                }
            }
            Token::Image(index) => {
                if let Some(markdown) = image_markdown.get(*index) {
                    out.push_str(markdown);
                }
            }
            Token::WikiLink(index) => {
                if let Some(link) = links.get(*index) {
                    match render_wikilink(link, &settings.posts_url_prefix) {
                        Some(markdown) => out.push_str(&markdown),
                        None => out.push_str(&link.source_text),
                    }
                }
            }
        }
    }
    out
}

/// Resolve and copy one image.
pub async fn export_image(image: &ImageReference, ctx: &RewriteContext<'_>) -> Result<String> {
    let target = image.file_target();
    let source = resolve_image(ctx.note_dir, ctx.note_base_name, ctx.vault_root, &target).await?;
    materialize_image(
        &source,
        &ctx.settings.static_images_directory,
        &target,
        &image.alt_text,
        &ctx.settings.images_url_prefix,
    )
    .await
}

async fn export_image_or_comment(image: &ImageReference, ctx: &RewriteContext<'_>) -> String {
    match export_image(image, ctx).await {
        Ok(markdown) => markdown,
        Err(e) => {
            let err = e.for_image(&image.source_text);
            log::warn!("{}: {}", ctx.note_base_name, err);
            failure_comment(&image.raw_target, err.kind())
        }
    }
}

/// Visible placeholder for an image that could not be exported.
pub fn failure_comment(reference: &str, message: &str) -> String {
    // "--" may not appear inside an HTML comment
    let clean = |s: &str| {
        let mut cleaned = s.to_string();
        while cleaned.contains("--") {
            cleaned = cleaned.replace("--", "-");
        }
        cleaned
    };
    format!(
        "<!-- vaultpress: image '{}' not exported: {} -->",
        clean(reference),
        clean(message)
    )
}

/// Render a wikilink as `[display](/<posts>/<slug>/)`, with a `#heading` anchor
/// when the target names one. A heading-only target (`[[#Section]]`) links to
/// the anchor on the same page.
///
/// Returns `None` when the target has nothing to link to, e.g. a note name
/// that slugifies to nothing; such links are left as written.
pub fn render_wikilink(link: &WikilinkReference, posts_url_prefix: &str) -> Option<String> {
    let (note, heading) = link.note_and_heading();
    let anchor = heading.map(slugify).filter(|a| !a.is_empty());

    let url = if note.is_empty() {
        format!("#{}", anchor?)
    } else {
        let slug = slugify(note);
        if slug.is_empty() {
            return None;
        }
        let section = posts_url_prefix.trim_matches('/');
        let mut url = if section.is_empty() {
            format!("/{}/", slug)
        } else {
            format!("/{}/{}/", section, slug)
        };
        if let Some(anchor) = anchor {
            url.push('#');
            url.push_str(&anchor);
        }
        url
    };

    Some(format!("[{}]({})", link.display(), url))
}
