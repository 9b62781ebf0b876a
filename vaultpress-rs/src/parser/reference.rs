//! Image and wikilink extraction over masked text.
//!
//! Matching is non-greedy: the first `]]` or `)` closes a reference, so targets
//! or alt text containing a literal `]` are truncated. That is a known limitation
//! of the syntax, not something this module tries to repair.

use crate::parser::code_block::{MaskedText, Piece};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Which syntax an image reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSyntax {
    /// `![[name]]`
    Wiki,
    /// `![alt](path "title")`
    Markdown,
}

/// An image embed found in a note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub syntax: ImageSyntax,
    /// The target as written, trimmed.
    pub raw_target: String,
    /// Alt text (always empty for wiki embeds).
    pub alt_text: String,
    /// The literal matched text.
    pub source_text: String,
}

impl ImageReference {
    /// The vault path this reference points at.
    ///
    /// Wiki embeds drop an Obsidian size or alias suffix (`|300`) and any
    /// `#heading` part. Markdown paths are unwrapped from `<...>` and
    /// percent-decoded.
    pub fn file_target(&self) -> String {
        match self.syntax {
            ImageSyntax::Wiki => {
                let end = self
                    .raw_target
                    .find(['|', '#'])
                    .unwrap_or(self.raw_target.len());
                self.raw_target[..end].trim().to_string()
            }
            ImageSyntax::Markdown => {
                let path = self
                    .raw_target
                    .strip_prefix('<')
                    .and_then(|p| p.strip_suffix('>'))
                    .unwrap_or(&self.raw_target);
                urlencoding::decode(path)
                    .map(|p| p.into_owned())
                    .unwrap_or_else(|_| path.to_string())
            }
        }
    }
}

/// A `[[target]]` or `[[target|display]]` cross-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikilinkReference {
    pub target: String,
    /// Explicit display text, if given and non-empty.
    pub display_text: Option<String>,
    /// The literal matched text.
    pub source_text: String,
}

impl WikilinkReference {
    /// Text shown for the rendered link.
    pub fn display(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.target)
    }

    /// Split the target into note name and optional heading.
    pub fn note_and_heading(&self) -> (&str, Option<&str>) {
        match self.target.split_once('#') {
            Some((note, heading)) if !heading.trim().is_empty() => {
                (note.trim(), Some(heading.trim()))
            }
            Some((note, _)) => (note.trim(), None),
            None => (self.target.trim(), None),
        }
    }
}

/// One element of an extracted note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text emitted unchanged.
    Literal(String),
    /// A masked code span, by span id.
    Code(usize),
    /// An image reference, by index into [`ExtractedBody::images`].
    Image(usize),
    /// A wikilink, by index into [`ExtractedBody::links`].
    WikiLink(usize),
}

/// Note body split into tokens plus the references they point at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedBody {
    pub tokens: Vec<Token>,
    pub images: Vec<ImageReference>,
    pub links: Vec<WikilinkReference>,
}

impl ExtractedBody {
    fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.tokens.last_mut() {
            Some(Token::Literal(prev)) => prev.push_str(text),
            _ => self.tokens.push(Token::Literal(text.to_string())),
        }
    }
}

// One pass, leftmost-first:
//   ![[embed]]                      - wiki image embed
//   ![alt](path "optional title")   - markdown image
//   [[target]] / [[target|display]] - wikilink
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"!\[\[(?P<embed>[^\]\n]+?)\]\]",
        r#"|!\[(?P<alt>[^\]\n]*)\]\((?P<path>[^)\n]*?)(?:\s+"[^"\n]*")?\s*\)"#,
        r"|\[\[(?P<target>[^\]|\n]+)(?:\|(?P<display>[^\n]*?))?\]\]",
    ))
    .unwrap()
});

// A file-like target: ends in a 2-5 character extension
static FILE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.[A-Za-z0-9]{2,5}$").unwrap()
});

/// True when a wikilink target should be left as written: file paths, absolute
/// paths and external URLs.
pub fn is_skipped_wikilink(target: &str) -> bool {
    let target = target.trim();
    target.starts_with('/') || target.contains("://") || FILE_EXTENSION.is_match(target)
}

/// True for images served from elsewhere, which are never fetched or copied.
pub fn is_external_image(path: &str) -> bool {
    let lower = path.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Tokenize a masked body, collecting image references and wikilinks.
///
/// Code spans pass through as [`Token::Code`]; references that are left alone
/// (external images, skipped wikilinks, empty paths) stay literal.
pub fn extract_references(masked: &MaskedText) -> ExtractedBody {
    let mut body = ExtractedBody::default();

    for piece in &masked.pieces {
        match piece {
            Piece::Code(id) => body.tokens.push(Token::Code(*id)),
            Piece::Text(text) => extract_from_text(text, &mut body),
        }
    }

    body
}

fn extract_from_text(text: &str, body: &mut ExtractedBody) {
    let mut cursor = 0;

    for cap in REFERENCE.captures_iter(text) {
        let Some(whole) = cap.get(0) else { continue };
        body.push_literal(&text[cursor..whole.start()]);
        cursor = whole.end();

        match classify(&cap) {
            Some(Extracted::Image(image)) => {
                body.tokens.push(Token::Image(body.images.len()));
                body.images.push(image);
            }
            Some(Extracted::Link(link)) => {
                body.tokens.push(Token::WikiLink(body.links.len()));
                body.links.push(link);
            }
            None => body.push_literal(whole.as_str()),
        }
    }

    body.push_literal(&text[cursor..]);
}

enum Extracted {
    Image(ImageReference),
    Link(WikilinkReference),
}

fn classify(cap: &Captures<'_>) -> Option<Extracted> {
    let source_text = cap.get(0)?.as_str().to_string();

    if let Some(embed) = cap.name("embed") {
        let raw_target = embed.as_str().trim();
        if raw_target.is_empty() {
            return None;
        }
        return Some(Extracted::Image(ImageReference {
            syntax: ImageSyntax::Wiki,
            raw_target: raw_target.to_string(),
            alt_text: String::new(),
            source_text,
        }));
    }

    if let Some(path) = cap.name("path") {
        let raw_target = path.as_str().trim();
        if raw_target.is_empty() || is_external_image(raw_target) {
            return None;
        }
        let alt_text = cap.name("alt").map(|m| m.as_str().trim()).unwrap_or("");
        return Some(Extracted::Image(ImageReference {
            syntax: ImageSyntax::Markdown,
            raw_target: raw_target.to_string(),
            alt_text: alt_text.to_string(),
            source_text,
        }));
    }

    let target = cap.name("target")?.as_str().trim();
    if target.is_empty() || is_skipped_wikilink(target) {
        return None;
    }
    let display_text = cap
        .name("display")
        .map(|m| m.as_str().trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Some(Extracted::Link(WikilinkReference {
        target: target.to_string(),
        display_text,
        source_text,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::code_block::mask;

    fn extract(content: &str) -> ExtractedBody {
        extract_references(&mask(content))
    }

    #[test]
    fn test_wiki_embed() {
        let body = extract("Look: ![[ cat.png ]] nice");
        assert_eq!(body.images.len(), 1);
        assert_eq!(body.images[0].syntax, ImageSyntax::Wiki);
        assert_eq!(body.images[0].raw_target, "cat.png");
        assert_eq!(body.images[0].source_text, "![[ cat.png ]]");
        assert_eq!(
            body.tokens,
            vec![
                Token::Literal("Look: ".to_string()),
                Token::Image(0),
                Token::Literal(" nice".to_string()),
            ]
        );
        assert!(body.links.is_empty());
    }

    #[test]
    fn test_markdown_image_with_title() {
        let body = extract(r#"![A cat]( img/cat one.png "The cat" )"#);
        assert_eq!(body.images.len(), 1);
        assert_eq!(body.images[0].syntax, ImageSyntax::Markdown);
        assert_eq!(body.images[0].alt_text, "A cat");
        assert_eq!(body.images[0].raw_target, "img/cat one.png");
    }

    #[test]
    fn test_external_image_untouched() {
        let content = "![remote](https://example.com/a.png) and ![x](http://e.org/b.jpg)";
        let body = extract(content);
        assert!(body.images.is_empty());
        assert_eq!(body.tokens, vec![Token::Literal(content.to_string())]);
    }

    #[test]
    fn test_wikilinks() {
        let body = extract("See [[My Note]] and [[Other|shown text]].");
        assert_eq!(body.links.len(), 2);
        assert_eq!(body.links[0].target, "My Note");
        assert_eq!(body.links[0].display(), "My Note");
        assert_eq!(body.links[1].target, "Other");
        assert_eq!(body.links[1].display(), "shown text");
        assert_eq!(body.links[1].source_text, "[[Other|shown text]]");
    }

    #[test]
    fn test_display_text_after_first_pipe() {
        let body = extract("[[Note|a|b]]");
        assert_eq!(body.links[0].display_text.as_deref(), Some("a|b"));

        let body = extract("[[Note|]]");
        assert_eq!(body.links[0].display(), "Note");
    }

    #[test]
    fn test_skipped_wikilinks_stay_literal() {
        let content = "[[image.png]] [[https://example.com/x]] [[/abs/path]]";
        let body = extract(content);
        assert!(body.links.is_empty());
        assert_eq!(body.tokens, vec![Token::Literal(content.to_string())]);
    }

    #[test]
    fn test_is_skipped_wikilink() {
        assert!(is_skipped_wikilink("doc.pdf"));
        assert!(is_skipped_wikilink("archive.tar.gz"));
        assert!(is_skipped_wikilink("/abs/path"));
        assert!(is_skipped_wikilink("ftp://host/x"));
        assert!(!is_skipped_wikilink("My Note"));
        assert!(!is_skipped_wikilink("v1.0 release"));
        assert!(!is_skipped_wikilink("Note.abcdef"));
    }

    #[test]
    fn test_code_is_not_scanned() {
        let body = extract("`![[a.png]]` and\n```\n[[Note]]\n```\n![[b.png]]");
        assert_eq!(body.images.len(), 1);
        assert_eq!(body.images[0].raw_target, "b.png");
        assert!(body.links.is_empty());
        assert!(matches!(body.tokens[0], Token::Code(0)));
    }

    #[test]
    fn test_non_greedy_close() {
        let body = extract("![[a.png]] text ]] more");
        assert_eq!(body.images[0].raw_target, "a.png");
    }

    #[test]
    fn test_duplicate_references_are_separate_tokens() {
        let body = extract("![[a.png]] and ![[a.png]]");
        assert_eq!(body.images.len(), 2);
        assert_eq!(
            body.tokens,
            vec![
                Token::Image(0),
                Token::Literal(" and ".to_string()),
                Token::Image(1),
            ]
        );
    }

    #[test]
    fn test_file_target() {
        let wiki = ImageReference {
            syntax: ImageSyntax::Wiki,
            raw_target: "sub/cat.png|300".to_string(),
            alt_text: String::new(),
            source_text: "![[sub/cat.png|300]]".to_string(),
        };
        assert_eq!(wiki.file_target(), "sub/cat.png");

        let md = ImageReference {
            syntax: ImageSyntax::Markdown,
            raw_target: "<my%20cat.png>".to_string(),
            alt_text: String::new(),
            source_text: "![](<my%20cat.png>)".to_string(),
        };
        assert_eq!(md.file_target(), "my cat.png");
    }

    #[test]
    fn test_wikilink_heading_split() {
        let link = WikilinkReference {
            target: "My Note#Some Section".to_string(),
            display_text: None,
            source_text: "[[My Note#Some Section]]".to_string(),
        };
        assert_eq!(link.note_and_heading(), ("My Note", Some("Some Section")));

        let same_page = WikilinkReference {
            target: "#Some Section".to_string(),
            display_text: None,
            source_text: "[[#Some Section]]".to_string(),
        };
        assert_eq!(same_page.note_and_heading(), ("", Some("Some Section")));
    }
}
