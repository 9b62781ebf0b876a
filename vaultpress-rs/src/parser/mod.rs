//! Parsers for Obsidian markdown syntax.

pub mod code_block;
pub mod frontmatter;
pub mod naming;
pub mod reference;

pub use code_block::{mask, unmask, CodeKind, MaskedSpan, MaskedText, Piece};
pub use frontmatter::{merge_frontmatter, serialize_frontmatter, split_frontmatter, Document};
pub use naming::{sanitize_filename, slugify};
pub use reference::{
    extract_references, ExtractedBody, ImageReference, ImageSyntax, Token, WikilinkReference,
};
