//! Markdown-aware document chunking.
//!
//! Splits book content into token-bounded, overlapping chunks along heading
//! and paragraph boundaries:
//!
//! 1. Strip the leading `---` frontmatter block.
//! 2. Split on level 2–4 headings, carrying each heading as the section label
//!    of the content that follows it.
//! 3. Sections within the target size are emitted whole.
//! 4. Oversized sections are split on blank-line paragraphs and greedily
//!    packed; each new buffer is seeded with the trailing `chunk_overlap`
//!    tokens of the previous chunk for context continuity.
//!
//! A paragraph that alone exceeds the target size is emitted as one oversized
//! chunk rather than being split further.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::document::{Chunk, SectionMeta};
use crate::tokenize::TokenCounter;

fn frontmatter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A---[ \t]*\n.*?\n---[ \t]*\n").unwrap())
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{2,4})\s+(.+)$").unwrap())
}

fn paragraph_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*\n").unwrap())
}

/// Splits markdown content into token-bounded chunks with provenance metadata.
pub struct MarkdownChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    counter: TokenCounter,
}

/// A heading-delimited section: label plus body text.
struct Section {
    heading: String,
    content: String,
}

impl MarkdownChunker {
    /// Create a chunker with the given token budget, overlap, and counter.
    pub fn new(chunk_size: usize, chunk_overlap: usize, counter: TokenCounter) -> Self {
        Self { chunk_size, chunk_overlap, counter }
    }

    /// Split `content` into chunks, attaching `meta` to each.
    ///
    /// A heading overrides `meta.section` for the chunks under it; content
    /// before the first heading keeps `meta.section`. Returns an empty `Vec`
    /// for empty (or frontmatter-only) documents.
    pub fn chunk(&self, content: &str, meta: &SectionMeta) -> Vec<Chunk> {
        let body = frontmatter_re().replace(content, "");
        let body = body.trim();
        if body.is_empty() {
            return Vec::new();
        }

        let mut pieces: Vec<(String, String, usize)> = Vec::new();
        for section in split_by_headings(body) {
            self.pack_section(&section, &mut pieces);
        }

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, (heading, content, token_count))| Chunk {
                content,
                chapter: meta.chapter.clone(),
                section: if heading.is_empty() { meta.section.clone() } else { heading },
                source_file: meta.source_file.clone(),
                chunk_index,
                token_count,
            })
            .collect();

        debug!(source_file = %meta.source_file, chunk_count = chunks.len(), "chunked document");
        chunks
    }

    /// Emit one section as `(heading, content, token_count)` pieces.
    fn pack_section(&self, section: &Section, out: &mut Vec<(String, String, usize)>) {
        let section_tokens = self.counter.count(&section.content);
        if section_tokens <= self.chunk_size {
            out.push((section.heading.clone(), section.content.clone(), section_tokens));
            return;
        }

        let paragraphs: Vec<&str> = paragraph_split_re()
            .split(&section.content)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let mut buffer = String::new();
        for para in paragraphs {
            let candidate = if buffer.is_empty() {
                para.to_string()
            } else {
                format!("{buffer}\n\n{para}")
            };

            if self.counter.count(&candidate) <= self.chunk_size {
                buffer = candidate;
                continue;
            }

            // Buffer is full. Emit it, then seed the next buffer with the
            // overlap tail of the emitted text followed by the paragraph
            // that triggered the overflow.
            if !buffer.is_empty() {
                let tokens = self.counter.count(&buffer);
                out.push((section.heading.clone(), std::mem::take(&mut buffer), tokens));
            }
            buffer = if self.chunk_overlap > 0 {
                match out.last() {
                    Some((_, prev, _)) => {
                        let overlap = self.counter.tail(prev, self.chunk_overlap);
                        format!("{}\n\n{para}", overlap.trim_start())
                    }
                    None => para.to_string(),
                }
            } else {
                para.to_string()
            };
        }

        if !buffer.is_empty() {
            let tokens = self.counter.count(&buffer);
            out.push((section.heading.clone(), buffer, tokens));
        }
    }
}

/// Split markdown into sections at level 2–4 headings.
///
/// The heading text (hash markers stripped) labels the content that follows
/// it. Content before the first heading gets an empty label.
fn split_by_headings(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut heading = String::new();
    let mut body = String::new();

    let mut flush = |heading: &str, body: &mut String| {
        let trimmed = body.trim();
        if !trimmed.is_empty() {
            sections.push(Section { heading: heading.to_string(), content: trimmed.to_string() });
        }
        body.clear();
    };

    for line in content.lines() {
        if let Some(caps) = heading_re().captures(line) {
            flush(&heading, &mut body);
            heading = caps[2].trim().to_string();
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }
    flush(&heading, &mut body);

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> SectionMeta {
        SectionMeta {
            chapter: "robotics".into(),
            section: "intro".into(),
            source_file: "ch01.md".into(),
        }
    }

    fn chunker(size: usize, overlap: usize) -> MarkdownChunker {
        MarkdownChunker::new(size, overlap, TokenCounter::heuristic())
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        assert!(chunker(100, 10).chunk("", &meta()).is_empty());
        assert!(chunker(100, 10).chunk("   \n\n  ", &meta()).is_empty());
    }

    #[test]
    fn frontmatter_is_stripped() {
        let doc = "---\ntitle: Chapter One\n---\nActual body text here.";
        let chunks = chunker(100, 10).chunk(doc, &meta());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Actual body text here.");
    }

    #[test]
    fn frontmatter_only_document_is_empty() {
        let doc = "---\ntitle: Chapter One\n---\n";
        assert!(chunker(100, 10).chunk(doc, &meta()).is_empty());
    }

    #[test]
    fn heading_becomes_section_label() {
        let doc = "Preamble text.\n\n## Sensors\n\nLidar measures distance.";
        let chunks = chunker(100, 10).chunk(doc, &meta());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].section, "intro");
        assert_eq!(chunks[1].section, "Sensors");
        assert_eq!(chunks[1].content, "Lidar measures distance.");
    }

    #[test]
    fn small_section_is_one_chunk() {
        let doc = "## SLAM\n\nPara one.\n\nPara two.";
        let chunks = chunker(100, 10).chunk(doc, &meta());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.contains("Para one."));
        assert!(chunks[0].content.contains("Para two."));
    }

    #[test]
    fn oversized_section_splits_on_paragraphs_within_budget() {
        // 10-token budget = 40 bytes with the heuristic counter.
        let para = "one two three four five six seven"; // 33 bytes
        let doc = format!("## Long\n\n{para}\n\n{para}\n\n{para}");
        let chunks = chunker(10, 0).chunk(&doc, &meta());
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.token_count <= 10);
            assert_eq!(chunk.content, para);
        }
    }

    #[test]
    fn overlap_seeds_next_chunk_with_previous_tail() {
        let para = "alpha beta gamma delta epsilon zeta etaxi"; // 41 bytes
        let doc = format!("## Long\n\n{para}\n\n{para}");
        let chunker = chunker(12, 3);
        let chunks = chunker.chunk(&doc, &meta());
        assert_eq!(chunks.len(), 2);
        let tail = TokenCounter::heuristic().tail(&chunks[0].content, 3);
        assert!(
            chunks[1].content.starts_with(tail.trim_start()),
            "chunk 1 should start with the overlap tail of chunk 0"
        );
    }

    #[test]
    fn single_oversized_paragraph_is_kept_whole() {
        let para = "a very long single paragraph that cannot be split without breaking \
                    its one semantic unit and therefore stays together as emitted";
        let doc = format!("## Edge\n\n{para}\n\nshort tail");
        let chunks = chunker(10, 0).chunk(&doc, &meta());
        assert!(chunks.iter().any(|c| c.content == para));
        assert!(chunks.iter().any(|c| c.token_count > 10));
    }

    #[test]
    fn chunk_indices_are_sequential_across_sections() {
        let doc = "## A\n\nfirst\n\n## B\n\nsecond\n\n### C\n\nthird";
        let chunks = chunker(100, 10).chunk(doc, &meta());
        let indices: Vec<usize> = chunks.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn level_five_heading_is_not_a_split_point() {
        let doc = "## Top\n\nbody\n\n##### deep heading\nmore body";
        let chunks = chunker(100, 10).chunk(doc, &meta());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.contains("##### deep heading"));
    }
}
