//! Inline style and entity rendering.
//!
//! Turns one block's text plus its (possibly overlapping) style and entity ranges into
//! nested [`InlineContent`].
//!
//! # The Algorithm
//!
//! 1. **Cut points:** every clamped range start and end goes into a sorted set, together
//!    with `0` and the text length.
//! 2. **Slice:** consecutive cut points delimit sub-spans whose set of active styles and
//!    active entity is constant.
//! 3. **Merge:** adjacent sub-spans with an identical set are joined, so `**a****b**`
//!    can never be produced.
//! 4. **Nest:** entities split the sequence first (a link never straddles a marker),
//!    then code spans (code is exclusive and suppresses emphasis), then bold over maximal
//!    runs, then italic inside bold.
//!
//! Markers never enclose leading or trailing whitespace: whitespace at the edge of a run
//! is moved outside the marker pair. Text is never escaped, so dropping every marker
//! reproduces the source text.

use std::collections::BTreeSet;

use crate::ir::nodes::InlineContent;
use crate::model::{EntityRange, StyleKind, StyleRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Marks {
    bold: bool,
    italic: bool,
    code: bool,
}

#[derive(Debug, Clone, Copy)]
enum Layer {
    Bold,
    Italic,
}

impl Layer {
    fn active(self, marks: &Marks) -> bool {
        match self {
            Layer::Bold => marks.bold,
            Layer::Italic => marks.italic,
        }
    }

    fn wrap(self, children: Vec<InlineContent>) -> InlineContent {
        match self {
            Layer::Bold => InlineContent::Bold(children),
            Layer::Italic => InlineContent::Italic(children),
        }
    }
}

/// Bold is applied outside italic.
const EMPHASIS_ORDER: [Layer; 2] = [Layer::Bold, Layer::Italic];

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    text: String,
    marks: Marks,
    entity: Option<usize>,
}

/// Renders text with style and entity ranges into inline IR.
///
/// Offsets and lengths count `char`s. Zero-length ranges are ignored and ranges running
/// past the end of the text are clamped.
pub fn render_inline(
    text: &str,
    styles: &[StyleRange],
    entities: &[EntityRange],
) -> Vec<InlineContent> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len == 0 {
        return Vec::new();
    }

    let clamp = |offset: usize, length: usize| -> Option<(usize, usize)> {
        let start = offset.min(len);
        let end = offset.saturating_add(length).min(len);
        (start < end).then_some((start, end))
    };

    let styles: Vec<((usize, usize), StyleKind)> = styles
        .iter()
        .filter_map(|s| clamp(s.offset, s.length).map(|span| (span, s.kind)))
        .collect();
    let entity_spans: Vec<(usize, usize)> = entities
        .iter()
        .map(|e| clamp(e.offset, e.length).unwrap_or((0, 0)))
        .collect();

    let mut cuts = BTreeSet::from([0, len]);
    for ((start, end), _) in &styles {
        cuts.insert(*start);
        cuts.insert(*end);
    }
    for (start, end) in entity_spans.iter().filter(|(s, e)| s < e) {
        cuts.insert(*start);
        cuts.insert(*end);
    }

    let cuts: Vec<usize> = cuts.into_iter().collect();
    let mut segments: Vec<Segment> = Vec::new();
    for window in cuts.windows(2) {
        let (start, end) = (window[0], window[1]);
        let covers = |(s, e): (usize, usize)| s <= start && end <= e;

        let mut marks = Marks::default();
        for (span, kind) in &styles {
            if covers(*span) {
                match kind {
                    StyleKind::Bold => marks.bold = true,
                    StyleKind::Italic => marks.italic = true,
                    StyleKind::Code => marks.code = true,
                }
            }
        }
        let entity = entity_spans
            .iter()
            .position(|&(s, e)| s < e && covers((s, e)));
        let piece: String = chars[start..end].iter().collect();

        match segments.last_mut() {
            Some(last) if last.marks == marks && last.entity == entity => {
                last.text.push_str(&piece)
            }
            _ => segments.push(Segment {
                text: piece,
                marks,
                entity,
            }),
        }
    }

    let mut out = Vec::new();
    for run in segments.chunk_by(|a, b| a.entity == b.entity) {
        let styled = render_code_runs(run);
        match run[0].entity {
            Some(index) => out.push(InlineContent::Link {
                url: entities[index].kind.href(),
                content: styled,
            }),
            None => extend_coalesced(&mut out, styled),
        }
    }
    out
}

/// Renders straight to a Markdown fragment.
pub fn render_inline_markdown(
    text: &str,
    styles: &[StyleRange],
    entities: &[EntityRange],
) -> String {
    crate::formats::markdown::serializer::render_inlines(&render_inline(text, styles, entities))
}

fn render_code_runs(segments: &[Segment]) -> Vec<InlineContent> {
    let mut out = Vec::new();
    for run in segments.chunk_by(|a, b| a.marks.code == b.marks.code) {
        if run[0].marks.code {
            let code: String = run.iter().map(|s| s.text.as_str()).collect();
            let (lead, core, trail) = split_edges(&code);
            push_text(&mut out, lead);
            if !core.is_empty() {
                out.push(InlineContent::Code(core.to_string()));
            }
            push_text(&mut out, trail);
        } else {
            extend_coalesced(&mut out, nest(run, &EMPHASIS_ORDER));
        }
    }
    out
}

fn nest(segments: &[Segment], layers: &[Layer]) -> Vec<InlineContent> {
    let Some((&layer, rest)) = layers.split_first() else {
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        let mut out = Vec::new();
        push_text(&mut out, &text);
        return out;
    };

    let mut out = Vec::new();
    for run in segments.chunk_by(|a, b| layer.active(&a.marks) == layer.active(&b.marks)) {
        if !layer.active(&run[0].marks) {
            extend_coalesced(&mut out, nest(run, rest));
            continue;
        }
        let (lead, core, trail) = trim_run(run);
        push_text(&mut out, &lead);
        if !core.is_empty() {
            out.push(layer.wrap(nest(&core, rest)));
        }
        push_text(&mut out, &trail);
    }
    out
}

/// Splits the whitespace at both edges of a run off its segments.
fn trim_run(run: &[Segment]) -> (String, Vec<Segment>, String) {
    let mut core: Vec<Segment> = run.to_vec();
    let mut lead = String::new();
    let mut trail = String::new();

    while let Some(first) = core.first_mut() {
        let trimmed = first.text.trim_start();
        lead.push_str(&first.text[..first.text.len() - trimmed.len()]);
        if trimmed.is_empty() {
            core.remove(0);
        } else {
            first.text = trimmed.to_string();
            break;
        }
    }

    while let Some(last) = core.last_mut() {
        let trimmed_len = last.text.trim_end().len();
        trail.insert_str(0, &last.text[trimmed_len..]);
        if trimmed_len == 0 {
            core.pop();
        } else {
            last.text.truncate(trimmed_len);
            break;
        }
    }

    (lead, core, trail)
}

fn split_edges(text: &str) -> (&str, &str, &str) {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len().max(start);
    (&text[..start], &text[start..end], &text[end..])
}

fn push_text(out: &mut Vec<InlineContent>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(InlineContent::Text(existing)) => existing.push_str(text),
        _ => out.push(InlineContent::Text(text.to_string())),
    }
}

fn extend_coalesced(out: &mut Vec<InlineContent>, items: Vec<InlineContent>) {
    for item in items {
        match item {
            InlineContent::Text(text) => push_text(out, &text),
            other => out.push(other),
        }
    }
}
