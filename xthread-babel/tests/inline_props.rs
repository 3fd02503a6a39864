//! Property tests for the inline renderer.

use proptest::prelude::*;
use xthread_babel::common::inline::{render_inline, render_inline_markdown};
use xthread_babel::ir::nodes::inline_plain_text;
use xthread_babel::model::{EntityKind, EntityRange, StyleKind, StyleRange};

fn style_kind() -> impl Strategy<Value = StyleKind> {
    prop_oneof![
        Just(StyleKind::Bold),
        Just(StyleKind::Italic),
        Just(StyleKind::Code),
    ]
}

fn style_ranges() -> impl Strategy<Value = Vec<StyleRange>> {
    prop::collection::vec(
        (0usize..48, 0usize..16, style_kind()).prop_map(|(offset, length, kind)| StyleRange {
            offset,
            length,
            kind,
        }),
        0..6,
    )
}

proptest! {
    #[test]
    fn stripping_markers_restores_the_text(
        text in "[a-zA-Z0-9 ,.!?中文é😀]{0,40}",
        styles in style_ranges(),
    ) {
        let markdown = render_inline_markdown(&text, &styles, &[]);
        let stripped: String = markdown.chars().filter(|c| *c != '*' && *c != '`').collect();
        prop_assert_eq!(stripped, text);
    }

    #[test]
    fn plain_text_of_the_ir_is_the_input(
        text in "[a-z *`_\\[\\]]{0,40}",
        styles in style_ranges(),
        link in (0usize..40, 0usize..10),
    ) {
        let entities = [EntityRange {
            offset: link.0,
            length: link.1,
            kind: EntityKind::Link("https://example.com".to_string()),
        }];
        let inlines = render_inline(&text, &styles, &entities);
        prop_assert_eq!(inline_plain_text(&inlines), text);
    }

    #[test]
    fn code_runs_carry_no_emphasis(
        text in "[a-z ]{1,30}",
        bold in (0usize..30, 0usize..30),
    ) {
        let len = text.chars().count();
        let styles = [
            StyleRange { offset: 0, length: len, kind: StyleKind::Code },
            StyleRange { offset: bold.0, length: bold.1, kind: StyleKind::Bold },
        ];
        let markdown = render_inline_markdown(&text, &styles, &[]);
        prop_assert!(!markdown.contains('*'));
    }
}
