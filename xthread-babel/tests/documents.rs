//! End-to-end layouts: saved API responses rendered to Markdown.

use insta::assert_snapshot;
use xthread_babel::document::{build_document, DocumentKind, DocumentOptions};
use xthread_babel::thread::ThreadOptions;
use xthread_babel::MediaRole;

use crate::common::load_source;

fn render(name: &str, options: &DocumentOptions) -> (String, xthread_babel::DocumentModel) {
    let (start, source) = load_source(name);
    let model = build_document(start, &source, options).expect("document to build");
    let markdown = model.render().expect("document to render").markdown;
    (markdown, model)
}

#[test]
fn post_with_photos_video_and_quote() {
    let (markdown, model) = render("post.json", &DocumentOptions::default());

    assert_eq!(model.kind, DocumentKind::Post);
    assert_eq!(model.base_name, "alice_1800000000000000001");
    assert_snapshot!(markdown, @r#"
    # @alice (Alice) 的推文

    > 📅 2024-06-01 08:30:00 | ❤️ 42 | 🔁 1.2K | 💬 7 | 👁️ 98.8K

    ---

    Thanks [@bob](https://x.com/bob), notes at [https://example.com/notes](https://example.com/notes)

    ![A whiteboard](alice_1800000000000000001_images/1.jpg)

    ![图片2](alice_1800000000000000001_images/2.png)

    > 🎬 该推文包含视频，请访问原文查看

    ---

    ### 引用推文

    > **@carol**: Original thought

    ---

    *来源: [https://x.com/alice/status/1800000000000000001](https://x.com/alice/status/1800000000000000001)*
    "#);
}

#[test]
fn post_media_references_follow_document_order() {
    let (_, model) = render("post.json", &DocumentOptions::default());
    let refs: Vec<(&str, MediaRole)> = model
        .media
        .iter()
        .map(|r| (r.filename.as_str(), r.role))
        .collect();
    assert_eq!(
        refs,
        [
            ("1.jpg", MediaRole::Attachment(1)),
            ("2.png", MediaRole::Attachment(2)),
        ]
    );
    assert_eq!(model.images_dir, "alice_1800000000000000001_images");
}

#[test]
fn thread_is_rebuilt_around_the_requested_post() {
    let (markdown, model) = render("thread.json", &DocumentOptions::default());

    assert_eq!(model.kind, DocumentKind::Thread(3));
    assert_eq!(model.base_name, "alice_1810000000000000002");
    assert_eq!(model.images_dir, "alice_1810000000000000002_images");
    assert_snapshot!(markdown, @r#"
    # @alice 的推文串 (Thread, 共 3 条)

    > 📅 2024-07-01 12:00:00 | ❤️ 10 | 🔁 2 | 💬 1 | 👁️ 0

    ---

    A thread about caching 🧵

    ---

    Second: the details.

    ![图片1](alice_1810000000000000002_images/1.png)

    ---

    Third: the takeaway.

    ![图片2](alice_1810000000000000002_images/2.jpg)

    ---

    *来源: [https://x.com/alice/status/1810000000000000001](https://x.com/alice/status/1810000000000000001)*
    "#);
}

#[test]
fn thread_walk_can_be_disabled() {
    let options = DocumentOptions {
        thread: ThreadOptions {
            enabled: false,
            ..ThreadOptions::default()
        },
        ..DocumentOptions::default()
    };
    let (markdown, model) = render("thread.json", &options);

    assert_eq!(model.kind, DocumentKind::Post);
    assert_eq!(model.base_name, "alice_1810000000000000002");
    assert!(markdown.starts_with("# @alice (Alice) 的推文\n"));
    assert!(!markdown.contains("A thread about caching"));
}

#[test]
fn thread_depth_bounds_each_direction() {
    let options = DocumentOptions {
        thread: ThreadOptions {
            enabled: true,
            max_depth: 1,
        },
        ..DocumentOptions::default()
    };
    let (_, model) = render("thread.json", &options);
    // One step back, one step forward
    assert_eq!(model.kind, DocumentKind::Thread(3));

    let options = DocumentOptions {
        thread: ThreadOptions {
            enabled: true,
            max_depth: 0,
        },
        ..DocumentOptions::default()
    };
    let (_, model) = render("thread.json", &options);
    assert_eq!(model.kind, DocumentKind::Post);
}

#[test]
fn article_blocks_render_in_order() {
    let (markdown, model) = render("article.json", &DocumentOptions::default());

    assert_eq!(model.kind, DocumentKind::Article);
    assert_snapshot!(markdown, @r#"
    # Shipping Rust at Scale

    > ✍️ @alice (Alice)
    > 📅 2024-08-01 09:00:00 | ❤️ 5.0K | 🔁 300 | 💬 45 | 👁️ 1.2M

    ![封面](alice_1820000000000000001_images/cover.jpg)

    ---

    # Why Rust

    😀 **We moved** fast and kept things safe.

    Read the [guide](https://doc.rust-lang.org/book/) by [@carol](https://x.com/carol).

    - Ownership
      - Borrowing
    - Lifetimes

    1. Write tests
    2. `Ship` it

    ![Architecture](alice_1820000000000000001_images/article_1.png)

    > Fearless concurrency.

    ```
    fn main() {
        println!("hi");
    }
    ```

    | a | b |
    |---|---|
    | 1 | 2 |

    ## Wrap-up

    Thanks for reading!

    ---

    *来源: [https://x.com/alice/status/1820000000000000001](https://x.com/alice/status/1820000000000000001)*
    "#);
}

#[test]
fn article_cover_and_inline_images_are_named_per_role() {
    let (_, model) = render("article.json", &DocumentOptions::default());
    let names: Vec<&str> = model.media.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, ["cover.jpg", "article_1.png"]);
    assert_eq!(model.media[1].url, "https://pbs.twimg.com/media/diagram.png");
}

#[test]
fn custom_images_suffix_is_used_in_paths() {
    let options = DocumentOptions {
        images_dir_suffix: "_assets".to_string(),
        ..DocumentOptions::default()
    };
    let (markdown, model) = render("post.json", &options);
    assert_eq!(model.images_dir, "alice_1800000000000000001_assets");
    assert!(markdown.contains("(alice_1800000000000000001_assets/1.jpg)"));
}

#[test]
fn json_format_dumps_the_same_document() {
    let (_, model) = render("post.json", &DocumentOptions::default());
    let registry = xthread_babel::FormatRegistry::default();
    let json = registry
        .serialize(&model.document, "json")
        .expect("json to serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    let children = value["children"].as_array().expect("children array");
    assert_eq!(children.len(), model.document.children.len());
    assert_eq!(children[0]["heading"]["level"], 1);
}
