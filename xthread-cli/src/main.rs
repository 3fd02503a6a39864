// Command-line interface for xthread
//
// Saves an X/Twitter post, the same-author thread it belongs to, or a long-form article as a
// Markdown file next to a folder with its images. All of the work happens in xthread-babel;
// this binary parses arguments, loads configuration, installs logging and reports results.
//
// Usage:
//  xthread <url> [-o <dir>] [--no-thread] [--max-depth <n>] [--to <format>]   - Fetch and save (default)
//  xthread fetch <url> ...                                                   - Same as above (explicit)
//  xthread render <file.json> [--url <url>] [-o <dir>] [--with-media]        - Render a saved API response
//  xthread --list-formats                                                    - List output formats
//
// Configuration is layered: built-in defaults, then ./xthread.toml if present, then the
// file given with --config, then command-line flags.
//
// Errors are printed on stderr and the process exits with status 1.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::fmt::Display;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xthread_babel::publish::{publish, PublishReport, PublishSpec};
use xthread_babel::source::client::FxTwitterClient;
use xthread_babel::source::fxtwitter::parse_saved;
use xthread_babel::source::memory::MemorySource;
use xthread_babel::{
    build_document, parse_post_url, DocumentKind, DocumentModel, Error, FormatRegistry,
    MediaFetcher, PostSource,
};
use xthread_config::{Loader, XthreadConfig, LOCAL_CONFIG_FILE};

const SUBCOMMANDS: &[&str] = &["fetch", "render", "help"];

fn build_cli() -> Command {
    Command::new("xthread")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Save X/Twitter posts, threads and articles as Markdown")
        .long_about(
            "xthread fetches a post through the FxTwitter API and writes it as Markdown,\n\
            together with a folder holding its images.\n\n\
            Same-author reply chains are merged into a single thread document, and\n\
            long-form articles keep their headings, lists, code and images.\n\n\
            Examples:\n  \
            xthread https://x.com/alice/status/1234567890          # Save into ./output\n  \
            xthread https://x.com/alice/status/1234567890 -o notes # Save into ./notes\n  \
            xthread https://x.com/alice/status/1234567890 --no-thread\n  \
            xthread render saved.json --url https://x.com/alice/status/1 # Offline render",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an xthread.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show debug logs (RUST_LOG takes precedence)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("fetch")
                .about("Fetch a post and save it (default command)")
                .arg(
                    Arg::new("url")
                        .help("Post URL (x.com, twitter.com and known mirrors)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::Url),
                )
                .arg(output_arg())
                .arg(format_arg())
                .arg(
                    Arg::new("no-thread")
                        .long("no-thread")
                        .help("Save only the given post, without following its thread")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("max-depth")
                        .long("max-depth")
                        .value_name("N")
                        .help("Maximum number of posts followed in each direction")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Render a saved API response without network access")
                .long_about(
                    "Render a saved FxTwitter API response.\n\n\
                    The file holds one response object, or an array of responses for a\n\
                    thread. The first response is the post that was asked for.\n\
                    Images are only downloaded with --with-media.",
                )
                .arg(
                    Arg::new("input")
                        .help("Saved API response (JSON)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("url")
                        .long("url")
                        .help("Source link shown in the footer when the post has none")
                        .value_hint(ValueHint::Url),
                )
                .arg(output_arg())
                .arg(format_arg())
                .arg(
                    Arg::new("with-media")
                        .long("with-media")
                        .help("Download the referenced images")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_name("DIR")
        .help("Output directory (defaults to the configured one)")
        .value_hint(ValueHint::DirPath)
}

fn format_arg() -> Arg {
    Arg::new("to")
        .long("to")
        .value_name("FORMAT")
        .help("Output format: markdown, json or text")
        .value_hint(ValueHint::Other)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // A bare URL means "fetch"
            if args.len() > 1
                && !args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "fetch".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_count("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    match matches.subcommand() {
        Some(("fetch", sub_matches)) => {
            let config = load_cli_config(&matches, sub_matches);
            let url = sub_matches
                .get_one::<String>("url")
                .expect("url is required");
            handle_fetch_command(url, &config);
        }
        Some(("render", sub_matches)) => {
            let config = load_cli_config(&matches, sub_matches);
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let url = sub_matches.get_one::<String>("url").cloned();
            let with_media = sub_matches.get_flag("with-media");
            handle_render_command(input, url, with_media, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbosity: u8) {
    let default_level = if verbosity > 0 { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(err: impl Display) -> ! {
    eprintln!("❌ 错误: {err}");
    std::process::exit(1);
}

/// Handle the fetch command
fn handle_fetch_command(url: &str, config: &XthreadConfig) {
    let post_url = parse_post_url(url).unwrap_or_else(|e| fail(e));
    info!(user = %post_url.screen_name, id = %post_url.post_id, "fetching post");

    let client = FxTwitterClient::new((&config.fetch).into()).unwrap_or_else(|e| fail(e));
    let start = client
        .fetch_post(&post_url.post_id)
        .unwrap_or_else(|e| fail(e));

    let options = config.document_options(Some(url.to_string()));
    let model = build_document(start, &client, &options).unwrap_or_else(|e| fail(e));
    let report = write_document(&model, config, Some(&client));
    print_summary(&model, &report);
}

/// Handle the render command
fn handle_render_command(
    input: &str,
    url: Option<String>,
    with_media: bool,
    config: &XthreadConfig,
) {
    let body = fs::read_to_string(input)
        .unwrap_or_else(|e| fail(format!("cannot read '{input}': {e}")));
    let posts = parse_saved(&body).unwrap_or_else(|e| fail(e));
    let Some(start) = posts.first().cloned() else {
        fail(Error::Parse(format!("'{input}' holds no responses")));
    };

    let source = MemorySource::with_posts(posts);
    let options = config.document_options(url);
    let model = build_document(start, &source, &options).unwrap_or_else(|e| fail(e));

    let client = with_media
        .then(|| FxTwitterClient::new((&config.fetch).into()).unwrap_or_else(|e| fail(e)));
    let fetcher = client.as_ref().map(|c| c as &dyn MediaFetcher);
    let report = write_document(&model, config, fetcher);
    print_summary(&model, &report);
}

fn write_document(
    model: &DocumentModel,
    config: &XthreadConfig,
    fetcher: Option<&dyn MediaFetcher>,
) -> PublishReport {
    let spec = PublishSpec::new(model, &config.output.dir).with_format(&config.output.format);
    publish(spec, fetcher).unwrap_or_else(|e| fail(e))
}

fn print_summary(model: &DocumentModel, report: &PublishReport) {
    let kind = match model.kind {
        DocumentKind::Post => "推文".to_string(),
        DocumentKind::Thread(count) => format!("串推 ({count} 条)"),
        DocumentKind::Article => "文章".to_string(),
    };
    println!("✅ 已保存{kind}: {}", report.document_path.display());

    if let Some(images_dir) = &report.images_dir {
        let total = model.media.len();
        if report.skipped > 0 {
            println!("🖼  图片未下载: {total} 张 ({})", images_dir.display());
        } else {
            println!(
                "🖼  图片: {}/{total} 张已保存到 {}",
                report.saved.len(),
                images_dir.display()
            );
        }
        for failure in &report.failed {
            println!("⚠️  下载失败: {} ({})", failure.reference.url, failure.error);
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Output formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        if let Ok(format) = registry.get(&format_name) {
            println!("  {format_name:<10} {}", format.description());
        }
    }
}

fn load_cli_config(matches: &ArgMatches, sub_matches: &ArgMatches) -> XthreadConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => loader.with_file(path),
        None => loader,
    };

    if let Some(dir) = sub_matches.get_one::<String>("output") {
        loader = loader
            .set_override("output.dir", dir.as_str())
            .unwrap_or_else(|e| fail(e));
    }
    if let Some(to) = sub_matches.get_one::<String>("to") {
        loader = loader
            .set_override("output.format", to.as_str())
            .unwrap_or_else(|e| fail(e));
    }
    if sub_matches.try_get_one::<bool>("no-thread").ok().flatten() == Some(&true) {
        loader = loader
            .set_override("thread.enabled", false)
            .unwrap_or_else(|e| fail(e));
    }
    if let Ok(Some(depth)) = sub_matches.try_get_one::<usize>("max-depth") {
        loader = loader
            .set_override("thread.max_depth", *depth as i64)
            .unwrap_or_else(|e| fail(e));
    }

    let config = loader
        .build()
        .unwrap_or_else(|e| fail(format!("failed to load configuration: {e}")));

    if let Err(e) = FormatRegistry::default().get(&config.output.format) {
        fail(e);
    }
    config
}
