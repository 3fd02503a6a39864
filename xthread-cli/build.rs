use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command layout in src/main.rs
// Build scripts can't access src/ modules, so the flags are repeated here
fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output directory")
        .value_hint(ValueHint::DirPath)
}

fn format_arg() -> Arg {
    Arg::new("to")
        .long("to")
        .help("Output format")
        .value_parser(["markdown", "json", "text"])
        .value_hint(ValueHint::Other)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("xthread")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Save X/Twitter posts, threads and articles as Markdown")
        .arg_required_else_help(true)
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
                .help("Path to an xthread.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show debug logs")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("fetch")
                .about("Fetch a post and save it")
                .arg(
                    Arg::new("url")
                        .help("Post URL")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::Url),
                )
                .arg(output_arg())
                .arg(format_arg())
                .arg(
                    Arg::new("no-thread")
                        .long("no-thread")
                        .help("Do not follow the thread")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("max-depth")
                        .long("max-depth")
                        .help("Maximum posts followed in each direction")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Render a saved API response")
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
                        .help("Source link")
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
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "xthread", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "xthread", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "xthread", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
