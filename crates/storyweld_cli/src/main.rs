use anyhow::Result;
use std::env;

mod config;
mod migrate;
mod report;

fn usage() {
    eprintln!("storyweld <migrate> [options] <path>...");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  migrate <path>...              Split .mdx story docs into docs + CSF modules");
    eprintln!();
    eprintln!("Migrate options:");
    eprintln!("  --parser, -p <name>            Script grammar: tsx (default), ts, babel, flow, js");
    eprintln!("  --config, -c <file>            Configuration file (default: ./storyweld.toml)");
    eprintln!("  --dry-run                      Print the results instead of writing them");
    eprintln!("  --no-color                     Disable colored diagnostics");
    eprintln!();
    eprintln!("Directories are searched for .mdx files. Set STORYWELD_LOG to change");
    eprintln!("the log level (default: info).");
}

fn main() -> Result<()> {
    // Use STORYWELD_LOG env var for log level configuration, default to "info"
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_env("STORYWELD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        usage();
        return Ok(());
    }

    let cmd = args.remove(0);

    match cmd.as_str() {
        "migrate" | "mdx-to-csf" => migrate::run(&args)?,
        _ => usage(),
    }
    Ok(())
}
