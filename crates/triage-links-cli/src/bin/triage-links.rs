use tracing_subscriber::EnvFilter;

fn main() {
    triage_links_cli::set_version(env!("CARGO_PKG_VERSION"));
    let args: Vec<String> = std::env::args().skip(1).collect();
    let backend = triage_links_cli::ProcessBackend;
    init_tracing(&triage_links_cli::log_filter(&args, &backend));

    let out = triage_links_cli::run_cli(&args, &backend);
    if !out.stdout.is_empty() {
        print!("{}", out.stdout);
    }
    if !out.stderr.is_empty() {
        eprint!("{}", out.stderr);
    }
    std::process::exit(out.exit_code);
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("warning: invalid log filter {filter:?}: {err}");
        EnvFilter::new(triage_links_cli::config::DEFAULT_LOG_LEVEL)
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if let Err(err) = builder.try_init() {
        eprintln!("failed to install tracing subscriber: {err}");
    }
}
