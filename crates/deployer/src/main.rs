use {clap::Parser, std::process::ExitCode};

#[tokio::main]
async fn main() -> ExitCode {
    let args = deployer::arguments::Arguments::parse();
    let mut log = observe::Config::default().with_env_filter(&args.log_filter);
    if args.log_json {
        log = log.with_json_format();
    }
    observe::tracing::initialize(&log);
    observe::panic_hook::set();
    tracing::info!("running deployer with validated arguments:\n{}", args);
    deployer::start(args).await
}
