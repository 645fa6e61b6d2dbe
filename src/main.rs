use log::{warn, LevelFilter};
use quickfetch::config::loader::{self, Action, ConfigPaths};
use quickfetch::config::OutputMode;
use quickfetch::{help, logo, render, write_generated_config, Logo, Result, SystemProbe};
use std::env;
use std::io::{self, IsTerminal};
use std::process;

fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Warn);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // Only fails if a logger is already installed
    let _ = builder.try_init();
}

fn run(args: &[String]) -> Result<()> {
    let paths = ConfigPaths::detect();
    let (config, action) = loader::load(args, &paths)?;
    let is_terminal = io::stdout().is_terminal();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match action {
        Action::Info(command) => help::run_info(&command, &config, &paths, &mut out),
        Action::GenConfig { path, force } => write_generated_config(
            &config,
            path.as_deref(),
            paths.default_config_file().as_deref(),
            force,
            &mut out,
        ),
        Action::Render => {
            let colors = !config.display.pipe && is_terminal;
            let probe = SystemProbe::new(&config.general);
            let logo = if config.display.pipe || config.output == OutputMode::Json {
                Logo::none()
            } else {
                logo::load(&config.logo, &probe, &paths, colors).unwrap_or_else(|e| {
                    warn!("{}", e);
                    Logo::none()
                })
            };
            render(&config, &probe, &logo, &mut out, colors)
        }
    }
}

fn main() {
    init_logger();
    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
