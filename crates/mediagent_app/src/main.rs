use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use client_logging::client_info;
use log::LevelFilter;
use mediagent_app::platform::app::Controller;
use mediagent_app::platform::config;
use mediagent_app::platform::logging::{self, LogDestination};
use mediagent_app::platform::session::SessionStore;
use mediagent_app::platform::ui::{constants, render};
use mediagent_core::{AppViewModel, Msg, Route};
use mediagent_engine::{ApiSettings, EngineEvent, EngineHandle};

const HEALTH_WAIT: Duration = Duration::from_secs(10);

/// MediAgent - upload a medical report for multi-agent diagnosis
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the .txt medical report to analyze; prompts when omitted
    report: Option<PathBuf>,

    /// Read the report text from stdin and send it as a string
    #[arg(long, conflicts_with = "report")]
    text: bool,

    /// Backend base URL (overrides MEDIAGENT_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Check that the backend is reachable and exit
    #[arg(long)]
    check: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,

    /// Log debug output as well
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let destination = match args.log {
        LogTarget::File => Some(LogDestination::File),
        LogTarget::Terminal => Some(LogDestination::Terminal),
        LogTarget::Both => Some(LogDestination::Both),
        LogTarget::Off => None,
    };
    if let Some(destination) = destination {
        let level = if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        logging::initialize(destination, level);
    }

    // Resolve config from CLI flag > env var (.env included) > default
    let settings = config::settings_for_process(args.api_url.as_deref())?;
    client_info!("MediAgent starting against {}", settings.base_url());
    let engine = EngineHandle::new(settings.clone())?;

    if args.check {
        return Ok(check_backend(&engine, &settings));
    }

    let mut controller = Controller::new(engine, SessionStore::new());
    let mut printer = FramePrinter::default();

    if args.text {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read report text from stdin")?;
        printer.print_opt(controller.dispatch(Msg::ReportTextSubmitted(text)));
        return Ok(finish(&mut controller, &mut printer));
    }

    if let Some(path) = args.report.as_deref() {
        submit_path(&mut controller, &mut printer, path);
        return Ok(finish(&mut controller, &mut printer));
    }

    run_interactive(&mut controller, &mut printer)?;
    Ok(ExitCode::SUCCESS)
}

fn check_backend(engine: &EngineHandle, settings: &ApiSettings) -> ExitCode {
    engine.check_health();
    match engine.recv_timeout(HEALTH_WAIT) {
        Some(EngineEvent::HealthChecked(Ok(health))) => {
            println!("{}: {}", settings.base_url(), health.status);
            if let Some(message) = health.message {
                println!("{message}");
            }
            ExitCode::SUCCESS
        }
        Some(EngineEvent::HealthChecked(Err(err))) => {
            eprintln!("{}: {}", settings.base_url(), err);
            ExitCode::FAILURE
        }
        _ => {
            eprintln!("{}: no answer within {:?}", settings.base_url(), HEALTH_WAIT);
            ExitCode::FAILURE
        }
    }
}

/// Selects `path` and, when the form accepted it, submits it.
fn submit_path(controller: &mut Controller, printer: &mut FramePrinter, path: &Path) {
    printer.print_opt(controller.select_path(path));
    if controller.state().selected_file().is_some() {
        printer.print_opt(controller.dispatch(Msg::SubmitClicked));
    }
}

fn finish(controller: &mut Controller, printer: &mut FramePrinter) -> ExitCode {
    controller.pump_until_settled(None, |view| printer.print(view));
    controller.outcome().into()
}

fn run_interactive(controller: &mut Controller, printer: &mut FramePrinter) -> anyhow::Result<()> {
    for line in render::render_banner() {
        println!("{line}");
    }

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("{}", constants::PROMPT_PATH);
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let raw = input.trim();
        if raw.is_empty() {
            break;
        }

        submit_path(controller, printer, Path::new(raw));
        controller.pump_until_settled(None, |view| printer.print(view));

        if controller.state().route() == Route::Results {
            println!("{}", constants::BUTTON_UPLOAD_ANOTHER);
            printer.print_opt(controller.dispatch(Msg::UploadAnotherClicked));
        }
    }
    Ok(())
}

/// Prints rendered frames, skipping frames identical to the previous one.
#[derive(Default)]
struct FramePrinter {
    last: Vec<String>,
}

impl FramePrinter {
    fn print(&mut self, view: &AppViewModel) {
        let lines = render::render(view);
        if lines.is_empty() || lines == self.last {
            return;
        }
        for line in &lines {
            println!("{line}");
        }
        self.last = lines;
    }

    fn print_opt(&mut self, view: Option<AppViewModel>) {
        if let Some(view) = view {
            self.print(&view);
        }
    }
}
