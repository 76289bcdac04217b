mod cache;
mod config;
mod detector;
mod glossary;
mod memory;
mod parser;
mod phrasebook;
mod pipeline;
mod scanner;
mod stop;
mod text_util;
mod translator;
mod watcher;

use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

use log::{error, info, warn};

use pipeline::{TranslatedMessage, TranslationPipeline};
use stop::StopSignal;
use translator::DeepLTranslator;

const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
const HISTORY_LINES: usize = 50;
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(2);

fn rotate_file(path: &Path) {
    if let Ok(meta) = std::fs::metadata(path) {
        if meta.len() >= MAX_LOG_SIZE {
            let old = path.with_extension("old");
            let _ = std::fs::rename(path, old);
        }
    }
}

fn setup_logging(debug: bool) {
    let log_path = config::config_dir().join("wct_app.log");
    rotate_file(&log_path);

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_millis(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Ok(file) = log_file {
        dispatch = dispatch.chain(file);
    } else {
        eprintln!("Warning: could not open log file {}", log_path.display());
    }

    dispatch.apply().expect("Failed to initialize logger");
}

fn print_message(msg: &TranslatedMessage) {
    let original = &msg.original;
    let who = if original.server.is_empty() {
        original.author.clone()
    } else {
        format!("{}-{}", original.author, original.server)
    };
    let head = format!(
        "[{}] [{}] {}: {}",
        original.timestamp,
        original.channel.label(),
        who,
        original.text
    );

    match &msg.translation {
        Some(t) if t.success => println!("{}\n    → {}", head, t.translated),
        Some(t) => {
            let reason = t
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".into());
            println!("{}\n    → [{}]", head, reason);
        }
        None => println!("{}", head),
    }
}

fn print_usage(api_key: &str) {
    if api_key.is_empty() {
        println!("No DeepL API key configured");
        return;
    }
    match DeepLTranslator::new(api_key) {
        Ok(translator) => match translator.get_usage() {
            Ok((used, limit)) => println!("DeepL usage: {} / {} characters this month", used, limit),
            Err(e) => println!("Usage query failed: {}", e),
        },
        Err(e) => println!("Cannot start MT client: {}", e),
    }
}

fn main() {
    let config_path = config::config_dir().join(config::CONFIG_FILE);
    let app_config = config::AppConfig::load(&config_path);
    setup_logging(app_config.show_debug_console);

    info!("WoW Chat Translator starting");
    if app_config.deepl_api_key.is_empty() {
        warn!("No DeepL API key configured — translations will fail until one is set in {}", config_path.display());
    }

    let pipeline_config = config::build_pipeline_config(&app_config);
    info!("Chat log: {}", pipeline_config.chatlog_path.display());
    info!(
        "Languages: own={:?} target={}",
        pipeline_config.own_language, pipeline_config.target_lang
    );

    // Replay recent history before the live feed starts.
    let history = pipeline::load_history(
        &pipeline_config.chatlog_path,
        HISTORY_LINES,
        &pipeline_config.enabled_channels,
    );
    if !history.is_empty() {
        println!("--- last {} chat lines ---", history.len());
        for msg in &history {
            print_message(msg);
        }
        println!("--- live feed ---");
    }

    let mut pipeline =
        match TranslationPipeline::start(pipeline_config, Box::new(|msg| print_message(&msg))) {
            Ok(p) => p,
            Err(e) => {
                error!("Cannot start pipeline: {}", e);
                std::process::exit(1);
            }
        };

    // Persist the config back so first runs get a complete file on disk.
    if let Err(e) = app_config.save(&config_path) {
        warn!("Could not write config {}: {}", config_path.display(), e);
    }

    // Status watcher: report connection changes the way the overlay does.
    let status_stop = StopSignal::new();
    if let Some(status) = pipeline.status_handle() {
        let stop = status_stop.clone();
        let mut last = status.get();
        std::thread::spawn(move || {
            while !stop.wait_timeout(STATUS_POLL_INTERVAL) {
                let current = status.get();
                if current != last {
                    info!("WoW connection: {}", current.as_str());
                    last = current;
                }
            }
        });
    }

    println!("Commands: status | usage | quit");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        match line.trim() {
            "q" | "quit" | "exit" => break,
            "usage" => print_usage(&app_config.deepl_api_key),
            "" | "status" => {
                println!("WoW connection: {}", pipeline.wow_status().as_str());
            }
            other => println!("Unknown command: {}", other),
        }
    }

    info!("Shutting down...");
    status_stop.stop();
    pipeline.stop();
}
