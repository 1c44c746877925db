use clap::{Arg, ArgAction, Command};
use log::LevelFilter;
use phishscan::analyzer::{AnalysisResponse, PhishingAnalyzer, UrlReport};
use phishscan::model::ModelInferenceEngine;
use phishscan::Config;
use std::io::{self, BufRead};
use std::path::Path;
use std::process;
use std::sync::Arc;

const DEFAULT_CONFIG_PATH: &str = "phishscan.yaml";

fn main() {
    let matches = Command::new("phishscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Classify URLs as phishing or legitimate")
        .long_about("phishscan computes lexical, statistical and heuristic features for a URL\n\
                    and scores them with a trained model, falling back to weighted rules\n\
                    when no model is available.")
        .arg(
            Arg::new("urls")
                .value_name("URL")
                .help("URLs to analyze (read from stdin, one per line, when omitted)")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("FILE")
                .help("Model artifact path (overrides configuration)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("features")
                .long("features")
                .value_name("FILE")
                .help("Feature column list path (overrides configuration)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("show-features")
                .long("show-features")
                .help("Print the extracted feature map instead of a verdict")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("model-info")
                .long("model-info")
                .help("Print model status and feature columns")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit JSON, one document per URL")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);

    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };
    config.apply_env_overrides();
    if let Some(model) = matches.get_one::<String>("model") {
        config.model.model_path = model.clone();
    }
    if let Some(features) = matches.get_one::<String>("features") {
        config.model.features_path = features.clone();
    }

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level()
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let engine = Arc::new(ModelInferenceEngine::new());
    if config.model.autoload {
        if !engine.load(&config.model.model_path, &config.model.features_path) {
            log::warn!("No model loaded, using rule-based analysis");
        }
    } else {
        log::info!("Model autoload disabled, using rule-based analysis");
    }

    let analyzer = PhishingAnalyzer::new(engine);
    let json = matches.get_flag("json");

    if matches.get_flag("model-info") {
        print_model_info(&analyzer, json);
        return;
    }

    let urls: Vec<String> = match matches.get_many::<String>("urls") {
        Some(urls) => urls.cloned().collect(),
        None => read_urls_from_stdin(),
    };

    if urls.is_empty() {
        eprintln!("No URLs given");
        process::exit(1);
    }

    let show_features = matches.get_flag("show-features");
    for url in &urls {
        if show_features {
            print_features(&analyzer, url, json);
        } else {
            print_analysis(&analyzer.classify(url), json);
        }
    }
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if path == DEFAULT_CONFIG_PATH && !Path::new(path).exists() {
        return Ok(Config::default());
    }
    Config::from_file(path)
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => println!("✅ Default configuration written to: {path}"),
        Err(e) => {
            eprintln!("❌ Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn read_urls_from_stdin() -> Vec<String> {
    io::stdin()
        .lock()
        .lines()
        .map_while(Result::ok)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("❌ Failed to serialize output: {e}"),
    }
}

fn print_model_info(analyzer: &PhishingAnalyzer, json: bool) {
    let status = analyzer.engine().status();
    if json {
        print_json(&status);
        return;
    }

    if status.model_loaded {
        println!(
            "✅ Model loaded: {} ({})",
            status.model_path.as_deref().unwrap_or("unknown"),
            status.model_kind.as_deref().unwrap_or("unknown")
        );
        println!("📊 Features ({}):", status.total_features);
        for column in status.feature_columns.unwrap_or_default() {
            println!("  • {column}");
        }
    } else {
        println!("❌ No model loaded, rule-based analysis in use");
    }
    if let Some(error) = status.last_load_error {
        println!("⚠️  Last load error: {error}");
    }
}

fn print_features(analyzer: &PhishingAnalyzer, url: &str, json: bool) {
    let features = analyzer.extract_features(url);
    let non_zero = features.non_zero();

    if json {
        print_json(&serde_json::json!({
            "url": url,
            "features": features,
            "total_features": features.len(),
            "non_zero_features": non_zero,
        }));
        return;
    }

    println!("🔍 {url}");
    for (name, value) in features.iter() {
        println!("  {name:<26} {value}");
    }
    println!("  ({} features, {} non-zero)", features.len(), non_zero.len());
}

fn print_analysis(response: &AnalysisResponse, json: bool) {
    if json {
        print_json(response);
        return;
    }

    match response {
        AnalysisResponse::Report(report) => print_report(report),
        AnalysisResponse::Failed(failure) => {
            println!("❌ {}: {}", failure.url, failure.error);
        }
    }
}

fn print_report(report: &UrlReport) {
    let verdict = if report.result.is_phishing {
        "🚨 PHISHING"
    } else {
        "✅ LEGITIMATE"
    };
    println!("{verdict}  {}", report.url);
    println!(
        "  Confidence: {:.1}% ({})",
        report.result.confidence * 100.0,
        report.result.method
    );
    if let Some(probabilities) = &report.result.probabilities {
        println!(
            "  Probabilities: legitimate {:.3}, phishing {:.3}",
            probabilities.legitimate, probabilities.phishing
        );
    }
    println!("  {}", report.explanation);
    if let Some(warning) = &report.warning {
        println!("  ⚠️  {warning}");
    }
}
