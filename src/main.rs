//! ice-config - print, check and try out ICE server configurations
//!
//! Usage:
//!   ice-config <default|relay|mobile>   Print a preset as JSON
//!   ice-config env                      Print the TURN_URLS/FORCE_TURN config
//!   ice-config check <file.json>        Validate a configuration file
//!   ice-config connect [preset|file]    Create a peer connection from it
//!
//! TURN credentials come from METERED_TURN_USERNAME / METERED_TURN_CREDENTIAL
//! (or TURN_USERNAME / TURN_PASSWORD).

use std::process::ExitCode;

use metered_ice::{
    build_api, metered, new_peer_connection, ConnectionConfig, IceUrl, Preset, Result,
    TurnCredentials,
};

fn usage() {
    eprintln!("Usage: ice-config <default|relay|mobile|env>");
    eprintln!("       ice-config check <file.json>");
    eprintln!("       ice-config connect [preset|env|file.json]");
}

/// A preset name, `env`, otherwise a path to a JSON file
fn load(source: &str) -> Result<ConnectionConfig> {
    if source == "env" {
        return metered::from_env();
    }
    match Preset::from_str(source) {
        Some(preset) => {
            let creds = TurnCredentials::from_env()?;
            let config = preset.build(&creds);
            config.validate()?;
            Ok(config)
        }
        None => ConnectionConfig::from_file(source),
    }
}

fn print_summary(config: &ConnectionConfig) -> Result<()> {
    println!("ICE transport policy: {:?}", config.policy());
    for (i, server) in config.ice_servers.iter().enumerate() {
        for url in &server.urls {
            let parsed = IceUrl::parse(url)?;
            let transport = parsed.transport.map(|t| t.as_str()).unwrap_or("default");
            println!(
                "  [{}] {:<6} {}:{} transport={}{}",
                i,
                parsed.scheme.as_str(),
                parsed.host,
                parsed.port,
                transport,
                if server.username.is_some() { " (authenticated)" } else { "" }
            );
        }
    }
    Ok(())
}

async fn connect(config: &ConnectionConfig) -> Result<()> {
    let api = build_api()?;
    let pc = new_peer_connection(&api, config).await?;
    println!("Peer connection created ({} ICE servers)", config.ice_servers.len());
    pc.close()
        .await
        .map_err(|e| metered_ice::ConfigError::PeerConnection(e.to_string()))?;
    Ok(())
}

fn run(args: &[String]) -> Result<bool> {
    match args {
        [cmd] if cmd == "env" || Preset::from_str(cmd).is_some() => {
            let config = load(cmd)?;
            println!("{}", config.to_json_pretty()?);
        }
        [cmd, path] if cmd == "check" => {
            let config = ConnectionConfig::from_file(path)?;
            println!("{}: OK ({} ICE servers)", path, config.ice_servers.len());
            print_summary(&config)?;
        }
        [cmd, rest @ ..] if cmd == "connect" && rest.len() <= 1 => {
            let source = rest.first().map(String::as_str).unwrap_or("default");
            let config = load(source)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(connect(&config))?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            usage();
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
