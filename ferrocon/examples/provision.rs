//! Provision an appliance over its serial console.
//!
//! Loads a TOML provisioning file, picks a serial port, logs in, runs the
//! configured commands, waits for asynchronous completions, then saves the
//! configuration and logs out.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example provision -- --config provision.toml
//! cargo run --example provision -- --config provision.toml --port /dev/ttyUSB0
//! ```
//!
//! Without `--port` (and no `port` in the `[serial]` table) the available
//! ports are listed; a single port is used directly, otherwise you are asked
//! to pick one.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use ferrocon::transport::serial::available_ports;
use ferrocon::{ProvisionConfig, ScriptRunner, SerialTransport, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = ProvisionConfig::from_path(&args.config)?;

    if let Some(port) = args.port {
        config.serial.port = port;
    }
    if config.serial.port.is_empty() {
        config.serial.port = select_port()?;
    }
    println!("Using serial port: {}", config.serial.port);

    let commands = config.commands()?;
    let transport = SerialTransport::open(&config.serial)?;
    let mut session =
        Session::open(transport, &config.credentials, config.session_config()?).await?;
    println!("Logged in at {} level", session.access_level());

    let report = ScriptRunner::new(commands).run(&mut session).await?;

    for response in &report.executed {
        println!("Command: {}\nResponse: {}\n", response.command, response.raw_result);
    }
    if let Some(failure) = &report.failure {
        eprintln!("Error executing command '{}': {}", failure.command(), failure);
    }
    for marker in &report.completed {
        println!("Completed: {}", marker);
    }

    println!("Done!");
    if report.is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

/// Pick a serial port, asking the operator when there is more than one.
fn select_port() -> Result<String, Box<dyn std::error::Error>> {
    let ports = available_ports()?;
    match ports.as_slice() {
        [] => Err("No serial ports found".into()),
        [only] => Ok(only.clone()),
        _ => {
            println!("Multiple serial ports found:");
            for port in &ports {
                println!("  {}", port);
            }
            print!("Enter the desired serial port: ");
            io::stdout().flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line.trim().to_string())
        }
    }
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    config: PathBuf,
    port: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut config = PathBuf::from("provision.toml");
        let mut port = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    i += 1;
                    if let Some(value) = args.get(i) {
                        config = PathBuf::from(value);
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    port = args.get(i).cloned();
                }
                "--help" => {
                    println!("Usage: provision [--config FILE] [--port PORT]");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        Self { config, port }
    }
}
