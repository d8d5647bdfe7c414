//! Dry run against a scripted console.
//!
//! Replays canned appliance output to show a full provisioning run (login,
//! RSA key generation with its asynchronous completion, save and logout)
//! without any hardware attached.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example dry_run
//! ```

use std::time::Duration;

use ferrocon::{Command, ScriptRunner, ScriptedTransport, SessionBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let transport = ScriptedTransport::new([
        "Press Enter key to login",
        "Please Enter Login Name:",
        "Please Enter Password:",
        "User login successful\r\nswitch>",
        "switch#",
        "Creating RSA key pair, please wait\r\nswitch#",
        "",
        "RSA Key pair is successfully created",
        "Configuration saved to NVRAM\r\nswitch#",
        "switch>",
        "Press Enter key to login",
    ]);

    let mut session = SessionBuilder::new()
        .username("admin")
        .password("admin")
        .settle_delay(Duration::from_millis(50))
        .drain_interval(Duration::from_millis(250))
        .drain_timeout(Duration::from_secs(5))
        .open(transport)
        .await?;

    let commands = vec![Command::simple("enable"), Command::rsa_key_pair()];
    let report = ScriptRunner::new(commands).run(&mut session).await?;

    println!("Executed {} command(s)", report.executed.len());
    println!("Completed: {:?}", report.completed);
    println!("Lines sent: {:?}", session.transport().written());

    Ok(())
}
