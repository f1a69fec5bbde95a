//! dnacrun CLI - run read-only IOS commands on managed devices through a
//! DNA Center controller.
//!
//! The default mode is an interactive session: pick a device from the
//! inventory table, then issue allow-listed commands until `exit`. With
//! `--device-ip` and `--command` a single command runs headlessly instead.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dnacrun_client::{
    ApiClient, CommandRunner, ControllerApi, ControllerConfig, PollPolicy, RunError,
};
use dnacrun_core::{CommandRequest, CommandVocabulary, Device, ResolveError};

/// Run read-only IOS commands on managed devices
#[derive(Parser)]
#[command(name = "dnacrun")]
#[command(about = "CLI command runner for a DNA Center controller", long_about = None)]
struct Cli {
    /// Controller DNS name or IP
    #[arg(long, env = "DNAC_HOST")]
    host: String,

    /// Controller username
    #[arg(long, env = "DNAC_USERNAME")]
    username: String,

    /// Controller password
    #[arg(long, env = "DNAC_PASSWORD", hide_env_values = true)]
    password: String,

    /// Controller API version segment
    #[arg(long, default_value = "v1")]
    api_version: String,

    /// Accept self-signed controller certificates
    #[arg(long)]
    insecure: bool,

    /// Poll budget in seconds (tasks are polled once per second)
    #[arg(long, default_value_t = 20)]
    timeout_secs: u32,

    /// Management IP of the target device (headless mode, with --command)
    #[arg(long, requires = "command")]
    device_ip: Option<String>,

    /// Command to run headlessly (with --device-ip)
    #[arg(long, requires = "device_ip")]
    command: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs default to warnings so they don't interleave with prompts;
    // RUST_LOG overrides for debugging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = ControllerConfig::new(&cli.host, &cli.username, &cli.password)
        .with_version(&cli.api_version)
        .with_accept_invalid_certs(cli.insecure);

    // Auth and inventory failures are fatal; nothing useful can happen
    // without a token, a vocabulary, and at least one device.
    let client = ApiClient::connect(config).await?;
    let vocabulary = client.legit_reads().await?;
    let devices = client.list_devices().await?;

    let runner = CommandRunner::new(client).with_poll_policy(PollPolicy {
        interval: Duration::from_secs(1),
        max_attempts: cli.timeout_secs,
    });

    if let (Some(ip), Some(command)) = (&cli.device_ip, &cli.command) {
        return run_headless(&runner, &devices, &vocabulary, ip, command).await;
    }

    print_device_table(&devices);
    let device = match select_device(&devices)? {
        Some(device) => device,
        None => return Ok(()),
    };

    loop {
        let request = match read_command(device, &vocabulary)? {
            Some(request) => request,
            None => return Ok(()),
        };
        run_and_print(&runner, &request).await;
    }
}

/// Run one command non-interactively; any run error is fatal here.
async fn run_headless(
    runner: &CommandRunner<ApiClient>,
    devices: &[Device],
    vocabulary: &CommandVocabulary,
    ip: &str,
    command: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let device = devices
        .iter()
        .find(|d| d.ip == ip)
        .ok_or_else(|| format!("no managed device with ip {ip}"))?;

    let request = CommandRequest::new(device.id.clone(), command)?;
    if !vocabulary.permits(&request) {
        return Err(format!(
            "'{}' is not an allow-listed read command; valid commands are: {vocabulary}",
            request.keyword()
        )
        .into());
    }

    let outcome = runner.run(&request).await?;
    println!("{}", outcome.text());
    Ok(())
}

fn print_device_table(devices: &[Device]) {
    println!("{:<8}  {:<24}  {:<18}  {}", "NUMBER", "HOSTNAME", "IP", "TYPE");
    println!("{}", "-".repeat(80));
    for (idx, device) in devices.iter().enumerate() {
        println!(
            "{:<8}  {:<24}  {:<18}  {}",
            idx + 1,
            device.hostname,
            device.ip,
            device.kind
        );
    }
    println!();
}

/// Prompt until the user picks a valid device number. `None` means exit.
fn select_device(devices: &[Device]) -> io::Result<Option<&Device>> {
    loop {
        let input =
            match prompt("Select a number for the device from the list to run IOS command: ")? {
                Some(input) => input,
                None => return Ok(None),
            };
        if input.eq_ignore_ascii_case("exit") {
            return Ok(None);
        }
        match input.parse::<usize>() {
            Ok(n) if (1..=devices.len()).contains(&n) => return Ok(Some(&devices[n - 1])),
            Ok(_) => println!("Oops! number is out of range, please try again or enter 'exit'"),
            Err(_) => println!("Oops! input is not a digit, please try again or enter 'exit'"),
        }
    }
}

/// Prompt until the user enters a non-empty, allow-listed command.
/// `None` means exit.
fn read_command(
    device: &Device,
    vocabulary: &CommandVocabulary,
) -> io::Result<Option<CommandRequest>> {
    loop {
        let label = format!(
            "\n=> Enter IOS command you like to run on this device, ip={} or \"exit\" to exit: ",
            device.ip
        );
        let input = match prompt(&label)? {
            Some(input) => input,
            None => return Ok(None),
        };
        if input.eq_ignore_ascii_case("exit") {
            return Ok(None);
        }

        let request = match CommandRequest::new(device.id.clone(), &input) {
            Ok(request) => request,
            Err(_) => {
                println!("Oops! command cannot be NULL please try again or enter 'exit'");
                continue;
            }
        };

        if !vocabulary.permits(&request) {
            println!(
                "Invalid command, valid commands are the following (some of them maybe not \
                 available in certain devices): {vocabulary}\n"
            );
            continue;
        }

        return Ok(Some(request));
    }
}

/// Run one command and report its outcome. Every run error is recovered
/// here; the session moves on to the next command.
async fn run_and_print(runner: &CommandRunner<ApiClient>, request: &CommandRequest) {
    println!("\nExecuting \"{}\", please wait ...\n", request.command());
    match runner.run(request).await {
        Ok(outcome) => println!("{}", outcome.text()),
        Err(RunError::TimedOut { attempts, .. }) => {
            eprintln!("Taking too long ({attempts} polls), giving up on this command");
        }
        Err(RunError::Output(ResolveError::OutputNotFound {
            command,
            raw_artifact,
        })) => {
            eprintln!("Could not locate output for '{command}' in the result artifact:");
            eprintln!("{raw_artifact}");
        }
        Err(err) => eprintln!("Command failed: {err}"),
    }
}

/// Read one trimmed line from stdin. `None` on end of input.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
