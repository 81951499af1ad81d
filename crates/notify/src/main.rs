//! nagios-notify - send Nagios notifications to a HipChat room.
//!
//! Meant to be wired up as a Nagios notification command, e.g.
//!
//! ```text
//! nagios-notify --token=$TOKEN --room=ops --type=service \
//!   --inputs="$SERVICEDESC$|$HOSTALIAS$|$LONGDATETIME$|$NOTIFICATIONTYPE$|$HOSTADDRESS$|$SERVICESTATE$|$SERVICEOUTPUT$"
//! ```

// CLI binaries legitimately need println! for user output
#![allow(clippy::disallowed_macros)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nagios_notify::{
    DeliveryConfig, HipChatChannel, NotificationRequest, Notifier, Renderer, SystemHost,
    TemplateEngine,
};

#[derive(Parser)]
#[command(name = "nagios-notify")]
#[command(about = "Send Nagios host and service notifications to HipChat")]
#[command(version)]
struct Cli {
    /// HipChat API auth token
    #[arg(short, long, env = "HIPCHAT_TOKEN", hide_env_values = true)]
    token: String,

    /// Room ID or name to post to
    #[arg(short, long, env = "HIPCHAT_ROOM")]
    room: String,

    /// Sender name shown in the room
    #[arg(short, long, default_value = "Nagios")]
    user: String,

    /// Notification type: host, short-host, service, short-service
    #[arg(short = 'y', long = "type", default_value = "host")]
    kind: String,

    /// Pipe-delimited Nagios macros for the notification type
    #[arg(short, long)]
    inputs: String,

    /// Trigger a room notification (sound, popup)
    #[arg(short, long)]
    notify: bool,

    /// Room message endpoint, overrides HIPCHAT_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// Connection attempts before giving up, overrides NOTIFY_MAX_RETRIES
    #[arg(long)]
    max_retries: Option<u32>,

    /// Seconds to wait after a failed attempt, overrides NOTIFY_RETRY_DELAY_SECS
    #[arg(long)]
    retry_delay: Option<u64>,

    /// Directory with <type>.hbs files overriding the built-in templates
    #[arg(long, env = "NOTIFY_TEMPLATES_DIR")]
    templates_dir: Option<PathBuf>,

    /// Extra API parameter (KEY=VALUE), may be repeated; overrides defaults
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Print the rendered message instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Environment settings, overridden by any flags given on the command line.
fn delivery_config(
    api_url: Option<String>,
    max_retries: Option<u32>,
    retry_delay: Option<u64>,
) -> DeliveryConfig {
    let mut config = DeliveryConfig::from_env();
    if let Some(url) = api_url {
        config = config.with_endpoint(url);
    }
    if let Some(retries) = max_retries {
        config = config.with_max_retries(retries);
    }
    if let Some(secs) = retry_delay {
        config = config.with_retry_delay(Duration::from_secs(secs));
    }
    config
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("nagios_notify=debug,info")
        } else {
            EnvFilter::new("nagios_notify=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut request = NotificationRequest::new(&cli.kind, cli.inputs, cli.token, cli.user, cli.room)?
        .with_notify(cli.notify);
    for (key, value) in cli.params {
        request = request.with_param(key, value);
    }

    let templates = match &cli.templates_dir {
        Some(dir) => TemplateEngine::from_dir(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
        None => TemplateEngine::new()?,
    };
    let renderer = Renderer::with_parts(templates, Box::new(SystemHost));

    let config = delivery_config(cli.api_url, cli.max_retries, cli.retry_delay);
    let notifier = Notifier::with_parts(renderer, HipChatChannel::new(config));

    if cli.dry_run {
        let message = notifier.render(&request)?;
        println!("color: {}", message.color);
        println!("{}", message.body);
        return Ok(());
    }

    notifier.notify(&request)?;
    Ok(())
}
