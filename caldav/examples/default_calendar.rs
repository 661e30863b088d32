// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Default scheduling calendar inspection tool.
//!
//! A standalone CLI example that resolves the default calendar of a principal
//! against a real CalDAV server, and shows why each calendar was or was not
//! picked.

use std::error::Error;

use clap::{Parser, Subcommand};
use colored::Colorize as _;
use schedcal_caldav::{
    AuthMethod, CalDavClient, CalDavConfig, CollectionStore as _, DefaultCalendarResolver,
    HomeSetLayout, Href, Principal, PrincipalDirectory, Prop, PropFind, PropFindTarget, PropName,
    ScheduleProperties, TemplateDirectory, evaluate,
};
use tracing_subscriber::EnvFilter;

/// Default scheduling calendar inspection tool.
#[derive(Parser)]
#[command(name = "default_calendar")]
#[command(about = "Resolve the default scheduling calendar of a principal", long_about = None)]
#[command(version)]
struct Cli {
    /// CalDAV server URL
    #[arg(long)]
    server: Option<String>,
    /// Username for basic auth
    #[arg(long)]
    username: Option<String>,
    /// Password for basic auth
    #[arg(long)]
    password: Option<String>,
    /// Bearer token for OAuth
    #[arg(long)]
    token: Option<String>,
    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
    /// Derive calendar homes from principal paths under this calendar root
    /// instead of asking the server for calendar-home-set
    #[arg(long)]
    calendar_root: Option<String>,
    /// Principal collection used with --calendar-root
    #[arg(long, default_value = "principals/users")]
    principal_prefix: String,
    /// Principal URL, e.g. principals/users/alice
    principal: String,
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the default calendar href
    Resolve,
    /// List the calendar home and the verdict for each child
    Inspect,
    /// Print the multistatus body a server would answer with
    Propfind {
        /// Requested property in Clark notation; repeatable, defaults to all
        /// supported properties
        #[arg(long = "prop")]
        props: Vec<String>,
    },
}

impl Cli {
    fn build_config(&self) -> Result<CalDavConfig, Box<dyn Error>> {
        // Read from environment variables first
        let server = self
            .server
            .clone()
            .or_else(|| std::env::var("SCHEDCAL_CALDAV_SERVER").ok())
            .ok_or_else(|| {
                "SCHEDCAL_CALDAV_SERVER must be provided via --server or SCHEDCAL_CALDAV_SERVER env var"
                    .to_string()
            })?;

        let username = self
            .username
            .clone()
            .or_else(|| std::env::var("SCHEDCAL_CALDAV_USERNAME").ok());

        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("SCHEDCAL_CALDAV_PASSWORD").ok());

        let token = self
            .token
            .clone()
            .or_else(|| std::env::var("SCHEDCAL_CALDAV_TOKEN").ok());

        let auth = if let Some(token) = token {
            AuthMethod::Bearer { token }
        } else if let (Some(username), Some(password)) = (username, password) {
            AuthMethod::Basic { username, password }
        } else {
            AuthMethod::None
        };

        Ok(CalDavConfig {
            base_url: server,
            auth,
            timeout_secs: self.timeout,
            ..Default::default()
        })
    }

    fn template(&self) -> Option<TemplateDirectory> {
        self.calendar_root.as_ref().map(|root| {
            TemplateDirectory::new(HomeSetLayout {
                principal_prefix: self.principal_prefix.clone(),
                calendar_root: root.clone(),
            })
        })
    }
}

async fn cmd_resolve(
    directory: &dyn PrincipalDirectory,
    client: &CalDavClient,
    principal: &Principal,
) -> Result<(), Box<dyn Error>> {
    let resolver = DefaultCalendarResolver::new(directory, client);
    match resolver.resolve(principal).await? {
        Some(href) => println!("{}", href.as_str().green()),
        None => println!("{}", "No default calendar".yellow()),
    }
    Ok(())
}

async fn cmd_inspect(
    directory: &dyn PrincipalDirectory,
    client: &CalDavClient,
    principal: &Principal,
) -> Result<(), Box<dyn Error>> {
    let Some(home) = directory.calendar_home_for_principal(principal).await? else {
        println!("{}", "Principal has no calendar home".yellow());
        return Ok(());
    };
    println!("Calendar home: {}", home.as_str());

    let children = client
        .list_children(&home, &Prop::DEFAULT_CALENDAR_PROPS)
        .await?;
    if children.is_empty() {
        println!("No children found");
        return Ok(());
    }

    println!("{:-<100}", "");
    println!("{:<60} {}", "Href", "Verdict");
    println!("{:-<100}", "");

    let mut picked = false;
    for child in &children {
        let verdict = match evaluate(child) {
            Ok(()) if !picked => {
                picked = true;
                "default".green()
            }
            Ok(()) => "qualifies".normal(),
            Err(reason) => reason.to_string().as_str().dimmed(),
        };
        println!("{:<60} {verdict}", child.href.as_str());
    }

    Ok(())
}

fn parse_props(props: &[String]) -> Result<Vec<PropName>, Box<dyn Error>> {
    if props.is_empty() {
        return Ok(vec![
            PropName::ScheduleDefaultCalendarUrl,
            PropName::CalendarUserAddressSet,
        ]);
    }

    props
        .iter()
        .map(|clark| {
            PropName::from_clark(clark)
                .ok_or_else(|| format!("Unsupported property: {clark}").into())
        })
        .collect()
}

async fn cmd_propfind(
    directory: &dyn PrincipalDirectory,
    client: &CalDavClient,
    principal: &Principal,
    props: &[String],
) -> Result<(), Box<dyn Error>> {
    let handler = ScheduleProperties::new(directory, client);
    let mut prop_find = PropFind::new(
        Href::new(principal.as_str().to_string()),
        parse_props(props)?,
    );
    handler
        .prop_find(&mut prop_find, &PropFindTarget::Principal(principal.clone()))
        .await?;

    println!("{}", prop_find.to_multistatus_xml()?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env files (if they exist)
    // Priority: .env.local (highest) -> .env -> existing environment variables (lowest)
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.build_config()?;
    let client = CalDavClient::new(config)?;
    let template = cli.template();
    let directory: &dyn PrincipalDirectory = match &template {
        Some(template) => template,
        None => &client,
    };
    let principal = Principal::new(cli.principal.clone());

    let runtime = tokio::runtime::Runtime::new()?;

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Resolve => cmd_resolve(directory, &client, &principal).await,
            Commands::Inspect => cmd_inspect(directory, &client, &principal).await,
            Commands::Propfind { props } => {
                cmd_propfind(directory, &client, &principal, &props).await
            }
        }
    });

    if let Err(e) = &result {
        eprintln!("{} {e}", "Error:".red());
    }
    result
}
