//! Eventra command-line client
//!
//! Signs in against the Auth Service, keeps the session in a local directory
//! and checks event forms before they are submitted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use eventra_client::auth::{AuthFlow, AuthOutcome, HttpAuthService, SystemClock};
use eventra_client::events::{
    validate_event_submission, EventCategory, EventForm, ImageAttachment, NormalizedEvent,
};
use eventra_client::identity::{AuthForm, AuthMode, Role, User};
use eventra_client::session::{FileKeyValueStore, SessionStore};
use eventra_client::ClientConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "eventra")]
#[command(about = "Eventra client: sign in, manage the session and check event forms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email, password and Organization ID
    Login {
        #[arg(long, default_value = "student")]
        role: Role,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        organization_id: String,
    },

    /// Create an account (organizers receive a new Organization ID)
    Signup(SignupArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Validate an event form and print the normalized event as JSON
    CheckEvent(EventArgs),
}

#[derive(Args)]
struct SignupArgs {
    #[arg(long, default_value = "student")]
    role: Role,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    full_name: String,
    /// Organization to join (students and faculty)
    #[arg(long, default_value = "")]
    organization_id: String,
    #[arg(long, default_value = "")]
    organization_name: String,
    /// school, college, university or private
    #[arg(long)]
    organization_type: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip_code: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
struct EventArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    #[arg(long)]
    time: String,
    #[arg(long, default_value = "")]
    end_time: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    meeting_link: String,
    #[arg(long)]
    online: bool,
    #[arg(long, default_value = "workshop")]
    category: EventCategory,
    #[arg(long, default_value = "")]
    capacity: String,
    /// Comma-separated
    #[arg(long, default_value = "")]
    tags: String,
    #[arg(long, default_value = "")]
    prerequisites: String,
    /// Poster image file
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventra=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    match cli.command {
        Commands::Login {
            role,
            email,
            password,
            organization_id,
        } => {
            let form = AuthForm {
                email,
                password,
                organization_id,
                ..AuthForm::default()
            };
            cmd_auth(&config, AuthMode::Login, role, form).await
        }
        Commands::Signup(args) => {
            let role = args.role;
            cmd_auth(&config, AuthMode::Signup, role, args.into_form()).await
        }
        Commands::Logout => cmd_logout(&config),
        Commands::Whoami => cmd_whoami(&config),
        Commands::CheckEvent(args) => cmd_check_event(args),
    }
}

impl SignupArgs {
    fn into_form(self) -> AuthForm {
        AuthForm {
            email: self.email,
            password: self.password,
            full_name: self.full_name,
            organization_id: self.organization_id,
            organization_name: self.organization_name,
            organization_type: self.organization_type,
            phone: self.phone,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            description: self.description,
        }
    }
}

fn open_session(config: &ClientConfig) -> SessionStore {
    let store = FileKeyValueStore::new(&config.session_dir);
    SessionStore::with_persistence(Arc::new(store))
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_auth(config: &ClientConfig, mode: AuthMode, role: Role, form: AuthForm) -> Result<()> {
    let service = HttpAuthService::from_config(config)?;
    let mut session = open_session(config);
    let mut flow = AuthFlow::new(Arc::new(SystemClock), config.ack_window);
    tracing::debug!(api_url = %service.base_url(), %mode, %role, "Submitting auth form");

    let outcome = flow
        .submit(&service, mode, role, &form, &mut session)
        .await
        .with_context(|| format!("{} failed", mode_label(mode)))?;

    if let AuthOutcome::AwaitingAck { organizer_id } = outcome {
        println!("{}", "Your Organization ID:".bright_yellow().bold());
        println!();
        println!("    {}", organizer_id.as_str().bright_green().bold());
        println!();
        println!(
            "{}",
            "Share it with your faculty and students. It will not be shown again.".yellow()
        );

        if let Some(remaining) = flow.ack_remaining().and_then(|d| d.to_std().ok()) {
            tokio::time::sleep(remaining).await;
        }
        flow.poll(&mut session)
            .context("Organization ID acknowledgment did not complete")?;
    }

    if let Some(message) = flow.message() {
        println!("{}", message.bright_green());
    }
    if let Some(user) = session.current_user() {
        print_user(user);
    }
    Ok(())
}

fn cmd_logout(config: &ClientConfig) -> Result<()> {
    let mut session = open_session(config);
    session.logout().context("Failed to clear stored session")?;
    println!("{}", "Signed out".bright_blue());
    Ok(())
}

fn cmd_whoami(config: &ClientConfig) -> Result<()> {
    let mut session = open_session(config);
    match session.hydrate().context("Failed to read stored session")? {
        Some(user) => print_user(user),
        None => println!("{}", "Not signed in".dimmed()),
    }
    Ok(())
}

fn cmd_check_event(args: EventArgs) -> Result<()> {
    let image = args.image.as_deref().map(read_image).transpose()?;
    let form = EventForm {
        title: args.title,
        description: args.description,
        date: args.date,
        time: args.time,
        end_time: args.end_time,
        location: args.location,
        meeting_link: args.meeting_link,
        is_online: args.online,
        category: args.category,
        capacity: args.capacity,
        tags: args.tags,
        prerequisites: args.prerequisites,
        image,
    };

    let event: NormalizedEvent = validate_event_submission(&form, &SystemClock)
        .context("Event form is not valid")?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn mode_label(mode: AuthMode) -> &'static str {
    match mode {
        AuthMode::Login => "Login",
        AuthMode::Signup => "Signup",
    }
}

fn print_user(user: &User) {
    println!(
        "{} {} <{}>",
        format!("[{}]", user.role().label()).bright_cyan(),
        user.display_name().bold(),
        user.email()
    );
    println!("  Organization ID: {}", user.organization_id());
}

fn read_image(path: &Path) -> Result<ImageAttachment> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let content_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    };

    Ok(ImageAttachment {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        content_type: content_type.to_string(),
        size_bytes: metadata.len(),
        data_url: None,
    })
}
