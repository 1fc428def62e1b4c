//! CLI subcommands: the feature views of the client.
//!
//! Handlers stay thin: build the domain pieces, call one operation, print.
//! All user-visible error rendering happens here and nowhere below.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Subcommand, ValueEnum};
use log::warn;

use agents::types::content::MediaType;
use agents::types::meeting::{Meeting, MeetingWindow, TranscriptionRequest};
use domain::connection::{complete_oauth_return, PlatformConnection};
use domain::content;
use domain::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use domain::gateway::{build_api_client, AuthApiClient, PredisGateway, TeamsGateway, ZoomGateway};
use domain::session::{SessionContext, SessionState};
use domain::user::RegisterParams;
use platform_auth::callback::CallbackOutcome;
use platform_auth::http::ApiClient;
use platform_auth::refresh::Refresher;
use platform_auth::store::{FileTokenStore, TokenStore};
use platform_auth::ProviderKind;
use service::config::Config;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlatformArg {
    Zoom,
    Teams,
}

impl From<PlatformArg> for ProviderKind {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Zoom => ProviderKind::Zoom,
            PlatformArg::Teams => ProviderKind::Teams,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Upcoming,
    Past,
}

impl From<WindowArg> for MeetingWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Upcoming => MeetingWindow::Upcoming,
            WindowArg::Past => MeetingWindow::Past,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MediaTypeArg {
    SingleImage,
    Carousel,
    Video,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::SingleImage => MediaType::SingleImage,
            MediaTypeArg::Carousel => MediaType::Carousel,
            MediaTypeArg::Video => MediaType::Video,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the current session and platform connections
    Status,
    /// Sign out and clear all stored credentials
    Logout,
    /// Complete a platform consent flow from its redirect URL
    Connect {
        /// The full URL (or query string) the browser was redirected to
        redirect_url: String,
    },
    /// List meetings for a connected platform
    Meetings {
        #[arg(long, value_enum, default_value_t = PlatformArg::Zoom)]
        platform: PlatformArg,
        #[arg(long, value_enum, default_value_t = WindowArg::Upcoming)]
        window: WindowArg,
    },
    /// List the recording files of one meeting
    Recordings {
        #[arg(long, value_enum, default_value_t = PlatformArg::Zoom)]
        platform: PlatformArg,
        meeting_id: String,
    },
    /// Transcribe and summarize a recording
    Transcribe {
        #[arg(long, value_enum, default_value_t = PlatformArg::Zoom)]
        platform: PlatformArg,
        #[arg(long)]
        download_url: String,
        /// Free-form instruction steering the summary
        #[arg(long, default_value = "")]
        instruction: String,
        /// Meeting the recording belongs to (required for Teams)
        #[arg(long)]
        meeting_id: Option<String>,
    },
    /// Generate a social post
    Generate {
        #[arg(long)]
        topic: String,
        #[arg(long, value_enum, default_value_t = MediaTypeArg::SingleImage)]
        media_type: MediaTypeArg,
        /// Reference image to upload and build the post around
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Show the content generation credit balance
    Credits,
}

struct App {
    config: Config,
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    refresher: Arc<Refresher>,
}

impl App {
    fn build(config: Config) -> Result<Self, Error> {
        if config.is_production() && config.token_encryption_key().is_none() {
            warn!("No token encryption key configured; credentials are stored in the clear");
        }

        let store = FileTokenStore::open(&config.credentials_file, config.token_encryption_key())?;
        let client = build_api_client(&config)?;

        Ok(Self {
            config,
            client,
            store: Arc::new(store),
            refresher: Arc::new(Refresher::new()),
        })
    }

    fn session(&self) -> SessionContext {
        let auth_api = AuthApiClient::new(self.client.clone(), self.config.backend_url());
        SessionContext::new(Arc::clone(&self.store), auth_api)
    }

    fn connection(&self, platform: PlatformArg) -> PlatformConnection {
        let base_url = self.config.backend_url();
        let gateway: Arc<dyn agents::MeetingPlatform> = match platform {
            PlatformArg::Zoom => Arc::new(ZoomGateway::new(self.client.clone(), base_url)),
            PlatformArg::Teams => Arc::new(TeamsGateway::new(self.client.clone(), base_url)),
        };
        PlatformConnection::new(gateway, Arc::clone(&self.store), Arc::clone(&self.refresher))
    }

    fn predis(&self) -> PredisGateway {
        PredisGateway::new(self.client.clone(), self.config.backend_url())
    }

    /// Bootstrap the session and require a signed-in user.
    async fn authenticated_session(&self) -> Result<SessionContext, Error> {
        let mut session = self.session();
        session.bootstrap().await;
        if !session.is_authenticated() {
            return Err(Error::unauthenticated());
        }
        Ok(session)
    }
}

pub async fn run(config: Config, command: Command) -> Result<(), Error> {
    let app = App::build(config)?;

    match command {
        Command::Login { email, password } => {
            let mut session = app.session();
            let user = session.login(&email, &password).await?;
            println!("Signed in as {} <{}>", user.display_name(), user.email);
        }
        Command::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            let mut session = app.session();
            let user = session
                .register(RegisterParams {
                    first_name,
                    last_name,
                    email,
                    password,
                })
                .await?;
            println!("Account created; signed in as {}", user.email);
        }
        Command::Status => {
            let mut session = app.session();
            match session.bootstrap().await {
                SessionState::Authenticated(user) => {
                    println!("Signed in as {} <{}>", user.display_name(), user.email);
                    println!(
                        "Plan: {}{}",
                        user.plan,
                        if user.is_subscriber { "" } else { " (no active subscription)" }
                    );
                }
                _ => println!("Not signed in"),
            }
            for platform in [PlatformArg::Zoom, PlatformArg::Teams] {
                let connection = app.connection(platform);
                println!(
                    "{}: {}",
                    connection.provider(),
                    if connection.is_connected() {
                        "connected"
                    } else {
                        "not connected"
                    }
                );
            }
        }
        Command::Logout => {
            let mut session = app.session();
            session.logout().await;
            println!("Signed out");
        }
        Command::Connect { redirect_url } => {
            match complete_oauth_return(&redirect_url, app.store.as_ref())? {
                CallbackOutcome::Connected { provider } => {
                    println!("{} connected", provider);
                    println!(
                        "List your meetings with: workai meetings --platform {}",
                        provider
                    );
                }
                CallbackOutcome::Denied { provider, error } => {
                    println!("{} connection failed: {}", provider, error);
                }
            }
        }
        Command::Meetings { platform, window } => {
            let session = app.authenticated_session().await?;
            session.require_subscriber()?;

            let connection = app.connection(platform);
            let window = MeetingWindow::from(window);
            // Past listings include recordings so transcription can start
            // straight from the output.
            let meetings = match window {
                MeetingWindow::Past => connection.list_meetings_with_recordings(window).await?,
                MeetingWindow::Upcoming => connection.list_meetings(window).await?,
            };

            if meetings.is_empty() {
                println!("No meetings found");
            }
            for meeting in &meetings {
                print_meeting(meeting);
            }
        }
        Command::Recordings {
            platform,
            meeting_id,
        } => {
            let session = app.authenticated_session().await?;
            session.require_subscriber()?;

            let files = app.connection(platform).recordings(&meeting_id).await?;
            if files.is_empty() {
                println!("No recordings for meeting {}", meeting_id);
            }
            for file in &files {
                println!(
                    "{} {}",
                    file.file_type.as_deref().unwrap_or("recording"),
                    file.download_url
                );
            }
        }
        Command::Transcribe {
            platform,
            download_url,
            instruction,
            meeting_id,
        } => {
            let session = app.authenticated_session().await?;
            session.require_subscriber()?;

            let outcome = app
                .connection(platform)
                .transcribe(TranscriptionRequest {
                    download_url,
                    summary_instruction: instruction,
                    meeting_id,
                })
                .await?;

            println!("--- Transcription ---");
            println!("{}", outcome.transcription);
            println!("--- Summary ---");
            println!("{}", outcome.summary);
        }
        Command::Generate {
            topic,
            media_type,
            image,
        } => {
            app.authenticated_session().await?;

            let outcome = content::generate_post(
                &app.predis(),
                &topic,
                media_type.into(),
                image.as_deref(),
            )
            .await?;

            println!("{}", outcome.post.content);
            if let Some(url) = &outcome.post.image_url {
                println!("Image: {}", url);
            }
            for suggestion in &outcome.post.suggestions {
                println!("Suggestion: {}", suggestion);
            }
            if let Some(credits) = outcome.credits {
                println!("Credits remaining: {}/{}", credits.remaining, credits.limit);
            }
        }
        Command::Credits => {
            app.authenticated_session().await?;

            let predis = app.predis();
            let (credits, options) = tokio::join!(predis.credits(), predis.options());
            let credits = credits?;
            println!(
                "Credits: {} used, {} remaining of {}",
                credits.used, credits.remaining, credits.limit
            );
            let options = options?;
            if !options.media_types.is_empty() {
                println!("Media types: {}", options.media_types.join(", "));
            }
            if !options.post_types.is_empty() {
                println!("Post types: {}", options.post_types.join(", "));
            }
            if !options.languages.is_empty() {
                println!("Languages: {}", options.languages.join(", "));
            }
        }
    }

    Ok(())
}

fn print_meeting(meeting: &Meeting) {
    println!(
        "{}  {}  {}",
        meeting.id,
        meeting.start_time.as_deref().unwrap_or("-"),
        meeting.topic.as_deref().unwrap_or("(untitled)")
    );
    for file in &meeting.recording_files {
        println!(
            "    recording: {} {}",
            file.file_type.as_deref().unwrap_or("file"),
            file.download_url
        );
    }
}

/// Map a domain error to the message the user sees.
pub fn user_message(err: &Error) -> String {
    match &err.error_kind {
        DomainErrorKind::Internal(InternalErrorKind::Validation(msg)) => msg.clone(),
        DomainErrorKind::Internal(InternalErrorKind::Storage) => {
            "could not read or write the credential store".to_string()
        }
        DomainErrorKind::Internal(InternalErrorKind::Config) => {
            "the client configuration is incomplete".to_string()
        }
        DomainErrorKind::Internal(InternalErrorKind::Other(msg)) => msg.clone(),
        DomainErrorKind::External(ExternalErrorKind::Unauthenticated) => {
            "you are not signed in; run `workai login` first".to_string()
        }
        DomainErrorKind::External(ExternalErrorKind::SubscriptionRequired) => {
            "this feature requires an active subscription".to_string()
        }
        DomainErrorKind::External(ExternalErrorKind::NotConnected) => {
            "the platform is not connected; complete the consent flow and run `workai connect <redirect-url>`"
                .to_string()
        }
        DomainErrorKind::External(ExternalErrorKind::Api(body)) => body
            .display_message()
            .unwrap_or("the backend rejected the request")
            .to_string(),
        DomainErrorKind::External(ExternalErrorKind::Network) => {
            "network error; check that the backend is reachable".to_string()
        }
        DomainErrorKind::External(ExternalErrorKind::Other(msg)) => msg.clone(),
    }
}
