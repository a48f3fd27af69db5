//! Command-line front end for the teammeet API.
//!
//! Parsing lives in [`Cli`]; [`execute`] runs one command against any
//! [`TeamApi`] implementation and returns the JSON document to print.

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::api::{
    parse_date, Credentials, Meeting, MeetingInput, MeetingQuery, ProfileImage, Registration,
    TeamApi, UserUpdate,
};
use crate::config::DEFAULT_CONFIG_FILE;
use crate::session::SessionStore;

#[derive(Debug, Parser)]
#[command(name = "teammeet", version, about = "Team and meeting management client")]
pub struct Cli {
    /// YAML configuration file (missing files are ignored)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "TM_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        role: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Check that the backend is reachable
    Health,
    /// Team roster
    #[command(subcommand)]
    Users(UsersCommand),
    /// Meeting schedule
    #[command(subcommand)]
    Meetings(MeetingsCommand),
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    List,
    Get {
        id: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Upload a profile picture from a local file
    UploadImage {
        id: String,
        path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum MeetingsCommand {
    List {
        #[arg(long)]
        user_id: Option<String>,
        /// Day to show (YYYY-MM-DD, RFC 3339, YYYY/MM/DD or MM/DD/YYYY)
        #[arg(long)]
        date: Option<String>,
    },
    Get {
        id: String,
    },
    Create(MeetingArgs),
    Update {
        id: String,
        #[command(flatten)]
        meeting: MeetingArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct MeetingArgs {
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Start time as an RFC 3339 timestamp
    #[arg(long, value_parser = parse_start_time)]
    pub start: Option<DateTime<Utc>>,
    /// Length in minutes
    #[arg(long)]
    pub duration: Option<i64>,
    /// Participant user id (repeatable)
    #[arg(long = "participant")]
    pub participants: Vec<String>,
    /// Turn emotion tracking on or off (true|false)
    #[arg(long)]
    pub emotion_tracking: Option<bool>,
}

impl From<MeetingArgs> for MeetingInput {
    fn from(args: MeetingArgs) -> Self {
        Self {
            title: args.title.trim().to_string(),
            description: args.description,
            start_time: args.start,
            duration: args.duration,
            participants: (!args.participants.is_empty()).then_some(args.participants),
            emotion_tracking: args.emotion_tracking,
        }
    }
}

fn parse_start_time(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 timestamp: {err}"))
}

/// Meeting record plus the derived date, time and status columns.
#[must_use]
pub fn meeting_view(meeting: &Meeting, now: DateTime<Utc>) -> Value {
    let mut value = serde_json::to_value(meeting).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("date".into(), json!(meeting.date().to_string()));
        map.insert("time".into(), json!(meeting.time().format("%H:%M").to_string()));
        map.insert("status".into(), json!(meeting.status_at(now)));
    }
    value
}

/// Run one command and return the document to print.
///
/// # Errors
/// Returns the API or session error that stopped the command, with context.
pub async fn execute(
    command: Command,
    api: &dyn TeamApi,
    session: &dyn SessionStore,
) -> anyhow::Result<Value> {
    match command {
        Command::Login { email, password } => {
            let response = api
                .login(&Credentials { email, password })
                .await
                .context("login failed")?;
            session
                .store_token(&response.token)
                .await
                .context("could not persist session token")?;
            tracing::info!(user = %response.user.email, "logged in");
            Ok(json!({ "message": response.message, "user": response.user }))
        }
        Command::Register {
            name,
            email,
            password,
            role,
        } => {
            let registered = api
                .register(&Registration {
                    name,
                    email,
                    password,
                    role,
                })
                .await
                .context("registration failed")?;
            Ok(serde_json::to_value(registered)?)
        }
        Command::Logout => {
            session.clear().await.context("could not clear session")?;
            tracing::info!("logged out");
            Ok(json!({ "message": "Logged out" }))
        }
        Command::Health => {
            let banner = api.health().await.context("backend unreachable")?;
            Ok(Value::String(banner))
        }
        Command::Users(command) => execute_users(command, api).await,
        Command::Meetings(command) => execute_meetings(command, api).await,
    }
}

async fn execute_users(command: UsersCommand, api: &dyn TeamApi) -> anyhow::Result<Value> {
    match command {
        UsersCommand::List => {
            let users = api.get_users().await.context("could not list users")?;
            Ok(serde_json::to_value(users)?)
        }
        UsersCommand::Get { id } => {
            let user = api
                .get_user_by_id(&id)
                .await
                .with_context(|| format!("could not fetch user {id}"))?;
            Ok(serde_json::to_value(user)?)
        }
        UsersCommand::Update {
            id,
            name,
            email,
            role,
            bio,
        } => {
            let update = UserUpdate {
                name,
                email,
                role,
                bio,
            };
            if update == UserUpdate::default() {
                bail!("nothing to update; pass at least one of --name, --email, --role, --bio");
            }
            let updated = api
                .update_user(&id, &update)
                .await
                .with_context(|| format!("could not update user {id}"))?;
            Ok(serde_json::to_value(updated)?)
        }
        UsersCommand::UploadImage { id, path } => {
            let image = ProfileImage::from_path(&path).await?;
            let uploaded = api
                .upload_profile_image(&id, image)
                .await
                .with_context(|| format!("could not upload profile image for user {id}"))?;
            Ok(serde_json::to_value(uploaded)?)
        }
    }
}

async fn execute_meetings(command: MeetingsCommand, api: &dyn TeamApi) -> anyhow::Result<Value> {
    let now = Utc::now();
    match command {
        MeetingsCommand::List { user_id, date } => {
            let query = MeetingQuery {
                user_id,
                date: date.as_deref().map(parse_date).transpose()?,
            };
            let meetings = api
                .get_meetings(&query)
                .await
                .context("could not list meetings")?;
            Ok(Value::Array(
                meetings.iter().map(|m| meeting_view(m, now)).collect(),
            ))
        }
        MeetingsCommand::Get { id } => {
            let meeting = api
                .get_meeting_by_id(&id)
                .await
                .with_context(|| format!("could not fetch meeting {id}"))?;
            Ok(meeting_view(&meeting, now))
        }
        MeetingsCommand::Create(args) => {
            let input = MeetingInput::from(args);
            if input.title.is_empty() {
                bail!("--title is required");
            }
            if input.start_time.is_none() {
                bail!("--start is required");
            }
            let meeting = api
                .create_meeting(&input)
                .await
                .context("could not create meeting")?;
            Ok(meeting_view(&meeting, now))
        }
        MeetingsCommand::Update { id, meeting } => {
            let mut input = MeetingInput::from(meeting);
            if input.is_empty() {
                bail!("nothing to update; pass at least one meeting field");
            }
            if input.emotion_tracking.is_none() {
                let current = api
                    .get_meeting_by_id(&id)
                    .await
                    .with_context(|| format!("could not fetch meeting {id}"))?;
                input.emotion_tracking = Some(current.emotion_tracking);
            }
            let ack = api
                .update_meeting(&id, &input)
                .await
                .with_context(|| format!("could not update meeting {id}"))?;
            Ok(serde_json::to_value(ack)?)
        }
        MeetingsCommand::Delete { id } => {
            let ack = api
                .delete_meeting(&id)
                .await
                .with_context(|| format!("could not delete meeting {id}"))?;
            Ok(serde_json::to_value(ack)?)
        }
    }
}
