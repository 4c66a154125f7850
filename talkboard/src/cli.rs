use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Talks site helper: countdowns, suggestions and the schedule
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true, env = "TALKBOARD_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render countdowns until interrupted
    Countdown(CountdownArgs),
    /// Send a topic suggestion to the form endpoint
    Submit(SubmitArgs),
    /// Schedule tools
    #[command(subcommand)]
    Schedule(ScheduleCommand),
}

#[derive(Args, Debug)]
pub struct CountdownArgs {
    /// Target start time; repeat for several countdowns. Defaults to the next talk
    #[arg(long = "start", value_name = "ISO")]
    pub starts: Vec<String>,

    /// Render a single frame and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub topic: String,

    #[arg(long, default_value = "")]
    pub details: String,
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Validate a schedule file
    Validate {
        /// Defaults to the first configured schedule path that exists
        path: Option<PathBuf>,
    },
    /// Print the next talk and dashboard stats
    Summary {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write pages for scheduled talks that have no page of their own
    Generate {
        /// Defaults to the configured generated pages directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_accepts_repeated_starts() {
        let cli = Cli::parse_from([
            "talkboard",
            "countdown",
            "--start",
            "2030-01-01T00:00:00Z",
            "--start",
            "2031-01-01",
            "--once",
        ]);
        match cli.command {
            Command::Countdown(args) => {
                assert_eq!(args.starts.len(), 2);
                assert!(args.once);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_submit_requires_fields() {
        assert!(Cli::try_parse_from(["talkboard", "submit", "--name", "Ada"]).is_err());

        let cli = Cli::parse_from([
            "talkboard", "submit", "--name", "Ada", "--email", "ada@example.com", "--topic", "Rust",
        ]);
        match cli.command {
            Command::Submit(args) => assert_eq!(args.details, ""),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_schedule_validate_path_is_optional() {
        let cli = Cli::parse_from(["talkboard", "schedule", "validate"]);
        assert!(matches!(
            cli.command,
            Command::Schedule(ScheduleCommand::Validate { path: None })
        ));

        let cli = Cli::parse_from(["talkboard", "schedule", "summary", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Schedule(ScheduleCommand::Summary { json: true })
        ));
    }

    #[test]
    fn test_schedule_generate_out_dir() {
        let cli = Cli::parse_from(["talkboard", "schedule", "generate"]);
        assert!(matches!(
            cli.command,
            Command::Schedule(ScheduleCommand::Generate { out: None })
        ));

        let cli = Cli::parse_from(["talkboard", "schedule", "generate", "--out", "site/_generated"]);
        match cli.command {
            Command::Schedule(ScheduleCommand::Generate { out }) => {
                assert_eq!(out, Some(PathBuf::from("site/_generated")))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
