//! `jobs`: terminal front end for the job board
//!
//! Loads the collection from the jobs API, then lists, adds, edits or
//! deletes postings.

use clap::{Args, Parser, Subcommand};
use client::{
    ApiConfig, ConsoleNotifier, DEFAULT_API_URL, HttpJobApi, JobStore, Notifier, StoreError,
    TracingNotifier,
};
use common::display::render_card;
use common::job::{JOB_TYPES, LOCATIONS, SUGGESTED_TAGS};
use common::{FilterCriteria, JobDraft, JobId, JobPatch, Selector, SortMode};
use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Store = JobStore<HttpJobApi, Box<dyn Notifier>>;

#[derive(Parser, Debug)]
#[command(name = "jobs", version, about = "Browse and manage job postings")]
struct Cli {
    /// Base URL of the jobs API
    #[arg(long, env = "JOBS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Give up on a request after this many seconds (no limit by default)
    #[arg(long, env = "JOBS_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Send notifications to the log instead of the terminal
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List jobs matching the given filters
    List(ListArgs),
    /// Post a new job
    Add(AddArgs),
    /// Change fields of an existing job
    Edit(EditArgs),
    /// Delete a job
    Delete {
        /// Job id
        id: JobId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the job types, locations and tags the board offers
    Options,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Case-insensitive text to look for in title or company
    #[arg(short, long, default_value = "")]
    search: String,

    /// Job type, or "all"
    #[arg(long, default_value = "all")]
    job_type: Selector,

    /// Location, or "all"
    #[arg(long, default_value = "all")]
    location: Selector,

    /// Required tag; repeat to require several
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// newest or oldest
    #[arg(long, default_value = "newest")]
    sort: SortMode,

    /// Print the matching jobs as JSON
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.clone(),
            job_type: self.job_type.clone(),
            location: self.location.clone(),
            tags: self.tags.clone(),
            sort: self.sort,
        }
    }
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    company: Option<String>,

    #[arg(long, default_value = common::job::DEFAULT_LOCATION)]
    location: String,

    #[arg(long, default_value = common::job::DEFAULT_JOB_TYPE)]
    job_type: String,

    #[arg(long)]
    description: Option<String>,

    /// Posting date, YYYY-MM-DD
    #[arg(long)]
    posted: Option<String>,

    #[arg(long = "tag")]
    tags: Vec<String>,
}

impl From<AddArgs> for JobDraft {
    fn from(args: AddArgs) -> Self {
        JobDraft {
            title: args.title,
            company: args.company,
            location: Some(args.location),
            job_type: Some(args.job_type),
            description: args.description,
            tags: args.tags,
            posting_date: args.posted,
        }
    }
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Job id
    id: JobId,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    company: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    job_type: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Posting date, YYYY-MM-DD
    #[arg(long)]
    posted: Option<String>,

    /// Replaces the tag list; repeat for several tags
    #[arg(long = "tag", conflicts_with = "clear_tags")]
    tags: Vec<String>,

    /// Remove all tags
    #[arg(long)]
    clear_tags: bool,
}

impl EditArgs {
    fn patch(&self) -> JobPatch {
        let tags = if self.clear_tags {
            Some(Vec::new())
        } else if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.clone())
        };

        JobPatch {
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            job_type: self.job_type.clone(),
            description: self.description.clone(),
            tags,
            posting_date: self.posted.clone(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn list(store: &Store, args: &ListArgs) -> Result<(), Box<dyn Error>> {
    let criteria = args.criteria();
    let total = store.snapshot().await.len();
    let jobs = store.view(&criteria).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    for filter in criteria.active_filters() {
        println!("🔎 {}", filter);
    }
    println!(
        "📊 Showing {} of {} jobs, {} first\n",
        jobs.len(),
        total,
        criteria.sort
    );

    if jobs.is_empty() {
        println!("No jobs found matching your criteria");
    }
    for job in &jobs {
        println!("{}", render_card(job));
    }

    Ok(())
}

fn print_options() {
    println!("Job types: {}", JOB_TYPES.join(", "));
    println!("Locations: {}", LOCATIONS.join(", "));
    println!("Tags:      {}", SUGGESTED_TAGS.join(", "));
}

/// Only an explicit yes counts; anything else, including a blank line, is a no.
fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn confirm(question: &str) -> std::io::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{} [y/N] ", question).as_bytes())
        .await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(is_confirmed(&answer))
}

async fn delete(store: &Store, id: &JobId, yes: bool) -> Result<(), Box<dyn Error>> {
    if let Some(job) = store.get(id).await {
        println!("{}", render_card(&job));
    }
    if !yes && !confirm("Are you sure to delete this job?").await? {
        println!("🚫 Delete cancelled");
        return Ok(());
    }
    store.remove(id).await?;
    Ok(())
}

async fn run(store: &Store, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Options => print_options(),
        Command::List(args) => {
            store.load().await?;
            list(store, &args).await?;
        }
        Command::Add(args) => {
            store.load().await?;
            let job = store.create(args.into()).await?;
            println!("{}", render_card(&job));
        }
        Command::Edit(args) => {
            let patch = args.patch();
            if patch.is_empty() {
                return Err("nothing to change, pass at least one field".into());
            }
            store.load().await?;
            let job = store.update(&args.id, &patch).await?;
            println!("{}", render_card(&job));
        }
        Command::Delete { id, yes } => {
            store.load().await?;
            delete(store, &id, yes).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ApiConfig::new(&cli.api_url);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let api = match HttpJobApi::new(config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    let notifier: Box<dyn Notifier> = if cli.quiet {
        Box::new(TracingNotifier)
    } else {
        Box::new(ConsoleNotifier)
    };
    let store = JobStore::new(api, notifier);

    match run(&store, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Store failures already went through the notifier
            if e.downcast_ref::<StoreError>().is_none() {
                eprintln!("❌ {}", e);
            }
            debug!("command failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_args_build_criteria() {
        let cli = Cli::try_parse_from([
            "jobs",
            "list",
            "--search",
            "Dev",
            "--location",
            "Remote",
            "--tag",
            "React",
            "--tag",
            "Frontend",
            "--sort",
            "oldest",
        ])
        .unwrap();

        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        let criteria = args.criteria();
        assert_eq!(criteria.search, "Dev");
        assert_eq!(criteria.job_type, Selector::All);
        assert_eq!(criteria.location, Selector::only("Remote"));
        assert_eq!(criteria.tags, vec!["React", "Frontend"]);
        assert_eq!(criteria.sort, SortMode::Oldest);
    }

    #[test]
    fn test_add_args_use_form_defaults() {
        let cli = Cli::try_parse_from(["jobs", "add", "--title", "QA Engineer"]).unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        let draft = JobDraft::from(args);
        assert_eq!(draft.title.as_deref(), Some("QA Engineer"));
        assert_eq!(draft.job_type.as_deref(), Some("Full-time"));
        assert_eq!(draft.location.as_deref(), Some("New York"));
    }

    #[test]
    fn test_edit_args_patch() {
        let cli = Cli::try_parse_from(["jobs", "edit", "7", "--clear-tags"]).unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit command");
        };
        assert_eq!(args.id, JobId::Int(7));
        assert_eq!(args.patch().tags, Some(vec![]));

        let cli = Cli::try_parse_from(["jobs", "edit", "abc", "--title", "Lead"]).unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit command");
        };
        assert_eq!(args.id, JobId::Text("abc".to_string()));
        let patch = args.patch();
        assert_eq!(patch.title.as_deref(), Some("Lead"));
        assert_eq!(patch.tags, None);
    }

    #[test]
    fn test_delete_asks_unless_yes() {
        let cli = Cli::try_parse_from(["jobs", "delete", "3"]).unwrap();
        let Command::Delete { id, yes } = cli.command else {
            panic!("expected delete command");
        };
        assert_eq!(id, JobId::Int(3));
        assert!(!yes);

        let cli = Cli::try_parse_from(["jobs", "delete", "--yes", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { yes: true, .. }));
        let cli = Cli::try_parse_from(["jobs", "delete", "3", "-y"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { yes: true, .. }));
    }

    #[test]
    fn test_only_explicit_yes_confirms() {
        assert!(is_confirmed("y\n"));
        assert!(is_confirmed("  YES \r\n"));
        assert!(!is_confirmed("\n"));
        assert!(!is_confirmed("n"));
        assert!(!is_confirmed("yep"));
        assert!(!is_confirmed(""));
    }

    fn unreachable_store() -> Store {
        let api = HttpJobApi::new(ApiConfig::new("http://127.0.0.1:1/api")).unwrap();
        JobStore::new(api, Box::new(TracingNotifier))
    }

    #[tokio::test]
    async fn test_options_needs_no_backend() {
        let store = unreachable_store();
        assert!(run(&store, Command::Options).await.is_ok());

        let cli = Cli::try_parse_from(["jobs", "list"]).unwrap();
        let err = run(&store, cli.command).await.unwrap_err();
        assert!(err.downcast_ref::<StoreError>().is_some());
    }

    #[test]
    fn test_bad_sort_mode_is_rejected() {
        assert!(Cli::try_parse_from(["jobs", "list", "--sort", "relevance"]).is_err());
    }
}
