use anyhow::Result;
use bough::areas::repository::Repository;
use bough::artifacts::core::{
    DEFAULT_LOG_FILTER, LOG_FILTER_ENV, PagerWriter, report_failure, should_page,
};
use bough::errors::RepositoryError;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use minus::Pager;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bough",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A miniature version-control system",
    long_about = "bough keeps snapshots of a working directory as commits, \
    with branches, a staging area and three-way merges. \
    All of its state lives in the .bough directory at the root of the working tree.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a repository in the current directory",
        long_about = "This command creates the .bough directory, the initial commit and the master branch."
    )]
    Init,
    #[command(
        name = "add",
        about = "Stage a file for the next commit",
        long_about = "This command stages the current content of a file. \
        Staging a file identical to its committed version drops any pending change instead."
    )]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes as a new commit",
        long_about = "This command creates a commit on the current branch from the staged changes and the given message."
    )]
    Commit {
        #[arg(index = 1, allow_hyphen_values = true, help = "The commit message")]
        message: Option<String>,
    },
    #[command(
        name = "rm",
        about = "Unstage a file or stop tracking it",
        long_about = "This command drops a pending addition, and if the file is tracked, \
        stages its removal and deletes it from the working directory."
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit reachable from any branch")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1, allow_hyphen_values = true)]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show branches, staged changes and working-tree changes"
    )]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "With a branch name, this command switches the working directory to that branch. \
        With `-- <file>`, it restores the file from the head commit, \
        and with `<commit> -- <file>`, from the given commit."
    )]
    Checkout {
        #[arg(help = "Branch name or commit id")]
        target: Option<String>,
        #[arg(last = true, help = "File to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Move the current branch and working directory to a commit"
    )]
    Reset {
        #[arg(index = 1, help = "Full or abbreviated commit id")]
        commit: String,
    },
    #[command(
        name = "merge",
        about = "Merge another branch into the current one",
        long_about = "This command performs a three-way merge between the current branch, \
        the given branch and their split point, writing conflict markers where both changed a file."
    )]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return report_usage_error(error),
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_failure(std::io::stdout().lock(), format_args!("{:#}", error));
            ExitCode::FAILURE
        }
    }
}

fn report_usage_error(error: clap::Error) -> ExitCode {
    let repository_error = match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            return ExitCode::SUCCESS;
        }
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            RepositoryError::NoCommandGiven
        }
        ErrorKind::InvalidSubcommand => RepositoryError::UnknownCommand,
        _ => RepositoryError::InvalidOperandCount,
    };

    tracing::debug!(%error, "rejected command line");
    report_failure(std::io::stdout().lock(), &repository_error);
    ExitCode::FAILURE
}

async fn run(cli: Cli) -> Result<()> {
    let pwd = std::env::current_dir()?;

    let paged = matches!(cli.command, Commands::Log | Commands::GlobalLog) && should_page();

    if paged {
        let pager = Pager::new();
        let mut repository = Repository::new(&pwd, Box::new(PagerWriter::new(pager.clone())))?;
        dispatch(&mut repository, cli.command).await?;
        repository.writer().flush()?;
        drop(repository);

        minus::page_all(pager)?;
        return Ok(());
    }

    let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;
    dispatch(&mut repository, cli.command).await
}

async fn dispatch(repository: &mut Repository, command: Commands) -> Result<()> {
    match command {
        Commands::Init => repository.init().await,
        Commands::Add { file } => repository.add(&file).await,
        Commands::Commit { message } => {
            let message = message.ok_or(RepositoryError::EmptyMessage)?;
            repository.commit(&message).await.map(|_| ())
        }
        Commands::Rm { file } => repository.rm(&file).await,
        Commands::Log => repository.log().await,
        Commands::GlobalLog => repository.global_log().await,
        Commands::Find { message } => repository.find(&message).await,
        Commands::Status => repository.status().await,
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(&branch).await,
            (revision, Some(file)) => repository.checkout_file(revision.as_deref(), &file).await,
            (None, None) => Err(RepositoryError::InvalidOperandCount.into()),
        },
        Commands::Branch { name } => repository.branch(&name).await,
        Commands::RmBranch { name } => repository.rm_branch(&name).await,
        Commands::Reset { commit } => repository.reset(&commit).await,
        Commands::Merge { branch } => repository.merge(&branch).await.map(|_| ()),
    }
}
