use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use shpora_core::{
    ChatClient, ContentPipeline, OptionMark, Provider, SessionController, SubtitleFetcher,
    format_quiz_results, format_summary_readable,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    Grok,
    Openai,
    #[default]
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "shpora")]
#[command(about = "Fetch a video transcript, summarize it with AI, and quiz yourself on it")]
struct Cli {
    /// Video URL
    url: String,

    /// AI provider for summary and quiz generation
    #[arg(short, long, default_value = "gemini")]
    provider: CliProvider,

    /// Number of quiz questions to generate
    #[arg(short = 'n', long, default_value_t = 5)]
    questions: usize,

    /// Print the summary and skip the quiz
    #[arg(long)]
    summary_only: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn fail(spinner: ProgressBar, err: impl std::fmt::Display) -> ! {
    spinner.finish_and_clear();
    eprintln!("{} {}", style("Error:").red().bold(), err);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let provider: Provider = cli.provider.into();

    // Validate API key early
    if let Err(e) = provider.validate_api_key() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    println!(
        "\n{}  {}\n",
        style("shpora").cyan().bold(),
        style("Study Session").dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    let client = Arc::new(ChatClient::new(provider).with_quiz_size(cli.questions));
    let pipeline = ContentPipeline::new(Arc::new(SubtitleFetcher::new()), client.clone(), client);
    let controller = SessionController::new(pipeline);
    controller.on_video_reference_changed(&cli.url);

    let spinner = create_spinner("Fetching transcript and summarizing...");
    if let Err(e) = controller.on_summarize_requested(&cli.url).await {
        fail(spinner, e);
    }
    spinner.finish_with_message(format!("{} Summary ready", style("✓").green().bold()));

    if let Some(summary) = controller.summary() {
        println!("\n{}", format_summary_readable(&summary));
    }

    if cli.summary_only {
        return Ok(());
    }

    let spinner = create_spinner("Generating quiz...");
    if let Err(e) = controller.on_quiz_requested(&cli.url).await {
        fail(spinner, e);
    }
    spinner.finish_with_message(format!(
        "{} Quiz ready ({} questions)",
        style("✓").green().bold(),
        controller.quiz().len()
    ));

    run_quiz(&controller)?;

    Ok(())
}

fn run_quiz(controller: &SessionController) -> Result<()> {
    let term = Term::stdout();
    let quiz = controller.quiz();
    let total = quiz.len();

    for (i, question) in quiz.questions().iter().enumerate() {
        println!(
            "\n{} {}",
            style(format!("Q{}.", i + 1)).cyan().bold(),
            style(&question.prompt).bold()
        );
        for (j, option) in question.options.iter().enumerate() {
            println!("   {} {}", style(format!("{})", letter(j))).dim(), option);
        }

        let choice = loop {
            term.write_str(&format!("{} ", style("Your answer:").dim()))?;
            let line = term.read_line()?;
            let input = line.trim().to_uppercase();
            if let Some(index) = parse_choice(&input, question.options.len()) {
                break question.options[index].clone();
            }
            println!(
                "{}",
                style(format!(
                    "Pick a letter A-{}",
                    letter(question.options.len() - 1)
                ))
                .yellow()
            );
        };

        controller.submit_answer(i, &choice)?;
        render_verdict(controller, i);
        println!(
            "{}",
            style(format!("Score: {}/{}", controller.score(), total)).dim()
        );
    }

    println!("\n{}", style("─".repeat(60)).dim());
    print!("{}", format_quiz_results(&controller.quiz()));

    Ok(())
}

fn letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn parse_choice(input: &str, option_count: usize) -> Option<usize> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let index = (first as u32).checked_sub('A' as u32)? as usize;
    (index < option_count).then_some(index)
}

fn render_verdict(controller: &SessionController, index: usize) {
    let quiz = controller.quiz();
    let Some(question) = quiz.questions().get(index) else {
        return;
    };

    for (j, option) in question.options.iter().enumerate() {
        let label = format!("{}) {}", letter(j), option);
        let line = match quiz.classify_option(index, option) {
            OptionMark::Correct => style(format!("✓ {label}")).green(),
            OptionMark::Incorrect => style(format!("✗ {label}")).red(),
            OptionMark::Other => style(format!("  {label}")).dim(),
            OptionMark::Unanswered => style(format!("  {label}")),
        };
        println!("   {line}");
    }
}
