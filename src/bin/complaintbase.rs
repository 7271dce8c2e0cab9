use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use complaintbase::chat::{Assistant, ChatSession, ResponsePayload};
use complaintbase::classification::{IssueClassifier, IssueLabel, IssueTaxonomy};
use complaintbase::config::{self, AppConfig};
use complaintbase::dataset::{Column, Dataset, DatasetViews, PostMetric, PostMetricsTable};
use complaintbase::insights::{self, TimeBucket};
use complaintbase::llm::client_from_settings;
use tracing::{debug, info};

/// ComplaintBase - complaint comment classification and chat assistant
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every comment and print issue counts
    Classify {
        /// JSON or JSON Lines export (defaults to the configured dataset)
        #[arg(short, long)]
        dataset: Option<PathBuf>,
        /// Rule table: dashboard or granular (defaults to config)
        #[arg(short, long)]
        taxonomy: Option<IssueTaxonomy>,
        /// Keep promotional and very short comments
        #[arg(long)]
        all: bool,
    },
    /// Print dashboard metrics for a dataset
    Insights {
        #[arg(short, long)]
        dataset: Option<PathBuf>,
        #[arg(short, long)]
        taxonomy: Option<IssueTaxonomy>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Timeline interval: day, week, month, or quarter
        #[arg(long, default_value = "month")]
        interval: TimeBucket,
        /// Show totals for one city
        #[arg(long)]
        city: Option<String>,
        /// Per-post reply/reshare export (defaults to the configured one)
        #[arg(long)]
        post_metrics: Option<PathBuf>,
        /// Show the details of one post
        #[arg(long)]
        post: Option<String>,
    },
    /// Interactive complaints assistant
    Chat {
        #[arg(short, long)]
        dataset: Option<PathBuf>,
    },
    /// Write the default config file if none exists
    InitConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load_or_default()?;
    debug!(?config, "Loaded configuration");

    match args.command {
        Command::Classify {
            dataset,
            taxonomy,
            all,
        } => run_classify(&config, dataset, taxonomy, all),
        Command::Insights {
            dataset,
            taxonomy,
            from,
            to,
            interval,
            city,
            post_metrics,
            post,
        } => run_insights(
            &config,
            InsightsArgs {
                dataset,
                taxonomy,
                from,
                to,
                interval,
                city,
                post_metrics,
                post,
            },
        ),
        Command::Chat { dataset } => run_chat(&config, dataset),
        Command::InitConfig => init_config(&config),
    }
}

fn load_dataset(config: &AppConfig, path: Option<PathBuf>) -> Result<Dataset> {
    let path = path
        .or_else(|| config.dataset.path.clone())
        .context("No dataset given. Pass --dataset or set [dataset] path in config.toml.")?;
    Dataset::load(&path)
}

/// Splits off the customer-comment view unless `keep_all` or the config
/// says otherwise.
fn views(config: &AppConfig, dataset: Dataset, keep_all: bool) -> DatasetViews {
    let views = DatasetViews::new(dataset, config.dataset.customer_only && !keep_all);
    info!(
        comments = views.comments.len(),
        total = views.all.len(),
        "Prepared dataset views"
    );
    views
}

fn run_classify(
    config: &AppConfig,
    dataset: Option<PathBuf>,
    taxonomy: Option<IssueTaxonomy>,
    all: bool,
) -> Result<()> {
    let views = views(config, load_dataset(config, dataset)?, all);
    let classifier = IssueClassifier::new(taxonomy.unwrap_or(config.classifier.taxonomy));
    let annotated = views.comments.annotate(&classifier);
    println!("Classified {} comments", annotated.len());
    for (label, count) in insights::issue_counts(&annotated) {
        println!("{:<20} {count}", label.as_str());
    }
    Ok(())
}

struct InsightsArgs {
    dataset: Option<PathBuf>,
    taxonomy: Option<IssueTaxonomy>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    interval: TimeBucket,
    city: Option<String>,
    post_metrics: Option<PathBuf>,
    post: Option<String>,
}

fn run_insights(config: &AppConfig, args: InsightsArgs) -> Result<()> {
    let mut dataset = load_dataset(config, args.dataset)?;
    if args.from.is_some() || args.to.is_some() {
        let start = args.from.unwrap_or(NaiveDate::MIN);
        let end = args.to.unwrap_or(NaiveDate::MAX);
        if start > end {
            anyhow::bail!("Start date must be before end date.");
        }
        dataset = insights::filter_by_date(&dataset, start, end);
    }
    let views = views(config, dataset, false);
    let all = views.all.as_ref();

    let summary = insights::summarize(all);
    println!("Total posts:        {}", summary.total_posts);
    println!("Total engagement:   {}", summary.total_engagement);
    println!("Total OTS:          {}", summary.total_ots);
    match summary.average_sentiment {
        Some(value) => println!("Average sentiment:  {value:.2}"),
        None => println!("Average sentiment:  n/a"),
    }

    let sentiment = insights::sentiment_distribution(all);
    println!(
        "\nSentiment: {} positive, {} negative, {} neutral",
        sentiment.positive, sentiment.negative, sentiment.neutral
    );

    println!("\nComments by hour:");
    for (hour, count) in insights::hourly_activity(all).iter().enumerate() {
        if *count > 0 {
            println!("  {hour:02}:00  {count}");
        }
    }

    println!("\nEngagement per day:");
    for (day, engagement) in insights::engagement_per_day(all) {
        println!("  {day}  {engagement}");
    }

    println!("\nMost active posts:");
    for (post_id, count) in insights::most_active_posts(&views.comments, 10) {
        println!("  {post_id:<24} {count}");
    }

    let classifier = IssueClassifier::new(args.taxonomy.unwrap_or(config.classifier.taxonomy));
    let annotated = views.comments.annotate(&classifier);
    println!("\nTheme breakdown:");
    for row in insights::theme_breakdown(&annotated) {
        println!("  {:<20} {:<20} {}", row.theme.as_str(), row.sub_theme.as_str(), row.count);
    }

    for category in [IssueLabel::Support, IssueLabel::Network, IssueLabel::Billing] {
        let timeline = insights::sub_issue_timeline(&annotated, category, args.interval);
        if timeline.is_empty() {
            continue;
        }
        println!("\n{category} sub-issues:");
        for bucket in timeline {
            let counts = bucket
                .counts
                .iter()
                .map(|(label, count)| format!("{label}={count}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {:<16} {counts}", bucket.label);
        }
    }

    if let Some(city) = args.city {
        let totals = insights::city_insights(all, &city);
        println!(
            "\n{}: {} posts, {} total engagement",
            totals.city, totals.total_posts, totals.total_engagement
        );
    }

    let metrics_path = args
        .post_metrics
        .or_else(|| config.dataset.post_metrics_path.clone());
    let Some(metrics_path) = metrics_path else {
        if args.post.is_some() {
            anyhow::bail!("--post needs a post metrics export (--post-metrics).");
        }
        return Ok(());
    };
    let metrics = PostMetricsTable::load(&metrics_path)?;
    for metric in PostMetric::ALL {
        println!("\nTop posts by {metric}:");
        for (post_id, value) in metrics.top(metric, 10) {
            println!("  {post_id:<24} {value}");
        }
    }

    if let Some(post_id) = args.post {
        let comments = all
            .records()
            .iter()
            .filter(|record| record.column(Column::PostId) == Some(post_id.as_str()))
            .count();
        println!("\nPost {post_id}: {comments} comments");
        match metrics.find(&post_id) {
            Some(row) => {
                for metric in PostMetric::ALL {
                    let value = row
                        .get(metric)
                        .map(|value| value.to_string())
                        .unwrap_or_else(|| "n/a".into());
                    println!("  {:<18} {value}", metric.as_str());
                }
            }
            None => println!("  No metrics recorded for this post."),
        }
    }
    Ok(())
}

fn run_chat(config: &AppConfig, dataset: Option<PathBuf>) -> Result<()> {
    // The assistant answers over every row; the promo filter is for the
    // issue dashboards only.
    let dataset = Arc::new(load_dataset(config, dataset)?);
    let llm = client_from_settings(&config.llm);
    let assistant = Assistant::new(dataset, llm, config.chat.clone());
    let mut session = ChatSession::new();

    println!("Ask about complaints. `:1`..`:9` picks a suggestion, `:quit` exits.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ":quit" {
            break;
        }
        let typed = match line.strip_prefix(':').map(str::parse::<usize>) {
            Some(Ok(number)) if number > 0 => {
                if let Err(err) = session.click_suggestion(number - 1) {
                    println!("{err}");
                    continue;
                }
                None
            }
            _ => Some(line),
        };
        let Some(outcome) = session.submit(&assistant, typed) else {
            continue;
        };
        if typed.is_none() {
            println!("(asked) {}", outcome.query);
        }
        println!("{}", outcome.response.message);
        if let ResponsePayload::Search { matches, .. } = &outcome.response.payload {
            for record in matches.iter().take(20) {
                println!(
                    "  {} | {} | {}",
                    record
                        .published
                        .map(|ts| ts.to_string())
                        .unwrap_or_default(),
                    record.city.as_deref().unwrap_or("-"),
                    record.text().unwrap_or_default()
                );
            }
        }
        if !outcome.suggestions.is_empty() {
            println!("\nYou can also ask:");
            for (index, suggestion) in outcome.suggestions.iter().enumerate() {
                println!("  :{} {suggestion}", index + 1);
            }
        }
    }
    Ok(())
}

fn init_config(config: &AppConfig) -> Result<()> {
    let path = config::config_file_path()?;
    if path.exists() {
        println!("Config already present at {}", path.display());
        return Ok(());
    }
    config::save(config)?;
    println!("Default config written to {}", path.display());
    Ok(())
}
