use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::model::{AnswerOption, Category, CategoryId, OptionId, QuizId, QuizItem};
use storage::sqlite::SqliteRepository;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    category_id: CategoryId,
    category_name: String,
    category_desc: Option<String>,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCategoryId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCategoryId { raw } => {
                write!(f, "invalid --category-id value: {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut category_id = std::env::var("QUIZ_CATEGORY_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| CategoryId::new(1), CategoryId::new);
        let mut category_name =
            std::env::var("QUIZ_CATEGORY_NAME").unwrap_or_else(|_| "World Capitals".into());
        let mut category_desc = std::env::var("QUIZ_CATEGORY_DESC").ok();
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--category-id" => {
                    let value = require_value(&mut args, "--category-id")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCategoryId { raw: value.clone() })?;
                    category_id = CategoryId::new(parsed);
                }
                "--category-name" => {
                    let value = require_value(&mut args, "--category-name")?;
                    category_name = value;
                }
                "--category-desc" => {
                    let value = require_value(&mut args, "--category-desc")?;
                    category_desc = Some(value);
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            category_id,
            category_name,
            category_desc,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --category-id <id>        Category id to upsert (default: 1)");
    eprintln!("  --category-name <name>    Category name (default: World Capitals)");
    eprintln!("  --category-desc <text>    Optional category description");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DB_URL, QUIZ_CATEGORY_ID, QUIZ_CATEGORY_NAME, QUIZ_CATEGORY_DESC");
}

// (question, explanation, options as (label, is_correct))
type Sample = (&'static str, &'static str, &'static [(&'static str, bool)]);

const SAMPLES: &[Sample] = &[
    (
        "What is the capital of France?",
        "Paris has been the French capital since the 10th century.",
        &[
            ("Paris", true),
            ("Lyon", false),
            ("Marseille", false),
            ("Nice", false),
        ],
    ),
    (
        "What is the capital of Japan?",
        "Tokyo took over from Kyoto in 1868.",
        &[
            ("Osaka", false),
            ("Tokyo", true),
            ("Kyoto", false),
            ("Nagoya", false),
        ],
    ),
    (
        "Which of these are capitals of South Africa?",
        "South Africa splits its capital across three cities; Pretoria and Cape Town are two of them.",
        &[
            ("Pretoria", true),
            ("Cape Town", true),
            ("Johannesburg", false),
            ("Durban", false),
        ],
    ),
    (
        "What is the capital of Australia?",
        "Canberra was purpose-built as a compromise between Sydney and Melbourne.",
        &[
            ("Sydney", false),
            ("Melbourne", false),
            ("Canberra", true),
            ("Perth", false),
        ],
    ),
];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;
    let now = args.now.unwrap_or_else(Utc::now);

    let category = Category::new(
        args.category_id,
        args.category_name.clone(),
        args.category_desc.clone(),
        now,
    )?;
    repo.upsert_category(&category).await?;

    let base = args.category_id.value() * 100;
    for (index, (question, explanation, option_specs)) in SAMPLES.iter().enumerate() {
        let quiz_id = base + index as u64 + 1;
        let mut options = Vec::with_capacity(option_specs.len());
        for (opt_index, (label, is_correct)) in option_specs.iter().enumerate() {
            options.push(AnswerOption::new(
                OptionId::new(quiz_id * 10 + opt_index as u64 + 1),
                *label,
                *is_correct,
            )?);
        }
        let quiz = QuizItem::new(
            QuizId::new(quiz_id),
            category.id(),
            *question,
            *explanation,
            options,
            now,
        )?;
        repo.upsert_quiz(&quiz).await?;
    }

    println!(
        "Seeded category {} ({}) with {} quizzes into {}",
        category.id().value(),
        category.name(),
        SAMPLES.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
