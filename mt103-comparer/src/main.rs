//! CLI-утилита для сравнения двух сообщений MT103 по полям.

use clap::Parser;
use std::fs::File;
use std::process;

use mt103_parser::{Mt103Message, Result};

/// MT103 Comparer - сравнение сообщений MT103.
///
/// Сравнивает блоки и все именованные поля двух сообщений и показывает различия.
#[derive(Parser)]
#[command(name = "mt103-comparer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Первый файл сообщения
    #[arg(long = "file1", short = '1')]
    file1: String,

    /// Второй файл сообщения
    #[arg(long = "file2", short = '2')]
    file2: String,

    /// Подробный вывод
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mt103_parser={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn read_message(path: &str) -> Result<Mt103Message> {
    let mut file = File::open(path)?;
    Mt103Message::from_read(&mut file)
}

/// Значение одного поля в обоих сообщениях.
struct FieldDiff {
    name: String,
    first: Option<String>,
    second: Option<String>,
}

impl FieldDiff {
    fn matches(&self) -> bool {
        self.first == self.second
    }
}

/// Все сравниваемые значения сообщения в фиксированном порядке.
fn flatten(message: &Mt103Message) -> Vec<(String, Option<String>)> {
    let owned = |value: Option<&str>| value.map(str::to_string);

    let mut values = vec![
        ("basic_header".to_string(), owned(message.basic_header())),
        ("application_header".to_string(), owned(message.application_header())),
        ("trailer".to_string(), owned(message.trailer())),
    ];

    if let Some(header) = message.user_header() {
        values.extend(
            header
                .fields()
                .map(|(field, value)| (format!("user_header.{}", field.name()), owned(value))),
        );
    }

    if let Some(text) = message.text() {
        values.extend(
            text.fields()
                .map(|(field, value)| (format!("text.{}", field.name()), value.map(|v| v.into_owned()))),
        );
    }

    values
}

fn compare_messages(first: &Mt103Message, second: &Mt103Message) -> Vec<FieldDiff> {
    let mut second_values = flatten(second).into_iter();

    flatten(first)
        .into_iter()
        .map(|(name, first)| {
            let second = second_values
                .find(|(other, _)| *other == name)
                .and_then(|(_, value)| value);
            FieldDiff {
                name,
                first,
                second,
            }
        })
        .collect()
}

fn print_results(diffs: &[FieldDiff], verbose: bool) {
    let differing: Vec<_> = diffs.iter().filter(|d| !d.matches()).collect();

    println!("=== Результаты сравнения ===");
    println!();
    println!("Полей сравнено: {}", diffs.len());
    println!("Совпадающих полей: {}", diffs.len() - differing.len());
    println!("Различающихся полей: {}", differing.len());

    if verbose && !differing.is_empty() {
        println!();
        println!("--- Различия ---");
        for diff in differing {
            println!("{}", diff.name);
            println!("[1] {}", diff.first.as_deref().unwrap_or("-"));
            println!("[2] {}", diff.second.as_deref().unwrap_or("-"));
            println!();
        }
    }
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    let first = match read_message(&args.file1) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Ошибка в файле 1 '{}': {}", args.file1, e);
            process::exit(1);
        }
    };

    let second = match read_message(&args.file2) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Ошибка в файле 2 '{}': {}", args.file2, e);
            process::exit(1);
        }
    };

    for (index, message) in [(1, &first), (2, &second)] {
        if !message.is_valid() {
            eprintln!("Ошибка: файл {} не является сообщением MT103", index);
            process::exit(1);
        }
    }

    let diffs = compare_messages(&first, &second);
    print_results(&diffs, args.verbose);

    if diffs.iter().any(|d| !d.matches()) {
        process::exit(1);
    }
}
