//! CLI-утилита для просмотра полей сообщения MT103.

use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, Read, Write};
use std::process;

use mt103_parser::{Mt103Message, TextField, UserHeaderField};

/// Формат вывода.
#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    /// Строки вида `поле: значение`
    Text,
    /// CSV с колонками block,field,value
    Csv,
}

/// Поле, выбранное для вывода через `--field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selected {
    Header(UserHeaderField),
    Text(TextField),
}

/// Имя поля блока 4 либо имя, короткое имя или тег поля блока 3.
fn parse_field(name: &str) -> Result<Selected, String> {
    if let Ok(field) = name.parse::<TextField>() {
        return Ok(Selected::Text(field));
    }
    name.parse::<UserHeaderField>()
        .map(Selected::Header)
        .map_err(|()| format!("неизвестное поле '{}'", name))
}

/// MT103 Inspect - разбор сообщения MT103 по полям.
///
/// Читает сообщение из файла или stdin и выводит все блоки и поля.
/// Незаполненные поля выводятся как `-`.
#[derive(Parser)]
#[command(name = "mt103-inspect")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Входной файл (по умолчанию stdin)
    #[arg(long, short)]
    input: Option<String>,

    /// Формат вывода
    #[arg(long, short, value_enum, default_value = "text")]
    format: Layout,

    /// Выводить только указанные поля (можно повторять)
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<Selected>,

    /// Завершаться с кодом 1, если сообщение или его блоки 3/4 невалидны
    #[arg(long)]
    strict: bool,

    /// Подробный вывод (журнал разбора в stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mt103_parser={},mt103_inspect={}", level, level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

fn read_input(input: Option<&str>) -> Result<String, String> {
    let mut content = String::new();

    if let Some(path) = input {
        let mut file =
            File::open(path).map_err(|e| format!("Не удалось открыть файл '{}': {}", path, e))?;
        file.read_to_string(&mut content)
            .map_err(|e| format!("Не удалось прочитать файл '{}': {}", path, e))?;
    } else {
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| format!("Не удалось прочитать stdin: {}", e))?;
    }

    Ok(content)
}

/// Строка отчета: блок, поле, значение.
type Row = (&'static str, String, Option<String>);

fn collect_rows(message: &Mt103Message, selected: &[Selected]) -> Vec<Row> {
    let flag = |valid: bool| Some(valid.to_string());
    let owned = |value: Option<&str>| value.map(str::to_string);
    let everything = selected.is_empty();
    let wanted = |field: Selected| everything || selected.contains(&field);

    let mut rows: Vec<Row> = Vec::new();

    if everything {
        rows.extend([
            ("message", "valid".to_string(), flag(message.is_valid())),
            ("message", "basic_header".to_string(), owned(message.basic_header())),
            (
                "message",
                "application_header".to_string(),
                owned(message.application_header()),
            ),
            ("message", "trailer".to_string(), owned(message.trailer())),
        ]);
    }

    if let Some(header) = message.user_header() {
        if everything {
            rows.push(("user_header", "valid".to_string(), flag(header.is_valid())));
        }
        for (field, value) in header.fields() {
            if wanted(Selected::Header(field)) {
                let name = format!("{} ({})", field.name(), field.alias());
                rows.push(("user_header", name, owned(value)));
            }
        }
    }

    if let Some(text) = message.text() {
        if everything {
            rows.push(("text", "valid".to_string(), flag(text.is_valid())));
        }
        for (field, value) in text.fields() {
            if wanted(Selected::Text(field)) {
                rows.push(("text", field.name().to_string(), value.map(|v| v.into_owned())));
            }
        }
    }

    rows
}

fn write_text<W: Write>(rows: &[Row], writer: &mut W) -> io::Result<()> {
    let mut current = "";
    for (block, field, value) in rows {
        if *block != current {
            writeln!(writer, "[{}]", block)?;
            current = *block;
        }
        let value = value.as_deref().unwrap_or("-").replace('\n', "\n    ");
        writeln!(writer, "  {}: {}", field, value)?;
    }
    Ok(())
}

fn write_csv<W: Write>(rows: &[Row], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "block,field,value")?;
    for (block, field, value) in rows {
        let value = value
            .as_deref()
            .unwrap_or("-")
            .replace('"', "\"\"")
            .replace('\n', " ");
        writeln!(writer, "{},\"{}\",\"{}\"", block, field, value)?;
    }
    Ok(())
}

fn is_complete(message: &Mt103Message) -> bool {
    message.is_valid()
        && message.user_header().is_some_and(|h| h.is_valid() || h.raw().is_empty())
        && message.text().is_some_and(|t| t.is_valid())
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    let content = match read_input(args.input.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Ошибка: {}", e);
            process::exit(1);
        }
    };

    let message = Mt103Message::parse(&content);
    tracing::debug!("Прочитано {} байт, сообщение валидно: {}", content.len(), message.is_valid());

    let rows = collect_rows(&message, &args.fields);
    let mut stdout = io::stdout();
    let result = match args.format {
        Layout::Text => write_text(&rows, &mut stdout),
        Layout::Csv => write_csv(&rows, &mut stdout),
    };

    if let Err(e) = result {
        eprintln!("Ошибка записи: {}", e);
        process::exit(1);
    }

    if args.strict && !is_complete(&message) {
        eprintln!("Ошибка: сообщение не соответствует формату MT103");
        process::exit(1);
    }
}
