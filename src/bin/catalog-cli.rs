use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Query a running course catalog API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:80")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all schools
    Schools,
    /// List subjects, optionally for one school
    Subjects {
        #[arg(short, long)]
        school: Option<String>,
    },
    /// List courses for a term, school and subject
    Courses {
        /// Term id, e.g. 1194 for Fall 2019
        term: String,
        school: String,
        subject: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = match &cli.command {
        Commands::Schools => endpoint(&cli.url, &["schools"])?,
        Commands::Subjects { school: None } => endpoint(&cli.url, &["subjects"])?,
        Commands::Subjects { school: Some(school) } => {
            endpoint(&cli.url, &["subjects", school.as_str()])?
        }
        Commands::Courses { term, school, subject } => {
            endpoint(&cli.url, &[term.as_str(), school.as_str(), subject.as_str()])?
        }
    };

    let res = client.get(url).send().await?;
    print_response(res).await
}

/// `base` followed by `segments`, each percent-encoded as one path segment.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be a base url", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text);
        eprintln!("Error: catalog API returned status {}: {}", status, message);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
