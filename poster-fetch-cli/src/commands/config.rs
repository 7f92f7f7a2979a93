use std::io::{BufRead, Write};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use poster_fetch_scraper::imdb::DEFAULT_IMDB_URL;
use poster_fetch_scraper::omdb::DEFAULT_OMDB_URL;
use poster_fetch_scraper::settings::{API_KEY_ENV, DEFAULT_PLACEHOLDER_URL, OmdbConfig};
use poster_fetch_scraper::{CredentialSource, api_key_source, config_path, load_config, save_config};

use crate::CliError;

fn mask_value(s: &str) -> String {
    let prefix: String = s.chars().take(2).collect();
    if s.chars().count() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", prefix)
    }
}

/// Show current settings and where the API key comes from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = config_path();
    let config = load_config()?;

    log::info!(
        "{}",
        "poster-fetch Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    crate::log_blank();

    let source = api_key_source(None, &config);
    let key = match &source {
        CredentialSource::EnvVar(var) => std::env::var(var).ok(),
        CredentialSource::ConfigFile => config.api_key().map(str::to_string),
        CredentialSource::Flag | CredentialSource::Missing => None,
    };
    let source_str = format!("({})", source);
    match key {
        Some(v) => log::info!(
            "  {} {} {}",
            "api_key:".if_supports_color(Stdout, |t| t.cyan()),
            mask_value(&v),
            source_str.if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  {} {} {}",
            "api_key:".if_supports_color(Stdout, |t| t.cyan()),
            "not set".if_supports_color(Stdout, |t| t.yellow()),
            format!("(set {} or run 'poster-fetch config setup')", API_KEY_ENV)
                .if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }

    let fields = [
        ("placeholder_url", config.placeholder_url().to_string()),
        (
            "omdb_url",
            config.omdb_base_url().unwrap_or(DEFAULT_OMDB_URL).to_string(),
        ),
        (
            "imdb_url",
            config.imdb_base_url().unwrap_or(DEFAULT_IMDB_URL).to_string(),
        ),
        ("sort_csv", config.sort_csv().display().to_string()),
        ("save_dir", config.save_dir().display().to_string()),
        ("sync_csv", config.sync_csv().display().to_string()),
        ("images_dir", config.images_dir().display().to_string()),
    ];
    for (name, value) in fields {
        log::info!(
            "  {} {}",
            format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
            value,
        );
    }
    Ok(())
}

/// Interactively write the OMDb section of the config file. Other sections
/// are kept as they are.
pub(crate) fn run_config_setup() -> Result<(), CliError> {
    println!(
        "{}",
        "poster-fetch Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    let mut config = load_config()?;
    let existing = config.omdb.clone().unwrap_or_default();
    let mut input = std::io::stdin().lock();
    let mut out = std::io::stdout();

    println!(
        "  {}",
        "OMDb API key (get one at https://www.omdbapi.com/apikey.aspx):"
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    let api_key = loop {
        let shown = existing.api_key.as_deref().map(mask_value);
        match read_line(&mut input, &mut out, "api_key", shown.as_deref())? {
            Some(v) => break Some(v),
            None if existing.api_key.is_some() => break existing.api_key.clone(),
            None => println!(
                "    {}",
                "This field is required.".if_supports_color(Stdout, |t| t.yellow()),
            ),
        }
    };

    println!();
    println!(
        "  {}",
        "Placeholder image for titles without a poster (press Enter to keep):"
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    let current_placeholder = existing
        .placeholder_url
        .as_deref()
        .unwrap_or(DEFAULT_PLACEHOLDER_URL);
    let placeholder_url = read_line(
        &mut input,
        &mut out,
        "placeholder_url",
        Some(current_placeholder),
    )?
    .or(existing.placeholder_url);

    config.omdb = Some(OmdbConfig {
        api_key,
        placeholder_url,
        base_url: existing.base_url,
    });

    let path = save_config(&config)?;
    println!();
    println!(
        "{} Configuration saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

/// Prompt for one value. An empty line returns `None`; end of input is an
/// error so a closed stdin cannot spin a required prompt forever.
fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    default: Option<&str>,
) -> Result<Option<String>, CliError> {
    match default {
        Some(def) => write!(out, "  {} [{}]: ", prompt, def)?,
        None => write!(out, "  {}: ", prompt)?,
    }
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::config("no input (stdin closed)"));
    }
    let trimmed = line.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path =
        config_path().ok_or_else(|| CliError::config("Could not determine config directory"))?;
    log::info!("{}", path.display());
    Ok(())
}
