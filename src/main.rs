use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use playlist_sorter::{
    cli, config, error,
    spotify::{RetryPolicy, SpotifyContext},
    types::SortKey,
    utils, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Access token for the Spotify Web API
    access_token: String,

    /// Name of the playlist to sort
    playlist_name: String,

    /// Audio feature to sort by (e.g. tempo, energy, valence)
    feature: String,

    /// Break ties with another feature, `feature[:asc|:desc]`; repeatable
    #[clap(long = "then", value_name = "FEATURE[:desc]", value_parser = utils::parse_sort_key)]
    then: Vec<SortKey>,

    /// Reverse the sorted order
    #[clap(short, long)]
    reverse: bool,

    /// Maximum playlist length in milliseconds, -1 for no limit
    #[clap(short, long, default_value_t = -1, allow_negative_numbers = true)]
    length: i64,

    /// Retries per request before giving up
    #[clap(long)]
    max_retries: Option<u32>,

    /// Print the sorted tracks as a table
    #[clap(long)]
    show: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let mut retry = RetryPolicy::from_config();
    if let Some(max_retries) = cli.max_retries {
        retry.max_retries = max_retries;
    }

    let ctx = match SpotifyContext::from_config(&cli.access_token) {
        Ok(ctx) => ctx.with_retry(retry),
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };

    let options = cli::SortOptions {
        playlist_name: cli.playlist_name,
        feature: cli.feature,
        then: cli.then,
        reverse: cli.reverse,
        max_length: cli.length,
        show: cli.show,
    };

    if let Err(e) = cli::sort(&ctx, &options).await {
        error!("{}", e);
    }
}
