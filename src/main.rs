use clap::Parser;
use decks::config::{cli::Command, TomlConfig};
use decks::utils::logger;
use decks::{build_storage, Card, CardGenerator, CliConfig, Deck, DeckError, ErrorCategory};
use serde::Serialize;

#[derive(Serialize)]
struct CardView {
    value: String,
    suit: &'static str,
    code: String,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            value: card.value(),
            suit: card.suit.name(),
            code: card.code(),
        }
    }
}

#[derive(Serialize)]
struct DeckView {
    deck_id: String,
    shuffled: bool,
    remaining: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    cards: Option<Vec<CardView>>,
}

impl DeckView {
    fn summary(deck: &Deck) -> Self {
        Self {
            deck_id: deck.id.to_string(),
            shuffled: deck.shuffled,
            remaining: deck.remaining(),
            cards: None,
        }
    }

    fn full(deck: &Deck) -> Self {
        Self {
            cards: Some(deck.cards.iter().map(CardView::from).collect()),
            ..Self::summary(deck)
        }
    }
}

#[derive(Serialize)]
struct DrawView {
    cards: Vec<CardView>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Deck(DeckView),
    Draw(DrawView),
}

async fn run(cli: &CliConfig, toml: Option<&TomlConfig>) -> Result<Output, DeckError> {
    let storage_config = cli.storage_config(toml)?;
    tracing::debug!("Storage config: {:?}", storage_config.backend);

    let storage = build_storage(&storage_config).await?;

    let output = match &cli.command {
        Command::New { .. } => {
            let generator = CardGenerator::new();
            let config = cli.command.generator_config().unwrap_or_default();
            let cards = generator.build(&config)?;
            let deck = storage.create(cards, config.shuffled).await?;
            tracing::info!("Created deck {}", deck.id);
            Output::Deck(DeckView::summary(&deck))
        }
        Command::Open { deck_id } => {
            let deck = storage.get(deck_id).await?;
            Output::Deck(DeckView::full(&deck))
        }
        Command::Draw { deck_id, count } => {
            let drawn = storage.draw(deck_id, *count).await?;
            Output::Draw(DrawView {
                cards: drawn.iter().map(CardView::from).collect(),
            })
        }
    };

    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let toml = match cli.toml_config() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let verbose = cli.verbose || toml.as_ref().is_some_and(TomlConfig::verbose);
    if cli.json_logs || toml.as_ref().is_some_and(TomlConfig::json_logs) {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    match run(&cli, toml.as_ref()).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("{} (category: {:?})", e, e.category());
            eprintln!("❌ {}", e);

            let exit_code = match e.category() {
                ErrorCategory::InvalidInput => 2,
                ErrorCategory::NotFound => 3,
                ErrorCategory::Backend | ErrorCategory::Configuration => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
