use clap::Parser;
use domino_client::{ClientMirror, DominoClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Text client for the domino server")]
struct Args {
    /// Server address to connect to
    #[arg(short, long, default_value = "127.0.0.1:50051")]
    addr: String,

    /// Name shown to other players
    #[arg(short, long, value_parser = non_empty)]
    name: String,
}

fn non_empty(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err("name must not be empty".into())
    } else {
        Ok(trimmed.to_string())
    }
}

enum Input {
    Play(usize),
    Hand,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let mut words = line.split_whitespace();
    match (words.next()?, words.next()) {
        ("play", Some(slot)) => slot.parse().ok().map(Input::Play),
        ("hand", None) => Some(Input::Hand),
        ("quit", None) => Some(Input::Quit),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let client = DominoClient::connect(&args.addr).await?;
    let (me, others) = client.join(&args.name).await?;
    println!("Joined as {} ({}, {})", me.name, me.id, me.color);
    let mut mirror = ClientMirror::new(me, others);
    client.request_cards().await?;

    println!("Commands: play <slot> | hand | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut seen_log = 0;

    loop {
        tokio::select! {
            update = client.next_update() => {
                let Some(update) = update? else {
                    println!("Server closed the connection");
                    break;
                };
                mirror.apply(update)?;
                for line in &mirror.log()[seen_log..] {
                    println!("> {line}");
                }
                seen_log = mirror.log().len();
                println!("{mirror}");
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Some(Input::Play(slot)) => {
                        if !mirror.presumed_legal(slot) {
                            println!("Slot {slot} doesn't look playable; sending anyway");
                        }
                        client.send_move(slot).await?;
                    }
                    Some(Input::Hand) => client.request_cards().await?,
                    Some(Input::Quit) => break,
                    None => println!("Commands: play <slot> | hand | quit"),
                }
            }
        }
    }

    if let Err(e) = client.disconnect("quit").await {
        tracing::debug!(error = %e, "disconnect failed");
    }
    Ok(())
}
