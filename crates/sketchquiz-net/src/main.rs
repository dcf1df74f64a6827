//! Sketch Quiz headless client.
//!
//! - `sketchquiz host` - open a room and print its shareable link
//! - `sketchquiz join <ROOM|LINK>` - join an existing room
//!
//! Stdin drives the session: `/start`, `/words`, `/pick <n>`, `/hint`,
//! `/rank`, `/quit`; any other line is chat (and a guess).

use std::cell::RefCell;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sketchquiz_core::{GameEvent, GameObserver};
use sketchquiz_net::{
    create_session, join_session, new_engine, Endpoint, NullCanvas, Room, RoomEvent,
    SessionConfig,
};
use sketchquiz_protocol::RoomId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sketchquiz")]
#[command(about = "Peer-to-peer draw and guess", version)]
struct Cli {
    /// Session config (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Name shown to other players
    #[arg(short, long, global = true, default_value = "player")]
    nickname: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a new room
    Host {
        /// Address to bind (overrides the config file)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Page the shareable link points at
        #[arg(long, default_value = "https://sketchquiz.local/")]
        link_base: String,
    },

    /// Join a room by id or shared link
    Join {
        room: String,
    },
}

/// Queues engine notifications so the loop can print them with the engine
/// at hand.
struct EventLog(Rc<RefCell<Vec<GameEvent>>>);

impl GameObserver for EventLog {
    fn on_game_state_change(&mut self, event: GameEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sketchquiz_net=info,sketchquiz_core=info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    match cli.command {
        Commands::Host { bind, link_base } => {
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            let relay = create_session(&config).await?;
            let room_id = relay.room_id();
            println!("Room: {room_id}");
            println!("Link: {}", room_id.to_url(&link_base));
            let room = Room::new(relay, new_engine(&config), NullCanvas, &cli.nickname);
            run(room, &config).await
        }
        Commands::Join { room } => {
            let room_id =
                RoomId::from_url(&room).with_context(|| format!("invalid room {room}"))?;
            let relay = join_session(room_id, &config).await?;
            let room = Room::new(relay, new_engine(&config), NullCanvas, &cli.nickname);
            run(room, &config).await
        }
    }
}

async fn run<T: Endpoint>(mut room: Room<T, NullCanvas>, config: &SessionConfig) -> Result<()> {
    let game_events = Rc::new(RefCell::new(Vec::new()));
    room.engine_mut()
        .subscribe(Box::new(EventLog(game_events.clone())));

    let (tx, mut lines) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let tick = config.tick_interval();
    let mut interval = tokio::time::interval(tick);
    let mut last = Instant::now();
    let mut choices: Vec<String> = Vec::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let delta = now - last;
                last = now;

                for event in room.pump(delta, now) {
                    print_room_event(&event);
                    if event == RoomEvent::HostLost {
                        return Ok(());
                    }
                }
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    room.disconnect();
                    break;
                };
                if !handle_line(&mut room, line.trim(), &mut choices) {
                    room.disconnect();
                    break;
                }
            }
        }

        let drained: Vec<GameEvent> = game_events.borrow_mut().drain(..).collect();
        for event in drained {
            describe(&mut room, event, &mut choices);
        }
    }

    info!("Bye");
    Ok(())
}

/// Returns false when the user asked to quit.
fn handle_line<T: Endpoint>(
    room: &mut Room<T, NullCanvas>,
    line: &str,
    choices: &mut Vec<String>,
) -> bool {
    let now = Instant::now();
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => {}
        Some("/quit") => return false,
        Some("/start") => {
            if !room.start_game(now) {
                println!("Cannot start yet");
            }
        }
        Some("/words") => {
            if room.engine().is_my_turn() && choices.is_empty() {
                *choices = room.engine_mut().word_choices();
            }
            print_choices(choices);
        }
        Some("/pick") => {
            let picked = parts
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| choices.get(i).cloned());
            match picked {
                Some(word) if room.choose_word(&word, now) => choices.clear(),
                _ => println!("Usage: /pick <1-{}> on your turn", choices.len().max(1)),
            }
        }
        Some("/hint") => println!("Hint: {}", room.engine().hint()),
        Some("/rank") => print_ranking(room),
        Some(_) => {
            if let Some(event) = room.submit_chat(line, now) {
                print_room_event(&event);
            }
        }
    }
    true
}

fn describe<T: Endpoint>(
    room: &mut Room<T, NullCanvas>,
    event: GameEvent,
    choices: &mut Vec<String>,
) {
    let engine = room.engine();
    let drawer = engine
        .current_drawer()
        .and_then(|id| engine.player(id))
        .map(|p| p.nickname.clone())
        .unwrap_or_default();

    match event {
        GameEvent::TurnStart => {
            println!(
                "Round {}/{}: {} is drawing",
                engine.current_round(),
                engine.total_rounds(),
                drawer
            );
            if engine.is_my_turn() {
                *choices = room.engine_mut().word_choices();
                print_choices(choices);
            }
        }
        GameEvent::Drawing => match engine.secret_word() {
            Some(word) => println!("You are drawing: {word}"),
            None => println!("Guess! {}", engine.hint()),
        },
        GameEvent::Hint => println!("Hint: {}", engine.hint()),
        GameEvent::TurnEnd => match engine.secret_word() {
            Some(word) => println!("Turn over. The word was {word}"),
            None => println!("Turn over"),
        },
        GameEvent::GameEnd => {
            println!("Game over!");
            print_ranking(room);
        }
    }
}

fn print_choices(choices: &[String]) {
    if choices.is_empty() {
        println!("No words to pick from");
        return;
    }
    for (i, word) in choices.iter().enumerate() {
        println!("  /pick {} -> {}", i + 1, word);
    }
}

fn print_ranking<T: Endpoint>(room: &Room<T, NullCanvas>) {
    for (place, entry) in room.engine().ranking().iter().enumerate() {
        println!("{:>2}. {:<16} {:>5}", place + 1, entry.nickname, entry.score);
    }
}

fn print_room_event(event: &RoomEvent) {
    match event {
        RoomEvent::Chat {
            nickname, message, ..
        } => println!("<{nickname}> {message}"),
        RoomEvent::CorrectGuess {
            nickname, score, ..
        } => println!("* {nickname} guessed it! (+{score})"),
        RoomEvent::Withheld { nickname, .. } => println!("<{nickname}> (answer hidden)"),
        RoomEvent::PeerCount(count) => println!("* {count} in the room"),
        RoomEvent::HostLost => println!("* The host left; session over"),
    }
}
