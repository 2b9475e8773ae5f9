use clap::Parser;
use interval_trainer::config::check_start_pitch;
use interval_trainer::playback::AudioOutput;
use interval_trainer::{
    start_session, Command, Config, Effect, MidiFileOutput, MusicXmlRenderer, NotationRenderer, Pitch,
    Player, Settings, SilentOutput,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "interval-trainer", about = "Sight-sing intervals from a displayed pitch")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Starting pitch, e.g. A3 or F#3
    #[arg(short, long)]
    start: Option<Pitch>,
    /// Seed for a reproducible drill
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    no_double_accidentals: bool,
    #[arg(long)]
    no_play_on_reveal: bool,
    /// Do not write or play any audio
    #[arg(long)]
    silent: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let output: Box<dyn AudioOutput> = if args.silent {
        Box::new(SilentOutput)
    } else {
        Box::new(MidiFileOutput::in_temp_dir(config.midi_player.clone()))
    };
    let mut player = Player::new(output, config.tempo);
    let mut renderer = MusicXmlRenderer::in_temp_dir().with_engraver(config.engraver.clone());

    let mut session = match start_session(&config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    print_banner();
    run_effects(session.opening_effects(), &mut player, &mut renderer);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                print_help();
                continue;
            }
        };

        match session.apply(command) {
            Ok(effects) => {
                if !run_effects(effects, &mut player, &mut renderer) {
                    break;
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

fn load_config(args: &Args) -> Result<Config, interval_trainer::TrainerError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(start) = args.start {
        check_start_pitch(&start)?;
        config.start_pitch = start;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_double_accidentals {
        config.selector.allow_double_accidentals = false;
    }
    if args.no_play_on_reveal {
        config.play_on_reveal = false;
    }
    Ok(config)
}

/// Carry out effects in order. Returns false once the drill should end.
fn run_effects<O: AudioOutput, R: NotationRenderer>(
    effects: Vec<Effect>,
    player: &mut Player<O>,
    renderer: &mut R,
) -> bool {
    for effect in effects {
        match effect {
            Effect::ShowCurrent(pitch) => println!("Current pitch:   {}", pitch),
            Effect::ShowInterval(Some(interval)) => println!("Target interval: {}", interval),
            Effect::ShowInterval(None) => {}
            Effect::Play(pitch) => {
                if let Err(e) = player.play_pitch(&pitch) {
                    eprintln!("Playback failed: {}", e);
                }
            }
            Effect::Render(pitch) => match renderer.render(&pitch) {
                Ok(path) => println!("Notation:        {}", path.display()),
                Err(e) => eprintln!("Rendering failed: {}", e),
            },
            Effect::ShowSettings(settings) => print_settings(settings),
            Effect::Quit => return false,
        }
    }
    true
}

fn print_banner() {
    println!("I N T E R V A L   T R A I N E R");
    println!();
    print_help();
}

fn print_help() {
    for command in Command::ALL {
        println!("  {}  {}", command.key(), command.label());
    }
    println!();
}

fn print_settings(settings: Settings) {
    let mark = |on: bool| if on { "x" } else { " " };
    println!(
        "[{}] Play the target pitch when revealing it   [{}] Allow double accidentals",
        mark(settings.play_on_reveal),
        mark(settings.allow_double_accidentals)
    );
}
