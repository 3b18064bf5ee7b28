use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use salute::config::ShowConfig;
use salute::effects::Effect;
use salute::effects::fireworks::{Display, FireworksEffect};
use salute::effects::sound::Sound;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const FIXED_DT: f32 = 1.0 / 60.0;
/// Past this, rockets and sparks move less than a sub-pixel per tick.
const MAX_SCALE: f32 = 64.0;

#[derive(Parser, Debug)]
#[command(name = "salute", version, about = "Interactive fireworks show in the terminal")]
#[command(after_help = "Click the sky to launch rockets. 'p' pauses, 'q', ESC or Ctrl+C exits.")]
struct Cli {
    /// JSON file with the show script
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Taps needed before the greeting appears
    #[arg(long)]
    target_clicks: Option<u32>,

    /// Greeting text, use \n for line breaks
    #[arg(long)]
    greeting: Option<String>,

    /// Wish text, repeat for several (replaces the configured list)
    #[arg(long = "wish", value_name = "TEXT")]
    wishes: Vec<String>,

    /// Closing credits line
    #[arg(long)]
    credits: Option<String>,

    /// Link shown under the credits
    #[arg(long)]
    credits_link: Option<String>,

    /// Background color as hex (e.g., 1a1b26)
    #[arg(long, value_name = "RRGGBB", value_parser = parse_hex_color)]
    bg_color: Option<(u8, u8, u8)>,

    /// Logical show units per terminal sub-pixel
    #[arg(long, default_value_t = 8.0, value_parser = parse_scale)]
    scale: f32,

    /// Seed for a repeatable show
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the show)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_hex_color(hex: &str) -> Result<(u8, u8, u8), String> {
    let invalid = || format!("invalid hex color {hex:?}, expected RRGGBB (e.g., 1a1b26)");
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

fn parse_scale(s: &str) -> Result<f32, String> {
    let scale: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if scale.is_finite() && scale > 0.0 && scale <= MAX_SCALE {
        Ok(scale)
    } else {
        Err(format!("scale must be in (0, {MAX_SCALE}], got {s}"))
    }
}

/// Turns the two-character sequence `\n` into a line break.
fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ShowConfig> {
    let mut config = match &cli.config {
        Some(path) => ShowConfig::from_path(path)?,
        None => ShowConfig::default(),
    };

    if let Some(n) = cli.target_clicks {
        config.target_clicks = n;
    }
    if let Some(greeting) = &cli.greeting {
        config.greeting = unescape(greeting);
    }
    if !cli.wishes.is_empty() {
        config.wishes = cli.wishes.iter().map(|w| unescape(w)).collect();
    }
    if let Some(credits) = &cli.credits {
        config.credits_text = unescape(credits);
    }
    if let Some(link) = &cli.credits_link {
        config.credits_link = Some(link.clone());
    }

    config.validate()?;
    Ok(config)
}

fn run_effect<E: Effect, W: Write>(effect: &mut E, stdout: &mut W) -> std::io::Result<()> {
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;

    loop {
        let wait = (FIXED_DT - accumulator).max(0.001);
        if event::poll(Duration::from_secs_f32(wait))? {
            let event = event::read()?;
            match &event {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    // Pass non-exit key events to the effect
                    effect.handle_event(&event);
                }
                Event::Resize(cols, rows) => {
                    effect.resize(*cols as usize, *rows as usize * 2);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {
                    effect.handle_event(&event);
                }
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        let mut stepped = false;
        while accumulator >= FIXED_DT {
            effect.update(FIXED_DT);
            accumulator -= FIXED_DT;
            stepped = true;
        }

        if stepped {
            effect.render(stdout)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}");
            return Err(e);
        }
    };
    let display = Display {
        scale: cli.scale,
        background: cli.bg_color.unwrap_or((0, 0, 0)),
    };

    let (cols, rows) = terminal::size().context("cannot read terminal size")?;
    if cols == 0 || rows == 0 {
        bail!("terminal reports a zero-sized window");
    }
    log::info!("Starting show on a {cols}x{rows} terminal, scale {}", display.scale);

    let mut effect = FireworksEffect::new(
        config,
        Sound::open(cli.seed),
        display,
        cli.seed,
        cols as usize,
        rows as usize * 2,
    );

    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout());
    terminal::enable_raw_mode()?;
    let result = execute!(
        stdout,
        EnterAlternateScreen,
        Hide,
        Clear(ClearType::All),
        EnableMouseCapture,
        EnableFocusChange
    )
    .and_then(|()| run_effect(&mut effect, &mut stdout));

    // Restore the terminal whatever happened above
    let restored = execute!(
        stdout,
        DisableFocusChange,
        DisableMouseCapture,
        Show,
        LeaveAlternateScreen
    );
    terminal::disable_raw_mode()?;

    log::info!(
        "Show ended in phase {:?} after {} clicks",
        effect.show().phase(),
        effect.show().sequencer().total_clicks()
    );
    result?;
    restored?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("1a1b26"), Ok((0x1a, 0x1b, 0x26)));
        assert_eq!(parse_hex_color("#FFFFFF"), Ok((255, 255, 255)));
        assert!(parse_hex_color("12345").is_err());
        assert!(parse_hex_color("gg0000").is_err());
        assert!(parse_hex_color("ééé").is_err());
    }

    #[test]
    fn scale_must_be_in_range() {
        assert_eq!(parse_scale("4"), Ok(4.0));
        assert!(parse_scale("0").is_err());
        assert!(parse_scale("-2").is_err());
        assert!(parse_scale("inf").is_err());
        assert!(parse_scale("wide").is_err());
        assert_eq!(parse_scale("64"), Ok(64.0));
        assert!(parse_scale("65").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "salute",
            "--target-clicks",
            "3",
            "--greeting",
            "HI\\nTHERE",
            "--wish",
            "ONE",
            "--wish",
            "TWO",
            "--credits-link",
            "example.org",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.target_clicks, 3);
        assert_eq!(config.greeting, "HI\nTHERE");
        assert_eq!(config.wishes, vec!["ONE", "TWO"]);
        assert_eq!(config.credits_link.as_deref(), Some("example.org"));
        assert_eq!(config.credits_text, ShowConfig::default().credits_text);
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let cli = Cli::parse_from(["salute", "--target-clicks", "0"]);
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
