use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use felli::game::{self, Choice, Chooser, Game, Presenter, Prompt};
use felli::options::Options;
use felli::{Color, Player};
use tracing_subscriber::EnvFilter;

/// Numbered prompts on stdout, answers read line by line from stdin.
/// An empty line, `q` or end of input cancels.
struct LineChooser<R> {
    input: R,
}

impl<R: BufRead> Chooser for LineChooser<R> {
    fn choose(&mut self, prompt: &Prompt<'_>) -> Choice {
        let labels: Vec<String> = match prompt {
            Prompt::BlackPlayer { players } | Prompt::FirstPlayer { players } => {
                players.iter().map(|p| p.name().to_string()).collect()
            }
            Prompt::Piece { pieces, .. } => pieces
                .iter()
                .map(|piece| match piece.square() {
                    Some(coord) => format!("piece {} at {coord}", piece.id()),
                    None => format!("piece {}", piece.id()),
                })
                .collect(),
            Prompt::Destination { moves, .. } => moves
                .iter()
                .map(|mv| match mv.captured {
                    Some(victim) => format!("{} capturing piece {}", mv.destination, victim.id),
                    None => mv.destination.to_string(),
                })
                .collect(),
        };

        loop {
            println!("{}", prompt.title());
            for (idx, label) in labels.iter().enumerate() {
                println!("  [{}] {label}", idx + 1);
            }
            print!("> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return Choice::Cancel,
                Ok(_) => {}
            }
            let answer = line.trim();
            if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
                return Choice::Cancel;
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=labels.len()).contains(&n) => return Choice::Select(n - 1),
                _ => println!("Enter a number between 1 and {}.", labels.len()),
            }
        }
    }
}

struct TextPresenter;

impl Presenter for TextPresenter {
    fn show(&mut self, game: &Game) {
        println!();
        for row in game.board().rows() {
            let cells: Vec<&str> = row
                .iter()
                .map(|square| match square.piece_color() {
                    Some(Color::Black) => "B",
                    Some(Color::White) => "W",
                    None => ".",
                })
                .collect();
            println!("{:^7}", cells.join(" "));
        }
        println!();
    }

    fn announce_turn(&mut self, player: &Player) {
        println!("Current player: {}", player.name());
    }

    fn game_over(&mut self, winner: Option<&Player>) {
        match winner {
            Some(player) => println!("Game Over! {} has won! Congratulations!", player.name()),
            None => println!("Game Over!"),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let options = match Options::from_args(std::env::args_os()) {
        Ok(options) => options,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let mut game = Game::new(options.player_a, options.player_b);
    let mut chooser = LineChooser {
        input: io::stdin().lock(),
    };

    match game::run(&mut game, &mut chooser, &mut TextPresenter) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
