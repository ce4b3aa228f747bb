use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};

use std::io::{stdin, stdout, Write};

use recycle_ttt_ai::*;

mod display;
use display::display;

fn main() -> Result<()> {
    let geometry = BoardGeometry::new();
    let mut state = GameState::initial();
    // keep the transposition table out here so AI moves can re-use it
    let mut transposition_table = TranspositionTable::new();

    let stdin = stdin();

    println!("Welcome to recycle tic-tac-toe\n");
    println!(
        "Each side keeps at most {} pieces; placing another removes your oldest piece,",
        BOARD_LENGTH
    );
    println!("and the square it vacates is off limits for that move.\n");

    let mut ai_players = (false, false);

    // choose AI control of X
    loop {
        let mut buffer = String::new();
        print!("Is X AI controlled? y/n: ");
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some(_letter @ 'y') => {
                ai_players.0 = true;
                break;
            }
            Some(_letter @ 'n') => break,
            _ => println!("Unknown answer given"),
        }
    }

    // choose AI control of O
    loop {
        let mut buffer = String::new();
        print!("Is O AI controlled? y/n: ");
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some(_letter @ 'y') => {
                ai_players.1 = true;
                break;
            }
            Some(_letter @ 'n') => break,
            _ => println!("Unknown answer given"),
        }
    }

    // game loop
    loop {
        display(&state, &geometry)?;

        if let Some(winner) = state.winner(&geometry) {
            println!("{} wins!", winner.mark());
            break;
        }

        let mover = state.to_move();
        let ai_turn = match mover {
            Player::X => ai_players.0,
            Player::O => ai_players.1,
        };

        let square = if ai_turn {
            // slow down play if both players are AI
            if ai_players == (true, true) {
                std::thread::sleep(std::time::Duration::new(1, 0));
            }

            let progress = ProgressBar::new_spinner();
            progress.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}"));
            progress.enable_steady_tick(100);
            let hook_bar = progress.clone();

            let mut solver = Solver::new_with_transposition_table(
                state.clone(),
                std::mem::take(&mut transposition_table),
            )
            .with_progress_hook(Box::new(move |decided, budget| {
                if decided % 256 == 0 {
                    hook_bar.set_message(&format!(
                        "solving: {} positions decided, depth budget {}",
                        decided, budget,
                    ));
                }
            }));

            let (winner, depth_to_mate) = solver.solve();
            let line = solver.principal_line();
            transposition_table = solver.into_transposition_table();
            progress.finish_and_clear();

            let ply_string = if depth_to_mate == 1 { "ply" } else { "plies" };
            if winner == mover {
                println!(
                    "{} can force a win in {} {}.",
                    mover.mark(),
                    depth_to_mate,
                    ply_string
                );
            } else {
                println!(
                    "{} can hold out for {} {} at best.",
                    mover.mark(),
                    depth_to_mate,
                    ply_string
                );
            }

            let next = line
                .get(1)
                .and_then(|child| child.last_move())
                .ok_or_else(|| anyhow!("solved position has no continuation"))?;
            println!("{} plays ({}, {})", mover.mark(), next.row(), next.col());
            next

        // human player
        } else {
            print!("Move input (row col) > ");
            stdout().flush().expect("failed to flush to stdout!");
            let mut input_str = String::new();
            stdin.read_line(&mut input_str)?;

            let mut parts = input_str
                .split_whitespace()
                .map(|part| part.parse::<usize>());
            match (parts.next(), parts.next()) {
                (Some(Ok(row)), Some(Ok(col))) if row < BOARD_LENGTH && col < BOARD_LENGTH => {
                    Square::new(row, col)
                }
                _ => {
                    println!(
                        "Moves are entered as 'row col', each between 0 and {}",
                        BOARD_LENGTH - 1
                    );
                    continue;
                }
            }
        };

        state = match state.play(square, &geometry) {
            Ok(next) => next,
            Err(err) => {
                println!("{}", err);
                // try the move again
                continue;
            }
        };
    }
    Ok(())
}
