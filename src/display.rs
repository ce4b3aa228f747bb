use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use recycle_ttt_ai::{BoardGeometry, Cell, GameState, Square, BOARD_LENGTH};

/// Draws the grid, the recycle queue and the turn indicator
pub fn display(state: &GameState, geometry: &BoardGeometry) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (0..BOARD_LENGTH).map(|col| col.to_string()).collect();
    stdout.queue(PrintStyledContent(style(format!("  {}\n", cols))))?;

    for row in 0..BOARD_LENGTH {
        stdout.queue(PrintStyledContent(style(format!("{} ", row))))?;
        for col in 0..BOARD_LENGTH {
            let (mark, colour) = match state.cell(Square::new(row, col)) {
                Cell::X => ("X", Color::Red),
                Cell::O => ("O", Color::Yellow),
                Cell::Empty => (".", Color::DarkBlue),
            };
            stdout.queue(PrintStyledContent(
                style(mark).attribute(Attribute::Bold).with(colour),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }

    let queue: Vec<String> = state
        .queue_squares()
        .map(|square| format!("({}, {})", square.row(), square.col()))
        .collect();
    stdout.queue(PrintStyledContent(style(format!(
        "queue (newest first): {}\n",
        queue.join(" "),
    ))))?;

    if !state.is_over(geometry) {
        stdout.queue(PrintStyledContent(style(format!(
            "{} to move\n",
            state.to_move().mark(),
        ))))?;
    }
    stdout.flush()?;
    Ok(())
}
