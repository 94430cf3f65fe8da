// ============================================================================
// demos/tictactoe.rs — Sketchbook
// Tic-tac-toe played entirely with egui buttons.
// ============================================================================

use crate::app::{Demo, Gpu};
use crate::assets::Assets;
use crate::config::WindowSettings;
use crate::error::DemoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

/// Rows, columns and both diagonals of the 3×3 board (row-major indices).
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Mark>; 9],
    turn: Mark,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [None; 9],
            turn: Mark::X,
        }
    }
}

impl Board {
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Place the current mark. Occupied cells and finished games are ignored.
    pub fn play(&mut self, index: usize) -> bool {
        if index >= self.cells.len() || self.cells[index].is_some() || self.is_over() {
            return false;
        }
        self.cells[index] = Some(self.turn);
        if self.winner().is_none() {
            self.turn = self.turn.other();
        }
        true
    }

    pub fn winner(&self) -> Option<Mark> {
        WINNING_LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.cells[a]?;
            (self.cells[b] == Some(mark) && self.cells[c] == Some(mark)).then_some(mark)
        })
    }

    pub fn is_draw(&self) -> bool {
        self.winner().is_none() && self.cells.iter().all(Option::is_some)
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some() || self.is_draw()
    }

    pub fn status_text(&self) -> String {
        match self.winner() {
            Some(mark) => format!("{} won!", mark.symbol()),
            None if self.is_draw() => "Draw!".to_string(),
            None => format!("{} turn", self.turn.symbol()),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct TicTacToe {
    board: Board,
    clear: [f32; 3],
}

impl Demo for TicTacToe {
    fn settings() -> WindowSettings {
        WindowSettings::new("Tic-Tac-Toe", 330, 500)
    }

    fn init(_gpu: &Gpu, _assets: &Assets) -> Result<Self, DemoError> {
        Ok(Self {
            board: Board::default(),
            clear: [0.1, 0.1, 0.15],
        })
    }

    fn update(&mut self, _gpu: &Gpu, _dt: f32) {}

    fn paint(&self, _pass: &mut wgpu::RenderPass<'_>) {}

    fn paint_ui(&mut self, ctx: &egui::Context, _gpu: &Gpu, _assets: &Assets) {
        egui::CentralPanel::default()
            .frame(egui::Frame::default().inner_margin(10.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(self.board.status_text());
                });
                ui.separator();

                egui::Grid::new("board")
                    .spacing([5.0, 5.0])
                    .show(ui, |ui| {
                        for row in 0..3 {
                            for col in 0..3 {
                                let index = row * 3 + col;
                                let label = self.board.cell(index).map_or("", Mark::symbol);
                                let button =
                                    egui::Button::new(egui::RichText::new(label).size(48.0));
                                if ui.add_sized([100.0, 100.0], button).clicked()
                                    && self.board.play(index)
                                    && self.board.is_over()
                                {
                                    log::info!("{}", self.board.status_text());
                                }
                            }
                            ui.end_row();
                        }
                    });

                ui.add_space(8.0);
                if ui
                    .add_sized([ui.available_width(), 40.0], egui::Button::new("Reset"))
                    .clicked()
                {
                    self.board.reset();
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label("Clear color");
                    ui.color_edit_button_rgb(&mut self.clear);
                });
            });
    }

    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.clear[0] as f64,
            g: self.clear[1] as f64,
            b: self.clear[2] as f64,
            a: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_all(board: &mut Board, moves: &[usize]) {
        for &m in moves {
            assert!(board.play(m), "move {m} rejected");
        }
    }

    #[test]
    fn x_moves_first_and_turns_alternate() {
        let mut board = Board::default();
        assert_eq!(board.status_text(), "X turn");
        board.play(4);
        assert_eq!(board.cell(4), Some(Mark::X));
        assert_eq!(board.turn(), Mark::O);
        assert_eq!(board.status_text(), "O turn");
    }

    #[test]
    fn occupied_cells_are_ignored() {
        let mut board = Board::default();
        board.play(0);
        assert!(!board.play(0));
        assert_eq!(board.cell(0), Some(Mark::X));
        assert_eq!(board.turn(), Mark::O);
        assert!(!board.play(9));
    }

    #[test]
    fn every_line_wins() {
        for line in WINNING_LINES {
            let mut board = Board::default();
            for &cell in &line {
                board.cells[cell] = Some(Mark::O);
            }
            assert_eq!(board.winner(), Some(Mark::O), "line {line:?}");
        }
    }

    #[test]
    fn game_stops_after_a_win() {
        let mut board = Board::default();
        // X: 0, 1, 2 / O: 3, 4
        play_all(&mut board, &[0, 3, 1, 4, 2]);
        assert_eq!(board.winner(), Some(Mark::X));
        assert_eq!(board.status_text(), "X won!");
        assert!(!board.play(8));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let mut board = Board::default();
        // X O X / X O O / O X X
        play_all(&mut board, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(board.is_draw());
        assert_eq!(board.status_text(), "Draw!");
    }

    #[test]
    fn reset_clears_the_board() {
        let mut board = Board::default();
        play_all(&mut board, &[0, 1]);
        board.reset();
        assert_eq!(board, Board::default());
    }
}
