use std::io::Write;

use common::render::{Frame, Renderer};
use common::session::SessionPhase;
use common::snake::FoodKind;
use common::{log, log_warn};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draws the field as one character per cell.
pub struct TextRenderer<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, frame: &Frame<'_>) -> std::io::Result<()> {
        let text = draw_field(frame);
        if self.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }
        write!(self.out, "{}", text)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) {
        if let Err(e) = self.draw(frame) {
            log_warn!("Failed to draw frame: {}", e);
        }
    }
}

/// Built-in kinds keep their classic glyphs; custom kinds show the first
/// letter of their name in upper case.
fn food_glyph(kind: &FoodKind) -> char {
    match kind.name.as_str() {
        "normal" => '*',
        "medium" => '+',
        "rare" => '$',
        name => name
            .chars()
            .find(|c| c.is_ascii_alphanumeric())
            .map_or('*', |c| c.to_ascii_uppercase()),
    }
}

pub fn draw_field(frame: &Frame<'_>) -> String {
    let columns = (frame.width / frame.cell_size).max(0) as usize;
    let rows = (frame.height / frame.cell_size).max(0) as usize;
    let mut grid = vec![vec!['.'; columns]; rows];

    let mut put = |x: i32, y: i32, glyph: char| {
        let (col, row) = (x / frame.cell_size, y / frame.cell_size);
        if col >= 0 && row >= 0 && (col as usize) < columns && (row as usize) < rows {
            grid[row as usize][col as usize] = glyph;
        }
    };

    for obstacle in frame.obstacles {
        put(obstacle.x, obstacle.y, '#');
    }
    if let Some(food) = frame.food {
        put(food.position.x, food.position.y, food_glyph(&food.kind));
    }
    for (i, cell) in frame.body.iter().enumerate().rev() {
        put(cell.x, cell.y, if i == 0 { '@' } else { 'o' });
    }

    let mut text = String::with_capacity((columns + 3) * (rows + 4));
    let border = format!("+{}+\n", "-".repeat(columns));
    text.push_str(&border);
    for row in grid {
        text.push('|');
        text.extend(row);
        text.push_str("|\n");
    }
    text.push_str(&border);
    text.push_str(&format!(
        "Score: {}  Level: {}  Speed: {}\n",
        frame.score, frame.level, frame.speed
    ));
    match frame.phase {
        SessionPhase::Running => {}
        SessionPhase::Paused => text.push_str("PAUSED - 'p' to resume, 's' to save\n"),
        SessionPhase::Terminated(reason) => text.push_str(&format!("GAME OVER ({})\n", reason)),
    }
    text
}

/// Headless renderer: logs only when score, level or phase change.
#[derive(Default)]
pub struct StatusRenderer {
    last: Option<(u32, u32, SessionPhase)>,
}

impl Renderer for StatusRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        let current = (frame.score, frame.level, frame.phase);
        if self.last == Some(current) {
            return;
        }
        self.last = Some(current);
        log!(
            "Score: {}, Level: {}, Length: {}, Phase: {:?}",
            frame.score,
            frame.level,
            frame.body.len(),
            frame.phase
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::SessionRng;
    use common::snake::{SnakeGameState, SnakeSettings};

    fn classic_state() -> SnakeGameState {
        let mut rng = SessionRng::new(5);
        SnakeGameState::new(SnakeSettings::classic(), &mut rng).unwrap()
    }

    #[test]
    fn test_draw_field_marks_snake_and_food() {
        let state = classic_state();
        let frame = Frame::new(&state, SessionPhase::Running);
        let text = draw_field(&frame);

        let lines: Vec<&str> = text.lines().collect();
        // border + 24 rows + border + status
        assert_eq!(lines.len(), 27);
        assert_eq!(lines[1].len(), 32 + 2);
        let field: String = lines[1..25].concat();
        assert_eq!(field.matches('@').count(), 1);
        assert_eq!(field.matches('o').count(), 2);
        assert_eq!(field.matches('*').count(), 1);
        // head at (100, 100) is column 5 of row 5
        assert_eq!(lines[1 + 5].chars().nth(1 + 5), Some('@'));
        assert!(text.contains("Score: 0  Level: 1  Speed: 10"));
    }

    #[test]
    fn test_draw_field_shows_pause_banner() {
        let state = classic_state();
        let frame = Frame::new(&state, SessionPhase::Paused);
        assert!(draw_field(&frame).contains("PAUSED"));
    }

    #[test]
    fn test_text_renderer_writes_frame() {
        let state = classic_state();
        let mut renderer = TextRenderer::new(Vec::new(), false);
        renderer.render(&Frame::new(&state, SessionPhase::Running));
        let written = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(written.starts_with('+'));
        assert!(!written.contains(CLEAR_SCREEN));
    }

    #[test]
    fn test_food_glyph_by_kind() {
        assert_eq!(food_glyph(&FoodKind::new("normal", 1, Some(40))), '*');
        assert_eq!(food_glyph(&FoodKind::new("medium", 2, Some(30))), '+');
        assert_eq!(food_glyph(&FoodKind::new("rare", 3, Some(20))), '$');
    }

    #[test]
    fn test_equal_value_kinds_get_distinct_glyphs() {
        let apple = FoodKind::new("apple", 2, None);
        let berry = FoodKind::new("berry", 2, None);
        assert_eq!(food_glyph(&apple), 'A');
        assert_eq!(food_glyph(&berry), 'B');
        assert_eq!(food_glyph(&FoodKind::new("", 1, None)), '*');
    }
}
