//! Terminal renderer
//!
//! Draws a `RenderSnapshot` by scaling the playfield onto a character grid.
//! Holds no game state of its own.

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{Hud, PowerUpKind, Rect as FieldRect, RenderSnapshot, Rgb};

const BACKGROUND: Color = Color::Rgb(10, 10, 20);
const FRAME: Color = Color::Rgb(220, 80, 80);
const DIM: Color = Color::Rgb(100, 100, 130);

/// Frontend-only display options
#[derive(Debug, Clone, Default)]
pub struct UiOptions {
    pub show_help: bool,
    /// Best score this process, if shown
    pub best_score: Option<u64>,
}

pub fn render(frame: &mut Frame, snapshot: &RenderSnapshot, options: &UiOptions) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(FRAME))
        .title(" Brick Breaker ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(255, 100, 100))
                .add_modifier(Modifier::BOLD),
        );

    let area = frame.area();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(hud_line(&snapshot.hud, options)), chunks[0]);

    let field = chunks[1];
    let lines = field_lines(snapshot, field.width as usize, field.height as usize);
    frame.render_widget(Paragraph::new(lines), field);

    if options.show_help {
        frame.render_widget(Paragraph::new(help_line(&snapshot.hud)), chunks[2]);
    }

    if let Some((title, hint, color)) = overlay_text(&snapshot.hud) {
        render_overlay(frame, field, &title, hint, color);
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn hud_line(hud: &Hud, options: &UiOptions) -> Line<'static> {
    let sep = || Span::styled(" │ ", Style::default().fg(Color::DarkGray));
    let mut spans = vec![
        Span::styled(
            format!(" Score: {}", hud.score),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            format!("Level: {}", hud.level),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            format!("Lives: {}", "♥ ".repeat(hud.lives as usize)),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(best) = options.best_score {
        spans.push(sep());
        spans.push(Span::styled(
            format!("Best: {}", best),
            Style::default().fg(Color::Green),
        ));
    }
    Line::from(spans)
}

fn help_line(hud: &Hud) -> Line<'static> {
    let key = |k: &'static str| {
        Span::styled(k, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    };
    let text = |t: &'static str| Span::styled(t, Style::default().fg(DIM));

    let mut spans = vec![text(" ")];
    if hud.game_over {
        spans.extend([key("R"), text(" restart  ")]);
    } else if hud.level_complete {
        spans.extend([key("N"), text(" next level  ")]);
    } else {
        spans.extend([
            key("←→"),
            text(" move  "),
            key("Space"),
            text(" launch  "),
            key("P"),
            text(if hud.paused { " resume  " } else { " pause  " }),
        ]);
    }
    spans.extend([key("Q"), text(" quit")]);
    Line::from(spans)
}

fn overlay_text(hud: &Hud) -> Option<(String, &'static str, Color)> {
    if hud.game_over {
        Some(("GAME OVER".to_string(), "Press R to Restart", Color::Red))
    } else if hud.level_complete {
        Some((
            format!("LEVEL {} COMPLETE!", hud.level),
            "Press N for Next Level",
            Color::Green,
        ))
    } else if hud.paused {
        Some(("PAUSED".to_string(), "Press P to Resume", Color::White))
    } else {
        None
    }
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, hint: &str, color: Color) {
    let w = 30u16.min(area.width);
    let h = 4u16.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    let overlay = Rect::new(x, y, w, h);

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(BACKGROUND));
    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::Gray))),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        overlay,
    );
}

/// Cell span covered by a playfield interval, at least one cell wide
fn cell_span(start: f32, end: f32, scale: f32, cells: usize) -> std::ops::Range<usize> {
    let first = (start.max(0.0) * scale) as usize;
    let last = ((end.max(0.0) * scale) as usize).max(first + 1);
    first.min(cells)..last.min(cells)
}

/// Character grid of the playfield, `width` x `height` cells
pub fn field_lines(snapshot: &RenderSnapshot, width: usize, height: usize) -> Vec<Line<'static>> {
    let sx = width as f32 / SCREEN_WIDTH;
    let sy = height as f32 / SCREEN_HEIGHT;
    let blank = (' ', Style::default().bg(BACKGROUND));
    let mut grid: Vec<Vec<(char, Style)>> = vec![vec![blank; width]; height];

    let fill = |rect: &FieldRect, ch: char, style: Style, grid: &mut Vec<Vec<(char, Style)>>| {
        for row in cell_span(rect.top(), rect.bottom(), sy, height) {
            for col in cell_span(rect.left(), rect.right(), sx, width) {
                grid[row][col] = (ch, style);
            }
        }
    };

    for brick in &snapshot.bricks {
        let style = Style::default().fg(to_color(brick.color)).bg(BACKGROUND);
        fill(&brick.rect, '█', style, &mut grid);

        // Multi-hit bricks show what's left
        if brick.hits > 1 {
            let row = ((brick.rect.center_y() * sy) as usize).min(height.saturating_sub(1));
            let col = ((brick.rect.center_x() * sx) as usize).min(width.saturating_sub(1));
            if row < height && col < width {
                let digit = char::from_digit(brick.hits.min(9), 10).unwrap_or('+');
                grid[row][col] = (
                    digit,
                    Style::default()
                        .fg(Color::White)
                        .bg(to_color(brick.color))
                        .add_modifier(Modifier::BOLD),
                );
            }
        }
    }

    let paddle_style = Style::default()
        .fg(Color::Rgb(180, 200, 255))
        .bg(Color::Rgb(30, 50, 120))
        .add_modifier(Modifier::BOLD);
    fill(&snapshot.paddle.rect, '═', paddle_style, &mut grid);
    if snapshot.paddle.sticky {
        // Glue strip along the paddle top
        let paddle = &snapshot.paddle.rect;
        let row = (paddle.top() * sy) as usize;
        if row > 0 && row <= height {
            for col in cell_span(paddle.left(), paddle.right(), sx, width) {
                grid[row - 1][col] = ('▁', Style::default().fg(Color::Green).bg(BACKGROUND));
            }
        }
    }

    for powerup in &snapshot.powerups {
        let col = (powerup.rect.center_x() * sx) as usize;
        let row = (powerup.rect.center_y() * sy) as usize;
        if col < width && row < height {
            grid[row][col] = (
                powerup_glyph(powerup.kind),
                Style::default()
                    .fg(Color::Black)
                    .bg(to_color(powerup.color))
                    .add_modifier(Modifier::BOLD),
            );
        }
    }

    for ball in &snapshot.balls {
        let col = (ball.center.x.max(0.0) * sx) as usize;
        let row = (ball.center.y.max(0.0) * sy) as usize;
        if col < width && row < height {
            grid[row][col] = (
                '●',
                Style::default()
                    .fg(Color::White)
                    .bg(BACKGROUND)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }

    grid.into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|(ch, style)| Span::styled(String::from(ch), style))
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn powerup_glyph(kind: PowerUpKind) -> char {
    match kind {
        PowerUpKind::Extend => 'E',
        PowerUpKind::Shrink => 'S',
        PowerUpKind::Multiball => 'M',
        PowerUpKind::Fast => 'F',
        PowerUpKind::Slow => 'L',
        PowerUpKind::Sticky => 'G',
    }
}
