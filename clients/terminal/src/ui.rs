use crate::app::{App, MIN_GAME_HEIGHT, MIN_GAME_WIDTH};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, List, ListItem, Paragraph, Widget, Wrap},
};
use tennis_core::{Paddle, Screen, Side, Stroke, View};

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Create layout with title and content
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        // Render title
        let title = Paragraph::new("🎾 Tennis Terminal Client 🎾")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Tennis")
                    .title_alignment(Alignment::Center),
            );
        title.render(chunks[0], buf);

        // Render screen-specific content
        match self.screen() {
            Screen::Menu => self.render_menu_screen(chunks[1], buf),
            Screen::Playing => self.render_game_screen(chunks[1], buf),
            Screen::Finished => self.render_finished_screen(chunks[1], buf),
        }
    }
}

/// Court-to-cell mapping for the drawn field
struct CourtGrid {
    area: Rect,
    court_width: f32,
    court_height: f32,
}

impl CourtGrid {
    fn column(&self, x: f32) -> u16 {
        let cell = (x / self.court_width * f32::from(self.area.width)).floor();
        self.area.x + (cell.max(0.0) as u16).min(self.area.width.saturating_sub(1))
    }

    fn row(&self, y: f32) -> u16 {
        let cell = (y / self.court_height * f32::from(self.area.height)).floor();
        self.area.y + (cell.max(0.0) as u16).min(self.area.height.saturating_sub(1))
    }
}

impl App {
    fn render_menu_list(&self, area: Rect, buf: &mut Buffer, title: &str) {
        let items: Vec<ListItem> = self
            .get_menu_items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.menu_state.selected {
                    Style::default().fg(Color::Yellow).bg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(*item).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(title)
                    .title_alignment(Alignment::Center),
            )
            .highlight_symbol("► ");

        list.render(area, buf);
    }

    fn render_coupon(&self, area: Rect, buf: &mut Buffer) {
        let (text, color) = match self.game.coupon() {
            Some(code) => (format!("Your discount code:\n\n{code}"), Color::Green),
            None => (
                format!(
                    "Beat the bot to win a {}% discount code",
                    self.game.config().reward.discount_percent
                ),
                Color::DarkGray,
            ),
        };

        Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Reward")
                    .title_alignment(Alignment::Center),
            )
            .render(area, buf);
    }

    fn render_menu_screen(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(5),
                Constraint::Min(3),
            ])
            .split(area);

        self.render_menu_list(chunks[0], buf, "Main Menu");
        self.render_coupon(chunks[1], buf);
        render_controls(chunks[2], buf);
    }

    fn render_finished_screen(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Min(4),
            ])
            .split(area);

        let (headline, color) = match self.view().and_then(|view| view.winner) {
            Some(Side::Player) => ("You beat the bot!", Color::Green),
            _ => ("The bot takes the game", Color::Red),
        };
        let call = self.view().map(|view| view.call).unwrap_or_default();

        Paragraph::new(vec![
            Line::from(headline).style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Line::from(call),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title("Game Over")
                .title_alignment(Alignment::Center),
        )
        .render(chunks[0], buf);

        self.render_coupon(chunks[1], buf);
        self.render_menu_list(chunks[2], buf, "Next");
    }

    fn render_game_screen(&self, area: Rect, buf: &mut Buffer) {
        // Check if terminal is too small
        if self.ui_paused {
            self.field_area.set(None);
            let message = format!(
                "Terminal too small!\n\nMinimum required: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal to continue playing.",
                MIN_GAME_WIDTH,
                MIN_GAME_HEIGHT,
                self.terminal_size.0,
                self.terminal_size.1
            );

            let resize_widget = Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .title("⚠ Resize Required ⚠")
                        .title_alignment(Alignment::Center),
                );
            resize_widget.render(area, buf);
            return;
        }

        let (Some(view), Some(game_area)) = (self.view(), self.calculate_centered_game_area(area))
        else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Score
                Constraint::Min(10),   // Court
                Constraint::Length(3), // Messages
            ])
            .split(game_area);

        let status = match view.countdown {
            Some(0) => "Go!".to_string(),
            Some(n) => format!("Serve in {n}"),
            None if view.receiver == Side::Player => "Your return".to_string(),
            None => "Bot to return".to_string(),
        };
        let score_content = format!("{}    {}", view.call, status);

        Paragraph::new(score_content)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Score")
                    .title_alignment(Alignment::Center),
            )
            .render(chunks[0], buf);

        self.render_court(chunks[1], buf, &view);

        let latest = self.messages.last().cloned().unwrap_or_default();
        Paragraph::new(latest)
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Z/X: Backhand/Forehand  ←/→ or mouse: Move  ESC: Menu")
                    .title_alignment(Alignment::Center),
            )
            .render(chunks[2], buf);
    }

    fn render_court(&self, area: Rect, buf: &mut Buffer, view: &View) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Court")
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            self.field_area.set(None);
            return;
        }
        self.field_area.set(Some(inner));

        let grid = CourtGrid {
            area: inner,
            court_width: view.court_width,
            court_height: view.court_height,
        };

        // Net
        let net_row = grid.row(view.court_height / 2.0);
        let net = "┄".repeat(usize::from(inner.width));
        buf.set_string(inner.x, net_row, net, Style::default().fg(Color::DarkGray));

        draw_paddle(
            buf,
            &grid,
            &view.bot,
            view.paddle_width,
            Color::Red,
            view.bot_swinging.then_some(view.bot_facing),
            Side::Bot,
        );
        draw_paddle(
            buf,
            &grid,
            &view.player,
            view.paddle_width,
            Color::Green,
            view.player_swinging.then_some(view.player_facing),
            Side::Player,
        );

        buf.set_string(
            grid.column(view.ball.pos.x),
            grid.row(view.ball.pos.y),
            "●",
            Style::default().fg(Color::Yellow),
        );

        if let Some(n) = view.countdown {
            let text = if n == 0 { "GO".to_string() } else { n.to_string() };
            let x = inner.x + inner.width.saturating_sub(text.len() as u16) / 2;
            let y = net_row.saturating_sub(2).max(inner.y);
            buf.set_string(
                x,
                y,
                text,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            );
        }
    }
}

/// Draw a paddle, with a swing mark on the struck side
fn draw_paddle(
    buf: &mut Buffer,
    grid: &CourtGrid,
    paddle: &Paddle,
    width: f32,
    color: Color,
    swing: Option<Stroke>,
    side: Side,
) {
    let left = grid.column(paddle.x);
    let right = grid.column(paddle.x + width).max(left);
    let row = grid.row(paddle.y);
    let body = "█".repeat(usize::from(right - left + 1));
    buf.set_string(left, row, body, Style::default().fg(color));

    let Some(stroke) = swing else {
        return;
    };
    // Forehand is the owner's right: screen right for the player, left for the bot
    let on_screen_right = matches!(
        (side, stroke),
        (Side::Player, Stroke::Forehand) | (Side::Bot, Stroke::Backhand)
    );
    let (x, mark) = if on_screen_right {
        (right.saturating_add(1), "◣")
    } else {
        (left.saturating_sub(1), "◢")
    };
    if x >= grid.area.x && x < grid.area.x + grid.area.width {
        buf.set_string(x, row, mark, Style::default().fg(Color::White));
    }
}

fn render_controls(area: Rect, buf: &mut Buffer) {
    let text = vec![
        Line::from("←/→ or A/D: move    mouse: follow pointer"),
        Line::from("Z: backhand    X: forehand    (or left/right click)"),
        Line::from("First to four points, win by two from deuce"),
        Line::from("ENTER: select    ESC: back    Q: quit"),
    ];
    Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title("Controls")
                .title_alignment(Alignment::Center),
        )
        .render(area, buf);
}
