use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};
use crate::app::{App, CalcField, InputMode, Screen, SERVER_IP};
use crate::calculator::format_money;
use crate::chat::ChatRole;
use crate::methods::{Difficulty, MoneyMethod};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Dashboard => render_dashboard(app, frame, body_area),
        Screen::Methods => render_methods_screen(app, frame, body_area),
        Screen::Calculator => render_calculator_screen(app, frame, body_area),
        Screen::Assistant => render_assistant_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    if app.notification.is_some() {
        render_notification(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let tab = |label: &'static str, screen: Screen| {
        if app.screen == screen {
            Span::styled(
                format!(" {} ", label),
                Style::default().fg(Color::Black).bg(Color::Yellow).bold(),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray))
        }
    };

    let title = Line::from(vec![
        Span::styled(" DONUT GUIDE ", Style::default().fg(Color::Yellow).bold()),
        tab("1 Overview", Screen::Dashboard),
        tab("2 Methods", Screen::Methods),
        tab("3 Calculator", Screen::Calculator),
        tab("4 Assistant", Screen::Assistant),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen {
        Screen::Dashboard => " OVERVIEW ",
        Screen::Methods => " METHODS ",
        Screen::Calculator => " CALC ",
        Screen::Assistant => " AI ",
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match (app.screen, app.input_mode) {
        (Screen::Dashboard, _) => vec![
            Span::styled(" c ", key_style),
            Span::styled(" copy IP ", label_style),
            Span::styled(" s ", key_style),
            Span::styled(" share ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" next tab ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Methods, _) => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" f ", key_style),
            Span::styled(" filter ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" next tab ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Calculator, _) => vec![
            Span::styled(" Tab/j/k ", key_style),
            Span::styled(" field ", label_style),
            Span::styled(" 0-9 ", key_style),
            Span::styled(" type ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Assistant, InputMode::Normal) => vec![
            Span::styled(" i ", key_style),
            Span::styled(" ask ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" next tab ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Assistant, InputMode::Editing) => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
        ],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::LightRed,
        Difficulty::Extreme => Color::Red,
    }
}

fn render_dashboard(app: &mut App, frame: &mut Frame, area: Rect) {
    let [hero_area, ip_area, picks_area, tips_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(6),
    ])
    .areas(area);

    let hero = Paragraph::new(vec![
        Line::from(Span::styled(
            "Master the Economy",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(
            "The ultimate unofficial companion for Donut SMP. Maximize profits, \
             calculate farm yields, and dominate the server.",
        ),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    frame.render_widget(hero, hero_area);

    let ip_banner = Paragraph::new(Line::from(vec![
        Span::styled("Join the server: ", Style::default().fg(Color::Gray)),
        Span::styled(SERVER_IP, Style::default().fg(Color::Green).bold()),
        Span::styled("  (press 'c' to copy)", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Server "));
    frame.render_widget(ip_banner, ip_area);

    let picks: Vec<ListItem> = app
        .catalog
        .top_beginner_picks()
        .iter()
        .map(|m| method_list_item(m))
        .collect();
    let picks_list = List::new(picks).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Top Beginner Strategies "),
    );
    frame.render_widget(picks_list, picks_area);

    let tips = Paragraph::new(vec![
        Line::from(" \u{2022} Start with a basic pumpkin/melon farm. Zero redstone to start manually."),
        Line::from(" \u{2022} Always vote! Voting keys can drop huge amounts of cash or spawners."),
        Line::from(" \u{2022} Check /warp shops for cheaper spawners than the server shop."),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(" Quick Tips "));
    frame.render_widget(tips, tips_area);
}

fn method_list_item(method: &MoneyMethod) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(method.title.clone(), Style::default().fg(Color::White).bold()),
            Span::raw("  "),
            Span::styled(
                method.difficulty.display_name(),
                Style::default().fg(difficulty_color(method.difficulty)),
            ),
            Span::raw("  "),
            Span::styled(
                method.estimated_return.clone(),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {}", method.category.display_name()),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn render_methods_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);

    let filter_label = match app.category_filter {
        Some(category) => format!(" Methods: {} ", category.display_name()),
        None => " Methods: All ".to_string(),
    };

    let methods = app.visible_methods();
    let items: Vec<ListItem> = methods.iter().map(|m| method_list_item(m)).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(filter_label),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let selected = app
        .methods_state
        .selected()
        .and_then(|i| methods.get(i).copied())
        .cloned();

    frame.render_stateful_widget(list, list_area, &mut app.methods_state);

    let detail_block = Block::default().borders(Borders::ALL).title(" Details ");
    let detail = match selected {
        Some(method) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    method.title.clone(),
                    Style::default().fg(Color::Yellow).bold(),
                )),
                Line::default(),
                Line::from(method.description.clone()),
                Line::default(),
                Line::from(vec![
                    Span::styled("Investment: ", Style::default().fg(Color::Gray)),
                    Span::raw(method.investment.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Est. Return: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        method.estimated_return.clone(),
                        Style::default().fg(Color::Green).bold(),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Difficulty: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        method.difficulty.display_name(),
                        Style::default().fg(difficulty_color(method.difficulty)),
                    ),
                ]),
                Line::default(),
                Line::from(Span::styled("Pros", Style::default().fg(Color::Green).bold())),
            ];
            for pro in &method.pros {
                lines.push(Line::from(format!(" + {}", pro)));
            }
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Cons",
                Style::default().fg(Color::Red).bold(),
            )));
            for con in &method.cons {
                lines.push(Line::from(format!(" - {}", con)));
            }
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(detail_block)
        }
        None => Paragraph::new("Select a method to see details")
            .style(Style::default().fg(Color::DarkGray))
            .block(detail_block),
    };
    frame.render_widget(detail, detail_area);
}

fn render_calculator_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [form_area, result_area, banner_area] = Layout::vertical([
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(3),
    ])
    .areas(area);

    let form_block = Block::default()
        .borders(Borders::ALL)
        .title(" AFK Farm Calculator ");
    let inner = form_block.inner(form_area);
    frame.render_widget(form_block, form_area);

    let [spawners_row, price_row, drops_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(inner);

    render_calc_field(
        frame,
        spawners_row,
        "Number of Spawners",
        &app.spawners_input,
        app.calc_field == CalcField::Spawners,
    );
    render_calc_field(
        frame,
        price_row,
        "Sell Price (per item)",
        &app.price_input,
        app.calc_field == CalcField::Price,
    );
    render_calc_field(
        frame,
        drops_row,
        "Avg Drops / Min (per spawner)",
        &app.drops_input,
        app.calc_field == CalcField::Drops,
    );

    match app.projection() {
        Ok(projection) => {
            let mut lines = vec![Line::from(vec![
                Span::styled("Per minute: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format_money(projection.profit_per_minute),
                    Style::default().fg(Color::White),
                ),
            ])];
            for bucket in &projection.buckets {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:>9}: ", bucket.label), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format_money(bucket.amount),
                        Style::default().fg(Color::Yellow).bold(),
                    ),
                ]));
            }
            let results = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Projection "));
            frame.render_widget(results, result_area);

            let banner = Paragraph::new(Line::from(vec![
                Span::styled("Daily Potential (24h AFK): ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format_money(projection.daily()),
                    Style::default().fg(Color::Yellow).bold(),
                ),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
            frame.render_widget(banner, banner_area);
        }
        Err(err) => {
            let error = Paragraph::new(Line::from(Span::styled(
                format!("Invalid input: {}", err),
                Style::default().fg(Color::Red).bold(),
            )))
            .block(Block::default().borders(Borders::ALL).title(" Projection "));
            frame.render_widget(error, result_area);
        }
    }
}

fn render_calc_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let field = Paragraph::new(value)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(format!(" {} ", label)),
        );
    frame.render_widget(field, area);
}

fn render_assistant_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let model_label = app
        .advice_client
        .as_ref()
        .map(|c| c.model().to_string())
        .unwrap_or_else(|| "no API key".to_string());

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Strategy Assistant ({}) ", model_label));

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.transcript.messages() {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(msg.text.as_str()));
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "Bot:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                let text_style = if msg.is_error {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                for line in msg.text.lines() {
                    lines.push(Line::from(Span::styled(line.to_string(), text_style)));
                }
                for url in &msg.source_urls {
                    lines.push(Line::from(vec![
                        Span::styled("  source: ", Style::default().fg(Color::DarkGray)),
                        Span::styled(
                            url.to_string(),
                            Style::default()
                                .fg(Color::Blue)
                                .add_modifier(Modifier::UNDERLINED),
                        ),
                    ]));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.is_advice_loading() {
        lines.push(Line::from(Span::styled(
            "Bot:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Analyzing market data{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let total_lines = lines.len() as u16;
    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    if total_lines > app.chat_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));
        let mut scrollbar_state =
            ScrollbarState::new(total_lines as usize).position(app.chat_scroll as usize);
        frame.render_stateful_widget(
            scrollbar,
            chat_area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }

    // Input box: disabled while a request is in flight
    let (input_title, input_border) = if app.is_advice_loading() {
        (" Waiting for answer... ", Color::DarkGray)
    } else if app.input_mode == InputMode::Editing {
        (" Ask (Enter to send) ", Color::Yellow)
    } else {
        (" Ask ('i' to type) ", Color::DarkGray)
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border))
        .title(input_title);

    // Horizontal scroll keeps the cursor visible in long questions
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .chat_input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    if app.input_mode == InputMode::Editing && !app.is_advice_loading() {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}

fn render_notification(app: &App, frame: &mut Frame, area: Rect) {
    let Some((message, _)) = &app.notification else {
        return;
    };

    let width = (message.chars().count() as u16 + 4).min(area.width.saturating_sub(2));
    let popup = Rect::new(
        area.width.saturating_sub(width + 1),
        area.height.saturating_sub(4),
        width,
        3,
    );

    frame.render_widget(Clear, popup);
    let toast = Paragraph::new(message.as_str())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" Success "),
        );
    frame.render_widget(toast, popup);
}
