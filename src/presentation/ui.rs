use crate::application::{App, AuthTab, Form, QuickAction, RegistrationField, Screen, StatusLevel, TextField};
use crate::domain::{KERALA_CROPS, Language, detect_season};
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.screen() {
        Screen::Splash => render_splash(f, app, chunks[1]),
        Screen::Auth => render_auth(f, app, chunks[1]),
        Screen::Registration => render_registration(f, app, chunks[1]),
        Screen::Dashboard => render_dashboard(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    if app.developer_mode {
        render_developer_panel(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut title = format!("🌾 {} | {}", app.text("app_name"), app.text("tagline"));
    if app.session.logged_in {
        title.push_str(&format!(" | {}", app.session.mobile_number));
    }
    let header = Paragraph::new(title).style(Style::default().fg(Color::Green));
    f.render_widget(header, area);
}

fn render_splash(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::styled(
            format!("🌾 {}", app.text("app_name")),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Line::from(app.text("tagline")),
        Line::from(""),
        Line::from(format!("🌍 {}", app.text("select_language"))),
        Line::from(""),
    ];
    for (i, language) in Language::ALL.iter().enumerate() {
        let line = if i == app.splash_selection {
            Line::styled(
                format!("> {}", language.label()),
                Style::default().bg(Color::Blue).fg(Color::White),
            )
        } else {
            Line::from(format!("  {}", language.label()))
        };
        lines.push(line);
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(
        format!("[Enter] {}", app.text("get_started")),
        Style::default().fg(Color::Yellow),
    ));

    let splash = Paragraph::new(Text::from(lines))
        .centered()
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(splash, area);
}

fn render_auth(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(app.text("app_name").to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let selected = match app.auth_tab {
        AuthTab::Login => 0,
        AuthTab::Signup => 1,
    };
    let tabs = Tabs::new(vec![
        format!("🔑 {}", app.text("login")),
        format!("🆕 {}", app.text("signup")),
    ])
    .select(selected)
    .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match app.auth_tab {
        AuthTab::Login => {
            let form = &app.login_form;
            render_field(f, chunks[1], app.text("mobile_number"), &form.mobile, form.focus() == 0);
            render_field(f, chunks[2], app.text("password"), &form.password, form.focus() == 1);

            let throttle = &app.session.throttle;
            let note = if throttle.remaining() == 0 {
                Line::styled(app.text("max_attempts"), Style::default().fg(Color::Red))
            } else {
                Line::styled(
                    format!("[Enter] {}  [F2] {}", app.text("login_button"), app.text("signup")),
                    Style::default().fg(Color::DarkGray),
                )
            };
            f.render_widget(Paragraph::new(note), chunks[3]);
        }
        AuthTab::Signup => {
            let form = &app.signup_form;
            render_field(f, chunks[1], app.text("mobile_number"), &form.mobile, form.focus() == 0);
            render_field(f, chunks[2], app.text("password"), &form.password, form.focus() == 1);
            render_field(f, chunks[3], app.text("confirm_password"), &form.confirm, form.focus() == 2);
            if !form.password.value().is_empty() {
                render_strength(f, app, chunks[4]);
            }
            let hint = Line::styled(
                format!("[Enter] {}  [F2] {}", app.text("signup_button"), app.text("login")),
                Style::default().fg(Color::DarkGray),
            );
            f.render_widget(Paragraph::new(hint), chunks[5]);
        }
    }
}

fn render_strength(f: &mut Frame, app: &App, area: Rect) {
    let strength = app.signup_strength();
    let color = match strength {
        0..=2 => Color::Red,
        3..=4 => Color::Yellow,
        _ => Color::Green,
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(app.text("password_strength").to_string()))
        .gauge_style(Style::default().fg(color))
        .ratio(f64::from(strength) / 5.0)
        .label(format!("{}%", u16::from(strength) * 20));
    f.render_widget(gauge, area);
}

fn render_registration(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("👨‍🌾 {}", app.text("registration")));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let season = detect_season(&Utc::now());
    f.render_widget(
        Paragraph::new(format!("🌱 {}: {}", app.text("season_detected"), season))
            .style(Style::default().fg(Color::Cyan)),
        chunks[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(0.7)
            .label("Profile completion: 70%"),
        chunks[1],
    );

    let form = &app.registration_form;
    let focused = form.focused_field();
    render_field(f, chunks[2], app.text("farmer_name"), &form.name, focused == RegistrationField::Name);
    render_field(f, chunks[3], app.text("land_size"), &form.land_size, focused == RegistrationField::LandSize);
    render_select(
        f,
        chunks[4],
        app.text("soil_type"),
        &form.soil_type().to_string(),
        focused == RegistrationField::SoilType,
    );
    let crop = form.previous_crop().unwrap_or(app.text("none"));
    render_select(
        f,
        chunks[5],
        app.text("previous_crop"),
        crop,
        focused == RegistrationField::PreviousCrop,
    );

    let hint = Line::styled(
        format!(
            "[Tab] next  [←/→] choose  [Enter] {}  [F10] {}  ({} crops)",
            app.text("complete_profile"),
            app.text("logout"),
            KERALA_CROPS.len()
        ),
        Style::default().fg(Color::DarkGray),
    );
    f.render_widget(Paragraph::new(hint), chunks[6]);
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} - {}", app.text("app_name"), app.text("dashboard")));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let data = &app.session.user_data;
    let welcome = Paragraph::new(format!(
        "🌟 {}, {}! 👋\nReady to make your farming smarter today?",
        app.text("welcome_back"),
        data.display_name()
    ))
    .style(Style::default().fg(Color::Magenta));
    f.render_widget(welcome, chunks[0]);

    let season = detect_season(&Utc::now());
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(chunks[1]);
    let land = data.land_size.map_or("0".to_string(), |size| size.to_string());
    let soil = data.soil_type.map_or("Unknown".to_string(), |soil| soil.to_string());
    render_card(f, cards[0], "🌱 Current Season", &season.to_string(), Color::Green);
    render_card(f, cards[1], "🚜 Land Size", &format!("{land} acres"), Color::Yellow);
    render_card(f, cards[2], "🏔️ Soil Type", &soil, Color::Blue);

    let actions: Vec<Span> = QuickAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| Span::raw(format!("[{}] {}  ", i + 1, action.label())))
        .collect();
    let actions = Paragraph::new(Line::from(actions))
        .block(Block::default().borders(Borders::ALL).title(format!("🚀 {}", app.text("quick_actions"))));
    f.render_widget(actions, chunks[2]);

    let title = format!("👤 {} ([p] details, [l] {})", app.text("my_profile"), app.text("logout"));
    if app.show_profile {
        let none = app.text("none").to_string();
        let rows = vec![
            ("👤 Name", data.display_name().to_string()),
            ("📱 Mobile", app.session.mobile_number.clone()),
            ("🚜 Land Size", format!("{land} acres")),
            ("🌾 Soil Type", soil),
            ("🌱 Previous Crop", data.previous_crop.clone().unwrap_or(none)),
            ("🗓️ Current Season", season.to_string()),
            (
                "📅 Member Since",
                data.created_at
                    .map_or("N/A".to_string(), |at| at.format("%Y-%m-%d").to_string()),
            ),
        ];
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|(label, value)| Row::new(vec![label.to_string(), value]))
            .collect();
        let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(0)])
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(table, chunks[3]);
    } else {
        f.render_widget(Block::default().borders(Borders::ALL).title(title), chunks[3]);
    }
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let card = Paragraph::new(vec![Line::from(""), Line::from(value.to_string())])
        .centered()
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(card, area);
}

fn render_field(f: &mut Frame, area: Rect, label: &str, field: &TextField, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let display = field.display();
    let widget = Paragraph::new(display.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(border),
    );
    f.render_widget(widget, area);

    if focused {
        let before: String = display.chars().take(field.cursor()).collect();
        let offset = Span::raw(before).width() as u16;
        f.set_cursor_position((area.x + 1 + offset, area.y + 1));
    }
}

fn render_select(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let widget = Paragraph::new(format!("◀ {value} ▶")).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(border),
    );
    f.render_widget(widget, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.status_message {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => Color::Cyan,
                StatusLevel::Success => Color::Green,
                StatusLevel::Warning => Color::Yellow,
                StatusLevel::Error => Color::Red,
            };
            (status.text.clone(), Style::default().fg(color))
        }
        None => {
            let keys = match app.screen() {
                Screen::Splash => "↑↓: language | Enter: continue | F12: developer | q: quit",
                Screen::Auth => "Tab/↑↓: field | F2: login/signup | Enter: submit | Esc: back",
                Screen::Registration => "Tab/↑↓: field | ←→: choose | Enter: submit | F10: logout",
                Screen::Dashboard => "1-4: quick actions | p: profile | l: logout | q: quit",
            };
            (keys.to_string(), Style::default())
        }
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_developer_panel(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 2,
        y: area.height / 10,
        width: (area.width / 2).saturating_sub(1),
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let session = &app.session;
    let lockout = match session.throttle.locked_at() {
        Some(at) => format!("since {}", at.format("%H:%M:%S")),
        None => "none".to_string(),
    };
    let rows = vec![
        ("Current Screen", format!("{:?}", session.screen)),
        ("Language", session.language.to_string()),
        ("User Logged In", session.logged_in.to_string()),
        ("Mobile Number", session.mobile_number.clone()),
        ("External ID", session.external_id.clone().unwrap_or_else(|| "None".to_string())),
        ("Backend", app.backend_status()),
        ("Login Attempts", session.login_attempts().to_string()),
        ("Lockout", lockout),
        ("Lockout Window", format!("{}s", app.lockout().num_seconds())),
    ];
    let rows: Vec<Row> = rows
        .into_iter()
        .map(|(label, value)| Row::new(vec![label.to_string(), value]))
        .collect();

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(0)]).block(
        Block::default()
            .borders(Borders::ALL)
            .title("🔍 Debug Information (Ctrl+R: reset | Ctrl+E: export | F12: close)")
            .style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(table, popup_area);
}
