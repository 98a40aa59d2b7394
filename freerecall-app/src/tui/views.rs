use crate::tui::app::{Page, TuiApp};
use crate::tui::theme::*;
use freerecall_client::{DueView, HistoryView, RecallView, UploadView, RECALL_FAILED};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn draw_ui(f: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.size());

    let tab = match app.page {
        Page::Upload(_) => 0,
        Page::Due(_) | Page::Recall(_) => 1,
        Page::History(_) => 2,
    };
    let tabs = Tabs::new(vec!["F1 Upload", "F2 Due Topics", "F3 History"])
        .select(tab)
        .style(footer_style())
        .highlight_style(selected_style())
        .block(Block::default().title("FreeRecall").borders(Borders::ALL));
    f.render_widget(tabs, chunks[0]);

    match &app.page {
        Page::Upload(v) => draw_upload(f, chunks[1], v, app.focus),
        Page::Due(v) => draw_due(f, chunks[1], v, app.sel),
        Page::Recall(v) => draw_recall(f, chunks[1], v),
        Page::History(v) => draw_history(f, chunks[1], v, app.focus, app.sel),
    }

    let foot = Paragraph::new(Line::from(vec![
        Span::raw(" Tab field  "),
        Span::raw(" ↑/↓ select  "),
        Span::raw(" Enter submit/open  "),
        Span::raw(" Ctrl-S submit text  "),
        Span::raw(" Esc quit "),
    ]))
    .style(footer_style());
    f.render_widget(foot, chunks[2]);
}

fn field<'a>(title: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
    let block = Block::default().title(title).borders(Borders::ALL);
    let block = if focused {
        block.border_style(selected_style())
    } else {
        block
    };
    Paragraph::new(value).wrap(Wrap { trim: false }).block(block)
}

fn status_line(text: &str, failed: bool) -> Paragraph<'_> {
    let style = if failed { error_style() } else { ok_style() };
    Paragraph::new(Line::from(Span::raw(text).style(style)))
}

fn submitting(f: &mut Frame, area: Rect) {
    f.render_widget(Paragraph::new("Submitting...").style(hint_style()), area);
}

fn draw_upload(f: &mut Frame, area: Rect, v: &UploadView, focus: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    f.render_widget(field("Topic", v.topic(), focus == 0), rows[0]);
    f.render_widget(
        field("Content (Ctrl-S to upload)", v.content(), focus == 1),
        rows[1],
    );
    if v.phase().is_submitting() {
        submitting(f, rows[2]);
    } else if let Some(msg) = v.message() {
        let failed = v.phase().success().is_none();
        f.render_widget(status_line(msg, failed), rows[2]);
    }
}

fn draw_due(f: &mut Frame, area: Rect, v: &DueView, sel: usize) {
    let block = Block::default().title("Due Topics").borders(Borders::ALL);
    if v.phase().is_submitting() {
        f.render_widget(Paragraph::new("Loading...").style(hint_style()).block(block), area);
        return;
    }
    if let Some(msg) = v.empty_message() {
        f.render_widget(Paragraph::new(msg).block(block), area);
        return;
    }
    let items: Vec<_> = v
        .links()
        .into_iter()
        .enumerate()
        .map(|(i, link)| {
            let line = Line::from(link.label);
            ListItem::new(if i == sel { line.style(selected_style()) } else { line })
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn draw_recall(f: &mut Frame, area: Rect, v: &RecallView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(area);
    let title = format!("{} (Ctrl-S to submit)", v.title());
    f.render_widget(field(&title, v.recall_text(), true), rows[0]);

    if v.phase().is_submitting() {
        submitting(f, rows[1]);
        return;
    }
    let lines: Vec<Line> = v
        .result_lines()
        .into_iter()
        .map(|l| {
            if l == RECALL_FAILED {
                Line::from(Span::raw(l).style(error_style()))
            } else {
                Line::from(l)
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[1]);
}

fn draw_history(f: &mut Frame, area: Rect, v: &HistoryView, focus: usize, sel: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);
    f.render_widget(field("Topic (Enter to load)", v.topic(), focus == 0), rows[0]);

    let block = Block::default().title("History").borders(Borders::ALL);
    let block = if focus == 1 {
        block.border_style(selected_style())
    } else {
        block
    };
    let mut items = Vec::new();
    for (i, record) in v.records().iter().enumerate() {
        let summary = Line::from(HistoryView::summary(record));
        let summary = if focus == 1 && i == sel {
            summary.style(selected_style())
        } else {
            summary
        };
        let mut lines = vec![summary];
        if v.is_expanded(i) {
            lines.push(Line::from(vec![
                Span::raw("  Feedback: ").style(title_style()),
                Span::raw(record.feedback.clone()),
            ]));
            lines.push(Line::from(vec![
                Span::raw("  Your recall: ").style(title_style()),
                Span::raw(record.recall_text.clone()),
            ]));
        }
        items.push(ListItem::new(lines));
    }
    f.render_widget(List::new(items).block(block), rows[1]);
}
