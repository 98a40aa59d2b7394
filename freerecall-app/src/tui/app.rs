use crate::tui::{
    inputs::{map_event, Action},
    views,
};
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use freerecall_client::{
    ApiError, DueView, HistoryView, RecallView, StudyApi, UploadField, UploadView,
};
use freerecall_core::{HistoryRecord, RecallResult, Route, Topic};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

pub enum Page {
    Upload(UploadView),
    Due(DueView),
    Recall(RecallView),
    History(HistoryView),
}

impl Page {
    fn fields(&self) -> usize {
        match self {
            Page::Upload(_) | Page::History(_) => 2,
            Page::Due(_) | Page::Recall(_) => 1,
        }
    }
}

pub enum Reply {
    Upload(Result<(), ApiError>),
    Due(Result<Vec<Topic>, ApiError>),
    Recall(Result<RecallResult, ApiError>),
    History(Result<Vec<HistoryRecord>, ApiError>),
}

/// Terminal front end. Each page is fetched fresh on entry; replies for a page
/// that has since been left are dropped.
pub struct TuiApp {
    pub api: Arc<dyn StudyApi>,
    pub rt: Arc<Runtime>,
    pub page: Page,
    pub focus: usize,
    pub sel: usize,
    generation: u64,
    tx: UnboundedSender<(u64, Reply)>,
    rx: UnboundedReceiver<(u64, Reply)>,
    quit: bool,
}

impl TuiApp {
    pub fn new(api: Arc<dyn StudyApi>, rt: Arc<Runtime>) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            api,
            rt,
            page: Page::Upload(UploadView::new()),
            focus: 0,
            sel: 0,
            generation: 0,
            tx,
            rx,
            quit: false,
        }
    }

    pub fn navigate(&mut self, route: Route) {
        self.generation += 1;
        self.focus = 0;
        self.sel = 0;
        debug!(path = %route.path(), "navigate");
        self.page = match route {
            Route::Upload => Page::Upload(UploadView::new()),
            Route::History => Page::History(HistoryView::new()),
            Route::Recall(topic) => Page::Recall(RecallView::new(topic)),
            Route::Due => {
                let mut view = DueView::new();
                view.begin();
                self.spawn(|api| async move { Reply::Due(api.due().await) });
                Page::Due(view)
            }
        };
    }

    fn spawn<F, Fut>(&self, call: F)
    where
        F: FnOnce(Arc<dyn StudyApi>) -> Fut,
        Fut: std::future::Future<Output = Reply> + Send + 'static,
    {
        let fut = call(self.api.clone());
        let tx = self.tx.clone();
        let generation = self.generation;
        self.rt.spawn(async move {
            let _ = tx.send((generation, fut.await));
        });
    }

    /// Fold a finished request into the page that issued it.
    pub fn apply(&mut self, generation: u64, reply: Reply) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale reply");
            return;
        }
        match (&mut self.page, reply) {
            (Page::Upload(v), Reply::Upload(r)) => v.finish(r),
            (Page::Due(v), Reply::Due(r)) => {
                v.finish(r);
                self.sel = 0;
            }
            (Page::Recall(v), Reply::Recall(r)) => v.finish(r),
            (Page::History(v), Reply::History(r)) => {
                v.finish(r);
                self.sel = 0;
            }
            _ => {}
        }
    }

    fn drain_replies(&mut self) {
        while let Ok((generation, reply)) = self.rx.try_recv() {
            self.apply(generation, reply);
        }
    }

    fn submit(&mut self) {
        match &mut self.page {
            Page::Upload(v) => {
                if let Some(material) = v.begin() {
                    self.spawn(|api| async move { Reply::Upload(api.upload(&material).await) });
                }
            }
            Page::Recall(v) => {
                if let Some(attempt) = v.begin() {
                    self.spawn(|api| async move { Reply::Recall(api.recall(&attempt).await) });
                }
            }
            Page::History(v) => {
                if let Some(topic) = v.begin() {
                    self.sel = 0;
                    self.spawn(|api| async move { Reply::History(api.history(&topic).await) });
                }
            }
            Page::Due(_) => {}
        }
    }

    fn list_len(&self) -> usize {
        match &self.page {
            Page::Due(v) => v.topics().len(),
            Page::History(v) if self.focus == 1 => v.records().len(),
            _ => 0,
        }
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match (&mut self.page, self.focus) {
            (Page::Upload(v), 0) => Some(v.field_mut(UploadField::Topic)),
            (Page::Upload(v), _) => Some(v.field_mut(UploadField::Content)),
            (Page::Recall(v), _) => Some(v.text_mut()),
            (Page::History(v), 0) => Some(v.topic_mut()),
            _ => None,
        }
    }

    fn multiline(&self) -> bool {
        matches!(
            (&self.page, self.focus),
            (Page::Upload(_), 1) | (Page::Recall(_), _)
        )
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit = true,
            Action::GoUpload => self.navigate(Route::Upload),
            Action::GoDue => self.navigate(Route::Due),
            Action::GoHistory => self.navigate(Route::History),
            Action::NextField => self.focus = (self.focus + 1) % self.page.fields(),
            Action::Up => self.sel = self.sel.saturating_sub(1),
            Action::Down => {
                if self.sel + 1 < self.list_len() {
                    self.sel += 1;
                }
            }
            Action::Submit => self.submit(),
            Action::Enter => {
                if self.multiline() {
                    if let Some(s) = self.text_field() {
                        s.push('\n');
                    }
                    return;
                }
                match &mut self.page {
                    Page::Due(v) => {
                        let route = v.links().get(self.sel).map(|l| l.route());
                        if let Some(route) = route {
                            self.navigate(route);
                        }
                    }
                    Page::History(v) if self.focus == 1 => v.toggle(self.sel),
                    _ => self.submit(),
                }
            }
            Action::Backspace => {
                if let Some(s) = self.text_field() {
                    s.pop();
                }
            }
            Action::Char(c) => {
                if let Some(s) = self.text_field() {
                    s.push(c);
                }
            }
            Action::None => {}
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.mainloop(&mut terminal);

        disable_raw_mode().ok();
        let mut out: Stdout = std::io::stdout();
        execute!(out, LeaveAlternateScreen).ok();
        terminal.show_cursor().ok();

        res
    }

    fn mainloop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        while !self.quit {
            self.drain_replies();
            let app = &*self;
            terminal.draw(|f| views::draw_ui(f, app))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                let action = map_event(event::read()?);
                self.handle(action);
            }
        }
        Ok(())
    }
}
