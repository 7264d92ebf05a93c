use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::{debug, info, warn};

use crate::api::StatsBackend;
use crate::auth::oauth::{self, RedirectStatus};
use crate::auth::{AuthAction, AuthStore, Authenticator};
use crate::dashboard::{Dashboard, Notice};
use crate::router::{self, Route};
use crate::store::LocalStorage;
use crate::worker::{Job, JobResult, Stamped, Worker};

/// Storage key the web frontend used for the signed-in user.
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Connect = 0,
    Sync = 1,
    TopSenders = 2,
}

impl Card {
    pub const ALL: [Card; 3] = [Card::Connect, Card::Sync, Card::TopSenders];
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
}

impl FormField {
    fn new(label: &'static str, secret: bool) -> Self {
        Self {
            label,
            value: String::new(),
            secret,
        }
    }
}

/// Login / register form.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub action: AuthAction,
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub submitting: bool,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn login() -> Self {
        Self::with_fields(
            AuthAction::Login,
            vec![FormField::new("Email", false), FormField::new("Password", true)],
        )
    }

    pub fn register() -> Self {
        Self::with_fields(
            AuthAction::Register,
            vec![
                FormField::new("Name", false),
                FormField::new("Email", false),
                FormField::new("Password", true),
            ],
        )
    }

    fn with_fields(action: AuthAction, fields: Vec<FormField>) -> Self {
        Self {
            action,
            fields,
            focused: 0,
            submitting: false,
            error: None,
        }
    }

    fn value(&self, label: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(f) = self.fields.get_mut(self.focused) {
            f.value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(f) = self.fields.get_mut(self.focused) {
            f.value.pop();
        }
    }

    pub fn to_job(&self) -> Job {
        match self.action {
            AuthAction::Login => Job::Login {
                email: self.value("Email"),
                password: self.value("Password"),
            },
            AuthAction::Register => Job::Register {
                email: self.value("Email"),
                password: self.value("Password"),
                name: self.value("Name"),
            },
        }
    }
}

/// OAuth return page shown after the browser flow.
#[derive(Debug, Clone, Copy)]
pub struct RedirectPage {
    pub status: RedirectStatus,
    pub since: Instant,
}

impl RedirectPage {
    pub fn new(status: RedirectStatus) -> Self {
        Self {
            status,
            since: Instant::now(),
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        self.status
            .linger()
            .is_some_and(|d| now.duration_since(self.since) >= d)
    }
}

pub struct App {
    pub route: Route,
    pub auth: AuthStore,
    pub dashboard: Dashboard,
    pub storage: Box<dyn LocalStorage>,
    pub worker: Worker,

    pub login_form: AuthForm,
    pub register_form: AuthForm,
    pub redirect: RedirectPage,

    pub card: Card,
    pub tick: u64,
    pub quit: bool,

    /// Where the OAuth return listener binds, if anywhere.
    pub callback_addr: Option<String>,
    pub awaiting_redirect: bool,
}

impl App {
    pub fn new(
        backend: Arc<dyn StatsBackend>,
        authenticator: Arc<dyn Authenticator>,
        storage: Box<dyn LocalStorage>,
        callback_addr: Option<String>,
    ) -> Self {
        let dashboard = Dashboard::new(storage.as_ref());
        Self {
            route: Route::Landing,
            auth: AuthStore::new(authenticator.clone()),
            dashboard,
            storage,
            worker: Worker::new(backend, authenticator),
            login_form: AuthForm::login(),
            register_form: AuthForm::register(),
            redirect: RedirectPage::new(RedirectStatus::Loading),
            card: Card::Connect,
            tick: 0,
            quit: false,
            callback_addr,
            awaiting_redirect: false,
        }
    }

    pub fn navigate(&mut self, requested: Route) {
        let route = router::resolve(requested, &self.auth);
        if route != requested {
            info!("{} requires sign-in, showing {}", requested.path(), route.path());
        }
        self.route = route;
        match route {
            // entering the dashboard re-checks the backend session
            Route::Dashboard => self.worker.submit(Job::Profile),
            Route::Login => self.login_form = AuthForm::login(),
            Route::Register => self.register_form = AuthForm::register(),
            _ => {}
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut AuthForm> {
        match self.route {
            Route::Login => Some(&mut self.login_form),
            Route::Register => Some(&mut self.register_form),
            _ => None,
        }
    }

    pub fn submit_form(&mut self) {
        let Some(form) = self.form_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        form.submitting = true;
        form.error = None;
        let job = form.to_job();
        self.worker.submit(job);
    }

    pub fn logout(&mut self) {
        self.auth.logout();
        if let Err(e) = self.storage.remove_item(USER_KEY) {
            warn!("could not clear stored user: {e:#}");
        }
        self.dashboard = Dashboard::new(self.storage.as_ref());
        // dashboard jobs still running belong to the discarded state
        self.worker.advance_generation();
        self.navigate(Route::Landing);
    }

    // ----- Dashboard actions -----

    pub fn activate(&mut self, card: Card) {
        self.card = card;
        match card {
            Card::Connect => self.connect(),
            Card::Sync => self.start_sync(),
            Card::TopSenders => self.show_top_senders(),
        }
    }

    pub fn connect(&mut self) {
        if self.dashboard.is_connected() {
            return;
        }
        let url = self.worker.backend().authorize_url();
        self.begin_browser_flow(&url);
    }

    pub fn switch_account(&mut self) {
        if self.dashboard.is_connected() {
            self.worker.submit(Job::SwitchAccount);
        }
    }

    fn begin_browser_flow(&mut self, authorize_url: &str) {
        oauth::open_authorize(authorize_url);
        self.dashboard.notice = Some(Notice::Info(format!(
            "Finish connecting in your browser: {authorize_url}"
        )));
        if let Some(addr) = self.callback_addr.clone()
            && !self.awaiting_redirect
        {
            self.awaiting_redirect = true;
            self.worker.submit(Job::AwaitRedirect { addr });
        }
    }

    pub fn start_sync(&mut self) {
        if self.dashboard.begin_sync() {
            self.worker.submit(Job::Sync);
        }
    }

    pub fn show_top_senders(&mut self) {
        if self.dashboard.show_top_senders() {
            self.worker.submit(Job::TopSenders);
        }
    }

    pub fn confirm_remove(&mut self) {
        if let Some(sender) = self.dashboard.confirm_remove() {
            self.worker.submit(Job::DeleteSender { sender });
        }
    }

    // ----- Background results -----

    /// Applies a worker result unless it targets a dashboard that has
    /// since been discarded.
    pub fn receive(&mut self, stamped: Stamped) {
        if stamped.generation != self.worker.generation() && stamped.result.belongs_to_dashboard() {
            debug!("dropping stale {:?}", stamped.result);
            return;
        }
        self.apply(stamped.result);
    }

    pub fn apply(&mut self, result: JobResult) {
        match result {
            JobResult::Profile(r) => self.dashboard.apply_profile(r),
            JobResult::Sync(r) => {
                self.dashboard
                    .finish_sync(r, Utc::now(), self.storage.as_mut())
            }
            JobResult::TopSenders(r) => self.dashboard.finish_top_senders(r),
            JobResult::DeleteSender { sender, result } => {
                if self.dashboard.finish_delete(&sender, result) && self.dashboard.begin_refresh() {
                    self.worker.submit(Job::TopSenders);
                }
            }
            JobResult::SwitchedAccount { authorize_url } => {
                self.dashboard.connection = Default::default();
                self.begin_browser_flow(&authorize_url);
            }
            JobResult::Auth { action, outcome } => {
                let outcome = self.auth.complete(action, outcome);
                let form = match action {
                    AuthAction::Login => &mut self.login_form,
                    AuthAction::Register => &mut self.register_form,
                };
                form.submitting = false;
                match outcome {
                    Ok(()) => self.navigate(Route::Dashboard),
                    Err(e) => form.error = Some(e.to_string()),
                }
            }
            JobResult::Redirect(r) => {
                self.awaiting_redirect = false;
                match r {
                    Ok(status) => {
                        info!("OAuth return: {status:?}");
                        self.redirect = RedirectPage::new(status);
                        self.dashboard.notice = None;
                        self.navigate(Route::Redirect);
                    }
                    Err(e) => warn!("OAuth return listener stopped: {e:#}"),
                }
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        if self.route == Route::Redirect && self.redirect.expired(now) {
            self.navigate(Route::Landing);
        }
    }
}
