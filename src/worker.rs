use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::Result;
use log::{debug, warn};

use crate::api::StatsBackend;
use crate::api::error::ApiError;
use crate::auth::oauth::{self, RedirectStatus};
use crate::auth::{AuthAction, Authenticator};
use crate::domain::stats::{SyncStats, TopSender};
use crate::domain::user::User;

/// Work that must not block the UI loop.
#[derive(Clone, PartialEq, Eq)]
pub enum Job {
    Profile,
    Sync,
    TopSenders,
    DeleteSender { sender: String },
    /// Disconnect, then start the browser flow whatever the outcome.
    SwitchAccount,
    Login { email: String, password: String },
    Register { email: String, password: String, name: String },
    AwaitRedirect { addr: String },
}

// passwords never reach the log
impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Profile => f.write_str("Profile"),
            Job::Sync => f.write_str("Sync"),
            Job::TopSenders => f.write_str("TopSenders"),
            Job::DeleteSender { sender } => f
                .debug_struct("DeleteSender")
                .field("sender", sender)
                .finish(),
            Job::SwitchAccount => f.write_str("SwitchAccount"),
            Job::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .finish_non_exhaustive(),
            Job::Register { email, name, .. } => f
                .debug_struct("Register")
                .field("email", email)
                .field("name", name)
                .finish_non_exhaustive(),
            Job::AwaitRedirect { addr } => f
                .debug_struct("AwaitRedirect")
                .field("addr", addr)
                .finish(),
        }
    }
}

#[derive(Debug)]
pub enum JobResult {
    Profile(Result<String, ApiError>),
    Sync(Result<SyncStats, ApiError>),
    TopSenders(Result<Vec<TopSender>, ApiError>),
    DeleteSender {
        sender: String,
        result: Result<u64, ApiError>,
    },
    /// The browser still has to be sent to `authorize_url`.
    SwitchedAccount { authorize_url: String },
    Auth {
        action: AuthAction,
        outcome: Result<User>,
    },
    Redirect(Result<RedirectStatus>),
}

impl JobResult {
    /// Results that feed dashboard state, which is rebuilt on logout.
    pub fn belongs_to_dashboard(&self) -> bool {
        !matches!(self, JobResult::Auth { .. } | JobResult::Redirect(_))
    }
}

/// A result tagged with the generation its job was submitted in.
#[derive(Debug)]
pub struct Stamped {
    pub generation: u64,
    pub result: JobResult,
}

/// Runs each job on its own thread and hands results back over a channel.
pub struct Worker {
    backend: Arc<dyn StatsBackend>,
    authenticator: Arc<dyn Authenticator>,
    generation: u64,
    tx: Sender<Stamped>,
    rx: Receiver<Stamped>,
}

impl Worker {
    pub fn new(backend: Arc<dyn StatsBackend>, authenticator: Arc<dyn Authenticator>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            authenticator,
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks everything submitted so far as belonging to an older session.
    pub fn advance_generation(&mut self) {
        self.generation += 1;
    }

    pub fn backend(&self) -> &Arc<dyn StatsBackend> {
        &self.backend
    }

    pub fn submit(&self, job: Job) {
        debug!("submitting {job:?}");
        let backend = self.backend.clone();
        let authenticator = self.authenticator.clone();
        let tx = self.tx.clone();
        let generation = self.generation;
        thread::spawn(move || {
            let result = run_job(job, backend.as_ref(), authenticator.as_ref());
            // receiver gone means the UI already quit
            let _ = tx.send(Stamped { generation, result });
        });
    }

    /// Everything finished since the last call, in completion order.
    pub fn drain(&self) -> Vec<Stamped> {
        self.rx.try_iter().collect()
    }
}

pub fn run_job(job: Job, backend: &dyn StatsBackend, auth: &dyn Authenticator) -> JobResult {
    match job {
        Job::Profile => JobResult::Profile(backend.profile()),
        Job::Sync => JobResult::Sync(backend.sync()),
        Job::TopSenders => JobResult::TopSenders(backend.top_senders()),
        Job::DeleteSender { sender } => {
            let result = backend.delete_sender(&sender);
            JobResult::DeleteSender { sender, result }
        }
        Job::SwitchAccount => {
            if let Err(e) = backend.disconnect() {
                warn!("disconnect failed, continuing to authorize: {e}");
            }
            JobResult::SwitchedAccount {
                authorize_url: backend.authorize_url(),
            }
        }
        Job::Login { email, password } => JobResult::Auth {
            action: AuthAction::Login,
            outcome: auth.authenticate(&email, &password),
        },
        Job::Register {
            email,
            password,
            name,
        } => JobResult::Auth {
            action: AuthAction::Register,
            outcome: auth.register(&email, &password, &name),
        },
        Job::AwaitRedirect { addr } => {
            JobResult::Redirect(oauth::wait_for_redirect(&addr, oauth::CALLBACK_TIMEOUT))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockStatsBackend;
    use crate::auth::MockAuthenticator;
    use std::time::{Duration, Instant};

    fn instant_auth() -> MockAuthenticator {
        MockAuthenticator {
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn switch_account_swallows_disconnect_failure() {
        let mut backend = MockStatsBackend::new();
        backend.expect_disconnect().times(1).returning(|| {
            Err(ApiError::Http {
                status: 500,
                reason: "Internal Server Error".into(),
            })
        });
        backend
            .expect_authorize_url()
            .times(1)
            .returning(|| "https://localhost:5000/authorize".to_string());

        let result = run_job(Job::SwitchAccount, &backend, &instant_auth());
        assert!(matches!(
            result,
            JobResult::SwitchedAccount { authorize_url } if authorize_url == "https://localhost:5000/authorize"
        ));
    }

    #[test]
    fn delete_result_carries_sender() {
        let mut backend = MockStatsBackend::new();
        backend
            .expect_delete_sender()
            .withf(|s| s.to_string() == "spam@x.com")
            .returning(|_| Ok(4));

        let result = run_job(
            Job::DeleteSender {
                sender: "spam@x.com".into(),
            },
            &backend,
            &instant_auth(),
        );
        match result {
            JobResult::DeleteSender { sender, result } => {
                assert_eq!(sender, "spam@x.com");
                assert_eq!(result.unwrap(), 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn wait_for_one(worker: &Worker) -> Vec<Stamped> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut got = Vec::new();
        while got.is_empty() && Instant::now() < deadline {
            got = worker.drain();
            thread::sleep(Duration::from_millis(10));
        }
        got
    }

    #[test]
    fn submitted_jobs_come_back_on_the_channel() {
        let mut backend = MockStatsBackend::new();
        backend
            .expect_profile()
            .returning(|| Ok("me@gmail.com".to_string()));
        let worker = Worker::new(Arc::new(backend), Arc::new(instant_auth()));

        worker.submit(Job::Profile);

        let got = wait_for_one(&worker);
        assert!(matches!(
            got.as_slice(),
            [Stamped { generation: 0, result: JobResult::Profile(Ok(e)) }] if e == "me@gmail.com"
        ));
    }

    #[test]
    fn results_carry_the_generation_they_were_submitted_in() {
        let mut backend = MockStatsBackend::new();
        backend
            .expect_profile()
            .returning(|| Ok("me@gmail.com".to_string()));
        let mut worker = Worker::new(Arc::new(backend), Arc::new(instant_auth()));

        worker.advance_generation();
        worker.submit(Job::Profile);

        let got = wait_for_one(&worker);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].generation, 1);
        assert_eq!(worker.generation(), 1);
    }

    #[test]
    fn debug_output_hides_passwords() {
        let login = Job::Login {
            email: "ada@example.com".into(),
            password: "hunter2".into(),
        };
        let register = Job::Register {
            email: "ada@example.com".into(),
            password: "hunter2".into(),
            name: "Ada".into(),
        };

        for job in [login, register] {
            let shown = format!("{job:?}");
            assert!(!shown.contains("hunter2"), "{shown}");
            assert!(shown.contains("ada@example.com"));
        }
    }

    #[test]
    fn auth_and_redirect_results_outlive_logout() {
        let auth = JobResult::Auth {
            action: AuthAction::Login,
            outcome: Ok(User::from_email("1", "ada@example.com")),
        };
        assert!(!auth.belongs_to_dashboard());
        assert!(!JobResult::Redirect(Ok(RedirectStatus::Success)).belongs_to_dashboard());
        assert!(JobResult::Sync(Err(ApiError::NotConnected)).belongs_to_dashboard());
    }
}
