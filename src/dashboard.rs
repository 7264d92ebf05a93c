//! Dashboard orchestration: which panel is shown, what is loading, and what
//! the backend last said.
//!
//! Every backend round trip is split into a `begin_*` step, which flips the
//! loading flag and reports whether a request should actually go out, and a
//! `finish_*` step that applies the result. The UI runs the request on the
//! worker thread in between; the `*_now` helpers do all three inline.

use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use crate::api::StatsBackend;
use crate::api::error::ApiError;
use crate::domain::stats::{RankedSender, SyncStats, TopSender, rank_senders};
use crate::store::LocalStorage;

/// Storage key holding the RFC 3339 time of the last successful sync.
pub const LAST_SYNCED_KEY: &str = "lastSynced";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    None,
    Sync,
    Senders,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Connection {
    #[default]
    Unknown,
    Connected(String),
    Disconnected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Success(SyncStats),
    Failure(String),
}

/// A removal waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub sender: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct Dashboard {
    pub view: View,
    pub connection: Connection,
    pub last_synced: Option<DateTime<Utc>>,
    pub sync: Option<SyncOutcome>,
    pub top_senders: Vec<TopSender>,
    pub loading_sync: bool,
    pub loading_senders: bool,
    pub deleting: bool,
    pub confirm: Option<PendingDelete>,
    pub notice: Option<Notice>,
    /// Highlighted chart row.
    pub selected: usize,
    /// When the current sender list arrived; drives the bar animation.
    pub senders_arrived: Option<Instant>,
}

impl Dashboard {
    pub fn new(storage: &dyn LocalStorage) -> Self {
        Self {
            last_synced: load_last_synced(storage),
            ..Self::default()
        }
    }

    // ----- Connection -----

    pub fn apply_profile(&mut self, result: Result<String, ApiError>) {
        self.connection = match result {
            Ok(email) => {
                info!("connected as {email}");
                Connection::Connected(email)
            }
            Err(e) => {
                // not being connected is an expected state, not an error
                debug!("profile check failed: {e}");
                Connection::Disconnected
            }
        };
    }

    pub fn load_profile(&mut self, backend: &dyn StatsBackend) {
        self.apply_profile(backend.profile());
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Connected(_))
    }

    pub fn profile_email(&self) -> Option<&str> {
        match &self.connection {
            Connection::Connected(email) => Some(email),
            _ => None,
        }
    }

    // ----- Sync -----

    /// Shows the sync panel. Returns `false` while a sync is in flight.
    pub fn begin_sync(&mut self) -> bool {
        if self.loading_sync {
            debug!("sync already running");
            return false;
        }
        self.loading_sync = true;
        self.view = View::Sync;
        true
    }

    pub fn finish_sync(
        &mut self,
        result: Result<SyncStats, ApiError>,
        now: DateTime<Utc>,
        storage: &mut dyn LocalStorage,
    ) {
        self.loading_sync = false;
        match result {
            Ok(stats) => {
                info!(
                    "sync done: processed={} inserted={} elapsed={:.2}s",
                    stats.processed, stats.inserted, stats.time_elapsed
                );
                self.sync = Some(SyncOutcome::Success(stats));
                self.last_synced = Some(now);
                if let Err(e) = storage.set_item(LAST_SYNCED_KEY, &now.to_rfc3339()) {
                    warn!("could not persist last sync time: {e:#}");
                }
            }
            Err(e) => {
                error!("sync failed: {e}");
                self.sync = Some(SyncOutcome::Failure(e.to_string()));
            }
        }
    }

    pub fn sync_now(&mut self, backend: &dyn StatsBackend, storage: &mut dyn LocalStorage) -> bool {
        if !self.begin_sync() {
            return false;
        }
        let result = backend.sync();
        self.finish_sync(result, Utc::now(), storage);
        true
    }

    // ----- Top senders -----

    /// Shows the chart panel and starts a reload unless one is running.
    /// While a delete is in flight the reload is left to the delete, so
    /// the chart is refreshed only after the removal has been committed.
    pub fn show_top_senders(&mut self) -> bool {
        self.view = View::Senders;
        if self.deleting {
            debug!("delete in flight, chart reloads when it finishes");
            return false;
        }
        self.begin_refresh()
    }

    pub fn begin_refresh(&mut self) -> bool {
        if self.loading_senders {
            debug!("top senders already loading");
            return false;
        }
        self.loading_senders = true;
        true
    }

    pub fn finish_top_senders(&mut self, result: Result<Vec<TopSender>, ApiError>) {
        self.loading_senders = false;
        match result {
            Ok(data) => {
                debug!("{} senders received", data.len());
                self.top_senders = data;
                self.senders_arrived = Some(Instant::now());
                let rows = self.ranked().len();
                self.selected = self.selected.min(rows.saturating_sub(1));
            }
            Err(e) => {
                error!("loading top senders failed: {e}");
                self.notice = Some(Notice::Error(format!("Could not load top senders: {e}")));
            }
        }
    }

    pub fn refresh_top_senders(&mut self, backend: &dyn StatsBackend) -> bool {
        if !self.begin_refresh() {
            return false;
        }
        self.finish_top_senders(backend.top_senders());
        true
    }

    pub fn ranked(&self) -> Vec<RankedSender> {
        rank_senders(&self.top_senders)
    }

    pub fn move_selection(&mut self, delta: i32) {
        let rows = self.ranked().len();
        if rows == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as i64 + delta as i64).clamp(0, rows as i64 - 1);
        self.selected = next as usize;
    }

    // ----- Removing a sender -----

    /// Asks for confirmation to remove the highlighted row.
    pub fn request_remove(&mut self) -> bool {
        if self.view != View::Senders || self.loading_senders || self.deleting {
            return false;
        }
        let Some(row) = self.ranked().into_iter().nth(self.selected) else {
            return false;
        };
        self.confirm = Some(PendingDelete {
            sender: row.email,
            count: row.count,
        });
        true
    }

    pub fn cancel_remove(&mut self) {
        self.confirm = None;
    }

    /// Accepts the pending confirmation; returns the sender to delete.
    pub fn confirm_remove(&mut self) -> Option<String> {
        if self.deleting {
            return None;
        }
        let pending = self.confirm.take()?;
        self.deleting = true;
        Some(pending.sender)
    }

    /// Returns `true` when the chart must be reloaded.
    pub fn finish_delete(&mut self, sender: &str, result: Result<u64, ApiError>) -> bool {
        self.deleting = false;
        match result {
            Ok(n) => {
                info!("deleted {n} emails from {sender}");
                self.notice = Some(Notice::Info(format!("Deleted {n} emails from {sender}.")));
                true
            }
            Err(e) => {
                error!("delete of {sender} failed: {e}");
                self.notice = Some(Notice::Error("Delete failed – see log.".to_string()));
                false
            }
        }
    }

    pub fn delete_confirmed(&mut self, backend: &dyn StatsBackend) {
        let Some(sender) = self.confirm_remove() else {
            return;
        };
        let result = backend.delete_sender(&sender);
        if self.finish_delete(&sender, result) {
            self.refresh_top_senders(backend);
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

fn load_last_synced(storage: &dyn LocalStorage) -> Option<DateTime<Utc>> {
    let raw = match storage.get_item(LAST_SYNCED_KEY) {
        Ok(v) => v?,
        Err(e) => {
            warn!("could not read last sync time: {e:#}");
            return None;
        }
    };
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            warn!("ignoring unreadable {LAST_SYNCED_KEY} value {raw:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockStatsBackend;
    use crate::store::MemoryStorage;
    use chrono::TimeZone;

    fn http_500() -> ApiError {
        ApiError::Http {
            status: 500,
            reason: "Internal Server Error".into(),
        }
    }

    fn sender(email: &str, count: u64) -> TopSender {
        TopSender {
            email: email.into(),
            count,
        }
    }

    fn stats() -> SyncStats {
        SyncStats {
            processed: 120,
            inserted: 7,
            time_elapsed: 1.5,
        }
    }

    #[test]
    fn restores_last_synced_from_storage() {
        let mut storage = MemoryStorage::default();
        storage
            .set_item(LAST_SYNCED_KEY, "2026-10-18T08:30:00+02:00")
            .unwrap();

        let d = Dashboard::new(&storage);
        assert_eq!(
            d.last_synced,
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 6, 30, 0).unwrap())
        );
    }

    #[test]
    fn unreadable_last_synced_is_ignored() {
        let mut storage = MemoryStorage::default();
        storage.set_item(LAST_SYNCED_KEY, "yesterday").unwrap();
        assert_eq!(Dashboard::new(&storage).last_synced, None);
    }

    #[test]
    fn view_never_returns_to_none() {
        let mut d = Dashboard::default();
        assert_eq!(d.view, View::None);

        let mut seen = vec![d.view];
        assert!(d.begin_sync());
        seen.push(d.view);
        d.show_top_senders();
        seen.push(d.view);
        d.finish_sync(Err(http_500()), Utc::now(), &mut MemoryStorage::default());
        seen.push(d.view);
        d.finish_top_senders(Ok(vec![]));
        assert!(d.begin_sync());
        seen.push(d.view);
        d.show_top_senders();
        seen.push(d.view);

        assert_eq!(
            seen,
            vec![
                View::None,
                View::Sync,
                View::Senders,
                View::Senders,
                View::Sync,
                View::Senders
            ]
        );
    }

    #[test]
    fn successful_sync_stores_stats_and_persists_time() {
        let mut backend = MockStatsBackend::new();
        backend.expect_sync().times(1).returning(|| Ok(stats()));
        let mut storage = MemoryStorage::default();
        let mut d = Dashboard::new(&storage);

        assert!(d.sync_now(&backend, &mut storage));

        assert!(!d.loading_sync);
        assert_eq!(d.view, View::Sync);
        assert_eq!(d.sync, Some(SyncOutcome::Success(stats())));
        let stamped = d.last_synced.expect("last sync time");
        let stored = storage.get_item(LAST_SYNCED_KEY).unwrap().unwrap();
        assert_eq!(DateTime::parse_from_rfc3339(&stored).unwrap(), stamped);
    }

    #[test]
    fn failed_sync_surfaces_the_error() {
        let mut backend = MockStatsBackend::new();
        backend
            .expect_sync()
            .times(1)
            .returning(|| Err(ApiError::NotConnected));
        let mut storage = MemoryStorage::default();
        let mut d = Dashboard::new(&storage);

        d.sync_now(&backend, &mut storage);

        assert!(!d.loading_sync);
        assert_eq!(
            d.sync,
            Some(SyncOutcome::Failure(
                "Not connected. Please click 'Connect Gmail' first.".into()
            ))
        );
        assert_eq!(d.last_synced, None);
        assert_eq!(storage.get_item(LAST_SYNCED_KEY).unwrap(), None);
    }

    #[test]
    fn sync_in_flight_blocks_a_second_request() {
        let mut backend = MockStatsBackend::new();
        backend.expect_sync().times(0);
        let mut storage = MemoryStorage::default();
        let mut d = Dashboard::default();

        assert!(d.begin_sync());
        assert!(!d.begin_sync());
        assert!(!d.sync_now(&backend, &mut storage));
        assert!(d.loading_sync);
    }

    #[test]
    fn senders_in_flight_block_a_second_request() {
        let mut backend = MockStatsBackend::new();
        backend.expect_top_senders().times(0);
        let mut d = Dashboard::default();

        assert!(d.show_top_senders());
        assert!(!d.show_top_senders());
        assert!(!d.refresh_top_senders(&backend));
    }

    #[test]
    fn failed_sender_load_clears_loading_and_notifies() {
        let mut d = Dashboard::default();
        d.show_top_senders();
        d.finish_top_senders(Err(http_500()));

        assert!(!d.loading_senders);
        assert!(matches!(d.notice, Some(Notice::Error(ref m)) if m.contains("500")));
    }

    #[test]
    fn profile_decides_connection_silently() {
        let mut d = Dashboard::default();
        assert_eq!(d.connection, Connection::Unknown);

        d.apply_profile(Ok("me@gmail.com".into()));
        assert!(d.is_connected());
        assert_eq!(d.profile_email(), Some("me@gmail.com"));

        d.apply_profile(Err(ApiError::NotConnected));
        assert_eq!(d.connection, Connection::Disconnected);
        assert_eq!(d.notice, None);
    }

    fn dashboard_with_senders(backend: &MockStatsBackend) -> Dashboard {
        let mut d = Dashboard::default();
        d.show_top_senders();
        d.finish_top_senders(backend.top_senders());
        d
    }

    #[test]
    fn delete_acknowledges_count_and_refreshes_once() {
        let mut backend = MockStatsBackend::new();
        let mut calls = 0;
        backend.expect_top_senders().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![sender("news@x.com", 3), sender("boss@x.com", 1)])
            } else {
                Ok(vec![sender("boss@x.com", 1)])
            }
        });
        backend
            .expect_delete_sender()
            .withf(|s| s.to_string() == "news@x.com")
            .times(1)
            .returning(|_| Ok(3));

        let mut d = dashboard_with_senders(&backend);
        assert!(d.request_remove());
        assert_eq!(
            d.confirm,
            Some(PendingDelete {
                sender: "news@x.com".into(),
                count: 3
            })
        );

        d.delete_confirmed(&backend);

        assert_eq!(
            d.notice,
            Some(Notice::Info("Deleted 3 emails from news@x.com.".into()))
        );
        assert_eq!(d.top_senders, vec![sender("boss@x.com", 1)]);
        assert!(!d.deleting);
        assert!(d.confirm.is_none());
    }

    #[test]
    fn failed_delete_notifies_without_refresh() {
        let mut backend = MockStatsBackend::new();
        backend
            .expect_top_senders()
            .times(1)
            .returning(|| Ok(vec![sender("news@x.com", 3)]));
        backend
            .expect_delete_sender()
            .times(1)
            .returning(|_| Err(http_500()));

        let mut d = dashboard_with_senders(&backend);
        d.request_remove();
        d.delete_confirmed(&backend);

        assert_eq!(
            d.notice,
            Some(Notice::Error("Delete failed – see log.".into()))
        );
        assert_eq!(d.top_senders, vec![sender("news@x.com", 3)]);
    }

    #[test]
    fn cancelled_delete_sends_nothing() {
        let mut backend = MockStatsBackend::new();
        backend
            .expect_top_senders()
            .times(1)
            .returning(|| Ok(vec![sender("news@x.com", 3)]));
        backend.expect_delete_sender().times(0);

        let mut d = dashboard_with_senders(&backend);
        d.request_remove();
        d.cancel_remove();
        d.delete_confirmed(&backend);

        assert!(d.notice.is_none());
    }

    #[test]
    fn remove_targets_the_highlighted_ranked_row() {
        let mut d = Dashboard::default();
        d.show_top_senders();
        d.finish_top_senders(Ok(vec![
            sender("low@x.com", 1),
            sender("high@x.com", 9),
            sender("mid@x.com", 4),
        ]));

        d.move_selection(1);
        d.move_selection(5);
        assert_eq!(d.selected, 2);
        d.move_selection(-1);
        assert!(d.request_remove());
        assert_eq!(d.confirm.as_ref().unwrap().sender, "mid@x.com");
    }

    #[test]
    fn chart_does_not_reload_while_a_delete_runs() {
        let mut d = Dashboard::default();
        d.show_top_senders();
        d.finish_top_senders(Ok(vec![sender("news@x.com", 3)]));
        d.request_remove();
        assert!(d.confirm_remove().is_some());

        assert!(!d.show_top_senders());
        assert!(!d.loading_senders);

        assert!(d.finish_delete("news@x.com", Ok(3)));
        assert!(d.begin_refresh());
    }

    #[test]
    fn nothing_to_remove_outside_the_chart() {
        let mut d = Dashboard::default();
        d.top_senders = vec![sender("a@x.com", 1)];
        assert!(!d.request_remove());
    }
}
