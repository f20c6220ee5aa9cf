// src/manager.rs
use crate::display::LaneView;
use crate::errors::{LaneError, StorageError};
use crate::event::AppEvent;
use crate::feed::FeedId;
use crate::fetch::FeedFetcher;
use crate::lanes::LaneList;
use crate::render::{begin_loading, show_outcome};
use crate::storage::LaneStore;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// One on-screen lane bound to a feed.
#[derive(Debug)]
pub struct Lane {
    id: FeedId,
    view: LaneView,
    ticket: u64,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Lane {
    pub fn id(&self) -> &FeedId {
        &self.id
    }

    pub fn view(&self) -> &LaneView {
        &self.view
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}

pub struct LaneManager {
    lanes: LaneList,
    store: LaneStore,
    fetcher: Arc<FeedFetcher>,
    events: UnboundedSender<AppEvent>,
    regions: Vec<Lane>,
    next_ticket: u64,
}

impl LaneManager {
    pub fn new(store: LaneStore, fetcher: Arc<FeedFetcher>, events: UnboundedSender<AppEvent>) -> Self {
        let lanes = store.load();
        Self { lanes, store, fetcher, events, regions: Vec::new(), next_ticket: 0 }
    }

    pub fn lanes(&self) -> &LaneList {
        &self.lanes
    }

    pub fn regions(&self) -> &[Lane] {
        &self.regions
    }

    pub fn fetcher(&self) -> Arc<FeedFetcher> {
        self.fetcher.clone()
    }

    /// Rebuilds every lane from the lane list, in order.
    pub fn render_all(&mut self) {
        self.regions.clear();
        let ids: Vec<FeedId> = self.lanes.ids().to_vec();
        for id in ids {
            let lane = self.create_lane(id);
            self.regions.push(lane);
        }
        info!("LaneManager: rendering {} lanes", self.regions.len());
    }

    /// Builds a lane and starts its first fetch.
    pub fn create_lane(&mut self, id: FeedId) -> Lane {
        let ticket = self.issue_ticket();
        let mut lane = Lane { id, view: LaneView::new(), ticket, refreshed_at: None };
        begin_loading(&mut lane.view);
        self.spawn_fetch(lane.id.clone(), ticket);
        lane
    }

    /// Puts `id` at the front of the list and shows it first.
    pub fn add_lane(&mut self, id: FeedId) -> Result<(), LaneError> {
        let updated = self.lanes.prepend(id.clone())?;
        self.store.save(&updated)?;
        self.lanes = updated;

        let lane = self.create_lane(id);
        info!("LaneManager: added r/{}", lane.id);
        self.regions.insert(0, lane);
        Ok(())
    }

    pub fn remove_lane(&mut self, id: &FeedId) -> Result<(), StorageError> {
        let updated = self.lanes.remove(id);
        self.store.save(&updated)?;
        self.lanes = updated;
        self.regions.retain(|lane| lane.id != *id);
        info!("LaneManager: removed r/{}", id);
        Ok(())
    }

    pub fn refresh_lane(&mut self, index: usize) {
        let ticket = self.issue_ticket();
        let Some(lane) = self.regions.get_mut(index) else {
            return;
        };
        lane.ticket = ticket;
        begin_loading(&mut lane.view);
        let id = lane.id.clone();
        self.spawn_fetch(id, ticket);
    }

    pub fn refresh_all(&mut self) {
        for index in 0..self.regions.len() {
            self.refresh_lane(index);
        }
    }

    /// Routes a finished fetch into its lane. Outcomes for removed lanes or
    /// superseded requests are dropped; returns whether anything was drawn.
    pub fn apply(&mut self, event: AppEvent) -> bool {
        let AppEvent::PostsLoaded { id, ticket, outcome, timestamp } = event else {
            return false;
        };
        let Some(lane) = self.regions.iter_mut().find(|lane| lane.id == id) else {
            debug!("LaneManager: r/{} is gone, dropping result", id);
            return false;
        };
        if lane.ticket != ticket {
            debug!("LaneManager: stale result for r/{} (ticket {} < {})", id, ticket, lane.ticket);
            return false;
        }
        show_outcome(&mut lane.view, &id, outcome);
        lane.refreshed_at = Some(timestamp);
        true
    }

    /// Starts the existence check for the add-lane flow.
    pub fn spawn_verify(&self, id: FeedId) {
        let fetcher = self.fetcher.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = fetcher.verify_exists(&id).await;
            let _ = events.send(AppEvent::LaneVerified { id, outcome });
        });
    }

    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn spawn_fetch(&self, id: FeedId, ticket: u64) {
        let fetcher = self.fetcher.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = fetcher.fetch_posts(&id).await;
            let _ = events.send(AppEvent::PostsLoaded { id, ticket, outcome, timestamp: Utc::now() });
        });
    }
}
