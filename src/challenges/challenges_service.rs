use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::ensure_user;
use crate::challenges::challenges_model::{ChallengeSnapshot, ChallengeWeek};
use crate::challenges::challenges_traits::{ChallengeRepositoryTrait, ChallengeServiceTrait};
use crate::errors::Result;
use crate::settings::SettingsServiceTrait;

pub struct ChallengeService<R: ChallengeRepositoryTrait> {
    challenge_repo: Arc<R>,
    settings: Arc<dyn SettingsServiceTrait>,
    observers: DashMap<String, watch::Sender<ChallengeSnapshot>>,
}

impl<R: ChallengeRepositoryTrait> ChallengeService<R> {
    pub fn new(challenge_repo: Arc<R>, settings: Arc<dyn SettingsServiceTrait>) -> Self {
        ChallengeService {
            challenge_repo,
            settings,
            observers: DashMap::new(),
        }
    }

    fn current_snapshot(&self, user_id: &str) -> Result<ChallengeSnapshot> {
        let week = ChallengeWeek::current();
        match self.challenge_repo.get_by_id(&week.record_id(user_id))? {
            Some(challenge) => Ok(challenge.snapshot()),
            None => Ok(week.placeholder(user_id, self.settings.get_weekly_target())),
        }
    }

    fn publish(&self, user_id: &str, snapshot: &ChallengeSnapshot) {
        let closed = match self.observers.get(user_id) {
            Some(tx) => tx.send(snapshot.clone()).is_err(),
            None => false,
        };
        // A send error means every receiver is gone; drop the channel.
        if closed {
            self.observers.remove(user_id);
        }
    }
}

#[async_trait]
impl<R: ChallengeRepositoryTrait> ChallengeServiceTrait for ChallengeService<R> {
    fn get_current(&self, user_id: &str) -> Result<ChallengeSnapshot> {
        ensure_user(user_id)?;
        self.current_snapshot(user_id)
    }

    async fn update_progress(&self, user_id: &str, delta: f64) -> Result<ChallengeSnapshot> {
        ensure_user(user_id)?;
        let week = ChallengeWeek::current();
        let target = self.settings.get_weekly_target();

        let challenge = self
            .challenge_repo
            .upsert_with_delta(user_id, &week, delta, target)
            .await?;

        let snapshot = challenge.snapshot();
        self.publish(user_id, &snapshot);
        Ok(snapshot)
    }

    fn observe(&self, user_id: &str) -> Result<watch::Receiver<ChallengeSnapshot>> {
        ensure_user(user_id)?;
        let snapshot = self.current_snapshot(user_id)?;

        let tx = self
            .observers
            .entry(user_id.to_string())
            .or_insert_with(|| watch::channel(snapshot.clone()).0);
        let rx = tx.subscribe();
        // Existing channels may hold a stale week; reseed with the latest.
        let _ = tx.send_replace(snapshot);
        Ok(rx)
    }

    fn refresh(&self, user_id: &str) -> Result<ChallengeSnapshot> {
        ensure_user(user_id)?;
        let snapshot = self.current_snapshot(user_id)?;
        self.publish(user_id, &snapshot);
        Ok(snapshot)
    }
}
