//! User points accounting.
//!
//! Balances are never stored; every read re-derives the sum from the
//! transactions assigned to the user.

use std::sync::Arc;

use rvm_core::UserId;
use tracing::{debug, instrument};

use crate::error::{ServiceError, ServiceResult};
use crate::ports::PointsStore;

/// Reads derived point balances.
#[derive(Debug)]
pub struct PointsService<S> {
    store: Arc<S>,
}

impl<S: PointsStore> PointsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        PointsService { store }
    }

    /// Total points of a user. 0 for users with no assigned transactions,
    /// and for user ids nobody registered.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn get_points(&self, user_id: &UserId) -> ServiceResult<i64> {
        let points = self
            .store
            .user_points(user_id)
            .await
            .map_err(ServiceError::storage("get_points"))?;

        debug!(points, "Points derived");
        Ok(points)
    }
}
