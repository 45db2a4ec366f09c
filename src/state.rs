use std::sync::Arc;

use crate::{
    config::Config,
    database::{FeedbackStore, RedisStore, init_redis},
};

pub struct State {
    pub config: Config,
    pub store: Arc<dyn FeedbackStore>,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let redis_connection = init_redis(&config.redis_url).await;
        let store = Arc::new(RedisStore::new(redis_connection));

        Arc::new(Self { config, store })
    }
}
