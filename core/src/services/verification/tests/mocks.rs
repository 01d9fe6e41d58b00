//! Mock implementations for testing the verification service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::services::verification::traits::Notifier;

/// Mock notifier recording the last code delivered per mobile
pub struct MockNotifier {
    pub delivered: Arc<Mutex<HashMap<String, String>>>,
    pub should_fail: bool,
}

impl MockNotifier {
    pub fn new(should_fail: bool) -> Self {
        Self {
            delivered: Arc::new(Mutex::new(HashMap::new())),
            should_fail,
        }
    }

    pub fn delivered_code(&self, mobile: &str) -> Option<String> {
        self.delivered.lock().unwrap().get(mobile).cloned()
    }

    pub fn delivery_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn deliver_code(&self, mobile: &str, code: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("notifier unavailable".to_string());
        }
        self.delivered
            .lock()
            .unwrap()
            .insert(mobile.to_string(), code.to_string());
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }
}
