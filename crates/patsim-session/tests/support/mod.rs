#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use patsim_cases::CaseCatalog;
use patsim_core::models::case::Case;
use patsim_core::models::message::Message;
use patsim_llm::error::GatewayError;
use patsim_llm::gateway::ModelGateway;
use patsim_session::protocol::Simulator;
use tokio::sync::Mutex;

/// Records every request and answers from a script of replies.
#[derive(Default)]
pub struct StubGateway {
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<Message>>>,
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    delay: Option<Duration>,
}

impl StubGateway {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            ..Default::default()
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(error)])),
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying(&["too late"])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_request(&self) -> Vec<Message> {
        self.requests.lock().await.last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ModelGateway for StubGateway {
    fn backend(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _model: &str, messages: &[Message]) -> Result<Message, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("I'm not sure.".to_string()))
            .map(Message::assistant)
    }
}

pub fn migraine() -> Case {
    Case {
        id: 1,
        condition: "Migraine".to_string(),
        symptoms: vec![
            "Severe headache".to_string(),
            "Nausea".to_string(),
            "Sensitivity to light".to_string(),
        ],
        history: "Headaches for the last 3 days, worse in the morning, no head trauma".to_string(),
        extra: "No fever, no cough".to_string(),
    }
}

pub fn simulator(gateway: Arc<StubGateway>) -> Simulator {
    let catalog = CaseCatalog::new(vec![migraine()]).unwrap();
    Simulator::new(Arc::new(catalog), gateway, "llama3")
}
