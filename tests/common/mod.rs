#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use briefmail_lib::config::AppConfig;
use briefmail_lib::processor::SubmissionProcessor;
use briefmail_lib::server::{self, AppState};
use briefmail_lib::smtp::{Mailer, OutgoingEmail};
use briefmail_lib::BriefmailError;

/// Records every message it is handed; optionally refuses them all.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> briefmail_lib::Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(BriefmailError::SmtpSend {
                recipient: email.to.clone(),
                reason: "simulated outage".to_string(),
            });
        }
        Ok(())
    }
}

/// Serve the router on an ephemeral port for the rest of the test.
pub async fn spawn_server(mailer: Arc<RecordingMailer>) -> SocketAddr {
    let processor = SubmissionProcessor::new(Arc::new(AppConfig::default()), mailer).unwrap();
    let state = AppState {
        processor: Arc::new(processor),
        smtp_configured: false,
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, state, std::future::pending()));
    addr
}

pub fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("fullName", "Alice Example"),
        ("email", "alice@example.com"),
        ("projectTitle", "Spring Campaign"),
        ("projectType", "Branding"),
        ("projectDescription", "A refresh of the whole identity.\nTwo phases."),
        ("keyObjectives", "Awareness"),
        ("targetAudience", "Independent designers"),
        ("mainMessage", "Be bold"),
        ("deliverables", "Logo, palette"),
        ("acknowledgement", "on"),
    ]
}
